//! Observation grid: the sky coordinates sampled by each detector pixel.
//!
//! The grid follows the Cartesian meshgrid convention used for images:
//! arrays are indexed `[[row, col]]` with the row following y and the column
//! following x, so `x_mesh` is constant down each column and `y_mesh` is
//! constant along each row.

use ndarray::{Array1, Array2};

use crate::error::{LensingError, Result};

/// Fixed 2-D coordinate mesh and per-pixel solid angle for an observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationGrid {
    xlims: [f64; 2],
    ylims: [f64; 2],
    nx: usize,
    ny: usize,
    x_mesh: Array2<f64>,
    y_mesh: Array2<f64>,
    pixel_area: f64,
}

/// Evenly spaced samples over `[start, stop]`, endpoints included.
///
/// A single sample sits at `start`.
pub fn linspace(start: f64, stop: f64, num: usize) -> Array1<f64> {
    if num == 1 {
        return Array1::from_elem(1, start);
    }

    let step = (stop - start) / (num as f64 - 1.0);
    Array1::from_shape_fn(num, |i| {
        if i == num - 1 {
            stop
        } else {
            start + i as f64 * step
        }
    })
}

impl ObservationGrid {
    /// Build the mesh for the given field of view (arcsec) and resolution.
    ///
    /// # Errors
    /// Returns [`LensingError::InvalidGrid`] if either count is zero or a
    /// pair of limits is not strictly increasing and finite.
    pub fn new(xlims: [f64; 2], ylims: [f64; 2], nx: usize, ny: usize) -> Result<Self> {
        check_limits("x", xlims)?;
        check_limits("y", ylims)?;
        if nx == 0 || ny == 0 {
            return Err(LensingError::InvalidGrid(format!(
                "grid resolution must be positive, got nx = {nx}, ny = {ny}"
            )));
        }

        let xs = linspace(xlims[0], xlims[1], nx);
        let ys = linspace(ylims[0], ylims[1], ny);

        let x_mesh = Array2::from_shape_fn((ny, nx), |(_, col)| xs[col]);
        let y_mesh = Array2::from_shape_fn((ny, nx), |(row, _)| ys[row]);

        let pixel_area = ((xlims[1] - xlims[0]) / nx as f64) * ((ylims[1] - ylims[0]) / ny as f64);

        Ok(Self {
            xlims,
            ylims,
            nx,
            ny,
            x_mesh,
            y_mesh,
            pixel_area,
        })
    }

    /// x coordinate (arcsec) of every pixel
    pub fn x_mesh(&self) -> &Array2<f64> {
        &self.x_mesh
    }

    /// y coordinate (arcsec) of every pixel
    pub fn y_mesh(&self) -> &Array2<f64> {
        &self.y_mesh
    }

    /// Pixel solid angle in arcsec²
    pub fn pixel_area(&self) -> f64 {
        self.pixel_area
    }

    pub fn xlims(&self) -> [f64; 2] {
        self.xlims
    }

    pub fn ylims(&self) -> [f64; 2] {
        self.ylims
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Array shape `(rows, cols)` = `(ny, nx)` of every field on this grid
    pub fn shape(&self) -> (usize, usize) {
        (self.ny, self.nx)
    }
}

fn check_limits(axis: &str, lims: [f64; 2]) -> Result<()> {
    if !(lims[0].is_finite() && lims[1].is_finite()) || lims[1] <= lims[0] {
        return Err(LensingError::InvalidGrid(format!(
            "{axis} limits must be finite and increasing, got [{}, {}]",
            lims[0], lims[1]
        )));
    }
    Ok(())
}
