//! Render a strongly lensed image from a JSON configuration

use clap::Parser;
use lensing::image_io::save_image_png;
use lensing::units::LengthExt;
use lensing::{LensingSim, SimulationConfig};
use log::info;
use ndarray::Array2;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render a strongly lensed image")]
struct Args {
    /// Simulation configuration (JSON). Uses the built-in Einstein ring when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output PNG filename
    #[arg(long, default_value = "lensed.png")]
    output: PathBuf,

    /// Optional JSON summary of the rendered image
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Logarithmic stretch for the PNG
    #[arg(long, default_value_t = false)]
    log_scale: bool,

    /// Worker threads for pixel evaluation (defaults to all cores)
    #[arg(long)]
    threads: Option<usize>,
}

/// Statistics written with `--summary`
#[derive(Debug, Serialize)]
struct RenderSummary {
    nx: usize,
    ny: usize,
    pixel_area: f64,
    d_l_mpc: f64,
    d_s_mpc: f64,
    d_ls_mpc: f64,
    total_flux: f64,
    unlensed_flux: f64,
    magnification: f64,
    min: f64,
    max: f64,
}

fn min_max(image: &Array2<f64>) -> (f64, f64) {
    image
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            SimulationConfig::load_from_file(path)?
        }
        None => {
            info!("No configuration given, rendering the Einstein ring demo");
            SimulationConfig::einstein_ring()
        }
    };

    let cosmology = config.cosmology();
    let sim = LensingSim::from_config(&config, &cosmology)?;
    info!(
        "{} lenses, {} sources on a {}x{} grid",
        sim.lenses().len(),
        sim.sources().len(),
        sim.grid().nx(),
        sim.grid().ny()
    );

    let start = Instant::now();
    let image = sim.synthesize();
    info!("Synthesized image in {:.3?}", start.elapsed());

    save_image_png(&image, &args.output, args.log_scale)?;
    info!("Image written to {}", args.output.display());

    if let Some(summary_path) = &args.summary {
        let unlensed = sim.synthesize_unlensed();
        let total_flux = image.sum();
        let unlensed_flux = unlensed.sum();
        let (min, max) = min_max(&image);
        let distances = sim.distances();

        let summary = RenderSummary {
            nx: sim.grid().nx(),
            ny: sim.grid().ny(),
            pixel_area: sim.grid().pixel_area(),
            d_l_mpc: distances.d_l.as_megaparsecs(),
            d_s_mpc: distances.d_s.as_megaparsecs(),
            d_ls_mpc: distances.d_ls.as_megaparsecs(),
            total_flux,
            unlensed_flux,
            magnification: total_flux / unlensed_flux,
            min,
            max,
        };

        info!(
            "Total flux {:.4e}, unlensed {:.4e}, magnification {:.3}",
            summary.total_flux, summary.unlensed_flux, summary.magnification
        );
        std::fs::write(summary_path, serde_json::to_string_pretty(&summary)?)?;
        info!("Summary written to {}", summary_path.display());
    }

    Ok(())
}
