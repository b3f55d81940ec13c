//! # Camera Planning Example
//!
//! Loads camera records from a JSON file (or uses a small built-in district),
//! looks for blind spots between them and proposes new cameras seeded from
//! the worst-covered locations.
//!
//! ```text
//! cargo run --example plan_coverage -- cameras.json
//! RUST_LOG=coverage_ga=debug cargo run --example plan_coverage
//! ```
//!
//! The input is an array of `{"latitude": .., "longitude": ..}` objects. The
//! Spanish field names `latitud` and `longitud` are accepted as well.

use anyhow::{Context, Result};
use coverage_ga::Service;
use coverage_ga::models::{BlindSpotConfig, CameraRecord, CoverageConfig};
use std::env;
use tracing_subscriber::EnvFilter;

const DEMO_CAMERAS: &str = r#"[
    {"latitude": 19.4326, "longitude": -99.1332},
    {"latitude": 19.4326, "longitude": -99.1237},
    {"latitude": 19.4416, "longitude": -99.1332},
    {"latitude": 19.4416, "longitude": -99.1237},
    {"latitude": 19.4371, "longitude": -99.1400},
    {"latitude": 19.4280, "longitude": -99.1180}
]"#;

fn load_cameras() -> Result<Vec<CameraRecord>> {
    let raw = match env::args().nth(1) {
        Some(path) => {
            std::fs::read_to_string(&path).with_context(|| format!("reading cameras from {path}"))?
        }
        None => DEMO_CAMERAS.to_string(),
    };

    serde_json::from_str(&raw).context("parsing camera records")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("coverage_ga=info")),
        )
        .init();

    let cameras = load_cameras()?;
    println!("Loaded {} cameras", cameras.len());

    let service = Service::builder().with_seed(42).build();

    let blind_spots = service
        .blind_spots(&cameras, BlindSpotConfig::default())
        .await?;

    println!("\nBlind spots (worst first):");
    for (rank, spot) in blind_spots.blind_spots.iter().enumerate() {
        println!(
            "  #{:<2} lat {:.6}, lon {:.6}  score {:.3}",
            rank + 1,
            spot.location.latitude,
            spot.location.longitude,
            spot.fitness
        );
    }

    let config = CoverageConfig {
        new_camera_count: 3,
        ..CoverageConfig::default()
    };
    let plan = service
        .improve_coverage_seeded(&cameras, BlindSpotConfig::default(), config, 3)
        .await?;

    println!("\nProposed cameras:");
    for camera in &plan.coverage.new_cameras {
        println!("  lat {:.6}, lon {:.6}", camera.latitude, camera.longitude);
    }

    if let (Some(before), Some(after)) = (&plan.coverage.baseline, &plan.coverage.metrics) {
        println!(
            "\nCoverage {:.2}% -> {:.2}% (fitness {:.2})",
            before.coverage_total, after.coverage_total, plan.coverage.fitness
        );
        println!(
            "  uncovered {:.2}%, 1 camera {:.2}%, 2 cameras {:.2}%, 3+ cameras {:.2}%",
            after.no_coverage, after.level_1, after.level_2, after.level_3_plus
        );
    }

    if let Some(first) = plan.coverage.new_cameras.first() {
        let simulation = service.simulate_camera(&cameras, *first).await?;
        println!(
            "\nFirst proposal alone: {:.2}% coverage ({:+.2})",
            simulation.coverage, simulation.delta
        );
    }

    println!("\n{}", serde_json::to_string_pretty(&plan)?);

    Ok(())
}
