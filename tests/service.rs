use coverage_ga::Service;
use coverage_ga::models::{BlindSpotConfig, CameraRecord, CoverageConfig, GeoPoint, GridSpec};
use coverage_ga::services::optimization::Error;

fn records() -> Vec<CameraRecord> {
    vec![
        CameraRecord {
            latitude: 19.430,
            longitude: -99.140,
        },
        CameraRecord {
            latitude: 19.430,
            longitude: -99.130,
        },
        CameraRecord {
            latitude: 19.440,
            longitude: -99.140,
        },
        CameraRecord {
            latitude: 19.440,
            longitude: -99.130,
        },
    ]
}

fn quick_blind_spots() -> BlindSpotConfig {
    BlindSpotConfig {
        population_size: 30,
        generations: 10,
        result_count: 4,
        ..BlindSpotConfig::default()
    }
}

fn quick_coverage() -> CoverageConfig {
    CoverageConfig {
        new_camera_count: 2,
        population_size: 20,
        generations: 10,
        ..CoverageConfig::default()
    }
}

#[tokio::test]
async fn test_blind_spots_accept_camera_records() -> anyhow::Result<()> {
    let service = Service::builder().with_seed(42).build();

    let report = service.blind_spots(&records(), quick_blind_spots()).await?;

    assert_eq!(report.blind_spots.len(), 4);
    assert_eq!(report.history.len(), 10);
    Ok(())
}

#[tokio::test]
async fn test_seeded_service_is_reproducible() -> anyhow::Result<()> {
    let service = Service::builder().with_seed(7).build();

    let a = service.improve_coverage(&records(), quick_coverage()).await?;
    let b = service.improve_coverage(&records(), quick_coverage()).await?;

    assert_eq!(a, b);
    Ok(())
}

#[tokio::test]
async fn test_improve_coverage_seeded_with_blind_spots() -> anyhow::Result<()> {
    let service = Service::builder().with_seed(42).build();

    let report = service
        .improve_coverage_seeded(&records(), quick_blind_spots(), quick_coverage(), 3)
        .await?;

    assert_eq!(report.seeds.len(), 3);
    assert_eq!(report.coverage.new_cameras.len(), 2);
    assert!(report.coverage.coverage_gain().unwrap_or_default() >= 0.0);
    Ok(())
}

#[tokio::test]
async fn test_seed_count_is_at_least_one() -> anyhow::Result<()> {
    let service = Service::builder().with_seed(42).build();

    let report = service
        .improve_coverage_seeded(&records(), quick_blind_spots(), quick_coverage(), 0)
        .await?;

    assert_eq!(report.seeds.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_simulate_camera_with_tuples() -> anyhow::Result<()> {
    let service = Service::builder().with_seed(42).build();
    let cameras = vec![(19.430, -99.140), (19.440, -99.130)];

    let sim = service.simulate_camera(&cameras, (19.435, -99.135)).await?;
    assert!(sim.delta >= 0.0);
    assert!(sim.coverage <= 100.0);

    let none: Vec<(f64, f64)> = Vec::new();
    let sim = service.simulate_camera(&none, (19.435, -99.135)).await?;
    assert_eq!((sim.coverage, sim.delta), (0.0, 0.0));

    Ok(())
}

#[tokio::test]
async fn test_simulating_a_far_away_camera_changes_nothing() -> anyhow::Result<()> {
    let service = Service::builder()
        .with_seed(42)
        .with_simulation_radius(50.0)
        .build();

    let sim = service
        .simulate_camera(&records(), GeoPoint::new(0.0, 0.0))
        .await?;

    assert_eq!(sim.delta, 0.0);
    Ok(())
}

#[tokio::test]
async fn test_invalid_configuration_fails_before_searching() {
    let service = Service::builder().build();
    let config = BlindSpotConfig {
        tournament_size: 0,
        ..quick_blind_spots()
    };

    let result = service.blind_spots(&records(), config).await;
    assert!(matches!(result, Err(Error::ConfigError(_))));

    let service = Service::builder()
        .with_simulation_grid(GridSpec {
            spacing_m: -1.0,
            ..GridSpec::lightweight()
        })
        .build();
    let result = service.simulate_camera(&records(), (19.435, -99.135)).await;
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[tokio::test]
async fn test_negative_simulation_radius_is_rejected() {
    let service = Service::builder()
        .with_seed(42)
        .with_simulation_radius(-5.0)
        .build();

    let result = service.simulate_camera(&records(), (19.435, -99.135)).await;

    match result {
        Err(Error::ConfigError(err)) => assert_eq!(err.parameter(), "simulation_radius_m"),
        other => panic!("expected a configuration error, got {other:?}"),
    }
}
