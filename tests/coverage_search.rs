use coverage_ga::CoverageSearch;
use coverage_ga::models::{
    CoverageConfig, CoveragePenalties, CoverageSurface, EARTH_RADIUS_M, EvaluationGrid, GeoPoint,
    GridSpec, coverage_fitness, coverage_metrics, distance,
};
use rand::{SeedableRng, rngs::StdRng};

const LAT: f64 = 19.4326;
const LON: f64 = -99.1332;

/// Point `north_m` north and `east_m` east of (LAT, LON), small-offset approximation.
fn offset(north_m: f64, east_m: f64) -> GeoPoint {
    let d_lat = (north_m / EARTH_RADIUS_M).to_degrees();
    let d_lon = (east_m / (EARTH_RADIUS_M * LAT.to_radians().cos())).to_degrees();
    GeoPoint::new(LAT + d_lat, LON + d_lon)
}

fn square_1km() -> Vec<GeoPoint> {
    vec![
        offset(0.0, 0.0),
        offset(0.0, 1000.0),
        offset(1000.0, 0.0),
        offset(1000.0, 1000.0),
    ]
}

/// One camera for a 1 km square at radius 100 m. The existing-camera spacing
/// is tightened to 550 m so the only penalty-free spot is near the center.
fn square_config() -> CoverageConfig {
    CoverageConfig {
        new_camera_count: 1,
        coverage_radius_m: 100.0,
        grid: GridSpec {
            spacing_m: 20.0,
            ..GridSpec::default()
        },
        population_size: 40,
        generations: 25,
        penalties: CoveragePenalties {
            min_distance_to_existing_m: 550.0,
            ..CoveragePenalties::default()
        },
        ..CoverageConfig::default()
    }
}

#[test]
fn test_places_a_camera_in_the_middle_of_a_square() -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    let cameras = square_1km();

    let report = CoverageSearch::new(square_config())?.run(&cameras, &mut rng)?;
    assert_eq!(report.new_cameras.len(), 1);

    let proposed = report.new_cameras[0];
    let center = offset(500.0, 500.0);
    let to_center = distance(&proposed, &center);
    assert!(cameras.iter().all(|c| to_center < distance(&proposed, c)));

    let metrics = report.metrics.expect("metrics for non-empty input");
    let baseline = report.baseline.expect("baseline for non-empty input");
    assert!(metrics.coverage_total >= baseline.coverage_total);
    assert!((0.0..=100.0).contains(&report.fitness));

    Ok(())
}

#[test]
fn test_reports_metrics_for_existing_plus_proposed() -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    let cameras = square_1km();
    let grid = EvaluationGrid::build(&cameras, &GridSpec::default(), &mut rng)?;

    let config = CoverageConfig {
        new_camera_count: 3,
        population_size: 20,
        generations: 10,
        ..CoverageConfig::default()
    };
    let report = CoverageSearch::new(config)?
        .with_grid(grid.clone())
        .run(&cameras, &mut rng)?;

    let all: Vec<GeoPoint> = cameras.iter().chain(&report.new_cameras).copied().collect();

    assert_eq!(report.new_cameras.len(), 3);
    assert_eq!(report.metrics, Some(coverage_metrics(&grid, &all, 120.0)));
    assert_eq!(report.baseline, Some(coverage_metrics(&grid, &cameras, 120.0)));
    Ok(())
}

#[test]
fn test_covers_at_least_the_baseline_with_default_penalties() -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    let config = CoverageConfig {
        penalties: CoveragePenalties::default(),
        ..square_config()
    };

    let report = CoverageSearch::new(config)?.run(&square_1km(), &mut rng)?;

    let metrics = report.metrics.expect("metrics for non-empty input");
    let baseline = report.baseline.expect("baseline for non-empty input");
    assert_eq!(report.new_cameras.len(), 1);
    assert!(metrics.coverage_total >= baseline.coverage_total);
    Ok(())
}

#[test]
fn test_starts_from_seed_points() -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    let cameras = square_1km();
    let seed = offset(500.0, 500.0);
    let grid = EvaluationGrid::build(&cameras, &square_config().grid, &mut rng)?;

    let config = CoverageConfig {
        seed_probability: 1.0,
        generations: 1,
        ..square_config()
    };
    let report = CoverageSearch::new(config.clone())?
        .with_grid(grid.clone())
        .with_seed_points(vec![seed])
        .run(&cameras, &mut rng)?;

    // Every initial layout is the seed, which repair leaves alone, so the
    // first generation is uniform at the seed's fitness
    let surface = CoverageSurface::new(&grid, &cameras, config.coverage_radius_m);
    let expected = coverage_fitness(&surface, &cameras, &[seed], &config.penalties);

    let first = report.history[0];
    assert!((first.best_fitness - expected).abs() < 1e-9);
    assert!((first.mean_fitness - expected).abs() < 1e-9);
    assert!(report.fitness >= expected);
    Ok(())
}

#[test]
fn test_returns_an_empty_report_for_no_cameras() -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(42);

    let report = CoverageSearch::new(CoverageConfig::default())?.run(&[], &mut rng)?;

    assert!(report.new_cameras.is_empty());
    assert_eq!(report.fitness, 0.0);
    assert!(report.metrics.is_none());
    Ok(())
}

#[test]
fn test_best_fitness_never_decreases() -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    let config = CoverageConfig {
        new_camera_count: 2,
        generations: 15,
        population_size: 20,
        ..square_config()
    };

    let report = CoverageSearch::new(config)?.run(&square_1km(), &mut rng)?;

    assert_eq!(report.history.len(), 15);
    for pair in report.history.windows(2) {
        assert!(pair[1].best_fitness >= pair[0].best_fitness);
    }
    assert!(report.fitness >= report.history[14].best_fitness);
    Ok(())
}

#[test]
fn test_rejects_invalid_configuration() {
    let config = CoverageConfig {
        new_camera_count: 0,
        ..CoverageConfig::default()
    };

    let err = CoverageSearch::new(config).unwrap_err();
    assert!(err.to_string().contains("new_camera_count"));
}
