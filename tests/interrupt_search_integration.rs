use coverage_ga::Service;
use coverage_ga::models::{BlindSpotConfig, CoverageConfig, GeoPoint};
use coverage_ga::services::optimization::Error;
use std::sync::Arc;
use std::time::Duration;

fn cameras() -> Vec<GeoPoint> {
    vec![
        GeoPoint::new(19.430, -99.140),
        GeoPoint::new(19.430, -99.130),
        GeoPoint::new(19.440, -99.140),
        GeoPoint::new(19.440, -99.130),
    ]
}

#[tokio::test]
async fn test_interrupt_running_search_end_to_end() -> anyhow::Result<()> {
    let service = Arc::new(Service::builder().with_seed(42).build());

    // A search that would run far longer than the test
    let config = BlindSpotConfig {
        population_size: 50,
        generations: 200_000,
        ..BlindSpotConfig::default()
    };

    let service_clone = service.clone();
    let handle =
        tokio::spawn(async move { service_clone.blind_spots(&cameras(), config).await });

    // Let a few generations run, then interrupt
    tokio::time::sleep(Duration::from_millis(50)).await;
    service.interrupt();

    let result = tokio::time::timeout(Duration::from_secs(30), handle).await??;

    match result {
        Err(Error::Interrupted {
            completed_generations,
        }) => assert!(completed_generations < 200_000),
        other => panic!("expected an interrupted search, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn test_interrupted_service_refuses_new_work_until_reset() -> anyhow::Result<()> {
    let service = Service::builder().with_seed(42).build();
    let handle = service.interrupt_handle();
    handle.interrupt();

    let config = CoverageConfig {
        population_size: 10,
        generations: 3,
        ..CoverageConfig::default()
    };

    let result = service.improve_coverage(&cameras(), config.clone()).await;
    assert!(matches!(
        result,
        Err(Error::Interrupted {
            completed_generations: 0
        })
    ));

    handle.reset();
    let report = service.improve_coverage(&cameras(), config).await?;
    assert_eq!(report.new_cameras.len(), 5);

    Ok(())
}
