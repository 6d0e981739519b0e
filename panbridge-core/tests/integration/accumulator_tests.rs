//! Performance accumulator over a real session

use std::sync::Arc;
use std::time::Duration;

use panbridge_core::performance::{PerformanceAccumulator, PollOutcome};
use panbridge_core::session::{CommandExecutor, RetryConfig, SessionClient, SessionConfig};

use super::support::FakeAppliance;

const STORAGE: &str = "\
Read IOPS: 1200
Write IOPS: 300
Read Throughput (MB/s): 80
Write Throughput (MB/s): 20
Read Latency (ms): 0.5
Write Latency (ms): 1.5";

const DIRECTOR: &str = "\
Creates: 12
Removes: 3
Lookups: 450";

fn appliance() -> FakeAppliance {
    let appliance = FakeAppliance::new();
    appliance
        .respond("sysstat storage", STORAGE)
        .respond("sysstat director", DIRECTOR);
    appliance
}

fn executor(appliance: &FakeAppliance, command_timeout: Duration) -> Arc<dyn CommandExecutor> {
    let config = SessionConfig::default()
        .with_command_timeout(command_timeout)
        .with_retry(RetryConfig::new().with_initial_delay_ms(1).with_max_delay_ms(5));
    Arc::new(SessionClient::new(Arc::new(appliance.clone()), config))
}

#[tokio::test]
async fn test_ticks_fill_both_windows() {
    let appliance = appliance();
    let accumulator =
        PerformanceAccumulator::start(executor(&appliance, Duration::from_secs(2)), Duration::from_millis(20));

    accumulator.wait_for_ticks(3).await;
    accumulator.stop().await;

    let summary = accumulator.summary().await;
    let ticks = usize::try_from(accumulator.ticks()).unwrap();
    assert_eq!(summary.history.len(), ticks);
    assert_eq!(summary.metadata_history.len(), ticks);
    assert!(
        summary
            .history
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp)
    );
    assert!((summary.current_iops - 1500.0).abs() < f64::EPSILON);
    assert!((summary.current_throughput_mbs - 100.0).abs() < f64::EPSILON);
    assert!((summary.current_latency_ms - 1.0).abs() < f64::EPSILON);
    assert_eq!(appliance.count("sysstat storage"), ticks);
}

#[tokio::test]
async fn test_timed_out_poll_keeps_history() {
    let appliance = appliance();
    let accumulator = PerformanceAccumulator::start(
        executor(&appliance, Duration::from_millis(200)),
        Duration::from_secs(3600),
    );
    accumulator.wait_for_ticks(1).await;
    assert_eq!(accumulator.len().await, 1);

    appliance.hang_once("sysstat storage");
    assert_eq!(accumulator.poll_now().await, PollOutcome::Skipped);
    assert_eq!(accumulator.len().await, 1);

    assert_eq!(accumulator.poll_now().await, PollOutcome::Recorded);
    assert_eq!(accumulator.len().await, 2);
    assert_eq!(appliance.opens(), 2);
    accumulator.stop().await;
}
