//! Session client against the scripted appliance

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use panbridge_core::error::SessionError;
use panbridge_core::session::{
    CommandExecutor, RetryConfig, SessionClient, SessionConfig, SessionState,
};

use super::support::FakeAppliance;

fn fast_retry() -> RetryConfig {
    RetryConfig::new()
        .with_initial_delay_ms(1)
        .with_max_delay_ms(5)
}

fn client(appliance: &FakeAppliance, command_timeout: Duration) -> SessionClient {
    let config = SessionConfig::default()
        .with_connect_timeout(Duration::from_secs(2))
        .with_command_timeout(command_timeout)
        .with_retry(fast_retry());
    SessionClient::new(Arc::new(appliance.clone()), config)
}

#[tokio::test]
async fn test_execute_returns_cleaned_output() {
    let appliance = FakeAppliance::new();
    appliance.respond("about", "\x1B[1mSystem Name\x1B[0m: lab\r\nModel: V5000");
    let client = client(&appliance, Duration::from_secs(2));

    let result = client.execute("about").await.unwrap();
    assert_eq!(result.output, "System Name: lab\nModel: V5000");
    assert_eq!(client.state(), SessionState::Ready);
    assert_eq!(appliance.opens(), 1);
    assert_eq!(appliance.received(), vec!["about".to_string()]);
}

#[tokio::test]
async fn test_prompt_split_across_reads_is_matched() {
    let appliance = FakeAppliance::new();
    appliance.respond_in_pieces("about", "System Name: lab\r\nModel: V5000", 3);
    let client = client(&appliance, Duration::from_secs(2));

    let result = client.execute("about").await.unwrap();
    assert_eq!(result.output, "System Name: lab\nModel: V5000");
    assert_eq!(client.state(), SessionState::Ready);

    appliance.respond("next", "second");
    assert_eq!(client.execute("next").await.unwrap().output, "second");
}

#[tokio::test]
async fn test_connect_is_idempotent() {
    let appliance = FakeAppliance::new();
    let client = client(&appliance, Duration::from_secs(2));

    client.connect().await.unwrap();
    client.connect().await.unwrap();
    assert_eq!(client.state(), SessionState::Ready);
    assert_eq!(appliance.opens(), 1);
}

#[tokio::test]
async fn test_concurrent_calls_run_one_at_a_time_in_order() {
    let appliance = FakeAppliance::new();
    appliance.respond_after("cmd-0", "out-0", Duration::from_millis(50));
    for i in 1..8 {
        appliance.respond(&format!("cmd-{i}"), &format!("out-{i}"));
    }
    let client = client(&appliance, Duration::from_secs(2));
    client.connect().await.unwrap();

    let commands: Vec<String> = (0..8).map(|i| format!("cmd-{i}")).collect();
    let results = join_all(commands.iter().map(|c| client.execute(c))).await;

    let outputs: Vec<String> = results.into_iter().map(|r| r.unwrap().output).collect();
    let expected: Vec<String> = (0..8).map(|i| format!("out-{i}")).collect();
    assert_eq!(outputs, expected);
    assert_eq!(appliance.received(), commands);
    assert_eq!(appliance.overlaps(), 0);
}

#[tokio::test]
async fn test_timeout_disconnects_and_next_call_reconnects() {
    let appliance = FakeAppliance::new();
    appliance.hang_once("sysstat storage");
    appliance.respond("about", "System Name: lab");
    let client = client(&appliance, Duration::from_millis(200));

    let err = client.execute("sysstat storage").await.unwrap_err();
    match err {
        SessionError::PromptTimeout { waited, tail, .. } => {
            assert_eq!(waited, Duration::from_millis(200));
            assert!(tail.contains("working..."));
        }
        other => panic!("expected a prompt timeout, got {other:?}"),
    }
    assert_eq!(client.state(), SessionState::Disconnected);

    let result = client.execute("about").await.unwrap();
    assert_eq!(result.output, "System Name: lab");
    assert_eq!(appliance.opens(), 2);
    assert_eq!(client.state(), SessionState::Ready);
}

#[tokio::test]
async fn test_refused_opens_are_retried() {
    let appliance = FakeAppliance::new();
    appliance.refuse_opens(2).respond("about", "ok");
    let client = client(&appliance, Duration::from_secs(2));

    assert_eq!(client.execute("about").await.unwrap().output, "ok");
    assert_eq!(appliance.opens(), 1);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let appliance = FakeAppliance::new();
    appliance.refuse_opens(10);
    let client = client(&appliance, Duration::from_secs(2));

    let err = client.execute("about").await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::ReconnectExhausted { attempts: 3, .. }
    ));
    assert_eq!(client.state(), SessionState::Disconnected);
}

#[tokio::test]
async fn test_confirmation_is_answered() {
    let appliance = FakeAppliance::new();
    appliance.respond_with_confirmation("volume delete /scratch", "Volume /scratch deleted");
    let client = client(&appliance, Duration::from_secs(2));

    let result = client
        .execute_with_confirmation("volume delete /scratch")
        .await
        .unwrap();
    assert!(result.output.contains("Are you sure?"));
    assert!(result.output.ends_with("Volume /scratch deleted"));
    assert_eq!(appliance.received(), vec!["volume delete /scratch".to_string()]);
}

#[tokio::test]
async fn test_destroy_rejects_in_flight_and_queued_work() {
    let appliance = FakeAppliance::new();
    appliance.respond_after("slow", "late", Duration::from_millis(500));
    appliance.respond("fast", "quick");
    let client = Arc::new(client(&appliance, Duration::from_secs(2)));
    client.connect().await.unwrap();

    let slow = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.execute("slow").await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    let fast = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.execute("fast").await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    client.destroy();
    assert_eq!(slow.await.unwrap().unwrap_err(), SessionError::Destroyed);
    assert_eq!(fast.await.unwrap().unwrap_err(), SessionError::Destroyed);

    client.closed().await;
    assert_eq!(client.state(), SessionState::Destroyed);
    assert_eq!(
        client.execute("fast").await.unwrap_err(),
        SessionError::Destroyed
    );
    assert_eq!(appliance.count("fast"), 0);
}

#[tokio::test]
async fn test_unknown_command_output_is_returned() {
    let appliance = FakeAppliance::new();
    let client = client(&appliance, Duration::from_secs(2));

    let result = client.execute("bogus").await.unwrap();
    assert_eq!(result.output, "Error: unknown command 'bogus'");
}
