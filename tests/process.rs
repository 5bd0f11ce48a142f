// tests/process.rs

use std::time::{Duration, Instant};

use watchrun::exec::ProcessHandle;
use watchrun_test_utils::{init_tracing, with_timeout};

#[test]
fn display_joins_the_command_line() {
    let handle = ProcessHandle::new(vec![
        "go".to_string(),
        "test".to_string(),
        "./...".to_string(),
    ]);
    assert_eq!(handle.display(), "go test ./...");
}

#[tokio::test]
async fn terminate_on_an_idle_handle_returns_immediately() {
    with_timeout(async {
        init_tracing();

        let handle = ProcessHandle::new(vec!["true".to_string()]);
        let started = Instant::now();
        handle.terminate(Duration::from_secs(3)).await;
        assert!(
            started.elapsed() < Duration::from_millis(500),
            "idle terminate must not wait out the grace period"
        );
    })
    .await;
}

#[tokio::test]
async fn empty_command_only_sleeps_the_startup_delay() {
    with_timeout(async {
        init_tracing();

        let handle = ProcessHandle::new(vec![]);
        let started = Instant::now();
        handle.start(Duration::from_millis(100)).await;
        assert!(started.elapsed() >= Duration::from_millis(100));

        // Nothing is running, so neither call below may panic or block.
        handle.start(Duration::ZERO).await;
        handle.terminate(Duration::from_secs(3)).await;
        assert!(started.elapsed() < Duration::from_secs(2));
    })
    .await;
}

#[tokio::test]
async fn spawn_failure_leaves_the_handle_idle() {
    with_timeout(async {
        init_tracing();

        let handle = ProcessHandle::new(vec!["watchrun-no-such-binary".to_string()]);
        handle.start(Duration::ZERO).await;

        // The failed spawn must not count as a running process.
        handle.start(Duration::ZERO).await;
        handle.terminate(Duration::from_millis(100)).await;
    })
    .await;
}

#[cfg(unix)]
#[tokio::test]
async fn start_after_natural_exit_does_not_panic() {
    with_timeout(async {
        init_tracing();

        let handle = ProcessHandle::new(vec!["true".to_string()]);
        handle.start(Duration::ZERO).await;
        // Let the first instance run to completion.
        tokio::time::sleep(Duration::from_millis(300)).await;

        handle.start(Duration::ZERO).await;
        handle.terminate(Duration::from_secs(1)).await;
    })
    .await;
}

#[cfg(unix)]
#[tokio::test]
#[should_panic(expected = "still running")]
async fn starting_twice_without_an_exit_panics() {
    let handle = ProcessHandle::new(vec!["sleep".to_string(), "30".to_string()]);
    handle.start(Duration::ZERO).await;
    handle.start(Duration::ZERO).await;
}

#[cfg(unix)]
#[tokio::test]
async fn cooperative_child_stops_well_inside_the_grace_period() {
    with_timeout(async {
        init_tracing();

        let handle = ProcessHandle::new(vec!["sleep".to_string(), "30".to_string()]);
        handle.start(Duration::ZERO).await;
        tokio::time::sleep(Duration::from_millis(200)).await;

        let started = Instant::now();
        handle.terminate(Duration::from_secs(3)).await;
        assert!(
            started.elapsed() < Duration::from_secs(2),
            "an interrupt-friendly child should not exhaust the grace period"
        );
    })
    .await;
}

#[cfg(unix)]
#[tokio::test]
async fn sigint_ignoring_child_is_killed_after_the_grace_period() {
    with_timeout(async {
        init_tracing();

        let handle = ProcessHandle::new(vec![
            "sh".to_string(),
            "-c".to_string(),
            r#"trap "" INT; sleep 30"#.to_string(),
        ]);
        handle.start(Duration::ZERO).await;
        // Give the shell a moment to install the trap.
        tokio::time::sleep(Duration::from_millis(300)).await;

        let started = Instant::now();
        handle.terminate(Duration::from_millis(500)).await;
        let elapsed = started.elapsed();

        assert!(
            elapsed >= Duration::from_millis(500),
            "terminate returned before the grace period: {elapsed:?}"
        );
        assert!(
            elapsed < Duration::from_secs(3),
            "terminate blocked past the escalation: {elapsed:?}"
        );
    })
    .await;
}
