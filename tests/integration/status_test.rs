// Integration tests for the connection status service, driven through mock
// reachability scripts instead of a real tnsping.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

use tnsed::core::entry::{ConnectionStatus, TnsEntry};
use tnsed::core::status::{ConnectionStatusService, RefreshHandle, StatusEvent};

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();

    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();

    path
}

fn entries(names: &[&str]) -> Vec<TnsEntry> {
    names
        .iter()
        .map(|name| TnsEntry {
            name: name.to_string(),
            host: "h".to_string(),
            port: "1521".to_string(),
            ..Default::default()
        })
        .collect()
}

/// Collect every event until the stream ends; returns (finished, cancelled).
async fn drain(handle: &mut RefreshHandle) -> (Vec<(String, ConnectionStatus)>, bool) {
    let mut finished = Vec::new();
    let mut cancelled = false;

    while let Some(event) = handle.next_event().await {
        match event {
            StatusEvent::Finished { name, status, .. } => finished.push((name, status)),
            StatusEvent::CampaignDone {
                cancelled: campaign_cancelled,
            } => cancelled = campaign_cancelled,
            StatusEvent::Checking { .. } => {}
        }
    }

    (finished, cancelled)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_missing_tool_reports_offline_without_error() {
    let service = ConnectionStatusService::new(2)
        .with_command("/nonexistent/tnsed-integration-missing-tool");

    let mut list = entries(&["A", "B"]);
    service.initialize_status(&mut list);

    let mut handle = service.start_refresh(&mut list, true).expect("campaign");
    let (finished, cancelled) = drain(&mut handle).await;

    assert!(!cancelled);
    assert_eq!(finished.len(), 2);
    assert!(finished
        .iter()
        .all(|(_, status)| *status == ConnectionStatus::Offline));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_exit_code_and_output_decide_status() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        dir.path(),
        "mock-tnsping",
        r#"case "$1" in
  GOOD) echo "Attempting to contact db... OK (10 msec)" ;;
  LOWERCASE) echo "everything ok here" ;;
  NO_MARKER) echo "unreachable" ;;
  BAD_EXIT) echo OK; exit 3 ;;
esac"#,
    );

    let service =
        ConnectionStatusService::new(4).with_command(script.to_string_lossy().to_string());

    let mut list = entries(&["GOOD", "LOWERCASE", "NO_MARKER", "BAD_EXIT"]);
    let mut handle = service.start_refresh(&mut list, true).expect("campaign");
    let (finished, _) = drain(&mut handle).await;

    let status_of = |name: &str| {
        finished
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| *s)
            .unwrap()
    };

    assert_eq!(status_of("GOOD"), ConnectionStatus::Online);
    // the OK scan is case-insensitive
    assert_eq!(status_of("LOWERCASE"), ConnectionStatus::Online);
    assert_eq!(status_of("NO_MARKER"), ConnectionStatus::Offline);
    assert_eq!(status_of("BAD_EXIT"), ConnectionStatus::Offline);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_results_are_cached_and_second_refresh_is_noop() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "mock-tnsping", "echo OK");

    let service =
        ConnectionStatusService::new(2).with_command(script.to_string_lossy().to_string());

    let mut list = entries(&["A", "B"]);
    let mut handle = service.start_refresh(&mut list, true).expect("campaign");
    drain(&mut handle).await;

    // a fresh load adopts cached values synchronously
    let mut reloaded = entries(&["A", "B"]);
    service.initialize_status(&mut reloaded);
    assert!(reloaded
        .iter()
        .all(|e| e.status == ConnectionStatus::Online));

    // nothing pending, nothing uncached: no-op, no campaign
    assert!(service.start_refresh(&mut reloaded, false).is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_mark_for_refresh_forces_a_recheck() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("invocations.log");
    let script = write_script(
        dir.path(),
        "mock-tnsping",
        &format!("echo \"$1\" >> {}\necho OK", log.display()),
    );

    let service =
        ConnectionStatusService::new(2).with_command(script.to_string_lossy().to_string());

    let mut list = entries(&["A", "B"]);
    let mut handle = service.start_refresh(&mut list, true).expect("campaign");
    drain(&mut handle).await;

    service.mark_for_refresh("a");

    // the marked alias shows Waiting before the next pass
    let mut reloaded = entries(&["A", "B"]);
    service.initialize_status(&mut reloaded);
    assert_eq!(reloaded[0].status, ConnectionStatus::Waiting);
    assert_eq!(reloaded[1].status, ConnectionStatus::Online);

    let mut handle = service
        .start_refresh(&mut reloaded, false)
        .expect("marked alias needs a recheck");
    assert_eq!(handle.total(), 1);
    drain(&mut handle).await;

    let invocations = fs::read_to_string(&log).unwrap();
    assert_eq!(invocations.lines().count(), 3);
    assert_eq!(invocations.lines().filter(|l| *l == "A").count(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_stays_under_the_limit() {
    let dir = TempDir::new().unwrap();
    let markers = dir.path().join("markers");
    fs::create_dir(&markers).unwrap();

    // each invocation samples how many checks are alive at once
    let script = write_script(
        dir.path(),
        "mock-tnsping",
        &format!(
            "touch {dir}/run.$$\nls {dir} | grep -c '^run\\.' >> {dir}/samples.log\nsleep 0.3\nrm -f {dir}/run.$$\necho OK",
            dir = markers.display()
        ),
    );

    let limit = 2;
    let service =
        ConnectionStatusService::new(limit).with_command(script.to_string_lossy().to_string());

    let mut list = entries(&["A", "B", "C", "D", "E", "F"]);
    let mut handle = service.start_refresh(&mut list, true).expect("campaign");
    let (finished, _) = drain(&mut handle).await;
    assert_eq!(finished.len(), 6);

    let samples = fs::read_to_string(markers.join("samples.log")).unwrap();
    let max_alive = samples
        .lines()
        .filter_map(|l| l.trim().parse::<usize>().ok())
        .max()
        .unwrap();

    assert!(
        max_alive <= limit,
        "observed {} concurrent checks with a limit of {}",
        max_alive,
        limit
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cancellation_abandons_the_campaign() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "mock-tnsping", "sleep 5\necho OK");

    let service =
        ConnectionStatusService::new(2).with_command(script.to_string_lossy().to_string());

    let mut list = entries(&["A", "B", "C", "D"]);
    let mut handle = service.start_refresh(&mut list, true).expect("campaign");

    // the immediate, synchronous signal before any I/O
    assert!(list.iter().all(|e| e.status == ConnectionStatus::Waiting));

    let started = Instant::now();
    service.cancel_pending_checks();
    assert!(
        started.elapsed() < Duration::from_millis(500),
        "cancel must not block on outstanding process exits"
    );

    let (finished, cancelled) = drain(&mut handle).await;
    assert!(cancelled);
    assert!(
        finished.is_empty(),
        "no alias may reach a terminal status from a cancelled campaign"
    );
    assert!(
        started.elapsed() < Duration::from_secs(3),
        "in-flight checks must be killed, not awaited"
    );

    // abandoned checks never touch the cache
    let mut fresh = entries(&["A", "B", "C", "D"]);
    service.initialize_status(&mut fresh);
    assert!(fresh
        .iter()
        .all(|e| e.status == ConnectionStatus::Unknown));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_slow_tool_times_out_to_offline() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "mock-tnsping", "sleep 10\necho OK");

    let service = ConnectionStatusService::new(1)
        .with_command(script.to_string_lossy().to_string())
        .with_timeout(Duration::from_secs(1));

    let started = Instant::now();
    let mut list = entries(&["SLOW"]);
    let mut handle = service.start_refresh(&mut list, true).expect("campaign");
    let (finished, cancelled) = drain(&mut handle).await;

    assert!(!cancelled);
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].1, ConnectionStatus::Offline);
    assert!(
        started.elapsed() < Duration::from_secs(5),
        "the check process must be killed at the timeout"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_new_campaign_supersedes_the_old_one() {
    let dir = TempDir::new().unwrap();
    let slow = write_script(dir.path(), "slow-tnsping", "sleep 5\necho OK");

    let service =
        ConnectionStatusService::new(1).with_command(slow.to_string_lossy().to_string());

    let mut first = entries(&["A", "B"]);
    let mut first_handle = service.start_refresh(&mut first, true).expect("campaign");

    // superseding campaign cancels the previous one
    let mut second = entries(&["A", "B"]);
    let second_handle = service.start_refresh(&mut second, true);
    assert!(second_handle.is_some());

    let (finished, cancelled) = drain(&mut first_handle).await;
    assert!(cancelled);
    assert!(finished.is_empty());

    service.cancel_pending_checks();
}
