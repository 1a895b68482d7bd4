//! Bounded-parallel connection status checks.
//!
//! One `ConnectionStatusService` owns the status cache for a loaded file and
//! runs refresh campaigns against it. A campaign dispatches one task per
//! alias under a shared semaphore, shells out to the reachability tool
//! (`tnsping` by default) with output captured, and reports progress over an
//! event channel. Starting a new campaign always cancels the previous one;
//! at most one campaign is active at a time.
//!
//! Per-alias state transitions are strictly
//! `Waiting -> Checking -> Online | Offline`. Every failure mode of the
//! external tool (missing binary, nonzero exit, timeout, bad output) is
//! normalized to `Offline`; a worker never surfaces an error for an alias.

use std::collections::{HashMap, HashSet};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::{broadcast, mpsc, Semaphore};

use crate::core::entry::{ConnectionStatus, TnsEntry};

pub const DEFAULT_MAX_PARALLEL_CHECKS: usize = 5;
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_PING_COMMAND: &str = "tnsping";

/// Progress events emitted by a refresh campaign.
///
/// Events may be consumed from any task context; marshaling onto a specific
/// thread is the caller's responsibility.
#[derive(Debug, Clone)]
pub enum StatusEvent {
    /// A worker acquired a permit and launched the external check
    Checking { name: String },
    /// An alias reached a terminal status
    Finished {
        name: String,
        status: ConnectionStatus,
        completed: usize,
        total: usize,
    },
    /// Every dispatched task finished or was abandoned
    CampaignDone { cancelled: bool },
}

/// Handle to a running refresh campaign.
///
/// The event stream ends after `CampaignDone`; dropping the handle does not
/// cancel the campaign (use
/// [`ConnectionStatusService::cancel_pending_checks`] for that).
pub struct RefreshHandle {
    events: mpsc::UnboundedReceiver<StatusEvent>,
    total: usize,
}

impl RefreshHandle {
    /// Number of aliases selected for this campaign
    pub fn total(&self) -> usize {
        self.total
    }

    /// Next progress event, or `None` once the campaign is fully drained
    pub async fn next_event(&mut self) -> Option<StatusEvent> {
        self.events.recv().await
    }
}

/// Cache plus pending-refresh set, both keyed case-insensitively.
#[derive(Default)]
struct SharedState {
    cache: HashMap<String, ConnectionStatus>,
    pending_refresh: HashSet<String>,
}

struct Campaign {
    id: u64,
    shutdown: broadcast::Sender<()>,
}

/// Reachability checker with caching, cancellation and a concurrency bound.
///
/// Construct one per loaded file/session. All methods take `&self`; the
/// service can be wrapped in an `Arc` and shared with e.g. a Ctrl-C handler.
pub struct ConnectionStatusService {
    state: Arc<Mutex<SharedState>>,
    campaign: Arc<Mutex<Option<Campaign>>>,
    next_campaign_id: AtomicU64,
    max_parallel: usize,
    check_timeout: Duration,
    command: String,
}

impl Default for ConnectionStatusService {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PARALLEL_CHECKS)
    }
}

impl ConnectionStatusService {
    pub fn new(max_parallel: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(SharedState::default())),
            campaign: Arc::new(Mutex::new(None)),
            next_campaign_id: AtomicU64::new(1),
            max_parallel: max_parallel.max(1),
            check_timeout: DEFAULT_CHECK_TIMEOUT,
            command: DEFAULT_PING_COMMAND.to_string(),
        }
    }

    /// Override the reachability command (tests use mock scripts)
    pub fn with_command<S: Into<String>>(mut self, command: S) -> Self {
        self.command = command.into();
        self
    }

    /// Override the per-check timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.check_timeout = timeout;
        self
    }

    /// Seed entry statuses from the cache. Synchronous, no I/O.
    ///
    /// Blank names are forced `Offline`; names flagged for refresh show
    /// `Waiting`; cached names adopt their cached value; everything else
    /// stays `Unknown`.
    pub fn initialize_status(&self, entries: &mut [TnsEntry]) {
        let state = self.state.lock();

        for entry in entries.iter_mut() {
            if entry.name.trim().is_empty() {
                entry.status = ConnectionStatus::Offline;
                continue;
            }

            let key = cache_key(&entry.name);
            if state.pending_refresh.contains(&key) {
                entry.status = ConnectionStatus::Waiting;
            } else if let Some(&cached) = state.cache.get(&key) {
                entry.status = cached;
            } else {
                entry.status = ConnectionStatus::Unknown;
            }
        }
    }

    /// Evict the cached value for `name` and force a recheck on the next
    /// refresh pass even if the cache would otherwise satisfy it.
    pub fn mark_for_refresh(&self, name: &str) {
        if name.trim().is_empty() {
            return;
        }

        let key = cache_key(name);
        let mut state = self.state.lock();
        state.cache.remove(&key);
        state.pending_refresh.insert(key);
    }

    /// Evict one name's cached value and pending flag, or all if `None`.
    pub fn clear_cache(&self, name: Option<&str>) {
        let mut state = self.state.lock();
        match name {
            Some(name) if !name.trim().is_empty() => {
                let key = cache_key(name);
                state.cache.remove(&key);
                state.pending_refresh.remove(&key);
            }
            Some(_) => {}
            None => {
                state.cache.clear();
                state.pending_refresh.clear();
            }
        }
    }

    /// Whether a refresh campaign is currently active
    pub fn is_checking(&self) -> bool {
        self.campaign.lock().is_some()
    }

    /// Start a refresh campaign over `entries`.
    ///
    /// The checked subset is all entries when `force_refresh` is set,
    /// otherwise only those flagged pending or absent from the cache. An
    /// empty subset is a no-op returning `None`: nothing is cancelled and no
    /// events fire. Otherwise any previous campaign is cancelled and
    /// replaced, the selected entries are synchronously marked `Waiting`,
    /// and one task per alias is dispatched under the semaphore.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start_refresh(
        &self,
        entries: &mut [TnsEntry],
        force_refresh: bool,
    ) -> Option<RefreshHandle> {
        let selected: Vec<String> = {
            let state = self.state.lock();
            entries
                .iter()
                .filter(|e| !e.name.trim().is_empty())
                .filter(|e| {
                    let key = cache_key(&e.name);
                    force_refresh
                        || state.pending_refresh.contains(&key)
                        || !state.cache.contains_key(&key)
                })
                .map(|e| e.name.clone())
                .collect()
        };

        if selected.is_empty() {
            return None;
        }

        self.cancel_pending_checks();

        // Immediate, synchronous signal to the caller before any I/O starts
        let selected_keys: HashSet<String> = selected.iter().map(|n| cache_key(n)).collect();
        for entry in entries.iter_mut() {
            if selected_keys.contains(&cache_key(&entry.name)) {
                entry.status = ConnectionStatus::Waiting;
            }
        }

        let campaign_id = self.next_campaign_id.fetch_add(1, Ordering::Relaxed);
        let (shutdown_tx, _) = broadcast::channel::<()>(1);
        *self.campaign.lock() = Some(Campaign {
            id: campaign_id,
            shutdown: shutdown_tx.clone(),
        });

        let total = selected.len();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let semaphore = Arc::new(Semaphore::new(self.max_parallel));
        let completed = Arc::new(AtomicUsize::new(0));

        log::info!(
            "starting refresh campaign #{} over {} aliases (max {} parallel)",
            campaign_id,
            total,
            self.max_parallel
        );

        let mut workers = Vec::with_capacity(total);
        for name in selected {
            workers.push(tokio::spawn(run_worker(WorkerContext {
                name,
                command: self.command.clone(),
                timeout: self.check_timeout,
                semaphore: Arc::clone(&semaphore),
                state: Arc::clone(&self.state),
                events: events_tx.clone(),
                shutdown: shutdown_tx.subscribe(),
                completed: Arc::clone(&completed),
                total,
            })));
        }

        // Supervisor: waits for every worker, reports campaign completion
        // and releases the campaign slot if it still owns it.
        let campaign_slot = Arc::clone(&self.campaign);
        tokio::spawn(async move {
            let mut cancelled = false;
            for worker in workers {
                match worker.await {
                    Ok(worker_cancelled) => cancelled |= worker_cancelled,
                    Err(err) => {
                        log::warn!("status check task failed: {}", err);
                        cancelled = true;
                    }
                }
            }

            let _ = events_tx.send(StatusEvent::CampaignDone { cancelled });
            log::info!(
                "refresh campaign #{} done (cancelled: {})",
                campaign_id,
                cancelled
            );

            let mut slot = campaign_slot.lock();
            if slot.as_ref().map_or(false, |c| c.id == campaign_id) {
                *slot = None;
            }
        });

        Some(RefreshHandle {
            events: events_rx,
            total,
        })
    }

    /// Cancel the active campaign, if any. Idempotent and non-blocking:
    /// in-flight tasks observe the signal cooperatively, this call never
    /// waits for them.
    pub fn cancel_pending_checks(&self) {
        let campaign = self.campaign.lock().take();
        if let Some(campaign) = campaign {
            log::debug!("cancelling refresh campaign #{}", campaign.id);
            let _ = campaign.shutdown.send(());
        }
    }
}

fn cache_key(name: &str) -> String {
    name.trim().to_uppercase()
}

struct WorkerContext {
    name: String,
    command: String,
    timeout: Duration,
    semaphore: Arc<Semaphore>,
    state: Arc<Mutex<SharedState>>,
    events: mpsc::UnboundedSender<StatusEvent>,
    shutdown: broadcast::Receiver<()>,
    completed: Arc<AtomicUsize>,
    total: usize,
}

/// One per-alias check task. Returns whether the alias was abandoned by
/// cancellation (in which case the cache was left untouched).
async fn run_worker(mut ctx: WorkerContext) -> bool {
    // The permit is acquired only here, immediately before the external
    // check: queued aliases stay in Waiting until a slot frees up.
    let permit = tokio::select! {
        permit = ctx.semaphore.acquire() => match permit {
            Ok(permit) => permit,
            Err(_) => return true,
        },
        _ = ctx.shutdown.recv() => return true,
    };

    let _ = ctx.events.send(StatusEvent::Checking {
        name: ctx.name.clone(),
    });

    let status = check_alias(&ctx.command, &ctx.name, ctx.timeout, &mut ctx.shutdown).await;
    drop(permit);

    let status = match status {
        Some(status) => status,
        // Abandoned: no cache update, no terminal event
        None => return true,
    };

    // Cache write, pending-flag clear and the completion count are one
    // atomic step for this alias; the event is sent after the new value is
    // visible in the cache.
    let completed = {
        let mut state = ctx.state.lock();
        let key = cache_key(&ctx.name);
        state.cache.insert(key.clone(), status);
        state.pending_refresh.remove(&key);
        ctx.completed.fetch_add(1, Ordering::SeqCst) + 1
    };

    let _ = ctx.events.send(StatusEvent::Finished {
        name: ctx.name.clone(),
        status,
        completed,
        total: ctx.total,
    });

    false
}

/// Run the external reachability tool once for `alias`.
///
/// `Some(Online)` requires exit code zero and a case-insensitive `OK` in
/// captured stdout; every failure mode collapses to `Some(Offline)`.
/// `None` means the campaign shutdown signal fired mid-check; the spawned
/// process (and its process group, on unix) is killed before returning.
async fn check_alias(
    command: &str,
    alias: &str,
    timeout: Duration,
    shutdown: &mut broadcast::Receiver<()>,
) -> Option<ConnectionStatus> {
    if alias.trim().is_empty() {
        return Some(ConnectionStatus::Offline);
    }

    let mut cmd = Command::new(command);
    cmd.arg(alias)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // Own process group so a timeout can take down grandchildren too
    #[cfg(unix)]
    cmd.process_group(0);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            log::debug!("failed to launch '{}' for {}: {}", command, alias, err);
            return Some(ConnectionStatus::Offline);
        }
    };

    // Drain both pipes concurrently; a full pipe would deadlock wait()
    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();
    let stdout_task = tokio::spawn(read_pipe(stdout_pipe));
    let stderr_task = tokio::spawn(read_pipe(stderr_pipe));

    enum WaitOutcome {
        Exited(std::process::ExitStatus),
        Failed,
        TimedOut,
    }

    let outcome = tokio::select! {
        result = tokio::time::timeout(timeout, child.wait()) => match result {
            Ok(Ok(exit)) => WaitOutcome::Exited(exit),
            Ok(Err(err)) => {
                log::debug!("wait for '{}' ({}) failed: {}", command, alias, err);
                WaitOutcome::Failed
            }
            Err(_) => WaitOutcome::TimedOut,
        },
        _ = shutdown.recv() => {
            kill_process_tree(&mut child).await;
            stdout_task.abort();
            stderr_task.abort();
            return None;
        }
    };

    match outcome {
        WaitOutcome::Exited(exit) => {
            let stdout = stdout_task.await.unwrap_or_default();
            let _ = stderr_task.await;

            if exit.success() && stdout.to_uppercase().contains("OK") {
                Some(ConnectionStatus::Online)
            } else {
                log::debug!(
                    "{}: '{}' exited with {:?}, no OK in output",
                    alias,
                    command,
                    exit.code()
                );
                Some(ConnectionStatus::Offline)
            }
        }
        WaitOutcome::Failed => {
            stdout_task.abort();
            stderr_task.abort();
            Some(ConnectionStatus::Offline)
        }
        WaitOutcome::TimedOut => {
            log::debug!("{}: '{}' timed out after {:?}", alias, command, timeout);
            kill_process_tree(&mut child).await;
            stdout_task.abort();
            stderr_task.abort();
            Some(ConnectionStatus::Offline)
        }
    }
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf).await;
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Kill the check process and, on unix, its whole process group. The group
/// kill is what takes down grandchildren the tool may have spawned.
async fn kill_process_tree(child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        // The child is its own group leader (process_group(0) at spawn);
        // a negative pid signals the entire group.
        unsafe {
            libc::kill(-(pid as i32), libc::SIGKILL);
        }
    }

    // Kills the direct child on non-unix platforms, and reaps it everywhere
    if let Err(err) = child.kill().await {
        log::debug!("failed to kill check process: {}", err);
    }
}
