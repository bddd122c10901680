//! Stream supervisor: owns the single active log-tailing worker.
//!
//! The worker attaches to the container's log stream at "now", feeds each
//! line through the parser into the router, and exits to `Failed` on stream
//! end or error without taking the process down. There is no auto-retry: the
//! usual cause of a drop is a deliberate server restart, which reattaches
//! explicitly through the lifecycle controller. At most one worker streams at
//! a time; starting while one is active forces it through `Stopping` first.

use std::sync::Arc;

use bridge_core::parse;
use futures_util::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::control::ServerControl;
use crate::router::BroadcastRouter;

/// Lifecycle state of the log worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorStatus {
    Idle,
    Attaching,
    Streaming,
    Stopping,
    Failed,
}

pub struct StreamSupervisor {
    inner: Arc<Mutex<SupervisorState>>,
    // Serializes start/stop sequences; without it two overlapping start()
    // calls could both spawn and one worker would be stored over the other,
    // leaving an orphan streaming forever.
    ops: Mutex<()>,
    control: Arc<dyn ServerControl>,
    router: Arc<BroadcastRouter>,
}

struct SupervisorState {
    status: SupervisorStatus,
    worker: Option<Worker>,
}

struct Worker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl StreamSupervisor {
    pub fn new(control: Arc<dyn ServerControl>, router: Arc<BroadcastRouter>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SupervisorState {
                status: SupervisorStatus::Idle,
                worker: None,
            })),
            ops: Mutex::new(()),
            control,
            router,
        }
    }

    /// Spawns a fresh log worker. An already-active worker is stopped and
    /// joined first, so duplicate delivery is impossible. Concurrent
    /// start/stop calls are serialized; the last one wins.
    pub async fn start(&self) {
        let _ops = self.ops.lock().await;
        self.shutdown_worker().await;

        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();
        let shared = Arc::clone(&self.inner);
        let control = Arc::clone(&self.control);
        let router = Arc::clone(&self.router);

        {
            let mut state = self.inner.lock().await;
            state.status = SupervisorStatus::Attaching;
        }

        let handle = tokio::spawn(async move {
            run_worker(control, router, shared, worker_cancel).await;
        });

        let mut state = self.inner.lock().await;
        state.worker = Some(Worker { cancel, handle });
        info!("Log stream worker started");
    }

    /// Cancels the active worker (unblocking its read), joins it, and returns
    /// to `Idle`. No-op when nothing is running.
    pub async fn stop(&self) {
        let _ops = self.ops.lock().await;
        self.shutdown_worker().await;
    }

    async fn shutdown_worker(&self) {
        let worker = {
            let mut state = self.inner.lock().await;
            let Some(worker) = state.worker.take() else {
                state.status = SupervisorStatus::Idle;
                return;
            };
            state.status = SupervisorStatus::Stopping;
            worker
        };

        worker.cancel.cancel();
        if let Err(e) = worker.handle.await {
            warn!(error = %e, "Log worker join failed");
        }

        let mut state = self.inner.lock().await;
        state.status = SupervisorStatus::Idle;
        info!("Log stream worker stopped");
    }

    pub async fn status(&self) -> SupervisorStatus {
        self.inner.lock().await.status
    }
}

async fn run_worker(
    control: Arc<dyn ServerControl>,
    router: Arc<BroadcastRouter>,
    shared: Arc<Mutex<SupervisorState>>,
    cancel: CancellationToken,
) {
    // Attach at "now": events from before the attach are never replayed.
    let since = chrono::Utc::now().timestamp();

    let mut stream = match control.open_log_stream(since).await {
        Ok(stream) => stream,
        Err(e) => {
            error!(error = %e, "Failed to open log stream");
            set_status(&shared, SupervisorStatus::Failed).await;
            return;
        }
    };

    set_status(&shared, SupervisorStatus::Streaming).await;
    info!(since, "Attached to log stream");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                // stop() owns the transition back to Idle.
                return;
            }
            chunk = stream.next() => match chunk {
                Some(Ok(block)) => {
                    for line in block.lines() {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        debug!(line, "Log line");
                        let event = parse(line);
                        router.dispatch(&event).await;
                    }
                }
                Some(Err(e)) => {
                    error!(error = %e, "Log stream error");
                    set_status(&shared, SupervisorStatus::Failed).await;
                    return;
                }
                None => {
                    warn!("Log stream ended");
                    set_status(&shared, SupervisorStatus::Failed).await;
                    return;
                }
            }
        }
    }
}

async fn set_status(shared: &Arc<Mutex<SupervisorState>>, status: SupervisorStatus) {
    shared.lock().await.status = status;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::LogStream;
    use async_trait::async_trait;
    use bridge_core::{BridgeError, ChannelSender, ControlError, MarkupMode};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use storage::SettingsRepository;

    /// Serves a scripted set of lines; optionally keeps the stream open
    /// afterwards or refuses to open at all.
    struct StubControl {
        opened: AtomicUsize,
        lines: Vec<String>,
        hold_open: bool,
        fail_open: bool,
    }

    impl StubControl {
        fn new(lines: Vec<String>, hold_open: bool) -> Self {
            Self {
                opened: AtomicUsize::new(0),
                lines,
                hold_open,
                fail_open: false,
            }
        }

        fn failing() -> Self {
            Self {
                opened: AtomicUsize::new(0),
                lines: Vec::new(),
                hold_open: false,
                fail_open: true,
            }
        }
    }

    #[async_trait]
    impl ServerControl for StubControl {
        async fn restart(&self) -> Result<(), ControlError> {
            Ok(())
        }

        async fn status(&self) -> Result<String, ControlError> {
            Ok("running".to_string())
        }

        async fn open_log_stream(&self, _since: i64) -> Result<LogStream, ControlError> {
            self.opened.fetch_add(1, Ordering::SeqCst);
            if self.fail_open {
                return Err(ControlError::Api("daemon unreachable".to_string()));
            }
            let items: Vec<Result<String, ControlError>> =
                self.lines.iter().cloned().map(Ok).collect();
            let stream = futures_util::stream::iter(items);
            if self.hold_open {
                Ok(Box::pin(stream.chain(futures_util::stream::pending())))
            } else {
                Ok(Box::pin(stream))
            }
        }
    }

    struct RecordingSender {
        sent: Mutex<Vec<(i64, String)>>,
    }

    #[async_trait]
    impl ChannelSender for RecordingSender {
        async fn send(
            &self,
            channel_id: i64,
            text: &str,
            _markup: MarkupMode,
        ) -> Result<(), BridgeError> {
            self.sent.lock().await.push((channel_id, text.to_string()));
            Ok(())
        }
    }

    async fn build(
        control: Arc<StubControl>,
    ) -> (StreamSupervisor, Arc<RecordingSender>, SettingsRepository) {
        let settings = SettingsRepository::new("sqlite::memory:")
            .await
            .expect("Failed to create repository");
        let sender = Arc::new(RecordingSender {
            sent: Mutex::new(Vec::new()),
        });
        let router = Arc::new(BroadcastRouter::new(
            settings.clone(),
            sender.clone() as Arc<dyn ChannelSender>,
        ));
        let supervisor = StreamSupervisor::new(control as Arc<dyn ServerControl>, router);
        (supervisor, sender, settings)
    }

    #[tokio::test]
    async fn start_reaches_streaming() {
        let control = Arc::new(StubControl::new(Vec::new(), true));
        let (supervisor, _, _) = build(control.clone()).await;

        assert_eq!(supervisor.status().await, SupervisorStatus::Idle);
        supervisor.start().await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(supervisor.status().await, SupervisorStatus::Streaming);
        assert_eq!(control.opened.load(Ordering::SeqCst), 1);

        supervisor.stop().await;
        assert_eq!(supervisor.status().await, SupervisorStatus::Idle);
    }

    #[tokio::test]
    async fn start_while_streaming_replaces_the_worker() {
        let control = Arc::new(StubControl::new(Vec::new(), true));
        let (supervisor, _, _) = build(control.clone()).await;

        supervisor.start().await;
        tokio::time::sleep(Duration::from_millis(100)).await;
        supervisor.start().await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        // The old worker was joined before the new stream opened.
        assert_eq!(control.opened.load(Ordering::SeqCst), 2);
        assert_eq!(supervisor.status().await, SupervisorStatus::Streaming);

        supervisor.stop().await;
    }

    /// Serves one join line after a delay, so a worker still alive past
    /// stop() gives itself away by delivering it.
    struct DelayedLineControl;

    #[async_trait]
    impl ServerControl for DelayedLineControl {
        async fn restart(&self) -> Result<(), ControlError> {
            Ok(())
        }

        async fn status(&self) -> Result<String, ControlError> {
            Ok("running".to_string())
        }

        async fn open_log_stream(&self, _since: i64) -> Result<LogStream, ControlError> {
            let line = async {
                tokio::time::sleep(Duration::from_millis(300)).await;
                Ok::<String, ControlError>("[JOIN] Alice joined the game".to_string())
            };
            Ok(Box::pin(
                futures_util::stream::once(line).chain(futures_util::stream::pending()),
            ))
        }
    }

    #[tokio::test]
    async fn concurrent_starts_leave_no_orphaned_worker() {
        let settings = SettingsRepository::new("sqlite::memory:")
            .await
            .expect("Failed to create repository");
        settings.upsert_channel(1, true).await.expect("subscribe");
        let sender = Arc::new(RecordingSender {
            sent: Mutex::new(Vec::new()),
        });
        let router = Arc::new(BroadcastRouter::new(
            settings,
            sender.clone() as Arc<dyn ChannelSender>,
        ));
        let supervisor = Arc::new(StreamSupervisor::new(Arc::new(DelayedLineControl), router));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let supervisor = Arc::clone(&supervisor);
            handles.push(tokio::spawn(async move { supervisor.start().await }));
        }
        for handle in handles {
            handle.await.expect("start task");
        }

        supervisor.stop().await;
        assert_eq!(supervisor.status().await, SupervisorStatus::Idle);

        // Give any leaked worker time to reach its delayed line.
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(sender.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn stop_unblocks_a_pending_read_promptly() {
        let control = Arc::new(StubControl::new(Vec::new(), true));
        let (supervisor, _, _) = build(control).await;

        supervisor.start().await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        tokio::time::timeout(Duration::from_secs(1), supervisor.stop())
            .await
            .expect("stop should not hang on a blocked read");
        assert_eq!(supervisor.status().await, SupervisorStatus::Idle);
    }

    #[tokio::test]
    async fn stream_end_marks_failed_without_retry() {
        let control = Arc::new(StubControl::new(Vec::new(), false));
        let (supervisor, _, _) = build(control.clone()).await;

        supervisor.start().await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(supervisor.status().await, SupervisorStatus::Failed);
        // No reattach on its own.
        assert_eq!(control.opened.load(Ordering::SeqCst), 1);

        supervisor.stop().await;
        assert_eq!(supervisor.status().await, SupervisorStatus::Idle);
    }

    #[tokio::test]
    async fn open_failure_marks_failed() {
        let control = Arc::new(StubControl::failing());
        let (supervisor, _, _) = build(control).await;

        supervisor.start().await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(supervisor.status().await, SupervisorStatus::Failed);
    }

    #[tokio::test]
    async fn lines_flow_through_parser_and_router() {
        let control = Arc::new(StubControl::new(
            vec![
                "[JOIN] Alice joined the game".to_string(),
                "1200.5 Info noise line".to_string(),
                "[CHAT] Bob: hi\n[LEAVE] Alice left the game".to_string(),
            ],
            true,
        ));
        let (supervisor, sender, settings) = build(control).await;
        settings.upsert_channel(7, true).await.expect("subscribe");

        supervisor.start().await;
        tokio::time::sleep(Duration::from_millis(200)).await;
        supervisor.stop().await;

        let sent = sender.sent.lock().await;
        let bodies: Vec<&str> = sent.iter().map(|(_, body)| body.as_str()).collect();
        assert_eq!(
            bodies,
            vec![
                "Alice joined the game",
                "<b>Bob</b>: hi",
                "Alice left the game"
            ]
        );
    }
}
