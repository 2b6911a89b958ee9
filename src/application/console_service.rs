// Console service - Runs the console core on a single task and feeds it timers and fetch results
use crate::application::console::ConsoleCore;
use crate::application::error::ConsoleError;
use crate::application::history_source::{FetchRequest, HistoryBatch, HistorySource};
use crate::domain::console::ConsoleSnapshot;
use crate::domain::geometry::{Plot, TrendChart};
use crate::infrastructure::config::ConsoleSettings;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};

const COMMAND_BUFFER: usize = 64;

/// Cadence of the recurring work the actor schedules
#[derive(Debug, Clone, Copy)]
pub struct ConsoleTiming {
    pub tick: Duration,
    pub refresh: Duration,
}

impl From<&ConsoleSettings> for ConsoleTiming {
    fn from(settings: &ConsoleSettings) -> Self {
        Self {
            tick: Duration::from_secs(settings.tick_secs.max(1)),
            refresh: Duration::from_secs(settings.refresh_secs.max(1)),
        }
    }
}

enum Command {
    Start,
    Stop,
    Update {
        entity_id: String,
        state: String,
        unit: Option<String>,
    },
    Select {
        channel: String,
        reply: oneshot::Sender<Result<(), ConsoleError>>,
    },
    Interact,
    Close,
    Trend {
        channel: String,
        reply: oneshot::Sender<Result<Plot<TrendChart>, ConsoleError>>,
    },
}

struct FetchOutcome {
    generation: u64,
    result: anyhow::Result<HistoryBatch>,
}

/// Aborts the actor once the last service handle is gone
struct TaskGuard(JoinHandle<()>);

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

#[derive(Clone)]
pub struct ConsoleService {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Arc<ConsoleSnapshot>>,
    _task: Arc<TaskGuard>,
}

impl ConsoleService {
    /// Spawn the console actor. Timers stay disarmed until `start`.
    pub fn spawn(core: ConsoleCore, source: Arc<dyn HistorySource>, timing: ConsoleTiming) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        let (publisher, snapshots) = watch::channel(Arc::new(core.snapshot(Utc::now())));

        let actor = ConsoleActor {
            core,
            source,
            timing,
            commands: commands_rx,
            outcomes_tx,
            outcomes: outcomes_rx,
            ticker: None,
            refresher: None,
            publisher,
        };
        let handle = tokio::spawn(actor.run());

        Self {
            commands: commands_tx,
            snapshots,
            _task: Arc::new(TaskGuard(handle)),
        }
    }

    async fn send(&self, command: Command) -> Result<(), ConsoleError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ConsoleError::Stopped)
    }

    /// Arm the render and refresh timers. Idempotent.
    pub async fn start(&self) -> Result<(), ConsoleError> {
        self.send(Command::Start).await
    }

    /// Disarm the timers. In-flight fetches still land.
    pub async fn stop(&self) -> Result<(), ConsoleError> {
        self.send(Command::Stop).await
    }

    pub async fn update(
        &self,
        entity_id: impl Into<String>,
        state: impl Into<String>,
        unit: Option<String>,
    ) -> Result<(), ConsoleError> {
        self.send(Command::Update {
            entity_id: entity_id.into(),
            state: state.into(),
            unit,
        })
        .await
    }

    pub async fn select(&self, channel: impl Into<String>) -> Result<(), ConsoleError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Select {
            channel: channel.into(),
            reply,
        })
        .await?;
        response.await.map_err(|_| ConsoleError::Stopped)?
    }

    pub async fn interact(&self) -> Result<(), ConsoleError> {
        self.send(Command::Interact).await
    }

    pub async fn close(&self) -> Result<(), ConsoleError> {
        self.send(Command::Close).await
    }

    pub async fn trend(&self, channel: impl Into<String>) -> Result<Plot<TrendChart>, ConsoleError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Trend {
            channel: channel.into(),
            reply,
        })
        .await?;
        response.await.map_err(|_| ConsoleError::Stopped)?
    }

    /// Most recently published frame
    pub fn snapshot(&self) -> Arc<ConsoleSnapshot> {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<ConsoleSnapshot>> {
        self.snapshots.clone()
    }
}

struct ConsoleActor {
    core: ConsoleCore,
    source: Arc<dyn HistorySource>,
    timing: ConsoleTiming,
    commands: mpsc::Receiver<Command>,
    outcomes_tx: mpsc::UnboundedSender<FetchOutcome>,
    outcomes: mpsc::UnboundedReceiver<FetchOutcome>,
    ticker: Option<Interval>,
    refresher: Option<Interval>,
    publisher: watch::Sender<Arc<ConsoleSnapshot>>,
}

impl ConsoleActor {
    async fn run(mut self) {
        loop {
            let deadline = self.core.selection_deadline();

            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                Some(outcome) = self.outcomes.recv() => self.apply(outcome),
                _ = next_tick(&mut self.ticker) => self.publish(),
                _ = next_tick(&mut self.refresher) => self.refresh(),
                _ = sleep_until(deadline) => {
                    let channel = self.core.open_channel().map(str::to_string);
                    if self.core.expire(Utc::now()) {
                        tracing::info!(
                            "Trend view for {} closed after inactivity",
                            channel.unwrap_or_default()
                        );
                        self.publish();
                    }
                }
            }
        }

        tracing::debug!("Console actor exiting, all handles dropped");
    }

    fn handle(&mut self, command: Command) {
        let now = Utc::now();

        match command {
            Command::Start => {
                if self.ticker.is_some() {
                    tracing::debug!("Console already started");
                    return;
                }
                tracing::info!(
                    "Starting console (tick {:?}, refresh {:?})",
                    self.timing.tick,
                    self.timing.refresh
                );
                self.ticker = Some(interval(self.timing.tick));
                // The first refresh tick completes immediately, giving the startup fetch
                self.refresher = Some(interval(self.timing.refresh));
            }
            Command::Stop => {
                if self.ticker.take().is_some() {
                    tracing::info!("Stopping console");
                }
                self.refresher = None;
            }
            Command::Update {
                entity_id,
                state,
                unit,
            } => {
                self.core.update(&entity_id, &state, unit.as_deref(), now);
            }
            Command::Select { channel, reply } => {
                let result = self.core.select(&channel, now).map(|request| {
                    if let Some(request) = request {
                        self.dispatch(request);
                    }
                });
                if let Err(e) = &result {
                    tracing::debug!("Rejected selection of {}: {}", channel, e);
                }
                self.publish_at(now);
                let _ = reply.send(result);
            }
            Command::Interact => {
                if self.core.interact(now) {
                    self.publish_at(now);
                }
            }
            Command::Close => {
                if self.core.close() {
                    self.publish_at(now);
                }
            }
            Command::Trend { channel, reply } => {
                let _ = reply.send(self.core.trend(&channel, now));
            }
        }
    }

    fn refresh(&mut self) {
        match self.core.refresh_request(Utc::now()) {
            Some(request) => self.dispatch(request),
            None => tracing::debug!("No mapped history channels to refresh"),
        }
    }

    fn dispatch(&self, request: FetchRequest) {
        tracing::debug!(
            "Fetching history generation {} for {} entities",
            request.generation,
            request.entity_ids.len()
        );

        let source = self.source.clone();
        let outcomes = self.outcomes_tx.clone();
        tokio::spawn(async move {
            let result = source
                .fetch_history(&request.entity_ids, request.start, request.end)
                .await;
            let _ = outcomes.send(FetchOutcome {
                generation: request.generation,
                result,
            });
        });
    }

    fn apply(&mut self, outcome: FetchOutcome) {
        match outcome.result {
            Ok(batch) => {
                let replaced = self.core.apply_history(outcome.generation, batch);
                tracing::debug!(
                    "History generation {} replaced {} buffers",
                    outcome.generation,
                    replaced
                );
                self.publish();
            }
            Err(e) => {
                tracing::warn!(
                    "History fetch generation {} failed, keeping cached data: {:#}",
                    outcome.generation,
                    e
                );
            }
        }
    }

    fn publish(&self) {
        self.publish_at(Utc::now());
    }

    fn publish_at(&self, now: DateTime<Utc>) {
        self.publisher.send_replace(Arc::new(self.core.snapshot(now)));
    }
}

fn interval(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn sleep_until(deadline: Option<DateTime<Utc>>) {
    match deadline {
        Some(at) => tokio::time::sleep((at - Utc::now()).to_std().unwrap_or_default()).await,
        None => std::future::pending().await,
    }
}
