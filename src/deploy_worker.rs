use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use hamster_core::InputEngine;
use hamster_session::{InputSession, SessionError};
use tracing::{debug, error, info};

// ---------------------------------------------------------------------------
// Work / Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeployKind {
    /// First deploy plus the configured schema.
    Start,
    Redeploy { full_check: bool },
}

impl DeployKind {
    /// Two queued requests collapse into one that does at least as much.
    fn merge(self, newer: DeployKind) -> DeployKind {
        match (self, newer) {
            (DeployKind::Start, _) | (_, DeployKind::Start) => DeployKind::Start,
            (
                DeployKind::Redeploy { full_check: a },
                DeployKind::Redeploy { full_check: b },
            ) => DeployKind::Redeploy {
                full_check: a || b,
            },
        }
    }

    fn failure(self) -> SessionError {
        SessionError::RedeployFailed {
            full_check: matches!(self, DeployKind::Redeploy { full_check: true }),
        }
    }
}

struct DeployWork {
    kind: DeployKind,
    generation: u64,
}

impl DeployWork {
    fn merge(self, newer: DeployWork) -> DeployWork {
        DeployWork {
            kind: self.kind.merge(newer.kind),
            generation: newer.generation,
        }
    }
}

#[derive(Debug)]
pub(crate) struct DeployOutcome {
    pub kind: DeployKind,
    pub result: Result<(), SessionError>,
}

struct WorkerResult {
    generation: u64,
    outcome: DeployOutcome,
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// DeployWorker
// ---------------------------------------------------------------------------

/// The request the host is waiting on.
struct Pending {
    kind: DeployKind,
    generation: u64,
}

/// Host-side view of the worker. `pending` and the result receiver change
/// together under one lock.
struct HostSide {
    result_rx: mpsc::Receiver<WorkerResult>,
    pending: Option<Pending>,
}

/// Runs engine deploys off the calling thread. The worker holds the session
/// lock while the engine reloads, so other session calls wait rather than
/// interleave.
pub(crate) struct DeployWorker {
    work_tx: mpsc::Sender<DeployWork>,
    host: Mutex<HostSide>,
    generation: Arc<AtomicU64>,
    /// Requests up to this generation were cancelled.
    cancelled: Arc<AtomicU64>,
}

impl DeployWorker {
    pub fn new<E>(session: Arc<Mutex<InputSession<E>>>) -> io::Result<Self>
    where
        E: InputEngine + Send + 'static,
    {
        let generation = Arc::new(AtomicU64::new(0));
        let cancelled = Arc::new(AtomicU64::new(0));
        let (work_tx, work_rx) = mpsc::channel::<DeployWork>();
        let (result_tx, result_rx) = mpsc::channel::<WorkerResult>();
        {
            let generation = Arc::clone(&generation);
            let cancelled = Arc::clone(&cancelled);
            thread::Builder::new()
                .name("hamster-deploy".into())
                .spawn(move || {
                    deploy_worker(work_rx, result_tx, generation, cancelled, session)
                })?;
        }
        Ok(Self {
            work_tx,
            host: Mutex::new(HostSide {
                result_rx,
                pending: None,
            }),
            generation,
            cancelled,
        })
    }

    pub fn submit(&self, kind: DeployKind) {
        let mut host = lock(&self.host);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        host.pending = Some(Pending { kind, generation });
        debug!(?kind, generation, "deploy submitted");
        if self.work_tx.send(DeployWork { kind, generation }).is_err() {
            // `try_recv` sees the disconnected result channel and reports it.
            error!(?kind, "deploy worker is gone");
        }
    }

    /// Drop the pending request. A deploy already running finishes, but its
    /// result is discarded. Returns whether a request was pending.
    pub fn cancel(&self) -> bool {
        let mut host = lock(&self.host);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.cancelled.store(generation, Ordering::SeqCst);
        let was = host.pending.take().is_some();
        if was {
            info!("deploy cancelled");
        }
        was
    }

    pub fn is_deploying(&self) -> bool {
        lock(&self.host).pending.is_some()
    }

    /// Result of the pending request, once. Stale results are dropped. A dead
    /// worker finishes the pending request as failed.
    pub fn try_recv(&self) -> Option<DeployOutcome> {
        let mut host = lock(&self.host);
        let generation = host.pending.as_ref()?.generation;
        loop {
            match host.result_rx.try_recv() {
                Ok(result) if result.generation == generation => {
                    host.pending = None;
                    return Some(result.outcome);
                }
                Ok(result) => {
                    debug!(generation = result.generation, "stale deploy result dropped");
                }
                Err(mpsc::TryRecvError::Empty) => return None,
                Err(mpsc::TryRecvError::Disconnected) => {
                    let pending = host.pending.take()?;
                    error!(kind = ?pending.kind, "deploy worker exited");
                    return Some(DeployOutcome {
                        kind: pending.kind,
                        result: Err(pending.kind.failure()),
                    });
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Worker thread
// ---------------------------------------------------------------------------

fn deploy_worker<E: InputEngine>(
    rx: mpsc::Receiver<DeployWork>,
    tx: mpsc::Sender<WorkerResult>,
    generation: Arc<AtomicU64>,
    cancelled: Arc<AtomicU64>,
    session: Arc<Mutex<InputSession<E>>>,
) {
    let mut carried: Option<DeployWork> = None;
    while let Ok(work) = rx.recv() {
        // Drain: queued requests collapse into one deploy
        let floor = cancelled.load(Ordering::SeqCst);
        let mut latest = carried.take().filter(|w| w.generation > floor);
        for work in std::iter::once(work).chain(rx.try_iter()) {
            if work.generation <= floor {
                continue;
            }
            latest = Some(match latest {
                Some(prev) => prev.merge(work),
                None => work,
            });
        }
        let Some(latest) = latest else {
            debug!("cancelled deploy skipped");
            continue;
        };

        if latest.generation <= cancelled.load(Ordering::SeqCst) {
            debug!(generation = latest.generation, "cancelled deploy skipped");
            continue;
        }
        if latest.generation != generation.load(Ordering::SeqCst) {
            // A newer request is still on its way; fold this one into it.
            carried = Some(latest);
            continue;
        }

        let result = run_deploy(&session, latest.kind);
        let _ = tx.send(WorkerResult {
            generation: latest.generation,
            outcome: DeployOutcome {
                kind: latest.kind,
                result,
            },
        });
    }
}

/// A panicking engine fails the deploy instead of killing the worker.
fn run_deploy<E: InputEngine>(
    session: &Mutex<InputSession<E>>,
    kind: DeployKind,
) -> Result<(), SessionError> {
    let run = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut session = lock(session);
        match kind {
            DeployKind::Start => session.start(),
            DeployKind::Redeploy { full_check } => session.redeploy(full_check),
        }
    }));
    run.unwrap_or_else(|_| {
        error!(?kind, "engine panicked during deploy");
        Err(kind.failure())
    })
}
