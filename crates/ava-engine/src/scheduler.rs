//! Delayed reply delivery.
//!
//! A session never sleeps on its own. When a reply is ready it asks a
//! [`Scheduler`] to hand back a [`Delivery`] after some delay, and keeps the
//! returned [`TaskHandle`] so the pending task can be aborted.
//!
//! - [`TokioScheduler`] sleeps on the Tokio timer and sends deliveries over a channel.
//! - [`ManualScheduler`] only records deliveries; callers fire them explicitly.

use std::sync::Mutex;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::panel::PanelId;

/// Default base delay before Ava replies.
pub const DEFAULT_BASE_MS: u64 = 1200;

/// Default upper bound of the random jitter added to the base delay.
pub const DEFAULT_JITTER_MS: u64 = 800;

/// A reply that is due for a specific panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Delivery {
    /// Panel whose session owns the pending reply.
    pub panel: PanelId,
    /// Ticket issued by the session when the reply was scheduled.
    pub ticket: u64,
}

/// Handle to a scheduled delivery.
#[derive(Debug, Default)]
pub struct TaskHandle {
    abort: Option<AbortHandle>,
}

impl TaskHandle {
    /// A handle with nothing to abort.
    pub fn detached() -> Self {
        Self { abort: None }
    }

    /// Wrap a Tokio task's abort handle.
    pub fn from_abort(abort: AbortHandle) -> Self {
        Self { abort: Some(abort) }
    }

    /// Abort the scheduled task, if it is still running.
    pub fn cancel(&self) {
        if let Some(abort) = &self.abort {
            abort.abort();
        }
    }

    /// Whether the underlying task has completed or been aborted.
    ///
    /// Detached handles always report finished.
    pub fn is_finished(&self) -> bool {
        self.abort.as_ref().map_or(true, AbortHandle::is_finished)
    }
}

/// Something that can deliver a reply later.
pub trait Scheduler {
    /// Arrange for `delivery` to be handed back after `delay`.
    fn schedule(&self, delivery: Delivery, delay: Duration) -> TaskHandle;
}

/// Scheduler backed by the Tokio timer.
///
/// Due deliveries are sent on the channel returned by [`TokioScheduler::new`].
/// Must be used from within a Tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<Delivery>,
}

impl TokioScheduler {
    /// Create a scheduler and the receiver for its due deliveries.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Delivery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delivery: Delivery, delay: Duration) -> TaskHandle {
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the UI shut down; nothing left to notify.
            let _ = tx.send(delivery);
        });
        TaskHandle::from_abort(task.abort_handle())
    }
}

/// Scheduler that records deliveries instead of timing them.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    scheduled: Mutex<Vec<(Delivery, Duration)>>,
}

impl ManualScheduler {
    /// Create an empty manual scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliveries scheduled so far and not yet taken, with their delays.
    pub fn pending(&self) -> Vec<(Delivery, Duration)> {
        self.lock().clone()
    }

    /// Take every recorded delivery, oldest first.
    pub fn drain(&self) -> Vec<Delivery> {
        self.lock().drain(..).map(|(delivery, _)| delivery).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Delivery, Duration)>> {
        // A poisoned list is still a valid list.
        self.scheduled
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delivery: Delivery, delay: Duration) -> TaskHandle {
        self.lock().push((delivery, delay));
        TaskHandle::detached()
    }
}

/// Randomized delay before a reply is delivered: `base + uniform(0..=jitter)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyDelay {
    /// Fixed part of the delay, in milliseconds.
    #[serde(default = "default_base_ms")]
    pub base_ms: u64,
    /// Upper bound of the random part, in milliseconds.
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
}

fn default_base_ms() -> u64 {
    DEFAULT_BASE_MS
}

fn default_jitter_ms() -> u64 {
    DEFAULT_JITTER_MS
}

impl Default for ReplyDelay {
    fn default() -> Self {
        Self {
            base_ms: DEFAULT_BASE_MS,
            jitter_ms: DEFAULT_JITTER_MS,
        }
    }
}

impl ReplyDelay {
    /// A delay with no jitter.
    pub fn fixed(ms: u64) -> Self {
        Self {
            base_ms: ms,
            jitter_ms: 0,
        }
    }

    /// Sample a delay using the thread-local RNG.
    pub fn sample(&self) -> Duration {
        self.sample_with(&mut rand::thread_rng())
    }

    /// Sample a delay using the given RNG.
    pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let jitter = if self.jitter_ms == 0 {
            0
        } else {
            rng.gen_range(0..=self.jitter_ms)
        };
        Duration::from_millis(self.base_ms.saturating_add(jitter))
    }

    /// Longest delay this policy can produce.
    pub fn max(&self) -> Duration {
        Duration::from_millis(self.base_ms.saturating_add(self.jitter_ms))
    }
}
