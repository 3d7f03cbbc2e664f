//! Animation facility: runs a [`DotSchedule`] and feeds samples to a tick callback.
//!
//! Two drivers are provided:
//! - [`TokioAnimator`] spawns one timer task per dot on a tokio runtime.
//! - [`ManualAnimator`] is stepped by the host's own frame clock.
//!
//! Both hand back an [`AnimationHandle`]. Stopping a handle is synchronous:
//! every tick runs while holding the handle's gate, and `stop()` closes the
//! gate under the same lock, so no tick is delivered after `stop()` returns.

use crate::widgets::schedule::DotSchedule;
use anyhow::{Context, Result};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Callback receiving each sampled radius
pub type TickFn = Box<dyn FnMut(f32) + Send + 'static>;

/// Source of animation ticks for the widget
pub trait Animator: Send + Sync {
    /// Start running `schedule`, calling `on_tick` with every sample
    fn start(&self, schedule: DotSchedule, on_tick: TickFn) -> Result<AnimationHandle>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Liveness flag shared between a handle and its driver
#[derive(Clone)]
struct Gate(Arc<Mutex<bool>>);

impl Gate {
    fn open() -> Self {
        Self(Arc::new(Mutex::new(true)))
    }

    /// Run `on_tick` if still open. Returns false once closed.
    fn deliver(&self, value: f32, on_tick: &mut TickFn) -> bool {
        let alive = lock(&self.0);
        if *alive {
            on_tick(value);
        }
        *alive
    }

    fn close(&self) {
        *lock(&self.0) = false;
    }

    fn is_open(&self) -> bool {
        *lock(&self.0)
    }
}

/// Owned handle to one running animation. Stops on drop.
pub struct AnimationHandle {
    gate: Gate,
    task: Option<JoinHandle<()>>,
}

impl AnimationHandle {
    fn new(gate: Gate, task: Option<JoinHandle<()>>) -> Self {
        Self { gate, task }
    }

    /// Stop the animation. No tick is delivered after this returns.
    pub fn stop(&mut self) {
        self.gate.close();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.gate.is_open()
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for AnimationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationHandle")
            .field("running", &self.is_running())
            .finish()
    }
}

/// Background timers on a tokio runtime, one task per dot
pub struct TokioAnimator {
    runtime: Option<Handle>,
    frame_interval: Duration,
}

impl TokioAnimator {
    pub fn new(runtime: Handle, frame_interval: Duration) -> Self {
        Self {
            runtime: Some(runtime),
            frame_interval,
        }
    }

    /// Use whatever runtime is current when `start` is called
    pub fn current(frame_interval: Duration) -> Self {
        Self {
            runtime: None,
            frame_interval,
        }
    }

    fn runtime(&self) -> Result<Handle> {
        match self.runtime {
            Some(ref handle) => Ok(handle.clone()),
            None => Handle::try_current().context("No tokio runtime available for dot animation"),
        }
    }
}

impl Animator for TokioAnimator {
    fn start(&self, schedule: DotSchedule, mut on_tick: TickFn) -> Result<AnimationHandle> {
        let runtime = self.runtime()?;
        let gate = Gate::open();
        let task_gate = gate.clone();
        let frame_interval = self.frame_interval.max(Duration::from_millis(1));

        let task = runtime.spawn(async move {
            tokio::time::sleep(schedule.start_delay).await;
            let started = Instant::now();
            let mut ticker = tokio::time::interval(frame_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                let value = schedule.sample_running(started.elapsed());
                if !task_gate.deliver(value, &mut on_tick) {
                    break;
                }
            }
        });

        Ok(AnimationHandle::new(gate, Some(task)))
    }
}

struct ManualEntry {
    schedule: DotSchedule,
    started_at: Duration,
    on_tick: TickFn,
    gate: Gate,
}

#[derive(Default)]
struct ManualClock {
    now: Duration,
    entries: Vec<ManualEntry>,
}

/// Animation clock advanced explicitly by the host
///
/// `advance` calls tick callbacks while holding the clock's lock, so a tick
/// callback must not call back into this animator.
#[derive(Clone, Default)]
pub struct ManualAnimator {
    clock: Arc<Mutex<ManualClock>>,
}

impl ManualAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward and deliver one tick to every started animation
    pub fn advance(&self, by: Duration) {
        let mut clock = lock(&self.clock);
        clock.now += by;
        let now = clock.now;

        clock.entries.retain_mut(|entry| {
            let elapsed = now.saturating_sub(entry.started_at);
            match elapsed.checked_sub(entry.schedule.start_delay) {
                Some(running) => {
                    let value = entry.schedule.sample_running(running);
                    entry.gate.deliver(value, &mut entry.on_tick)
                }
                None => entry.gate.is_open(),
            }
        });
    }

    /// Time since this animator was created
    pub fn now(&self) -> Duration {
        lock(&self.clock).now
    }

    /// Number of animations that have not been stopped
    pub fn live_count(&self) -> usize {
        lock(&self.clock)
            .entries
            .iter()
            .filter(|entry| entry.gate.is_open())
            .count()
    }
}

impl Animator for ManualAnimator {
    fn start(&self, schedule: DotSchedule, on_tick: TickFn) -> Result<AnimationHandle> {
        let gate = Gate::open();
        let mut clock = lock(&self.clock);
        let started_at = clock.now;
        clock.entries.push(ManualEntry {
            schedule,
            started_at,
            on_tick,
            gate: gate.clone(),
        });
        Ok(AnimationHandle::new(gate, None))
    }
}
