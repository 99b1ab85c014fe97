//! Tick scheduling.
//!
//! The session never owns a timing loop; it hands a tick callback to a
//! `Scheduler` and asks for a period. The production `ThreadScheduler` runs
//! the callback on a dedicated thread, and `ManualScheduler` lets tests fire
//! ticks one at a time with no real time involved.
//!
//! Cancellation joins the worker, so once `cancel` returns no further tick
//! can run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::warn;

use crate::error::Result;

/// Callback invoked once per tick
pub type TickFn = Box<dyn FnMut() + Send + 'static>;

/// Drives a periodic callback
pub trait Scheduler: Send + Sync {
    /// Begin firing `tick` every `period`; no-op while already active
    fn start(&self, period: Duration, tick: TickFn) -> Result<()>;

    /// Stop firing; once this returns no further tick runs
    fn cancel(&self);

    /// True while ticks are being delivered
    fn is_active(&self) -> bool;
}

struct Worker {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Production scheduler backed by a dedicated thread
///
/// The worker sleeps to the next deadline, fires, and advances the deadline
/// by one period. After a stall it realigns to the present instead of firing
/// a burst of catch-up ticks.
#[derive(Default)]
pub struct ThreadScheduler {
    worker: Mutex<Option<Worker>>,
}

impl ThreadScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for ThreadScheduler {
    fn start(&self, period: Duration, mut tick: TickFn) -> Result<()> {
        let Ok(mut worker) = self.worker.lock() else {
            return Ok(());
        };
        if worker.is_some() {
            return Ok(());
        }

        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();
        let handle = thread::Builder::new()
            .name("glasscut-tick".to_string())
            .spawn(move || {
                let mut next_tick = Instant::now() + period;
                while !thread_stop.load(Ordering::Relaxed) {
                    let now = Instant::now();
                    if now < next_tick {
                        thread::sleep(next_tick - now);
                    }
                    if thread_stop.load(Ordering::Relaxed) {
                        break;
                    }
                    tick();
                    next_tick += period;
                    let now = Instant::now();
                    if next_tick < now {
                        next_tick = now + period;
                    }
                }
            })?;

        *worker = Some(Worker { stop, handle });
        Ok(())
    }

    fn cancel(&self) {
        let Ok(mut slot) = self.worker.lock() else {
            return;
        };
        if let Some(worker) = slot.take() {
            worker.stop.store(true, Ordering::Relaxed);
            if worker.handle.join().is_err() {
                warn!("Tick thread panicked before shutdown");
            }
        }
    }

    fn is_active(&self) -> bool {
        self.worker
            .lock()
            .map(|worker| worker.is_some())
            .unwrap_or(false)
    }
}

impl Drop for ThreadScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Test scheduler fired by hand
///
/// `start` installs the callback and `fire` runs it a given number of times,
/// so tick-count properties can be checked without sleeping.
#[derive(Default)]
pub struct ManualScheduler {
    tick: Mutex<Option<TickFn>>,
    period: Mutex<Option<Duration>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the installed callback `count` times; no-op when inactive
    pub fn fire(&self, count: u32) {
        let Ok(mut slot) = self.tick.lock() else {
            return;
        };
        if let Some(tick) = slot.as_mut() {
            for _ in 0..count {
                tick();
            }
        }
    }

    /// Period requested by the last `start`, if any
    pub fn period(&self) -> Option<Duration> {
        self.period.lock().ok().and_then(|p| *p)
    }
}

impl Scheduler for ManualScheduler {
    fn start(&self, period: Duration, tick: TickFn) -> Result<()> {
        let Ok(mut slot) = self.tick.lock() else {
            return Ok(());
        };
        if slot.is_some() {
            return Ok(());
        }
        *slot = Some(tick);
        if let Ok(mut p) = self.period.lock() {
            *p = Some(period);
        }
        Ok(())
    }

    fn cancel(&self) {
        if let Ok(mut slot) = self.tick.lock() {
            *slot = None;
        }
        if let Ok(mut p) = self.period.lock() {
            *p = None;
        }
    }

    fn is_active(&self) -> bool {
        self.tick
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }
}
