//! The window-keeping engine.
//!
//! One background thread runs poll cycles: enumerate windows, match
//! them against the rules, and move strays back onto their assigned
//! monitor. The thread owns all per-cycle state; the rule list and
//! the tracked-window map are shared behind mutexes so the daemon's
//! IPC and config-watcher threads can reach them between cycles.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use ancora_core::config::Config;
use ancora_core::{EngineEvent, Rule, WindowTracker};

use crate::monitor::MonitorCache;

mod cycle;

#[cfg(test)]
mod tests;

/// The engine handle owned by the daemon.
///
/// Dropped or stopped, it tears the poll thread down deterministically;
/// an in-flight cycle is allowed to finish.
pub struct Keeper {
    rules: Arc<Mutex<Vec<Rule>>>,
    config: Arc<Mutex<Config>>,
    tracker: Arc<Mutex<WindowTracker>>,
    events: mpsc::Sender<EngineEvent>,
    dormant: Arc<AtomicBool>,
    stop_tx: Option<mpsc::Sender<()>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Keeper {
    /// Creates a stopped engine around a shared rule list.
    ///
    /// Engine events are delivered on `events`; the receiver decides
    /// what thread to handle them on.
    pub fn new(
        config: Config,
        rules: Arc<Mutex<Vec<Rule>>>,
        events: mpsc::Sender<EngineEvent>,
    ) -> Self {
        let capacity = config.poll.tracked_capacity;
        Self {
            rules,
            config: Arc::new(Mutex::new(config)),
            tracker: Arc::new(Mutex::new(WindowTracker::new(capacity))),
            events,
            dormant: Arc::new(AtomicBool::new(false)),
            stop_tx: None,
            thread: None,
        }
    }

    /// Starts the poll thread. A no-op when already running.
    pub fn start(&mut self) {
        if self.thread.is_some() {
            return;
        }

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let rules = self.rules.clone();
        let config = self.config.clone();
        let tracker = self.tracker.clone();
        let events = self.events.clone();
        let dormant = self.dormant.clone();

        let handle = thread::spawn(move || {
            let ttl = lock_config(&config, |c| c.placement.monitor_ttl_ms);
            let mut state = cycle::CycleState::new(MonitorCache::new(Duration::from_millis(ttl)));

            loop {
                let interval = {
                    let (base, multiplier) =
                        lock_config(&config, |c| (c.poll.interval_ms, c.poll.dormant_multiplier));
                    interval_for(base, multiplier, dormant.load(Ordering::Relaxed))
                };

                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    // Stop requested or the Keeper was dropped.
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }

                // One bad cycle must never kill the engine: catch the
                // panic, log it, and let the next tick fire.
                let result = catch_unwind(AssertUnwindSafe(|| {
                    state.run(&rules, &config, &tracker, &events);
                }));
                if let Err(payload) = result {
                    ancora_core::log_error!("poll cycle panicked: {}", panic_message(&payload));
                }
            }
        });

        self.stop_tx = Some(stop_tx);
        self.thread = Some(handle);
        ancora_core::log_info!("engine started");
    }

    /// Stops the poll thread and waits for the in-flight cycle to
    /// finish. A no-op when already stopped.
    pub fn stop(&mut self) {
        let Some(stop_tx) = self.stop_tx.take() else {
            return;
        };
        let _ = stop_tx.send(());
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
        ancora_core::log_info!("engine stopped");
    }

    /// Returns whether the poll thread is running.
    pub fn is_running(&self) -> bool {
        self.thread.is_some()
    }

    /// Switches the poll cadence between base and dormant intervals.
    /// Takes effect from the next tick.
    pub fn set_dormant(&self, enabled: bool) {
        self.dormant.store(enabled, Ordering::Relaxed);
        ancora_core::log_info!("dormant mode: {enabled}");
    }

    pub fn is_dormant(&self) -> bool {
        self.dormant.load(Ordering::Relaxed)
    }

    /// The shared rule list. Callers may add and remove rules at any
    /// time; the next cycle sees the change.
    pub fn rules(&self) -> Arc<Mutex<Vec<Rule>>> {
        self.rules.clone()
    }

    /// Number of windows currently tracked.
    pub fn tracked_count(&self) -> usize {
        self.tracker.lock().map(|t| t.len()).unwrap_or(0)
    }

    /// Applies a reloaded configuration.
    ///
    /// Intervals, margins, and the monitor-cache lifetime take effect
    /// from the next cycle. The tracker capacity is fixed at engine
    /// creation and keeps its startup value.
    pub fn apply_config(&self, mut new: Config) {
        new.validate();
        if let Ok(mut config) = self.config.lock() {
            new.poll.tracked_capacity = config.poll.tracked_capacity;
            *config = new;
        }
    }
}

impl Drop for Keeper {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Effective poll interval for the current dormancy state.
fn interval_for(base_ms: u64, dormant_multiplier: u32, dormant: bool) -> Duration {
    let ms = if dormant {
        base_ms * u64::from(dormant_multiplier)
    } else {
        base_ms
    };
    Duration::from_millis(ms)
}

/// Reads a value out of the shared config without holding the lock
/// across OS calls.
fn lock_config<T>(config: &Mutex<Config>, f: impl FnOnce(&Config) -> T) -> T {
    match config.lock() {
        Ok(guard) => f(&guard),
        Err(poisoned) => f(&poisoned.into_inner()),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
