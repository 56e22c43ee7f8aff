//! One poll cycle: enumerate, classify, track, place, reposition.

use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use ancora_core::config::Config;
use ancora_core::placement::Margins;
use ancora_core::rule::MatchBy;
use ancora_core::window::Window as WindowTrait;
use ancora_core::{EngineEvent, Point, Rect, Rule, WindowTracker, classify, placement};

use crate::drag;
use crate::enumerate;
use crate::monitor::MonitorCache;
use crate::process;
use crate::window::Window;

use super::lock_config;

/// How many times a failed move is retried before giving up on the
/// window for this cycle.
const MOVE_ATTEMPTS: u32 = 3;

/// How many times a failed enumeration is retried before the cycle
/// is abandoned.
const ENUM_ATTEMPTS: u32 = 3;

/// Base delay between retries; attempt `n` waits `n` times this.
const RETRY_DELAY: Duration = Duration::from_millis(40);

/// State owned by the poll thread across cycles.
pub(super) struct CycleState {
    monitors: MonitorCache,
    counter: u64,
}

impl CycleState {
    pub(super) fn new(monitors: MonitorCache) -> Self {
        Self {
            monitors,
            counter: 0,
        }
    }

    /// Runs one full cycle.
    ///
    /// Failures are isolated per window: a handle that dies mid-cycle
    /// or a move that keeps failing never aborts the rest of the pass.
    pub(super) fn run(
        &mut self,
        rules: &Mutex<Vec<Rule>>,
        config: &Mutex<Config>,
        tracker: &Mutex<WindowTracker>,
        events: &mpsc::Sender<EngineEvent>,
    ) {
        self.counter += 1;

        let (margins, ttl_ms, cleanup_every) = lock_config(config, |c| {
            (c.margins(), c.placement.monitor_ttl_ms, c.poll.cleanup_every)
        });
        self.monitors.set_ttl(Duration::from_millis(ttl_ms));

        let Some(windows) = with_retry(ENUM_ATTEMPTS, RETRY_DELAY, enumerate::enumerate_windows)
        else {
            ancora_core::log_warn!("window enumeration failed, skipping cycle");
            return;
        };

        // Snapshot the rules so no lock is held across OS calls.
        let rules: Vec<Rule> = match rules.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };

        let mut tracker = match tracker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        for win in &windows {
            self.observe_window(win, &rules, &margins, &mut tracker, events);
        }

        if self.counter % u64::from(cleanup_every.max(1)) == 0 {
            tracker.retain_alive(|handle| Window::from_raw(handle).is_alive());
            ancora_core::log_debug!("cleanup pass: {} windows tracked", tracker.len());
        }
    }

    /// Tracks one window's movement and repositions it if a rule says
    /// it belongs elsewhere.
    fn observe_window(
        &mut self,
        win: &Window,
        rules: &[Rule],
        margins: &Margins,
        tracker: &mut WindowTracker,
        events: &mpsc::Sender<EngineEvent>,
    ) {
        // Validate right before each use: enumeration ran a moment ago
        // and any of these windows may already be gone.
        if !win.is_alive() {
            return;
        }
        let Ok(title) = win.title() else { return };
        if title.trim().is_empty() {
            return;
        }
        let class = win.class().unwrap_or_default();
        if classify::is_system_window(&class, &title) {
            return;
        }
        let Ok(rect) = win.rect() else { return };
        let handle = win.raw();

        // Movement tracking fires for every window, matched or not.
        let previous = tracker.record(handle, rect, &title);
        let first_sighting = previous.is_none();
        if let Some(event) = movement_event(previous, rect, handle, &title) {
            let _ = events.send(event);
        }

        // Process names cost an OpenProcess; select_rule resolves the
        // name at most once and only when some rule actually needs it.
        let Some(rule) = select_rule(rules, handle, &title, || {
            process::process_name(win.hwnd()).unwrap_or_default()
        }) else {
            return;
        };
        let Some(target_idx) = rule.monitor else {
            return;
        };

        let target = self.monitors.rect_for_index(target_idx);
        if target.is_empty() {
            // Stale monitor ordinal after a topology change: the rule
            // is inert until the index means something again.
            return;
        }
        if placement::is_on_monitor(&rect, &target, margins.bounds) {
            return;
        }
        let all = self.monitors.monitors().to_vec();
        if placement::on_shared_edge(&rect, &target, &all, margins.adjacency) {
            return;
        }

        let dest = if first_sighting {
            placement::center_on(&rect, &target, margins.safety)
        } else {
            placement::preserve_offset(&rect, &all, &target, margins.safety)
        };
        if dest.position() == rect.position() {
            return;
        }

        ancora_core::log_debug!(
            "repositioning 0x{handle:X} \"{title}\" ({},{}) -> ({},{}) monitor {target_idx}",
            rect.x,
            rect.y,
            dest.x,
            dest.y
        );

        if reposition(win, dest.position()) {
            // Keep the record in sync so the forced move is not
            // reported as user movement next cycle.
            tracker.record(handle, dest, &title);
            let _ = events.send(EngineEvent::Repositioned {
                handle,
                title,
                old: rect.position(),
                new: dest.position(),
                monitor: target_idx,
            });
        }
    }
}

/// Decides whether an observed rect warrants a movement notification.
///
/// The first sighting only establishes the baseline; afterwards any
/// change against the recorded rect fires, rule match or not.
pub(super) fn movement_event(
    previous: Option<Rect>,
    rect: Rect,
    handle: usize,
    title: &str,
) -> Option<EngineEvent> {
    match previous {
        Some(prev) if prev != rect => Some(EngineEvent::Moved {
            handle,
            title: title.to_owned(),
            rect,
        }),
        _ => None,
    }
}

/// Runs `op` up to `attempts` times, sleeping `delay` between tries.
///
/// Transient OS-call failures resolve themselves within a tick or
/// two; anything still failing after the bound is given up on and the
/// caller decides what the cycle skips.
pub(super) fn with_retry<T, E: std::fmt::Display>(
    attempts: u32,
    delay: Duration,
    mut op: impl FnMut() -> Result<T, E>,
) -> Option<T> {
    for attempt in 1..=attempts {
        match op() {
            Ok(value) => return Some(value),
            Err(e) => {
                ancora_core::log_debug!("attempt {attempt}/{attempts} failed: {e}");
                if attempt < attempts {
                    thread::sleep(delay);
                }
            }
        }
    }
    None
}

/// Picks the rule governing a window, if any.
///
/// Handle-bound rules take precedence over pattern rules; within each
/// group the first match in list order wins. Inactive rules and rules
/// without a target monitor never participate.
pub(super) fn select_rule<'a>(
    rules: &'a [Rule],
    handle: usize,
    title: &str,
    mut process: impl FnMut() -> String,
) -> Option<&'a Rule> {
    let candidates = || {
        rules
            .iter()
            .filter(|r| r.active && r.monitor.is_some())
    };

    if let Some(rule) = candidates()
        .filter(|r| r.handle.is_some())
        .find(|r| r.matches(handle, title, ""))
    {
        return Some(rule);
    }

    let mut process_name: Option<String> = None;
    candidates().filter(|r| r.handle.is_none()).find(|r| {
        let name = if r.match_by == MatchBy::Process {
            process_name.get_or_insert_with(&mut process).as_str()
        } else {
            ""
        };
        r.matches(handle, title, name)
    })
}

/// Moves a window, interrupting an active drag and retrying with a
/// short increasing delay. Returns whether the move landed.
fn reposition(win: &Window, dest: Point) -> bool {
    let dragging = drag::interrupt_drag(win.hwnd());

    let mut moved = false;
    for attempt in 1..=MOVE_ATTEMPTS {
        if !win.is_alive() {
            break;
        }
        match win.set_position(dest.x, dest.y) {
            Ok(()) => {
                moved = true;
                break;
            }
            Err(e) => {
                ancora_core::log_debug!(
                    "move 0x{:X} attempt {attempt}/{MOVE_ATTEMPTS} failed: {e}",
                    win.raw()
                );
                if attempt < MOVE_ATTEMPTS {
                    thread::sleep(RETRY_DELAY * attempt);
                }
            }
        }
    }

    // The button-up goes out even when the move failed: the cancel
    // message already ended the modal loop, and we must not leave the
    // drag state machine holding a phantom button.
    if dragging {
        drag::synthesize_button_up();
    }

    if !moved {
        ancora_core::log_warn!("giving up on 0x{:X} after {MOVE_ATTEMPTS} attempts", win.raw());
    }
    moved
}
