//! Monitor enumeration and the topology cache.
//!
//! Enumerating displays is comparatively expensive, so the engine
//! goes through [`MonitorCache`], which refreshes the ordered monitor
//! list only when it is older than its time-to-live. The position of
//! a monitor in the enumeration order is the ordinal that rules refer
//! to.

use std::time::{Duration, Instant};

use ancora_core::{Rect, WindowResult, topology};

use windows::Win32::Foundation::{LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{EnumDisplayMonitors, HDC, HMONITOR};
use windows::core::BOOL;

/// Enumerates all monitors in OS order.
///
/// Returns the full monitor rectangles (not work areas): a window
/// dragged over the taskbar is still on that monitor.
pub fn enumerate_monitors() -> WindowResult<Vec<Rect>> {
    let mut monitors: Vec<Rect> = Vec::new();

    // SAFETY: EnumDisplayMonitors calls our callback for each display,
    // synchronously, with the Vec pointer passed through LPARAM.
    let ok = unsafe {
        EnumDisplayMonitors(
            None,
            None,
            Some(enum_monitor_callback),
            LPARAM(&mut monitors as *mut _ as isize),
        )
    };

    if !ok.as_bool() {
        return Err("EnumDisplayMonitors failed".into());
    }
    if monitors.is_empty() {
        return Err("no monitors found".into());
    }
    Ok(monitors)
}

/// Callback invoked by `EnumDisplayMonitors` for each display.
unsafe extern "system" fn enum_monitor_callback(
    _hmonitor: HMONITOR,
    _hdc: HDC,
    rect: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    // SAFETY: lparam is the Vec<Rect> pointer from enumerate_monitors;
    // rect points at the monitor's bounding rectangle for this call.
    let monitors = unsafe { &mut *(lparam.0 as *mut Vec<Rect>) };
    let rc = unsafe { *rect };
    monitors.push(Rect::new(
        rc.left,
        rc.top,
        rc.right - rc.left,
        rc.bottom - rc.top,
    ));
    BOOL(1) // continue enumerating
}

/// Caches the monitor list for a short time-to-live.
#[derive(Debug)]
pub struct MonitorCache {
    monitors: Vec<Rect>,
    fetched: Option<Instant>,
    ttl: Duration,
}

impl MonitorCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            monitors: Vec::new(),
            fetched: None,
            ttl,
        }
    }

    /// Changes the cache lifetime (applied from config reloads).
    pub fn set_ttl(&mut self, ttl: Duration) {
        self.ttl = ttl;
    }

    /// Returns the ordered monitor rectangles, re-enumerating only
    /// when the cached list has expired.
    ///
    /// A failed refresh keeps the stale list: monitors rarely vanish,
    /// and a stale rectangle beats an empty topology for one cycle.
    pub fn monitors(&mut self) -> &[Rect] {
        let expired = match self.fetched {
            Some(at) => at.elapsed() >= self.ttl,
            None => true,
        };
        if expired {
            match enumerate_monitors() {
                Ok(list) => {
                    self.monitors = list;
                    self.fetched = Some(Instant::now());
                }
                Err(e) => {
                    ancora_core::log_warn!("monitor enumeration failed: {e}");
                    self.fetched = Some(Instant::now());
                }
            }
        }
        &self.monitors
    }

    /// Returns monitor `index`'s rectangle, or an empty rectangle when
    /// the index is out of range.
    pub fn rect_for_index(&mut self, index: usize) -> Rect {
        let monitors = self.monitors();
        topology::rect_for_index(monitors, index)
    }
}
