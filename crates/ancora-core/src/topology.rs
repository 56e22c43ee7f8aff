//! Monitor-topology resolution.
//!
//! Pure functions over an ordered slice of monitor rectangles, making
//! them easy to unit-test without any Win32 dependency. The ordinal
//! index into the slice is the canonical monitor identity that rules
//! refer to.

use crate::Rect;

/// Returns the rectangle of monitor `index`, or an empty rectangle
/// when the index is out of range.
pub fn rect_for_index(monitors: &[Rect], index: usize) -> Rect {
    monitors.get(index).copied().unwrap_or_default()
}

/// Resolves the monitor a window rectangle belongs to.
///
/// Three tiers, each only consulted when the previous one fails:
/// 1. the monitor containing the window's center point;
/// 2. the monitor with the largest overlap area against the window;
/// 3. the monitor whose center is nearest the window's center.
///
/// Returns `None` only for an empty monitor list.
pub fn index_for_rect(monitors: &[Rect], window: &Rect) -> Option<usize> {
    if monitors.is_empty() {
        return None;
    }

    let cx = window.center_x();
    let cy = window.center_y();
    if let Some(idx) = monitors.iter().position(|m| m.contains_point(cx, cy)) {
        return Some(idx);
    }

    let best_overlap = monitors
        .iter()
        .enumerate()
        .map(|(i, m)| (i, m.intersection_area(window)))
        .max_by_key(|&(_, area)| area)
        .filter(|&(_, area)| area > 0);
    if let Some((idx, _)) = best_overlap {
        return Some(idx);
    }

    monitors
        .iter()
        .enumerate()
        .min_by_key(|(_, m)| m.center_distance_sq(window))
        .map(|(idx, _)| idx)
}
