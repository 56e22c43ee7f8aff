//! The placement decision algorithm.
//!
//! Pure geometry over `Rect`s: deciding whether a window counts as
//! "on" its target monitor, whether it is sitting on a seam shared
//! with a neighboring monitor, and where it should land when it has
//! to be brought back.

use crate::{Rect, topology};

/// Tolerance band around a monitor within which a window still counts
/// as on it. Absorbs snap and rounding noise so the engine does not
/// thrash a window that is one pixel over the edge.
pub const BOUNDS_MARGIN: i32 = 10;

/// Gap kept between a repositioned window and the monitor edges.
pub const SAFETY_MARGIN: i32 = 8;

/// How close to a shared monitor boundary a window may sit before the
/// engine stops touching it, so manual cross-seam drags are not fought.
pub const ADJACENCY_TOLERANCE: i32 = 10;

/// Tunable margins, loaded from config with the constants above as
/// defaults.
#[derive(Debug, Clone, Copy)]
pub struct Margins {
    pub bounds: i32,
    pub safety: i32,
    pub adjacency: i32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            bounds: BOUNDS_MARGIN,
            safety: SAFETY_MARGIN,
            adjacency: ADJACENCY_TOLERANCE,
        }
    }
}

/// Bounds test: is `window` on `monitor`, give or take `margin` pixels
/// on every side?
pub fn is_on_monitor(window: &Rect, monitor: &Rect, margin: i32) -> bool {
    monitor.expanded(margin).contains_rect(window)
}

/// Edge-adjacency guard.
///
/// Returns `true` when `window` straddles (or sits within `tolerance`
/// of) a boundary that `target` shares with another monitor. While
/// that holds, repositioning is suppressed: the user may be dragging
/// the window across a connected seam and the engine must not yank it
/// back mid-motion.
pub fn on_shared_edge(window: &Rect, target: &Rect, monitors: &[Rect], tolerance: i32) -> bool {
    for other in monitors {
        if other == target {
            continue;
        }

        // Vertical seams: target's left or right edge flush against `other`.
        if target.vertical_overlap(other) > 0 {
            if other.right() == target.x && straddles_vertical(window, target.x, tolerance) {
                return true;
            }
            if target.right() == other.x && straddles_vertical(window, target.right(), tolerance) {
                return true;
            }
        }

        // Horizontal seams: target's top or bottom edge flush against `other`.
        if target.horizontal_overlap(other) > 0 {
            if other.bottom() == target.y && straddles_horizontal(window, target.y, tolerance) {
                return true;
            }
            if target.bottom() == other.y && straddles_horizontal(window, target.bottom(), tolerance)
            {
                return true;
            }
        }
    }
    false
}

fn straddles_vertical(window: &Rect, seam_x: i32, tolerance: i32) -> bool {
    window.x < seam_x + tolerance && window.right() > seam_x - tolerance
}

fn straddles_horizontal(window: &Rect, seam_y: i32, tolerance: i32) -> bool {
    window.y < seam_y + tolerance && window.bottom() > seam_y - tolerance
}

/// Returns the rect that centers `window` on `monitor`, clamped so it
/// stays inside.
pub fn center_on(window: &Rect, monitor: &Rect, safety: i32) -> Rect {
    let centered = Rect::new(
        monitor.x + (monitor.width - window.width) / 2,
        monitor.y + (monitor.height - window.height) / 2,
        window.width,
        window.height,
    );
    clamp_into(&centered, monitor, safety)
}

/// Maps `window` onto `target` preserving its relative offset within
/// whatever monitor it is currently nearest to.
///
/// The offset of the top-left corner within the current monitor
/// (0.0–1.0 per axis) is applied to the target's dimensions, so a
/// window a quarter of the way across monitor A lands a quarter of
/// the way across monitor B, whatever their sizes. The result is
/// clamped fully inside the target with `safety` pixels to spare.
pub fn preserve_offset(window: &Rect, monitors: &[Rect], target: &Rect, safety: i32) -> Rect {
    let current = topology::index_for_rect(monitors, window)
        .map(|i| monitors[i])
        .unwrap_or(*target);

    let rel_x = relative(window.x, current.x, current.width);
    let rel_y = relative(window.y, current.y, current.height);

    let mapped = Rect::new(
        target.x + (rel_x * f64::from(target.width)).round() as i32,
        target.y + (rel_y * f64::from(target.height)).round() as i32,
        window.width,
        window.height,
    );
    clamp_into(&mapped, target, safety)
}

fn relative(pos: i32, origin: i32, extent: i32) -> f64 {
    if extent <= 0 {
        return 0.0;
    }
    (f64::from(pos - origin) / f64::from(extent)).clamp(0.0, 1.0)
}

/// Clamps `window` to lie inside `monitor` with `safety` pixels of
/// clearance on every side.
///
/// Degenerate case: a window larger than the monitor on an axis is
/// pinned to the monitor origin on that axis — it keeps its size and
/// overflows the far edge, which beats resizing it.
pub fn clamp_into(window: &Rect, monitor: &Rect, safety: i32) -> Rect {
    let x = clamp_axis(window.x, window.width, monitor.x, monitor.width, safety);
    let y = clamp_axis(window.y, window.height, monitor.y, monitor.height, safety);
    Rect::new(x, y, window.width, window.height)
}

fn clamp_axis(pos: i32, size: i32, mon_pos: i32, mon_size: i32, safety: i32) -> i32 {
    let min = mon_pos + safety;
    let max = mon_pos + mon_size - safety - size;
    if max < min {
        // Window wider/taller than the monitor: align to the origin edge.
        mon_pos
    } else {
        pos.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor() -> Rect {
        Rect::new(0, 0, 1920, 1080)
    }

    /// Two 1920x1080 monitors side by side.
    fn dual() -> Vec<Rect> {
        vec![
            Rect::new(0, 0, 1920, 1080),
            Rect::new(1920, 0, 1920, 1080),
        ]
    }

    // -- bounds test --

    #[test]
    fn window_inside_tolerance_band_is_on_monitor() {
        let m = monitor();
        assert!(is_on_monitor(&Rect::new(100, 100, 600, 400), &m, 10));
        // Flush against the expanded band on every side.
        assert!(is_on_monitor(&Rect::new(-10, -10, 1940, 1100), &m, 10));
    }

    #[test]
    fn window_just_outside_band_is_off_monitor() {
        let m = monitor();
        assert!(!is_on_monitor(&Rect::new(-11, 100, 600, 400), &m, 10));
        assert!(!is_on_monitor(&Rect::new(100, 100, 1831, 400), &m, 10));
        assert!(!is_on_monitor(&Rect::new(100, 991, 600, 100), &m, 10));
    }

    #[test]
    fn window_on_other_monitor_is_off_monitor() {
        let monitors = dual();
        let win = Rect::new(100, 100, 600, 400);
        assert!(!is_on_monitor(&win, &monitors[1], 10));
    }

    // -- edge adjacency --

    #[test]
    fn window_straddling_shared_seam_is_guarded() {
        let monitors = dual();
        // Halfway across the seam at x = 1920; target is either side.
        let win = Rect::new(1700, 200, 500, 400);
        assert!(on_shared_edge(&win, &monitors[0], &monitors, 10));
        assert!(on_shared_edge(&win, &monitors[1], &monitors, 10));
    }

    #[test]
    fn window_touching_seam_within_tolerance_is_guarded() {
        let monitors = dual();
        // Right edge five pixels short of the seam.
        let win = Rect::new(1315, 200, 600, 400);
        assert!(on_shared_edge(&win, &monitors[0], &monitors, 10));
    }

    #[test]
    fn window_clear_of_seam_is_not_guarded() {
        let monitors = dual();
        let win = Rect::new(100, 100, 600, 400);
        assert!(!on_shared_edge(&win, &monitors[0], &monitors, 10));
        let win = Rect::new(2200, 100, 600, 400);
        assert!(!on_shared_edge(&win, &monitors[1], &monitors, 10));
    }

    #[test]
    fn unconnected_edges_are_not_guarded() {
        // Two monitors with a gap between them: no shared seam.
        let monitors = vec![
            Rect::new(0, 0, 1920, 1080),
            Rect::new(2000, 0, 1920, 1080),
        ];
        let win = Rect::new(1700, 200, 500, 400);
        assert!(!on_shared_edge(&win, &monitors[0], &monitors, 10));
    }

    #[test]
    fn stacked_monitors_guard_the_horizontal_seam() {
        let monitors = vec![
            Rect::new(0, 0, 1920, 1080),
            Rect::new(0, 1080, 1920, 1080),
        ];
        let win = Rect::new(300, 900, 600, 400); // crosses y = 1080
        assert!(on_shared_edge(&win, &monitors[0], &monitors, 10));
        assert!(on_shared_edge(&win, &monitors[1], &monitors, 10));
    }

    // -- target position --

    #[test]
    fn centering_puts_window_center_on_monitor_center() {
        let m = Rect::new(1920, 0, 1920, 1080);
        let centered = center_on(&Rect::new(100, 100, 600, 400), &m, 8);
        assert_eq!(centered.center_x(), m.center_x());
        assert_eq!(centered.center_y(), m.center_y());
        assert_eq!(centered.width, 600);
        assert_eq!(centered.height, 400);
    }

    #[test]
    fn relative_offset_is_preserved_across_sizes() {
        let monitors = vec![
            Rect::new(0, 0, 2000, 1000),
            Rect::new(2000, 0, 1000, 800),
        ];
        // Offset (0.25, 0.5) within monitor 0.
        let win = Rect::new(500, 500, 200, 150);
        let moved = preserve_offset(&win, &monitors, &monitors[1], 8);
        assert_eq!(moved.x, 2000 + 250);
        assert_eq!(moved.y, 400);
        // Fully inside the target.
        assert!(monitors[1].contains_rect(&moved));
    }

    #[test]
    fn stray_on_wrong_monitor_lands_fully_on_target() {
        let monitors = dual();
        let target = monitors[1];
        let win = Rect::new(100, 100, 600, 400); // on monitor 0

        assert!(!is_on_monitor(&win, &target, 10));
        assert!(!on_shared_edge(&win, &target, &monitors, 10));

        let moved = preserve_offset(&win, &monitors, &target, 8);
        assert!(target.contains_rect(&moved));
        assert!(moved.x >= 1920 && moved.right() <= 3840);
    }

    #[test]
    fn preserved_offset_is_clamped_inside_target() {
        let monitors = vec![
            Rect::new(0, 0, 2000, 1000),
            Rect::new(2000, 0, 1000, 800),
        ];
        // Bottom-right corner of monitor 0: the mapped position would
        // hang off the smaller target without clamping.
        let win = Rect::new(1600, 700, 400, 300);
        let moved = preserve_offset(&win, &monitors, &monitors[1], 8);
        assert!(monitors[1].contains_rect(&moved));
        assert_eq!(moved.right(), monitors[1].right() - 8);
        assert_eq!(moved.bottom(), monitors[1].bottom() - 8);
    }

    #[test]
    fn oversized_window_is_pinned_to_origin() {
        let m = Rect::new(1920, 0, 1280, 720);
        let win = Rect::new(0, 0, 1600, 900);
        let clamped = clamp_into(&win, &m, 8);
        assert_eq!(clamped.x, m.x);
        assert_eq!(clamped.y, m.y);
        assert_eq!(clamped.width, 1600); // never resized
        assert_eq!(clamped.height, 900);
    }

    #[test]
    fn oversized_on_one_axis_still_clamps_the_other() {
        let m = Rect::new(0, 0, 1280, 720);
        let win = Rect::new(2000, 100, 1600, 300);
        let clamped = clamp_into(&win, &m, 8);
        assert_eq!(clamped.x, 0); // oversized axis pinned
        assert_eq!(clamped.y, 100); // already inside
    }
}
