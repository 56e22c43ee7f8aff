use ancora_core::Window;
use ancora_core::topology;

/// One-shot dump of every visible top-level window: handle, class,
/// title, rect, and the monitor index each window resolves to.
pub fn execute() {
    let windows = ancora_windows::enumerate_windows().expect("failed to enumerate windows");
    let monitors = ancora_windows::monitor::enumerate_monitors().unwrap_or_default();

    println!(
        "{:<12} {:>3} {:<28} {}",
        "HWND", "MON", "CLASS", "TITLE"
    );

    let mut count = 0;
    for window in &windows {
        let title = window.title().unwrap_or_default();
        if title.is_empty() {
            continue;
        }

        let class = window.class().unwrap_or_default();
        let rect = window.rect().unwrap_or_default();
        let monitor = topology::index_for_rect(&monitors, &rect)
            .map(|i| i.to_string())
            .unwrap_or_else(|| "-".into());

        println!(
            "0x{:<10X} {:>3} {:<28} {}",
            window.raw(),
            monitor,
            truncate(&class, 28),
            title
        );
        count += 1;
    }

    println!("\n{count} windows on {} monitor(s)", monitors.len());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
