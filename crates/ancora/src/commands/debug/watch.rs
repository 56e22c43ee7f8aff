use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use ancora_core::config;
use ancora_windows::Keeper;

/// Runs the keeper in the foreground, printing engine events as they
/// fire. Press Ctrl+C to stop.
pub fn execute() {
    let cfg = config::load();
    let rules = config::load_rules();

    println!(
        "Watching with {} rule(s), polling every {}ms (press Ctrl+C to stop)...\n",
        rules.len(),
        cfg.poll.interval_ms
    );

    let (event_tx, event_rx) = mpsc::channel();
    let mut keeper = Keeper::new(cfg, Arc::new(Mutex::new(rules)), event_tx);
    keeper.start();

    // Set up Ctrl+C handler to stop the keeper cleanly.
    let (stop_tx, stop_rx) = mpsc::channel();
    ancora_windows::ctrl_c::set_handler(stop_tx);

    loop {
        if stop_rx.try_recv().is_ok() {
            break;
        }

        match event_rx.recv_timeout(std::time::Duration::from_millis(100)) {
            Ok(event) => println!("{event} \"{}\"", event.title()),
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    keeper.stop();
}
