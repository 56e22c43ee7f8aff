//! Daemon entry point and thread wiring.
//!
//! The main thread owns the [`Keeper`] and processes messages from
//! the IPC listener and the config watcher; everything that blocks
//! runs on its own thread and funnels into one channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

use ancora_core::ipc::{Command, Response};
use ancora_core::{EngineEvent, WindowResult, config, pid};

use crate::config_watcher::{self, ConfigReload};
use crate::ipc::PipeServer;
use crate::keeper::Keeper;

/// A message for the main daemon thread.
enum DaemonMsg {
    /// An IPC command, with a channel to send the response on.
    Command(Command, mpsc::Sender<Response>),
    /// A validated config-file reload.
    Reload(ConfigReload),
}

/// Runs the Ancora daemon. Blocks until a `Stop` command arrives.
pub fn run() -> WindowResult<()> {
    pid::write_pid_file()?;
    eprintln!("Ancora daemon started.");

    let result = daemon_loop();

    let _ = pid::remove_pid_file();
    result
}

/// The inner daemon loop, separated so PID-file cleanup always runs.
fn daemon_loop() -> WindowResult<()> {
    let cfg = config::load();
    ancora_core::log::init(&cfg.logging);

    let rules = Arc::new(Mutex::new(config::load_rules()));
    ancora_core::log_info!(
        "Daemon started (PID: {}), {} rules, poll every {} ms",
        std::process::id(),
        rules.lock().map(|r| r.len()).unwrap_or(0),
        cfg.poll.interval_ms
    );

    let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();
    let mut keeper = Keeper::new(cfg, rules.clone(), event_tx);
    keeper.start();

    // Engine events go to the log; `ancora debug watch` runs its own
    // engine instead of tapping this one.
    let event_thread = thread::spawn(move || {
        for event in event_rx {
            log_event(&event);
        }
    });

    let (tx, rx) = mpsc::channel::<DaemonMsg>();

    // IPC listener on its own thread.
    let ipc_tx = tx.clone();
    let ipc_thread = thread::spawn(move || ipc_loop(ipc_tx));

    // Config watcher plus a bridge into the unified channel.
    let watcher_stop = Arc::new(AtomicBool::new(false));
    let (reload_tx, reload_rx) = mpsc::channel::<ConfigReload>();
    let watcher_flag = watcher_stop.clone();
    let watcher_thread = thread::spawn(move || config_watcher::watch(reload_tx, watcher_flag));
    let reload_bridge_tx = tx.clone();
    let reload_bridge = thread::spawn(move || {
        for reload in reload_rx {
            if reload_bridge_tx.send(DaemonMsg::Reload(reload)).is_err() {
                break;
            }
        }
    });

    // Main processing loop — blocks until a message arrives.
    while let Ok(msg) = rx.recv() {
        match msg {
            DaemonMsg::Reload(ConfigReload::Config(new)) => {
                keeper.apply_config(new);
            }
            DaemonMsg::Reload(ConfigReload::Rules(new)) => {
                if let Ok(mut guard) = rules.lock() {
                    *guard = new;
                }
            }
            DaemonMsg::Command(command, reply_tx) => {
                let is_stop = matches!(command, Command::Stop);
                let _ = reply_tx.send(handle_command(&command, &keeper, &rules));
                if is_stop {
                    break;
                }
            }
        }
    }

    keeper.stop();
    watcher_stop.store(true, Ordering::Relaxed);
    drop(tx);
    drop(keeper); // closes the event channel
    let _ = event_thread.join();
    let _ = watcher_thread.join();
    let _ = reload_bridge.join();
    let _ = ipc_thread.join();

    Ok(())
}

fn handle_command(
    command: &Command,
    keeper: &Keeper,
    rules: &Arc<Mutex<Vec<ancora_core::Rule>>>,
) -> Response {
    match command {
        Command::Stop => Response::ok_with_message("Shutting down."),
        Command::Status => {
            let rule_count = rules.lock().map(|r| r.len()).unwrap_or(0);
            Response::ok_with_message(format!(
                "{} rules, {} windows tracked, dormant: {}",
                rule_count,
                keeper.tracked_count(),
                keeper.is_dormant()
            ))
        }
        Command::Dormant { enabled } => {
            keeper.set_dormant(*enabled);
            Response::ok_with_message(if *enabled {
                "Dormant cadence enabled."
            } else {
                "Dormant cadence disabled."
            })
        }
    }
}

/// Accepts IPC connections in a loop and forwards commands to the
/// main daemon thread. Runs on a dedicated thread; exits after
/// serving a `Stop`.
fn ipc_loop(tx: mpsc::Sender<DaemonMsg>) {
    loop {
        let server = match PipeServer::create() {
            Ok(s) => s,
            Err(e) => {
                ancora_core::log_error!("failed to create pipe: {e}");
                return;
            }
        };

        let served = server.serve_one(|command| {
            let (reply_tx, reply_rx) = mpsc::channel();
            if tx.send(DaemonMsg::Command(command.clone(), reply_tx)).is_err() {
                return Response::error("daemon is shutting down");
            }
            reply_rx
                .recv()
                .unwrap_or_else(|_| Response::error("daemon did not reply"))
        });

        match served {
            Ok(Command::Stop) => return,
            Ok(_) => {}
            Err(e) => {
                ancora_core::log_warn!("IPC connection failed: {e}");
            }
        }
    }
}

fn log_event(event: &EngineEvent) {
    match event {
        EngineEvent::Moved {
            handle,
            title,
            rect,
        } => {
            ancora_core::log_debug!(
                "moved 0x{handle:X} \"{title}\" to ({},{} {}x{})",
                rect.x,
                rect.y,
                rect.width,
                rect.height
            );
        }
        EngineEvent::Repositioned {
            handle,
            title,
            old,
            new,
            monitor,
        } => {
            ancora_core::log_info!(
                "repositioned 0x{handle:X} \"{title}\" ({},{}) -> ({},{}) onto monitor {monitor}",
                old.x,
                old.y,
                new.x,
                new.y
            );
        }
    }
}
