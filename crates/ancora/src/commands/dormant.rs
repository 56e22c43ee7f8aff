use ancora_core::ipc::ResponseStatus;

/// Toggles dormancy in the running daemon via IPC.
///
/// While dormant the keeper polls at the stretched interval
/// (`interval_ms * dormant_multiplier`); windows are still watched
/// and repositioned, just less often.
pub fn execute(enabled: bool) {
    if !ancora_windows::ipc::is_daemon_running() {
        eprintln!("Ancora is not running.");
        std::process::exit(1);
    }

    let command = ancora_core::Command::Dormant { enabled };

    match ancora_windows::ipc::send_command(&command) {
        Ok(response) => {
            if response.status == ResponseStatus::Ok {
                if let Some(msg) = response.message {
                    println!("{msg}");
                }
            } else {
                eprintln!(
                    "Error: {}",
                    response.message.unwrap_or("unknown error".into()),
                );
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Failed to send command: {e}");
            std::process::exit(1);
        }
    }
}
