use ancora_core::ipc::ResponseStatus;

pub fn execute() {
    if ancora_windows::ipc::is_daemon_running() {
        // Ask the daemon for details: rule count, tracked windows, dormancy.
        match ancora_windows::ipc::send_command(&ancora_core::Command::Status) {
            Ok(response) if response.status == ResponseStatus::Ok => {
                println!("Ancora is running.");
                if let Some(msg) = response.message {
                    println!("{msg}");
                }
            }
            Ok(_) | Err(_) => println!("Ancora is running (status query failed)."),
        }
        return;
    }

    // Pipe isn't responding — check if a stale PID file was left behind
    // by a daemon that was killed without a clean shutdown.
    if let Ok(Some(pid)) = ancora_core::pid::read_pid_file() {
        if ancora_windows::process::is_process_alive(pid) {
            println!("Ancora process exists (PID: {pid}) but is not responding.");
        } else {
            let _ = ancora_core::pid::remove_pid_file();
            println!("Ancora is not running (cleaned up stale PID file).");
        }
    } else {
        println!("Ancora is not running.");
    }
}
