use std::os::windows::process::CommandExt;
use std::process::Command;

/// Windows process creation flags for launching a fully detached daemon.
///
/// `CREATE_NEW_PROCESS_GROUP` (0x200) — the daemon gets its own process
/// group, so Ctrl+C in the CLI terminal won't kill it.
///
/// `CREATE_NO_WINDOW` (0x08000000) — the daemon doesn't get a console
/// window. This also prevents inheriting the parent's console handles,
/// which avoids handle leaks that cause `cmd.output()` to hang in tests.
const DETACH_FLAGS: u32 = 0x08000000 | 0x00000200;

pub fn execute() {
    if ancora_windows::ipc::is_daemon_running() {
        println!("Ancora is already running.");
        return;
    }

    // Clean up stale PID file from a previous unclean shutdown
    if let Ok(Some(pid)) = ancora_core::pid::read_pid_file() {
        if ancora_windows::process::is_process_alive(pid) {
            println!("Ancora process exists (PID: {pid}) but is not responding.");
            return;
        }
        let _ = ancora_core::pid::remove_pid_file();
    }

    let exe = std::env::current_exe().expect("failed to get current executable path");

    // Re-run ourselves with the hidden `daemon` subcommand as a fully
    // detached background process. DETACH_FLAGS prevent handle
    // inheritance so the parent can exit without waiting for the child.
    let mut child = Command::new(exe)
        .arg("daemon")
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .creation_flags(DETACH_FLAGS)
        .spawn()
        .expect("failed to start daemon");

    let pid = child.id();

    // Acknowledge the child without blocking, then drop our handle so
    // the daemon outlives the CLI process.
    let _ = child.try_wait();

    println!("Ancora started (PID: {pid}).");
    println!("Config: ~/.config/ancora/");
    println!("Run 'ancora status' to check on the daemon.");
}
