pub fn execute() {
    if let Err(e) = ancora_windows::daemon::run() {
        eprintln!("Daemon error: {e}");
        std::process::exit(1);
    }
}
