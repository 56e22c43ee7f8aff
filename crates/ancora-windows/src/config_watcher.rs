//! Watches the config directory and sends validated reloads.
//!
//! Uses `FindFirstChangeNotificationW` to monitor the config directory
//! for writes and renames. When a change is detected, mtimes identify
//! which file changed, and only configs that parse are sent on — a
//! half-saved `rules.toml` never wipes the live rule list.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::time::SystemTime;

use windows::Win32::Foundation::WAIT_OBJECT_0;
use windows::Win32::Storage::FileSystem::{
    FILE_NOTIFY_CHANGE_FILE_NAME, FILE_NOTIFY_CHANGE_LAST_WRITE, FindCloseChangeNotification,
    FindFirstChangeNotificationW, FindNextChangeNotification,
};
use windows::Win32::System::Threading::WaitForSingleObject;
use windows::core::HSTRING;

use ancora_core::config::{self, Config};
use ancora_core::rule::Rule;

/// Timeout between stop-flag checks when no changes occur (ms).
const WAIT_TIMEOUT_MS: u32 = 5000;

/// A validated config reload ready to be applied.
pub enum ConfigReload {
    /// Engine settings changed.
    Config(Config),
    /// The rule list changed.
    Rules(Vec<Rule>),
}

/// Runs the watcher loop. Blocks until the stop flag is set or the
/// sender is dropped.
pub fn watch(tx: Sender<ConfigReload>, stop: Arc<AtomicBool>) {
    let Some(dir) = config::config_dir() else {
        ancora_core::log_info!("config dir not found, watcher exiting");
        return;
    };

    let config_path = config::config_path();
    let rules_path = config::rules_path();

    let mut config_mtime = mtime(config_path.as_deref());
    let mut rules_mtime = mtime(rules_path.as_deref());

    let dir_str = HSTRING::from(dir.as_os_str());
    let flags = FILE_NOTIFY_CHANGE_LAST_WRITE | FILE_NOTIFY_CHANGE_FILE_NAME;

    let handle = unsafe { FindFirstChangeNotificationW(&dir_str, false, flags) };
    let Ok(handle) = handle else {
        ancora_core::log_info!("FindFirstChangeNotificationW failed, watcher exiting");
        return;
    };

    while !stop.load(Ordering::Relaxed) {
        let result = unsafe { WaitForSingleObject(handle, WAIT_TIMEOUT_MS) };
        if stop.load(Ordering::Relaxed) {
            break;
        }
        if result != WAIT_OBJECT_0 {
            continue; // timeout or error — loop back to check stop flag
        }

        if reload_changed(&config_path, &mut config_mtime, &rules_path, &mut rules_mtime, &tx) {
            break; // sender dropped
        }

        let _ = unsafe { FindNextChangeNotification(handle) };
    }

    let _ = unsafe { FindCloseChangeNotification(handle) };
}

/// Checks mtimes and sends reloads for changed files.
/// Returns `true` if the sender has been dropped (caller should exit).
fn reload_changed(
    config_path: &Option<PathBuf>,
    config_mtime: &mut Option<SystemTime>,
    rules_path: &Option<PathBuf>,
    rules_mtime: &mut Option<SystemTime>,
    tx: &Sender<ConfigReload>,
) -> bool {
    if let Some(path) = config_path {
        let new = mtime(Some(path.as_path()));
        if new != *config_mtime {
            *config_mtime = new;
            match config::try_load() {
                Ok(cfg) => {
                    ancora_core::log_info!("config.toml changed, reloading");
                    if tx.send(ConfigReload::Config(cfg)).is_err() {
                        return true;
                    }
                }
                Err(e) => {
                    ancora_core::log_info!("config.toml invalid, skipping: {e}");
                }
            }
        }
    }

    if let Some(path) = rules_path {
        let new = mtime(Some(path.as_path()));
        if new != *rules_mtime {
            *rules_mtime = new;
            match config::try_load_rules() {
                Ok(rules) => {
                    ancora_core::log_info!("rules.toml changed, {} rules loaded", rules.len());
                    if tx.send(ConfigReload::Rules(rules)).is_err() {
                        return true;
                    }
                }
                Err(e) => {
                    ancora_core::log_info!("rules.toml invalid, skipping: {e}");
                }
            }
        }
    }

    false
}

/// Returns the modification time for a path, or `None` if unavailable.
fn mtime(path: Option<&Path>) -> Option<SystemTime> {
    path.and_then(|p| p.metadata().ok())
        .and_then(|m| m.modified().ok())
}
