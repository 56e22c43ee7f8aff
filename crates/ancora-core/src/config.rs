//! Configuration types and loading.
//!
//! Two files under `~/.config/ancora/`: `config.toml` for engine
//! settings and `rules.toml` for the window rules. Missing files fall
//! back to defaults; invalid files warn and fall back too, so a typo
//! can never keep the daemon from starting.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::log::LogConfig;
use crate::placement;
use crate::rule::Rule;
use crate::tracker;

/// Top-level configuration for Ancora.
///
/// Loaded from `~/.config/ancora/config.toml`. Missing sections fall
/// back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Poll scheduler settings.
    pub poll: PollConfig,
    /// Placement margins and monitor-cache lifetime.
    pub placement: PlacementConfig,
    /// File logging settings.
    pub logging: LogConfig,
}

/// Poll scheduler settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Base poll interval in milliseconds.
    pub interval_ms: u64,
    /// Interval multiplier applied while the host is dormant.
    pub dormant_multiplier: u32,
    /// Dead-handle cleanup runs every this many cycles.
    pub cleanup_every: u32,
    /// Maximum number of tracked window records.
    pub tracked_capacity: usize,
}

/// Placement margins, in pixels, and the monitor cache lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Tolerance band within which a window still counts as on its monitor.
    pub bounds_margin: i32,
    /// Clearance kept between a repositioned window and monitor edges.
    pub safety_margin: i32,
    /// Distance from a shared seam within which repositioning is suppressed.
    pub adjacency_tolerance: i32,
    /// How long the cached monitor list stays valid, in milliseconds.
    pub monitor_ttl_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 500,
            dormant_multiplier: 3,
            cleanup_every: 10,
            tracked_capacity: tracker::DEFAULT_CAPACITY,
        }
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            bounds_margin: placement::BOUNDS_MARGIN,
            safety_margin: placement::SAFETY_MARGIN,
            adjacency_tolerance: placement::ADJACENCY_TOLERANCE,
            monitor_ttl_ms: 2000,
        }
    }
}

impl Config {
    /// Clamps all values to safe ranges.
    ///
    /// Prevents a zero poll interval (which would spin a core), a zero
    /// tracker capacity, and absurd margins.
    pub fn validate(&mut self) {
        self.poll.interval_ms = self.poll.interval_ms.clamp(50, 60_000);
        self.poll.dormant_multiplier = self.poll.dormant_multiplier.clamp(1, 10);
        self.poll.cleanup_every = self.poll.cleanup_every.clamp(1, 1000);
        self.poll.tracked_capacity = self.poll.tracked_capacity.clamp(16, 8192);
        self.placement.bounds_margin = self.placement.bounds_margin.clamp(0, 200);
        self.placement.safety_margin = self.placement.safety_margin.clamp(0, 200);
        self.placement.adjacency_tolerance = self.placement.adjacency_tolerance.clamp(0, 200);
        self.placement.monitor_ttl_ms = self.placement.monitor_ttl_ms.clamp(100, 60_000);
    }

    /// Margins in the form the placement functions take.
    pub fn margins(&self) -> placement::Margins {
        placement::Margins {
            bounds: self.placement.bounds_margin,
            safety: self.placement.safety_margin,
            adjacency: self.placement.adjacency_tolerance,
        }
    }
}

/// Wrapper for deserializing the rules file.
///
/// The file contains a top-level `[[rule]]` array of tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesFile {
    #[serde(default)]
    pub rule: Vec<Rule>,
}

/// Returns the config directory: `~/.config/ancora/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("ancora"))
}

/// Returns the config file path: `~/.config/ancora/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Returns the rules file path: `~/.config/ancora/rules.toml`.
pub fn rules_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("rules.toml"))
}

/// Tries to load and parse `config.toml`.
///
/// Returns the validated config, or an error string describing what
/// went wrong (IO error, parse error, etc.).
pub fn try_load() -> Result<Config, String> {
    let path = config_path().ok_or("could not determine config path")?;
    let content = std::fs::read_to_string(&path).map_err(|e| format!("{}: {e}", path.display()))?;
    let mut config: Config =
        toml::from_str(&content).map_err(|e| format!("{}: {e}", path.display()))?;
    config.validate();
    Ok(config)
}

/// Loads the configuration from disk, falling back to defaults.
pub fn load() -> Config {
    load_or_default(try_load, Config::default)
}

/// Tries to load and parse `rules.toml`.
pub fn try_load_rules() -> Result<Vec<Rule>, String> {
    let path = rules_path().ok_or("could not determine rules path")?;
    let content = std::fs::read_to_string(&path).map_err(|e| format!("{}: {e}", path.display()))?;
    let file: RulesFile = toml::from_str(&content).map_err(|e| format!("{}: {e}", path.display()))?;
    Ok(file.rule)
}

/// Loads window rules from `~/.config/ancora/rules.toml`.
///
/// Falls back to an empty rule list if the file is missing or invalid.
pub fn load_rules() -> Vec<Rule> {
    load_or_default(try_load_rules, Vec::new)
}

/// Loads a config value from disk, falling back to defaults.
///
/// Non-existent files silently return defaults; other errors warn first.
fn load_or_default<T>(try_load: impl FnOnce() -> Result<T, String>, default: impl Fn() -> T) -> T {
    match try_load() {
        Ok(val) => val,
        Err(e) if is_file_not_found(&e) => default(),
        Err(e) => {
            eprintln!("Warning: {e}");
            default()
        }
    }
}

/// Returns true if the error message indicates a missing file.
fn is_file_not_found(e: &str) -> bool {
    e.contains("cannot find the path")
        || e.contains("The system cannot find")
        || e.contains("No such file")
}

/// Default `config.toml` contents written by `ancora init`.
pub fn config_template() -> String {
    let defaults = Config::default();
    format!(
        r#"# Ancora engine configuration.

[poll]
# Base poll interval in milliseconds.
interval_ms = {interval}
# Interval multiplier while dormant (set via `Dormant` IPC command).
dormant_multiplier = {mult}
# Dead-handle cleanup runs every N cycles.
cleanup_every = {cleanup}
# Maximum number of tracked window records (LRU-evicted beyond this).
tracked_capacity = {capacity}

[placement]
# Pixel band around a monitor within which a window counts as on it.
bounds_margin = {bounds}
# Clearance kept between a repositioned window and the monitor edges.
safety_margin = {safety}
# Distance from a shared monitor seam within which windows are left alone.
adjacency_tolerance = {adjacency}
# Monitor list cache lifetime in milliseconds.
monitor_ttl_ms = {ttl}

[logging]
# Write a log file to ~/.config/ancora/logs/ancora.log
enabled = false
# Minimum level: "debug", "info", "warn", or "error".
level = "info"
# Rotate the log file when it exceeds this many megabytes.
max_file_mb = 10
"#,
        interval = defaults.poll.interval_ms,
        mult = defaults.poll.dormant_multiplier,
        cleanup = defaults.poll.cleanup_every,
        capacity = defaults.poll.tracked_capacity,
        bounds = defaults.placement.bounds_margin,
        safety = defaults.placement.safety_margin,
        adjacency = defaults.placement.adjacency_tolerance,
        ttl = defaults.placement.monitor_ttl_ms,
    )
}

/// Default `rules.toml` contents written by `ancora init`.
pub fn rules_template() -> &'static str {
    r#"# Ancora window rules.
#
# Each [[rule]] pins matching windows to one monitor. Patterns are
# case-insensitive wildcards matched against the full string:
#   *  any run of characters
#   ?  exactly one character
#
# match_by selects which pattern is used: "title" or "process".
# Monitor numbers are ordinals in OS enumeration order, starting at 0.

# [[rule]]
# name = "Browser on the big screen"
# title_pattern = "*chrome*"
# match_by = "title"
# active = true
# monitor = 1

# [[rule]]
# name = "Notepad stays on the laptop panel"
# process_pattern = "notepad"
# match_by = "process"
# active = true
# monitor = 0
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::MatchBy;

    #[test]
    fn defaults_survive_validation_unchanged() {
        let mut config = Config::default();
        let before = format!("{config:?}");
        config.validate();
        assert_eq!(before, format!("{config:?}"));
    }

    #[test]
    fn validation_clamps_degenerate_values() {
        let mut config = Config::default();
        config.poll.interval_ms = 0;
        config.poll.dormant_multiplier = 0;
        config.poll.tracked_capacity = 0;
        config.validate();
        assert_eq!(config.poll.interval_ms, 50);
        assert_eq!(config.poll.dormant_multiplier, 1);
        assert_eq!(config.poll.tracked_capacity, 16);
    }

    #[test]
    fn rules_file_parses_toml_tables() {
        let toml = r#"
            [[rule]]
            name = "browser"
            title_pattern = "*chrome*"
            monitor = 1

            [[rule]]
            name = "editor"
            process_pattern = "code.exe"
            match_by = "process"
            active = false
        "#;
        let file: RulesFile = toml::from_str(toml).unwrap();
        assert_eq!(file.rule.len(), 2);
        assert_eq!(file.rule[0].monitor, Some(1));
        assert!(file.rule[0].active); // default
        assert_eq!(file.rule[1].match_by, MatchBy::Process);
        assert!(!file.rule[1].active);
        assert_eq!(file.rule[1].monitor, None);
    }

    #[test]
    fn templates_round_trip_through_the_parser() {
        let config: Config = toml::from_str(&config_template()).unwrap();
        assert_eq!(config.poll.interval_ms, PollConfig::default().interval_ms);

        let rules: RulesFile = toml::from_str(rules_template()).unwrap();
        assert!(rules.rule.is_empty()); // all examples are commented out
    }

    #[test]
    fn empty_config_file_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.poll.interval_ms, 500);
        assert_eq!(config.placement.bounds_margin, 10);
    }
}
