/// Window-anchoring rules and the wildcard matcher behind them.
///
/// A rule associates a window, identified by a title/process pattern or a
/// captured handle, with the monitor it should stay on. Rules are evaluated
/// in order and the first match wins.
use serde::{Deserialize, Serialize};

/// Which pattern a rule compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchBy {
    /// Match the window title against `title_pattern`.
    #[default]
    Title,
    /// Match the process name against `process_pattern`.
    Process,
}

/// A rule assigning matching windows to a target monitor.
///
/// When `handle` is set the rule is bound to one specific window and the
/// patterns are ignored entirely. Captured handles are session-scoped and
/// never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Rule {
    /// Display name, purely informational.
    pub name: String,
    /// Wildcard pattern matched against the window title.
    pub title_pattern: String,
    /// Wildcard pattern matched against the process name (without `.exe`).
    pub process_pattern: String,
    /// Selects which of the two patterns is used.
    pub match_by: MatchBy,
    /// Inactive rules are kept in the list but never match.
    pub active: bool,
    /// Ordinal of the monitor this rule pins windows to, in OS
    /// enumeration order. `None` leaves matching windows alone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor: Option<usize>,
    /// A specific captured window. Takes precedence over patterns.
    #[serde(skip)]
    pub handle: Option<usize>,
}

impl Default for Rule {
    fn default() -> Self {
        Self {
            name: String::new(),
            title_pattern: String::new(),
            process_pattern: String::new(),
            match_by: MatchBy::Title,
            active: true,
            monitor: None,
            handle: None,
        }
    }
}

impl Rule {
    /// Returns whether this rule matches the given window.
    ///
    /// Handle equality wins over patterns. Pattern matching is a
    /// case-insensitive full-string wildcard match; an empty pattern
    /// matches nothing rather than everything.
    pub fn matches(&self, handle: usize, title: &str, process: &str) -> bool {
        if let Some(captured) = self.handle {
            return captured == handle;
        }

        match self.match_by {
            MatchBy::Title => {
                !self.title_pattern.is_empty() && glob_match(&self.title_pattern, title)
            }
            MatchBy::Process => {
                let pattern = strip_exe_suffix(&self.process_pattern);
                !pattern.is_empty() && glob_match(pattern, process)
            }
        }
    }
}

/// Removes a trailing `.exe` from a process pattern.
///
/// Process names are reported without the executable suffix, so a
/// pattern like `notepad.exe` would otherwise never match.
fn strip_exe_suffix(pattern: &str) -> &str {
    let len = pattern.len();
    if len >= 4
        && pattern.is_char_boundary(len - 4)
        && pattern[len - 4..].eq_ignore_ascii_case(".exe")
    {
        &pattern[..len - 4]
    } else {
        pattern
    }
}

/// Case-insensitive wildcard match of `pattern` against the whole of `text`.
///
/// `*` matches any run of characters (including none), `?` matches exactly
/// one character. Every pattern is total — there is no syntax that can
/// fail to parse — so a nonsensical pattern simply never matches.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().flat_map(char::to_lowercase).collect();
    let t: Vec<char> = text.chars().flat_map(char::to_lowercase).collect();

    let mut pi = 0;
    let mut ti = 0;
    // Position of the last `*` seen and the text index it was tried at,
    // for backtracking when a literal run fails further on.
    let mut star: Option<usize> = None;
    let mut mark = 0;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some(pi);
            mark = ti;
            pi += 1;
        } else if let Some(s) = star {
            pi = s + 1;
            mark += 1;
            ti = mark;
        } else {
            return false;
        }
    }

    // Only trailing stars may remain unconsumed.
    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }
    pi == p.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_rule(pattern: &str) -> Rule {
        Rule {
            name: "test".into(),
            title_pattern: pattern.into(),
            ..Rule::default()
        }
    }

    fn process_rule(pattern: &str) -> Rule {
        Rule {
            name: "test".into(),
            process_pattern: pattern.into(),
            match_by: MatchBy::Process,
            ..Rule::default()
        }
    }

    // -- glob matcher --

    #[test]
    fn literal_match_is_case_insensitive() {
        assert!(glob_match("notepad", "Notepad"));
        assert!(glob_match("NOTEPAD", "notepad"));
        assert!(!glob_match("notepad", "notepad2"));
    }

    #[test]
    fn star_matches_any_run() {
        assert!(glob_match("*chrome*", "Google Chrome - Tab"));
        assert!(glob_match("*", "anything at all"));
        assert!(glob_match("*", ""));
        assert!(glob_match("a*b", "ab"));
        assert!(glob_match("a*b", "a-very-long-b"));
        assert!(!glob_match("a*b", "a-very-long-c"));
    }

    #[test]
    fn question_mark_matches_one_char() {
        assert!(glob_match("note?ad", "notepad"));
        assert!(!glob_match("note?ad", "notepad2"));
        assert!(!glob_match("note?ad", "notead"));
    }

    #[test]
    fn match_is_full_string() {
        assert!(!glob_match("chrome", "Google Chrome"));
        assert!(glob_match("*chrome", "Google Chrome"));
    }

    #[test]
    fn backtracking_across_multiple_stars() {
        assert!(glob_match("*a*b*c*", "xxaxxbxxcxx"));
        assert!(!glob_match("*a*b*c*", "xxaxxcxxbxx"));
        assert!(glob_match("**", "x"));
    }

    #[test]
    fn empty_pattern_matches_only_empty_text() {
        assert!(glob_match("", ""));
        assert!(!glob_match("", "x"));
    }

    // -- rule matching --

    #[test]
    fn captured_handle_wins_over_patterns() {
        let mut rule = title_rule("*never matches*");
        rule.handle = Some(42);

        assert!(rule.matches(42, "any title", "any process"));
        assert!(!rule.matches(43, "any title", "any process"));
    }

    #[test]
    fn title_rule_ignores_process_name() {
        let rule = title_rule("*notepad*");
        assert!(rule.matches(1, "Untitled - Notepad", "explorer"));
        assert!(!rule.matches(1, "Calculator", "notepad"));
    }

    #[test]
    fn process_rule_ignores_title() {
        let rule = process_rule("notepad");
        assert!(rule.matches(1, "Calculator", "notepad"));
        assert!(!rule.matches(1, "Untitled - Notepad", "calc"));
    }

    #[test]
    fn exe_suffix_is_stripped_from_process_pattern() {
        assert!(process_rule("notepad.exe").matches(1, "", "notepad"));
        assert!(process_rule("NOTEPAD.EXE").matches(1, "", "notepad"));
        assert!(process_rule("chrome*.exe").matches(1, "", "chrome*")); // suffix only
    }

    #[test]
    fn empty_pattern_never_matches_a_window() {
        assert!(!title_rule("").matches(1, "", "proc"));
        assert!(!process_rule("").matches(1, "title", ""));
        assert!(!process_rule(".exe").matches(1, "title", ""));
    }
}
