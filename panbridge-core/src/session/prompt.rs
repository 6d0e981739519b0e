//! Prompt detection and output cleanup

use std::sync::LazyLock;

use regex::Regex;

/// Command that starts PanCLI from the login shell
pub const LAUNCH_COMMAND: &str = "pancli";

/// Answer written to confirmation questions
pub const CONFIRM_REPLY: &str = "y";

static SHELL_PROMPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)[#$]\s*$").expect("SHELL_PROMPT_RE is a valid regex pattern")
});

static CLI_PROMPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)\[pancli\]\s*$").expect("CLI_PROMPT_RE is a valid regex pattern")
});

static ANSI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1B\[[0-9;]*[A-Za-z]").expect("ANSI_RE is a valid regex pattern")
});

/// A prompt that ends a read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// The login shell (`#` or `$` at end of line)
    Shell,
    /// The PanCLI prompt (`[pancli]` at end of line)
    Cli,
}

impl Prompt {
    fn regex(self) -> &'static Regex {
        match self {
            Self::Shell => &SHELL_PROMPT_RE,
            Self::Cli => &CLI_PROMPT_RE,
        }
    }

    /// The pattern source, for error messages
    #[must_use]
    pub fn pattern(self) -> &'static str {
        self.regex().as_str()
    }

    /// Tests the whole accumulated buffer, since a prompt may arrive split
    /// across reads
    #[must_use]
    pub fn is_match(self, buffer: &str) -> bool {
        self.regex().is_match(buffer)
    }
}

/// Removes ANSI escape sequences and carriage returns
#[must_use]
pub fn strip_terminal_codes(raw: &str) -> String {
    ANSI_RE.replace_all(raw, "").replace('\r', "")
}

/// Turns raw channel output into the command's result text
///
/// Drops everything up to and including the echoed command line, and the
/// last PanCLI prompt line with everything after it.
#[must_use]
pub fn clean_output(raw: &str, command: &str) -> String {
    let text = strip_terminal_codes(raw);
    let lines: Vec<&str> = text.split('\n').collect();

    let command = command.trim();
    let start = lines
        .iter()
        .position(|l| l.trim() == command)
        .map_or(0, |i| i + 1);
    let end = (start..lines.len())
        .rev()
        .find(|&i| CLI_PROMPT_RE.is_match(lines[i]))
        .unwrap_or(lines.len());

    lines[start..end].join("\n").trim().to_string()
}

/// Informational lines of the PanCLI start-up banner
#[must_use]
pub fn banner_lines(raw: &str) -> Vec<String> {
    strip_terminal_codes(raw)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with("[pancli]") && !l.starts_with(LAUNCH_COMMAND))
        .map(str::to_string)
        .collect()
}

/// Last `max` characters of a buffer, for timeout diagnostics
#[must_use]
pub fn tail(buffer: &str, max: usize) -> String {
    let count = buffer.chars().count();
    buffer.chars().skip(count.saturating_sub(max)).collect()
}
