//! Colored CLI display utilities for supervisor output.
//!
//! Lifecycle transitions are printed here so they stay visible even when
//! tracing is filtered down; the relayed child output goes straight to the
//! supervisor's own stdout/stderr and never passes through this module.

use std::borrow::Cow;
use std::io::{self, Write};

use chrono::Utc;
use owo_colors::OwoColorize;

/// Get current timestamp in the same format as tracing.
fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Maximum length for truncated display strings.
const DEFAULT_MAX_LEN: usize = 80;

/// Truncate a string to a maximum length, adding ellipsis if truncated.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}

/// Render a command vector as a copy-pasteable shell line.
#[must_use]
pub fn render_command(command: &[String]) -> String {
    command
        .iter()
        .map(|word| shell_escape::escape(Cow::Borrowed(word.as_str())))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Print the data observed on the watched node.
pub fn print_node_data(data: &[u8]) {
    let text = String::from_utf8_lossy(data);
    println!(
        "{} {} {} bytes: {}",
        timestamp().dimmed(),
        "[NODE]".cyan().bold(),
        data.len(),
        truncate(&text, DEFAULT_MAX_LEN)
    );
    let _ = io::stdout().flush();
}

/// Print a child start line.
pub fn print_child_started(pid: Option<u32>, command: &[String]) {
    println!(
        "{} {} starting child pid={} ({})",
        timestamp().dimmed(),
        "[CHILD]".green().bold(),
        pid.map_or_else(|| "?".to_string(), |p| p.to_string()),
        render_command(command).dimmed()
    );
    let _ = io::stdout().flush();
}

/// Print a child stop line. `action` is "killing process" when the node
/// vanished, "stopping child" when a new payload supersedes it.
pub fn print_child_stopping(pid: Option<u32>, action: &str) {
    println!(
        "{} {} {} pid={}",
        timestamp().dimmed(),
        "[CHILD]".yellow().bold(),
        action,
        pid.map_or_else(|| "?".to_string(), |p| p.to_string())
    );
    let _ = io::stdout().flush();
}

/// Print the terminal session-closed line.
pub fn print_session_closed(reason: &str) {
    println!(
        "{} {} session permanently closed ({reason})",
        timestamp().dimmed(),
        "[SESSION]".red().bold()
    );
    let _ = io::stdout().flush();
}

/// Print an error message.
pub fn print_error(message: &str) {
    println!("{} {}", "[ERROR]".red().bold(), message);
    let _ = io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_exact_length() {
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_very_short_max() {
        assert_eq!(truncate("hello", 3), "...");
        assert_eq!(truncate("hello", 0), "...");
    }

    #[test]
    fn test_render_command_plain_words() {
        let command = vec!["date".to_string(), "-u".to_string()];
        assert_eq!(render_command(&command), "date -u");
    }

    #[test]
    fn test_render_command_quotes_spaces() {
        let command = vec!["sh".to_string(), "-c".to_string(), "echo hi".to_string()];
        let rendered = render_command(&command);
        assert!(rendered.starts_with("sh -c"));
        assert!(rendered.contains("'echo hi'"));
    }
}
