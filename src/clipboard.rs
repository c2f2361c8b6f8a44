//! Copying the raw data with a short-lived "copied" indicator.
//!
//! [`CommandClipboard`] reaches the system clipboard by piping text into the
//! first platform tool that accepts it (`pbcopy`, `wl-copy`, `xclip`, `xsel`).

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::error::QrStudioError;

/// How long the indicator stays on after a successful copy.
pub const COPIED_FOR: Duration = Duration::from_secs(2);

/// Clipboard tools tried in order, with the arguments that make them read stdin.
const SYSTEM_TOOLS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), QrStudioError>;
}

/// System clipboard driven through external command-line tools.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    tools: Vec<(String, Vec<String>)>,
}

impl CommandClipboard {
    pub fn new() -> Self {
        Self::with_tools(SYSTEM_TOOLS.iter().map(|(program, args)| {
            (program.to_string(), args.iter().map(|a| a.to_string()).collect())
        }))
    }

    /// Use a custom list of `(program, args)` candidates.
    pub fn with_tools<I>(tools: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        Self {
            tools: tools.into_iter().collect(),
        }
    }
}

impl Default for CommandClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), QrStudioError> {
        let mut failures = Vec::new();
        for (program, args) in &self.tools {
            match pipe_to(program, args, text) {
                Ok(()) => {
                    tracing::debug!(tool = %program, len = text.len(), "copied to clipboard");
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => {
                    tracing::debug!(tool = %program, error = %e, "clipboard tool failed");
                    failures.push(format!("{}: {}", program, e));
                }
            }
        }

        if failures.is_empty() {
            let names: Vec<&str> = self.tools.iter().map(|(p, _)| p.as_str()).collect();
            Err(QrStudioError::Clipboard(format!(
                "no clipboard tool found (tried {})",
                names.join(", ")
            )))
        } else {
            Err(QrStudioError::Clipboard(failures.join("; ")))
        }
    }
}

fn pipe_to(program: &str, args: &[String], text: &str) -> io::Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    let written = match child.stdin.take() {
        // Dropping stdin closes the pipe so the tool sees EOF
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };
    let status = child.wait()?;
    written?;

    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("exited with {}", status)))
    }
}

/// In-memory clipboard. Holds the last text written.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), QrStudioError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// Tracks the transient "copied" state shown next to the data field.
#[derive(Debug, Default)]
pub struct CopyFeedback {
    copied_at: Option<Instant>,
}

impl CopyFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `text`. On failure the error is logged, the indicator is
    /// cleared and `false` is returned.
    pub fn copy<C: Clipboard + ?Sized>(&mut self, clipboard: &mut C, text: &str) -> bool {
        self.copy_at(clipboard, text, Instant::now())
    }

    fn copy_at<C: Clipboard + ?Sized>(&mut self, clipboard: &mut C, text: &str, now: Instant) -> bool {
        match clipboard.write_text(text) {
            Ok(()) => {
                self.copied_at = Some(now);
                true
            }
            Err(e) => {
                tracing::error!("Failed to copy: {}", e);
                self.copied_at = None;
                false
            }
        }
    }

    pub fn is_copied(&self) -> bool {
        self.is_copied_at(Instant::now())
    }

    fn is_copied_at(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.saturating_duration_since(at) < COPIED_FOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Clipboard for Broken {
        fn write_text(&mut self, _text: &str) -> Result<(), QrStudioError> {
            Err(QrStudioError::Clipboard("permission denied".into()))
        }
    }

    #[test]
    fn test_copy_sets_indicator_for_two_seconds() {
        let mut clipboard = MemoryClipboard::default();
        let mut feedback = CopyFeedback::new();
        let t0 = Instant::now();

        assert!(feedback.copy_at(&mut clipboard, "https://example.com", t0));
        assert_eq!(clipboard.contents.as_deref(), Some("https://example.com"));
        assert!(feedback.is_copied_at(t0 + Duration::from_millis(1999)));
        assert!(!feedback.is_copied_at(t0 + COPIED_FOR));
    }

    fn tool(program: &str, args: &[&str]) -> (String, Vec<String>) {
        (program.to_string(), args.iter().map(|a| a.to_string()).collect())
    }

    #[test]
    fn test_system_tools_are_tried_in_order() {
        let names: Vec<String> = CommandClipboard::new().tools.into_iter().map(|(p, _)| p).collect();
        assert_eq!(names, ["pbcopy", "wl-copy", "xclip", "xsel"]);
    }

    #[test]
    fn test_missing_tools_report_clipboard_error() {
        let mut clipboard = CommandClipboard::with_tools([tool("qrstudio-no-such-tool", &[])]);
        let err = clipboard.write_text("hello").unwrap_err();
        match err {
            QrStudioError::Clipboard(msg) => assert!(msg.contains("qrstudio-no-such-tool"), "{}", msg),
            other => panic!("expected Clipboard, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_command_clipboard_falls_through_to_working_tool() {
        let mut clipboard = CommandClipboard::with_tools([
            tool("qrstudio-no-such-tool", &[]),
            tool("false", &[]),
            tool("cat", &[]),
        ]);
        let mut feedback = CopyFeedback::new();
        assert!(feedback.copy(&mut clipboard, "https://example.com"));
        assert!(feedback.is_copied());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_tool_clears_indicator() {
        let mut clipboard = CommandClipboard::with_tools([tool("false", &[])]);
        let mut feedback = CopyFeedback::new();
        assert!(!feedback.copy(&mut clipboard, "x"));
        assert!(!feedback.is_copied());
    }

    #[test]
    fn test_failure_clears_indicator() {
        let mut feedback = CopyFeedback::new();
        let t0 = Instant::now();
        feedback.copy_at(&mut MemoryClipboard::default(), "x", t0);

        assert!(!feedback.copy_at(&mut Broken, "y", t0));
        assert!(!feedback.is_copied_at(t0));
    }
}
