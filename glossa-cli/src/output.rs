//! Terminal output
//!
//! Reports go to stdout, progress and warnings to stderr. Styling is only applied when
//! the stream is a terminal, so redirected output stays plain text.

use crossterm::style::Stylize;
use crossterm::tty::IsTty;
use glossa_core::glossary::progress::ProgressSink;
use std::io::{self, Write};

pub struct Output {
    styled: bool,
}

impl Output {
    pub fn new() -> Self {
        Self {
            styled: io::stdout().is_tty(),
        }
    }

    pub fn line(&self, text: &str) {
        println!("{text}");
    }

    pub fn success(&self, text: &str) {
        if self.styled {
            println!("{}", text.green().bold());
        } else {
            println!("{text}");
        }
    }

    pub fn notice(&self, text: &str) {
        if self.styled {
            println!("{}", text.yellow());
        } else {
            println!("{text}");
        }
    }

    /// Print a multi-line report, highlighting its rule and heading lines.
    pub fn report(&self, report: &str) {
        if !self.styled {
            println!("{report}");
            return;
        }
        for line in report.lines() {
            if line.starts_with("===") {
                println!("{}", line.dark_grey());
            } else if !line.starts_with(' ') && line.ends_with(':') {
                println!("{}", line.bold());
            } else if line.trim_start().starts_with("line ") {
                println!("{}", line.yellow());
            } else {
                println!("{line}");
            }
        }
    }
}

/// Renders worker progress on stderr.
pub struct ConsoleProgress {
    interactive: bool,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self {
            interactive: io::stderr().is_tty(),
        }
    }

    /// Clear the progress line once the job is over.
    pub fn finish(&self) {
        if self.interactive {
            let mut stderr = io::stderr();
            let _ = write!(stderr, "\r{:60}\r", "");
            let _ = stderr.flush();
        }
    }
}

impl ProgressSink for ConsoleProgress {
    fn report(&self, percent: f32, message: &str) {
        if !self.interactive {
            return;
        }
        let mut stderr = io::stderr();
        let line: String = format!("[{:>3}%] {message}", percent.round() as u8)
            .chars()
            .take(60)
            .collect();
        let _ = write!(stderr, "\r{line:60}");
        let _ = stderr.flush();
    }

    fn warn(&self, message: &str) {
        if self.interactive {
            eprintln!("\r{}", format!("warning: {message}").yellow());
        } else {
            eprintln!("warning: {message}");
        }
    }
}
