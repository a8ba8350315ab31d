//! Markers for step lines and one-line results.

use owo_colors::OwoColorize;

/// Marker in front of a step or result line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Start,
    Done,
    Planned,
    Failed,
    Warn,
}

impl Mark {
    pub const fn glyph(self) -> &'static str {
        match self {
            Mark::Start => "→",
            Mark::Done => "✓",
            Mark::Planned => "○",
            Mark::Failed => "✗",
            Mark::Warn => "⚠",
        }
    }

    /// The glyph followed by `text`, coloured for this marker.
    pub fn line(self, text: &str) -> String {
        let glyph = self.glyph();
        match self {
            Mark::Start => format!("{} {}", glyph.cyan(), text.bold()),
            Mark::Done => format!("{} {}", glyph.green(), text.green()),
            Mark::Planned => format!("{} {}", glyph.bright_black(), text.bright_black()),
            Mark::Failed => format!("{} {}", glyph.red(), text.red().bold()),
            Mark::Warn => format!("{} {}", glyph.yellow(), text.yellow()),
        }
    }
}

pub fn print_success(message: &str) {
    println!("  {}", Mark::Done.line(message));
}

/// Errors go to stderr so `--json` output stays clean.
pub fn print_error(message: &str) {
    eprintln!("  {}", Mark::Failed.line(message));
}

pub fn print_warning(message: &str) {
    println!("  {}", Mark::Warn.line(message));
}
