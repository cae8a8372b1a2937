//! Terminal console utilities for diagnostic output

use std::env;
use std::io::{self, IsTerminal};

/// Console output handler with color support
pub struct Console {
    color_enabled: bool,
}

impl Console {
    /// Create a new console with automatic color detection
    pub fn new() -> Self {
        Self {
            color_enabled: io::stdout().is_terminal() && env::var("NO_COLOR").is_err(),
        }
    }

    /// Create a console with colors disabled
    pub fn no_colors() -> Self {
        Self {
            color_enabled: false,
        }
    }

    /// Check if color output is enabled
    pub fn is_color_enabled(&self) -> bool {
        self.color_enabled
    }

    /// Colorize text with the specified color
    pub fn colorize(&self, text: &str, color: Color) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            Color::Red => format!("\x1b[31m{text}\x1b[0m"),
            Color::Yellow => format!("\x1b[33m{text}\x1b[0m"),
            Color::Blue => format!("\x1b[34m{text}\x1b[0m"),
            Color::Green => format!("\x1b[32m{text}\x1b[0m"),
            Color::Cyan => format!("\x1b[36m{text}\x1b[0m"),
            Color::Dim => format!("\x1b[2m{text}\x1b[0m"),
            Color::Bold => format!("\x1b[1m{text}\x1b[0m"),
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

/// ANSI color codes for terminal output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Yellow,
    Blue,
    Green,
    Cyan,
    Dim,
    Bold,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_colors_passes_text_through() {
        let console = Console::no_colors();
        assert!(!console.is_color_enabled());
        assert_eq!(console.colorize("test", Color::Red), "test");
        assert_eq!(console.colorize("test", Color::Bold), "test");
    }
}
