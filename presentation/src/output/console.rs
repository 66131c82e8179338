//! Console output for streamed replies

use colored::Colorize;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;

fn inline_image() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"!\[([^\]]*)\]\(data:image/([a-z]+);base64,([A-Za-z0-9+/=]+)\)")
            .expect("inline image pattern is valid")
    })
}

/// Formats replies and status lines for the terminal
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Replace inline data-URI images with a short placeholder.
    ///
    /// Terminals cannot show the image, and the base64 payload would bury the
    /// reply.
    pub fn for_terminal(text: &str) -> Cow<'_, str> {
        inline_image().replace_all(text, |caps: &Captures| {
            let bytes = caps[3].trim_end_matches('=').len() * 3 / 4;
            format!(
                "[{}: {} {}]",
                &caps[1],
                human_size(bytes),
                caps[2].to_ascii_uppercase()
            )
        })
    }

    pub fn header(title: &str) -> String {
        let line = "─".repeat(45);
        format!("╭{}╮\n│{:^45}│\n╰{}╯", line, title, line)
    }

    pub fn status(message: &str) -> String {
        format!("{} {}", "->".cyan(), message)
    }

    pub fn error(message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }
}

fn human_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    }
}

/// What to write after a new display copy of the reply arrived
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamUpdate {
    /// Nothing new
    Unchanged,
    /// Text to append to what is already on screen
    Append(String),
    /// The reply no longer extends what was printed (a retry restarted it,
    /// or a failure replaced it); the whole text follows
    Restart(String),
}

/// Turns successive display copies of a reply into terminal writes.
#[derive(Debug, Default)]
pub struct StreamPrinter {
    printed: String,
}

impl StreamPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, display: &str) -> StreamUpdate {
        let text = ConsoleFormatter::for_terminal(display);
        if text == self.printed {
            return StreamUpdate::Unchanged;
        }
        let update = match text.strip_prefix(self.printed.as_str()) {
            Some(rest) => StreamUpdate::Append(rest.to_string()),
            None => StreamUpdate::Restart(text.to_string()),
        };
        self.printed = text.into_owned();
        update
    }

    pub fn printed(&self) -> &str {
        &self.printed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_images_are_summarised() {
        let text = "Here:\n\n![plot](data:image/png;base64,AAAAAAAA)\n\nDone.";
        assert_eq!(
            ConsoleFormatter::for_terminal(text),
            "Here:\n\n[plot: 6 B PNG]\n\nDone."
        );
        assert!(matches!(
            ConsoleFormatter::for_terminal("no images"),
            Cow::Borrowed("no images")
        ));
    }

    #[test]
    fn test_printer_appends_suffixes() {
        let mut printer = StreamPrinter::new();
        assert_eq!(printer.update("Hel"), StreamUpdate::Append("Hel".into()));
        assert_eq!(printer.update("Hello"), StreamUpdate::Append("lo".into()));
        assert_eq!(printer.update("Hello"), StreamUpdate::Unchanged);
        assert_eq!(printer.printed(), "Hello");
    }

    #[test]
    fn test_printer_restarts_on_replacement() {
        let mut printer = StreamPrinter::new();
        printer.update("stale partial");
        assert_eq!(
            printer.update("fresh"),
            StreamUpdate::Restart("fresh".into())
        );
        assert_eq!(printer.update("fresh!"), StreamUpdate::Append("!".into()));
    }
}
