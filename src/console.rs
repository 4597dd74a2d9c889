use crossterm::{cursor, terminal, ExecutableCommand};
use std::io::{self, stdout, Write};

/// Levelled printing for the text front-end, with an optional status line
/// kept pinned under the scrolling output.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Console {
    pinned: Option<String>,
    pub level: Level,
}

impl Console {
    pub fn new(level: Level) -> Self {
        Self {
            pinned: None,
            level,
        }
    }

    pub fn print_with_level(&self, level: Level, message: &str) {
        #[cfg(not(debug_assertions))]
        if level == Level::Debug {
            return;
        }

        if level < self.level {
            return;
        }

        // a terminal that cannot be cleared still gets the message
        self.clear_pinned().ok();

        println!("{message}");

        if let Some(pinned) = &self.pinned {
            print!("{pinned}");
            stdout().flush().ok();
        }
    }

    pub fn print(&self, message: &str) {
        self.print_with_level(Level::Necessary, message);
    }

    pub fn warn(&self, message: &str) {
        self.print_with_level(Level::Warning, message);
    }

    pub fn info(&self, message: &str) {
        self.print_with_level(Level::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.print_with_level(Level::Debug, message);
    }

    /// Prints `message` re-flowed to the terminal width.
    pub fn print_wrapped(&self, message: &str) {
        self.print(&textwrap::fill(message, Self::width()));
    }

    pub fn pin(&mut self, pinned: String) {
        self.clear_pinned().ok();

        print!("{pinned}");
        stdout().flush().ok();
        self.pinned = Some(pinned);
    }

    pub fn unpin(&mut self) {
        self.clear_pinned().ok();

        self.pinned = None;
    }

    fn width() -> usize {
        terminal::size().map_or(80, |(cols, _)| cols.max(20) as usize)
    }

    fn clear_pinned(&self) -> io::Result<()> {
        if self.pinned.is_some() {
            stdout()
                .execute(terminal::Clear(terminal::ClearType::CurrentLine))?
                .execute(cursor::MoveToColumn(0))?;
        }

        Ok(())
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Necessary = 3,
    Warning = 2,
    Info = 1,
    // debug is only printed in debug builds
    Debug = 0,
}
