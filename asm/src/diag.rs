use crate::error::Error;
use color_print::cprintln;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warn,
    Note,
}

/// Where a statement came from: file, 1-based line number and the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Loc {
    pub file: String,
    pub line: usize,
    pub raw: String,
}

#[derive(Debug)]
pub struct Diag {
    pub level: Level,
    pub error: Error,
    pub loc: Option<Loc>,
}

impl Diag {
    pub fn error(error: Error, loc: Option<Loc>) -> Self {
        Diag {
            level: Level::Error,
            error,
            loc,
        }
    }

    pub fn warn(error: Error, loc: Option<Loc>) -> Self {
        Diag {
            level: Level::Warn,
            error,
            loc,
        }
    }

    pub fn note(error: Error, loc: Option<Loc>) -> Self {
        Diag {
            level: Level::Note,
            error,
            loc,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }

    /// Print with the offending source line in a gutter.
    pub fn print(&self) {
        match self.level {
            Level::Error => cprintln!("<red,bold>error</>: {}", self.error),
            Level::Warn => cprintln!("<yellow,bold>warn</>: {}", self.error),
            Level::Note => cprintln!("<green,bold>note</>: {}", self.error),
        }
        if let Some(loc) = &self.loc {
            cprintln!("     <blue>--></> <underline>{}:{}</>", loc.file, loc.line);
            cprintln!("      <blue>|</>");
            cprintln!(" <blue>{:>4} |</> {}", loc.line, loc.raw);
            cprintln!("      <blue>|</>");
        }
    }
}
