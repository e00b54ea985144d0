/// Status labels
///
/// Coloured prefixes for the lines the tool prints, keyed by outcome kind.

use std::fmt;

const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Error,
    Ok,
}

impl Status {
    // (label, ANSI colour)
    fn entry(&self) -> (&'static str, &'static str) {
        match self {
            Status::Error => ("ERROR:", "\x1b[31;1m"),
            Status::Ok => ("OK:", "\x1b[32;1m"),
        }
    }

    /// The label without escape codes
    pub fn plain(&self) -> &'static str {
        self.entry().0
    }

    /// The label wrapped in its colour
    pub fn label(&self) -> String {
        let (label, color) = self.entry();
        format!("{}{}{}", color, label, RESET)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
