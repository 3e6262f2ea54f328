use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// One of the three seed colors a field can hold.
///
/// The in-game names are kept as aliases when parsing so that both
/// `yellow` and `primal` (or just `y`) are accepted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Yellow,
    Red,
    Blue,
}

impl Color {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Red => "red",
            Self::Blue => "blue",
        }
    }

    /// Single-letter code used in compact plot lists (`YR,RB`).
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Yellow => 'Y',
            Self::Red => 'R',
            Self::Blue => 'B',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown color `{input}` (expected yellow, red or blue)")]
pub struct ParseColorError {
    pub input: String,
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "y" | "yellow" | "primal" => Ok(Self::Yellow),
            "r" | "red" | "wild" => Ok(Self::Red),
            "b" | "blue" | "vivid" => Ok(Self::Blue),
            _ => Err(ParseColorError {
                input: s.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_codes_names_and_lifeforce() {
        assert_eq!("Y".parse::<Color>().unwrap(), Color::Yellow);
        assert_eq!("red".parse::<Color>().unwrap(), Color::Red);
        assert_eq!(" Vivid ".parse::<Color>().unwrap(), Color::Blue);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "purple".parse::<Color>().unwrap_err();
        assert_eq!(err.input, "purple");
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Color::Blue).unwrap();
        assert_eq!(json, "\"blue\"");
        let color: Color = serde_json::from_str("\"yellow\"").unwrap();
        assert_eq!(color, Color::Yellow);
    }
}
