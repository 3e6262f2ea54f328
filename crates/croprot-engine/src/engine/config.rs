use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    ConfigError,
    core::{Color, ParseColorError},
    engine::plot::ColorPair,
};

/// Colors picked for one plot before the game starts.
///
/// Either slot may still be unset while the player is filling in the form;
/// [`PlotConfig::color_pair`] refuses incomplete plots.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotConfig {
    #[serde(default)]
    pub color1: Option<Color>,
    #[serde(default)]
    pub color2: Option<Color>,
}

impl PlotConfig {
    #[must_use]
    pub const fn new(color1: Color, color2: Color) -> Self {
        Self {
            color1: Some(color1),
            color2: Some(color2),
        }
    }

    pub fn color_pair(&self, plot: usize) -> Result<ColorPair, ConfigError> {
        match (self.color1, self.color2) {
            (Some(c1), Some(c2)) => Ok(ColorPair(c1, c2)),
            (None, _) => Err(ConfigError::MissingColor { plot, slot: 0 }),
            (Some(_), None) => Err(ConfigError::MissingColor { plot, slot: 1 }),
        }
    }
}

impl From<ColorPair> for PlotConfig {
    fn from(pair: ColorPair) -> Self {
        Self::new(pair.0, pair.1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParsePlotError {
    #[display("invalid plot `{input}`: {error}")]
    Color { input: String, error: ParseColorError },
    #[display("invalid plot `{input}`: expected two colors such as `YR` or `yellow/red`")]
    Shape { input: String },
}

/// Parses one plot: either two letter codes (`YR`) or two names separated
/// by `/` (`yellow/red`). `-` or `?` leaves a slot unset.
impl FromStr for PlotConfig {
    type Err = ParsePlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let tokens: Vec<&str> = if s.contains('/') {
            s.split('/').map(str::trim).collect()
        } else if s.chars().count() == 2 && s.is_ascii() {
            vec![&s[..1], &s[1..]]
        } else {
            vec![s]
        };

        let [first, second] = tokens.as_slice() else {
            return Err(ParsePlotError::Shape {
                input: s.to_owned(),
            });
        };
        let parse_slot = |token: &str| -> Result<Option<Color>, ParsePlotError> {
            if matches!(token, "" | "-" | "?") {
                return Ok(None);
            }
            token.parse().map(Some).map_err(|error| ParsePlotError::Color {
                input: s.to_owned(),
                error,
            })
        };

        Ok(Self {
            color1: parse_slot(*first)?,
            color2: parse_slot(*second)?,
        })
    }
}

/// Parses a comma- or whitespace-separated plot list such as `YR, YB, RB`.
pub fn parse_plot_list(input: &str) -> Result<Vec<PlotConfig>, ParsePlotError> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}

/// Validates every plot before any state is built.
pub fn color_pairs(plots: &[PlotConfig]) -> Result<Vec<ColorPair>, ConfigError> {
    plots
        .iter()
        .enumerate()
        .map(|(index, plot)| plot.color_pair(index))
        .collect()
}
