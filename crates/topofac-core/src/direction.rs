//! Principal direction for sequencing environments.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The axis along which sibling environments are placed.
///
/// Row-major (`lr`) advances environments left to right, column-major (`tb`)
/// stacks them top to bottom. The internal layout of each environment does
/// not depend on the direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "lr", alias = "LR")]
    LeftToRight,
    #[serde(rename = "tb", alias = "TB")]
    TopToBottom,
}

impl Direction {
    /// Returns the flow-chart direction keyword (`LR` or `TB`).
    pub fn as_flowchart_str(self) -> &'static str {
        match self {
            Direction::LeftToRight => "LR",
            Direction::TopToBottom => "TB",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::LeftToRight => f.write_str("lr"),
            Direction::TopToBottom => f.write_str("tb"),
        }
    }
}

/// Error returned when a direction string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown direction `{0}`, expected `lr` or `tb`")]
pub struct ParseDirectionError(String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lr" | "row" | "row-major" => Ok(Direction::LeftToRight),
            "tb" | "td" | "column" | "column-major" => Ok(Direction::TopToBottom),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}
