//! Chart kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported chart visualization kinds.
///
/// The set is fixed; chart records referencing anything else are rejected
/// at creation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartKind {
    #[serde(rename = "line")]
    Line,
    #[serde(rename = "bar")]
    Bar,
    #[serde(rename = "pie")]
    Pie,
    #[serde(rename = "scatter")]
    Scatter,
    #[serde(rename = "3d-column")]
    ThreeDColumn,
}

impl ChartKind {
    /// Parse from string.
    pub fn parse(s: &str) -> crate::Result<Self> {
        match s {
            "line" => Ok(Self::Line),
            "bar" => Ok(Self::Bar),
            "pie" => Ok(Self::Pie),
            "scatter" => Ok(Self::Scatter),
            "3d-column" => Ok(Self::ThreeDColumn),
            _ => Err(crate::Error::InvalidValue(format!(
                "unknown chart kind: {s}"
            ))),
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
            Self::Pie => "pie",
            Self::Scatter => "scatter",
            Self::ThreeDColumn => "3d-column",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!(ChartKind::parse("line").unwrap(), ChartKind::Line);
        assert_eq!(ChartKind::parse("bar").unwrap(), ChartKind::Bar);
        assert_eq!(ChartKind::parse("pie").unwrap(), ChartKind::Pie);
        assert_eq!(ChartKind::parse("scatter").unwrap(), ChartKind::Scatter);
        assert_eq!(
            ChartKind::parse("3d-column").unwrap(),
            ChartKind::ThreeDColumn
        );
        assert!(ChartKind::parse("donut").is_err());
    }

    #[test]
    fn test_kind_serde_matches_parse() {
        for kind in [
            ChartKind::Line,
            ChartKind::Bar,
            ChartKind::Pie,
            ChartKind::Scatter,
            ChartKind::ThreeDColumn,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(serde_json::from_str::<ChartKind>(&json).unwrap(), kind);
        }
    }
}
