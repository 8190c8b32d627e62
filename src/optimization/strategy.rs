use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::ScheduleGraph;

/// Named optimization strategy forwarded to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// As soon as possible (forward scheduling).
    #[default]
    Asap,
    /// As late as possible (backward scheduling).
    Alap,
    CriticalPath,
    #[serde(alias = "resource-level")]
    ResourceLeveling,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Asap,
        Strategy::Alap,
        Strategy::CriticalPath,
        Strategy::ResourceLeveling,
    ];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Asap => "asap",
            Strategy::Alap => "alap",
            Strategy::CriticalPath => "critical-path",
            Strategy::ResourceLeveling => "resource-leveling",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized strategy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown optimization strategy: {0}")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asap" => Ok(Strategy::Asap),
            "alap" => Ok(Strategy::Alap),
            "critical-path" => Ok(Strategy::CriticalPath),
            "resource-leveling" | "resource-level" => Ok(Strategy::ResourceLeveling),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

/// What the engine receives: a strategy plus the current graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationRequest {
    pub strategy: Strategy,
    pub graph: ScheduleGraph,
}
