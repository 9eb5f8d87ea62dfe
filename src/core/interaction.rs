use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScentEngineError;

/// Kind of user interaction, each with a fixed popularity weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    View,
    Click,
    Favorite,
    AddToInventory,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 4] = [
        InteractionKind::View,
        InteractionKind::Click,
        InteractionKind::Favorite,
        InteractionKind::AddToInventory,
    ];

    /// Fixed popularity weight. Popularity scores are sums of these and
    /// nothing else, so any cached ranking can be reconciled to them.
    pub fn weight(&self) -> u32 {
        match self {
            InteractionKind::View => 1,
            InteractionKind::Click => 2,
            InteractionKind::Favorite => 3,
            InteractionKind::AddToInventory => 5,
        }
    }

    /// String label as serialized in the interaction log
    pub fn label(&self) -> &'static str {
        match self {
            InteractionKind::View => "view",
            InteractionKind::Click => "click",
            InteractionKind::Favorite => "favorite",
            InteractionKind::AddToInventory => "add_to_inventory",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InteractionKind {
    type Err = ScentEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        InteractionKind::ALL
            .into_iter()
            .find(|kind| kind.label() == lowered)
            .ok_or_else(|| ScentEngineError::InvalidAction(s.to_string()))
    }
}

/// One recorded user action. Immutable once appended to the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub perfume_id: String,

    #[serde(rename = "interaction_type")]
    pub kind: InteractionKind,

    #[serde(rename = "timestamp", default = "Utc::now")]
    pub at: DateTime<Utc>,
}

impl InteractionEvent {
    /// Create an event stamped with the current time
    pub fn new(perfume_id: impl Into<String>, kind: InteractionKind) -> Self {
        Self {
            perfume_id: perfume_id.into(),
            kind,
            at: Utc::now(),
        }
    }
}
