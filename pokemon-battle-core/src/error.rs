use std::fmt;

use thiserror::Error;

use crate::sim::state::SideReference;

/// Category of identifier that failed to resolve against the static tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentifierKind {
    Species,
    Move,
    Ability,
    Item,
    Type,
    Status,
    VolatileStatus,
    SideCondition,
    Stat,
    Weather,
    Terrain,
    Choice,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IdentifierKind::Species => "species",
            IdentifierKind::Move => "move",
            IdentifierKind::Ability => "ability",
            IdentifierKind::Item => "item",
            IdentifierKind::Type => "type",
            IdentifierKind::Status => "status",
            IdentifierKind::VolatileStatus => "volatile status",
            IdentifierKind::SideCondition => "side condition",
            IdentifierKind::Stat => "stat",
            IdentifierKind::Weather => "weather",
            IdentifierKind::Terrain => "terrain",
            IdentifierKind::Choice => "choice",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("unknown {kind} identifier: {name:?}")]
    UnknownIdentifier { kind: IdentifierKind, name: String },

    #[error("illegal action for {side}: {reason}")]
    IllegalAction { side: SideReference, reason: String },

    #[error("malformed state: {0}")]
    MalformedState(String),
}

impl EngineError {
    pub fn unknown(kind: IdentifierKind, name: impl Into<String>) -> Self {
        EngineError::UnknownIdentifier {
            kind,
            name: name.into(),
        }
    }

    pub fn illegal(side: SideReference, reason: impl Into<String>) -> Self {
        EngineError::IllegalAction {
            side,
            reason: reason.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        EngineError::MalformedState(reason.into())
    }
}
