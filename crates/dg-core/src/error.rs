//! Configuration errors and non-fatal layout issues

use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

use crate::grid::Cell;
use crate::roles::Role;
use crate::shape::ShapeKind;

/// Configuration rejected when a generator is built or reconfigured
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("target cell count must be at least 1")]
    NoCells,

    #[error("cell size must be positive and finite, got {0}")]
    InvalidCellSize(f32),

    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f32 },

    #[error("{name} spawn range is inverted: {min} > {max}")]
    InvertedRange {
        name: &'static str,
        min: u32,
        max: u32,
    },

    #[error("tier cutoffs must satisfy 0 <= mid ({mid}) <= late ({late}) <= 1")]
    TierCutoffs { mid: f32, late: f32 },

    #[error("tier order lists {0} more than once")]
    DuplicateTier(String),
}

/// How bad a layout issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// Something the pipeline could not fully honour; generation still completes
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum LayoutIssue {
    #[error("frontier exhausted after {placed} of {requested} rooms")]
    FrontierExhausted { placed: usize, requested: usize },

    #[error("locked area reached {carved} of {target} rooms")]
    LockedAreaShort { carved: usize, target: usize },

    #[error("no room qualifies for the {role} role")]
    RoleUnassigned { role: Role },

    #[error("room {cell} skipped: no {kind} variant available")]
    MissingShapeVariant { cell: Cell, kind: ShapeKind },

    #[error("room {cell} skipped: no variant for the {role} room")]
    MissingSpecialVariant { cell: Cell, role: Role },
}

impl LayoutIssue {
    pub fn severity(&self) -> Severity {
        match self {
            LayoutIssue::MissingShapeVariant { .. } | LayoutIssue::MissingSpecialVariant { .. } => {
                Severity::Error
            }
            _ => Severity::Warning,
        }
    }
}
