// File: crates/trendline-core/src/error.rs
// Summary: Error taxonomy for fitting and drawing a single trendline.

use thiserror::Error;

use crate::config::TrendlineKind;

/// Reasons a single trendline is left out of a render pass.
///
/// None of these abort the pass; the orchestrator logs them and moves on.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum TrendlineError {
    #[error("{kind} trendline needs at least 2 usable points with distinct x (got {points})")]
    InsufficientData { kind: TrendlineKind, points: usize },

    #[error("{kind} trendline has no points with {requirement}")]
    DomainViolation { kind: TrendlineKind, requirement: &'static str },

    #[error("{kind} trendline normal equations are singular")]
    SingularSystem { kind: TrendlineKind },

    #[error("{kind} trendline endpoints map to non-finite pixels")]
    NonFinitePixel { kind: TrendlineKind },
}

impl TrendlineError {
    pub fn kind(&self) -> TrendlineKind {
        match *self {
            Self::InsufficientData { kind, .. }
            | Self::DomainViolation { kind, .. }
            | Self::SingularSystem { kind }
            | Self::NonFinitePixel { kind } => kind,
        }
    }
}
