// ABOUTME: Validation errors for category rule definitions
// ABOUTME: Converts into AppError so repositories can reject malformed rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

use super::{AppError, ErrorCode};

/// Reasons a category rule is rejected before it is stored
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleValidationError {
    /// Rule carries no metric targets at all
    #[error("rule for category {category_id} has no metric targets")]
    Empty {
        /// Category the rule was meant for
        category_id: u32,
    },
    /// Reference value or bound is NaN or infinite
    #[error("metric '{metric}' has a non-finite value")]
    NonFinite {
        /// Offending metric name
        metric: String,
    },
    /// Reference value below zero
    #[error("metric '{metric}' has negative reference {value}")]
    NegativeReference {
        /// Offending metric name
        metric: String,
        /// The rejected value
        value: f64,
    },
    /// Band upper bound lies below its lower bound
    #[error("metric '{metric}' has inverted band [{min}, {max}]")]
    InvertedBand {
        /// Offending metric name
        metric: String,
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },
}

impl From<RuleValidationError> for AppError {
    fn from(error: RuleValidationError) -> Self {
        Self::new(ErrorCode::InvalidInput, error.to_string()).with_source(error)
    }
}
