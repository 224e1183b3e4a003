// ABOUTME: Error handling entry point for the activity insights crate
// ABOUTME: Re-exports the unified AppError system from pierre-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use pierre_core::errors::{
    AppError, AppResult, ErrorCode, ErrorContext, ErrorResponse, ErrorResponseDetails,
    RuleValidationError,
};
