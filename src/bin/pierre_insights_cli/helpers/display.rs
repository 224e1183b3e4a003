// ABOUTME: Output helpers for pierre-insights
// ABOUTME: Prints command results as pretty JSON on stdout; logs stay on stderr
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{Context, Error, Result};
use pierre_activity_insights::errors::{AppError, ErrorResponse};
use pierre_activity_insights::models::ActivityKind;
use serde::Serialize;
use tracing::warn;

/// Print `value` as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{rendered}");
    Ok(())
}

/// Print the error envelope when a command failed with an engine error
pub fn print_app_error(error: &Error) {
    let Some(app_error) = error.downcast_ref::<AppError>() else {
        return;
    };
    if let Err(e) = print_json(&ErrorResponse::from(app_error)) {
        warn!(error = %e, "could not render error envelope");
    }
}

/// Parse activity type names given on the command line
pub fn parse_kinds(names: &[String]) -> Vec<ActivityKind> {
    names.iter().map(|name| ActivityKind::from_name(name)).collect()
}
