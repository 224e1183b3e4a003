// ABOUTME: Configuration module for environment settings and default rule tables
// ABOUTME: Re-exports ServerConfig, InsightConfig, and DefaultRuleConfig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration for Pierre activity insights
//!
//! - **Environment**: service settings read from environment variables
//! - **Rules**: per-sport default category rules used for seeding

/// Environment and service configuration
pub mod environment;
/// Default category rule tables
pub mod rules;

pub use environment::{Environment, InsightConfig, ServerConfig};
pub use rules::{DefaultRuleConfig, MetricTable};
