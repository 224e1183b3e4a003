// ABOUTME: Main library entry point for Pierre activity insights
// ABOUTME: Wires classification, baselines, insight rendering, and notifications into one pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Activity Insights
//!
//! Classifies completed activities into intensity categories, compares each
//! one against the user's running baseline for that category, and turns the
//! comparison into short commentary.
//!
//! ## Architecture
//!
//! - **Engine** (`pierre-intelligence`): classifier, delta calculator, baseline updater
//! - **Repositories**: capability-scoped access to rules, baselines, deltas, insights
//! - **Seeding**: per-sport default rules written for new users
//! - **Insights**: LLM-backed renderer with bounded retry
//! - **Notifications**: per-user delivery of pipeline events
//! - **Pipeline**: the end-to-end flow for one activity
//! - **Replay**: batch processing of recorded activities from JSON files

/// Environment configuration and default rule tables
pub mod config;

/// Error types re-exported from `pierre-core`
pub mod errors;

/// Insight rendering on top of an LLM provider
pub mod insights;

/// LLM provider abstraction and the `OpenAI`-compatible client
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Per-user real-time notification hub
pub mod notifications;

/// End-to-end activity processing
pub mod pipeline;

/// Offline replay of recorded activities
pub mod replay;

/// Capability-scoped repositories
pub mod repositories;

/// Default rule seeding for new users
pub mod seeding;

pub use pierre_core::{constants, models, permissions};
pub use pierre_intelligence as engine;
