// ABOUTME: Core types and constants for Pierre activity insights
// ABOUTME: Foundation crate with error handling, domain models, permissions, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Core
//!
//! Foundation crate providing shared types and constants for activity
//! classification, per-category baselines, and delta records. This crate is
//! designed to change infrequently, enabling incremental compilation benefits
//! in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `AppResult`
//! - **constants**: Metric names, category catalog, and insight defaults
//! - **models**: Activity observations, category rules, baselines, deltas, insights
//! - **permissions**: Authorization context and scope bitflags used by repositories

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (activity observations, rules, baselines, deltas)
pub mod models;

/// Authorization context and capability scopes
pub mod permissions;
