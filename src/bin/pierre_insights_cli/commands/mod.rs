// ABOUTME: Subcommand implementations for pierre-insights
// ABOUTME: One module per command: seed, classify, replay, rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod classify;
pub mod replay;
pub mod rules;
pub mod seed;
