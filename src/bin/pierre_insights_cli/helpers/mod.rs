// ABOUTME: Shared helpers for pierre-insights commands
// ABOUTME: Output formatting and activity type parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod display;
