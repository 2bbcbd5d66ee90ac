// ABOUTME: Test helper module organization
// ABOUTME: Exposes the axum test request builder shared across integration tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlanHub

#![allow(dead_code)]

pub mod axum_test;
