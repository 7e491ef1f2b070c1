// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for admin guard attack simulation.
//!
//! Drives the request guard and payload validators with generated traffic
//! and collects per-outcome counts and latencies.

pub mod attacks;
pub mod generators;
pub mod metrics;
