// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Validation verdicts.

use crate::error::{GuardError, Result};

/// Result of a validation pass, carrying the sanitized value when valid.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict<T> {
    /// Input accepted; holds the sanitized form
    Valid(T),
    /// Input rejected
    Invalid(GuardError),
}

impl<T> Verdict<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid(_))
    }

    pub fn error(&self) -> Option<&GuardError> {
        match self {
            Verdict::Valid(_) => None,
            Verdict::Invalid(e) => Some(e),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Verdict::Valid(v) => Some(v),
            Verdict::Invalid(_) => None,
        }
    }

    pub fn into_result(self) -> Result<T> {
        match self {
            Verdict::Valid(v) => Ok(v),
            Verdict::Invalid(e) => Err(e),
        }
    }
}

