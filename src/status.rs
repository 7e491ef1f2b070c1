// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Canonical status tones for admin records.
//!
//! One mapping covers user, ticket, post, backup and update states so every
//! admin view colours a given status the same way.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Success,
    Info,
    Warning,
    Danger,
    Muted,
    Neutral,
}

impl StatusTone {
    /// Tone for a status string. Unknown statuses are neutral.
    pub fn for_status(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "active" | "resolved" | "published" | "completed" | "installed" => Self::Success,
            "open" | "scheduled" | "available" => Self::Info,
            "in_progress" | "pending" => Self::Warning,
            "suspended" | "failed" => Self::Danger,
            "draft" => Self::Muted,
            _ => Self::Neutral,
        }
    }

    /// Utility classes used by the admin panel.
    pub fn classes(&self) -> &'static str {
        match self {
            Self::Success => "text-green-600 bg-green-100",
            Self::Info => "text-blue-600 bg-blue-100",
            Self::Warning => "text-yellow-600 bg-yellow-100",
            Self::Danger => "text-red-600 bg-red-100",
            Self::Muted => "text-gray-400 bg-gray-100",
            Self::Neutral => "text-gray-600 bg-gray-100",
        }
    }
}
