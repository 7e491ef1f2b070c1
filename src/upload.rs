// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Upload constraint checks.

use crate::config::UploadConfig;
use crate::error::GuardError;
use crate::verdict::Verdict;
use tracing::debug;

const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Check a declared upload against the allowed MIME types and size cap.
/// The type is checked before the size.
pub fn validate_file_upload(content_type: &str, size: u64, config: &UploadConfig) -> Verdict<()> {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase();

    if !config
        .allowed_types
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&media_type))
    {
        debug!(content_type = %media_type, "Upload type rejected");
        return Verdict::Invalid(GuardError::InvalidFileType { actual: media_type });
    }

    if size > config.max_size_bytes {
        debug!(size, max = config.max_size_bytes, "Upload too large");
        return Verdict::Invalid(GuardError::FileTooLarge {
            limit: format_bytes(config.max_size_bytes, 2),
        });
    }

    Verdict::Valid(())
}

/// Render a byte count with 1024-based units, dropping trailing zeros.
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rendered = format!("{value:.decimals$}");
    let rendered = if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.')
    } else {
        rendered.as_str()
    };
    format!("{rendered} {}", UNITS[unit])
}
