// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Random tokens for admin forms and links.

use rand::{rngs::OsRng, RngCore};

/// Default token size in bytes.
pub const DEFAULT_TOKEN_BYTES: usize = 32;

/// `len` bytes from the OS RNG, hex encoded (so `2 * len` characters).
pub fn generate_secure_token(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
