// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for attack simulation.

use std::net::{IpAddr, Ipv4Addr};

use super::attacks::PayloadKind;

/// Generate a pool of client identities in the 10.0.0.0/8 range.
pub fn generate_clients(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c)).to_string()
        })
        .collect()
}

/// Origins that must never pass for host `admin.example.com`.
pub fn generate_spoofed_origins() -> Vec<&'static str> {
    vec![
        "https://evil.example.net",
        "https://admin.example.com.evil.net",
        "https://evil.net/admin.example.com",
        "https://adminexample.com",
        "null",
        "file://",
        "not a url",
    ]
}

/// Payload strings for a given family.
pub fn generate_payloads(kind: PayloadKind) -> Vec<&'static str> {
    match kind {
        PayloadKind::Benign => vec![
            "<p>Ten minute morning stretch</p>",
            "<h2>Week one</h2><ul><li>Walk</li><li>Hydrate</li></ul>",
            "Plain text with no markup",
            "<blockquote>Rest is productive</blockquote>",
        ],
        PayloadKind::Xss => vec![
            "<script>alert(1)</script>",
            "<SCRIPT SRC=//evil.net/x.js>",
            "<a href=\"javascript:alert(1)\">x</a>",
            "JaVaScRiPt:void(0)",
            "<iframe src=\"data:text/html,<b>\">",
        ],
        PayloadKind::SqlInjection => vec![
            "1 UNION SELECT password FROM users",
            "x'; DROP TABLE posts; --",
            "DELETE FROM sessions",
            "a' or 1=1; update users set role='admin'",
        ],
        PayloadKind::PathTraversal => vec![
            "../../etc/passwd",
            "images/../../../secret",
            "..\\../boot.ini",
        ],
        PayloadKind::CommandInjection => vec![
            "exec(rm -rf /)",
            "system(\"id\")",
            "EVAL(payload)",
        ],
        PayloadKind::DisallowedTags => vec![
            "<div>layout</div>",
            "<iframe src=\"https://evil.net\"></iframe>",
            "<style>body{display:none}</style>",
            "<p>ok</p><form action=\"/x\">",
            "<img2>not an img</img2>",
        ],
    }
}

/// Content-Type values for bypass testing, with whether each is JSON.
pub fn generate_content_types() -> Vec<(Option<&'static str>, bool)> {
    vec![
        (Some("application/json"), true),
        (Some("application/json; charset=utf-8"), true),
        (Some("APPLICATION/JSON"), true),
        (Some("application/vnd.api+json"), true),
        (Some("application/x-www-form-urlencoded"), false),
        (Some("multipart/form-data; boundary=x"), false),
        (Some("text/plain"), false),
        (Some("text/json"), false),
        (Some("application/jsonp"), false),
        (Some(""), false),
        (None, false),
    ]
}

/// Links the admin link checker must refuse.
pub fn generate_malformed_urls() -> Vec<&'static str> {
    vec![
        "",
        "not-a-url",
        "//example.com/no-scheme",
        "javascript:alert(1)",
        "data:text/plain,hi",
        "ftp://files.example.com/",
        "file:///etc/passwd",
        "http://",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_clients() {
        let clients = generate_clients(300);
        assert_eq!(clients.len(), 300);
        assert_eq!(clients[0], "10.0.0.0");
        assert_eq!(clients[257], "10.0.1.1");
    }

    #[test]
    fn test_every_family_has_payloads() {
        for kind in [
            PayloadKind::Benign,
            PayloadKind::Xss,
            PayloadKind::SqlInjection,
            PayloadKind::PathTraversal,
            PayloadKind::CommandInjection,
            PayloadKind::DisallowedTags,
        ] {
            assert!(!generate_payloads(kind).is_empty(), "{kind:?}");
        }
    }
}
