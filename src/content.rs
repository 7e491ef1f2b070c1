// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Rich content validation for blog posts, plus link validation.
//!
//! Blog content goes through three stages:
//! - attack signature scan
//! - tag allow-list check (disallowed tags reject the post)
//! - removal of script blocks, inline event handlers and `javascript:` URIs

use crate::error::GuardError;
use crate::patterns::detect;
use crate::verdict::Verdict;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script>").expect("script block pattern is valid")
});

static EVENT_HANDLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)on[a-z0-9_]+="[^"]*""#).expect("event handler pattern is valid")
});

static JAVASCRIPT_URI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").expect("javascript uri pattern is valid"));

/// Blog post content validator.
#[derive(Debug, Clone)]
pub struct ContentValidator {
    allowed_tags: Vec<String>,
}

impl ContentValidator {
    /// Create a validator permitting the given tag names.
    pub fn new(allowed_tags: Vec<String>) -> Self {
        Self {
            allowed_tags: allowed_tags
                .into_iter()
                .map(|tag| tag.trim().to_ascii_lowercase())
                .filter(|tag| !tag.is_empty())
                .collect(),
        }
    }

    pub fn allowed_tags(&self) -> &[String] {
        &self.allowed_tags
    }

    /// Validate blog post content and return its sanitized form.
    pub fn validate_blog_post(&self, content: &str) -> Verdict<String> {
        if let Some(kind) = detect(content).threat() {
            return Verdict::Invalid(GuardError::MaliciousContent(kind));
        }

        if let Some(tag) = self.find_disallowed_tag(content) {
            debug!(tag = %tag, "Disallowed tag in content");
            return Verdict::Invalid(GuardError::DisallowedHtmlTag { tag });
        }

        Verdict::Valid(strip_active_content(content))
    }

    /// Find the first `<...>` construct whose name is not allow-listed.
    ///
    /// A construct is `<`, at least one non-`>` character, then `>`. It is
    /// allowed when the text after `<` (and an optional `/`) starts with an
    /// allowed tag name followed by a non-word character.
    fn find_disallowed_tag(&self, content: &str) -> Option<String> {
        let bytes = content.as_bytes();
        for (i, _) in content.match_indices('<') {
            let rest = &bytes[i + 1..];
            match rest.iter().position(|&b| b == b'>') {
                Some(close) if close > 0 => {}
                _ => continue,
            }

            let name = rest.strip_prefix(b"/").unwrap_or(rest);
            if !self.starts_with_allowed_tag(name) {
                let tag_len = name.iter().take_while(|b| is_word_byte(**b)).count();
                return Some(String::from_utf8_lossy(&name[..tag_len]).to_ascii_lowercase());
            }
        }
        None
    }

    fn starts_with_allowed_tag(&self, name: &[u8]) -> bool {
        self.allowed_tags.iter().any(|tag| {
            let tag = tag.as_bytes();
            name.len() >= tag.len()
                && name[..tag.len()].eq_ignore_ascii_case(tag)
                && name.get(tag.len()).map_or(true, |b| !is_word_byte(*b))
        })
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Remove script blocks, quoted inline event handlers and `javascript:`.
fn strip_active_content(content: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(content, "");
    let without_handlers = EVENT_HANDLER.replace_all(&without_scripts, "");
    JAVASCRIPT_URI
        .replace_all(&without_handlers, "")
        .into_owned()
}

/// Validate that `raw` is an absolute http or https URL.
pub fn validate_url(raw: &str) -> Verdict<Url> {
    let parsed = match Url::parse(raw) {
        Ok(u) => u,
        Err(_) => {
            debug!(url = %raw, "Invalid URL format");
            return Verdict::Invalid(GuardError::InvalidUrl);
        }
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        debug!(url = %raw, scheme = parsed.scheme(), "Rejected URL scheme");
        return Verdict::Invalid(GuardError::InvalidProtocol {
            scheme: parsed.scheme().to_string(),
        });
    }

    Verdict::Valid(parsed)
}
