//! URL-fragment sharing codec.
//!
//! A token is the compact JSON of [`SharedSources`] in base64 with the
//! URL-safe alphabet (`-`, `_`) and no `=` padding.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedSources {
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub css: String,
    #[serde(default)]
    pub js: String,
}

impl SharedSources {
    pub fn is_empty(&self) -> bool {
        self.html.is_empty() && self.css.is_empty() && self.js.is_empty()
    }
}

pub fn encode(sources: &SharedSources) -> String {
    // A struct of three strings always serializes.
    let json = serde_json::to_vec(sources).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

pub fn to_fragment(sources: &SharedSources) -> String {
    format!("#{}", encode(sources))
}

pub fn decode(token: &str) -> Option<SharedSources> {
    let token = token.trim().trim_start_matches('#');
    if token.is_empty() {
        return None;
    }

    let mut standard: String = token
        .chars()
        .map(|ch| match ch {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    while standard.len() % 4 != 0 {
        standard.push('=');
    }

    let bytes = match STANDARD.decode(standard.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "share token is not valid base64");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(sources) => Some(sources),
        Err(e) => {
            tracing::warn!(error = %e, "share token does not hold sources");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/share.rs"]
mod tests;
