use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use crate::http_client::http_client;
use crate::payload::{AnalyticsPayload, parse_payload_json};

/// Where the analytics document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    File(PathBuf),
    Url(String),
}

impl PayloadSource {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            PayloadSource::Url(trimmed.to_string())
        } else {
            PayloadSource::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for PayloadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadSource::File(path) => write!(f, "{}", path.display()),
            PayloadSource::Url(url) => f.write_str(url),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedPayload {
    pub payload: AnalyticsPayload,
    pub fingerprint: String,
}

pub fn read_source(source: &PayloadSource, timeout: Duration) -> Result<String> {
    match source {
        PayloadSource::File(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        PayloadSource::Url(url) => {
            let client = http_client(timeout)?;
            client
                .get(url)
                .send()
                .with_context(|| format!("request to {url} failed"))?
                .error_for_status()
                .with_context(|| format!("{url} returned an error status"))?
                .text()
                .context("failed to read response body")
        }
    }
}

pub fn load_payload(source: &PayloadSource, timeout: Duration) -> Result<LoadedPayload> {
    let raw = read_source(source, timeout)?;
    let payload = parse_payload_json(&raw).with_context(|| format!("bad payload from {source}"))?;
    Ok(LoadedPayload {
        payload,
        fingerprint: payload_fingerprint(&raw),
    })
}

/// Short sha256 hex of the raw body, used to spot an unchanged re-upload.
pub fn payload_fingerprint(raw: &str) -> String {
    let digest = Sha256::digest(raw.as_bytes());
    digest.iter().take(8).map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_and_paths_are_told_apart() {
        assert_eq!(
            PayloadSource::parse(" HTTPS://example.org/analytics.json "),
            PayloadSource::Url("HTTPS://example.org/analytics.json".to_string())
        );
        assert_eq!(
            PayloadSource::parse("data/analytics.json"),
            PayloadSource::File(PathBuf::from("data/analytics.json"))
        );
    }

    #[test]
    fn fingerprint_is_stable() {
        let a = payload_fingerprint("{\"per_event\":[]}");
        assert_eq!(a.len(), 16);
        assert_eq!(a, payload_fingerprint("{\"per_event\":[]}"));
        assert_ne!(a, payload_fingerprint("{}"));
    }
}
