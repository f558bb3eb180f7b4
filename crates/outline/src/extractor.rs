use crate::config::OutlineConfig;
use crate::error::{ExtractError, Result};
use crate::types::PayloadSource;
use regex::Regex;
use serde_json::Value;

/// Deepest JSON nesting kept when decoding; serde_json refuses more than 128.
const MAX_JSON_NESTING: usize = 120;

/// Closing markers tried before giving up on marker-delimited payloads
const MAX_MARKER_CANDIDATES: usize = 8;

/// A payload isolated from model output
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPayload {
    pub value: Value,
    pub source: PayloadSource,
    /// Containers nested too deeply were replaced with `null` before decoding
    pub pruned: bool,
}

/// Locates and decodes the structured payload embedded in model output
#[derive(Debug, Clone)]
pub struct PayloadExtractor {
    open: Regex,
    close: Regex,
    accept_direct_payload: bool,
}

impl PayloadExtractor {
    /// Create an extractor for the configured marker tag
    pub fn new(config: &OutlineConfig) -> Result<Self> {
        let tag = regex::escape(&config.marker_tag);
        Ok(Self {
            open: Regex::new(&format!(r"(?i)<\s*{tag}\s*>"))?,
            close: Regex::new(&format!(r"(?i)<\s*/\s*{tag}\s*>"))?,
            accept_direct_payload: config.accept_direct_payload,
        })
    }

    /// Extract the payload, or `None` when the output carries nothing usable
    pub fn extract(&self, raw: &str) -> Option<Value> {
        self.try_extract(raw).ok().map(|payload| payload.value)
    }

    /// Extract the payload and report why it failed
    pub fn try_extract(&self, raw: &str) -> std::result::Result<ExtractedPayload, ExtractError> {
        let result = self.locate(raw);
        match &result {
            Ok(payload) if payload.pruned => log::warn!(
                "Outline payload nested deeper than {MAX_JSON_NESTING} levels; deeper content dropped"
            ),
            Ok(_) => {}
            Err(err) => {
                log::debug!("No outline payload in model output ({} bytes): {err}", raw.len());
            }
        }
        result
    }

    fn locate(&self, raw: &str) -> std::result::Result<ExtractedPayload, ExtractError> {
        if let Some(result) = self.locate_marked(raw) {
            return result;
        }

        if !self.accept_direct_payload {
            return Err(ExtractError::MissingPayload);
        }

        let body = strip_code_fence(raw);
        if !(body.starts_with('{') || body.starts_with('[')) {
            return Err(ExtractError::MissingPayload);
        }
        decode(body, PayloadSource::Direct)
    }

    /// Pair each closing marker with the nearest opening marker before it and
    /// return the first body that decodes. `None` when no pair exists.
    fn locate_marked(&self, raw: &str) -> Option<std::result::Result<ExtractedPayload, ExtractError>> {
        let opens: Vec<usize> = self.open.find_iter(raw).map(|m| m.end()).collect();
        let mut first_error = None;

        for close in self.close.find_iter(raw).take(MAX_MARKER_CANDIDATES) {
            let preceding = opens.partition_point(|&end| end <= close.start());
            let Some(&body_start) = preceding.checked_sub(1).and_then(|i| opens.get(i)) else {
                continue;
            };

            let body = strip_code_fence(&raw[body_start..close.start()]);
            let attempt = if body.is_empty() {
                Err(ExtractError::EmptyPayload)
            } else {
                decode(body, PayloadSource::Marker)
            };
            match attempt {
                Ok(payload) => return Some(Ok(payload)),
                Err(err) if first_error.is_none() => first_error = Some(err),
                Err(_) => {}
            }
        }

        first_error.map(Err)
    }
}

fn decode(body: &str, source: PayloadSource) -> std::result::Result<ExtractedPayload, ExtractError> {
    let pruned = prune_nesting(body, MAX_JSON_NESTING);
    let value: Value = serde_json::from_str(pruned.as_deref().unwrap_or(body))?;
    match value {
        Value::Object(_) | Value::Array(_) => Ok(ExtractedPayload {
            value,
            source,
            pruned: pruned.is_some(),
        }),
        _ => Err(ExtractError::NotStructured),
    }
}

/// Replace every container nested deeper than `limit` with `null`.
///
/// Returns `None` when nothing had to be cut. Malformed input is passed
/// through as far as it goes; the decoder reports it.
fn prune_nesting(body: &str, limit: usize) -> Option<String> {
    let bytes = body.as_bytes();
    let mut out: Option<String> = None;
    let mut copied = 0;
    let mut depth = 0usize;
    let mut scan = StringScan::default();
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        if scan.in_string(byte) {
            i += 1;
            continue;
        }
        match byte {
            b'{' | b'[' if depth == limit => {
                let end = container_end(bytes, i);
                let out = out.get_or_insert_with(|| String::with_capacity(body.len()));
                out.push_str(&body[copied..i]);
                out.push_str("null");
                copied = end;
                i = end;
                continue;
            }
            b'{' | b'[' => depth += 1,
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
        i += 1;
    }

    let mut out = out?;
    out.push_str(&body[copied..]);
    Some(out)
}

/// Index just past the container opening at `start`, or the end of input
fn container_end(bytes: &[u8], start: usize) -> usize {
    let mut depth = 0usize;
    let mut scan = StringScan::default();
    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if scan.in_string(byte) {
            continue;
        }
        match byte {
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return start + offset + 1;
                }
            }
            _ => {}
        }
    }
    bytes.len()
}

/// Tracks whether a byte is inside a JSON string literal
#[derive(Default)]
struct StringScan {
    inside: bool,
    escaped: bool,
}

impl StringScan {
    /// Feed one byte; `true` when it belongs to a string literal (quotes included)
    fn in_string(&mut self, byte: u8) -> bool {
        if self.inside {
            if self.escaped {
                self.escaped = false;
            } else if byte == b'\\' {
                self.escaped = true;
            } else if byte == b'"' {
                self.inside = false;
            }
            return true;
        }
        if byte == b'"' {
            self.inside = true;
            return true;
        }
        false
    }
}

fn strip_code_fence(value: &str) -> &str {
    let trimmed = value.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`, `JSON`, ...) up to the end of the line.
    let rest = match rest.find('\n') {
        Some(newline) if rest[..newline].chars().all(|c| c.is_ascii_alphanumeric()) => {
            &rest[newline + 1..]
        }
        _ => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    rest.trim().trim_end_matches("```").trim()
}
