//! Request and signature diagnostics
//!
//! Two daily append-only files support operational debugging:
//! `webhook_YYYY-MM-DD.log` holds every non-browser request, and
//! `signature_check_YYYY-MM-DD.log` holds the outcome of each signature
//! check. The signature trace never contains the secret or the expected
//! signature.

use chrono::Local;
use http::HeaderMap;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::PathBuf;
use trackhook_log::DailyFile;

/// A received request as logged
#[derive(Debug, Clone, Serialize)]
pub struct RequestRecord<'a> {
    pub time: String,
    pub request_id: &'a str,
    pub method: &'a str,
    pub headers: BTreeMap<String, String>,
    pub payload: Value,
    pub signature: Option<&'a str>,
}

impl<'a> RequestRecord<'a> {
    pub fn new(
        request_id: &'a str,
        method: &'a str,
        headers: &HeaderMap,
        body: &[u8],
        signature: Option<&'a str>,
    ) -> Self {
        Self {
            time: timestamp(),
            request_id,
            method,
            headers: header_map(headers),
            payload: serde_json::from_slice(body).unwrap_or(Value::Null),
            signature,
        }
    }
}

/// Outcome of one signature check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignatureTrace<'a> {
    pub time: String,
    pub request_id: &'a str,
    pub body_length: usize,
    pub body_sha256: String,
    pub signature_present: bool,
    pub matched: bool,
}

impl<'a> SignatureTrace<'a> {
    pub fn new(request_id: &'a str, body: &[u8], signature_present: bool, matched: bool) -> Self {
        Self {
            time: timestamp(),
            request_id,
            body_length: body.len(),
            body_sha256: hex::encode(Sha256::digest(body)),
            signature_present,
            matched,
        }
    }
}

/// Writer for the diagnostic files; a disabled instance writes nothing
#[derive(Debug, Clone)]
pub struct Diagnostics {
    files: Option<(DailyFile, DailyFile)>,
}

impl Diagnostics {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        let directory = directory.into();
        Self {
            files: Some((
                DailyFile::new(directory.clone(), "webhook"),
                DailyFile::new(directory, "signature_check"),
            )),
        }
    }

    pub fn disabled() -> Self {
        Self { files: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.files.is_some()
    }

    pub fn record_request(&self, record: &RequestRecord<'_>) {
        if let Some((requests, _)) = &self.files {
            write(requests, record);
        }
    }

    pub fn record_signature(&self, trace: &SignatureTrace<'_>) {
        tracing::debug!(
            request_id = trace.request_id,
            body_length = trace.body_length,
            body_sha256 = %trace.body_sha256,
            signature_present = trace.signature_present,
            matched = trace.matched,
            "signature check"
        );

        if let Some((_, signatures)) = &self.files {
            write(signatures, trace);
        }
    }
}

fn write<T: Serialize>(file: &DailyFile, entry: &T) {
    if let Err(e) = file.append_json(entry) {
        tracing::error!(
            path = %file.current_path().display(),
            error = %e,
            "failed to write diagnostic log entry"
        );
    }
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}
