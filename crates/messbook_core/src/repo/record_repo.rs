//! Versioned record blobs over a [`KeyValueStore`].
//!
//! # Responsibility
//! - Map each persisted record to its fixed storage key.
//! - Wrap payloads in a `{"schema_version", "data"}` envelope on write.
//! - Degrade to seed values on read instead of surfacing errors.
//!
//! # Invariants
//! - Bare payloads without an envelope are accepted as version 0.
//! - Envelopes newer than [`RECORD_SCHEMA_VERSION`] are treated as unreadable.

use crate::repo::kv_repo::{KeyValueStore, StoreError, StoreResult};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope version written by this build.
pub const RECORD_SCHEMA_VERSION: u32 = 1;

const SCHEMA_VERSION_FIELD: &str = "schema_version";

/// Persisted records and their storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKey {
    Members,
    OtherExpenses,
    Calendar,
    Theme,
}

impl RecordKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Members => "messMembers",
            Self::OtherExpenses => "messOtherExpenses",
            Self::Calendar => "messCalendarData",
            Self::Theme => "messTheme",
        }
    }
}

/// Where a loaded record value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSource {
    /// Decoded from a current-format envelope.
    Stored,
    /// Decoded from a bare pre-envelope payload.
    Legacy,
    /// Key was absent.
    SeedMissing,
    /// Blob existed but could not be decoded.
    SeedMalformed,
    /// The store itself failed to read.
    SeedUnreadable,
}

impl RecordSource {
    pub fn is_seed(self) -> bool {
        matches!(
            self,
            Self::SeedMissing | Self::SeedMalformed | Self::SeedUnreadable
        )
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Stored => "stored",
            Self::Legacy => "legacy",
            Self::SeedMissing => "seed_missing",
            Self::SeedMalformed => "seed_malformed",
            Self::SeedUnreadable => "seed_unreadable",
        }
    }
}

/// Record value plus its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub value: T,
    pub source: RecordSource,
}

#[derive(Serialize)]
struct EnvelopeOut<'a, T> {
    schema_version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct EnvelopeIn {
    schema_version: u32,
    data: Value,
}

/// Loads one record, falling back to `seed()` on any failure.
pub fn load_record<T, S, F>(store: &S, key: RecordKey, seed: F) -> Loaded<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
    F: FnOnce() -> T,
{
    let raw = match store.load(key.as_str()) {
        Ok(Some(raw)) => raw,
        Ok(None) => return seeded(key, seed, RecordSource::SeedMissing),
        Err(err) => {
            warn!(
                "event=record_load module=repo status=error key={} error={}",
                key.as_str(),
                err
            );
            return seeded(key, seed, RecordSource::SeedUnreadable);
        }
    };

    match decode_record(&raw) {
        Ok((value, source)) => {
            debug!(
                "event=record_load module=repo status=ok key={} source={}",
                key.as_str(),
                source.as_str()
            );
            Loaded { value, source }
        }
        Err(reason) => {
            warn!(
                "event=record_load module=repo status=fallback key={} reason={}",
                key.as_str(),
                reason
            );
            seeded(key, seed, RecordSource::SeedMalformed)
        }
    }
}

/// Serializes `value` in the current envelope and writes it under `key`.
pub fn save_record<T, S>(store: &S, key: RecordKey, value: &T) -> StoreResult<()>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let encoded = encode_record(value).map_err(|source| StoreError::Encode {
        key: key.as_str().to_string(),
        source,
    })?;
    store.save(key.as_str(), &encoded)?;
    debug!(
        "event=record_save module=repo status=ok key={} bytes={}",
        key.as_str(),
        encoded.len()
    );
    Ok(())
}

/// Encodes a record payload in the current envelope format.
pub fn encode_record<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(&EnvelopeOut {
        schema_version: RECORD_SCHEMA_VERSION,
        data: value,
    })
}

/// Decodes either an envelope or a bare legacy payload.
pub fn decode_record<T: DeserializeOwned>(raw: &str) -> Result<(T, RecordSource), String> {
    let parsed: Value = serde_json::from_str(raw).map_err(|err| format!("invalid json: {err}"))?;

    let is_envelope = parsed
        .as_object()
        .is_some_and(|object| object.contains_key(SCHEMA_VERSION_FIELD));
    if !is_envelope {
        let value = serde_json::from_value(parsed)
            .map_err(|err| format!("invalid legacy payload: {err}"))?;
        return Ok((value, RecordSource::Legacy));
    }

    let envelope: EnvelopeIn =
        serde_json::from_value(parsed).map_err(|err| format!("invalid envelope: {err}"))?;
    if envelope.schema_version > RECORD_SCHEMA_VERSION {
        return Err(format!(
            "schema version {} is newer than supported {}",
            envelope.schema_version, RECORD_SCHEMA_VERSION
        ));
    }
    let value = serde_json::from_value(envelope.data)
        .map_err(|err| format!("invalid payload: {err}"))?;
    Ok((value, RecordSource::Stored))
}

fn seeded<T>(key: RecordKey, seed: impl FnOnce() -> T, source: RecordSource) -> Loaded<T> {
    debug!(
        "event=record_seed module=repo status=ok key={} source={}",
        key.as_str(),
        source.as_str()
    );
    Loaded {
        value: seed(),
        source,
    }
}
