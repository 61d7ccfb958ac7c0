//! The binary result payload stored with each indexed document.
//!
//! The index engine treats the per-document payload as opaque bytes;
//! this module owns its layout, which therefore must stay stable
//! across engine upgrades. The format is length-prefixed rather than
//! delimiter-based so any byte content round-trips, embedded NULs
//! and non-UTF8 included.

use crate::core::error::{Result, SitefindError};

/// Bytes per length prefix
const LEN_FIELD: usize = 4;

/// The four stored fields of one search result, in payload order.
///
/// Invariant: `ResultRecord::unpack(&r.pack()) == r` for any field
/// contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultRecord {
    pub path: Vec<u8>,
    pub title: Vec<u8>,
    pub description: Vec<u8>,
    pub url: Vec<u8>,
}

impl ResultRecord {
    /// Serialize to the stored payload layout: four 4-byte
    /// native-endian lengths (path, title, description, url) followed
    /// by the four byte sequences concatenated in the same order. No
    /// padding, no terminator, no escaping.
    pub fn pack(&self) -> Vec<u8> {
        let total = 4 * LEN_FIELD
            + self.path.len()
            + self.title.len()
            + self.description.len()
            + self.url.len();
        let mut out = Vec::with_capacity(total);

        for field in [&self.path, &self.title, &self.description, &self.url] {
            out.extend_from_slice(&(field.len() as u32).to_ne_bytes());
        }
        for field in [&self.path, &self.title, &self.description, &self.url] {
            out.extend_from_slice(field);
        }
        out
    }

    /// Reconstruct a record from a payload previously produced by
    /// [`pack`](Self::pack).
    ///
    /// The caller normally guarantees provenance (the payload comes
    /// straight back from the document store); a buffer that does not
    /// slice cleanly is reported as [`SitefindError::Payload`] rather
    /// than read out of bounds.
    pub fn unpack(payload: &[u8]) -> Result<Self> {
        if payload.len() < 4 * LEN_FIELD {
            return Err(SitefindError::Payload(format!(
                "payload header truncated ({} bytes)",
                payload.len()
            )));
        }

        let mut lengths = [0usize; 4];
        for (slot, chunk) in lengths.iter_mut().zip(payload.chunks_exact(LEN_FIELD)) {
            let mut raw = [0u8; LEN_FIELD];
            raw.copy_from_slice(chunk);
            *slot = u32::from_ne_bytes(raw) as usize;
        }

        let body = &payload[4 * LEN_FIELD..];
        let expected: usize = lengths.iter().sum();
        if body.len() != expected {
            return Err(SitefindError::Payload(format!(
                "payload body is {} bytes, lengths say {expected}",
                body.len()
            )));
        }

        let (path, rest) = body.split_at(lengths[0]);
        let (title, rest) = rest.split_at(lengths[1]);
        let (description, url) = rest.split_at(lengths[2]);

        Ok(Self {
            path: path.to_vec(),
            title: title.to_vec(),
            description: description.to_vec(),
            url: url.to_vec(),
        })
    }
}
