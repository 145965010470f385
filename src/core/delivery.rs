//! Batches and the delivery seam
//!
//! A [`Batch`] is what a dispatcher accumulates between flushes; a [`Deliver`]
//! implementation is what it hands each batch to.

use super::error::DeliveryError;
use super::record::Record;
use serde::{Deserialize, Serialize};

/// Records coalesced for a single delivery attempt.
///
/// Serializes as `{"logentries":[...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    #[serde(rename = "logentries")]
    entries: Vec<Record>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, record: Record) {
        self.entries.push(record);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in arrival order.
    pub fn records(&self) -> &[Record] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl From<Vec<Record>> for Batch {
    fn from(entries: Vec<Record>) -> Self {
        Self { entries }
    }
}

impl FromIterator<Record> for Batch {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Encode a batch into its JSON wire form.
pub fn encode_batch(batch: &Batch) -> Result<Vec<u8>, DeliveryError> {
    serde_json::to_vec(batch).map_err(DeliveryError::Serialization)
}

/// Makes one attempt to hand a batch to its destination.
///
/// Implementations never retry; the caller decides what a failure means.
/// Closures of the right shape implement this trait, which keeps tests free of
/// any transport.
pub trait Deliver: Send + 'static {
    fn deliver(&mut self, batch: &Batch) -> Result<(), DeliveryError>;
}

impl<F> Deliver for F
where
    F: FnMut(&Batch) -> Result<(), DeliveryError> + Send + 'static,
{
    fn deliver(&mut self, batch: &Batch) -> Result<(), DeliveryError> {
        self(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;

    fn sample() -> Batch {
        Batch::from(vec![
            Record::from_parts(LogLevel::Error, "main", "/x", "m.go", 10, "boom"),
            Record::from_parts(LogLevel::Info, "main", "/x", "m.go", 11, "ok"),
        ])
    }

    #[test]
    fn test_encode_batch() {
        let encoded = encode_batch(&sample()).unwrap();
        assert_eq!(
            String::from_utf8(encoded).unwrap(),
            concat!(
                r#"{"logentries":["#,
                r#"{"level":"ERROR","caller":"main","path":"/x","file":"m.go","line":10,"message":"boom"},"#,
                r#"{"level":"INFO","caller":"main","path":"/x","file":"m.go","line":11,"message":"ok"}"#,
                r#"]}"#
            )
        );
    }

    #[test]
    fn test_encoding_is_deterministic() {
        assert_eq!(encode_batch(&sample()).unwrap(), encode_batch(&sample()).unwrap());
    }

    #[test]
    fn test_decode_rejects_unknown_level() {
        let payload = r#"{"logentries":[{"level":"LOUD","caller":"c","path":"","file":"f","line":1,"message":"m"}]}"#;
        assert!(serde_json::from_str::<Batch>(payload).is_err());
    }

    #[test]
    fn test_closure_delivers() {
        let sizes = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
        let seen = std::sync::Arc::clone(&sizes);
        let mut deliver = move |batch: &Batch| -> Result<(), DeliveryError> {
            seen.lock().push(batch.len());
            Ok(())
        };
        Deliver::deliver(&mut deliver, &sample()).unwrap();
        assert_eq!(*sizes.lock(), vec![2]);
    }
}
