//! Batch generator
//!
//! Builds one batch per call: a random number of messages sampled from the
//! reference data, each integrity-tagged, serialized as compact JSON, and
//! sealed into an encrypted envelope. Envelopes join into a single codec
//! stream ready for a batch frame.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use serde_json::{json, Map, Value};

use pulse_crypto::{tag_message, EnvelopeCipher};

use crate::reference::ReferenceData;

/// One generated batch, ready to frame
#[derive(Debug, Clone)]
pub struct GeneratedBatch {
    /// Codec-encoded envelope stream
    pub stream: String,

    /// Number of envelopes in the stream
    pub message_count: usize,
}

/// Batch generator over reference data
pub struct BatchGenerator {
    reference: Arc<ReferenceData>,
    cipher: EnvelopeCipher,
    batch_min: usize,
    batch_max: usize,
}

impl BatchGenerator {
    /// Create a generator
    ///
    /// `batch_min..=batch_max` is the inclusive range batch sizes are drawn
    /// from, uniformly.
    pub fn new(
        reference: Arc<ReferenceData>,
        cipher: EnvelopeCipher,
        batch_min: usize,
        batch_max: usize,
    ) -> Self {
        debug_assert!(batch_min >= 1 && batch_min <= batch_max);
        Self {
            reference,
            cipher,
            batch_min,
            batch_max,
        }
    }

    /// Generate one batch
    pub fn generate(&self) -> GeneratedBatch {
        let mut rng = rand::rng();
        let count = rng.random_range(self.batch_min..=self.batch_max);

        let envelopes: Vec<String> = (0..count).map(|_| self.seal_message(&mut rng)).collect();

        GeneratedBatch {
            stream: pulse_protocol::encode(&envelopes),
            message_count: count,
        }
    }

    /// Build, tag, serialize, and encrypt one message
    fn seal_message<R: Rng>(&self, rng: &mut R) -> String {
        let mut fields = Map::new();
        fields.insert("name".to_string(), json!(self.reference.sample_name(rng)));
        fields.insert(
            "origin".to_string(),
            json!(self.reference.sample_origin(rng)),
        );
        fields.insert(
            "destination".to_string(),
            json!(self.reference.sample_destination(rng)),
        );
        fields.insert("timestamp".to_string(), json!(Utc::now().to_rfc3339()));

        let tagged = tag_message(fields);
        let bytes = Value::Object(tagged).to_string();
        self.cipher.encrypt(bytes.as_bytes())
    }
}

impl std::fmt::Debug for BatchGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchGenerator")
            .field("batch_min", &self.batch_min)
            .field("batch_max", &self.batch_max)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod generator_test;
