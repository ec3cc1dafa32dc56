//! Content fingerprints over declared record fields.
//!
//! A fingerprint gates re-validation, not a security boundary: collisions only
//! mean a stale verdict might be served, so a fast non-cryptographic hash is
//! enough. Each record type lists its own hashable fields through
//! [`Validatable::hash_fields`], so unrelated object state never leaks in.

use xxhash_rust::xxh32::Xxh32;

use crate::Validatable;

const SEED: u32 = 0x5EED_C0DE;

/// Streaming hasher with typed, order-stable field writers.
///
/// Variable-length values are length-prefixed so adjacent fields cannot
/// alias each other (`"ab" + "c"` hashes differently from `"a" + "bc"`).
pub struct FieldHasher {
    inner: Xxh32,
}

impl FieldHasher {
    pub fn new() -> Self {
        Self {
            inner: Xxh32::new(SEED),
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_bytes(&[value as u8]);
    }

    /// Hashes the bit pattern. `-0.0` is folded into `0.0`.
    pub fn write_f32(&mut self, value: f32) {
        let value = if value == 0.0 { 0.0 } else { value };
        self.write_u32(value.to_bits());
    }

    /// Hashes the bit pattern. `-0.0` is folded into `0.0`.
    pub fn write_f64(&mut self, value: f64) {
        let value = if value == 0.0 { 0.0 } else { value };
        self.write_u64(value.to_bits());
    }

    pub fn write_str(&mut self, value: &str) {
        self.write_u64(value.len() as u64);
        self.write_bytes(value.as_bytes());
    }

    pub fn write_opt_str(&mut self, value: Option<&str>) {
        match value {
            Some(v) => {
                self.write_bool(true);
                self.write_str(v);
            }
            None => self.write_bool(false),
        }
    }

    pub fn write_strs<S: AsRef<str>>(&mut self, values: &[S]) {
        self.write_u64(values.len() as u64);
        for value in values {
            self.write_str(value.as_ref());
        }
    }

    pub fn finish(&self) -> u32 {
        self.inner.digest()
    }
}

impl Default for FieldHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes the fingerprint of `object`: its type tag, then its declared fields.
pub fn fingerprint(object: &dyn Validatable) -> u32 {
    let mut hasher = FieldHasher::new();
    hasher.write_str(object.type_tag().name());
    object.hash_fields(&mut hasher);
    hasher.finish()
}
