//! Identifier generation
//!
//! Stores call an [`IdGenerator`] when a record is inserted without an `_id`.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use uuid::Uuid;

/// Default identifier length of [`RandomIds`]
pub const DEFAULT_ID_LENGTH: usize = 17;

/// Alphabet without look-alike characters (no 0/O, 1/l/I)
const UNMISTAKABLE_CHARS: &[u8] = b"23456789ABCDEFGHJKLMNPQRSTWXYZabcdefghijkmnopqrstuvwxyz";

/// Produces opaque unique identifiers
pub trait IdGenerator: Send + Sync {
    fn new_id(&self) -> String;
}

/// Random fixed-length identifiers
#[derive(Debug, Clone)]
pub struct RandomIds {
    length: usize,
}

impl RandomIds {
    pub fn new() -> Self {
        Self::with_length(DEFAULT_ID_LENGTH)
    }

    pub fn with_length(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for RandomIds {
    fn new_id(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..self.length)
            .map(|_| UNMISTAKABLE_CHARS[rng.gen_range(0..UNMISTAKABLE_CHARS.len())] as char)
            .collect()
    }
}

/// Time-ordered UUIDv7 identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn new_id(&self) -> String {
        Uuid::now_v7().to_string()
    }
}

/// Deterministic `prefix-1`, `prefix-2`, … identifiers
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn new_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_random_ids_have_fixed_length_and_alphabet() {
        let ids = RandomIds::new();
        for _ in 0..50 {
            let id = ids.new_id();
            assert_eq!(id.len(), DEFAULT_ID_LENGTH);
            assert!(id.bytes().all(|b| UNMISTAKABLE_CHARS.contains(&b)));
        }
    }

    #[test]
    fn test_random_ids_are_distinct() {
        let ids = RandomIds::with_length(24);
        let generated: HashSet<String> = (0..200).map(|_| ids.new_id()).collect();
        assert_eq!(generated.len(), 200);
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new("author");
        assert_eq!(ids.new_id(), "author-1");
        assert_eq!(ids.new_id(), "author-2");
    }

    #[test]
    fn test_uuid_ids() {
        let id = UuidIds.new_id();
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
