//! Bounded client-side response cache.

use std::collections::{HashMap, VecDeque};

/// Maximum number of cached responses.
pub const RESPONSE_CACHE_CAPACITY: usize = 50;

/// Normalizes a user message into a cache key (trimmed, lower-cased).
pub fn normalize_key(message: &str) -> String {
    message.trim().to_lowercase()
}

/// Maps normalized user messages to the last bot response.
///
/// Eviction is strictly by insertion order: reading an entry never changes
/// its position, and overwriting an existing key keeps its original slot.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    entries: HashMap<String, String>,
    order: VecDeque<String>,
    capacity: usize,
}

impl ResponseCache {
    /// Creates an empty cache holding at most [`RESPONSE_CACHE_CAPACITY`] entries.
    pub fn new() -> Self {
        Self::with_capacity(RESPONSE_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    /// Looks up a response for the given message.
    ///
    /// The message is normalized before lookup.
    pub fn get(&self, message: &str) -> Option<&str> {
        self.entries.get(&normalize_key(message)).map(String::as_str)
    }

    pub fn contains(&self, message: &str) -> bool {
        self.entries.contains_key(&normalize_key(message))
    }

    /// Stores a response, returning the evicted key if the bound was exceeded.
    pub fn insert(&mut self, message: &str, response: impl Into<String>) -> Option<String> {
        let key = normalize_key(message);
        if self.entries.insert(key.clone(), response.into()).is_none() {
            self.order.push_back(key);
        }

        if self.entries.len() > self.capacity {
            let oldest = self.order.pop_front()?;
            self.entries.remove(&oldest);
            return Some(oldest);
        }
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from oldest to newest insertion.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
