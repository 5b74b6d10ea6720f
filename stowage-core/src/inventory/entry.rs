//! Stored item stacks.

use serde::{Deserialize, Serialize};
use stowage_utils::GridPos;

/// The key deciding which entries may share a stack.
///
/// Two entries are only ever merged when their keys are equal; the core never
/// looks inside an entry's payload to decide that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StackKey {
    /// The item name.
    pub name: String,
    /// The item quality level.
    #[serde(default)]
    pub quality: i32,
    /// The item variant.
    #[serde(default)]
    pub variant: i32,
}

impl StackKey {
    /// Creates a key with default quality and variant.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quality: 0,
            variant: 0,
        }
    }
}

/// One item stack stored at a grid position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// The stack-compatibility key.
    pub key: StackKey,
    /// Number of items in the stack. Anything `<= 0` is not a real entry.
    pub count: i32,
    /// The largest count this stack can hold.
    #[serde(default = "default_max_stack_size")]
    pub max_stack_size: i32,
    /// Where the stack sits in its container.
    pub pos: GridPos,
    /// Host data carried through untouched.
    #[serde(default, with = "payload")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub payload: Vec<u8>,
}

const fn default_max_stack_size() -> i32 {
    1
}

impl Entry {
    /// Creates an entry without payload.
    #[must_use]
    pub fn new(key: StackKey, count: i32, max_stack_size: i32, pos: GridPos) -> Self {
        Self {
            key,
            count,
            max_stack_size,
            pos,
            payload: Vec::new(),
        }
    }

    /// Attaches an opaque payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    /// Returns true if this entry holds nothing and should be dropped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count <= 0
    }

    /// Returns whether more than one item fits in this stack.
    #[must_use]
    pub fn is_stackable(&self) -> bool {
        self.max_stack_size > 1
    }

    /// Returns how many more items this stack can take.
    #[must_use]
    pub fn remaining_space(&self) -> i32 {
        (self.max_stack_size - self.count).max(0)
    }

    /// Increases the count.
    pub fn grow(&mut self, amount: i32) {
        self.count += amount;
    }

    /// Decreases the count.
    pub fn shrink(&mut self, amount: i32) {
        self.count -= amount;
    }
}

/// The default stacking predicate: equal keys and a stack size above one.
#[must_use]
pub fn same_stack(a: &Entry, b: &Entry) -> bool {
    a.key == b.key && a.is_stackable()
}

/// Payload bytes travel as base64 in text formats.
mod payload {
    use base64::{Engine, prelude::BASE64_STANDARD};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64_STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64_STANDARD.decode(encoded).map_err(D::Error::custom)
    }
}
