//! Container contents persisted by the host before they are loaded live.
//!
//! The blob is an NBT root compound holding an `Items` list. Each item is a
//! compound with `x`, `y` and `name`, plus optional `quality`, `variant`,
//! `count` (default 1), `max_stack` (default 1) and `payload` (byte array).

use std::io::Cursor;

use simdnbt::owned::{BaseNbt, Nbt, NbtCompound, NbtList, NbtTag};
use stowage_utils::GridPos;
use thiserror::Error;

use crate::inventory::{Entry, StackKey};

/// Why saved contents could not be read.
#[derive(Debug, Error)]
pub enum SavedStateError {
    /// The bytes are not NBT.
    #[error("saved contents are not valid NBT: {0}")]
    Malformed(#[from] simdnbt::Error),
    /// The blob holds no root compound.
    #[error("saved contents have no root compound")]
    Empty,
    /// A field has the wrong tag type.
    #[error("saved contents field {field} has the wrong type")]
    WrongType {
        /// The field name.
        field: &'static str,
    },
    /// An item lacks a required field.
    #[error("saved item {index} is missing {field}")]
    MissingField {
        /// Index in the `Items` list.
        index: usize,
        /// The missing field.
        field: &'static str,
    },
}

/// Decodes a saved blob into positioned entries.
pub fn read_entries(bytes: &[u8]) -> Result<Vec<Entry>, SavedStateError> {
    match simdnbt::owned::read(&mut Cursor::new(bytes))? {
        Nbt::Some(root) => entries_from_nbt(&root),
        Nbt::None => Err(SavedStateError::Empty),
    }
}

/// Decodes a saved blob, logging failures and treating them as no entries.
#[must_use]
pub fn entries_or_empty(container: &str, bytes: &[u8]) -> Vec<Entry> {
    match read_entries(bytes) {
        Ok(entries) => entries,
        Err(e) => {
            log::error!("Failed to read saved contents of {container}, treating it as empty: {e}");
            Vec::new()
        }
    }
}

/// Reads entries from an already decoded root compound.
pub fn entries_from_nbt(root: &NbtCompound) -> Result<Vec<Entry>, SavedStateError> {
    let items = match root.get("Items") {
        None | Some(NbtTag::List(NbtList::Empty)) => return Ok(Vec::new()),
        Some(NbtTag::List(NbtList::Compound(items))) => items,
        Some(_) => return Err(SavedStateError::WrongType { field: "Items" }),
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| entry_from_compound(index, item))
        .collect()
}

fn entry_from_compound(index: usize, item: &NbtCompound) -> Result<Entry, SavedStateError> {
    let missing = |field: &'static str| SavedStateError::MissingField { index, field };
    let required = |field: &'static str| int(item, field).ok_or_else(|| missing(field));

    let name = match item.get("name") {
        Some(NbtTag::String(name)) => name.to_string(),
        Some(_) => return Err(SavedStateError::WrongType { field: "name" }),
        None => return Err(missing("name")),
    };

    let payload = match item.get("payload") {
        Some(NbtTag::ByteArray(bytes)) => bytes.clone(),
        Some(_) => return Err(SavedStateError::WrongType { field: "payload" }),
        None => Vec::new(),
    };

    let key = StackKey {
        name,
        quality: int(item, "quality").unwrap_or(0),
        variant: int(item, "variant").unwrap_or(0),
    };
    let pos = GridPos::new(required("x")?, required("y")?);

    Ok(Entry::new(
        key,
        int(item, "count").unwrap_or(1),
        int(item, "max_stack").unwrap_or(1),
        pos,
    )
    .with_payload(payload))
}

/// Reads an integer field stored as any integer tag up to `Int`.
fn int(compound: &NbtCompound, key: &str) -> Option<i32> {
    match compound.get(key)? {
        NbtTag::Byte(v) => Some(i32::from(*v)),
        NbtTag::Short(v) => Some(i32::from(*v)),
        NbtTag::Int(v) => Some(*v),
        _ => None,
    }
}

/// Encodes entries in the saved blob format. Empty entries are left out.
#[must_use]
pub fn write_entries(entries: &[Entry]) -> Vec<u8> {
    let items: Vec<NbtCompound> = entries
        .iter()
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut item = NbtCompound::new();
            item.insert("x", entry.pos.x);
            item.insert("y", entry.pos.y);
            item.insert("name", NbtTag::String(entry.key.name.as_str().into()));
            item.insert("quality", entry.key.quality);
            item.insert("variant", entry.key.variant);
            item.insert("count", entry.count);
            item.insert("max_stack", entry.max_stack_size);
            if !entry.payload.is_empty() {
                item.insert("payload", NbtTag::ByteArray(entry.payload.clone()));
            }
            item
        })
        .collect();

    let mut root = NbtCompound::new();
    root.insert("Items", NbtList::Compound(items));

    let mut data = Vec::new();
    BaseNbt::new("", root).write(&mut data);
    data
}
