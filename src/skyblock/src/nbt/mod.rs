//! Tag tree for Skyblock item data
//!
//! Hypixel ships inventories as base64-encoded, gzip-compressed binary tag
//! data (the same format Minecraft uses for item stacks). [`Tag`] is the
//! decoded tree. Every accessor returns `Option`, so parsers can walk deeply
//! optional structure without failing on a missing or wrong-shaped node.
//!
//! ```
//! use skyblock::nbt::Tag;
//!
//! let item = Tag::compound([("Count", Tag::Byte(3))]);
//! assert_eq!(item.at("Count").and_then(Tag::as_i64), Some(3));
//! assert!(item.at("tag.display.Name").is_none());
//! ```

mod reader;

pub use reader::{decode_base64_tag, decode_inventory_data, read_root};

use std::collections::BTreeMap;

/// Wire ids for each tag kind
pub mod id {
    pub const END: u8 = 0;
    pub const BYTE: u8 = 1;
    pub const SHORT: u8 = 2;
    pub const INT: u8 = 3;
    pub const LONG: u8 = 4;
    pub const FLOAT: u8 = 5;
    pub const DOUBLE: u8 = 6;
    pub const BYTE_ARRAY: u8 = 7;
    pub const STRING: u8 = 8;
    pub const LIST: u8 = 9;
    pub const COMPOUND: u8 = 10;
    pub const INT_ARRAY: u8 = 11;
    pub const LONG_ARRAY: u8 = 12;
}

/// A decoded tag node
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<Tag>),
    Compound(BTreeMap<String, Tag>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

/// Errors that can occur while decoding a tag blob
#[derive(Debug, thiserror::Error)]
pub enum NbtError {
    #[error("Invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Decompression failed: {0}")]
    Decompress(std::io::Error),

    #[error("Unexpected end of tag data")]
    UnexpectedEof,

    #[error("Unknown tag id: {0}")]
    UnknownTag(u8),

    #[error("Negative length: {0}")]
    NegativeLength(i32),

    #[error("Tag nesting exceeds {0} levels")]
    TooDeep(usize),

    #[error("Root tag is not a compound (id {0})")]
    RootNotCompound(u8),

    #[error("Missing root key: {0}")]
    MissingKey(String),
}

impl Tag {
    /// Build a compound from key/value pairs
    pub fn compound<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Tag)>,
    {
        Tag::Compound(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Wire id of this tag
    pub fn type_id(&self) -> u8 {
        match self {
            Tag::Byte(_) => id::BYTE,
            Tag::Short(_) => id::SHORT,
            Tag::Int(_) => id::INT,
            Tag::Long(_) => id::LONG,
            Tag::Float(_) => id::FLOAT,
            Tag::Double(_) => id::DOUBLE,
            Tag::ByteArray(_) => id::BYTE_ARRAY,
            Tag::String(_) => id::STRING,
            Tag::List(_) => id::LIST,
            Tag::Compound(_) => id::COMPOUND,
            Tag::IntArray(_) => id::INT_ARRAY,
            Tag::LongArray(_) => id::LONG_ARRAY,
        }
    }

    /// Child of a compound by key
    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.as_compound()?.get(key)
    }

    /// Walk a sequence of compound keys
    pub fn path(&self, keys: &[&str]) -> Option<&Tag> {
        keys.iter().try_fold(self, |node, key| node.get(key))
    }

    /// Walk a dotted path such as `tag.ExtraAttributes.id`
    pub fn at(&self, dotted: &str) -> Option<&Tag> {
        dotted.split('.').try_fold(self, |node, key| node.get(key))
    }

    pub fn as_compound(&self) -> Option<&BTreeMap<String, Tag>> {
        match self {
            Tag::Compound(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Tag]> {
        match self {
            Tag::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integral value of a numeric tag
    ///
    /// Floating tags are truncated; strings are parsed after trimming, so
    /// `"3"` coerces but `"III"` does not.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Tag::Byte(v) => Some(i64::from(*v)),
            Tag::Short(v) => Some(i64::from(*v)),
            Tag::Int(v) => Some(i64::from(*v)),
            Tag::Long(v) => Some(*v),
            Tag::Float(v) if v.is_finite() => Some(*v as i64),
            Tag::Double(v) if v.is_finite() => Some(*v as i64),
            Tag::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Loose boolean reading: non-zero numbers and non-empty strings are true
    pub fn is_truthy(&self) -> bool {
        match self {
            Tag::String(s) => !s.is_empty(),
            Tag::Float(v) => *v != 0.0 && !v.is_nan(),
            Tag::Double(v) => *v != 0.0 && !v.is_nan(),
            Tag::Compound(_)
            | Tag::List(_)
            | Tag::ByteArray(_)
            | Tag::IntArray(_)
            | Tag::LongArray(_) => true,
            _ => self.as_i64().is_some_and(|v| v != 0),
        }
    }

    /// A list whose elements are all strings
    pub fn string_list(&self) -> Option<Vec<&str>> {
        self.as_list()?.iter().map(Tag::as_str).collect()
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Tag::String(value.to_string())
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Tag::String(value)
    }
}
