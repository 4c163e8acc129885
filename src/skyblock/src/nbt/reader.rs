//! Binary tag decoding
//!
//! Format (big-endian throughout):
//! 1. Root: tag id (always compound), u16-prefixed name, payload
//! 2. Compound payload: repeated `id, name, payload` until an END id
//! 3. List payload: element id, i32 length, bare payloads
//! 4. Strings: u16 byte length, modified UTF-8

use super::{id, NbtError, Tag};
use base64::prelude::*;
use byteorder::{BigEndian, ReadBytesExt};
use flate2::read::GzDecoder;
use std::collections::BTreeMap;
use std::io::{Cursor, Read};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Maximum compound/list nesting accepted before bailing out
const MAX_DEPTH: usize = 512;

/// Decode a base64 tag blob, inflating it first if it is gzip-compressed
pub fn decode_base64_tag(encoded: &str) -> Result<Tag, NbtError> {
    let raw = BASE64_STANDARD.decode(encoded.trim())?;
    if raw.starts_with(&GZIP_MAGIC) {
        let mut inflated = Vec::new();
        GzDecoder::new(&raw[..])
            .read_to_end(&mut inflated)
            .map_err(NbtError::Decompress)?;
        read_root(&inflated)
    } else {
        read_root(&raw)
    }
}

/// Decode an inventory blob and return its slot list
///
/// Hypixel wraps every container in a root compound whose `i` key holds
/// the list of slots.
pub fn decode_inventory_data(encoded: &str) -> Result<Tag, NbtError> {
    match decode_base64_tag(encoded)? {
        Tag::Compound(mut root) => root
            .remove("i")
            .ok_or_else(|| NbtError::MissingKey("i".to_string())),
        other => Err(NbtError::RootNotCompound(other.type_id())),
    }
}

/// Parse uncompressed tag bytes holding a single named root compound
pub fn read_root(data: &[u8]) -> Result<Tag, NbtError> {
    let mut reader = TagReader {
        cursor: Cursor::new(data),
    };
    let root_id = reader.cursor.read_u8().map_err(eof)?;
    if root_id != id::COMPOUND {
        return Err(NbtError::RootNotCompound(root_id));
    }
    let _name = reader.string()?;
    reader.payload(id::COMPOUND, 0)
}

fn eof(_: std::io::Error) -> NbtError {
    NbtError::UnexpectedEof
}

struct TagReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl TagReader<'_> {
    fn remaining(&self) -> usize {
        let data = self.cursor.get_ref();
        data.len()
            .saturating_sub(self.cursor.position() as usize)
    }

    /// Read an i32 length and make sure that many elements can still fit
    fn length(&mut self, element_size: usize) -> Result<usize, NbtError> {
        let len = self.cursor.read_i32::<BigEndian>().map_err(eof)?;
        if len < 0 {
            return Err(NbtError::NegativeLength(len));
        }
        let len = len as usize;
        if len.saturating_mul(element_size) > self.remaining() {
            return Err(NbtError::UnexpectedEof);
        }
        Ok(len)
    }

    fn string(&mut self) -> Result<String, NbtError> {
        let len = self.cursor.read_u16::<BigEndian>().map_err(eof)? as usize;
        if len > self.remaining() {
            return Err(NbtError::UnexpectedEof);
        }
        let mut bytes = vec![0u8; len];
        self.cursor.read_exact(&mut bytes).map_err(eof)?;
        Ok(decode_mutf8(&bytes))
    }

    fn payload(&mut self, tag_id: u8, depth: usize) -> Result<Tag, NbtError> {
        if depth > MAX_DEPTH {
            return Err(NbtError::TooDeep(MAX_DEPTH));
        }

        let tag = match tag_id {
            id::BYTE => Tag::Byte(self.cursor.read_i8().map_err(eof)?),
            id::SHORT => Tag::Short(self.cursor.read_i16::<BigEndian>().map_err(eof)?),
            id::INT => Tag::Int(self.cursor.read_i32::<BigEndian>().map_err(eof)?),
            id::LONG => Tag::Long(self.cursor.read_i64::<BigEndian>().map_err(eof)?),
            id::FLOAT => Tag::Float(self.cursor.read_f32::<BigEndian>().map_err(eof)?),
            id::DOUBLE => Tag::Double(self.cursor.read_f64::<BigEndian>().map_err(eof)?),
            id::BYTE_ARRAY => {
                let len = self.length(1)?;
                let mut values = vec![0i8; len];
                self.cursor.read_i8_into(&mut values).map_err(eof)?;
                Tag::ByteArray(values)
            }
            id::STRING => Tag::String(self.string()?),
            id::LIST => {
                let element_id = self.cursor.read_u8().map_err(eof)?;
                let len = self.length(1)?;
                // An END-typed list carries no payloads regardless of its length
                if element_id == id::END {
                    return Ok(Tag::List(Vec::new()));
                }
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.payload(element_id, depth + 1)?);
                }
                Tag::List(items)
            }
            id::COMPOUND => {
                let mut map = BTreeMap::new();
                loop {
                    let child_id = self.cursor.read_u8().map_err(eof)?;
                    if child_id == id::END {
                        break;
                    }
                    let name = self.string()?;
                    let value = self.payload(child_id, depth + 1)?;
                    map.insert(name, value);
                }
                Tag::Compound(map)
            }
            id::INT_ARRAY => {
                let len = self.length(4)?;
                let mut values = vec![0i32; len];
                self.cursor
                    .read_i32_into::<BigEndian>(&mut values)
                    .map_err(eof)?;
                Tag::IntArray(values)
            }
            id::LONG_ARRAY => {
                let len = self.length(8)?;
                let mut values = vec![0i64; len];
                self.cursor
                    .read_i64_into::<BigEndian>(&mut values)
                    .map_err(eof)?;
                Tag::LongArray(values)
            }
            other => return Err(NbtError::UnknownTag(other)),
        };

        Ok(tag)
    }
}

/// Decode modified UTF-8 (Java's `DataOutput` string encoding)
///
/// Differs from UTF-8 in encoding NUL as `C0 80` and supplementary
/// characters as surrogate pairs. Plain UTF-8 takes the fast path; malformed
/// sequences become U+FFFD.
fn decode_mutf8(bytes: &[u8]) -> String {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_owned();
    }

    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        let continuation = |offset: usize| bytes.get(i + offset).map(|c| u16::from(*c & 0x3f));
        let (unit, width) = match b {
            0x00..=0x7f => (u16::from(b), 1),
            0xc0..=0xdf => match continuation(1) {
                Some(c1) => (((u16::from(b) & 0x1f) << 6) | c1, 2),
                None => (0xfffd, 1),
            },
            0xe0..=0xef => match (continuation(1), continuation(2)) {
                (Some(c1), Some(c2)) => (((u16::from(b) & 0x0f) << 12) | (c1 << 6) | c2, 3),
                _ => (0xfffd, 1),
            },
            _ => (0xfffd, 1),
        };
        units.push(unit);
        i += width;
    }
    String::from_utf16_lossy(&units)
}
