//! Persisted configuration record
//!
//! Byte layout (all integers little-endian):
//!
//! ```text
//! offset 0      u16     body length L (bytes after this prefix)
//! offset 2      [u8;4]  magic b"WCFG"
//! offset 6      u8      format version
//! offset 7      u16     entry count
//! offset 9      entries key_len u8 | key | value_len u8 | value
//! offset 2+L-4  u32     CRC-32/ISO-HDLC over bytes [2, 2+L-4)
//! ```
//!
//! A record is either fully valid or treated as absent.

use super::error::StorageError;
use super::registry::ParameterRegistry;
use crc::{Crc, CRC_32_ISO_HDLC};

/// Record magic
pub const RECORD_MAGIC: [u8; 4] = *b"WCFG";

/// Current record format version
pub const RECORD_VERSION: u8 = 1;

/// Size of the length prefix
pub const LENGTH_PREFIX_SIZE: usize = 2;

/// Magic + version + entry count
pub const HEADER_SIZE: usize = 7;

/// CRC trailer size
pub const CRC_SIZE: usize = 4;

/// Smallest possible body (no entries)
pub const MIN_BODY_SIZE: usize = HEADER_SIZE + CRC_SIZE;

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Record header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Magic number (`RECORD_MAGIC`)
    pub magic: [u8; 4],
    /// Format version
    pub version: u8,
    /// Number of key/value entries
    pub count: u16,
}

impl RecordHeader {
    pub fn new(count: u16) -> Self {
        Self {
            magic: RECORD_MAGIC,
            version: RECORD_VERSION,
            count,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.magic == RECORD_MAGIC && self.version == RECORD_VERSION
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes[5..7].copy_from_slice(&self.count.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            version: bytes[4],
            count: u16::from_le_bytes([bytes[5], bytes[6]]),
        }
    }
}

/// Size of the record `registry` would encode to, length prefix included
pub fn encoded_len<const N: usize>(registry: &ParameterRegistry<N>) -> usize {
    let entries: usize = registry
        .iter()
        .map(|p| 2 + p.key().len() + p.value().len())
        .sum();
    LENGTH_PREFIX_SIZE + MIN_BODY_SIZE + entries
}

/// Encode every parameter of `registry` into `buf`.
///
/// Returns the number of bytes written (length prefix included).
pub fn encode<const N: usize>(
    registry: &ParameterRegistry<N>,
    buf: &mut [u8],
) -> Result<usize, StorageError> {
    let total = encoded_len(registry);
    if total > buf.len() {
        return Err(StorageError::PayloadTooLarge);
    }
    let body_len = u16::try_from(total - LENGTH_PREFIX_SIZE).map_err(|_| StorageError::PayloadTooLarge)?;
    let count = u16::try_from(registry.len()).map_err(|_| StorageError::PayloadTooLarge)?;

    buf[0..2].copy_from_slice(&body_len.to_le_bytes());
    let header = RecordHeader::new(count);
    buf[2..2 + HEADER_SIZE].copy_from_slice(&header.to_bytes());

    let mut pos = LENGTH_PREFIX_SIZE + HEADER_SIZE;
    for param in registry.iter() {
        // Key and value lengths are bounded by MAX_KEY_LEN / MAX_VALUE_LEN
        for field in [param.key().as_bytes(), param.value().as_bytes()] {
            buf[pos] = field.len() as u8;
            pos += 1;
            buf[pos..pos + field.len()].copy_from_slice(field);
            pos += field.len();
        }
    }

    let crc = CRC32.checksum(&buf[LENGTH_PREFIX_SIZE..pos]);
    buf[pos..pos + CRC_SIZE].copy_from_slice(&crc.to_le_bytes());
    pos += CRC_SIZE;

    debug_assert_eq!(pos, total);
    Ok(pos)
}

/// Validated record borrowed from a storage image
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    header: RecordHeader,
    entries: &'a [u8],
}

impl<'a> RecordView<'a> {
    pub fn header(&self) -> RecordHeader {
        self.header
    }

    pub fn len(&self) -> usize {
        self.header.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.header.count == 0
    }

    /// Key/value pairs in stored order
    pub fn entries(&self) -> Entries<'a> {
        Entries {
            bytes: self.entries,
            remaining: self.header.count,
        }
    }
}

/// Iterator over the entries of a [`RecordView`]
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    bytes: &'a [u8],
    remaining: u16,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let (key, rest) = split_field(self.bytes)?;
        let (value, rest) = split_field(rest)?;
        self.bytes = rest;
        self.remaining -= 1;
        Some((key, value))
    }
}

/// Decode a storage image starting at the length prefix.
///
/// Missing, erased or foreign data yields `NoValidRecord`; a record with a
/// valid header whose body is malformed yields `DecodeError`.
pub fn decode(image: &[u8]) -> Result<RecordView<'_>, StorageError> {
    if image.len() < LENGTH_PREFIX_SIZE {
        return Err(StorageError::NoValidRecord);
    }
    let body_len = u16::from_le_bytes([image[0], image[1]]) as usize;
    if body_len == 0 || body_len > image.len() - LENGTH_PREFIX_SIZE || body_len < HEADER_SIZE {
        return Err(StorageError::NoValidRecord);
    }

    let body = &image[LENGTH_PREFIX_SIZE..LENGTH_PREFIX_SIZE + body_len];
    let mut header_bytes = [0u8; HEADER_SIZE];
    header_bytes.copy_from_slice(&body[..HEADER_SIZE]);
    let header = RecordHeader::from_bytes(&header_bytes);
    if !header.is_valid() {
        return Err(StorageError::NoValidRecord);
    }
    if body_len < MIN_BODY_SIZE {
        return Err(StorageError::DecodeError);
    }

    let crc_offset = body_len - CRC_SIZE;
    let stored_crc = u32::from_le_bytes([
        body[crc_offset],
        body[crc_offset + 1],
        body[crc_offset + 2],
        body[crc_offset + 3],
    ]);
    if CRC32.checksum(&body[..crc_offset]) != stored_crc {
        return Err(StorageError::DecodeError);
    }

    // Walk every entry once so iteration later cannot fail
    let entries = &body[HEADER_SIZE..crc_offset];
    let mut rest = entries;
    for _ in 0..header.count {
        let (_, after_key) = split_field(rest).ok_or(StorageError::DecodeError)?;
        let (_, after_value) = split_field(after_key).ok_or(StorageError::DecodeError)?;
        rest = after_value;
    }
    if !rest.is_empty() {
        return Err(StorageError::DecodeError);
    }

    Ok(RecordView { header, entries })
}

fn split_field(bytes: &[u8]) -> Option<(&str, &[u8])> {
    let (&len, rest) = bytes.split_first()?;
    let len = len as usize;
    if rest.len() < len {
        return None;
    }
    let text = core::str::from_utf8(&rest[..len]).ok()?;
    Some((text, &rest[len..]))
}
