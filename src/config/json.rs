//! JSON rendering of a configuration snapshot
//!
//! Produces `{"device":..,"version":..,"config":{key:value,..}}`, the
//! document transports offer as a configuration backup download.

use serde::ser::{Serialize, Serializer};
use webconf_core::parameters::ParamString;

pub use serde_json_core::ser::Error as JsonError;

/// Backup document borrowed from a snapshot
#[derive(Debug, serde::Serialize)]
pub struct BackupDocument<'a> {
    pub device: &'a str,
    pub version: &'a str,
    pub config: ConfigEntries<'a>,
}

/// Snapshot entries serialized as a JSON object in registration order
#[derive(Debug, Clone, Copy)]
pub struct ConfigEntries<'a>(pub &'a [(&'static str, ParamString)]);

impl Serialize for ConfigEntries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(key, value)| (*key, value.as_str())))
    }
}

/// Render a snapshot as a JSON backup document into `buf`.
///
/// Returns the number of bytes written.
pub fn write_snapshot(
    buf: &mut [u8],
    device: &str,
    version: &str,
    entries: &[(&'static str, ParamString)],
) -> Result<usize, JsonError> {
    let document = BackupDocument {
        device,
        version,
        config: ConfigEntries(entries),
    };
    serde_json_core::to_slice(&document, buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&'static str, &str)]) -> Vec<(&'static str, ParamString)> {
        pairs
            .iter()
            .map(|(key, value)| (*key, ParamString::try_from(*value).unwrap()))
            .collect()
    }

    #[test]
    fn test_document_shape() {
        let mut buf = [0u8; 256];
        let snapshot = entries(&[("brightness", "75"), ("enabled", "true")]);
        let len = write_snapshot(&mut buf, "ESP32-Device", "1.0", &snapshot).unwrap();
        assert_eq!(
            core::str::from_utf8(&buf[..len]).unwrap(),
            r#"{"device":"ESP32-Device","version":"1.0","config":{"brightness":"75","enabled":"true"}}"#
        );
    }

    #[test]
    fn test_quotes_are_escaped() {
        let mut buf = [0u8; 128];
        let snapshot = entries(&[("note", "say \"hi\"")]);
        let len = write_snapshot(&mut buf, "a\"b", "1", &snapshot).unwrap();
        assert_eq!(
            core::str::from_utf8(&buf[..len]).unwrap(),
            r#"{"device":"a\"b","version":"1","config":{"note":"say \"hi\""}}"#
        );
    }

    #[test]
    fn test_empty_snapshot() {
        let mut buf = [0u8; 64];
        let len = write_snapshot(&mut buf, "dev", "1", &[]).unwrap();
        assert_eq!(
            core::str::from_utf8(&buf[..len]).unwrap(),
            r#"{"device":"dev","version":"1","config":{}}"#
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        let mut buf = [0u8; 8];
        assert!(matches!(
            write_snapshot(&mut buf, "device", "1", &[]),
            Err(JsonError::BufferFull)
        ));
    }
}
