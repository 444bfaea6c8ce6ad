//! Obtaining document text from files and byte streams.
//!
//! Bytes are decoded in one go with the caller's encoding (a WHATWG label
//! such as `"UTF-8"`, `"latin1"` or `"shift_jis"`). Malformed input is
//! rejected instead of being patched with replacement characters.

use std::fs;
use std::io::Read;
use std::path::Path;

use encoding_rs::Encoding;

use crate::error::{Error, Result};

/// Encoding used when the caller does not pick one.
pub const DEFAULT_ENCODING: &str = "UTF-8";

/// Read and decode a whole file.
pub fn read_file(path: &Path, label: &str) -> Result<String> {
    let encoding = lookup(label)?;
    let bytes = fs::read(path)?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());
    decode_with(encoding, &bytes)
}

/// Read a byte stream to its end and decode it.
pub fn read_to_string<R: Read>(mut reader: R, label: &str) -> Result<String> {
    let encoding = lookup(label)?;
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode_with(encoding, &bytes)
}

/// Decode a byte buffer using the encoding named by `label`.
pub fn decode(bytes: &[u8], label: &str) -> Result<String> {
    decode_with(lookup(label)?, bytes)
}

fn lookup(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| Error::UnknownEncoding {
        label: label.to_string(),
    })
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> Result<String> {
    // A byte order mark for the selected encoding is not document content.
    let body = match Encoding::for_bom(bytes) {
        Some((bom_encoding, bom_len)) if bom_encoding == encoding => &bytes[bom_len..],
        _ => bytes,
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
        .ok_or(Error::Malformed {
            encoding: encoding.name(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode("héllo".as_bytes(), "UTF-8").unwrap(), "héllo");
    }

    #[test]
    fn test_decode_strips_bom() {
        let bytes = b"\xEF\xBB\xBF# Title";
        assert_eq!(decode(bytes, "utf-8").unwrap(), "# Title");
    }

    #[test]
    fn test_decode_latin1() {
        // windows-1252 is what the "latin1" label maps to
        assert_eq!(decode(b"caf\xE9", "latin1").unwrap(), "café");
    }

    #[test]
    fn test_decode_malformed_utf8() {
        let err = decode(b"bad \xFF byte", "UTF-8").unwrap_err();
        assert!(matches!(err, Error::Malformed { encoding: "UTF-8" }));
    }

    #[test]
    fn test_unknown_label() {
        let err = decode(b"x", "no-such-charset").unwrap_err();
        assert!(matches!(err, Error::UnknownEncoding { .. }));
    }

    #[test]
    fn test_read_to_string() {
        let text = read_to_string(&b"line\r\n"[..], DEFAULT_ENCODING).unwrap();
        assert_eq!(text, "line\r\n");
    }
}
