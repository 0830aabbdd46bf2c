//! Text decoding for telemetry documents
//!
//! The game ships its readme documents in more than one encoding: `channels.json`
//! is UTF-8 while `ids.json` is written as UTF-16 with a byte order mark. This module
//! turns raw document bytes into a `String` without parsing them.
//!
//! - `EF BB BF` prefix: UTF-8, BOM stripped
//! - `FF FE` prefix: UTF-16 little-endian
//! - `FE FF` prefix: UTF-16 big-endian
//! - no BOM: UTF-8, unless the bytes are not valid UTF-8 or contain NULs, in
//!   which case they are read as UTF-16 big-endian

use tracing::debug;

use crate::{Result, TelemetryError};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Decode document bytes into text, honouring a leading byte order mark.
pub fn decode_document_text(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(&UTF8_BOM) {
        return decode_utf8(rest);
    }
    if let Some(rest) = bytes.strip_prefix(&UTF16_LE_BOM) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(&UTF16_BE_BOM) {
        return decode_utf16(rest, u16::from_be_bytes);
    }
    decode_unmarked(bytes)
}

fn decode_unmarked(bytes: &[u8]) -> Result<String> {
    let utf8 = decode_utf8(bytes);
    let looks_wide = match &utf8 {
        Ok(text) => text.contains('\0'),
        Err(_) => true,
    };
    if !looks_wide || bytes.len() % 2 != 0 {
        return utf8;
    }

    match decode_utf16(bytes, u16::from_be_bytes) {
        Ok(text) => {
            debug!(len = bytes.len(), "Decoded document without a BOM as UTF-16BE");
            Ok(text)
        }
        Err(_) => utf8,
    }
}

fn decode_utf8(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes).map(str::to_string).map_err(|e| TelemetryError::Parse {
        context: "UTF-8 document decoding".to_string(),
        details: e.to_string(),
    })
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(TelemetryError::Parse {
            context: "UTF-16 document decoding".to_string(),
            details: format!("odd byte length {}", bytes.len()),
        });
    }

    let units: Vec<u16> = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]])).collect();

    String::from_utf16(&units).map_err(|e| TelemetryError::Parse {
        context: "UTF-16 document decoding".to_string(),
        details: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16_with_bom(text: &str, little_endian: bool) -> Vec<u8> {
        let mut out = if little_endian { UTF16_LE_BOM.to_vec() } else { UTF16_BE_BOM.to_vec() };
        for unit in text.encode_utf16() {
            let bytes = if little_endian { unit.to_le_bytes() } else { unit.to_be_bytes() };
            out.extend_from_slice(&bytes);
        }
        out
    }

    #[test]
    fn plain_utf8_passes_through() {
        assert_eq!(decode_document_text(b"{\"a\":1}").unwrap(), "{\"a\":1}");
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("{\"name\":\"Monte-Carlo\"}".as_bytes());
        assert_eq!(decode_document_text(&bytes).unwrap(), "{\"name\":\"Monte-Carlo\"}");
    }

    #[test]
    fn utf16_le_and_be_decode() {
        let text = "{\"name\":\"Škoda Fabia\"}";
        assert_eq!(decode_document_text(&utf16_with_bom(text, true)).unwrap(), text);
        assert_eq!(decode_document_text(&utf16_with_bom(text, false)).unwrap(), text);
    }

    #[test]
    fn odd_length_utf16_is_rejected() {
        let mut bytes = utf16_with_bom("{}", true);
        bytes.push(0x00);
        assert!(matches!(decode_document_text(&bytes), Err(TelemetryError::Parse { .. })));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        assert!(decode_document_text(&[0x7B, 0xC3, 0x28]).is_err());
    }

    #[test]
    fn unmarked_utf16_be_is_detected() {
        let text = "{\"name\":\"Škoda Fabia\"}";
        let bom_less = &utf16_with_bom(text, false)[UTF16_BE_BOM.len()..];
        assert_eq!(decode_document_text(bom_less).unwrap(), text);
    }

    #[test]
    fn unmarked_utf8_with_non_ascii_stays_utf8() {
        let text = "{\"name\":\"Škoda\"}";
        assert_eq!(decode_document_text(text.as_bytes()).unwrap(), text);
    }
}
