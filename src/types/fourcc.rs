//! Four-character tag values

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Result, TelemetryError};

/// A 4-byte tag used as a record-type marker (e.g. `"sess"`).
///
/// Holds raw bytes exactly as they appear on the wire. Constructing one from text
/// requires exactly four bytes; shorter or longer input is rejected rather than
/// padded or truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    /// Value of a freshly instantiated FourCC field.
    pub const PLACEHOLDER: FourCc = FourCc(*b"____");

    /// Build a tag from exactly four bytes of text.
    pub fn new(tag: &str) -> Result<Self> {
        let bytes: [u8; 4] = tag
            .as_bytes()
            .try_into()
            .map_err(|_| TelemetryError::InvalidFourCc { value: tag.to_string() })?;
        Ok(Self(bytes))
    }

    /// Raw tag bytes.
    pub fn bytes(&self) -> [u8; 4] {
        self.0
    }
}

impl Default for FourCc {
    fn default() -> Self {
        Self::PLACEHOLDER
    }
}

/// Printable ASCII bytes as-is; NUL and other unprintable bytes show as `_`,
/// so an all-zero tag reads the same as [`FourCc::PLACEHOLDER`].
impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for &b in &self.0 {
            let c = if b.is_ascii_graphic() || b == b' ' { char::from(b) } else { '_' };
            f.write_char(c)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for FourCc {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self> {
        FourCc::new(s)
    }
}

impl PartialEq<&str> for FourCc {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_slice() == other.as_bytes()
    }
}
