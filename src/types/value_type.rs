//! Channel value type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::FourCc;

/// Scalar types a channel may declare.
/// Maps to the `type` strings of the game's `channels.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum ValueType {
    /// Single byte, 0x00 or 0x01 (`boolean`)
    #[serde(rename = "boolean")]
    Bool,
    /// 8-bit unsigned integer (`uint8`)
    #[serde(rename = "uint8")]
    U8,
    /// 16-bit unsigned integer (`uint16`)
    #[serde(rename = "uint16")]
    U16,
    /// 64-bit unsigned integer (`uint64`)
    #[serde(rename = "uint64")]
    U64,
    /// IEEE-754 single precision (`float32`)
    #[serde(rename = "float32")]
    F32,
    /// IEEE-754 double precision (`float64`)
    #[serde(rename = "float64")]
    F64,
    /// Four raw ASCII bytes, no terminator (`fourcc`)
    #[serde(rename = "fourcc")]
    FourCc,
}

impl ValueType {
    /// Every supported type, in declaration order.
    pub const ALL: [ValueType; 7] = [
        ValueType::Bool,
        ValueType::U8,
        ValueType::U16,
        ValueType::U64,
        ValueType::F32,
        ValueType::F64,
        ValueType::FourCc,
    ];

    /// Returns the size in bytes of this type on the wire.
    pub const fn size(&self) -> usize {
        match self {
            ValueType::Bool | ValueType::U8 => 1,
            ValueType::U16 => 2,
            ValueType::F32 | ValueType::FourCc => 4,
            ValueType::U64 | ValueType::F64 => 8,
        }
    }

    /// The type name as written in channel documents.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ValueType::Bool => "boolean",
            ValueType::U8 => "uint8",
            ValueType::U16 => "uint16",
            ValueType::U64 => "uint64",
            ValueType::F32 => "float32",
            ValueType::F64 => "float64",
            ValueType::FourCc => "fourcc",
        }
    }

    /// Zero value used when a record is first instantiated.
    pub fn zero(&self) -> Value {
        match self {
            ValueType::Bool => Value::Bool(false),
            ValueType::U8 => Value::U8(0),
            ValueType::U16 => Value::U16(0),
            ValueType::U64 => Value::U64(0),
            ValueType::F32 => Value::F32(0.0),
            ValueType::F64 => Value::F64(0.0),
            ValueType::FourCc => Value::FourCc(FourCc::PLACEHOLDER),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueType::ALL.into_iter().find(|ty| ty.as_str() == s).ok_or_else(|| s.to_string())
    }
}

/// Runtime value of one record field, tagged with its type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Value {
    Bool(bool),
    U8(u8),
    U16(u16),
    U64(u64),
    F32(f32),
    F64(f64),
    FourCc(FourCc),
}

impl Value {
    /// The type tag of this value.
    pub const fn value_type(&self) -> ValueType {
        match self {
            Value::Bool(_) => ValueType::Bool,
            Value::U8(_) => ValueType::U8,
            Value::U16(_) => ValueType::U16,
            Value::U64(_) => ValueType::U64,
            Value::F32(_) => ValueType::F32,
            Value::F64(_) => ValueType::F64,
            Value::FourCc(_) => ValueType::FourCc,
        }
    }

    /// Widen an integer value to `u64`; `None` for every other type.
    pub fn as_code(&self) -> Option<u64> {
        match *self {
            Value::U8(v) => Some(v.into()),
            Value::U16(v) => Some(v.into()),
            Value::U64(v) => Some(v),
            _ => None,
        }
    }
}

// Floats compare by bit pattern so decoded records equal their source bit for bit.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::U16(a), Value::U16(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a.to_bits() == b.to_bits(),
            (Value::F64(a), Value::F64(b)) => a.to_bits() == b.to_bits(),
            (Value::FourCc(a), Value::FourCc(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::U8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::U16(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<FourCc> for Value {
    fn from(v: FourCc) -> Self {
        Value::FourCc(v)
    }
}
