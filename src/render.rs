//! Human-readable rendering of records.
//!
//! A record renders as one line of `id:value[unit]` tokens joined by `", "`, in
//! layout order:
//!
//! ```text
//! packet_4cc:sess, packet_uid:7, vehicle_speed:12.500000[m/s], stage_shakedown:false
//! ```
//!
//! Floats use six fractional digits and booleans render as `true`/`false`. FourCC
//! tags and booleans never carry a unit suffix.

use std::fmt::{self, Write};

use crate::record::Record;
use crate::schema::ChannelCatalog;
use crate::types::{Value, ValueType};
use crate::{Result, TelemetryError};

/// Bracketed abbreviation for a declared unit string.
///
/// Known units map to short labels, `uid`, `count` and the empty string map to
/// no suffix, anything else is bracketed verbatim.
pub fn unit_suffix(units: &str) -> String {
    match units {
        "revolution per minute" => "[rpm]".to_string(),
        "metre per second" => "[m/s]".to_string(),
        "metre per second squared" => "[m/s^2]".to_string(),
        "metre" => "[m]".to_string(),
        "second" => "[s]".to_string(),
        "degree Celsius" => "[deg]".to_string(),
        "" | "uid" | "count" => String::new(),
        other => format!("[{other}]"),
    }
}

/// Render a record, resolving every field against `catalog`.
///
/// Fails with `UnknownChannel` when a field is missing from the catalog and with
/// `UnknownType` when its declared type is unsupported, instead of dropping it.
pub fn render(record: &Record, catalog: &ChannelCatalog) -> Result<String> {
    let mut out = String::with_capacity(record.len() * 24);
    for (i, (field, value)) in record.iter().enumerate() {
        let descriptor = catalog.resolve(&field.id)?;
        let declared = descriptor.scalar_type()?;
        if declared != value.value_type() {
            return Err(TelemetryError::TypeMismatch {
                channel: field.id.clone(),
                expected: declared.to_string(),
                found: value.value_type().to_string(),
            });
        }

        if i > 0 {
            out.push_str(", ");
        }
        push_token(&mut out, &field.id, value, &descriptor.units)
            .map_err(|e| TelemetryError::Parse { context: "Rendering".to_string(), details: e.to_string() })?;
    }
    Ok(out)
}

fn push_token(out: &mut impl Write, id: &str, value: &Value, units: &str) -> fmt::Result {
    write!(out, "{id}:")?;
    write_value(out, value)?;
    match value.value_type() {
        ValueType::Bool | ValueType::FourCc => Ok(()),
        _ => out.write_str(&unit_suffix(units)),
    }
}

fn write_value(out: &mut impl Write, value: &Value) -> fmt::Result {
    match value {
        Value::Bool(v) => write!(out, "{v}"),
        Value::U8(v) => write!(out, "{v}"),
        Value::U16(v) => write!(out, "{v}"),
        Value::U64(v) => write!(out, "{v}"),
        Value::F32(v) => write!(out, "{v:.6}"),
        Value::F64(v) => write!(out, "{v:.6}"),
        Value::FourCc(tag) => write!(out, "{tag}"),
    }
}

/// Renders with the units captured in the record's layout.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            push_token(f, &field.id, value, &field.units)?;
        }
        Ok(())
    }
}
