//! Core value types for telemetry records.
//!
//! ## Architecture
//!
//! - [`ValueType`] is the closed set of scalar types a channel may declare, each
//!   with a fixed wire width
//! - [`Value`] is the tagged runtime value stored in a record slot
//! - [`FourCc`] holds 4-byte tag values exactly as they appear on the wire
//! - [`FieldValue`] maps Rust primitives onto value types for typed get/set
//! - [`UpdateRate`] controls how often subscriptions deliver records
//!
//! ## Usage Example
//!
//! ```rust
//! use codriver::types::{FieldValue, FourCc, Value, ValueType};
//!
//! assert_eq!(ValueType::U64.size(), 8);
//! assert_eq!("float32".parse::<ValueType>(), Ok(ValueType::F32));
//!
//! let tag = FourCc::new("sess").unwrap();
//! let value: Value = tag.into();
//! assert_eq!(FourCc::from_value(&value), Some(tag));
//! assert!(FourCc::new("ses").is_err());
//! ```

mod field_value;
mod fourcc;
mod update_rate;
mod value_type;

pub use field_value::FieldValue;
pub use fourcc::FourCc;
pub use update_rate::UpdateRate;
pub use value_type::{Value, ValueType};
