//! Typed record adapters for subscriptions.
//!
//! Adapters turn decoded records into application structs in two phases:
//! - **Subscription time**: [`RecordAdapter::validate_layout`] checks the channels
//!   the adapter needs and binds them to layout positions
//! - **Per record**: [`RecordAdapter::adapt`] reads values through those bindings
//!
//! Missing or mistyped required channels are reported once, when subscribing,
//! instead of on every record.
//!
//! # Example
//!
//! ```rust
//! use codriver::adapters::{AdapterValidation, FieldBinding, RecordAdapter};
//! use codriver::{CompiledLayout, Record, Result, ValueType};
//!
//! struct Dash {
//!     speed: f32,
//!     rpm: f32,
//!     gear: u8,
//! }
//!
//! impl RecordAdapter for Dash {
//!     fn validate_layout(layout: &CompiledLayout) -> Result<AdapterValidation> {
//!         Ok(AdapterValidation::new(vec![
//!             FieldBinding::required(layout, "vehicle_speed", ValueType::F32)?,
//!             FieldBinding::required(layout, "vehicle_engine_rpm_current", ValueType::F32)?,
//!             FieldBinding::optional(layout, "vehicle_gear_index"),
//!         ]))
//!     }
//!
//!     fn adapt(record: &Record, validation: &AdapterValidation) -> Self {
//!         Self {
//!             speed: validation.fetch_or_default(record, "vehicle_speed"),
//!             rpm: validation.fetch_or_default(record, "vehicle_engine_rpm_current"),
//!             gear: validation.fetch_or_default(record, "vehicle_gear_index"),
//!         }
//!     }
//! }
//! ```

mod validation;

pub use validation::{AdapterValidation, FieldBinding};

use crate::Result;
use crate::record::Record;
use crate::schema::CompiledLayout;

/// Conversion from a decoded record into a typed value.
pub trait RecordAdapter: Sized {
    /// Check the layout and bind the channels this adapter reads.
    ///
    /// Called once per subscription.
    fn validate_layout(layout: &CompiledLayout) -> Result<AdapterValidation>;

    /// Build a value from one record using the bindings from `validate_layout`.
    fn adapt(record: &Record, validation: &AdapterValidation) -> Self;
}

/// Subscribing to `Record` yields every decoded record unchanged.
impl RecordAdapter for Record {
    fn validate_layout(_layout: &CompiledLayout) -> Result<AdapterValidation> {
        Ok(AdapterValidation::default())
    }

    fn adapt(record: &Record, _validation: &AdapterValidation) -> Self {
        record.clone()
    }
}
