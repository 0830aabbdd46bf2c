//! Typed access to record field values

use super::{FourCc, Value, ValueType};

/// Trait for Rust types that can be read from and written to a record field.
///
/// Each implementation corresponds to exactly one [`ValueType`]; conversions never
/// widen or narrow, so reading a `uint8` channel as `u16` is a type mismatch.
pub trait FieldValue: Sized + Copy {
    /// The channel type this Rust type maps to.
    const VALUE_TYPE: ValueType;

    /// Extract from a tagged value, `None` if the tag differs.
    fn from_value(value: &Value) -> Option<Self>;

    /// Wrap into a tagged value.
    fn into_value(self) -> Value;
}

macro_rules! impl_field_value {
    ($ty:ty, $variant:ident) => {
        impl FieldValue for $ty {
            const VALUE_TYPE: ValueType = ValueType::$variant;

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(*v),
                    _ => None,
                }
            }

            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }
    };
}

impl_field_value!(bool, Bool);
impl_field_value!(u8, U8);
impl_field_value!(u16, U16);
impl_field_value!(u64, U64);
impl_field_value!(f32, F32);
impl_field_value!(f64, F64);
impl_field_value!(FourCc, FourCc);
