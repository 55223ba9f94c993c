//! Decoding of tagged field values into a closed sum type.
//!
//! Values cross the boundary exactly once; everything downstream operates
//! on [`Value`], never on raw tags.

use crate::cache::EnumTable;
use crate::error::{ClientError, ClientResult};
use arsclient_sys as sys;
use chrono::{DateTime, Local};

/// A decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value.
    Null,
    /// Character data, verbatim.
    Text(String),
    /// An enumeration value, already resolved to its label.
    Enum(String),
    /// A timestamp, in local time.
    Timestamp(DateTime<Local>),
}

impl Value {
    /// Whether this is the absent value.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The contained text, for both character and enum values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::Enum(text) => Some(text),
            _ => None,
        }
    }
}

/// Decodes one tagged value. `schema` and `field` are context for error
/// reporting; `enums` is the field's enum table when it has one.
///
/// A missing enum ordinal is a data integrity error, never a default; an
/// unrecognized tag is a declared unsupported feature, never ignored.
///
/// # Safety
///
/// `raw` must be a value populated by the library: its `data_type` must
/// select the union arm that was written, and a `CHAR` payload must be null
/// or a valid NUL-terminated string.
pub unsafe fn decode(
    schema: &str,
    field: &str,
    raw: &sys::ARValueStruct,
    enums: Option<&EnumTable>,
) -> ClientResult<Value> {
    match raw.data_type {
        sys::AR_DATA_TYPE_NULL => Ok(Value::Null),
        sys::AR_DATA_TYPE_CHAR => Ok(Value::Text(
            sys::strings::ptr_to_string(raw.u.char_val).unwrap_or_default(),
        )),
        sys::AR_DATA_TYPE_ENUM => {
            let ordinal = raw.u.enum_val as u32;
            let table = enums.ok_or_else(|| {
                ClientError::data_integrity(format!(
                    "field {field:?} in schema {schema:?} returned an enum value but has no enum table"
                ))
            })?;
            match table.get(&ordinal) {
                Some(label) => Ok(Value::Enum(label.clone())),
                None => Err(ClientError::data_integrity(format!(
                    "enum ordinal {ordinal} of field {field:?} in schema {schema:?} has no label"
                ))),
            }
        }
        sys::AR_DATA_TYPE_TIME => {
            let seconds = raw.u.time_val as i64;
            let instant = DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
                ClientError::data_integrity(format!(
                    "timestamp {seconds} of field {field:?} in schema {schema:?} is out of range"
                ))
            })?;
            Ok(Value::Timestamp(instant.with_timezone(&Local)))
        }
        tag => Err(ClientError::unsupported(format!(
            "data type tag {tag} of field {field:?} in schema {schema:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arsclient_sys::ZeroInit;
    use std::collections::HashMap;
    use std::ffi::CString;
    use std::os::raw::c_char;

    fn enum_table() -> EnumTable {
        HashMap::from([(0, "New".to_string())])
    }

    #[test]
    fn null_decodes_to_absent_regardless_of_field() {
        let raw = sys::ARValueStruct::zeroed();
        for field in ["Status", "Summary"] {
            let value = unsafe { decode("Incident", field, &raw, None) }.unwrap();
            assert!(value.is_null());
        }
    }

    #[test]
    fn char_decodes_verbatim() {
        let text = CString::new("broken printer").unwrap();
        let mut raw = sys::ARValueStruct::zeroed();
        raw.data_type = sys::AR_DATA_TYPE_CHAR;
        raw.u.char_val = text.as_ptr() as *mut c_char;

        let value = unsafe { decode("Incident", "Summary", &raw, None) }.unwrap();
        assert_eq!(value, Value::Text("broken printer".into()));
        assert_eq!(value.as_str(), Some("broken printer"));
    }

    #[test]
    fn enum_resolves_through_table() {
        let mut raw = sys::ARValueStruct::zeroed();
        raw.data_type = sys::AR_DATA_TYPE_ENUM;
        raw.u.enum_val = 0;

        let table = enum_table();
        let value = unsafe { decode("Incident", "Status", &raw, Some(&table)) }.unwrap();
        assert_eq!(value, Value::Enum("New".into()));
    }

    #[test]
    fn unknown_ordinal_is_an_integrity_error() {
        let mut raw = sys::ARValueStruct::zeroed();
        raw.data_type = sys::AR_DATA_TYPE_ENUM;
        raw.u.enum_val = 7;

        let table = enum_table();
        let err = unsafe { decode("Incident", "Status", &raw, Some(&table)) }.unwrap_err();
        assert!(matches!(err, ClientError::DataIntegrity { .. }));
        assert!(err.to_string().contains("ordinal 7"));
    }

    #[test]
    fn missing_enum_table_is_an_integrity_error() {
        let mut raw = sys::ARValueStruct::zeroed();
        raw.data_type = sys::AR_DATA_TYPE_ENUM;
        raw.u.enum_val = 0;

        let err = unsafe { decode("Incident", "Status", &raw, None) }.unwrap_err();
        assert!(matches!(err, ClientError::DataIntegrity { .. }));
    }

    #[test]
    fn time_zero_is_the_epoch() {
        let mut raw = sys::ARValueStruct::zeroed();
        raw.data_type = sys::AR_DATA_TYPE_TIME;
        raw.u.time_val = 0;

        let value = unsafe { decode("Incident", "Created", &raw, None) }.unwrap();
        match value {
            Value::Timestamp(instant) => assert_eq!(instant.timestamp(), 0),
            other => panic!("expected a timestamp, got {other:?}"),
        }
    }

    #[test]
    fn unrecognized_tag_names_schema_and_field() {
        let mut raw = sys::ARValueStruct::zeroed();
        raw.data_type = sys::AR_DATA_TYPE_REAL;

        let err = unsafe { decode("Incident", "Weight", &raw, None) }.unwrap_err();
        assert!(matches!(err, ClientError::Unsupported { .. }));
        let text = err.to_string();
        assert!(text.contains("Incident"));
        assert!(text.contains("Weight"));
    }
}
