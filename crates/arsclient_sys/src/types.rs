//! Structure and constant definitions for the AR client ABI.
//!
//! All structures are plain C data: zero-filling them produces a valid empty
//! value (null pointers, zero counts), which is what the vendor entry points
//! expect to be handed as out-parameters.

use std::os::raw::{c_char, c_int, c_long, c_uint, c_ulong, c_void};

/// Outcome code: the call succeeded.
pub const AR_RETURN_OK: c_int = 0;
/// Outcome code: the call succeeded with warnings.
pub const AR_RETURN_WARNING: c_int = 1;
/// Outcome code: the call failed. Any outcome at or above this value is an
/// error; this is the error threshold for every entry point.
pub const AR_RETURN_ERROR: c_int = 2;
/// Outcome code: the call failed and the session is unusable.
pub const AR_RETURN_FATAL: c_int = 3;

/// Maximum length of an object name, excluding the NUL terminator.
pub const AR_MAX_NAME_SIZE: usize = 254;
/// Maximum length of a user name, excluding the NUL terminator.
pub const AR_MAX_ACCESS_NAME_SIZE: usize = 30;
/// Maximum length of a server name, excluding the NUL terminator.
pub const AR_MAX_SERVER_SIZE: usize = 64;
/// Maximum length of an entry id, excluding the NUL terminator.
pub const AR_MAX_ENTRYID_SIZE: usize = 15;

/// A NUL-terminated object name.
pub type ARNameType = [c_char; AR_MAX_NAME_SIZE + 1];
/// A NUL-terminated user name.
pub type ARAccessNameType = [c_char; AR_MAX_ACCESS_NAME_SIZE + 1];
/// A NUL-terminated server name.
pub type ARServerNameType = [c_char; AR_MAX_SERVER_SIZE + 1];
/// A NUL-terminated entry id.
pub type AREntryIdType = [c_char; AR_MAX_ENTRYID_SIZE + 1];
/// A field id, unique within one schema.
pub type ARInternalId = c_uint;
/// Seconds since the Unix epoch.
pub type ARTimestamp = c_long;
/// The vendor's boolean: zero is false, non-zero is true.
pub type ARBoolean = c_uint;

/// Value tag: no value.
pub const AR_DATA_TYPE_NULL: c_uint = 0;
/// Value tag: keyword.
pub const AR_DATA_TYPE_KEYWORD: c_uint = 1;
/// Value tag: integer.
pub const AR_DATA_TYPE_INTEGER: c_uint = 2;
/// Value tag: floating point.
pub const AR_DATA_TYPE_REAL: c_uint = 3;
/// Value tag: character string.
pub const AR_DATA_TYPE_CHAR: c_uint = 4;
/// Value tag: diary (append-only text).
pub const AR_DATA_TYPE_DIARY: c_uint = 5;
/// Value tag: enumeration ordinal.
pub const AR_DATA_TYPE_ENUM: c_uint = 6;
/// Value tag: timestamp.
pub const AR_DATA_TYPE_TIME: c_uint = 7;

/// Enum limit style: ordinals are positions in a name list.
pub const AR_ENUM_STYLE_REGULAR: c_uint = 1;
/// Enum limit style: explicit ordinal/label pairs.
pub const AR_ENUM_STYLE_CUSTOM: c_uint = 2;
/// Enum limit style: values computed by a query against another schema.
pub const AR_ENUM_STYLE_QUERY: c_uint = 3;

/// Field type bitmask selecting data fields.
pub const AR_FIELD_TYPE_DATA: c_ulong = 1;
/// Schema type selector: list every schema.
pub const AR_LIST_SCHEMA_ALL: c_uint = 0;
/// Retrieval window: start with the first matching entry.
pub const AR_START_WITH_FIRST_ENTRY: c_uint = 0;
/// Retrieval window: no cap on the number of entries returned.
pub const AR_NO_MAX_LIST_RETRIEVE: c_uint = 0;

/// The control record identifying a session.
///
/// Passed by pointer to every entry point. Filled by the caller before
/// initialization; the library writes session bookkeeping into it.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ARControlStruct {
    /// Library-managed cache identifier.
    pub cache_id: c_long,
    /// Library-managed timestamp of the last operation.
    pub op_time: ARTimestamp,
    /// Authenticating user.
    pub user: ARAccessNameType,
    /// Credential for `user`.
    pub password: ARAccessNameType,
    /// Locale for localized messages; empty selects the server default.
    pub locale: ARAccessNameType,
    /// Library-managed session identifier.
    pub session_id: c_uint,
    /// Server this session is bound to.
    pub server: ARServerNameType,
}

/// One diagnostic record produced by a call.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ARStatusStruct {
    /// Severity band of the record (note, warning, error, fatal).
    pub message_type: c_uint,
    /// Vendor message number.
    pub message_num: c_long,
    /// Message text; library-allocated, may be null.
    pub message_text: *mut c_char,
    /// Appended detail text; library-allocated, may be null.
    pub appended_text: *mut c_char,
}

/// Counted list of diagnostic records; produced by every call.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ARStatusList {
    /// Number of records in `status_list`.
    pub num_items: c_uint,
    /// Library-allocated array of records.
    pub status_list: *mut ARStatusStruct,
}

/// Counted list of object names.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ARNameList {
    /// Number of names in `name_list`.
    pub num_items: c_uint,
    /// Library-allocated array of names.
    pub name_list: *mut ARNameType,
}

/// Counted list of field ids.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ARInternalIdList {
    /// Number of ids in `internal_id_list`.
    pub num_items: c_uint,
    /// Library-allocated array of ids.
    pub internal_id_list: *mut ARInternalId,
}

/// Counted list of booleans.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ARBooleanList {
    /// Number of values in `boolean_list`.
    pub num_items: c_uint,
    /// Library-allocated array of values.
    pub boolean_list: *mut ARBoolean,
}

/// A compiled query predicate.
///
/// The expression tree under `node` is opaque to callers; the structure is
/// filled by qualifier compilation and must be handed back for release.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ARQualifierStruct {
    /// Root operation tag of the expression tree.
    pub operation: c_uint,
    /// Library-allocated expression tree; null for an empty qualifier.
    pub node: *mut c_void,
}

/// One custom-style enum item.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct AREnumItemStruct {
    /// Label of the item.
    pub item_name: ARNameType,
    /// Explicit ordinal of the item.
    pub item_number: c_ulong,
}

/// Counted list of custom-style enum items.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct AREnumItemList {
    /// Number of items in `enum_item_list`.
    pub num_items: c_uint,
    /// Library-allocated array of items.
    pub enum_item_list: *mut AREnumItemStruct,
}

/// Query-style enum definition: legal values come from another schema.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct AREnumQueryStruct {
    /// Schema the values are queried from.
    pub schema: ARNameType,
    /// Server holding that schema.
    pub server: ARServerNameType,
    /// Compiled predicate selecting the value entries.
    pub qualifier: *mut c_void,
    /// Field holding the label on the queried schema.
    pub name_field: ARInternalId,
    /// Field holding the ordinal on the queried schema.
    pub number_field: ARInternalId,
}

/// Union over the three enum limit styles; `list_style` selects the arm.
#[repr(C)]
#[derive(Clone, Copy)]
pub union AREnumLimitsUnion {
    /// Regular style: ordinal = position in this list.
    pub regular_list: ARNameList,
    /// Custom style: explicit ordinal/label pairs.
    pub custom_list: AREnumItemList,
    /// Query style: values computed by another query.
    pub query_list: AREnumQueryStruct,
}

/// Legal-value definition of an enumeration field.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct AREnumLimitsStruct {
    /// One of the `AR_ENUM_STYLE_*` constants.
    pub list_style: c_uint,
    /// Style-dependent payload.
    pub u: AREnumLimitsUnion,
}

/// Value limits of a character field.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ARCharLimitsStruct {
    /// Maximum stored length; zero means unlimited.
    pub max_length: c_uint,
    /// Menu attachment style.
    pub menu_style: c_uint,
}

/// Union over per-data-type field limits; the owning struct's `data_type`
/// selects the arm.
#[repr(C)]
#[derive(Clone, Copy)]
pub union ARFieldLimitUnion {
    /// Limits of an enumeration field.
    pub enum_limits: AREnumLimitsStruct,
    /// Limits of a character field.
    pub char_limits: ARCharLimitsStruct,
}

/// Value limits of one field.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ARFieldLimitStruct {
    /// One of the `AR_DATA_TYPE_*` constants.
    pub data_type: c_uint,
    /// Type-dependent limits.
    pub u: ARFieldLimitUnion,
}

/// Counted list of field limits.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ARFieldLimitList {
    /// Number of limits in `field_limit_list`.
    pub num_items: c_uint,
    /// Library-allocated array of limits.
    pub field_limit_list: *mut ARFieldLimitStruct,
}

/// Union payload of a tagged value; the owning struct's `data_type` selects
/// the arm.
#[repr(C)]
#[derive(Clone, Copy)]
pub union ARValueUnion {
    /// Keyword number.
    pub key_num: c_uint,
    /// Integer value.
    pub int_val: c_long,
    /// Floating point value.
    pub real_val: f64,
    /// Character string; library-allocated, may be null.
    pub char_val: *mut c_char,
    /// Enumeration ordinal.
    pub enum_val: c_ulong,
    /// Seconds since the Unix epoch.
    pub time_val: ARTimestamp,
}

/// A tagged field value.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ARValueStruct {
    /// One of the `AR_DATA_TYPE_*` constants.
    pub data_type: c_uint,
    /// Tag-dependent payload.
    pub u: ARValueUnion,
}

/// A field id paired with its value.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ARFieldValueStruct {
    /// The field the value belongs to.
    pub field_id: ARInternalId,
    /// The tagged value.
    pub value: ARValueStruct,
}

/// Counted list of field values.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ARFieldValueList {
    /// Number of values in `field_value_list`.
    pub num_items: c_uint,
    /// Library-allocated array of values.
    pub field_value_list: *mut ARFieldValueStruct,
}

/// Counted list of entry ids.
///
/// Join schemas report more than one id per entry; plain schemas report
/// exactly one.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct AREntryIdList {
    /// Number of ids in `entry_id_list`.
    pub num_items: c_uint,
    /// Library-allocated array of ids.
    pub entry_id_list: *mut AREntryIdType,
}

/// One retrieved entry: its id list plus the requested field values.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct AREntryIdListFieldValueStruct {
    /// Ids identifying the entry.
    pub entry_id: AREntryIdList,
    /// Library-allocated list of the requested field values.
    pub entry_values: *mut ARFieldValueList,
}

/// Counted list of retrieved entries.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct AREntryListFieldValueList {
    /// Number of entries in `entry_list`.
    pub num_items: c_uint,
    /// Library-allocated array of entries.
    pub entry_list: *mut AREntryIdListFieldValueStruct,
}

/// One field selection item for entry retrieval.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct AREntryListFieldStruct {
    /// The field to retrieve.
    pub field_id: ARInternalId,
    /// Display column width; must be positive for entry retrieval. Values
    /// are returned structured, so the width does not affect decoding.
    pub column_width: c_uint,
    /// Display separator; one blank for entry retrieval.
    pub separator: [c_char; 10],
}

/// Counted list of field selection items. Allocated by the caller, not by
/// the library.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct AREntryListFieldList {
    /// Number of items in `fields_list`.
    pub num_items: c_uint,
    /// Caller-allocated array of items.
    pub fields_list: *mut AREntryListFieldStruct,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::ZeroInit;

    #[test]
    fn zeroed_lists_are_empty() {
        let status = ARStatusList::zeroed();
        assert_eq!(status.num_items, 0);
        assert!(status.status_list.is_null());

        let names = ARNameList::zeroed();
        assert_eq!(names.num_items, 0);
        assert!(names.name_list.is_null());

        let qualifier = ARQualifierStruct::zeroed();
        assert!(qualifier.node.is_null());
    }

    #[test]
    fn zeroed_control_has_empty_names() {
        let control = ARControlStruct::zeroed();
        assert_eq!(control.user[0], 0);
        assert_eq!(control.server[0], 0);
        assert_eq!(control.session_id, 0);
    }

    #[test]
    fn error_threshold_ordering() {
        assert!(AR_RETURN_OK < AR_RETURN_ERROR);
        assert!(AR_RETURN_WARNING < AR_RETURN_ERROR);
        assert!(AR_RETURN_FATAL >= AR_RETURN_ERROR);
    }
}
