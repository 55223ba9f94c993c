//! An in-process fake AR server.
//!
//! [`FakeArServer`] implements the dispatch trait with real C-compatible
//! allocations so the safe layer's pointer handling is exercised for real:
//! every list it populates is heap memory registered in a [`Ledger`], every
//! `free_*` entry point checks the block off, and a qualifier consumed
//! after its release trips an assertion. Tests configure schemas, fields
//! and entries up front, optionally arm one-shot failures, and assert
//! afterwards that nothing is live.

use crate::ledger::Ledger;
use arsclient_sys::*;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_long, c_uint, c_ulong};
use std::ptr;

/// Operation names accepted by [`FakeArServer::fail_next`] and
/// [`FakeArServer::call_count`].
pub mod ops {
    /// Session initialization.
    pub const INITIALIZE: &str = "initialize";
    /// Port and RPC program number binding.
    pub const SET_SERVER_PORT: &str = "set_server_port";
    /// Session termination.
    pub const TERMINATE: &str = "terminate";
    /// Schema listing.
    pub const LIST_SCHEMAS: &str = "list_schemas";
    /// Field id listing.
    pub const LIST_FIELD_IDS: &str = "list_field_ids";
    /// Field metadata retrieval.
    pub const FIELD_METADATA: &str = "field_metadata";
    /// Qualifier compilation.
    pub const COMPILE_QUALIFIER: &str = "compile_qualifier";
    /// Entry retrieval.
    pub const ENTRIES_WITH_FIELDS: &str = "entries_with_fields";
}

mod kinds {
    pub const STATUS_ARRAY: &str = "status array";
    pub const STATUS_TEXT: &str = "status text";
    pub const NAME_ARRAY: &str = "name array";
    pub const ID_ARRAY: &str = "field id array";
    pub const BOOLEAN_ARRAY: &str = "boolean array";
    pub const LIMIT_ARRAY: &str = "limit array";
    pub const ENUM_NAME_ARRAY: &str = "enum name array";
    pub const ENUM_ITEM_ARRAY: &str = "enum item array";
    pub const QUALIFIER_NODE: &str = "qualifier node";
    pub const ENTRY_ARRAY: &str = "entry array";
    pub const ENTRY_ID_ARRAY: &str = "entry id array";
    pub const VALUE_LIST: &str = "value list";
    pub const VALUE_ARRAY: &str = "value array";
    pub const VALUE_TEXT: &str = "value text";
}

/// Enumeration definition of a fake enum field.
#[derive(Debug, Clone)]
pub enum EnumDef {
    /// Labels whose ordinals are their positions.
    Regular(Vec<String>),
    /// Explicit ordinal/label pairs.
    Custom(Vec<(u32, String)>),
    /// Server-side query style; the client cannot decode these.
    Query,
}

/// A stored field value, encoded on retrieval.
#[derive(Debug, Clone)]
pub enum FakeValue {
    /// No value.
    Null,
    /// Character data.
    Text(String),
    /// An enum ordinal.
    Enum(u32),
    /// Seconds since the epoch.
    Time(i64),
    /// An integer, which the client declares unsupported.
    Integer(i64),
}

#[derive(Debug, Clone)]
struct FakeField {
    name: String,
    data_type: c_uint,
    enum_def: Option<EnumDef>,
}

#[derive(Debug, Clone)]
struct FakeEntry {
    ids: Vec<String>,
    values: HashMap<ARInternalId, FakeValue>,
}

#[derive(Debug, Clone, Default)]
struct FakeSchema {
    fields: BTreeMap<ARInternalId, FakeField>,
    entries: Vec<FakeEntry>,
}

#[derive(Default)]
struct State {
    schemas: BTreeMap<String, FakeSchema>,
    fail_next: HashMap<String, (c_long, String)>,
    calls: HashMap<&'static str, usize>,
    bound_port: Option<(u16, u32)>,
    next_session: c_uint,
}

/// The fake server. Cheap to construct, one per test.
#[derive(Default)]
pub struct FakeArServer {
    state: Mutex<State>,
    ledger: Ledger,
}

impl FakeArServer {
    /// Creates an empty server with no schemas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty schema.
    pub fn add_schema(&self, schema: &str) {
        self.state
            .lock()
            .schemas
            .entry(schema.to_string())
            .or_default();
    }

    /// Adds a character field to `schema`.
    pub fn add_text_field(&self, schema: &str, id: ARInternalId, name: &str) {
        self.add_field(schema, id, name, AR_DATA_TYPE_CHAR, None);
    }

    /// Adds a timestamp field to `schema`.
    pub fn add_time_field(&self, schema: &str, id: ARInternalId, name: &str) {
        self.add_field(schema, id, name, AR_DATA_TYPE_TIME, None);
    }

    /// Adds an integer field to `schema`.
    pub fn add_integer_field(&self, schema: &str, id: ARInternalId, name: &str) {
        self.add_field(schema, id, name, AR_DATA_TYPE_INTEGER, None);
    }

    /// Adds an enumeration field to `schema`.
    pub fn add_enum_field(&self, schema: &str, id: ARInternalId, name: &str, def: EnumDef) {
        self.add_field(schema, id, name, AR_DATA_TYPE_ENUM, Some(def));
    }

    fn add_field(
        &self,
        schema: &str,
        id: ARInternalId,
        name: &str,
        data_type: c_uint,
        enum_def: Option<EnumDef>,
    ) {
        let mut state = self.state.lock();
        state
            .schemas
            .entry(schema.to_string())
            .or_default()
            .fields
            .insert(
                id,
                FakeField {
                    name: name.to_string(),
                    data_type,
                    enum_def,
                },
            );
    }

    /// Adds an entry with a single identifier.
    pub fn add_entry(&self, schema: &str, id: &str, values: Vec<(ARInternalId, FakeValue)>) {
        self.add_entry_with_ids(schema, &[id], values);
    }

    /// Adds an entry reporting the given identifiers. Well-formed entries
    /// have exactly one; passing several builds a malformed entry for
    /// integrity-check tests.
    pub fn add_entry_with_ids(
        &self,
        schema: &str,
        ids: &[&str],
        values: Vec<(ARInternalId, FakeValue)>,
    ) {
        let mut state = self.state.lock();
        state
            .schemas
            .entry(schema.to_string())
            .or_default()
            .entries
            .push(FakeEntry {
                ids: ids.iter().map(ToString::to_string).collect(),
                values: values.into_iter().collect(),
            });
    }

    /// Arms a one-shot failure: the next call of `op` fails with the given
    /// message number and text, delivered through the status list.
    pub fn fail_next(&self, op: &str, code: c_long, text: &str) {
        self.state
            .lock()
            .fail_next
            .insert(op.to_string(), (code, text.to_string()));
    }

    /// Number of times `op` has been called.
    #[must_use]
    pub fn call_count(&self, op: &str) -> usize {
        self.state.lock().calls.get(op).copied().unwrap_or(0)
    }

    /// The port and RPC program number bound by the session, if any.
    #[must_use]
    pub fn bound_port(&self) -> Option<(u16, u32)> {
        self.state.lock().bound_port
    }

    /// Number of blocks allocated and not yet released. Zero after a
    /// leak-free scenario.
    #[must_use]
    pub fn live(&self) -> usize {
        self.ledger.live()
    }

    /// Total number of blocks handed out.
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.ledger.allocated()
    }

    /// Total number of blocks released.
    #[must_use]
    pub fn released(&self) -> usize {
        self.ledger.released()
    }

    /// Records the call and takes the armed failure for `op`, if any.
    fn enter(&self, op: &'static str) -> Option<(c_long, String)> {
        let mut state = self.state.lock();
        *state.calls.entry(op).or_insert(0) += 1;
        state.fail_next.remove(op)
    }

    fn alloc_array<T>(&self, items: Vec<T>, kind: &'static str) -> (*mut T, c_uint) {
        if items.is_empty() {
            return (ptr::null_mut(), 0);
        }
        let len = items.len() as c_uint;
        let raw = Box::into_raw(items.into_boxed_slice()).cast::<T>();
        self.ledger.register(raw as *const (), kind);
        (raw, len)
    }

    unsafe fn free_array<T>(&self, raw: *mut T, len: c_uint, kind: &'static str) {
        if raw.is_null() || len == 0 {
            return;
        }
        self.ledger.release(raw as *const (), kind);
        drop(Box::from_raw(ptr::slice_from_raw_parts_mut(
            raw,
            len as usize,
        )));
    }

    fn alloc_box<T>(&self, value: T, kind: &'static str) -> *mut T {
        let raw = Box::into_raw(Box::new(value));
        self.ledger.register(raw as *const (), kind);
        raw
    }

    unsafe fn free_box<T>(&self, raw: *mut T, kind: &'static str) {
        if raw.is_null() {
            return;
        }
        self.ledger.release(raw as *const (), kind);
        drop(Box::from_raw(raw));
    }

    fn alloc_cstring(&self, text: &str, kind: &'static str) -> *mut c_char {
        let raw = CString::new(text)
            .unwrap_or_else(|_| CString::new("invalid text").unwrap())
            .into_raw();
        self.ledger.register(raw as *const (), kind);
        raw
    }

    unsafe fn free_cstring(&self, raw: *mut c_char, kind: &'static str) {
        if raw.is_null() {
            return;
        }
        self.ledger.release(raw as *const (), kind);
        drop(CString::from_raw(raw));
    }

    /// Fills `status` with one record and returns the failure outcome.
    unsafe fn fail(
        &self,
        status: *mut ARStatusList,
        code: c_long,
        text: &str,
    ) -> c_int {
        if !status.is_null() {
            let record = ARStatusStruct {
                message_type: 2,
                message_num: code,
                message_text: self.alloc_cstring(text, kinds::STATUS_TEXT),
                appended_text: ptr::null_mut(),
            };
            let (raw, len) = self.alloc_array(vec![record], kinds::STATUS_ARRAY);
            (*status).num_items = len;
            (*status).status_list = raw;
        }
        AR_RETURN_ERROR
    }

    unsafe fn armed_failure(
        &self,
        op: &'static str,
        status: *mut ARStatusList,
    ) -> Option<c_int> {
        self.enter(op)
            .map(|(code, text)| self.fail(status, code, &text))
    }

    fn name_array(&self, names: &[String], kind: &'static str) -> (*mut ARNameType, c_uint) {
        let items: Vec<ARNameType> = names
            .iter()
            .map(|name| {
                let mut fixed: ARNameType = [0; 255];
                strings::write_fixed(&mut fixed, name);
                fixed
            })
            .collect();
        self.alloc_array(items, kind)
    }

    fn enum_limits(&self, def: &EnumDef) -> AREnumLimitsStruct {
        let mut limits = AREnumLimitsStruct {
            list_style: 0,
            u: AREnumLimitsUnion {
                regular_list: ARNameList {
                    num_items: 0,
                    name_list: ptr::null_mut(),
                },
            },
        };
        match def {
            EnumDef::Regular(labels) => {
                limits.list_style = AR_ENUM_STYLE_REGULAR;
                let (raw, len) = self.name_array(labels, kinds::ENUM_NAME_ARRAY);
                limits.u.regular_list = ARNameList {
                    num_items: len,
                    name_list: raw,
                };
            }
            EnumDef::Custom(pairs) => {
                limits.list_style = AR_ENUM_STYLE_CUSTOM;
                let items: Vec<AREnumItemStruct> = pairs
                    .iter()
                    .map(|(ordinal, label)| {
                        let mut item = AREnumItemStruct::zeroed();
                        strings::write_fixed(&mut item.item_name, label);
                        item.item_number = *ordinal as c_ulong;
                        item
                    })
                    .collect();
                let (raw, len) = self.alloc_array(items, kinds::ENUM_ITEM_ARRAY);
                limits.u.custom_list = AREnumItemList {
                    num_items: len,
                    enum_item_list: raw,
                };
            }
            EnumDef::Query => {
                limits.list_style = AR_ENUM_STYLE_QUERY;
            }
        }
        limits
    }

    fn encode_value(&self, value: &FakeValue) -> ARValueStruct {
        let mut raw = ARValueStruct::zeroed();
        match value {
            FakeValue::Null => raw.data_type = AR_DATA_TYPE_NULL,
            FakeValue::Text(text) => {
                raw.data_type = AR_DATA_TYPE_CHAR;
                raw.u.char_val = self.alloc_cstring(text, kinds::VALUE_TEXT);
            }
            FakeValue::Enum(ordinal) => {
                raw.data_type = AR_DATA_TYPE_ENUM;
                raw.u.enum_val = *ordinal as c_ulong;
            }
            FakeValue::Time(seconds) => {
                raw.data_type = AR_DATA_TYPE_TIME;
                raw.u.time_val = *seconds as ARTimestamp;
            }
            FakeValue::Integer(number) => {
                raw.data_type = AR_DATA_TYPE_INTEGER;
                raw.u.int_val = *number as c_long;
            }
        }
        raw
    }
}

impl ArLibrary for FakeArServer {
    unsafe fn initialize(
        &self,
        control: *mut ARControlStruct,
        status: *mut ARStatusList,
    ) -> c_int {
        if let Some(outcome) = self.armed_failure(ops::INITIALIZE, status) {
            return outcome;
        }
        let mut state = self.state.lock();
        state.next_session += 1;
        (*control).session_id = state.next_session;
        AR_RETURN_OK
    }

    unsafe fn set_server_port(
        &self,
        _control: *mut ARControlStruct,
        server: *const c_char,
        port: c_int,
        rpc_program_number: c_int,
        status: *mut ARStatusList,
    ) -> c_int {
        if let Some(outcome) = self.armed_failure(ops::SET_SERVER_PORT, status) {
            return outcome;
        }
        assert!(!server.is_null(), "port binding requires a server name");
        self.state.lock().bound_port = Some((port as u16, rpc_program_number as u32));
        AR_RETURN_OK
    }

    unsafe fn terminate(&self, _control: *mut ARControlStruct, status: *mut ARStatusList) -> c_int {
        if let Some(outcome) = self.armed_failure(ops::TERMINATE, status) {
            return outcome;
        }
        AR_RETURN_OK
    }

    unsafe fn list_schemas(
        &self,
        _control: *mut ARControlStruct,
        _changed_since: ARTimestamp,
        _schema_type: c_uint,
        name_list: *mut ARNameList,
        status: *mut ARStatusList,
    ) -> c_int {
        if let Some(outcome) = self.armed_failure(ops::LIST_SCHEMAS, status) {
            return outcome;
        }
        let names: Vec<String> = self.state.lock().schemas.keys().cloned().collect();
        let (raw, len) = self.name_array(&names, kinds::NAME_ARRAY);
        (*name_list).num_items = len;
        (*name_list).name_list = raw;
        AR_RETURN_OK
    }

    unsafe fn list_field_ids(
        &self,
        _control: *mut ARControlStruct,
        schema: *const c_char,
        _field_type: c_ulong,
        _changed_since: ARTimestamp,
        id_list: *mut ARInternalIdList,
        status: *mut ARStatusList,
    ) -> c_int {
        if let Some(outcome) = self.armed_failure(ops::LIST_FIELD_IDS, status) {
            return outcome;
        }
        let schema = CStr::from_ptr(schema).to_string_lossy().into_owned();
        let ids: Vec<ARInternalId> = match self.state.lock().schemas.get(&schema) {
            Some(found) => found.fields.keys().copied().collect(),
            None => return self.fail(status, 82, "Form does not exist on server"),
        };
        let (raw, len) = self.alloc_array(ids, kinds::ID_ARRAY);
        (*id_list).num_items = len;
        (*id_list).internal_id_list = raw;
        AR_RETURN_OK
    }

    unsafe fn field_metadata(
        &self,
        _control: *mut ARControlStruct,
        schema: *const c_char,
        ids: *const ARInternalIdList,
        exist_list: *mut ARBooleanList,
        name_list: *mut ARNameList,
        limit_list: *mut ARFieldLimitList,
        status: *mut ARStatusList,
    ) -> c_int {
        if let Some(outcome) = self.armed_failure(ops::FIELD_METADATA, status) {
            return outcome;
        }
        let schema = CStr::from_ptr(schema).to_string_lossy().into_owned();
        let fields = match self.state.lock().schemas.get(&schema) {
            Some(found) => found.fields.clone(),
            None => return self.fail(status, 82, "Form does not exist on server"),
        };

        let requested: Vec<ARInternalId> = if ids.is_null() || (*ids).internal_id_list.is_null() {
            Vec::new()
        } else {
            std::slice::from_raw_parts((*ids).internal_id_list, (*ids).num_items as usize).to_vec()
        };

        let mut exists: Vec<ARBoolean> = Vec::with_capacity(requested.len());
        let mut names: Vec<String> = Vec::with_capacity(requested.len());
        let mut limits: Vec<ARFieldLimitStruct> = Vec::with_capacity(requested.len());
        for id in &requested {
            match fields.get(id) {
                Some(field) => {
                    exists.push(1);
                    names.push(field.name.clone());
                    let mut limit = ARFieldLimitStruct::zeroed();
                    limit.data_type = field.data_type;
                    if let Some(def) = &field.enum_def {
                        limit.u.enum_limits = self.enum_limits(def);
                    }
                    limits.push(limit);
                }
                None => {
                    exists.push(0);
                    names.push(String::new());
                    limits.push(ARFieldLimitStruct::zeroed());
                }
            }
        }

        let (exist_raw, exist_len) = self.alloc_array(exists, kinds::BOOLEAN_ARRAY);
        (*exist_list).num_items = exist_len;
        (*exist_list).boolean_list = exist_raw;
        let (name_raw, name_len) = self.name_array(&names, kinds::NAME_ARRAY);
        (*name_list).num_items = name_len;
        (*name_list).name_list = name_raw;
        let (limit_raw, limit_len) = self.alloc_array(limits, kinds::LIMIT_ARRAY);
        (*limit_list).num_items = limit_len;
        (*limit_list).field_limit_list = limit_raw;
        AR_RETURN_OK
    }

    unsafe fn compile_qualifier(
        &self,
        _control: *mut ARControlStruct,
        schema: *const c_char,
        qualification: *const c_char,
        qualifier: *mut ARQualifierStruct,
        status: *mut ARStatusList,
    ) -> c_int {
        if let Some(outcome) = self.armed_failure(ops::COMPILE_QUALIFIER, status) {
            return outcome;
        }
        let schema = CStr::from_ptr(schema).to_string_lossy().into_owned();
        if !self.state.lock().schemas.contains_key(&schema) {
            return self.fail(status, 82, "Form does not exist on server");
        }
        // The compiled tree is faked as a copy of the qualification text;
        // retrieval only checks that the block is still live.
        let text = CStr::from_ptr(qualification).to_string_lossy().into_owned();
        (*qualifier).operation = 1;
        (*qualifier).node = self
            .alloc_cstring(&text, kinds::QUALIFIER_NODE)
            .cast::<std::os::raw::c_void>();
        AR_RETURN_OK
    }

    unsafe fn entries_with_fields(
        &self,
        _control: *mut ARControlStruct,
        schema: *const c_char,
        qualifier: *const ARQualifierStruct,
        selection: *const AREntryListFieldList,
        _first_retrieve: c_uint,
        _max_retrieve: c_uint,
        entry_list: *mut AREntryListFieldValueList,
        num_matches: *mut c_uint,
        status: *mut ARStatusList,
    ) -> c_int {
        if let Some(outcome) = self.armed_failure(ops::ENTRIES_WITH_FIELDS, status) {
            return outcome;
        }
        assert!(!qualifier.is_null(), "retrieval requires a qualifier");
        let node = (*qualifier).node;
        assert!(
            !node.is_null() && self.ledger.is_live(node as *const ()),
            "qualifier used after release"
        );

        let schema = CStr::from_ptr(schema).to_string_lossy().into_owned();
        let found = match self.state.lock().schemas.get(&schema) {
            Some(found) => found.clone(),
            None => return self.fail(status, 82, "Form does not exist on server"),
        };

        let selected: Vec<ARInternalId> = if selection.is_null() || (*selection).fields_list.is_null()
        {
            Vec::new()
        } else {
            std::slice::from_raw_parts((*selection).fields_list, (*selection).num_items as usize)
                .iter()
                .map(|item| item.field_id)
                .collect()
        };

        // The fake does not evaluate qualifications; every entry matches.
        let mut entries: Vec<AREntryIdListFieldValueStruct> =
            Vec::with_capacity(found.entries.len());
        for entry in &found.entries {
            let id_items: Vec<AREntryIdType> = entry
                .ids
                .iter()
                .map(|id| {
                    let mut fixed: AREntryIdType = [0; 16];
                    strings::write_fixed(&mut fixed, id);
                    fixed
                })
                .collect();
            let (id_raw, id_len) = self.alloc_array(id_items, kinds::ENTRY_ID_ARRAY);

            let value_items: Vec<ARFieldValueStruct> = selected
                .iter()
                .map(|field_id| ARFieldValueStruct {
                    field_id: *field_id,
                    value: self
                        .encode_value(entry.values.get(field_id).unwrap_or(&FakeValue::Null)),
                })
                .collect();
            let (value_raw, value_len) = self.alloc_array(value_items, kinds::VALUE_ARRAY);
            let values = self.alloc_box(
                ARFieldValueList {
                    num_items: value_len,
                    field_value_list: value_raw,
                },
                kinds::VALUE_LIST,
            );

            entries.push(AREntryIdListFieldValueStruct {
                entry_id: AREntryIdList {
                    num_items: id_len,
                    entry_id_list: id_raw,
                },
                entry_values: values,
            });
        }

        let match_count = entries.len() as c_uint;
        let (entry_raw, entry_len) = self.alloc_array(entries, kinds::ENTRY_ARRAY);
        (*entry_list).num_items = entry_len;
        (*entry_list).entry_list = entry_raw;
        if !num_matches.is_null() {
            *num_matches = match_count;
        }
        AR_RETURN_OK
    }

    unsafe fn free_status_list(&self, list: *mut ARStatusList) {
        if list.is_null() {
            return;
        }
        let records = (*list).status_list;
        let len = (*list).num_items;
        if !records.is_null() && len > 0 {
            for record in std::slice::from_raw_parts(records, len as usize) {
                self.free_cstring(record.message_text, kinds::STATUS_TEXT);
                self.free_cstring(record.appended_text, kinds::STATUS_TEXT);
            }
        }
        self.free_array(records, len, kinds::STATUS_ARRAY);
        (*list).num_items = 0;
        (*list).status_list = ptr::null_mut();
    }

    unsafe fn free_name_list(&self, list: *mut ARNameList) {
        if list.is_null() {
            return;
        }
        self.free_array((*list).name_list, (*list).num_items, kinds::NAME_ARRAY);
        (*list).num_items = 0;
        (*list).name_list = ptr::null_mut();
    }

    unsafe fn free_internal_id_list(&self, list: *mut ARInternalIdList) {
        if list.is_null() {
            return;
        }
        self.free_array(
            (*list).internal_id_list,
            (*list).num_items,
            kinds::ID_ARRAY,
        );
        (*list).num_items = 0;
        (*list).internal_id_list = ptr::null_mut();
    }

    unsafe fn free_boolean_list(&self, list: *mut ARBooleanList) {
        if list.is_null() {
            return;
        }
        self.free_array(
            (*list).boolean_list,
            (*list).num_items,
            kinds::BOOLEAN_ARRAY,
        );
        (*list).num_items = 0;
        (*list).boolean_list = ptr::null_mut();
    }

    unsafe fn free_field_limit_list(&self, list: *mut ARFieldLimitList) {
        if list.is_null() {
            return;
        }
        let limits = (*list).field_limit_list;
        let len = (*list).num_items;
        if !limits.is_null() && len > 0 {
            for limit in std::slice::from_raw_parts(limits, len as usize) {
                if limit.data_type != AR_DATA_TYPE_ENUM {
                    continue;
                }
                let enum_limits = &limit.u.enum_limits;
                match enum_limits.list_style {
                    AR_ENUM_STYLE_REGULAR => {
                        let inner = &enum_limits.u.regular_list;
                        self.free_array(inner.name_list, inner.num_items, kinds::ENUM_NAME_ARRAY);
                    }
                    AR_ENUM_STYLE_CUSTOM => {
                        let inner = &enum_limits.u.custom_list;
                        self.free_array(
                            inner.enum_item_list,
                            inner.num_items,
                            kinds::ENUM_ITEM_ARRAY,
                        );
                    }
                    _ => {}
                }
            }
        }
        self.free_array(limits, len, kinds::LIMIT_ARRAY);
        (*list).num_items = 0;
        (*list).field_limit_list = ptr::null_mut();
    }

    unsafe fn free_qualifier(&self, qualifier: *mut ARQualifierStruct) {
        if qualifier.is_null() {
            return;
        }
        let node = (*qualifier).node;
        if !node.is_null() {
            self.free_cstring(node.cast::<c_char>(), kinds::QUALIFIER_NODE);
        }
        (*qualifier).operation = 0;
        (*qualifier).node = ptr::null_mut();
    }

    unsafe fn free_entry_list(&self, list: *mut AREntryListFieldValueList) {
        if list.is_null() {
            return;
        }
        let entries = (*list).entry_list;
        let len = (*list).num_items;
        if !entries.is_null() && len > 0 {
            for entry in std::slice::from_raw_parts(entries, len as usize) {
                self.free_array(
                    entry.entry_id.entry_id_list,
                    entry.entry_id.num_items,
                    kinds::ENTRY_ID_ARRAY,
                );
                let values = entry.entry_values;
                if !values.is_null() {
                    let value_items = (*values).field_value_list;
                    let value_len = (*values).num_items;
                    if !value_items.is_null() && value_len > 0 {
                        for item in std::slice::from_raw_parts(value_items, value_len as usize) {
                            if item.value.data_type == AR_DATA_TYPE_CHAR {
                                self.free_cstring(item.value.u.char_val, kinds::VALUE_TEXT);
                            }
                        }
                    }
                    self.free_array(value_items, value_len, kinds::VALUE_ARRAY);
                    self.free_box(values, kinds::VALUE_LIST);
                }
            }
        }
        self.free_array(entries, len, kinds::ENTRY_ARRAY);
        (*list).num_items = 0;
        (*list).entry_list = ptr::null_mut();
    }
}
