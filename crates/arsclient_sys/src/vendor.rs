//! Dispatch against the real AR client shared library.
//!
//! Compiled only with the `vendor` feature: the library is proprietary and
//! must be installed on the build host (`libar` / `libar_lx64`).

use crate::library::ArLibrary;
use crate::types::*;
use std::os::raw::{c_char, c_int, c_uint, c_ulong};

#[link(name = "ar")]
extern "C" {
    fn ARInitialization(control: *mut ARControlStruct, status: *mut ARStatusList) -> c_int;
    fn ARSetServerPort(
        control: *mut ARControlStruct,
        server: *const c_char,
        port: c_int,
        rpc_program_number: c_int,
        status: *mut ARStatusList,
    ) -> c_int;
    fn ARTermination(control: *mut ARControlStruct, status: *mut ARStatusList) -> c_int;
    fn ARGetListSchema(
        control: *mut ARControlStruct,
        changed_since: ARTimestamp,
        schema_type: c_uint,
        name_list: *mut ARNameList,
        status: *mut ARStatusList,
    ) -> c_int;
    fn ARGetListField(
        control: *mut ARControlStruct,
        schema: *const c_char,
        field_type: c_ulong,
        changed_since: ARTimestamp,
        id_list: *mut ARInternalIdList,
        status: *mut ARStatusList,
    ) -> c_int;
    fn ARGetMultipleFields(
        control: *mut ARControlStruct,
        schema: *const c_char,
        ids: *const ARInternalIdList,
        exist_list: *mut ARBooleanList,
        name_list: *mut ARNameList,
        limit_list: *mut ARFieldLimitList,
        status: *mut ARStatusList,
    ) -> c_int;
    fn ARLoadARQualifierStruct(
        control: *mut ARControlStruct,
        schema: *const c_char,
        qualification: *const c_char,
        qualifier: *mut ARQualifierStruct,
        status: *mut ARStatusList,
    ) -> c_int;
    fn ARGetListEntryWithFields(
        control: *mut ARControlStruct,
        schema: *const c_char,
        qualifier: *const ARQualifierStruct,
        selection: *const AREntryListFieldList,
        first_retrieve: c_uint,
        max_retrieve: c_uint,
        entry_list: *mut AREntryListFieldValueList,
        num_matches: *mut c_uint,
        status: *mut ARStatusList,
    ) -> c_int;
    fn FreeARStatusList(list: *mut ARStatusList, free_struct: ARBoolean);
    fn FreeARNameList(list: *mut ARNameList, free_struct: ARBoolean);
    fn FreeARInternalIdList(list: *mut ARInternalIdList, free_struct: ARBoolean);
    fn FreeARBooleanList(list: *mut ARBooleanList, free_struct: ARBoolean);
    fn FreeARFieldLimitList(list: *mut ARFieldLimitList, free_struct: ARBoolean);
    fn FreeARQualifierStruct(qualifier: *mut ARQualifierStruct, free_struct: ARBoolean);
    fn FreeAREntryListFieldValueList(list: *mut AREntryListFieldValueList, free_struct: ARBoolean);
}

/// The free entry points take a flag selecting whether to release the
/// structure itself as well as its contents. Our structures are Rust-owned,
/// so only contents are ever released.
const FREE_CONTENTS_ONLY: ARBoolean = 0;

/// [`ArLibrary`] backed by the vendor's shared library.
#[derive(Debug, Clone, Copy, Default)]
pub struct VendorLibrary;

impl VendorLibrary {
    /// Creates a dispatch handle. Linking happened at build time; this does
    /// not touch the library.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ArLibrary for VendorLibrary {
    unsafe fn initialize(
        &self,
        control: *mut ARControlStruct,
        status: *mut ARStatusList,
    ) -> c_int {
        ARInitialization(control, status)
    }

    unsafe fn set_server_port(
        &self,
        control: *mut ARControlStruct,
        server: *const c_char,
        port: c_int,
        rpc_program_number: c_int,
        status: *mut ARStatusList,
    ) -> c_int {
        ARSetServerPort(control, server, port, rpc_program_number, status)
    }

    unsafe fn terminate(&self, control: *mut ARControlStruct, status: *mut ARStatusList) -> c_int {
        ARTermination(control, status)
    }

    unsafe fn list_schemas(
        &self,
        control: *mut ARControlStruct,
        changed_since: ARTimestamp,
        schema_type: c_uint,
        name_list: *mut ARNameList,
        status: *mut ARStatusList,
    ) -> c_int {
        ARGetListSchema(control, changed_since, schema_type, name_list, status)
    }

    unsafe fn list_field_ids(
        &self,
        control: *mut ARControlStruct,
        schema: *const c_char,
        field_type: c_ulong,
        changed_since: ARTimestamp,
        id_list: *mut ARInternalIdList,
        status: *mut ARStatusList,
    ) -> c_int {
        ARGetListField(control, schema, field_type, changed_since, id_list, status)
    }

    unsafe fn field_metadata(
        &self,
        control: *mut ARControlStruct,
        schema: *const c_char,
        ids: *const ARInternalIdList,
        exist_list: *mut ARBooleanList,
        name_list: *mut ARNameList,
        limit_list: *mut ARFieldLimitList,
        status: *mut ARStatusList,
    ) -> c_int {
        ARGetMultipleFields(control, schema, ids, exist_list, name_list, limit_list, status)
    }

    unsafe fn compile_qualifier(
        &self,
        control: *mut ARControlStruct,
        schema: *const c_char,
        qualification: *const c_char,
        qualifier: *mut ARQualifierStruct,
        status: *mut ARStatusList,
    ) -> c_int {
        ARLoadARQualifierStruct(control, schema, qualification, qualifier, status)
    }

    unsafe fn entries_with_fields(
        &self,
        control: *mut ARControlStruct,
        schema: *const c_char,
        qualifier: *const ARQualifierStruct,
        selection: *const AREntryListFieldList,
        first_retrieve: c_uint,
        max_retrieve: c_uint,
        entry_list: *mut AREntryListFieldValueList,
        num_matches: *mut c_uint,
        status: *mut ARStatusList,
    ) -> c_int {
        ARGetListEntryWithFields(
            control,
            schema,
            qualifier,
            selection,
            first_retrieve,
            max_retrieve,
            entry_list,
            num_matches,
            status,
        )
    }

    unsafe fn free_status_list(&self, list: *mut ARStatusList) {
        FreeARStatusList(list, FREE_CONTENTS_ONLY);
    }

    unsafe fn free_name_list(&self, list: *mut ARNameList) {
        FreeARNameList(list, FREE_CONTENTS_ONLY);
    }

    unsafe fn free_internal_id_list(&self, list: *mut ARInternalIdList) {
        FreeARInternalIdList(list, FREE_CONTENTS_ONLY);
    }

    unsafe fn free_boolean_list(&self, list: *mut ARBooleanList) {
        FreeARBooleanList(list, FREE_CONTENTS_ONLY);
    }

    unsafe fn free_field_limit_list(&self, list: *mut ARFieldLimitList) {
        FreeARFieldLimitList(list, FREE_CONTENTS_ONLY);
    }

    unsafe fn free_qualifier(&self, qualifier: *mut ARQualifierStruct) {
        FreeARQualifierStruct(qualifier, FREE_CONTENTS_ONLY);
    }

    unsafe fn free_entry_list(&self, list: *mut AREntryListFieldValueList) {
        FreeAREntryListFieldValueList(list, FREE_CONTENTS_ONLY);
    }
}
