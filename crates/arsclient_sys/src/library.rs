//! The AR client library dispatch trait and release plumbing.

use crate::types::*;
use std::os::raw::{c_char, c_int, c_uint, c_ulong};

/// Marker for structures whose all-zero bit pattern is a valid empty value.
///
/// Every vendor out-structure must be zero-filled before the call that
/// populates it; some library code paths read the structure before writing
/// it.
///
/// # Safety
///
/// Implementors guarantee that a zeroed `Self` is a valid value: all pointer
/// fields null, all counts zero.
pub unsafe trait ZeroInit: Sized {
    /// Returns a zero-filled value.
    fn zeroed() -> Self {
        // SAFETY: the impl contract guarantees all-zero is valid for Self.
        unsafe { std::mem::zeroed() }
    }
}

// SAFETY: plain C data; null pointers and zero counts are the empty value.
unsafe impl ZeroInit for ARControlStruct {}
// SAFETY: as above.
unsafe impl ZeroInit for ARStatusList {}
// SAFETY: as above.
unsafe impl ZeroInit for ARNameList {}
// SAFETY: as above.
unsafe impl ZeroInit for ARInternalIdList {}
// SAFETY: as above.
unsafe impl ZeroInit for ARBooleanList {}
// SAFETY: as above.
unsafe impl ZeroInit for ARFieldLimitList {}
// SAFETY: as above.
unsafe impl ZeroInit for ARQualifierStruct {}
// SAFETY: as above.
unsafe impl ZeroInit for AREntryListFieldValueList {}
// SAFETY: as above.
unsafe impl ZeroInit for AREntryListFieldStruct {}
// SAFETY: as above.
unsafe impl ZeroInit for ARValueStruct {}
// SAFETY: as above.
unsafe impl ZeroInit for ARStatusStruct {}
// SAFETY: as above.
unsafe impl ZeroInit for ARFieldValueStruct {}
// SAFETY: as above.
unsafe impl ZeroInit for ARFieldLimitStruct {}
// SAFETY: as above.
unsafe impl ZeroInit for ARFieldValueList {}
// SAFETY: as above.
unsafe impl ZeroInit for AREntryIdListFieldValueStruct {}
// SAFETY: as above.
unsafe impl ZeroInit for AREnumItemStruct {}

/// Dispatch table over the AR client library entry points.
///
/// Implemented by [`crate::VendorLibrary`] (feature `vendor`) against the
/// real shared library, and by the testkit's fake server for tests.
///
/// # Contract
///
/// - Every populating entry point returns an outcome code; an outcome at or
///   above [`AR_RETURN_ERROR`] means failure.
/// - Every populating entry point also fills the `status` list; the caller
///   owns it and must release it through [`ArLibrary::free_status_list`].
/// - Every library-allocated structure must be released exactly once through
///   its matching `free_*` entry point, and never read afterwards.
/// - Releasing a zero-filled structure is a no-op.
///
/// All methods are `unsafe`: callers must pass pointers that are valid for
/// the vendor's documented access patterns.
pub trait ArLibrary: Send + Sync {
    /// Initializes a session described by `control`.
    unsafe fn initialize(&self, control: *mut ARControlStruct, status: *mut ARStatusList)
        -> c_int;

    /// Overrides the port and RPC program number used to reach `server`.
    unsafe fn set_server_port(
        &self,
        control: *mut ARControlStruct,
        server: *const c_char,
        port: c_int,
        rpc_program_number: c_int,
        status: *mut ARStatusList,
    ) -> c_int;

    /// Terminates the session described by `control`.
    unsafe fn terminate(&self, control: *mut ARControlStruct, status: *mut ARStatusList) -> c_int;

    /// Fills `name_list` with the schemas visible to the session.
    unsafe fn list_schemas(
        &self,
        control: *mut ARControlStruct,
        changed_since: ARTimestamp,
        schema_type: c_uint,
        name_list: *mut ARNameList,
        status: *mut ARStatusList,
    ) -> c_int;

    /// Fills `id_list` with the ids of `schema`'s fields matching
    /// `field_type`.
    unsafe fn list_field_ids(
        &self,
        control: *mut ARControlStruct,
        schema: *const c_char,
        field_type: c_ulong,
        changed_since: ARTimestamp,
        id_list: *mut ARInternalIdList,
        status: *mut ARStatusList,
    ) -> c_int;

    /// Fills metadata lists for the fields named by `ids`, index-aligned
    /// with it: whether each exists, its name, and its value limits.
    unsafe fn field_metadata(
        &self,
        control: *mut ARControlStruct,
        schema: *const c_char,
        ids: *const ARInternalIdList,
        exist_list: *mut ARBooleanList,
        name_list: *mut ARNameList,
        limit_list: *mut ARFieldLimitList,
        status: *mut ARStatusList,
    ) -> c_int;

    /// Compiles `qualification` against `schema` into `qualifier`.
    unsafe fn compile_qualifier(
        &self,
        control: *mut ARControlStruct,
        schema: *const c_char,
        qualification: *const c_char,
        qualifier: *mut ARQualifierStruct,
        status: *mut ARStatusList,
    ) -> c_int;

    /// Fills `entry_list` with the entries of `schema` matching `qualifier`,
    /// carrying the fields named by `selection`, and `num_matches` with the
    /// match count.
    #[allow(clippy::too_many_arguments)]
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
    ) -> c_int;

    /// Releases the contents of a status list.
    unsafe fn free_status_list(&self, list: *mut ARStatusList);

    /// Releases the contents of a name list.
    unsafe fn free_name_list(&self, list: *mut ARNameList);

    /// Releases the contents of a field id list.
    unsafe fn free_internal_id_list(&self, list: *mut ARInternalIdList);

    /// Releases the contents of a boolean list.
    unsafe fn free_boolean_list(&self, list: *mut ARBooleanList);

    /// Releases the contents of a field limit list, including nested enum
    /// limit lists.
    unsafe fn free_field_limit_list(&self, list: *mut ARFieldLimitList);

    /// Releases a compiled qualifier's expression tree.
    unsafe fn free_qualifier(&self, qualifier: *mut ARQualifierStruct);

    /// Releases a retrieved entry list, including nested id and value lists.
    unsafe fn free_entry_list(&self, list: *mut AREntryListFieldValueList);
}

/// A vendor out-structure together with the release entry point that owns
/// its contents.
///
/// The safe layer's resource guard is generic over this trait; each
/// implementation dispatches to the single matching `free_*` method.
pub trait Releasable: ZeroInit {
    /// Releases the contents of `ptr` through `lib`.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a structure populated by `lib` (or still
    /// zero-filled) that has not been released before.
    unsafe fn release(lib: &dyn ArLibrary, ptr: *mut Self);
}

impl Releasable for ARStatusList {
    unsafe fn release(lib: &dyn ArLibrary, ptr: *mut Self) {
        lib.free_status_list(ptr);
    }
}

impl Releasable for ARNameList {
    unsafe fn release(lib: &dyn ArLibrary, ptr: *mut Self) {
        lib.free_name_list(ptr);
    }
}

impl Releasable for ARInternalIdList {
    unsafe fn release(lib: &dyn ArLibrary, ptr: *mut Self) {
        lib.free_internal_id_list(ptr);
    }
}

impl Releasable for ARBooleanList {
    unsafe fn release(lib: &dyn ArLibrary, ptr: *mut Self) {
        lib.free_boolean_list(ptr);
    }
}

impl Releasable for ARFieldLimitList {
    unsafe fn release(lib: &dyn ArLibrary, ptr: *mut Self) {
        lib.free_field_limit_list(ptr);
    }
}

impl Releasable for ARQualifierStruct {
    unsafe fn release(lib: &dyn ArLibrary, ptr: *mut Self) {
        lib.free_qualifier(ptr);
    }
}

impl Releasable for AREntryListFieldValueList {
    unsafe fn release(lib: &dyn ArLibrary, ptr: *mut Self) {
        lib.free_entry_list(ptr);
    }
}
