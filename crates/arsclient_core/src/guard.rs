//! Resource guards for native out-structures.
//!
//! Every structure the library populates must be released exactly once,
//! on every exit path, and never read afterwards. [`Owned`] encodes that
//! protocol as ownership: the guard zero-initializes the structure before
//! the call and releases it when dropped, so early returns and `?` cannot
//! leak. Deferred release of chained inputs (a qualifier consumed by a
//! later call) is expressed by declaring the guard in the composite
//! operation's scope instead of the individual call's block.

use arsclient_sys::{
    strings, AREntryListFieldList, AREntryListFieldStruct, ARInternalId, ArLibrary, Releasable,
    ZeroInit,
};
use std::os::raw::c_uint;
use std::sync::Arc;

/// A native out-structure whose contents are owned by `lib` until released.
pub struct Owned<T: Releasable> {
    lib: Arc<dyn ArLibrary>,
    inner: Box<T>,
}

impl<T: Releasable> Owned<T> {
    /// Creates a zero-filled structure ready to be passed as an
    /// out-parameter. Zero-filling is mandatory: some library code paths
    /// read the structure before writing it.
    pub fn new(lib: Arc<dyn ArLibrary>) -> Self {
        Self {
            lib,
            inner: Box::new(T::zeroed()),
        }
    }

    /// Pointer for the populating call.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        &mut *self.inner
    }

    /// Pointer for calls consuming the populated structure.
    pub fn as_ptr(&self) -> *const T {
        &*self.inner
    }

    /// Borrows the populated structure.
    pub fn get(&self) -> &T {
        &self.inner
    }
}

impl<T: Releasable> Drop for Owned<T> {
    fn drop(&mut self) {
        // SAFETY: `inner` was zero-initialized and only ever populated by
        // `lib`; drop runs at most once, so the contents are released
        // exactly once and never read afterwards.
        unsafe { T::release(&*self.lib, &mut *self.inner) };
    }
}

/// The caller-built field selection for entry retrieval.
///
/// Unlike the structures above, this one's memory is allocated on the Rust
/// side, so releasing it through the vendor's allocator would be unsound;
/// dropping the backing slice is its release step. The column width and
/// separator are display-only parameters required to be a positive width
/// and a single blank by the retrieval entry point; values come back
/// structured, so they do not influence decoding.
pub(crate) struct FieldSelection {
    /// Backing storage for `list.fields_list`; kept alive, never read back.
    _items: Box<[AREntryListFieldStruct]>,
    list: AREntryListFieldList,
}

impl FieldSelection {
    /// Builds a selection naming `ids`, in order.
    pub(crate) fn new(ids: &[ARInternalId]) -> Self {
        let items: Vec<AREntryListFieldStruct> = ids
            .iter()
            .map(|&field_id| {
                let mut item = AREntryListFieldStruct::zeroed();
                item.field_id = field_id;
                item.column_width = 1;
                strings::write_fixed(&mut item.separator, " ");
                item
            })
            .collect();
        let mut items = items.into_boxed_slice();
        let list = AREntryListFieldList {
            num_items: items.len() as c_uint,
            fields_list: items.as_mut_ptr(),
        };
        Self { _items: items, list }
    }

    /// Pointer for the retrieval call. Valid for as long as `self` lives.
    pub(crate) fn as_ptr(&self) -> *const AREntryListFieldList {
        &self.list
    }

    /// Number of selected fields.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self._items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arsclient_sys::*;
    use std::os::raw::{c_char, c_int, c_ulong};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts release calls; every populating entry point is unreachable.
    #[derive(Default)]
    struct ReleaseCounter {
        status_frees: AtomicUsize,
        qualifier_frees: AtomicUsize,
    }

    impl ArLibrary for ReleaseCounter {
        unsafe fn initialize(&self, _: *mut ARControlStruct, _: *mut ARStatusList) -> c_int {
            unreachable!()
        }
        unsafe fn set_server_port(
            &self,
            _: *mut ARControlStruct,
            _: *const c_char,
            _: c_int,
            _: c_int,
            _: *mut ARStatusList,
        ) -> c_int {
            unreachable!()
        }
        unsafe fn terminate(&self, _: *mut ARControlStruct, _: *mut ARStatusList) -> c_int {
            unreachable!()
        }
        unsafe fn list_schemas(
            &self,
            _: *mut ARControlStruct,
            _: ARTimestamp,
            _: c_uint,
            _: *mut ARNameList,
            _: *mut ARStatusList,
        ) -> c_int {
            unreachable!()
        }
        unsafe fn list_field_ids(
            &self,
            _: *mut ARControlStruct,
            _: *const c_char,
            _: c_ulong,
            _: ARTimestamp,
            _: *mut ARInternalIdList,
            _: *mut ARStatusList,
        ) -> c_int {
            unreachable!()
        }
        unsafe fn field_metadata(
            &self,
            _: *mut ARControlStruct,
            _: *const c_char,
            _: *const ARInternalIdList,
            _: *mut ARBooleanList,
            _: *mut ARNameList,
            _: *mut ARFieldLimitList,
            _: *mut ARStatusList,
        ) -> c_int {
            unreachable!()
        }
        unsafe fn compile_qualifier(
            &self,
            _: *mut ARControlStruct,
            _: *const c_char,
            _: *const c_char,
            _: *mut ARQualifierStruct,
            _: *mut ARStatusList,
        ) -> c_int {
            unreachable!()
        }
        unsafe fn entries_with_fields(
            &self,
            _: *mut ARControlStruct,
            _: *const c_char,
            _: *const ARQualifierStruct,
            _: *const AREntryListFieldList,
            _: c_uint,
            _: c_uint,
            _: *mut AREntryListFieldValueList,
            _: *mut c_uint,
            _: *mut ARStatusList,
        ) -> c_int {
            unreachable!()
        }
        unsafe fn free_status_list(&self, _: *mut ARStatusList) {
            self.status_frees.fetch_add(1, Ordering::SeqCst);
        }
        unsafe fn free_name_list(&self, _: *mut ARNameList) {}
        unsafe fn free_internal_id_list(&self, _: *mut ARInternalIdList) {}
        unsafe fn free_boolean_list(&self, _: *mut ARBooleanList) {}
        unsafe fn free_field_limit_list(&self, _: *mut ARFieldLimitList) {}
        unsafe fn free_qualifier(&self, _: *mut ARQualifierStruct) {
            self.qualifier_frees.fetch_add(1, Ordering::SeqCst);
        }
        unsafe fn free_entry_list(&self, _: *mut AREntryListFieldValueList) {}
    }

    #[test]
    fn guard_releases_exactly_once_on_drop() {
        let lib = Arc::new(ReleaseCounter::default());
        {
            let mut status = Owned::<ARStatusList>::new(lib.clone());
            assert!(!status.as_mut_ptr().is_null());
            assert_eq!(status.get().num_items, 0);
        }
        assert_eq!(lib.status_frees.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn guard_releases_on_early_return() {
        let lib = Arc::new(ReleaseCounter::default());
        fn fails(lib: Arc<ReleaseCounter>) -> Result<(), ()> {
            let _qualifier = Owned::<ARQualifierStruct>::new(lib);
            Err(())
        }
        assert!(fails(lib.clone()).is_err());
        assert_eq!(lib.qualifier_frees.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn field_selection_layout() {
        let selection = FieldSelection::new(&[7, 8, 536_870_913]);
        assert_eq!(selection.len(), 3);
        let list = unsafe { &*selection.as_ptr() };
        assert_eq!(list.num_items, 3);
        let items = unsafe { std::slice::from_raw_parts(list.fields_list, 3) };
        assert_eq!(items[0].field_id, 7);
        assert_eq!(items[2].field_id, 536_870_913);
        assert_eq!(items[1].column_width, 1);
        assert_eq!(items[1].separator[0], b' ' as c_char);
        assert_eq!(items[1].separator[1], 0);
    }

    #[test]
    fn empty_field_selection() {
        let selection = FieldSelection::new(&[]);
        let list = unsafe { &*selection.as_ptr() };
        assert_eq!(list.num_items, 0);
    }
}
