//! The connection façade: session lifecycle, schema/field listing, and
//! qualification-based queries.

use crate::cache::{self, FieldTable};
use crate::config::ServerConfig;
use crate::error::{ClientError, ClientResult};
use crate::guard::{FieldSelection, Owned};
use crate::status::{self, StatusMessage};
use crate::value::{self, Value};
use arsclient_sys as sys;
use arsclient_sys::{ARInternalId, ArLibrary, ZeroInit};
use std::collections::HashMap;
use std::ffi::CString;
use std::fmt;
use std::os::raw::{c_int, c_uint};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Session lifecycle. Construction only ever returns a connected session;
/// termination is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Connected,
    Terminated,
}

/// One entry returned by [`Connection::query`].
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// The entry's identifier, exactly one per entry.
    pub id: String,
    /// Decoded values keyed by field name.
    pub values: HashMap<String, Value>,
}

/// An authenticated session against one server.
///
/// The connection owns the native session exclusively and is not internally
/// locked: the underlying control record and status buffer are mutable
/// shared state the vendor library does not protect, so all operations take
/// `&mut self` and callers wanting cross-thread sharing must provide their
/// own mutual exclusion. Independent connections are independent.
///
/// All operations are synchronous and block until the server responds;
/// timeouts, if any, belong to the native transport.
///
/// # Example
///
/// ```rust,ignore
/// use arsclient_core::{Connection, ServerConfig};
/// use arsclient_sys::VendorLibrary;
/// use std::sync::Arc;
///
/// let config = ServerConfig::new("ars1.example.com", "svc-reporting", "secret");
/// let mut conn = Connection::open(Arc::new(VendorLibrary::new()), &config)?;
/// for entry in conn.query(
///     "Incident",
///     "'Status' = \"Open\"",
///     &["Summary", "Created"],
/// )? {
///     println!("{}: {:?}", entry.id, entry.values);
/// }
/// conn.terminate()?;
/// ```
pub struct Connection {
    lib: Arc<dyn ArLibrary>,
    /// Boxed so the library sees a stable address for the session record.
    control: Box<sys::ARControlStruct>,
    state: SessionState,
    schema_cache: Option<Vec<String>>,
    field_tables: HashMap<String, FieldTable>,
    last_status: Vec<StatusMessage>,
}

impl Connection {
    /// Opens a connection: initializes a native session and, when the
    /// configuration carries a port or RPC program number override, binds
    /// it. Either both steps succeed or the construction fails whole: a
    /// failed port binding terminates the just-initialized session before
    /// the error propagates.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] when either native step fails,
    /// and [`ClientError::InvalidName`] when the server name cannot cross
    /// the C boundary.
    pub fn open(lib: Arc<dyn ArLibrary>, config: &ServerConfig) -> ClientResult<Self> {
        let server_c = cstring(&config.server)?;

        let mut control = Box::new(sys::ARControlStruct::zeroed());
        sys::strings::write_fixed(&mut control.server, &config.server);
        sys::strings::write_fixed(&mut control.user, &config.user);
        sys::strings::write_fixed(&mut control.password, &config.password);

        let mut conn = Self {
            lib,
            control,
            // Connected only once initialization succeeds, so an open
            // failure never triggers termination on drop.
            state: SessionState::Terminated,
            schema_cache: None,
            field_tables: HashMap::new(),
            last_status: Vec::new(),
        };

        let lib = conn.lib.clone();
        conn.native_call(
            "initialize",
            || format!("unable to initialize a session against server {}", config.server),
            |ctrl, status| unsafe { lib.initialize(ctrl, status) },
        )
        .map_err(ClientError::into_connection)?;
        conn.state = SessionState::Connected;
        debug!(server = %config.server, user = %config.user, "session initialized");

        if config.wants_port_binding() {
            let port = c_int::from(config.port);
            let rpc = config.rpc_program_number as c_int;
            let lib = conn.lib.clone();
            let bound = conn.native_call(
                "set_server_port",
                || {
                    format!(
                        "unable to bind port {} and RPC program number {} for server {}",
                        config.port, config.rpc_program_number, config.server
                    )
                },
                |ctrl, status| unsafe {
                    lib.set_server_port(ctrl, server_c.as_ptr(), port, rpc, status)
                },
            );
            if let Err(err) = bound {
                // No partially-initialized connection escapes.
                conn.close_native();
                return Err(err.into_connection());
            }
            debug!(port = config.port, rpc = config.rpc_program_number, "port binding applied");
        }

        Ok(conn)
    }

    /// Terminates the session. The connection transitions to the terminated
    /// state even when the native call fails; every subsequent operation is
    /// rejected with [`ClientError::Terminated`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] when the native call fails and
    /// [`ClientError::Terminated`] when the session was already terminated.
    pub fn terminate(&mut self) -> ClientResult<()> {
        self.require_connected()?;
        let lib = self.lib.clone();
        let result = self.native_call(
            "terminate",
            || "unable to terminate the session".to_string(),
            |ctrl, status| unsafe { lib.terminate(ctrl, status) },
        );
        self.state = SessionState::Terminated;
        result.map_err(ClientError::into_connection)
    }

    /// Whether the session is still connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    /// The server this session is bound to.
    #[must_use]
    pub fn server(&self) -> String {
        sys::strings::fixed_to_string(&self.control.server)
    }

    /// The authenticated user.
    #[must_use]
    pub fn user(&self) -> String {
        sys::strings::fixed_to_string(&self.control.user)
    }

    /// Decoded diagnostics of the most recently completed native call.
    /// Issuing a new call discards the previous call's diagnostics.
    #[must_use]
    pub fn diagnostics(&self) -> &[StatusMessage] {
        &self.last_status
    }

    /// Lists every schema on the server, memoized for the connection's
    /// lifetime: the first successful call performs the native round-trip,
    /// subsequent calls return the cached list.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NativeCall`] when the listing call fails.
    pub fn schemas(&mut self) -> ClientResult<Vec<String>> {
        self.require_connected()?;
        if let Some(cached) = &self.schema_cache {
            return Ok(cached.clone());
        }

        let lib = self.lib.clone();
        let mut names = Owned::<sys::ARNameList>::new(lib.clone());
        self.native_call(
            "list_schemas",
            || "unable to obtain the schema list".to_string(),
            |ctrl, status| unsafe {
                lib.list_schemas(ctrl, 0, sys::AR_LIST_SCHEMA_ALL, names.as_mut_ptr(), status)
            },
        )?;

        // SAFETY: the list was populated by the library.
        let schemas = unsafe { name_list_strings(names.get()) };
        debug!(count = schemas.len(), "schema list cached");
        self.schema_cache = Some(schemas.clone());
        Ok(schemas)
    }

    /// Lists the data field names of `schema`, lexicographically sorted.
    /// Field metadata is cached on first use; see [`Connection::query`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NativeCall`] when metadata retrieval fails and
    /// [`ClientError::Unsupported`] when the schema has a query-style enum
    /// field.
    pub fn fields(&mut self, schema: &str) -> ClientResult<Vec<String>> {
        self.require_connected()?;
        self.ensure_fields(schema)?;
        Ok(self
            .field_tables
            .get(schema)
            .map(FieldTable::sorted_names)
            .unwrap_or_default())
    }

    /// Runs `qualification` against `schema` and returns every matching
    /// entry carrying the requested `fields`, decoded.
    ///
    /// Requested field names are validated against the schema's cached
    /// metadata before anything native is built, so an unknown name fails
    /// without allocating. Every entry must report exactly one identifier.
    ///
    /// # Errors
    ///
    /// [`ClientError::UnknownField`] for a name the schema does not have,
    /// [`ClientError::NativeCall`] when compilation or retrieval fails,
    /// [`ClientError::DataIntegrity`] for contract-violating results, and
    /// [`ClientError::Unsupported`] for values this binding cannot decode.
    pub fn query(
        &mut self,
        schema: &str,
        qualification: &str,
        fields: &[&str],
    ) -> ClientResult<Vec<Entry>> {
        self.require_connected()?;
        self.ensure_fields(schema)?;

        let schema_c = cstring(schema)?;
        let qualification_c = cstring(qualification)?;
        let ctrl: *mut sys::ARControlStruct = &mut *self.control;
        let lib = self.lib.clone();

        let table = self
            .field_tables
            .get(schema)
            .ok_or_else(|| ClientError::data_integrity(format!("field table for schema {schema:?} vanished")))?;

        // Validate before building any native request, so nothing needs
        // unwinding when a name is wrong.
        let mut ids: Vec<ARInternalId> = Vec::with_capacity(fields.len());
        for &field in fields {
            match table.id_of(field) {
                Some(id) => ids.push(id),
                None => {
                    return Err(ClientError::UnknownField {
                        schema: schema.to_string(),
                        field: field.to_string(),
                    })
                }
            }
        }

        // Chained input: consumed by the retrieval call below, released by
        // the guard on every exit path from here on.
        let mut qualifier = Owned::<sys::ARQualifierStruct>::new(lib.clone());
        Self::run_call(
            &self.lib,
            &mut self.last_status,
            "compile_qualifier",
            || format!("unable to compile the qualification for schema {schema}"),
            |status| unsafe {
                lib.compile_qualifier(
                    ctrl,
                    schema_c.as_ptr(),
                    qualification_c.as_ptr(),
                    qualifier.as_mut_ptr(),
                    status,
                )
            },
        )?;

        let selection = FieldSelection::new(&ids);
        let mut entries = Owned::<sys::AREntryListFieldValueList>::new(lib.clone());
        let mut num_matches: c_uint = 0;
        Self::run_call(
            &self.lib,
            &mut self.last_status,
            "entries_with_fields",
            || format!("unable to retrieve entries for schema {schema}"),
            |status| unsafe {
                lib.entries_with_fields(
                    ctrl,
                    schema_c.as_ptr(),
                    qualifier.as_ptr(),
                    selection.as_ptr(),
                    sys::AR_START_WITH_FIRST_ENTRY,
                    sys::AR_NO_MAX_LIST_RETRIEVE,
                    entries.as_mut_ptr(),
                    &mut num_matches,
                    status,
                )
            },
        )?;
        trace!(schema, matches = num_matches, "entry retrieval completed");

        let list = entries.get();
        // SAFETY: the list was populated by the library.
        let entry_slice = unsafe { slice_of(list.entry_list, list.num_items) };
        let mut decoded = Vec::with_capacity(entry_slice.len());
        for entry in entry_slice {
            if entry.entry_id.num_items != 1 {
                return Err(ClientError::data_integrity(format!(
                    "an entry in schema {schema:?} reported {} identifiers; exactly one is required",
                    entry.entry_id.num_items
                )));
            }
            // SAFETY: num_items == 1 guarantees one id is present.
            let id = unsafe { sys::strings::fixed_to_string(&*entry.entry_id.entry_id_list) };

            // SAFETY: populated entries carry a valid values pointer.
            let values_list = unsafe { entry.entry_values.as_ref() }.ok_or_else(|| {
                ClientError::data_integrity(format!(
                    "entry {id} in schema {schema:?} carries no value list"
                ))
            })?;
            // SAFETY: as above.
            let value_slice =
                unsafe { slice_of(values_list.field_value_list, values_list.num_items) };

            let mut values = HashMap::with_capacity(value_slice.len());
            for field_value in value_slice {
                let field_name = table.name_of(field_value.field_id).ok_or_else(|| {
                    ClientError::data_integrity(format!(
                        "schema {schema:?} returned a value for unknown field id {}",
                        field_value.field_id
                    ))
                })?;
                // SAFETY: the value was populated by the library.
                let value = unsafe {
                    value::decode(
                        schema,
                        field_name,
                        &field_value.value,
                        table.enum_table(field_value.field_id),
                    )
                }?;
                values.insert(field_name.to_string(), value);
            }
            decoded.push(Entry { id, values });
        }
        Ok(decoded)
    }

    /// Populates the field table of `schema` if it is not cached yet.
    /// Idempotent: a cached schema performs no native round-trip. The table
    /// is built fresh and inserted whole, so a failure mid-build leaves the
    /// cache without an entry rather than a partial one.
    fn ensure_fields(&mut self, schema: &str) -> ClientResult<()> {
        if self.field_tables.contains_key(schema) {
            return Ok(());
        }

        let schema_c = cstring(schema)?;
        let lib = self.lib.clone();

        // Chained input: the id list feeds the metadata call below and is
        // released when the guard leaves this scope, on any path.
        let mut ids = Owned::<sys::ARInternalIdList>::new(lib.clone());
        self.native_call(
            "list_field_ids",
            || format!("unable to obtain field ids for schema {schema}"),
            |ctrl, status| unsafe {
                lib.list_field_ids(
                    ctrl,
                    schema_c.as_ptr(),
                    sys::AR_FIELD_TYPE_DATA,
                    0,
                    ids.as_mut_ptr(),
                    status,
                )
            },
        )?;

        let mut exist = Owned::<sys::ARBooleanList>::new(lib.clone());
        let mut names = Owned::<sys::ARNameList>::new(lib.clone());
        let mut limits = Owned::<sys::ARFieldLimitList>::new(lib.clone());
        let ids_ptr = ids.as_ptr();
        self.native_call(
            "field_metadata",
            || format!("unable to obtain field metadata for schema {schema}"),
            |ctrl, status| unsafe {
                lib.field_metadata(
                    ctrl,
                    schema_c.as_ptr(),
                    ids_ptr,
                    exist.as_mut_ptr(),
                    names.as_mut_ptr(),
                    limits.as_mut_ptr(),
                    status,
                )
            },
        )?;

        // SAFETY: the lists were populated by the library.
        let id_slice = unsafe { slice_of(ids.get().internal_id_list, ids.get().num_items) };
        // SAFETY: as above.
        let name_slice = unsafe { slice_of(names.get().name_list, names.get().num_items) };
        // SAFETY: as above.
        let limit_slice =
            unsafe { slice_of(limits.get().field_limit_list, limits.get().num_items) };

        if name_slice.len() != id_slice.len() || limit_slice.len() != id_slice.len() {
            return Err(ClientError::data_integrity(format!(
                "metadata lists for schema {schema:?} are not aligned: {} ids, {} names, {} limits",
                id_slice.len(),
                name_slice.len(),
                limit_slice.len()
            )));
        }

        let mut table = FieldTable::default();
        for ((&field_id, name), limit) in id_slice.iter().zip(name_slice).zip(limit_slice) {
            let field_name = sys::strings::fixed_to_string(name);
            if limit.data_type == sys::AR_DATA_TYPE_ENUM {
                // SAFETY: the data type selects the enum arm of the union.
                let enum_limits = unsafe { &limit.u.enum_limits };
                let enum_table = match enum_limits.list_style {
                    // SAFETY: the list style selects the union arm.
                    sys::AR_ENUM_STYLE_REGULAR => cache::regular_enum_table(unsafe {
                        name_list_strings(&enum_limits.u.regular_list)
                    }),
                    // SAFETY: as above.
                    sys::AR_ENUM_STYLE_CUSTOM => cache::custom_enum_table(unsafe {
                        custom_enum_pairs(&enum_limits.u.custom_list)
                    }),
                    _ => {
                        return Err(ClientError::unsupported(format!(
                            "field {field_name:?} (id {field_id}) in schema {schema:?} \
                             is a query-style enum"
                        )))
                    }
                };
                table.insert_enum(field_id, enum_table);
            }
            table.insert_field(field_id, field_name);
        }

        debug!(schema, fields = table.len(), "field table cached");
        self.field_tables.insert(schema.to_string(), table);
        Ok(())
    }

    /// Rejects operations on a terminated session before anything native
    /// runs; the native layer's behavior after termination is undefined.
    fn require_connected(&self) -> ClientResult<()> {
        match self.state {
            SessionState::Connected => Ok(()),
            SessionState::Terminated => Err(ClientError::Terminated),
        }
    }

    /// Runs one native call with a status guard around it.
    fn native_call(
        &mut self,
        operation: &'static str,
        message: impl FnOnce() -> String,
        call: impl FnOnce(*mut sys::ARControlStruct, *mut sys::ARStatusList) -> c_int,
    ) -> ClientResult<()> {
        let ctrl: *mut sys::ARControlStruct = &mut *self.control;
        Self::run_call(&self.lib, &mut self.last_status, operation, message, |status| {
            call(ctrl, status)
        })
    }

    /// The outcome protocol shared by every native call: zero-initialized
    /// status list in a guard, invoke, record diagnostics, classify the
    /// outcome against the error threshold. The status guard releases the
    /// list when this function returns, on success and failure alike.
    fn run_call(
        lib: &Arc<dyn ArLibrary>,
        last_status: &mut Vec<StatusMessage>,
        operation: &'static str,
        message: impl FnOnce() -> String,
        call: impl FnOnce(*mut sys::ARStatusList) -> c_int,
    ) -> ClientResult<()> {
        let mut status = Owned::<sys::ARStatusList>::new(lib.clone());
        let outcome = call(status.as_mut_ptr());
        // SAFETY: the list was populated (or left empty) by the library.
        *last_status = unsafe { status::decode_list(status.get()) };
        trace!(operation, outcome, "native call completed");
        if outcome >= sys::AR_RETURN_ERROR {
            return Err(ClientError::NativeCall {
                operation,
                message: message(),
                status: last_status.clone(),
            });
        }
        Ok(())
    }

    /// Best-effort termination for drop and failed construction; failures
    /// are logged, not raised.
    fn close_native(&mut self) {
        if self.state != SessionState::Connected {
            return;
        }
        let lib = self.lib.clone();
        let result = self.native_call(
            "terminate",
            || "unable to terminate the session".to_string(),
            |ctrl, status| unsafe { lib.terminate(ctrl, status) },
        );
        if let Err(err) = result {
            warn!(error = %err, "session termination failed");
        }
        self.state = SessionState::Terminated;
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close_native();
    }
}

/// Manual impl: the dispatch handle and control record are not `Debug`,
/// and the control record holds the password, which must not leak into
/// logs or panic messages.
impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("server", &self.server())
            .field("user", &self.user())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Converts a name for the C boundary, rejecting interior NULs.
fn cstring(value: &str) -> ClientResult<CString> {
    CString::new(value).map_err(|_| ClientError::invalid_name(value))
}

/// Views a counted native array as a slice; empty for a null pointer.
///
/// # Safety
///
/// When `ptr` is non-null it must point to `len` valid items that outlive
/// the returned slice.
unsafe fn slice_of<'a, T>(ptr: *const T, len: c_uint) -> &'a [T] {
    if ptr.is_null() || len == 0 {
        &[]
    } else {
        std::slice::from_raw_parts(ptr, len as usize)
    }
}

/// Copies a native name list into owned strings.
///
/// # Safety
///
/// `list` must be zero-filled or populated by the library.
unsafe fn name_list_strings(list: &sys::ARNameList) -> Vec<String> {
    slice_of(list.name_list, list.num_items)
        .iter()
        .map(|name| sys::strings::fixed_to_string(name))
        .collect()
}

/// Copies a native custom enum list into owned ordinal/label pairs.
///
/// # Safety
///
/// `list` must be zero-filled or populated by the library.
unsafe fn custom_enum_pairs(list: &sys::AREnumItemList) -> Vec<(u32, String)> {
    slice_of(list.enum_item_list, list.num_items)
        .iter()
        .map(|item| {
            (
                item.item_number as u32,
                sys::strings::fixed_to_string(&item.item_name),
            )
        })
        .collect()
}
