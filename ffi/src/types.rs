//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible fields: `*mut c_char`
//! for strings (null for an absent description), raw pointers for lists and
//! tagged enums with explicit discriminants. Conversions live here so
//! `lib.rs` stays focused on the `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use todo_core::{ApiError, HttpMethod, Todo};

/// Opaque handle to a `TodoClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiTodoClient {
    pub(crate) inner: todo_core::TodoClient,
}

/// Copy `s` into a heap C string owned by the caller. Interior NUL bytes
/// are dropped since C strings cannot carry them.
pub(crate) fn c_string(s: impl Into<String>) -> *mut c_char {
    let mut s: String = s.into();
    s.retain(|c| c != '\0');
    CString::new(s).unwrap_or_default().into_raw()
}

/// Release a string produced by `c_string`. Null is ignored.
pub(crate) unsafe fn drop_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Hand ownership of `items` to C as a pointer and length. Empty yields null.
fn into_raw_slice<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let len = items.len() as u32;
    let boxed = items.into_boxed_slice();
    (Box::into_raw(boxed) as *mut T, len)
}

/// Take back a slice handed out by `into_raw_slice`.
pub(crate) unsafe fn from_raw_slice<T>(ptr: *mut T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    let slice = std::ptr::slice_from_raw_parts_mut(ptr, len as usize);
    unsafe { Box::from_raw(slice) }.into_vec()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A procedure call as C-compatible plain data.
///
/// Built by `todo_build_*` functions. The C caller executes the request
/// and passes the response back through `todo_parse_*`. `path` is the
/// absolute URL; `body` is null for queries.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: todo_core::HttpRequest) -> *mut Self {
        let headers: Vec<FfiHeader> = req
            .headers
            .into_iter()
            .map(|(k, v)| FfiHeader {
                key: c_string(k),
                value: c_string(v),
            })
            .collect();
        let (headers, headers_len) = into_raw_slice(headers);
        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path: c_string(req.path),
            headers,
            headers_len,
            body: req.body.map_or(std::ptr::null_mut(), c_string),
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// The C caller fills this in after executing an `FfiHttpRequest` and
/// passes a pointer to a `todo_parse_*` function. The FFI layer reads but
/// does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    /// The server rejected the input (HTTP 400).
    Validation = 1,
    /// Any other non-200 status.
    Server = 2,
    Deserialization = 3,
    Serialization = 4,
    Panic = 5,
    NullArg = 6,
}

/// Tag that tells `todo_free_result` what `FfiTodoResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    /// No payload. On an `Ok` result this is the not-found outcome.
    None = 0,
    Todo = 1,
    TodoList = 2,
    Bool = 3,
}

#[repr(C)]
pub struct FfiTodo {
    pub id: i64,
    pub title: *mut c_char,
    /// Null when the todo has no description.
    pub description: *mut c_char,
    pub completed: bool,
    /// RFC 3339 timestamp.
    pub created_at: *mut c_char,
}

impl FfiTodo {
    fn from_core(todo: Todo) -> Self {
        FfiTodo {
            id: todo.id,
            title: c_string(todo.title),
            description: todo.description.map_or(std::ptr::null_mut(), c_string),
            completed: todo.completed,
            created_at: c_string(todo.created_at.to_rfc3339()),
        }
    }

    /// Free the C-string fields (but not the struct itself).
    pub(crate) unsafe fn drop_fields(&self) {
        unsafe {
            drop_c_string(self.title);
            drop_c_string(self.description);
            drop_c_string(self.created_at);
        }
    }
}

#[repr(C)]
pub struct FfiTodoList {
    pub items: *mut FfiTodo,
    pub len: u32,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the payload named by `data_tag` (null for `None`).
/// On failure `error_code` names the category, `error_message` is a
/// readable C string, `http_status` carries the status for `Validation` and
/// `Server`, and `data` is null.
#[repr(C)]
pub struct FfiTodoResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiTodoResult {
    fn ok(data_tag: FfiDataTag, data: *mut c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiTodoResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 200,
            data_tag,
            data,
        }))
    }

    fn err(error_code: FfiErrorCode, http_status: u16, message: String) -> *mut Self {
        Box::into_raw(Box::new(FfiTodoResult {
            error_code,
            error_message: c_string(message),
            http_status,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }

    pub(crate) fn ok_todo(todo: Todo) -> *mut Self {
        let data = Box::into_raw(Box::new(FfiTodo::from_core(todo)));
        Self::ok(FfiDataTag::Todo, data as *mut c_void)
    }

    /// `None` becomes an `Ok` result with no payload.
    pub(crate) fn ok_maybe_todo(todo: Option<Todo>) -> *mut Self {
        match todo {
            Some(todo) => Self::ok_todo(todo),
            None => Self::ok(FfiDataTag::None, std::ptr::null_mut()),
        }
    }

    pub(crate) fn ok_todo_list(todos: Vec<Todo>) -> *mut Self {
        let items: Vec<FfiTodo> = todos.into_iter().map(FfiTodo::from_core).collect();
        let (items, len) = into_raw_slice(items);
        let data = Box::into_raw(Box::new(FfiTodoList { items, len }));
        Self::ok(FfiDataTag::TodoList, data as *mut c_void)
    }

    pub(crate) fn ok_bool(value: bool) -> *mut Self {
        let data = Box::into_raw(Box::new(value));
        Self::ok(FfiDataTag::Bool, data as *mut c_void)
    }

    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let (code, status) = match &err {
            ApiError::Validation { .. } => (FfiErrorCode::Validation, 400),
            ApiError::Server { status, .. } => (FfiErrorCode::Server, *status),
            ApiError::Deserialization(_) => (FfiErrorCode::Deserialization, 0),
            ApiError::Serialization(_) => (FfiErrorCode::Serialization, 0),
        };
        Self::err(code, status, err.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::err(FfiErrorCode::NullArg, 0, format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::err(FfiErrorCode::Panic, 0, msg.to_string())
    }
}
