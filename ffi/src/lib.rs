//! C-ABI wrapper around `todo-core`.
//!
//! # Overview
//! Exposes the five todo procedures through `extern "C"` functions so any
//! language with a C FFI can build requests and parse responses without
//! linking Rust's async runtime or serde.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-procedure `todo_build_*` / `todo_parse_*` mirror the core client 1:1.
//! - A single `FfiTodoResult` envelope with `FfiDataTag` + `void* data`
//!   carries payloads and errors uniformly. Not-found is an `Ok` result
//!   tagged `None`.
//! - The C caller owns all returned pointers and must call the matching
//!   `todo_free_*` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use todo_core::{CreateTodoInput, HttpResponse, TodoClient, UpdateTodoInput};

use types::*;

/// Borrow a C string as `&str`. Null or invalid UTF-8 yields `None`.
unsafe fn borrow_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `TodoClient` bound to `base_url`.
///
/// Returns null if `base_url` is null or not UTF-8.
/// The caller must free the returned pointer with `todo_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_client_new(base_url: *const c_char) -> *mut FfiTodoClient {
    catch_unwind(|| {
        let Some(url) = (unsafe { borrow_str(base_url) }) else {
            return std::ptr::null_mut();
        };
        let client = TodoClient::new(url);
        Box::into_raw(Box::new(FfiTodoClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a `TodoClient` created by `todo_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_client_free(client: *mut FfiTodoClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Run `build` against the client behind `client`, returning null when the
/// handle is null, `build` declines, or it panics.
fn build_with(
    client: *const FfiTodoClient,
    build: impl FnOnce(&TodoClient) -> Option<todo_core::HttpRequest>,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match build(&client.inner) {
            Some(req) => FfiHttpRequest::from_core(req),
            None => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Build a `createTodo` call. `description` may be null.
///
/// Returns null if `client` or `title` is null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_build_create_todo(
    client: *const FfiTodoClient,
    title: *const c_char,
    description: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, |client| {
        let title = unsafe { borrow_str(title) }?;
        let input = CreateTodoInput {
            title: title.to_string(),
            description: unsafe { borrow_str(description) }.map(str::to_string),
        };
        client.build_create_todo(&input).ok()
    })
}

/// Build a `getTodos` call.
#[unsafe(no_mangle)]
pub extern "C" fn todo_build_get_todos(client: *const FfiTodoClient) -> *mut FfiHttpRequest {
    build_with(client, |client| Some(client.build_get_todos()))
}

/// Build a `getTodo` call for `id`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_build_get_todo(client: *const FfiTodoClient, id: i64) -> *mut FfiHttpRequest {
    build_with(client, |client| Some(client.build_get_todo(id)))
}

/// Build an `updateTodo` call.
///
/// `title` may be null (leave unchanged). `description_mode` selects what
/// happens to the description: 0 = leave unchanged, 1 = clear, 2 = set to
/// `description`. `completed` is tri-state: -1 = leave unchanged,
/// 0 = false, 1 = true.
/// Returns null if `client` is null, if mode 2 is given a null
/// `description`, or if either selector is outside its range.
#[unsafe(no_mangle)]
pub extern "C" fn todo_build_update_todo(
    client: *const FfiTodoClient,
    id: i64,
    title: *const c_char,
    description_mode: i32,
    description: *const c_char,
    completed: i32,
) -> *mut FfiHttpRequest {
    build_with(client, |client| {
        let mut input = UpdateTodoInput::new(id);
        if let Some(title) = unsafe { borrow_str(title) } {
            input = input.title(title);
        }
        match description_mode {
            1 => input = input.description(None),
            2 => {
                let description = unsafe { borrow_str(description) }?;
                input = input.description(Some(description.to_string()));
            }
            0 => {}
            _ => return None,
        }
        match completed {
            -1 => {}
            0 => input = input.completed(false),
            1 => input = input.completed(true),
            _ => return None,
        }
        client.build_update_todo(&input).ok()
    })
}

/// Build a `deleteTodo` call for `id`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_build_delete_todo(
    client: *const FfiTodoClient,
    id: i64,
) -> *mut FfiHttpRequest {
    build_with(client, |client| client.build_delete_todo(id).ok())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = unsafe { borrow_str(resp.body) }.unwrap_or("");
    HttpResponse::new(resp.status, body)
}

/// Check both handles, convert the response and hand it to `parse`.
fn parse_with(
    op: &str,
    client: *const FfiTodoClient,
    response: *const FfiHttpResponse,
    parse: impl FnOnce(&TodoClient, HttpResponse) -> *mut FfiTodoResult,
) -> *mut FfiTodoResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiTodoResult::null_arg("client");
        }
        if response.is_null() {
            return FfiTodoResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = ffi_response_to_core(unsafe { &*response });
        parse(&client.inner, resp)
    }))
    .unwrap_or_else(|_| FfiTodoResult::panic(&format!("panic in {op}")))
}

/// Parse a `createTodo` response. `data_tag = Todo` on success.
#[unsafe(no_mangle)]
pub extern "C" fn todo_parse_create_todo(
    client: *const FfiTodoClient,
    response: *const FfiHttpResponse,
) -> *mut FfiTodoResult {
    parse_with("todo_parse_create_todo", client, response, |c, resp| {
        match c.parse_create_todo(resp) {
            Ok(todo) => FfiTodoResult::ok_todo(todo),
            Err(e) => FfiTodoResult::from_error(e),
        }
    })
}

/// Parse a `getTodos` response. `data_tag = TodoList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn todo_parse_get_todos(
    client: *const FfiTodoClient,
    response: *const FfiHttpResponse,
) -> *mut FfiTodoResult {
    parse_with("todo_parse_get_todos", client, response, |c, resp| {
        match c.parse_get_todos(resp) {
            Ok(todos) => FfiTodoResult::ok_todo_list(todos),
            Err(e) => FfiTodoResult::from_error(e),
        }
    })
}

/// Parse a `getTodo` response. `data_tag = Todo`, or `None` when not found.
#[unsafe(no_mangle)]
pub extern "C" fn todo_parse_get_todo(
    client: *const FfiTodoClient,
    response: *const FfiHttpResponse,
) -> *mut FfiTodoResult {
    parse_with("todo_parse_get_todo", client, response, |c, resp| {
        match c.parse_get_todo(resp) {
            Ok(todo) => FfiTodoResult::ok_maybe_todo(todo),
            Err(e) => FfiTodoResult::from_error(e),
        }
    })
}

/// Parse an `updateTodo` response. `data_tag = Todo`, or `None` when the id
/// is unknown or nothing was changed.
#[unsafe(no_mangle)]
pub extern "C" fn todo_parse_update_todo(
    client: *const FfiTodoClient,
    response: *const FfiHttpResponse,
) -> *mut FfiTodoResult {
    parse_with("todo_parse_update_todo", client, response, |c, resp| {
        match c.parse_update_todo(resp) {
            Ok(todo) => FfiTodoResult::ok_maybe_todo(todo),
            Err(e) => FfiTodoResult::from_error(e),
        }
    })
}

/// Parse a `deleteTodo` response. `data_tag = Bool`, pointing at whether a
/// row was removed.
#[unsafe(no_mangle)]
pub extern "C" fn todo_parse_delete_todo(
    client: *const FfiTodoClient,
    response: *const FfiHttpResponse,
) -> *mut FfiTodoResult {
    parse_with("todo_parse_delete_todo", client, response, |c, resp| {
        match c.parse_delete_todo(resp) {
            Ok(deleted) => FfiTodoResult::ok_bool(deleted),
            Err(e) => FfiTodoResult::from_error(e),
        }
    })
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `todo_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        unsafe {
            drop_c_string(req.path);
            drop_c_string(req.body);
            for h in from_raw_slice(req.headers, req.headers_len) {
                drop_c_string(h.key);
                drop_c_string(h.value);
            }
        }
    });
}

/// Free an `FfiTodoResult` returned by any `todo_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_result(result: *mut FfiTodoResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        unsafe { drop_c_string(result.error_message) };
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::Todo => {
                let todo = unsafe { Box::from_raw(result.data as *mut FfiTodo) };
                unsafe { todo.drop_fields() };
            }
            FfiDataTag::TodoList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiTodoList) };
                for item in unsafe { from_raw_slice(list.items, list.len) } {
                    unsafe { item.drop_fields() };
                }
            }
            FfiDataTag::Bool => {
                drop(unsafe { Box::from_raw(result.data as *mut bool) });
            }
            FfiDataTag::None => {}
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| unsafe { drop_c_string(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
