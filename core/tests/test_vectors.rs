//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use serde_json::Value;
use todo_core::{
    ApiError, CreateTodoInput, HttpMethod, HttpRequest, HttpResponse, Todo, TodoClient,
    UpdateTodoInput,
};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> TodoClient {
    TodoClient::new(BASE_URL)
}

fn cases(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated_response(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

/// Compare a built request against `expected_request`. Headers and body are
/// only checked when the vector lists them.
fn assert_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(
        req.method,
        parse_method(expected["method"].as_str().unwrap()),
        "{name}: method"
    );
    assert_eq!(
        req.path,
        format!("{BASE_URL}{}", expected["path"].as_str().unwrap()),
        "{name}: path"
    );

    match expected.get("headers") {
        Some(headers) => {
            let expected_headers: Vec<(String, String)> = headers
                .as_array()
                .unwrap()
                .iter()
                .map(|h| {
                    let arr = h.as_array().unwrap();
                    (
                        arr[0].as_str().unwrap().to_string(),
                        arr[1].as_str().unwrap().to_string(),
                    )
                })
                .collect();
            assert_eq!(req.headers, expected_headers, "{name}: headers");
        }
        None => assert!(req.headers.is_empty(), "{name}: headers should be empty"),
    }

    match expected.get("body") {
        Some(body) => {
            let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/create.json")) {
        let name = case["name"].as_str().unwrap();
        let input: CreateTodoInput = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_create_todo(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_create_todo(simulated_response(&case));
        let expected = &case["expected_result"];
        if let Some(ok) = expected.get("ok") {
            let expected: Todo = serde_json::from_value(ok.clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        } else if let Some(message) = expected.get("validation") {
            match result {
                Err(ApiError::Validation { message: got }) => {
                    assert_eq!(got, message.as_str().unwrap(), "{name}: message")
                }
                other => panic!("{name}: expected validation error, got {other:?}"),
            }
        } else if let Some(status) = expected.get("server") {
            match result {
                Err(ApiError::Server { status: got, .. }) => {
                    assert_eq!(u64::from(got), status.as_u64().unwrap(), "{name}: status")
                }
                other => panic!("{name}: expected server error, got {other:?}"),
            }
        } else {
            panic!("{name}: unknown expected_result shape");
        }
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/list.json")) {
        let name = case["name"].as_str().unwrap();

        let req = c.build_get_todos();
        assert_request(name, &req, &case["expected_request"]);

        let todos = c.parse_get_todos(simulated_response(&case)).unwrap();
        let expected: Vec<Todo> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(todos, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[test]
fn get_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/get.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_i64().unwrap();

        let req = c.build_get_todo(id);
        assert_request(name, &req, &case["expected_request"]);

        let todo = c.parse_get_todo(simulated_response(&case)).unwrap();
        let expected: Option<Todo> =
            serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(todo, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/update.json")) {
        let name = case["name"].as_str().unwrap();
        let input: UpdateTodoInput = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_update_todo(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let todo = c.parse_update_todo(simulated_response(&case)).unwrap();
        let expected: Option<Todo> =
            serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(todo, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/delete.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_i64().unwrap();

        let req = c.build_delete_todo(id).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let deleted = c.parse_delete_todo(simulated_response(&case)).unwrap();
        assert_eq!(
            deleted,
            case["expected_result"].as_bool().unwrap(),
            "{name}: parsed result"
        );
    }
}
