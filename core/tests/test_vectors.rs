//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results or errors. Bodies are compared as parsed JSON so
//! field ordering does not matter.

use genie_spaces::{
    CreateSpace, HttpMethod, HttpRequest, HttpResponse, ListSpaces, ListSpacesResponse, Space, SpacesClient,
    SpacesError, TrashSpaceResponse, UpdateSpace,
};
use serde_json::Value;

fn client() -> SpacesClient {
    SpacesClient::new()
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let arr = pair.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn assert_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, expected["path"].as_str().unwrap(), "{name}: path");
    assert_eq!(req.query, pairs(&expected["query"]), "{name}: query");
    assert_eq!(req.headers, pairs(&expected["headers"]), "{name}: headers");
    match &expected["body"] {
        Value::Null => assert!(req.body.is_none(), "{name}: body should be None"),
        body => {
            let actual: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&actual, body, "{name}: body");
        }
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn assert_api_error(name: &str, err: SpacesError, expected: &Value) {
    let api = err
        .as_api()
        .unwrap_or_else(|| panic!("{name}: expected API error, got {err:?}"));
    assert_eq!(
        u64::from(api.status_code),
        expected["status_code"].as_u64().unwrap(),
        "{name}: status"
    );
    if let Some(message) = expected.get("message") {
        assert_eq!(api.message, message.as_str().unwrap(), "{name}: message");
    }
    if let Some(fragment) = expected.get("message_contains") {
        assert!(
            api.message.to_lowercase().contains(fragment.as_str().unwrap()),
            "{name}: message {:?}",
            api.message
        );
    }
}

fn check_outcome<T>(name: &str, case: &Value, result: Result<T, SpacesError>)
where
    T: serde::de::DeserializeOwned + PartialEq + std::fmt::Debug,
{
    if let Some(expected_error) = case.get("expected_error") {
        assert_api_error(name, result.unwrap_err(), expected_error);
    } else {
        let expected: T = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(result.unwrap(), expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/list.json")) {
        let name = case["name"].as_str().unwrap();
        let input: ListSpaces = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_list_spaces(&input);
        assert_request(name, &req, &case["expected_request"]);

        check_outcome::<ListSpacesResponse>(name, &case, c.parse_list_spaces(simulated(&case)));
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/create.json")) {
        let name = case["name"].as_str().unwrap();
        let input: CreateSpace = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_create_space(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        check_outcome::<Space>(name, &case, c.parse_space(simulated(&case)));
    }
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[test]
fn get_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/get.json")) {
        let name = case["name"].as_str().unwrap();
        let space_id = case["input"]["space_id"].as_str().unwrap();
        let include = case["input"]["include_serialized_space"].as_bool().unwrap();

        let req = c.build_get_space(space_id, include);
        assert_request(name, &req, &case["expected_request"]);

        check_outcome::<Space>(name, &case, c.parse_space(simulated(&case)));
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/update.json")) {
        let name = case["name"].as_str().unwrap();
        let space_id = case["input"]["space_id"].as_str().unwrap();
        let input: UpdateSpace = serde_json::from_value(case["input"]["fields"].clone()).unwrap();

        let built = c.build_update_space(space_id, &input);
        if case["expected_error"]["validation"].as_bool() == Some(true) {
            assert!(
                matches!(built, Err(SpacesError::Validation(_))),
                "{name}: expected validation error"
            );
            continue;
        }

        let req = built.unwrap();
        assert_request(name, &req, &case["expected_request"]);

        check_outcome::<Space>(name, &case, c.parse_space(simulated(&case)));
    }
}

// ---------------------------------------------------------------------------
// Trash
// ---------------------------------------------------------------------------

#[test]
fn trash_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/trash.json")) {
        let name = case["name"].as_str().unwrap();
        let space_id = case["input"]["space_id"].as_str().unwrap();

        let req = c.build_trash_space(space_id);
        assert_request(name, &req, &case["expected_request"]);

        check_outcome::<TrashSpaceResponse>(name, &case, c.parse_trash_space(simulated(&case)));
    }
}
