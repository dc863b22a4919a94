//! Mock College Scorecard API responses

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the mock API is served under
pub const API_PATH: &str = "/ed/collegescorecard/v1/schools";

/// API key the mocks expect
pub const TEST_KEY: &str = "test-key";

/// One `results` entry as the API returns it
pub fn school(
    id: u64,
    name: &str,
    city: &str,
    state: &str,
    carnegie_basic: Option<i64>,
) -> Value {
    json!({
        "id": id,
        "latest": {"student": {"size": id * 10}},
        "school": {
            "name": name,
            "city": city,
            "state": state,
            "carnegie_basic": carnegie_basic,
            "zip": "00000"
        }
    })
}

/// Mount the metadata probe answer
pub async fn mount_probe(server: &MockServer, total: u64, per_page: u64) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("api_key", TEST_KEY))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": {"page": 0, "total": total, "per_page": per_page},
            "results": []
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// Mount a successful page answer
pub async fn mount_page(server: &MockServer, page: u64, results: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("api_key", TEST_KEY))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": {"page": page},
            "results": results
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// Mount a page answered with a bare status code
pub async fn mount_page_status(server: &MockServer, page: u64, status: u16) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Mount the probe plus one mock per page, `per_page` taken from the first page
pub async fn mount_dataset(server: &MockServer, pages: Vec<Vec<Value>>) {
    let per_page = pages.first().map_or(1, |p| p.len().max(1)) as u64;
    let total: u64 = pages.iter().map(|p| p.len() as u64).sum();
    mount_probe(server, total, per_page).await;
    for (index, results) in pages.into_iter().enumerate() {
        mount_page(server, index as u64, results).await;
    }
}
