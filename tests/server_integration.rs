//! HTTP contract tests for `GET /search` and `GET /health`.
//!
//! Each test seeds a fresh database, starts the server on a free port in a
//! background task and talks to it with `reqwest`.

use serde_json::Value;
use tempfile::TempDir;

use tasknet::config::Config;
use tasknet::db;
use tasknet::import::import_snapshot;
use tasknet::migrate;
use tasknet::models::WorkspaceSnapshot;
use tasknet::server::run_server;

// ─── Helpers ────────────────────────────────────────────────────────

fn test_config_with_port(tmp: &TempDir, port: u16, extra: &str) -> Config {
    let db_path = tmp.path().join("tasknet.sqlite");
    let config_content = format!(
        r#"
[db]
path = "{}"

[server]
bind = "127.0.0.1:{}"

{}
"#,
        db_path.display(),
        port,
        extra
    );
    toml::from_str(&config_content).unwrap()
}

fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

async fn wait_for_server(port: u16) {
    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
    }
    panic!("Server did not become ready within 5 seconds");
}

fn workspace() -> WorkspaceSnapshot {
    let mut notes: Vec<Value> = (1..=30)
        .map(|i| {
            serde_json::json!({
                "id": format!("bulk{}", i),
                "title": format!("Roadmap item {}", i),
                "content": "",
                "updatedAt": format!("2023-06-{:02}", (i % 28) + 1)
            })
        })
        .collect();
    notes.push(serde_json::json!({
        "id": "n1", "title": "Budget notes", "content": "Q3 numbers",
        "tags": ["urgent"], "updatedAt": "2024-01-10"
    }));
    notes.push(serde_json::json!({
        "id": "n2", "title": "Weekly sync", "content": "We went over the budget again.",
        "tags": ["urgent"], "updatedAt": "2024-02-15"
    }));

    serde_json::from_value(serde_json::json!({
        "notes": notes,
        "tasks": [
            {"id": "t1", "title": "Approve budget", "status": "open", "priority": "high",
             "dueDate": "2024-04-01", "tags": ["urgent", "finance"], "updatedAt": "2024-03-01"}
        ],
        "projects": [
            {"id": "p1", "name": "Office move", "description": "Budget pending",
             "startDate": "2024-01-05"}
        ],
        "wikis": [
            {"id": "w1", "title": "Finance handbook", "content": "How we plan the yearly budget.",
             "tags": ["finance"], "updatedAt": "2023-12-01"}
        ],
        "documents": [
            {"id": "d1", "name": "budget-2024.xlsx", "fileType": "xlsx", "size": 4096,
             "createdAt": "2024-02-01"}
        ]
    }))
    .unwrap()
}

/// Seed the database and start the server; returns the base URL.
async fn start_server(tmp: &TempDir, extra_config: &str) -> String {
    let port = find_free_port();
    let cfg = test_config_with_port(tmp, port, extra_config);

    migrate::run_migrations(&cfg).await.unwrap();
    let pool = db::connect(&cfg).await.unwrap();
    import_snapshot(&pool, &workspace()).await.unwrap();
    pool.close().await;

    tokio::spawn(async move {
        run_server(&cfg).await.ok();
    });
    wait_for_server(port).await;

    format!("http://127.0.0.1:{}", port)
}

async fn get_json(url: &str) -> (u16, Value) {
    let resp = reqwest::get(url).await.unwrap();
    let status = resp.status().as_u16();
    let body: Value = resp.json().await.unwrap();
    (status, body)
}

// ─── Tests ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_reports_version() {
    let tmp = TempDir::new().unwrap();
    let base = start_server(&tmp, "").await;

    let (status, body) = get_json(&format!("{}/health", base)).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_blank_or_missing_query_is_empty() {
    let tmp = TempDir::new().unwrap();
    let base = start_server(&tmp, "").await;

    let expected = serde_json::json!({
        "results": [],
        "totalCount": 0,
        "facets": {"types": [], "tags": []}
    });
    for url in [
        format!("{}/search", base),
        format!("{}/search?query=", base),
        format!("{}/search?query=%20%20", base),
    ] {
        let (status, body) = get_json(&url).await;
        assert_eq!(status, 200);
        assert_eq!(body, expected, "{}", url);
    }
}

#[tokio::test]
async fn test_search_all_types() {
    let tmp = TempDir::new().unwrap();
    let base = start_server(&tmp, "").await;

    let (status, body) = get_json(&format!("{}/search?query=budget", base)).await;
    assert_eq!(status, 200);
    assert_eq!(body["totalCount"], 6);

    let results = body["results"].as_array().unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["t1", "d1", "n1", "n2", "p1", "w1"]);

    let first = &results[0];
    assert_eq!(first["type"], "task");
    assert_eq!(first["title"], "Approve budget");
    assert_eq!(first["metadata"]["priority"], "high");
    assert_eq!(first["metadata"]["tags"][1], "finance");

    let doc = &results[1];
    assert_eq!(doc["type"], "document");
    assert_eq!(doc["metadata"]["fileType"], "xlsx");
    assert_eq!(doc["excerpt"], "budget-2024.xlsx");

    let type_sum: u64 = body["facets"]["types"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["count"].as_u64().unwrap())
        .sum();
    assert_eq!(type_sum, 6);
    assert!(body.get("failedSources").is_none());
}

#[tokio::test]
async fn test_type_filter_accepts_plural_and_singular() {
    let tmp = TempDir::new().unwrap();
    let base = start_server(&tmp, "").await;

    for ty in ["tasks", "task", "TASKS"] {
        let (status, body) =
            get_json(&format!("{}/search?query=budget&type={}&limit=10", base, ty)).await;
        assert_eq!(status, 200);
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert!(results.iter().all(|r| r["type"] == "task"));
        assert_eq!(body["facets"]["types"][0]["type"], "task");
        assert_eq!(body["facets"]["types"][0]["count"], 1);
    }

    let (_, body) = get_json(&format!("{}/search?query=budget&type=all", base)).await;
    assert_eq!(body["totalCount"], 6);
}

#[tokio::test]
async fn test_unknown_type_is_bad_request() {
    let tmp = TempDir::new().unwrap();
    let base = start_server(&tmp, "").await;

    let (status, body) = get_json(&format!("{}/search?query=budget&type=emails", base)).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "bad_request");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("emails"));
}

#[tokio::test]
async fn test_tag_facet_spans_types() {
    let tmp = TempDir::new().unwrap();
    let base = start_server(&tmp, "").await;

    let (_, body) = get_json(&format!("{}/search?query=urgent", base)).await;
    assert_eq!(body["totalCount"], 3);
    assert_eq!(body["facets"]["tags"][0]["tag"], "urgent");
    assert_eq!(body["facets"]["tags"][0]["count"], 3);
}

#[tokio::test]
async fn test_no_match() {
    let tmp = TempDir::new().unwrap();
    let base = start_server(&tmp, "").await;

    let (status, body) = get_json(&format!("{}/search?query=zzzznomatch", base)).await;
    assert_eq!(status, 200);
    assert_eq!(body["results"].as_array().unwrap().len(), 0);
    assert_eq!(body["totalCount"], 0);
    assert_eq!(body["facets"]["types"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_limit_clamping() {
    let tmp = TempDir::new().unwrap();
    let base = start_server(&tmp, "").await;

    // 30 roadmap notes match
    let (_, body) = get_json(&format!("{}/search?query=roadmap&limit=5", base)).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 5);
    assert_eq!(body["totalCount"], 30);

    let (_, body) = get_json(&format!("{}/search?query=roadmap&limit=0", base)).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 1);

    let (_, body) = get_json(&format!("{}/search?query=roadmap&limit=-3", base)).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 1);

    let (_, body) = get_json(&format!("{}/search?query=roadmap&limit=abc", base)).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 30);

    let (_, body) = get_json(&format!("{}/search?query=roadmap&limit=100000", base)).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 30);
}

#[tokio::test]
async fn test_configured_default_limit() {
    let tmp = TempDir::new().unwrap();
    let base = start_server(&tmp, "[search]\ndefault_limit = 4\nmax_limit = 10\n").await;

    let (_, body) = get_json(&format!("{}/search?query=roadmap", base)).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 4);
    assert_eq!(body["totalCount"], 30);

    let (_, body) = get_json(&format!("{}/search?query=roadmap&limit=50", base)).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let tmp = TempDir::new().unwrap();
    let base = start_server(&tmp, "").await;

    let resp = reqwest::Client::new()
        .get(format!("{}/search?query=budget", base))
        .header("Origin", "http://example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
