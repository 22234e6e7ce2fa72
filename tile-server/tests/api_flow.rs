use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tile_server::{Config, ServerState, build_router};
use tower::ServiceExt;

fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    config.seed_demo_orders = false;
    config.admin_token = None;
    config.log_dir = None;
    config
}

fn app_with(config: &Config) -> Router {
    let state = ServerState::initialize(config).unwrap();
    build_router(state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/session",
        None,
        Some(json!({ "name": "Alice Johnson", "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

fn shipping() -> Value {
    json!({
        "name": "Alice Johnson",
        "email": "alice.j@example.com",
        "phone": "+66 81 234 5678",
        "address1": "123 Sukhumvit Road",
        "address2": "Apt 4B",
        "city": "Bangkok",
        "postal": "10110",
        "country": "Thailand"
    })
}

/// Crop `n` uploads of the default session and check out
async fn place_order(app: &Router, token: &str, n: usize) -> Value {
    for _ in 0..n {
        let (status, _) = send(app, Method::POST, "/api/editor/save", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = send(
        app,
        Method::POST,
        "/api/checkout",
        Some(token),
        Some(json!({ "shipping": shipping() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"].clone()
}

#[tokio::test]
async fn test_health_is_public() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(&test_config(&dir));

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["orders"], 0);
}

#[tokio::test]
async fn test_customer_routes_require_session() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(&test_config(&dir));

    let (status, body) = send(&app, Method::GET, "/api/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, body) = send(&app, Method::GET, "/api/editor", Some("bogus"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1002);

    // filter catalog stays public
    let (status, body) = send(&app, Method::GET, "/api/editor/filters", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 15);
    assert_eq!(body["data"][3]["name"], "B&W");
}

#[tokio::test]
async fn test_crop_one_of_three_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(&test_config(&dir));
    let token = login(&app, "alice.j@example.com").await;

    let (_, body) = send(&app, Method::GET, "/api/editor", Some(&token), None).await;
    assert_eq!(body["data"]["uploads"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"]["selectedId"], body["data"]["uploads"][0]["id"]);
    assert_eq!(body["data"]["summary"]["tilesCount"], 0);
    assert_eq!(body["data"]["summary"]["canCheckout"], false);

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/editor/controls",
        Some(&token),
        Some(json!({ "action": "set_filter", "filter": "Warm" })),
    )
    .await;
    assert_eq!(body["data"]["controls"]["filter"], "Warm");

    let (status, body) = send(&app, Method::POST, "/api/editor/save", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    let cropped = data["uploads"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|u| u["status"] == "cropped")
        .count();
    assert_eq!(cropped, 1);
    assert_eq!(data["uploads"][0]["filter"], "Warm");
    assert_eq!(data["summary"]["tilesCount"], 1);
    assert_eq!(data["summary"]["estTotal"], 200.0);
    assert_eq!(data["summary"]["canCheckout"], true);
    assert_eq!(data["selectedId"], data["uploads"][1]["id"]);
}

#[tokio::test]
async fn test_twenty_first_upload_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(&test_config(&dir));
    let token = login(&app, "alice.j@example.com").await;

    let mut last = Value::Null;
    for _ in 0..18 {
        let (status, body) =
            send(&app, Method::POST, "/api/editor/uploads", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        last = body;
    }
    assert_eq!(last["data"]["uploads"].as_array().unwrap().len(), 20);
    assert_eq!(last["data"]["summary"]["remainingSlots"], 0);
}

#[tokio::test]
async fn test_checkout_then_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(&test_config(&dir));
    let token = login(&app, "alice.j@example.com").await;

    let order = place_order(&app, &token, 2).await;
    let id = order["id"].as_str().unwrap().to_string();
    assert_eq!(order["status"], "new");
    assert_eq!(order["total"], 400.0);
    assert_eq!(order["canEdit"], true);
    assert_eq!(order["customerStatus"], "Printing");

    // editor session was cleared by checkout
    let (_, body) = send(&app, Method::GET, "/api/editor", Some(&token), None).await;
    assert_eq!(body["data"]["summary"]["tilesCount"], 0);

    // customer edit while new
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/orders/{id}/items"),
        Some(&token),
        Some(json!({ "items": [{ "id": 1 }, { "id": 2 }, { "id": 3, "filter": "Noir" }] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["total"], 600.0);

    // admin moves it along
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/admin/orders/{id}/status"),
        None,
        Some(json!({ "status": "shipping" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (_, body) = send(&app, Method::GET, &format!("/api/orders/{id}"), Some(&token), None).await;
    assert_eq!(body["data"]["canEdit"], false);
    assert_eq!(body["data"]["customerStatus"], "Shipped");
    assert_eq!(body["data"]["progressStep"], 1);
    assert!(body["data"]["lockMessage"].is_string());

    // now locked for the customer
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/orders/{id}/items"),
        Some(&token),
        Some(json!({ "items": [{ "id": 1 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4002);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/orders/{id}/cancel"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_finished_order_moves_to_past_tab() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(&test_config(&dir));
    let token = login(&app, "alice.j@example.com").await;
    let order = place_order(&app, &token, 1).await;
    let id = order["id"].as_str().unwrap();

    send(
        &app,
        Method::PUT,
        &format!("/api/admin/orders/{id}/status"),
        None,
        Some(json!({ "status": "finished" })),
    )
    .await;

    let (_, active) = send(&app, Method::GET, "/api/orders?tab=active", Some(&token), None).await;
    assert!(active["data"].as_array().unwrap().is_empty());

    let (_, past) = send(&app, Method::GET, "/api/orders?tab=past", Some(&token), None).await;
    let past = past["data"].as_array().unwrap();
    assert_eq!(past.len(), 1);
    assert_eq!(past[0]["customerStatus"], "Delivered");
    assert_eq!(past[0]["canEdit"], false);
    assert!(past[0]["lockMessage"].is_string());
}

#[tokio::test]
async fn test_cancel_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(&test_config(&dir));
    let token = login(&app, "alice.j@example.com").await;
    let order = place_order(&app, &token, 1).await;
    let uri = format!("/api/orders/{}/cancel", order["id"].as_str().unwrap());

    for _ in 0..2 {
        let (status, body) = send(&app, Method::POST, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["status"], "cancelled");
        assert_eq!(body["data"]["canEdit"], false);
    }
}

#[tokio::test]
async fn test_orders_are_private() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(&test_config(&dir));
    let alice = login(&app, "alice.j@example.com").await;
    let bob = login(&app, "bob@example.com").await;
    let order = place_order(&app, &alice, 1).await;
    let id = order["id"].as_str().unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/api/orders/{id}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);

    let (_, list) = send(&app, Method::GET, "/api/orders", Some(&bob), None).await;
    assert!(list["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_checkout_errors() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(&test_config(&dir));
    let token = login(&app, "alice.j@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/checkout",
        Some(&token),
        Some(json!({ "shipping": shipping() })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 5003);

    send(&app, Method::POST, "/api/editor/save", Some(&token), None).await;
    let mut bad = shipping();
    bad["email"] = json!("not-an-email");
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/checkout",
        Some(&token),
        Some(json!({ "shipping": bad })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
    assert!(body["details"]["email"].is_string());
}

#[tokio::test]
async fn test_edit_mode_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(&test_config(&dir));
    let token = login(&app, "alice.j@example.com").await;
    let order = place_order(&app, &token, 1).await;
    let id = order["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/editor/load/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["editOrderId"], id);
    assert_eq!(body["data"]["summary"]["tilesCount"], 1);

    send(&app, Method::POST, "/api/editor/uploads", Some(&token), None).await;
    let (_, body) = send(&app, Method::GET, "/api/editor", Some(&token), None).await;
    let new_id = body["data"]["uploads"][1]["id"].as_u64().unwrap();
    send(
        &app,
        Method::POST,
        &format!("/api/editor/select/{new_id}"),
        Some(&token),
        None,
    )
    .await;
    send(&app, Method::POST, "/api/editor/save", Some(&token), None).await;

    let (status, body) = send(&app, Method::POST, "/api/editor/update-order", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["tilesCount"], 2);
    assert_eq!(body["data"]["total"], 400.0);

    let (status, body) = send(&app, Method::POST, "/api/editor/update-order", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 5004);
}

#[tokio::test]
async fn test_admin_console_with_demo_orders() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&dir);
    config.seed_demo_orders = true;
    let app = app_with(&config);

    let (status, body) = send(&app, Method::GET, "/api/admin/orders", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tab"], "new");
    assert_eq!(body["data"]["orders"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["tabs"][0]["count"], 2);

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/admin/orders?tab=shipping&q=PARKER",
        None,
        None,
    )
    .await;
    let orders = body["data"]["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], "ORD-1102-PP");
    assert_eq!(orders[0]["tilesCount"], 20);

    let (status, body) = send(&app, Method::GET, "/api/admin/orders/ORD-0000-XX", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}

#[tokio::test]
async fn test_admin_token_guard() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&dir);
    config.admin_token = Some("s3cret".to_string());
    let app = app_with(&config);

    let (status, body) = send(&app, Method::GET, "/api/admin/orders", None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    let request = Request::builder()
        .uri("/api/admin/orders?tab=finished")
        .header("x-admin-token", "s3cret")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_orders_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    let id = {
        let app = app_with(&config);
        let token = login(&app, "alice.j@example.com").await;
        let order = place_order(&app, &token, 3).await;
        order["id"].as_str().unwrap().to_string()
    };

    let app = app_with(&config);
    let token = login(&app, "alice.j@example.com").await;
    let (status, body) = send(&app, Method::GET, &format!("/api/orders/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["tilesCount"], 3);
    assert_eq!(body["data"]["total"], 600.0);
}

#[tokio::test]
async fn test_logout_drops_session() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(&test_config(&dir));
    let token = login(&app, "alice.j@example.com").await;

    let (status, _) = send(&app, Method::DELETE, "/api/session", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/api/editor", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_items_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(&test_config(&dir));
    let token = login(&app, "alice.j@example.com").await;
    let order = place_order(&app, &token, 1).await;
    let uri = format!("/api/orders/{}/items", order["id"].as_str().unwrap());

    let too_many: Vec<Value> = (1..=21).map(|id| json!({ "id": id })).collect();
    let bodies = [
        json!({ "items": [{ "id": 1, "isCropped": false }] }),
        json!({ "items": [{ "id": 7 }, { "id": 7 }] }),
        json!({ "items": too_many }),
    ];
    for items in bodies {
        let (status, body) = send(&app, Method::PUT, &uri, Some(&token), Some(items)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(body["code"], 2);
    }

    let (_, body) = send(
        &app,
        Method::GET,
        &format!("/api/orders/{}", order["id"].as_str().unwrap()),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["data"]["tilesCount"], 1);
    assert_eq!(body["data"]["total"], 200.0);
}

/// Read body frames until one complete SSE event (not a keep-alive comment) is buffered
async fn next_sse_event(body: &mut Body) -> String {
    let mut buffer = String::new();
    loop {
        let frame = tokio::time::timeout(std::time::Duration::from_secs(5), body.frame())
            .await
            .expect("no event within 5s")
            .expect("stream ended")
            .unwrap();
        if let Ok(data) = frame.into_data() {
            buffer.push_str(std::str::from_utf8(&data).unwrap());
        }
        while let Some(end) = buffer.find("\n\n") {
            let event = buffer[..end].to_string();
            buffer.drain(..end + 2);
            if event.lines().any(|l| l.starts_with("event:")) {
                return event;
            }
        }
    }
}

#[tokio::test]
async fn test_event_stream_carries_only_own_orders() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(&test_config(&dir));
    let alice = login(&app, "alice.j@example.com").await;
    let bob = login(&app, "bob@example.com").await;
    let alice_order = place_order(&app, &alice, 1).await["id"].as_str().unwrap().to_string();
    let bob_order = place_order(&app, &bob, 1).await["id"].as_str().unwrap().to_string();

    let request = Request::builder()
        .uri("/api/orders/events")
        .header("authorization", format!("Bearer {alice}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream")
    );
    let mut body = response.into_body();

    for id in [&bob_order, &alice_order] {
        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/admin/orders/{id}/status"),
            None,
            Some(json!({ "status": "shipping" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    let event = next_sse_event(&mut body).await;
    assert!(event.contains("event: order_status_changed"), "{event}");
    assert!(event.contains(&alice_order), "{event}");
    assert!(!event.contains(&bob_order), "{event}");
    assert!(event.contains(r#""to":"shipping""#), "{event}");
}
