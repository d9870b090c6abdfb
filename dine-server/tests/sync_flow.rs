//! End-to-end sync flow tests
//!
//! Drive the full [mutate → re-read → broadcast] chain through the HTTP
//! router and observe the event bus the way a connected viewer would.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tokio::sync::broadcast::Receiver;
use tower::ServiceExt;

use dine_server::core::build_app;
use dine_server::{Config, ServerState};
use shared::SyncEvent;
use shared::models::{MenuItem, Order, OrderStatus, SortDirection};

async fn test_state() -> (ServerState, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    let state = ServerState::initialize(&config).await;
    (state, dir)
}

fn app(state: &ServerState) -> Router {
    build_app().with_state(state.clone())
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    let request = match body {
        Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

fn next_event(rx: &mut Receiver<SyncEvent>) -> SyncEvent {
    rx.try_recv().expect("expected a broadcast event")
}

fn assert_no_event(rx: &mut Receiver<SyncEvent>) {
    assert!(rx.try_recv().is_err(), "unexpected broadcast event");
}

#[tokio::test]
async fn test_full_sync_scenario() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let mut rx = state.event_bus.subscribe();

    // Add "Pizza" at 750
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/menu",
        Some(r#"{"name":"Pizza","price":750}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let item: MenuItem = serde_json::from_value(body).unwrap();
    assert_eq!(item.id, 1);
    assert_eq!(item.name, "Pizza");
    assert_eq!(item.price, 750.0);

    let event = next_event(&mut rx);
    assert_eq!(event.name(), "newFoodItem");
    let payload = event.payload();
    assert_eq!(payload["id"], 1);
    assert_eq!(payload["name"], "Pizza");
    assert_eq!(payload["price"], 750.0);

    // Submit an order for table 5
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/orders",
        Some(r#"{"tableNumber":"5","items":{"Pizza":2},"totalPrice":1500}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let order: Order = serde_json::from_value(body).unwrap();
    assert_eq!(order.id, 1);
    assert_eq!(order.status, OrderStatus::Pending);

    let event = next_event(&mut rx);
    assert_eq!(event.name(), "newOrder");
    let payload = event.payload();
    assert_eq!(payload["id"], 1);
    assert_eq!(payload["table_number"], "5");
    assert_eq!(payload["items"], r#"{"Pizza":2}"#);
    assert_eq!(payload["total_price"], 1500.0);
    assert_eq!(payload["status"], "pending");

    // Mark it completed
    let (status, _) = send_json(
        &app,
        "PUT",
        "/api/orders/1/status",
        Some(r#"{"status":"completed"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let event = next_event(&mut rx);
    assert_eq!(event.name(), "orderUpdated");
    assert_eq!(event.payload()["status"], "completed");

    // Delete it
    let (status, _) = send_json(&app, "DELETE", "/api/orders/1", None).await;
    assert_eq!(status, StatusCode::OK);

    let event = next_event(&mut rx);
    assert_eq!(event.name(), "orderDeleted");
    assert_eq!(event.payload(), serde_json::Value::from(1));

    // Listing no longer contains it
    let (status, body) = send_json(&app, "GET", "/api/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    let orders: Vec<Order> = serde_json::from_value(body).unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_mutator_failure_aborts_broadcast_chain() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let mut rx = state.event_bus.subscribe();

    // Empty name
    let (status, body) =
        send_json(&app, "POST", "/api/menu", Some(r#"{"name":"","price":100}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");

    // Negative price
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/menu",
        Some(r#"{"name":"Pizza","price":-1}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Empty line items
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/orders",
        Some(r#"{"tableNumber":"5","items":{},"totalPrice":0}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Non-positive quantity
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/orders",
        Some(r#"{"tableNumber":"5","items":{"Pizza":0},"totalPrice":0}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Negative total
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/orders",
        Some(r#"{"tableNumber":"5","items":{"Pizza":1},"totalPrice":-5}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Outside the status vocabulary
    let (status, body) = send_json(
        &app,
        "PUT",
        "/api/orders/1/status",
        Some(r#"{"status":"delivered"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");

    // No failed mutation produced a broadcast
    assert_no_event(&mut rx);
}

#[tokio::test]
async fn test_menu_delete_is_idempotent_and_always_broadcasts() {
    let (state, _dir) = test_state().await;
    let app = app(&state);

    let (_, body) = send_json(
        &app,
        "POST",
        "/api/menu",
        Some(r#"{"name":"Pizza","price":750}"#),
    )
    .await;
    let item: MenuItem = serde_json::from_value(body).unwrap();

    let mut rx = state.event_bus.subscribe();

    let (status, _) = send_json(&app, "DELETE", &format!("/api/menu/{}", item.id), None).await;
    assert_eq!(status, StatusCode::OK);

    // Second delete: same observable end state, and the broadcast still
    // fires (preserved historical behavior)
    let (status, _) = send_json(&app, "DELETE", &format!("/api/menu/{}", item.id), None).await;
    assert_eq!(status, StatusCode::OK);

    for _ in 0..2 {
        let event = next_event(&mut rx);
        assert_eq!(event.name(), "foodItemDeleted");
        assert_eq!(event.payload(), serde_json::Value::from(item.id));
    }

    let (_, body) = send_json(&app, "GET", "/api/menu", None).await;
    let items: Vec<MenuItem> = serde_json::from_value(body).unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_repeated_mark_completed_is_observable_noop() {
    let (state, _dir) = test_state().await;
    let app = app(&state);

    send_json(
        &app,
        "POST",
        "/api/orders",
        Some(r#"{"tableNumber":"7","items":{"Cola":1},"totalPrice":300}"#),
    )
    .await;

    let mut rx = state.event_bus.subscribe();

    for _ in 0..2 {
        let (status, _) = send_json(
            &app,
            "PUT",
            "/api/orders/1/status",
            Some(r#"{"status":"completed"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let event = next_event(&mut rx);
        assert_eq!(event.name(), "orderUpdated");
        assert_eq!(event.payload()["status"], "completed");
    }

    // Observable state unchanged after the second call
    let (_, body) = send_json(&app, "GET", "/api/orders", None).await;
    let orders: Vec<Order> = serde_json::from_value(body).unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::Completed);
}

#[tokio::test]
async fn test_status_update_of_absent_order_succeeds_without_broadcast() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let mut rx = state.event_bus.subscribe();

    let (status, _) = send_json(
        &app,
        "PUT",
        "/api/orders/42/status",
        Some(r#"{"status":"completed"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_no_event(&mut rx);
}

#[tokio::test]
async fn test_snapshot_then_incremental_ordering() {
    let (state, _dir) = test_state().await;
    let app = app(&state);

    for table in ["1", "2"] {
        let body = format!(r#"{{"tableNumber":"{table}","items":{{"Pizza":1}},"totalPrice":750}}"#);
        send_json(&app, "POST", "/api/orders", Some(&body)).await;
    }

    // A viewer connecting now: snapshot read + subscription
    let snapshot = dine_server::db::repository::order::find_all(&state.pool, SortDirection::Asc)
        .await
        .unwrap();
    let mut rx = state.event_bus.subscribe();
    assert_eq!(snapshot.len(), 2);

    // An order submitted strictly after the snapshot arrives as an
    // incremental event, not silently missed
    send_json(
        &app,
        "POST",
        "/api/orders",
        Some(r#"{"tableNumber":"3","items":{"Cola":2},"totalPrice":600}"#),
    )
    .await;

    let event = next_event(&mut rx);
    assert_eq!(event.name(), "newOrder");
    let new_id = event.payload()["id"].as_i64().unwrap();
    assert_eq!(new_id, 3);
    assert!(snapshot.iter().all(|o| o.id != new_id));
}

#[tokio::test]
async fn test_order_listing_sort_directions() {
    let (state, _dir) = test_state().await;
    let app = app(&state);

    for table in ["1", "2", "3"] {
        let body = format!(r#"{{"tableNumber":"{table}","items":{{"Pizza":1}},"totalPrice":750}}"#);
        send_json(&app, "POST", "/api/orders", Some(&body)).await;
    }

    let ids = |body: serde_json::Value| -> Vec<i64> {
        serde_json::from_value::<Vec<Order>>(body)
            .unwrap()
            .iter()
            .map(|o| o.id)
            .collect()
    };

    // Default: newest-by-id first
    let (_, body) = send_json(&app, "GET", "/api/orders", None).await;
    assert_eq!(ids(body), vec![3, 2, 1]);

    let (_, body) = send_json(&app, "GET", "/api/orders?sort=asc", None).await;
    assert_eq!(ids(body), vec![1, 2, 3]);

    // Only the literal "asc" selects ascending
    let (_, body) = send_json(&app, "GET", "/api/orders?sort=upwards", None).await;
    assert_eq!(ids(body), vec![3, 2, 1]);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (state, _dir) = test_state().await;
    let app = app(&state);

    let (status, body) = send_json(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
    assert_eq!(body["viewers"], 0);
}
