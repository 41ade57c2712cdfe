use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use bigdecimal::BigDecimal;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use vyapaar_backend::auth::StaticTokenVerifier;
use vyapaar_backend::models::{Invoice, InvoiceStatus};
use vyapaar_backend::store::Store;
use vyapaar_backend::{app, AppState, MemoryStore};

const TOKEN: &str = "test-token";
const UID: &str = "test-user";

fn test_app(store: Arc<MemoryStore>) -> Router {
    let verifier = Arc::new(StaticTokenVerifier::new().with_token(TOKEN, UID));
    app(AppState::new(store, verifier))
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN))
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_is_open() {
    let router = test_app(Arc::new(MemoryStore::new()));
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = call(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["service"], "vyapaar-backend");
}

#[tokio::test]
async fn api_requires_a_bearer_token() {
    let router = test_app(Arc::new(MemoryStore::new()));

    let request = Request::builder()
        .uri("/api/payments")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(&router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "NO_TOKEN");

    let request = Request::builder()
        .uri("/api/payments")
        .header(header::AUTHORIZATION, "Bearer wrong-token")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(&router, request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn create_reminder_with_past_due_date_is_overdue() {
    let router = test_app(Arc::new(MemoryStore::new()));
    let yesterday = (Utc::now() - Duration::days(1)).to_rfc3339();

    let (status, body) = call(
        &router,
        send_json(
            "POST",
            "/api/payments",
            json!({
                "customerName": "Ramesh Kumar",
                "amount": 1200,
                "dueDate": yesterday,
                "phone": "+919876543210"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Payment reminder created successfully");
    assert_eq!(body["data"]["status"], "overdue");
    assert_eq!(body["data"]["customerName"], "Ramesh Kumar");
    assert!(body["data"]["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn create_reminder_validation_uses_the_error_envelope() {
    let router = test_app(Arc::new(MemoryStore::new()));

    let (status, body) = call(
        &router,
        send_json(
            "POST",
            "/api/payments",
            json!({"customerName": "A", "amount": 0}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid amount");
    assert_eq!(body["message"], "Amount must be a positive number");
    assert_eq!(body["code"], "INVALID_AMOUNT");

    let (status, body) = call(
        &router,
        send_json(
            "POST",
            "/api/payments",
            json!({"customerName": "  ", "amount": 100}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MISSING_FIELDS");
}

#[tokio::test]
async fn overdue_then_paid_then_listed_first() {
    let router = test_app(Arc::new(MemoryStore::new()));
    let yesterday = (Utc::now() - Duration::days(1)).to_rfc3339();

    let (_, older) = call(
        &router,
        send_json(
            "POST",
            "/api/payments",
            json!({"customerName": "Earlier Customer", "amount": 500}),
        ),
    )
    .await;
    let (_, created) = call(
        &router,
        send_json(
            "POST",
            "/api/payments",
            json!({"customerName": "Ramesh Kumar", "amount": 1200, "dueDate": yesterday}),
        ),
    )
    .await;
    assert_eq!(created["data"]["status"], "overdue");
    let id = created["data"]["id"].as_str().unwrap().to_string();
    assert_ne!(id, older["data"]["id"].as_str().unwrap());

    let (status, paid) = call(
        &router,
        send_json("PUT", &format!("/api/payments/{}/mark-paid", id), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paid["message"], "Payment reminder marked as paid");
    assert_eq!(paid["data"]["status"], "paid");

    // idempotent second call
    let (status, _) = call(
        &router,
        send_json("PUT", &format!("/api/payments/{}/mark-paid", id), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // newest first
    let (status, listed) = call(&router, get("/api/payments")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["count"], 2);
    assert_eq!(listed["data"][0]["id"], id.as_str());
    assert_eq!(listed["data"][0]["status"], "paid");
}

#[tokio::test]
async fn update_and_delete_report_unknown_ids() {
    let router = test_app(Arc::new(MemoryStore::new()));

    let (status, body) = call(
        &router,
        send_json("PUT", "/api/payments/no-such-id", json!({"amount": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "REMINDER_NOT_FOUND");

    let (status, body) = call(
        &router,
        send_json("DELETE", "/api/payments/no-such-id", json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "REMINDER_NOT_FOUND");
}

#[tokio::test]
async fn update_rejects_empty_patch_and_bad_status() {
    let router = test_app(Arc::new(MemoryStore::new()));
    let (_, created) = call(
        &router,
        send_json(
            "POST",
            "/api/payments",
            json!({"customerName": "A", "amount": 100}),
        ),
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap();

    let (status, body) = call(
        &router,
        send_json("PUT", &format!("/api/payments/{}", id), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NO_UPDATE_DATA");

    let (status, body) = call(
        &router,
        send_json(
            "PUT",
            &format!("/api/payments/{}", id),
            json!({"status": "settled"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_STATUS");
}

#[tokio::test]
async fn payment_stats_reflect_the_reminder_mix() {
    let router = test_app(Arc::new(MemoryStore::new()));
    let yesterday = (Utc::now() - Duration::days(1)).to_rfc3339();

    for (name, amount, due) in [
        ("Pending Customer", 1200, None),
        ("Overdue Customer", 2500, Some(yesterday.as_str())),
    ] {
        let mut payload = json!({"customerName": name, "amount": amount});
        if let Some(d) = due {
            payload["dueDate"] = json!(d);
        }
        call(&router, send_json("POST", "/api/payments", payload)).await;
    }

    let (status, body) = call(&router, get("/api/payments/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["pending"], 1);
    assert_eq!(body["data"]["overdue"], 1);
    assert_eq!(body["data"]["paid"], 0);
    assert_eq!(body["data"]["totalAmount"], "3700");
    assert_eq!(body["data"]["overdueAmount"], "2500");
}

#[tokio::test]
async fn dashboard_stats_over_the_demo_dataset() {
    let store = Arc::new(MemoryStore::new());
    store.seed_demo(UID).await;
    let router = test_app(store);

    let (status, body) = call(&router, get("/api/dashboard/stats")).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];

    // two open reminders: 2500 + 1200
    assert_eq!(data["pendingPayments"]["count"], 2);
    assert_eq!(data["pendingPayments"]["value"], "3700");
    assert_eq!(data["pendingPayments"]["change"], "2 customers");

    // Tata Tea (8/15) and Parle-G (3/10) are at or below threshold
    assert_eq!(data["lowStockItems"]["count"], 2);

    // only the Paid demo invoice counts toward sales
    assert_eq!(data["todaySales"]["value"], "1416");
    assert_eq!(data["todaySales"]["transactions"], 1);

    assert_eq!(data["totalInventory"]["count"], 4);
    // 12*45 + 145*8 + 56*25 + 5*3 = 3115
    assert_eq!(data["totalInventory"]["value"], "3115");

    // two invoices dated today, then the two open reminders
    let kinds: Vec<&str> = data["recentActivity"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, ["sale", "sale", "reminder", "reminder"]);
}

#[tokio::test]
async fn insights_fire_per_rule_over_the_demo_dataset() {
    let store = Arc::new(MemoryStore::new());
    store.seed_demo(UID).await;
    let router = test_app(store.clone());

    // demo data: low stock yes, overdue none, one Paid invoice, inventory yes
    let (status, body) = call(&router, get("/api/dashboard/insights")).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Stock Alert", "Top Products"]);

    // add two more paid invoices so the sales-performance rule qualifies
    let now = Utc::now();
    for n in 0..2i64 {
        let invoice = Invoice {
            id: format!("extra-{}", n),
            owner_id: UID.to_string(),
            invoice_number: format!("INV-EXTRA-{}", n),
            customer_name: "Repeat Customer".to_string(),
            amount: BigDecimal::from(792),
            gst: BigDecimal::from(0),
            total_amount: BigDecimal::from(792),
            status: InvoiceStatus::Paid,
            date: now - Duration::days(n + 1),
            created_at: now,
        };
        store.insert_invoice(&invoice).await.unwrap();
    }

    let (_, body) = call(&router, get("/api/dashboard/insights")).await;
    let insights = body["data"].as_array().unwrap();
    let sales = insights
        .iter()
        .find(|i| i["title"] == "Sales Performance")
        .expect("sales insight after three paid invoices");
    // (1416 + 792 + 792) / 7 = 3000 / 7, displayed as whole rupees
    assert!(sales["message"].as_str().unwrap().contains("₹429"));
    assert_eq!(sales["trend"], "up");
}

#[tokio::test]
async fn inventory_crud_round_trip() {
    let router = test_app(Arc::new(MemoryStore::new()));

    let (status, created) = call(
        &router,
        send_json(
            "POST",
            "/api/inventory",
            json!({"name": "Maggi 2-Minute Noodles", "price": 12, "quantity": 45, "category": "Food", "threshold": 10}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(
        &router,
        send_json(
            "PUT",
            &format!("/api/inventory/{}", id),
            json!({"quantity": 6}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["quantity"], 6);

    let (status, body) = call(&router, get("/api/inventory")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (status, _) = call(
        &router,
        send_json("DELETE", &format!("/api/inventory/{}", id), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(
        &router,
        send_json("DELETE", &format!("/api/inventory/{}", id), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ITEM_NOT_FOUND");
}

#[tokio::test]
async fn invoice_creation_computes_the_total() {
    let router = test_app(Arc::new(MemoryStore::new()));

    let (status, created) = call(
        &router,
        send_json(
            "POST",
            "/api/invoices",
            json!({"invoiceNumber": "INV-2024-001", "customerName": "Rajesh Kumar", "amount": 1200, "gst": 216, "status": "Paid"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["totalAmount"], "1416");
    assert_eq!(created["data"]["status"], "Paid");

    let (status, body) = call(
        &router,
        send_json(
            "POST",
            "/api/invoices",
            json!({"invoiceNumber": "INV-2024-002", "customerName": "X", "amount": 100, "status": "Settled"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_STATUS");

    let (_, listed) = call(&router, get("/api/invoices")).await;
    assert_eq!(listed["count"], 1);
}
