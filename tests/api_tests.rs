mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{app, body_json, form_post, get, json_post, seeded_db, DELBA_ID};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check() {
    let app = app(seeded_db().await);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_dashboard_endpoints() {
    let app = app(seeded_db().await);

    let response = app.clone().oneshot(get("/dashboard/cards")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["numberOfInvoices"], 13);
    assert_eq!(json["numberOfCustomers"], 6);
    assert_eq!(json["totalPaidInvoices"], "$1,006.26");
    assert_eq!(json["totalPendingInvoices"], "$1,256.32");

    let response = app.clone().oneshot(get("/dashboard/revenue")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["revenue"].as_array().unwrap().len(), 12);
    assert_eq!(json["top_label"], 5000);
    assert_eq!(json["y_axis_labels"][0], "$5K");

    let response = app.oneshot(get("/dashboard/latest-invoices")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 5);
    assert_eq!(json[0]["amount"], "$448.00");
}

#[tokio::test]
async fn test_list_and_count_invoices() {
    let app = app(seeded_db().await);

    let response = app.clone().oneshot(get("/invoices?query=&page=3")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    let response = app.clone().oneshot(get("/invoices?query=delba")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["status"], "paid");

    let response = app.oneshot(get("/invoices/pages?query=")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total_pages"], 3);
    assert_eq!(json["pages"], json!([1, 2, 3]));
}

#[tokio::test]
async fn test_get_invoice_not_found() {
    let app = app(seeded_db().await);

    let response = app.oneshot(get("/invoices/does-not-exist")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Not found: invoice does-not-exist");
}

#[tokio::test]
async fn test_create_update_delete_flow() {
    let app = app(seeded_db().await);

    let body = format!("customerId={}&amount=42.5&status=pending", DELBA_ID);
    let response = app.clone().oneshot(form_post("/invoices", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/dashboard/invoices");

    // exact amount search runs on cents
    let response = app.clone().oneshot(get("/invoices?query=4250")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    let id = json[0]["id"].as_str().unwrap().to_string();

    let response = app.clone().oneshot(get(&format!("/invoices/{}", id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["amount"], 42.5);
    assert_eq!(json["status"], "pending");

    let body = format!("customerId={}&amount=50&status=paid", DELBA_ID);
    let response = app
        .clone()
        .oneshot(form_post(&format!("/invoices/{}", id), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app.clone().oneshot(get(&format!("/invoices/{}", id))).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["amount"], 50.0);
    assert_eq!(json["status"], "paid");

    let delete = Request::builder()
        .uri(format!("/invoices/{}", id))
        .method("DELETE")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(delete).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(get(&format!("/invoices/{}", id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_invoice_validation_response() {
    let app = app(seeded_db().await);

    let response = app
        .oneshot(form_post("/invoices", "amount=0&status=unknown"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Missing Fields. Failed to Create Invoice.");
    assert_eq!(json["errors"]["customerId"][0], "Please select a customer.");
    assert_eq!(json["errors"]["amount"][0], "Please enter an amount greater than $0.");
    assert_eq!(json["errors"]["status"][0], "Please select an invoice status.");
}

#[tokio::test]
async fn test_customer_endpoints() {
    let app = app(seeded_db().await);

    let response = app.clone().oneshot(get("/customers")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 6);
    assert_eq!(json[0]["name"], "Amy Burns");
    assert!(json[0].get("email").is_none());

    let response = app.oneshot(get("/customers/table?query=LEE")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["total_invoices"], 2);
    assert_eq!(json[0]["total_pending"], "$542.46");
    assert_eq!(json[0]["total_paid"], "$10.00");
}

#[tokio::test]
async fn test_login() {
    let app = app(seeded_db().await);

    let response = app
        .clone()
        .oneshot(json_post(
            "/auth/login",
            &json!({"email": "user@nextmail.com", "password": "123456"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "User");
    assert!(json.get("password").is_none());

    let response = app
        .clone()
        .oneshot(json_post(
            "/auth/login",
            &json!({"email": "user@nextmail.com", "password": "wrong-password"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid credentials.");

    let response = app
        .oneshot(json_post(
            "/auth/login",
            &json!({"email": "not-an-email", "password": "123456"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_openapi_document() {
    let app = app(seeded_db().await);

    let response = app.oneshot(get("/api-doc/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["paths"].get("/invoices/{id}").is_some());
    assert!(json["paths"].get("/dashboard/cards").is_some());
}
