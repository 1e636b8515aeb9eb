//! Validation and error-shape tests: field-level 422s, 409 conflicts, 404s.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;

use stockroom_integration_tests::{
    create_product, create_store, create_supplier, delete, get, post_json, test_app,
};

fn shipment_body(store_id: i64, supplier_id: i64, items: serde_json::Value) -> serde_json::Value {
    json!({
        "store_id": store_id,
        "supplier_id": supplier_id,
        "date": "2024-03-01T12:00:00Z",
        "items": items,
    })
}

#[tokio::test]
async fn price_validation_names_the_offending_line() {
    let app = test_app();
    let store_id = create_store(&app, "Downtown").await;
    let supplier_id = create_supplier(&app, "Acme").await;
    let widget_id = create_product(&app, "Widget", "WIDGET-001").await;

    // Too many fractional digits
    let (status, body) = post_json(
        &app,
        "/shipments/",
        &shipment_body(
            store_id,
            supplier_id,
            json!([
                {"product_id": widget_id, "quantity": 1, "price_per_unit": "1.00"},
                {"product_id": widget_id, "quantity": 1, "price_per_unit": "10.999"},
            ]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["field"], "items[1].price_per_unit");

    // Magnitude bound: 999999999.99 passes, 1000000000.00 does not
    let (status, _) = post_json(
        &app,
        "/shipments/",
        &shipment_body(
            store_id,
            supplier_id,
            json!([
                {"product_id": widget_id, "quantity": 1, "price_per_unit": "999999999.99"},
            ]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(
        &app,
        "/shipments/",
        &shipment_body(
            store_id,
            supplier_id,
            json!([
                {"product_id": widget_id, "quantity": 1, "price_per_unit": "1000000000.00"},
            ]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "items[0].price_per_unit");
}

#[tokio::test]
async fn non_positive_quantity_is_rejected() {
    let app = test_app();
    let store_id = create_store(&app, "Downtown").await;
    let supplier_id = create_supplier(&app, "Acme").await;
    let widget_id = create_product(&app, "Widget", "WIDGET-001").await;

    for quantity in [0, -3] {
        let (status, body) = post_json(
            &app,
            "/shipments/",
            &shipment_body(
                store_id,
                supplier_id,
                json!([
                    {"product_id": widget_id, "quantity": quantity, "price_per_unit": "1.00"},
                ]),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], "items[0].quantity");
    }
}

#[tokio::test]
async fn dangling_references_fail_without_partial_writes() {
    let app = test_app();
    let store_id = create_store(&app, "Downtown").await;
    let supplier_id = create_supplier(&app, "Acme").await;
    let widget_id = create_product(&app, "Widget", "WIDGET-001").await;

    // Unknown store
    let (status, body) = post_json(
        &app,
        "/shipments/",
        &shipment_body(
            999,
            supplier_id,
            json!([{"product_id": widget_id, "quantity": 1, "price_per_unit": "1.00"}]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "missing_reference");
    assert_eq!(body["field"], "store_id");

    // Unknown product on the second line
    let (status, body) = post_json(
        &app,
        "/shipments/",
        &shipment_body(
            store_id,
            supplier_id,
            json!([
                {"product_id": widget_id, "quantity": 1, "price_per_unit": "1.00"},
                {"product_id": 999, "quantity": 1, "price_per_unit": "1.00"},
            ]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "product_id");

    // Neither failure left a shipment behind
    let (_, body) = get(&app, "/shipments/").await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn duplicate_sku_returns_conflict() {
    let app = test_app();
    create_product(&app, "Widget", "WIDGET-001").await;

    let (status, body) = post_json(
        &app,
        "/products/",
        &json!({"name": "Widget again", "sku": "WIDGET-001"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn malformed_entity_fields_are_422() {
    let app = test_app();

    let (status, body) = post_json(&app, "/stores/", &json!({"name": "", "address": "x"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "name");

    let (status, body) = post_json(
        &app,
        "/products/",
        &json!({"name": "Widget", "sku": "HAS SPACE"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "sku");

    let (status, body) = post_json(
        &app,
        "/suppliers/",
        &json!({"name": "Acme", "contact_email": "not-an-email"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "contact_email");
}

#[tokio::test]
async fn name_search_is_case_insensitive() {
    let app = test_app();
    create_store(&app, "Harbor Outlet").await;
    create_store(&app, "Downtown").await;
    create_product(&app, "Blue Widget", "WIDGET-B").await;
    create_supplier(&app, "Acme Wholesale").await;

    let (_, body) = get(&app, "/stores/?q=harbor").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Harbor Outlet");

    let (_, body) = get(&app, "/products/?q=WIDG").await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = get(&app, "/suppliers/?q=acme").await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = get(&app, "/stores/?q=nowhere").await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn deleting_unknown_ids_is_404() {
    let app = test_app();
    for uri in ["/stores/1", "/products/1", "/suppliers/1", "/shipments/1"] {
        let (status, body) = delete(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["error"], "not_found");
    }
}

#[tokio::test]
async fn health_endpoints_respond() {
    let app = test_app();

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = get(&app, "/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}
