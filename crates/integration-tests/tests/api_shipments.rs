//! End-to-end shipment flows: create, list with filters, totals, delete.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;

use stockroom_integration_tests::{
    create_product, create_store, create_supplier, delete, get, post_json, test_app,
};

#[tokio::test]
async fn create_then_list_reports_exact_totals() {
    let app = test_app();
    let store_id = create_store(&app, "Downtown").await;
    let supplier_id = create_supplier(&app, "Acme").await;
    let widget_id = create_product(&app, "Widget", "WIDGET-001").await;
    let gadget_id = create_product(&app, "Gadget", "GADGET-001").await;

    let (status, body) = post_json(
        &app,
        "/shipments/",
        &json!({
            "store_id": store_id,
            "supplier_id": supplier_id,
            "date": "2024-03-01T12:00:00Z",
            "items": [
                {"product_id": widget_id, "quantity": 2, "price_per_unit": "10.50"},
                {"product_id": gadget_id, "quantity": 1, "price_per_unit": "3.00"},
            ],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
    assert_eq!(body["success"], true);
    let shipment_id = body["shipment_id"].as_i64().unwrap();

    let (status, body) = get(&app, "/shipments/").await;
    assert_eq!(status, StatusCode::OK);
    let shipments = body.as_array().unwrap();
    assert_eq!(shipments.len(), 1);

    let shipment = &shipments[0];
    assert_eq!(shipment["id"].as_i64().unwrap(), shipment_id);
    assert_eq!(shipment["store"], "Downtown");
    assert_eq!(shipment["supplier"], "Acme");
    // 2 x 10.50 + 1 x 3.00 = 24.00 exactly, serialized as a string
    assert_eq!(shipment["total_quantity"], 3);
    assert_eq!(shipment["total_sum"], "24.00");
    assert_eq!(shipment["items"][0]["product"], "Widget");
    assert_eq!(shipment["items"][0]["price_per_unit"], "10.50");
}

#[tokio::test]
async fn same_product_may_appear_on_multiple_lines() {
    let app = test_app();
    let store_id = create_store(&app, "Downtown").await;
    let supplier_id = create_supplier(&app, "Acme").await;
    let widget_id = create_product(&app, "Widget", "WIDGET-001").await;

    let (status, body) = post_json(
        &app,
        "/shipments/",
        &json!({
            "store_id": store_id,
            "supplier_id": supplier_id,
            "date": "2024-03-01T12:00:00Z",
            "items": [
                {"product_id": widget_id, "quantity": 2, "price_per_unit": "1.00"},
                {"product_id": widget_id, "quantity": 3, "price_per_unit": "0.50"},
            ],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");

    let (_, body) = get(&app, "/shipments/").await;
    assert_eq!(body[0]["total_quantity"], 5);
    assert_eq!(body[0]["total_sum"], "3.50");
}

#[tokio::test]
async fn list_filters_combine_conjunctively() {
    let app = test_app();
    let downtown = create_store(&app, "Downtown").await;
    let harbor = create_store(&app, "Harbor").await;
    let supplier_id = create_supplier(&app, "Acme").await;
    let widget_id = create_product(&app, "Widget", "WIDGET-001").await;

    for (store, day) in [(downtown, 1), (downtown, 5), (harbor, 5), (downtown, 9)] {
        let (status, _) = post_json(
            &app,
            "/shipments/",
            &json!({
                "store_id": store,
                "supplier_id": supplier_id,
                "date": format!("2024-03-{day:02}T12:00:00Z"),
                "items": [
                    {"product_id": widget_id, "quantity": 1, "price_per_unit": "1.00"},
                ],
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = get(&app, &format!("/shipments/?store_id={downtown}")).await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    // Inclusive bounds: shipments on the 5th and 9th both match
    let uri = format!(
        "/shipments/?store_id={downtown}&date_from=2024-03-05T12:00:00Z&date_to=2024-03-09T12:00:00Z"
    );
    let (_, body) = get(&app, &uri).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = get(&app, "/shipments/?supplier_id=999").await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn shipment_detail_and_delete() {
    let app = test_app();
    let store_id = create_store(&app, "Downtown").await;
    let supplier_id = create_supplier(&app, "Acme").await;
    let widget_id = create_product(&app, "Widget", "WIDGET-001").await;

    let (_, body) = post_json(
        &app,
        "/shipments/",
        &json!({
            "store_id": store_id,
            "supplier_id": supplier_id,
            "date": "2024-03-01T12:00:00Z",
            "items": [
                {"product_id": widget_id, "quantity": 4, "price_per_unit": "2.25"},
            ],
        }),
    )
    .await;
    let shipment_id = body["shipment_id"].as_i64().unwrap();

    let (status, body) = get(&app, &format!("/shipments/{shipment_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_sum"], "9.00");

    let (status, _) = delete(&app, &format!("/shipments/{shipment_id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = get(&app, &format!("/shipments/{shipment_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_store_cascades_to_its_shipments() {
    let app = test_app();
    let store_id = create_store(&app, "Downtown").await;
    let supplier_id = create_supplier(&app, "Acme").await;
    let widget_id = create_product(&app, "Widget", "WIDGET-001").await;

    let (status, _) = post_json(
        &app,
        "/shipments/",
        &json!({
            "store_id": store_id,
            "supplier_id": supplier_id,
            "date": "2024-03-01T12:00:00Z",
            "items": [
                {"product_id": widget_id, "quantity": 1, "price_per_unit": "1.00"},
            ],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = delete(&app, &format!("/stores/{store_id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = get(&app, "/shipments/").await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}
