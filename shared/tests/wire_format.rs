//! JSON shapes exchanged with the storefront and the cloud

use rust_decimal::Decimal;
use serde_json::json;
use shared::{ErrorBody, OrderRecord, OrderRequest, OrderSubmitted};

#[test]
fn test_order_request_accepts_storefront_payload() {
    let body = json!({
        "customer": {
            "name": "Karim",
            "phone": "+20 100 000 0000",
            "address": "5 Tahrir Sq",
            "notes": "Ring twice"
        },
        "items": [{"name": "Falafel", "qty": 4, "price": 7.25}],
        "totals": {"subtotal": 29.0, "delivery": 10.0, "total": 39.0}
    });

    let order: OrderRequest = serde_json::from_value(body).unwrap();
    assert_eq!(order.customer.notes.as_deref(), Some("Ring twice"));
    assert_eq!(order.items[0].line_total(), Decimal::new(2900, 2));
    assert!(order.validate().is_ok());
}

#[test]
fn test_missing_delivery_defaults_to_zero() {
    let body = json!({
        "customer": {"name": "Karim"},
        "items": [{"name": "Falafel", "qty": 1, "price": 7}],
        "totals": {"subtotal": 7, "total": 7}
    });

    let order: OrderRequest = serde_json::from_value(body).unwrap();
    assert_eq!(order.totals.delivery, 0.0);
    assert_eq!(order.customer.phone, "");
}

#[test]
fn test_response_bodies() {
    let ok = OrderSubmitted::new(12, "order_12.txt", "https://x/order_12.txt");
    assert_eq!(
        serde_json::to_value(&ok).unwrap(),
        json!({
            "success": true,
            "order_id": 12,
            "file_name": "order_12.txt",
            "url": "https://x/order_12.txt"
        })
    );

    let err = ErrorBody::new("Failed to process order : boom");
    assert_eq!(
        serde_json::to_value(&err).unwrap(),
        json!({"success": false, "message": "Failed to process order : boom"})
    );
}

#[test]
fn test_order_record_row() {
    assert_eq!(
        serde_json::to_value(OrderRecord::new_order(7)).unwrap(),
        json!({"id": 7, "status": "new"})
    );
}
