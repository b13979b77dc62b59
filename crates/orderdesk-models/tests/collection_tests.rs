//! Integration tests for typed collections against a mock store.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use orderdesk_firestore::{FirestoreClient, StaticTokenSource, StoreConfig};
use orderdesk_models::{
    Category, Collection, CollectionError, Order, OrderItem, OrderStatus, PaymentMethod, Product,
};

const DOCS: &str = "/v1/projects/shop/databases/(default)/documents";

fn client_for(server: &MockServer) -> FirestoreClient {
    FirestoreClient::new(
        StoreConfig::builder("shop").endpoint(server.uri()).build(),
        Arc::new(StaticTokenSource::new("test-token")),
    )
    .expect("client construction")
}

fn product_envelope(id: &str, name: &str, price: i64) -> serde_json::Value {
    json!({
        "name": format!("projects/shop/databases/(default)/documents/products/{id}"),
        "fields": {
            "name": { "stringValue": name },
            "category": { "stringValue": "drinks" },
            "status": { "stringValue": "available" },
            "description": { "stringValue": "" },
            "price": { "integerValue": price.to_string() }
        }
    })
}

fn pending_order(id: &str) -> Order {
    Order {
        id: id.to_string(),
        full_name: "Nguyễn Văn An".to_string(),
        address: "12 Tràng Thi, Hà Nội".to_string(),
        phone_number: "0901234567".to_string(),
        payment_method: PaymentMethod { card_id: None },
        notify: String::new(),
        items: vec![OrderItem {
            product_id: "tea1".to_string(),
            name: "Trà đá".to_string(),
            quantity: 2,
            price: 10000,
        }],
        user_id: "u1".to_string(),
        created_at: None,
        status: OrderStatus::Pending,
    }
}

#[tokio::test]
async fn typed_create_then_get_round_trips() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{DOCS}/products")))
        .and(body_partial_json(json!({
            "fields": {
                "name": { "stringValue": "Trà đá" },
                "category": { "stringValue": "drinks" },
                "price": { "integerValue": "10000" }
            }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(product_envelope("tea1", "Trà đá", 10000)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{DOCS}/products/tea1")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(product_envelope("tea1", "Trà đá", 10000)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let products: Collection<Product> = Collection::new(&client);

    let product = Product {
        id: String::new(),
        name: "Trà đá".to_string(),
        category: Category::Drinks,
        status: "available".to_string(),
        description: String::new(),
        price: 10000,
        image: None,
    };
    let id = products.create(&product).await.unwrap();
    assert_eq!(id, "tea1");

    let loaded = products.get("tea1").await.unwrap();
    assert_eq!(loaded.name, "Trà đá");
    assert_eq!(loaded.category, Category::Drinks);
    assert_eq!(loaded.price, 10000);
}

#[tokio::test]
async fn undecodable_rows_are_skipped_in_lists() {
    let server = MockServer::start().await;

    // Second row has no price; it should be dropped, not break the page.
    Mock::given(method("GET"))
        .and(path(format!("{DOCS}/products")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [
                product_envelope("tea1", "Trà đá", 10000),
                {
                    "name": "projects/shop/databases/(default)/documents/products/broken",
                    "fields": { "name": { "stringValue": "Nước cam" } }
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let products: Collection<Product> = Collection::new(&client);

    let page = products.page(10, None).await.unwrap();
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].id, "tea1");
    assert_eq!(page.next_page_token, None);
}

#[tokio::test]
async fn order_counts_filter_by_user_and_status() {
    let server = MockServer::start().await;

    let row = |id: &str| {
        json!({
            "document": {
                "name": format!("projects/shop/databases/(default)/documents/orders/{id}"),
                "fields": {}
            },
            "readTime": "2025-04-01T08:30:00Z"
        })
    };

    Mock::given(method("POST"))
        .and(path(format!("{DOCS}:runQuery")))
        .and(body_json(json!({
            "structuredQuery": {
                "from": [{ "collectionId": "orders" }],
                "select": { "fields": [{ "fieldPath": "__name__" }] },
                "where": {
                    "compositeFilter": {
                        "op": "AND",
                        "filters": [
                            {
                                "fieldFilter": {
                                    "field": { "fieldPath": "userId" },
                                    "op": "EQUAL",
                                    "value": { "stringValue": "u1" }
                                }
                            },
                            {
                                "fieldFilter": {
                                    "field": { "fieldPath": "status" },
                                    "op": "EQUAL",
                                    "value": { "stringValue": "completed" }
                                }
                            }
                        ]
                    }
                }
            }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([row("o1"), row("o2"), row("o3")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let orders: Collection<Order> = Collection::new(&client);

    let completed = orders
        .count_for_user_with_status("u1", OrderStatus::Completed)
        .await;
    assert_eq!(completed, 3);
}

#[tokio::test]
async fn transition_patches_only_the_status_field() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(format!("{DOCS}/orders/ord1")))
        .and(query_param("updateMask.fieldPaths", "status"))
        .and(body_json(json!({
            "fields": { "status": { "stringValue": "confirmed" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/shop/databases/(default)/documents/orders/ord1",
            "fields": { "status": { "stringValue": "confirmed" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let orders: Collection<Order> = Collection::new(&client);

    orders
        .transition(&pending_order("ord1"), OrderStatus::Confirmed)
        .await
        .unwrap();
}

#[tokio::test]
async fn illegal_transition_never_reaches_the_store() {
    let server = MockServer::start().await;
    // No mocks: any request would fail the test via the unwrap below.

    let client = client_for(&server);
    let orders: Collection<Order> = Collection::new(&client);

    let result = orders
        .transition(&pending_order("ord1"), OrderStatus::Completed)
        .await;
    assert!(matches!(
        result,
        Err(CollectionError::InvalidTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Completed,
            ..
        })
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}
