//! `ApiClient` against a mock backend.

#![allow(clippy::unwrap_used)]

use lumina_core::{Email, OrderId, OrderStatus, Price, ProductId, ReviewId};
use lumina_storefront::api::{ApiClient, ApiError, NewProduct, NewReview, Registration};
use lumina_storefront::config::ClientConfig;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&ClientConfig::new(&server.uri()).unwrap()).unwrap()
}

fn token() -> SecretString {
    SecretString::from("jwt-admin")
}

fn product(id: &str, price: f64) -> Value {
    json!({
        "productId": id,
        "name": format!("Product {id}"),
        "image": [],
        "price": price,
        "labelledPrice": price,
        "stock": 3
    })
}

#[tokio::test]
async fn test_list_products_is_cached_until_admin_write() {
    let server = MockServer::start().await;
    let client = client(&server);

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([product("A", 5.0)])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/products/A"))
        .and(header("authorization", "Bearer jwt-admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.list_products().await.unwrap().len(), 1);
    assert_eq!(client.list_products().await.unwrap().len(), 1);

    client
        .delete_product(&token(), &ProductId::new("A"))
        .await
        .unwrap();

    // cache was dropped, so this hits the backend again
    client.list_products().await.unwrap();
}

#[tokio::test]
async fn test_create_and_update_product_bodies() {
    let server = MockServer::start().await;
    let client = client(&server);

    let new = NewProduct {
        product_id: ProductId::new("COSM24009"),
        name: "Night Cream".to_string(),
        alt_names: NewProduct::parse_alt_names("Sleep Mask, Overnight Cream"),
        description: "Rich".to_string(),
        image: vec!["https://cdn.example.com/n.jpg".to_string()],
        labelled_price: Price::from(30),
        price: Price::from_cents(2450),
        stock: 10,
    };
    let expected = json!({
        "productId": "COSM24009",
        "name": "Night Cream",
        "altNames": ["Sleep Mask", "Overnight Cream"],
        "description": "Rich",
        "image": ["https://cdn.example.com/n.jpg"],
        "labelledPrice": 30.0,
        "price": 24.5,
        "stock": 10
    });

    Mock::given(method("POST"))
        .and(path("/products"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "created"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/products/COSM24009"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "updated"})))
        .expect(1)
        .mount(&server)
        .await;

    client.create_product(&token(), &new).await.unwrap();
    client
        .update_product(&token(), &new.product_id, &new)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_search_encodes_query_and_skips_blank() {
    let server = MockServer::start().await;
    let client = client(&server);

    Mock::given(method("GET"))
        .and(path("/products/search/lip%20balm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([product("B", 4.5)])))
        .expect(1)
        .mount(&server)
        .await;

    let found = client.search_products("  lip balm ").await.unwrap();
    assert_eq!(found[0].product_id.as_str(), "B");

    assert!(client.search_products("   ").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_product_is_not_found() {
    let server = MockServer::start().await;
    let client = client(&server);

    Mock::given(method("GET"))
        .and(path("/products/NOPE"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Product not found"})))
        .mount(&server)
        .await;

    let err = client.get_product(&ProductId::new("NOPE")).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(ref m) if m == "Product not found"));
}

#[tokio::test]
async fn test_rate_limited() {
    let server = MockServer::start().await;
    let client = client(&server);

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;

    let err = client.list_products().await.unwrap_err();
    assert!(matches!(err, ApiError::RateLimited(7)));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    let client = client(&server);

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    assert!(matches!(
        client.list_products().await.unwrap_err(),
        ApiError::Parse(_)
    ));
}

#[tokio::test]
async fn test_reviews_round_trip() {
    let server = MockServer::start().await;
    let client = client(&server);

    Mock::given(method("GET"))
        .and(path("/reviews/COSM24001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "_id": "rev1",
            "productId": "COSM24001",
            "userName": "Ann",
            "userEmail": "ann@example.com",
            "rating": 5,
            "comment": "Glowy",
            "date": "2025-05-02T08:30:00.000Z",
            "helpfulYes": 3,
            "helpfulNo": 1
        }])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/reviews"))
        .and(header("authorization", "Bearer jwt-admin"))
        .and(body_json(json!({
            "productId": "COSM24001",
            "rating": 4,
            "comment": "Nice",
            "userName": "Bob",
            "userEmail": "bob@example.com"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/reviews/rev1/vote"))
        .and(body_json(json!({"isHelpful": false})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/reviews/rev1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let reviews = client
        .list_reviews(&ProductId::new("COSM24001"))
        .await
        .unwrap();
    assert_eq!(reviews[0].helpful_yes, 3);

    client
        .create_review(
            &token(),
            &NewReview {
                product_id: ProductId::new("COSM24001"),
                rating: 4,
                comment: "Nice".to_string(),
                user_name: "Bob".to_string(),
                user_email: "bob@example.com".to_string(),
            },
        )
        .await
        .unwrap();

    let id = ReviewId::new("rev1");
    client.vote_review(&token(), &id, false).await.unwrap();
    client.delete_review(&token(), &id).await.unwrap();
}

#[tokio::test]
async fn test_orders_admin_calls() {
    let server = MockServer::start().await;
    let client = client(&server);

    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(header("authorization", "Bearer jwt-admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "orderId": "ORD00001",
            "date": "2025-05-01T10:00:00.000Z",
            "total": 12.5,
            "status": "pending",
            "products": []
        }])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/orders/ORD00001/cancelled"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "updated"})))
        .expect(1)
        .mount(&server)
        .await;

    let orders = client.list_orders(&token()).await.unwrap();
    assert_eq!(orders[0].status, OrderStatus::Pending);

    client
        .update_order_status(&token(), &OrderId::new("ORD00001"), OrderStatus::Cancelled)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_orders_without_token_are_unauthorized() {
    let server = MockServer::start().await;
    let client = client(&server);

    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthorized"})))
        .mount(&server)
        .await;

    let err = client
        .list_orders(&SecretString::from("expired"))
        .await
        .unwrap_err();
    assert!(err.is_auth_failure());
}

#[tokio::test]
async fn test_register_and_google_login() {
    let server = MockServer::start().await;
    let client = client(&server);

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(json!({
            "firstName": "Ann",
            "lastName": "Perera",
            "email": "ann@example.com",
            "password": "hunter22"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "User created"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users/login/google"))
        .and(body_json(json!({"accessToken": "google-token"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-google",
            "role": "admin"
        })))
        .mount(&server)
        .await;

    client
        .register(&Registration {
            first_name: "Ann".to_string(),
            last_name: "Perera".to_string(),
            email: Email::parse("ann@EXAMPLE.com").unwrap(),
            password: SecretString::from("hunter22"),
        })
        .await
        .unwrap();

    let response = client
        .login_with_google(&SecretString::from("google-token"))
        .await
        .unwrap();
    assert_eq!(response.token.expose_secret(), "jwt-google");
    assert!(response.role.is_admin());
}
