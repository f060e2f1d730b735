use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use foodglobal::api;
use foodglobal::domain::AssociationGraph;
use foodglobal::infrastructure::{AppState, Registry};
use foodglobal::models::{business, cart, cart_item, product, user};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot`

// Helper to create a test app state
async fn setup_test_state() -> AppState {
    let db = foodglobal::db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    let registry =
        Registry::build(db, AssociationGraph::standard().unwrap()).expect("Failed to build registry");
    AppState::new(registry)
}

// Helper to create a user with a fixed ID
async fn create_test_user(db: &DatabaseConnection, id: i32) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let user = user::ActiveModel {
        id: Set(id),
        name: Set(format!("User {}", id)),
        email: Set(format!("user{}@example.com", id)),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    user.insert(db).await.expect("Failed to create user").id
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .uri(uri)
        .method(method)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_recover_unknown_id_returns_not_found() {
    let state = setup_test_state().await;
    let app = api::api_router(state);

    let (status, json) = send(&app, "PUT", "/products/42/restore").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        json,
        serde_json::json!({"message": "Entidad no encontrada o ya restaurada."})
    );
}

#[tokio::test]
async fn test_recover_soft_deleted_row() {
    let state = setup_test_state().await;
    create_test_user(state.db(), 7).await;
    let app = api::api_router(state);

    let (status, _) = send(&app, "DELETE", "/users/7").await;
    assert_eq!(status, StatusCode::OK);

    // Hidden from default reads while deleted
    let (status, _) = send(&app, "GET", "/users/7").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, json) = send(&app, "GET", "/users/7?include_deleted=true").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["user"]["deleted_at"].is_string());

    let (status, json) = send(&app, "PUT", "/users/7/restore").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Entidad restaurada con éxito.");
    assert_eq!(json["result"], 1);

    let (status, json) = send(&app, "GET", "/users/7").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["user"]["deleted_at"].is_null());
}

#[tokio::test]
async fn test_recover_is_idempotent() {
    let state = setup_test_state().await;
    create_test_user(state.db(), 3).await;
    let app = api::api_router(state);

    // Never deleted: nothing to restore
    let (status, _) = send(&app, "PUT", "/users/3/restore").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(&app, "DELETE", "/users/3").await;
    let (first, _) = send(&app, "PUT", "/users/3/restore").await;
    let (second, json) = send(&app, "PUT", "/users/3/restore").await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Entidad no encontrada o ya restaurada.");
}

#[tokio::test]
async fn test_recover_rejects_non_numeric_id() {
    let state = setup_test_state().await;
    let app = api::api_router(state);

    let (status, _) = send(&app, "PUT", "/orders/abc/restore").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_twice_reports_not_found() {
    let state = setup_test_state().await;
    create_test_user(state.db(), 5).await;
    let app = api::api_router(state);

    let (status, json) = send(&app, "DELETE", "/users/5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"], 1);

    let (status, json) = send(&app, "DELETE", "/users/5").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Entidad no encontrada o ya eliminada.");
}

#[tokio::test]
async fn test_cart_delete_cascades_but_restore_does_not() {
    let state = setup_test_state().await;
    let db = state.db().clone();
    let now = chrono::Utc::now().to_rfc3339();

    let cart = cart::ActiveModel {
        user_id: Set(None),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();
    let item = cart_item::ActiveModel {
        cart_id: Set(Some(cart.id)),
        product_id: Set(None),
        quantity: Set(2),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let app = api::api_router(state);

    let (status, _) = send(&app, "DELETE", &format!("/carts/{}", cart.id)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &format!("/cart-items/{}", item.id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "PUT", &format!("/carts/{}/restore", cart.id)).await;
    assert_eq!(status, StatusCode::OK);

    // Items are restored independently
    let (status, _) = send(&app, "GET", &format!("/cart-items/{}", item.id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, json) = send(&app, "PUT", &format!("/cart-items/{}/restore", item.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"], 1);
}

#[tokio::test]
async fn test_product_delete_cascades_to_cart_items() {
    let state = setup_test_state().await;
    let db = state.db().clone();
    let now = chrono::Utc::now().to_rfc3339();
    let owner_id = create_test_user(&db, 11).await;

    let shop = business::ActiveModel {
        user_id: Set(owner_id),
        name: Set("Panadería".to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();
    let bread = product::ActiveModel {
        business_id: Set(shop.id),
        name: Set("Pan".to_string()),
        price: Set(1.5),
        stock: Set(10),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();
    let cart = cart::ActiveModel {
        user_id: Set(Some(owner_id)),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();
    let item = cart_item::ActiveModel {
        cart_id: Set(Some(cart.id)),
        product_id: Set(Some(bread.id)),
        quantity: Set(3),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let app = api::api_router(state);

    let (status, _) = send(&app, "DELETE", &format!("/products/{}", bread.id)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &format!("/cart-items/{}", item.id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    // The cart itself is untouched
    let (status, _) = send(&app, "GET", &format!("/carts/{}", cart.id)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "PUT", &format!("/products/{}/restore", bread.id)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &format!("/cart-items/{}", item.id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, json) = send(&app, "PUT", &format!("/cart-items/{}/restore", item.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"], 1);
}

#[tokio::test]
async fn test_health_check() {
    let state = setup_test_state().await;
    let app = api::api_router(state);

    let (status, json) = send(&app, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["database"], "ok");
}

#[tokio::test]
async fn test_recover_store_failure_returns_server_error() {
    use sea_orm::{ConnectionTrait, Statement};

    let state = setup_test_state().await;
    let db = state.db().clone();
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "DROP TABLE reviews".to_owned(),
    ))
    .await
    .unwrap();
    let app = api::api_router(state);

    let (status, json) = send(&app, "PUT", "/reviews/1/restore").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "Ocurrió un error al restaurar la entidad.");
    assert!(json["error"].as_str().unwrap().contains("reviews"));
}
