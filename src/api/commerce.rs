//! Create handlers for every entity kind

use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Serialize;
use serde_json::json;

use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::models::EntityKind;
use crate::services::commerce_service::{
    self, CreateBusinessInput, CreateCartInput, CreateCartItemInput, CreateChatInput,
    CreateNotificationInput, CreateOrderInput, CreatePaymentInput, CreateProductInput,
    CreateReviewInput, CreateUserInput,
};

fn created<T: Serialize>(kind: EntityKind, result: Result<T, DomainError>) -> Response {
    match result {
        Ok(model) => (
            StatusCode::CREATED,
            Json(json!({
                "message": format!("{} created successfully", kind),
                kind.singular(): model
            })),
        )
            .into_response(),
        Err(e) => error_response(kind, e),
    }
}

fn error_response(kind: EntityKind, error: DomainError) -> Response {
    let status = match &error {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Constraint(_) => StatusCode::CONFLICT,
        DomainError::NotFound => StatusCode::NOT_FOUND,
        DomainError::Database(_) | DomainError::Internal(_) => {
            tracing::error!("Failed to create {}: {}", kind, error);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(json!({"error": error.to_string()}))).into_response()
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserInput,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Invalid field"),
        (status = 409, description = "Conflict: email already registered"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserInput>,
) -> Response {
    created(
        EntityKind::User,
        commerce_service::create_user(&state.registry, payload).await,
    )
}

#[utoipa::path(
    post,
    path = "/api/businesses",
    request_body = CreateBusinessInput,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Invalid field"),
        (status = 409, description = "Conflict: owner missing or not live"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn create_business(
    State(state): State<AppState>,
    Json(payload): Json<CreateBusinessInput>,
) -> Response {
    created(
        EntityKind::Business,
        commerce_service::create_business(&state.registry, payload).await,
    )
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductInput,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Invalid field"),
        (status = 409, description = "Conflict: business missing or not live"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductInput>,
) -> Response {
    created(
        EntityKind::Product,
        commerce_service::create_product(&state.registry, payload).await,
    )
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderInput,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Invalid field"),
        (status = 409, description = "Conflict: user missing or not live"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderInput>,
) -> Response {
    created(
        EntityKind::Order,
        commerce_service::create_order(&state.registry, payload).await,
    )
}

#[utoipa::path(
    post,
    path = "/api/payments",
    request_body = CreatePaymentInput,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Invalid field"),
        (status = 409, description = "Conflict: order missing, not live, or already paid"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn create_payment(
    State(state): State<AppState>,
    Json(payload): Json<CreatePaymentInput>,
) -> Response {
    created(
        EntityKind::Payment,
        commerce_service::create_payment(&state.registry, payload).await,
    )
}

#[utoipa::path(
    post,
    path = "/api/chats",
    request_body = CreateChatInput,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Invalid field"),
        (status = 409, description = "Conflict: referenced user or business not live"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn create_chat(
    State(state): State<AppState>,
    Json(payload): Json<CreateChatInput>,
) -> Response {
    created(
        EntityKind::Chat,
        commerce_service::create_chat(&state.registry, payload).await,
    )
}

#[utoipa::path(
    post,
    path = "/api/notifications",
    request_body = CreateNotificationInput,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Invalid field"),
        (status = 409, description = "Conflict: referenced user not live"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn create_notification(
    State(state): State<AppState>,
    Json(payload): Json<CreateNotificationInput>,
) -> Response {
    created(
        EntityKind::Notification,
        commerce_service::create_notification(&state.registry, payload).await,
    )
}

#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = CreateReviewInput,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Invalid field"),
        (status = 409, description = "Conflict: referenced user or product not live"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    Json(payload): Json<CreateReviewInput>,
) -> Response {
    created(
        EntityKind::Review,
        commerce_service::create_review(&state.registry, payload).await,
    )
}

#[utoipa::path(
    post,
    path = "/api/carts",
    request_body = CreateCartInput,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Invalid field"),
        (status = 409, description = "Conflict: referenced user not live"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn create_cart(
    State(state): State<AppState>,
    Json(payload): Json<CreateCartInput>,
) -> Response {
    created(
        EntityKind::Cart,
        commerce_service::create_cart(&state.registry, payload).await,
    )
}

#[utoipa::path(
    post,
    path = "/api/cart-items",
    request_body = CreateCartItemInput,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Invalid field"),
        (status = 409, description = "Conflict: referenced cart or product not live"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn create_cart_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateCartItemInput>,
) -> Response {
    created(
        EntityKind::CartItem,
        commerce_service::create_cart_item(&state.registry, payload).await,
    )
}
