pub mod commerce;
pub mod common;
pub mod health;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Router,
};

use crate::infrastructure::AppState;
use crate::models::EntityKind;

pub fn api_router(state: AppState) -> Router {
    let mut router = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Creation
        .route("/users", post(commerce::create_user))
        .route("/businesses", post(commerce::create_business))
        .route("/products", post(commerce::create_product))
        .route("/orders", post(commerce::create_order))
        .route("/payments", post(commerce::create_payment))
        .route("/chats", post(commerce::create_chat))
        .route("/notifications", post(commerce::create_notification))
        .route("/reviews", post(commerce::create_review))
        .route("/carts", post(commerce::create_cart))
        .route("/cart-items", post(commerce::create_cart_item));

    // Read, soft delete and recovery are shared by every kind
    for kind in EntityKind::ALL {
        router = router
            .route(
                &format!("/{}/:id", kind.path()),
                get(
                    move |state: State<AppState>, id: Path<i32>, params: Query<common::ReadParams>| {
                        common::get_entity(kind, state, id, params)
                    },
                )
                .delete(move |state: State<AppState>, id: Path<i32>| {
                    common::delete_entity(kind, state, id)
                }),
            )
            .route(
                &format!("/{}/:id/restore", kind.path()),
                put(move |state: State<AppState>, id: Path<i32>| {
                    common::recover_entity(kind, state, id)
                }),
            );
    }

    router.with_state(state)
}
