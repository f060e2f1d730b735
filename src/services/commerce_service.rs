//! Commerce Service - entity creation with association checks
//!
//! Every create runs the parent checks derived from the association graph
//! before inserting, so a dependent row is never written without its
//! mandatory parent.
#![allow(clippy::needless_update)] // SeaORM ActiveModels require ..Default::default()

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::DomainError;
use crate::infrastructure::Registry;
use crate::models::{
    business, cart, cart_item, chat, notification, order, payment, product, review, user,
    EntityKind,
};

/// Foreign key values supplied with a create request
type ParentRefs<'a> = &'a [(&'static str, Option<i32>)];

/// Check every belongs-to edge of `kind` against the supplied references.
///
/// A missing reference fails when the edge is mandatory; a supplied one must
/// point at a live (not soft-deleted) parent.
pub async fn ensure_parents(
    registry: &Registry,
    kind: EntityKind,
    refs: ParentRefs<'_>,
) -> Result<(), DomainError> {
    for edge in registry.graph().parents_of(kind) {
        let value = refs
            .iter()
            .find(|(fk, _)| *fk == edge.foreign_key)
            .and_then(|(_, id)| *id);

        match value {
            None if !edge.nullable => {
                return Err(DomainError::Constraint(format!(
                    "{} requires {} ({})",
                    kind, edge.foreign_key, edge.target
                )));
            }
            None => {}
            Some(id) => {
                if !registry.repository(edge.target).is_live(id).await? {
                    return Err(DomainError::Constraint(format!(
                        "{} {} referenced by {}.{} does not exist",
                        edge.target, id, kind, edge.foreign_key
                    )));
                }
            }
        }
    }
    Ok(())
}

fn required(kind: EntityKind, foreign_key: &str, value: Option<i32>) -> Result<i32, DomainError> {
    value.ok_or_else(|| DomainError::Constraint(format!("{} requires {}", kind, foreign_key)))
}

fn non_empty(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn non_negative(field: &str, value: f64) -> Result<(), DomainError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::Validation(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(())
}

fn timestamps() -> (String, String) {
    let now = chrono::Utc::now().to_rfc3339();
    (now.clone(), now)
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

pub async fn create_user(
    registry: &Registry,
    input: CreateUserInput,
) -> Result<user::Model, DomainError> {
    non_empty("name", &input.name)?;
    let email = input.email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(DomainError::Validation("email is not valid".to_string()));
    }

    let taken = user::Entity::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .count(registry.db())
        .await?;
    if taken > 0 {
        return Err(DomainError::Constraint(format!(
            "email {} is already registered",
            email
        )));
    }

    let (created_at, updated_at) = timestamps();
    let model = user::ActiveModel {
        name: Set(input.name),
        email: Set(email),
        phone: Set(input.phone),
        created_at: Set(created_at),
        updated_at: Set(updated_at),
        ..Default::default()
    }
    .insert(registry.db())
    .await?;

    tracing::info!("Created user {}", model.id);
    Ok(model)
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBusinessInput {
    pub user_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
}

pub async fn create_business(
    registry: &Registry,
    input: CreateBusinessInput,
) -> Result<business::Model, DomainError> {
    let kind = EntityKind::Business;
    ensure_parents(registry, kind, &[("user_id", input.user_id)]).await?;
    let user_id = required(kind, "user_id", input.user_id)?;
    non_empty("name", &input.name)?;

    let (created_at, updated_at) = timestamps();
    let model = business::ActiveModel {
        user_id: Set(user_id),
        name: Set(input.name),
        description: Set(input.description),
        address: Set(input.address),
        created_at: Set(created_at),
        updated_at: Set(updated_at),
        ..Default::default()
    }
    .insert(registry.db())
    .await?;

    tracing::info!("Created business {} for user {}", model.id, user_id);
    Ok(model)
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateProductInput {
    pub business_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub stock: i32,
}

pub async fn create_product(
    registry: &Registry,
    input: CreateProductInput,
) -> Result<product::Model, DomainError> {
    let kind = EntityKind::Product;
    ensure_parents(registry, kind, &[("business_id", input.business_id)]).await?;
    let business_id = required(kind, "business_id", input.business_id)?;
    non_empty("name", &input.name)?;
    non_negative("price", input.price)?;
    if input.stock < 0 {
        return Err(DomainError::Validation("stock must not be negative".to_string()));
    }

    let (created_at, updated_at) = timestamps();
    let model = product::ActiveModel {
        business_id: Set(business_id),
        name: Set(input.name),
        description: Set(input.description),
        price: Set(input.price),
        stock: Set(input.stock),
        created_at: Set(created_at),
        updated_at: Set(updated_at),
        ..Default::default()
    }
    .insert(registry.db())
    .await?;

    Ok(model)
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateOrderInput {
    pub user_id: Option<i32>,
    pub status: Option<String>,
    #[serde(default)]
    pub total: f64,
}

pub async fn create_order(
    registry: &Registry,
    input: CreateOrderInput,
) -> Result<order::Model, DomainError> {
    let kind = EntityKind::Order;
    ensure_parents(registry, kind, &[("user_id", input.user_id)]).await?;
    let user_id = required(kind, "user_id", input.user_id)?;
    non_negative("total", input.total)?;
    let status = input.status.unwrap_or_else(|| "pending".to_string());
    if !order::STATUSES.contains(&status.as_str()) {
        return Err(DomainError::Validation(format!(
            "status must be one of: {}",
            order::STATUSES.join(", ")
        )));
    }

    let (created_at, updated_at) = timestamps();
    let model = order::ActiveModel {
        user_id: Set(user_id),
        status: Set(status),
        total: Set(input.total),
        created_at: Set(created_at),
        updated_at: Set(updated_at),
        ..Default::default()
    }
    .insert(registry.db())
    .await?;

    tracing::info!("Created order {} for user {}", model.id, user_id);
    Ok(model)
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePaymentInput {
    pub order_id: Option<i32>,
    pub amount: f64,
    pub method: String,
    pub status: Option<String>,
}

pub async fn create_payment(
    registry: &Registry,
    input: CreatePaymentInput,
) -> Result<payment::Model, DomainError> {
    ensure_parents(registry, EntityKind::Payment, &[("order_id", input.order_id)]).await?;
    non_negative("amount", input.amount)?;
    non_empty("method", &input.method)?;

    // Deleted payments keep their order slot until restored
    if let Some(order_id) = input.order_id {
        let existing = payment::Entity::find()
            .filter(payment::Column::OrderId.eq(order_id))
            .count(registry.db())
            .await?;
        if existing > 0 {
            return Err(DomainError::Constraint(format!(
                "order {} already has a payment",
                order_id
            )));
        }
    }

    let (created_at, updated_at) = timestamps();
    let model = payment::ActiveModel {
        order_id: Set(input.order_id),
        amount: Set(input.amount),
        method: Set(input.method),
        status: Set(input.status.unwrap_or_else(|| "pending".to_string())),
        created_at: Set(created_at),
        updated_at: Set(updated_at),
        ..Default::default()
    }
    .insert(registry.db())
    .await?;

    Ok(model)
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateChatInput {
    pub user_id: Option<i32>,
    pub business_id: Option<i32>,
    pub message: String,
}

pub async fn create_chat(
    registry: &Registry,
    input: CreateChatInput,
) -> Result<chat::Model, DomainError> {
    ensure_parents(
        registry,
        EntityKind::Chat,
        &[("user_id", input.user_id), ("business_id", input.business_id)],
    )
    .await?;
    non_empty("message", &input.message)?;

    let (created_at, updated_at) = timestamps();
    let model = chat::ActiveModel {
        user_id: Set(input.user_id),
        business_id: Set(input.business_id),
        message: Set(input.message),
        created_at: Set(created_at),
        updated_at: Set(updated_at),
        ..Default::default()
    }
    .insert(registry.db())
    .await?;

    Ok(model)
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateNotificationInput {
    pub user_id: Option<i32>,
    pub message: String,
}

pub async fn create_notification(
    registry: &Registry,
    input: CreateNotificationInput,
) -> Result<notification::Model, DomainError> {
    ensure_parents(registry, EntityKind::Notification, &[("user_id", input.user_id)]).await?;
    non_empty("message", &input.message)?;

    let (created_at, updated_at) = timestamps();
    let model = notification::ActiveModel {
        user_id: Set(input.user_id),
        message: Set(input.message),
        read: Set(false),
        created_at: Set(created_at),
        updated_at: Set(updated_at),
        ..Default::default()
    }
    .insert(registry.db())
    .await?;

    Ok(model)
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateReviewInput {
    pub user_id: Option<i32>,
    pub product_id: Option<i32>,
    pub rating: i32,
    pub comment: Option<String>,
}

pub async fn create_review(
    registry: &Registry,
    input: CreateReviewInput,
) -> Result<review::Model, DomainError> {
    ensure_parents(
        registry,
        EntityKind::Review,
        &[("user_id", input.user_id), ("product_id", input.product_id)],
    )
    .await?;
    if !(1..=5).contains(&input.rating) {
        return Err(DomainError::Validation(
            "rating must be between 1 and 5".to_string(),
        ));
    }

    let (created_at, updated_at) = timestamps();
    let model = review::ActiveModel {
        user_id: Set(input.user_id),
        product_id: Set(input.product_id),
        rating: Set(input.rating),
        comment: Set(input.comment),
        created_at: Set(created_at),
        updated_at: Set(updated_at),
        ..Default::default()
    }
    .insert(registry.db())
    .await?;

    Ok(model)
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCartInput {
    pub user_id: Option<i32>,
}

pub async fn create_cart(
    registry: &Registry,
    input: CreateCartInput,
) -> Result<cart::Model, DomainError> {
    ensure_parents(registry, EntityKind::Cart, &[("user_id", input.user_id)]).await?;

    let (created_at, updated_at) = timestamps();
    let model = cart::ActiveModel {
        user_id: Set(input.user_id),
        created_at: Set(created_at),
        updated_at: Set(updated_at),
        ..Default::default()
    }
    .insert(registry.db())
    .await?;

    Ok(model)
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCartItemInput {
    pub cart_id: Option<i32>,
    pub product_id: Option<i32>,
    pub quantity: Option<i32>,
}

pub async fn create_cart_item(
    registry: &Registry,
    input: CreateCartItemInput,
) -> Result<cart_item::Model, DomainError> {
    ensure_parents(
        registry,
        EntityKind::CartItem,
        &[("cart_id", input.cart_id), ("product_id", input.product_id)],
    )
    .await?;
    let quantity = input.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(DomainError::Validation(
            "quantity must be at least 1".to_string(),
        ));
    }

    let (created_at, updated_at) = timestamps();
    let model = cart_item::ActiveModel {
        cart_id: Set(input.cart_id),
        product_id: Set(input.product_id),
        quantity: Set(quantity),
        created_at: Set(created_at),
        updated_at: Set(updated_at),
        ..Default::default()
    }
    .insert(registry.db())
    .await?;

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::domain::AssociationGraph;

    async fn setup() -> Registry {
        let db = db::init_db("sqlite::memory:").await.unwrap();
        Registry::build(db, AssociationGraph::standard().unwrap()).unwrap()
    }

    async fn seed_user(registry: &Registry, email: &str) -> i32 {
        create_user(
            registry,
            CreateUserInput {
                name: "Lucía".to_string(),
                email: email.to_string(),
                phone: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_mandatory_parents_rejected_when_absent() {
        let registry = setup().await;

        let business = create_business(
            &registry,
            CreateBusinessInput {
                user_id: None,
                name: "Panadería".to_string(),
                description: None,
                address: None,
            },
        )
        .await;
        assert!(matches!(business, Err(DomainError::Constraint(_))));

        let product = create_product(
            &registry,
            CreateProductInput {
                business_id: None,
                name: "Pan".to_string(),
                description: None,
                price: 1.5,
                stock: 10,
            },
        )
        .await;
        assert!(matches!(product, Err(DomainError::Constraint(_))));

        let order = create_order(
            &registry,
            CreateOrderInput {
                user_id: Some(404),
                status: None,
                total: 0.0,
            },
        )
        .await;
        assert!(matches!(order, Err(DomainError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_soft_deleted_parent_counts_as_absent() {
        let registry = setup().await;
        let user_id = seed_user(&registry, "owner@example.com").await;

        let business = create_business(
            &registry,
            CreateBusinessInput {
                user_id: Some(user_id),
                name: "Frutería".to_string(),
                description: None,
                address: Some("Calle Mayor 1".to_string()),
            },
        )
        .await
        .unwrap();

        registry
            .repository(EntityKind::Business)
            .soft_delete(business.id)
            .await
            .unwrap();

        let product = create_product(
            &registry,
            CreateProductInput {
                business_id: Some(business.id),
                name: "Manzanas".to_string(),
                description: None,
                price: 2.0,
                stock: 5,
            },
        )
        .await;
        assert!(matches!(product, Err(DomainError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_one_payment_per_order() {
        let registry = setup().await;
        let user_id = seed_user(&registry, "buyer@example.com").await;
        let order = create_order(
            &registry,
            CreateOrderInput {
                user_id: Some(user_id),
                status: None,
                total: 12.0,
            },
        )
        .await
        .unwrap();
        assert_eq!(order.status, "pending");

        let input = CreatePaymentInput {
            order_id: Some(order.id),
            amount: 12.0,
            method: "card".to_string(),
            status: None,
        };
        create_payment(&registry, input.clone()).await.unwrap();

        let second = create_payment(&registry, input).await;
        assert!(matches!(second, Err(DomainError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let registry = setup().await;

        let user = create_user(
            &registry,
            CreateUserInput {
                name: "Sin correo".to_string(),
                email: "no-at-sign".to_string(),
                phone: None,
            },
        )
        .await;
        assert!(matches!(user, Err(DomainError::Validation(_))));

        let review = create_review(
            &registry,
            CreateReviewInput {
                user_id: None,
                product_id: None,
                rating: 9,
                comment: None,
            },
        )
        .await;
        assert!(matches!(review, Err(DomainError::Validation(_))));

        let cart = create_cart(&registry, CreateCartInput { user_id: None })
            .await
            .unwrap();
        let item = create_cart_item(
            &registry,
            CreateCartItemInput {
                cart_id: Some(cart.id),
                product_id: None,
                quantity: Some(0),
            },
        )
        .await;
        assert!(matches!(item, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_order_status_must_be_known() {
        let registry = setup().await;
        let user_id = seed_user(&registry, "status@example.com").await;

        let unknown = create_order(
            &registry,
            CreateOrderInput {
                user_id: Some(user_id),
                status: Some("lost_in_space".to_string()),
                total: 1.0,
            },
        )
        .await;
        assert!(matches!(unknown, Err(DomainError::Validation(_))));

        let shipped = create_order(
            &registry,
            CreateOrderInput {
                user_id: Some(user_id),
                status: Some("shipped".to_string()),
                total: 1.0,
            },
        )
        .await
        .unwrap();
        assert_eq!(shipped.status, "shipped");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let registry = setup().await;
        seed_user(&registry, "dup@example.com").await;

        let again = create_user(
            &registry,
            CreateUserInput {
                name: "Otra".to_string(),
                email: "DUP@example.com".to_string(),
                phone: None,
            },
        )
        .await;
        assert!(matches!(again, Err(DomainError::Constraint(_))));
    }
}
