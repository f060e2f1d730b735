pub mod business;
pub mod cart;
pub mod cart_item;
pub mod chat;
pub mod notification;
pub mod order;
pub mod payment;
pub mod product;
pub mod review;
pub mod user;

use sea_orm::EntityTrait;
use serde::Serialize;
use std::fmt;

/// Every persisted domain noun, in parent-before-child order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Business,
    Product,
    Order,
    Payment,
    Chat,
    Notification,
    Review,
    Cart,
    CartItem,
}

impl EntityKind {
    pub const ALL: [EntityKind; 10] = [
        EntityKind::User,
        EntityKind::Business,
        EntityKind::Product,
        EntityKind::Order,
        EntityKind::Payment,
        EntityKind::Chat,
        EntityKind::Notification,
        EntityKind::Review,
        EntityKind::Cart,
        EntityKind::CartItem,
    ];

    pub fn table_name(self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::Business => "businesses",
            EntityKind::Product => "products",
            EntityKind::Order => "orders",
            EntityKind::Payment => "payments",
            EntityKind::Chat => "chats",
            EntityKind::Notification => "notifications",
            EntityKind::Review => "reviews",
            EntityKind::Cart => "carts",
            EntityKind::CartItem => "cart_items",
        }
    }

    /// URL segment used by the router (`/api/<path>/:id`)
    pub fn path(self) -> &'static str {
        match self {
            EntityKind::CartItem => "cart-items",
            other => other.table_name(),
        }
    }

    /// JSON key used when a single row is returned
    pub fn singular(self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Business => "business",
            EntityKind::Product => "product",
            EntityKind::Order => "order",
            EntityKind::Payment => "payment",
            EntityKind::Chat => "chat",
            EntityKind::Notification => "notification",
            EntityKind::Review => "review",
            EntityKind::Cart => "cart",
            EntityKind::CartItem => "cart_item",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

/// Entities carrying the `deleted_at` soft-delete marker.
pub trait SoftDeletable: EntityTrait {
    const KIND: EntityKind;

    fn id_column() -> Self::Column;
    fn updated_at_column() -> Self::Column;
    fn deleted_at_column() -> Self::Column;
}

macro_rules! soft_deletable {
    ($($module:ident => $kind:ident),* $(,)?) => {
        $(
            impl SoftDeletable for $module::Entity {
                const KIND: EntityKind = EntityKind::$kind;

                fn id_column() -> Self::Column {
                    $module::Column::Id
                }

                fn updated_at_column() -> Self::Column {
                    $module::Column::UpdatedAt
                }

                fn deleted_at_column() -> Self::Column {
                    $module::Column::DeletedAt
                }
            }
        )*
    };
}

soft_deletable! {
    user => User,
    business => Business,
    product => Product,
    order => Order,
    payment => Payment,
    chat => Chat,
    notification => Notification,
    review => Review,
    cart => Cart,
    cart_item => CartItem,
}
