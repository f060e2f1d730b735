//! Association graph between entity kinds
//!
//! Each relationship is declared from both sides (belongs-to on the child,
//! has-many / has-one on the parent). The graph drives the parent checks run
//! before any insert and the soft-delete cascade.

use serde::Serialize;

use super::DomainError;
use crate::models::EntityKind;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    HasMany,
    HasOne,
    BelongsTo,
}

/// One side of a foreign-key backed relationship.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Association {
    /// Kind the relationship is declared on
    pub owner: EntityKind,
    pub target: EntityKind,
    /// Column holding the reference, always on the child side
    pub foreign_key: &'static str,
    pub cardinality: Cardinality,
    pub nullable: bool,
}

impl Association {
    /// Kind whose table stores the foreign key
    pub fn child(&self) -> EntityKind {
        match self.cardinality {
            Cardinality::BelongsTo => self.owner,
            Cardinality::HasMany | Cardinality::HasOne => self.target,
        }
    }

    /// Kind referenced by the foreign key
    pub fn parent(&self) -> EntityKind {
        match self.cardinality {
            Cardinality::BelongsTo => self.target,
            Cardinality::HasMany | Cardinality::HasOne => self.owner,
        }
    }

    fn is_belongs_to(&self) -> bool {
        self.cardinality == Cardinality::BelongsTo
    }

    fn same_column(&self, other: &Association) -> bool {
        self.is_belongs_to() == other.is_belongs_to()
            && self.child() == other.child()
            && self.foreign_key == other.foreign_key
    }
}

#[derive(Clone, Debug, Default)]
pub struct AssociationGraph {
    edges: Vec<Association>,
}

impl AssociationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one relationship side.
    ///
    /// Returns `Ok(true)` when the edge is new and `Ok(false)` when it was
    /// already declared. Re-declaring never duplicates an edge; a
    /// non-nullable redeclaration tightens the existing one. Reusing a
    /// foreign key for a different parent or cardinality is a conflict.
    pub fn declare(&mut self, association: Association) -> Result<bool, DomainError> {
        if let Some(existing) = self.edges.iter_mut().find(|e| e.same_column(&association)) {
            if existing.parent() != association.parent()
                || existing.cardinality != association.cardinality
            {
                return Err(DomainError::Internal(format!(
                    "conflicting association on {}.{}: {:?} -> {} vs {:?} -> {}",
                    association.child().table_name(),
                    association.foreign_key,
                    existing.cardinality,
                    existing.parent(),
                    association.cardinality,
                    association.parent(),
                )));
            }
            existing.nullable = existing.nullable && association.nullable;
            return Ok(false);
        }

        tracing::debug!(
            owner = %association.owner,
            target = %association.target,
            foreign_key = association.foreign_key,
            cardinality = ?association.cardinality,
            "declared association"
        );
        self.edges.push(association);
        Ok(true)
    }

    pub fn belongs_to(
        &mut self,
        owner: EntityKind,
        target: EntityKind,
        foreign_key: &'static str,
        nullable: bool,
    ) -> Result<bool, DomainError> {
        self.declare(Association {
            owner,
            target,
            foreign_key,
            cardinality: Cardinality::BelongsTo,
            nullable,
        })
    }

    pub fn has_many(
        &mut self,
        owner: EntityKind,
        target: EntityKind,
        foreign_key: &'static str,
    ) -> Result<bool, DomainError> {
        self.declare(Association {
            owner,
            target,
            foreign_key,
            cardinality: Cardinality::HasMany,
            nullable: true,
        })
    }

    pub fn has_one(
        &mut self,
        owner: EntityKind,
        target: EntityKind,
        foreign_key: &'static str,
    ) -> Result<bool, DomainError> {
        self.declare(Association {
            owner,
            target,
            foreign_key,
            cardinality: Cardinality::HasOne,
            nullable: true,
        })
    }

    /// The storefront schema: every relationship declared from both sides.
    pub fn standard() -> Result<Self, DomainError> {
        use EntityKind::*;

        let mut graph = Self::new();

        graph.belongs_to(Chat, User, "user_id", true)?;
        graph.has_many(User, Chat, "user_id")?;
        graph.belongs_to(Chat, Business, "business_id", true)?;
        graph.has_many(Business, Chat, "business_id")?;

        graph.belongs_to(Business, User, "user_id", false)?;
        graph.has_many(User, Business, "user_id")?;

        graph.has_many(Business, Product, "business_id")?;
        graph.belongs_to(Product, Business, "business_id", true)?;

        graph.belongs_to(Notification, User, "user_id", true)?;
        graph.has_many(User, Notification, "user_id")?;

        graph.belongs_to(Payment, Order, "order_id", true)?;
        graph.has_one(Order, Payment, "order_id")?;

        graph.belongs_to(Order, User, "user_id", false)?;
        graph.has_many(User, Order, "user_id")?;

        // Redeclared as mandatory: a product never exists without its business
        graph.belongs_to(Product, Business, "business_id", false)?;
        graph.has_many(Business, Product, "business_id")?;

        graph.belongs_to(Review, User, "user_id", true)?;
        graph.has_many(User, Review, "user_id")?;
        graph.belongs_to(Review, Product, "product_id", true)?;
        graph.has_many(Product, Review, "product_id")?;

        graph.belongs_to(Cart, User, "user_id", true)?;
        graph.has_many(User, Cart, "user_id")?;

        graph.belongs_to(CartItem, Cart, "cart_id", true)?;
        graph.has_many(Cart, CartItem, "cart_id")?;
        graph.belongs_to(CartItem, Product, "product_id", true)?;
        graph.has_many(Product, CartItem, "product_id")?;

        graph.validate()?;
        Ok(graph)
    }

    /// Every edge must have its inverse declared before the graph is used.
    pub fn validate(&self) -> Result<(), DomainError> {
        for edge in &self.edges {
            let inverse = self.edges.iter().any(|other| {
                other.is_belongs_to() != edge.is_belongs_to()
                    && other.child() == edge.child()
                    && other.parent() == edge.parent()
                    && other.foreign_key == edge.foreign_key
            });
            if !inverse {
                return Err(DomainError::Internal(format!(
                    "association {} -> {} via {} has no inverse",
                    edge.owner, edge.target, edge.foreign_key
                )));
            }
        }
        Ok(())
    }

    pub fn edges(&self) -> &[Association] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Belongs-to edges declared on `kind`
    pub fn parents_of(&self, kind: EntityKind) -> impl Iterator<Item = &Association> {
        self.edges
            .iter()
            .filter(move |e| e.is_belongs_to() && e.owner == kind)
    }

    /// Has-many / has-one edges declared on `kind`
    pub fn children_of(&self, kind: EntityKind) -> impl Iterator<Item = &Association> {
        self.edges
            .iter()
            .filter(move |e| !e.is_belongs_to() && e.owner == kind)
    }

    pub fn mandatory_parents(&self, kind: EntityKind) -> impl Iterator<Item = &Association> {
        self.parents_of(kind).filter(|e| !e.nullable)
    }
}
