//! Registry of entity definitions
//!
//! Built once at startup from the persistence handle and the association
//! graph, immutable afterwards. Maps every `EntityKind` to its repository.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{AssociationGraph, DomainError, SoftDeleteRepository};
use crate::infrastructure::{CascadeTarget, SeaOrmSoftDeleteRepository};
use crate::models::{
    business, cart, cart_item, chat, notification, order, payment, product, review, user,
    EntityKind,
};

/// Child kinds whose rows follow a parent into soft deletion.
/// Join rows only: a cart item has no meaning once its cart or product is gone.
const CASCADING_CHILDREN: &[EntityKind] = &[EntityKind::CartItem];

pub struct Registry {
    db: DatabaseConnection,
    graph: AssociationGraph,
    repositories: [Arc<dyn SoftDeleteRepository>; 10],
}

impl Registry {
    /// Validate the graph and bind one repository per entity kind
    pub fn build(db: DatabaseConnection, graph: AssociationGraph) -> Result<Self, DomainError> {
        graph.validate()?;

        let repositories = EntityKind::ALL.map(|kind| {
            let cascades = cascades_for(&graph, kind);
            repository_for(kind, db.clone(), cascades)
        });

        tracing::info!(
            "Registry ready: {} entity kinds, {} associations",
            repositories.len(),
            graph.len()
        );

        Ok(Self {
            db,
            graph,
            repositories,
        })
    }

    pub fn repository(&self, kind: EntityKind) -> Arc<dyn SoftDeleteRepository> {
        self.repositories[kind as usize].clone()
    }

    pub fn graph(&self) -> &AssociationGraph {
        &self.graph
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn cascades_for(graph: &AssociationGraph, kind: EntityKind) -> Vec<CascadeTarget> {
    graph
        .children_of(kind)
        .filter(|edge| CASCADING_CHILDREN.contains(&edge.target))
        .map(|edge| CascadeTarget {
            kind: edge.target,
            foreign_key: edge.foreign_key,
        })
        .collect()
}

fn repository_for(
    kind: EntityKind,
    db: DatabaseConnection,
    cascades: Vec<CascadeTarget>,
) -> Arc<dyn SoftDeleteRepository> {
    match kind {
        EntityKind::User => Arc::new(SeaOrmSoftDeleteRepository::<user::Entity>::new(db, cascades)),
        EntityKind::Business => Arc::new(SeaOrmSoftDeleteRepository::<business::Entity>::new(
            db, cascades,
        )),
        EntityKind::Product => Arc::new(SeaOrmSoftDeleteRepository::<product::Entity>::new(
            db, cascades,
        )),
        EntityKind::Order => Arc::new(SeaOrmSoftDeleteRepository::<order::Entity>::new(db, cascades)),
        EntityKind::Payment => Arc::new(SeaOrmSoftDeleteRepository::<payment::Entity>::new(
            db, cascades,
        )),
        EntityKind::Chat => Arc::new(SeaOrmSoftDeleteRepository::<chat::Entity>::new(db, cascades)),
        EntityKind::Notification => Arc::new(
            SeaOrmSoftDeleteRepository::<notification::Entity>::new(db, cascades),
        ),
        EntityKind::Review => Arc::new(SeaOrmSoftDeleteRepository::<review::Entity>::new(
            db, cascades,
        )),
        EntityKind::Cart => Arc::new(SeaOrmSoftDeleteRepository::<cart::Entity>::new(db, cascades)),
        EntityKind::CartItem => Arc::new(SeaOrmSoftDeleteRepository::<cart_item::Entity>::new(
            db, cascades,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_cart_and_product_cascade() {
        let graph = AssociationGraph::standard().unwrap();

        for kind in EntityKind::ALL {
            let cascades = cascades_for(&graph, kind);
            match kind {
                EntityKind::Cart => assert_eq!(
                    cascades,
                    vec![CascadeTarget {
                        kind: EntityKind::CartItem,
                        foreign_key: "cart_id"
                    }]
                ),
                EntityKind::Product => assert_eq!(
                    cascades,
                    vec![CascadeTarget {
                        kind: EntityKind::CartItem,
                        foreign_key: "product_id"
                    }]
                ),
                _ => assert!(cascades.is_empty(), "{kind} should not cascade"),
            }
        }
    }

    #[tokio::test]
    async fn test_repository_per_kind() {
        let db = crate::db::init_db("sqlite::memory:").await.unwrap();
        let registry = Registry::build(db, AssociationGraph::standard().unwrap()).unwrap();

        for kind in EntityKind::ALL {
            assert_eq!(registry.repository(kind).kind(), kind);
        }
    }

    #[tokio::test]
    async fn test_build_rejects_one_sided_graph() {
        let db = crate::db::init_db("sqlite::memory:").await.unwrap();
        let mut graph = AssociationGraph::new();
        graph
            .belongs_to(EntityKind::Cart, EntityKind::User, "user_id", true)
            .unwrap();

        assert!(Registry::build(db, graph).is_err());
    }
}
