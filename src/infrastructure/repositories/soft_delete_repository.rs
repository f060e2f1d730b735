//! SeaORM implementation of SoftDeleteRepository, generic over the entity

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Statement, TransactionTrait,
};
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;

use crate::domain::{DomainError, SoftDeleteRepository};
use crate::models::{EntityKind, SoftDeletable};

/// Child rows soft-deleted together with their parent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CascadeTarget {
    pub kind: EntityKind,
    pub foreign_key: &'static str,
}

/// SeaORM-based implementation of SoftDeleteRepository
pub struct SeaOrmSoftDeleteRepository<E> {
    db: DatabaseConnection,
    cascades: Vec<CascadeTarget>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> SeaOrmSoftDeleteRepository<E> {
    pub fn new(db: DatabaseConnection, cascades: Vec<CascadeTarget>) -> Self {
        Self {
            db,
            cascades,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E> SoftDeleteRepository for SeaOrmSoftDeleteRepository<E>
where
    E: SoftDeletable + Send + Sync,
    E::Model: Serialize + Send + Sync,
{
    fn kind(&self) -> EntityKind {
        E::KIND
    }

    async fn find(&self, id: i32, include_deleted: bool) -> Result<Option<Value>, DomainError> {
        let mut query = E::find().filter(E::id_column().eq(id));
        if !include_deleted {
            query = query.filter(E::deleted_at_column().is_null());
        }

        let model = query.one(&self.db).await?;

        model
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| DomainError::Internal(e.to_string()))
    }

    async fn is_live(&self, id: i32) -> Result<bool, DomainError> {
        let count = E::find()
            .filter(E::id_column().eq(id))
            .filter(E::deleted_at_column().is_null())
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn soft_delete(&self, id: i32) -> Result<u64, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.db.begin().await?;

        let result = E::update_many()
            .col_expr(E::deleted_at_column(), Expr::value(Some(now.clone())))
            .col_expr(E::updated_at_column(), Expr::value(now.clone()))
            .filter(E::id_column().eq(id))
            .filter(E::deleted_at_column().is_null())
            .exec(&txn)
            .await?;

        if result.rows_affected > 0 {
            for target in &self.cascades {
                let sql = format!(
                    "UPDATE {} SET deleted_at = ?, updated_at = ? WHERE {} = ? AND deleted_at IS NULL",
                    target.kind.table_name(),
                    target.foreign_key
                );
                let cascaded = txn
                    .execute(Statement::from_sql_and_values(
                        txn.get_database_backend(),
                        sql,
                        [now.clone().into(), now.clone().into(), id.into()],
                    ))
                    .await?;

                tracing::debug!(
                    "Soft delete of {} {} cascaded to {} {} row(s)",
                    E::KIND,
                    id,
                    cascaded.rows_affected(),
                    target.kind
                );
            }
        }

        txn.commit().await?;
        Ok(result.rows_affected)
    }

    async fn restore(&self, id: i32) -> Result<u64, DomainError> {
        let result = E::update_many()
            .col_expr(E::deleted_at_column(), Expr::value(Option::<String>::None))
            .col_expr(
                E::updated_at_column(),
                Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(E::id_column().eq(id))
            .filter(E::deleted_at_column().is_not_null())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::user;
    use sea_orm::{ActiveModelTrait, Set};

    async fn setup() -> (DatabaseConnection, i32) {
        let db = db::init_db("sqlite::memory:").await.unwrap();
        let now = chrono::Utc::now().to_rfc3339();
        let user = user::ActiveModel {
            name: Set("Ana".to_string()),
            email: Set("ana@example.com".to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
        (db, user.id)
    }

    #[tokio::test]
    async fn test_restore_clears_marker_once() {
        let (db, id) = setup().await;
        let repo = SeaOrmSoftDeleteRepository::<user::Entity>::new(db, vec![]);

        assert_eq!(repo.kind(), EntityKind::User);
        assert_eq!(repo.restore(id).await.unwrap(), 0);

        assert_eq!(repo.soft_delete(id).await.unwrap(), 1);
        assert_eq!(repo.soft_delete(id).await.unwrap(), 0);
        assert!(!repo.is_live(id).await.unwrap());
        assert!(repo.find(id, false).await.unwrap().is_none());

        let hidden = repo.find(id, true).await.unwrap().unwrap();
        assert!(hidden["deleted_at"].is_string());

        assert_eq!(repo.restore(id).await.unwrap(), 1);
        assert_eq!(repo.restore(id).await.unwrap(), 0);

        let row = repo.find(id, false).await.unwrap().unwrap();
        assert!(row["deleted_at"].is_null());
        assert_eq!(row["email"], "ana@example.com");
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_live() {
        let (db, _) = setup().await;
        let repo = SeaOrmSoftDeleteRepository::<user::Entity>::new(db, vec![]);

        assert!(!repo.is_live(999).await.unwrap());
        assert_eq!(repo.soft_delete(999).await.unwrap(), 0);
        assert_eq!(repo.restore(999).await.unwrap(), 0);
    }
}
