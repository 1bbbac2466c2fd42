use async_trait::async_trait;
use chrono::Utc;
use entity::employees;
use platform_db::{DbError, DbPool, DbResult};
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait, sea_query::Expr,
};
use tracing::warn;

use crate::model::{Employee, EmployeeFields};

/// Persistence gateway for employee rows. Each call runs in its own
/// transaction; absence on update/delete is reported as `false`, not an error.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn insert(&self, fields: &EmployeeFields) -> DbResult<i32>;
    async fn list_all(&self) -> DbResult<Vec<Employee>>;
    async fn update(&self, id: i32, fields: &EmployeeFields) -> DbResult<bool>;
    async fn delete(&self, id: i32) -> DbResult<bool>;
}

#[derive(Clone, Debug)]
pub struct SeaOrmEmployeeStore {
    pool: DbPool,
}

impl SeaOrmEmployeeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Commits on success. On failure the transaction is rolled back before the
/// original error is handed back.
async fn settle<T>(txn: DatabaseTransaction, outcome: Result<T, DbErr>) -> DbResult<T> {
    match outcome {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback) = txn.rollback().await {
                warn!(error = %rollback, "rollback failed");
            }
            Err(DbError::from(err))
        }
    }
}

#[async_trait]
impl EmployeeStore for SeaOrmEmployeeStore {
    async fn insert(&self, fields: &EmployeeFields) -> DbResult<i32> {
        let row = employees::ActiveModel {
            id: NotSet,
            name: Set(fields.name.clone()),
            role: Set(fields.role.clone()),
            email: Set(fields.email.clone()),
            created_at: Set(Utc::now().fixed_offset()),
        };
        let txn = self.pool.begin().await?;
        let outcome = employees::Entity::insert(row)
            .exec(&txn)
            .await
            .map(|res| res.last_insert_id);
        settle(txn, outcome).await
    }

    async fn list_all(&self) -> DbResult<Vec<Employee>> {
        let txn = self.pool.begin().await?;
        let outcome = employees::Entity::find()
            .order_by_asc(employees::Column::Id)
            .all(&txn)
            .await;
        settle(txn, outcome).await
    }

    async fn update(&self, id: i32, fields: &EmployeeFields) -> DbResult<bool> {
        let txn = self.pool.begin().await?;
        let outcome = employees::Entity::update_many()
            .col_expr(employees::Column::Name, Expr::value(fields.name.clone()))
            .col_expr(employees::Column::Role, Expr::value(fields.role.clone()))
            .col_expr(employees::Column::Email, Expr::value(fields.email.clone()))
            .filter(employees::Column::Id.eq(id))
            .exec(&txn)
            .await
            .map(|res| res.rows_affected > 0);
        settle(txn, outcome).await
    }

    async fn delete(&self, id: i32) -> DbResult<bool> {
        let txn = self.pool.begin().await?;
        let outcome = employees::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map(|res| res.rows_affected > 0);
        settle(txn, outcome).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_pool;

    fn fields(name: &str, email: &str) -> EmployeeFields {
        EmployeeFields {
            name: name.into(),
            role: "Engineer".into(),
            email: email.into(),
        }
    }

    #[tokio::test]
    async fn ids_increase_and_list_is_ordered() {
        let store = SeaOrmEmployeeStore::new(memory_pool().await);
        let first = store.insert(&fields("Ana", "ana@x.com")).await.unwrap();
        let second = store.insert(&fields("Ben", "ben@x.com")).await.unwrap();
        assert!(second > first);

        let rows = store.list_all().await.unwrap();
        let ids: Vec<i32> = rows.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![first, second]);
        assert_eq!(rows[0].email, "ana@x.com");
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation_and_leaves_one_row() {
        let store = SeaOrmEmployeeStore::new(memory_pool().await);
        store.insert(&fields("Ana", "ana@x.com")).await.unwrap();
        let err = store.insert(&fields("Other", "ana@x.com")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation(_)), "got {err:?}");
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_and_delete_report_absence() {
        let store = SeaOrmEmployeeStore::new(memory_pool().await);
        assert!(!store.update(99, &fields("Ana", "ana@x.com")).await.unwrap());
        assert!(!store.delete(99).await.unwrap());
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_keeps_id_and_created_at() {
        let store = SeaOrmEmployeeStore::new(memory_pool().await);
        let id = store.insert(&fields("Ana", "ana@x.com")).await.unwrap();
        let before = store.list_all().await.unwrap().remove(0);

        assert!(store.update(id, &fields("Ana Maria", "ana.m@x.com")).await.unwrap());

        let after = store.list_all().await.unwrap().remove(0);
        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.name, "Ana Maria");
        assert_eq!(after.email, "ana.m@x.com");
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let store = SeaOrmEmployeeStore::new(memory_pool().await);
        let first = store.insert(&fields("Ana", "ana@x.com")).await.unwrap();
        assert!(store.delete(first).await.unwrap());
        let second = store.insert(&fields("Ana", "ana@x.com")).await.unwrap();
        assert!(second > first);
    }
}
