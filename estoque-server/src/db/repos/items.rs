//! Item repository
//!
//! Handles item CRUD with proper patterns:
//! - create/update: rely on UNIQUE(nome_norm), map ER_DUP_ENTRY to `DuplicateName`
//! - delete: one statement for the whole id list, hard or soft
//! - list: page and metadata are separate queries so callers can run them concurrently

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};

use crate::models::{IdList, Item, ItemId, ItemPatch, NewItem, Pagination, TableMeta};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Another row already has the same normalized name
    #[error("duplicate item name")]
    DuplicateName,
}

impl DbError {
    /// Classify a failed write, pulling out unique-key violations.
    pub fn from_write(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::DuplicateName,
            _ => Self::Sqlx(err),
        }
    }
}

/// Storage operations behind the `/itens` resource (testable)
///
/// Counts returned by the write operations are affected rows; zero means
/// no row matched.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// One page of items ordered by name, optionally filtered by a
    /// normalized search term.
    async fn list(&self, search: Option<&str>, page: Pagination) -> Result<Vec<Item>, DbError>;

    /// Row count and latest modification over the whole table.
    async fn meta(&self) -> Result<TableMeta, DbError>;

    async fn create(&self, item: &NewItem) -> Result<ItemId, DbError>;

    async fn update(&self, patch: &ItemPatch) -> Result<u64, DbError>;

    /// Mark currently active rows inactive.
    async fn soft_delete(&self, ids: &IdList) -> Result<u64, DbError>;

    async fn hard_delete(&self, ids: &IdList) -> Result<u64, DbError>;

    /// Round-trip to the backing store.
    async fn ping(&self) -> Result<(), DbError>;
}

/// Item row as stored
#[derive(Debug, Clone, FromRow)]
struct ItemRow {
    id_item: u32,
    nome_item: String,
    ativo: i8,
    criado_em: DateTime<Utc>,
    atualizado_em: DateTime<Utc>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            id_item: ItemId::new(u64::from(row.id_item)),
            nome_item: row.nome_item,
            ativo: row.ativo != 0,
            criado_em: row.criado_em,
            atualizado_em: row.atualizado_em,
        }
    }
}

/// MySQL-backed item repository
#[derive(Clone)]
pub struct ItemRepo {
    pool: MySqlPool,
}

impl ItemRepo {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// `%term%` with LIKE wildcards in the term escaped.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Append `(?, ?, ...)` bound to the ids.
fn push_id_list(qb: &mut QueryBuilder<'_, MySql>, ids: &IdList) {
    qb.push("(");
    let mut list = qb.separated(", ");
    for id in ids.as_slice() {
        list.push_bind(*id);
    }
    qb.push(")");
}

/// `UPDATE` touching only the fields present in the patch, always bumping
/// `atualizado_em`.
fn update_query(patch: &ItemPatch) -> QueryBuilder<'_, MySql> {
    let mut qb = QueryBuilder::<MySql>::new("UPDATE itens SET ");

    let mut sets = qb.separated(", ");
    if let Some(name) = &patch.nome_item {
        sets.push("nome_item = ").push_bind_unseparated(name.as_str());
    }
    if let Some(ativo) = patch.ativo {
        sets.push("ativo = ").push_bind_unseparated(ativo);
    }
    sets.push("atualizado_em = CURRENT_TIMESTAMP(3)");

    qb.push(" WHERE id_item = ").push_bind(patch.id_item.get());
    qb
}

#[async_trait]
impl ItemStore for ItemRepo {
    async fn list(&self, search: Option<&str>, page: Pagination) -> Result<Vec<Item>, DbError> {
        let mut qb = QueryBuilder::<MySql>::new(
            "SELECT id_item, nome_item, ativo, criado_em, atualizado_em FROM itens",
        );

        // utf8mb4_0900_ai_ci: LIKE is already case- and accent-insensitive
        if let Some(term) = search {
            qb.push(" WHERE nome_item LIKE ").push_bind(like_pattern(term));
        }

        qb.push(" ORDER BY nome_item ASC, id_item ASC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows: Vec<ItemRow> = qb.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn meta(&self) -> Result<TableMeta, DbError> {
        let (total, last_updated): (i64, Option<DateTime<Utc>>) = sqlx::query_as(
            "SELECT COUNT(*) AS total, MAX(atualizado_em) AS last_updated FROM itens",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(TableMeta {
            total,
            last_updated,
        })
    }

    async fn create(&self, item: &NewItem) -> Result<ItemId, DbError> {
        let result = sqlx::query("INSERT INTO itens (nome_item, ativo) VALUES (?, ?)")
            .bind(item.nome_item.as_str())
            .bind(item.ativo)
            .execute(&self.pool)
            .await
            .map_err(DbError::from_write)?;

        let id = ItemId::new(result.last_insert_id());
        tracing::debug!(id_item = id.get(), "item created");
        Ok(id)
    }

    async fn update(&self, patch: &ItemPatch) -> Result<u64, DbError> {
        let result = update_query(patch)
            .build()
            .execute(&self.pool)
            .await
            .map_err(DbError::from_write)?;

        Ok(result.rows_affected())
    }

    async fn soft_delete(&self, ids: &IdList) -> Result<u64, DbError> {
        let mut qb = QueryBuilder::<MySql>::new(
            "UPDATE itens SET ativo = 0, atualizado_em = CURRENT_TIMESTAMP(3) \
             WHERE ativo = 1 AND id_item IN ",
        );
        push_id_list(&mut qb, ids);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn hard_delete(&self, ids: &IdList) -> Result<u64, DbError> {
        let mut qb = QueryBuilder::<MySql>::new("DELETE FROM itens WHERE id_item IN ");
        push_id_list(&mut qb, ids);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("café"), "%café%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\tmp"), "%c:\\\\tmp%");
    }

    #[test]
    fn id_list_placeholders() {
        let ids = IdList::parse("7,8,9").unwrap();
        let mut qb = QueryBuilder::<MySql>::new("DELETE FROM itens WHERE id_item IN ");
        push_id_list(&mut qb, &ids);
        assert_eq!(qb.sql(), "DELETE FROM itens WHERE id_item IN (?, ?, ?)");
    }

    #[test]
    fn update_sets_only_present_fields() {
        use crate::models::ItemName;

        let patch = ItemPatch {
            id_item: ItemId::new(5),
            nome_item: Some(ItemName::new("Sal").unwrap()),
            ativo: None,
        };
        assert_eq!(
            update_query(&patch).sql(),
            "UPDATE itens SET nome_item = ?, atualizado_em = CURRENT_TIMESTAMP(3) WHERE id_item = ?"
        );

        let patch = ItemPatch {
            id_item: ItemId::new(5),
            nome_item: None,
            ativo: Some(true),
        };
        assert_eq!(
            update_query(&patch).sql(),
            "UPDATE itens SET ativo = ?, atualizado_em = CURRENT_TIMESTAMP(3) WHERE id_item = ?"
        );
    }
}
