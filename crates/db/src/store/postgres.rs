use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tokio::sync::broadcast;

use beatstore_core::types::{new_doc_id, DocId};

use super::{
    notify, split_patch, stamp_new, ChangeKind, CollectionChange, DocumentStore, MonotonicClock,
    CHANGE_FEED_CAPACITY,
};
use crate::document::{Document, Fields, ID_FIELD};
use crate::error::StoreError;
use crate::query::{Condition, Direction, Query};

/// Row shape shared by every statement below.
#[derive(Debug, FromRow)]
struct DocumentRow {
    id: String,
    data: Json<Fields>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document::new(row.id, row.data.0)
    }
}

/// PostgreSQL-backed store. All collections share the `documents` table.
///
/// The change feed is in-process: it announces writes made through this
/// instance only.
pub struct PgDocumentStore {
    pool: PgPool,
    clock: MonotonicClock,
    changes: broadcast::Sender<CollectionChange>,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            pool,
            clock: MonotonicClock::new(),
            changes,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn push_condition(qb: &mut QueryBuilder<'_, Postgres>, condition: &Condition) {
    if condition.field == ID_FIELD {
        qb.push("id = ");
        qb.push_bind(condition.value.as_str().unwrap_or_default().to_string());
    } else {
        qb.push("data -> ");
        qb.push_bind(condition.field.clone());
        qb.push(" = ");
        qb.push_bind(Json(condition.value.clone()));
    }
}

/// Sort key of `field`. JSON `null` counts as missing.
fn push_sort_key(qb: &mut QueryBuilder<'_, Postgres>, field: &str) {
    qb.push("NULLIF(data -> ");
    qb.push_bind(field.to_string());
    qb.push(", 'null'::jsonb)");
}

/// Keyset predicate selecting rows that sort strictly after `cursor`.
fn push_after_cursor(qb: &mut QueryBuilder<'_, Postgres>, query: &Query, cursor: &Document) {
    let Some(order) = &query.order_by else {
        qb.push("id COLLATE \"C\" > ");
        qb.push_bind(cursor.id.clone());
        return;
    };
    match cursor.field(&order.field) {
        Some(value) => {
            let beyond = match order.direction {
                Direction::Asc => " > ",
                Direction::Desc => " < ",
            };
            qb.push("(");
            push_sort_key(qb, &order.field);
            qb.push(beyond);
            qb.push_bind(Json(value.clone()));
            qb.push(" OR (");
            push_sort_key(qb, &order.field);
            qb.push(" = ");
            qb.push_bind(Json(value.clone()));
            qb.push(" AND id COLLATE \"C\" > ");
            qb.push_bind(cursor.id.clone());
            qb.push(") OR ");
            push_sort_key(qb, &order.field);
            qb.push(" IS NULL)");
        }
        None => {
            qb.push("(");
            push_sort_key(qb, &order.field);
            qb.push(" IS NULL AND id COLLATE \"C\" > ");
            qb.push_bind(cursor.id.clone());
            qb.push(")");
        }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, collection: &str, data: Fields) -> Result<Document, StoreError> {
        let id: DocId = new_doc_id();
        let data = stamp_new(data, &self.clock.now());
        let row = sqlx::query_as::<_, DocumentRow>(
            "INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3) \
             RETURNING id, data",
        )
        .bind(collection)
        .bind(&id)
        .bind(Json(&data))
        .fetch_one(&self.pool)
        .await?;
        notify(&self.changes, collection, &id, ChangeKind::Created);
        Ok(row.into())
    }

    async fn set(&self, collection: &str, id: &str, data: Fields) -> Result<Document, StoreError> {
        let data = stamp_new(data, &self.clock.now());
        let (row, inserted) = sqlx::query_as::<_, (String, Json<Fields>, bool)>(
            "INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3) \
             ON CONFLICT (collection, id) DO UPDATE SET \
                data = EXCLUDED.data || jsonb_build_object('createdAt', \
                    COALESCE(documents.data -> 'createdAt', EXCLUDED.data -> 'createdAt')), \
                updated_at = NOW() \
             RETURNING id, data, (xmax = 0) AS inserted",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(&data))
        .fetch_one(&self.pool)
        .await
        .map(|(id, data, inserted)| (DocumentRow { id, data }, inserted))?;
        let kind = if inserted {
            ChangeKind::Created
        } else {
            ChangeKind::Updated
        };
        notify(&self.changes, collection, id, kind);
        Ok(row.into())
    }

    async fn create(
        &self,
        collection: &str,
        id: &str,
        data: Fields,
    ) -> Result<Option<Document>, StoreError> {
        let data = stamp_new(data, &self.clock.now());
        let row = sqlx::query_as::<_, DocumentRow>(
            "INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3) \
             ON CONFLICT (collection, id) DO NOTHING \
             RETURNING id, data",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(&data))
        .fetch_optional(&self.pool)
        .await?;
        if row.is_some() {
            notify(&self.changes, collection, id, ChangeKind::Created);
        }
        Ok(row.map(Document::from))
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, data FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Document::from))
    }

    async fn merge_object(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        entries: Fields,
    ) -> Result<Option<Document>, StoreError> {
        let now = self.clock.now();
        let row = sqlx::query_as::<_, DocumentRow>(
            "UPDATE documents SET \
                data = jsonb_set(data, ARRAY[$3::text], \
                    COALESCE(NULLIF(data -> $3, 'null'::jsonb), '{}'::jsonb) || $4) \
                    || jsonb_build_object('updatedAt', $5::text), \
                updated_at = NOW() \
             WHERE collection = $1 AND id = $2 \
             RETURNING id, data",
        )
        .bind(collection)
        .bind(id)
        .bind(field)
        .bind(Json(&entries))
        .bind(&now)
        .fetch_optional(&self.pool)
        .await?;
        if row.is_some() {
            notify(&self.changes, collection, id, ChangeKind::Updated);
        }
        Ok(row.map(Document::from))
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Fields,
    ) -> Result<Option<Document>, StoreError> {
        let (writes, removed) = split_patch(patch, &self.clock.now());
        let row = sqlx::query_as::<_, DocumentRow>(
            "UPDATE documents SET data = (data || $3) - $4::text[], updated_at = NOW() \
             WHERE collection = $1 AND id = $2 \
             RETURNING id, data",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(&writes))
        .bind(removed)
        .fetch_optional(&self.pool)
        .await?;
        if row.is_some() {
            notify(&self.changes, collection, id, ChangeKind::Updated);
        }
        Ok(row.map(Document::from))
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE documents SET \
                data = jsonb_set(data, ARRAY[$3::text], \
                    to_jsonb(COALESCE((data ->> $3)::numeric, 0) + $4)), \
                updated_at = NOW() \
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(field)
        .bind(delta)
        .execute(&self.pool)
        .await?;
        let changed = result.rows_affected() > 0;
        if changed {
            notify(&self.changes, collection, id, ChangeKind::Updated);
        }
        Ok(changed)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            notify(&self.changes, collection, id, ChangeKind::Deleted);
        }
        Ok(deleted)
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let cursor = match &query.start_after {
            Some(id) => Some(self.get(collection, id).await?.ok_or_else(|| {
                StoreError::InvalidQuery(format!("unknown cursor '{id}'"))
            })?),
            None => None,
        };

        let mut qb = QueryBuilder::<Postgres>::new("SELECT id, data FROM documents WHERE collection = ");
        qb.push_bind(collection.to_string());

        for condition in &query.conditions {
            qb.push(" AND ");
            push_condition(&mut qb, condition);
        }

        if !query.any_of.is_empty() {
            qb.push(" AND (");
            for (i, condition) in query.any_of.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                push_condition(&mut qb, condition);
            }
            qb.push(")");
        }

        if let Some(cursor) = &cursor {
            qb.push(" AND ");
            push_after_cursor(&mut qb, query, cursor);
        }

        match &query.order_by {
            Some(order) => {
                qb.push(" ORDER BY ");
                push_sort_key(&mut qb, &order.field);
                qb.push(" ");
                qb.push(order.direction.as_sql());
                qb.push(" NULLS LAST, id COLLATE \"C\" ASC");
            }
            None => {
                qb.push(" ORDER BY id COLLATE \"C\" ASC");
            }
        }

        if let Some(limit) = query.limit {
            qb.push(" LIMIT ");
            qb.push_bind(limit as i64);
        }

        let rows: Vec<DocumentRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Document::from).collect())
    }

    fn changes(&self) -> broadcast::Receiver<CollectionChange> {
        self.changes.subscribe()
    }
}
