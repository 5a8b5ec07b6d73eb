//! Repository for the `orders` collection.

use std::collections::BTreeMap;

use serde_json::Value;

use beatstore_core::status::OrderStatus;
use beatstore_core::types::DocId;

use crate::collections::{ORDERS, ORDER_NUMBERS};
use crate::document::{decode_all, encode, Fields};
use crate::error::StoreError;
use crate::models::order::{NewOrder, Order, OrderListParams, UpdateOrder, ORDER_SORT_FIELDS};
use crate::query::{Direction, Query};
use crate::store::DocumentStore;

/// Provides CRUD operations for orders.
pub struct OrderRepo;

impl OrderRepo {
    pub async fn create(store: &dyn DocumentStore, input: &NewOrder) -> Result<Order, StoreError> {
        store.insert(ORDERS, encode(input)?).await?.decode()
    }

    pub async fn find_by_id(store: &dyn DocumentStore, id: &str) -> Result<Option<Order>, StoreError> {
        store.get(ORDERS, id).await?.map(|d| d.decode()).transpose()
    }

    pub async fn find_by_number(
        store: &dyn DocumentStore,
        order_number: &str,
    ) -> Result<Option<Order>, StoreError> {
        let query = Query::new().where_eq("orderNumber", order_number).limit(1);
        store
            .query(ORDERS, &query)
            .await?
            .first()
            .map(|d| d.decode())
            .transpose()
    }

    pub async fn number_exists(store: &dyn DocumentStore, order_number: &str) -> Result<bool, StoreError> {
        let query = Query::new().where_eq("orderNumber", order_number).limit(1);
        Ok(!store.query(ORDERS, &query).await?.is_empty())
    }

    /// Claim `order_number` for a new order. Returns `false` when another
    /// writer already holds it or an existing order carries it.
    pub async fn reserve_number(store: &dyn DocumentStore, order_number: &str) -> Result<bool, StoreError> {
        if store.create(ORDER_NUMBERS, order_number, Fields::new()).await?.is_none() {
            return Ok(false);
        }
        Ok(!Self::number_exists(store, order_number).await?)
    }

    /// Query for an admin listing. Unknown sort fields fall back to `createdAt`.
    pub fn list_query(params: &OrderListParams) -> Query {
        let field = params
            .order_by
            .as_deref()
            .filter(|f| ORDER_SORT_FIELDS.contains(f))
            .unwrap_or("createdAt");
        let mut query = Query::new()
            .where_eq_opt("status", params.status.map(|s| s.as_str()))
            .where_eq_opt("customerId", params.customer_id.as_deref())
            .order_by(field, params.direction.unwrap_or(Direction::Desc));
        query.limit = params.limit;
        query
    }

    pub async fn list(
        store: &dyn DocumentStore,
        params: &OrderListParams,
    ) -> Result<Vec<Order>, StoreError> {
        decode_all(&store.query(ORDERS, &Self::list_query(params)).await?)
    }

    /// A customer's orders, newest first.
    pub async fn list_by_customer(
        store: &dyn DocumentStore,
        customer_id: &str,
    ) -> Result<Vec<Order>, StoreError> {
        let params = OrderListParams {
            customer_id: Some(customer_id.to_string()),
            ..Default::default()
        };
        Self::list(store, &params).await
    }

    /// A customer's completed orders, newest first.
    pub async fn completed_by_customer(
        store: &dyn DocumentStore,
        customer_id: &str,
    ) -> Result<Vec<Order>, StoreError> {
        let params = OrderListParams {
            customer_id: Some(customer_id.to_string()),
            status: Some(OrderStatus::Completed),
            ..Default::default()
        };
        Self::list(store, &params).await
    }

    pub async fn recent(store: &dyn DocumentStore, limit: usize) -> Result<Vec<Order>, StoreError> {
        let params = OrderListParams {
            limit: Some(limit),
            ..Default::default()
        };
        Self::list(store, &params).await
    }

    /// Set the status. `completed_at` is written when given.
    pub async fn update_status(
        store: &dyn DocumentStore,
        id: &str,
        status: OrderStatus,
        admin_note: Option<&str>,
        completed_at: Option<&str>,
    ) -> Result<Option<Order>, StoreError> {
        let mut patch = Fields::new();
        patch.insert("status".into(), Value::String(status.as_str().to_string()));
        if let Some(note) = admin_note {
            patch.insert("adminNote".into(), Value::String(note.to_string()));
        }
        if let Some(at) = completed_at {
            patch.insert("completedAt".into(), Value::String(at.to_string()));
        }
        store
            .update(ORDERS, id, patch)
            .await?
            .map(|d| d.decode())
            .transpose()
    }

    pub async fn update(
        store: &dyn DocumentStore,
        id: &str,
        input: &UpdateOrder,
    ) -> Result<Option<Order>, StoreError> {
        store
            .update(ORDERS, id, encode(input)?)
            .await?
            .map(|d| d.decode())
            .transpose()
    }

    /// Merge beat-keyed URLs into `downloadLinks`.
    pub async fn add_download_links(
        store: &dyn DocumentStore,
        id: &str,
        links: &BTreeMap<DocId, String>,
    ) -> Result<Option<Order>, StoreError> {
        Self::merge_links(store, id, "downloadLinks", links).await
    }

    /// Merge beat-keyed URLs into `licensePdfs`.
    pub async fn add_license_pdfs(
        store: &dyn DocumentStore,
        id: &str,
        pdfs: &BTreeMap<DocId, String>,
    ) -> Result<Option<Order>, StoreError> {
        Self::merge_links(store, id, "licensePdfs", pdfs).await
    }

    async fn merge_links(
        store: &dyn DocumentStore,
        id: &str,
        field: &str,
        additions: &BTreeMap<DocId, String>,
    ) -> Result<Option<Order>, StoreError> {
        let entries: Fields = additions
            .iter()
            .map(|(beat_id, url)| (beat_id.clone(), Value::String(url.clone())))
            .collect();
        store
            .merge_object(ORDERS, id, field, entries)
            .await?
            .map(|d| d.decode())
            .transpose()
    }

    /// Every order, for aggregate statistics.
    pub async fn list_all(store: &dyn DocumentStore) -> Result<Vec<Order>, StoreError> {
        decode_all(&store.query(ORDERS, &Query::new()).await?)
    }
}
