//! Order model and DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use beatstore_core::cart::CartItem;
use beatstore_core::pricing::LicenseTier;
use beatstore_core::status::OrderStatus;
use beatstore_core::types::{Amount, DocId, Timestamp};

use crate::query::Direction;

/// A document from the `orders` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default)]
    pub id: DocId,
    pub order_number: String,
    pub customer_id: DocId,
    pub customer_email: String,
    pub customer_name: Option<String>,
    pub items: Vec<CartItem>,
    pub subtotal: Amount,
    pub total: Amount,
    pub status: OrderStatus,
    pub payment_method: Option<String>,
    /// Beat id to download URL.
    #[serde(default)]
    pub download_links: BTreeMap<DocId, String>,
    /// Beat id to license PDF URL.
    #[serde(default)]
    pub license_pdfs: BTreeMap<DocId, String>,
    pub admin_note: Option<String>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One requested line: which beat, which tier. Prices come from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub beat_id: DocId,
    pub license: LicenseTier,
}

/// DTO for placing an order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    pub items: Vec<OrderLine>,
    pub payment_method: Option<String>,
    pub customer_name: Option<String>,
}

/// Fully priced order ready to be stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub order_number: String,
    pub customer_id: DocId,
    pub customer_email: String,
    pub customer_name: Option<String>,
    pub items: Vec<CartItem>,
    pub subtotal: Amount,
    pub total: Amount,
    pub status: OrderStatus,
    pub payment_method: Option<String>,
}

/// DTO for an admin edit. Number, id and creation time are not editable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_note: Option<String>,
}

/// DTO for a status change.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatus {
    pub status: OrderStatus,
    pub admin_note: Option<String>,
}

/// Admin listing options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListParams {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<DocId>,
    /// One of `createdAt`, `total`, `orderNumber`, `status`. Defaults to `createdAt`.
    pub order_by: Option<String>,
    pub direction: Option<Direction>,
    pub limit: Option<usize>,
}

pub const ORDER_SORT_FIELDS: &[&str] = &["createdAt", "total", "orderNumber", "status"];

/// A purchased beat the customer can download.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadEntry {
    pub order_id: DocId,
    pub order_number: String,
    pub beat_id: DocId,
    pub title: String,
    pub license: LicenseTier,
    pub download_url: String,
    pub license_pdf: Option<String>,
    pub purchased_at: Timestamp,
}

impl Order {
    /// Downloadable lines of this order, in item order.
    pub fn downloads(&self) -> Vec<DownloadEntry> {
        self.items
            .iter()
            .filter_map(|item| {
                let url = self.download_links.get(&item.beat_id)?;
                Some(DownloadEntry {
                    order_id: self.id.clone(),
                    order_number: self.order_number.clone(),
                    beat_id: item.beat_id.clone(),
                    title: item.title.clone(),
                    license: item.license,
                    download_url: url.clone(),
                    license_pdf: self.license_pdfs.get(&item.beat_id).cloned(),
                    purchased_at: self.completed_at.unwrap_or(self.created_at),
                })
            })
            .collect()
    }
}
