//! Wire types shared between the HTTP server and its clients.
//!
//! Field names are camelCase on the wire; timestamps are RFC3339 UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fulfillment stage of a purchase record.
///
/// Records start `pending` and only move forward:
/// `pending -> shipped -> delivered`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingStatus {
    Pending,
    Shipped,
    Delivered,
}

pub mod class {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ClassNew {
        pub name: String,
        pub description: Option<String>,
    }

    /// Partial update; absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ClassUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ClassView {
        pub id: String,
        pub name: String,
        pub description: Option<String>,
        pub student_count: i64,
        pub created_at: DateTime<Utc>,
    }
}

pub mod student {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StudentNew {
        pub name: String,
        pub student_number: String,
        #[serde(default)]
        pub points: i64,
        pub class_id: String,
    }

    /// Partial update; absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StudentUpdate {
        pub name: Option<String>,
        pub student_number: Option<String>,
        pub points: Option<i64>,
        pub class_id: Option<String>,
    }

    /// Signed point delta: positive awards, negative deducts.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PointsAdjust {
        pub delta: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StudentView {
        pub id: String,
        pub name: String,
        pub student_number: String,
        pub points: i64,
        pub class_id: String,
        pub class_name: String,
        pub created_at: DateTime<Utc>,
    }
}

pub mod product {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductNew {
        pub name: String,
        pub points: i64,
        pub stock: i64,
        pub class_id: String,
    }

    /// Partial update; absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductUpdate {
        pub name: Option<String>,
        pub points: Option<i64>,
        pub stock: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductView {
        pub id: String,
        pub name: String,
        pub points: i64,
        pub stock: i64,
        pub class_id: String,
        pub created_at: DateTime<Utc>,
    }
}

pub mod purchase {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PurchaseNew {
        pub student_id: String,
        pub product_id: String,
        pub quantity: i64,
        /// Optional client-chosen retry key; replaying it returns the
        /// already-created record instead of charging twice.
        pub idempotency_key: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ShippingUpdate {
        pub shipping_status: ShippingStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PurchaseRecordView {
        pub id: String,
        pub product_id: String,
        /// Product name as of purchase time.
        pub product_name: String,
        /// Unit price as of purchase time.
        pub points: i64,
        pub student_id: String,
        /// Student name as of purchase time.
        pub student_name: String,
        pub quantity: i64,
        pub class_id: String,
        pub created_at: DateTime<Utc>,
        pub shipping_status: ShippingStatus,
    }

    /// Query string for the paginated history endpoint.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RecordsPageQuery {
        pub page: Option<u64>,
        pub page_size: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PaginatedRecordsResponse {
        pub records: Vec<PurchaseRecordView>,
        pub total: u64,
        pub total_pages: u64,
        pub current_page: u64,
        pub page_size: u64,
    }
}
