//! Purchase record primitives.
//!
//! A `PurchaseRecord` is the immutable trace of one redemption: the
//! student, the product, the quantity and the name/price snapshots
//! taken at the instant the exchange committed. Later edits to the
//! student or the product never touch a record; the only mutable field
//! is the shipping status, which advances through a strict
//! `pending → shipped → delivered` sequence.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

/// Fulfillment stage of a purchase record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingStatus {
    Pending,
    Shipped,
    Delivered,
}

impl ShippingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
        }
    }

    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// Only the two forward steps are legal; `delivered` is terminal.
    pub fn can_transition_to(self, next: ShippingStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Shipped) | (Self::Shipped, Self::Delivered)
        )
    }
}

impl TryFrom<&str> for ShippingStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            other => Err(EngineError::Validation(format!(
                "invalid shipping status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
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
    pub idempotency_key: Option<String>,
}

impl PurchaseRecord {
    pub fn new(
        student: &crate::Student,
        product: &crate::Product,
        quantity: i64,
        idempotency_key: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            points: product.points,
            student_id: student.id.clone(),
            student_name: student.name.clone(),
            quantity,
            class_id: product.class_id.clone(),
            created_at: Utc::now(),
            shipping_status: ShippingStatus::Pending,
            idempotency_key,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "purchase_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub points: i64,
    pub student_id: String,
    pub student_name: String,
    pub quantity: i64,
    pub class_id: String,
    pub created_at: DateTimeUtc,
    pub shipping_status: String,
    pub idempotency_key: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Classes,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&PurchaseRecord> for ActiveModel {
    fn from(value: &PurchaseRecord) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            product_id: ActiveValue::Set(value.product_id.clone()),
            product_name: ActiveValue::Set(value.product_name.clone()),
            points: ActiveValue::Set(value.points),
            student_id: ActiveValue::Set(value.student_id.clone()),
            student_name: ActiveValue::Set(value.student_name.clone()),
            quantity: ActiveValue::Set(value.quantity),
            class_id: ActiveValue::Set(value.class_id.clone()),
            created_at: ActiveValue::Set(value.created_at),
            shipping_status: ActiveValue::Set(value.shipping_status.as_str().to_string()),
            idempotency_key: ActiveValue::Set(value.idempotency_key.clone()),
        }
    }
}

impl TryFrom<Model> for PurchaseRecord {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            product_id: model.product_id,
            product_name: model.product_name,
            points: model.points,
            student_id: model.student_id,
            student_name: model.student_name,
            quantity: model.quantity,
            class_id: model.class_id,
            created_at: model.created_at,
            shipping_status: ShippingStatus::try_from(model.shipping_status.as_str())?,
            idempotency_key: model.idempotency_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_steps_are_legal() {
        assert!(ShippingStatus::Pending.can_transition_to(ShippingStatus::Shipped));
        assert!(ShippingStatus::Shipped.can_transition_to(ShippingStatus::Delivered));
    }

    #[test]
    fn skipping_and_reversing_are_illegal() {
        assert!(!ShippingStatus::Pending.can_transition_to(ShippingStatus::Delivered));
        assert!(!ShippingStatus::Shipped.can_transition_to(ShippingStatus::Pending));
        assert!(!ShippingStatus::Delivered.can_transition_to(ShippingStatus::Shipped));
        assert!(!ShippingStatus::Delivered.can_transition_to(ShippingStatus::Pending));
    }

    #[test]
    fn self_transitions_are_illegal() {
        for status in [
            ShippingStatus::Pending,
            ShippingStatus::Shipped,
            ShippingStatus::Delivered,
        ] {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn status_round_trips_through_storage_strings() {
        for status in [
            ShippingStatus::Pending,
            ShippingStatus::Shipped,
            ShippingStatus::Delivered,
        ] {
            assert_eq!(ShippingStatus::try_from(status.as_str()).unwrap(), status);
        }
        assert!(ShippingStatus::try_from("returned").is_err());
    }
}
