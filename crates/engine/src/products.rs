//! The module contains the `Product` struct and its persistence model.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product in a class shop.
///
/// `points` is the unit price; `stock` is the remaining quantity. Both
/// stay non-negative, and `stock` is only ever debited by the exchange
/// coordinator or set directly by an operator update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub points: i64,
    pub stock: i64,
    pub class_id: String,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(name: String, points: i64, stock: i64, class_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            points,
            stock,
            class_id,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub points: i64,
    pub stock: i64,
    pub class_id: String,
    pub created_at: DateTimeUtc,
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

impl From<&Product> for ActiveModel {
    fn from(value: &Product) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            points: ActiveValue::Set(value.points),
            stock: ActiveValue::Set(value.stock),
            class_id: ActiveValue::Set(value.class_id.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            points: model.points,
            stock: model.stock,
            class_id: model.class_id,
            created_at: model.created_at,
        }
    }
}
