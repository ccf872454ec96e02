//! The module contains the `Class` struct and its persistence model.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A class.
///
/// A class owns students and the shop products they can redeem points
/// for. `student_count` is a maintained aggregate: it always equals the
/// live count of students whose `class_id` points here, and is updated
/// in the same unit of work as the student mutation that changes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    /// Stable identifier, a UUID generated once and persisted so the
    /// class can be renamed without breaking references.
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub student_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Class {
    pub fn new(name: String, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            student_count: 0,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub student_count: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::students::Entity")]
    Students,
    #[sea_orm(has_many = "super::products::Entity")]
    Products,
    #[sea_orm(has_many = "super::purchase_records::Entity")]
    PurchaseRecords,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::purchase_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Class> for ActiveModel {
    fn from(value: &Class) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            description: ActiveValue::Set(value.description.clone()),
            student_count: ActiveValue::Set(value.student_count),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl From<Model> for Class {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            student_count: model.student_count,
            created_at: model.created_at,
        }
    }
}
