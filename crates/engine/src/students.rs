//! The module contains the `Student` struct and its persistence model.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A student enrolled in a class.
///
/// `points` is the redeemable balance and never goes below zero.
/// `class_name` is a denormalized snapshot of the owning class name; it
/// is refreshed when the class is renamed but purchase records keep
/// their own frozen copies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub student_number: String,
    pub points: i64,
    pub class_id: String,
    pub class_name: String,
    pub created_at: DateTime<Utc>,
}

impl Student {
    pub fn new(
        name: String,
        student_number: String,
        points: i64,
        class_id: String,
        class_name: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            student_number,
            points,
            class_id,
            class_name,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub student_number: String,
    pub points: i64,
    pub class_id: String,
    pub class_name: String,
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

impl From<&Student> for ActiveModel {
    fn from(value: &Student) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            student_number: ActiveValue::Set(value.student_number.clone()),
            points: ActiveValue::Set(value.points),
            class_id: ActiveValue::Set(value.class_id.clone()),
            class_name: ActiveValue::Set(value.class_name.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl From<Model> for Student {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            student_number: model.student_number,
            points: model.points,
            class_id: model.class_id,
            class_name: model.class_name,
            created_at: model.created_at,
        }
    }
}
