use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};

use crate::{Class, ClassUpdate, EngineError, ResultEngine, classes, products, purchase_records, students};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    /// Create a new class.
    pub async fn new_class(&self, name: &str, description: Option<&str>) -> ResultEngine<Class> {
        let name = normalize_required_name(name, "class")?;
        let class = Class::new(name, normalize_optional_text(description));
        with_tx!(self, |db_tx| {
            classes::ActiveModel::from(&class).insert(&db_tx).await?;
            Ok(class)
        })
    }

    /// Return a class snapshot from DB.
    pub async fn class(&self, class_id: &str) -> ResultEngine<Class> {
        with_tx!(self, |db_tx| {
            let model = self.require_class(&db_tx, class_id).await?;
            Ok(Class::from(model))
        })
    }

    /// List all classes, most recently created first.
    pub async fn list_classes(&self) -> ResultEngine<Vec<Class>> {
        let models = classes::Entity::find()
            .order_by_desc(classes::Column::CreatedAt)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Class::from).collect())
    }

    /// Update name and/or description of an existing class.
    ///
    /// A rename also refreshes the denormalized `class_name` on owned
    /// students, in the same unit of work.
    pub async fn update_class(&self, class_id: &str, update: ClassUpdate) -> ResultEngine<Class> {
        if update.is_empty() {
            return Err(EngineError::Validation("no fields to update".to_string()));
        }
        let new_name = update
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "class"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = self.require_class(&db_tx, class_id).await?;

            let mut active = classes::ActiveModel {
                id: ActiveValue::Set(model.id),
                ..Default::default()
            };
            if let Some(name) = new_name.clone() {
                active.name = ActiveValue::Set(name);
            }
            if let Some(description) = update.description.as_deref() {
                active.description = ActiveValue::Set(normalize_optional_text(Some(description)));
            }
            let updated = active.update(&db_tx).await?;

            if let Some(name) = new_name {
                students::Entity::update_many()
                    .col_expr(students::Column::ClassName, Expr::value(name))
                    .filter(students::Column::ClassId.eq(class_id.to_string()))
                    .exec(&db_tx)
                    .await?;
            }

            Ok(Class::from(updated))
        })
    }

    /// Delete a class and everything it owns.
    ///
    /// Students, products and purchase records with this `class_id` go
    /// away in the same transaction; no half-cascaded state is ever
    /// visible.
    pub async fn delete_class(&self, class_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_class(&db_tx, class_id).await?;

            purchase_records::Entity::delete_many()
                .filter(purchase_records::Column::ClassId.eq(class_id.to_string()))
                .exec(&db_tx)
                .await?;
            products::Entity::delete_many()
                .filter(products::Column::ClassId.eq(class_id.to_string()))
                .exec(&db_tx)
                .await?;
            students::Entity::delete_many()
                .filter(students::Column::ClassId.eq(class_id.to_string()))
                .exec(&db_tx)
                .await?;
            classes::Entity::delete_by_id(class_id.to_string())
                .exec(&db_tx)
                .await?;

            Ok(())
        })
    }
}
