use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{EngineError, Product, ProductUpdate, ResultEngine, products};

use super::{Engine, ensure_non_negative, normalize_required_name, with_tx};

impl Engine {
    /// Create a new product in a class shop.
    pub async fn new_product(
        &self,
        name: &str,
        points: i64,
        stock: i64,
        class_id: &str,
    ) -> ResultEngine<Product> {
        let name = normalize_required_name(name, "product")?;
        let points = ensure_non_negative(points, "points")?;
        let stock = ensure_non_negative(stock, "stock")?;
        with_tx!(self, |db_tx| {
            let class_model = self.require_class(&db_tx, class_id).await?;
            let product = Product::new(name, points, stock, class_model.id);
            products::ActiveModel::from(&product).insert(&db_tx).await?;
            Ok(product)
        })
    }

    /// Return a product snapshot from DB.
    pub async fn product(&self, product_id: &str) -> ResultEngine<Product> {
        with_tx!(self, |db_tx| {
            let model = self.require_product(&db_tx, product_id).await?;
            Ok(Product::from(model))
        })
    }

    /// List the products of one class, most recently created first.
    pub async fn list_products_by_class(&self, class_id: &str) -> ResultEngine<Vec<Product>> {
        let models = products::Entity::find()
            .filter(products::Column::ClassId.eq(class_id.to_string()))
            .order_by_desc(products::Column::CreatedAt)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Product::from).collect())
    }

    /// Update fields of an existing product.
    ///
    /// Price and stock edits never touch purchase records: those keep
    /// the snapshots taken when each exchange committed.
    pub async fn update_product(
        &self,
        product_id: &str,
        update: ProductUpdate,
    ) -> ResultEngine<Product> {
        if update.is_empty() {
            return Err(EngineError::Validation("no fields to update".to_string()));
        }
        let new_name = update
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "product"))
            .transpose()?;
        let new_points = update
            .points
            .map(|points| ensure_non_negative(points, "points"))
            .transpose()?;
        let new_stock = update
            .stock
            .map(|stock| ensure_non_negative(stock, "stock"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = self.require_product(&db_tx, product_id).await?;

            let mut active = products::ActiveModel {
                id: ActiveValue::Set(model.id),
                ..Default::default()
            };
            if let Some(name) = new_name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(points) = new_points {
                active.points = ActiveValue::Set(points);
            }
            if let Some(stock) = new_stock {
                active.stock = ActiveValue::Set(stock);
            }
            let updated = active.update(&db_tx).await?;

            Ok(Product::from(updated))
        })
    }

    /// Delete a product. Its purchase records stay, as history.
    pub async fn delete_product(&self, product_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_product(&db_tx, product_id).await?;
            products::Entity::delete_by_id(product_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
