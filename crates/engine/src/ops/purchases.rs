use sea_orm::{
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use serde::Serialize;

use crate::{
    EngineError, Product, PurchaseCmd, PurchaseRecord, ResultEngine, ShippingStatus, Student,
    products, purchase_records, students,
};

use super::{Engine, with_tx};

/// One page of purchase records, newest first.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PaginatedRecords {
    pub records: Vec<PurchaseRecord>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub page_size: u64,
}

impl Engine {
    /// Redeem a product against a student's point balance.
    ///
    /// The point debit, the stock debit and the record insert commit
    /// together or not at all. Preconditions are checked in a fixed
    /// order so a call that fails several of them reports the same
    /// error every time: quantity, student exists, product exists, same
    /// class, stock, points.
    pub async fn purchase(&self, cmd: PurchaseCmd) -> ResultEngine<PurchaseRecord> {
        if cmd.quantity < 1 {
            return Err(EngineError::Validation(
                "quantity must be at least 1".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            if let Some(key) = cmd.idempotency_key.as_deref()
                && let Some(existing) = purchase_records::Entity::find()
                    .filter(purchase_records::Column::IdempotencyKey.eq(key.to_string()))
                    .one(&db_tx)
                    .await?
            {
                // Replay of an already-committed exchange; nothing has
                // been written yet, so dropping the tx is harmless.
                return PurchaseRecord::try_from(existing);
            }

            let student = Student::from(self.require_student(&db_tx, &cmd.student_id).await?);
            let product = Product::from(self.require_product(&db_tx, &cmd.product_id).await?);

            if student.class_id != product.class_id {
                return Err(EngineError::CrossClassMismatch(format!(
                    "student {} and product {} belong to different classes",
                    student.name, product.name
                )));
            }
            if product.stock < cmd.quantity {
                return Err(EngineError::InsufficientStock(product.name));
            }
            let cost = cmd
                .quantity
                .checked_mul(product.points)
                .ok_or_else(|| EngineError::Validation("purchase cost overflows".to_string()))?;
            if student.points < cost {
                return Err(EngineError::InsufficientPoints(student.name));
            }

            // Debits re-check their own precondition in the WHERE
            // clause; a row that slipped past the reads above fails the
            // guard and the whole exchange rolls back.
            let debit = students::Entity::update_many()
                .col_expr(
                    students::Column::Points,
                    Expr::col(students::Column::Points).sub(cost),
                )
                .filter(students::Column::Id.eq(student.id.clone()))
                .filter(students::Column::Points.gte(cost))
                .exec(&db_tx)
                .await?;
            if debit.rows_affected != 1 {
                return Err(EngineError::ConcurrencyConflict(
                    "student points changed concurrently".to_string(),
                ));
            }

            let stock_debit = products::Entity::update_many()
                .col_expr(
                    products::Column::Stock,
                    Expr::col(products::Column::Stock).sub(cmd.quantity),
                )
                .filter(products::Column::Id.eq(product.id.clone()))
                .filter(products::Column::Stock.gte(cmd.quantity))
                .exec(&db_tx)
                .await?;
            if stock_debit.rows_affected != 1 {
                return Err(EngineError::ConcurrencyConflict(
                    "product stock changed concurrently".to_string(),
                ));
            }

            let record = PurchaseRecord::new(
                &student,
                &product,
                cmd.quantity,
                cmd.idempotency_key.clone(),
            );
            purchase_records::ActiveModel::from(&record)
                .insert(&db_tx)
                .await?;

            Ok(record)
        })
    }

    /// Return one purchase record.
    pub async fn purchase_record(&self, record_id: &str) -> ResultEngine<PurchaseRecord> {
        with_tx!(self, |db_tx| {
            let model = self.require_record(&db_tx, record_id).await?;
            PurchaseRecord::try_from(model)
        })
    }

    /// All purchase records of a class, newest first.
    pub async fn purchase_records_by_class(
        &self,
        class_id: &str,
    ) -> ResultEngine<Vec<PurchaseRecord>> {
        let models = purchase_records::Entity::find()
            .filter(purchase_records::Column::ClassId.eq(class_id.to_string()))
            .order_by_desc(purchase_records::Column::CreatedAt)
            .order_by_desc(purchase_records::Column::Id)
            .all(&self.database)
            .await?;
        models.into_iter().map(PurchaseRecord::try_from).collect()
    }

    /// One page of a class's purchase records, newest first.
    ///
    /// A page number past the end is clamped to the last page rather
    /// than rejected, so a client that deletes the final record on the
    /// final page still gets data back on refresh. An empty history has
    /// a single empty page.
    pub async fn purchase_records_paginated(
        &self,
        class_id: &str,
        page: u64,
        page_size: u64,
    ) -> ResultEngine<PaginatedRecords> {
        if page_size < 1 {
            return Err(EngineError::Validation(
                "page size must be at least 1".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let total = purchase_records::Entity::find()
                .filter(purchase_records::Column::ClassId.eq(class_id.to_string()))
                .count(&db_tx)
                .await?;
            let total_pages = total.div_ceil(page_size);
            let current_page = page.clamp(1, total_pages.max(1));

            let models = purchase_records::Entity::find()
                .filter(purchase_records::Column::ClassId.eq(class_id.to_string()))
                .order_by_desc(purchase_records::Column::CreatedAt)
                .order_by_desc(purchase_records::Column::Id)
                .offset((current_page - 1) * page_size)
                .limit(page_size)
                .all(&db_tx)
                .await?;
            let records = models
                .into_iter()
                .map(PurchaseRecord::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            Ok(PaginatedRecords {
                records,
                total,
                total_pages,
                current_page,
                page_size,
            })
        })
    }

    /// Advance a record's shipping status by one legal step.
    ///
    /// The UPDATE is guarded on the expected current status, so two
    /// racing `pending → shipped` calls cannot both succeed.
    pub async fn update_shipping_status(
        &self,
        record_id: &str,
        next: ShippingStatus,
    ) -> ResultEngine<PurchaseRecord> {
        with_tx!(self, |db_tx| {
            let model = self.require_record(&db_tx, record_id).await?;
            let current = ShippingStatus::try_from(model.shipping_status.as_str())?;
            if !current.can_transition_to(next) {
                return Err(EngineError::InvalidShippingStatusTransition(format!(
                    "{} -> {}",
                    current.as_str(),
                    next.as_str()
                )));
            }

            let res = purchase_records::Entity::update_many()
                .col_expr(
                    purchase_records::Column::ShippingStatus,
                    Expr::value(next.as_str()),
                )
                .filter(purchase_records::Column::Id.eq(record_id.to_string()))
                .filter(purchase_records::Column::ShippingStatus.eq(current.as_str()))
                .exec(&db_tx)
                .await?;
            if res.rows_affected != 1 {
                return Err(EngineError::ConcurrencyConflict(
                    "shipping status changed concurrently".to_string(),
                ));
            }

            let model = self.require_record(&db_tx, record_id).await?;
            PurchaseRecord::try_from(model)
        })
    }
}
