use sea_orm::{
    ActiveValue, DatabaseTransaction, Order, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait, prelude::*, sea_query::Expr,
};

use crate::{EngineError, ResultEngine, Student, StudentUpdate, classes, students};

use super::{Engine, ensure_non_negative, normalize_required_name, with_tx};

impl Engine {
    /// Create a new student in a class.
    ///
    /// Snapshots the class name and bumps the class's `student_count`
    /// in the same transaction.
    pub async fn new_student(
        &self,
        name: &str,
        student_number: &str,
        points: i64,
        class_id: &str,
    ) -> ResultEngine<Student> {
        let name = normalize_required_name(name, "student")?;
        let points = ensure_non_negative(points, "points")?;
        with_tx!(self, |db_tx| {
            let class_model = self.require_class(&db_tx, class_id).await?;
            let student = Student::new(
                name,
                student_number.trim().to_string(),
                points,
                class_model.id,
                class_model.name,
            );
            students::ActiveModel::from(&student).insert(&db_tx).await?;
            self.refresh_student_count(&db_tx, class_id).await?;
            Ok(student)
        })
    }

    /// Return a student snapshot from DB.
    pub async fn student(&self, student_id: &str) -> ResultEngine<Student> {
        with_tx!(self, |db_tx| {
            let model = self.require_student(&db_tx, student_id).await?;
            Ok(Student::from(model))
        })
    }

    /// List all students, ordered by the numeric value of their number.
    pub async fn list_students(&self) -> ResultEngine<Vec<Student>> {
        let models = students::Entity::find()
            .order_by(Expr::cust("CAST(student_number AS INTEGER)"), Order::Asc)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Student::from).collect())
    }

    /// List the students of one class, ordered by the numeric value of
    /// their number.
    pub async fn list_students_by_class(&self, class_id: &str) -> ResultEngine<Vec<Student>> {
        let models = students::Entity::find()
            .filter(students::Column::ClassId.eq(class_id.to_string()))
            .order_by(Expr::cust("CAST(student_number AS INTEGER)"), Order::Asc)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Student::from).collect())
    }

    /// Update fields of an existing student.
    ///
    /// Moving the student to another class refreshes the denormalized
    /// `class_name` and the `student_count` of both classes.
    pub async fn update_student(
        &self,
        student_id: &str,
        update: StudentUpdate,
    ) -> ResultEngine<Student> {
        if update.is_empty() {
            return Err(EngineError::Validation("no fields to update".to_string()));
        }
        let new_name = update
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "student"))
            .transpose()?;
        let new_points = update
            .points
            .map(|points| ensure_non_negative(points, "points"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let current = self.require_student(&db_tx, student_id).await?;

            let mut active = students::ActiveModel {
                id: ActiveValue::Set(current.id.clone()),
                ..Default::default()
            };
            if let Some(name) = new_name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(number) = update.student_number.as_deref() {
                active.student_number = ActiveValue::Set(number.trim().to_string());
            }
            if let Some(points) = new_points {
                active.points = ActiveValue::Set(points);
            }

            let mut moved_from: Option<String> = None;
            if let Some(class_id) = update.class_id.as_deref()
                && class_id != current.class_id
            {
                let class_model = self.require_class(&db_tx, class_id).await?;
                active.class_id = ActiveValue::Set(class_model.id);
                active.class_name = ActiveValue::Set(class_model.name);
                moved_from = Some(current.class_id.clone());
            }

            let updated = active.update(&db_tx).await?;

            if let Some(old_class_id) = moved_from {
                self.refresh_student_count(&db_tx, &old_class_id).await?;
                self.refresh_student_count(&db_tx, &updated.class_id).await?;
            }

            Ok(Student::from(updated))
        })
    }

    /// Award (positive delta) or deduct (negative delta) points.
    ///
    /// The balance never goes below zero: a deduction that would is
    /// rejected with `InsufficientPoints` and nothing changes.
    pub async fn adjust_points(&self, student_id: &str, delta: i64) -> ResultEngine<Student> {
        with_tx!(self, |db_tx| {
            let current = self.require_student(&db_tx, student_id).await?;
            let new_points = current.points.checked_add(delta).ok_or_else(|| {
                EngineError::Validation("points adjustment overflows".to_string())
            })?;
            if new_points < 0 {
                return Err(EngineError::InsufficientPoints(current.name));
            }

            // The filter re-checks the floor so a concurrent debit
            // between our read and this write cannot push the balance
            // negative.
            let res = students::Entity::update_many()
                .col_expr(
                    students::Column::Points,
                    Expr::col(students::Column::Points).add(delta),
                )
                .filter(students::Column::Id.eq(student_id.to_string()))
                .filter(students::Column::Points.gte((-delta).max(0)))
                .exec(&db_tx)
                .await?;
            if res.rows_affected != 1 {
                return Err(EngineError::ConcurrencyConflict(
                    "student points changed concurrently".to_string(),
                ));
            }

            let model = self.require_student(&db_tx, student_id).await?;
            Ok(Student::from(model))
        })
    }

    /// Delete a student, decrementing the owning class's count.
    pub async fn delete_student(&self, student_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let current = self.require_student(&db_tx, student_id).await?;
            students::Entity::delete_by_id(student_id.to_string())
                .exec(&db_tx)
                .await?;
            self.refresh_student_count(&db_tx, &current.class_id).await?;
            Ok(())
        })
    }

    /// Re-derive `student_count` from the live student rows.
    pub(super) async fn refresh_student_count(
        &self,
        db: &DatabaseTransaction,
        class_id: &str,
    ) -> ResultEngine<()> {
        let count = students::Entity::find()
            .filter(students::Column::ClassId.eq(class_id.to_string()))
            .count(db)
            .await?;
        let active = classes::ActiveModel {
            id: ActiveValue::Set(class_id.to_string()),
            student_count: ActiveValue::Set(count as i64),
            ..Default::default()
        };
        active.update(db).await?;
        Ok(())
    }
}
