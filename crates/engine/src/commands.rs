//! Command structs for engine operations.
//!
//! Update commands enumerate every mutable field with an `Option` as a
//! presence flag, so partial updates stay exhaustive instead of passing
//! loose field bags around. `PurchaseCmd` groups the parameters of a
//! redemption.

/// Partial update for a class.
#[derive(Clone, Debug, Default)]
pub struct ClassUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl ClassUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// Partial update for a student.
#[derive(Clone, Debug, Default)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub student_number: Option<String>,
    pub points: Option<i64>,
    pub class_id: Option<String>,
}

impl StudentUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn student_number(mut self, student_number: impl Into<String>) -> Self {
        self.student_number = Some(student_number.into());
        self
    }

    #[must_use]
    pub fn points(mut self, points: i64) -> Self {
        self.points = Some(points);
        self
    }

    #[must_use]
    pub fn class_id(mut self, class_id: impl Into<String>) -> Self {
        self.class_id = Some(class_id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.student_number.is_none()
            && self.points.is_none()
            && self.class_id.is_none()
    }
}

/// Partial update for a product.
#[derive(Clone, Debug, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub points: Option<i64>,
    pub stock: Option<i64>,
}

impl ProductUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn points(mut self, points: i64) -> Self {
        self.points = Some(points);
        self
    }

    #[must_use]
    pub fn stock(mut self, stock: i64) -> Self {
        self.stock = Some(stock);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.points.is_none() && self.stock.is_none()
    }
}

/// Redeem `quantity` units of a product against a student's points.
#[derive(Clone, Debug)]
pub struct PurchaseCmd {
    pub student_id: String,
    pub product_id: String,
    pub quantity: i64,
    /// Optional caller-chosen key; a retried purchase carrying the same
    /// key returns the already-created record instead of applying the
    /// effect twice.
    pub idempotency_key: Option<String>,
}

impl PurchaseCmd {
    #[must_use]
    pub fn new(
        student_id: impl Into<String>,
        product_id: impl Into<String>,
        quantity: i64,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            product_id: product_id.into(),
            quantity,
            idempotency_key: None,
        }
    }

    #[must_use]
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}
