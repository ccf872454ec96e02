use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod access;
mod classes;
mod products;
mod purchases;
mod students;

pub use purchases::PaginatedRecords;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The ledger engine.
///
/// All entity state lives in the database; every mutation runs inside a
/// single DB transaction so a failing call leaves the ledger untouched.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn ensure_non_negative(value: i64, label: &str) -> ResultEngine<i64> {
    if value < 0 {
        return Err(EngineError::Validation(format!(
            "{label} must not be negative"
        )));
    }
    Ok(value)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed() {
        assert_eq!(
            normalize_required_name("  Alice ", "student").unwrap(),
            "Alice"
        );
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(matches!(
            normalize_required_name("   ", "class"),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn optional_text_drops_blank_values() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(Some(" note ")), Some("note".into()));
        assert_eq!(normalize_optional_text(None), None);
    }

    #[test]
    fn negative_numbers_are_rejected() {
        assert!(ensure_non_negative(0, "points").is_ok());
        assert!(ensure_non_negative(-1, "stock").is_err());
    }
}
