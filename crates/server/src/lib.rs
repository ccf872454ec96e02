use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{router, run, run_with_listener, spawn_with_listener};

mod classes;
mod products;
mod purchases;
mod server;
mod students;

pub mod types {
    pub mod class {
        pub use api_types::class::{ClassNew, ClassUpdate, ClassView};
    }

    pub mod student {
        pub use api_types::student::{PointsAdjust, StudentNew, StudentUpdate, StudentView};
    }

    pub mod product {
        pub use api_types::product::{ProductNew, ProductUpdate, ProductView};
    }

    pub mod purchase {
        pub use api_types::purchase::{
            PaginatedRecordsResponse, PurchaseNew, PurchaseRecordView, RecordsPageQuery,
            ShippingUpdate,
        };
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ConcurrencyConflict(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::Validation(_)
        | EngineError::CrossClassMismatch(_)
        | EngineError::InsufficientStock(_)
        | EngineError::InsufficientPoints(_)
        | EngineError::InvalidShippingStatusTransition(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::NotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res =
            ServerError::from(EngineError::ConcurrencyConflict("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_rule_violations_map_to_422() {
        for err in [
            EngineError::Validation("x".to_string()),
            EngineError::CrossClassMismatch("x".to_string()),
            EngineError::InsufficientStock("x".to_string()),
            EngineError::InsufficientPoints("x".to_string()),
            EngineError::InvalidShippingStatusTransition("x".to_string()),
        ] {
            let res = ServerError::from(err).into_response();
            assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn engine_database_maps_to_500() {
        let res = ServerError::from(EngineError::Database(sea_orm::DbErr::Custom(
            "secret".to_string(),
        )))
        .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
