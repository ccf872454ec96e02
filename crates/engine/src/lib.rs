pub use classes::Class;
pub use commands::{ClassUpdate, ProductUpdate, PurchaseCmd, StudentUpdate};
pub use error::EngineError;
pub use ops::{Engine, EngineBuilder, PaginatedRecords};
pub use products::Product;
pub use purchase_records::{PurchaseRecord, ShippingStatus};
pub use students::Student;

mod classes;
mod commands;
mod error;
mod ops;
mod products;
mod purchase_records;
mod students;

type ResultEngine<T> = Result<T, EngineError>;
