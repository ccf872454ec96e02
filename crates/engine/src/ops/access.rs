use sea_orm::{DatabaseTransaction, prelude::*};

use crate::{EngineError, ResultEngine, classes, products, purchase_records, students};

use super::Engine;

/// Generates a `require_*` lookup that returns the model or `NotFound`.
macro_rules! impl_require {
    ($require_fn:ident, $entity:path, $model:path, $err_msg:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            id: &str,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(id.to_string())
                .one(db)
                .await?
                .ok_or_else(|| EngineError::NotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_require!(
        require_class,
        classes::Entity,
        classes::Model,
        "class not exists"
    );

    impl_require!(
        require_student,
        students::Entity,
        students::Model,
        "student not exists"
    );

    impl_require!(
        require_product,
        products::Entity,
        products::Model,
        "product not exists"
    );

    impl_require!(
        require_record,
        purchase_records::Entity,
        purchase_records::Model,
        "purchase record not exists"
    );
}
