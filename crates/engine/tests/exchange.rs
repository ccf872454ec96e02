use std::sync::Arc;

use sea_orm::Database;
use tokio::task::JoinSet;
use uuid::Uuid;

use engine::{Engine, EngineError, PurchaseCmd, ShippingStatus};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

async fn engine_with_file_db() -> (Engine, std::path::PathBuf) {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("engine_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();

    (engine, path)
}

/// One class with one student (120 points) and one product (50 points,
/// stock 3). Returns (class_id, student_id, product_id).
async fn seed_shop(engine: &Engine) -> (String, String, String) {
    let class = engine.new_class("3-B", None).await.unwrap();
    let student = engine
        .new_student("Alice", "07", 120, &class.id)
        .await
        .unwrap();
    let product = engine
        .new_product("Sticker pack", 50, 3, &class.id)
        .await
        .unwrap();
    (class.id, student.id, product.id)
}

#[tokio::test]
async fn purchase_debits_points_and_stock_and_records() {
    let engine = engine_with_db().await;
    let (class_id, student_id, product_id) = seed_shop(&engine).await;

    let record = engine
        .purchase(PurchaseCmd::new(&student_id, &product_id, 2))
        .await
        .unwrap();

    assert_eq!(record.points, 50);
    assert_eq!(record.quantity, 2);
    assert_eq!(record.product_name, "Sticker pack");
    assert_eq!(record.student_name, "Alice");
    assert_eq!(record.shipping_status, ShippingStatus::Pending);

    let student = engine.student(&student_id).await.unwrap();
    assert_eq!(student.points, 20);
    let product = engine.product(&product_id).await.unwrap();
    assert_eq!(product.stock, 1);

    let records = engine.purchase_records_by_class(&class_id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0], record);
}

#[tokio::test]
async fn failed_purchase_leaves_state_untouched() {
    let engine = engine_with_db().await;
    let (class_id, student_id, product_id) = seed_shop(&engine).await;

    // 3 * 50 > 120 points.
    let err = engine
        .purchase(PurchaseCmd::new(&student_id, &product_id, 3))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::InsufficientPoints("Alice".to_string()));

    let student = engine.student(&student_id).await.unwrap();
    assert_eq!(student.points, 120);
    let product = engine.product(&product_id).await.unwrap();
    assert_eq!(product.stock, 3);
    assert!(
        engine
            .purchase_records_by_class(&class_id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn second_purchase_fails_on_stock_and_keeps_state() {
    let engine = engine_with_db().await;
    let (_, student_id, product_id) = seed_shop(&engine).await;

    engine
        .purchase(PurchaseCmd::new(&student_id, &product_id, 2))
        .await
        .unwrap();

    // Stock is down to 1; the repeat order trips on stock, not points.
    let err = engine
        .purchase(PurchaseCmd::new(&student_id, &product_id, 2))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientStock("Sticker pack".to_string())
    );

    let student = engine.student(&student_id).await.unwrap();
    assert_eq!(student.points, 20);
    let product = engine.product(&product_id).await.unwrap();
    assert_eq!(product.stock, 1);
}

#[tokio::test]
async fn purchase_rejects_excess_quantity_before_points() {
    let engine = engine_with_db().await;
    let (_, student_id, product_id) = seed_shop(&engine).await;

    // 4 exceeds both stock (3) and budget; stock is checked first.
    let err = engine
        .purchase(PurchaseCmd::new(&student_id, &product_id, 4))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientStock("Sticker pack".to_string())
    );
}

#[tokio::test]
async fn purchase_rejects_non_positive_quantity() {
    let engine = engine_with_db().await;
    let (_, student_id, product_id) = seed_shop(&engine).await;

    for quantity in [0, -1] {
        let err = engine
            .purchase(PurchaseCmd::new(&student_id, &product_id, quantity))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}

#[tokio::test]
async fn purchase_rejects_cross_class() {
    let engine = engine_with_db().await;
    let (_, student_id, _) = seed_shop(&engine).await;

    let other_class = engine.new_class("4-A", None).await.unwrap();
    let other_product = engine
        .new_product("Pencil", 10, 5, &other_class.id)
        .await
        .unwrap();

    let err = engine
        .purchase(PurchaseCmd::new(&student_id, &other_product.id, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::CrossClassMismatch(_)));
}

#[tokio::test]
async fn purchase_reports_missing_student_before_missing_product() {
    let engine = engine_with_db().await;
    seed_shop(&engine).await;

    let err = engine
        .purchase(PurchaseCmd::new("nope", "also-nope", 1))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("student not exists".to_string()));
}

#[tokio::test]
async fn record_snapshots_survive_renames_and_deletes() {
    let engine = engine_with_db().await;
    let (_, student_id, product_id) = seed_shop(&engine).await;

    let record = engine
        .purchase(PurchaseCmd::new(&student_id, &product_id, 1))
        .await
        .unwrap();

    engine
        .update_student(
            &student_id,
            engine::StudentUpdate::new().name("Alice Cooper"),
        )
        .await
        .unwrap();
    engine
        .update_product(
            &product_id,
            engine::ProductUpdate::new().name("Sticker pack XL").points(99),
        )
        .await
        .unwrap();
    engine.delete_product(&product_id).await.unwrap();

    let reread = engine.purchase_record(&record.id).await.unwrap();
    assert_eq!(reread.student_name, "Alice");
    assert_eq!(reread.product_name, "Sticker pack");
    assert_eq!(reread.points, 50);
}

#[tokio::test]
async fn idempotency_key_replays_the_original_record() {
    let engine = engine_with_db().await;
    let (_, student_id, product_id) = seed_shop(&engine).await;

    let first = engine
        .purchase(PurchaseCmd::new(&student_id, &product_id, 1).idempotency_key("retry-1"))
        .await
        .unwrap();
    let second = engine
        .purchase(PurchaseCmd::new(&student_id, &product_id, 1).idempotency_key("retry-1"))
        .await
        .unwrap();

    assert_eq!(first, second);
    let student = engine.student(&student_id).await.unwrap();
    assert_eq!(student.points, 70);
    let product = engine.product(&product_id).await.unwrap();
    assert_eq!(product.stock, 2);
}

#[tokio::test]
async fn shipping_status_advances_one_step_at_a_time() {
    let engine = engine_with_db().await;
    let (_, student_id, product_id) = seed_shop(&engine).await;
    let record = engine
        .purchase(PurchaseCmd::new(&student_id, &product_id, 1))
        .await
        .unwrap();

    let err = engine
        .update_shipping_status(&record.id, ShippingStatus::Delivered)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidShippingStatusTransition(_)
    ));

    let shipped = engine
        .update_shipping_status(&record.id, ShippingStatus::Shipped)
        .await
        .unwrap();
    assert_eq!(shipped.shipping_status, ShippingStatus::Shipped);

    let delivered = engine
        .update_shipping_status(&record.id, ShippingStatus::Delivered)
        .await
        .unwrap();
    assert_eq!(delivered.shipping_status, ShippingStatus::Delivered);

    // Terminal: nothing moves out of delivered.
    for next in [
        ShippingStatus::Pending,
        ShippingStatus::Shipped,
        ShippingStatus::Delivered,
    ] {
        assert!(
            engine
                .update_shipping_status(&record.id, next)
                .await
                .is_err()
        );
    }
}

#[tokio::test]
async fn pagination_covers_every_record_once_and_clamps() {
    let engine = engine_with_db().await;
    let class = engine.new_class("3-B", None).await.unwrap();
    let student = engine
        .new_student("Alice", "07", 1000, &class.id)
        .await
        .unwrap();
    let product = engine
        .new_product("Sticker pack", 10, 100, &class.id)
        .await
        .unwrap();

    for _ in 0..7 {
        engine
            .purchase(PurchaseCmd::new(&student.id, &product.id, 1))
            .await
            .unwrap();
    }

    let mut seen = std::collections::HashSet::new();
    for page in 1..=3 {
        let paged = engine
            .purchase_records_paginated(&class.id, page, 3)
            .await
            .unwrap();
        assert_eq!(paged.total, 7);
        assert_eq!(paged.total_pages, 3);
        assert_eq!(paged.current_page, page);
        for record in paged.records {
            assert!(seen.insert(record.id));
        }
    }
    assert_eq!(seen.len(), 7);

    // Past-the-end page numbers land on the last page.
    let paged = engine
        .purchase_records_paginated(&class.id, 99, 3)
        .await
        .unwrap();
    assert_eq!(paged.current_page, 3);
    assert_eq!(paged.records.len(), 1);

    // Page zero clamps to the first page.
    let paged = engine
        .purchase_records_paginated(&class.id, 0, 3)
        .await
        .unwrap();
    assert_eq!(paged.current_page, 1);
    assert_eq!(paged.records.len(), 3);
}

#[tokio::test]
async fn empty_history_has_a_single_empty_page() {
    let engine = engine_with_db().await;
    let class = engine.new_class("3-B", None).await.unwrap();

    let paged = engine
        .purchase_records_paginated(&class.id, 5, 10)
        .await
        .unwrap();
    assert_eq!(paged.total, 0);
    assert_eq!(paged.total_pages, 0);
    assert_eq!(paged.current_page, 1);
    assert!(paged.records.is_empty());

    let err = engine
        .purchase_records_paginated(&class.id, 1, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn concurrent_purchases_never_oversell_or_overspend() {
    let (engine, _path) = engine_with_file_db().await;
    let class = engine.new_class("3-B", None).await.unwrap();
    let student = engine
        .new_student("Alice", "07", 100, &class.id)
        .await
        .unwrap();
    // Budget allows 10 units, stock allows 5.
    let product = engine
        .new_product("Sticker pack", 10, 5, &class.id)
        .await
        .unwrap();

    let engine = Arc::new(engine);
    let mut tasks = JoinSet::new();
    for _ in 0..16 {
        let engine = Arc::clone(&engine);
        let student_id = student.id.clone();
        let product_id = product.id.clone();
        tasks.spawn(async move {
            engine
                .purchase(PurchaseCmd::new(&student_id, &product_id, 1))
                .await
        });
    }

    let mut committed = 0u64;
    while let Some(outcome) = tasks.join_next().await {
        if outcome.unwrap().is_ok() {
            committed += 1;
        }
    }

    let final_student = engine.student(&student.id).await.unwrap();
    let final_product = engine.product(&product.id).await.unwrap();
    let records = engine.purchase_records_by_class(&class.id).await.unwrap();

    assert!(committed <= 5);
    assert!(final_product.stock >= 0);
    assert!(final_student.points >= 0);
    assert_eq!(final_product.stock, 5 - committed as i64);
    assert_eq!(final_student.points, 100 - 10 * committed as i64);
    assert_eq!(records.len() as u64, committed);
}
