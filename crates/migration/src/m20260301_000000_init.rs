//! Initial schema migration - creates all tables from scratch.
//!
//! The complete schema for PointHub:
//!
//! - `classes`: top-level containers, one per classroom
//! - `students`: point balances, owned by a class
//! - `products`: redeemable items with stock, owned by a class
//! - `purchase_records`: immutable exchange history with snapshots
//!
//! `purchase_records` deliberately has no foreign keys to `students` or
//! `products`: records outlive both, carrying name/price snapshots
//! instead. The only FK cascade is class -> children.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Classes {
    Table,
    Id,
    Name,
    Description,
    StudentCount,
    CreatedAt,
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
    Name,
    StudentNumber,
    Points,
    ClassId,
    ClassName,
    CreatedAt,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
    Name,
    Points,
    Stock,
    ClassId,
    CreatedAt,
}

#[derive(Iden)]
enum PurchaseRecords {
    Table,
    Id,
    ProductId,
    ProductName,
    Points,
    StudentId,
    StudentName,
    Quantity,
    ClassId,
    CreatedAt,
    ShippingStatus,
    IdempotencyKey,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Classes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Classes::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Classes::Name).string().not_null())
                    .col(ColumnDef::new(Classes::Description).string())
                    .col(
                        ColumnDef::new(Classes::StudentCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Classes::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Students
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::Name).string().not_null())
                    .col(ColumnDef::new(Students::StudentNumber).string().not_null())
                    .col(
                        ColumnDef::new(Students::Points)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Students::ClassId).string().not_null())
                    .col(ColumnDef::new(Students::ClassName).string().not_null())
                    .col(ColumnDef::new(Students::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-students-class_id")
                            .from(Students::Table, Students::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-students-class_id")
                    .table(Students::Table)
                    .col(Students::ClassId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Products
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::Name).string().not_null())
                    .col(
                        ColumnDef::new(Products::Points)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Products::Stock)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Products::ClassId).string().not_null())
                    .col(ColumnDef::new(Products::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-products-class_id")
                            .from(Products::Table, Products::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-products-class_id")
                    .table(Products::Table)
                    .col(Products::ClassId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Purchase Records
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(PurchaseRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseRecords::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PurchaseRecords::ProductId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseRecords::ProductName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseRecords::Points)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseRecords::StudentId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseRecords::StudentName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseRecords::Quantity)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseRecords::ClassId).string().not_null())
                    .col(
                        ColumnDef::new(PurchaseRecords::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseRecords::ShippingStatus)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(PurchaseRecords::IdempotencyKey).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-purchase_records-class_id")
                            .from(PurchaseRecords::Table, PurchaseRecords::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-purchase_records-class_id-created_at")
                    .table(PurchaseRecords::Table)
                    .col(PurchaseRecords::ClassId)
                    .col(PurchaseRecords::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-purchase_records-idempotency_key")
                    .table(PurchaseRecords::Table)
                    .col(PurchaseRecords::IdempotencyKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(PurchaseRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await?;
        Ok(())
    }
}
