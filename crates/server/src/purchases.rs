//! Exchange and purchase-history API endpoints.

use api_types::ShippingStatus;
use api_types::purchase::{
    PaginatedRecordsResponse, PurchaseNew, PurchaseRecordView, RecordsPageQuery, ShippingUpdate,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

const DEFAULT_PAGE_SIZE: u64 = 20;

fn status_view(status: engine::ShippingStatus) -> ShippingStatus {
    match status {
        engine::ShippingStatus::Pending => ShippingStatus::Pending,
        engine::ShippingStatus::Shipped => ShippingStatus::Shipped,
        engine::ShippingStatus::Delivered => ShippingStatus::Delivered,
    }
}

fn status_cmd(status: ShippingStatus) -> engine::ShippingStatus {
    match status {
        ShippingStatus::Pending => engine::ShippingStatus::Pending,
        ShippingStatus::Shipped => engine::ShippingStatus::Shipped,
        ShippingStatus::Delivered => engine::ShippingStatus::Delivered,
    }
}

fn view(record: engine::PurchaseRecord) -> PurchaseRecordView {
    PurchaseRecordView {
        id: record.id,
        product_id: record.product_id,
        product_name: record.product_name,
        points: record.points,
        student_id: record.student_id,
        student_name: record.student_name,
        quantity: record.quantity,
        class_id: record.class_id,
        created_at: record.created_at,
        shipping_status: status_view(record.shipping_status),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<PurchaseNew>,
) -> Result<(StatusCode, Json<PurchaseRecordView>), ServerError> {
    let mut cmd = engine::PurchaseCmd::new(
        &payload.student_id,
        &payload.product_id,
        payload.quantity,
    );
    if let Some(key) = payload.idempotency_key {
        cmd = cmd.idempotency_key(key);
    }

    let record = state.engine.purchase(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(record))))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(record_id): Path<String>,
) -> Result<Json<PurchaseRecordView>, ServerError> {
    let record = state.engine.purchase_record(&record_id).await?;
    Ok(Json(view(record)))
}

pub async fn list_by_class(
    State(state): State<ServerState>,
    Path(class_id): Path<String>,
    Query(query): Query<RecordsPageQuery>,
) -> Result<Json<PaginatedRecordsResponse>, ServerError> {
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    let paged = state
        .engine
        .purchase_records_paginated(&class_id, page, page_size)
        .await?;
    Ok(Json(PaginatedRecordsResponse {
        records: paged.records.into_iter().map(view).collect(),
        total: paged.total,
        total_pages: paged.total_pages,
        current_page: paged.current_page,
        page_size: paged.page_size,
    }))
}

pub async fn update_shipping(
    State(state): State<ServerState>,
    Path(record_id): Path<String>,
    Json(payload): Json<ShippingUpdate>,
) -> Result<Json<PurchaseRecordView>, ServerError> {
    let record = state
        .engine
        .update_shipping_status(&record_id, status_cmd(payload.shipping_status))
        .await?;
    Ok(Json(view(record)))
}
