//! Products API endpoints.

use api_types::product::{ProductNew, ProductUpdate, ProductView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

fn view(product: engine::Product) -> ProductView {
    ProductView {
        id: product.id,
        name: product.name,
        points: product.points,
        stock: product.stock,
        class_id: product.class_id,
        created_at: product.created_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductNew>,
) -> Result<(StatusCode, Json<ProductView>), ServerError> {
    let product = state
        .engine
        .new_product(
            &payload.name,
            payload.points,
            payload.stock,
            &payload.class_id,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(view(product))))
}

pub async fn list_by_class(
    State(state): State<ServerState>,
    Path(class_id): Path<String>,
) -> Result<Json<Vec<ProductView>>, ServerError> {
    let products = state.engine.list_products_by_class(&class_id).await?;
    Ok(Json(products.into_iter().map(view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(product_id): Path<String>,
) -> Result<Json<ProductView>, ServerError> {
    let product = state.engine.product(&product_id).await?;
    Ok(Json(view(product)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(product_id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> Result<Json<ProductView>, ServerError> {
    let mut update = engine::ProductUpdate::new();
    if let Some(name) = payload.name {
        update = update.name(name);
    }
    if let Some(points) = payload.points {
        update = update.points(points);
    }
    if let Some(stock) = payload.stock {
        update = update.stock(stock);
    }

    let product = state.engine.update_product(&product_id, update).await?;
    Ok(Json(view(product)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(product_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_product(&product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
