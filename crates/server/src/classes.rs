//! Classes API endpoints.

use api_types::class::{ClassNew, ClassUpdate, ClassView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

fn view(class: engine::Class) -> ClassView {
    ClassView {
        id: class.id,
        name: class.name,
        description: class.description,
        student_count: class.student_count,
        created_at: class.created_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ClassNew>,
) -> Result<(StatusCode, Json<ClassView>), ServerError> {
    let class = state
        .engine
        .new_class(&payload.name, payload.description.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(view(class))))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<ClassView>>, ServerError> {
    let classes = state.engine.list_classes().await?;
    Ok(Json(classes.into_iter().map(view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(class_id): Path<String>,
) -> Result<Json<ClassView>, ServerError> {
    let class = state.engine.class(&class_id).await?;
    Ok(Json(view(class)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(class_id): Path<String>,
    Json(payload): Json<ClassUpdate>,
) -> Result<Json<ClassView>, ServerError> {
    let mut update = engine::ClassUpdate::new();
    if let Some(name) = payload.name {
        update = update.name(name);
    }
    if let Some(description) = payload.description {
        update = update.description(description);
    }

    let class = state.engine.update_class(&class_id, update).await?;
    Ok(Json(view(class)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(class_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_class(&class_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
