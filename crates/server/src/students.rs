//! Students API endpoints.

use api_types::student::{PointsAdjust, StudentNew, StudentUpdate, StudentView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

fn view(student: engine::Student) -> StudentView {
    StudentView {
        id: student.id,
        name: student.name,
        student_number: student.student_number,
        points: student.points,
        class_id: student.class_id,
        class_name: student.class_name,
        created_at: student.created_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<StudentNew>,
) -> Result<(StatusCode, Json<StudentView>), ServerError> {
    let student = state
        .engine
        .new_student(
            &payload.name,
            &payload.student_number,
            payload.points,
            &payload.class_id,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(view(student))))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<StudentView>>, ServerError> {
    let students = state.engine.list_students().await?;
    Ok(Json(students.into_iter().map(view).collect()))
}

pub async fn list_by_class(
    State(state): State<ServerState>,
    Path(class_id): Path<String>,
) -> Result<Json<Vec<StudentView>>, ServerError> {
    let students = state.engine.list_students_by_class(&class_id).await?;
    Ok(Json(students.into_iter().map(view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(student_id): Path<String>,
) -> Result<Json<StudentView>, ServerError> {
    let student = state.engine.student(&student_id).await?;
    Ok(Json(view(student)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(student_id): Path<String>,
    Json(payload): Json<StudentUpdate>,
) -> Result<Json<StudentView>, ServerError> {
    let mut update = engine::StudentUpdate::new();
    if let Some(name) = payload.name {
        update = update.name(name);
    }
    if let Some(student_number) = payload.student_number {
        update = update.student_number(student_number);
    }
    if let Some(points) = payload.points {
        update = update.points(points);
    }
    if let Some(class_id) = payload.class_id {
        update = update.class_id(class_id);
    }

    let student = state.engine.update_student(&student_id, update).await?;
    Ok(Json(view(student)))
}

pub async fn adjust_points(
    State(state): State<ServerState>,
    Path(student_id): Path<String>,
    Json(payload): Json<PointsAdjust>,
) -> Result<Json<StudentView>, ServerError> {
    let student = state.engine.adjust_points(&student_id, payload.delta).await?;
    Ok(Json(view(student)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(student_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_student(&student_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
