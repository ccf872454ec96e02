use axum::{
    Router,
    routing::{get, patch, post},
};

use std::sync::Arc;

use crate::{classes, products, purchases, students};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

pub fn router(engine: Arc<Engine>) -> Router {
    let state = ServerState { engine };

    Router::new()
        .route("/classes", post(classes::create).get(classes::list))
        .route(
            "/classes/{id}",
            get(classes::get).patch(classes::update).delete(classes::remove),
        )
        .route("/classes/{id}/students", get(students::list_by_class))
        .route("/classes/{id}/products", get(products::list_by_class))
        .route("/classes/{id}/records", get(purchases::list_by_class))
        .route("/students", post(students::create).get(students::list))
        .route(
            "/students/{id}",
            get(students::get)
                .patch(students::update)
                .delete(students::remove),
        )
        .route("/students/{id}/points", post(students::adjust_points))
        .route("/products", post(products::create))
        .route(
            "/products/{id}",
            get(products::get)
                .patch(products::update)
                .delete(products::remove),
        )
        .route("/purchases", post(purchases::create))
        .route("/records/{id}", get(purchases::get))
        .route("/records/{id}/shipping", patch(purchases::update_shipping))
        .with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(Arc::new(engine))).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
