use axum::{
    middleware,
    routing::{get, post},
    Router,
};

mod auth;
mod health;
mod middleware_auth;
mod tasks;
mod todos;

pub use health::health;

use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let task_router = Router::new()
        .route("/", post(tasks::routes::create).get(tasks::routes::list))
        .route(
            "/{id}",
            get(tasks::routes::get)
                .put(tasks::routes::update)
                .patch(tasks::routes::partial_update)
                .delete(tasks::routes::delete),
        )
        .route("/{id}/todos", get(tasks::routes::todos));

    let todo_router = Router::new()
        .route("/", post(todos::routes::create).get(todos::routes::list))
        .route(
            "/{id}",
            get(todos::routes::get)
                .put(todos::routes::update)
                .patch(todos::routes::partial_update)
                .delete(todos::routes::delete),
        )
        .route("/{id}/toggle_complete", post(todos::routes::toggle_complete));

    // everything behind require_auth; register/login are merged in afterwards
    // so they stay reachable without a token
    let protected = Router::new()
        .route("/auth/validate", get(auth::validate))
        .nest("/tasks", task_router)
        .nest("/todos", todo_router)
        .layer(middleware::from_fn_with_state(
            state,
            middleware_auth::require_auth,
        ));

    let api = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api", api)
}

async fn root() -> &'static str {
    "Welcome to the Todo API written in Rust"
}
