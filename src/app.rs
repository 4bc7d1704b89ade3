use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, post, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/meals", post(handlers::meal_form))
        .route("/meals/:id/delete", post(handlers::delete_meal_form))
        .route("/workouts", post(handlers::workout_form))
        .route("/workouts/:id/delete", post(handlers::delete_workout_form))
        .route("/limit", post(handlers::limit_form))
        .route("/reset", post(handlers::reset_form))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/meals", get(handlers::list_meals).post(handlers::create_meal))
        .route("/api/meals/:id", delete(handlers::delete_meal))
        .route("/api/workouts", get(handlers::list_workouts).post(handlers::create_workout))
        .route("/api/workouts/:id", delete(handlers::delete_workout))
        .route("/api/limit", put(handlers::put_limit))
        .route("/api/reset", post(handlers::reset))
        .with_state(state)
}
