// src/routes.rs

use axum::{
    Router, http::Method, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, chapter, course, quiz, review},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, courses, chapters, quizzes, reviews).
/// * Everything except register/login sits behind the bearer middleware.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let quiz_routes = Router::new()
        .route("/", post(quiz::create_quiz).get(quiz::list_quizzes))
        .route("/{quiz_id}", get(quiz::get_quiz).delete(quiz::delete_quiz));

    let course_routes = Router::new()
        .route("/", post(course::create_course))
        .route(
            "/{course_id}",
            get(course::get_course).patch(course::update_course),
        )
        .route("/{course_id}/publish", post(course::publish_course))
        .route("/{course_id}/chapters", post(chapter::create_chapter))
        .route(
            "/{course_id}/chapters/{chapter_id}",
            get(chapter::get_chapter),
        )
        .route("/{course_id}/reviews", get(review::list_reviews))
        .nest("/{course_id}/chapters/{chapter_id}/quizzes", quiz_routes);

    let review_routes = Router::new().route("/", post(review::create_review));

    let protected = Router::new()
        .nest("/courses", course_routes)
        .nest("/reviews", review_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/auth", auth_routes)
        .merge(protected)
        // Global middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
