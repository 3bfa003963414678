//! # ab-api
//!
//! The web routing and orchestration layer for anonboard.

pub mod error;
pub mod handlers;
pub mod input;
pub mod middleware;
pub mod pages;

pub use error::ApiError;
pub use handlers::AppState;

use actix_web::web;

/// Configures the JSON API and the page routes.
///
/// # Developer Note
/// Each API resource answers four methods on one path; the board segment
/// is only used to build redirect targets.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(input::json_config())
            .app_data(input::form_config())
            .app_data(input::query_config())
            .service(
                web::resource("/threads/{board}")
                    .route(web::post().to(handlers::create_thread))
                    .route(web::get().to(handlers::list_threads))
                    .route(web::put().to(handlers::report_thread))
                    .route(web::delete().to(handlers::delete_thread)),
            )
            .service(
                web::resource("/replies/{board}")
                    .route(web::post().to(handlers::create_reply))
                    .route(web::get().to(handlers::get_thread))
                    .route(web::put().to(handlers::report_reply))
                    .route(web::delete().to(handlers::delete_reply)),
            ),
    )
    // The "Board View" (e.g., /b/general)
    .route("/b/{board}", web::get().to(pages::board))
    .route("/b/{board}/", web::get().to(pages::board))
    // The "Thread View" (e.g., /b/general/0190...)
    .route("/b/{board}/{thread_id}", web::get().to(pages::thread))
    .route("/", web::get().to(pages::index));
}
