//! # ab-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the `BoardService`.
//! Request bodies are accepted as JSON or as urlencoded forms; absent fields
//! arrive as empty strings and are rejected by the service. Bodies that do
//! not extract at all are answered by the handlers in [`crate::input`].

use std::path::PathBuf;
use std::sync::Arc;

use ab_core::service::BoardService;
use ab_core::traits::ThreadRepo;
use actix_web::http::header::{self, ContentType};
use actix_web::http::Method;
use actix_web::{web, Either, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::error::ApiError;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub board: BoardService,
    /// Where the HTML shells for `/` and `/b/...` live
    pub views_dir: PathBuf,
}

impl AppState {
    pub fn new(repo: Arc<dyn ThreadRepo>, views_dir: impl Into<PathBuf>) -> Self {
        Self {
            board: BoardService::new(repo),
            views_dir: views_dir.into(),
        }
    }
}

pub const POST_THREAD_FAILED: &str = "Error posting thread";
pub const FETCH_THREADS_FAILED: &str = "Error fetching threads";
pub const UPDATE_THREAD_FAILED: &str = "Error updating thread";
pub const DELETE_THREAD_FAILED: &str = "Error deleting thread";
pub const POST_REPLY_FAILED: &str = "Error posting reply";
pub const FETCH_REPLIES_FAILED: &str = "Error fetching replies";
pub const UPDATE_REPLY_FAILED: &str = "Error updating reply";
pub const DELETE_REPLY_FAILED: &str = "Error deleting reply";

/// The failure message of the API operation a request addresses.
pub fn operation_failure(req: &HttpRequest) -> &'static str {
    let replies = req.path().starts_with("/api/replies/");
    match (req.method(), replies) {
        (&Method::POST, false) => POST_THREAD_FAILED,
        (&Method::GET, false) => FETCH_THREADS_FAILED,
        (&Method::PUT, false) => UPDATE_THREAD_FAILED,
        (&Method::DELETE, false) => DELETE_THREAD_FAILED,
        (&Method::POST, true) => POST_REPLY_FAILED,
        (&Method::GET, true) => FETCH_REPLIES_FAILED,
        (&Method::PUT, true) => UPDATE_REPLY_FAILED,
        (&Method::DELETE, true) => DELETE_REPLY_FAILED,
        _ => "Error processing request",
    }
}

/// A request body in either of the encodings browsers and API clients send.
pub type Body<T> = Either<web::Json<T>, web::Form<T>>;

fn payload<T>(body: Body<T>) -> T {
    match body {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    }
}

fn plain(text: &'static str) -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::plaintext()).body(text)
}

fn redirect(location: String) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewThread {
    pub text: String,
    pub delete_password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ThreadRef {
    pub thread_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteThread {
    pub thread_id: String,
    pub delete_password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewReply {
    pub thread_id: String,
    pub text: String,
    pub delete_password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReplyRef {
    pub thread_id: String,
    pub reply_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteReply {
    pub thread_id: String,
    pub reply_id: String,
    pub delete_password: String,
}

// ── /api/threads/{board} ────────────────────────────────────────────────────

/// POST: starts a thread, then sends the client to the board page.
pub async fn create_thread(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: Body<NewThread>,
) -> Result<HttpResponse, ApiError> {
    let board = path.into_inner();
    let input = payload(body);

    data.board
        .create_thread(&board, &input.text, &input.delete_password)
        .await
        .map_err(ApiError::context(POST_THREAD_FAILED))?;

    Ok(redirect(format!("/b/{board}")))
}

/// GET: the ten most recently bumped threads, three newest replies each.
pub async fn list_threads(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let threads = data
        .board
        .recent_threads(&path.into_inner())
        .await
        .map_err(ApiError::context(FETCH_THREADS_FAILED))?;

    Ok(HttpResponse::Ok().json(threads))
}

/// PUT: flags a thread. Anyone may report.
pub async fn report_thread(
    data: web::Data<AppState>,
    body: Body<ThreadRef>,
) -> Result<HttpResponse, ApiError> {
    let input = payload(body);
    data.board
        .report_thread(&input.thread_id)
        .await
        .map_err(ApiError::context(UPDATE_THREAD_FAILED))?;

    Ok(plain("reported"))
}

/// DELETE: removes a thread when the password matches.
pub async fn delete_thread(
    data: web::Data<AppState>,
    body: Body<DeleteThread>,
) -> Result<HttpResponse, ApiError> {
    let input = payload(body);
    data.board
        .delete_thread(&input.thread_id, &input.delete_password)
        .await
        .map_err(ApiError::context(DELETE_THREAD_FAILED))?;

    Ok(plain("success"))
}

// ── /api/replies/{board} ────────────────────────────────────────────────────

/// POST: replies to a thread, bumping it, then sends the client to the thread page.
pub async fn create_reply(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: Body<NewReply>,
) -> Result<HttpResponse, ApiError> {
    let board = path.into_inner();
    let input = payload(body);

    data.board
        .create_reply(&input.thread_id, &input.text, &input.delete_password)
        .await
        .map_err(ApiError::context(POST_REPLY_FAILED))?;

    Ok(redirect(format!("/b/{board}/{}", input.thread_id)))
}

/// GET `?thread_id=`: the whole thread with every reply.
pub async fn get_thread(
    data: web::Data<AppState>,
    query: web::Query<ThreadRef>,
) -> Result<HttpResponse, ApiError> {
    let thread = data
        .board
        .thread_with_replies(&query.thread_id)
        .await
        .map_err(ApiError::context(FETCH_REPLIES_FAILED))?;

    Ok(HttpResponse::Ok().json(thread))
}

/// PUT: flags a reply. Anyone may report.
pub async fn report_reply(
    data: web::Data<AppState>,
    body: Body<ReplyRef>,
) -> Result<HttpResponse, ApiError> {
    let input = payload(body);
    data.board
        .report_reply(&input.thread_id, &input.reply_id)
        .await
        .map_err(ApiError::context(UPDATE_REPLY_FAILED))?;

    Ok(plain("reported"))
}

/// DELETE: redacts a reply's text when the password matches.
pub async fn delete_reply(
    data: web::Data<AppState>,
    body: Body<DeleteReply>,
) -> Result<HttpResponse, ApiError> {
    let input = payload(body);
    data.board
        .delete_reply(&input.thread_id, &input.reply_id, &input.delete_password)
        .await
        .map_err(ApiError::context(DELETE_REPLY_FAILED))?;

    Ok(plain("success"))
}
