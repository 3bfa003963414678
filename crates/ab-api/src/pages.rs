//! Static HTML shells for the redirect targets. The pages themselves talk to
//! the JSON API; nothing is rendered server-side.

use actix_files::NamedFile;
use actix_web::web;

use crate::handlers::AppState;

async fn view(data: &AppState, file: &str) -> actix_web::Result<NamedFile> {
    Ok(NamedFile::open_async(data.views_dir.join(file)).await?)
}

/// `/`
pub async fn index(data: web::Data<AppState>) -> actix_web::Result<NamedFile> {
    view(&data, "index.html").await
}

/// `/b/{board}`
pub async fn board(data: web::Data<AppState>, _board: web::Path<String>) -> actix_web::Result<NamedFile> {
    view(&data, "board.html").await
}

/// `/b/{board}/{thread_id}`
pub async fn thread(
    data: web::Data<AppState>,
    _path: web::Path<(String, String)>,
) -> actix_web::Result<NamedFile> {
    view(&data, "thread.html").await
}
