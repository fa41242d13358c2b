//! Resolves the `{id}` path segment into a loaded book.

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use bookshelf_http::error::AppError;
use mongodb::bson::oid::ObjectId;

use super::{models::Book, BooksState};

/// Book loaded for the current request, read by handlers through
/// `Extension<ResolvedBook>`.
#[derive(Debug, Clone)]
pub struct ResolvedBook(pub Book);

/// Loads the book named by the path or ends the request.
///
/// Store failures answer 500; unknown or malformed identifiers answer a bare 404.
pub async fn resolve_book(
    State(state): State<BooksState>,
    Path(id): Path<String>,
    mut request: Request,
    next: Next,
) -> Response {
    // A malformed id cannot name a stored book, so it answers like an
    // unknown one rather than as a store failure.
    let Ok(object_id) = ObjectId::parse_str(&id) else {
        tracing::debug!(%id, "book identifier is not an ObjectId");
        return StatusCode::NOT_FOUND.into_response();
    };

    match state.store.find_by_id(&object_id).await {
        Err(err) => {
            tracing::error!(%id, error = %err, "failed to load book");
            AppError::store(err).into_response()
        }
        Ok(None) => {
            tracing::debug!(%id, "book not found");
            StatusCode::NOT_FOUND.into_response()
        }
        Ok(Some(book)) => {
            request.extensions_mut().insert(ResolvedBook(book));
            next.run(request).await
        }
    }
}
