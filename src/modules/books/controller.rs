//! Request handlers for the books collection.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use bookshelf_db::DbError;
use bookshelf_http::{
    error::{AppError, AppResult},
    extract::Payload,
};

use super::{
    links::LinkBuilder,
    middleware::ResolvedBook,
    models::{Book, BookChanges, BookFilter, BookResource, NewBook},
    BooksState,
};

/// `GET /` with an optional `genre` filter.
pub async fn index(
    State(state): State<BooksState>,
    Query(query): Query<BookFilter>,
    headers: HeaderMap,
) -> AppResult<Json<Vec<BookResource>>> {
    let filter = BookFilter::by_genre(query.genre);

    let books = state.store.find(&filter).await.map_err(|err| {
        tracing::error!(error = %err, "failed to list books");
        AppError::store_lookup(err)
    })?;

    let links = LinkBuilder::from_headers(&headers, &state.base_path);
    let resources = books
        .into_iter()
        .map(|book| {
            let book_links = links.for_book(&book);
            BookResource::from(book).with_links(book_links)
        })
        .collect();

    Ok(Json(resources))
}

/// `GET /{id}`
pub async fn show(
    State(state): State<BooksState>,
    headers: HeaderMap,
    Extension(ResolvedBook(book)): Extension<ResolvedBook>,
) -> Json<BookResource> {
    let links = LinkBuilder::from_headers(&headers, &state.base_path).for_book(&book);
    Json(BookResource::from(book).with_links(links))
}

/// `POST /`: responds once the book is persisted.
pub async fn create(
    State(state): State<BooksState>,
    Payload(new_book): Payload<NewBook>,
) -> AppResult<(StatusCode, Json<BookResource>)> {
    let book = state.store.save(Book::from(new_book)).await.map_err(|err| {
        tracing::error!(error = %err, "failed to create book");
        AppError::store(err)
    })?;

    tracing::info!(id = ?book.id, title = %book.title, "book created");
    Ok((StatusCode::CREATED, Json(BookResource::from(book))))
}

/// `PUT /{id}`: an `_id` differing from the path is rejected.
pub async fn update(
    State(state): State<BooksState>,
    Extension(ResolvedBook(book)): Extension<ResolvedBook>,
    Payload(changes): Payload<BookChanges>,
) -> AppResult<Json<BookResource>> {
    if let Some(supplied) = changes.conflicting_id(book.id.as_ref()) {
        return Err(AppError::bad_request(format!(
            "book identifier is immutable; body carries _id '{}'",
            supplied
        )));
    }

    persist_changes(&state, book, changes).await
}

/// `PATCH /{id}`: any `_id` in the body is ignored.
pub async fn patch_update(
    State(state): State<BooksState>,
    Extension(ResolvedBook(book)): Extension<ResolvedBook>,
    Payload(changes): Payload<BookChanges>,
) -> AppResult<Json<BookResource>> {
    persist_changes(&state, book, changes).await
}

/// `DELETE /{id}`
pub async fn destroy(
    State(state): State<BooksState>,
    Extension(ResolvedBook(book)): Extension<ResolvedBook>,
) -> AppResult<StatusCode> {
    let Some(id) = book.id else {
        return Err(AppError::Internal(anyhow::anyhow!(
            "resolved book has no identifier"
        )));
    };

    state.store.remove(&id).await.map_err(|err| {
        tracing::error!(%id, error = %err, "failed to remove book");
        AppError::store(err)
    })?;

    tracing::info!(%id, "book removed");
    Ok(StatusCode::NO_CONTENT)
}

async fn persist_changes(
    state: &BooksState,
    mut book: Book,
    changes: BookChanges,
) -> AppResult<Json<BookResource>> {
    changes.apply_to(&mut book);

    // A concurrent DELETE may have removed the book after it was resolved.
    let book = state.store.save(book).await.map_err(|err| match err {
        DbError::NotFound(id) => {
            tracing::warn!(%id, "book removed before update was saved");
            AppError::not_found(format!("book '{}' no longer exists", id))
        }
        err => {
            tracing::error!(error = %err, "failed to update book");
            AppError::store(err)
        }
    })?;

    tracing::info!(id = ?book.id, "book updated");
    Ok(Json(BookResource::from(book)))
}
