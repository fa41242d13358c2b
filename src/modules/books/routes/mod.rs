use axum::{middleware, routing::get, Router};

use super::{
    controller::{create, destroy, index, patch_update, show, update},
    middleware::resolve_book,
    BooksState,
};

/// Routes for the books collection, relative to the module prefix.
///
/// Item routes run behind [`resolve_book`], so handlers always receive a
/// loaded book.
pub fn router(state: BooksState) -> Router {
    let item_routes = Router::new()
        .route(
            "/{id}",
            get(show).put(update).patch(patch_update).delete(destroy),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), resolve_book));

    Router::new()
        .route("/", get(index).post(create))
        .merge(item_routes)
        .with_state(state)
}
