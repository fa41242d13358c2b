pub mod controller;
pub mod links;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};
use serde_json::json;

use store::BookStore;

/// Shared state handed to every books handler
#[derive(Clone)]
pub struct BooksState {
    pub store: Arc<dyn BookStore>,
    /// Path the collection is mounted under, used for hypermedia links
    pub base_path: String,
}

impl BooksState {
    pub fn new(store: Arc<dyn BookStore>, base_path: impl Into<String>) -> Self {
        Self {
            store,
            base_path: base_path.into(),
        }
    }
}

/// Books module: CRUD over the `books` collection
pub struct BooksModule {
    state: BooksState,
}

impl BooksModule {
    pub const NAME: &'static str = "books";

    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self {
            state: BooksState::new(store, bookshelf_http::router::module_prefix(Self::NAME)),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            backend = ?ctx.settings.database.backend,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), base_path = %self.state.base_path, "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(store: Arc<dyn BookStore>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}

fn error_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn book_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Book" }
            }
        }
    })
}

fn changes_body() -> serde_json::Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/BookChanges" }
            }
        }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let id_param = json!({
        "name": "id",
        "in": "path",
        "required": true,
        "description": "Book identifier (24 hex characters)",
        "schema": { "type": "string" }
    });

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "parameters": [{
                        "name": "genre",
                        "in": "query",
                        "required": false,
                        "description": "Exact-match genre filter",
                        "schema": { "type": "string" }
                    }],
                    "responses": {
                        "200": {
                            "description": "List of books",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            }
                        },
                        "404": error_response("Store error")
                    }
                },
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/NewBook" }
                            },
                            "application/x-www-form-urlencoded": {
                                "schema": { "$ref": "#/components/schemas/NewBook" }
                            }
                        }
                    },
                    "responses": {
                        "201": book_response("Book created"),
                        "422": error_response("Invalid book payload"),
                        "500": error_response("Store error")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Show a book",
                    "tags": ["Books"],
                    "parameters": [id_param.clone()],
                    "responses": {
                        "200": book_response("The book"),
                        "404": { "description": "Book not found" },
                        "500": error_response("Store error")
                    }
                },
                "put": {
                    "summary": "Overwrite the provided fields of a book",
                    "tags": ["Books"],
                    "parameters": [id_param.clone()],
                    "requestBody": changes_body(),
                    "responses": {
                        "200": book_response("Book updated"),
                        "400": error_response("Body carries a different identifier"),
                        "404": { "description": "Book not found" },
                        "500": error_response("Store error")
                    }
                },
                "patch": {
                    "summary": "Partially update a book; the identifier is ignored",
                    "tags": ["Books"],
                    "parameters": [id_param.clone()],
                    "requestBody": changes_body(),
                    "responses": {
                        "200": book_response("Book updated"),
                        "404": { "description": "Book not found" },
                        "500": error_response("Store error")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [id_param],
                    "responses": {
                        "204": { "description": "Book removed" },
                        "404": { "description": "Book not found" },
                        "500": error_response("Store error")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "_id": { "type": "string", "description": "Unique identifier for the book" },
                        "title": { "type": "string", "description": "Title of the book" },
                        "author": { "type": "string", "description": "Author of the book" },
                        "genre": { "type": "string", "description": "Genre of the book" },
                        "read": { "type": "boolean", "description": "Whether the book has been read" },
                        "links": {
                            "type": "object",
                            "properties": {
                                "self": { "type": "string" },
                                "filter_by_genre": { "type": "string" }
                            }
                        }
                    },
                    "required": ["_id", "title", "author", "genre", "read"]
                },
                "NewBook": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "genre": { "type": "string" },
                        "read": { "type": "boolean", "default": false }
                    },
                    "required": ["title", "author", "genre"]
                },
                "BookChanges": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "genre": { "type": "string" },
                        "read": { "type": "boolean" },
                        "_id": { "type": "string", "description": "Must match the path identifier on PUT; ignored on PATCH" }
                    }
                }
            }
        }
    })
}
