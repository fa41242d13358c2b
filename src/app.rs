//! Application wiring: store selection and server lifecycle.

use std::sync::Arc;

use anyhow::Context;
use bookshelf_kernel::{
    settings::{Settings, StoreBackend},
    InitCtx, ModuleRegistry,
};

use crate::modules::{
    self,
    books::store::{BookStore, MemoryBookStore, MongoBookStore},
};

/// Open the store selected by `database.backend`.
pub async fn open_store(settings: &Settings) -> anyhow::Result<Arc<dyn BookStore>> {
    match settings.database.backend {
        StoreBackend::Mongo => {
            let database = bookshelf_db::connect(&settings.database)
                .await
                .context("failed to connect to MongoDB")?;
            Ok(Arc::new(MongoBookStore::new(&database)))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory book store; data is lost on exit");
            Ok(Arc::new(MemoryBookStore::new()))
        }
    }
}

/// Registry with every project module registered against `store`.
pub fn build_registry(store: Arc<dyn BookStore>) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store);
    registry
}

/// Run the API until a shutdown signal arrives.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let store = open_store(&settings).await?;
    let registry = build_registry(store);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = bookshelf_http::start_server(&registry, &settings).await;

    registry.stop_modules().await?;
    served
}
