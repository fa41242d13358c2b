use anyhow::Context;
use bookshelf_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %bookshelf_db::connection_uri(&settings.database),
        backend = ?settings.database.backend,
        "bookshelf-app bootstrap starting"
    );

    bookshelf_app::serve(settings).await
}
