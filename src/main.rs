use std::sync::Arc;

use anyhow::Context;
use bookrent_app::modules;
use bookrent_kernel::{settings::Settings, InitCtx, ModuleRegistry};
use bookrent_ledger::{Catalog, RentalDesk};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load bookrent settings")?;
    bookrent_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        catalog = %settings.catalog.path.display(),
        "bookrent bootstrap starting"
    );

    let catalog = Catalog::load_or_empty(&settings.catalog.path);
    let desk = Arc::new(RentalDesk::new(catalog));

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, desk);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    tracing::info!("bookrent bootstrap complete");

    let served = bookrent_http::start_server(&registry, &settings).await;
    registry.stop_modules().await?;
    served
}
