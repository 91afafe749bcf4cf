//! Wiring & DI. Entry point: bootstrap the cache adapter, inject into services, run UI.
//! No calendar logic here; lookups and rebuilds are delegated to CalendarService.

use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use temporal_cache::adapters::persistence::{JsonFileCache, MemoryCache, SqliteCache};
use temporal_cache::adapters::ui::tui::TuiInputPort;
use temporal_cache::domain::KeySpace;
use temporal_cache::ports::{CachePort, InputPort};
use temporal_cache::shared::config::{AppConfig, CacheBackend};
use temporal_cache::usecases::CalendarService;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load()?;
    let builder_config = match cfg.builder_config() {
        Ok(c) => c,
        Err(e) => anyhow::bail!(
            "Invalid TEMPORAL_EPOCH_YEAR / TEMPORAL_END_YEAR / TEMPORAL_START_OF_WEEK: {}",
            e
        ),
    };
    temporal_cache::adapters::ui::init_ui(&builder_config);

    let backend = cfg.cache_backend().map_err(|e| anyhow::anyhow!("{}", e))?;
    let keys = KeySpace::new(cfg.namespace_or_default());

    let data_path = PathBuf::from(cfg.data_dir_or_default());
    info!(
        backend = ?backend,
        namespace = keys.namespace(),
        epoch_year = builder_config.epoch_year(),
        end_year = builder_config.end_year(),
        path = %data_path.display(),
        "calendar cache configuration"
    );

    // --- Cache adapter ---
    let cache: Arc<dyn CachePort> = match backend {
        CacheBackend::Memory => Arc::new(MemoryCache::new()),
        CacheBackend::Json => {
            let json = JsonFileCache::new(data_path.join("calendar.json"));
            json.load().await.map_err(|e| anyhow::anyhow!("{}", e))?;
            Arc::new(json)
        }
        CacheBackend::Sqlite => Arc::new(
            SqliteCache::connect(&data_path)
                .await
                .map_err(|e| anyhow::anyhow!("SQLite connect failed: {}", e))?,
        ),
    };

    // --- Services ---
    let calendar = Arc::new(CalendarService::new(
        cache,
        keys,
        builder_config,
        cfg.lookup_mode(),
    ));

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(Arc::clone(&calendar)));

    // --- Run (main menu -> rebuild / lookups) ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
