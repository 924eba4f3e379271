use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use s3_providers::config;
use s3_providers::drivers;
use s3_providers::provider::{self, registry};
use s3_providers::storage::DEFAULT_MAX_KEYS;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "s3_providers=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("s3-providers {}", env!("CARGO_PKG_VERSION"));

    for d in registry::descriptors() {
        tracing::info!(
            "Provider {}: {} (default region {})",
            d.id, d.endpoint_template(), d.default_region
        );
    }

    // Load configuration / 加载配置
    let app_config = config::load_config(&config::get_config_path()).map_err(anyhow::Error::msg)?;
    let storage_config = app_config.storage.clone().with_env_credentials();

    let resolved = provider::resolve_request(&storage_config.resolve_request())?;
    println!("{}", serde_json::to_string_pretty(&resolved)?);

    if !storage_config.has_credentials() {
        tracing::warn!("No credentials configured for {}, skipping storage calls", storage_config.provider);
        return Ok(());
    }

    let storage = drivers::create_storage(&storage_config)?;

    let buckets = storage.list_buckets().await?;
    tracing::info!("Found {} buckets", buckets.len());
    for name in &buckets {
        println!("  - {}", name);
    }

    if !app_config.demo.bucket.is_empty() {
        let objects = storage
            .list_objects(&app_config.demo.bucket, &app_config.demo.prefix, DEFAULT_MAX_KEYS)
            .await?;
        for obj in objects {
            println!("  - {} ({} bytes)", obj.key, obj.size);
        }
    }

    Ok(())
}
