use color_eyre::eyre::{Result, WrapErr};
use offboard::{
    Backend, CredentialSource, DeletionContext, EnvCredentialSource, InMemoryPlatform,
    MemorySeed, OffboardService, PlatformConnector, ServiceSettings, SupabaseConnector,
};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;
    init_tracing()?;

    let settings = ServiceSettings::load().wrap_err("Failed to load service settings")?;

    // Platform credentials are read from the environment on every request.
    let credentials = EnvCredentialSource::new();

    match settings.backend {
        Backend::Supabase => {
            let mut http_client = reqwest::Client::builder();
            if let Some(timeout) = settings.platform_timeout() {
                http_client = http_client.timeout(timeout);
            }

            let connector = SupabaseConnector::new(http_client.build()?);
            serve(&settings, connector, credentials).await
        }
        Backend::Memory => {
            let platform = match &settings.memory_seed {
                Some(path) => {
                    let raw = std::fs::read_to_string(path)
                        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
                    let seed: MemorySeed =
                        serde_json::from_str(&raw).wrap_err("Memory seed is not valid JSON")?;
                    InMemoryPlatform::from_seed(seed)
                }
                None => InMemoryPlatform::new(),
            };

            tracing::warn!("Using the in-memory platform, nothing is persisted");
            serve(&settings, platform, credentials).await
        }
    }
}

async fn serve<P, C>(settings: &ServiceSettings, connector: P, credentials: C) -> Result<()>
where
    P: PlatformConnector + 'static,
    C: CredentialSource + 'static,
{
    let context = DeletionContext::new(
        connector,
        credentials,
        settings.schema.clone(),
        settings.privilege_policy(),
    );

    let listener = tokio::net::TcpListener::bind(&settings.bind_address)
        .await
        .wrap_err_with(|| format!("Failed to bind {}", settings.bind_address))?;
    tracing::info!("Starting offboard service...");

    OffboardService::new(context)
        .run_standalone(listener, settings.allowed_origins())
        .await?;

    Ok(())
}

pub fn init_tracing() -> Result<()> {
    let fmt_layer = fmt::layer().compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}
