use see_core::{init_tracing, SeeConfig};
use see_data::MemoryDataProvider;
use see_demo::config::{DatabaseConfig, ProviderKind, ServerConfig};
use see_demo::serve;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();

    let config = SeeConfig::load("dev")?;
    let database: DatabaseConfig = config.section()?;
    let server: ServerConfig = config.section()?;
    tracing::info!(profile = config.profile(), provider = %database.provider, "starting see-demo");

    match database.provider {
        ProviderKind::Memory => serve(MemoryDataProvider::new(), database.provider, &server).await,
        #[cfg(feature = "sqlite")]
        ProviderKind::Sqlite => {
            let provider = see_data_sqlx::SqlxDataProvider::<sqlx::Sqlite>::connect(
                &database.url,
                database.max_connections,
            )
            .await?;
            serve(provider, database.provider, &server).await
        }
        #[cfg(feature = "postgres")]
        ProviderKind::Postgres => {
            let provider = see_data_sqlx::SqlxDataProvider::<sqlx::Postgres>::connect(
                &database.url,
                database.max_connections,
            )
            .await?;
            serve(provider, database.provider, &server).await
        }
        #[cfg(feature = "mysql")]
        ProviderKind::MySql => {
            let provider = see_data_sqlx::SqlxDataProvider::<sqlx::MySql>::connect(
                &database.url,
                database.max_connections,
            )
            .await?;
            serve(provider, database.provider, &server).await
        }
        #[allow(unreachable_patterns)]
        other => Err(see_demo::provider_unavailable(other).into()),
    }
}
