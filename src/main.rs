use std::sync::Arc;

use moviemate_api::{
    config::Config,
    db::{self, InMemoryUserRepository, PgUserRepository, UserRepository},
    routes::{create_router, AppState},
    services::{
        providers::{MetadataProvider, TmdbProvider},
        PosterStorage, S3PosterStorage,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("moviemate_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let provider: Arc<dyn MetadataProvider> = Arc::new(TmdbProvider::from_config(&config)?);

    let posters: Arc<dyn PosterStorage> = Arc::new(S3PosterStorage::from_config(&config)?);

    let users: Arc<dyn UserRepository> = match &config.database_url {
        Some(database_url) => {
            let pool = db::create_pool(database_url).await?;
            db::postgres::migrate(&pool).await?;
            Arc::new(PgUserRepository::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, user profiles will not survive a restart");
            Arc::new(InMemoryUserRepository::new())
        }
    };

    let state = Arc::new(AppState::new(
        provider,
        users,
        posters,
        config.recommendation_limit,
        config.max_recommendation_limit,
    ));
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
