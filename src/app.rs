use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::AppConfig;

pub fn run() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log.filter.as_str()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    actix_web::rt::System::new().block_on(async move {
        let server = crate::infrastructure::bootstrap::setup(&config)?;
        server.await
    })
}
