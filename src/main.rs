use dotenvy::dotenv;
use storefront_service::config::Config;
use storefront_service::{build_server, create_pool, run_migrations, AppServices};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if dotenv().is_err() {
        eprintln!("No .env file found, using system environment variables instead");
    }
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().expect("Invalid configuration");
    log::info!(
        "Configuration loaded: database {}:{}/{}",
        config.database.host,
        config.database.port,
        config.database.name
    );

    let pool = create_pool(&config.database.connection_string())
        .expect("Failed to connect to the database");
    run_migrations(&pool).expect("Failed to run database migrations");

    let services =
        AppServices::from_config(&config, pool).expect("Failed to build application services");

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(services, &config.host, config.port)?.await
}
