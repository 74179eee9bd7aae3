use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use sqlx::PgPool;

use tasktrack::auth::{AuthMiddleware, TokenKeys};
use tasktrack::config::Config;
use tasktrack::routes;
use tasktrack::routes::health;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // The signing secret is read exactly once, here; everything downstream
    // receives the derived keys explicitly.
    let keys = TokenKeys::new(&config.jwt_secret, config.token_ttl_minutes);

    log::info!("Starting tasktrack server at {}", config.server_url());

    let cors_origins = config.cors_origins.clone();
    let server_pool = pool;
    let server_keys = keys;
    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);
        for origin in &cors_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .app_data(web::Data::new(server_pool.clone()))
            .app_data(web::Data::new(server_keys.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(server_keys.clone()))
                    .configure(routes::config),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
