use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use sqlx::PgPool;

use taskdeck::auth::{AuthMiddleware, TokenCodec};
use taskdeck::config::Config;
use taskdeck::error::AppError;
use taskdeck::routes;
use taskdeck::routes::health;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    // Fails fast on missing DATABASE_URL or JWT_SECRET; the signing secret
    // has no default.
    let config = Config::from_env();
    let codec = TokenCodec::new(&config.jwt_secret, config.token_ttl_minutes);

    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    log::info!("Starting Taskdeck server at {}", config.server_url());

    let bind_addr = (config.server_host.clone(), config.server_port);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(codec.clone()))
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::BadRequest(err.to_string()).into()
            }))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(codec.clone()))
                    .configure(routes::config),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
