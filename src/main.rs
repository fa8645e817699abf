use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

mod balance;
mod db;
mod error;
mod routes;
mod schemas;
mod settings;
mod trips;

use db::TripStore;
use settings::Settings;

fn cors(origin: Option<&str>) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allow_any_header();
    match origin {
        Some(origin) => cors.allowed_origin(origin).supports_credentials(),
        None => cors.allow_any_origin(),
    }
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tripsplit={level},actix_web={level}",
            level = settings.log_level
        ))
        .init();

    let client = db::connect(&settings.mongodb_uri).await?;
    let store = web::Data::new(TripStore::new(client, &settings.database));

    let cors_origin = settings.cors_origin.clone();
    tracing::info!("Server running on {}:{}", settings.bind, settings.port);

    HttpServer::new(move || {
        App::new()
            .wrap(cors(cors_origin.as_deref()))
            .wrap(Logger::default())
            .app_data(store.clone())
            .configure(routes::configure)
    })
    .bind((settings.bind.as_str(), settings.port))?
    .run()
    .await?;

    Ok(())
}
