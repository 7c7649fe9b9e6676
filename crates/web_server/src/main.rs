//! Main entry point for the trip finder server.
//! This crate wires the search endpoint into an actix-web application.

use actix_web::{App, HttpResponse, HttpServer, Result, middleware::Logger, web};
use web_handlers::search_campgrounds;

async fn api_hello() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Trip finder backend",
        "status": "running"
    })))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    log::info!("🚀 Starting trip finder server...");
    log::info!("🌐 Server will be available at: http://{}", bind_addr);

    HttpServer::new(|| {
        App::new()
            .wrap(Logger::default())
            .service(
                web::scope("/api")
                    .route("/hello", web::get().to(api_hello))
                    .route("/search", web::get().to(search_campgrounds)),
            )
            .route(
                "/health",
                web::get().to(|| async { HttpResponse::Ok().body("OK") }),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
