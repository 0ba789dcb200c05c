use actix_web::{web, App, HttpResponse, HttpServer};
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::env;

mod auth;
mod error;
mod fanout;
mod models;
mod policy;
mod routes;

use routes::webhooks::webhook_models::IdentityWebhookSecret;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let webhook_secret = IdentityWebhookSecret(
        env::var("IDENTITY_WEBHOOK_SECRET").expect("IDENTITY_WEBHOOK_SECRET must be set"),
    );
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to create pool");

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    log::info!("Server running at http://{}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(webhook_secret.clone()))
            .route("/", web::get().to(|| async { HttpResponse::Ok().body("Hello, this is the RFP pipeline backend.") }))
            .configure(routes::routes::users_configure)
            .configure(routes::routes::projects_configure)
            .configure(routes::routes::subtasks_configure)
            .configure(routes::routes::comments_configure)
            .configure(routes::routes::tags_configure)
            .configure(routes::routes::attributes_configure)
            .configure(routes::routes::notifications_configure)
            .configure(routes::routes::invitations_configure)
            .configure(routes::routes::webhooks_configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
