use crate::handler::PosterHandler;
use actix_web::{http::StatusCode, web, App, HttpResponse, HttpServer};
use serde_json::{json, Value};

async fn create_poster(handler: web::Data<PosterHandler>, event: web::Json<Value>) -> HttpResponse {
    let response = handler.respond(&event).await;
    let status = StatusCode::from_u16(response.status_code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(response)
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/posters", web::post().to(create_poster))
        .route("/health", web::get().to(health));
}

pub async fn serve(handler: PosterHandler, port: u16) -> std::io::Result<()> {
    log::info!("🌐 Server will run on http://0.0.0.0:{}", port);
    let data = web::Data::new(handler);

    HttpServer::new(move || App::new().app_data(data.clone()).configure(configure))
        .bind(("0.0.0.0", port))?
        .run()
        .await
}
