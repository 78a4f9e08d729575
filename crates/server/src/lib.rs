//! HTTP and WebSocket transport.
//!
//! Exposes the game over a single actix-web app: a health probe and the
//! `/play` WebSocket upgrade. All game traffic flows through the [`Lobby`],
//! which bridges sockets to the room task.

mod lobby;

pub use lobby::Lobby;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use anyhow::Context;

/// Listen address when BIND_ADDR is unset: fixed port, all interfaces.
const DEFAULT_BIND: &str = "0.0.0.0:3000";

async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

async fn play(lobby: web::Data<Lobby>, body: web::Payload, req: HttpRequest) -> impl Responder {
    match actix_ws::handle(&req, body) {
        Ok((response, session, stream)) => {
            lobby.bridge(session, stream);
            response.map_into_left_body()
        }
        Err(e) => HttpResponse::InternalServerError()
            .body(e.to_string())
            .map_into_right_body(),
    }
}

pub async fn run() -> anyhow::Result<()> {
    let lobby = web::Data::new(Lobby::open());
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    log::info!("starting game server on {}", addr);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(lobby.clone())
            .route("/health", web::get().to(health))
            .route("/play", web::get().to(play))
    })
    .workers(2)
    .bind(&addr)
    .with_context(|| format!("bind {}", addr))?
    .run()
    .await
    .context("server runtime")
}
