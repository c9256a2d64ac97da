//! Minimal waypost host: a hyper-util accept loop with graceful shutdown
//! driving a small JSON API.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl -i http://localhost:3000/users/42
//!   curl -I http://localhost:3000/users/42
//!   curl -i -X POST http://localhost:3000/users -d '{"name":"alice"}'
//!   curl -i -X DELETE http://localhost:3000/users/42
//!   curl -i http://localhost:3000/healthz

use std::net::SocketAddr;

use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::{error, info};
use waypost::{Captures, Context, HandlerResult, Json, Matcher, Router, StatusCode};

const ADDR: &str = "127.0.0.1:3000";

#[derive(Serialize)]
struct User {
    id: String,
    name: &'static str,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let app = Router::builder()
        .get(Matcher::pattern(r"^/users/(\d+)$")?, get_user)
        .post("/users", create_user)
        .delete(Matcher::pattern(r"^/users/(\d+)$")?, delete_user)
        .get("/healthz", |cx: &mut Context, _: Captures| {
            cx.set_header("Content-Type", "text/plain");
            "ok"
        })
        .build();

    let addr: SocketAddr = ADDR.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "waypost demo listening");

    let mut tasks = tokio::task::JoinSet::new();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                break;
            }

            res = listener.accept() => {
                let (stream, peer) = match res {
                    Ok(v) => v,
                    Err(e) => {
                        error!("accept error: {e}");
                        continue;
                    }
                };

                let app = app.clone();
                tasks.spawn(async move {
                    if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                        .serve_connection(TokioIo::new(stream), app)
                        .await
                    {
                        error!(%peer, "connection error: {e}");
                    }
                });
            }

            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
        }
    }

    while tasks.join_next().await.is_some() {}
    info!("waypost demo stopped");
    Ok(())
}

// GET /users/:id → JSON encoded from a serde type
fn get_user(_cx: &mut Context, args: Captures) -> Json<User> {
    let id = args.get(0).unwrap_or("unknown").to_owned();
    Json(User { id, name: "alice" })
}

// POST /users → echoes the body back as JSON with 201
fn create_user(cx: &mut Context, _: Captures) -> HandlerResult {
    if cx.request().body().is_empty() {
        cx.set_header("Content-Type", "text/plain");
        return HandlerResult::text("missing body").with_status(StatusCode::BAD_REQUEST);
    }

    let body = String::from_utf8_lossy(cx.request().body()).into_owned();
    cx.set_header("Location", "/users/99");
    HandlerResult::text(body).with_status(StatusCode::CREATED)
}

// DELETE /users/:id → 204 No Content
fn delete_user(cx: &mut Context, _: Captures) -> HandlerResult {
    cx.set_header("Content-Type", "text/plain");
    HandlerResult::chunks(Vec::<bytes::Bytes>::new()).with_status(StatusCode::NO_CONTENT)
}
