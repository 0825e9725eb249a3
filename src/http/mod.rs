//! HTTP API for the mobile client
//!
//! tiny_http server with a fixed pool of worker threads pulling from one
//! listener. Every route except the public ones needs
//! `Authorization: Bearer <access token>`.

mod handlers;
mod routes;
mod types;

pub use routes::Route;

use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use anyhow::{anyhow, Result};
use tiny_http::{Header, Request, Response, Server};
use tracing::{debug, error, info, warn};

use crate::auth::AuthService;
use crate::error::BowoError;
use crate::service::ProgressService;
use handlers::{error_body, handle};

/// Everything a request handler needs
pub struct HttpState {
    pub progress: ProgressService,
    pub auth: AuthService,
    pub max_body_bytes: usize,
}

pub struct HttpServer {
    addr: String,
    server: Arc<Server>,
    state: Arc<HttpState>,
    workers: usize,
    shutting_down: Arc<AtomicBool>,
}

impl HttpServer {
    pub fn bind(addr: &str, state: HttpState, workers: usize) -> Result<Self> {
        let server = Server::http(addr).map_err(|e| anyhow!("Failed to bind {}: {}", addr, e))?;
        Ok(Self {
            addr: addr.to_string(),
            server: Arc::new(server),
            state: Arc::new(state),
            workers: workers.max(1),
            shutting_down: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Bound port (useful when binding port 0)
    pub fn port(&self) -> Option<u16> {
        self.server.server_addr().to_ip().map(|addr| addr.port())
    }

    /// Start the worker threads
    pub fn spawn(&self) -> Vec<JoinHandle<()>> {
        info!(
            "[bowo:http] Listening on http://{} with {} workers",
            self.addr,
            self.workers
        );

        (0..self.workers)
            .map(|n| {
                let server = Arc::clone(&self.server);
                let state = Arc::clone(&self.state);
                let shutting_down = Arc::clone(&self.shutting_down);
                thread::Builder::new()
                    .name(format!("bowo-http-{n}"))
                    .spawn(move || worker_loop(&server, &state, &shutting_down))
            })
            .filter_map(|spawned| match spawned {
                Ok(handle) => Some(handle),
                Err(e) => {
                    error!("[bowo:http] Failed to start worker: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Wake every worker and make it exit
    pub fn shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
        for _ in 0..self.workers {
            self.server.unblock();
        }
    }
}

fn worker_loop(server: &Server, state: &HttpState, shutting_down: &AtomicBool) {
    loop {
        match server.recv() {
            Ok(request) => handle_request(state, request),
            Err(e) => {
                if shutting_down.load(Ordering::SeqCst) {
                    break;
                }
                error!("[bowo:http] Failed to receive request: {}", e);
            }
        }
        if shutting_down.load(Ordering::SeqCst) {
            break;
        }
    }
}

fn handle_request(state: &HttpState, mut request: Request) {
    let started = Instant::now();
    let method = request.method().to_string();
    let url = request.url().to_string();
    let path = url.split('?').next().unwrap_or(url.as_str()).to_string();

    let Some(route) = Route::parse(&method, &path) else {
        respond(request, 404, &serde_json::json!({ "error": "not_found", "details": path }));
        return;
    };

    let user_id = if route.is_public() {
        None
    } else {
        match bearer_token(&request).map(|token| state.auth.authenticate(&token)) {
            Some(Ok(user_id)) => Some(user_id),
            Some(Err(e)) if e.is_internal() => {
                error!("[bowo:http] Session lookup failed: {}", e);
                respond(request, e.status_code(), &error_body(&e));
                return;
            }
            _ => {
                let e = BowoError::Unauthorized;
                respond(request, e.status_code(), &error_body(&e));
                return;
            }
        }
    };

    let body = match read_request_body(&mut request, state.max_body_bytes) {
        Ok(body) => body,
        Err(status) => {
            let code = if status == 413 { "payload_too_large" } else { "bad_request" };
            respond(request, status, &serde_json::json!({ "error": code }));
            return;
        }
    };

    let (status, value) = match handle(state, route, user_id.as_deref(), &body) {
        Ok(reply) => (reply.status, reply.body),
        Err(e) => {
            if e.is_internal() {
                error!("[bowo:http] {} {} failed: {}", method, path, e);
            } else {
                warn!("[bowo:http] {} {} rejected: {}", method, path, e);
            }
            (e.status_code(), error_body(&e))
        }
    };

    debug!(
        "[bowo:http] {} {} -> {} in {:?}",
        method,
        path,
        status,
        started.elapsed()
    );
    respond(request, status, &value);
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Authorization"))
        .and_then(|h| {
            let value = h.value.as_str().trim();
            value
                .strip_prefix("Bearer ")
                .or_else(|| value.strip_prefix("bearer "))
                .map(|token| token.trim().to_string())
        })
        .filter(|token| !token.is_empty())
}

/// Body as UTF-8, or the status to answer with
fn read_request_body(request: &mut Request, max_bytes: usize) -> Result<String, u16> {
    let mut body = String::new();
    let mut reader = request.as_reader().take((max_bytes + 1) as u64);
    if let Err(e) = reader.read_to_string(&mut body) {
        warn!("[bowo:http] Failed to read body: {}", e);
        return Err(400);
    }
    if body.len() > max_bytes {
        return Err(413);
    }
    Ok(body)
}

fn json_content_type() -> Option<Header> {
    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).ok()
}

fn respond(request: Request, status: u16, value: &serde_json::Value) {
    let body =
        serde_json::to_string(value).unwrap_or_else(|_| "{\"error\":\"serialize\"}".to_string());
    let mut response = Response::from_string(body).with_status_code(status);
    if let Some(header) = json_content_type() {
        response = response.with_header(header);
    }
    if let Err(e) = request.respond(response) {
        debug!("[bowo:http] Client went away: {}", e);
    }
}
