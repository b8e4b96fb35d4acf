//! Request logging middleware

use axum::extract::State;
use axum::{
    body::Body,
    http::{header::HeaderMap, Request, Response, StatusCode},
    middleware::Next,
    response::IntoResponse,
};
use std::time::Instant;
use tracing::{error, info};

#[derive(PartialEq, PartialOrd, Clone, Debug, Default, clap::ValueEnum)]
pub enum RequestsLoggingLevel {
    None,
    #[default]
    Path,
    Headers,
    Body,
}

impl std::fmt::Display for RequestsLoggingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

const MAX_LOGGABLE_BODY_LENGTH: usize = 1024;

enum ContentLength {
    Known(usize),
    Unknown(&'static str),
}

fn parse_content_length(headers: &HeaderMap) -> ContentLength {
    let value = match headers.get("content-length") {
        Some(x) => x,
        None => return ContentLength::Unknown("Content-length not set."),
    };
    let str_value = match value.to_str() {
        Ok(x) => x,
        Err(_) => return ContentLength::Unknown("Could not get Content-length string value."),
    };
    match str_value.parse::<usize>() {
        Ok(x) => ContentLength::Known(x),
        Err(_) => ContentLength::Unknown("Could not parse Content-length numeric value."),
    }
}

fn log_headers(prefix: &str, headers: &HeaderMap) {
    info!("  {} Headers:", prefix);
    for (name, value) in headers.iter() {
        info!("    {:?}: {:?}", name, value);
    }
}

/// Buffers and logs a small body, handing back the bytes so the message can be
/// rebuilt. Larger or unsized bodies are only described.
async fn log_body(prefix: &str, headers: &HeaderMap, body: Body) -> Result<Body, StatusCode> {
    match parse_content_length(headers) {
        ContentLength::Unknown(reason) => {
            info!("  {} Body: {}", prefix, reason);
            Ok(body)
        }
        ContentLength::Known(size) if size < MAX_LOGGABLE_BODY_LENGTH => {
            let bytes = axum::body::to_bytes(body, size).await.map_err(|err| {
                error!("Failed to read {} body: {:?}", prefix, err);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;
            info!("  {} Body:\n{}", prefix, String::from_utf8_lossy(&bytes));
            Ok(Body::from(bytes))
        }
        ContentLength::Known(size) => {
            info!(
                "  {} Body: Too big to log ({:#})",
                prefix,
                byte_unit::Byte::from(size)
            );
            Ok(body)
        }
    }
}

pub async fn log_requests(
    State(level): State<RequestsLoggingLevel>,
    mut request: Request<Body>,
    next: Next,
) -> impl IntoResponse {
    let start = Instant::now();

    if level > RequestsLoggingLevel::None {
        info!(">>> {} {}", request.method(), request.uri());
    }
    if level >= RequestsLoggingLevel::Headers {
        log_headers("Req", request.headers());
    }
    if level >= RequestsLoggingLevel::Body {
        let (parts, body) = request.into_parts();
        match log_body("Req", &parts.headers, body).await {
            Ok(body) => request = Request::from_parts(parts, body),
            Err(status) => return status.into_response(),
        }
    }

    let mut response = next.run(request).await;

    if level >= RequestsLoggingLevel::Headers {
        log_headers("Resp", response.headers());
    }
    if level >= RequestsLoggingLevel::Body {
        let (parts, body) = response.into_parts();
        match log_body("Resp", &parts.headers, body).await {
            Ok(body) => response = Response::from_parts(parts, body),
            Err(status) => return status.into_response(),
        }
    }

    if level > RequestsLoggingLevel::None {
        info!(
            "<<< {} ({}ms)",
            response.status().as_u16(),
            start.elapsed().as_millis()
        );
    }

    response
}
