//! Preview server
//!
//! Serves the generated public directory with a 404 fallback page, plus the
//! one dynamic endpoint the site has: contact form validation.

use anyhow::Result;
use axum::{http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use tower_http::services::{ServeDir, ServeFile};

use crate::contact::ContactSubmission;
use crate::Folio;

/// Start the preview server over the generated site
pub async fn start(folio: &Folio, ip: &str, port: u16) -> Result<()> {
    let public_dir = folio.public_dir.clone();
    let not_found = ServeFile::new(public_dir.join("404.html"));
    let static_site = ServeDir::new(&public_dir).not_found_service(not_found);

    let app = Router::new()
        .route("/api/contact", post(contact_handler))
        .fallback_service(static_site);

    // "localhost" is accepted for convenience but is not a bindable address
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Validate a contact submission. Delivery is left to the deployment; the
/// preview server only reports whether the payload passes the contract.
async fn contact_handler(Json(submission): Json<ContactSubmission>) -> impl IntoResponse {
    match submission.validate() {
        Ok(()) => {
            tracing::info!("contact submission from {}", submission.email);
            (StatusCode::OK, Json(json!({ "ok": true })))
        }
        Err(errors) => {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "ok": false, "errors": messages })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_contact_handler_accepts_valid_submission() {
        let submission = ContactSubmission {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            subject: "About your projects".to_string(),
            message: "I would like to talk about a collaboration.".to_string(),
        };
        let response = contact_handler(Json(submission)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_contact_handler_rejects_invalid_submission() {
        let submission = ContactSubmission {
            name: "A".to_string(),
            email: "nope".to_string(),
            subject: "Hi".to_string(),
            message: "short".to_string(),
        };
        let response = contact_handler(Json(submission)).await.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
