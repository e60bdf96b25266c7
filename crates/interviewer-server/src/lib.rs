//! interviewer-server: HTTP API over the interview service.
//!
//! Exposes `POST /start_interview`, `POST /evaluate_answer`,
//! `POST /end_interview` and `GET /health`. Errors are returned as
//! `{"error": "..."}` without provider-specific detail.

pub mod error;
pub mod handlers;
pub mod models;
pub mod server;

pub use server::{bind, create_router, start_server, AppState, ServerConfig};
