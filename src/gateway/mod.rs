//! HTTP gateway — server, router, and the request pipeline.
//!
//! Middleware order (outermost first): trace, compression, catch-panic,
//! authentication, access control, then the handler. Authentication rejects
//! unverifiable tokens with a generic 401 before anything else runs; access
//! control attaches a decision but never rejects — refusal and masking are
//! handler decisions.

pub mod access_control;
pub mod auth;
pub mod bank_details;
pub mod documents;
pub mod router;
pub mod server;

pub use router::{AppState, create_router};
pub use server::Server;
