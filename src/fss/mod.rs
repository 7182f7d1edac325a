//! FSS upstream — the finance service this backend fronts.
//!
//! All outbound calls go through [`FssClient`], which signs every request
//! with the configured `x-api-key`. Payload shaping for the frontend
//! (sortcode masking, document metadata enrichment) lives here too, next to
//! the payloads it shapes.

pub mod bank_details;
pub mod client;
pub mod documents;

pub use bank_details::process_bank_details;
pub use client::FssClient;
pub use documents::{DocumentMetadata, enrich_document_details};
