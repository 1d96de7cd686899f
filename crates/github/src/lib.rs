//! adr-sync GitHub infrastructure adapter.
//!
//! Implements the store traits defined in the [`reconcile`] crate on one
//! [`GithubClient`]:
//!
//! - `ContentStore` over the REST contents and commits endpoints
//! - `DiscussionStore` over the GraphQL API (discussions, labels, categories)
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules.
//! Authentication, URL construction, base64 encoding of file bodies, and
//! GraphQL envelopes are handled here; the [`reconcile`] crate never sees
//! them. Every failure is mapped onto [`reconcile::StoreError`], with HTTP
//! 404 and GraphQL `NOT_FOUND` becoming `StoreError::NotFound`.

mod client;
mod contents;
mod discussions;
mod error;
mod graphql;

pub use client::{GithubClient, GithubConfig, DEFAULT_API_URL, DEFAULT_GRAPHQL_URL};
pub use error::GithubError;
