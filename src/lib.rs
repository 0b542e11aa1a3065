//! axum-hsts - HTTP Strict Transport Security middleware for Axum
//!
//! axum-hsts is built on top of Axum and Tower, injecting the
//! `Strict-Transport-Security` response header (RFC 6797) into responses
//! served over a secure transport.
//!
//! # Features
//!
//! - **Tower layer**: composes onto any Axum router with `Router::layer`
//! - **Secure-transport aware**: never sets the header on plain-HTTP
//!   requests; honors `x-forwarded-proto` behind a reverse proxy
//! - **Deferential by default**: a header the application already set is
//!   left in place unless configured to overwrite it
//! - **Configuration**: builder pattern, serde, and environment loading
//!
//! # Quick Start
//!
//! ```rust
//! use axum::Router;
//! use axum_hsts::{apply_hsts, HstsConfig};
//!
//! let config = HstsConfig::builder()
//!     .max_age_seconds(31_536_000)
//!     .build();
//!
//! let app: Router = apply_hsts(Router::new(), &config);
//! ```

mod config;
mod layer;
pub mod utils;

// Re-exports for public API
pub use config::{HstsConfig, HstsConfigBuilder};
pub use layer::{HstsLayer, HstsService, apply_hsts, build_hsts_layer};
