//! Front-end version information.
//!
//! The value comes from Cargo metadata (`CARGO_PKG_VERSION`) at compile time. Prefer this constant over
//! repeating `env!("CARGO_PKG_VERSION")`.

/// The Elle front-end version string (for example, `0.1.0-alpha.1`).
pub const ELLE_VERSION: &str = env!("CARGO_PKG_VERSION");
