//! Client configuration.
//!
//! This module handles credential resolution (explicit arguments, the
//! `~/.now.json` file, process properties and environment variables) and
//! the transport options used to build a client.

mod credentials;
mod options;

pub use credentials::{
    CredentialResolver, CredentialSource, Credentials, NOW_JSON, NOW_TEAM, NOW_TOKEN,
};
pub use options::{ClientOptions, DEFAULT_BASE_URL, DEFAULT_REQUESTED_BY, DEFAULT_TIMEOUT_SECS};
