// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Now Client
//!
//! A typed client for the Now cloud deployment platform REST API.
//!
//! ## Overview
//!
//! The client translates method calls into authenticated HTTPS requests and
//! parses the JSON responses into typed records. It covers:
//!
//! - Deployments and their file trees
//! - Domains and DNS records
//! - Certificates (issue, renew, replace, delete)
//! - Aliases
//! - Secrets
//!
//! Each operation exists as an `async fn` and as a callback variant
//! (`*_with`) that returns immediately and reports to a [`ClientCallback`].
//!
//! ## Credentials
//!
//! Credentials are taken, in this order, from:
//!
//! 1. Explicit arguments ([`NowClient::new`], [`NowClient::with_team`])
//! 2. `~/.now.json` (`{"token": "...", "team": "..."}`)
//! 3. `NOW_TOKEN` / `NOW_TEAM`, only when the config file does not exist
//!
//! ## Modules
//!
//! - [`config`]: Credential resolution and client options
//! - [`now`]: Endpoint table, transport, resource models and client
//! - [`error`]: Error types
//!
//! ## Example
//!
//! ```no_run
//! use now_client::NowClient;
//!
//! # async fn run() -> now_client::Result<()> {
//! let client = NowClient::from_env()?;
//! for deployment in client.list_deployments().await? {
//!     println!("{} {:?}", deployment.uid, deployment.url);
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod error;
pub mod now;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{ClientOptions, CredentialResolver, Credentials};
pub use error::{ConfigError, NowError, Result};
pub use now::{
    Alias, Callbacks, Certificate, ClientCallback, CreateDeploymentRequest, Deployment,
    DeploymentFileStructure, Domain, DomainRecord, FileStream, NewDomainRecord, NowClient,
    NowClientBuilder, RecordType, Secret,
};
