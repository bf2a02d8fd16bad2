//! Now API integration module.
//!
//! This module provides the typed client for the Now REST API: the
//! endpoint table, the interceptor-equipped transport, the resource
//! models and the client facade with its callback variants.

mod callback;
mod client;
mod endpoints;
mod interceptors;
mod service;
mod types;

pub use callback::{Callbacks, ClientCallback};
pub use client::{NowClient, NowClientBuilder};
pub use endpoints::Endpoint;
pub use interceptors::{
    AuthenticationInterceptor, HeadersInterceptor, Interceptor, InterceptorChain,
    TeamInterceptor, TEAM_PARAM, X_REQUESTED_BY,
};
pub use service::FileStream;
pub use types::{
    Alias, Certificate, CertificateRequest, CreateDeploymentRequest, Deployment, DeploymentFile,
    DeploymentFileStructure, Domain, DomainRecord, FileKind, NewDomain, NewDomainRecord,
    RecordType, Secret,
};
