//! Now API types and data structures.
//!
//! Response types mirror the JSON resources returned by the platform and
//! tolerate missing fields. Request types are kept separate so that a
//! creation request can never carry a server-assigned identifier.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Decodes an explicit `null` as the type's default, like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Deployments
// ============================================================================

/// A deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    /// Unique deployment identifier.
    #[serde(default, deserialize_with = "null_as_default", alias = "deploymentId")]
    pub uid: String,
    /// Deployment name.
    #[serde(default)]
    pub name: Option<String>,
    /// Public URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Hostname, returned by the single-deployment endpoints.
    #[serde(default)]
    pub host: Option<String>,
    /// Creation time as milliseconds since the epoch.
    #[serde(default)]
    pub created: Option<String>,
    /// Deployment state (e.g. `READY`, `BOOTED`).
    #[serde(default)]
    pub state: Option<String>,
    /// Time of the last state change, milliseconds since the epoch.
    #[serde(default)]
    pub state_ts: Option<String>,
    /// Deployment type (`NPM`, `DOCKER` or `STATIC`).
    #[serde(default, rename = "type")]
    pub deployment_type: Option<String>,
}

impl Deployment {
    /// Returns the creation time, if present and well-formed.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created
            .as_deref()
            .and_then(|ms| ms.parse::<i64>().ok())
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }
}

/// Kind of an entry in a deployment's file tree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// A directory with children.
    Directory,
    /// A regular file.
    File,
    /// Any kind this client does not know.
    #[default]
    #[serde(other)]
    Unknown,
}

/// An entry of a deployment's file tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentFileStructure {
    /// File identifier, used to fetch the content of regular files.
    #[serde(default)]
    pub uid: Option<String>,
    /// Entry name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Entry kind.
    #[serde(default, deserialize_with = "null_as_default", rename = "type")]
    pub kind: FileKind,
    /// Children of a directory.
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<DeploymentFileStructure>,
}

impl DeploymentFileStructure {
    /// Returns true if this entry is a directory.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self.kind, FileKind::Directory)
    }
}

/// A file uploaded with a new deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentFile {
    /// Path of the file inside the deployment.
    pub file: String,
    /// File content.
    pub data: String,
}

/// Request to create a deployment.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeploymentRequest {
    /// Deployment name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Deployment type (`NPM`, `DOCKER` or `STATIC`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_type: Option<String>,
    /// Files to upload.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<DeploymentFile>,
    /// Environment variables.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,
    /// Any other field accepted by the platform.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CreateDeploymentRequest {
    /// Creates a new, empty deployment request.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Sets the deployment type.
    #[must_use]
    pub fn with_type(mut self, deployment_type: &str) -> Self {
        self.deployment_type = Some(deployment_type.to_string());
        self
    }

    /// Adds a file.
    #[must_use]
    pub fn with_file(mut self, path: &str, data: &str) -> Self {
        self.files.push(DeploymentFile {
            file: path.to_string(),
            data: data.to_string(),
        });
        self
    }

    /// Adds an environment variable.
    #[must_use]
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Sets an arbitrary top-level field.
    #[must_use]
    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }
}

/// Envelope of the deployment list.
#[derive(Debug, Deserialize)]
pub(crate) struct Deployments {
    #[serde(default)]
    pub deployments: Option<Vec<Deployment>>,
}

// ============================================================================
// Domains
// ============================================================================

/// A domain registered with the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    /// Unique domain identifier.
    #[serde(default)]
    pub uid: Option<String>,
    /// Domain name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Whether DNS is managed outside the platform.
    #[serde(default, deserialize_with = "null_as_default", alias = "external")]
    pub is_external: bool,
    /// Whether ownership has been verified.
    #[serde(default)]
    pub verified: Option<bool>,
    /// Creation time.
    #[serde(default)]
    pub created: Option<String>,
    /// Purchase time, for domains bought through the platform.
    #[serde(default)]
    pub bought_at: Option<String>,
    /// Expiration time, for domains bought through the platform.
    #[serde(default)]
    pub expires_at: Option<String>,
    /// Aliases pointing at this domain.
    #[serde(default, deserialize_with = "null_as_default")]
    pub aliases: Vec<String>,
}

/// Request to add a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDomain {
    /// Domain name.
    pub name: String,
    /// Whether DNS is managed outside the platform.
    pub is_external: bool,
}

/// Envelope of the domain list.
#[derive(Debug, Deserialize)]
pub(crate) struct Domains {
    #[serde(default)]
    pub domains: Option<Vec<Domain>>,
}

/// Body returned when a domain is deleted.
#[derive(Debug, Deserialize)]
pub(crate) struct DeletedDomain {
    #[serde(default)]
    pub uid: Option<String>,
}

/// DNS record type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address.
    A,
    /// IPv6 address.
    Aaaa,
    /// Apex alias.
    Alias,
    /// Certificate authority authorization.
    Caa,
    /// Canonical name.
    Cname,
    /// Mail exchange.
    Mx,
    /// Service locator.
    Srv,
    /// Text record.
    Txt,
    /// Any type this client does not know.
    #[serde(other)]
    Other,
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Alias => "ALIAS",
            Self::Caa => "CAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Srv => "SRV",
            Self::Txt => "TXT",
            Self::Other => "OTHER",
        };
        write!(f, "{kind}")
    }
}

/// A DNS record under a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecord {
    /// Record identifier.
    #[serde(default, alias = "uid")]
    pub id: Option<String>,
    /// Record type.
    #[serde(rename = "type")]
    pub record_type: Option<RecordType>,
    /// Record name, relative to the domain.
    #[serde(default)]
    pub name: Option<String>,
    /// Record value.
    #[serde(default)]
    pub value: Option<String>,
    /// Priority for MX records.
    #[serde(default)]
    pub mx_priority: Option<u32>,
    /// Creation time.
    #[serde(default)]
    pub created: Option<String>,
    /// Last update time.
    #[serde(default)]
    pub updated: Option<String>,
}

/// Fields of a DNS record to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDomainRecord {
    /// Record name, relative to the domain.
    pub name: String,
    /// Record type.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Record value.
    pub value: String,
    /// Priority for MX records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mx_priority: Option<u32>,
}

impl NewDomainRecord {
    /// Creates a new record definition.
    #[must_use]
    pub fn new(record_type: RecordType, name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            record_type,
            value: value.to_string(),
            mx_priority: None,
        }
    }

    /// Sets the MX priority.
    #[must_use]
    pub const fn with_mx_priority(mut self, priority: u32) -> Self {
        self.mx_priority = Some(priority);
        self
    }
}

/// Wire shape of a record creation request.
#[derive(Debug, Serialize)]
pub(crate) struct DomainRecordCreation<'a> {
    pub data: &'a NewDomainRecord,
}

/// Envelope of the record list.
#[derive(Debug, Deserialize)]
pub(crate) struct DomainRecords {
    #[serde(default)]
    pub records: Option<Vec<DomainRecord>>,
}

// ============================================================================
// Certificates
// ============================================================================

/// A TLS certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    /// Certificate identifier.
    #[serde(default)]
    pub uid: Option<String>,
    /// Common name.
    #[serde(default)]
    pub cn: Option<String>,
    /// Domains covered by the certificate.
    #[serde(default, deserialize_with = "null_as_default")]
    pub cns: Vec<String>,
    /// Creation time.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    /// Expiration time.
    #[serde(default)]
    pub expiration: Option<DateTime<Utc>>,
    /// Whether the platform renews the certificate automatically.
    #[serde(default)]
    pub auto_renew: Option<bool>,
}

/// Body sent to issue, renew or replace a certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CertificateRequest {
    /// Domains to cover.
    pub domains: Vec<String>,
    /// Request a renewal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renew: Option<bool>,
    /// CA chain, when supplying an existing certificate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca: Option<String>,
    /// Certificate, when supplying an existing certificate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert: Option<String>,
    /// Private key, when supplying an existing certificate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl CertificateRequest {
    /// Request to issue a new certificate.
    #[must_use]
    pub fn issue(domains: &[String]) -> Self {
        Self {
            domains: domains.to_vec(),
            ..Self::default()
        }
    }

    /// Request to renew an existing certificate.
    #[must_use]
    pub fn renew(domains: &[String]) -> Self {
        Self {
            domains: domains.to_vec(),
            renew: Some(true),
            ..Self::default()
        }
    }

    /// Request to replace a certificate with caller-supplied material.
    #[must_use]
    pub fn replace(domains: &[String], ca: &str, cert: &str, key: &str) -> Self {
        Self {
            domains: domains.to_vec(),
            renew: None,
            ca: Some(ca.to_string()),
            cert: Some(cert.to_string()),
            key: Some(key.to_string()),
        }
    }
}

/// Response to a certificate issue, renewal or replacement.
#[derive(Debug, Deserialize)]
pub(crate) struct CertificateUpdate {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Envelope of the certificate list.
#[derive(Debug, Deserialize)]
pub(crate) struct Certificates {
    #[serde(default)]
    pub certs: Option<Vec<Certificate>>,
}

// ============================================================================
// Aliases
// ============================================================================

/// An alias mapping a hostname to a deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alias {
    /// Alias identifier.
    #[serde(default)]
    pub uid: Option<String>,
    /// Aliased hostname.
    #[serde(default, deserialize_with = "null_as_default")]
    pub alias: String,
    /// Identifier of the target deployment.
    #[serde(default)]
    pub deployment_id: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created: Option<String>,
}

/// Request to create an alias.
#[derive(Debug, Serialize)]
pub(crate) struct NewAlias<'a> {
    pub alias: &'a str,
}

/// Envelope of the alias lists.
#[derive(Debug, Deserialize)]
pub(crate) struct Aliases {
    #[serde(default)]
    pub aliases: Option<Vec<Alias>>,
}

/// Body returned when an alias is deleted.
#[derive(Debug, Deserialize)]
pub(crate) struct DeletedAlias {
    #[serde(default)]
    pub status: Option<String>,
}

// ============================================================================
// Secrets
// ============================================================================

/// A secret. The value is write-only and never returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    /// Secret identifier.
    #[serde(default)]
    pub uid: Option<String>,
    /// Secret name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Creation time.
    #[serde(default)]
    pub created: Option<String>,
    /// Owner identifier.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Body sent to create or rename a secret.
#[derive(Debug, Serialize)]
pub(crate) struct SecretRequest<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<&'a str>,
}

/// Envelope of the secret list.
#[derive(Debug, Deserialize)]
pub(crate) struct Secrets {
    #[serde(default)]
    pub secrets: Option<Vec<Secret>>,
}

/// Error envelope returned by the platform on failures.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

/// Error details.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployment_created_at() {
        let deployment = Deployment {
            created: Some(String::from("1500000000000")),
            ..Deployment::default()
        };
        let created = deployment.created_at().expect("timestamp should parse");
        assert_eq!(created.timestamp(), 1_500_000_000);

        let deployment = Deployment {
            created: Some(String::from("yesterday")),
            ..Deployment::default()
        };
        assert!(deployment.created_at().is_none());
    }

    #[test]
    fn test_file_tree_tolerates_unknown_kind() {
        let json = r#"[
            {"type":"directory","name":"src","children":[
                {"type":"file","name":"index.js","uid":"f1"}
            ]},
            {"type":"symlink","name":"link"}
        ]"#;
        let tree: Vec<DeploymentFileStructure> = serde_json::from_str(json).expect("parse");

        assert!(tree[0].is_directory());
        assert_eq!(tree[0].children[0].uid.as_deref(), Some("f1"));
        assert_eq!(tree[1].kind, FileKind::Unknown);
    }

    #[test]
    fn test_record_creation_wire_shape() {
        let record = NewDomainRecord::new(RecordType::Mx, "", "mail.example.com")
            .with_mx_priority(10);
        let body = serde_json::to_value(DomainRecordCreation { data: &record }).expect("serialize");

        assert_eq!(
            body,
            serde_json::json!({
                "data": {"name": "", "type": "MX", "value": "mail.example.com", "mxPriority": 10}
            })
        );
    }

    #[test]
    fn test_certificate_requests_omit_unset_fields() {
        let domains = vec![String::from("example.com")];

        let body = serde_json::to_value(CertificateRequest::renew(&domains)).expect("serialize");
        assert_eq!(body, serde_json::json!({"domains": ["example.com"], "renew": true}));

        let body = serde_json::to_value(CertificateRequest::replace(&domains, "ca", "cert", "key"))
            .expect("serialize");
        assert_eq!(body["ca"], "ca");
        assert!(body.get("renew").is_none());
    }

    #[test]
    fn test_create_deployment_request_flattens_extra_fields() {
        let request = CreateDeploymentRequest::new("site")
            .with_type("STATIC")
            .with_file("index.html", "<h1>hi</h1>")
            .with_field("public", Value::Bool(true));
        let body = serde_json::to_value(&request).expect("serialize");

        assert_eq!(body["name"], "site");
        assert_eq!(body["deploymentType"], "STATIC");
        assert_eq!(body["public"], true);
        assert!(body.get("env").is_none());
        assert!(body.get("uid").is_none());
    }

    #[test]
    fn test_unknown_record_type() {
        let record: DomainRecord =
            serde_json::from_str(r#"{"id":"r1","type":"NS","name":"","value":"ns1"}"#)
                .expect("parse");
        assert_eq!(record.record_type, Some(RecordType::Other));
    }

    #[test]
    fn test_null_fields_decode_as_defaults() {
        let domains: Domains = serde_json::from_str(
            r#"{"domains":[{"name":"x.com","isExternal":null,"aliases":null}]}"#,
        )
        .expect("parse");
        let domains = domains.domains.expect("domains");
        let domain = &domains[0];
        assert_eq!(domain.name, "x.com");
        assert!(!domain.is_external);
        assert!(domain.aliases.is_empty());

        let tree: Vec<DeploymentFileStructure> = serde_json::from_str(
            r#"[{"name":"src","type":"directory","children":[{"name":null,"type":null,"children":null}]}]"#,
        )
        .expect("parse");
        let child = &tree[0].children[0];
        assert_eq!(child.kind, FileKind::default());
        assert!(child.children.is_empty());

        let cert: Certificate = serde_json::from_str(r#"{"uid":"c1","cns":null}"#).expect("parse");
        assert!(cert.cns.is_empty());
    }
}
