//! Endpoint table of the Now REST API.
//!
//! Each variant maps to one HTTP verb and one path template. Path
//! parameters are kept as separate segments so that they are
//! percent-encoded individually when joined onto the base URL.

use reqwest::{Method, Url};

/// A single Now API endpoint with its path parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// `GET now/deployments`
    ListDeployments,
    /// `GET now/deployments/{deployment_id}`
    GetDeployment {
        /// Deployment identifier.
        deployment_id: &'a str,
    },
    /// `POST now/deployments`
    CreateDeployment,
    /// `DELETE now/deployments/{deployment_id}`
    DeleteDeployment {
        /// Deployment identifier.
        deployment_id: &'a str,
    },
    /// `GET now/deployments/{deployment_id}/files`
    ListFiles {
        /// Deployment identifier.
        deployment_id: &'a str,
    },
    /// `GET now/deployments/{deployment_id}/files/{file_id}`
    GetFile {
        /// Deployment identifier.
        deployment_id: &'a str,
        /// File identifier.
        file_id: &'a str,
    },
    /// `GET domains`
    ListDomains,
    /// `POST domains`
    CreateDomain,
    /// `DELETE domains/{domain_name}`
    DeleteDomain {
        /// Domain name.
        domain_name: &'a str,
    },
    /// `GET domains/{domain_name}/records`
    ListDomainRecords {
        /// Domain name.
        domain_name: &'a str,
    },
    /// `POST domains/{domain_name}/records`
    CreateDomainRecord {
        /// Domain name.
        domain_name: &'a str,
    },
    /// `DELETE domains/{domain_name}/records/{record_id}`
    DeleteDomainRecord {
        /// Domain name.
        domain_name: &'a str,
        /// Record identifier.
        record_id: &'a str,
    },
    /// `GET now/certs/{common_name}`
    ListCertificates {
        /// Certificate common name.
        common_name: &'a str,
    },
    /// `POST now/certs`
    IssueCertificate,
    /// `PUT now/certs`
    CreateOrReplaceCertificate,
    /// `DELETE now/certs/{common_name}`
    DeleteCertificate {
        /// Certificate common name.
        common_name: &'a str,
    },
    /// `GET now/aliases`
    ListAliases,
    /// `DELETE now/aliases/{alias_id}`
    DeleteAlias {
        /// Alias identifier.
        alias_id: &'a str,
    },
    /// `GET deployments/{deployment_id}/aliases`
    ListDeploymentAliases {
        /// Deployment identifier.
        deployment_id: &'a str,
    },
    /// `POST deployments/{deployment_id}/aliases`
    CreateDeploymentAlias {
        /// Deployment identifier.
        deployment_id: &'a str,
    },
    /// `GET now/secrets`
    ListSecrets,
    /// `POST now/secrets`
    CreateSecret,
    /// `PATCH now/secrets/{uid_or_name}`
    EditSecret {
        /// Secret identifier or name.
        uid_or_name: &'a str,
    },
    /// `DELETE now/secrets/{uid_or_name}`
    DeleteSecret {
        /// Secret identifier or name.
        uid_or_name: &'a str,
    },
}

impl Endpoint<'_> {
    /// Returns the HTTP verb.
    #[must_use]
    pub const fn method(&self) -> Method {
        match self {
            Self::ListDeployments
            | Self::GetDeployment { .. }
            | Self::ListFiles { .. }
            | Self::GetFile { .. }
            | Self::ListDomains
            | Self::ListDomainRecords { .. }
            | Self::ListCertificates { .. }
            | Self::ListAliases
            | Self::ListDeploymentAliases { .. }
            | Self::ListSecrets => Method::GET,
            Self::CreateDeployment
            | Self::CreateDomain
            | Self::CreateDomainRecord { .. }
            | Self::IssueCertificate
            | Self::CreateDeploymentAlias { .. }
            | Self::CreateSecret => Method::POST,
            Self::CreateOrReplaceCertificate => Method::PUT,
            Self::EditSecret { .. } => Method::PATCH,
            Self::DeleteDeployment { .. }
            | Self::DeleteDomain { .. }
            | Self::DeleteDomainRecord { .. }
            | Self::DeleteCertificate { .. }
            | Self::DeleteAlias { .. }
            | Self::DeleteSecret { .. } => Method::DELETE,
        }
    }

    /// Returns the unencoded path segments, relative to the base URL.
    #[must_use]
    pub fn path_segments(&self) -> Vec<&str> {
        match *self {
            Self::ListDeployments | Self::CreateDeployment => vec!["now", "deployments"],
            Self::GetDeployment { deployment_id } | Self::DeleteDeployment { deployment_id } => {
                vec!["now", "deployments", deployment_id]
            }
            Self::ListFiles { deployment_id } => vec!["now", "deployments", deployment_id, "files"],
            Self::GetFile {
                deployment_id,
                file_id,
            } => vec!["now", "deployments", deployment_id, "files", file_id],
            Self::ListDomains | Self::CreateDomain => vec!["domains"],
            Self::DeleteDomain { domain_name } => vec!["domains", domain_name],
            Self::ListDomainRecords { domain_name } | Self::CreateDomainRecord { domain_name } => {
                vec!["domains", domain_name, "records"]
            }
            Self::DeleteDomainRecord {
                domain_name,
                record_id,
            } => vec!["domains", domain_name, "records", record_id],
            Self::IssueCertificate | Self::CreateOrReplaceCertificate => vec!["now", "certs"],
            Self::ListCertificates { common_name } | Self::DeleteCertificate { common_name } => {
                vec!["now", "certs", common_name]
            }
            Self::ListAliases => vec!["now", "aliases"],
            Self::DeleteAlias { alias_id } => vec!["now", "aliases", alias_id],
            Self::ListDeploymentAliases { deployment_id }
            | Self::CreateDeploymentAlias { deployment_id } => {
                vec!["deployments", deployment_id, "aliases"]
            }
            Self::ListSecrets | Self::CreateSecret => vec!["now", "secrets"],
            Self::EditSecret { uid_or_name } | Self::DeleteSecret { uid_or_name } => {
                vec!["now", "secrets", uid_or_name]
            }
        }
    }

    /// Resolves the endpoint against a base URL, percent-encoding each segment.
    #[must_use]
    pub fn url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(self.path_segments());
        }
        url
    }
}

impl std::fmt::Display for Endpoint<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} /{}", self.method(), self.path_segments().join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://api.zeit.co/").expect("valid URL")
    }

    #[test]
    fn test_paths() {
        let cases = [
            (Endpoint::ListDeployments, "https://api.zeit.co/now/deployments"),
            (
                Endpoint::GetFile {
                    deployment_id: "dep1",
                    file_id: "f1",
                },
                "https://api.zeit.co/now/deployments/dep1/files/f1",
            ),
            (
                Endpoint::DeleteDomainRecord {
                    domain_name: "example.com",
                    record_id: "rec1",
                },
                "https://api.zeit.co/domains/example.com/records/rec1",
            ),
            (
                Endpoint::CreateDeploymentAlias { deployment_id: "dep1" },
                "https://api.zeit.co/deployments/dep1/aliases",
            ),
            (
                Endpoint::EditSecret { uid_or_name: "my-secret" },
                "https://api.zeit.co/now/secrets/my-secret",
            ),
        ];

        for (endpoint, expected) in cases {
            assert_eq!(endpoint.url(&base()).as_str(), expected, "{endpoint}");
        }
    }

    #[test]
    fn test_methods() {
        assert_eq!(Endpoint::ListSecrets.method(), Method::GET);
        assert_eq!(Endpoint::IssueCertificate.method(), Method::POST);
        assert_eq!(Endpoint::CreateOrReplaceCertificate.method(), Method::PUT);
        assert_eq!(Endpoint::EditSecret { uid_or_name: "s" }.method(), Method::PATCH);
        assert_eq!(Endpoint::DeleteAlias { alias_id: "a" }.method(), Method::DELETE);
    }

    #[test]
    fn test_segments_are_encoded() {
        let url = Endpoint::DeleteSecret {
            uid_or_name: "a b/c?d",
        }
        .url(&base());
        assert_eq!(url.as_str(), "https://api.zeit.co/now/secrets/a%20b%2Fc%3Fd");
    }

    #[test]
    fn test_base_with_path_prefix() {
        let base = Url::parse("http://localhost:9000/api/").expect("valid URL");
        let url = Endpoint::ListDomains.url(&base);
        assert_eq!(url.as_str(), "http://localhost:9000/api/domains");
    }

    #[test]
    fn test_display() {
        let endpoint = Endpoint::ListCertificates { common_name: "example.com" };
        assert_eq!(endpoint.to_string(), "GET /now/certs/example.com");
    }
}
