//! Now API client.
//!
//! Every operation comes in two shapes:
//!
//! - an `async fn` that completes when the HTTP round trip does and returns
//!   a [`Result`];
//! - a `*_with` variant that returns immediately, runs the request on the
//!   client's dispatcher and reports the outcome to a [`ClientCallback`].
//!
//! Failures are normalized into [`NowError`]: non-2xx statuses become
//! [`NowError::UnsuccessfulResponse`], everything on the transport side
//! becomes [`NowError::Io`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::{ClientOptions, CredentialResolver, Credentials};
use crate::error::{NowError, Result};

use super::callback::{ClientCallback, Dispatcher};
use super::endpoints::Endpoint;
use super::interceptors::{Interceptor, InterceptorChain};
use super::service::{FileStream, NowService, NO_BODY};
use super::types::{
    Alias, Aliases, Certificate, CertificateRequest, CertificateUpdate, Certificates,
    CreateDeploymentRequest, DeletedAlias, DeletedDomain, Deployment, DeploymentFileStructure,
    Deployments, Domain, DomainRecord, DomainRecordCreation, DomainRecords, Domains, NewAlias,
    NewDomain, NewDomainRecord, Secret, SecretRequest, Secrets,
};

/// Now API client.
#[derive(Debug, Clone)]
pub struct NowClient {
    /// Interceptor-equipped transport.
    service: Arc<NowService>,
    /// Pool running the callback variants.
    dispatcher: Dispatcher,
    /// Team scope, if any.
    team: Option<String>,
}

/// Builder for [`NowClient`].
#[derive(Debug, Default)]
pub struct NowClientBuilder {
    token: Option<String>,
    team: Option<String>,
    options: ClientOptions,
    http: Option<Client>,
    resolver: Option<CredentialResolver>,
    interceptors: InterceptorChain,
}

impl NowClientBuilder {
    /// Uses an explicit token instead of resolving one.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Scopes requests to a team. Only used together with [`Self::token`].
    #[must_use]
    pub fn team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    /// Replaces the transport options.
    #[must_use]
    pub fn options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Overrides the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, base_url: &str) -> Result<Self> {
        self.options = self.options.with_base_url(base_url)?;
        Ok(self)
    }

    /// Uses a preconfigured HTTP client. The timeout option is then ignored.
    #[must_use]
    pub fn http_client(mut self, http: Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Resolves credentials with a custom resolver when no token is given.
    #[must_use]
    pub fn resolver(mut self, resolver: CredentialResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Appends an interceptor after the standard ones.
    #[must_use]
    pub fn interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors = self.interceptors.with(interceptor);
        self
    }

    /// Builds the client, resolving credentials eagerly.
    ///
    /// # Errors
    ///
    /// Returns an error if no usable token is found, an explicit token is
    /// blank, or the transport cannot be created.
    pub fn build(self) -> Result<NowClient> {
        let credentials = match self.token {
            Some(token) => Credentials::new(token, self.team)?,
            None => self.resolver.unwrap_or_default().resolve()?,
        };

        let http = match self.http {
            Some(http) => http,
            None => Client::builder()
                .timeout(self.options.timeout)
                .build()
                .map_err(|e| NowError::internal(format!("Failed to create HTTP client: {e}")))?,
        };

        let interceptors =
            InterceptorChain::standard(&credentials, &self.options)?.append(self.interceptors);
        debug!(
            "Building Now client for {} with {} interceptors",
            self.options.base_url,
            interceptors.len()
        );

        Ok(NowClient {
            service: Arc::new(NowService::new(http, self.options.base_url, interceptors)),
            dispatcher: Dispatcher::new()?,
            team: credentials.team().map(ToString::to_string),
        })
    }
}

/// Rejects empty or blank identifiers before any request is sent.
fn require(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(NowError::invalid_argument(name, "must not be blank"));
    }
    Ok(())
}

fn require_domains(domains: &[String]) -> Result<()> {
    if domains.is_empty() {
        return Err(NowError::invalid_argument("domains", "must not be empty"));
    }
    domains.iter().try_for_each(|d| require("domains", d))
}

impl NowClient {
    /// Creates a client from `~/.now.json`, or from `NOW_TOKEN` / `NOW_TEAM`
    /// when that file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if no token can be found.
    pub fn from_env() -> Result<Self> {
        Self::builder().build()
    }

    /// Creates a client with an explicit token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is blank.
    pub fn new(token: &str) -> Result<Self> {
        Self::builder().token(token).build()
    }

    /// Creates a client with an explicit token, scoped to a team.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is blank.
    pub fn with_team(token: &str, team: &str) -> Result<Self> {
        Self::builder().token(token).team(team).build()
    }

    /// Returns a builder.
    #[must_use]
    pub fn builder() -> NowClientBuilder {
        NowClientBuilder::default()
    }

    /// Returns the team requests are scoped to.
    #[must_use]
    pub fn team(&self) -> Option<&str> {
        self.team.as_deref()
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.service.base_url()
    }

    // ------------------------------------------------------------------------
    // Deployments
    // ------------------------------------------------------------------------

    /// Lists all deployments.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn list_deployments(&self) -> Result<Vec<Deployment>> {
        let envelope: Option<Deployments> = self
            .service
            .fetch_optional(Endpoint::ListDeployments, NO_BODY)
            .await?;
        Ok(envelope.and_then(|e| e.deployments).unwrap_or_default())
    }

    /// Callback variant of [`Self::list_deployments`].
    pub fn list_deployments_with(
        &self,
        callback: impl ClientCallback<Vec<Deployment>>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        self.dispatcher
            .enqueue(async move { client.list_deployments().await }, callback)
    }

    /// Gets a deployment by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the deployment does not exist or the API call fails.
    pub async fn get_deployment(&self, deployment_id: &str) -> Result<Deployment> {
        require("deployment_id", deployment_id)?;
        self.service
            .fetch(Endpoint::GetDeployment { deployment_id }, NO_BODY)
            .await
    }

    /// Callback variant of [`Self::get_deployment`].
    pub fn get_deployment_with(
        &self,
        deployment_id: &str,
        callback: impl ClientCallback<Deployment>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let deployment_id = deployment_id.to_string();
        self.dispatcher.enqueue(
            async move { client.get_deployment(&deployment_id).await },
            callback,
        )
    }

    /// Creates a deployment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn create_deployment(&self, request: &CreateDeploymentRequest) -> Result<Deployment> {
        self.service
            .fetch(Endpoint::CreateDeployment, Some(request))
            .await
    }

    /// Callback variant of [`Self::create_deployment`].
    pub fn create_deployment_with(
        &self,
        request: &CreateDeploymentRequest,
        callback: impl ClientCallback<Deployment>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let request = request.clone();
        self.dispatcher.enqueue(
            async move { client.create_deployment(&request).await },
            callback,
        )
    }

    /// Deletes a deployment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn delete_deployment(&self, deployment_id: &str) -> Result<()> {
        require("deployment_id", deployment_id)?;
        self.service
            .discard(Endpoint::DeleteDeployment { deployment_id })
            .await
    }

    /// Callback variant of [`Self::delete_deployment`].
    pub fn delete_deployment_with(
        &self,
        deployment_id: &str,
        callback: impl ClientCallback<()>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let deployment_id = deployment_id.to_string();
        self.dispatcher.enqueue(
            async move { client.delete_deployment(&deployment_id).await },
            callback,
        )
    }

    /// Lists the file tree of a deployment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn list_deployment_files(
        &self,
        deployment_id: &str,
    ) -> Result<Vec<DeploymentFileStructure>> {
        require("deployment_id", deployment_id)?;
        let files: Option<Vec<DeploymentFileStructure>> = self
            .service
            .fetch_optional(Endpoint::ListFiles { deployment_id }, NO_BODY)
            .await?;
        Ok(files.unwrap_or_default())
    }

    /// Callback variant of [`Self::list_deployment_files`].
    pub fn list_deployment_files_with(
        &self,
        deployment_id: &str,
        callback: impl ClientCallback<Vec<DeploymentFileStructure>>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let deployment_id = deployment_id.to_string();
        self.dispatcher.enqueue(
            async move { client.list_deployment_files(&deployment_id).await },
            callback,
        )
    }

    /// Reads a deployment file into a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails or the body is empty.
    pub async fn get_file_as_string(&self, deployment_id: &str, file_id: &str) -> Result<String> {
        require("deployment_id", deployment_id)?;
        require("file_id", file_id)?;
        self.service
            .text(Endpoint::GetFile {
                deployment_id,
                file_id,
            })
            .await
    }

    /// Callback variant of [`Self::get_file_as_string`].
    pub fn get_file_as_string_with(
        &self,
        deployment_id: &str,
        file_id: &str,
        callback: impl ClientCallback<String>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let (deployment_id, file_id) = (deployment_id.to_string(), file_id.to_string());
        self.dispatcher.enqueue(
            async move { client.get_file_as_string(&deployment_id, &file_id).await },
            callback,
        )
    }

    /// Opens a deployment file as a byte stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails or the body is empty.
    pub async fn get_file_stream(&self, deployment_id: &str, file_id: &str) -> Result<FileStream> {
        require("deployment_id", deployment_id)?;
        require("file_id", file_id)?;
        self.service
            .stream(Endpoint::GetFile {
                deployment_id,
                file_id,
            })
            .await
    }

    /// Callback variant of [`Self::get_file_stream`].
    pub fn get_file_stream_with(
        &self,
        deployment_id: &str,
        file_id: &str,
        callback: impl ClientCallback<FileStream>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let (deployment_id, file_id) = (deployment_id.to_string(), file_id.to_string());
        self.dispatcher.enqueue(
            async move { client.get_file_stream(&deployment_id, &file_id).await },
            callback,
        )
    }

    // ------------------------------------------------------------------------
    // Domains
    // ------------------------------------------------------------------------

    /// Lists all domains.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn list_domains(&self) -> Result<Vec<Domain>> {
        let envelope: Option<Domains> = self
            .service
            .fetch_optional(Endpoint::ListDomains, NO_BODY)
            .await?;
        Ok(envelope.and_then(|e| e.domains).unwrap_or_default())
    }

    /// Callback variant of [`Self::list_domains`].
    pub fn list_domains_with(&self, callback: impl ClientCallback<Vec<Domain>>) -> JoinHandle<()> {
        let client = self.clone();
        self.dispatcher
            .enqueue(async move { client.list_domains().await }, callback)
    }

    /// Adds a domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn add_domain(&self, name: &str, is_external: bool) -> Result<Domain> {
        require("name", name)?;
        let request = NewDomain {
            name: name.to_string(),
            is_external,
        };
        self.service
            .fetch(Endpoint::CreateDomain, Some(&request))
            .await
    }

    /// Callback variant of [`Self::add_domain`].
    pub fn add_domain_with(
        &self,
        name: &str,
        is_external: bool,
        callback: impl ClientCallback<Domain>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let name = name.to_string();
        self.dispatcher.enqueue(
            async move { client.add_domain(&name, is_external).await },
            callback,
        )
    }

    /// Deletes a domain and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails or the response carries no identifier.
    pub async fn delete_domain(&self, name: &str) -> Result<String> {
        require("name", name)?;
        let deleted: DeletedDomain = self
            .service
            .fetch(Endpoint::DeleteDomain { domain_name: name }, NO_BODY)
            .await?;
        deleted
            .uid
            .ok_or_else(|| NowError::io("Domain deletion response carries no uid"))
    }

    /// Callback variant of [`Self::delete_domain`].
    pub fn delete_domain_with(
        &self,
        name: &str,
        callback: impl ClientCallback<String>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let name = name.to_string();
        self.dispatcher
            .enqueue(async move { client.delete_domain(&name).await }, callback)
    }

    /// Lists the DNS records of a domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn list_domain_records(&self, domain_name: &str) -> Result<Vec<DomainRecord>> {
        require("domain_name", domain_name)?;
        let envelope: Option<DomainRecords> = self
            .service
            .fetch_optional(Endpoint::ListDomainRecords { domain_name }, NO_BODY)
            .await?;
        Ok(envelope.and_then(|e| e.records).unwrap_or_default())
    }

    /// Callback variant of [`Self::list_domain_records`].
    pub fn list_domain_records_with(
        &self,
        domain_name: &str,
        callback: impl ClientCallback<Vec<DomainRecord>>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let domain_name = domain_name.to_string();
        self.dispatcher.enqueue(
            async move { client.list_domain_records(&domain_name).await },
            callback,
        )
    }

    /// Adds a DNS record to a domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn add_domain_record(
        &self,
        domain_name: &str,
        record: &NewDomainRecord,
    ) -> Result<DomainRecord> {
        require("domain_name", domain_name)?;
        self.service
            .fetch(
                Endpoint::CreateDomainRecord { domain_name },
                Some(&DomainRecordCreation { data: record }),
            )
            .await
    }

    /// Callback variant of [`Self::add_domain_record`].
    pub fn add_domain_record_with(
        &self,
        domain_name: &str,
        record: &NewDomainRecord,
        callback: impl ClientCallback<DomainRecord>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let domain_name = domain_name.to_string();
        let record = record.clone();
        self.dispatcher.enqueue(
            async move { client.add_domain_record(&domain_name, &record).await },
            callback,
        )
    }

    /// Deletes a DNS record.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn delete_domain_record(&self, domain_name: &str, record_id: &str) -> Result<()> {
        require("domain_name", domain_name)?;
        require("record_id", record_id)?;
        self.service
            .discard(Endpoint::DeleteDomainRecord {
                domain_name,
                record_id,
            })
            .await
    }

    /// Callback variant of [`Self::delete_domain_record`].
    pub fn delete_domain_record_with(
        &self,
        domain_name: &str,
        record_id: &str,
        callback: impl ClientCallback<()>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let (domain_name, record_id) = (domain_name.to_string(), record_id.to_string());
        self.dispatcher.enqueue(
            async move { client.delete_domain_record(&domain_name, &record_id).await },
            callback,
        )
    }

    // ------------------------------------------------------------------------
    // Certificates
    // ------------------------------------------------------------------------

    /// Lists the certificates for a common name.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn list_certificates(&self, common_name: &str) -> Result<Vec<Certificate>> {
        require("common_name", common_name)?;
        let envelope: Option<Certificates> = self
            .service
            .fetch_optional(Endpoint::ListCertificates { common_name }, NO_BODY)
            .await?;
        Ok(envelope.and_then(|e| e.certs).unwrap_or_default())
    }

    /// Callback variant of [`Self::list_certificates`].
    pub fn list_certificates_with(
        &self,
        common_name: &str,
        callback: impl ClientCallback<Vec<Certificate>>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let common_name = common_name.to_string();
        self.dispatcher.enqueue(
            async move { client.list_certificates(&common_name).await },
            callback,
        )
    }

    /// Issues a certificate and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn create_certificate(&self, domains: &[String]) -> Result<String> {
        require_domains(domains)?;
        self.certificate_uid(Endpoint::IssueCertificate, &CertificateRequest::issue(domains))
            .await
    }

    /// Callback variant of [`Self::create_certificate`].
    pub fn create_certificate_with(
        &self,
        domains: &[String],
        callback: impl ClientCallback<String>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let domains = domains.to_vec();
        self.dispatcher.enqueue(
            async move { client.create_certificate(&domains).await },
            callback,
        )
    }

    /// Renews a certificate and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn renew_certificate(&self, domains: &[String]) -> Result<String> {
        require_domains(domains)?;
        self.certificate_uid(
            Endpoint::CreateOrReplaceCertificate,
            &CertificateRequest::renew(domains),
        )
        .await
    }

    /// Callback variant of [`Self::renew_certificate`].
    pub fn renew_certificate_with(
        &self,
        domains: &[String],
        callback: impl ClientCallback<String>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let domains = domains.to_vec();
        self.dispatcher.enqueue(
            async move { client.renew_certificate(&domains).await },
            callback,
        )
    }

    async fn certificate_uid(
        &self,
        endpoint: Endpoint<'_>,
        request: &CertificateRequest,
    ) -> Result<String> {
        let update: CertificateUpdate = self.service.fetch(endpoint, Some(request)).await?;
        update
            .uid
            .ok_or_else(|| NowError::io(format!("{endpoint} response carries no uid")))
    }

    /// Replaces a certificate with caller-supplied material and returns the
    /// creation time of the new one.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails or the response carries no timestamp.
    pub async fn replace_certificate(
        &self,
        domains: &[String],
        ca: &str,
        cert: &str,
        key: &str,
    ) -> Result<DateTime<Utc>> {
        require_domains(domains)?;
        require("ca", ca)?;
        require("cert", cert)?;
        require("key", key)?;

        let request = CertificateRequest::replace(domains, ca, cert, key);
        let update: CertificateUpdate = self
            .service
            .fetch(Endpoint::CreateOrReplaceCertificate, Some(&request))
            .await?;
        update
            .created_at
            .ok_or_else(|| NowError::io("Certificate replacement response carries no created_at"))
    }

    /// Callback variant of [`Self::replace_certificate`].
    pub fn replace_certificate_with(
        &self,
        domains: &[String],
        ca: &str,
        cert: &str,
        key: &str,
        callback: impl ClientCallback<DateTime<Utc>>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let domains = domains.to_vec();
        let (ca, cert, key) = (ca.to_string(), cert.to_string(), key.to_string());
        self.dispatcher.enqueue(
            async move { client.replace_certificate(&domains, &ca, &cert, &key).await },
            callback,
        )
    }

    /// Deletes the certificate for a common name.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn delete_certificate(&self, common_name: &str) -> Result<()> {
        require("common_name", common_name)?;
        self.service
            .discard(Endpoint::DeleteCertificate { common_name })
            .await
    }

    /// Callback variant of [`Self::delete_certificate`].
    pub fn delete_certificate_with(
        &self,
        common_name: &str,
        callback: impl ClientCallback<()>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let common_name = common_name.to_string();
        self.dispatcher.enqueue(
            async move { client.delete_certificate(&common_name).await },
            callback,
        )
    }

    // ------------------------------------------------------------------------
    // Aliases
    // ------------------------------------------------------------------------

    /// Lists all aliases.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn list_aliases(&self) -> Result<Vec<Alias>> {
        let envelope: Option<Aliases> = self
            .service
            .fetch_optional(Endpoint::ListAliases, NO_BODY)
            .await?;
        Ok(envelope.and_then(|e| e.aliases).unwrap_or_default())
    }

    /// Callback variant of [`Self::list_aliases`].
    pub fn list_aliases_with(&self, callback: impl ClientCallback<Vec<Alias>>) -> JoinHandle<()> {
        let client = self.clone();
        self.dispatcher
            .enqueue(async move { client.list_aliases().await }, callback)
    }

    /// Deletes an alias and returns the deletion status reported by the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails or the response carries no status.
    pub async fn delete_alias(&self, alias_id: &str) -> Result<String> {
        require("alias_id", alias_id)?;
        let deleted: DeletedAlias = self
            .service
            .fetch(Endpoint::DeleteAlias { alias_id }, NO_BODY)
            .await?;
        deleted
            .status
            .ok_or_else(|| NowError::io("Alias deletion response carries no status"))
    }

    /// Callback variant of [`Self::delete_alias`].
    pub fn delete_alias_with(
        &self,
        alias_id: &str,
        callback: impl ClientCallback<String>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let alias_id = alias_id.to_string();
        self.dispatcher
            .enqueue(async move { client.delete_alias(&alias_id).await }, callback)
    }

    /// Lists the aliases of a deployment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn list_deployment_aliases(&self, deployment_id: &str) -> Result<Vec<Alias>> {
        require("deployment_id", deployment_id)?;
        let envelope: Option<Aliases> = self
            .service
            .fetch_optional(Endpoint::ListDeploymentAliases { deployment_id }, NO_BODY)
            .await?;
        Ok(envelope.and_then(|e| e.aliases).unwrap_or_default())
    }

    /// Callback variant of [`Self::list_deployment_aliases`].
    pub fn list_deployment_aliases_with(
        &self,
        deployment_id: &str,
        callback: impl ClientCallback<Vec<Alias>>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let deployment_id = deployment_id.to_string();
        self.dispatcher.enqueue(
            async move { client.list_deployment_aliases(&deployment_id).await },
            callback,
        )
    }

    /// Points an alias at a deployment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn create_deployment_alias(&self, deployment_id: &str, alias: &str) -> Result<Alias> {
        require("deployment_id", deployment_id)?;
        require("alias", alias)?;
        self.service
            .fetch(
                Endpoint::CreateDeploymentAlias { deployment_id },
                Some(&NewAlias { alias }),
            )
            .await
    }

    /// Callback variant of [`Self::create_deployment_alias`].
    pub fn create_deployment_alias_with(
        &self,
        deployment_id: &str,
        alias: &str,
        callback: impl ClientCallback<Alias>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let (deployment_id, alias) = (deployment_id.to_string(), alias.to_string());
        self.dispatcher.enqueue(
            async move { client.create_deployment_alias(&deployment_id, &alias).await },
            callback,
        )
    }

    // ------------------------------------------------------------------------
    // Secrets
    // ------------------------------------------------------------------------

    /// Lists all secrets. Values are never returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn list_secrets(&self) -> Result<Vec<Secret>> {
        let envelope: Option<Secrets> = self
            .service
            .fetch_optional(Endpoint::ListSecrets, NO_BODY)
            .await?;
        Ok(envelope.and_then(|e| e.secrets).unwrap_or_default())
    }

    /// Callback variant of [`Self::list_secrets`].
    pub fn list_secrets_with(&self, callback: impl ClientCallback<Vec<Secret>>) -> JoinHandle<()> {
        let client = self.clone();
        self.dispatcher
            .enqueue(async move { client.list_secrets().await }, callback)
    }

    /// Creates a secret.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn create_secret(&self, name: &str, value: &str) -> Result<Secret> {
        require("name", name)?;
        let request = SecretRequest {
            name,
            value: Some(value),
        };
        self.service
            .fetch(Endpoint::CreateSecret, Some(&request))
            .await
    }

    /// Callback variant of [`Self::create_secret`].
    pub fn create_secret_with(
        &self,
        name: &str,
        value: &str,
        callback: impl ClientCallback<Secret>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let (name, value) = (name.to_string(), value.to_string());
        self.dispatcher.enqueue(
            async move { client.create_secret(&name, &value).await },
            callback,
        )
    }

    /// Renames a secret, addressed by uid or name.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn rename_secret(&self, uid_or_name: &str, new_name: &str) -> Result<Secret> {
        require("uid_or_name", uid_or_name)?;
        require("new_name", new_name)?;
        let request = SecretRequest {
            name: new_name,
            value: None,
        };
        self.service
            .fetch(Endpoint::EditSecret { uid_or_name }, Some(&request))
            .await
    }

    /// Callback variant of [`Self::rename_secret`].
    pub fn rename_secret_with(
        &self,
        uid_or_name: &str,
        new_name: &str,
        callback: impl ClientCallback<Secret>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let (uid_or_name, new_name) = (uid_or_name.to_string(), new_name.to_string());
        self.dispatcher.enqueue(
            async move { client.rename_secret(&uid_or_name, &new_name).await },
            callback,
        )
    }

    /// Deletes a secret, addressed by uid or name.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn delete_secret(&self, uid_or_name: &str) -> Result<Secret> {
        require("uid_or_name", uid_or_name)?;
        self.service
            .fetch(Endpoint::DeleteSecret { uid_or_name }, NO_BODY)
            .await
    }

    /// Callback variant of [`Self::delete_secret`].
    pub fn delete_secret_with(
        &self,
        uid_or_name: &str,
        callback: impl ClientCallback<Secret>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let uid_or_name = uid_or_name.to_string();
        self.dispatcher.enqueue(
            async move { client.delete_secret(&uid_or_name).await },
            callback,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_blank_explicit_token_fails_at_construction() {
        let err = NowClient::new("  ").unwrap_err();
        assert!(matches!(err, NowError::Config(ConfigError::BlankToken)));
    }

    #[test]
    fn test_resolver_failure_surfaces_at_construction() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let err = NowClient::builder()
            .resolver(
                CredentialResolver::new()
                    .with_home_dir(dir.path())
                    .with_env(|_| None),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, NowError::Config(ConfigError::MissingToken)));
    }

    #[tokio::test]
    async fn test_team_is_normalized() {
        let client = NowClient::with_team("tok", " ").expect("client");
        assert_eq!(client.team(), None);

        let client = NowClient::with_team("tok", "t1").expect("client");
        assert_eq!(client.team(), Some("t1"));
        assert_eq!(client.base_url().as_str(), "https://api.zeit.co/");
    }

    #[tokio::test]
    async fn test_blank_identifiers_rejected_before_sending() {
        let client = NowClient::new("tok").expect("client");

        let err = client.get_deployment("").await.unwrap_err();
        assert!(matches!(err, NowError::InvalidArgument { ref name, .. } if name == "deployment_id"));

        let err = client.create_certificate(&[]).await.unwrap_err();
        assert!(matches!(err, NowError::InvalidArgument { .. }));

        let err = client.rename_secret("s1", " ").await.unwrap_err();
        assert!(matches!(err, NowError::InvalidArgument { ref name, .. } if name == "new_name"));
    }
}
