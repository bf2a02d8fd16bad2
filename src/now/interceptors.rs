//! Request interceptors.
//!
//! Every outbound request passes through an ordered chain of interceptors
//! before it is sent: header injection, bearer-token authentication and
//! optional team scoping.

use std::fmt;
use std::sync::Arc;

use reqwest::header::{self, HeaderName, HeaderValue};
use reqwest::Request;
use tracing::trace;

use crate::config::{ClientOptions, Credentials};
use crate::error::{ConfigError, Result};

/// Name of the client-identifying header.
pub const X_REQUESTED_BY: &str = "x-requested-by";

/// Name of the team-scoping query parameter.
pub const TEAM_PARAM: &str = "team";

/// A transform applied to every outbound request.
pub trait Interceptor: Send + Sync + fmt::Debug {
    /// Mutates the request in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be transformed.
    fn intercept(&self, request: &mut Request) -> Result<()>;
}

/// Sets the JSON content type and the client-identifying header.
#[derive(Debug, Clone)]
pub struct HeadersInterceptor {
    requested_by: HeaderValue,
}

impl HeadersInterceptor {
    /// Creates the interceptor.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is not a valid header value.
    pub fn new(requested_by: &str) -> Result<Self> {
        let requested_by = HeaderValue::from_str(requested_by).map_err(|e| {
            ConfigError::invalid_option(format!("Invalid X-Requested-By value: {e}"))
        })?;
        Ok(Self { requested_by })
    }
}

impl Interceptor for HeadersInterceptor {
    fn intercept(&self, request: &mut Request) -> Result<()> {
        let headers = request.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            HeaderName::from_static(X_REQUESTED_BY),
            self.requested_by.clone(),
        );
        Ok(())
    }
}

/// Attaches the bearer token.
pub struct AuthenticationInterceptor {
    authorization: HeaderValue,
}

impl AuthenticationInterceptor {
    /// Creates the interceptor.
    ///
    /// # Errors
    ///
    /// Returns an error if the token contains characters not allowed in a header.
    pub fn new(token: &str) -> Result<Self> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ConfigError::invalid_option("Token contains invalid characters"))?;
        authorization.set_sensitive(true);
        Ok(Self { authorization })
    }
}

impl fmt::Debug for AuthenticationInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticationInterceptor")
            .field("authorization", &"Bearer <redacted>")
            .finish()
    }
}

impl Interceptor for AuthenticationInterceptor {
    fn intercept(&self, request: &mut Request) -> Result<()> {
        request
            .headers_mut()
            .insert(header::AUTHORIZATION, self.authorization.clone());
        Ok(())
    }
}

/// Appends `team=<name>` to the query string when a team is set.
#[derive(Debug, Clone, Default)]
pub struct TeamInterceptor {
    team: Option<String>,
}

impl TeamInterceptor {
    /// Creates the interceptor. A blank team disables scoping.
    #[must_use]
    pub fn new(team: Option<&str>) -> Self {
        Self {
            team: team
                .filter(|t| !t.trim().is_empty())
                .map(ToString::to_string),
        }
    }
}

impl Interceptor for TeamInterceptor {
    fn intercept(&self, request: &mut Request) -> Result<()> {
        if let Some(team) = &self.team {
            request.url_mut().query_pairs_mut().append_pair(TEAM_PARAM, team);
        }
        Ok(())
    }
}

/// Ordered list of interceptors.
#[derive(Debug, Clone, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the standard chain: headers, authentication, team scoping.
    ///
    /// # Errors
    ///
    /// Returns an error if a header value cannot be built.
    pub fn standard(credentials: &Credentials, options: &ClientOptions) -> Result<Self> {
        Ok(Self::new()
            .with(HeadersInterceptor::new(&options.requested_by)?)
            .with(AuthenticationInterceptor::new(credentials.token())?)
            .with(TeamInterceptor::new(credentials.team())))
    }

    /// Appends an interceptor to the end of the chain.
    #[must_use]
    pub fn with(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Appends every interceptor of `other`, keeping their order.
    #[must_use]
    pub fn append(mut self, other: Self) -> Self {
        self.interceptors.extend(other.interceptors);
        self
    }

    /// Returns the number of interceptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Returns true if the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Applies every interceptor in order.
    ///
    /// # Errors
    ///
    /// Returns the first interceptor error.
    pub fn apply(&self, request: &mut Request) -> Result<()> {
        for interceptor in &self.interceptors {
            trace!("Applying {interceptor:?}");
            interceptor.intercept(request)?;
        }
        Ok(())
    }
}
