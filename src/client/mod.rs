//! Client layer: validates calls, resolves the key and performs the HTTP exchange.

mod config;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{ApiCall, ApiKey, ApiResponse, Registry, ValidationError, resolve_key};
use crate::transport::TransportError;

pub use config::{API_KEY_ENV, DEFAULT_ENDPOINT};
use config::DefaultKey;

const LOG_TARGET: &str = "mandrill";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`MandrillClient`].
///
/// HTTP status codes are not inspected: Mandrill error bodies come back as
/// ordinary [`ApiResponse::Json`] values.
pub enum MandrillError {
    /// The call was rejected before anything was sent.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The request payload could not be serialized.
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// Response body could not be decoded as JSON.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// The configured endpoint does not form a valid call URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[source] url::ParseError),
}

impl From<TransportError> for MandrillError {
    fn from(value: TransportError) -> Self {
        match value {
            TransportError::Endpoint(err) => Self::InvalidEndpoint(err),
            TransportError::Json(err) => Self::Encode(err),
        }
    }
}

#[derive(Debug, Default)]
struct ClientState {
    api_key: Option<ApiKey>,
    verbose: bool,
    // Nothing assigns this yet; failures are reported through `Result`.
    last_error: Option<String>,
}

#[derive(Debug, Clone)]
/// Builder for [`MandrillClient`].
///
/// Use this when you need to customize the endpoint, timeout, user-agent or
/// where the fallback API key comes from.
pub struct MandrillClientBuilder {
    api_key: Option<String>,
    default_key: DefaultKey,
    endpoint: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    verbose: bool,
}

impl Default for MandrillClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MandrillClientBuilder {
    /// Create a builder with the default endpoint, no stored key and the
    /// environment as the fallback key source.
    pub fn new() -> Self {
        Self {
            api_key: None,
            default_key: DefaultKey::Environment,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout: None,
            user_agent: None,
            verbose: false,
        }
    }

    /// Store `key` on the client up front, as [`MandrillClient::set_api_key`] would.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Use `key` as the fallback instead of reading [`API_KEY_ENV`].
    pub fn default_api_key(mut self, key: impl Into<String>) -> Self {
        self.default_key = DefaultKey::Fixed(key.into());
        self
    }

    /// Do not fall back to any default key.
    pub fn no_default_api_key(mut self) -> Self {
        self.default_key = DefaultKey::Disabled;
        self
    }

    /// Override the base URL call paths are appended to.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Start with diagnostics enabled.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Build a [`MandrillClient`].
    pub fn build(mut self) -> Result<MandrillClient, MandrillError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent.take() {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| MandrillError::Transport(Box::new(err)))?;

        self.into_client(Arc::new(ReqwestTransport { client }))
    }

    fn into_client(self, http: Arc<dyn HttpTransport>) -> Result<MandrillClient, MandrillError> {
        let api_key = self.api_key.map(ApiKey::new).transpose()?;
        let default_key = self.default_key.resolve()?;

        Ok(MandrillClient {
            endpoint: self.endpoint,
            default_key,
            state: Arc::new(Mutex::new(ClientState {
                api_key,
                verbose: self.verbose,
                last_error: None,
            })),
            http,
        })
    }
}

#[derive(Clone)]
/// Mandrill API client.
///
/// Every call is checked against [`Registry::global`], given an API key and
/// sent as a JSON `POST` to `{endpoint}/{type}/{call}.json`.
///
/// Key precedence for each call:
/// 1. the call's own `key` parameter (which is then stored on the client),
/// 2. the key stored on the client,
/// 3. the default key, read once from [`API_KEY_ENV`] unless overridden
///    through the builder.
///
/// Clones share the stored key and the verbose flag.
pub struct MandrillClient {
    endpoint: String,
    default_key: Option<ApiKey>,
    state: Arc<Mutex<ClientState>>,
    http: Arc<dyn HttpTransport>,
}

impl MandrillClient {
    /// Create a client using the default endpoint and the environment default key.
    ///
    /// For more customization, use [`MandrillClient::builder`].
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            default_key: config::env_default_key().cloned(),
            state: Arc::new(Mutex::new(ClientState::default())),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder() -> MandrillClientBuilder {
        MandrillClientBuilder::new()
    }

    /// Perform a call described by one flat JSON object.
    ///
    /// `params` must carry string `type` and `call` entries naming the target;
    /// both are removed before validation. Every other entry is a call
    /// parameter.
    ///
    /// ```rust,no_run
    /// # async fn demo() -> Result<(), mandrill::MandrillError> {
    /// let client = mandrill::MandrillClient::new();
    /// let pong = client
    ///     .call(serde_json::json!({ "type": "users", "call": "ping" }))
    ///     .await?;
    /// assert_eq!(pong.as_raw(), Some("\"PONG!\""));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call(&self, params: Value) -> Result<ApiResponse, MandrillError> {
        let call = ApiCall::from_value(params)?;
        self.execute(call).await
    }

    /// Perform `call_type`/`call_name` with `params`.
    pub async fn invoke(
        &self,
        call_type: &str,
        call_name: &str,
        params: Map<String, Value>,
    ) -> Result<ApiResponse, MandrillError> {
        self.execute(ApiCall::new(call_type, call_name, params)).await
    }

    /// Validate, authenticate and send one call.
    ///
    /// Errors:
    /// - [`MandrillError::Validation`] for unknown calls, unknown parameters or
    ///   when no API key can be resolved,
    /// - [`MandrillError::Transport`] when the HTTP exchange fails,
    /// - [`MandrillError::Parse`] when a non-`ping` response is not JSON.
    pub async fn execute(&self, call: ApiCall) -> Result<ApiResponse, MandrillError> {
        let verbose = self.is_verbose();

        call.validate(Registry::global()).inspect_err(|err| {
            if verbose {
                debug!(
                    target: LOG_TARGET,
                    call_type = call.call_type(),
                    call = call.call_name(),
                    "rejected call: {err}"
                );
            }
        })?;

        let key = self.resolve_and_store(call.explicit_key()?)?;
        let url =
            crate::transport::endpoint_url(&self.endpoint, call.call_type(), call.call_name())?;
        let call_name = call.call_name().to_owned();
        let payload = call.into_payload(&key);
        let body = crate::transport::encode_payload(&payload)?;

        if verbose {
            debug!(
                target: LOG_TARGET,
                url = %url,
                data = %crate::transport::redacted_payload(&payload),
                "sending request"
            );
        }

        let response = self
            .http
            .post_json(url.as_str(), body)
            .await
            .map_err(MandrillError::Transport)?;

        if verbose {
            debug!(
                target: LOG_TARGET,
                status = response.status,
                bytes = response.body.len(),
                "received response"
            );
        }

        crate::transport::decode_response(&call_name, &response.body)
            .map_err(|err| MandrillError::Parse(Box::new(err)))
    }

    /// Store `key` for every later call that does not carry its own.
    pub fn set_api_key(&self, key: impl Into<String>) -> Result<(), ValidationError> {
        let key = ApiKey::new(key)?;
        self.state().api_key = Some(key);
        Ok(())
    }

    /// Run key resolution against `params` and store the outcome.
    ///
    /// A `key` entry wins. An empty mapping behaves like
    /// [`MandrillClient::load_default_api_key`]. Otherwise the stored key is
    /// kept, falling back to the default key.
    pub fn set_api_key_from(
        &self,
        params: &Map<String, Value>,
    ) -> Result<ApiKey, ValidationError> {
        if params.is_empty() {
            return self.load_default_api_key();
        }
        let explicit = params
            .get(ApiKey::FIELD)
            .map(ApiKey::from_value)
            .transpose()?;
        self.resolve_and_store(explicit)
    }

    /// Store the default key, replacing any stored key.
    ///
    /// Without a default key the stored key is kept; with neither, this fails
    /// with [`ValidationError::MissingApiKey`].
    pub fn load_default_api_key(&self) -> Result<ApiKey, ValidationError> {
        match &self.default_key {
            Some(key) => {
                self.state().api_key = Some(key.clone());
                Ok(key.clone())
            }
            None => self.resolve_and_store(None),
        }
    }

    /// The key currently stored on the client.
    pub fn api_key(&self) -> Option<ApiKey> {
        self.state().api_key.clone()
    }

    pub fn set_verbose(&self, verbose: bool) {
        self.state().verbose = verbose;
    }

    /// Flip the verbose flag and return the new value.
    pub fn toggle_verbose(&self) -> bool {
        let mut state = self.state();
        state.verbose = !state.verbose;
        state.verbose
    }

    pub fn is_verbose(&self) -> bool {
        self.state().verbose
    }

    /// Always `None` for now: errors are returned from each call instead.
    pub fn last_error(&self) -> Option<String> {
        self.state().last_error.clone()
    }

    /// Every call this client accepts.
    pub fn api_calls(&self) -> &'static Registry {
        Registry::global()
    }

    pub fn version(&self) -> &'static str {
        crate::VERSION
    }

    fn resolve_and_store(&self, explicit: Option<ApiKey>) -> Result<ApiKey, ValidationError> {
        let mut state = self.state();
        let resolved = resolve_key(explicit, state.api_key.as_ref(), self.default_key.as_ref())?;
        if resolved.should_store() {
            state.api_key = Some(resolved.key.clone());
        }
        Ok(resolved.key)
    }

    fn state(&self) -> MutexGuard<'_, ClientState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MandrillClient {
    fn default() -> Self {
        Self::new()
    }
}
