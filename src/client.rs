//! Loading of stylesheets.
//!
//! This module defines two structs, [`Client`] and [`ClientBuilder`].
//! `Client` reads the stylesheet text for an [`Input`], be it a remote URL,
//! a local file or standard input. `ClientBuilder` configures the HTTP side
//! of it: TLS verification, proxy, credentials and user agent.
//!
//! Every input is loaded with a single attempt. Timeouts are left to the
//! transport defaults.
#![allow(clippy::module_name_repetitions)]
use headers::{Authorization, HeaderMapExt};
use http::header::{HeaderMap, HeaderValue};
use log::{debug, warn};
use reqwest::{header, Url};
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;
use tokio::io::AsyncReadExt;
use typed_builder::TypedBuilder;

use crate::{AnalysisRequest, ErrorKind, Input, Result};

/// Default user agent, `analyze-css/<PKG_VERSION>`.
pub const DEFAULT_USER_AGENT: &str = concat!("analyze-css/", env!("CARGO_PKG_VERSION"));

/// User name and password for HTTP basic authentication
#[derive(Debug)]
pub struct Credentials {
    /// User name
    pub username: Option<String>,
    /// Password
    pub password: Option<SecretString>,
}

impl Credentials {
    /// Build the `Authorization` header.
    ///
    /// Only complete credentials produce a header. A lone user name or
    /// password is accepted but not sent.
    fn to_authorization(&self) -> Option<Authorization<headers::authorization::Basic>> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some(Authorization::basic(
                username,
                password.expose_secret(),
            )),
            (None, None) => None,
            _ => {
                warn!("Incomplete credentials given, basic authentication is not applied");
                None
            }
        }
    }
}

/// Builder for [`Client`].
#[derive(TypedBuilder, Debug)]
#[builder(field_defaults(default, setter(into)))]
#[builder(builder_method(doc = "
Create a builder for building `ClientBuilder`.

On the builder call, call methods with same name as its fields to set their values.

Finally, call `.build()` to create the instance of `ClientBuilder`.
"))]
pub struct ClientBuilder {
    /// When `true`, accept invalid SSL certificates.
    ///
    /// ## Warning
    ///
    /// Any certificate for any site will be trusted, including expired
    /// and self-signed ones. Only use this for stylesheets you trust.
    allow_insecure: bool,

    /// Route every request through this proxy, e.g. `http://127.0.0.1:8080`
    proxy: Option<String>,

    /// HTTP basic authentication
    credentials: Option<Credentials>,

    /// User-agent used for fetching stylesheets.
    #[builder(default_code = "String::from(DEFAULT_USER_AGENT)")]
    user_agent: String,
}

impl Default for ClientBuilder {
    #[inline]
    fn default() -> Self {
        Self::builder().build()
    }
}

impl From<&AnalysisRequest> for ClientBuilder {
    fn from(request: &AnalysisRequest) -> Self {
        let credentials = match (&request.auth_user, &request.auth_pass) {
            (None, None) => None,
            (username, password) => Some(Credentials {
                username: username.clone(),
                password: password
                    .as_ref()
                    .map(|p| SecretString::new(p.expose_secret().clone())),
            }),
        };

        Self::builder()
            .allow_insecure(request.ignore_ssl_errors)
            .proxy(request.proxy.clone())
            .credentials(credentials)
            .user_agent(request.user_agent.clone())
            .build()
    }
}

impl ClientBuilder {
    /// Instantiates a [`Client`].
    ///
    /// # Errors
    ///
    /// Returns an `Err` if:
    /// - The user-agent is invalid.
    /// - The proxy cannot be parsed.
    /// - The request client cannot be created.
    ///   See [here](https://docs.rs/reqwest/latest/reqwest/struct.ClientBuilder.html#errors).
    pub fn client(self) -> Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_str(&self.user_agent)?);

        if let Some(auth) = self.credentials.as_ref().and_then(Credentials::to_authorization) {
            headers.typed_insert(auth);
        }

        let mut builder = reqwest::ClientBuilder::new()
            .gzip(true)
            .default_headers(headers)
            .danger_accept_invalid_certs(self.allow_insecure);

        if let Some(proxy) = self.proxy {
            let parsed =
                reqwest::Proxy::all(&proxy).map_err(|e| ErrorKind::InvalidProxy(proxy.clone(), e))?;
            debug!("Using proxy {proxy}");
            builder = builder.proxy(parsed);
        }

        let reqwest_client = builder.build().map_err(ErrorKind::BuildClient)?;

        Ok(Client { reqwest_client })
    }
}

/// Reads stylesheets from any supported [`Input`]
#[derive(Debug, Clone)]
pub struct Client {
    reqwest_client: reqwest::Client,
}

impl Client {
    /// Load the stylesheet text for the given input.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if the stylesheet cannot be loaded. Remote
    /// stylesheets also fail on any non-2xx status code.
    pub async fn fetch(&self, input: &Input) -> Result<String> {
        debug!("Loading stylesheet from {input}");
        match input {
            Input::RemoteUrl(url) => self.fetch_url(url).await,
            Input::FsPath(path) => read_file(path).await,
            Input::Stdin => read_stdin().await,
        }
    }

    async fn fetch_url(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url).map_err(|e| ErrorKind::InvalidUrl(url.to_string(), e))?;

        let response = self
            .reqwest_client
            .get(parsed)
            .send()
            .await
            .map_err(ErrorKind::NetworkRequest)?;

        let status = response.status();
        debug!("{url} responded with {status}");
        if !status.is_success() {
            return Err(ErrorKind::RejectedStatusCode(url.to_string(), status));
        }

        response.text().await.map_err(ErrorKind::NetworkRequest)
    }
}

async fn read_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ErrorKind::ReadFileInput(path.to_path_buf(), e))
}

async fn read_stdin() -> Result<String> {
    let mut content = String::new();
    tokio::io::stdin()
        .read_to_string(&mut content)
        .await
        .map_err(ErrorKind::ReadStdinInput)?;
    Ok(content)
}
