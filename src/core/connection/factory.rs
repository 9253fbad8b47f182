use tracing::{debug, warn};
use url::Url;

use super::config::{EndpointConfig, RecognizerConfig};
use super::websocket::SpeechSocket;
use crate::auth::{AuthInfo, Authentication};
use crate::core::protocol::{Headers, WebsocketMessageFormatter, create_no_dash_guid};
use crate::errors::connection_error::{ConnectionError, ConnectionResult};

/// Header carrying the client-chosen connection id.
pub const CONNECTION_ID_HEADER: &str = "X-ConnectionId";

pub const FORMAT_QUERY_PARAM: &str = "format";
pub const LANGUAGE_QUERY_PARAM: &str = "language";
pub const TEST_HOOKS_QUERY_PARAM: &str = "testhooks";

/// Builds connections for a recognizer.
///
/// Implementations validate their inputs and do no network I/O; the
/// returned connection is opened separately.
pub trait ConnectionFactory: Send + Sync {
    fn create(
        &self,
        config: &RecognizerConfig,
        auth: &AuthInfo,
        connection_id: Option<&str>,
    ) -> ConnectionResult<WebsocketConnection>;
}

/// An unopened connection: target URL, upgrade headers and the codec used
/// once the socket is up.
#[derive(Debug, Clone)]
pub struct WebsocketConnection {
    id: String,
    url: Url,
    headers: Headers,
    formatter: WebsocketMessageFormatter,
}

impl WebsocketConnection {
    pub fn new(
        id: impl Into<String>,
        url: Url,
        headers: Headers,
        formatter: WebsocketMessageFormatter,
    ) -> Self {
        Self {
            id: id.into(),
            url,
            headers,
            formatter,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Headers sent on the upgrade request.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn formatter(&self) -> &WebsocketMessageFormatter {
        &self.formatter
    }
}

/// Connection factory for the speech recognition service.
///
/// # Example
///
/// ```rust
/// use speechlink::auth::AuthInfo;
/// use speechlink::core::connection::{
///     ConnectionFactory, EndpointConfig, OutputFormat, RecognitionMode, RecognizerConfig,
///     SpeechConnectionFactory,
/// };
///
/// let factory = SpeechConnectionFactory::new(EndpointConfig::new("westus.stt.speech.microsoft.com"));
/// let config = RecognizerConfig {
///     mode: RecognitionMode::Dictation,
///     language: "en-us".to_string(),
///     format: OutputFormat::Simple,
///     ..Default::default()
/// };
///
/// let connection = factory
///     .create(&config, &AuthInfo::new("Authorization", "tok"), Some("cid1"))
///     .unwrap();
/// assert_eq!(
///     connection.url().as_str(),
///     "wss://westus.stt.speech.microsoft.com/speech/recognition/dictation/cognitiveservices/v1?format=simple&language=en-us"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct SpeechConnectionFactory {
    endpoint: EndpointConfig,
    formatter: WebsocketMessageFormatter,
}

impl SpeechConnectionFactory {
    pub fn new(endpoint: EndpointConfig) -> Self {
        Self {
            endpoint,
            formatter: WebsocketMessageFormatter::default(),
        }
    }

    /// Use a non-default codec for connections built by this factory.
    pub fn with_formatter(mut self, formatter: WebsocketMessageFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    fn build_url(&self, config: &RecognizerConfig) -> ConnectionResult<Url> {
        let mut url = Url::parse(&format!(
            "{}://{}{}",
            self.endpoint.scheme,
            self.endpoint.host,
            config.mode.path()
        ))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair(FORMAT_QUERY_PARAM, config.format.as_str());
            query.append_pair(LANGUAGE_QUERY_PARAM, &config.language);
            if self.endpoint.test_hooks {
                query.append_pair(TEST_HOOKS_QUERY_PARAM, "1");
            }
        }

        Ok(url)
    }

    /// Fetch credentials, build a connection and open it.
    ///
    /// If the service answers the upgrade with 403, credentials are refreshed
    /// through [`Authentication::fetch_on_expiry`] and the upgrade is retried
    /// once.
    pub async fn connect(
        &self,
        config: &RecognizerConfig,
        authentication: &dyn Authentication,
        connection_id: Option<&str>,
    ) -> ConnectionResult<SpeechSocket> {
        let auth = authentication.fetch(&create_no_dash_guid()).await?;
        match self.create(config, &auth, connection_id)?.open().await {
            Err(e) if e.is_credential_rejection() => {
                warn!("Credentials rejected on upgrade, refreshing: {}", e);
                let auth = authentication
                    .fetch_on_expiry(&create_no_dash_guid())
                    .await?;
                self.create(config, &auth, connection_id)?.open().await
            }
            result => result,
        }
    }
}

impl ConnectionFactory for SpeechConnectionFactory {
    fn create(
        &self,
        config: &RecognizerConfig,
        auth: &AuthInfo,
        connection_id: Option<&str>,
    ) -> ConnectionResult<WebsocketConnection> {
        if auth.header_name.trim().is_empty() {
            return Err(ConnectionError::ArgumentNull("authHeaderName".to_string()));
        }
        if auth.token.is_empty() {
            return Err(ConnectionError::ArgumentNull("authToken".to_string()));
        }
        if config.language.trim().is_empty() {
            return Err(ConnectionError::ArgumentNull("language".to_string()));
        }

        let id = match connection_id {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => create_no_dash_guid(),
        };

        let url = self.build_url(config)?;

        let mut headers = Headers::new();
        headers.insert(auth.header_name.as_str(), auth.token.as_str());
        headers.insert(CONNECTION_ID_HEADER, id.as_str());

        debug!("Created speech connection {} for {}", id, url);

        Ok(WebsocketConnection::new(id, url, headers, self.formatter))
    }
}
