use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Body of `POST /command`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub query: String,
    pub auto_execute: bool,
}

impl CommandRequest {
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            auto_execute: false,
        }
    }

    pub fn execute(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            auto_execute: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `POST /command`.
///
/// The launcher only looks at which fields are present; everything else the
/// backend sends is kept in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    #[serde(default)]
    pub matched_command: Option<String>,
    #[serde(default)]
    pub generated: Option<Value>,
    #[serde(default)]
    pub intent: Option<Intent>,
    #[serde(default)]
    pub executed: Option<Value>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// JSON truthiness: `null`, `false`, `0` and `""` count as absent.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl CommandResponse {
    /// Name of the stored command the backend matched, if any.
    pub fn matched_command(&self) -> Option<&str> {
        self.matched_command.as_deref().filter(|c| !c.is_empty())
    }

    pub fn is_generated(&self) -> bool {
        self.generated.as_ref().is_some_and(is_truthy)
    }

    pub fn intent_action(&self) -> Option<&str> {
        self.intent.as_ref().and_then(|i| i.action.as_deref())
    }

    pub fn executed(&self) -> bool {
        self.executed.as_ref().is_some_and(is_truthy)
    }

    /// Output of an execution, empty output counting as none.
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref().filter(|o| !o.is_empty())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned HTTP {0}")]
    Status(u16),
    #[error("response has no matched command, generated script or intent")]
    Unclassifiable,
}

/// Anything able to answer command requests. The HTTP client is the real
/// implementation; tests substitute their own.
pub trait BackendClient: Send + Sync {
    fn post_command(&self, request: &CommandRequest) -> Result<CommandResponse, BackendError>;

    /// Check whether the backend is up.
    fn health(&self) -> Result<(), BackendError>;
}

pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("lca-launcher")
            .no_proxy()
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl BackendClient for HttpBackend {
    fn post_command(&self, request: &CommandRequest) -> Result<CommandResponse, BackendError> {
        let url = format!("{}/command", self.base_url);
        tracing::debug!(query = %request.query, auto_execute = request.auto_execute, "POST {url}");
        let resp = self.client.post(&url).json(request).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }
        Ok(resp.json::<CommandResponse>()?)
    }

    fn health(&self) -> Result<(), BackendError> {
        let resp = self.client.get(format!("{}/", self.base_url)).send()?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(BackendError::Status(status.as_u16()))
        }
    }
}
