//! Diagnostic channel for script results.
//!
//! Results and failures travel the same way: to the local log in
//! development, or as a log envelope through the message transport when
//! deployed. Which one is used is decided once from [`DiagnosticMode`].

use crate::constants::{IFRAME_SOURCE, LOG_KEY, LOG_MSG_KEY};
use crate::script::ScriptError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

/// Outcome of a script run as delivered to a sink.
pub type Diagnostic = Result<Value, ScriptError>;

/// Where diagnostics go
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticMode {
    /// Local log output
    Development,
    /// Log envelopes through the message transport
    #[default]
    Production,
}

/// Receiver of script diagnostics. Emission is fire-and-forget.
pub trait DiagnosticSink {
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Envelope sent to the background context for a log event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub from: String,
    pub key: String,
    pub value: Value,
}

impl LogEnvelope {
    pub fn log(value: Value) -> Self {
        Self {
            kind: LOG_MSG_KEY.to_string(),
            from: IFRAME_SOURCE.to_string(),
            key: LOG_KEY.to_string(),
            value,
        }
    }

    /// Envelope for a diagnostic; failures carry their message as a string.
    pub fn from_diagnostic(diagnostic: &Diagnostic) -> Self {
        match diagnostic {
            Ok(value) => Self::log(value.clone()),
            Err(err) => Self::log(Value::String(err.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MessengerError {
    #[error("message channel closed")]
    Closed,
}

/// Send side of the cross-context message transport. No reply is awaited.
pub trait Messenger {
    fn send(&self, envelope: LogEnvelope) -> Result<(), MessengerError>;
}

/// Messenger over an in-process channel; the receiving end routes envelopes
/// to the real transport.
#[derive(Debug, Clone)]
pub struct ChannelMessenger {
    sender: UnboundedSender<LogEnvelope>,
}

impl ChannelMessenger {
    pub fn new(sender: UnboundedSender<LogEnvelope>) -> Self {
        Self { sender }
    }
}

impl Messenger for ChannelMessenger {
    fn send(&self, envelope: LogEnvelope) -> Result<(), MessengerError> {
        self.sender
            .send(envelope)
            .map_err(|_| MessengerError::Closed)
    }
}

/// Writes diagnostics to the local log.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl DiagnosticSink for ConsoleSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Ok(value) => tracing::info!("[EI] {}", value),
            Err(err) => tracing::error!(error = %err, "[EI] script failed"),
        }
    }
}

/// Dispatches diagnostics as log envelopes.
#[derive(Debug, Clone)]
pub struct MessageSink<M> {
    messenger: M,
}

impl<M: Messenger> MessageSink<M> {
    pub fn new(messenger: M) -> Self {
        Self { messenger }
    }
}

impl<M: Messenger> DiagnosticSink for MessageSink<M> {
    fn emit(&self, diagnostic: &Diagnostic) {
        let envelope = LogEnvelope::from_diagnostic(diagnostic);
        if let Err(err) = self.messenger.send(envelope) {
            tracing::warn!(error = %err, "dropping diagnostic message");
        }
    }
}

/// Install a global stderr subscriber so [`ConsoleSink`] output is visible.
/// `RUST_LOG` overrides the default `info` level.
///
/// Returns false when a global subscriber was already set; that one stays.
pub fn install_console_logging() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

/// Pick the sink for a mode. Called once at startup.
pub fn sink_for<M>(mode: DiagnosticMode, messenger: M) -> Box<dyn DiagnosticSink>
where
    M: Messenger + 'static,
{
    match mode {
        DiagnosticMode::Development => Box::new(ConsoleSink),
        DiagnosticMode::Production => Box::new(MessageSink::new(messenger)),
    }
}
