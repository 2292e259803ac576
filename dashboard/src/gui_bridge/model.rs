use coveragecore::record::ViewportBound;
use serde::{Deserialize, Serialize};

/// Per-session inputs: chosen network and last reported viewport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub network: Option<String>,
    pub viewport: Option<ViewportBound>,
}

impl SessionState {
    /// Keeps the current selection if it is still an option, else picks the first.
    pub fn reconcile(&mut self, options: &[String]) {
        let still_valid = self
            .network
            .as_ref()
            .map(|network| options.contains(network))
            .unwrap_or(false);
        if !still_valid {
            self.network = options.first().cloned();
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkOptions {
    pub options: Vec<String>,
    pub selected: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectRequest {
    pub network: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReply {
    pub status: String,
    pub message: String,
}

impl StatusReply {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".into(),
            message: message.into(),
        }
    }

    pub fn error(status: &str, message: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            message: message.into(),
        }
    }
}
