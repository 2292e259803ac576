use log::{debug, info, warn};

/// Scoped logger handed to each pipeline stage.
pub struct LogManager {
    scope: &'static str,
}

impl LogManager {
    pub fn new(scope: &'static str) -> Self {
        Self { scope }
    }

    pub fn record(&self, message: &str) {
        info!(target: self.scope, "{}", message);
    }

    pub fn detail(&self, message: &str) {
        debug!(target: self.scope, "{}", message);
    }

    pub fn warn(&self, message: &str) {
        warn!(target: self.scope, "{}", message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("coveragecore")
    }
}
