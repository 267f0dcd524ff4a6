//! Rule logger
//!
//! Tags every event with a context string (usually the rule and step) and the
//! message id of the triggering transaction, so one evaluation can be followed
//! across log lines.

/// Structured logger for a rule evaluation
#[derive(Debug, Clone)]
pub struct RuleLogger {
    context: String,
}

impl RuleLogger {
    /// Create a logger with a fixed context
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
        }
    }

    /// Derive a logger for a nested step, e.g. `901@1.0.0` -> `901@1.0.0/history`
    pub fn child(&self, step: &str) -> Self {
        Self {
            context: format!("{}/{}", self.context, step),
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn trace(&self, message: &str, msg_id: Option<&str>) {
        tracing::trace!(
            context = %self.context,
            msg_id = msg_id.unwrap_or("-"),
            "{}",
            message
        );
    }

    pub fn warn(&self, message: &str, msg_id: Option<&str>) {
        tracing::warn!(
            context = %self.context,
            msg_id = msg_id.unwrap_or("-"),
            "{}",
            message
        );
    }

    pub fn error(&self, message: &str, msg_id: Option<&str>) {
        tracing::error!(
            context = %self.context,
            msg_id = msg_id.unwrap_or("-"),
            "{}",
            message
        );
    }
}

impl Default for RuleLogger {
    fn default() -> Self {
        Self::new("rule")
    }
}
