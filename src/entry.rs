//! Synthetic log record types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Debug, Level::Info, Level::Warn, Level::Error];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| format!("unknown level '{}'", s))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request context attached to every entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogContext {
    pub user_id: String,
    pub request_id: String,
}

impl LogContext {
    /// JSON text used for the flattened `context` column in CSV output.
    ///
    /// Keys are separated by `", "` and `": "` to match the historical
    /// files produced by the generator.
    pub fn to_flat_json(&self) -> Result<String, serde_json::Error> {
        Ok(format!(
            "{{\"user_id\": {}, \"request_id\": {}}}",
            serde_json::to_string(&self.user_id)?,
            serde_json::to_string(&self.request_id)?,
        ))
    }
}

/// One generated record. Fields are private so a built entry cannot be
/// changed after the generator hands it out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    timestamp: String,
    service: String,
    level: Level,
    message: String,
    context: LogContext,
}

impl LogEntry {
    pub fn new(
        timestamp: impl Into<String>,
        service: impl Into<String>,
        level: Level,
        message: impl Into<String>,
        context: LogContext,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            service: service.into(),
            level,
            message: message.into(),
            context,
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &LogContext {
        &self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn sample() -> LogEntry {
        LogEntry::new(
            "2026-10-19T08:15:02.123456Z",
            "auth",
            Level::Warn,
            "Token expired",
            LogContext {
                user_id: "4821".to_string(),
                request_id: "req_55012".to_string(),
            },
        )
    }

    #[test]
    fn level_serializes_upper_case() {
        let v = serde_json::to_value(Level::Error).unwrap();
        assert_eq!(v, Value::String("ERROR".to_string()));
        let back: Level = serde_json::from_str("\"DEBUG\"").unwrap();
        assert_eq!(back, Level::Debug);
    }

    #[test]
    fn entry_json_shape_has_nested_context() {
        let v = serde_json::to_value(sample()).unwrap();
        assert_eq!(v["service"], "auth");
        assert_eq!(v["level"], "WARN");
        assert_eq!(v["context"]["user_id"], "4821");
        assert_eq!(v["context"]["request_id"], "req_55012");
        let keys: Vec<&String> = v.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 5);
    }

    #[test]
    fn flat_context_is_valid_json() {
        let entry = sample();
        let flat = entry.context().to_flat_json().unwrap();
        assert_eq!(flat, r#"{"user_id": "4821", "request_id": "req_55012"}"#);
        let back: LogContext = serde_json::from_str(&flat).unwrap();
        assert_eq!(&back, entry.context());
    }
}
