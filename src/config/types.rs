//! Configuration types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Default coordination-service session timeout in milliseconds.
fn default_session_timeout_ms() -> u64 {
    3000
}

/// Default grace period before a stubborn child is force-killed, in milliseconds.
fn default_terminate_grace_ms() -> u64 {
    5000
}

fn default_endpoints() -> Vec<String> {
    vec!["localhost:2181".to_string()]
}

/// Configuration for the supervisor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Coordination-service endpoints as `host:port` pairs.
    pub endpoints: Vec<String>,
    /// Path of the watched node.
    pub node_path: String,
    /// Command vector launched when the node has data. The first element is
    /// the program, the rest are its arguments.
    pub command: Vec<String>,
    /// Session timeout handed to the coordination-service client.
    pub session_timeout_ms: u64,
    /// How long a child gets to exit after SIGTERM before SIGKILL.
    pub terminate_grace_ms: u64,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            endpoints: default_endpoints(),
            node_path: String::new(),
            command: Vec::new(),
            session_timeout_ms: default_session_timeout_ms(),
            terminate_grace_ms: default_terminate_grace_ms(),
        }
    }
}

impl SupervisorConfig {
    /// Endpoints joined into the comma-separated connect string clients expect.
    #[must_use]
    pub fn endpoint_string(&self) -> String {
        self.endpoints.join(",")
    }

    /// Session timeout as a `Duration`.
    #[must_use]
    pub fn session_timeout(&self) -> Duration {
        Duration::from_millis(self.session_timeout_ms)
    }

    /// Termination grace period as a `Duration`.
    #[must_use]
    pub fn terminate_grace(&self) -> Duration {
        Duration::from_millis(self.terminate_grace_ms)
    }

    /// Validate the configuration before wiring the supervisor.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no endpoints are given, the node path does not
    /// start with `/`, or the command vector is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }
        if !self.node_path.starts_with('/') {
            return Err(ConfigError::InvalidNodePath(self.node_path.clone()));
        }
        if self.command.is_empty() {
            return Err(ConfigError::EmptyCommand);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SupervisorConfig::default();
        assert_eq!(config.endpoints, vec!["localhost:2181".to_string()]);
        assert_eq!(config.session_timeout_ms, 3000);
        assert_eq!(config.terminate_grace_ms, 5000);
        assert!(config.command.is_empty());
    }

    #[test]
    fn test_endpoint_string_joins_with_commas() {
        let config = SupervisorConfig {
            endpoints: vec![
                "localhost:2181".to_string(),
                "localhost:2182".to_string(),
                "localhost:2183".to_string(),
            ],
            ..Default::default()
        };
        assert_eq!(
            config.endpoint_string(),
            "localhost:2181,localhost:2182,localhost:2183"
        );
    }

    #[test]
    fn test_validate_rejects_empty_endpoints() {
        let config = SupervisorConfig {
            endpoints: Vec::new(),
            node_path: "/app".to_string(),
            command: vec!["date".to_string()],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoEndpoints)));
    }

    #[test]
    fn test_validate_rejects_relative_node_path() {
        let config = SupervisorConfig {
            node_path: "app/config".to_string(),
            command: vec!["date".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidNodePath(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_command() {
        let config = SupervisorConfig {
            node_path: "/app".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyCommand)));
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        let config = SupervisorConfig {
            node_path: "/app/config".to_string(),
            command: vec!["date".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_from_toml() {
        let toml_str = r#"
            endpoints = ["zk1:2181", "zk2:2181"]
            node_path = "/services/worker"
            command = ["worker", "--foreground"]
            terminate_grace_ms = 1000
        "#;
        let config: SupervisorConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.endpoints.len(), 2);
        assert_eq!(config.node_path, "/services/worker");
        assert_eq!(config.command, vec!["worker", "--foreground"]);
        assert_eq!(config.terminate_grace(), Duration::from_millis(1000));
        assert_eq!(config.session_timeout_ms, 3000);
    }
}
