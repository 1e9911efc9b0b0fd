use anyhow::Context;
use std::env;
use std::time::Duration;
use uuid::Uuid;

/// Runtime configuration for the node service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub build_id: String,
    /// Identity of the signed-in member; decides which messages count as unread.
    pub local_user_id: String,
    /// Load the demo chamber fixture at start-up.
    pub seed: bool,
    /// Delay applied to every mutation, standing in for the backend round-trip.
    pub simulated_latency: Duration,
    pub command_buffer: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got {raw:?}"))?,
            None => 8080,
        };
        let build_id = lookup("CHAMBER_BUILD_ID").unwrap_or_else(|| Uuid::new_v4().to_string());
        let local_user_id = lookup("CHAMBER_LOCAL_USER_ID")
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| chamberconnect_messaging::seed::LOCAL_USER_ID.to_string());

        let seed = match lookup("CHAMBER_SEED") {
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("CHAMBER_SEED must be a boolean, got {raw:?}"))?,
            None => true,
        };
        let latency_ms: u64 = match lookup("CHAMBER_SIMULATED_LATENCY_MS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("CHAMBER_SIMULATED_LATENCY_MS must be an integer, got {raw:?}"))?,
            None => 0,
        };
        let command_buffer: usize = match lookup("CHAMBER_COMMAND_BUFFER") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("CHAMBER_COMMAND_BUFFER must be an integer, got {raw:?}"))?,
            None => 64,
        };

        Ok(Self {
            host,
            port,
            build_id,
            local_user_id,
            seed,
            simulated_latency: Duration::from_millis(latency_ms),
            command_buffer: command_buffer.max(1),
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.local_user_id, "current-user");
        assert!(config.seed);
        assert_eq!(config.simulated_latency, Duration::ZERO);
        assert_eq!(config.command_buffer, 64);
    }

    #[test]
    fn overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("CHAMBER_LOCAL_USER_ID", "user-9"),
            ("CHAMBER_SEED", "off"),
            ("CHAMBER_SIMULATED_LATENCY_MS", "250"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.local_user_id, "user-9");
        assert!(!config.seed);
        assert_eq!(config.simulated_latency, Duration::from_millis(250));
    }

    #[test]
    fn malformed_values_are_errors() {
        assert!(config_from(&[("CHAMBER_SEED", "maybe")]).is_err());
        assert!(config_from(&[("CHAMBER_SIMULATED_LATENCY_MS", "soon")]).is_err());
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("PORT", "70000")]).is_err());
        assert!(config_from(&[("CHAMBER_COMMAND_BUFFER", "-1")]).is_err());
    }
}
