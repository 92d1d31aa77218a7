use url::Url;

use crate::error::StartupConfigError;

/// Connection parameters every client binary requires at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    pub host: String,
    pub port: u16,
}

impl StartupConfig {
    /// Builds the config from `--host=...` / `--port=...` values as given on the command line.
    pub fn from_named(host: Option<&str>, port: Option<&str>) -> Result<Self, StartupConfigError> {
        let host = host
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .ok_or(StartupConfigError::Missing { name: "host" })?;
        let raw_port = port
            .map(str::trim)
            .filter(|port| !port.is_empty())
            .ok_or(StartupConfigError::Missing { name: "port" })?;

        let port = raw_port
            .parse::<u16>()
            .map_err(|err| StartupConfigError::InvalidPort {
                value: raw_port.to_string(),
                reason: err.to_string(),
            })?;
        if port == 0 {
            return Err(StartupConfigError::InvalidPort {
                value: raw_port.to_string(),
                reason: "port must be between 1 and 65535".to_string(),
            });
        }

        let config = Self {
            host: host.to_string(),
            port,
        };
        config.endpoint("/")?;
        Ok(config)
    }

    /// Websocket URL of the game server, e.g. `ws://localhost:5555/ws`.
    pub fn endpoint(&self, path: &str) -> Result<Url, StartupConfigError> {
        let invalid_host = |reason: String| StartupConfigError::InvalidHost {
            host: self.host.clone(),
            reason,
        };

        let mut url = Url::parse(&format!("ws://{}:{}", self.host, self.port))
            .map_err(|err| invalid_host(err.to_string()))?;
        if url.host_str().is_none() {
            return Err(invalid_host("no host component".to_string()));
        }
        if url.path() != "/" || url.query().is_some() {
            return Err(invalid_host("host must not carry a path or query".to_string()));
        }
        url.set_path(path);
        Ok(url)
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
