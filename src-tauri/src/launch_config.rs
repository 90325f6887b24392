use std::{fs, path::Path};

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;
use url::Url;

use crate::{
    readiness::ReadinessTarget, DEFAULT_CHECKER_ADDRESS, DEFAULT_CHECKER_TIMEOUT_SECS,
};

/// Launch configuration read once from `config.json` at startup.
///
/// Every field is optional. `port` and `timeout` stay untyped here because the
/// file is edited by hand and both numbers and numeric strings show up in it;
/// they are normalized by [`LaunchConfig::readiness_target`].
///
/// A field of the wrong type reads as absent instead of failing the whole
/// file, so a bad `args` never disables an otherwise valid `checker`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct LaunchConfig {
    #[serde(deserialize_with = "lenient")]
    pub(crate) proxy: Option<ProxyConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ProxyConfig {
    #[serde(deserialize_with = "lenient")]
    pub(crate) server_app: Option<ServerAppConfig>,
    #[serde(deserialize_with = "lenient")]
    pub(crate) checker: Option<CheckerConfig>,
    #[serde(deserialize_with = "lenient")]
    pub(crate) rules: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ServerAppConfig {
    #[serde(deserialize_with = "lenient")]
    pub(crate) path: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub(crate) work_dir: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub(crate) args: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct CheckerConfig {
    pub(crate) port: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    pub(crate) address: Option<String>,
    pub(crate) timeout: Option<Value>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn non_empty(raw: Option<&String>) -> Option<&str> {
    raw.map(|value| value.trim()).filter(|value| !value.is_empty())
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    }
}

pub(crate) fn normalize_port(value: Option<&Value>) -> Option<u16> {
    let raw = value_as_f64(value?)?;
    if raw.fract() != 0.0 || raw < 1.0 || raw > f64::from(u16::MAX) {
        return None;
    }
    Some(raw as u16)
}

/// Non-positive or non-numeric timeouts fall back to 60 seconds; fractional
/// values round up to a whole attempt.
pub(crate) fn normalize_timeout(value: Option<&Value>) -> u32 {
    match value.and_then(value_as_f64) {
        Some(raw) if raw.is_finite() && raw > 0.0 => raw.ceil().min(f64::from(u32::MAX)) as u32,
        _ => DEFAULT_CHECKER_TIMEOUT_SECS,
    }
}

/// Accepts a single proxy URL. A bare `host:port` is treated as HTTP.
pub(crate) fn proxy_url_from_rules(rules: &str) -> Result<Url, String> {
    let trimmed = rules.trim();
    if trimmed.is_empty() {
        return Err("Proxy rules are empty.".to_string());
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    let parsed =
        Url::parse(&candidate).map_err(|error| format!("Invalid proxy rules '{trimmed}': {error}"))?;
    match parsed.scheme() {
        "http" | "https" | "socks5" => {}
        scheme => {
            return Err(format!(
                "Unsupported proxy scheme '{scheme}', only http/https/socks5 are allowed."
            ))
        }
    }
    if parsed.host_str().is_none() {
        return Err(format!("Proxy rules '{trimmed}' have no host."));
    }
    Ok(parsed)
}

impl LaunchConfig {
    pub(crate) fn parse(raw: &str) -> Result<Self, String> {
        let value: Value =
            serde_json::from_str(raw).map_err(|error| format!("Invalid JSON: {error}"))?;
        if !value.is_object() {
            return Err("Configuration root is not a JSON object.".to_string());
        }
        serde_json::from_value(value).map_err(|error| format!("Invalid configuration: {error}"))
    }

    /// Missing, unreadable or malformed files all yield the empty configuration.
    pub(crate) fn load<F>(path: &Path, log: F) -> Self
    where
        F: Fn(&str),
    {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) => {
                log(&format!(
                    "config file {} not loaded ({error}); using empty configuration",
                    path.display()
                ));
                return Self::default();
            }
        };

        match Self::parse(&raw) {
            Ok(config) => config,
            Err(error) => {
                log(&format!(
                    "config file {} ignored: {error}; using empty configuration",
                    path.display()
                ));
                Self::default()
            }
        }
    }

    /// The server app to launch, present only when `proxy.serverApp.path` is set.
    pub(crate) fn server_app(&self) -> Option<&ServerAppConfig> {
        let server_app = self.proxy.as_ref()?.server_app.as_ref()?;
        non_empty(server_app.path.as_ref())?;
        Some(server_app)
    }

    /// The readiness check is active only when `proxy.checker.port` is usable.
    pub(crate) fn readiness_target(&self) -> Option<ReadinessTarget> {
        let checker = self.proxy.as_ref()?.checker.as_ref()?;
        let port = normalize_port(checker.port.as_ref())?;
        let address = non_empty(checker.address.as_ref())
            .unwrap_or(DEFAULT_CHECKER_ADDRESS)
            .to_string();

        Some(ReadinessTarget {
            address,
            port,
            timeout_secs: normalize_timeout(checker.timeout.as_ref()),
        })
    }

    pub(crate) fn proxy_rules(&self) -> Option<&str> {
        non_empty(self.proxy.as_ref()?.rules.as_ref())
    }
}

impl ServerAppConfig {
    pub(crate) fn executable(&self) -> Option<&str> {
        non_empty(self.path.as_ref())
    }

    pub(crate) fn work_dir(&self) -> Option<&str> {
        non_empty(self.work_dir.as_ref())
    }

    pub(crate) fn raw_args(&self) -> &str {
        self.args.as_deref().unwrap_or("")
    }
}
