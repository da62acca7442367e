use crate::error::Error;
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use std::fs::File;
use std::io::BufReader;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub type SharedConfig = Arc<Config>;

/// API group the webhook registers under when `GROUP_NAME` isn't set.
pub const DEFAULT_GROUP_NAME: &str = "alidns.crazygit.github.io";

/// Alibaba Cloud DNS endpoint used when no region is configured.
pub const DEFAULT_ENDPOINT_HOST: &str = "alidns.aliyuncs.com";

#[serde_as]
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_group_name")]
    pub group_name: String,
    #[serde(default)]
    pub region_id: Option<String>,
    /// Full base URL overriding the region derived endpoint, e.g. `http://127.0.0.1:8080`.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_api_bind_addr")]
    pub api_bind_addr: SocketAddr,
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "default_api_timeout")]
    pub api_timeout: Duration,
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Duration,
}

fn default_group_name() -> String {
    DEFAULT_GROUP_NAME.to_string()
}

fn default_api_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8443))
}

fn default_api_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            group_name: default_group_name(),
            region_id: None,
            endpoint: None,
            api_bind_addr: default_api_bind_addr(),
            api_timeout: default_api_timeout(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Config {
    /// Load a JSON config file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IO`] if the file can't be read and [`Error::InvalidJSON`] if it
    /// doesn't parse.
    pub fn try_from_file(p: impl AsRef<Path>) -> Result<Self, Error> {
        let f = File::open(p)?;
        let reader = BufReader::new(f);
        let conf: Config = serde_json::from_reader(reader)?;
        Ok(conf)
    }

    /// Build a config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let mut conf = Config::default();

        if let Some(group_name) = get("GROUP_NAME") {
            conf.group_name = group_name;
        }
        conf.region_id = get("ALIBABA_CLOUD_REGION_ID");
        conf.endpoint = get("ALIDNS_ENDPOINT");
        if let Some(addr) = get("WEBHOOK_BIND_ADDR") {
            conf.api_bind_addr = parse_var("WEBHOOK_BIND_ADDR", &addr)?;
        }
        if let Some(secs) = get("WEBHOOK_TIMEOUT_SECS") {
            conf.api_timeout = Duration::from_secs(parse_var("WEBHOOK_TIMEOUT_SECS", &secs)?);
        }
        if let Some(secs) = get("ALIDNS_REQUEST_TIMEOUT_SECS") {
            conf.request_timeout =
                Duration::from_secs(parse_var("ALIDNS_REQUEST_TIMEOUT_SECS", &secs)?);
        }
        Ok(conf)
    }

    /// Host name of the Alibaba Cloud DNS endpoint for the configured region.
    #[must_use]
    pub fn endpoint_host(&self) -> String {
        endpoint_host_for_region(self.region_id.as_deref())
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.endpoint_host()),
        }
    }
}

/// Map an optional region id to an Alibaba Cloud DNS endpoint host.
#[must_use]
pub fn endpoint_host_for_region(region_id: Option<&str>) -> String {
    match region_id {
        Some(region) if !region.is_empty() => format!("alidns.{region}.aliyuncs.com"),
        _ => DEFAULT_ENDPOINT_HOST.to_string(),
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T, Error>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|err| Error::InvalidConfig(format!("{key}={value:?}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_endpoint_default() {
        assert_eq!(endpoint_host_for_region(None), "alidns.aliyuncs.com");
        assert_eq!(endpoint_host_for_region(Some("")), "alidns.aliyuncs.com");
    }

    #[test]
    fn test_endpoint_with_region() {
        assert_eq!(
            endpoint_host_for_region(Some("cn-hangzhou")),
            "alidns.cn-hangzhou.aliyuncs.com"
        );
    }

    #[test]
    fn test_from_lookup_defaults() {
        let conf = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(conf, Config::default());
        assert_eq!(conf.group_name, DEFAULT_GROUP_NAME);
        assert_eq!(conf.endpoint_url(), "https://alidns.aliyuncs.com");
    }

    #[test]
    fn test_from_lookup_overrides() {
        let conf = Config::from_lookup(lookup(&[
            ("GROUP_NAME", "acme.example.com"),
            ("ALIBABA_CLOUD_REGION_ID", "cn-shanghai"),
            ("WEBHOOK_BIND_ADDR", "127.0.0.1:9443"),
            ("WEBHOOK_TIMEOUT_SECS", "5"),
            ("ALIDNS_REQUEST_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(conf.group_name, "acme.example.com");
        assert_eq!(conf.endpoint_host(), "alidns.cn-shanghai.aliyuncs.com");
        assert_eq!(conf.api_bind_addr, "127.0.0.1:9443".parse().unwrap());
        assert_eq!(conf.api_timeout, Duration::from_secs(5));
        assert_eq!(conf.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_from_lookup_empty_group_name_uses_default() {
        let conf = Config::from_lookup(lookup(&[("GROUP_NAME", "")])).unwrap();
        assert_eq!(conf.group_name, DEFAULT_GROUP_NAME);
    }

    #[test]
    fn test_from_lookup_invalid_value() {
        let err = Config::from_lookup(lookup(&[("WEBHOOK_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(err.to_string().contains("WEBHOOK_TIMEOUT_SECS"));
    }

    #[test]
    fn test_endpoint_override() {
        let conf = Config {
            endpoint: Some("http://127.0.0.1:8080/".to_string()),
            ..Config::default()
        };
        assert_eq!(conf.endpoint_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_deserialize_partial_json() {
        let conf: Config = serde_json::from_str(
            r#"{ "group_name": "acme.example.com", "region_id": "cn-beijing", "api_timeout": 10 }"#,
        )
        .unwrap();
        assert_eq!(conf.group_name, "acme.example.com");
        assert_eq!(conf.endpoint_host(), "alidns.cn-beijing.aliyuncs.com");
        assert_eq!(conf.api_timeout, Duration::from_secs(10));
        assert_eq!(conf.request_timeout, Duration::from_secs(10));
    }
}
