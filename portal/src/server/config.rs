//! Portal settings loaded via OrthoConfig.
//!
//! Every value can come from the command line, a configuration file or a
//! `PORTAL_*` environment variable.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use pagination::PageLimit;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:3000/api/";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Invalid setting values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// A URL setting did not parse.
    #[error("{name} is not a valid URL: {value}")]
    InvalidUrl {
        /// Setting name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
    /// The bind address did not parse.
    #[error("bind address is not a socket address: {0}")]
    InvalidBindAddr(String),
}

/// Configuration for the portal process.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTAL")]
pub struct PortalSettings {
    /// Base URL of the backend REST API.
    #[ortho_config(default = DEFAULT_BACKEND_URL.to_owned())]
    pub backend_url: Option<String>,
    /// External owner application, if the installation has one.
    pub owner_portal_url: Option<String>,
    /// Listen address.
    #[ortho_config(default = DEFAULT_BIND_ADDR.to_owned())]
    pub bind_addr: Option<String>,
    /// Timeout for each backend call, in seconds.
    #[ortho_config(default = DEFAULT_TIMEOUT_SECS)]
    pub request_timeout_secs: Option<u64>,
    /// Rows requested per page.
    pub page_size: Option<u32>,
}

fn parse_url(name: &'static str, raw: &str) -> Result<Url, SettingsError> {
    let normalised = if raw.ends_with('/') {
        raw.to_owned()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalised).map_err(|_| SettingsError::InvalidUrl {
        name,
        value: raw.to_owned(),
    })
}

impl PortalSettings {
    /// Backend base URL, always ending in `/` so relative paths join below it.
    pub fn backend_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "backend_url",
            self.backend_url.as_deref().unwrap_or(DEFAULT_BACKEND_URL),
        )
    }

    /// Owner portal URL; blank counts as unset.
    pub fn owner_portal_url(&self) -> Result<Option<Url>, SettingsError> {
        match self.owner_portal_url.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Url::parse(raw).map(Some).map_err(|_| SettingsError::InvalidUrl {
                name: "owner_portal_url",
                value: raw.to_owned(),
            }),
        }
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse()
            .map_err(|_| SettingsError::InvalidBindAddr(raw.to_owned()))
    }

    /// Backend call timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Page size, clamped to what the backend accepts.
    pub fn page_size(&self) -> PageLimit {
        self.page_size.map_or(PageLimit::DEFAULT, PageLimit::new)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for portal settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "PORTAL_BACKEND_URL",
        "PORTAL_OWNER_PORTAL_URL",
        "PORTAL_BIND_ADDR",
        "PORTAL_REQUEST_TIMEOUT_SECS",
        "PORTAL_PAGE_SIZE",
    ];

    fn load_from_empty_args() -> PortalSettings {
        PortalSettings::load_from_iter([OsString::from("portal")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(settings.backend_url.as_deref(), Some(DEFAULT_BACKEND_URL));
        assert_eq!(settings.bind_addr.as_deref(), Some(DEFAULT_BIND_ADDR));
        assert_eq!(settings.request_timeout_secs, Some(DEFAULT_TIMEOUT_SECS));
        assert_eq!(
            settings.backend_url().map(|url| url.to_string()),
            Ok(DEFAULT_BACKEND_URL.to_owned())
        );
        assert_eq!(settings.owner_portal_url(), Ok(None));
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
        assert_eq!(settings.page_size(), PageLimit::DEFAULT);
        assert!(settings.bind_addr().is_ok());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("PORTAL_BACKEND_URL", Some("https://pos.store.test/api".to_owned())),
            ("PORTAL_OWNER_PORTAL_URL", Some("https://owner.store.test".to_owned())),
            ("PORTAL_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("PORTAL_REQUEST_TIMEOUT_SECS", Some("5".to_owned())),
            ("PORTAL_PAGE_SIZE", Some("500".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.backend_url().map(|url| url.to_string()),
            Ok("https://pos.store.test/api/".to_owned())
        );
        assert!(settings.owner_portal_url().is_ok_and(|url| url.is_some()));
        assert_eq!(settings.request_timeout(), Duration::from_secs(5));
        assert_eq!(settings.page_size().get(), PageLimit::MAX);
        assert_eq!(settings.bind_addr().map(|addr| addr.port()), Ok(9000));
    }

    #[rstest]
    #[case(Some("   "), true)]
    #[case(Some("not a url"), false)]
    fn owner_portal_url_is_optional_but_checked(#[case] raw: Option<&str>, #[case] ok: bool) {
        let settings = PortalSettings {
            backend_url: None,
            owner_portal_url: raw.map(str::to_owned),
            bind_addr: None,
            request_timeout_secs: None,
            page_size: None,
        };
        assert_eq!(settings.owner_portal_url().is_ok(), ok);
    }
}
