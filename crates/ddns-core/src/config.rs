//! Configuration types for the DDNS updater
//!
//! This module defines the configuration structures consumed by the core and by
//! the collaborator crates. Values are assembled by `ddnsd` from the command line
//! and the environment; nothing here reads the process environment directly.

/// Environment variable holding a domain-scoped API token
pub const DOMAIN_TOKEN_ENV: &str = "DOMAIN_TOKEN";

/// Environment variable holding an account-scoped OAuth token
pub const OAUTH_TOKEN_ENV: &str = "OAUTH_V2_TOKEN";

/// Default IP-echo endpoint
pub const DEFAULT_ECHO_URL: &str = "http://icanhazip.com/";

/// Hard timeout for the IP-echo request
pub const DEFAULT_ECHO_TIMEOUT_SECS: u64 = 10;

/// Default interface query tool
pub const DEFAULT_IP_COMMAND: &str = "ip";

/// Default DNSimple API base URL
pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://api.dnsimple.com/v2";

/// Linux limits interface names to IFNAMSIZ - 1 bytes
const MAX_INTERFACE_NAME_LEN: usize = 15;

const MAX_DOMAIN_NAME_LEN: usize = 253;

/// Main DDNS configuration for one run
#[derive(Debug, Clone)]
pub struct DdnsConfig {
    /// Local interface source configuration
    pub local: LocalSourceConfig,

    /// Remote IP-echo configuration
    pub echo: EchoConfig,

    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// The record being reconciled
    pub target: RecordTarget,
}

impl DdnsConfig {
    /// Create a configuration with defaults for everything but the target
    pub fn new(interface: impl Into<String>, target: RecordTarget, credentials: Credentials) -> Self {
        Self {
            local: LocalSourceConfig::new(interface),
            echo: EchoConfig::default(),
            provider: ProviderConfig::new(credentials),
            target,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.local.validate()?;
        self.echo.validate()?;
        self.provider.validate()?;
        self.target.validate()?;
        Ok(())
    }
}

/// Local interface source configuration
#[derive(Debug, Clone)]
pub struct LocalSourceConfig {
    /// Network interface to query (e.g., "eth0")
    pub interface: String,

    /// Interface query tool (`ip` from iproute2)
    pub command: String,
}

impl LocalSourceConfig {
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            command: DEFAULT_IP_COMMAND.to_string(),
        }
    }

    /// Use a different interface query tool
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.interface.is_empty() {
            return Err(crate::Error::config("Interface name cannot be empty"));
        }
        if self.interface.len() > MAX_INTERFACE_NAME_LEN {
            return Err(crate::Error::config(format!(
                "Interface name too long: {} bytes (max {}). Got: {}",
                self.interface.len(),
                MAX_INTERFACE_NAME_LEN,
                self.interface
            )));
        }
        if self.interface.contains('/') || self.interface.chars().any(char::is_whitespace) {
            return Err(crate::Error::config(format!(
                "Interface name contains invalid characters: '{}'",
                self.interface
            )));
        }
        if self.command.is_empty() {
            return Err(crate::Error::config("Interface query command cannot be empty"));
        }
        Ok(())
    }
}

/// Remote IP-echo configuration
#[derive(Debug, Clone)]
pub struct EchoConfig {
    /// URL to fetch the public address from
    pub url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ECHO_URL.to_string(),
            timeout_secs: DEFAULT_ECHO_TIMEOUT_SECS,
        }
    }
}

impl EchoConfig {
    pub fn validate(&self) -> Result<(), crate::Error> {
        validate_http_url("Echo URL", &self.url)?;
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("Echo timeout must be > 0"));
        }
        Ok(())
    }
}

/// DNS provider configuration
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API credentials
    pub credentials: Credentials,

    /// API base URL (production or sandbox)
    pub base_url: String,

    /// Dry-run mode: perform reads, only log writes
    pub dry_run: bool,
}

impl ProviderConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_PROVIDER_BASE_URL.to_string(),
            dry_run: false,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.credentials.token().is_empty() {
            return Err(crate::Error::config("API token cannot be empty"));
        }
        validate_http_url("Provider base URL", &self.base_url)
    }
}

/// Provider credentials
///
/// The Debug implementation never exposes the token.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Token scoped to a single domain
    DomainToken(String),
    /// OAuth token scoped to the whole account
    OAuthToken(String),
}

impl Credentials {
    /// Resolve credentials from an environment lookup
    ///
    /// `DOMAIN_TOKEN` wins when both variables are set. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, crate::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(token) = non_empty(DOMAIN_TOKEN_ENV) {
            return Ok(Self::DomainToken(token));
        }
        if let Some(token) = non_empty(OAUTH_TOKEN_ENV) {
            return Ok(Self::OAuthToken(token));
        }

        Err(crate::Error::config(format!(
            "Must set one of {} or {} in environment",
            DOMAIN_TOKEN_ENV, OAUTH_TOKEN_ENV
        )))
    }

    /// The raw token
    /// ⚠️ NEVER log this value
    pub fn token(&self) -> &str {
        match self {
            Self::DomainToken(token) | Self::OAuthToken(token) => token,
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DomainToken(_) => "domain token",
            Self::OAuthToken(_) => "OAuth token",
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainToken(_) => f.debug_tuple("DomainToken").field(&"<REDACTED>").finish(),
            Self::OAuthToken(_) => f.debug_tuple("OAuthToken").field(&"<REDACTED>").finish(),
        }
    }
}

/// The name/domain pair whose address records are reconciled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTarget {
    /// Zone name (e.g., "example.com")
    pub domain: String,

    /// Record name relative to the zone (e.g., "myip"); empty for the apex
    pub name: String,
}

impl RecordTarget {
    pub fn new(domain: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
        }
    }

    /// Fully-qualified name, for logging
    pub fn fqdn(&self) -> String {
        if self.name.is_empty() {
            self.domain.clone()
        } else {
            format!("{}.{}", self.name, self.domain)
        }
    }

    pub fn validate(&self) -> Result<(), crate::Error> {
        validate_domain_name(&self.domain)?;
        if !self.name.is_empty() {
            validate_record_name(&self.name)?;
            let fqdn = self.fqdn();
            if fqdn.len() > MAX_DOMAIN_NAME_LEN {
                return Err(crate::Error::config(format!(
                    "Record name too long: {} chars (max {}). Got: {}",
                    fqdn.len(),
                    MAX_DOMAIN_NAME_LEN,
                    fqdn
                )));
            }
        }
        Ok(())
    }
}

/// Validate a record name relative to its zone
///
/// Same rules as [`validate_domain_name`], plus an optional leading `*` wildcard label.
pub fn validate_record_name(name: &str) -> Result<(), crate::Error> {
    let rest = match name.strip_prefix('*') {
        Some("") => return Ok(()),
        Some(rest) => rest.strip_prefix('.').ok_or_else(|| {
            crate::Error::config(format!(
                "Wildcard must be a whole leading label. Got: '{}'",
                name
            ))
        })?,
        None => name,
    };
    validate_domain_name(rest)
}

/// Validate that a string is a valid domain name
///
/// Basic RFC 1035 checks: total length, label length, characters and hyphen placement.
/// Underscores are accepted for service-style labels.
pub fn validate_domain_name(domain: &str) -> Result<(), crate::Error> {
    if domain.is_empty() {
        return Err(crate::Error::config("Domain name cannot be empty"));
    }

    if domain.len() > MAX_DOMAIN_NAME_LEN {
        return Err(crate::Error::config(format!(
            "Domain name too long: {} chars (max {}). Got: {}",
            domain.len(),
            MAX_DOMAIN_NAME_LEN,
            domain
        )));
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err(crate::Error::config(format!(
                "Domain name has empty label: '{}'",
                domain
            )));
        }

        if label.len() > 63 {
            return Err(crate::Error::config(format!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(crate::Error::config(format!(
                "Domain label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric, hyphen and underscore only.",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(crate::Error::config(format!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}

fn validate_http_url(what: &str, url: &str) -> Result<(), crate::Error> {
    if url.is_empty() {
        return Err(crate::Error::config(format!("{} cannot be empty", what)));
    }
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(crate::Error::config(format!(
            "{} must use HTTP or HTTPS scheme. Got: {}",
            what, url
        )));
    }
    Ok(())
}
