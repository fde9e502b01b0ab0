// # DNSimple DNS Provider
//
// This crate provides the DNSimple implementation of `DnsProvider` for the DDNS updater.
//
// ## Capabilities
//
// - ✅ Account lookup via `whoami`
// - ✅ Record listing filtered by name and type, following pagination
// - ✅ Record deletion by id
// - ✅ A record creation
// - ✅ Domain tokens and OAuth tokens
// - ✅ Dry-run mode (reads performed, writes only logged)
// - ❌ NO retry logic (a failed call aborts the run)
// - ❌ NO caching between calls
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
// - API token MUST be provided via environment variables only
// - Provider MUST fail fast if token is empty
//
// ## API Reference
//
// - DNSimple API v2: https://developer.dnsimple.com/v2/
// - Whoami: GET `/whoami`
// - List records: GET `/:account/zones/:zone/records?name=...&type=A&page=N`
// - Delete record: DELETE `/:account/zones/:zone/records/:id`
// - Create record: POST `/:account/zones/:zone/records`

use async_trait::async_trait;
use ddns_core::config::{Credentials, ProviderConfig};
use ddns_core::traits::{DnsProvider, DnsRecord, NewRecord, RECORD_TYPE_A, ZoneContext};
use ddns_core::{Error, Result};
use serde::Deserialize;
use std::time::Duration;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying a domain-scoped token
const DOMAIN_TOKEN_HEADER: &str = "X-DNSimple-Domain-Token";

const USER_AGENT: &str = concat!("ddnsd/", env!("CARGO_PKG_VERSION"));

const PROVIDER: &str = "dnsimple";

/// DNSimple DNS provider
///
/// Stateless: the account and zone arrive with every call in a [`ZoneContext`].
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform all GET requests (whoami, record listing)
/// - Log the intended DELETE/POST
/// - **NOT** actually modify DNS records
pub struct DnsimpleProvider {
    /// API credentials
    /// ⚠️ NEVER log the token
    credentials: Credentials,

    /// API base URL, without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform GET requests but skip writes
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for DnsimpleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsimpleProvider")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl DnsimpleProvider {
    /// Create a new DNSimple provider
    ///
    /// # Parameters
    ///
    /// - `credentials`: Domain token or OAuth token
    /// - `base_url`: API base, e.g. `https://api.dnsimple.com/v2`
    /// - `dry_run`: If true, perform GET requests but skip writes
    pub fn new(credentials: Credentials, base_url: impl Into<String>, dry_run: bool) -> Result<Self> {
        if credentials.token().is_empty() {
            return Err(Error::config("DNSimple API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            credentials,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            dry_run,
        })
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        if config.dry_run {
            tracing::warn!("DNSimple provider running in DRY-RUN mode - no changes will be made");
        }
        Self::new(config.credentials.clone(), config.base_url.clone(), config.dry_run)
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn records_url(&self, ctx: &ZoneContext) -> String {
        format!(
            "{}/{}/zones/{}/records",
            self.base_url, ctx.account_id, ctx.zone
        )
    }

    /// Attach the credentials in the form DNSimple expects for their kind
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Credentials::OAuthToken(token) => request.bearer_auth(token),
            Credentials::DomainToken(token) => request.header(DOMAIN_TOKEN_HEADER, token),
        }
    }

    /// Send a request and return the body of a successful response
    async fn execute(&self, request: reqwest::RequestBuilder, action: &str) -> Result<String> {
        let response = self
            .authorize(request)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response".to_string());

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body, action));
        }

        Ok(body)
    }
}

#[async_trait]
impl DnsProvider for DnsimpleProvider {
    async fn whoami(&self) -> Result<String> {
        let url = format!("{}/whoami", self.base_url);
        let body = self.execute(self.client.get(&url), "Whoami").await?;
        let account_id = parse_whoami(&body)?;

        tracing::debug!(
            "Authenticated with {} for account {}",
            self.credentials.kind(),
            account_id
        );
        Ok(account_id)
    }

    async fn list_records(&self, ctx: &ZoneContext, name: &str) -> Result<Vec<DnsRecord>> {
        let url = self.records_url(ctx);
        let mut records = Vec::new();
        let mut page: u32 = 1;

        loop {
            let page_param = page.to_string();
            let request = self.client.get(&url).query(&[
                ("name", name),
                ("type", RECORD_TYPE_A),
                ("page", page_param.as_str()),
            ]);

            let body = self.execute(request, "Record lookup").await?;
            let (batch, pagination) = parse_record_page(&body)?;
            records.extend(batch);

            match pagination {
                Some(p) if page < p.total_pages => page += 1,
                _ => break,
            }
        }

        // The zone apex is the one name where an empty filter may widen the
        // listing. Record names are stored lowercase.
        records.retain(|r| r.name.eq_ignore_ascii_case(name));

        tracing::debug!(
            "Found {} record(s) for {:?} in {}",
            records.len(),
            name,
            ctx.zone
        );
        Ok(records)
    }

    async fn delete_record(&self, ctx: &ZoneContext, record_id: &str) -> Result<()> {
        let url = format!("{}/{}", self.records_url(ctx), record_id);

        if self.dry_run {
            tracing::info!("[DRY-RUN] Would send DELETE request to {}", url);
            return Ok(());
        }

        self.execute(self.client.delete(&url), "Record deletion").await?;
        tracing::debug!("Deleted record {} in {}", record_id, ctx.zone);
        Ok(())
    }

    async fn create_record(&self, ctx: &ZoneContext, record: &NewRecord) -> Result<DnsRecord> {
        let url = self.records_url(ctx);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send POST request to {} with payload: {}",
                url,
                serde_json::json!(record)
            );
            return Ok(DnsRecord {
                id: "dry-run".to_string(),
                name: record.name.clone(),
                record_type: record.record_type.clone(),
                content: record.content.clone(),
            });
        }

        let body = self
            .execute(self.client.post(&url).json(record), "Record creation")
            .await?;
        let created = parse_record(&body)?;

        tracing::debug!("Created record {} -> {}", created.id, created.content);
        Ok(created)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

/// Response envelope shared by every DNSimple endpoint
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
struct Pagination {
    total_pages: u32,
}

#[derive(Debug, Deserialize)]
struct WhoamiData {
    account: Option<Account>,
}

#[derive(Debug, Deserialize)]
struct Account {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct ApiRecord {
    id: u64,
    name: String,
    #[serde(rename = "type")]
    record_type: String,
    content: String,
}

impl From<ApiRecord> for DnsRecord {
    fn from(record: ApiRecord) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.name,
            record_type: record.record_type,
            content: record.content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
}

fn parse_json<'de, T: Deserialize<'de>>(body: &'de str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| Error::provider(PROVIDER, format!("Failed to parse response: {}", e)))
}

fn parse_whoami(body: &str) -> Result<String> {
    let envelope: Envelope<WhoamiData> = parse_json(body)?;
    envelope
        .data
        .account
        .map(|account| account.id.to_string())
        .ok_or_else(|| Error::auth("Token is not associated with an account"))
}

fn parse_record_page(body: &str) -> Result<(Vec<DnsRecord>, Option<Pagination>)> {
    let envelope: Envelope<Vec<ApiRecord>> = parse_json(body)?;
    let records = envelope.data.into_iter().map(DnsRecord::from).collect();
    Ok((records, envelope.pagination))
}

fn parse_record(body: &str) -> Result<DnsRecord> {
    let envelope: Envelope<ApiRecord> = parse_json(body)?;
    Ok(envelope.data.into())
}

/// Map a non-success HTTP status to an error
fn status_error(status: u16, body: &str, action: &str) -> Error {
    let detail = serde_json::from_str::<ApiError>(body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        401 | 403 => Error::auth(format!(
            "{} rejected: invalid API token or insufficient permissions. Status: {} - {}",
            action, status, detail
        )),
        404 => Error::not_found(format!("{} failed: {}", action, detail)),
        429 => Error::rate_limited(format!(
            "Rate limit exceeded. Please retry later. Status: {}",
            status
        )),
        500..=599 => Error::provider(
            PROVIDER,
            format!("DNSimple server error (transient): {} - {}", status, detail),
        ),
        _ => Error::provider(
            PROVIDER,
            format!("{} failed: {} - {}", action, status, detail),
        ),
    }
}
