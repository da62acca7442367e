//! Alibaba Cloud DNS client.
//!
//! Implements [`DnsApi`] on top of the Alibaba Cloud DNS RPC API, version `2015-01-09`:
//!
//! | operation                   | action                  |
//! |-----------------------------|-------------------------|
//! | [`DnsApi::list_page`]       | `DescribeDomainRecords` |
//! | [`DnsApi::create`]          | `AddDomainRecord`       |
//! | [`DnsApi::delete`]          | `DeleteDomainRecord`    |
//!
//! Every request is a signed `GET` against the configured endpoint, see [`signer`]. Requests
//! go out as they are made; retries and timeouts are left to the HTTP client and to the caller.
//!
//! Alibaba Cloud names the zone apex `@` while the rest of this crate uses the empty relative
//! name, so the client translates between the two.

pub mod credentials;
mod model;
mod signer;

use crate::alidns::model::{DescribeDomainRecordsResponse, ErrorResponse, RecordIdResponse};
use crate::config::Config;
use crate::error::Error;
use crate::records::{ApiError, DnsApi, RecordPage, TxtRecord};
pub use credentials::Credentials;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, trace};

const APEX_RR: &str = "@";

#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct AliDnsClient {
    client: Client,
    endpoint: String,
    credentials: Credentials,
}

impl AliDnsClient {
    /// Create a client sending requests to `endpoint`, a base URL such as
    /// `https://alidns.aliyuncs.com`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HttpClient`] if the underlying HTTP client can't be built.
    pub fn new(
        endpoint: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::HttpClient)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            credentials,
        })
    }

    /// Create a client for the endpoint selected by `config`, with credentials taken from the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Credentials`] if the access key isn't configured and
    /// [`Error::HttpClient`] if the HTTP client can't be built.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let credentials = Credentials::from_env()?;
        Self::new(config.endpoint_url(), credentials, config.request_timeout)
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call<T: DeserializeOwned>(
        &self,
        action: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let nonce = uuid::Uuid::new_v4().to_string();
        let query = signer::signed_query(
            &self.credentials,
            action,
            params,
            OffsetDateTime::now_utc(),
            &nonce,
        )?;
        trace!(action, nonce, "sending DNS API request");

        let response = self
            .client
            .get(format!("{}/?{query}", self.endpoint))
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            let err = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(err) => {
                    debug!(action, %status, code = %err.code, request_id = ?err.request_id, "DNS API error");
                    ApiError::Provider {
                        code: err.code,
                        message: err.message,
                    }
                }
                Err(_) => ApiError::Provider {
                    code: format!("HTTP {}", status.as_u16()),
                    message: body,
                },
            };
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|err| ApiError::InvalidResponse(Box::new(err)))
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(Box::new(err))
}

fn to_wire_rr(name: &str) -> &str {
    if name.is_empty() {
        APEX_RR
    } else {
        name
    }
}

fn from_wire_rr(rr: String) -> String {
    if rr == APEX_RR {
        String::new()
    } else {
        rr
    }
}

#[async_trait::async_trait]
impl DnsApi for AliDnsClient {
    async fn list_page(
        &self,
        zone: &str,
        name_filter: &str,
        record_type: &str,
        page_number: u64,
        page_size: u64,
    ) -> Result<RecordPage, ApiError> {
        let response: DescribeDomainRecordsResponse = self
            .call(
                "DescribeDomainRecords",
                &[
                    ("DomainName", zone.to_string()),
                    ("RRKeyWord", to_wire_rr(name_filter).to_string()),
                    ("Type", record_type.to_string()),
                    ("PageNumber", page_number.to_string()),
                    ("PageSize", page_size.to_string()),
                ],
            )
            .await?;

        let records = response
            .domain_records
            .map(|r| r.record)
            .unwrap_or_default()
            .into_iter()
            .map(|r| TxtRecord {
                record_id: r.record_id,
                name: from_wire_rr(r.rr),
                value: r.value,
            })
            .collect();
        Ok(RecordPage {
            records,
            total_count: response.total_count,
        })
    }

    async fn create(
        &self,
        zone: &str,
        name: &str,
        record_type: &str,
        value: &str,
    ) -> Result<String, ApiError> {
        let response: RecordIdResponse = self
            .call(
                "AddDomainRecord",
                &[
                    ("DomainName", zone.to_string()),
                    ("RR", to_wire_rr(name).to_string()),
                    ("Type", record_type.to_string()),
                    ("Value", value.to_string()),
                ],
            )
            .await?;
        Ok(response.record_id)
    }

    async fn delete(&self, record_id: &str) -> Result<(), ApiError> {
        let _: RecordIdResponse = self
            .call("DeleteDomainRecord", &[("RecordId", record_id.to_string())])
            .await?;
        Ok(())
    }
}
