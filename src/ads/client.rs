//! HTTP client for the Uber Ads API.
//!
//! One public operation per remote resource, each performing exactly one
//! `GET` (plus retries) against the configured base URL with a bearer-token
//! credential. The client owns request construction, the retry policy for
//! transient failures, response shape normalisation and error translation;
//! callers only ever see typed entities or an [`AdsError`].
//!
//! # Response shapes
//!
//! The API wraps payloads in a `data` member but is not consistent about
//! collections: an endpoint that normally returns a list may return a bare
//! object when there is a single result. List-returning operations normalise
//! both shapes into a `Vec` before decoding.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use crate::ads::error::{AdsError, AdsResult};
use crate::ads::types::{
    AdAccount, Campaign, CampaignStats, CampaignStatus, GetCampaignsOptions, Metric,
};
use crate::config::Config;

/// Fixed per-request timeout. A stalled attempt is aborted after this long
/// and counts toward the retry budget.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Total attempts per operation (one initial try plus two retries).
const MAX_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff between attempts.
const BACKOFF_BASE: Duration = Duration::from_secs(1);

/// Client for the Uber Ads API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct UberAdsClient {
    http: reqwest::Client,
    base_url: String,
}

impl UberAdsClient {
    /// Creates a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the access token cannot be used as a header value
    /// or the underlying HTTP client cannot be constructed.
    pub fn new(config: &Config) -> AdsResult<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.access_token))
            .map_err(|_| AdsError::invalid_config("access token is not a valid header value"))?;
        // Keeps the token out of debug output.
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| AdsError::invalid_config(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Retrieves all ad accounts for the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails after retries or the response
    /// cannot be decoded.
    pub async fn get_ad_accounts(&self) -> AdsResult<Vec<AdAccount>> {
        let body = self.get_json("/v1/ads", &[]).await?;
        decode_list(body)
    }

    /// Retrieves campaigns for an ad account.
    ///
    /// Query parameters are built from `options`: every `Some` field is
    /// sent (including the default `limit`/`offset` a tool call fills in),
    /// every `None` field is omitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails after retries or the response
    /// cannot be decoded.
    pub async fn get_campaigns(
        &self,
        ad_account_id: &str,
        options: &GetCampaignsOptions,
    ) -> AdsResult<Vec<Campaign>> {
        let path = format!("/v1/ads/{ad_account_id}/campaigns");
        let body = self.get_json(&path, &campaigns_query(options)).await?;
        decode_list(body)
    }

    /// Retrieves a single campaign.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails after retries or the response
    /// cannot be decoded.
    pub async fn get_campaign_details(
        &self,
        ad_account_id: &str,
        campaign_id: &str,
    ) -> AdsResult<Campaign> {
        let path = format!("/v1/ads/{ad_account_id}/campaigns/{campaign_id}");
        let body = self.get_json(&path, &[]).await?;
        decode_object(body)
    }

    /// Retrieves performance statistics for the given campaigns over a date
    /// range.
    ///
    /// `campaign_ids` becomes one repeated `campaign_ids` query pair per
    /// entry; `metrics`, when given, one repeated `metrics` pair per metric.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails after retries or the response
    /// cannot be decoded.
    pub async fn get_campaign_stats(
        &self,
        ad_account_id: &str,
        campaign_ids: &[String],
        start_date: &str,
        end_date: &str,
        metrics: Option<&[Metric]>,
    ) -> AdsResult<Vec<CampaignStats>> {
        let path = format!("/v1/ads/{ad_account_id}/reports/campaigns");
        let query = stats_query(campaign_ids, start_date, end_date, metrics);
        let body = self.get_json(&path, &query).await?;
        decode_list(body)
    }

    /// Retrieves campaigns filtered by status.
    ///
    /// # Errors
    ///
    /// See [`UberAdsClient::get_campaigns`].
    pub async fn get_campaigns_by_status(
        &self,
        ad_account_id: &str,
        status: CampaignStatus,
    ) -> AdsResult<Vec<Campaign>> {
        let options = GetCampaignsOptions {
            status: Some(status),
            ..GetCampaignsOptions::default()
        };
        self.get_campaigns(ad_account_id, &options).await
    }

    /// Retrieves all active campaigns for an ad account.
    ///
    /// # Errors
    ///
    /// See [`UberAdsClient::get_campaigns`].
    pub async fn get_active_campaigns(&self, ad_account_id: &str) -> AdsResult<Vec<Campaign>> {
        self.get_campaigns_by_status(ad_account_id, CampaignStatus::Active)
            .await
    }

    /// Retrieves all paused campaigns for an ad account.
    ///
    /// # Errors
    ///
    /// See [`UberAdsClient::get_campaigns`].
    pub async fn get_paused_campaigns(&self, ad_account_id: &str) -> AdsResult<Vec<Campaign>> {
        self.get_campaigns_by_status(ad_account_id, CampaignStatus::Paused)
            .await
    }

    /// Retrieves all archived campaigns for an ad account.
    ///
    /// # Errors
    ///
    /// See [`UberAdsClient::get_campaigns`].
    pub async fn get_archived_campaigns(&self, ad_account_id: &str) -> AdsResult<Vec<Campaign>> {
        self.get_campaigns_by_status(ad_account_id, CampaignStatus::Archived)
            .await
    }

    /// Performs a `GET` with the retry policy and returns the decoded JSON
    /// body.
    ///
    /// Retries on transient statuses (429, 500, 502, 503, 504) and on
    /// transport failures, sleeping with exponential backoff between
    /// attempts. Other non-success statuses fail immediately with the
    /// message extracted from the error body when one is parseable. A
    /// success response with an empty body yields an empty JSON object.
    async fn get_json(&self, path: &str, query: &[(&'static str, String)]) -> AdsResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.http.get(&url).query(query).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let bytes = response
                            .bytes()
                            .await
                            .map_err(|source| AdsError::Transport { source })?;
                        if bytes.is_empty() {
                            return Ok(Value::Object(Map::new()));
                        }
                        return serde_json::from_slice(&bytes)
                            .map_err(|source| AdsError::Decode { source });
                    }

                    let code = status.as_u16();
                    if is_transient_status(code) && attempt < MAX_ATTEMPTS {
                        warn!(attempt, status = code, path, "transient API status, retrying");
                        tokio::time::sleep(backoff_delay(attempt)).await;
                        continue;
                    }

                    let fallback = format!("HTTP status {status}");
                    let body = response.text().await.unwrap_or_default();
                    let message = extract_error_message(&body).unwrap_or(fallback);
                    return Err(AdsError::api(Some(code), message));
                }
                Err(source) => {
                    if attempt < MAX_ATTEMPTS {
                        warn!(attempt, error = %source, path, "request failed, retrying");
                        tokio::time::sleep(backoff_delay(attempt)).await;
                        continue;
                    }
                    return Err(AdsError::Transport { source });
                }
            }
        }
    }
}

/// Whether a status code is eligible for automatic retry.
const fn is_transient_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Delay before the attempt following failed attempt `attempt` (1-based):
/// 1 s, then 2 s.
fn backoff_delay(attempt: u32) -> Duration {
    BACKOFF_BASE * 2_u32.saturating_pow(attempt.saturating_sub(1))
}

/// Extracts the message from an `{"error": {"message": ...}}` body.
fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(ToString::to_string)
}

/// Unwraps the `data` member of a response body, or returns the body
/// unchanged when there is none.
fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Decodes a response body into a list of entities, wrapping a bare object
/// in a one-element list.
fn decode_list<T: DeserializeOwned>(body: Value) -> AdsResult<Vec<T>> {
    match unwrap_data(body) {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(|source| AdsError::Decode { source }))
            .collect(),
        single => Ok(vec![
            serde_json::from_value(single).map_err(|source| AdsError::Decode { source })?
        ]),
    }
}

/// Decodes a response body into a single entity.
fn decode_object<T: DeserializeOwned>(body: Value) -> AdsResult<T> {
    serde_json::from_value(unwrap_data(body)).map_err(|source| AdsError::Decode { source })
}

/// Builds the query pairs for a campaign listing.
fn campaigns_query(options: &GetCampaignsOptions) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(limit) = options.limit {
        query.push(("limit", limit.to_string()));
    }
    if let Some(offset) = options.offset {
        query.push(("offset", offset.to_string()));
    }
    if let Some(status) = options.status {
        query.push(("status", status.as_str().to_string()));
    }
    if let Some(sort_by) = options.sort_by {
        query.push(("sort_by", sort_by.as_str().to_string()));
    }
    if let Some(sort_order) = options.sort_order {
        query.push(("sort_order", sort_order.as_str().to_string()));
    }
    query
}

/// Builds the query pairs for a statistics report.
fn stats_query(
    campaign_ids: &[String],
    start_date: &str,
    end_date: &str,
    metrics: Option<&[Metric]>,
) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("start_date", start_date.to_string()),
        ("end_date", end_date.to_string()),
    ];
    for id in campaign_ids {
        query.push(("campaign_ids", id.clone()));
    }
    if let Some(metrics) = metrics {
        for metric in metrics {
            query.push(("metrics", metric.as_str().to_string()));
        }
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ads::types::{SortField, SortOrder};
    use serde_json::json;

    #[test]
    fn transient_statuses_match_policy() {
        for status in [429, 500, 502, 503, 504] {
            assert!(is_transient_status(status), "{status} should be transient");
        }
        for status in [400, 401, 403, 404, 418, 501] {
            assert!(!is_transient_status(status), "{status} should not retry");
        }
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(2));
    }

    #[test]
    fn campaigns_query_sends_defaults_only() {
        let query = campaigns_query(&GetCampaignsOptions::default());
        assert_eq!(
            query,
            vec![("limit", "50".to_string()), ("offset", "0".to_string())]
        );
    }

    #[test]
    fn campaigns_query_includes_every_set_field() {
        let options = GetCampaignsOptions {
            limit: Some(10),
            offset: Some(20),
            status: Some(CampaignStatus::Active),
            sort_by: Some(SortField::Spend),
            sort_order: Some(SortOrder::Desc),
        };
        let query = campaigns_query(&options);
        assert_eq!(
            query,
            vec![
                ("limit", "10".to_string()),
                ("offset", "20".to_string()),
                ("status", "ACTIVE".to_string()),
                ("sort_by", "spend".to_string()),
                ("sort_order", "desc".to_string()),
            ]
        );
    }

    #[test]
    fn campaigns_query_omits_unset_fields() {
        let options = GetCampaignsOptions {
            limit: None,
            offset: None,
            status: None,
            sort_by: None,
            sort_order: None,
        };
        assert!(campaigns_query(&options).is_empty());
    }

    #[test]
    fn stats_query_repeats_ids_and_metrics() {
        let ids = vec!["c1".to_string(), "c2".to_string()];
        let query = stats_query(
            &ids,
            "2024-03-01",
            "2024-03-07",
            Some(&[Metric::Impressions, Metric::Spend]),
        );
        assert_eq!(
            query,
            vec![
                ("start_date", "2024-03-01".to_string()),
                ("end_date", "2024-03-07".to_string()),
                ("campaign_ids", "c1".to_string()),
                ("campaign_ids", "c2".to_string()),
                ("metrics", "impressions".to_string()),
                ("metrics", "spend".to_string()),
            ]
        );
    }

    #[test]
    fn unwrap_data_prefers_data_member() {
        let body = json!({"data": [1, 2], "paging": {"next": null}});
        assert_eq!(unwrap_data(body), json!([1, 2]));

        let bare = json!({"id": "a1"});
        assert_eq!(unwrap_data(bare.clone()), bare);
    }

    #[test]
    fn decode_list_wraps_single_object() {
        let accounts: Vec<AdAccount> = decode_list(json!({
            "data": {
                "id": "acct-1",
                "name": "Main",
                "currency": "USD",
                "timezone": "America/Los_Angeles",
                "status": "active",
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-02T00:00:00Z"
            }
        }))
        .unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].id, "acct-1");
    }

    #[test]
    fn decode_list_passes_arrays_through() {
        let accounts: Vec<AdAccount> = decode_list(json!({"data": []})).unwrap();
        assert!(accounts.is_empty());
    }

    #[test]
    fn decode_list_fails_on_null_data() {
        let result: AdsResult<Vec<AdAccount>> = decode_list(json!({"data": null}));
        assert!(matches!(result, Err(AdsError::Decode { .. })));
    }

    #[test]
    fn error_message_extraction() {
        let body = r#"{"error": {"message": "account not found", "code": 2404}}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("account not found")
        );

        assert_eq!(extract_error_message("<html>bad gateway</html>"), None);
        assert_eq!(extract_error_message(r#"{"error": "flat"}"#), None);
    }

    #[test]
    fn client_construction_requires_header_safe_token() {
        let config = Config {
            client_id: None,
            client_secret: None,
            base_url: "https://api.example.com".to_string(),
            access_token: "bad\ntoken".to_string(),
        };
        assert!(matches!(
            UberAdsClient::new(&config),
            Err(AdsError::InvalidConfig { .. })
        ));
    }
}
