//! Integration tests for the Uber Ads HTTP client.
//!
//! A local mock server stands in for the remote API so the tests can verify
//! request construction (headers, exact query strings), response shape
//! normalisation, the retry policy and error translation.

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use uber_ads_mcp::ads::error::AdsError;
use uber_ads_mcp::ads::types::{CampaignStatus, GetCampaignsOptions, Metric};
use uber_ads_mcp::ads::UberAdsClient;
use uber_ads_mcp::config::Config;

fn client_for(server: &MockServer) -> UberAdsClient {
    let config = Config {
        client_id: None,
        client_secret: None,
        base_url: server.uri(),
        access_token: "test-token".to_string(),
    };
    UberAdsClient::new(&config).unwrap()
}

fn account_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Main account",
        "currency": "USD",
        "timezone": "America/Los_Angeles",
        "status": "active",
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-02T00:00:00Z"
    })
}

fn campaign_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Camp A",
        "status": "ACTIVE",
        "objective": "awareness",
        "budget_type": "DAILY",
        "daily_budget": 100.0,
        "start_time": "2024-03-01T00:00:00Z",
        "created_at": "2024-02-20T09:30:00Z",
        "updated_at": "2024-02-25T16:45:00Z"
    })
}

async fn query_pairs_of(server: &MockServer) -> Vec<(String, String)> {
    let requests = server
        .received_requests()
        .await
        .expect("request recording enabled");
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

// =============================================================================
// Response Shape Normalisation
// =============================================================================

#[tokio::test]
async fn list_response_decodes_every_account() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [account_json("acct-1"), account_json("acct-2")]
        })))
        .mount(&server)
        .await;

    let accounts = client_for(&server).get_ad_accounts().await.unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].id, "acct-1");
    assert_eq!(accounts[1].id, "acct-2");
}

#[tokio::test]
async fn single_object_response_is_wrapped_in_a_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ads"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": account_json("acct-1")})),
        )
        .mount(&server)
        .await;

    let accounts = client_for(&server).get_ad_accounts().await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].id, "acct-1");
}

#[tokio::test]
async fn body_without_data_wrapper_is_used_directly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_json("acct-1")))
        .mount(&server)
        .await;

    let accounts = client_for(&server).get_ad_accounts().await.unwrap();
    assert_eq!(accounts.len(), 1);
}

#[tokio::test]
async fn empty_success_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ads/acct-1/campaigns/c1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .get_campaign_details("acct-1", "c1")
        .await;
    assert!(matches!(result, Err(AdsError::Decode { .. })));
}

// =============================================================================
// Request Construction
// =============================================================================

#[tokio::test]
async fn requests_carry_bearer_and_json_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ads"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let accounts = client_for(&server).get_ad_accounts().await.unwrap();
    assert!(accounts.is_empty());
}

#[tokio::test]
async fn campaign_listing_sends_exactly_the_set_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ads/acct-1/campaigns"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let options = GetCampaignsOptions {
        status: Some(CampaignStatus::Paused),
        ..GetCampaignsOptions::default()
    };
    client_for(&server)
        .get_campaigns("acct-1", &options)
        .await
        .unwrap();

    let pairs = query_pairs_of(&server).await;
    assert_eq!(
        pairs,
        vec![
            ("limit".to_string(), "50".to_string()),
            ("offset".to_string(), "0".to_string()),
            ("status".to_string(), "PAUSED".to_string()),
        ]
    );
}

#[tokio::test]
async fn unset_listing_options_are_omitted_from_the_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ads/acct-1/campaigns"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let options = GetCampaignsOptions {
        limit: None,
        offset: None,
        status: None,
        sort_by: None,
        sort_order: None,
    };
    client_for(&server)
        .get_campaigns("acct-1", &options)
        .await
        .unwrap();

    let pairs = query_pairs_of(&server).await;
    assert!(pairs.is_empty(), "expected no query parameters: {pairs:?}");
}

#[tokio::test]
async fn stats_request_repeats_ids_and_metrics() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ads/acct-1/reports/campaigns"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let ids = vec!["c1".to_string(), "c2".to_string()];
    client_for(&server)
        .get_campaign_stats(
            "acct-1",
            &ids,
            "2024-03-01",
            "2024-03-07",
            Some(&[Metric::Impressions, Metric::Spend]),
        )
        .await
        .unwrap();

    let pairs = query_pairs_of(&server).await;
    assert_eq!(
        pairs,
        vec![
            ("start_date".to_string(), "2024-03-01".to_string()),
            ("end_date".to_string(), "2024-03-07".to_string()),
            ("campaign_ids".to_string(), "c1".to_string()),
            ("campaign_ids".to_string(), "c2".to_string()),
            ("metrics".to_string(), "impressions".to_string()),
            ("metrics".to_string(), "spend".to_string()),
        ]
    );
}

// =============================================================================
// Retry Policy and Error Translation
// =============================================================================

#[tokio::test]
async fn transient_status_is_retried_until_the_budget_is_spent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ads/acct-1/campaigns"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_json(json!({"error": {"message": "service overloaded"}})),
        )
        .mount(&server)
        .await;

    let result = client_for(&server)
        .get_campaigns("acct-1", &GetCampaignsOptions::default())
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "Uber Ads API error: service overloaded");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3, "three total attempts expected");
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ads/acct-1/campaigns/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"error": {"message": "campaign not found"}})),
        )
        .mount(&server)
        .await;

    let result = client_for(&server)
        .get_campaign_details("acct-1", "missing")
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Uber Ads API error: campaign not found");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "4xx must not be retried");
}

#[tokio::test]
async fn unparseable_error_body_falls_back_to_status_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ads"))
        .respond_with(ResponseTemplate::new(400).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_ad_accounts().await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.to_string(),
        "Uber Ads API error: HTTP status 400 Bad Request"
    );
}

// =============================================================================
// Idempotence and Convenience Filters
// =============================================================================

#[tokio::test]
async fn detail_fetches_are_idempotent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ads/acct-1/campaigns/c1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": campaign_json("c1")})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = client.get_campaign_details("acct-1", "c1").await.unwrap();
    let second = client.get_campaign_details("acct-1", "c1").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn status_shortcut_passes_the_fixed_filter_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ads/acct-1/campaigns"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [campaign_json("c1")]})),
        )
        .mount(&server)
        .await;

    let campaigns = client_for(&server)
        .get_archived_campaigns("acct-1")
        .await
        .unwrap();
    assert_eq!(campaigns.len(), 1);

    let pairs = query_pairs_of(&server).await;
    assert!(pairs.contains(&("status".to_string(), "ARCHIVED".to_string())));
}
