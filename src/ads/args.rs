//! Validated tool-argument records.
//!
//! Each tool has one flat argument record, built from the raw JSON map the
//! client sent. Validation collects every offending field (wrong type,
//! missing, out-of-set value, unknown name) into one [`ValidationError`] and
//! runs to completion before any remote call is attempted. Defaults apply
//! when optional fields are absent.

use serde_json::{Map, Value};

use crate::ads::error::ValidationError;
use crate::ads::types::{CampaignStatus, Metric};

/// Default campaign-listing page size.
pub const DEFAULT_LIMIT: u32 = 50;
/// Default campaign-listing offset.
pub const DEFAULT_OFFSET: u32 = 0;

/// Arguments for the `get_campaigns` tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetCampaignsArgs {
    /// Account to list campaigns for.
    pub ad_account_id: String,
    /// Maximum number of campaigns to return.
    pub limit: u32,
    /// Number of campaigns to skip.
    pub offset: u32,
    /// Optional status filter (`DRAFT` campaigns cannot be filtered for).
    pub status: Option<CampaignStatus>,
}

impl GetCampaignsArgs {
    /// Validates a raw argument map into a typed record.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every offending field.
    pub fn from_value(arguments: &Value) -> Result<Self, ValidationError> {
        let mut v = Validator::new(arguments, &["ad_account_id", "limit", "offset", "status"]);
        let ad_account_id = v.required_string("ad_account_id");
        let limit = v.optional_count("limit").unwrap_or(DEFAULT_LIMIT);
        let offset = v.optional_count("offset").unwrap_or(DEFAULT_OFFSET);
        let status = v.optional_status_filter("status");
        v.finish()?;

        Ok(Self {
            ad_account_id: ad_account_id.unwrap_or_default(),
            limit,
            offset,
            status,
        })
    }
}

/// Arguments for the `get_campaign_details` tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetCampaignDetailsArgs {
    /// Account owning the campaign.
    pub ad_account_id: String,
    /// Campaign to fetch.
    pub campaign_id: String,
}

impl GetCampaignDetailsArgs {
    /// Validates a raw argument map into a typed record.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every offending field.
    pub fn from_value(arguments: &Value) -> Result<Self, ValidationError> {
        let mut v = Validator::new(arguments, &["ad_account_id", "campaign_id"]);
        let ad_account_id = v.required_string("ad_account_id");
        let campaign_id = v.required_string("campaign_id");
        v.finish()?;

        Ok(Self {
            ad_account_id: ad_account_id.unwrap_or_default(),
            campaign_id: campaign_id.unwrap_or_default(),
        })
    }
}

/// Arguments for the `get_campaign_stats` tool.
#[derive(Debug, Clone, PartialEq)]
pub struct GetCampaignStatsArgs {
    /// Account owning the campaigns.
    pub ad_account_id: String,
    /// Campaigns to report on.
    pub campaign_ids: Vec<String>,
    /// First day of the report, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last day of the report, `YYYY-MM-DD`.
    pub end_date: String,
    /// Metrics to retrieve; the API's default set when absent.
    pub metrics: Option<Vec<Metric>>,
}

impl GetCampaignStatsArgs {
    /// Validates a raw argument map into a typed record.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every offending field.
    pub fn from_value(arguments: &Value) -> Result<Self, ValidationError> {
        let mut v = Validator::new(
            arguments,
            &[
                "ad_account_id",
                "campaign_ids",
                "start_date",
                "end_date",
                "metrics",
            ],
        );
        let ad_account_id = v.required_string("ad_account_id");
        let campaign_ids = v.required_string_array("campaign_ids");
        let start_date = v.required_string("start_date");
        let end_date = v.required_string("end_date");
        let metrics = v.optional_metrics("metrics");
        v.finish()?;

        Ok(Self {
            ad_account_id: ad_account_id.unwrap_or_default(),
            campaign_ids: campaign_ids.unwrap_or_default(),
            start_date: start_date.unwrap_or_default(),
            end_date: end_date.unwrap_or_default(),
            metrics,
        })
    }
}

/// Validates that a tool taking no arguments received none.
///
/// A missing, `null` or empty-object argument map is accepted.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming every unexpected field.
pub fn ensure_no_args(arguments: &Value) -> Result<(), ValidationError> {
    Validator::new(arguments, &[]).finish()
}

/// Field-by-field validator over a raw argument map.
///
/// Accumulates problems instead of failing fast so a single error message
/// can name everything that is wrong with the call.
struct Validator<'a> {
    map: Option<&'a Map<String, Value>>,
    problems: Vec<String>,
}

impl<'a> Validator<'a> {
    fn new(arguments: &'a Value, known: &[&str]) -> Self {
        match arguments {
            Value::Null => Self {
                map: None,
                problems: Vec::new(),
            },
            Value::Object(map) => {
                let mut problems = Vec::new();
                for key in map.keys() {
                    if !known.contains(&key.as_str()) {
                        problems.push(format!("unknown field '{key}'"));
                    }
                }
                Self {
                    map: Some(map),
                    problems,
                }
            }
            _ => Self {
                map: None,
                problems: vec!["arguments must be a JSON object".to_string()],
            },
        }
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        self.map.and_then(|m| m.get(name)).filter(|v| !v.is_null())
    }

    fn required_string(&mut self, name: &str) -> Option<String> {
        match self.get(name) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::String(_)) => {
                self.problems
                    .push(format!("field '{name}' must be a non-empty string"));
                None
            }
            Some(_) => {
                self.problems
                    .push(format!("field '{name}' must be a string"));
                None
            }
            None => {
                self.problems
                    .push(format!("missing required field '{name}'"));
                None
            }
        }
    }

    fn optional_count(&mut self, name: &str) -> Option<u32> {
        let value = self.get(name)?;
        match value.as_u64().and_then(|n| u32::try_from(n).ok()) {
            Some(n) => Some(n),
            None => {
                self.problems
                    .push(format!("field '{name}' must be a non-negative integer"));
                None
            }
        }
    }

    /// Parses an optional status filter; `DRAFT` is not a valid filter value.
    fn optional_status_filter(&mut self, name: &str) -> Option<CampaignStatus> {
        let value = self.get(name)?;
        let parsed = value
            .as_str()
            .and_then(CampaignStatus::parse)
            .filter(|s| *s != CampaignStatus::Draft);
        if parsed.is_none() {
            self.problems.push(format!(
                "field '{name}' must be one of ACTIVE, PAUSED, ARCHIVED"
            ));
        }
        parsed
    }

    fn required_string_array(&mut self, name: &str) -> Option<Vec<String>> {
        match self.get(name) {
            Some(Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                let mut ok = true;
                for (index, item) in items.iter().enumerate() {
                    if let Value::String(s) = item {
                        out.push(s.clone());
                    } else {
                        self.problems
                            .push(format!("field '{name}[{index}]' must be a string"));
                        ok = false;
                    }
                }
                ok.then_some(out)
            }
            Some(_) => {
                self.problems
                    .push(format!("field '{name}' must be an array of strings"));
                None
            }
            None => {
                self.problems
                    .push(format!("missing required field '{name}'"));
                None
            }
        }
    }

    fn optional_metrics(&mut self, name: &str) -> Option<Vec<Metric>> {
        let items = match self.get(name)? {
            Value::Array(items) => items,
            _ => {
                self.problems
                    .push(format!("field '{name}' must be an array of strings"));
                return None;
            }
        };

        let mut out = Vec::with_capacity(items.len());
        let mut ok = true;
        for item in items {
            match item.as_str().and_then(Metric::parse) {
                Some(metric) => out.push(metric),
                None => {
                    let allowed = Metric::ALL
                        .iter()
                        .map(|m| m.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    self.problems.push(format!(
                        "field '{name}' contains an unknown metric (expected one of {allowed})"
                    ));
                    ok = false;
                }
            }
        }
        ok.then_some(out)
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.problems.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.problems))
        }
    }
}
