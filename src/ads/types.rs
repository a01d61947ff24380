//! Entities returned by the Uber Ads API and listing options.
//!
//! All entities are transient, read-only projections of API responses:
//! decoded per fetch, never mutated locally, never cached. Unknown fields in
//! a response are ignored (the remote API may grow), but enumerated fields
//! are closed Rust enums that reject out-of-set wire values at decode time.

use serde::{Deserialize, Serialize};

/// An advertising account: the billing/ownership container for campaigns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdAccount {
    /// Account identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// ISO currency code, e.g. `USD`.
    pub currency: String,
    /// IANA timezone name.
    pub timezone: String,
    /// Account status as reported by the API.
    pub status: String,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
    /// Last-update timestamp (ISO 8601).
    pub updated_at: String,
}

/// Campaign lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    /// Actively delivering.
    Active,
    /// Paused by the advertiser.
    Paused,
    /// Archived; no longer editable.
    Archived,
    /// Draft; never delivered.
    Draft,
}

impl CampaignStatus {
    /// Returns the wire representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Paused => "PAUSED",
            Self::Archived => "ARCHIVED",
            Self::Draft => "DRAFT",
        }
    }

    /// Parses a wire status string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(Self::Active),
            "PAUSED" => Some(Self::Paused),
            "ARCHIVED" => Some(Self::Archived),
            "DRAFT" => Some(Self::Draft),
            _ => None,
        }
    }
}

/// How a campaign's budget is accounted.
///
/// The budget type determines which of [`Campaign::daily_budget`] and
/// [`Campaign::lifetime_budget`] is meaningful; the other is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetType {
    /// Budget is spent per day.
    Daily,
    /// Budget covers the campaign's whole lifetime.
    Lifetime,
}

/// Kind of a location targeting entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    City,
    Region,
    Country,
    PostalCode,
}

/// One location constraint in a targeting specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationTargeting {
    /// What the value denotes.
    #[serde(rename = "type")]
    pub kind: LocationKind,
    /// The location value, e.g. a city name or postal code.
    pub value: String,
    /// Optional radius around the location, in the API's distance unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<u32>,
}

/// Gender values accepted in demographic targeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    All,
}

/// Demographic filter in a targeting specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicTargeting {
    /// Minimum age, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_min: Option<u32>,
    /// Maximum age, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_max: Option<u32>,
    /// Targeted genders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genders: Option<Vec<Gender>>,
}

/// A campaign's targeting specification.
///
/// Every field is independently optional; absence means no constraint of
/// that kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignTargeting {
    /// Location constraints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<LocationTargeting>>,
    /// Demographic filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographics: Option<DemographicTargeting>,
    /// Interest tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
    /// Behaviour tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behaviors: Option<Vec<String>>,
}

/// Kind of a creative asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Video,
    Text,
}

/// Pixel dimensions of a visual asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// One asset inside a creative specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreativeAsset {
    /// Asset identifier.
    pub id: String,
    /// Asset kind.
    #[serde(rename = "type")]
    pub kind: AssetKind,
    /// URL of the asset, for image/video assets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Text content, for text assets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Pixel dimensions, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

/// Kind of a creative container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreativeKind {
    Image,
    Video,
    Carousel,
}

/// A named creative container holding one or more assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreativeSpec {
    /// Creative identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Creative kind.
    #[serde(rename = "type")]
    pub kind: CreativeKind,
    /// Assets belonging to this creative.
    pub assets: Vec<CreativeAsset>,
}

/// An advertising campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    /// Campaign identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Lifecycle status.
    pub status: CampaignStatus,
    /// Campaign objective, e.g. `awareness`.
    pub objective: String,
    /// Which budget field applies.
    pub budget_type: BudgetType,
    /// Daily budget amount; meaningful when `budget_type` is `DAILY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_budget: Option<f64>,
    /// Lifetime budget amount; meaningful when `budget_type` is `LIFETIME`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifetime_budget: Option<f64>,
    /// Scheduled start (ISO 8601).
    pub start_time: String,
    /// Scheduled end (ISO 8601); open-ended when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
    /// Last-update timestamp (ISO 8601).
    pub updated_at: String,
    /// Targeting specification, when any targeting is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targeting: Option<CampaignTargeting>,
    /// Creatives attached to the campaign.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creative_specs: Option<Vec<CreativeSpec>>,
}

impl Campaign {
    /// Returns the budget amount selected by [`Campaign::budget_type`].
    #[must_use]
    pub const fn budget_amount(&self) -> Option<f64> {
        match self.budget_type {
            BudgetType::Daily => self.daily_budget,
            BudgetType::Lifetime => self.lifetime_budget,
        }
    }
}

/// The date range a statistics report covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last day, `YYYY-MM-DD`.
    pub end_date: String,
}

/// Per-day raw metrics inside a statistics breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsBreakdown {
    /// Day, `YYYY-MM-DD`.
    pub date: String,
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub conversions: u64,
}

/// Aggregate performance metrics for one campaign over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignStats {
    /// Campaign the metrics belong to.
    pub campaign_id: String,
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub conversions: u64,
    /// Click-through rate.
    pub ctr: f64,
    /// Cost per mille.
    pub cpm: f64,
    /// Cost per click.
    pub cpc: f64,
    /// Conversions per click.
    pub conversion_rate: f64,
    /// Range the aggregates cover.
    pub date_range: DateRange,
    /// Optional per-day breakdown of the raw metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<Vec<StatsBreakdown>>,
}

/// Metrics that can be requested from the statistics report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Impressions,
    Clicks,
    Spend,
    Conversions,
    Ctr,
    Cpm,
}

impl Metric {
    /// All metrics, in catalog order.
    pub const ALL: [Self; 6] = [
        Self::Impressions,
        Self::Clicks,
        Self::Spend,
        Self::Conversions,
        Self::Ctr,
        Self::Cpm,
    ];

    /// Returns the wire representation of this metric.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Impressions => "impressions",
            Self::Clicks => "clicks",
            Self::Spend => "spend",
            Self::Conversions => "conversions",
            Self::Ctr => "ctr",
            Self::Cpm => "cpm",
        }
    }

    /// Parses a wire metric string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }
}

/// Campaign fields the listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Name,
    Spend,
}

impl SortField {
    /// Returns the wire representation of this field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Name => "name",
            Self::Spend => "spend",
        }
    }
}

/// Sort direction for campaign listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Returns the wire representation of this order.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Options for listing campaigns.
///
/// Each `Some` field becomes a query parameter; `None` fields are omitted
/// from the request entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetCampaignsOptions {
    /// Maximum number of campaigns to return.
    pub limit: Option<u32>,
    /// Number of campaigns to skip.
    pub offset: Option<u32>,
    /// Only return campaigns with this status.
    pub status: Option<CampaignStatus>,
    /// Sort key.
    pub sort_by: Option<SortField>,
    /// Sort direction.
    pub sort_order: Option<SortOrder>,
}

impl Default for GetCampaignsOptions {
    fn default() -> Self {
        Self {
            limit: Some(50),
            offset: Some(0),
            status: None,
            sort_by: None,
            sort_order: None,
        }
    }
}
