//! campaign-summary: formatted campaign report for an ad account.
//!
//! Fetches campaigns through the shared Uber Ads client and prints a
//! human-readable summary to stdout. Intended for quick checks from a
//! terminal; the MCP server remains the programmatic surface.

use std::fmt::Write as _;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use uber_ads_mcp::ads::types::{BudgetType, Campaign, CampaignStatus, GetCampaignsOptions};
use uber_ads_mcp::ads::UberAdsClient;
use uber_ads_mcp::config::{Config, ENV_ACCESS_TOKEN};

/// Print a formatted campaign summary for an ad account.
///
/// Reads credentials from the environment (UBER_ACCESS_TOKEN, optionally
/// UBER_BASE_URL); a .env file in the working directory is honoured.
#[derive(Parser, Debug)]
#[command(name = "campaign-summary")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ad account to summarise
    ad_account_id: String,

    /// Only include campaigns with this status
    #[arg(long, value_enum)]
    status: Option<StatusFilter>,

    /// Maximum number of campaigns to fetch
    #[arg(long, default_value_t = 50)]
    limit: u32,
}

/// Status filter accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusFilter {
    Active,
    Paused,
    Archived,
}

impl From<StatusFilter> for CampaignStatus {
    fn from(filter: StatusFilter) -> Self {
        match filter {
            StatusFilter::Active => Self::Active,
            StatusFilter::Paused => Self::Paused,
            StatusFilter::Archived => Self::Archived,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            eprintln!("Set {ENV_ACCESS_TOKEN} in the environment or a .env file.");
            return ExitCode::FAILURE;
        }
    };

    let client = match UberAdsClient::new(&cfg) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Client error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Runtime error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let options = GetCampaignsOptions {
        limit: Some(args.limit),
        status: args.status.map(CampaignStatus::from),
        ..GetCampaignsOptions::default()
    };

    let campaigns = match runtime.block_on(client.get_campaigns(&args.ad_account_id, &options)) {
        Ok(campaigns) => campaigns,
        Err(e) => {
            eprintln!("Error retrieving campaigns: {e}");
            return ExitCode::FAILURE;
        }
    };

    print!("{}", render_summary(&args.ad_account_id, &campaigns));
    ExitCode::SUCCESS
}

/// Renders the full report for an account's campaigns.
fn render_summary(ad_account_id: &str, campaigns: &[Campaign]) -> String {
    let mut out = String::new();
    let rule = "=".repeat(80);

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "AD ACCOUNT: {ad_account_id}");
    let _ = writeln!(out, "CAMPAIGNS FOUND: {}", campaigns.len());
    let _ = writeln!(out, "{rule}");

    for (index, campaign) in campaigns.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "CAMPAIGN {}:", index + 1);
        let _ = writeln!(out, "   Name: {}", campaign.name);
        let _ = writeln!(out, "   ID: {}", campaign.id);
        let _ = writeln!(out, "   Status: {}", campaign.status.as_str());
        let _ = writeln!(out, "   Objective: {}", campaign.objective);
        let _ = writeln!(out, "   Budget: {}", format_budget(campaign));
        let _ = writeln!(
            out,
            "   Schedule: {} -> {}",
            format_timestamp(&campaign.start_time),
            campaign
                .end_time
                .as_deref()
                .map_or_else(|| "open-ended".to_string(), format_timestamp),
        );
        let _ = writeln!(out, "   Created: {}", format_timestamp(&campaign.created_at));
        let _ = writeln!(out, "   Updated: {}", format_timestamp(&campaign.updated_at));
        let _ = writeln!(out, "   Targeting: {}", describe_targeting(campaign));
        let _ = writeln!(
            out,
            "   Creatives: {}",
            campaign.creative_specs.as_ref().map_or(0, Vec::len)
        );
    }

    out
}

/// Formats a campaign's budget, e.g. `$1,250.00 (Daily)`.
fn format_budget(campaign: &Campaign) -> String {
    campaign.budget_amount().map_or_else(
        || "N/A".to_string(),
        |amount| {
            let unit = match campaign.budget_type {
                BudgetType::Daily => "Daily",
                BudgetType::Lifetime => "Lifetime",
            };
            format!("${} ({unit})", format_amount(amount))
        },
    )
}

/// Formats an amount with thousands separators and two decimals.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // budgets are non-negative and far below u64::MAX
fn format_amount(amount: f64) -> String {
    let cents = (amount.max(0.0) * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.bytes().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(char::from(digit));
    }

    format!("{grouped}.{frac:02}")
}

/// Formats an ISO 8601 timestamp as `YYYY-MM-DD HH:MM:SS UTC`, falling back
/// to the raw string when it does not parse.
fn format_timestamp(timestamp: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(timestamp).map_or_else(
        |_| timestamp.to_string(),
        |dt| {
            dt.with_timezone(&chrono::Utc)
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string()
        },
    )
}

/// One-line overview of a campaign's targeting specification.
fn describe_targeting(campaign: &Campaign) -> String {
    let Some(targeting) = &campaign.targeting else {
        return "none".to_string();
    };

    let mut parts = Vec::new();
    if let Some(locations) = &targeting.locations {
        parts.push(format!("{} location(s)", locations.len()));
    }
    if let Some(demographics) = &targeting.demographics {
        let ages = match (demographics.age_min, demographics.age_max) {
            (Some(min), Some(max)) => format!("ages {min}-{max}"),
            (Some(min), None) => format!("ages {min}+"),
            (None, Some(max)) => format!("ages up to {max}"),
            (None, None) => "all ages".to_string(),
        };
        parts.push(ages);
    }
    if let Some(interests) = &targeting.interests {
        parts.push(format!("{} interest(s)", interests.len()));
    }
    if let Some(behaviors) = &targeting.behaviors {
        parts.push(format!("{} behaviour(s)", behaviors.len()));
    }

    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(", ")
    }
}
