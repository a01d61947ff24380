//! uber-ads-mcp: MCP server for the Uber Ads External API
//!
//! This library exposes four read-only Uber Ads operations as MCP tools over
//! a newline-delimited JSON-RPC 2.0 stdio transport:
//!
//! - `get_ad_accounts` — list ad accounts for the authenticated user
//! - `get_campaigns` — list campaigns for an ad account
//! - `get_campaign_details` — fetch a single campaign
//! - `get_campaign_stats` — fetch campaign performance statistics
//!
//! # Architecture
//!
//! Each tool invocation performs argument validation, at most one outbound
//! HTTP call (with a fixed retry policy for transient failures), response
//! shape normalisation, and error translation into a uniform tool-result
//! envelope. There is no caching and no state shared between invocations
//! beyond the immutable client configuration.
//!
//! # Modules
//!
//! - [`ads`] — Uber Ads domain types, argument records and HTTP client
//! - [`config`] — Environment-sourced configuration
//! - [`error`] — Configuration error types
//! - [`mcp`] — MCP protocol implementation

pub mod ads;
pub mod config;
pub mod error;
pub mod mcp;
