//! MCP server implementation for the Uber Ads API.
//!
//! This module implements the MCP server lifecycle:
//!
//! 1. **Initialisation**: Capability negotiation and version agreement
//! 2. **Operation**: Handling tool calls and other requests
//! 3. **Shutdown**: Graceful connection termination
//!
//! # Architecture
//!
//! Every tool call follows the same path: validate the arguments against the
//! tool's typed record, perform one client call, and wrap the outcome —
//! success, validation failure, API failure or anything unexpected — into a
//! uniform [`ToolCallResult`] envelope. No failure escapes this module as a
//! raw fault.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::ads::args::{
    ensure_no_args, GetCampaignDetailsArgs, GetCampaignsArgs, GetCampaignStatsArgs,
};
use crate::ads::types::GetCampaignsOptions;
use crate::ads::UberAdsClient;
use crate::mcp::protocol::{
    ErrorCode, IncomingMessage, JsonRpcError, JsonRpcErrorData, JsonRpcNotification,
    JsonRpcRequest, JsonRpcResponse, RequestId, MCP_PROTOCOL_VERSION, SERVER_NAME,
};
use crate::mcp::transport::StdioTransport;

/// Server state in the MCP lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Waiting for initialize request.
    AwaitingInit,
    /// Initialize received, waiting for initialized notification.
    Initialising,
    /// Ready for normal operation.
    Running,
    /// Shutdown in progress.
    ShuttingDown,
}

/// Server capabilities advertised during initialisation.
#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolCapabilities>,
}

impl Default for ServerCapabilities {
    fn default() -> Self {
        Self {
            tools: Some(ToolCapabilities::default()),
        }
    }
}

/// Tool-specific capabilities.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolCapabilities {
    /// Whether the tool list can change during the session.
    #[serde(rename = "listChanged", skip_serializing_if = "is_false")]
    pub list_changed: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if requires a predicate fn(&T) -> bool, so we must take &bool here
const fn is_false(b: &bool) -> bool {
    !*b
}

/// Server information for initialisation response.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Client information received during initialisation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    /// Client name.
    pub name: String,
    /// Client version.
    #[serde(default)]
    pub version: Option<String>,
}

/// Parameters for the initialize request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version requested by client.
    pub protocol_version: String,
    /// Client capabilities.
    #[serde(default)]
    pub capabilities: Value,
    /// Client information.
    #[serde(default)]
    pub client_info: Option<ClientInfo>,
}

/// A tool definition for the tools/list response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
}

/// Parameters for a tools/call request.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments for the tool.
    #[serde(default)]
    pub arguments: Value,
}

/// Content item in a tool call response.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Result of a tool call: the uniform envelope every invocation returns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the tool call resulted in an error.
    #[serde(skip_serializing_if = "is_false")]
    pub is_error: bool,
}

impl ToolCallResult {
    /// Creates a successful text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Creates an error text result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }
}

/// The MCP server for the Uber Ads API.
pub struct McpServer {
    /// Current server state.
    state: ServerState,
    /// The transport layer.
    transport: StdioTransport,
    /// Negotiated protocol version (set after initialisation).
    protocol_version: Option<String>,
    /// The Uber Ads API client shared by all tool calls.
    client: UberAdsClient,
}

impl McpServer {
    /// Creates a new MCP server around a configured API client.
    #[must_use]
    pub fn new(client: UberAdsClient) -> Self {
        Self {
            state: ServerState::AwaitingInit,
            transport: StdioTransport::new(),
            protocol_version: None,
            client,
        }
    }

    /// Returns the current server state.
    #[must_use]
    pub const fn state(&self) -> ServerState {
        self.state
    }

    /// Runs the MCP server main loop with graceful shutdown handling.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn run(&mut self) -> std::io::Result<()> {
        self.run_with_shutdown().await
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(unix)]
    async fn run_with_shutdown(&mut self) -> std::io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt()).map_err(std::io::Error::other)?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(std::io::Error::other)?;

        loop {
            tokio::select! {
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(windows)]
    async fn run_with_shutdown(&mut self) -> std::io::Result<()> {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    tracing::info!("Received Ctrl+C, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Handles the result from transport read.
    ///
    /// Returns `true` if the server should shut down.
    async fn handle_transport_result(
        &mut self,
        line_result: std::io::Result<Option<String>>,
    ) -> std::io::Result<bool> {
        let Some(line) = line_result? else {
            self.state = ServerState::ShuttingDown;
            return Ok(true);
        };

        if line.trim().is_empty() {
            return Ok(false);
        }

        self.handle_line(&line).await?;

        if self.state == ServerState::ShuttingDown {
            return Ok(true);
        }

        Ok(false)
    }

    /// Handles a single line of input.
    async fn handle_line(&mut self, line: &str) -> std::io::Result<()> {
        use crate::mcp::protocol::parse_message;

        match parse_message(line) {
            Ok(msg) => self.handle_message(msg).await,
            Err(error) => {
                self.transport.write_error(&error).await?;
                Ok(())
            }
        }
    }

    /// Handles a parsed incoming message.
    async fn handle_message(&mut self, msg: IncomingMessage) -> std::io::Result<()> {
        match msg {
            IncomingMessage::Request(req) => self.handle_request(req).await,
            IncomingMessage::Notification(ref notif) => {
                self.handle_notification(notif);
                Ok(())
            }
        }
    }

    /// Handles an incoming request.
    async fn handle_request(&mut self, req: JsonRpcRequest) -> std::io::Result<()> {
        let response = match req.method.as_str() {
            "initialize" => self.handle_initialize(&req),
            "tools/list" => self.handle_tools_list(&req),
            "tools/call" => self.handle_tools_call(&req).await,
            "ping" => Ok(Self::handle_ping(&req)),
            _ => Err(JsonRpcError::method_not_found(req.id.clone(), &req.method)),
        };

        match response {
            Ok(resp) => self.transport.write_response(&resp).await,
            Err(error) => self.transport.write_error(&error).await,
        }
    }

    /// Handles an incoming notification.
    fn handle_notification(&mut self, notif: &JsonRpcNotification) {
        if notif.method == "notifications/initialized" && self.state == ServerState::Initialising {
            self.state = ServerState::Running;
        }
    }

    /// Handles the initialize request.
    fn handle_initialize(&mut self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        if self.state != ServerState::AwaitingInit {
            return Err(JsonRpcError::new(
                Some(req.id.clone()),
                JsonRpcErrorData::with_message(
                    ErrorCode::InvalidRequest,
                    "Server already initialised",
                ),
            ));
        }

        let _params: InitializeParams = req
            .params
            .as_ref()
            .map(|p| serde_json::from_value(p.clone()))
            .transpose()
            .map_err(|e| {
                JsonRpcError::invalid_params(
                    req.id.clone(),
                    format!("Invalid initialize params: {e}"),
                )
            })?
            .ok_or_else(|| {
                JsonRpcError::invalid_params(req.id.clone(), "Missing initialize params")
            })?;

        let negotiated_version = MCP_PROTOCOL_VERSION.to_string();

        self.protocol_version = Some(negotiated_version.clone());
        self.state = ServerState::Initialising;

        let result = json!({
            "protocolVersion": negotiated_version,
            "capabilities": ServerCapabilities::default(),
            "serverInfo": ServerInfo::default(),
        });

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    /// Handles the tools/list request.
    fn handle_tools_list(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        let tools = Self::get_tool_definitions();

        let result = json!({
            "tools": tools,
        });

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    /// Handles the tools/call request.
    async fn handle_tools_call(
        &self,
        req: &JsonRpcRequest,
    ) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        let params: ToolCallParams = req
            .params
            .as_ref()
            .map(|p| serde_json::from_value(p.clone()))
            .transpose()
            .map_err(|e| {
                JsonRpcError::invalid_params(
                    req.id.clone(),
                    format!("Invalid tool call params: {e}"),
                )
            })?
            .ok_or_else(|| {
                JsonRpcError::invalid_params(req.id.clone(), "Missing tool call params")
            })?;

        let result = self.dispatch_tool(&params.name, &params.arguments).await;

        let result_value = serde_json::to_value(&result).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialise tool call result");
            JsonRpcError::internal_error(
                req.id.clone(),
                "Internal error: failed to serialise result",
            )
        })?;

        Ok(JsonRpcResponse::success(req.id.clone(), result_value))
    }

    /// Handles the ping request.
    fn handle_ping(req: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(req.id.clone(), json!({}))
    }

    /// Ensures the server is in the Running state.
    fn require_running(&self, id: &RequestId) -> Result<(), JsonRpcError> {
        if self.state != ServerState::Running {
            return Err(JsonRpcError::new(
                Some(id.clone()),
                JsonRpcErrorData::with_message(ErrorCode::InvalidRequest, "Server not initialised"),
            ));
        }
        Ok(())
    }

    /// Dispatches a named tool call and returns its envelope.
    ///
    /// Every outcome — success, validation failure, API failure, unknown
    /// tool — comes back as a [`ToolCallResult`]; this method never fails.
    pub async fn dispatch_tool(&self, name: &str, arguments: &Value) -> ToolCallResult {
        match name {
            "get_ad_accounts" => self.call_get_ad_accounts(arguments).await,
            "get_campaigns" => self.call_get_campaigns(arguments).await,
            "get_campaign_details" => self.call_get_campaign_details(arguments).await,
            "get_campaign_stats" => self.call_get_campaign_stats(arguments).await,
            _ => ToolCallResult::error(format!("Unknown tool: {name}")),
        }
    }

    /// Retrieves all ad accounts.
    async fn call_get_ad_accounts(&self, arguments: &Value) -> ToolCallResult {
        if let Err(e) = ensure_no_args(arguments) {
            return ToolCallResult::error(format!("Invalid arguments: {e}"));
        }

        match self.client.get_ad_accounts().await {
            Ok(accounts) => success_payload(&accounts),
            Err(e) => {
                tracing::error!(error = %e, "get_ad_accounts failed");
                ToolCallResult::error(format!("Error retrieving ad accounts: {e}"))
            }
        }
    }

    /// Retrieves campaigns for an ad account.
    async fn call_get_campaigns(&self, arguments: &Value) -> ToolCallResult {
        let args = match GetCampaignsArgs::from_value(arguments) {
            Ok(args) => args,
            Err(e) => return ToolCallResult::error(format!("Invalid arguments: {e}")),
        };

        let options = GetCampaignsOptions {
            limit: Some(args.limit),
            offset: Some(args.offset),
            status: args.status,
            sort_by: None,
            sort_order: None,
        };

        match self.client.get_campaigns(&args.ad_account_id, &options).await {
            Ok(campaigns) => success_payload(&campaigns),
            Err(e) => {
                tracing::error!(error = %e, ad_account_id = %args.ad_account_id, "get_campaigns failed");
                ToolCallResult::error(format!("Error retrieving campaigns: {e}"))
            }
        }
    }

    /// Retrieves a single campaign.
    async fn call_get_campaign_details(&self, arguments: &Value) -> ToolCallResult {
        let args = match GetCampaignDetailsArgs::from_value(arguments) {
            Ok(args) => args,
            Err(e) => return ToolCallResult::error(format!("Invalid arguments: {e}")),
        };

        match self
            .client
            .get_campaign_details(&args.ad_account_id, &args.campaign_id)
            .await
        {
            Ok(campaign) => success_payload(&campaign),
            Err(e) => {
                tracing::error!(error = %e, campaign_id = %args.campaign_id, "get_campaign_details failed");
                ToolCallResult::error(format!("Error retrieving campaign details: {e}"))
            }
        }
    }

    /// Retrieves campaign statistics.
    async fn call_get_campaign_stats(&self, arguments: &Value) -> ToolCallResult {
        let args = match GetCampaignStatsArgs::from_value(arguments) {
            Ok(args) => args,
            Err(e) => return ToolCallResult::error(format!("Invalid arguments: {e}")),
        };

        match self
            .client
            .get_campaign_stats(
                &args.ad_account_id,
                &args.campaign_ids,
                &args.start_date,
                &args.end_date,
                args.metrics.as_deref(),
            )
            .await
        {
            Ok(stats) => success_payload(&stats),
            Err(e) => {
                tracing::error!(error = %e, ad_account_id = %args.ad_account_id, "get_campaign_stats failed");
                ToolCallResult::error(format!("Error retrieving campaign stats: {e}"))
            }
        }
    }

    /// Returns the list of available tools.
    #[allow(clippy::too_many_lines)]
    fn get_tool_definitions() -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: "get_ad_accounts".to_string(),
                description: Some(
                    "Retrieve all ad accounts for the authenticated user".to_string(),
                ),
                input_schema: json!({
                    "type": "object",
                    "properties": {},
                }),
            },
            ToolDefinition {
                name: "get_campaigns".to_string(),
                description: Some(
                    "Retrieve campaigns for a specific ad account".to_string(),
                ),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "ad_account_id": {
                            "type": "string",
                            "description": "The ID of the ad account to retrieve campaigns for"
                        },
                        "limit": {
                            "type": "integer",
                            "description": "Maximum number of campaigns to retrieve (default: 50)",
                            "default": 50
                        },
                        "offset": {
                            "type": "integer",
                            "description": "Number of campaigns to skip (default: 0)",
                            "default": 0
                        },
                        "status": {
                            "type": "string",
                            "enum": ["ACTIVE", "PAUSED", "ARCHIVED"],
                            "description": "Filter campaigns by status"
                        }
                    },
                    "required": ["ad_account_id"]
                }),
            },
            ToolDefinition {
                name: "get_campaign_details".to_string(),
                description: Some(
                    "Get detailed information about a specific campaign".to_string(),
                ),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "ad_account_id": {
                            "type": "string",
                            "description": "The ID of the ad account"
                        },
                        "campaign_id": {
                            "type": "string",
                            "description": "The ID of the campaign to retrieve details for"
                        }
                    },
                    "required": ["ad_account_id", "campaign_id"]
                }),
            },
            ToolDefinition {
                name: "get_campaign_stats".to_string(),
                description: Some(
                    "Retrieve performance statistics for campaigns".to_string(),
                ),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "ad_account_id": {
                            "type": "string",
                            "description": "The ID of the ad account"
                        },
                        "campaign_ids": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "Array of campaign IDs to get stats for"
                        },
                        "start_date": {
                            "type": "string",
                            "description": "Start date for stats in YYYY-MM-DD format"
                        },
                        "end_date": {
                            "type": "string",
                            "description": "End date for stats in YYYY-MM-DD format"
                        },
                        "metrics": {
                            "type": "array",
                            "items": {
                                "type": "string",
                                "enum": ["impressions", "clicks", "spend", "conversions", "ctr", "cpm"]
                            },
                            "description": "Metrics to retrieve"
                        }
                    },
                    "required": ["ad_account_id", "campaign_ids", "start_date", "end_date"]
                }),
            },
        ]
    }
}

/// Serialises a successful payload into a text envelope.
///
/// Serialisation of our own entities cannot realistically fail, but nothing
/// is allowed to panic across the dispatcher boundary, so a failure still
/// becomes an error envelope.
fn success_payload<T: Serialize>(value: &T) -> ToolCallResult {
    match serde_json::to_string_pretty(value) {
        Ok(text) => ToolCallResult::text(text),
        Err(e) => ToolCallResult::error(format!("Unexpected error: {e}")),
    }
}
