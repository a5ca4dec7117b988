//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes the dictionary operations over stdio so an assistant can scan,
//! search, and clean dictionaries the same way the CLI does. Each tool
//! delegates to `dict-hygiene-core`; the server only owns the shared
//! dictionary cache and one [`AnalyzerSession`] per analyzer kind.
//!
//! A session is held for the whole tool call. A second call that reaches
//! the same analyzer while the first is still running is rejected as busy
//! instead of queued.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

use dict_hygiene_core::analysis::{ALL_ANALYZERS, search};
use dict_hygiene_core::scan::NoProgress;
use dict_hygiene_core::{
    AnalyzerKind, AnalyzerSession, Category, Config, DeleteOutcome, DeletionTarget,
    DictionaryCache, ErrorKind, HygieneError, LanguageCode,
};

use crate::commands::build_filters;
use crate::commands::scan::{DEFAULT_LIMIT, ScanOutput};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `scan_dictionary` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ScanDictionaryParams {
    /// Analyzer to run: "non-linguistic", "case", "short", or "duplicates".
    pub analyzer: AnalyzerKind,
    /// Dictionary language. Defaults to the configured default language.
    pub language: Option<String>,
    /// Categories to hide from the result list.
    #[serde(default)]
    pub hide: Vec<Category>,
    /// Maximum items to return.
    pub limit: Option<usize>,
}

/// Parameters for the `search_dictionary` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SearchDictionaryParams {
    /// Text to look for, case-insensitive.
    pub term: String,
    /// Dictionary language. Defaults to the configured default language.
    pub language: Option<String>,
    /// Maximum matches to return.
    pub limit: Option<usize>,
}

/// Parameters for the `preview_delete` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct PreviewDeleteParams {
    /// Analyzer whose last scan is the source of the deletion.
    pub analyzer: AnalyzerKind,
    /// Categories excluded from the deletion.
    #[serde(default)]
    pub hide: Vec<Category>,
}

/// Parameters for the `confirm_delete` and `cancel_delete` tools.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AnalyzerParams {
    /// Analyzer holding the pending deletion.
    pub analyzer: AnalyzerKind,
}

/// Parameters for the `save_dictionary` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SaveDictionaryParams {
    /// Language of the dictionary to replace.
    pub language: String,
    /// JSON-encoded `[{"word": ..., "freq": ...}]` array.
    pub dictionary: String,
}

#[derive(Serialize)]
struct PreviewOutput<'a> {
    analyzer: AnalyzerKind,
    language: Option<&'a LanguageCode>,
    target: &'a DeletionTarget,
}

#[derive(Serialize)]
struct ConfirmOutput<'a> {
    analyzer: AnalyzerKind,
    #[serde(flatten)]
    outcome: &'a DeleteOutcome,
}

#[derive(Serialize)]
struct SaveOutput<'a> {
    success: bool,
    language: &'a str,
    backup: String,
}

/// MCP server exposing dictionary hygiene tools.
#[derive(Clone)]
pub struct DictionaryServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    config: Arc<Config>,
    cache: Arc<DictionaryCache>,
    sessions: Arc<BTreeMap<AnalyzerKind, Mutex<AnalyzerSession>>>,
}

#[tool_router]
impl DictionaryServer {
    /// Server over the dictionaries described by `config`.
    pub fn new(config: Config) -> Self {
        let cache = DictionaryCache::new(config.store());
        let sessions = ALL_ANALYZERS
            .into_iter()
            .map(|kind| (kind, Mutex::new(AnalyzerSession::new(kind))))
            .collect();
        Self {
            tool_router: Self::tool_router(),
            config: Arc::new(config),
            cache: Arc::new(cache),
            sessions: Arc::new(sessions),
        }
    }

    /// Get project information.
    #[tool(description = "Get project name, version, description, and dictionary directory")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "dict_dir": self.config.dict_dir,
            "languages": self.config.languages,
            "default_language": self.config.default_language,
        });

        let text = if params.format == "json" {
            to_json(&info)?
        } else {
            format!(
                "{} v{}\n{}\ndictionaries: {} ({})",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
                self.config.dict_dir,
                self.config.languages.join(", "),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Run an analyzer over a dictionary.
    #[tool(
        description = "Scan a dictionary with one analyzer (non-linguistic, case, short, duplicates). Returns per-category counts and the filtered items, highest frequency first."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", analyzer = %params.analyzer))]
    fn scan_dictionary(
        &self,
        Parameters(params): Parameters<ScanDictionaryParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "scan_dictionary", language = ?params.language, "executing MCP tool");

        let filters = build_filters(params.analyzer, &params.hide)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        let lang = self.language(params.language.as_deref())?;
        let options = self.config.analysis_options(lang.as_str());

        let mut session = self.session(params.analyzer)?;
        let report = session
            .scan(&self.cache, &lang, &options, &mut NoProgress)
            .map_err(to_mcp_error)?;
        let output = ScanOutput::new(
            &lang,
            report,
            &filters,
            params.limit.unwrap_or(DEFAULT_LIMIT),
        );
        let json = to_json(&output)?;

        tracing::info!(
            tool = "scan_dictionary",
            matched = output.matched,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Substring search in a dictionary.
    #[tool(
        description = "Search a dictionary for a term, case-insensitive. Returns the exact match (if any) and every entry containing the term."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn search_dictionary(
        &self,
        Parameters(params): Parameters<SearchDictionaryParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "search_dictionary", term = %params.term, "executing MCP tool");

        let lang = self.language(params.language.as_deref())?;
        let entries = self.cache.get_or_load(&lang).map_err(to_mcp_error)?;
        let scanner = self.config.analysis_options(lang.as_str()).scanner();
        let mut report =
            search::search(&entries, &params.term, &scanner, &mut NoProgress).map_err(to_mcp_error)?;
        report
            .matches
            .truncate(params.limit.unwrap_or(DEFAULT_LIMIT));
        let json = to_json(&report)?;

        tracing::info!(
            tool = "search_dictionary",
            exact = report.exact.is_some(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Stage a deletion from the analyzer's last scan.
    #[tool(
        description = "Preview deleting the filtered results of the analyzer's last scan. Nothing is written until confirm_delete."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", analyzer = %params.analyzer))]
    fn preview_delete(
        &self,
        Parameters(params): Parameters<PreviewDeleteParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "preview_delete", hide = ?params.hide, "executing MCP tool");

        let filters = build_filters(params.analyzer, &params.hide)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        let mut session = self.session(params.analyzer)?;
        let target = session
            .request_delete(&filters)
            .map_err(to_mcp_error)?
            .clone();
        let output = PreviewOutput {
            analyzer: params.analyzer,
            language: session.language(),
            target: &target,
        };
        let json = to_json(&output)?;

        tracing::info!(
            tool = "preview_delete",
            keys = target.keys().len(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Write the staged deletion.
    #[tool(
        description = "Commit the deletion staged by preview_delete. Backs up the dictionary first and returns the backup path."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", analyzer = %params.analyzer))]
    fn confirm_delete(
        &self,
        Parameters(params): Parameters<AnalyzerParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "confirm_delete", "executing MCP tool");

        let mut session = self.session(params.analyzer)?;
        let outcome = session.confirm_delete(&self.cache).map_err(to_mcp_error)?;
        let json = to_json(&ConfirmOutput {
            analyzer: params.analyzer,
            outcome: &outcome,
        })?;

        tracing::info!(
            tool = "confirm_delete",
            removed = outcome.removed,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Drop the staged deletion.
    #[tool(description = "Discard the deletion staged by preview_delete.")]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", analyzer = %params.analyzer))]
    fn cancel_delete(
        &self,
        Parameters(params): Parameters<AnalyzerParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "cancel_delete", "executing MCP tool");

        let mut session = self.session(params.analyzer)?;
        session.cancel_delete().map_err(to_mcp_error)?;

        tracing::info!(tool = "cancel_delete", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(format!(
            "{} delete cancelled; state: {}",
            params.analyzer,
            session.state().as_str()
        ))]))
    }

    /// Replace a dictionary wholesale.
    #[tool(
        description = "Replace a dictionary with a JSON-encoded entry array. The current file is backed up first."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", language = %params.language))]
    fn save_dictionary(
        &self,
        Parameters(params): Parameters<SaveDictionaryParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "save_dictionary",
            bytes = params.dictionary.len(),
            "executing MCP tool"
        );

        let lang = self
            .cache
            .store()
            .language(&params.language)
            .map_err(to_mcp_error)?;
        let backup = self
            .cache
            .store()
            .save_serialized(lang.as_str(), &params.dictionary)
            .map_err(to_mcp_error)?;
        self.cache.invalidate(&lang);

        let json = to_json(&SaveOutput {
            success: true,
            language: lang.as_str(),
            backup: backup.to_string(),
        })?;

        tracing::info!(tool = "save_dictionary", backup = %backup, "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

impl DictionaryServer {
    fn language(&self, code: Option<&str>) -> Result<LanguageCode, McpError> {
        let code = code.unwrap_or(&self.config.default_language);
        self.cache.store().language(code).map_err(to_mcp_error)
    }

    fn session(&self, kind: AnalyzerKind) -> Result<MutexGuard<'_, AnalyzerSession>, McpError> {
        let busy = || HygieneError::Busy {
            analyzer: kind.to_string(),
        };
        let slot = self
            .sessions
            .get(&kind)
            .ok_or_else(|| McpError::internal_error(format!("no session for {kind}"), None))?;
        match slot.try_lock() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::Poisoned(poisoned)) => {
                tracing::warn!(analyzer = %kind, "session lock poisoned by a panicked call");
                let mut guard = poisoned.into_inner();
                guard.recover_interrupted();
                Ok(guard)
            }
            Err(TryLockError::WouldBlock) => {
                tracing::warn!(analyzer = %kind, "rejected call to busy analyzer");
                Err(to_mcp_error(busy()))
            }
        }
    }
}

fn to_mcp_error(err: HygieneError) -> McpError {
    let message = err.to_string();
    match err.kind() {
        ErrorKind::Validation => McpError::invalid_params(message, None),
        ErrorKind::State => McpError::invalid_request(message, None),
        ErrorKind::Load | ErrorKind::Save => McpError::internal_error(message, None),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))
}

#[tool_handler]
impl ServerHandler for DictionaryServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Scan a dictionary with scan_dictionary, stage a cleanup with \
                 preview_delete, then confirm_delete or cancel_delete.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}
