//! LSP Backend implementation

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::config::Config;
use crate::document::Document;
use crate::edits::double_newlines_edit;
use crate::error::DocumentError;

/// Command that doubles the newlines of the document given as its argument
pub const DOUBLE_NEWLINES_COMMAND: &str = "newlineDoubler.doubleNewlines";

/// Code action kind offered for the same transformation
pub const DOUBLE_NEWLINES_KIND: &str = "source.doubleNewlines";

/// The LSP backend that handles all language server requests
pub struct Backend {
    /// The LSP client for sending requests and notifications
    client: Client,
    /// Map of document URIs to their state
    documents: Arc<RwLock<HashMap<Url, Document>>>,
    /// Configuration resolved during initialize
    config: Arc<RwLock<Config>>,
}

impl Backend {
    /// Create a new backend instance
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(RwLock::new(HashMap::new())),
            config: Arc::new(RwLock::new(Config::default())),
        }
    }

    /// Build the doubling edit for an open document
    async fn edit_for(&self, uri: &Url) -> std::result::Result<Option<WorkspaceEdit>, DocumentError> {
        let document = {
            let docs = self.documents.read().await;
            docs.get(uri)
                .cloned()
                .ok_or_else(|| DocumentError::UnknownDocument(uri.clone()))?
        };
        let policy = self.config.read().await.line_endings;

        double_newlines_edit(uri, &document, policy)
    }

    /// Run the double-newlines command against `uri`
    async fn double_newlines(&self, uri: Url) -> Result<()> {
        let edit = match self.edit_for(&uri).await {
            Ok(Some(edit)) => edit,
            Ok(None) => {
                tracing::debug!("No newlines to double in {}", uri);
                return Ok(());
            }
            Err(err) => {
                tracing::warn!("Cannot double newlines: {}", err);
                return Err(Error::invalid_params(err.to_string()));
            }
        };

        let response = self.client.apply_edit(edit).await?;
        if response.applied {
            tracing::info!("Doubled newlines in {}", uri);
        } else {
            let reason = response
                .failure_reason
                .unwrap_or_else(|| "no reason given".to_string());
            tracing::warn!("Client rejected edit for {}: {}", uri, reason);
        }

        Ok(())
    }
}

/// First workspace folder as a filesystem path, else the legacy `rootUri`
#[allow(deprecated)]
fn workspace_root(params: &InitializeParams) -> Option<std::path::PathBuf> {
    params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .map(|folder| &folder.uri)
        .or(params.root_uri.as_ref())
        .and_then(|uri| uri.to_file_path().ok())
}

/// Extract the target document URI from command arguments
fn command_uri(arguments: Vec<Value>) -> Result<Url> {
    let value = arguments
        .into_iter()
        .next()
        .ok_or_else(|| Error::invalid_params("expected a document URI argument"))?;

    serde_json::from_value(value)
        .map_err(|err| Error::invalid_params(format!("invalid document URI: {}", err)))
}

/// Whether a client's `only` filter admits our code action kind
fn kind_requested(only: Option<&[CodeActionKind]>) -> bool {
    let Some(only) = only else {
        return true;
    };
    only.iter().any(|kind| {
        let kind = kind.as_str();
        DOUBLE_NEWLINES_KIND == kind
            || DOUBLE_NEWLINES_KIND
                .strip_prefix(kind)
                .is_some_and(|rest| rest.starts_with('.'))
    })
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let root = workspace_root(&params);
        let config = Config::resolve(root.as_deref(), params.initialization_options);
        tracing::debug!("Effective config: {:?}", config);
        *self.config.write().await = config;

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![DOUBLE_NEWLINES_COMMAND.to_string()],
                    work_done_progress_options: Default::default(),
                }),
                code_action_provider: Some(CodeActionProviderCapability::Options(
                    CodeActionOptions {
                        code_action_kinds: Some(vec![CodeActionKind::new(DOUBLE_NEWLINES_KIND)]),
                        work_done_progress_options: Default::default(),
                        resolve_provider: None,
                    },
                )),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "newline-doubler".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        tracing::info!("Server initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("Server shutting down");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        tracing::debug!("Document opened: {}", uri);

        let mut docs = self.documents.write().await;
        docs.insert(
            uri,
            Document::new(params.text_document.text, params.text_document.version),
        );
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        // Get the full text from the changes (we use FULL sync)
        if let Some(change) = params.content_changes.into_iter().next() {
            tracing::debug!("Document changed: {}", uri);

            let mut docs = self.documents.write().await;
            docs.insert(uri, Document::new(change.text, version));
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        tracing::debug!("Document closed: {}", uri);

        let mut docs = self.documents.write().await;
        docs.remove(&uri);
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        if params.command != DOUBLE_NEWLINES_COMMAND {
            return Err(Error::invalid_params(format!(
                "unknown command: {}",
                params.command
            )));
        }

        let uri = command_uri(params.arguments)?;
        self.double_newlines(uri).await?;

        Ok(None)
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        if !kind_requested(params.context.only.as_deref()) {
            return Ok(None);
        }

        let uri = params.text_document.uri;
        let edit = match self.edit_for(&uri).await {
            Ok(Some(edit)) => edit,
            Ok(None) => return Ok(None),
            Err(err) => {
                tracing::debug!("No code action for {}: {}", uri, err);
                return Ok(None);
            }
        };

        let action = CodeAction {
            title: "Double newlines".to_string(),
            kind: Some(CodeActionKind::new(DOUBLE_NEWLINES_KIND)),
            edit: Some(edit),
            ..Default::default()
        };

        Ok(Some(vec![CodeActionOrCommand::CodeAction(action)]))
    }
}
