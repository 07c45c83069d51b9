//! Request handling around an external chat model.
//!
//! [`ChatService`] ties the pipeline together: compose the prompt, hand it to
//! a [`ChatModel`], and record the exchange in session memory once a reply
//! exists. The model itself is an outbound collaborator supplied by the
//! caller.

use crate::config::RagConfig;
use crate::core::{ChatMessage, Speaker, Turn};
use crate::document::DocumentStore;
use crate::error::ModelError;
use crate::memory::SessionMemory;
use crate::prompt::{ComposedPrompt, Mode, PromptComposer};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Reply returned to the user when the model call fails.
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// Turns a composed message sequence into a reply.
pub trait ChatModel: Send + Sync {
    /// Produces the assistant reply for `messages`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] when no reply could be produced.
    fn complete(&self, messages: &[ChatMessage]) -> std::result::Result<String, ModelError>;
}

impl<F> ChatModel for F
where
    F: Fn(&[ChatMessage]) -> std::result::Result<String, ModelError> + Send + Sync,
{
    fn complete(&self, messages: &[ChatMessage]) -> std::result::Result<String, ModelError> {
        self(messages)
    }
}

/// One inbound chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
    /// Grounded or open answering.
    #[serde(default)]
    pub mode: Mode,
    /// Conversation the message belongs to. `None` means the service's
    /// configured default session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ChatRequest {
    /// Creates a grounded request in the default session.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            mode: Mode::default(),
            session_id: None,
        }
    }

    /// Sets the mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the session id.
    #[must_use]
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// Outcome of [`ChatService::respond`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Model reply, or [`FALLBACK_REPLY`] on failure.
    pub reply: String,
    /// Excerpts the reply was grounded on.
    pub sources: Vec<String>,
    /// Model failure description, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    /// Whether the model call succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Owns the document store and session memory for one assistant.
///
/// # Examples
///
/// ```
/// use ragchat::chat::{ChatRequest, ChatService};
/// use ragchat::config::RagConfig;
/// use ragchat::core::ChatMessage;
/// use ragchat::document::DocumentStore;
/// use ragchat::error::ModelError;
///
/// let documents = DocumentStore::from_text("handbook", "Parking passes are free.", 800).unwrap();
/// let model = |messages: &[ChatMessage]| -> Result<String, ModelError> {
///     Ok(format!("saw {} messages", messages.len()))
/// };
/// let service = ChatService::new(documents, Box::new(model), RagConfig::default());
///
/// let response = service.respond(&ChatRequest::new("Are parking passes free?"));
/// assert_eq!(response.reply, "saw 2 messages");
/// assert_eq!(response.sources, ["Parking passes are free."]);
/// assert_eq!(service.memory().history("default").len(), 2);
/// ```
pub struct ChatService {
    documents: DocumentStore,
    memory: SessionMemory,
    model: Box<dyn ChatModel>,
    config: RagConfig,
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("documents", &self.documents)
            .field("sessions", &self.memory.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ChatService {
    /// Creates a service with empty session memory.
    #[must_use]
    pub fn new(documents: DocumentStore, model: Box<dyn ChatModel>, config: RagConfig) -> Self {
        Self::with_memory(documents, SessionMemory::new(), model, config)
    }

    /// Creates a service over existing (e.g. hydrated) session memory.
    #[must_use]
    pub fn with_memory(
        documents: DocumentStore,
        memory: SessionMemory,
        model: Box<dyn ChatModel>,
        config: RagConfig,
    ) -> Self {
        Self {
            documents,
            memory,
            model,
            config,
        }
    }

    /// Returns the document store.
    #[must_use]
    pub const fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// Returns the session memory.
    #[must_use]
    pub const fn memory(&self) -> &SessionMemory {
        &self.memory
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Returns a composer borrowing this service's state.
    #[must_use]
    pub const fn composer(&self) -> PromptComposer<'_> {
        PromptComposer::new(&self.documents, &self.memory, &self.config)
    }

    /// Composes the prompt for a message without calling the model.
    #[must_use]
    pub fn compose(&self, mode: Mode, session_id: &str, user_message: &str) -> ComposedPrompt {
        self.composer().compose(mode, session_id, user_message)
    }

    /// Appends a turn to a session.
    pub fn record_turn(&self, session_id: &str, speaker: Speaker, content: impl Into<String>) {
        self.memory.record_turn(session_id, speaker, content);
    }

    /// Resolves the session a request belongs to.
    #[must_use]
    pub fn session_for<'a>(&'a self, request: &'a ChatRequest) -> &'a str {
        request
            .session_id
            .as_deref()
            .unwrap_or(&self.config.default_session)
    }

    /// Answers one request.
    ///
    /// On success the user message and then the reply are appended to the
    /// session. On failure the session is left untouched and the response
    /// carries [`FALLBACK_REPLY`] plus the error text.
    pub fn respond(&self, request: &ChatRequest) -> ChatResponse {
        let session_id = self.session_for(request);
        let ComposedPrompt { messages, sources } =
            self.compose(request.mode, session_id, &request.message);

        let outcome = self.model.complete(&messages).and_then(|reply| {
            if reply.trim().is_empty() {
                Err(ModelError::EmptyReply)
            } else {
                Ok(reply)
            }
        });

        match outcome {
            Ok(reply) => {
                self.memory
                    .append(session_id, Turn::user(request.message.as_str()));
                self.memory
                    .append(session_id, Turn::assistant(reply.as_str()));
                debug!(
                    session_id = %session_id,
                    sources = sources.len(),
                    "recorded exchange"
                );
                ChatResponse {
                    reply,
                    sources,
                    error: None,
                }
            }
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "model call failed");
                ChatResponse {
                    reply: FALLBACK_REPLY.to_string(),
                    sources: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Role;
    use crate::prompt::OPEN_SYSTEM_PROMPT;
    use std::sync::{Arc, Mutex};

    const HANDBOOK: &str = "Vacation days accrue monthly for every employee. \
        The cafeteria opens at eight.";

    /// Records every prompt it sees and answers with a fixed reply.
    #[derive(Clone)]
    struct RecordingModel {
        reply: std::result::Result<String, ModelError>,
        seen: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
    }

    impl RecordingModel {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Arc::default(),
            }
        }

        fn failing(error: ModelError) -> Self {
            Self {
                reply: Err(error),
                seen: Arc::default(),
            }
        }
    }

    impl ChatModel for RecordingModel {
        fn complete(&self, messages: &[ChatMessage]) -> std::result::Result<String, ModelError> {
            self.seen.lock().unwrap().push(messages.to_vec());
            self.reply.clone()
        }
    }

    fn service(model: RecordingModel) -> ChatService {
        let config = RagConfig::default().with_chunk_size(50);
        let documents = DocumentStore::from_text("handbook", HANDBOOK, config.chunk_size).unwrap();
        ChatService::new(documents, Box::new(model), config)
    }

    #[test]
    fn test_success_appends_user_then_assistant() {
        let model = RecordingModel::replying("You accrue days monthly.");
        let service = service(model);

        let response = service.respond(&ChatRequest::new("How do vacation days accrue?"));
        assert!(response.is_success());
        assert_eq!(response.reply, "You accrue days monthly.");
        assert!(!response.sources.is_empty());
        assert_eq!(
            service.memory().history("default"),
            vec![
                Turn::user("How do vacation days accrue?"),
                Turn::assistant("You accrue days monthly."),
            ]
        );
    }

    #[test]
    fn test_failure_leaves_memory_untouched() {
        let model = RecordingModel::failing(ModelError::Failed("timeout".to_string()));
        let service = service(model);
        service.record_turn("s", Speaker::User, "earlier");

        let response = service.respond(&ChatRequest::new("vacation").with_session("s"));
        assert_eq!(response.reply, FALLBACK_REPLY);
        assert_eq!(response.error.as_deref(), Some("model call failed: timeout"));
        assert!(response.sources.is_empty());
        assert_eq!(service.memory().history("s"), vec![Turn::user("earlier")]);
    }

    #[test]
    fn test_blank_reply_is_a_failure() {
        let model = RecordingModel::replying("   ");
        let service = service(model);

        let response = service.respond(&ChatRequest::new("vacation"));
        assert_eq!(response.reply, FALLBACK_REPLY);
        assert_eq!(
            response.error.as_deref(),
            Some("model returned an empty reply")
        );
        assert!(service.memory().history("default").is_empty());
    }

    #[test]
    fn test_model_sees_history_on_second_request() {
        let model = RecordingModel::replying("ok");
        let service = service(model.clone());

        let _ = service.respond(&ChatRequest::new("first").with_mode(Mode::Open));
        let _ = service.respond(&ChatRequest::new("second").with_mode(Mode::Open));

        let seen = model.seen.lock().unwrap();
        let second = &seen[1];
        let roles: Vec<Role> = second.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            [Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(second[0].content, OPEN_SYSTEM_PROMPT);
        assert_eq!(second[3].content, "second");
    }

    #[test]
    fn test_open_mode_returns_no_sources() {
        let model = RecordingModel::replying("hi");
        let service = service(model);

        let response =
            service.respond(&ChatRequest::new("vacation cafeteria").with_mode(Mode::Open));
        assert!(response.sources.is_empty());
    }

    #[test]
    fn test_closure_model() {
        let documents = DocumentStore::from_text("doc", "text", 800).unwrap();
        let model = |_: &[ChatMessage]| -> std::result::Result<String, ModelError> {
            Ok("closure".to_string())
        };
        let service = ChatService::new(documents, Box::new(model), RagConfig::default());
        assert_eq!(service.respond(&ChatRequest::new("hello")).reply, "closure");
    }

    #[test]
    fn test_request_json_defaults() {
        let request: ChatRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert_eq!(request.mode, Mode::Grounded);
        assert_eq!(request.session_id, None);

        let request: ChatRequest =
            serde_json::from_str(r#"{"message": "hi", "mode": "open", "session_id": "x"}"#)
                .unwrap();
        assert_eq!(request.mode, Mode::Open);
        assert_eq!(request.session_id.as_deref(), Some("x"));
    }

    #[test]
    fn test_unnamed_session_uses_configured_default() {
        let documents = DocumentStore::from_text("handbook", HANDBOOK, 50).unwrap();
        let config = RagConfig::default()
            .with_chunk_size(50)
            .with_default_session("main");
        let service = ChatService::new(
            documents,
            Box::new(RecordingModel::replying("Hi.")),
            config,
        );

        let response = service.respond(&ChatRequest::new("hello"));
        assert!(response.is_success());
        assert_eq!(service.memory().history("main").len(), 2);
        assert!(service.memory().history("default").is_empty());

        service.respond(&ChatRequest::new("again").with_session("other"));
        assert_eq!(service.memory().history("other").len(), 2);
        assert_eq!(service.memory().history("main").len(), 2);
    }

    #[test]
    fn test_response_json_omits_missing_error() {
        let response = ChatResponse {
            reply: "ok".to_string(),
            sources: vec![],
            error: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("error"));
    }
}
