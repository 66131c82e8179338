//! Submit Turn use case — the Streaming Call Controller.
//!
//! Drives one conversation turn: records the user message, opens a stream
//! through the [`LlmGateway`], grows the assistant buffer increment by
//! increment and yields a [`Transcript`] after each one. Failed attempts are
//! handed to the [`Backoff`] controller and restarted from scratch.
//!
//! # Yield order
//!
//! Every yield before the last exposes the buffer only as a provisional tail.
//! The last yield is the committed history, after the reply has been appended
//! to the session and the stop flag cleared.
//!
//! # Cancellation
//!
//! The session's stop flag is polled once per received increment. When it is
//! set, that increment is dropped, no further reads happen, and whatever the
//! buffer holds is committed as the reply.

use crate::config::RetryPolicy;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{ChatRequest, LlmGateway};
use crate::use_cases::render_code::CodeRenderer;
use crate::use_cases::retry::{Backoff, RetryDecision, TurnFailure};
use chatstream_domain::util::log_preview;
use chatstream_domain::{GenerationParams, Session, StreamEvent, Transcript, assemble_turn};
use futures::Stream;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Input for the [`SubmitTurnUseCase`].
#[derive(Debug, Clone)]
pub struct SubmitTurnInput {
    /// The new user message.
    pub message: String,
    /// Model, temperature and output bound.
    pub params: GenerationParams,
    /// Text the reply is forced to start with; empty for none.
    pub prefill: String,
    /// System instruction; empty for none.
    pub system_prompt: String,
}

impl SubmitTurnInput {
    pub fn new(message: impl Into<String>, params: GenerationParams) -> Self {
        Self {
            message: message.into(),
            params,
            prefill: String::new(),
            system_prompt: String::new(),
        }
    }

    pub fn with_prefill(mut self, prefill: impl Into<String>) -> Self {
        self.prefill = prefill.into();
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }
}

/// How a turn ended.
#[derive(Debug, Clone, PartialEq)]
enum TurnOutcome {
    Completed(String),
    Cancelled(String),
    Failed(TurnFailure),
}

/// How one attempt ended.
enum AttemptOutcome {
    Finished(String),
    Cancelled(String),
    Failed(TurnFailure),
}

/// Owns the session for one turn.
///
/// If the turn is dropped before it commits, the unpaired user message is
/// rolled back. The stop flag is cleared on every exit path.
struct TurnGuard<'a> {
    session: &'a mut Session,
    committed: bool,
}

impl<'a> TurnGuard<'a> {
    /// Take over a session whose turn has just begun.
    fn new(session: &'a mut Session) -> Self {
        Self {
            session,
            committed: false,
        }
    }

    fn session(&self) -> &Session {
        self.session
    }

    fn commit(&mut self, reply: String) {
        if let Err(e) = self.session.commit_reply(reply) {
            warn!("Could not commit reply: {}", e);
        }
        self.committed = true;
        self.session.reset_stop();
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        if !self.committed && self.session.abandon_turn().is_some() {
            debug!(session = %self.session.id(), "Rolled back abandoned turn");
        }
        self.session.reset_stop();
    }
}

/// Use case for streaming one turn of a conversation.
#[derive(Clone)]
pub struct SubmitTurnUseCase {
    gateway: Arc<dyn LlmGateway>,
    renderer: Option<Arc<CodeRenderer>>,
    conversation_logger: Arc<dyn ConversationLogger>,
    retry_policy: RetryPolicy,
}

impl SubmitTurnUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            gateway,
            renderer: None,
            conversation_logger: Arc::new(NoConversationLogger),
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Render plot blocks in every yielded display copy.
    pub fn with_renderer(mut self, renderer: Arc<CodeRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    /// Stream one turn as a lazy sequence of transcripts.
    ///
    /// A whitespace-only message yields the current transcript once and
    /// leaves the session untouched.
    pub fn submit<'a>(
        &'a self,
        session: &'a mut Session,
        input: SubmitTurnInput,
    ) -> impl Stream<Item = Transcript> + Send + 'a {
        async_stream::stream! {
            let Some(request) = assemble_turn(
                session.pairs(),
                &input.message,
                &input.prefill,
                &input.system_prompt,
            ) else {
                debug!(session = %session.id(), "Ignoring empty message");
                yield self.display(session.transcript()).await;
                return;
            };

            info!(
                session = %session.id(),
                model = %input.params.model,
                "Submitting turn: {}",
                log_preview(&input.message, 100)
            );

            if let Err(e) = session.begin_turn(input.message.as_str()) {
                warn!("{}", e);
                yield self.display(session.transcript()).await;
                return;
            }
            let mut turn = TurnGuard::new(session);
            let session_id = turn.session().id().to_string();
            let stop = turn.session().stop_handle();
            let chat_request = ChatRequest::new(&request, &input.params);
            let mut backoff = Backoff::new(self.retry_policy);

            self.conversation_logger.log(ConversationEvent::new(
                "turn_started",
                serde_json::json!({
                    "session_id": session_id,
                    "model": input.params.model.to_string(),
                    "temperature": input.params.temperature(),
                    "max_tokens": input.params.max_tokens(),
                    "messages": chat_request.messages.len(),
                    "prefill": request.prefill().is_some(),
                    "text": input.message,
                }),
            ));

            let outcome = loop {
                let mut buffer = request.seed_buffer();

                let attempt = match self.gateway.open_stream(&chat_request).await {
                    Err(e) => AttemptOutcome::Failed(TurnFailure::from_gateway(&e)),
                    Ok(mut stream) => loop {
                        let next = stream.next().await;
                        if stop.is_stop_requested() {
                            break AttemptOutcome::Cancelled(buffer);
                        }
                        match next {
                            Some(Ok(StreamEvent::Delta(fragment))) => {
                                buffer.push_str(&fragment);
                                yield self.display(turn.session().transcript_with_tail(&buffer)).await;
                            }
                            Some(Ok(StreamEvent::Completed)) | None => {
                                break AttemptOutcome::Finished(buffer);
                            }
                            Some(Ok(StreamEvent::Overloaded)) => {
                                break AttemptOutcome::Failed(TurnFailure::Overloaded);
                            }
                            Some(Err(e)) => {
                                break AttemptOutcome::Failed(TurnFailure::from_gateway(&e));
                            }
                        }
                    },
                };

                let failure = match attempt {
                    AttemptOutcome::Finished(buffer) if !buffer.is_empty() => {
                        break TurnOutcome::Completed(buffer);
                    }
                    AttemptOutcome::Finished(_) => TurnFailure::EmptyResponse,
                    AttemptOutcome::Cancelled(buffer) => break TurnOutcome::Cancelled(buffer),
                    AttemptOutcome::Failed(failure) => failure,
                };

                match backoff.on_failure(&failure) {
                    RetryDecision::RetryAfter(delay) => {
                        warn!(
                            session = %session_id,
                            attempt = backoff.attempt() + 1,
                            max_attempts = self.retry_policy.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            "Attempt failed ({}), retrying: {:?}",
                            failure.kind(),
                            failure
                        );
                        self.conversation_logger.log(ConversationEvent::new(
                            "retry_scheduled",
                            serde_json::json!({
                                "session_id": session_id,
                                "attempt": backoff.attempt(),
                                "delay_ms": delay.as_millis() as u64,
                                "failure": failure.kind(),
                            }),
                        ));
                        tokio::time::sleep(delay).await;
                    }
                    RetryDecision::GiveUp => break TurnOutcome::Failed(failure),
                }
            };

            let attempts = backoff.attempt() + 1;
            let reply = match &outcome {
                TurnOutcome::Completed(text) => {
                    info!(session = %session_id, attempts, chars = text.len(), "Turn completed");
                    self.conversation_logger.log(ConversationEvent::new(
                        "turn_completed",
                        serde_json::json!({
                            "session_id": session_id,
                            "attempts": attempts,
                            "text": text,
                        }),
                    ));
                    text.clone()
                }
                TurnOutcome::Cancelled(text) => {
                    info!(session = %session_id, chars = text.len(), "Turn stopped by request");
                    self.conversation_logger.log(ConversationEvent::new(
                        "turn_cancelled",
                        serde_json::json!({
                            "session_id": session_id,
                            "text": text,
                        }),
                    ));
                    text.clone()
                }
                TurnOutcome::Failed(failure) => {
                    warn!(session = %session_id, attempts, "Turn failed: {:?}", failure);
                    self.conversation_logger.log(ConversationEvent::new(
                        "turn_failed",
                        serde_json::json!({
                            "session_id": session_id,
                            "attempts": attempts,
                            "failure": failure.kind(),
                        }),
                    ));
                    failure.committed_message()
                }
            };

            turn.commit(reply);
            yield self.display(turn.session().transcript()).await;
        }
    }

    /// Display copy of a transcript; session state is never touched.
    async fn display(&self, transcript: Transcript) -> Transcript {
        let Some(renderer) = &self.renderer else {
            return transcript;
        };
        let mut rendered = Vec::with_capacity(transcript.assistant_messages.len());
        for message in &transcript.assistant_messages {
            rendered.push(renderer.render(message).await);
        }
        transcript.with_assistant_messages(rendered)
    }
}
