//! A single chat session: transcript plus the one-reply-at-a-time guard.
//!
//! Submitting is split in two so the state machine can be driven without a
//! runtime: [`ChatSession::begin`] records the user message and hands back a
//! [`PendingReply`] ticket, [`ChatSession::complete`] turns the ticket into
//! the assistant reply. [`ChatSession::dispatch`] and [`ChatSession::submit`]
//! run the same two steps with the configured reply delay in between.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use floatchat_core::ChatConfig;

use crate::dispatcher::ResponseDispatcher;
use crate::error::ChatError;
use crate::state::SessionState;
use crate::transcript::TranscriptStore;
use crate::types::{Message, MessageId, Sender};

/// Ticket for a reply that has been promised but not yet appended.
///
/// Not `Clone`: each accepted submission completes exactly once.
#[derive(Debug)]
#[must_use = "a pending reply leaves the session busy until it is completed"]
pub struct PendingReply {
    session_id: Uuid,
    user_message: Message,
}

impl PendingReply {
    /// The user message this reply answers.
    pub fn user_message(&self) -> &Message {
        &self.user_message
    }

    pub fn message_id(&self) -> MessageId {
        self.user_message.id
    }
}

/// An accepted submission whose reply is being produced in the background.
#[derive(Debug)]
pub struct Submission {
    pub user_message: Message,
    pub reply: JoinHandle<Result<Message, ChatError>>,
}

#[derive(Debug, Default)]
struct SessionInner {
    transcript: TranscriptStore,
    state: SessionState,
    pending: Option<MessageId>,
}

impl SessionInner {
    fn transition(&mut self, target: SessionState) -> Result<(), ChatError> {
        if !self.state.can_transition_to(&target) {
            return Err(ChatError::InvalidTransition {
                from: self.state,
                to: target,
            });
        }
        tracing::debug!("Chat session state: {} -> {}", self.state, target);
        self.state = target;
        Ok(())
    }
}

/// One conversation with its own transcript. Sessions share nothing.
#[derive(Debug)]
pub struct ChatSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    dispatcher: ResponseDispatcher,
    reply_delay: Duration,
    inner: Mutex<SessionInner>,
}

impl ChatSession {
    /// Create a session with an empty transcript.
    pub fn new(dispatcher: ResponseDispatcher, reply_delay: Duration) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            dispatcher,
            reply_delay,
            inner: Mutex::new(SessionInner::default()),
        };
        tracing::info!(session_id = %session.id, "Chat session created");
        session
    }

    /// Create a session whose transcript opens with an assistant greeting.
    pub fn with_greeting(
        dispatcher: ResponseDispatcher,
        reply_delay: Duration,
        greeting: &str,
    ) -> Self {
        let mut inner = SessionInner::default();
        inner.transcript.append(Sender::Assistant, greeting);
        Self {
            inner: Mutex::new(inner),
            ..Self::new(dispatcher, reply_delay)
        }
    }

    /// Create a session from the `[chat]` configuration section.
    ///
    /// A missing or blank greeting yields an empty transcript.
    pub fn from_config(dispatcher: ResponseDispatcher, config: &ChatConfig) -> Self {
        let delay = Duration::from_millis(config.reply_delay_ms);
        match config.greeting.as_deref().map(str::trim) {
            Some(greeting) if !greeting.is_empty() => {
                Self::with_greeting(dispatcher, delay, greeting)
            }
            _ => Self::new(dispatcher, delay),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn reply_delay(&self) -> Duration {
        self.reply_delay
    }

    pub fn dispatcher(&self) -> &ResponseDispatcher {
        &self.dispatcher
    }

    /// Current submission state.
    pub fn state(&self) -> SessionState {
        self.read().state
    }

    /// True from an accepted submission until its reply is appended.
    pub fn is_awaiting_response(&self) -> bool {
        self.state() == SessionState::AwaitingResponse
    }

    /// Snapshot of the transcript in insertion order.
    pub fn transcript(&self) -> Vec<Message> {
        self.read().transcript.snapshot()
    }

    /// State and transcript read under one lock, so they always agree.
    pub fn snapshot(&self) -> (SessionState, Vec<Message>) {
        let inner = self.read();
        (inner.state, inner.transcript.snapshot())
    }

    pub fn message_count(&self) -> usize {
        self.read().transcript.len()
    }

    /// Record a user submission.
    ///
    /// Blank input is ignored: `Ok(None)`, nothing appended, state unchanged.
    /// While a reply is pending every other submission is rejected with
    /// [`ChatError::ReplyPending`]; submissions are never queued.
    pub fn begin(&self, text: &str) -> Result<Option<PendingReply>, ChatError> {
        if text.trim().is_empty() {
            tracing::debug!(session_id = %self.id, "Ignoring blank submission");
            return Ok(None);
        }

        let mut inner = self.write()?;
        if inner.state == SessionState::AwaitingResponse {
            tracing::warn!(session_id = %self.id, "Submission rejected: reply pending");
            return Err(ChatError::ReplyPending);
        }

        inner.transition(SessionState::AwaitingResponse)?;
        let user_message = inner.transcript.append(Sender::User, text);
        inner.pending = Some(user_message.id);

        Ok(Some(PendingReply {
            session_id: self.id,
            user_message,
        }))
    }

    /// Append the assistant reply for `ticket` and return to `Idle`.
    pub fn complete(&self, ticket: PendingReply) -> Result<Message, ChatError> {
        let mut inner = self.write()?;
        if ticket.session_id != self.id || inner.pending != Some(ticket.message_id()) {
            return Err(ChatError::StaleReply(ticket.message_id()));
        }

        let utterance = &ticket.user_message.text;
        let topic = self.dispatcher.classify(utterance);
        let reply = self.dispatcher.respond(utterance);

        inner.transition(SessionState::Idle)?;
        inner.pending = None;
        let message = inner.transcript.append(Sender::Assistant, reply);

        tracing::debug!(
            session_id = %self.id,
            topic = ?topic,
            message_id = %message.id,
            "Assistant reply appended"
        );
        Ok(message)
    }

    /// Accept `text` and produce the reply on a background task.
    ///
    /// The reply task owns a handle to the session, so dropping the returned
    /// [`Submission`] does not cancel it: an accepted submission always
    /// completes. Must be called from within a Tokio runtime.
    pub fn dispatch(self: &Arc<Self>, text: &str) -> Result<Option<Submission>, ChatError> {
        let Some(ticket) = self.begin(text)? else {
            return Ok(None);
        };

        let user_message = ticket.user_message().clone();
        let session = Arc::clone(self);
        let reply = tokio::spawn(async move {
            if !session.reply_delay.is_zero() {
                tokio::time::sleep(session.reply_delay).await;
            }
            session.complete(ticket)
        });

        Ok(Some(Submission {
            user_message,
            reply,
        }))
    }

    /// Submit `text` and wait for the assistant reply.
    ///
    /// Returns `Ok(None)` for blank input.
    pub async fn submit(self: &Arc<Self>, text: &str) -> Result<Option<Message>, ChatError> {
        let Some(submission) = self.dispatch(text)? else {
            return Ok(None);
        };
        let reply = submission
            .reply
            .await
            .map_err(|e| ChatError::ReplyTask(e.to_string()))??;
        Ok(Some(reply))
    }

    // -- Private helpers --

    fn write(&self) -> Result<MutexGuard<'_, SessionInner>, ChatError> {
        self.inner
            .lock()
            .map_err(|e| ChatError::LockPoisoned(e.to_string()))
    }

    /// Readers recover from poisoning: the log is append-only, so whatever
    /// was written before a panic is still a valid prefix.
    fn read(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::{
        BGC_RESPONSE, DEFAULT_RESPONSE, SALINITY_RESPONSE, TEMPERATURE_RESPONSE,
    };
    use crate::types::{Topic, TopicRule};
    use floatchat_core::config::DEFAULT_GREETING;

    fn session() -> ChatSession {
        ChatSession::new(ResponseDispatcher::default(), Duration::ZERO)
    }

    fn shared(delay_ms: u64) -> Arc<ChatSession> {
        Arc::new(ChatSession::new(
            ResponseDispatcher::default(),
            Duration::from_millis(delay_ms),
        ))
    }

    // ---- Construction ----

    #[test]
    fn test_new_session_idle_and_empty() {
        let s = session();
        assert_eq!(s.state(), SessionState::Idle);
        assert!(!s.is_awaiting_response());
        assert!(s.transcript().is_empty());
    }

    #[test]
    fn test_with_greeting_seeds_assistant_message() {
        let s = ChatSession::with_greeting(ResponseDispatcher::default(), Duration::ZERO, "Hi!");
        let t = s.transcript();
        assert_eq!(t.len(), 1);
        assert_eq!(t[0].sender, Sender::Assistant);
        assert_eq!(t[0].text, "Hi!");
        assert!(!s.is_awaiting_response());
    }

    #[test]
    fn test_from_config_default_greets() {
        let s = ChatSession::from_config(ResponseDispatcher::default(), &ChatConfig::default());
        assert_eq!(s.transcript()[0].text, DEFAULT_GREETING);
        assert_eq!(s.reply_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn test_from_config_blank_greeting_starts_empty() {
        let config = ChatConfig {
            greeting: Some("   ".to_string()),
            reply_delay_ms: 0,
            ..ChatConfig::default()
        };
        let s = ChatSession::from_config(ResponseDispatcher::default(), &config);
        assert!(s.transcript().is_empty());

        let config = ChatConfig {
            greeting: None,
            ..ChatConfig::default()
        };
        let s = ChatSession::from_config(ResponseDispatcher::default(), &config);
        assert!(s.transcript().is_empty());
    }

    #[test]
    fn test_sessions_get_distinct_ids() {
        assert_ne!(session().id(), session().id());
    }

    // ---- Blank submissions ----

    #[test]
    fn test_whitespace_submission_is_noop() {
        let s = session();
        assert!(s.begin("   \t\n").unwrap().is_none());
        assert!(s.begin("").unwrap().is_none());
        assert!(s.transcript().is_empty());
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn test_whitespace_while_pending_is_noop() {
        let s = session();
        let _ticket = s.begin("salinity").unwrap().unwrap();
        assert!(s.begin("  ").unwrap().is_none());
        assert_eq!(s.message_count(), 1);
        assert!(s.is_awaiting_response());
    }

    // ---- Two-step protocol ----

    #[test]
    fn test_end_to_end_exchange() {
        let s = session();
        let ticket = s.begin("Show temperature").unwrap().unwrap();
        assert_eq!(s.message_count(), 1);
        assert_eq!(s.state(), SessionState::AwaitingResponse);

        let reply = s.complete(ticket).unwrap();
        let t = s.transcript();
        assert_eq!(t.len(), 2);
        assert_eq!(t[1].sender, Sender::Assistant);
        assert_eq!(t[1].text, TEMPERATURE_RESPONSE);
        assert_eq!(reply, t[1]);
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn test_user_text_stored_as_submitted() {
        let s = session();
        let ticket = s.begin("  salinity?  ").unwrap().unwrap();
        assert_eq!(ticket.user_message().text, "  salinity?  ");
        assert_eq!(ticket.user_message().sender, Sender::User);
        s.complete(ticket).unwrap();
    }

    #[test]
    fn test_submission_rejected_while_pending() {
        let s = session();
        let ticket = s.begin("salinity").unwrap().unwrap();
        let err = s.begin("temperature").unwrap_err();
        assert!(matches!(err, ChatError::ReplyPending));
        assert_eq!(s.message_count(), 1);

        s.complete(ticket).unwrap();
        assert!(s.begin("temperature").unwrap().is_some());
    }

    #[test]
    fn test_reply_follows_its_question() {
        let s = session();
        for text in ["salinity", "What about chlorophyll levels?", "hello there"] {
            let ticket = s.begin(text).unwrap().unwrap();
            s.complete(ticket).unwrap();
        }
        let t = s.transcript();
        assert_eq!(t.len(), 6);
        assert_eq!(t[1].text, SALINITY_RESPONSE);
        assert_eq!(t[3].text, BGC_RESPONSE);
        assert_eq!(t[5].text, DEFAULT_RESPONSE);
        for pair in t.chunks(2) {
            assert_eq!(pair[0].sender, Sender::User);
            assert_eq!(pair[1].sender, Sender::Assistant);
            assert!(pair[0].id < pair[1].id);
        }
    }

    #[test]
    fn test_blank_custom_responses_never_append_empty_reply() {
        let rules = vec![TopicRule::new(Topic::Depth, &["deep"], "")];
        let s = ChatSession::new(ResponseDispatcher::new(rules, ""), Duration::ZERO);

        for text in ["hello", "deep water"] {
            let ticket = s.begin(text).unwrap().unwrap();
            let reply = s.complete(ticket).unwrap();
            assert_eq!(reply.text, DEFAULT_RESPONSE);
        }
        assert!(s.transcript().iter().all(|m| !m.text.is_empty()));
    }

    #[test]
    fn test_ticket_from_other_session_is_stale() {
        let a = session();
        let b = session();
        let ticket_a = a.begin("salinity").unwrap().unwrap();
        let _ticket_b = b.begin("salinity").unwrap().unwrap();

        let err = b.complete(ticket_a).unwrap_err();
        assert!(matches!(err, ChatError::StaleReply(_)));
        assert!(b.is_awaiting_response());
        assert!(a.is_awaiting_response());
    }

    #[test]
    fn test_snapshot_consistent_with_state() {
        let s = session();
        let ticket = s.begin("near").unwrap().unwrap();
        let (state, transcript) = s.snapshot();
        assert_eq!(state, SessionState::AwaitingResponse);
        assert_eq!(transcript.last().unwrap().sender, Sender::User);

        s.complete(ticket).unwrap();
        let (state, transcript) = s.snapshot();
        assert_eq!(state, SessionState::Idle);
        assert_eq!(transcript.last().unwrap().sender, Sender::Assistant);
    }

    #[test]
    fn test_transcript_read_idempotent() {
        let s = session();
        let ticket = s.begin("depth").unwrap().unwrap();
        s.complete(ticket).unwrap();
        assert_eq!(s.transcript(), s.transcript());
    }

    // ---- Async submission ----

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_waits_for_delay() {
        let s = shared(1500);
        let submission = s.dispatch("Show temperature").unwrap().unwrap();
        assert_eq!(submission.user_message.text, "Show temperature");
        assert!(s.is_awaiting_response());
        assert_eq!(s.message_count(), 1);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(s.is_awaiting_response());

        let reply = submission.reply.await.unwrap().unwrap();
        assert_eq!(reply.text, TEMPERATURE_RESPONSE);
        assert!(!s.is_awaiting_response());
        assert_eq!(s.message_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_returns_reply() {
        let s = shared(1500);
        let reply = s.submit("SALINITY near the equator").await.unwrap().unwrap();
        assert_eq!(reply.text, SALINITY_RESPONSE);
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_submit_blank_returns_none() {
        let s = shared(0);
        assert!(s.submit(" ").await.unwrap().is_none());
        assert!(s.transcript().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_rejected_while_pending() {
        let s = shared(1500);
        let first = s.dispatch("salinity").unwrap().unwrap();
        let err = s.dispatch("temperature").unwrap_err();
        assert!(matches!(err, ChatError::ReplyPending));
        first.reply.await.unwrap().unwrap();
        assert_eq!(s.message_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_submission_still_completes() {
        let s = shared(1500);
        let submission = s.dispatch("export").unwrap().unwrap();
        drop(submission);
        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert!(!s.is_awaiting_response());
        assert_eq!(s.message_count(), 2);
    }
}
