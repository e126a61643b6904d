//! The dialogue controller.
//!
//! `ChatEngine` orchestrates the intent matcher, response selector,
//! conversation session, proactive timers, and speech ports. It is an
//! explicit instance owned by the hosting application (no ambient globals);
//! clones share the same underlying state.
//!
//! Its only output is the ordered sequence of [`Message`] records exposed by
//! [`ChatEngine::transcript`]; presentation belongs to the host.

use crate::config::EngineConfig;
use crate::intent::{Intent, IntentMatcher, PricingTier, ServiceKind};
use crate::proactive::{self, ProactiveRule};
use crate::response::{
    HANDOFF_CONNECTING, HANDOFF_HUMAN_GREETING, HANDOFF_OFFLINE, ResponseCatalog, ResponseKey,
    ResponseSelector, VOICE_RETRY, VOICE_UNSUPPORTED,
};
use crate::session::{Message, SessionService, UserPreferences};
use crate::speech::{SpeechRecognizer, SpeechSynthesizer, Utterance, VoiceCapture};
use crate::storage::KeyValueStore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Dialogue controller states.
///
/// `Responded` is a momentary state between appending the bot message and
/// returning to `Idle`; observers will mostly see `Idle`, `Listening`, and
/// `Thinking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Listening,
    Thinking,
    Responded,
}

/// One user submission, carrying the anti-spam honeypot field.
///
/// The honeypot is a form field invisible to humans; automated abuse fills
/// it, and such submissions are dropped without any visible effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub text: String,
    pub honeypot: Option<String>,
}

impl Submission {
    /// A plain text submission with an empty honeypot.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            honeypot: None,
        }
    }
}

/// Quick-action shortcuts surfaced as buttons in the widget.
///
/// Each injects its canned user utterance and runs the normal reply
/// pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    Pricing,
    Services,
    Portfolio,
    Meeting,
}

impl QuickAction {
    /// The canned user utterance for this shortcut.
    pub fn user_text(&self) -> &'static str {
        match self {
            QuickAction::Pricing => "I'd like to know about your pricing",
            QuickAction::Services => "What services do you offer?",
            QuickAction::Portfolio => "Can I see your portfolio?",
            QuickAction::Meeting => "I'd like to schedule a meeting",
        }
    }
}

struct EngineInner {
    config: EngineConfig,
    matcher: IntentMatcher,
    catalog: ResponseCatalog,
    selector: Mutex<ResponseSelector>,
    delay_rng: Mutex<StdRng>,
    session: RwLock<SessionService>,
    preferences: std::sync::RwLock<UserPreferences>,
    state: Mutex<EngineState>,
    widget_open: AtomicBool,
    pending_proactive: Mutex<Option<String>>,
    recent_submissions: Mutex<VecDeque<Instant>>,
    route: Mutex<String>,
    started_at: Instant,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
}

/// Builds a [`ChatEngine`].
pub struct EngineBuilder {
    store: Arc<dyn KeyValueStore>,
    config: EngineConfig,
    rules: Vec<ProactiveRule>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    rng_seed: Option<u64>,
}

impl EngineBuilder {
    fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            config: EngineConfig::default(),
            rules: proactive::default_rules(),
            synthesizer: None,
            recognizer: None,
            rng_seed: None,
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the default proactive rule set.
    pub fn proactive_rules(mut self, rules: Vec<ProactiveRule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn recognizer(mut self, recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    /// Seeds the random sources, for deterministic tests.
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Constructs the engine: counts the visit, restores the transcript,
    /// loads preferences, and arms the proactive timers.
    pub async fn start(self) -> ChatEngine {
        let mut session = SessionService::with_capacity(self.store, self.config.history_cap);
        session.increment_visit().await;
        session
            .restore(self.config.replay_count, self.config.restore_window_hours)
            .await;
        let preferences = session.load_preferences().await;

        let selector = match self.rng_seed {
            Some(seed) => ResponseSelector::with_seed(seed),
            None => ResponseSelector::new(),
        };
        let delay_rng = match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };

        let engine = ChatEngine {
            inner: Arc::new(EngineInner {
                config: self.config,
                matcher: IntentMatcher::new(),
                catalog: ResponseCatalog::new(),
                selector: Mutex::new(selector),
                delay_rng: Mutex::new(delay_rng),
                session: RwLock::new(session),
                preferences: std::sync::RwLock::new(preferences),
                state: Mutex::new(EngineState::Idle),
                widget_open: AtomicBool::new(false),
                pending_proactive: Mutex::new(None),
                recent_submissions: Mutex::new(VecDeque::new()),
                route: Mutex::new("#home".to_string()),
                started_at: Instant::now(),
                synthesizer: self.synthesizer,
                recognizer: self.recognizer,
            }),
        };

        for rule in self.rules {
            let armed = engine.clone();
            tokio::spawn(async move {
                tokio::time::sleep(rule.delay).await;
                armed.fire_proactive(rule).await;
            });
        }

        engine
    }
}

/// The conversational response engine.
#[derive(Clone)]
pub struct ChatEngine {
    inner: Arc<EngineInner>,
}

impl ChatEngine {
    /// Starts building an engine over the given store.
    pub fn builder(store: Arc<dyn KeyValueStore>) -> EngineBuilder {
        EngineBuilder::new(store)
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Handles one user submission.
    ///
    /// Empty input, a filled honeypot, and burst-rate violations are all
    /// dropped silently; a valid submission appends the user message and
    /// schedules the reply behind the synthetic thinking delay.
    pub async fn submit(&self, submission: Submission) {
        let text = submission.text.trim().to_string();
        if text.is_empty() {
            return;
        }
        if submission
            .honeypot
            .as_deref()
            .is_some_and(|h| !h.trim().is_empty())
        {
            tracing::debug!("dropping submission: honeypot filled");
            return;
        }
        if self.over_burst_limit() {
            tracing::debug!("dropping submission: burst limit exceeded");
            return;
        }

        self.inner
            .session
            .write()
            .await
            .append(Message::user(&text))
            .await;
        self.spawn_reply(text);
    }

    /// Runs a quick-action shortcut through the normal pipeline.
    pub async fn quick_action(&self, action: QuickAction) {
        let text = action.user_text();
        self.inner
            .session
            .write()
            .await
            .append(Message::user(text))
            .await;
        self.spawn_reply(text.to_string());
    }

    // ------------------------------------------------------------------
    // Widget lifecycle
    // ------------------------------------------------------------------

    /// Marks the widget open and delivers any pending proactive message.
    pub async fn open_widget(&self) {
        self.inner.widget_open.store(true, Ordering::SeqCst);
        let pending = self.inner.pending_proactive.lock().unwrap().take();
        if let Some(message) = pending {
            self.inner
                .session
                .write()
                .await
                .append(Message::bot(message))
                .await;
        }
    }

    /// Marks the widget closed.
    ///
    /// An in-flight reply is not cancelled; it lands in history silently and
    /// is visible on reopen.
    pub async fn close_widget(&self) {
        self.inner.widget_open.store(false, Ordering::SeqCst);
        if self.state() == EngineState::Listening {
            self.stop_listening().await;
        }
        self.inner.session.read().await.persist().await;
    }

    /// Updates the host page route (read-only navigation signal).
    pub fn set_route(&self, route: &str) {
        *self.inner.route.lock().unwrap() = route.to_string();
    }

    // ------------------------------------------------------------------
    // Human handoff
    // ------------------------------------------------------------------

    /// Requests a human operator.
    ///
    /// With an agent available this plays the connecting exchange; otherwise
    /// the offline fallback is appended immediately.
    pub async fn request_handoff(&self) {
        self.inner.session.write().await.request_handoff();
        if self.inner.config.agent_available {
            self.inner
                .session
                .write()
                .await
                .append(Message::bot(HANDOFF_CONNECTING))
                .await;
            let engine = self.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(3)).await;
                engine
                    .inner
                    .session
                    .write()
                    .await
                    .append(Message::bot(HANDOFF_HUMAN_GREETING))
                    .await;
            });
        } else {
            self.inner
                .session
                .write()
                .await
                .append(Message::bot(HANDOFF_OFFLINE))
                .await;
        }
    }

    // ------------------------------------------------------------------
    // Voice
    // ------------------------------------------------------------------

    /// Whether a speech recognizer is present (voice affordance visible).
    pub fn voice_available(&self) -> bool {
        self.inner.recognizer.is_some()
    }

    /// Begins a voice capture, if a recognizer is present.
    pub async fn start_listening(&self) {
        match &self.inner.recognizer {
            None => {
                self.inner
                    .session
                    .write()
                    .await
                    .append(Message::bot(VOICE_UNSUPPORTED))
                    .await;
            }
            Some(recognizer) => {
                self.set_state(EngineState::Listening);
                self.inner
                    .session
                    .write()
                    .await
                    .append(Message::transient_bot("🎤 Listening..."))
                    .await;
                recognizer.start();
            }
        }
    }

    /// Stops a voice capture and clears the listening affordance.
    pub async fn stop_listening(&self) {
        if let Some(recognizer) = &self.inner.recognizer {
            recognizer.stop();
        }
        self.inner
            .session
            .write()
            .await
            .session_mut()
            .pop_transient_tail();
        self.set_state(EngineState::Idle);
    }

    /// Handles a transcript from the speech-to-text provider.
    ///
    /// High-confidence transcripts are submitted as if typed; low-confidence
    /// ones get a confirmation prompt instead of auto-submitting.
    pub async fn on_voice_result(&self, capture: VoiceCapture) {
        self.inner
            .session
            .write()
            .await
            .session_mut()
            .pop_transient_tail();
        if capture.confidence >= self.inner.config.confidence_threshold {
            self.set_state(EngineState::Idle);
            self.submit(Submission::text(capture.transcript)).await;
        } else {
            let percent = (capture.confidence * 100.0).round() as u32;
            let message = format!(
                "I heard: \"{}\" ({percent}% confidence). Please confirm or retype.",
                capture.transcript
            );
            self.inner
                .session
                .write()
                .await
                .append(Message::bot(message))
                .await;
            self.set_state(EngineState::Idle);
        }
    }

    /// Handles a capture failure (denied permission, inaudible input).
    ///
    /// Recoverable by design: an apologetic bot message, back to `Idle`.
    pub async fn on_voice_error(&self) {
        let mut session = self.inner.session.write().await;
        session.session_mut().pop_transient_tail();
        session.append(Message::bot(VOICE_RETRY)).await;
        drop(session);
        self.set_state(EngineState::Idle);
    }

    // ------------------------------------------------------------------
    // Preferences
    // ------------------------------------------------------------------

    pub fn preferences(&self) -> UserPreferences {
        self.inner.preferences.read().unwrap().clone()
    }

    /// Updates and persists user preferences.
    pub async fn set_preferences(&self, preferences: UserPreferences) {
        *self.inner.preferences.write().unwrap() = preferences.clone();
        self.inner
            .session
            .read()
            .await
            .save_preferences(&preferences)
            .await;
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    /// The visible transcript, in order.
    pub async fn transcript(&self) -> Vec<Message> {
        self.inner.session.read().await.session().history.clone()
    }

    pub fn state(&self) -> EngineState {
        *self.inner.state.lock().unwrap()
    }

    pub async fn session_id(&self) -> String {
        self.inner.session.read().await.session().session_id.clone()
    }

    pub async fn visit_count(&self) -> u64 {
        self.inner.session.read().await.session().visit_count
    }

    pub async fn handoff_requested(&self) -> bool {
        self.inner.session.read().await.session().handoff_requested
    }

    /// Seconds since engine start, monotonically increasing.
    pub fn time_on_site_secs(&self) -> u64 {
        self.inner.started_at.elapsed().as_secs()
    }

    /// Whether an unconsumed proactive message is waiting behind the badge.
    pub fn has_pending_proactive(&self) -> bool {
        self.inner.pending_proactive.lock().unwrap().is_some()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn set_state(&self, state: EngineState) {
        *self.inner.state.lock().unwrap() = state;
    }

    /// Sliding-window burst check; records the submission when admitted.
    fn over_burst_limit(&self) -> bool {
        let window = Duration::from_secs(self.inner.config.burst_window_secs);
        let now = Instant::now();
        let mut recent = self.inner.recent_submissions.lock().unwrap();
        while recent
            .front()
            .is_some_and(|t| now.duration_since(*t) > window)
        {
            recent.pop_front();
        }
        if recent.len() >= self.inner.config.burst_limit {
            return true;
        }
        recent.push_back(now);
        false
    }

    /// Schedules the reply behind the synthetic thinking delay.
    ///
    /// The delay always fires to completion; there is deliberately no
    /// cancellation token.
    fn spawn_reply(&self, text: String) {
        self.set_state(EngineState::Thinking);
        let delay_ms = {
            let mut rng = self.inner.delay_rng.lock().unwrap();
            rng.gen_range(
                self.inner.config.thinking_delay_min_ms..=self.inner.config.thinking_delay_max_ms,
            )
        };
        let engine = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            engine.respond(&text).await;
        });
    }

    async fn respond(&self, text: &str) {
        let reply = self.compose_reply(text).await;
        self.inner
            .session
            .write()
            .await
            .append(Message::bot(&reply))
            .await;
        self.set_state(EngineState::Responded);
        self.speak(&reply);
        self.set_state(EngineState::Idle);
    }

    /// Intent match, qualifier refinement, then selection.
    async fn compose_reply(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        let intent = self.inner.matcher.match_input(text);
        let key = match intent {
            Some(Intent::Greeting) => {
                let visit_count = self.inner.session.read().await.session().visit_count;
                ResponseKey::Greeting {
                    first_visit: visit_count <= 1,
                }
            }
            Some(Intent::Pricing) => ResponseKey::Pricing(PricingTier::detect(&lower)),
            Some(Intent::Services) => ResponseKey::Services(ServiceKind::detect(&lower)),
            Some(Intent::Portfolio) => ResponseKey::Portfolio,
            Some(Intent::Contact) => ResponseKey::Contact,
            Some(Intent::Meeting) => ResponseKey::Meeting,
            Some(Intent::Urgent) => ResponseKey::Urgent,
            Some(Intent::Thanks) => ResponseKey::Thanks,
            Some(Intent::Goodbye) => ResponseKey::Goodbye,
            Some(Intent::Help) => ResponseKey::Help,
            None => ResponseKey::Fallback,
        };
        tracing::debug!(
            intent = intent.map(|i| i.as_str()).unwrap_or("none"),
            "composing reply"
        );
        let mut selector = self.inner.selector.lock().unwrap();
        selector.select(&self.inner.catalog, key)
    }

    fn speak(&self, text: &str) {
        let Some(synthesizer) = &self.inner.synthesizer else {
            return;
        };
        if !self.inner.preferences.read().unwrap().voice_enabled {
            return;
        }
        // A new utterance supersedes any still playing.
        synthesizer.cancel();
        synthesizer.speak(Utterance::new(text));
    }

    async fn fire_proactive(&self, rule: ProactiveRule) {
        if self.inner.widget_open.load(Ordering::SeqCst) {
            return;
        }
        if !self.inner.preferences.read().unwrap().notifications_enabled {
            return;
        }
        let visit_count = self.inner.session.read().await.session().visit_count;
        let time_on_site = self.time_on_site_secs();
        let route = self.inner.route.lock().unwrap().clone();
        if rule.condition.holds(visit_count, time_on_site, &route) {
            tracing::debug!(message = %rule.message, "proactive rule fired");
            // A newer firing overwrites an unconsumed pending message.
            *self.inner.pending_proactive.lock().unwrap() = Some(rule.message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::response::WELCOME;
    use crate::session::Sender;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct MemStore {
        map: Mutex<HashMap<String, String>>,
    }

    impl MemStore {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                map: Mutex::new(HashMap::new()),
            })
        }
    }

    #[async_trait]
    impl KeyValueStore for MemStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.map.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            self.map
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.map.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSynthesizer {
        spoken: Mutex<Vec<Utterance>>,
        cancels: Mutex<usize>,
    }

    impl SpeechSynthesizer for RecordingSynthesizer {
        fn speak(&self, utterance: Utterance) {
            self.spoken.lock().unwrap().push(utterance);
        }

        fn cancel(&self) {
            *self.cancels.lock().unwrap() += 1;
        }
    }

    struct NoopRecognizer;

    impl SpeechRecognizer for NoopRecognizer {
        fn start(&self) {}
        fn stop(&self) {}
    }

    /// Polls spawned tasks until they park on a timer.
    async fn settle() {
        for _ in 0..25 {
            tokio::task::yield_now().await;
        }
    }

    async fn fast_forward(duration: Duration) {
        settle().await;
        tokio::time::advance(duration).await;
        settle().await;
    }

    async fn engine_with_store(store: Arc<dyn KeyValueStore>) -> ChatEngine {
        ChatEngine::builder(store).rng_seed(7).start().await
    }

    async fn bot_texts(engine: &ChatEngine) -> Vec<String> {
        engine
            .transcript()
            .await
            .into_iter()
            .filter(|m| m.sender == Sender::Bot && m.text != WELCOME)
            .map(|m| m.text)
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_pricing_question_gets_pricing_answer() {
        let engine = engine_with_store(MemStore::new()).await;

        engine
            .submit(Submission::text("How much does a website cost?"))
            .await;
        assert_eq!(engine.state(), EngineState::Thinking);
        fast_forward(Duration::from_secs(4)).await;

        assert_eq!(engine.state(), EngineState::Idle);
        let replies = bot_texts(&engine).await;
        assert_eq!(replies.len(), 1);
        assert!(replies[0].contains("R2,500"), "got: {}", replies[0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_visit_greeting_differs_from_returning() {
        let first = engine_with_store(MemStore::new()).await;
        assert_eq!(first.visit_count().await, 1);
        first.submit(Submission::text("hello")).await;
        fast_forward(Duration::from_secs(4)).await;
        let first_reply = bot_texts(&first).await.remove(0);
        let catalog = ResponseCatalog::new();
        assert!(
            catalog
                .candidates(ResponseKey::Greeting { first_visit: true })
                .contains(&first_reply.as_str())
        );

        let store = MemStore::new();
        store.set(crate::storage::keys::VISIT_COUNT, "4").await.unwrap();
        let returning = engine_with_store(store).await;
        assert_eq!(returning.visit_count().await, 5);
        returning.submit(Submission::text("hello")).await;
        fast_forward(Duration::from_secs(4)).await;
        let returning_reply = bot_texts(&returning).await.remove(0);
        assert!(
            catalog
                .candidates(ResponseKey::Greeting { first_visit: false })
                .contains(&returning_reply.as_str())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmatched_input_gets_fallback() {
        let engine = engine_with_store(MemStore::new()).await;
        engine
            .submit(Submission::text("florble wombat quux"))
            .await;
        fast_forward(Duration::from_secs(4)).await;

        let replies = bot_texts(&engine).await;
        assert_eq!(replies.len(), 1);
        assert!(
            ResponseCatalog::new()
                .candidates(ResponseKey::Fallback)
                .contains(&replies[0].as_str())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_input_is_ignored() {
        let engine = engine_with_store(MemStore::new()).await;
        engine.submit(Submission::text("   ")).await;
        fast_forward(Duration::from_secs(4)).await;

        assert_eq!(engine.state(), EngineState::Idle);
        assert!(bot_texts(&engine).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_honeypot_submission_is_dropped() {
        let engine = engine_with_store(MemStore::new()).await;
        engine
            .submit(Submission {
                text: "hello".to_string(),
                honeypot: Some("gotcha".to_string()),
            })
            .await;
        fast_forward(Duration::from_secs(4)).await;

        assert!(engine.transcript().await.iter().all(|m| m.sender != Sender::User));
        assert!(bot_texts(&engine).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_limit_drops_excess_submissions() {
        let engine = engine_with_store(MemStore::new()).await;
        for i in 0..6 {
            engine.submit(Submission::text(format!("message {i}"))).await;
        }
        fast_forward(Duration::from_secs(4)).await;

        let users = engine
            .transcript()
            .await
            .into_iter()
            .filter(|m| m.sender == Sender::User)
            .count();
        assert_eq!(users, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_window_slides() {
        let engine = engine_with_store(MemStore::new()).await;
        for i in 0..5 {
            engine.submit(Submission::text(format!("message {i}"))).await;
        }
        fast_forward(Duration::from_secs(11)).await;
        engine.submit(Submission::text("one more")).await;
        fast_forward(Duration::from_secs(4)).await;

        let users = engine
            .transcript()
            .await
            .into_iter()
            .filter(|m| m.sender == Sender::User)
            .count();
        assert_eq!(users, 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_lands_even_if_widget_closes_mid_thinking() {
        let engine = engine_with_store(MemStore::new()).await;
        engine.open_widget().await;
        engine.submit(Submission::text("how much?")).await;
        engine.close_widget().await;
        fast_forward(Duration::from_secs(4)).await;

        assert_eq!(bot_texts(&engine).await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quick_action_injects_canned_utterance() {
        let engine = engine_with_store(MemStore::new()).await;
        engine.quick_action(QuickAction::Pricing).await;
        fast_forward(Duration::from_secs(4)).await;

        let transcript = engine.transcript().await;
        assert!(transcript
            .iter()
            .any(|m| m.sender == Sender::User && m.text == "I'd like to know about your pricing"));
        assert!(bot_texts(&engine).await[0].contains("R2,500"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_low_confidence_voice_asks_for_confirmation() {
        let engine = ChatEngine::builder(MemStore::new())
            .rng_seed(7)
            .recognizer(Arc::new(NoopRecognizer))
            .start()
            .await;

        engine.start_listening().await;
        assert_eq!(engine.state(), EngineState::Listening);
        engine
            .on_voice_result(VoiceCapture::new("how much", 0.5))
            .await;
        fast_forward(Duration::from_secs(4)).await;

        assert_eq!(engine.state(), EngineState::Idle);
        let replies = bot_texts(&engine).await;
        assert_eq!(replies.len(), 1);
        assert!(replies[0].contains("I heard: \"how much\""));
        assert!(replies[0].contains("50% confidence"));
        // Not auto-submitted.
        assert!(engine.transcript().await.iter().all(|m| m.sender != Sender::User));
    }

    #[tokio::test(start_paused = true)]
    async fn test_high_confidence_voice_submits_transcript() {
        let engine = ChatEngine::builder(MemStore::new())
            .rng_seed(7)
            .recognizer(Arc::new(NoopRecognizer))
            .start()
            .await;

        engine.start_listening().await;
        engine
            .on_voice_result(VoiceCapture::new("how much does a website cost", 0.9))
            .await;
        fast_forward(Duration::from_secs(4)).await;

        assert!(engine
            .transcript()
            .await
            .iter()
            .any(|m| m.sender == Sender::User && m.text == "how much does a website cost"));
        assert!(bot_texts(&engine).await[0].contains("R2,500"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_voice_error_is_recoverable() {
        let engine = ChatEngine::builder(MemStore::new())
            .rng_seed(7)
            .recognizer(Arc::new(NoopRecognizer))
            .start()
            .await;

        engine.start_listening().await;
        engine.on_voice_error().await;

        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(bot_texts(&engine).await, vec![VOICE_RETRY.to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_listening_without_recognizer_is_declined() {
        let engine = engine_with_store(MemStore::new()).await;
        assert!(!engine.voice_available());
        engine.start_listening().await;

        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(bot_texts(&engine).await, vec![VOICE_UNSUPPORTED.to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replies_are_spoken_when_voice_enabled() {
        let synthesizer = Arc::new(RecordingSynthesizer::default());
        let engine = ChatEngine::builder(MemStore::new())
            .rng_seed(7)
            .synthesizer(synthesizer.clone())
            .start()
            .await;

        engine.submit(Submission::text("thanks!")).await;
        fast_forward(Duration::from_secs(4)).await;

        let spoken = synthesizer.spoken.lock().unwrap();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].rate, 0.9);
        // Cancel-before-speak supersedes any utterance still playing.
        assert_eq!(*synthesizer.cancels.lock().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabling_voice_preference_mutes_replies() {
        let synthesizer = Arc::new(RecordingSynthesizer::default());
        let engine = ChatEngine::builder(MemStore::new())
            .rng_seed(7)
            .synthesizer(synthesizer.clone())
            .start()
            .await;

        let mut prefs = engine.preferences();
        prefs.voice_enabled = false;
        engine.set_preferences(prefs).await;

        engine.submit(Submission::text("thanks!")).await;
        fast_forward(Duration::from_secs(4)).await;

        assert!(synthesizer.spoken.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_proactive_message_waits_behind_badge_until_open() {
        let engine = engine_with_store(MemStore::new()).await;
        assert!(!engine.has_pending_proactive());

        fast_forward(Duration::from_secs(31)).await;
        assert!(engine.has_pending_proactive());
        // Still only the welcome message in the transcript.
        assert_eq!(engine.transcript().await.len(), 1);

        engine.open_widget().await;
        assert!(!engine.has_pending_proactive());
        let replies = bot_texts(&engine).await;
        assert_eq!(
            replies,
            vec!["👋 New here? I can help you find the perfect web solution!".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_proactive_rule_overwrites_pending() {
        let engine = engine_with_store(MemStore::new()).await;

        fast_forward(Duration::from_secs(31)).await;
        assert!(engine.has_pending_proactive());
        fast_forward(Duration::from_secs(100)).await;

        engine.open_widget().await;
        let replies = bot_texts(&engine).await;
        assert_eq!(
            replies,
            vec!["💡 Need help with pricing? I can give you an instant estimate!".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_proactive_suppressed_while_widget_open() {
        let engine = engine_with_store(MemStore::new()).await;
        engine.open_widget().await;

        fast_forward(Duration::from_secs(150)).await;
        assert!(!engine.has_pending_proactive());
        assert!(bot_texts(&engine).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_proactive_suppressed_by_notification_preference() {
        let engine = engine_with_store(MemStore::new()).await;
        let mut prefs = engine.preferences();
        prefs.notifications_enabled = false;
        engine.set_preferences(prefs).await;

        fast_forward(Duration::from_secs(150)).await;
        assert!(!engine.has_pending_proactive());
    }

    #[tokio::test(start_paused = true)]
    async fn test_quote_route_rule_requires_the_route() {
        let engine = engine_with_store(MemStore::new()).await;
        // Default route is #home, so only the first-visit rule fires by 31s.
        fast_forward(Duration::from_secs(16)).await;
        assert!(!engine.has_pending_proactive());

        let routed = engine_with_store(MemStore::new()).await;
        routed.set_route("#quote-estimator");
        fast_forward(Duration::from_secs(16)).await;
        assert!(routed.has_pending_proactive());
    }

    #[tokio::test(start_paused = true)]
    async fn test_handoff_with_agent_available() {
        let engine = engine_with_store(MemStore::new()).await;
        engine.request_handoff().await;
        assert!(engine.handoff_requested().await);
        assert_eq!(bot_texts(&engine).await, vec![HANDOFF_CONNECTING.to_string()]);

        fast_forward(Duration::from_secs(4)).await;
        assert_eq!(
            bot_texts(&engine).await,
            vec![
                HANDOFF_CONNECTING.to_string(),
                HANDOFF_HUMAN_GREETING.to_string()
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_handoff_with_no_agent_available() {
        let mut config = EngineConfig::default();
        config.agent_available = false;
        let engine = ChatEngine::builder(MemStore::new())
            .config(config)
            .rng_seed(7)
            .start()
            .await;

        engine.request_handoff().await;
        assert_eq!(bot_texts(&engine).await, vec![HANDOFF_OFFLINE.to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transcript_survives_engine_restart() {
        let store = MemStore::new();
        let first = engine_with_store(store.clone()).await;
        first.submit(Submission::text("how much?")).await;
        fast_forward(Duration::from_secs(4)).await;

        let second = engine_with_store(store).await;
        let transcript = second.transcript().await;
        assert_eq!(transcript[0].text, WELCOME);
        assert!(transcript.iter().any(|m| m.text == "how much?"));
        assert_eq!(second.visit_count().await, 2);
    }
}
