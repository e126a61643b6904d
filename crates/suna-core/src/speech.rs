//! Speech provider ports.
//!
//! Both providers are optional capabilities: a missing recognizer hides the
//! voice affordance, a missing synthesizer silently disables spoken replies.

/// Confidence below which a voice transcript is not auto-submitted.
pub const CONFIDENCE_THRESHOLD: f32 = 0.7;

/// A transcript produced by the speech-to-text provider.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceCapture {
    pub transcript: String,
    /// Recognizer confidence in the range 0.0..=1.0.
    pub confidence: f32,
}

impl VoiceCapture {
    pub fn new(transcript: impl Into<String>, confidence: f32) -> Self {
        Self {
            transcript: transcript.into(),
            confidence,
        }
    }
}

/// An utterance handed to the text-to-speech provider.
///
/// Text is cleaned for speech (emoji stripped, newlines flattened); the
/// voice parameters match the widget's defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Utterance {
    pub fn new(text: &str) -> Self {
        let cleaned: String = text
            .chars()
            .filter(|c| c.is_ascii())
            .collect::<String>()
            .replace('\n', " ")
            .trim()
            .to_string();
        Self {
            text: cleaned,
            rate: 0.9,
            pitch: 1.0,
            volume: 0.8,
        }
    }
}

/// Speech-to-text control surface.
///
/// Capture results arrive back at the engine through
/// `ChatEngine::on_voice_result` / `on_voice_error`; this trait only starts
/// and stops the capture.
pub trait SpeechRecognizer: Send + Sync {
    fn start(&self);
    fn stop(&self);
}

/// Text-to-speech provider.
///
/// Fire-and-forget: `speak` must not block, and a new call supersedes any
/// utterance still playing (the engine cancels before speaking).
pub trait SpeechSynthesizer: Send + Sync {
    fn speak(&self, utterance: Utterance);
    fn cancel(&self);
}
