pub mod config;
pub mod engine;
pub mod error;
pub mod intent;
pub mod proactive;
pub mod response;
pub mod session;
pub mod speech;
pub mod storage;

// Re-export common error type
pub use error::{Result, SunaError};

pub use config::EngineConfig;
pub use engine::{ChatEngine, EngineState, QuickAction, Submission};
pub use intent::{Intent, IntentMatcher};
pub use response::{ResponseCatalog, ResponseKey, ResponseSelector};
pub use session::{ConversationSession, Message, Sender, SessionService, UserPreferences};
pub use speech::{SpeechRecognizer, SpeechSynthesizer, Utterance, VoiceCapture};
pub use storage::KeyValueStore;
