use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub voice: VoiceConfig,
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoiceConfig {
    pub locale: String,
    pub pitch: f32,
    pub rate: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            locale: "en-IN".to_owned(),
            pitch: 1.0,
            rate: 0.9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendConfig {
    /// How long the stub responder waits before answering, imitating a
    /// network round-trip.
    pub reply_delay_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { reply_delay_ms: 450 }
    }
}
