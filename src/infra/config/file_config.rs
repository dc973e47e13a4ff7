use serde::Deserialize;

use crate::infra::config::{AppConfig, BackendConfig, LogConfig, VoiceConfig};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub voice: Option<FileVoiceConfig>,
    pub backend: Option<FileBackendConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(voice) = self.voice {
            voice.merge_into(&mut config.voice);
        }

        if let Some(backend) = self.backend {
            backend.merge_into(&mut config.backend);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileVoiceConfig {
    pub locale: Option<String>,
    pub pitch: Option<f32>,
    pub rate: Option<f32>,
}

impl FileVoiceConfig {
    fn merge_into(self, config: &mut VoiceConfig) {
        if let Some(locale) = self.locale {
            config.locale = locale;
        }

        if let Some(pitch) = self.pitch {
            config.pitch = pitch;
        }

        if let Some(rate) = self.rate {
            config.rate = rate;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileBackendConfig {
    pub reply_delay_ms: Option<u64>,
}

impl FileBackendConfig {
    fn merge_into(self, config: &mut BackendConfig) {
        if let Some(delay) = self.reply_delay_ms {
            config.reply_delay_ms = delay;
        }
    }
}
