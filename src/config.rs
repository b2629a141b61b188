use serde::Deserialize;

/// Default storage file; the stem matches the original tracker's store key.
pub const DEFAULT_STORE_PATH: &str = "plant-tracker-v7.json";

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub api_url: String,
    pub text_model: String,
    pub image_model: String,
    /// Natural language the care sheets are requested in.
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    /// Path of the JSON file holding the whole plant collection.
    pub store_path: String,
    /// Best-effort location signal; `None` falls back to the northern
    /// hemisphere when resolving the season.
    pub latitude: Option<f64>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let gemini = GeminiConfig {
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            api_url: std::env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".into()),
            text_model: std::env::var("GEMINI_TEXT_MODEL")
                .unwrap_or_else(|_| "gemini-3-flash-preview".into()),
            image_model: std::env::var("GEMINI_IMAGE_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash-image".into()),
            language: std::env::var("CARE_LANGUAGE").unwrap_or_else(|_| "ESPAÑOL".into()),
        };
        Self {
            gemini,
            store_path: std::env::var("PLANT_STORE_PATH")
                .unwrap_or_else(|_| DEFAULT_STORE_PATH.into()),
            latitude: std::env::var("USER_LATITUDE")
                .ok()
                .and_then(|v| v.parse::<f64>().ok()),
        }
    }
}

/// Fixed configuration for tests; no env reads.
#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        gemini: GeminiConfig {
            api_key: "test-key".into(),
            api_url: "http://localhost:0".into(),
            text_model: "test-model".into(),
            image_model: "test-image-model".into(),
            language: "ESPAÑOL".into(),
        },
        store_path: DEFAULT_STORE_PATH.into(),
        latitude: None,
    }
}
