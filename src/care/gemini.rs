//! REST client for the Gemini `generateContent` API.
//!
//! One HTTP client serves both structured care-sheet requests (with a fixed
//! response schema) and the two illustrative image generations.

use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use tracing::{debug, warn};

use crate::config::GeminiConfig;
use crate::plants::model::PlantCareInstructions;

use super::dto::{
    care_sheet_schema, Content, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, Part,
};
use super::{CareError, PlantOracle};

/// Errors from the Gemini REST layer.
#[derive(Debug, thiserror::Error)]
pub enum GeminiApiError {
    /// No API key configured; refused before any request.
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    /// The HTTP request itself failed (network, DNS, TLS).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Gemini returned a non-2xx status code.
    #[error("Gemini API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response carried no usable payload part.
    #[error("Gemini response had no usable payload")]
    EmptyResponse,

    /// The structured payload did not match the care-sheet schema.
    #[error("care sheet off schema: {0}")]
    Schema(#[from] serde_json::Error),
}

pub struct GeminiClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    text_model: String,
    image_model: String,
    language: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
            language: config.language.clone(),
        }
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiApiError> {
        if self.api_key.is_empty() {
            return Err(GeminiApiError::MissingApiKey);
        }
        let url = format!("{}/v1beta/models/{}:generateContent", self.api_url, model);
        debug!(model, "gemini generateContent");
        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    /// Run a structured request and decode the care sheet from its text part.
    async fn fetch_care_sheet(
        &self,
        parts: Vec<Part>,
    ) -> Result<PlantCareInstructions, GeminiApiError> {
        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".into(),
                response_schema: care_sheet_schema(),
            }),
        };
        let response = self.generate(&self.text_model, &request).await?;
        let text = response.text().ok_or(GeminiApiError::EmptyResponse)?;
        Ok(parse_care_sheet(text)?)
    }

    /// Run an image request; any failure degrades to `None`.
    async fn fetch_image(&self, prompt: String, what: &str) -> Option<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::text(prompt)],
            }],
            generation_config: None,
        };
        match self.generate(&self.image_model, &request).await {
            Ok(response) => {
                let image = response.inline_image_data_url();
                if image.is_none() {
                    warn!(what, "gemini returned no inline image");
                }
                image
            }
            Err(e) => {
                warn!(what, error = %e, "image generation failed");
                None
            }
        }
    }

    fn identify_prompt(&self) -> String {
        format!(
            "Identifica esta planta y devuelve sus cuidados detallados, incluyendo días \
             específicos de riego por estación, lúmenes, problemas frecuentes, abono, poda \
             y el SUSTRATO ideal, en {} según el esquema.",
            self.language
        )
    }

    fn search_prompt(&self, query: &str) -> String {
        format!(
            "Busca información botánica sobre \"{query}\". Necesito origen, clima doméstico, \
             recomendaciones de reproducción, frecuencia de riego (invierno/verano), lúmenes, \
             problemas frecuentes, abono, poda y el SUSTRATO ideal. Todo en {} según el esquema.",
            self.language
        )
    }
}

#[async_trait]
impl PlantOracle for GeminiClient {
    async fn identify_by_image(&self, jpeg: Bytes) -> Result<PlantCareInstructions, CareError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&jpeg);
        self.fetch_care_sheet(vec![
            Part::inline("image/jpeg", encoded),
            Part::text(self.identify_prompt()),
        ])
        .await
        .map_err(|e| CareError::Identification(e.to_string()))
    }

    async fn search_by_name(&self, query: &str) -> Result<PlantCareInstructions, CareError> {
        self.fetch_care_sheet(vec![Part::text(self.search_prompt(query))])
            .await
            .map_err(|e| CareError::Lookup(e.to_string()))
    }

    async fn generate_illustration(&self, common_name: &str) -> Option<String> {
        let prompt = format!(
            "Minimalist thin black line art drawing of a {common_name} plant in a simple pot. \
             White background, high contrast, clean vector lines, no shading."
        );
        self.fetch_image(prompt, "illustration").await
    }

    async fn generate_reference_photo(&self, common_name: &str) -> Option<String> {
        let prompt = format!(
            "A high-quality, photorealistic botanical studio photo of a perfectly healthy and \
             lush {common_name} plant. Natural bright soft lighting, neutral minimalist \
             background, professional macro photography style."
        );
        self.fetch_image(prompt, "reference photo").await
    }
}

/// Decode the model's JSON text against the care-sheet shape.
fn parse_care_sheet(text: &str) -> Result<PlantCareInstructions, serde_json::Error> {
    serde_json::from_str(text)
}
