//! Care-data acquisition: the contract with the generative AI service that
//! turns a photo or a name into a structured care sheet plus two
//! illustrative images.

use async_trait::async_trait;
use bytes::Bytes;

use crate::plants::model::PlantCareInstructions;

pub mod dto;
pub mod gemini;

pub use gemini::GeminiClient;

/// Failures of the acquisition protocol and the creation flow built on it.
#[derive(Debug, thiserror::Error)]
pub enum CareError {
    /// Image identification failed or returned data off-schema.
    #[error("no se pudo identificar la planta: {0}")]
    Identification(String),

    /// Name lookup failed or returned data off-schema.
    #[error("no se encontró la planta: {0}")]
    Lookup(String),

    /// An illustrative image could not be produced and the creation flow
    /// chose not to proceed without it.
    #[error("no se pudo generar la imagen ({0})")]
    ImageGeneration(String),

    /// Rejected before any request: nothing to search for.
    #[error("la búsqueda está vacía")]
    EmptyQuery,

    /// Another creation flow is still running; one at a time.
    #[error("ya hay una planta creándose, espera a que termine")]
    CreationInProgress,
}

/// The AI collaborator boundary.
///
/// The two structured-data operations must fail loudly: a record is
/// incomplete without them. The two image operations are cosmetic at this
/// level and degrade to `None`; the creation flow decides whether a missing
/// image aborts the attempt.
#[async_trait]
pub trait PlantOracle: Send + Sync {
    /// Identify a photographed plant (JPEG bytes) and return its care sheet.
    async fn identify_by_image(&self, jpeg: Bytes) -> Result<PlantCareInstructions, CareError>;

    /// Look a plant up by free-text name. Callers reject empty queries
    /// before reaching this.
    async fn search_by_name(&self, query: &str) -> Result<PlantCareInstructions, CareError>;

    /// Stylized line-art depiction as a `data:` URL, `None` on failure.
    async fn generate_illustration(&self, common_name: &str) -> Option<String>;

    /// Photorealistic reference as a `data:` URL, `None` on failure.
    async fn generate_reference_photo(&self, common_name: &str) -> Option<String>;
}
