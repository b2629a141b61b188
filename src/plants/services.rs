//! Record creation: the composed flow from a photo or a name to a persisted
//! plant.
//!
//! Steps run strictly sequentially because the image prompts need the
//! resolved common name from the care-sheet fetch. Policy here is
//! all-or-nothing: the image entry points themselves degrade to `None`, but
//! a creation attempt that cannot get both images is aborted and nothing is
//! persisted.

use bytes::Bytes;
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::care::CareError;
use crate::state::AppState;

use super::model::{Plant, PlantCareInstructions};

/// Identify a photographed plant and create its record.
#[instrument(skip(state, jpeg))]
pub async fn create_from_image(
    state: &AppState,
    jpeg: Bytes,
    now: OffsetDateTime,
) -> anyhow::Result<Plant> {
    let _gate = state
        .creation_gate
        .try_lock()
        .map_err(|_| CareError::CreationInProgress)?;
    info!(bytes = jpeg.len(), "identifying plant from image");
    let info = state.oracle.identify_by_image(jpeg).await?;
    create_plant(state, info, now).await
}

/// Look a plant up by name and create its record. Empty or whitespace-only
/// queries are rejected before any request is made.
#[instrument(skip(state))]
pub async fn create_from_name(
    state: &AppState,
    query: &str,
    now: OffsetDateTime,
) -> anyhow::Result<Plant> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CareError::EmptyQuery.into());
    }
    let _gate = state
        .creation_gate
        .try_lock()
        .map_err(|_| CareError::CreationInProgress)?;
    info!(query, "searching plant by name");
    let info = state.oracle.search_by_name(query).await?;
    create_plant(state, info, now).await
}

async fn create_plant(
    state: &AppState,
    info: PlantCareInstructions,
    now: OffsetDateTime,
) -> anyhow::Result<Plant> {
    info!(name = %info.common_name, "drawing illustration");
    let illustration = state
        .oracle
        .generate_illustration(&info.common_name)
        .await
        .ok_or_else(|| CareError::ImageGeneration("ilustración".into()))?;

    info!(name = %info.common_name, "generating reference photo");
    let reference = state
        .oracle
        .generate_reference_photo(&info.common_name)
        .await
        .ok_or_else(|| CareError::ImageGeneration("foto de referencia".into()))?;

    let plant = state.store.create(info, illustration, reference, now).await?;
    Ok(plant)
}
