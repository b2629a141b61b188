use std::sync::Arc;

use anyhow::Context;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::storage::{decode_snapshot, CollectionStorage};

use super::model::{LogKind, Plant, PlantCareInstructions, PlantLog};

/// Owner of the plant collection.
///
/// Holds the records newest-first behind one lock; every mutation rewrites
/// the full snapshot through [`CollectionStorage`] before the lock is
/// released, so writes never interleave and reads always see persisted
/// state. All reads return clones: there is no second copy of a record that
/// could drift from the collection.
pub struct PlantStore {
    plants: Mutex<Vec<Plant>>,
    storage: Arc<dyn CollectionStorage>,
}

impl PlantStore {
    /// Load the collection from storage. Missing or corrupt data starts an
    /// empty collection; startup never fails on local state.
    pub async fn load(storage: Arc<dyn CollectionStorage>) -> Self {
        let raw = storage.load().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read plant collection");
            None
        });
        let plants: Vec<Plant> = decode_snapshot(raw);
        info!(count = plants.len(), "plant collection loaded");
        Self {
            plants: Mutex::new(plants),
            storage,
        }
    }

    /// All plants, newest first.
    pub async fn list(&self) -> Vec<Plant> {
        self.plants.lock().await.clone()
    }

    pub async fn get(&self, id: Uuid) -> Option<Plant> {
        self.plants.lock().await.iter().find(|p| p.id == id).cloned()
    }

    pub async fn count(&self) -> usize {
        self.plants.lock().await.len()
    }

    /// Create a record from a fetched care sheet plus its two images and
    /// prepend it to the collection.
    ///
    /// The record is fully constructed before insertion; `name`/`species`
    /// are snapshots of the care sheet taken here and never re-synced.
    pub async fn create(
        &self,
        instructions: PlantCareInstructions,
        image_url: String,
        reference_image_url: String,
        now: OffsetDateTime,
    ) -> anyhow::Result<Plant> {
        let instructions = instructions.normalize();
        let plant = Plant {
            id: Uuid::new_v4(),
            name: instructions.common_name.clone(),
            species: instructions.scientific_name.clone(),
            image_url,
            reference_image_url,
            instructions,
            logs: Vec::new(),
            last_watered_at: None,
            added_at: now,
        };

        let mut plants = self.plants.lock().await;
        plants.insert(0, plant.clone());
        self.persist(&plants).await?;
        info!(id = %plant.id, name = %plant.name, "plant created");
        Ok(plant)
    }

    /// Record a watering: set the timestamp and prepend exactly one log
    /// entry. Silently a no-op for an unknown id. Returns whether a record
    /// was updated.
    pub async fn mark_watered(&self, id: Uuid, now: OffsetDateTime) -> anyhow::Result<bool> {
        let mut plants = self.plants.lock().await;
        let Some(plant) = plants.iter_mut().find(|p| p.id == id) else {
            debug!(%id, "mark_watered: no such plant");
            return Ok(false);
        };
        plant.last_watered_at = Some(now);
        plant.logs.insert(
            0,
            PlantLog {
                id: Uuid::new_v4(),
                kind: LogKind::Watering,
                date: now,
            },
        );
        self.persist(&plants).await?;
        info!(%id, "watering recorded");
        Ok(true)
    }

    /// Remove a record. Idempotent: an absent id changes nothing.
    pub async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        let mut plants = self.plants.lock().await;
        let before = plants.len();
        plants.retain(|p| p.id != id);
        if plants.len() == before {
            debug!(%id, "delete: no such plant");
            return Ok(());
        }
        self.persist(&plants).await?;
        info!(%id, "plant deleted");
        Ok(())
    }

    async fn persist(&self, plants: &[Plant]) -> anyhow::Result<()> {
        let snapshot = serde_json::to_string(plants).context("serialize plant collection")?;
        self.storage
            .persist(&snapshot)
            .await
            .context("persist plant collection")
    }
}
