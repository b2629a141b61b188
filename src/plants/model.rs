use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

/// Where the plant is meant to live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Interior,
    Exterior,
}

/// Care sheet returned by the identification service. Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantCareInstructions {
    pub common_name: String,
    pub scientific_name: String,
    /// 1 to 5, display only.
    pub light_level: u8,
    /// 1 to 5, display only.
    pub water_level: u8,
    pub location: Location,
    pub description: String,
    pub origin: String,
    pub home_climate_tips: String,
    pub recommendations: String,
    /// Days between waterings in winter. Always >= 1 after validation.
    pub watering_winter: u32,
    /// Days between waterings in summer. Always >= 1 after validation.
    pub watering_summer: u32,
    pub target_lumens: u32,
    pub frequent_problems: String,
    pub fertilization: String,
    pub pruning: String,
    pub substrate: String,
}

impl PlantCareInstructions {
    /// Normalize model output before a record is created from it.
    ///
    /// Watering intervals of zero would divide by zero in the schedule
    /// progress computation, so they are clamped to one day here, once,
    /// instead of being guarded at every read site.
    pub fn normalize(mut self) -> Self {
        if self.watering_summer == 0 || self.watering_winter == 0 {
            warn!(
                common_name = %self.common_name,
                summer = self.watering_summer,
                winter = self.watering_winter,
                "non-positive watering interval from model, clamping to 1 day"
            );
        }
        self.watering_summer = self.watering_summer.max(1);
        self.watering_winter = self.watering_winter.max(1);
        self.light_level = self.light_level.clamp(1, 5);
        self.water_level = self.water_level.clamp(1, 5);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Watering,
    /// Present in stored data for compatibility; no action currently emits it.
    Blooming,
}

/// One care event. Append-only, never edited or removed individually.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantLog {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: LogKind,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

/// A tracked plant.
///
/// `name` and `species` are snapshots of
/// `instructions.common_name`/`scientific_name` taken at creation time and
/// never re-synced afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: Uuid,
    pub name: String,
    pub species: String,
    /// Line-art illustration as an opaque `data:` URL.
    pub image_url: String,
    /// Photorealistic reference as an opaque `data:` URL.
    pub reference_image_url: String,
    pub instructions: PlantCareInstructions,
    /// Newest first.
    pub logs: Vec<PlantLog>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_watered_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub added_at: OffsetDateTime,
}

/// Fixture care sheet shared by tests across modules.
#[cfg(test)]
pub(crate) fn sample_instructions() -> PlantCareInstructions {
    PlantCareInstructions {
        common_name: "Poto".into(),
        scientific_name: "Epipremnum aureum".into(),
        light_level: 3,
        water_level: 2,
        location: Location::Interior,
        description: "Trepadora de hoja perenne.".into(),
        origin: "Islas Salomón".into(),
        home_climate_tips: "Humedad media, evitar corrientes.".into(),
        recommendations: "Esquejes en agua.".into(),
        watering_winter: 14,
        watering_summer: 7,
        target_lumens: 2500,
        frequent_problems: "Hojas amarillas por exceso de riego.".into(),
        fertilization: "Abono líquido en primavera.".into(),
        pruning: "Podar tallos largos en primavera.".into(),
        substrate: "Sustrato universal con perlita.".into(),
    }
}

#[cfg(test)]
mod model_tests {
    use super::*;

    #[test]
    fn normalize_clamps_zero_intervals() {
        let mut info = sample_instructions();
        info.watering_summer = 0;
        info.watering_winter = 0;
        let info = info.normalize();
        assert_eq!(info.watering_summer, 1);
        assert_eq!(info.watering_winter, 1);
    }

    #[test]
    fn normalize_keeps_valid_intervals() {
        let info = sample_instructions().normalize();
        assert_eq!(info.watering_summer, 7);
        assert_eq!(info.watering_winter, 14);
    }

    #[test]
    fn normalize_clamps_levels_into_domain() {
        let mut info = sample_instructions();
        info.light_level = 0;
        info.water_level = 9;
        let info = info.normalize();
        assert_eq!(info.light_level, 1);
        assert_eq!(info.water_level, 5);
    }

    #[test]
    fn plant_json_uses_original_field_names() {
        let plant = Plant {
            id: Uuid::new_v4(),
            name: "Poto".into(),
            species: "Epipremnum aureum".into(),
            image_url: String::new(),
            reference_image_url: String::new(),
            instructions: sample_instructions(),
            logs: vec![],
            last_watered_at: None,
            added_at: OffsetDateTime::UNIX_EPOCH,
        };
        let value = serde_json::to_value(&plant).unwrap();
        assert!(value.get("addedAt").is_some());
        assert!(value.get("imageUrl").is_some());
        assert!(value.get("referenceImageUrl").is_some());
        assert!(value.get("lastWateredAt").is_none());
        assert_eq!(
            value["instructions"]["wateringSummer"],
            serde_json::json!(7)
        );
        assert_eq!(value["instructions"]["location"], "interior");
    }

    #[test]
    fn log_kind_round_trips_lowercase() {
        let log = PlantLog {
            id: Uuid::new_v4(),
            kind: LogKind::Watering,
            date: OffsetDateTime::UNIX_EPOCH,
        };
        let value = serde_json::to_value(&log).unwrap();
        assert_eq!(value["type"], "watering");
        let back: PlantLog = serde_json::from_value(value).unwrap();
        assert_eq!(back.kind, LogKind::Watering);
    }
}
