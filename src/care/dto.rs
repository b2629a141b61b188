//! Wire types for the Gemini `generateContent` REST endpoint, plus the
//! fixed response schema the care-sheet requests demand.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// Base64 payload with its MIME type, both directions of the wire.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
    }

    /// First text part of the first candidate, if any.
    pub fn text(&self) -> Option<&str> {
        self.parts().find_map(|p| p.text.as_deref())
    }

    /// First inline image of the first candidate, as a `data:` URL.
    pub fn inline_image_data_url(&self) -> Option<String> {
        self.parts().find_map(|p| {
            p.inline_data
                .as_ref()
                .map(|d| format!("data:{};base64,{}", d.mime_type, d.data))
        })
    }
}

/// Response schema for the two structured care-sheet operations: all sixteen
/// fields required, integer levels 1-5, the location enum constrained.
/// Field descriptions steer the model and stay in the app's language.
pub fn care_sheet_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "commonName": { "type": "STRING" },
            "scientificName": { "type": "STRING" },
            "lightLevel": { "type": "INTEGER", "description": "Nivel de luz de 1 a 5" },
            "waterLevel": { "type": "INTEGER", "description": "Nivel de riego de 1 a 5" },
            "location": { "type": "STRING", "enum": ["interior", "exterior"] },
            "description": { "type": "STRING", "description": "Breve resumen de la planta" },
            "origin": { "type": "STRING", "description": "Origen geográfico y hábitat natural" },
            "homeClimateTips": { "type": "STRING", "description": "Cómo replicar su clima natural en casa (humedad, temp)" },
            "recommendations": { "type": "STRING", "description": "Consejos de reproducción y cuidados extra" },
            "wateringWinter": { "type": "INTEGER", "description": "Días recomendados entre riegos durante el invierno" },
            "wateringSummer": { "type": "INTEGER", "description": "Días recomendados entre riegos durante el verano" },
            "targetLumens": { "type": "INTEGER", "description": "Lúmenes óptimos para esta planta" },
            "frequentProblems": { "type": "STRING", "description": "Detalle de plagas, problemas comunes o cuidados críticos" },
            "fertilization": { "type": "STRING", "description": "Consejos sobre cuándo y con qué abonar la planta" },
            "pruning": { "type": "STRING", "description": "Consejos sobre cómo y cuándo podar para un crecimiento sano" },
            "substrate": { "type": "STRING", "description": "Consejos sobre el tipo de tierra o sustrato ideal (drenaje, pH, componentes)" }
        },
        "required": [
            "commonName", "scientificName", "lightLevel", "waterLevel", "location",
            "description", "origin", "homeClimateTips", "recommendations",
            "wateringWinter", "wateringSummer", "targetLumens", "frequentProblems",
            "fertilization", "pruning", "substrate"
        ]
    })
}

#[cfg(test)]
mod dto_tests {
    use super::*;

    #[test]
    fn response_text_picks_first_text_part() {
        let raw = serde_json::json!({
            "candidates": [{
                "content": { "parts": [
                    { "inlineData": { "mimeType": "image/png", "data": "QUJD" } },
                    { "text": "{\"a\":1}" }
                ]}
            }]
        });
        let resp: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(resp.text(), Some("{\"a\":1}"));
        assert_eq!(
            resp.inline_image_data_url().as_deref(),
            Some("data:image/png;base64,QUJD")
        );
    }

    #[test]
    fn empty_response_yields_nothing() {
        let resp: GenerateContentResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(resp.text().is_none());
        assert!(resp.inline_image_data_url().is_none());
    }

    #[test]
    fn request_serializes_camel_case() {
        let req = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::inline("image/jpeg", "QUJD"), Part::text("hola")],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".into(),
                response_schema: care_sheet_schema(),
            }),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value["contents"][0]["parts"][0]["inlineData"]["mimeType"],
            "image/jpeg"
        );
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert!(value["generationConfig"]["responseSchema"]["required"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("substrate")));
    }

    #[test]
    fn schema_requires_all_care_fields() {
        let schema = care_sheet_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 16);
        assert_eq!(
            schema["properties"]["location"]["enum"],
            serde_json::json!(["interior", "exterior"])
        );
    }
}
