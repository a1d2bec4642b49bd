//! Structured output schemas sent with each request.

use serde_json::{json, Value};
use vsound_models::{Genre, RecommendationMode, RECOMMENDATION_COUNT};

/// Response schema for the given mode, in Gemini's OpenAPI subset.
///
/// Both modes share the object shape `{description, recommendations}`; only
/// the array items differ.
pub fn response_schema(mode: RecommendationMode) -> Value {
    let (items, array_description) = match mode {
        RecommendationMode::Songs => (
            json!({
                "type": "OBJECT",
                "properties": {
                    "songName": {
                        "type": "STRING",
                        "description": "The name of the recommended song."
                    },
                    "artist": {
                        "type": "STRING",
                        "description": "The artist of the recommended song."
                    }
                },
                "required": ["songName", "artist"]
            }),
            format!(
                "An array of {} recommended songs, each with a song name and artist.",
                RECOMMENDATION_COUNT
            ),
        ),
        RecommendationMode::Genres => (
            json!({
                "type": "STRING",
                "enum": Genre::labels()
            }),
            format!(
                "An array of {} music genres chosen from the allowed list.",
                RECOMMENDATION_COUNT
            ),
        ),
    };

    json!({
        "type": "OBJECT",
        "properties": {
            "description": {
                "type": "STRING",
                "description": "A short paragraph describing the video's mood, setting, and actions."
            },
            "recommendations": {
                "type": "ARRAY",
                "description": array_description,
                "minItems": RECOMMENDATION_COUNT,
                "maxItems": RECOMMENDATION_COUNT,
                "items": items
            }
        },
        "required": ["description", "recommendations"]
    })
}
