use serde_json::json;

use crate::llm::OutputSchema;

pub const SCHEMA_NAME: &str = "translated_task";

/// Schema of the model's answer: `{ "input": { title, description, importance?, steps? } }`.
///
/// Strict structured outputs require every property to be listed as required,
/// so the optional fields are nullable instead.
pub fn translation_schema() -> OutputSchema {
    OutputSchema {
        name: SCHEMA_NAME.to_string(),
        schema: json!({
            "type": "object",
            "properties": {
                "input": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "description": { "type": "string" },
                        "importance": { "type": ["string", "null"] },
                        "steps": {
                            "type": ["array", "null"],
                            "items": { "type": "string" }
                        }
                    },
                    "required": ["title", "description", "importance", "steps"],
                    "additionalProperties": false
                }
            },
            "required": ["input"],
            "additionalProperties": false
        }),
    }
}
