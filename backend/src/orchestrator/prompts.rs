//! Prompt and schema builders
//!
//! Every prompt the orchestrators send lives here so the wording can be
//! reviewed in one place.

use crate::orchestrator::plan_types::{AspectRatio, HiddenGem, TravelPlan};
use serde_json::{json, Value};

/// Styles of the three preview images, in slot order
pub const PREVIEW_STYLES: [&str; 3] = [
    "bright daytime wide-angle travel photograph, clear sky, vivid natural colors",
    "cinematic golden-hour sunset shot, warm dramatic light, shallow depth of field",
    "high aerial drone photograph looking down, sweeping overview of the surroundings",
];

/// Motion prompt for the video job
pub const DRONE_MOTION_PROMPT: &str = "Cinematic drone view flying smoothly over the scene, \
continuous forward movement with a gentle rising arc, steady camera, natural lighting, \
no cuts, no text overlays.";

/// Generic chat reply used when a follow-up request fails
pub const CHAT_FALLBACK_REPLY: &str =
    "Sorry, I couldn't answer that right now. Please try asking again.";

/// Prompt for the full travel profile
pub fn travel_plan_prompt(location: &str) -> String {
    format!(
        r#"You are an expert travel analyst, safety advisor, climatologist and landscape photographer.

Produce a complete travel profile for: "{location}"

Return ONE JSON object with exactly these fields:
- "confidence": "High", "Medium" or "Low" (how sure you are the place exists and your data is accurate)
- "overview": 2-3 sentence overview
- "disaster_profile": {{"zone_type": "...", "risk_score": "N/10", "details": "..."}}
- "safety_measures": array of short strings
- "itinerary": array of strings, one per day, in order
- "weather": {{
    "crowd_summary": "...",
    "crowd_curve": array of EXACTLY 12 objects {{"month": "January", "score": 0-100}} from January to December,
    "best_time": "...",
    "forecast": "..."
  }}
- "photography": {{"guide": "...", "settings": {{"iso": "...", "shutter_speed": "...", "aperture": "...", "notes": "..."}}}}
- "trip_guide": {{"transport": "...", "tips": [...], "packing": [...], "scam_warnings": "..."}}

Return ONLY valid JSON, no other text."#
    )
}

/// Prompt for the hidden spots list
pub fn hidden_gems_prompt(location: &str, max_gems: usize) -> String {
    format!(
        r#"List {max_gems} lesser-known hidden spots in or near "{location}" that most tourists miss.

Return a JSON array of objects, each with:
- "name": the spot's name
- "description": one or two sentences on why it is worth visiting
- "location_hint": how to find it (neighborhood, landmark, or directions)

Return ONLY valid JSON, no other text."#
    )
}

/// Prompt for one preview image
pub fn preview_image_prompt(location: &str, style: &str) -> String {
    format!("A photorealistic image of {location}. Style: {style}. No text, no watermarks.")
}

/// Prompt for the image of one hidden spot
pub fn gem_image_prompt(location: &str, gem: &HiddenGem) -> String {
    format!(
        "A photorealistic travel photograph of {name}, {hint}, near {location}. {description} \
No text, no watermarks.",
        name = gem.name,
        hint = gem.location_hint,
        description = gem.description,
    )
}

/// Prompt for the reference still of the drone video
///
/// The aspect ratio is restated in prose because the image model does not
/// always honor the structured parameter.
pub fn reference_image_prompt(location: &str, aspect_ratio: AspectRatio) -> String {
    format!(
        "A breathtaking high-altitude aerial photograph of {location}, captured from a drone, \
showing the most recognizable landmarks and landscape. Photorealistic, natural colors, \
no text. Compose the frame in a {hint}.",
        hint = aspect_ratio.prompt_hint()
    )
}

/// Prompt for the map-grounded briefing
pub fn briefing_prompt(location: &str) -> String {
    format!(
        "Give a short orientation briefing for a visitor to {location}: where it is, the main \
districts or areas, and three notable places nearby. Keep it under 150 words."
    )
}

/// System context for the follow-up chat
pub fn chat_system_context(plan: &TravelPlan, location: &str) -> String {
    let plan_json = serde_json::to_string_pretty(plan).unwrap_or_default();
    format!(
        "You are a travel assistant answering follow-up questions about a trip to {location}. \
Answer only using, or in direct relation to, the travel profile below. If a question is \
unrelated to this trip, politely say so.\n\nTRAVEL PROFILE:\n{plan_json}"
    )
}

/// Response schema for the travel profile
pub fn travel_plan_schema() -> Value {
    let string = json!({ "type": "STRING" });
    let strings = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
    json!({
        "type": "OBJECT",
        "properties": {
            "confidence": { "type": "STRING", "enum": ["High", "Medium", "Low"] },
            "overview": string,
            "disaster_profile": {
                "type": "OBJECT",
                "properties": { "zone_type": string, "risk_score": string, "details": string },
                "required": ["zone_type", "risk_score", "details"]
            },
            "safety_measures": strings,
            "itinerary": strings,
            "weather": {
                "type": "OBJECT",
                "properties": {
                    "crowd_summary": string,
                    "crowd_curve": {
                        "type": "ARRAY",
                        "minItems": 12,
                        "maxItems": 12,
                        "items": {
                            "type": "OBJECT",
                            "properties": { "month": string, "score": { "type": "INTEGER" } },
                            "required": ["month", "score"]
                        }
                    },
                    "best_time": string,
                    "forecast": string
                },
                "required": ["crowd_summary", "crowd_curve", "best_time", "forecast"]
            },
            "photography": {
                "type": "OBJECT",
                "properties": {
                    "guide": string,
                    "settings": {
                        "type": "OBJECT",
                        "properties": {
                            "iso": string,
                            "shutter_speed": string,
                            "aperture": string,
                            "notes": string
                        },
                        "required": ["iso", "shutter_speed", "aperture"]
                    }
                },
                "required": ["guide", "settings"]
            },
            "trip_guide": {
                "type": "OBJECT",
                "properties": {
                    "transport": string,
                    "tips": strings,
                    "packing": strings,
                    "scam_warnings": string
                },
                "required": ["transport", "tips", "packing", "scam_warnings"]
            }
        },
        "required": [
            "confidence", "overview", "disaster_profile", "safety_measures",
            "itinerary", "weather", "photography", "trip_guide"
        ]
    })
}

/// Response schema for the hidden spots list
pub fn hidden_gems_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "description": { "type": "STRING" },
                "location_hint": { "type": "STRING" }
            },
            "required": ["name", "description", "location_hint"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_prompt_embeds_aspect_hint() {
        let prompt = reference_image_prompt("Lisbon", AspectRatio::Portrait);
        assert!(prompt.contains("Lisbon"));
        assert!(prompt.contains("9:16"));
    }

    #[test]
    fn test_plan_prompt_mentions_twelve_months() {
        let prompt = travel_plan_prompt("Kyoto, Japan");
        assert!(prompt.contains("\"Kyoto, Japan\""));
        assert!(prompt.contains("EXACTLY 12"));
    }

    #[test]
    fn test_preview_styles_are_distinct() {
        assert_ne!(PREVIEW_STYLES[0], PREVIEW_STYLES[1]);
        assert_ne!(PREVIEW_STYLES[1], PREVIEW_STYLES[2]);
        assert!(PREVIEW_STYLES[2].contains("drone"));
    }

    #[test]
    fn test_plan_schema_requires_every_section() {
        let schema = travel_plan_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 8);
    }
}
