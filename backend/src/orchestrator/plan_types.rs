//! Travel data types
//!
//! Structs mirroring the JSON the structured generation requests are
//! constrained to return, plus the small value types the orchestrators hand
//! back (images, aspect ratios, grounded text).

use serde::{Deserialize, Serialize};

/// Number of months in the crowd curve
pub const MONTHS_PER_YEAR: usize = 12;

/// Maximum crowd score
pub const MAX_CROWD_SCORE: u8 = 100;

const MONTH_NAMES: [&str; MONTHS_PER_YEAR] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

/// Resolve a month name or its three-letter abbreviation to 0..12
pub fn month_index(name: &str) -> Option<usize> {
    let name = name.trim().to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|month| *month == name || (name.len() == 3 && month.starts_with(&name)))
}

/// Full travel profile for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelPlan {
    /// Model's self-reported confidence ("High", "Medium", "Low"); untrusted text
    pub confidence: String,
    /// Free-text overview of the place
    pub overview: String,
    /// Natural hazard profile
    pub disaster_profile: DisasterProfile,
    /// Ordered safety measures
    pub safety_measures: Vec<String>,
    /// One entry per day, in order
    pub itinerary: Vec<String>,
    /// Weather and crowd information
    pub weather: WeatherInfo,
    /// Photography guide
    pub photography: PhotographyGuide,
    /// Practical trip guide
    pub trip_guide: TripGuide,
}

/// Natural hazard profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisasterProfile {
    /// E.g. "Seismic zone"
    pub zone_type: String,
    /// Text such as "7/10"
    pub risk_score: String,
    /// Free-text details
    pub details: String,
}

/// Weather block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherInfo {
    /// Free-text crowd summary
    pub crowd_summary: String,
    /// Exactly twelve entries, January to December
    pub crowd_curve: Vec<MonthlyCrowd>,
    /// Best time to visit
    pub best_time: String,
    /// Short forecast
    pub forecast: String,
}

/// Crowd score for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCrowd {
    /// Month name
    pub month: String,
    /// Crowd score in 0..=100
    pub score: u8,
}

/// Photography block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotographyGuide {
    /// Free-text guide
    pub guide: String,
    /// Suggested camera settings (free text, not validated)
    pub settings: CameraSettings,
}

/// Suggested camera settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraSettings {
    /// ISO value
    pub iso: String,
    /// Shutter speed
    pub shutter_speed: String,
    /// Aperture
    pub aperture: String,
    /// Optional notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Practical trip guide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripGuide {
    /// How to get there and around
    pub transport: String,
    /// Tips
    pub tips: Vec<String>,
    /// Packing list
    pub packing: Vec<String>,
    /// Common scams to watch for
    pub scam_warnings: String,
}

/// Interpreted confidence level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Confidence {
    High,
    Medium,
    Low,
    Unrecognized,
}

impl TravelPlan {
    /// Check the invariants the schema cannot enforce
    ///
    /// # Returns
    /// * `Ok(())` - If the crowd curve names every month once with an in-range score
    /// * `Err(String)` - Description of the first violation
    pub fn validate(&self) -> Result<(), String> {
        let curve = &self.weather.crowd_curve;
        if curve.len() != MONTHS_PER_YEAR {
            return Err(format!(
                "crowd_curve must have {} entries, got {}",
                MONTHS_PER_YEAR,
                curve.len()
            ));
        }
        if let Some(entry) = curve.iter().find(|e| e.score > MAX_CROWD_SCORE) {
            return Err(format!(
                "crowd score for {} is {} (max {})",
                entry.month, entry.score, MAX_CROWD_SCORE
            ));
        }
        let mut seen = [false; MONTHS_PER_YEAR];
        for entry in curve {
            let idx = month_index(&entry.month)
                .ok_or_else(|| format!("crowd_curve has unknown month '{}'", entry.month))?;
            if std::mem::replace(&mut seen[idx], true) {
                return Err(format!("crowd_curve repeats month '{}'", entry.month));
            }
        }
        Ok(())
    }

    /// Interpret the free-text confidence
    pub fn confidence_level(&self) -> Confidence {
        match self.confidence.trim().to_lowercase().as_str() {
            "high" => Confidence::High,
            "medium" => Confidence::Medium,
            "low" => Confidence::Low,
            _ => Confidence::Unrecognized,
        }
    }

    /// Render the plan as plain text for export
    ///
    /// This is a one-way, lossy report; nothing reads it back.
    pub fn to_report(&self, location: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!("TRAVEL PLAN: {}\n", location));
        out.push_str(&format!("Confidence: {}\n\n", self.confidence));
        out.push_str(&format!("OVERVIEW\n{}\n\n", self.overview));

        out.push_str("DISASTER PROFILE\n");
        out.push_str(&format!(
            "{} (risk {})\n{}\n\n",
            self.disaster_profile.zone_type,
            self.disaster_profile.risk_score,
            self.disaster_profile.details
        ));

        out.push_str("SAFETY MEASURES\n");
        for measure in &self.safety_measures {
            out.push_str(&format!("- {}\n", measure));
        }

        out.push_str("\nITINERARY\n");
        for (idx, day) in self.itinerary.iter().enumerate() {
            out.push_str(&format!("Day {}: {}\n", idx + 1, day));
        }

        out.push_str("\nWEATHER\n");
        out.push_str(&format!("{}\n", self.weather.crowd_summary));
        for entry in &self.weather.crowd_curve {
            out.push_str(&format!("  {:<10} {:>3}\n", entry.month, entry.score));
        }
        out.push_str(&format!("Best time: {}\n", self.weather.best_time));
        out.push_str(&format!("Forecast: {}\n", self.weather.forecast));

        let settings = &self.photography.settings;
        out.push_str("\nPHOTOGRAPHY\n");
        out.push_str(&format!("{}\n", self.photography.guide));
        out.push_str(&format!(
            "ISO {} | Shutter {} | Aperture {}\n",
            settings.iso, settings.shutter_speed, settings.aperture
        ));
        if let Some(notes) = &settings.notes {
            out.push_str(&format!("Notes: {}\n", notes));
        }

        out.push_str("\nTRIP GUIDE\n");
        out.push_str(&format!("Transport: {}\n", self.trip_guide.transport));
        out.push_str("Tips:\n");
        for tip in &self.trip_guide.tips {
            out.push_str(&format!("- {}\n", tip));
        }
        out.push_str("Packing:\n");
        for item in &self.trip_guide.packing {
            out.push_str(&format!("- {}\n", item));
        }
        out.push_str(&format!("Scam warnings: {}\n", self.trip_guide.scam_warnings));
        out
    }
}

/// A lesser-known spot near the searched location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenGem {
    /// Name, also the key of the gem's image
    pub name: String,
    /// Short description
    pub description: String,
    /// Where to find it
    pub location_hint: String,
}

/// Inline image payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    /// MIME type, e.g. "image/png"
    pub mime_type: String,
    /// Base64-encoded bytes, passed through unexamined
    pub base64: String,
}

impl ImageData {
    /// Render as a `data:` URI
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }

    /// Parse a `data:` URI, or wrap a bare base64 payload as PNG
    pub fn from_data_uri(uri: &str) -> Self {
        match uri.strip_prefix("data:").and_then(|rest| rest.split_once(";base64,")) {
            Some((mime_type, base64)) => Self {
                mime_type: mime_type.to_string(),
                base64: base64.to_string(),
            },
            None => Self {
                mime_type: "image/png".to_string(),
                base64: uri.to_string(),
            },
        }
    }
}

/// Supported video aspect ratios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 16:9
    #[default]
    Landscape,
    /// 9:16
    Portrait,
}

impl AspectRatio {
    /// Ratio string passed to the API
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }

    /// Natural-language hint embedded in prompts
    pub fn prompt_hint(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "wide landscape orientation (16:9)",
            AspectRatio::Portrait => "tall vertical portrait orientation (9:16)",
        }
    }
}

/// Text with map sources from grounding metadata
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroundedText {
    /// Generated text
    pub text: String,
    /// Map sources, in the order returned
    pub sources: Vec<MapSource>,
}

/// A map link cited by a grounded response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSource {
    /// Place title
    pub title: String,
    /// Link to the map entry
    pub uri: String,
}

/// Map-grounded orientation briefing
pub type LocationBrief = GroundedText;
