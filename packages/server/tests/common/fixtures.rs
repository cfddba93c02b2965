//! Test fixtures: sample uploads and canned model answers.

use grow_advisor::domains::products::ProductCatalog;
use serde_json::{json, Value};

/// Three readings from a vegetation room running a little dry.
pub const VEG_CSV: &str = "timestamp,temperature,humidity,vpd\n\
2024-01-01 08:00,75.2,52,1.35\n\
2024-01-01 12:00,79.8,48,1.62\n\
2024-01-01 16:00,77.1,50,1.48\n";

/// Header row only.
pub const HEADER_ONLY_CSV: &str = "timestamp,temperature,humidity\n";

/// Free-form advice as the first pass would return it.
pub const FREEFORM_ADVICE: &str = "Humidity is below the 55-70% target for vegetation. \
Add a humidifier and lower the daytime temperature slightly.";

/// A structured answer that passes every rule.
pub fn valid_response_json() -> Value {
    json!({
        "summary": "Humidity runs below target for vegetation and VPD is high.",
        "recommendations": [
            {
                "title": "Add a Humidifier",
                "description": "Raise relative humidity into the 55-70% band.",
                "priority": "high",
                "product": {
                    "name": "AC Infinity CLOUDFORGE T7",
                    "url": "https://acinfinity.com/humidifier-t7",
                    "price_range": "$100-$130"
                }
            },
            {
                "title": "Lower Daytime Temperature",
                "description": "Keep the canopy closer to 75 degrees F.",
                "priority": "medium",
                "product": null
            }
        ]
    })
}

/// Structurally valid but no recommendation carries a product.
pub fn productless_response_json() -> Value {
    json!({
        "summary": "Conditions are close to target.",
        "recommendations": [
            {"title": "Check Sensors", "description": "Calibrate the hygrometer.", "priority": "low", "product": null},
            {"title": "Keep Logging", "description": "Collect another week of data.", "priority": "low", "product": null}
        ]
    })
}

pub fn sample_catalog() -> ProductCatalog {
    ProductCatalog::from_text(
        "AC Infinity CLOUDFORGE T7 humidifier - https://acinfinity.com/humidifier-t7\n\
         Inkbird IHC200 controller - https://inkbird.com/ihc200\n",
    )
}
