use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Trip details posted by the itinerary form.
///
/// Every field is optional on the wire so that a missing required field
/// surfaces as a validation error rather than a deserialization failure.
/// `null` is accepted everywhere and means "absent".
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
#[ts(export)]
pub struct TripRecord {
    pub customer_name: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub adults_count: Option<u32>,
    pub children_count: Option<u32>,
    pub duration: Option<u32>,
    pub trip_id: Option<String>,
    pub total_price: Option<f64>,
    pub inclusions: Option<String>,
    pub exclusions: Option<String>,
    pub additional_notes: Option<String>,
    /// Day order is the trip's order and is preserved through rendering.
    pub daily_itinerary: Vec<DayEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
#[ts(export)]
pub struct DayEntry {
    pub day_number: u32,
    pub title: Option<String>,
    /// May contain `\n`; rendered as visual line breaks.
    pub description: Option<String>,
}

impl TripRecord {
    /// Check the two fields the itinerary cannot be built without.
    ///
    /// All missing fields are reported at once, using their wire names.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut fields = Vec::new();
        if is_blank(self.customer_name.as_deref()) {
            fields.push("customerName".to_string());
        }
        if is_blank(self.destination.as_deref()) {
            fields.push("destination".to_string());
        }
        if fields.is_empty() {
            Ok(())
        } else {
            Err(CoreError::MissingFields { fields })
        }
    }

    pub fn customer_name(&self) -> &str {
        self.customer_name.as_deref().unwrap_or_default()
    }

    pub fn destination(&self) -> &str {
        self.destination.as_deref().unwrap_or_default()
    }

    pub fn adults_count(&self) -> u32 {
        self.adults_count.unwrap_or(0)
    }

    pub fn children_count(&self) -> u32 {
        self.children_count.unwrap_or(0)
    }

    /// Attachment filename: `itinerary-<name>-<millis>.pdf`, where every run
    /// of whitespace in the customer name becomes a single `-`.
    pub fn download_filename(&self, unix_millis: i64) -> String {
        let name = dash_whitespace(self.customer_name());
        format!("itinerary-{name}-{unix_millis}.pdf")
    }
}

impl DayEntry {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Combined title + description length in UTF-16 code units, the unit
    /// the form counts in. Characters outside the BMP count twice.
    pub fn content_length(&self) -> usize {
        self.title().encode_utf16().count() + self.description().encode_utf16().count()
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn dash_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_run = false;
    for c in input.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push('-');
            }
            in_run = true;
        } else {
            // Quotes and backslashes would break the Content-Disposition value.
            if c != '"' && c != '\\' && !c.is_control() {
                out.push(c);
            }
            in_run = false;
        }
    }
    out
}
