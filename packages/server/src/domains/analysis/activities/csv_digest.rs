//! Flattening of uploaded CSV readings into a textual digest for prompting.
//!
//! Purely textual: values are never parsed as numbers or converted.

use csv::ReaderBuilder;
use tracing::{debug, warn};

/// Digest returned when the upload has no data rows.
pub const NO_DATA_SENTINEL: &str = "No data found in CSV file.";

/// One CSV row as ordered `(header, value)` pairs.
///
/// Sparse rows are normal: ragged rows simply carry fewer pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentalReading {
    fields: Vec<(String, String)>,
}

impl EnvironmentalReading {
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// First non-empty value recorded under `header`.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(h, v)| h == header && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }

    /// `header: value` pairs joined by commas, empty values skipped.
    pub fn render(&self) -> String {
        self.fields()
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(h, v)| format!("{}: {}", h, v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Parsed upload: header row plus data rows in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub readings: Vec<EnvironmentalReading>,
}

impl ParsedCsv {
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Render the digest embedded in the user prompt.
    pub fn digest(&self) -> String {
        if self.readings.is_empty() {
            return NO_DATA_SENTINEL.to_string();
        }

        let mut lines = Vec::with_capacity(self.readings.len() + 3);
        lines.push(format!(
            "Environmental data ({} readings):",
            self.readings.len()
        ));
        lines.push(format!("\nColumn headers: {}", self.headers.join(", ")));
        lines.push("\nData:".to_string());
        for (i, reading) in self.readings.iter().enumerate() {
            lines.push(format!("Reading {}: {}", i + 1, reading.render()));
        }
        lines.join("\n")
    }
}

/// Parse CSV text using the first row as the header.
///
/// Never fails: unreadable records are skipped, missing trailing fields are
/// treated as absent and surplus fields beyond the header are dropped.
pub fn parse_csv(text: &str) -> ParsedCsv {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(record) => record.iter().map(str::to_string).collect(),
        Err(e) => {
            warn!(error = %e, "Could not read CSV header row");
            return ParsedCsv::default();
        }
    };

    let mut readings = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(row = line + 1, error = %e, "Skipping unreadable CSV row");
                continue;
            }
        };
        if record.len() > headers.len() {
            debug!(
                row = line + 1,
                extra = record.len() - headers.len(),
                "Dropping fields beyond the header row"
            );
        }
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        readings.push(EnvironmentalReading { fields });
    }

    ParsedCsv { headers, readings }
}

/// Digest of raw CSV text; [`NO_DATA_SENTINEL`] when there are no data rows.
pub fn summarize_csv(text: &str) -> String {
    parse_csv(text).digest()
}
