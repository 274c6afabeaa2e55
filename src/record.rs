//! Complaint records: JSONL wire shape and the immutable engine record

use crate::error::StreamError;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One complaint as delivered by a RecordStream
///
/// Only `timestamp`, `reporter_id` and the four optional grouping fields take
/// part in aggregation. Everything else is payload for the CSV exports.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplaintRecord {
    pub timestamp: DateTime<Utc>,
    pub reporter_id: String,

    pub location_city: Option<String>,
    pub location_zip: Option<String>,
    pub aircraft_airline_code: Option<String>,
    pub aircraft_equipment_type: Option<String>,

    // Reporter profile
    pub caller_code: String,
    pub full_name: String,
    pub address: String,
    pub home_lat: f64,
    pub home_long: f64,
    pub auto_submit: bool,

    // Complaint body
    pub loudness: i32,
    pub used_speedbrakes: bool,
    pub activity_disturbed: String,
    pub notes: String,

    // Flight telemetry
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub speed_knots: f64,
    pub altitude_feet: f64,
    pub aircraft_lat: f64,
    pub aircraft_long: f64,
    pub registration: String,
    pub callsign: String,
    pub vertical_speed_fpm: f64,
    pub dist2_km: f64,
    pub dist3_km: f64,
}

impl ComplaintRecord {
    /// Minimal record: a timestamp and a reporter, no optional fields
    pub fn new(timestamp: DateTime<Utc>, reporter_id: impl Into<String>) -> Self {
        Self {
            timestamp,
            reporter_id: reporter_id.into(),
            location_city: None,
            location_zip: None,
            aircraft_airline_code: None,
            aircraft_equipment_type: None,
            caller_code: String::new(),
            full_name: String::new(),
            address: String::new(),
            home_lat: 0.0,
            home_long: 0.0,
            auto_submit: false,
            loudness: 0,
            used_speedbrakes: false,
            activity_disturbed: String::new(),
            notes: String::new(),
            flight_number: String::new(),
            origin: String::new(),
            destination: String::new(),
            speed_knots: 0.0,
            altitude_feet: 0.0,
            aircraft_lat: 0.0,
            aircraft_long: 0.0,
            registration: String::new(),
            callsign: String::new(),
            vertical_speed_fpm: 0.0,
            dist2_km: 0.0,
            dist3_km: 0.0,
        }
    }

    pub fn city(&self) -> Option<&str> {
        non_empty(&self.location_city)
    }

    pub fn zip(&self) -> Option<&str> {
        non_empty(&self.location_zip)
    }

    pub fn airline(&self) -> Option<&str> {
        non_empty(&self.aircraft_airline_code)
    }

    pub fn equipment(&self) -> Option<&str> {
        non_empty(&self.aircraft_equipment_type)
    }
}

/// Empty strings count as absent
fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// JSONL line shape; every field but the timestamp defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawComplaint {
    pub timestamp: Option<i64>,
    pub reporter_id: String,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub airline_code: Option<String>,
    pub equipment_type: Option<String>,
    pub caller_code: String,
    pub full_name: String,
    pub address: String,
    pub home_lat: f64,
    pub home_long: f64,
    pub auto_submit: bool,
    pub loudness: i32,
    pub speedbrakes: bool,
    pub activity: String,
    pub notes: String,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub speed_knots: f64,
    pub altitude_feet: f64,
    pub lat: f64,
    pub long: f64,
    pub registration: String,
    pub callsign: String,
    pub vertical_speed_fpm: f64,
    pub dist2_km: f64,
    pub dist3_km: f64,
}

impl RawComplaint {
    /// Parse a raw complaint from a JSONL line
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Convert into an engine record; `line` is only used for error reporting
    pub fn into_record(self, line: usize) -> Result<ComplaintRecord, StreamError> {
        let timestamp = self
            .timestamp
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .ok_or(StreamError::MissingTimestamp { line })?;

        Ok(ComplaintRecord {
            timestamp,
            reporter_id: self.reporter_id,
            location_city: self.city,
            location_zip: self.zip,
            aircraft_airline_code: self.airline_code,
            aircraft_equipment_type: self.equipment_type,
            caller_code: self.caller_code,
            full_name: self.full_name,
            address: self.address,
            home_lat: self.home_lat,
            home_long: self.home_long,
            auto_submit: self.auto_submit,
            loudness: self.loudness,
            used_speedbrakes: self.speedbrakes,
            activity_disturbed: self.activity,
            notes: self.notes,
            flight_number: self.flight_number,
            origin: self.origin,
            destination: self.destination,
            speed_knots: self.speed_knots,
            altitude_feet: self.altitude_feet,
            aircraft_lat: self.lat,
            aircraft_long: self.long,
            registration: self.registration,
            callsign: self.callsign,
            vertical_speed_fpm: self.vertical_speed_fpm,
            dist2_km: self.dist2_km,
            dist3_km: self.dist3_km,
        })
    }
}
