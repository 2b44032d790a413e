//! Request payloads sent to the calculation API

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::Location;

/// Body of the position, aspects and moon-phase endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// `[year, month, day]`
    pub date: [i32; 3],
    /// `[hour, minute, second]`
    pub time: [u32; 3],
    pub latitude: f64,
    pub longitude: f64,
    pub timezone_offset_hours: f64,
}

impl CalculationRequest {
    #[must_use]
    pub fn new(
        date: NaiveDate,
        time: NaiveTime,
        location: Location,
        timezone_offset_hours: f64,
    ) -> Self {
        Self {
            date: [date.year(), date.month() as i32, date.day() as i32],
            time: [time.hour(), time.minute(), time.second()],
            latitude: location.latitude,
            longitude: location.longitude,
            timezone_offset_hours,
        }
    }
}

/// Body of the transit endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitRequest {
    pub year: i32,
    pub month: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone_offset_hours: f64,
    pub planet: String,
    pub step_minutes: u32,
}

/// Body of the month moon-phases endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthPhasesRequest {
    pub year: i32,
    pub month: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_calculation_request_shape() {
        let request = CalculationRequest::new(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            Location::new(45.4642, 9.19),
            1.0,
        );

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "date": [2024, 5, 1],
                "time": [14, 30, 0],
                "latitude": 45.4642,
                "longitude": 9.19,
                "timezone_offset_hours": 1.0
            })
        );
    }

    #[test]
    fn test_transit_request_shape() {
        let request = TransitRequest {
            year: 2025,
            month: 3,
            latitude: 41.9,
            longitude: 12.5,
            timezone_offset_hours: 1.0,
            planet: "Mars".to_string(),
            step_minutes: 60,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["planet"], "Mars");
        assert_eq!(value["step_minutes"], 60);
        assert_eq!(value["month"], 3);
    }
}
