//! Normalizes raw ACLED records into [`ConflictEvent`] values.
//!
//! Records with a missing or malformed `event_date` are kept with null
//! date fields; they are only excluded later by date-window filtering.
//! Records with missing or out-of-range coordinates are dropped outright
//! rather than being plotted at (0,0).

use conflict_map_event_models::{ConflictEvent, GeoPrecision};

use crate::parsing::{json_f64, json_str, json_u32, parse_event_date};
use crate::{DateWindow, SourceError};

/// Normalizes a full ACLED API payload.
///
/// Extracts the `data` records container and normalizes each record.
/// Input order is preserved; no deduplication by event id is performed.
///
/// # Errors
///
/// Returns [`SourceError::MalformedResponse`] if the payload has no `data`
/// array.
pub fn normalize(payload: &serde_json::Value) -> Result<Vec<ConflictEvent>, SourceError> {
    let records = payload
        .get("data")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| SourceError::MalformedResponse {
            message: "no `data` array in ACLED response".to_string(),
        })?;

    Ok(normalize_records(records))
}

/// Normalizes a list of raw ACLED records, skipping unusable ones.
#[must_use]
pub fn normalize_records(records: &[serde_json::Value]) -> Vec<ConflictEvent> {
    let mut events = Vec::with_capacity(records.len());
    let mut dropped = 0usize;

    for record in records {
        match normalize_record(record) {
            Some(event) => events.push(event),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        log::warn!(
            "Dropped {dropped} of {} ACLED records (missing id or unusable coordinates)",
            records.len()
        );
    }

    events
}

/// Normalizes a single raw record.
///
/// Returns `None` when the record has no event id, or when its
/// coordinates are missing or outside the WGS84 value range.
fn normalize_record(record: &serde_json::Value) -> Option<ConflictEvent> {
    let id = json_str(record.get("event_id_cnty"))?;

    let latitude = json_f64(record.get("latitude"))?;
    let longitude = json_f64(record.get("longitude"))?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        log::warn!("Event {id}: coordinates ({latitude}, {longitude}) out of range, dropping");
        return None;
    }

    let geo_precision = json_u32(record.get("geo_precision"))
        .and_then(|v| u8::try_from(v).ok())
        .and_then(|v| GeoPrecision::from_value(v).ok());

    let mut event = ConflictEvent {
        id,
        event_date: None,
        year: None,
        month: None,
        day: None,
        event_type: json_str(record.get("event_type")),
        actor1: json_str(record.get("actor1")),
        actor2: json_str(record.get("actor2")),
        interaction: json_str(record.get("interaction")),
        country: json_str(record.get("country")).unwrap_or_default(),
        iso3: json_str(record.get("iso3")).unwrap_or_default(),
        admin1: json_str(record.get("admin1")),
        admin2: json_str(record.get("admin2")),
        admin3: json_str(record.get("admin3")),
        location: json_str(record.get("location")),
        fatalities: json_u32(record.get("fatalities")).unwrap_or(0),
        latitude,
        longitude,
        geo_precision,
    };

    if let Some(date) = json_str(record.get("event_date"))
        .as_deref()
        .and_then(parse_event_date)
    {
        event.set_event_date(date);
    }

    Some(event)
}

/// Keeps only events whose parsed date falls inside `window`.
///
/// Events with no parseable date are excluded here, since they cannot be
/// placed in the requested period.
#[must_use]
pub fn filter_window(events: Vec<ConflictEvent>, window: &DateWindow) -> Vec<ConflictEvent> {
    events
        .into_iter()
        .filter(|e| e.event_date.is_some_and(|date| window.contains(date)))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn raw_record(id: &str, date: &str, lat: &str, lon: &str) -> serde_json::Value {
        serde_json::json!({
            "event_id_cnty": id,
            "event_date": date,
            "event_type": "Battles",
            "actor1": "Military Forces",
            "actor2": "",
            "interaction": "10",
            "country": "Sudan",
            "iso3": "SDN",
            "admin1": "Khartoum",
            "location": "Khartoum",
            "fatalities": "3",
            "latitude": lat,
            "longitude": lon,
            "geo_precision": "1",
        })
    }

    #[test]
    fn missing_data_container_is_malformed() {
        let payload = serde_json::json!({ "success": true, "count": 0 });
        let err = normalize(&payload).unwrap_err();
        assert!(matches!(err, SourceError::MalformedResponse { .. }));
    }

    #[test]
    fn normalizes_typical_record() {
        let payload = serde_json::json!({
            "data": [raw_record("SDN1001", "2025-02-10", "15.5532", "32.5324")]
        });

        let events = normalize(&payload).unwrap();
        assert_eq!(events.len(), 1);

        let event = &events[0];
        assert_eq!(event.id, "SDN1001");
        assert_eq!(
            event.event_date,
            Some(NaiveDate::from_ymd_opt(2025, 2, 10).unwrap())
        );
        assert_eq!(event.year, Some(2025));
        assert_eq!(event.fatalities, 3);
        assert_eq!(event.geo_precision, Some(GeoPrecision::Exact));
        assert_eq!(event.actor2, None);
    }

    #[test]
    fn malformed_date_keeps_record_with_null_date_fields() {
        let payload = serde_json::json!({
            "data": [raw_record("SDN1002", "10-02-2025", "15.0", "32.0")]
        });

        let events = normalize(&payload).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_date, None);
        assert_eq!(events[0].year, None);
        assert_eq!(events[0].month, None);
    }

    #[test]
    fn missing_coordinates_drop_record() {
        let mut record = raw_record("SDN1003", "2025-02-10", "15.0", "32.0");
        record.as_object_mut().unwrap().remove("latitude");
        let payload = serde_json::json!({ "data": [record] });

        assert!(normalize(&payload).unwrap().is_empty());
    }

    #[test]
    fn out_of_range_coordinates_drop_record() {
        let payload = serde_json::json!({
            "data": [
                raw_record("SDN1004", "2025-02-10", "95.0", "32.0"),
                raw_record("SDN1005", "2025-02-10", "15.0", "-181.0"),
            ]
        });

        assert!(normalize(&payload).unwrap().is_empty());
    }

    #[test]
    fn output_preserves_input_order_and_never_grows() {
        let payload = serde_json::json!({
            "data": [
                raw_record("SDN2", "2025-02-10", "15.0", "32.0"),
                raw_record("SDN1", "2025-02-11", "15.1", "32.1"),
                raw_record("SDN3", "2025-02-12", "15.2", "32.2"),
            ]
        });

        let events = normalize(&payload).unwrap();
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["SDN2", "SDN1", "SDN3"]);
        assert!(events.len() <= 3);
    }

    #[test]
    fn missing_fatalities_defaults_to_zero() {
        let mut record = raw_record("SDN1006", "2025-02-10", "15.0", "32.0");
        record.as_object_mut().unwrap().remove("fatalities");
        let payload = serde_json::json!({ "data": [record] });

        let events = normalize(&payload).unwrap();
        assert_eq!(events[0].fatalities, 0);
    }

    #[test]
    fn window_filter_drops_undated_and_outside_events() {
        let payload = serde_json::json!({
            "data": [
                raw_record("IN", "2025-02-10", "15.0", "32.0"),
                raw_record("OUT", "2024-02-10", "15.0", "32.0"),
                raw_record("UNDATED", "garbage", "15.0", "32.0"),
            ]
        });
        let events = normalize(&payload).unwrap();
        assert_eq!(events.len(), 3);

        let window = DateWindow {
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 5, 15).unwrap(),
        };
        let filtered = filter_window(events, &window);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "IN");
    }
}
