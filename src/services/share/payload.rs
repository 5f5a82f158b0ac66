use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::cipher::{obfuscate, reveal};
use super::ShareError;
use crate::models::recurrence::RepeatFrequency;
use crate::models::shared_event::SharedEvent;
use crate::utils::date::{format_date, parse_date};
use crate::utils::time::ClockTime;

/// Short-key JSON form stored behind a short link.
#[derive(Debug, Serialize, Deserialize)]
struct CompactEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    t: String,
    d: String,
    st: String,
    et: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    r: Option<String>,
    #[serde(default)]
    a: bool,
}

/// Encode an event into the obfuscated token kept in share storage.
pub fn encode_payload(event: &SharedEvent) -> Result<String, ShareError> {
    let compact = CompactEvent {
        id: event.id.clone(),
        t: event.title.clone(),
        d: format_date(event.date),
        st: event.start_time.to_string(),
        et: event.end_time.to_string(),
        cid: event.calendar_id.clone(),
        desc: event.description.clone().filter(|d| !d.is_empty()),
        c: event.color.clone().filter(|c| !c.is_empty()),
        r: Some(event.repeat.as_str().to_string()),
        a: event.all_day,
    };
    let json = serde_json::to_string(&compact)
        .map_err(|e| ShareError::InvalidPayload(e.to_string()))?;
    Ok(obfuscate(&json))
}

/// Decode a token produced by [`encode_payload`].
pub fn decode_payload(token: &str) -> Result<SharedEvent, ShareError> {
    let json = reveal(token)?;
    let compact: CompactEvent =
        serde_json::from_str(&json).map_err(|e| ShareError::InvalidPayload(e.to_string()))?;

    build(SharedFields {
        id: compact.id,
        title: compact.t,
        date: compact.d,
        start_time: compact.st,
        end_time: compact.et,
        calendar_id: compact.cid,
        description: compact.desc,
        color: compact.c,
        repeat: compact.r,
        all_day: compact.a,
    })
}

/// Parse the `share` parameter of an old-style link: base64 of a query string.
pub fn decode_legacy(param: &str) -> Result<SharedEvent, ShareError> {
    let bytes = STANDARD
        .decode(param.trim())
        .map_err(|e| ShareError::Decode(e.to_string()))?;
    let query = String::from_utf8(bytes).map_err(|e| ShareError::Decode(e.to_string()))?;

    let mut fields = SharedFields::default();
    for (key, value) in query_pairs(&query)? {
        match key.as_str() {
            "eventId" => fields.id = Some(value),
            "title" => fields.title = value,
            "date" => fields.date = value,
            "startTime" => fields.start_time = value,
            "endTime" => fields.end_time = value,
            "calendarId" => fields.calendar_id = Some(value),
            "description" => fields.description = Some(value),
            "color" => fields.color = Some(value),
            "repeat" => fields.repeat = Some(value),
            "allDay" => fields.all_day = value == "true",
            _ => {}
        }
    }

    build(fields)
}

/// `key=value` pairs of a form-encoded query string, `+` read as a space.
pub(crate) fn query_pairs(query: &str) -> Result<Vec<(String, String)>, ShareError> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            Ok((form_decode(key)?, form_decode(value)?))
        })
        .collect()
}

fn form_decode(text: &str) -> Result<String, ShareError> {
    urlencoding::decode(&text.replace('+', " "))
        .map(|value| value.into_owned())
        .map_err(|e| ShareError::Decode(e.to_string()))
}

#[derive(Debug, Default)]
struct SharedFields {
    id: Option<String>,
    title: String,
    date: String,
    start_time: String,
    end_time: String,
    calendar_id: Option<String>,
    description: Option<String>,
    color: Option<String>,
    repeat: Option<String>,
    all_day: bool,
}

fn build(fields: SharedFields) -> Result<SharedEvent, ShareError> {
    let invalid = ShareError::InvalidPayload;

    if fields.title.trim().is_empty() {
        return Err(invalid("shared event has no title".to_string()));
    }
    let date = parse_date(&fields.date).map_err(|e| invalid(e.to_string()))?;
    let start_time = fields
        .start_time
        .parse::<ClockTime>()
        .map_err(|e| invalid(e.to_string()))?;
    let end_time = fields
        .end_time
        .parse::<ClockTime>()
        .map_err(|e| invalid(e.to_string()))?;
    let repeat = match fields.repeat {
        Some(raw) => raw.parse::<RepeatFrequency>().map_err(invalid)?,
        None => RepeatFrequency::None,
    };

    Ok(SharedEvent {
        id: fields.id.filter(|id| !id.is_empty()),
        title: fields.title,
        date,
        start_time,
        end_time,
        calendar_id: fields.calendar_id.filter(|id| !id.is_empty()),
        description: fields.description.filter(|d| !d.is_empty()),
        color: fields.color.filter(|c| !c.is_empty()),
        repeat,
        all_day: fields.all_day,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn shared() -> SharedEvent {
        SharedEvent {
            id: Some("evt-1".to_string()),
            title: "Café & cake".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            start_time: "15:00".parse().unwrap(),
            end_time: "16:30".parse().unwrap(),
            calendar_id: Some("cal-1".to_string()),
            description: None,
            color: Some("#F59E0B".to_string()),
            repeat: RepeatFrequency::Weekly,
            all_day: false,
        }
    }

    #[test]
    fn test_payload_round_trip() {
        let token = encode_payload(&shared()).unwrap();
        assert_eq!(decode_payload(&token).unwrap(), shared());
    }

    #[test]
    fn test_compact_json_uses_short_keys() {
        let token = encode_payload(&shared()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&reveal(&token).unwrap()).unwrap();

        assert_eq!(json["t"], "Café & cake");
        assert_eq!(json["d"], "2025-03-14");
        assert_eq!(json["st"], "15:00");
        assert_eq!(json["r"], "weekly");
        assert_eq!(json["a"], false);
        assert!(json.get("desc").is_none());
    }

    #[test]
    fn test_missing_optional_keys_default() {
        let token = obfuscate(r#"{"t":"Call","d":"2025-01-02","st":"09:00","et":"09:15"}"#);
        let event = decode_payload(&token).unwrap();
        assert_eq!(event.repeat, RepeatFrequency::None);
        assert!(event.id.is_none());
        assert!(event.description.is_none());
        assert!(!event.all_day);
    }

    #[test]
    fn test_empty_repeat_means_none() {
        let token = obfuscate(r#"{"t":"Call","d":"2025-01-02","st":"09:00","et":"09:15","r":""}"#);
        assert_eq!(decode_payload(&token).unwrap().repeat, RepeatFrequency::None);
    }

    #[test]
    fn test_payload_with_bad_time_is_rejected() {
        let token = obfuscate(r#"{"t":"Call","d":"2025-01-02","st":"9:00","et":"09:15"}"#);
        assert!(matches!(decode_payload(&token), Err(ShareError::InvalidPayload(_))));
    }

    #[test]
    fn test_decode_legacy_query_string() {
        let query = "eventId=abc&title=Team+sync&date=2024-02-10&startTime=10%3A00\
                     &endTime=11:00&calendarId=cal-9&color=%233B82F6&allDay=true";
        let param = STANDARD.encode(query);

        let event = decode_legacy(&param).unwrap();
        assert_eq!(event.id.as_deref(), Some("abc"));
        assert_eq!(event.title, "Team sync");
        assert_eq!(event.start_time.to_string(), "10:00");
        assert_eq!(event.color.as_deref(), Some("#3B82F6"));
        assert_eq!(event.repeat, RepeatFrequency::None);
        assert!(event.all_day);
    }

    #[test]
    fn test_decode_legacy_without_title_fails() {
        let param = STANDARD.encode("date=2024-02-10&startTime=10:00&endTime=11:00");
        assert!(decode_legacy(&param).is_err());
    }
}
