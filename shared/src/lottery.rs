use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One past draw from `/lottery/history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotteryRecord {
    pub round: u32,
    #[serde(default)]
    pub prize_name: Option<String>,
    #[serde(default)]
    pub candidate_name: Option<String>,
    #[serde(default)]
    pub drawn_at: Option<String>,
}

impl LotteryRecord {
    /// Draw time parsed for display, when the server sent one and it is
    /// well-formed.
    pub fn drawn_at_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.drawn_at.as_deref()?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        // Bare ISO timestamps without an offset are emitted by the server's
        // ORM layer; treat them as UTC.
        chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Draw parameters saved through `POST /lottery/settings`. The draw itself
/// runs server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotterySettings {
    pub count: u32,
    pub prize_name: String,
    pub exclude_winners: bool,
    pub rounds: u32,
}

/// Payload of `GET /lottery/available`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvailableSlots {
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::LotteryRecord;

    #[test]
    fn parses_orm_timestamp_as_utc() {
        let record: LotteryRecord = serde_json::from_str(
            r#"{"round": 1, "prize_name": "Grand", "candidate_name": "Ada",
                "drawn_at": "2025-06-01T12:30:00.125000"}"#,
        )
        .unwrap();
        let dt = record.drawn_at_utc().unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-06-01T12:30:00.125+00:00");
    }

    #[test]
    fn missing_timestamp_yields_none() {
        let record: LotteryRecord =
            serde_json::from_str(r#"{"round": 2, "prize_name": null}"#).unwrap();
        assert!(record.drawn_at_utc().is_none());
        assert!(record.candidate_name.is_none());
    }
}
