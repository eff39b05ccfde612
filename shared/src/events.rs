use serde::{Deserialize, Serialize};

/// Push notifications from the server. The admin client only ever reacts by
/// refetching; payload details ride along server-side and are not modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PushEvent {
    VoteUpdate,
    LotteryResult,
}

#[cfg(test)]
mod tests {
    use super::PushEvent;

    #[test]
    fn decodes_tagged_events() {
        let event: PushEvent = serde_json::from_str(r#"{"type": "vote_update"}"#).unwrap();
        assert_eq!(event, PushEvent::VoteUpdate);
        let event: PushEvent = serde_json::from_str(r#"{"type": "lottery_result"}"#).unwrap();
        assert_eq!(event, PushEvent::LotteryResult);
    }

    #[test]
    fn unknown_event_type_is_an_error() {
        assert!(serde_json::from_str::<PushEvent>(r#"{"type": "hotspot_up"}"#).is_err());
    }
}
