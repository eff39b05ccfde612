use serde::{Deserialize, Serialize};

/// Uniform `{success, data, message}` wrapper returned by every admin
/// endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Collapse the wrapper: `Ok(payload)` on success, the server-provided
    /// message on rejection.
    pub fn into_result(self) -> Result<Option<T>, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self.message.unwrap_or_else(|| "operation failed".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Envelope;

    #[test]
    fn success_with_payload() {
        let env: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": true, "data": [1, 2, 3]}"#).unwrap();
        assert_eq!(env.into_result().unwrap(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn success_without_payload() {
        let env: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": true, "message": "ok"}"#).unwrap();
        assert_eq!(env.into_result().unwrap(), None);
    }

    #[test]
    fn rejection_carries_server_message() {
        let env: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": false, "message": "name taken"}"#).unwrap();
        assert_eq!(env.into_result().unwrap_err(), "name taken");
    }

    #[test]
    fn rejection_without_message_gets_fallback() {
        let env: Envelope<()> = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(env.into_result().unwrap_err(), "operation failed");
    }
}
