use serde::{Deserialize, Deserializer, Serialize};

/// A candidate as reported by the server. `id` is server-assigned; before a
/// create round-trips the record only exists as a [`CandidateDraft`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: u32,
    pub name: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub photo_path: String,
    #[serde(default)]
    pub votes: u32,
}

/// Create/update payload for `POST`/`PUT /candidates`. An empty `photo_path`
/// means "no photo recorded"; the rendering side falls back to the
/// placeholder asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDraft {
    pub name: String,
    pub description: String,
    pub photo_path: String,
}

impl CandidateDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            photo_path: String::new(),
        }
    }

    pub fn with_photo(mut self, photo_path: impl Into<String>) -> Self {
        self.photo_path = photo_path.into();
        self
    }
}

/// Payload of `POST /upload/photo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoUpload {
    pub photo_path: String,
}

// The backing columns are nullable, so `description`/`photo_path` arrive as
// either a string, null, or not at all.
fn null_to_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::Candidate;

    #[test]
    fn tolerates_null_optionals_and_extra_fields() {
        let c: Candidate = serde_json::from_str(
            r#"{
                "id": 7,
                "name": "Ada",
                "description": null,
                "photo_path": null,
                "votes": 3,
                "photo_url": "/uploads/photos/ada.jpg",
                "created_at": "2025-01-01T00:00:00"
            }"#,
        )
        .unwrap();
        assert_eq!(c.id, 7);
        assert_eq!(c.description, "");
        assert_eq!(c.photo_path, "");
        assert_eq!(c.votes, 3);
    }

    #[test]
    fn missing_votes_defaults_to_zero() {
        let c: Candidate = serde_json::from_str(r#"{"id": 1, "name": "Bo"}"#).unwrap();
        assert_eq!(c.votes, 0);
        assert_eq!(c.photo_path, "");
    }
}
