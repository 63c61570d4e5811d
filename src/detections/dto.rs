use serde::{Deserialize, Deserializer};

/// Request body for `POST /detections`. Every key is required; `user_id` may be `null`.
#[derive(Debug, Deserialize)]
pub struct CreateDetectionRequest {
    #[serde(deserialize_with = "nullable")]
    pub user_id: Option<i64>,
    pub object_type: String,
    pub image_url: String,
}

// Present `null` is `None`; an absent key stays a missing-field error.
fn nullable<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer)
}
