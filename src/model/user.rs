use serde::{Deserialize, Serialize};

/// The signed-in user shown in the dashboard header. Its `id` namespaces the store key.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UserProfile {
    id: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    photo: Option<String>,
}

impl UserProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, photo: Option<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            photo,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// URL of the avatar, if the identity provider supplied one.
    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref()
    }
}
