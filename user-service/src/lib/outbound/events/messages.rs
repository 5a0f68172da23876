use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::events::UserChangedEvent;
use crate::domain::user::events::UserEventKind;

/// Serializable envelope for a user-changed event.
///
/// Wire representation handed to the message bus: the record key is the user
/// id, the value is this payload as JSON. `oldProfilePictureUrl` only appears
/// on picture-change updates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserChangedMessage {
    pub id: String,
    pub event_type: UserEventType,
    pub username: String,
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_profile_picture_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserEventType {
    Created,
    Updated,
}

impl From<UserEventKind> for UserEventType {
    fn from(kind: UserEventKind) -> Self {
        match kind {
            UserEventKind::Created => UserEventType::Created,
            UserEventKind::Updated => UserEventType::Updated,
        }
    }
}

impl From<&UserChangedEvent> for UserChangedMessage {
    fn from(event: &UserChangedEvent) -> Self {
        Self {
            id: event.user_id.clone(),
            event_type: event.kind.into(),
            username: event.username.clone(),
            email: event.email.clone(),
            display_name: event.display_name.clone(),
            profile_picture_url: event.profile_picture_url.clone(),
            old_profile_picture_url: event.old_profile_picture_url.clone(),
        }
    }
}
