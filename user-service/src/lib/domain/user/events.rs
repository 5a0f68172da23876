use uuid::Uuid;

use crate::domain::user::models::User;

/// Kind of change a [`UserChangedEvent`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserEventKind {
    Created,
    Updated,
}

/// Domain event published after a committed user mutation.
///
/// Built from the persisted snapshot (never the pre-persistence object, so
/// the payload always reflects durable state), immutable once constructed,
/// and emitted once per mutation. `old_profile_picture_url` is only set for
/// picture-change updates.
#[derive(Debug, Clone)]
pub struct UserChangedEvent {
    pub event_id: String,
    pub kind: UserEventKind,
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub profile_picture_url: Option<String>,
    pub old_profile_picture_url: Option<String>,
}

impl UserChangedEvent {
    /// Event for a freshly registered user.
    pub fn created(user: &User) -> Self {
        Self::from_snapshot(user, UserEventKind::Created, None)
    }

    /// Event for an updated user.
    pub fn updated(user: &User) -> Self {
        Self::from_snapshot(user, UserEventKind::Updated, None)
    }

    /// Event for a profile-picture change, carrying the replaced URL.
    pub fn picture_updated(user: &User, old_profile_picture_url: Option<String>) -> Self {
        Self::from_snapshot(user, UserEventKind::Updated, old_profile_picture_url)
    }

    fn from_snapshot(
        user: &User,
        kind: UserEventKind,
        old_profile_picture_url: Option<String>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            kind,
            user_id: user.id.to_string(),
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            display_name: user.profile.display_name.clone(),
            profile_picture_url: user.profile.profile_picture_url.clone(),
            old_profile_picture_url,
        }
    }
}
