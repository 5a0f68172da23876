use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::events::UserChangedEvent;
use crate::domain::user::models::Profile;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::EventPublisher;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Stateless between calls; every mutation persists through the repository
/// first and then emits a change event. Event publishing is fire-and-forget
/// relative to the caller: a broker failure is logged and never rolls back
/// the committed store write.
pub struct UserService<UR, EP>
where
    UR: UserRepository,
    EP: EventPublisher,
{
    repository: Arc<UR>,
    event_publisher: Arc<EP>,
    password_hasher: auth::PasswordHasher,
}

impl<UR, EP> UserService<UR, EP>
where
    UR: UserRepository,
    EP: EventPublisher,
{
    /// Create a new user service with injected dependencies.
    pub fn new(repository: Arc<UR>, event_publisher: Arc<EP>) -> Self {
        Self {
            repository,
            event_publisher,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    async fn emit(&self, event: UserChangedEvent) {
        if let Err(e) = self.event_publisher.publish_user_changed(&event).await {
            tracing::error!(
                user_id = %event.user_id,
                event_id = %event.event_id,
                "Failed to publish user-changed event: {}",
                e
            );
        }
    }
}

#[async_trait]
impl<UR, EP> UserServicePort for UserService<UR, EP>
where
    UR: UserRepository,
    EP: EventPublisher,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        tracing::info!(username = %command.username, "registering user");

        // Username is checked before email; the checks are independent.
        if self
            .repository
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            tracing::warn!(username = %command.username, "username already exists");
            return Err(UserError::UsernameAlreadyExists(
                command.username.to_string(),
            ));
        }

        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            tracing::warn!(email = %command.email.as_str(), "email already exists");
            return Err(UserError::EmailAlreadyExists(
                command.email.as_str().to_string(),
            ));
        }

        let password_hash = self
            .password_hasher
            .hash(&command.password)
            .map_err(|e| UserError::Unknown(format!("Password hashing failed: {}", e)))?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            active: true,
            roles: HashSet::from([Role::User]),
            profile: Profile::new(command.display_name),
            created_at: Utc::now(),
        };

        // The repository maps unique-constraint violations to the same
        // conflict errors, so a concurrent duplicate registration loses here.
        let created_user = self.repository.create(user).await?;

        self.emit(UserChangedEvent::created(&created_user)).await;

        Ok(created_user)
    }

    async fn find_by_username(&self, username: &Username) -> Result<User, UserError> {
        self.repository
            .find_by_username(username)
            .await?
            .ok_or(UserError::NotFoundByUsername(username.to_string()))
    }

    async fn find_all(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_all().await
    }

    async fn find_by_usernames(&self, usernames: &[Username]) -> Result<Vec<User>, UserError> {
        self.repository.find_by_usernames(usernames).await
    }

    async fn update_profile_picture(
        &self,
        id: &UserId,
        picture_url: String,
    ) -> Result<User, UserError> {
        tracing::info!(user_id = %id, "updating profile picture");

        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        let old_picture_url = user.profile.profile_picture_url.take();
        user.profile.profile_picture_url = Some(picture_url);

        let updated_user = self.repository.update(user).await?;

        self.emit(UserChangedEvent::picture_updated(
            &updated_user,
            old_picture_url,
        ))
        .await;

        Ok(updated_user)
    }
}
