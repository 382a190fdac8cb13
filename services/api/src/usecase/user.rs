use anyhow::Context as _;

use crate::domain::repository::{PasswordHasher, UserDirectory};
use crate::domain::types::{NewUser, UserRecord};
use crate::error::ApiServiceError;

pub struct RegisterUserInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub abha_id: Option<String>,
}

pub struct RegisterUserUseCase<U, H>
where
    U: UserDirectory,
    H: PasswordHasher + Clone + 'static,
{
    pub users: U,
    pub hasher: H,
}

impl<U, H> RegisterUserUseCase<U, H>
where
    U: UserDirectory,
    H: PasswordHasher + Clone + 'static,
{
    /// Hash the password and create the directory entry. Every failure comes
    /// back as `RegistrationFailed`; the cause is kept for the log only.
    pub async fn execute(&self, input: RegisterUserInput) -> Result<UserRecord, ApiServiceError> {
        self.register(input)
            .await
            .map_err(ApiServiceError::RegistrationFailed)
    }

    async fn register(&self, input: RegisterUserInput) -> anyhow::Result<UserRecord> {
        // argon2 is slow on purpose; keep it off the async workers
        let hasher = self.hasher.clone();
        let password = input.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .context("password hashing task")?
            .map_err(into_anyhow)?;

        let user = self
            .users
            .create_user(NewUser {
                username: input.username,
                email: input.email,
                password_hash,
                abha_id: input.abha_id,
            })
            .await
            .map_err(into_anyhow)?;
        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }
}

fn into_anyhow(e: ApiServiceError) -> anyhow::Error {
    match e {
        ApiServiceError::Internal(inner) => inner,
        other => anyhow::Error::new(other),
    }
}
