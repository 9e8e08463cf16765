use actix_web::web;
use std::sync::Arc;
use tokio::sync::OnceCell;
use uuid::Uuid;

use super::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::{NewUser, User};
use crate::store::{StoreError, UserRepository};

/// Owns account creation and password checks.
///
/// bcrypt runs on actix's blocking pool so a slow hash never stalls a worker.
#[derive(Clone)]
pub struct CredentialStore {
    users: Arc<dyn UserRepository>,
    bcrypt_cost: u32,
    // checked against when the email is unknown, so both login failures cost a bcrypt run
    dummy_hash: Arc<OnceCell<String>>,
}

impl CredentialStore {
    pub fn new(users: Arc<dyn UserRepository>, bcrypt_cost: u32) -> Self {
        Self {
            users,
            bcrypt_cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Creates an account and returns its id.
    ///
    /// Fails with a 400 if the email is already registered; nothing is written then.
    pub async fn register(
        &self,
        name: String,
        email: String,
        password: String,
        image: Option<String>,
    ) -> Result<Uuid, AppError> {
        if self.users.find_user_by_email(&email).await?.is_some() {
            return Err(duplicate_email());
        }

        let cost = self.bcrypt_cost;
        let password_hash = web::block(move || hash_password(&password, cost))
            .await
            .map_err(|e| AppError::InternalServerError(format!("Hashing task failed: {}", e)))??;

        // the unique index still decides when two signups race past the lookup
        let user = self
            .users
            .insert_user(NewUser {
                name,
                email,
                password_hash,
                image,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => duplicate_email(),
                other => other.into(),
            })?;

        Ok(user.id)
    }

    /// Returns the user if `password` matches the stored hash for `email`.
    ///
    /// Unknown email and wrong password produce the same `InvalidCredentials` error.
    pub async fn verify(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = self.users.find_user_by_email(email).await?;
        let stored_hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.dummy_hash().await?,
        };

        let password = password.to_owned();
        let matches = web::block(move || verify_password(&password, &stored_hash))
            .await
            .map_err(|e| AppError::InternalServerError(format!("Verify task failed: {}", e)))??;

        match user {
            Some(user) if matches => Ok(user),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    /// Throwaway hash at the configured cost, computed once on the first unknown email.
    async fn dummy_hash(&self) -> Result<String, AppError> {
        let cost = self.bcrypt_cost;
        let hash = self
            .dummy_hash
            .get_or_try_init(|| async move {
                let secret = Uuid::new_v4().to_string();
                web::block(move || hash_password(&secret, cost))
                    .await
                    .map_err(|e| {
                        AppError::InternalServerError(format!("Hashing task failed: {}", e))
                    })?
            })
            .await?;
        Ok(hash.clone())
    }
}

fn duplicate_email() -> AppError {
    AppError::BadRequest("Email already registered".into())
}
