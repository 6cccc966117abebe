//! Account creation, login and logout

use crate::client::{ApiClient, Auth, Method};
use crate::error::{NukbookError, Result};
use crate::types::{Me, TokenResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct Registration<'a> {
    email: &'a str,
    username: &'a str,
    password: &'a str,
}

fn required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(NukbookError::Invalid(format!("{} is required", field)));
    }
    Ok(())
}

impl ApiClient {
    pub async fn register(&self, email: &str, username: &str, password: &str) -> Result<Me> {
        required("email", email)?;
        required("username", username)?;
        required("password", password)?;
        let body = Registration {
            email: email.trim(),
            username: username.trim(),
            password,
        };
        self.send(Method::POST, "/auth/register", Some(&body), Auth::Optional)
            .await
    }

    /// Log in and keep the returned token for later calls
    pub async fn login(&self, email: &str, password: &str) -> Result<Me> {
        required("email", email)?;
        required("password", password)?;
        let body = Credentials {
            email: email.trim(),
            password,
        };
        let token: TokenResponse = self
            .send(Method::POST, "/auth/login", Some(&body), Auth::Optional)
            .await?;
        if token.access_token.trim().is_empty() {
            return Err(NukbookError::Invalid("login returned an empty token".into()));
        }
        self.tokens().set(token.access_token).await?;

        let me = self.me().await?;
        tracing::info!(user = %me.username, "Logged in");
        Ok(me)
    }

    pub async fn me(&self) -> Result<Me> {
        self.get("/auth/me", Auth::Required).await
    }

    /// Forget the token; the API keeps no session to end
    pub async fn logout(&self) {
        self.tokens().clear().await;
        tracing::info!("Logged out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenStore;
    use crate::config::ClientConfig;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_blank_credentials_rejected_locally() {
        let tokens = TokenStore::new(Arc::new(MemoryStore::new()));
        let client = ApiClient::new(ClientConfig::new("http://127.0.0.1:9"), tokens).unwrap();
        let err = client.login("  ", "secret").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: email is required");
    }

    #[tokio::test]
    async fn test_logout_clears_token() {
        let tokens = TokenStore::new(Arc::new(MemoryStore::new()));
        tokens.set("abc").await.unwrap();
        let client = ApiClient::new(ClientConfig::new("http://127.0.0.1:9"), tokens.clone()).unwrap();
        client.logout().await;
        assert!(!tokens.is_logged_in().await);
    }
}
