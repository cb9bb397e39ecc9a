//! Predecessor to [StemClient] for getting BrainSTEM authorization tokens.

use crate::errors::LoginError;
use crate::store::TokenStore;
use crate::types::{StemUrl, Username};
use crate::StemClient;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct AuthTokenResponse {
    token: String,
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a Username,
    password: &'a str,
}

/// BrainSTEM username and password struct.
/// [Account] is a builder for [StemClient].
pub struct Account {
    pub client: reqwest::Client,
    pub url: StemUrl,
    pub username: Username,
    pub password: String,
}

impl Account {
    pub fn new(url: StemUrl, username: Username, password: String) -> Self {
        Self {
            client: Default::default(),
            url,
            username,
            password,
        }
    }

    /// Obtain a token from `POST {base}token/`. Any non-2xx status is
    /// an authentication failure; there is no retry.
    pub async fn get_token(&self) -> Result<String, LoginError> {
        let token_url = format!("{}token/", &self.url);
        let req = self
            .client
            .post(token_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&Credentials {
                username: &self.username,
                password: &self.password,
            });
        let res = req.send().await?;
        if !res.status().is_success() {
            return Err(LoginError::Failed(res.status()));
        }
        let token_object: AuthTokenResponse = res.json().await?;
        Ok(token_object.token)
    }

    /// Token from the store when one is present, otherwise log in and
    /// hand the fresh token to the store.
    pub async fn get_token_with<S: TokenStore>(&self, store: &mut S) -> anyhow::Result<String> {
        if let Some(token) = store.load()? {
            return Ok(token);
        }
        let token = self.get_token().await?;
        store.store(&token)?;
        Ok(token)
    }

    pub async fn into_client(self) -> Result<StemClient, LoginError> {
        let token = self.get_token().await?;
        Ok(StemClient::new(self.url, token)?)
    }
}
