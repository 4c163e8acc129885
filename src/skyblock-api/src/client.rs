//! Upstream profiles API

use skyblock::ProfilesResponse;
use std::time::Duration;
use uuid::Uuid;

/// Profiles endpoint; the player UUID is appended
pub const DEFAULT_API_URL: &str = "https://api.hypixel.net/v2/skyblock/profiles?uuid=";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the upstream profiles API
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Invalid player UUID: {0}")]
    InvalidPlayer(String),

    #[error("Upstream returned HTTP {status}: {cause}")]
    Status { status: u16, cause: String },

    #[error("Upstream request failed: {0}")]
    Transport(String),

    #[error("Invalid upstream response: {0}")]
    Decode(String),

    #[error("Upstream rejected request: {0}")]
    Rejected(String),
}

/// Something that can return all Skyblock profiles of a player
///
/// Calls block; the service runs them on the blocking pool.
pub trait ProfileSource: Send + Sync {
    fn fetch_profiles(&self, player: &str) -> Result<ProfilesResponse, SourceError>;
}

/// Blocking client for the Hypixel public API
pub struct HypixelClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
}

impl HypixelClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_API_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// The player must be a UUID; it is sent in undashed form
    fn profiles_url(&self, player: &str) -> Result<String, SourceError> {
        let uuid =
            Uuid::parse_str(player).map_err(|_| SourceError::InvalidPlayer(player.to_string()))?;
        Ok(format!("{}{}", self.base_url, uuid.simple()))
    }
}

impl ProfileSource for HypixelClient {
    fn fetch_profiles(&self, player: &str) -> Result<ProfilesResponse, SourceError> {
        let response = match self
            .agent
            .get(&self.profiles_url(player)?)
            .set("API-Key", &self.api_key)
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                // Error bodies use the same envelope and explain themselves in `cause`
                let cause = response
                    .into_json::<ProfilesResponse>()
                    .ok()
                    .and_then(|body| body.cause)
                    .unwrap_or_else(|| "no cause given".to_string());
                return Err(SourceError::Status { status, cause });
            }
            Err(e) => return Err(SourceError::Transport(e.to_string())),
        };

        let body: ProfilesResponse = response
            .into_json()
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        if !body.success {
            return Err(SourceError::Rejected(
                body.cause.unwrap_or_else(|| "unknown".to_string()),
            ));
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_url() {
        let client = HypixelClient::new("key");
        assert_eq!(
            client
                .profiles_url("d8d5a923-7b20-43d8-883b-1150148d6955")
                .unwrap(),
            "https://api.hypixel.net/v2/skyblock/profiles?uuid=d8d5a9237b2043d8883b1150148d6955"
        );

        let client = HypixelClient::with_base_url("http://localhost:9000/profiles?uuid=", "key");
        assert_eq!(
            client.profiles_url("d8d5a9237b2043d8883b1150148d6955").unwrap(),
            "http://localhost:9000/profiles?uuid=d8d5a9237b2043d8883b1150148d6955"
        );
    }

    #[test]
    fn test_non_uuid_player_never_reaches_url() {
        let client = HypixelClient::new("key");
        for player in ["a&x=y", "abc", "d8d5a9237b2043d8883b1150148d6955&key=1", ""] {
            assert!(matches!(
                client.profiles_url(player),
                Err(SourceError::InvalidPlayer(_))
            ));
        }
        assert!(matches!(
            client.fetch_profiles("a&x=y"),
            Err(SourceError::InvalidPlayer(_))
        ));
    }
}
