use crate::domain::{ConnectionDescriptor, CredentialStore, DomainError, DomainResult};
use crate::redis::RedisClient;
use async_trait::async_trait;
use redis::AsyncCommands;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Wire shape of the cached `conn_string` hash field, as written by the external
/// OAuth flow.
#[derive(Debug, Deserialize)]
struct ConnStringDocument {
    oauth: OauthSection,
}

#[derive(Debug, Deserialize)]
struct OauthSection {
    instance_url: String,
    access_token: String,
}

impl From<ConnStringDocument> for ConnectionDescriptor {
    fn from(doc: ConnStringDocument) -> Self {
        ConnectionDescriptor {
            instance_url: doc.oauth.instance_url,
            access_token: doc.oauth.access_token,
        }
    }
}

/// Redis implementation of CredentialStore trait
///
/// Key layout: `HGET {organization_id} conn_string`, holding a JSON document with
/// the pre-authenticated oauth endpoint and token.
#[derive(Clone)]
pub struct RedisCredentialStore {
    client: RedisClient,
}

impl RedisCredentialStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CredentialStore for RedisCredentialStore {
    #[instrument(skip(self))]
    async fn get_connection(
        &self,
        organization_id: &str,
    ) -> DomainResult<Option<ConnectionDescriptor>> {
        let mut conn = self.client.connection();

        let reply: Option<String> = conn
            .hget(organization_id, "conn_string")
            .await
            .map_err(|e| DomainError::StoreError(e.into()))?;

        let Some(raw) = reply else {
            debug!(organization_id, "no cached connection info for org");
            return Ok(None);
        };

        let document: ConnStringDocument = serde_json::from_str(&raw).map_err(|e| {
            DomainError::MalformedConnection(organization_id.to_string(), e.to_string())
        })?;

        debug!(organization_id, "got cached connection info for org");
        Ok(Some(document.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conn_string_document_decodes_to_descriptor() {
        let raw = r#"{"oauth":{"instance_url":"https://na1.example.com","access_token":"tok-123","id":"ignored"}}"#;
        let document: ConnStringDocument = serde_json::from_str(raw).unwrap();
        let descriptor: ConnectionDescriptor = document.into();
        assert_eq!(
            descriptor,
            ConnectionDescriptor {
                instance_url: "https://na1.example.com".to_string(),
                access_token: "tok-123".to_string(),
            }
        );
    }

    #[test]
    fn test_conn_string_without_oauth_section_is_rejected() {
        let raw = r#"{"access_token":"tok-123"}"#;
        assert!(serde_json::from_str::<ConnStringDocument>(raw).is_err());
    }
}
