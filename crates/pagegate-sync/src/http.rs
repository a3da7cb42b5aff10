//! HTTP client for the remote comment API.
//!
//! | Operation       | Request                             |
//! |-----------------|-------------------------------------|
//! | list comments   | `GET /api/comments/?page={slug}`    |
//! | create comment  | `POST /api/comments/`               |
//! | update comment  | `PUT /api/comments/{id}/`           |
//! | delete comment  | `DELETE /api/comments/{id}/`        |
//! | fetch profile   | `GET /api/profile/`                 |
//!
//! Every request carries `Authorization: Bearer <token>`.

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use pagegate_core::{Comment, CommentId, PageId};

use crate::config::SyncConfig;
use crate::credential::{authorization_value, CredentialProvider, MissingCredential};
use crate::error::{Result, SyncError};
use crate::messages::{CommentEdit, NewComment, Profile};
use crate::remote::RemoteStore;

/// [`RemoteStore`] over the JSON HTTP API.
pub struct HttpRemote {
    base_url: String,
    client: Client,
    credentials: Box<dyn CredentialProvider>,
    missing_credential: MissingCredential,
}

impl HttpRemote {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        config: &SyncConfig,
        credentials: impl CredentialProvider + 'static,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            credentials: Box::new(credentials),
            missing_credential: config.missing_credential,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match authorization_value(self.credentials.as_ref(), self.missing_credential) {
            Some(value) => builder.header(header::AUTHORIZATION, value),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status, "remote request failed");
            return Err(SyncError::Status { status, body });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| SyncError::Decode(e.to_string()))
    }
}

fn comment_path(id: &CommentId) -> String {
    format!("/api/comments/{}/", id)
}

#[async_trait]
impl RemoteStore for HttpRemote {
    async fn list_comments(&self, page: PageId) -> Result<Vec<Comment>> {
        let builder = self
            .request(Method::GET, "/api/comments/")
            .query(&[("page", page.slug())]);
        let response = self.send(builder).await?;
        Self::decode(response).await
    }

    async fn create_comment(&self, page: PageId, content: &str) -> Result<Comment> {
        let body = NewComment {
            content: content.to_string(),
            page,
        };
        let builder = self.request(Method::POST, "/api/comments/").json(&body);
        let response = self.send(builder).await?;
        Self::decode(response).await
    }

    async fn update_comment(&self, id: &CommentId, content: &str) -> Result<Comment> {
        let body = CommentEdit {
            content: content.to_string(),
        };
        let builder = self.request(Method::PUT, &comment_path(id)).json(&body);
        let response = self.send(builder).await?;
        Self::decode(response).await
    }

    async fn delete_comment(&self, id: &CommentId) -> Result<()> {
        let builder = self.request(Method::DELETE, &comment_path(id));
        self.send(builder).await?;
        Ok(())
    }

    async fn fetch_profile(&self) -> Result<Profile> {
        let response = self.send(self.request(Method::GET, "/api/profile/")).await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::{NoCredential, StaticCredential};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn comment_json(id: serde_json::Value, content: &str) -> serde_json::Value {
        json!({
            "id": id,
            "content": content,
            "author": "alice",
            "createdAt": "2024-03-01T12:00:00Z"
        })
    }

    fn remote(server: &MockServer) -> HttpRemote {
        HttpRemote::new(
            server.uri(),
            &SyncConfig::default(),
            StaticCredential::new("tok"),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_comments_request_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/comments/"))
            .and(query_param("page", "products-list"))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([comment_json(json!(7), "a"), comment_json(json!("c1"), "b")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let comments = remote(&server)
            .list_comments(PageId::ProductsList)
            .await
            .unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].id.as_str(), "7");
        assert_eq!(comments[1].content, "b");
    }

    #[tokio::test]
    async fn test_create_comment_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/comments/"))
            .and(body_json(json!({"content": "hello", "page": "clients"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(comment_json(json!("c1"), "hello")))
            .expect(1)
            .mount(&server)
            .await;

        let comment = remote(&server)
            .create_comment(PageId::Clients, "hello")
            .await
            .unwrap();
        assert_eq!(comment.id.as_str(), "c1");
    }

    #[tokio::test]
    async fn test_update_and_delete_paths() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/comments/c1/"))
            .and(body_json(json!({"content": "goodbye"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(comment_json(json!("c1"), "goodbye")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/comments/c1/"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let remote = remote(&server);
        let id = CommentId::from("c1");
        let updated = remote.update_comment(&id, "goodbye").await.unwrap();
        assert_eq!(updated.content, "goodbye");
        remote.delete_comment(&id).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_credential_sends_bearer_null() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/profile/"))
            .and(header("Authorization", "Bearer null"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"username": "guest", "role": "user"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let remote = HttpRemote::new(server.uri(), &SyncConfig::default(), NoCredential).unwrap();
        let profile = remote.fetch_profile().await.unwrap();
        assert_eq!(profile.username, "guest");
        assert!(profile.permissions.is_empty());
    }

    #[tokio::test]
    async fn test_missing_credential_omitted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/profile/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"username": "guest", "role": "user"})),
            )
            .mount(&server)
            .await;

        let config = SyncConfig {
            missing_credential: MissingCredential::Omit,
            ..SyncConfig::default()
        };
        let remote = HttpRemote::new(server.uri(), &config, NoCredential).unwrap();
        remote.fetch_profile().await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_error_status_and_decode_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/profile/"))
            .respond_with(ResponseTemplate::new(401).set_body_string("no token"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/comments/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let remote = remote(&server);
        match remote.fetch_profile().await.unwrap_err() {
            SyncError::Status { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "no token");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let err = remote.list_comments(PageId::Clients).await.unwrap_err();
        assert!(matches!(err, SyncError::Decode(_)));
    }
}
