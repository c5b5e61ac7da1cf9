//! Public-IP resolution.

use serde::Deserialize;
use url::Url;

use crate::error::RemoteError;

#[derive(Deserialize)]
struct IpResponse {
    ip: String,
}

/// Resolves the visitor's public address via an external lookup service.
///
/// Single attempt by design: the only consumer is the admin-visibility
/// probe, which fails closed on any error rather than retrying.
#[derive(Debug, Clone)]
pub struct PublicIp {
    client: reqwest::Client,
    endpoint: Url,
}

impl PublicIp {
    #[must_use]
    pub fn new(client: reqwest::Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    /// Resolve the public address, expecting `{"ip": "..."}`.
    pub async fn resolve(&self) -> Result<String, RemoteError> {
        let response = self.client.get(self.endpoint.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status,
                context: "public-ip",
            });
        }
        let body: IpResponse = response.json().await?;
        Ok(body.ip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn resolver(server: &MockServer) -> PublicIp {
        let endpoint = Url::parse(&format!("{}/json", server.uri())).expect("valid url");
        PublicIp::new(reqwest::Client::new(), endpoint)
    }

    #[tokio::test]
    async fn resolves_address_from_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"ip": "203.0.113.5"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let ip = resolver(&server).await.resolve().await.expect("resolved");
        assert_eq!(ip, "203.0.113.5");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = resolver(&server)
            .await
            .resolve()
            .await
            .expect_err("5xx is terminal for the probe");
        assert!(matches!(err, RemoteError::Status { .. }));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .expect(1)
            .mount(&server)
            .await;

        let err = resolver(&server)
            .await
            .resolve()
            .await
            .expect_err("body must decode");
        assert!(err.is_transport());
    }
}
