use bytes::Bytes;
use thiserror::Error;
use tracing::info;
use url::Url;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("not an absolute http(s) URL: {0}")]
    InvalidUrl(String),

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

pub struct ProxyService;

impl ProxyService {
    /// Downloads `url` in full. No retries, no caching.
    pub async fn relay(http: &reqwest::Client, url: &str) -> Result<Bytes, RelayError> {
        let parsed = Url::parse(url).map_err(|_| RelayError::InvalidUrl(url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RelayError::InvalidUrl(url.to_string()));
        }

        let fetch_error = |source| RelayError::Fetch {
            url: url.to_string(),
            source,
        };

        let bytes = http
            .get(parsed)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(fetch_error)?
            .bytes()
            .await
            .map_err(fetch_error)?;

        info!("Relayed {} bytes from {}", bytes.len(), url);
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn relays_the_remote_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/clip.mp4")
            .with_header("content-type", "application/octet-stream")
            .with_body("fake-mp4")
            .create_async()
            .await;

        let bytes = ProxyService::relay(&reqwest::Client::new(), &format!("{}/clip.mp4", server.url()))
            .await
            .unwrap();

        assert_eq!(&bytes[..], b"fake-mp4");
    }

    #[tokio::test]
    async fn not_found_is_a_relay_error() {
        let mut server = mockito::Server::new_async().await;
        let missing = server
            .mock("GET", "/404.mp4")
            .with_status(404)
            .with_body("not found")
            .expect(1)
            .create_async()
            .await;

        let err = ProxyService::relay(&reqwest::Client::new(), &format!("{}/404.mp4", server.url()))
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::Fetch { .. }));
        missing.assert_async().await;
    }

    #[tokio::test]
    async fn rejects_non_http_urls() {
        let client = reqwest::Client::new();

        for url in ["file:///etc/passwd", "not a url"] {
            let err = ProxyService::relay(&client, url).await.unwrap_err();
            assert!(matches!(err, RelayError::InvalidUrl(_)));
        }
    }
}
