use std::sync::Arc;

use reqwest::Client as HttpClient;
use thiserror::Error;
use url::Url;
use zeroize::Zeroizing;

pub use self::config::TrackerConfig;

use crate::api::models::device::DeviceListResponse;

mod config;

/// Client of the upstream device-tracking API.
#[derive(Clone)]
pub struct TrackerClient {
    inner: Arc<Inner>,
}

struct Inner {
    http_client: HttpClient,
    url: Url,
    api_key: Zeroizing<String>,
}

impl TrackerClient {
    pub fn new(config: &TrackerConfig, api_key: &str) -> Result<Self, TrackerError> {
        let url = Url::parse(&config.url).map_err(|source| TrackerError::InvalidUrl {
            url: config.url.clone(),
            source,
        })?;

        let http_client = HttpClient::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(Inner {
                http_client,
                url,
                api_key: Zeroizing::new(api_key.to_owned()),
            }),
        })
    }

    /// Fetches all devices together with their latest reported point.
    pub async fn fetch_devices(&self) -> Result<DeviceListResponse, TrackerError> {
        let mut url = self.inner.url.clone();
        url.query_pairs_mut()
            .append_pair("api-key", &self.inner.api_key)
            .append_pair("latest_point", "true");

        let response = self
            .inner
            .http_client
            .get(url)
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        let devices = serde_json::from_slice(&body).map_err(TrackerError::InvalidBody)?;

        Ok(devices)
    }
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid tracker url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("tracker request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("tracker returned malformed device list: {0}")]
    InvalidBody(#[source] serde_json::Error),
}

impl TrackerError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mockito::Matcher;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::api::models::device::{Device, DevicePoint};

    fn client_for(server: &mockito::Server) -> TrackerClient {
        let config = TrackerConfig {
            url: format!("{}/v3/api/public/device", server.url()),
            timeout: Duration::from_secs(5),
        };
        TrackerClient::new(&config, "secret-key").unwrap()
    }

    #[tokio::test]
    async fn fetch_devices_sends_api_key_and_latest_point_flag() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/v3/api/public/device")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api-key".into(), "secret-key".into()),
                Matcher::UrlEncoded("latest_point".into(), "true".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"result_list":[{"device_id":"d1","latest_device_point":{"lat":1.5,"lng":2.5},"display_name":"Truck 1","active_state":"active"}]}"#,
            )
            .create_async()
            .await;

        let devices = client_for(&server).fetch_devices().await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            devices.result_list,
            vec![Device {
                device_id: "d1".to_owned(),
                latest_device_point: DevicePoint { lat: 1.5, lng: 2.5 },
                display_name: "Truck 1".to_owned(),
                active_state: "active".to_owned(),
            }]
        );
    }

    #[tokio::test]
    async fn fetch_devices_fails_on_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v3/api/public/device")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let err = client_for(&server).fetch_devices().await.unwrap_err();
        assert!(matches!(err, TrackerError::Request(_)));
        assert!(!err.is_timeout());
    }

    #[tokio::test]
    async fn fetch_devices_fails_on_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v3/api/public/device")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = client_for(&server).fetch_devices().await.unwrap_err();
        assert!(matches!(err, TrackerError::InvalidBody(_)));
    }

    #[tokio::test]
    async fn fetch_devices_times_out_on_silent_tracker() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let silent = tokio::spawn(async move {
            let mut connections = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                connections.push(socket);
            }
        });

        let config = TrackerConfig {
            url: format!("http://{addr}/v3/api/public/device"),
            timeout: Duration::from_millis(200),
        };
        let err = TrackerClient::new(&config, "secret-key")
            .unwrap()
            .fetch_devices()
            .await
            .unwrap_err();

        assert!(err.is_timeout(), "{err:?}");
        silent.abort();
    }

    #[test]
    fn rejects_invalid_url() {
        let config = TrackerConfig {
            url: "not a url".to_owned(),
            ..Default::default()
        };
        assert!(matches!(
            TrackerClient::new(&config, "key"),
            Err(TrackerError::InvalidUrl { .. })
        ));
    }
}
