use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;

use crate::api::config::ApiConfig;
use crate::api::endpoint::ApiEndpoint;
use crate::preferences::PreferencesStore;
use crate::tracker::TrackerClient;

pub struct ApiStateBuilder<MandatoryFields = (TrackerClient, PreferencesStore)> {
    config: ApiConfig,
    mandatory_fields: MandatoryFields,
}

impl ApiStateBuilder {
    pub fn build(self) -> ApiState {
        let (tracker_client, preferences_store) = self.mandatory_fields;

        ApiState {
            inner: Arc::new(Inner {
                config: self.config,
                tracker_client,
                preferences_store,
            }),
        }
    }
}

impl<T2> ApiStateBuilder<((), T2)> {
    pub fn with_tracker_client(
        self,
        tracker_client: TrackerClient,
    ) -> ApiStateBuilder<(TrackerClient, T2)> {
        let (_, preferences_store) = self.mandatory_fields;

        ApiStateBuilder {
            config: self.config,
            mandatory_fields: (tracker_client, preferences_store),
        }
    }
}

impl<T1> ApiStateBuilder<(T1, ())> {
    pub fn with_preferences_store(
        self,
        preferences_store: PreferencesStore,
    ) -> ApiStateBuilder<(T1, PreferencesStore)> {
        let (tracker_client, _) = self.mandatory_fields;

        ApiStateBuilder {
            config: self.config,
            mandatory_fields: (tracker_client, preferences_store),
        }
    }
}

impl<T1, T2> ApiStateBuilder<(T1, T2)> {
    pub fn with_config(self, config: ApiConfig) -> ApiStateBuilder<(T1, T2)> {
        ApiStateBuilder { config, ..self }
    }
}

#[derive(Clone)]
#[repr(transparent)]
pub struct ApiState {
    inner: Arc<Inner>,
}

impl ApiState {
    pub fn builder() -> ApiStateBuilder<((), ())> {
        ApiStateBuilder {
            config: ApiConfig::default(),
            mandatory_fields: ((), ()),
        }
    }

    pub async fn bind_socket(&self) -> std::io::Result<TcpListener> {
        TcpListener::bind(self.config().listen_addr).await
    }

    pub async fn bind_endpoint(&self) -> Result<ApiEndpoint> {
        ApiEndpoint::builder().bind(self.clone()).await
    }

    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    pub fn tracker_client(&self) -> &TrackerClient {
        &self.inner.tracker_client
    }

    pub fn preferences_store(&self) -> &PreferencesStore {
        &self.inner.preferences_store
    }
}

struct Inner {
    config: ApiConfig,
    tracker_client: TrackerClient,
    preferences_store: PreferencesStore,
}
