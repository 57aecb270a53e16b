//! `mockall` doubles for the engine collaborators.

use mockall::mock;
use serde_json::{Value, json};

use dockworker_config::{ApiVersion, default_api_version};

use crate::backend::{
    BackendClient, BackendError, BackendFactory, ContainerSpec, StartHostConfig,
};
use crate::dispatch::{CorrelationId, Delivery, DeliveryTag};

mock! {
    pub Factory {}
    impl BackendFactory for Factory {
        fn connect(
            &self,
            server: &str,
            api_version: ApiVersion,
        ) -> Result<Box<dyn BackendClient>, BackendError>;
    }
}

mock! {
    pub Client {}
    impl BackendClient for Client {
        fn stop(&self, container: &str, timeout_secs: u16) -> Result<Value, BackendError>;
        fn remove_container(&self, container: &str) -> Result<Value, BackendError>;
        fn remove_image(&self, image: &str) -> Result<Value, BackendError>;
        fn pull(&self, image: &str, insecure_registry: bool) -> Result<Value, BackendError>;
        fn create_container(&self, spec: &ContainerSpec) -> Result<Value, BackendError>;
        fn start(&self, container: &str, host: &StartHostConfig) -> Result<Value, BackendError>;
    }
}

/// Factory expecting exactly one connection to `server` that hands out
/// `client`.
pub fn factory_expecting_connect(server: impl Into<String>, client: MockClient) -> MockFactory {
    let server = server.into();
    let mut factory = MockFactory::new();
    factory
        .expect_connect()
        .withf(move |requested, version| {
            requested == server && *version == default_api_version()
        })
        .times(1)
        .return_once(move |_, _| Ok(Box::new(client) as Box<dyn BackendClient>));
    factory
}

/// Factory whose every connection attempt fails with `error`.
pub fn failing_factory(error: BackendError) -> MockFactory {
    let mut factory = MockFactory::new();
    factory
        .expect_connect()
        .times(1)
        .return_once(move |_, _| Err(error));
    factory
}

/// Delivery carrying `parameters` with fixed metadata.
pub fn request(parameters: Value) -> Delivery {
    Delivery::from_body(
        DeliveryTag::new(1),
        CorrelationId::new("123"),
        "reply-queue",
        &json!({ "parameters": parameters }),
    )
}

/// `StopContainer` request for container `testing` on `localhost`.
pub fn stop_request() -> Delivery {
    request(json!({
        "subcommand": "StopContainer",
        "server_name": "localhost",
        "container_name": "testing",
    }))
}
