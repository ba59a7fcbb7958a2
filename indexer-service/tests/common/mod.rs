use indexer_service::config::{AddokConfig, IndexerConfig, TelemetryConfig};
use indexer_service::startup::Application;
use indexer_service::workers::{CommandRunner, MockCommandRunner};
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

/// Config bound to a random port with no settle delay.
pub fn test_config(addok: AddokConfig) -> IndexerConfig {
    IndexerConfig {
        common: CoreConfig { port: 0 },
        addok: AddokConfig {
            settle_delay_secs: 0,
            ..addok
        },
        telemetry: TelemetryConfig::default(),
    }
}

impl TestApp {
    /// Spawn the app against a scripted runner.
    pub async fn spawn(runner: Arc<MockCommandRunner>) -> Self {
        Self::spawn_with(test_config(AddokConfig::default()), runner).await
    }

    pub async fn spawn_with(config: IndexerConfig, runner: Arc<dyn CommandRunner>) -> Self {
        let app = Application::build_with_runner(config, runner, None)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections by polling the ping endpoint
        let client = reqwest::Client::new();
        let ping_url = format!("{}/ping", address);
        for _ in 0..50 {
            if client.get(&ping_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }

    pub async fn post_upload(&self) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/upload", self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
