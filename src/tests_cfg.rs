//! Helpers shared by the unit and integration tests.

pub mod config {
    use crate::{
        config::{Config, Logger, Server, Store},
        logger::{Format, LogLevel},
    };

    /// A configuration serving all three services from memory, without
    /// seeding or log output.
    #[must_use]
    pub fn test_config() -> Config {
        Config {
            logger: Logger {
                enable: false,
                level: LogLevel::Off,
                format: Format::Json,
                override_filter: None,
                file_appender: None,
            },
            server: Server {
                binding: "localhost".to_string(),
                port: 8080,
                host: "http://localhost".to_string(),
                timeout_secs: 30,
            },
            store: Store::Memory,
            services: [
                crate::config::Service::Customers,
                crate::config::Service::Vets,
                crate::config::Service::Visits,
            ]
            .into_iter()
            .collect(),
            seed: false,
        }
    }
}

pub mod app {
    use crate::{app::AppContext, boot, environment::Environment};

    /// An empty in-memory context.
    pub async fn get_app_context() -> AppContext {
        boot::create_context(&Environment::Test, super::config::test_config())
            .await
            .expect("test context")
    }

    /// An in-memory context loaded with the bundled fixture.
    pub async fn get_seeded_app_context() -> AppContext {
        let mut config = super::config::test_config();
        config.seed = true;
        boot::create_context(&Environment::Test, config)
            .await
            .expect("seeded test context")
    }
}
