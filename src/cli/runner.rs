//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::cli::server::{self, AppState};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::service::{ContactService, PageRequest};
use crate::types::ContactSource;
use crate::upstream::UpstreamClient;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Wire the upstream client, aggregator, and cache described by `settings`
pub fn build_service(settings: &Settings) -> Result<ContactService> {
    let client = UpstreamClient::new(settings.http_client_config())?;
    Ok(ContactService::new(
        Arc::new(client),
        settings.cache_config(),
        settings.aggregation_options(),
    ))
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let mut settings = Settings::load(self.cli.config.as_deref())?;

        match &self.cli.command {
            Commands::Serve { port } => {
                if let Some(port) = port {
                    settings.server.port = *port;
                }
                settings.validate()?;
                self.serve(&settings).await
            }
            Commands::Fetch { source, page, size } => {
                settings.validate()?;
                self.fetch(&settings, source.as_deref(), *page, *size).await
            }
            Commands::Check => {
                settings.validate()?;
                self.check(&settings).await
            }
        }
    }

    async fn serve(&self, settings: &Settings) -> Result<()> {
        let service = build_service(settings)?;
        info!(
            "Aggregating contacts from {} (cache enabled: {}, ttl: {}s)",
            settings.api.base_url, settings.cache.enabled, settings.cache.ttl_secs
        );

        let state = AppState::new(service, settings.api.base_url.clone());
        server::serve(state, &settings.server.host, settings.server.port).await
    }

    async fn fetch(
        &self,
        settings: &Settings,
        source: Option<&str>,
        page: Option<i64>,
        size: Option<i64>,
    ) -> Result<()> {
        let source = source
            .map(|value| {
                value
                    .parse::<ContactSource>()
                    .map_err(|expected| Error::invalid_type("source", value, expected))
            })
            .transpose()?;

        let service = build_service(settings)?;

        if page.is_some() || size.is_some() {
            let request = PageRequest::from_optional(page, size)?;
            let result = service.page(request, source).await?;
            self.output(&result)
        } else {
            let contacts = service.list(source).await?;
            self.output(&contacts)
        }
    }

    async fn check(&self, settings: &Settings) -> Result<()> {
        let service = build_service(settings)?;
        let start = Instant::now();

        match service.check_upstream().await {
            Ok(page) => self.output(&json!({
                "status": "UP",
                "externalApi": settings.api.base_url,
                "contactsOnFirstPage": page.contacts.len(),
                "totalPages": page.cursor.as_ref().and_then(|c| c.total_pages),
                "elapsedMs": start.elapsed().as_millis() as u64,
            })),
            Err(e) => {
                self.output(&json!({
                    "status": "DOWN",
                    "externalApi": settings.api.base_url,
                    "error": e.to_string(),
                }))?;
                Err(e)
            }
        }
    }

    fn output<T: Serialize>(&self, value: &T) -> Result<()> {
        let rendered = if self.cli.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        println!("{rendered}");
        Ok(())
    }
}
