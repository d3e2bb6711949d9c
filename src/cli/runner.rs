//! CLI runner - executes commands

use crate::auth::Credentials;
use crate::cli::commands::{Cli, Commands, ListArgs};
use crate::cli::progress::ConsoleProgress;
use crate::config::ShellConfig;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::output::{write_items, OutputFormat};
use crate::pagination::{
    CancelToken, Collector, ProgressSink, RetrievalError, RetrievalRequest, TracingProgress,
};
use crate::types::{JsonValue, Service};
use crate::workspace::{ApiPageFetcher, ListQuery, ResourceKind, Scope};
use serde_json::json;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

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
        match &self.cli.command {
            Commands::List(args) => self.list(args).await,
            Commands::Resources => self.resources(),
        }
    }

    /// Load the config file, if any
    fn load_config(&self) -> Result<ShellConfig> {
        ShellConfig::load_optional(self.cli.config.as_deref())
    }

    /// Credentials for calls to `service`
    ///
    /// `--access-token` wins over the config file; `--subject` replaces the
    /// configured service-account subject.
    fn credentials(&self, config: &ShellConfig, service: Service) -> Result<Credentials> {
        if let Some(token) = self.cli.access_token.as_deref().filter(|t| !t.is_empty()) {
            if self.cli.subject.is_some() {
                warn!("--subject has no effect with --access-token");
            }
            return Ok(Credentials::Bearer {
                token: token.to_string(),
            });
        }

        let base_dir = self
            .cli
            .config
            .as_deref()
            .and_then(std::path::Path::parent);
        let credentials =
            config
                .credentials
                .resolve(service, self.cli.subject.as_deref(), base_dir)?;

        if self.cli.subject.is_some() && !matches!(credentials, Credentials::ServiceAccount { .. })
        {
            warn!(
                credentials = credentials.kind(),
                "--subject only applies to service account credentials"
            );
        }
        if matches!(credentials, Credentials::None) {
            warn!("No credentials configured; requests are sent unauthenticated");
        }
        Ok(credentials)
    }

    /// Scope of a list call: flags first, then the config file
    fn scope(&self, args: &ListArgs, config: &ShellConfig) -> Scope {
        Scope {
            customer: self.cli.customer.clone().or_else(|| config.customer.clone()),
            domain: self.cli.domain.clone().or_else(|| config.domain.clone()),
            user_key: args.user.clone(),
            group_key: args.group.clone(),
            calendar_id: args.calendar.clone(),
        }
    }

    /// Retrieve every item of a resource and print it
    async fn list(&self, args: &ListArgs) -> Result<()> {
        let start = Instant::now();
        let config = self.load_config()?;
        let resource = args.resource;
        let descriptor = resource.descriptor();
        let service = descriptor.service;

        let query = ListQuery::new(resource)
            .with_scope(self.scope(args, &config))
            .with_options(args.options()?);

        let credentials = self.credentials(&config, service)?;
        debug!(
            resource = %resource,
            credentials = credentials.kind(),
            subject = ?credentials.subject(),
            "Listing"
        );
        let client = HttpClient::with_credentials(config.http_client_config(service), credentials)?;

        let request = retrieval_request(args, &config, resource);
        let mut fetcher = ApiPageFetcher::new(
            client,
            &query,
            config.base_url(service),
            request.page_size_hint,
        )?;

        let cancel = CancelToken::new();
        let interrupt = watch_ctrl_c(cancel.clone());
        let collector = Collector::new(request).with_cancel_token(cancel);

        let mut console = (!self.cli.quiet).then(|| ConsoleProgress::stderr(resource.name()));
        let mut logged = TracingProgress::new(resource.name());
        let sink: &mut dyn ProgressSink = match console.as_mut() {
            Some(console) => console,
            None => &mut logged,
        };

        let result = collector.run(&mut fetcher, sink).await;
        interrupt.abort();
        if result.is_err() {
            if let Some(console) = console.as_mut() {
                console.end_line();
            }
        }

        let items = match result {
            Ok(items) => items,
            Err(err) => recover_partial(err, args.allow_partial)?,
        };

        let fields = self.fields(args, resource);
        let mut stdout = std::io::stdout().lock();
        write_items(&mut stdout, &items, self.cli.format, &fields)?;

        info!(
            resource = %resource,
            items = items.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "List complete"
        );
        Ok(())
    }

    /// Columns to print: `--fields`, else the resource's defaults for tables
    fn fields(&self, args: &ListArgs, resource: ResourceKind) -> Vec<String> {
        if !args.fields.is_empty() {
            return args.fields.clone();
        }
        match self.cli.format {
            OutputFormat::Pretty => resource
                .descriptor()
                .default_fields
                .iter()
                .map(ToString::to_string)
                .collect(),
            OutputFormat::Json | OutputFormat::Jsonl => Vec::new(),
        }
    }

    /// Print the resource catalog
    fn resources(&self) -> Result<()> {
        let rows = catalog();
        let fields: Vec<String> = match self.cli.format {
            OutputFormat::Pretty => ["name", "service", "max_page_size", "description"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            OutputFormat::Json | OutputFormat::Jsonl => Vec::new(),
        };
        let mut stdout = std::io::stdout().lock();
        write_items(&mut stdout, &rows, self.cli.format, &fields)?;
        Ok(())
    }
}

/// Request for a list run: flags first, then config defaults
///
/// The page size is clamped to what the resource serves so progress reports
/// the size actually requested.
pub(crate) fn retrieval_request(
    args: &ListArgs,
    config: &ShellConfig,
    resource: ResourceKind,
) -> RetrievalRequest {
    let page_size = args.page_size.unwrap_or(config.defaults.page_size);
    let mut request = RetrievalRequest::new(resource.descriptor().clamp_page_size(page_size))
        .with_result_cap(args.max_results.unwrap_or(config.defaults.max_results));
    if let Some(token) = args.page_token.as_deref().filter(|t| !t.is_empty()) {
        request = request.with_resume_cursor(token);
    }
    request
}

/// Describe every resource as JSON
pub(crate) fn catalog() -> Vec<JsonValue> {
    ResourceKind::all()
        .iter()
        .map(|kind| {
            let d = kind.descriptor();
            json!({
                "name": d.name,
                "service": d.service.to_string(),
                "path": d.path,
                "items_field": d.items_field,
                "max_page_size": d.max_page_size,
                "parameters": d.path_parameters().collect::<Vec<_>>(),
                "description": d.description,
            })
        })
        .collect()
}

/// Keep a later-page failure's partial items when the caller allows it
///
/// First-page failures are always errors since nothing was retrieved.
pub(crate) fn recover_partial<T>(
    err: RetrievalError<T, Error>,
    allow_partial: bool,
) -> Result<Vec<T>> {
    if !allow_partial || err.is_first_page() {
        return Err(err.into());
    }

    let cursor = err.resume_cursor().unwrap_or_default().to_string();
    match &err {
        RetrievalError::FetchFailed { source, .. } => warn!(
            pages = err.pages_fetched(),
            items = err.partial().len(),
            resume_cursor = %cursor,
            error = %source,
            "Listing incomplete; rerun with --page-token to resume"
        ),
        RetrievalError::Cancelled { .. } => warn!(
            pages = err.pages_fetched(),
            items = err.partial().len(),
            resume_cursor = %cursor,
            "Listing interrupted; rerun with --page-token to resume"
        ),
    }
    Ok(err.into_partial())
}

/// Trip `cancel` on Ctrl-C; the current page still completes
fn watch_ctrl_c(cancel: CancelToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; stopping after the current page");
            cancel.cancel();
        }
    })
}
