//! CLI command implementations
//!
//! Network commands build a tokio runtime per invocation. `explain` runs
//! offline and never touches the network.

use std::path::Path;

use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::client::Directus;
use crate::query::{Explain, Filter, Query, SortKey};
use crate::session::config::{TOKEN_VARS, URL_VARS};
use crate::session::ClientConfig;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{dump_path, write_dump, write_line};

const DEFAULT_LOG_FILTER: &str = "info";

/// Parse arguments, set up logging and run the command
pub fn run() -> CliResult<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse_args();
    init_logging();
    run_command(cli)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cli: Cli) -> CliResult<()> {
    let Cli {
        url,
        token,
        command,
    } = cli;

    match command {
        Command::Explain {
            collection,
            filter,
            fields,
            sort,
            limit,
        } => {
            let explain = explain_query(&collection, &filter, &fields, sort.as_deref(), limit)?;
            write_line(explain)
        }
        command => {
            let config = client_config(url.as_deref(), token.as_deref())?;
            let rt = tokio::runtime::Runtime::new().map_err(|e| {
                CliError::io_error(format!("Failed to create tokio runtime: {}", e))
            })?;
            rt.block_on(run_remote(config, command))
        }
    }
}

async fn run_remote(config: ClientConfig, command: Command) -> CliResult<()> {
    let client = Directus::connect(config).await?;

    match command {
        Command::Ping => {
            let ms = client.ping().await?;
            write_line(format!("{} ok ({} ms)", client.url(), ms))
        }
        Command::Collections { system } => {
            for name in client.collection_names(system).await? {
                write_line(name)?;
            }
            Ok(())
        }
        Command::Fields { collection } => {
            let collection = client.collection(&collection).await?;
            write_line(collection.field_table())
        }
        Command::Dump { endpoints, out } => dump(&client, &endpoints, &out).await,
        Command::Explain { .. } => Err(CliError::invalid_argument(
            "explain does not need a server connection",
        )),
    }
}

/// Save each endpoint's unwrapped payload under `out`
async fn dump(client: &Directus, endpoints: &[String], out: &Path) -> CliResult<()> {
    for endpoint in endpoints {
        let path = dump_path(out, endpoint)?;
        let data = client.raw_endpoint(endpoint).await?;
        write_dump(&path, data)?;
        info!(endpoint = %endpoint, path = %path.display(), "Dumped endpoint");
        write_line(path.display())?;
    }
    Ok(())
}

/// Build the query described by the `explain` arguments
pub fn explain_query(
    collection: &str,
    filter: &str,
    fields: &[String],
    sort: Option<&str>,
    limit: Option<i64>,
) -> CliResult<Explain> {
    let raw: Value = serde_json::from_str(filter)
        .map_err(|e| CliError::invalid_argument(format!("filter is not valid JSON: {}", e)))?;
    let filter = Filter::from_json(&raw).map_err(crate::Error::from)?;
    filter.validate_operands().map_err(crate::Error::from)?;

    let mut query = Query::new(collection)
        .select(fields.iter().filter(|f| !f.is_empty()))
        .filter(filter);

    if let Some(sort) = sort {
        for key in SortKey::parse_list(sort).map_err(crate::Error::from)? {
            query = query.sort_by(key);
        }
    }
    if let Some(limit) = limit {
        if limit < -1 {
            return Err(CliError::invalid_argument(format!(
                "limit must be -1 or greater, got {}",
                limit
            )));
        }
        query = query.limit(limit);
    }

    Ok(query.explain())
}

/// Url and token from flags, falling back to the environment
fn client_config(url: Option<&str>, token: Option<&str>) -> CliResult<ClientConfig> {
    let config = ClientConfig::from_lookup(|key| {
        let flag = if URL_VARS.contains(&key) {
            url
        } else if TOKEN_VARS.contains(&key) {
            token
        } else {
            None
        };
        flag.map(str::to_string)
            .or_else(|| std::env::var(key).ok())
    })
    .map_err(|e| CliError::config_error(e.to_string()))?;
    Ok(config)
}

/// Compact stderr logging, filtered by `RUST_LOG`
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .with_ansi(true)
        .compact()
        .with_env_filter(filter)
        .init();
}
