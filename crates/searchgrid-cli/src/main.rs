//! searchgrid CLI
//!
//! Checks admin → finder configuration and runs datagrid searches against
//! JSON fixtures with the in-memory transport.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod fixture;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};

use searchgrid::filter::NativeLabels;
use searchgrid::{
    AdminContext, ConfiguredFinders, FilterResolver, NoFixups, SearchDatagridBuilder,
    SearchGridConfig, SimpleSearch,
};

use crate::fixture::Fixture;

/// searchgrid - search-backed admin datagrids
#[derive(Parser, Debug)]
#[command(name = "searchgrid")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a configuration file and print the admin → finder table
    Check {
        /// Configuration file path
        config: PathBuf,
    },
    /// Run one datagrid page against a JSON fixture
    Search {
        /// Configuration file path
        #[arg(short, long, env = "SEARCHGRID_CONFIG")]
        config: PathBuf,

        /// Admin identifier
        #[arg(short, long)]
        admin: String,

        /// Fixture with documents, filters, and values
        #[arg(short, long)]
        fixture: PathBuf,

        /// Page offset
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,

        /// Page size
        #[arg(long, default_value_t = 25, allow_negative_numbers = true)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Check { config } => {
            for line in check(&config)? {
                println!("{line}");
            }
            Ok(())
        }
        Command::Search {
            config,
            admin,
            fixture,
            offset,
            limit,
        } => {
            let output = search(&config, &admin, &fixture, offset, limit).await?;
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
    }
}

fn load_config(path: &Path) -> Result<SearchGridConfig> {
    SearchGridConfig::load(path).with_context(|| format!("loading {}", path.display()))
}

/// Admin → finder table of a validated configuration, one line per admin.
fn check(path: &Path) -> Result<Vec<String>> {
    let config = load_config(path)?;
    tracing::info!(
        admins = config.admin_finder_services.len(),
        "Configuration is valid"
    );
    let mut lines: Vec<String> = config
        .admin_finder_services
        .iter()
        .map(|(admin, service)| format!("{admin} -> {}", service.finder))
        .collect();
    if let Some(timeout) = config.timeout() {
        lines.push(format!("timeout: {}ms", timeout.as_millis()));
    }
    Ok(lines)
}

/// Run one datagrid page against a fixture.
///
/// A filter that fails to resolve is left off the datagrid with a warning;
/// the remaining filters still apply.
async fn search(
    config_path: &Path,
    admin_code: &str,
    fixture_path: &Path,
    offset: i64,
    limit: i64,
) -> Result<Value> {
    let config = load_config(config_path)?;
    let fixture = Fixture::load(fixture_path)?;

    let finder = config
        .finder_for(admin_code)
        .with_context(|| format!("no finder configured for admin '{admin_code}'"))?
        .to_string();

    let transport = SimpleSearch::from_documents(
        finder.as_str(),
        fixture.documents.clone(),
        &fixture.id_field,
    )?;
    tracing::info!(
        finder = %finder,
        documents = transport.len(),
        "Loaded fixture documents"
    );

    let finders = ConfiguredFinders::new(config).register(finder.as_str(), Arc::new(transport));
    let builder = SearchDatagridBuilder::new(
        Arc::new(NoFixups),
        FilterResolver::new(Arc::new(fixture.guesser()), Arc::new(NativeLabels)),
        Arc::new(finders),
    );

    let admin = AdminContext::new(
        admin_code,
        fixture.entity_class.as_str(),
        fixture.model_manager.as_str(),
    );
    let mut datagrid = builder.base_datagrid(&admin, fixture.values.clone())?;
    let mut skipped = Vec::new();
    for declaration in &fixture.filters {
        let mut field = declaration.to_field_description();
        builder.fix_field_description(&admin, &mut field);
        if let Err(e) = builder.add_filter(&mut datagrid, &field, &admin) {
            tracing::warn!(field = %declaration.field, error = %e, "Skipping filter");
            skipped.push(declaration.field.clone());
        }
    }

    let query = datagrid.build_query()?;
    let page = datagrid.results().execute(&query, offset, limit).await?;
    let filters: Vec<&str> = datagrid
        .filters()
        .iter()
        .map(|descriptor| descriptor.field().as_str())
        .collect();

    Ok(json!({
        "admin": admin.code,
        "finder": finder,
        "filters": filters,
        "skipped_filters": skipped,
        "query": query.to_dsl(),
        "page": {
            "offset": page.offset,
            "limit": page.limit,
            "total": page.total,
            "page_number": page.page_number(),
            "last_page": page.last_page(),
            "has_next": page.has_next(),
            "has_previous": page.has_previous(),
            "items": page.items,
        },
    }))
}
