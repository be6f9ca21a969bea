//! CLI command implementations
//!
//! `validate`, `evaluate` and `export` are offline: they read JSON files,
//! print to stdout and never start the server.

use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use crate::attribute::{Attribute, AttributeDefinition, AttributeStore};
use crate::audit::AuditService;
use crate::conclusion::{findings_to_csv, Conclusion};
use crate::config::AppConfig;
use crate::engine::AuditEngine;
use crate::http_server::HttpServer;
use crate::observability::{log_event_with_fields, Event};
use crate::workpaper::{WorkPaperStore, WorkPaperSubmission};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_json_file, write_response, write_text};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(config.as_deref(), port),
        Command::Validate { attributes } => validate(&attributes),
        Command::Evaluate {
            attributes,
            work_paper,
            config,
        } => evaluate(&attributes, &work_paper, config.as_deref()),
        Command::Export { conclusion } => export(&conclusion),
    }
}

/// Validates and types every definition; the first bad one aborts.
///
/// Ids are assigned in file order starting at 1, as the store would.
pub fn load_attributes(path: &Path) -> CliResult<Vec<Attribute>> {
    let definitions: Vec<AttributeDefinition> = read_json_file(path)?;
    let store = AttributeStore::new();
    for (index, definition) in definitions.iter().enumerate() {
        store.create(definition, 0).map_err(|e| {
            CliError::invalid_input(format!("attribute #{} ('{}'): {}", index, definition.name, e))
        })?;
    }
    Ok(store.snapshot()?)
}

pub fn validate(attributes_path: &Path) -> CliResult<()> {
    let attributes = load_attributes(attributes_path)?;
    write_response(json!({
        "total": attributes.len(),
        "attributes": attributes,
    }))
}

/// Offline audit of one work paper.
pub fn evaluate(
    attributes_path: &Path,
    work_paper_path: &Path,
    config_path: Option<&Path>,
) -> CliResult<()> {
    let config = AppConfig::load_or_default(config_path)?;
    let attributes = load_attributes(attributes_path)?;

    let submission: WorkPaperSubmission = read_json_file(work_paper_path)?;
    let work_paper = WorkPaperStore::new(config.max_form_fields).submit(submission, 0)?;

    let conclusion = AuditEngine::new(config.engine_options()).run(&work_paper, &attributes)?;
    write_response(serde_json::to_value(&conclusion)?)
}

pub fn export(conclusion_path: &Path) -> CliResult<()> {
    let conclusion: Conclusion = read_json_file(conclusion_path)?;
    write_text(&findings_to_csv(&conclusion.findings))
}

/// Start the HTTP API and block until it stops.
pub fn serve(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    let mut config = AppConfig::load_or_default(config_path)?;
    if let Some(port) = port {
        config.http.port = port;
        config.validate()?;
    }

    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            (
                "conclusions",
                config
                    .conclusions_path
                    .as_deref()
                    .and_then(Path::to_str)
                    .unwrap_or("memory"),
            ),
            ("date_format", &config.date_format),
            ("max_form_fields", &config.max_form_fields.to_string()),
        ],
    );

    let service = AuditService::from_config(&config)
        .map_err(|e| CliError::serve_failed(format!("Failed to open conclusion store: {}", e)))?;
    let service = Arc::new(service);
    let server = HttpServer::with_config(config.http.clone(), service);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}
