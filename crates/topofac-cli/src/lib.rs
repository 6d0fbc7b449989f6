//! TopFac CLI library
//!
//! This module contains the core CLI logic for the TopFac diagram tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, OutputFormat};

use std::fs;

use log::{info, log};

use topofac::{DiagramBuilder, ParseError, TopofacError};

/// Run the TopFac CLI application
///
/// Reads the topology text, then either validates it (`--check`) or
/// renders it in the selected format and writes the result to the output
/// file.
///
/// # Errors
///
/// Returns `TopofacError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors, or validation errors in `--check` mode
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), TopofacError> {
    info!(input_path = args.input; "Processing topology");

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(direction) = args.direction {
        app_config = app_config.with_direction(direction);
    }

    let source = fs::read_to_string(&args.input)?;
    let builder = DiagramBuilder::new(app_config);

    if args.check {
        return check(&builder, &source);
    }

    let format = args.output_format();
    let output = args.output_path(format);

    let topology = builder.parse(&source)?;
    let content = match format.diagram_format() {
        Some(diagram_format) => builder.render(&topology, diagram_format)?.into_content(),
        None => builder.export_json(&topology)?,
    };

    fs::write(&output, content)?;

    info!(
        output_file = output.display().to_string(),
        format = format.as_str();
        "Topology exported successfully"
    );

    Ok(())
}

/// Validate the source text without writing any output.
fn check(builder: &DiagramBuilder, source: &str) -> Result<(), TopofacError> {
    let report = builder.validate(source);

    for diagnostic in report.warnings().iter().chain(report.errors()) {
        log!(diagnostic.severity().log_level(), "{diagnostic}");
    }

    info!(
        total_lines = report.total_lines(),
        valid_lines = report.valid_lines(),
        warnings = report.warnings().len();
        "Validation finished"
    );

    if report.is_valid() {
        Ok(())
    } else {
        let err = ParseError::new(report.errors().to_vec());
        Err(TopofacError::new_parse_error(err, source))
    }
}
