use std::collections::HashSet;
use std::ops::Range;
use std::path::PathBuf;

/// Source information for where a diagnostic came from
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub file_path: PathBuf,
    pub content: String,
}

/// A byte range inside one config file
#[derive(Debug, Clone)]
pub struct SourceLocation {
    pub file_path: PathBuf,
    pub span: Range<usize>,
    pub content: String,
}

impl SourceLocation {
    pub fn new(source: &SourceInfo, span: Range<usize>) -> Self {
        Self {
            file_path: source.file_path.clone(),
            span,
            content: source.content.clone(),
        }
    }
}

/// A diagnostic message that can be either a warning or an error
#[derive(Debug, Clone)]
pub enum Diagnostic {
    Warning(Warning),
    Error(Error),
}

/// Warning messages that don't prevent config loading
#[derive(Debug, Clone)]
pub enum Warning {
    EmptyConfig {
        file_path: PathBuf,
    },
    /// The tile will render nothing until an entity is set.
    TileWithoutEntity {
        tile: String,
        location: Option<SourceLocation>,
    },
    NotAnUpdateEntity {
        tile: String,
        entity: String,
        location: Option<SourceLocation>,
    },
}

/// Error messages that indicate problems with the config
#[derive(Debug, Clone)]
pub enum Error {
    Merge(MergeError),
    Validation(ValidationError),
}

/// Error type for merge conflicts
#[derive(Debug, Clone)]
pub struct MergeError {
    pub field_path: String,
    pub message: String,
    pub conflicts: Vec<SourceLocation>,
}

/// Error type for validation failures
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field_path: String,
    pub message: String,
    pub location: Option<SourceLocation>,
}

/// Error type for config loading failures (parse errors, IO errors, etc.)
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read '{}': {error}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("Failed to parse '{}': {error}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        error: toml::de::Error,
    },

    #[error("Import cycle detected at '{}': involves {} file(s)", path.display(), cycle.len())]
    ImportCycle { path: PathBuf, cycle: Vec<PathBuf> },
}

impl Diagnostic {
    /// Returns true if this diagnostic is an error
    pub fn is_error(&self) -> bool {
        matches!(self, Diagnostic::Error(_))
    }

    /// Returns true if this diagnostic is a warning
    pub fn is_warning(&self) -> bool {
        matches!(self, Diagnostic::Warning(_))
    }
}

/// Format all diagnostics for display using Ariadne
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    let mut output = Vec::new();

    for diagnostic in diagnostics {
        match diagnostic {
            Diagnostic::Warning(warning) => match warning {
                Warning::EmptyConfig { file_path } => {
                    let warning_msg = format!(
                        "Warning: Config file '{}' is empty and has no effect\n",
                        file_path.display()
                    );
                    output.extend_from_slice(warning_msg.as_bytes());
                }
                Warning::TileWithoutEntity { tile, location } => {
                    let message = format!("Tile '{}' has no entity and will render nothing", tile);
                    write_located(
                        &mut output,
                        ariadne::ReportKind::Warning,
                        &message,
                        None,
                        location.as_ref(),
                        "tile defined here",
                    );
                }
                Warning::NotAnUpdateEntity {
                    tile,
                    entity,
                    location,
                } => {
                    let message = format!(
                        "Tile '{}' points at '{}', which is not an update entity",
                        tile, entity
                    );
                    write_located(
                        &mut output,
                        ariadne::ReportKind::Warning,
                        &message,
                        Some("only entities in the 'update' domain can be presented"),
                        location.as_ref(),
                        "tile defined here",
                    );
                }
            },
            Diagnostic::Error(error) => match error {
                Error::Merge(merge_error) => write_merge_error(&mut output, merge_error),
                Error::Validation(validation_error) => {
                    let message = format!(
                        "Validation error in '{}': {}",
                        validation_error.field_path, validation_error.message
                    );
                    write_located(
                        &mut output,
                        ariadne::ReportKind::Error,
                        &message,
                        None,
                        validation_error.location.as_ref(),
                        "invalid value here",
                    );
                }
            },
        }
    }

    String::from_utf8_lossy(&output).to_string()
}

fn report_config() -> ariadne::Config {
    ariadne::Config::default().with_color(false)
}

fn write_merge_error(output: &mut Vec<u8>, merge_error: &MergeError) {
    use ariadne::Label;
    use ariadne::Report;
    use ariadne::ReportKind;
    use ariadne::Source;

    let Some(first_conflict) = merge_error.conflicts.first() else {
        let msg = format!(
            "Merge conflict in field '{}': {}\n",
            merge_error.field_path, merge_error.message
        );
        output.extend_from_slice(msg.as_bytes());
        return;
    };

    let mut report = Report::build(
        ReportKind::Error,
        (
            first_conflict.file_path.to_string_lossy().to_string(),
            first_conflict.span.clone(),
        ),
    )
    .with_config(report_config())
    .with_message(format!("Merge conflict in field '{}'", merge_error.field_path))
    .with_note(&merge_error.message);

    // Add labels for each conflict location
    for (idx, conflict) in merge_error.conflicts.iter().enumerate() {
        let label_msg = if idx == 0 {
            "first definition here"
        } else {
            "conflicts with this definition"
        };

        report = report.with_label(
            Label::new((
                conflict.file_path.to_string_lossy().to_string(),
                conflict.span.clone(),
            ))
            .with_message(label_msg),
        );
    }

    let finished_report = report.finish();

    // Conflicts span several files; render the report against each of them
    let mut written_files = HashSet::new();
    for conflict in &merge_error.conflicts {
        let file_id = conflict.file_path.to_string_lossy().to_string();
        if written_files.insert(file_id.clone()) {
            let source = Source::from(&conflict.content);
            finished_report.write((file_id, source), &mut *output).ok();
        }
    }
}

fn write_located(
    output: &mut Vec<u8>,
    kind: ariadne::ReportKind<'static>,
    message: &str,
    note: Option<&str>,
    location: Option<&SourceLocation>,
    label: &str,
) {
    use ariadne::Label;
    use ariadne::Report;
    use ariadne::Source;

    let Some(location) = location else {
        let prefix = match kind {
            ariadne::ReportKind::Warning => "Warning",
            _ => "Error",
        };
        let mut msg = format!("{}: {}\n", prefix, message);
        if let Some(note) = note {
            msg.push_str(&format!("  note: {}\n", note));
        }
        output.extend_from_slice(msg.as_bytes());
        return;
    };

    let file_id = location.file_path.to_string_lossy().to_string();
    let mut report = Report::build(kind, (file_id.clone(), location.span.clone()))
        .with_config(report_config())
        .with_message(message)
        .with_label(Label::new((file_id.clone(), location.span.clone())).with_message(label));
    if let Some(note) = note {
        report = report.with_note(note);
    }

    report
        .finish()
        .write((file_id, Source::from(&location.content)), &mut *output)
        .ok();
}
