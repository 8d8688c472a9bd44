//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Tables are built from
//! the entity schema with `tabled`; structured formats use serde; plain
//! emits one id per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde_json::{Map, Value};
use tabled::builder::Builder;
use tabled::settings::Style;

use canopy_core::schema::value_text;
use canopy_core::{Entity, FieldKind, Severity, Stat};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Columns rendered with the record's severity color.
const SEVERITY_KEYS: &[&str] = &["conservationStatus", "healthStatus", "status", "conditionStatus"];

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

fn paint(text: &str, severity: Severity) -> String {
    match severity {
        Severity::Critical => text.red().bold().to_string(),
        Severity::Warning => text.yellow().to_string(),
        Severity::Good => text.green().to_string(),
        Severity::Neutral => text.to_owned(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of records in the chosen format.
pub fn render_records<E: Entity>(
    format: OutputFormat,
    records: &[E],
    color: bool,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            let mut builder = Builder::default();
            let mut header = vec!["ID".to_owned()];
            header.extend(E::COLUMNS.iter().map(|key| label_for::<E>(key).to_owned()));
            builder.push_record(header);

            for record in records {
                let image = image(record)?;
                let mut row = vec![record.id().map(|id| id.to_string()).unwrap_or_default()];
                row.extend(E::COLUMNS.iter().map(|key| {
                    let text = image.get(*key).map(value_text).unwrap_or_default();
                    if color && SEVERITY_KEYS.contains(key) {
                        paint(&text, record.severity())
                    } else {
                        text
                    }
                }));
                builder.push_record(row);
            }
            Ok(finish_table(builder))
        }
        OutputFormat::Plain => Ok(records
            .iter()
            .filter_map(Entity::id)
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join("\n")),
        structured => render_structured(structured, records),
    }
}

/// Render one record as a `Label: value` detail block.
pub fn render_record<E: Entity>(
    format: OutputFormat,
    record: &E,
    color: bool,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            let image = image(record)?;
            let id = record.id().map(|id| id.to_string()).unwrap_or_default();
            let width = E::FIELDS
                .iter()
                .map(|f| f.label.len())
                .max()
                .unwrap_or(0)
                .max(2);

            let mut lines = vec![format!("{:<width$}  {id}", "ID")];
            for field in E::FIELDS {
                let text = image.get(field.key).map(value_text).unwrap_or_default();
                let text = if text.is_empty() { "-".to_owned() } else { text };
                let text = if color && SEVERITY_KEYS.contains(&field.key) {
                    paint(&text, record.severity())
                } else {
                    text
                };
                lines.push(format!("{:<width$}  {text}", field.label));
            }
            Ok(lines.join("\n"))
        }
        OutputFormat::Plain => Ok(record.id().map(|id| id.to_string()).unwrap_or_default()),
        structured => render_structured(structured, record),
    }
}

/// Render the summary cards for a list.
pub fn render_stats(format: OutputFormat, stats: &[Stat]) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            let mut builder = Builder::default();
            builder.push_record(["Stat", "Value"]);
            for stat in stats {
                builder.push_record([stat.label.to_owned(), stat.value.to_string()]);
            }
            Ok(finish_table(builder))
        }
        OutputFormat::Plain => Ok(stats
            .iter()
            .map(|s| format!("{}\t{}", s.label, s.value))
            .collect::<Vec<_>>()
            .join("\n")),
        structured => render_structured(structured, stats),
    }
}

/// Describe the form schema of an entity.
pub fn render_fields<E: Entity>(format: OutputFormat) -> Result<String, CliError> {
    let rows: Vec<Value> = E::FIELDS
        .iter()
        .map(|f| {
            serde_json::json!({
                "key": f.key,
                "label": f.label,
                "kind": kind_name(f.kind),
                "required": f.required,
                "quick": f.quick,
                "options": match f.kind {
                    FieldKind::Choice(options) => options.to_vec(),
                    _ => Vec::new(),
                },
            })
        })
        .collect();

    match format {
        OutputFormat::Table => {
            let mut builder = Builder::default();
            builder.push_record(["Key", "Label", "Kind", "Required", "Quick", "Options"]);
            for f in E::FIELDS {
                let options = match f.kind {
                    FieldKind::Choice(options) => options.join(", "),
                    _ => f.hint.unwrap_or_default().to_owned(),
                };
                builder.push_record([
                    f.key.to_owned(),
                    f.label.to_owned(),
                    kind_name(f.kind).to_owned(),
                    yes_no(f.required),
                    yes_no(f.quick),
                    options,
                ]);
            }
            Ok(finish_table(builder))
        }
        OutputFormat::Plain => Ok(E::FIELDS
            .iter()
            .map(|f| f.key)
            .collect::<Vec<_>>()
            .join("\n")),
        structured => render_structured(structured, &rows),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn finish_table(builder: Builder) -> String {
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

fn render_structured<T: serde::Serialize + ?Sized>(
    format: OutputFormat,
    data: &T,
) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        _ => serde_json::to_string_pretty(data)?,
    })
}

fn image<E: Entity>(record: &E) -> Result<Map<String, Value>, CliError> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(CliError::Internal(format!(
            "{} did not serialize to an object: {other}",
            E::KIND.title()
        ))),
    }
}

fn label_for<E: Entity>(key: &str) -> &str {
    E::field(key).map_or(key, |f| f.label)
}

fn kind_name(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text => "text",
        FieldKind::Integer => "integer",
        FieldKind::Decimal => "decimal",
        FieldKind::Date => "date",
        FieldKind::Time => "time",
        FieldKind::Flag => "flag",
        FieldKind::Choice(_) => "choice",
        FieldKind::Reference => "reference",
    }
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_owned()
}
