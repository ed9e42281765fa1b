use crate::types::{FieldKind, ResolvedProject};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Project id, then an indented field listing
    Pretty,
    /// A single JSON document
    Json,
}

pub fn render(project: &ResolvedProject, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Pretty => Ok(render_pretty(project)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(project)? + "\n"),
    }
}

fn render_pretty(project: &ResolvedProject) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "{}", project.project_id);
    if project.fields.is_empty() {
        let _ = writeln!(out, "(no custom fields)");
    }
    for field in project.fields.values() {
        let kind = match &field.kind {
            FieldKind::Plain => "field",
            FieldKind::Iteration => "iteration",
            FieldKind::SingleSelect { .. } => "single-select",
        };
        let _ = writeln!(out, "{} [{}] {}", field.name, kind, field.id);
        if let Some(options) = field.options() {
            for (name, id) in options {
                let _ = writeln!(out, "    {} = {}", name, id);
            }
        }
    }
    out
}
