use crate::core::command::{Backend, GeneratedCommand};
use crate::core::form::FormOptions;
use crate::core::language::language_name;
use crate::core::media::{FileKind, SelectedFile};
use crate::core::status::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Html,
    Shell,
}

pub fn format_command(command: &GeneratedCommand, backends: &[Backend], format: OutputFormat) -> String {
    match format {
        OutputFormat::Plain => format_plain(command, backends),
        OutputFormat::Html => format_html(command, backends),
        OutputFormat::Shell => backends
            .iter()
            .map(|backend| command.shell_line(*backend))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

pub fn format_plain(command: &GeneratedCommand, backends: &[Backend]) -> String {
    backends
        .iter()
        .map(|backend| format!("{}:\n{}", backend.title(), command.line(*backend)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The page fragment for the command output region. The command text is escaped.
pub fn format_html(command: &GeneratedCommand, backends: &[Backend]) -> String {
    backends
        .iter()
        .map(|backend| {
            format!(
                "<strong>{}:</strong><br><br>{}",
                backend.title(),
                escape_html(&command.line(*backend))
            )
        })
        .collect::<Vec<_>>()
        .join("<br><br><br>")
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

pub fn format_selection_line(kind: FileKind, file: Option<&SelectedFile>) -> String {
    let name = file.map(SelectedFile::name).unwrap_or("(none)");
    format!("{:<9}: {name}", kind.label())
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

pub fn format_option_lines(options: &FormOptions) -> Vec<String> {
    let output = if options.output_path.trim().is_empty() {
        "(next to input)"
    } else {
        options.output_path.as_str()
    };
    vec![
        format!("Output   : {output}"),
        match language_name(&options.language) {
            Some(name) => format!("Language : {} ({name})", options.language),
            None => format!("Language : {}", options.language),
        },
        format!(
            "{} Add metadata  value: {}",
            checkbox(options.add_metadata),
            options.metadata_value
        ),
        format!("{} Clear existing subtitles", checkbox(options.clear_subs)),
        format!("{} Metadata only", checkbox(options.metadata_only)),
    ]
}

pub fn format_status_line(status: &Status) -> String {
    format!("[{}] {}", status.kind.class_name(), status.message)
}
