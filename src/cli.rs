use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::warn;

use crate::core::command::Backend;
use crate::core::error::AppError;
use crate::core::form::{FormController, FormOptions};
use crate::core::formatter::{
    format_command, format_option_lines, format_plain, format_selection_line, format_status_line,
    OutputFormat,
};
use crate::core::language::{looks_like_language_code, LANGUAGES};
use crate::core::media::{FileKind, SelectedFile};

#[derive(Debug, Parser)]
#[command(
    name = "submerge-gen",
    version,
    about = "Build subMerge command lines for attaching subtitles to a video"
)]
pub struct Cli {
    /// TOML file with initial form values and logging settings
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Interactive terminal form (default)
    Form,
    /// Line-oriented session on stdin/stdout
    Repl,
    /// Print the commands for the given values and exit
    Generate(GenerateArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Plain,
    Html,
    Shell,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Plain => OutputFormat::Plain,
            FormatArg::Html => OutputFormat::Html,
            FormatArg::Shell => OutputFormat::Shell,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Cpp,
    Python,
    Both,
}

impl BackendArg {
    pub fn backends(self) -> Vec<Backend> {
        match self {
            BackendArg::Cpp => vec![Backend::Cpp],
            BackendArg::Python => vec![Backend::Python],
            BackendArg::Both => Backend::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[arg(short = 'i', long = "input", value_name = "VIDEO")]
    pub video: String,
    #[arg(short = 's', long = "subtitle")]
    pub subtitle: Option<String>,
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,
    #[arg(short = 'l', long = "lang")]
    pub language: Option<String>,
    /// Tag the video with metadata, optionally with a title value
    #[arg(short = 'm', long = "metadata", num_args = 0..=1, default_missing_value = "")]
    pub metadata: Option<String>,
    #[arg(long = "clear-subs")]
    pub clear_subs: bool,
    #[arg(long = "metadata-only")]
    pub metadata_only: bool,
    #[arg(long, value_enum, default_value_t = FormatArg::Plain)]
    pub format: FormatArg,
    #[arg(long, value_enum, default_value_t = BackendArg::Both)]
    pub backend: BackendArg,
}

impl GenerateArgs {
    /// Flags given on the command line win over the configured defaults.
    pub fn apply_to(&self, options: &mut FormOptions) {
        if let Some(output) = &self.output {
            options.output_path = output.clone();
        }
        if let Some(language) = &self.language {
            options.language = language.clone();
        }
        if let Some(value) = &self.metadata {
            options.add_metadata = true;
            options.metadata_value = value.clone();
        }
        options.clear_subs |= self.clear_subs;
        options.metadata_only |= self.metadata_only;
    }
}

pub fn run_generate(args: &GenerateArgs, defaults: FormOptions) -> Result<String, AppError> {
    let mut form = FormController::new(defaults);
    args.apply_to(form.options_mut());
    warn_unusual_language(&form.options().language);

    if let Some(Err(err)) = form.choose_files(FileKind::Video, vec![SelectedFile::from_path(&args.video)]) {
        return Err(err.into());
    }
    if let Some(subtitle) = &args.subtitle {
        if let Some(Err(err)) = form.choose_files(FileKind::Subtitle, vec![SelectedFile::from_path(subtitle)]) {
            return Err(err.into());
        }
    }

    let command = form.generate()?;
    Ok(format_command(command, &args.backend.backends(), args.format.into()))
}

pub fn warn_unusual_language(code: &str) {
    if !looks_like_language_code(code) {
        warn!(code, "language does not look like an ISO 639 code");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

fn toggle(current: bool, state: Option<Toggle>) -> bool {
    match state {
        Some(Toggle::On) => true,
        Some(Toggle::Off) => false,
        None => !current,
    }
}

#[derive(Debug, Parser)]
#[command(name = "submerge", disable_help_subcommand = true)]
struct SessionCli {
    #[command(subcommand)]
    command: SessionCommand,
}

/// One line typed into the form or the REPL.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum SessionCommand {
    /// Pick the video file (first path wins)
    Video {
        #[arg(required = true, num_args = 1..)]
        paths: Vec<String>,
    },
    /// Pick the subtitle file (first path wins)
    Subtitle {
        #[arg(required = true, num_args = 1..)]
        paths: Vec<String>,
    },
    /// Set or clear the output path
    Output { path: Option<String> },
    /// Set the subtitle language code
    Lang { code: String },
    Metadata { state: Option<Toggle> },
    /// Set or clear the metadata title
    MetaValue { value: Option<String> },
    ClearSubs { state: Option<Toggle> },
    MetadataOnly { state: Option<Toggle> },
    Generate,
    Show,
    Languages,
}

/// Splits a line into words with shell quoting rules, except that an
/// unquoted backslash only escapes whitespace or a quote. Any other backslash
/// is kept, so Windows paths such as `C:\Videos\a.mkv` survive.
pub fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut protected = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (None, '\\') => match chars.peek() {
                Some(&next) if next.is_whitespace() || next == '\'' || next == '"' => {
                    protected.push(ch);
                    protected.push(next);
                    chars.next();
                }
                _ => protected.push_str("\\\\"),
            },
            (None, '\'' | '"') => {
                quote = Some(ch);
                protected.push(ch);
            }
            (Some('"'), '\\') => {
                protected.push(ch);
                if let Some(next) = chars.next() {
                    protected.push(next);
                }
            }
            (Some(open), _) if ch == open => {
                quote = None;
                protected.push(ch);
            }
            _ => protected.push(ch),
        }
    }

    shell_words::split(&protected).map_err(|err| err.to_string())
}

pub fn parse_line(line: &str) -> Result<SessionCommand, String> {
    let mut argv = Vec::new();
    argv.push("submerge".to_string());

    argv.extend(split_words(line)?);

    let parsed = SessionCli::try_parse_from(argv).map_err(|err| err.to_string())?;
    Ok(parsed.command)
}

pub const SESSION_HELP: [&str; 12] = [
    "Commands:",
    "  video <path>            choose the video file",
    "  subtitle <path>         choose the subtitle file",
    "  output [path]           set (or clear) the output path",
    "  lang <code>             subtitle language (default eng)",
    "  metadata [on|off]       add metadata",
    "  meta-value [text]       metadata title value",
    "  clear-subs [on|off]     remove existing subtitles",
    "  metadata-only [on|off]  only tag metadata, no subtitle",
    "  generate                build the commands",
    "  show / languages        print the form / known language codes",
    "  clear / exit",
];

/// Applies a session command and returns the lines to show the user.
/// A rejected file produces no lines; the caller shows `form.alert()`.
pub fn apply(form: &mut FormController, command: SessionCommand) -> Vec<String> {
    match command {
        SessionCommand::Video { paths } => choose(form, FileKind::Video, paths),
        SessionCommand::Subtitle { paths } => choose(form, FileKind::Subtitle, paths),
        SessionCommand::Output { path } => {
            form.options_mut().output_path = path.unwrap_or_default();
            vec![format_option_lines(form.options())[0].clone()]
        }
        SessionCommand::Lang { code } => {
            warn_unusual_language(&code);
            form.options_mut().language = code;
            vec![format_option_lines(form.options())[1].clone()]
        }
        SessionCommand::Metadata { state } => {
            let options = form.options_mut();
            options.add_metadata = toggle(options.add_metadata, state);
            vec![format_option_lines(form.options())[2].clone()]
        }
        SessionCommand::MetaValue { value } => {
            form.options_mut().metadata_value = value.unwrap_or_default();
            vec![format_option_lines(form.options())[2].clone()]
        }
        SessionCommand::ClearSubs { state } => {
            let options = form.options_mut();
            options.clear_subs = toggle(options.clear_subs, state);
            vec![format_option_lines(form.options())[3].clone()]
        }
        SessionCommand::MetadataOnly { state } => {
            let options = form.options_mut();
            options.metadata_only = toggle(options.metadata_only, state);
            vec![format_option_lines(form.options())[4].clone()]
        }
        SessionCommand::Generate => {
            let mut lines = Vec::new();
            if let Ok(command) = form.generate() {
                lines.extend(format_plain(command, &Backend::ALL).lines().map(str::to_string));
            }
            if let Some(status) = form.status() {
                lines.push(format_status_line(status));
            }
            lines
        }
        SessionCommand::Show => {
            let mut lines = vec![
                format_selection_line(FileKind::Video, form.video()),
                format_selection_line(FileKind::Subtitle, form.subtitle()),
            ];
            lines.extend(format_option_lines(form.options()));
            if let Some(status) = form.status() {
                lines.push(format_status_line(status));
            }
            lines
        }
        SessionCommand::Languages => LANGUAGES
            .iter()
            .map(|(code, name)| format!("{code}  {name}"))
            .collect(),
    }
}

fn choose(form: &mut FormController, kind: FileKind, paths: Vec<String>) -> Vec<String> {
    let files = paths.iter().map(|path| SelectedFile::from_path(path)).collect();
    match form.choose_files(kind, files) {
        Some(Ok(())) => vec![format_selection_line(kind, form.selected(kind))],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::FormError;

    fn generate_args(argv: &[&str]) -> GenerateArgs {
        let mut full = vec!["submerge-gen", "generate"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Some(Commands::Generate(args)) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn no_subcommand_means_form() {
        let cli = Cli::try_parse_from(["submerge-gen", "--config", "a.toml"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));
    }

    #[test]
    fn generate_prints_both_commands() {
        let args = generate_args(&["-i", "/films/a.mp4", "-s", "b.srt", "-l", "spa"]);
        let text = run_generate(&args, FormOptions::default()).unwrap();
        assert_eq!(
            text,
            "Generated Command CPP:\n./subMerge.exe -i \"a.mp4\" -s \"b.srt\" -l spa\n\n\
             Generated Command Python:\npython main.py -i \"a.mp4\" -s \"b.srt\" -l spa"
        );
    }

    #[test]
    fn generate_metadata_flag_with_and_without_value() {
        let args = generate_args(&["-i", "a.mp4", "--metadata-only", "-m", "--backend", "cpp"]);
        assert_eq!(
            run_generate(&args, FormOptions::default()).unwrap(),
            "Generated Command CPP:\n./subMerge.exe -i \"a.mp4\" -m -m"
        );

        let args = generate_args(&["-i", "a.mp4", "-s", "b.srt", "-m", "Director's Cut", "--backend", "python"]);
        assert!(run_generate(&args, FormOptions::default())
            .unwrap()
            .ends_with(r#"-m "Director's Cut""#));
    }

    #[test]
    fn generate_reports_form_errors() {
        let args = generate_args(&["-i", "notes.txt", "-s", "b.srt"]);
        let err = run_generate(&args, FormOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Form(FormError::InvalidExtension { kind: FileKind::Video, .. })
        ));
        assert_eq!(err.to_string(), "Please select a valid video file!");

        let args = generate_args(&["-i", "a.mp4"]);
        let err = run_generate(&args, FormOptions::default()).unwrap_err();
        assert!(matches!(err, AppError::Form(FormError::MissingSubtitle)));
    }

    #[test]
    fn generate_uses_configured_defaults() {
        let defaults = FormOptions {
            clear_subs: true,
            output_path: "out.mkv".to_string(),
            ..FormOptions::default()
        };
        let args = generate_args(&["-i", "a.mp4", "-s", "b.srt", "--backend", "cpp", "--format", "shell"]);
        assert_eq!(
            run_generate(&args, defaults).unwrap(),
            "./subMerge.exe -i a.mp4 -s b.srt -o out.mkv --clear-subs"
        );
    }

    #[test]
    fn session_lines_parse() {
        assert_eq!(
            parse_line("video '/tmp/my clip.mkv' other.mp4").unwrap(),
            SessionCommand::Video {
                paths: vec!["/tmp/my clip.mkv".to_string(), "other.mp4".to_string()]
            }
        );
        assert_eq!(
            parse_line("metadata-only on").unwrap(),
            SessionCommand::MetadataOnly {
                state: Some(Toggle::On)
            }
        );
        assert_eq!(
            parse_line("meta-value \"Director's Cut\"").unwrap(),
            SessionCommand::MetaValue {
                value: Some("Director's Cut".to_string())
            }
        );
        assert_eq!(parse_line("output").unwrap(), SessionCommand::Output { path: None });
        assert!(parse_line("encode -i a.mp4").is_err());
        assert!(parse_line("video").is_err());
        assert!(parse_line("video 'unterminated").is_err());
    }

    #[test]
    fn backslashes_survive_unless_escaping() {
        assert_eq!(
            split_words(r"video C:\Videos\Movie.MP4").unwrap(),
            vec!["video", r"C:\Videos\Movie.MP4"]
        );
        assert_eq!(
            split_words(r#""C:\My Videos\a.mkv" 'D:\x.srt'"#).unwrap(),
            vec![r"C:\My Videos\a.mkv", r"D:\x.srt"]
        );
        assert_eq!(
            split_words(r"/home/me/My\ Movie.mkv it\'s.srt").unwrap(),
            vec!["/home/me/My Movie.mkv", "it's.srt"]
        );
        assert_eq!(split_words(r"\\nas\share\b.srt").unwrap(), vec![r"\\nas\share\b.srt"]);
        assert!(split_words("'open").is_err());
    }

    #[test]
    fn windows_path_on_session_line_keeps_file_name() {
        let mut form = FormController::default();
        let lines = apply(&mut form, parse_line(r"video C:\Videos\Movie.MP4").unwrap());
        assert_eq!(form.video().unwrap().name(), "Movie.MP4");
        assert_eq!(lines, vec!["Video    : Movie.MP4".to_string()]);

        apply(&mut form, parse_line(r#"subtitle "C:\My Subs\Movie.fa.srt""#).unwrap());
        let tail = form.generate().unwrap().tail().to_string();
        assert_eq!(tail, r#" -i "Movie.MP4" -s "Movie.fa.srt""#);
    }

    #[test]
    fn session_commands_drive_the_form() {
        let mut form = FormController::default();
        assert_eq!(
            apply(&mut form, parse_line("video /tmp/clip.mkv").unwrap()),
            vec!["Video    : clip.mkv".to_string()]
        );
        assert!(apply(&mut form, parse_line("subtitle notes.txt").unwrap()).is_empty());
        assert_eq!(form.alert(), Some("Please select a valid subtitle file!"));
        form.dismiss_alert();

        apply(&mut form, parse_line("metadata").unwrap());
        assert!(form.options().add_metadata);
        apply(&mut form, parse_line("metadata").unwrap());
        assert!(!form.options().add_metadata);
        apply(&mut form, parse_line("metadata-only on").unwrap());

        let lines = apply(&mut form, SessionCommand::Generate);
        assert_eq!(lines[1], "./subMerge.exe -i \"clip.mkv\" -m");
        assert_eq!(lines[4], "python main.py -i \"clip.mkv\" -m");
        assert_eq!(
            lines.last().unwrap(),
            &format!("[status-success] {}", crate::core::form::SUCCESS_MESSAGE)
        );
    }

    #[test]
    fn failed_generate_only_reports_status() {
        let mut form = FormController::default();
        let lines = apply(&mut form, SessionCommand::Generate);
        assert_eq!(lines, vec!["[status-error] Please select a video file!".to_string()]);
    }
}
