pub const DEFAULT_LANGUAGE: &str = "eng";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Cpp,
    Python,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Cpp, Backend::Python];

    pub fn prefix(self) -> &'static str {
        match self {
            Backend::Cpp => "./subMerge.exe",
            Backend::Python => "python main.py",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Backend::Cpp => "Generated Command CPP",
            Backend::Python => "Generated Command Python",
        }
    }

    fn prefix_args(self) -> Vec<String> {
        self.prefix().split(' ').map(str::to_string).collect()
    }
}

/// One flag of the shared argument tail. Variants are listed in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeArg {
    Input(String),
    Subtitle(String),
    Output(String),
    Language(String),
    Metadata(Option<String>),
    ClearSubs,
    MetadataOnly,
}

impl MergeArg {
    fn render(&self, out: &mut String) {
        match self {
            MergeArg::Input(name) => out.push_str(&format!(" -i \"{name}\"")),
            MergeArg::Subtitle(name) => out.push_str(&format!(" -s \"{name}\"")),
            MergeArg::Output(path) => out.push_str(&format!(" -o \"{path}\"")),
            MergeArg::Language(code) => out.push_str(&format!(" -l {code}")),
            MergeArg::Metadata(Some(value)) => out.push_str(&format!(" -m \"{value}\"")),
            MergeArg::Metadata(None) | MergeArg::MetadataOnly => out.push_str(" -m"),
            MergeArg::ClearSubs => out.push_str(" --clear-subs"),
        }
    }

    fn push_args(&self, args: &mut Vec<String>) {
        let (flag, value) = match self {
            MergeArg::Input(name) => ("-i", Some(name)),
            MergeArg::Subtitle(name) => ("-s", Some(name)),
            MergeArg::Output(path) => ("-o", Some(path)),
            MergeArg::Language(code) => ("-l", Some(code)),
            MergeArg::Metadata(value) => ("-m", value.as_ref()),
            MergeArg::ClearSubs => ("--clear-subs", None),
            MergeArg::MetadataOnly => ("-m", None),
        };
        args.push(flag.to_string());
        if let Some(value) = value {
            args.push(value.clone());
        }
    }
}

/// Values the command is built from, already validated by the form.
#[derive(Debug, Clone, Default)]
pub struct MergeRequest {
    pub video: String,
    pub subtitle: Option<String>,
    pub output_path: String,
    pub language: String,
    pub add_metadata: bool,
    pub metadata_value: String,
    pub clear_subs: bool,
    pub metadata_only: bool,
}

impl MergeRequest {
    pub fn to_args(&self) -> Vec<MergeArg> {
        let mut args = vec![MergeArg::Input(self.video.clone())];

        if !self.metadata_only {
            if let Some(subtitle) = &self.subtitle {
                args.push(MergeArg::Subtitle(subtitle.clone()));
            }
        }

        let output_path = self.output_path.trim();
        if !output_path.is_empty() {
            args.push(MergeArg::Output(output_path.to_string()));
        }

        if self.language != DEFAULT_LANGUAGE {
            args.push(MergeArg::Language(self.language.clone()));
        }

        if self.add_metadata {
            let value = self.metadata_value.trim();
            if value.is_empty() {
                args.push(MergeArg::Metadata(None));
            } else {
                args.push(MergeArg::Metadata(Some(value.to_string())));
            }
        }

        if self.clear_subs {
            args.push(MergeArg::ClearSubs);
        }

        // Emitted even when add_metadata already produced a -m.
        if self.metadata_only {
            args.push(MergeArg::MetadataOnly);
        }

        args
    }

    pub fn build(&self) -> GeneratedCommand {
        GeneratedCommand::new(self.to_args())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCommand {
    args: Vec<MergeArg>,
    tail: String,
}

impl GeneratedCommand {
    pub fn new(args: Vec<MergeArg>) -> Self {
        let mut tail = String::new();
        for arg in &args {
            arg.render(&mut tail);
        }
        Self { args, tail }
    }

    /// The shared argument text, starting with a space.
    pub fn tail(&self) -> &str {
        &self.tail
    }

    pub fn line(&self, backend: Backend) -> String {
        format!("{}{}", backend.prefix(), self.tail)
    }

    /// Same command, quoted so it survives a POSIX shell regardless of the names involved.
    pub fn shell_line(&self, backend: Backend) -> String {
        let mut argv = backend.prefix_args();
        for arg in &self.args {
            arg.push_args(&mut argv);
        }
        shell_words::join(argv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(video: &str, subtitle: Option<&str>) -> MergeRequest {
        MergeRequest {
            video: video.to_string(),
            subtitle: subtitle.map(str::to_string),
            language: DEFAULT_LANGUAGE.to_string(),
            ..MergeRequest::default()
        }
    }

    #[test]
    fn default_language_is_omitted() {
        let cmd = request("a.mp4", Some("b.srt")).build();
        assert_eq!(cmd.tail(), r#" -i "a.mp4" -s "b.srt""#);
        assert_eq!(cmd.line(Backend::Cpp), r#"./subMerge.exe -i "a.mp4" -s "b.srt""#);
        assert_eq!(cmd.line(Backend::Python), r#"python main.py -i "a.mp4" -s "b.srt""#);
    }

    #[test]
    fn full_flag_order() {
        let mut req = request("a.mp4", Some("b.srt"));
        req.output_path = "  out/a.mkv ".to_string();
        req.language = "spa".to_string();
        req.add_metadata = true;
        req.metadata_value = " Director's Cut ".to_string();
        req.clear_subs = true;
        assert_eq!(
            req.build().tail(),
            r#" -i "a.mp4" -s "b.srt" -o "out/a.mkv" -l spa -m "Director's Cut" --clear-subs"#
        );
    }

    #[test]
    fn metadata_without_value_is_bare() {
        let mut req = request("a.mp4", Some("b.srt"));
        req.add_metadata = true;
        req.metadata_value = "   ".to_string();
        assert_eq!(req.build().tail(), r#" -i "a.mp4" -s "b.srt" -m"#);
    }

    #[test]
    fn metadata_only_skips_subtitle_and_appends_flag() {
        let mut req = request("clip.mkv", Some("b.srt"));
        req.metadata_only = true;
        assert_eq!(req.build().tail(), r#" -i "clip.mkv" -m"#);
    }

    #[test]
    fn both_metadata_flags_are_emitted() {
        let mut req = request("clip.mkv", None);
        req.add_metadata = true;
        req.metadata_value = "ro-ox.com".to_string();
        req.clear_subs = true;
        req.metadata_only = true;
        let cmd = req.build();
        assert_eq!(cmd.tail(), r#" -i "clip.mkv" -m "ro-ox.com" --clear-subs -m"#);
        assert_eq!(cmd.tail().matches(" -m").count(), 2);
    }

    #[test]
    fn shell_line_quotes_awkward_names() {
        let mut req = request("my movie.mp4", Some("it's.srt"));
        req.add_metadata = true;
        let cmd = req.build();
        assert_eq!(
            cmd.shell_line(Backend::Python),
            r#"python main.py -i 'my movie.mp4' -s 'it'\''s.srt' -m"#
        );
        assert_eq!(
            shell_words::split(&cmd.shell_line(Backend::Cpp)).unwrap(),
            vec!["./subMerge.exe", "-i", "my movie.mp4", "-s", "it's.srt", "-m"]
        );
    }
}
