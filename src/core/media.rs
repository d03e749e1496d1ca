use std::fmt;

pub const VIDEO_EXTENSIONS: [&str; 7] = [".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".webm"];
pub const SUBTITLE_EXTENSIONS: [&str; 4] = [".srt", ".ass", ".ssa", ".vtt"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Video,
    Subtitle,
}

impl FileKind {
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FileKind::Video => &VIDEO_EXTENSIONS,
            FileKind::Subtitle => &SUBTITLE_EXTENSIONS,
        }
    }

    pub fn accepts(self, file: &SelectedFile) -> bool {
        let extension = file.extension();
        self.extensions().iter().any(|ext| *ext == extension)
    }

    pub fn alert_message(self) -> &'static str {
        match self {
            FileKind::Video => "Please select a valid video file!",
            FileKind::Subtitle => "Please select a valid subtitle file!",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileKind::Video => "Video",
            FileKind::Subtitle => "Subtitle",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A file the user picked. Only the name is kept; the file itself is never opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Keeps only the last path component, which is what a file picker reports as the name.
    pub fn from_path(path: &str) -> Self {
        let name = path
            .rsplit(|c: char| c == '/' || c == '\\')
            .find(|part| !part.is_empty())
            .unwrap_or(path);
        Self::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lowercased text after the last dot, with the dot. Names without a dot
    /// yield `.` followed by the whole name.
    pub fn extension(&self) -> String {
        let last = self.name.rsplit('.').next().unwrap_or(&self.name);
        format!(".{}", last.to_lowercase())
    }
}
