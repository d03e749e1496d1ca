//! The form controller: two file slots, the option values, and the
//! command generation that reads them.
//!
//! Surfaces feed events in through the `handle_*`, `drop_*` and `choose_*`
//! methods and read results back through the accessor "ports". Nothing here
//! knows about terminals.

use tracing::{debug, info};

use crate::core::command::{GeneratedCommand, MergeRequest, DEFAULT_LANGUAGE};
use crate::core::error::FormError;
use crate::core::media::{FileKind, SelectedFile};
use crate::core::status::{Status, StatusKind};

pub const SUCCESS_MESSAGE: &str = "Command generated successfully! Copy and run the command above.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOptions {
    pub output_path: String,
    pub language: String,
    pub add_metadata: bool,
    pub metadata_value: String,
    pub clear_subs: bool,
    pub metadata_only: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            output_path: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            add_metadata: false,
            metadata_value: String::new(),
            clear_subs: false,
            metadata_only: false,
        }
    }
}

/// A region files can be dropped on. Which slot it feeds is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropZone {
    pub kind: FileKind,
}

impl DropZone {
    pub const VIDEO: DropZone = DropZone {
        kind: FileKind::Video,
    };
    pub const SUBTITLE: DropZone = DropZone {
        kind: FileKind::Subtitle,
    };
}

#[derive(Debug, Default)]
pub struct FormController {
    video: Option<SelectedFile>,
    subtitle: Option<SelectedFile>,
    options: FormOptions,
    status: Option<Status>,
    generated: Option<GeneratedCommand>,
    alert: Option<String>,
    hover: Option<DropZone>,
}

impl FormController {
    pub fn new(options: FormOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn video(&self) -> Option<&SelectedFile> {
        self.video.as_ref()
    }

    pub fn subtitle(&self) -> Option<&SelectedFile> {
        self.subtitle.as_ref()
    }

    pub fn selected(&self, kind: FileKind) -> Option<&SelectedFile> {
        match kind {
            FileKind::Video => self.video(),
            FileKind::Subtitle => self.subtitle(),
        }
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut FormOptions {
        &mut self.options
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn generated(&self) -> Option<&GeneratedCommand> {
        self.generated.as_ref()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    pub fn hover(&self) -> Option<DropZone> {
        self.hover
    }

    pub fn drag_enter(&mut self, zone: DropZone) {
        self.hover = Some(zone);
    }

    pub fn drag_leave(&mut self, zone: DropZone) {
        if self.hover == Some(zone) {
            self.hover = None;
        }
    }

    /// Only the first file is considered. An empty drop is ignored.
    pub fn drop_files(
        &mut self,
        zone: DropZone,
        files: Vec<SelectedFile>,
    ) -> Option<Result<(), FormError>> {
        self.drag_leave(zone);
        let file = files.into_iter().next()?;
        Some(self.dispatch(zone.kind, file))
    }

    /// A file input reporting a new selection.
    pub fn choose_files(
        &mut self,
        kind: FileKind,
        files: Vec<SelectedFile>,
    ) -> Option<Result<(), FormError>> {
        let file = files.into_iter().next()?;
        Some(self.dispatch(kind, file))
    }

    fn dispatch(&mut self, kind: FileKind, file: SelectedFile) -> Result<(), FormError> {
        match kind {
            FileKind::Video => self.handle_video_file(file),
            FileKind::Subtitle => self.handle_subtitle_file(file),
        }
    }

    pub fn handle_video_file(&mut self, file: SelectedFile) -> Result<(), FormError> {
        self.handle_file(FileKind::Video, file)
    }

    pub fn handle_subtitle_file(&mut self, file: SelectedFile) -> Result<(), FormError> {
        self.handle_file(FileKind::Subtitle, file)
    }

    fn handle_file(&mut self, kind: FileKind, file: SelectedFile) -> Result<(), FormError> {
        if !kind.accepts(&file) {
            debug!(%kind, name = file.name(), "rejected file extension");
            self.alert = Some(kind.alert_message().to_string());
            return Err(FormError::InvalidExtension {
                kind,
                name: file.name().to_string(),
            });
        }

        debug!(%kind, name = file.name(), "selected file");
        match kind {
            FileKind::Video => self.video = Some(file),
            FileKind::Subtitle => self.subtitle = Some(file),
        }
        Ok(())
    }

    pub fn show_status(&mut self, message: impl Into<String>, kind: StatusKind) {
        self.status = Some(Status::new(message, kind));
    }

    fn request(&self) -> Result<MergeRequest, FormError> {
        let video = self.video.as_ref().ok_or(FormError::MissingVideo)?;
        let metadata_only = self.options.metadata_only;
        if !metadata_only && self.subtitle.is_none() {
            return Err(FormError::MissingSubtitle);
        }

        Ok(MergeRequest {
            video: video.name().to_string(),
            subtitle: self.subtitle.as_ref().map(|file| file.name().to_string()),
            output_path: self.options.output_path.clone(),
            language: self.options.language.clone(),
            add_metadata: self.options.add_metadata,
            metadata_value: self.options.metadata_value.clone(),
            clear_subs: self.options.clear_subs,
            metadata_only,
        })
    }

    /// Builds the commands from the current state. On a failed guard the
    /// previous output is left untouched and the error goes to the status.
    pub fn generate(&mut self) -> Result<&GeneratedCommand, FormError> {
        let request = match self.request() {
            Ok(request) => request,
            Err(err) => {
                self.show_status(err.to_string(), StatusKind::Error);
                return Err(err);
            }
        };

        let command = request.build();
        info!(tail = command.tail(), "generated command");
        self.show_status(SUCCESS_MESSAGE, StatusKind::Success);
        Ok(&*self.generated.insert(command))
    }
}
