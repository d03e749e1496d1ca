#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Processing,
    Success,
    Error,
}

impl StatusKind {
    /// Name of the style class the status region takes on.
    pub fn class_name(self) -> &'static str {
        match self {
            StatusKind::Processing => "status-processing",
            StatusKind::Success => "status-success",
            StatusKind::Error => "status-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    pub fn new(message: impl Into<String>, kind: StatusKind) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn shows_progress(&self) -> bool {
        self.kind == StatusKind::Processing
    }
}
