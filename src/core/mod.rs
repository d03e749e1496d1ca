pub mod command;
pub mod error;
pub mod form;
pub mod formatter;
pub mod language;
pub mod media;
pub mod status;
