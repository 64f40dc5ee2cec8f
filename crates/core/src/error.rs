use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid timezone '{0}'")]
    InvalidTimezone(String),

    #[error("Invalid trigger time '{0}' (expected HH:MM)")]
    InvalidTriggerTime(String),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("{0}")]
    Other(String),
}
