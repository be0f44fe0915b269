use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Port '{port}' already exists in component '{component}'")]
    DuplicatePort { component: String, port: String },

    #[error("Orientation {0} must be one of 0, 90, 180, 270 (or -90)")]
    InvalidOrientation(f64),

    #[error("Unknown port type '{0}'")]
    UnknownPortType(String),
}
