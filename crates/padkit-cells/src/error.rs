use padkit_core::LayoutError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CellError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Cell '{0}' is not registered in the PDK")]
    UnknownCell(String),

    #[error("Layer '{0}' is not defined in the PDK")]
    UnknownLayer(String),

    #[error("Constant '{0}' is not defined in the PDK")]
    UnknownConstant(String),

    #[error("Invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

pub type Result<T> = std::result::Result<T, CellError>;
