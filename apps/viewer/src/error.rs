use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use padkit_cells::CellError;
use padkit_io::{GdsError, TechFileError};
use thiserror::Error;

use crate::html;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Invalid settings: {0}")]
    BadSettings(String),

    #[error(transparent)]
    Cell(#[from] CellError),

    #[error("GDS error: {0}")]
    Gds(#[from] GdsError),

    #[error(transparent)]
    TechFile(#[from] TechFileError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ViewerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ViewerError::Cell(CellError::UnknownCell(_)) => StatusCode::NOT_FOUND,
            // Everything a settings override can get wrong.
            ViewerError::BadSettings(_)
            | ViewerError::Cell(
                CellError::Settings(_)
                | CellError::InvalidParameter(_)
                | CellError::UnknownLayer(_)
                | CellError::UnknownConstant(_)
                | CellError::Layout(_),
            ) => StatusCode::BAD_REQUEST,
            ViewerError::Gds(_) | ViewerError::TechFile(_) | ViewerError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ViewerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{self}");
        } else {
            log::warn!("{self}");
        }
        (status, Html(html::error_page(status, &self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ViewerError::Cell(CellError::UnknownCell("x".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ViewerError::BadSettings("{".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ViewerError::Cell(CellError::InvalidParameter("width".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ViewerError::Io(std::io::Error::other("disk")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
