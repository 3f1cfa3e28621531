use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};

use crate::{protocol::SimpleResponse, session::removal_cookie};

/// The appointment store could not serve a query.
///
/// The display text is what the technician sees; the cause only goes to logs.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Could not connect to database")]
    Unavailable(String),
}

impl StoreError {
    pub fn cause(&self) -> &str {
        match self {
            StoreError::Unavailable(cause) => cause,
        }
    }
}

impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> Self {
        StoreError::Unavailable(format!("query failed: {}", err))
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(err: r2d2::Error) -> Self {
        StoreError::Unavailable(format!("connection checkout failed: {}", err))
    }
}

impl From<BlockingError> for StoreError {
    fn from(err: BlockingError) -> Self {
        StoreError::Unavailable(format!("blocking pool: {}", err))
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Please login to access this page")]
    NotAuthenticated,
    #[error("Your session has expired, please login again")]
    Expired,
    #[error("Invalid email or password")]
    InvalidCredentials,
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .cookie(removal_cookie())
            .json(SimpleResponse::err(self))
    }
}

/// Failures of the export routes. Store and rendering failures stay apart so
/// callers can tell a dead database from a broken chart.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Invalid chart type: {0}")]
    UnknownChart(String),
    #[error("Database connection failed")]
    Store(#[from] StoreError),
    #[error("Could not render report: {0}")]
    Render(String),
}

impl ResponseError for ExportError {
    fn status_code(&self) -> StatusCode {
        match self {
            ExportError::UnknownChart(_) => StatusCode::BAD_REQUEST,
            ExportError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            ExportError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(SimpleResponse::err(self))
    }
}
