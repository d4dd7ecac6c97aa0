use axum::http::{self, StatusCode};
use axum::{
    body::Body,
    response::{IntoResponse, Response},
};
use snafu::{Backtrace, ErrorCompat, Snafu};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Error reading config file: {}", source))]
    ConfigFile {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Error parsing config file: {}", source))]
    ConfigParse {
        source: toml::de::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Config error: {}", msg))]
    Config { msg: String },

    #[snafu(display("Unable to bind {}: {}", addr, source))]
    Bind {
        addr: String,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("HTTP server error: {}", source))]
    Server {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Failed to render template: {}", source))]
    Template {
        source: askama::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Response builder error: {}", source))]
    ResponseBuilder {
        source: http::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Entry not found"))]
    EntryNotFound,

    #[snafu(display("{}", msg))]
    NotFound { msg: String },

    #[snafu(display("{}", msg))]
    Whatever { msg: String },
}

// Allow string slices to be converted to Error
impl From<&str> for Error {
    fn from(val: &str) -> Self {
        Self::Whatever {
            msg: val.to_string(),
        }
    }
}

impl From<String> for Error {
    fn from(val: String) -> Self {
        Self::Whatever { msg: val }
    }
}

/// Allow Error to be converted to StatusCode
impl From<&Error> for StatusCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::EntryNotFound => StatusCode::NOT_FOUND,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Errors are rendered as pages by the response mapper
impl IntoResponse for Error {
    fn into_response(self) -> Response<Body> {
        let mut info = ErrorInfo::from(&self);
        if let Some(bt) = ErrorCompat::backtrace(&self) {
            info.backtrace = Some(format!("{}", bt));
        }

        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        res.extensions_mut().insert(info);
        res
    }
}

#[derive(Clone, Debug)]
pub struct ErrorInfo {
    pub status_code: StatusCode,
    pub title: String,
    pub message: String,
    pub backtrace: Option<String>,
}

impl From<&Error> for ErrorInfo {
    fn from(e: &Error) -> Self {
        let status_code: StatusCode = e.into();
        Self {
            status_code,
            title: status_code.canonical_reason().unwrap_or("Error").to_string(),
            message: e.to_string(),
            backtrace: None,
        }
    }
}
