//! Error types for the selection form

use thiserror::Error;

/// Element tree lookup and edit failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Unknown site '{0}'")]
    UnknownSite(String),

    #[error("Unknown resource element '{0}'")]
    UnknownElement(String),

    #[error("Site '{0}' is declared more than once")]
    DuplicateSite(String),

    #[error("Control '{0}' is disabled")]
    ControlDisabled(String),
}

/// Failures while turning a selection into a resource request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("No resources selected")]
    EmptySelection,

    #[error("Empty resource element in '{0}'")]
    EmptyElement(String),

    #[error("You must specify the number of nodes ({0}:n_nodes) in free mode")]
    MissingNodeCount(String),

    #[error("Invalid number of nodes '{value}' for '{element}'")]
    InvalidNodeCount { element: String, value: String },

    #[error("Invalid walltime '{0}' (expected h:mm:ss or seconds)")]
    InvalidWalltime(String),

    #[error("Invalid {field} '{value}' (expected YYYY-MM-DD HH:MM:SS)")]
    InvalidDate { field: &'static str, value: String },

    #[error("Invalid subnet request '{0}' (expected slash_22=1 or site:slash_22=1,...)")]
    InvalidSubnet(String),

    #[error(transparent)]
    Form(#[from] FormError),
}

pub type FormResult<T> = std::result::Result<T, FormError>;
pub type RequestResult<T> = std::result::Result<T, RequestError>;
