use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum GrmError {
    #[error("{0} is not a registered genome")]
    UnregisteredGenome(String),

    #[error("there is no {resource} resource stored for {genome}")]
    ResourceNotAvailable { genome: String, resource: String },

    #[error("no transfer backend available - install a blobstore CLI (eg. s5cmd or the aws CLI)")]
    BackendUnavailable,

    #[error("{tool} transfer failed: {output}")]
    TransferFailed { tool: String, output: String },

    #[error("destination directory already exists: {0}")]
    DirectoryAlreadyExists(Utf8PathBuf),

    #[error("invalid resource locator: {0}")]
    InvalidLocator(String),

    #[error("failed to parse registry document: {0}")]
    RegistryParse(String),

    #[error("failed to read registry file at {0}")]
    RegistryRead(Utf8PathBuf),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
