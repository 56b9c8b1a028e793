use thiserror::Error;

/// Error type for the whole pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// None of the expected input files exist
    #[error("no dataset files found: {0}")]
    NoDataFound(String),

    /// A required column is absent after header normalisation
    #[error("expected column '{0}' not found")]
    MissingColumn(String),

    #[error("I/O error")]
    Io(#[source] std::io::Error),

    #[error("CSV error")]
    Csv(#[source] csv::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("visualization error: {0}")]
    Visualization(String),

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("computation error: {0}")]
    ComputationError(String),

    #[error("consistency error: {0}")]
    Consistency(String),

    #[error("empty data: {0}")]
    Empty(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

// plotters drawing errors
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for Error
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        Error::Visualization(format!("drawing failed: {}", err))
    }
}

impl Error {
    /// Whether the decomposition reporter may swallow this error as a soft skip
    pub fn is_soft_skip(&self) -> bool {
        matches!(
            self,
            Error::InsufficientData(_) | Error::ComputationError(_)
        )
    }
}
