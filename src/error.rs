use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// One or more problems found while validating the configuration.
    /// All problems are collected before this is raised.
    #[error("invalid configuration:\n  {}", .0.join("\n  "))]
    Config(Vec<String>),

    #[error("failed to parse the configuration document: {0}")]
    ConfigDocument(#[from] serde_yaml::Error),

    #[error(
        "line {line}: expected {expected} columns but found {found}. \
         Check if there are additional lines at the top of the input (use --skip to skip them)"
    )]
    ColumnCountMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("{0}")]
    Parse(String),

    #[error("the function '{0}' is not supported")]
    UnsupportedFunction(String),

    /// A resolution failure, annotated with where it happened.
    #[error("line {line}, field {field}: {source}")]
    Record {
        line: usize,
        field: String,
        #[source]
        source: Box<Error>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The underlying error, looking through `Record` annotations.
    pub fn root(&self) -> &Error {
        match self {
            Error::Record { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn not_a_number(value: &str) -> Self {
        Error::Parse(format!("failed to parse the value ({}) to a float", value))
    }
}
