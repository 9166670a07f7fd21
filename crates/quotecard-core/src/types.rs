#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("render error: {0}")]
    Render(String),
    #[error("quote source error: {0}")]
    QuoteSource(String),
}

pub type Result<T> = std::result::Result<T, Error>;
