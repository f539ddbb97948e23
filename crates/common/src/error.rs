//! Common error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Descriptor error: {0}")]
    Descriptor(#[from] descriptor::DescriptorError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

/// Route each descriptor error type through [`descriptor::DescriptorError`]
macro_rules! from_descriptor_error {
    ($($source:ident),* $(,)?) => {
        $(
            impl From<descriptor::$source> for Error {
                fn from(err: descriptor::$source) -> Self {
                    Self::Descriptor(err.into())
                }
            }
        )*
    };
}

from_descriptor_error!(
    SchemaError,
    ValidationError,
    OverflowError,
    EncodeError,
    UnknownCodeError,
);

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_code_converts() {
        let err: Error = descriptor::UvcError::from_code(-42).unwrap_err().into();
        assert!(matches!(
            err,
            Error::Descriptor(descriptor::DescriptorError::UnknownCode(_))
        ));
        assert!(err.to_string().contains("-42"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "IO error: closed");
    }

    #[test]
    fn test_config_error_display() {
        let err = Error::Config("bad level".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad level");
    }
}
