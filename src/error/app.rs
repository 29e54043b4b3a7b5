use thiserror::Error;

/// Process-level failures for the binary and server lifecycle. Only the
/// failure paths the crate can actually hit get a variant here; request
/// handling failures live in [`super::ApiError`].
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("Bind error on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_error_names_the_address() {
        let error = AppError::Bind {
            addr: "127.0.0.1:6565".to_owned(),
            source: std::io::Error::from(std::io::ErrorKind::AddrInUse),
        };
        assert!(error.to_string().starts_with("Bind error on 127.0.0.1:6565"));
    }
}
