use crate::data::client::ClientFailure;

/// Exit code for bad configuration or usage.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code for a prediction that produced no result.
pub const EXIT_PREDICTION: u8 = 3;
/// Exit code for terminal I/O failures.
pub const EXIT_TERMINAL: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(EXIT_CONFIG, message)
    }

    pub fn terminal(context: &str, err: impl std::fmt::Display) -> Self {
        Self::new(EXIT_TERMINAL, format!("{context}: {err}"))
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<ClientFailure> for AppError {
    fn from(failure: ClientFailure) -> Self {
        Self::new(EXIT_PREDICTION, failure.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_failure_maps_to_prediction_exit_code() {
        let err = AppError::from(ClientFailure::HttpStatus(502));
        assert_eq!(err.exit_code(), EXIT_PREDICTION);
        assert_eq!(err.to_string(), "prediction service answered with HTTP 502");
    }

    #[test]
    fn terminal_errors_carry_context() {
        let err = AppError::terminal("Failed to enable raw mode", "not a tty");
        assert_eq!(err.exit_code(), EXIT_TERMINAL);
        assert_eq!(err.to_string(), "Failed to enable raw mode: not a tty");
    }
}
