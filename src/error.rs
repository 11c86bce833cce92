use thiserror::Error;

// Display text of the first two variants is the alert shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("Please enter valid numbers for both fields")]
    InvalidInput,
    #[error("Total investment must be greater than 0")]
    NonPositiveInvestment,
    #[error("input is incomplete")]
    IncompleteInput,
}

pub type Result<T> = std::result::Result<T, CalcError>;
