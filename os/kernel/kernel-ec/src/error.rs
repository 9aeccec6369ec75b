use kernel_ports::PortError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcError {
    /// The I/O ports could not be reserved; the controller never came up.
    #[error(transparent)]
    Port(#[from] PortError),
    #[error("invalid fan id {0}, expected 1 or 2")]
    InvalidFan(usize),
    #[error("input is not a decimal integer")]
    InvalidInput,
    #[error("attribute {0} is read-only")]
    ReadOnly(&'static str),
    #[error("failed to format attribute value")]
    Format,
}

impl From<core::fmt::Error> for EcError {
    fn from(_: core::fmt::Error) -> Self {
        Self::Format
    }
}
