#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// A bonded term references an atom index outside of the system
    InvalidTopology(String),
    /// The length of a positions buffer does not match the declared atom count
    SizeMismatch(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidTopology(e) => write!(f, "invalid topology: {}", e),
            Error::SizeMismatch(e) => write!(f, "size mismatch: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidTopology(_) |
            Error::SizeMismatch(_) => None,
        }
    }
}
