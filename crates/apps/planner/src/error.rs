use catalog::CatalogError;
use engine::EngineError;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    Engine(EngineError),
    Catalog(CatalogError),
    Config(String),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Engine(e) => write!(f, "{e}"),
            SessionError::Catalog(e) => write!(f, "{e}"),
            SessionError::Config(msg) => write!(f, "invalid session config: {msg}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Engine(e) => Some(e),
            SessionError::Catalog(e) => Some(e),
            SessionError::Config(_) => None,
        }
    }
}

impl From<EngineError> for SessionError {
    fn from(e: EngineError) -> Self {
        SessionError::Engine(e)
    }
}

impl From<CatalogError> for SessionError {
    fn from(e: CatalogError) -> Self {
        SessionError::Catalog(e)
    }
}
