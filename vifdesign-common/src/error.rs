#[derive(Debug, thiserror::Error)]
pub enum DesignError {
    #[error("invalid CIDR '{cidr}': {reason}")]
    InvalidCidr { cidr: String, reason: String },

    #[error("configuration conflict: {existing} already configured, refusing to apply {requested}")]
    ConfigurationConflict {
        existing: &'static str,
        requested: &'static str,
    },

    #[error("incomplete interface configuration: {0}")]
    Incomplete(&'static str),
}

pub type Result<T> = std::result::Result<T, DesignError>;
