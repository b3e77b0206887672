//! Crate-wide error type and result alias.

pub type TremoloResult<T> = Result<T, TremoloError>;

#[derive(thiserror::Error, Debug)]
pub enum TremoloError {
    #[error("config error: {0}")]
    Config(String),

    #[error("asset error: {0}")]
    Asset(String),

    #[error("audio error: {0}")]
    Audio(String),

    #[error("render error: {0}")]
    Render(String),
}

impl TremoloError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(TremoloError::config("x").to_string().contains("config error:"));
        assert!(TremoloError::asset("x").to_string().contains("asset error:"));
        assert!(TremoloError::audio("x").to_string().contains("audio error:"));
        assert!(TremoloError::render("x").to_string().contains("render error:"));
    }
}
