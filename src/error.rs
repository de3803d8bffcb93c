pub type KineticaResult<T> = Result<T, KineticaError>;

#[derive(thiserror::Error, Debug)]
pub enum KineticaError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("animation error: {0}")]
    Animation(String),

    #[error("evaluation error: {0}")]
    Evaluation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KineticaError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            KineticaError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            KineticaError::animation("x")
                .to_string()
                .contains("animation error:")
        );
        assert!(
            KineticaError::evaluation("x")
                .to_string()
                .contains("evaluation error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = KineticaError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
