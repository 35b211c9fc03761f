//! # Engine Errors
//!
//! Errors raised by the resource actors themselves. Entity-level failures travel boxed in
//! [`FrameworkError::EntityError`]; use [`FrameworkError::into_entity_error`] to get the
//! typed error back on the client side.

/// Errors that can occur within the actor engine.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Recovers the entity's own error type, or hands the framework error back.
    pub fn into_entity_error<E>(self) -> Result<E, FrameworkError>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match self {
            FrameworkError::EntityError(inner) => match inner.downcast::<E>() {
                Ok(typed) => Ok(*typed),
                Err(other) => Err(FrameworkError::EntityError(other)),
            },
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error, PartialEq)]
    #[error("stale: {0}")]
    struct Stale(u32);

    #[test]
    fn entity_error_downcasts_to_original_type() {
        let err = FrameworkError::EntityError(Box::new(Stale(7)));
        assert_eq!(err.into_entity_error::<Stale>().unwrap(), Stale(7));
    }

    #[test]
    fn other_errors_are_handed_back() {
        let err = FrameworkError::ActorClosed;
        assert!(matches!(
            err.into_entity_error::<Stale>(),
            Err(FrameworkError::ActorClosed)
        ));

        let foreign = FrameworkError::EntityError(Box::new(std::io::Error::other("disk")));
        match foreign.into_entity_error::<Stale>() {
            Err(FrameworkError::EntityError(e)) => assert_eq!(e.to_string(), "disk"),
            _ => panic!("expected the boxed io error back"),
        }
    }
}
