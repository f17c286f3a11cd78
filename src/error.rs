//! Error types for the registry and its resolvers.

use std::fmt;

/// Dependency injection errors.
///
/// The interface registrar has no error kind of its own: everything here is
/// raised by the registry while resolving and is passed through unchanged,
/// whether the resolution came through a concrete key or an alias.
///
/// # Examples
///
/// ```rust
/// use ferrous_di_interfaces::{DiError, ServiceCollection, Resolver};
///
/// let provider = ServiceCollection::new().build();
/// match provider.get::<String>() {
///     Err(DiError::NotFound(type_name)) => {
///         assert_eq!(type_name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiError {
    /// Service not registered
    NotFound(&'static str),
    /// Type downcast failed
    TypeMismatch(&'static str),
    /// Invalid lifetime resolution (e.g., scoped from root)
    WrongLifetime(&'static str),
    /// A constructor reported a failure
    Factory {
        service: &'static str,
        message: String,
    },
}

impl DiError {
    /// Builds a [`DiError::Factory`] for the service type `T`.
    ///
    /// Intended for `Injectable::create` implementations that need to fail
    /// for reasons other than a missing dependency.
    pub fn factory<T: ?Sized + 'static>(message: impl Into<String>) -> Self {
        DiError::Factory {
            service: std::any::type_name::<T>(),
            message: message.into(),
        }
    }
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::NotFound(name) => write!(f, "Service not found: {}", name),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::WrongLifetime(msg) => write!(f, "Lifetime error: {}", msg),
            DiError::Factory { service, message } => {
                write!(f, "Failed to construct {}: {}", service, message)
            }
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for DI operations.
pub type DiResult<T> = Result<T, DiError>;

/// Returned when a lifetime name read from configuration is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLifetimeError(pub(crate) String);

impl fmt::Display for ParseLifetimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown service lifetime: {}", self.0)
    }
}

impl std::error::Error for ParseLifetimeError {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Mailer;

    #[test]
    fn factory_error_names_the_service() {
        let err = DiError::factory::<Mailer>("smtp host missing");
        assert!(err.to_string().ends_with("Mailer: smtp host missing"));
    }

    #[test]
    fn display_messages() {
        assert_eq!(DiError::NotFound("A").to_string(), "Service not found: A");
        assert_eq!(DiError::TypeMismatch("B").to_string(), "Type mismatch for: B");
        assert_eq!(
            DiError::WrongLifetime("scoped from root").to_string(),
            "Lifetime error: scoped from root"
        );
    }
}
