//! Unified error handling with Sentry integration.
//!
//! Subsystems return their own error types (`StorageError`, `ApiError`,
//! `CheckoutError`, ...). Entry points that surface errors to a person
//! convert them into [`ClientError`], report internal failures to Sentry, and
//! show [`ClientError::user_message`] rather than raw error text.

use thiserror::Error;

use crate::api::ApiError;
use crate::checkout::{AddressError, CheckoutError};
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the commerce client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Durable storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Remote commerce API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Checkout validation failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Address form validation failed.
    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ClientError {
    /// Whether this error indicates a fault rather than a user mistake.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::Storage(_) | Self::Config(_) => true,
            Self::Api(err) => !err.is_user_facing(),
            Self::Checkout(_) | Self::Address(_) | Self::NotFound(_) | Self::BadRequest(_) => false,
        }
    }

    /// Message safe to show to a shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(_) => "Could not access local storage".to_string(),
            Self::Config(err) => err.to_string(),
            Self::Api(err) => match err {
                ApiError::Api { message, .. } if !message.is_empty() => message.clone(),
                ApiError::Unauthorized | ApiError::MissingCredential => {
                    "Please sign in to continue".to_string()
                }
                ApiError::RateLimited(secs) => {
                    format!("Too many requests, try again in {secs} seconds")
                }
                _ => "The store is unreachable right now".to_string(),
            },
            Self::Checkout(err) => err.to_string(),
            Self::Address(err) => err.to_string(),
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::BadRequest(msg) => msg.clone(),
        }
    }

    /// Log the error and, for internal faults, capture it to Sentry.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Client error"
            );
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }
    }
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error. Without an initialized Sentry client this is a no-op.
///
/// # Example
///
/// ```rust
/// use shopfront_client::error::add_breadcrumb;
///
/// add_breadcrumb("cart", "add_item", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::PaymentError;

    #[test]
    fn test_client_error_display() {
        let err = ClientError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = ClientError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_internal_classification() {
        assert!(ClientError::Storage(StorageError::Unavailable("x".to_string())).is_internal());
        assert!(ClientError::Api(ApiError::Parse("bad json".to_string())).is_internal());
        assert!(!ClientError::Api(ApiError::Unauthorized).is_internal());
        assert!(!ClientError::Checkout(CheckoutError::EmptyCart).is_internal());
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = ClientError::Storage(StorageError::Unavailable("/home/me/.x".to_string()));
        assert_eq!(err.user_message(), "Could not access local storage");

        let err = ClientError::Api(ApiError::Parse("expected `,` at line 1".to_string()));
        assert_eq!(err.user_message(), "The store is unreachable right now");
    }

    #[test]
    fn test_user_message_prefers_server_message() {
        let err = ClientError::Api(ApiError::Api {
            status: 409,
            message: "Product is out of stock".to_string(),
        });
        assert_eq!(err.user_message(), "Product is out of stock");
    }

    #[test]
    fn test_user_message_for_validation() {
        let err = ClientError::Checkout(CheckoutError::Payment(PaymentError::MissingUpiId));
        assert_eq!(err.user_message(), "UPI ID is required");
    }

    #[test]
    fn test_breadcrumb_without_client_is_noop() {
        add_breadcrumb("cart", "add_item", Some(&[("product_id", "p1")]));
        add_breadcrumb("cart", "clear_cart", None);
    }
}
