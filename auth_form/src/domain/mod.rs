// Domain layer: login form entities, rules and ports.

pub mod entities;
pub mod errors;
pub mod ports;
pub mod validation;

pub use entities::{AuthResult, Credentials, FormError, FormState, Screen};
pub use errors::{AuthError, SubmitError, ValidationError};
