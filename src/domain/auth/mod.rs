//! Authentication domain: token claims and the collaborator traits used to
//! sign tokens and look up signing secrets.

mod secret;
mod token;

pub use secret::SecretProvider;
pub use token::{TokenClaims, TokenIssuer};

#[cfg(test)]
pub use secret::MockSecretProvider;
#[cfg(test)]
pub use token::MockTokenIssuer;
