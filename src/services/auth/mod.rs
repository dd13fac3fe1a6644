pub mod access_jwt;
pub mod factory;
pub mod role;

pub use access_jwt::{AccessTokenClaims, TokenVerifier, VerifyError};
pub use factory::build_token_verifier;
pub use role::Role;
