//! Request authentication
//!
//! Access tokens are HS256 JWTs whose subject is the user id. Handlers pull the
//! bearer token out of the `Authorization` header and validate it before touching
//! any other part of the request.

pub mod jwt;

pub use jwt::{get_bearer_token, make_jwt, validate_jwt, AccessClaims};
