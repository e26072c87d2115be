//! Authentication infrastructure - JWT signing and password hashing

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtConfig, JwtSigner, TokenPurpose, TokenSigner};
pub use password::{Argon2PasswordHasher, PasswordHasher};
