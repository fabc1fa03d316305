//! Autenticación contra el warehouse: JWT RS256 por par de claves y
//! cabeceras de la pasarela.

mod headers;
mod token;

pub use headers::{AuthHeaders, AUTHORIZATION, KEYPAIR_JWT, TOKEN_TYPE_HEADER};
pub use token::{public_key_fingerprint, Claims, JwtSettings, JwtTokenIssuer};
