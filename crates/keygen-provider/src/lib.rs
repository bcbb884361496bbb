//! Concrete X25519 key providers.
//! The native provider uses `x25519-dalek` with PEM armor; the OpenSSL provider
//! shells out to the `openssl` binary with an argument vector.

pub mod encoding;
pub mod native;
pub mod openssl;

pub use native::NativeProvider;
pub use openssl::OpensslProvider;
