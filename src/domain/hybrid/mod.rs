//! Hybrid certificate extension types.
//!
//! - `HybridSignature`: secondary signature and its algorithm (2.5.29.212)
//! - `HybridKey`: secondary public key as a `SubjectPublicKeyInfo` (2.5.29.211)
//! - `QteslaPublicKey`, `QteslaPrivateKey`: raw qTESLA key material

mod key;
mod signature;

pub use key::{HybridKey, QteslaPrivateKey, QteslaPublicKey, SecondaryPublicKey};
pub use signature::HybridSignature;
