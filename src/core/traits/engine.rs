use std::future::Future;

use crate::core::errors::Result;
use crate::core::models::status::Status;

/// Plaintext and status produced by a successful decrypt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decrypted {
    pub plaintext: Vec<u8>,
    pub status: Status,
}

/// Port for the external signing/encryption engine.
///
/// Implementations live in `adapters::engine` (e.g. GpgEngine).
/// Every call takes a cancellation future: when it resolves, the in-flight
/// engine process is killed and the call fails with `Cancelled`.
#[allow(async_fn_in_trait)]
pub trait SignatureEngine: Send + Sync {
    /// Decrypt `content`, collecting any signature and recipient claims.
    async fn decrypt(
        &self,
        content: &[u8],
        cancel: impl Future<Output = ()> + Send,
    ) -> Result<Decrypted>;

    /// Verify a detached `signature` over `content`.
    async fn verify(
        &self,
        content: &[u8],
        signature: &[u8],
        cancel: impl Future<Output = ()> + Send,
    ) -> Result<Status>;

    /// Verify self-contained signed `content`.
    async fn verify_inline(
        &self,
        content: &[u8],
        cancel: impl Future<Output = ()> + Send,
    ) -> Result<Status>;

    /// Human-readable name of this engine (e.g. "gpg").
    fn name(&self) -> &str;
}
