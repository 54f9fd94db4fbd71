use serde::Serialize;

/// Outcome of a decrypt or verify operation.
///
/// Fields are private so a good verdict can only be built together with
/// the identity it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Status {
    signer: Option<String>,
    signature_valid: bool,
    encrypted_for: Vec<String>,
    warnings: Vec<String>,
}

impl Status {
    /// A status carrying no signature claim at all.
    pub fn unsigned(encrypted_for: Vec<String>) -> Self {
        Self {
            encrypted_for,
            ..Self::default()
        }
    }

    /// A status built from a signature verdict.
    pub fn signed(verdict: Verdict, encrypted_for: Vec<String>) -> Self {
        let (signer, signature_valid) = match verdict {
            Verdict::Good(identity) => (identity, true),
            Verdict::Bad(identity) => (identity, false),
        };
        Self {
            signer: Some(signer),
            signature_valid,
            encrypted_for,
            warnings: Vec::new(),
        }
    }

    /// Identity the engine attributed the signature to, good or bad.
    pub fn signer(&self) -> Option<&str> {
        self.signer.as_deref()
    }

    pub fn signature_valid(&self) -> bool {
        self.signature_valid
    }

    /// Recipients the content was encrypted for, in the order the engine
    /// announced them.
    pub fn encrypted_for(&self) -> &[String] {
        &self.encrypted_for
    }

    /// Reserved for non-fatal advisories. Always empty for now.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// A signature verdict together with the claimed signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Good(String),
    Bad(String),
}

/// Polarity of a single signature announcement in the diagnostic stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimKind {
    Good,
    Bad,
}

/// One "Good signature from" / "BAD signature from" line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureClaim {
    pub kind: ClaimKind,
    /// Sanitized identity string.
    pub identity: String,
}

/// Everything the parser could extract from one diagnostic stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticReport {
    /// Signature claims in stream order.
    pub claims: Vec<SignatureClaim>,
    /// Sanitized recipient identities in stream order.
    pub recipients: Vec<String>,
}
