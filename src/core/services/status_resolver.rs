use crate::core::errors::{Result, SigwardError};
use crate::core::models::status::{ClaimKind, DiagnosticReport, Status, Verdict};
use crate::core::services::sanitizer::sanitize;

/// Whether an operation must end with a signature verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictPolicy {
    /// Decrypt: unsigned content is fine.
    Optional,
    /// Verify / VerifyInline: no verdict is an error.
    Required,
}

/// Turns parsed diagnostic claims into a `Status`.
pub struct StatusResolver;

impl StatusResolver {
    /// Resolve the report into a status.
    ///
    /// A BAD claim anywhere in the stream wins over any Good claim; the
    /// first BAD signer is reported. Otherwise the first Good signer is
    /// reported as valid. A claim whose identity is blank after sanitizing
    /// names nobody and never yields a verdict, but a blank BAD claim still
    /// rules out a valid one. With `VerdictPolicy::Required` and no usable
    /// claim the result is `IndeterminateResult`, carrying the sanitized
    /// `diagnostics` for the operator.
    pub fn resolve(
        &self,
        report: DiagnosticReport,
        policy: VerdictPolicy,
        diagnostics: &str,
    ) -> Result<Status> {
        let DiagnosticReport { claims, recipients } = report;

        let first_named = |kind: ClaimKind| {
            claims
                .iter()
                .filter(|c| c.kind == kind)
                .find(|c| !c.identity.trim().is_empty())
                .map(|c| c.identity.clone())
        };

        let verdict = if claims.iter().any(|c| c.kind == ClaimKind::Bad) {
            first_named(ClaimKind::Bad).map(Verdict::Bad)
        } else {
            first_named(ClaimKind::Good).map(Verdict::Good)
        };

        if verdict.is_none() && !claims.is_empty() {
            tracing::warn!(
                claims = claims.len(),
                "signature claims without a usable signer identity"
            );
        }

        match verdict {
            Some(verdict) => {
                if claims.len() > 1 {
                    tracing::debug!(
                        claims = claims.len(),
                        "multiple signature claims in one diagnostic stream"
                    );
                }
                Ok(Status::signed(verdict, recipients))
            }
            None if policy == VerdictPolicy::Required => {
                Err(SigwardError::IndeterminateResult {
                    diagnostics: sanitize(diagnostics),
                })
            }
            None => Ok(Status::unsigned(recipients)),
        }
    }
}
