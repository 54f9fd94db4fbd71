use std::sync::LazyLock;

use regex::Regex;

use crate::core::models::status::{ClaimKind, DiagnosticReport, SignatureClaim};
use crate::core::services::sanitizer::{sanitize, sanitize_identity};

/// `gpg: Good signature from "Alice <alice@example.com>" [ultimate]`
/// `gpg: BAD signature from "Eve <eve@example.com>" [unknown]`
static SIGNATURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^gpg: (Good|BAD) signature from "(.*)""#)
        .expect("signature pattern is valid")
});

/// `gpg: encrypted with rsa3072 key, ID 0123ABCD, created 2020-01-01`
/// followed by an indented, quoted user ID on the next line.
static ENCRYPTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^gpg: encrypted with[^\n]*\n[ \t]*"([^\n]*)""#)
        .expect("recipient pattern is valid")
});

/// Extracts signature and recipient claims from the engine's diagnostic
/// stream. Pure: never spawns anything, never fails.
pub struct DiagnosticParser;

impl DiagnosticParser {
    /// Parse raw diagnostic bytes. Invalid UTF-8 is replaced with U+FFFD.
    pub fn parse_bytes(&self, diagnostics: &[u8]) -> DiagnosticReport {
        self.parse(&String::from_utf8_lossy(diagnostics))
    }

    /// Parse one invocation's diagnostic text.
    ///
    /// Every extracted identity is passed through the sanitizer before it is
    /// stored. Claims and recipients keep the order the engine emitted them.
    pub fn parse(&self, diagnostics: &str) -> DiagnosticReport {
        let claims = SIGNATURE_RE
            .captures_iter(diagnostics)
            .map(|caps| SignatureClaim {
                kind: if &caps[1] == "Good" {
                    ClaimKind::Good
                } else {
                    ClaimKind::Bad
                },
                identity: sanitize(&caps[2]),
            })
            .collect();

        let recipients = ENCRYPTED_RE
            .captures_iter(diagnostics)
            .map(|caps| sanitize_identity(&caps[1]))
            .collect();

        DiagnosticReport { claims, recipients }
    }
}
