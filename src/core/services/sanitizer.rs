/// Strip anything that can drive a terminal from text captured off the
/// engine's diagnostic stream.
///
/// Removes ESC, CR, every other C0 and C1 control character except `\n`
/// and `\t`, DEL, and the Unicode bidirectional override/isolate marks.
/// Signer names come from key user IDs and message content, so they are
/// attacker-controlled.
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|c| !is_unsafe(*c)).collect()
}

/// Sanitize a single identity and trim surrounding spaces and tabs.
pub fn sanitize_identity(text: &str) -> String {
    sanitize(text).trim_matches(|c| c == ' ' || c == '\t').to_string()
}

fn is_unsafe(c: char) -> bool {
    match c {
        '\n' | '\t' => false,
        // C0, DEL and C1 (which includes the single-byte CSI, U+009B).
        c if c.is_control() => true,
        '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}' => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_escape_and_carriage_return() {
        let hostile = "Mallory\u{1b}[2J\u{1b}]0;owned\u{7}\r<m@example.com>";
        let clean = sanitize(hostile);
        assert!(!clean.contains('\u{1b}'));
        assert!(!clean.contains('\r'));
        assert!(!clean.contains('\u{7}'));
        assert_eq!(clean, "Mallory[2J]0;owned<m@example.com>");
    }

    #[test]
    fn removes_c1_csi_and_del() {
        let clean = sanitize("a\u{9b}31mb\u{7f}c");
        assert_eq!(clean, "a31mbc");
    }

    #[test]
    fn removes_bidi_overrides() {
        let clean = sanitize("Alice \u{202E}moc.elpmaxe\u{202C}");
        assert_eq!(clean, "Alice moc.elpmaxe");
    }

    #[test]
    fn keeps_newlines_tabs_and_unicode() {
        let text = "gpg: line one\n\tJosé Müller <jm@example.com>";
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn identity_is_trimmed() {
        assert_eq!(
            sanitize_identity("\t  Bob <bob@example.com> \r"),
            "Bob <bob@example.com>"
        );
    }

    #[test]
    fn no_control_bytes_survive_any_input() {
        let mut all = String::new();
        for b in 0u8..=0x7f {
            all.push(b as char);
        }
        for c in '\u{80}'..='\u{9f}' {
            all.push(c);
        }
        let clean = sanitize(&all);
        assert!(
            clean
                .chars()
                .all(|c| !c.is_control() || c == '\n' || c == '\t')
        );
    }
}
