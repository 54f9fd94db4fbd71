#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Path to a fake engine script under `tests/fixtures/engines/`.
///
/// The scripts are only ever chmod-ed here, never written, so spawning them
/// from parallel tests cannot hit "text file busy".
pub fn engine(name: &str) -> PathBuf {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/engines")
        .join(name);
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    path
}

/// Contents of a captured diagnostic stream under `tests/fixtures/diagnostics/`.
pub fn diagnostics(name: &str) -> Vec<u8> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/diagnostics")
        .join(name);
    std::fs::read(path).unwrap()
}

/// Names of the entries directly under `dir`, sorted.
pub fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

pub const SIGNED: &[u8] = b"From: alice@example.com\r\nSubject: hi\r\n\r\nhello\r\n";
pub const SIGNATURE: &[u8] = b"-----BEGIN PGP SIGNATURE-----\n\niQEz...\n-----END PGP SIGNATURE-----\n";
