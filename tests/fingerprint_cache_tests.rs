use fileprint::digest::DigestAlgorithm;
use fileprint::fingerprint::{FingerprintError, Fingerprinter};
use fileprint::manifest::Manifest;
use fileprint::source::LocalFile;
use fileprint::window::HashWindow;
use filetime::FileTime;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn set_mtime(path: &Path, secs: i64) {
    filetime::set_file_mtime(path, FileTime::from_unix_time(secs, 0)).unwrap();
}

#[test]
fn test_first_run_computes_second_run_reuses() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.bin");
    fs::write(&path, b"0123456789abcdef").unwrap();
    set_mtime(&path, 1_600_000_000);

    let fingerprinter = Fingerprinter::new(DigestAlgorithm::Sha256, HashWindow::new(4, 8));

    let first = fingerprinter.process_path(&path, None).unwrap();
    assert!(!first.was_reused());

    let stored = first.into_fingerprint();
    let second = fingerprinter.process_path(&path, Some(&stored)).unwrap();
    assert!(second.was_reused());
    assert_eq!(second.fingerprint(), &stored);
}

#[test]
fn test_digest_covers_only_the_window() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.bin");
    fs::write(&path, b"0123456789abcdef").unwrap();

    let fingerprinter = Fingerprinter::new(DigestAlgorithm::Sha256, HashWindow::new(4, 8));
    let fingerprint = fingerprinter.process_path(&path, None).unwrap().into_fingerprint();

    assert_eq!(
        fingerprint.digest,
        DigestAlgorithm::Sha256.hex_digest(b"456789ab")
    );
}

#[test]
fn test_unchanged_metadata_reuses_even_if_content_differs() {
    // The reuse rule looks at metadata only. A rewrite that keeps both
    // size and mtime is invisible to it.
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.bin");
    fs::write(&path, b"aaaaaaaa").unwrap();
    set_mtime(&path, 1_600_000_000);

    let fingerprinter = Fingerprinter::new(DigestAlgorithm::Sha256, HashWindow::new(0, 8));
    let stored = fingerprinter.process_path(&path, None).unwrap().into_fingerprint();

    fs::write(&path, b"bbbbbbbb").unwrap();
    set_mtime(&path, 1_600_000_000);

    let outcome = fingerprinter.process_path(&path, Some(&stored)).unwrap();
    assert!(outcome.was_reused());
    assert_eq!(outcome.fingerprint().digest, stored.digest);
}

#[test]
fn test_mtime_change_invalidates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.bin");
    fs::write(&path, b"same content").unwrap();
    set_mtime(&path, 1_600_000_000);

    let fingerprinter = Fingerprinter::new(DigestAlgorithm::Sha256, HashWindow::new(0, 8));
    let stored = fingerprinter.process_path(&path, None).unwrap().into_fingerprint();

    set_mtime(&path, 1_600_000_005);

    let outcome = fingerprinter.process_path(&path, Some(&stored)).unwrap();
    assert!(!outcome.was_reused());
    // Same content, so the digest matches even though it was recomputed.
    assert_eq!(outcome.fingerprint().digest, stored.digest);
    assert_eq!(outcome.fingerprint().modified, 1_600_000_005);
}

#[test]
fn test_size_change_invalidates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.bin");
    fs::write(&path, b"abcd").unwrap();
    set_mtime(&path, 1_600_000_000);

    let fingerprinter = Fingerprinter::new(DigestAlgorithm::Sha256, HashWindow::new(0, 8));
    let stored = fingerprinter.process_path(&path, None).unwrap().into_fingerprint();
    assert_eq!(stored.size, 4);

    fs::write(&path, b"abcdefgh").unwrap();
    set_mtime(&path, 1_600_000_000);

    let outcome = fingerprinter.process_path(&path, Some(&stored)).unwrap();
    assert!(!outcome.was_reused());
    assert_eq!(outcome.fingerprint().size, 8);
}

#[test]
fn test_algorithm_change_invalidates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.bin");
    fs::write(&path, b"content").unwrap();

    let sha = Fingerprinter::new(DigestAlgorithm::Sha256, HashWindow::new(0, 8));
    let stored = sha.process_path(&path, None).unwrap().into_fingerprint();

    let md5 = Fingerprinter::new(DigestAlgorithm::Md5, HashWindow::new(0, 8));
    let outcome = md5.process_path(&path, Some(&stored)).unwrap();

    assert!(!outcome.was_reused());
    assert_eq!(outcome.fingerprint().algorithm, DigestAlgorithm::Md5);
    assert_eq!(outcome.fingerprint().digest.len(), DigestAlgorithm::Md5.hex_len());
}

#[test]
fn test_window_change_invalidates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.bin");
    fs::write(&path, b"0123456789abcdef").unwrap();

    let narrow = Fingerprinter::new(DigestAlgorithm::Sha256, HashWindow::new(4, 8));
    let stored = narrow.process_path(&path, None).unwrap().into_fingerprint();

    let shifted = Fingerprinter::new(DigestAlgorithm::Sha256, HashWindow::new(0, 8));
    let outcome = shifted.process_path(&path, Some(&stored)).unwrap();

    assert!(!outcome.was_reused());
    assert_eq!(
        outcome.fingerprint().digest,
        DigestAlgorithm::Sha256.hex_digest(b"01234567")
    );
}

#[test]
fn test_recompute_is_idempotent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.bin");
    fs::write(&path, b"stable bytes here").unwrap();
    set_mtime(&path, 1_600_000_000);

    let fingerprinter = Fingerprinter::new(DigestAlgorithm::Blake2b512, HashWindow::new(2, 6));

    let first = fingerprinter.process_path(&path, None).unwrap().into_fingerprint();
    let second = fingerprinter.process_path(&path, None).unwrap().into_fingerprint();

    assert_eq!(first, second);
}

#[test]
fn test_small_file_hashes_from_origin_with_requested_params_recorded() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("small.bin");
    fs::write(&path, b"tiny").unwrap();

    // Window far beyond EOF: the whole file is hashed, but the stored
    // record keeps the requested window, not the effective one.
    let fingerprinter = Fingerprinter::new(DigestAlgorithm::Sha256, HashWindow::new(50, 25));
    let fingerprint = fingerprinter.process_path(&path, None).unwrap().into_fingerprint();

    assert_eq!(fingerprint.digest, DigestAlgorithm::Sha256.hex_digest(b"tiny"));
    assert_eq!(fingerprint.window_start, 50);
    assert_eq!(fingerprint.window_size, 25);
    assert_eq!(fingerprint.window_stop, None);
}

#[test]
fn test_file_ending_at_window_start_hashes_the_tail() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.bin");
    let content: Vec<u8> = (0u8..50).collect();
    fs::write(&path, &content).unwrap();

    let fingerprinter = Fingerprinter::new(DigestAlgorithm::Sha256, HashWindow::new(50, 25));
    let fingerprint = fingerprinter.process_path(&path, None).unwrap().into_fingerprint();

    assert_eq!(
        fingerprint.digest,
        DigestAlgorithm::Sha256.hex_digest(&content[25..50])
    );
}

#[test]
fn test_manifest_roundtrip_preserves_reuse() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.bin");
    let manifest_path = dir.path().join("prints.json");
    fs::write(&path, b"persisted content").unwrap();
    set_mtime(&path, 1_600_000_000);

    let fingerprinter = Fingerprinter::new(DigestAlgorithm::Blake2b512, HashWindow::new(0, 16));
    let fingerprint = fingerprinter.process_path(&path, None).unwrap().into_fingerprint();

    let mut manifest = Manifest::new();
    manifest.insert(&path, fingerprint);
    manifest.save(&manifest_path).unwrap();

    let loaded = Manifest::load(&manifest_path).unwrap();
    let outcome = fingerprinter
        .process_path(&path, loaded.get(&path))
        .unwrap();
    assert!(outcome.was_reused());
}

#[test]
fn test_missing_file_reports_not_found() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("never-created.bin");

    let fingerprinter = Fingerprinter::new(DigestAlgorithm::Sha256, HashWindow::new(0, 8));
    let err = fingerprinter.process_path(&path, None).unwrap_err();

    assert!(matches!(err, FingerprintError::NotFound(_)));
    assert!(err.to_string().contains("never-created.bin"));
}

#[test]
fn test_is_current_tracks_file_changes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.bin");
    fs::write(&path, b"watched").unwrap();
    set_mtime(&path, 1_600_000_000);

    let fingerprinter = Fingerprinter::new(DigestAlgorithm::Sha256, HashWindow::new(0, 8));
    let stored = fingerprinter.process_path(&path, None).unwrap().into_fingerprint();

    let source = LocalFile::new(&path);
    assert!(fingerprinter.is_current(&stored, &source).unwrap());

    set_mtime(&path, 1_600_000_060);
    assert!(!fingerprinter.is_current(&stored, &source).unwrap());
}
