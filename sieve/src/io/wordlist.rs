//! Wordlist import and reading.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info};

/// Copy `source` into `wordlists_dir`, keeping its file name.
///
/// An existing copy with the same name is replaced. Importing a file that
/// already lives in `wordlists_dir` is a no-op.
pub fn import_wordlist(source: &Path, wordlists_dir: &Path) -> Result<PathBuf> {
    let file_name = source
        .file_name()
        .ok_or_else(|| anyhow!("wordlist path has no file name: {}", source.display()))?;
    if !source.is_file() {
        return Err(anyhow!("wordlist not found: {}", source.display()));
    }
    fs::create_dir_all(wordlists_dir)
        .with_context(|| format!("create {}", wordlists_dir.display()))?;
    let dest = wordlists_dir.join(file_name);

    let source_abs = source
        .canonicalize()
        .with_context(|| format!("resolve {}", source.display()))?;
    if dest.exists() {
        let dest_abs = dest
            .canonicalize()
            .with_context(|| format!("resolve {}", dest.display()))?;
        if dest_abs == source_abs {
            debug!(path = %dest.display(), "wordlist already in storage");
            return Ok(dest);
        }
    }

    let bytes = fs::copy(source, &dest)
        .with_context(|| format!("copy {} to {}", source.display(), dest.display()))?;
    info!(source = %source.display(), dest = %dest.display(), bytes, "imported wordlist");
    Ok(dest)
}

/// Read `path` as lines. Invalid UTF-8 is replaced rather than rejected; the
/// candidate filter drops such lines anyway.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path).with_context(|| format!("read wordlist {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    let lines: Vec<String> = text.lines().map(str::to_string).collect();
    debug!(path = %path.display(), lines = lines.len(), "read wordlist");
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_copies_into_storage() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("pins.txt");
        fs::write(&source, "123456\n").expect("write");
        let storage = temp.path().join("store");

        let dest = import_wordlist(&source, &storage).expect("import");
        assert_eq!(dest, storage.join("pins.txt"));
        assert_eq!(fs::read_to_string(&dest).expect("read"), "123456\n");
    }

    #[test]
    fn import_of_stored_file_is_noop() {
        let temp = tempfile::tempdir().expect("tempdir");
        let storage = temp.path().join("store");
        fs::create_dir_all(&storage).expect("mkdir");
        let stored = storage.join("pins.txt");
        fs::write(&stored, "123456\n").expect("write");

        let dest = import_wordlist(&stored, &storage).expect("import");
        assert_eq!(dest, stored);
        assert_eq!(fs::read_to_string(&dest).expect("read"), "123456\n");
    }

    #[test]
    fn import_missing_file_fails() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = import_wordlist(&temp.path().join("nope.txt"), temp.path()).unwrap_err();
        assert!(err.to_string().contains("wordlist not found"));
    }

    #[test]
    fn read_lines_handles_crlf_and_invalid_utf8() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("mixed.txt");
        fs::write(&path, b"111111\r\n\xff\xfe\n222222").expect("write");
        let lines = read_lines(&path).expect("read");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "111111");
        assert_eq!(lines[2], "222222");
    }
}
