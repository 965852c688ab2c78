//! Filesystem utilities for atomic operations.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Permission bits for files we create (before umask).
pub const FILE_MODE: u32 = 0o644;

/// Sibling path used while `destination` is being written.
///
/// The name carries the pid and a nanosecond timestamp so it cannot be
/// predicted ahead of time.
pub fn temp_path_for(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    destination.with_file_name(format!(
        ".{}.{}.{}.partial",
        name,
        std::process::id(),
        nanos
    ))
}

/// Write `contents` to `destination` so that readers see either the old file
/// or the complete new one, never a prefix.
///
/// The data goes to a freshly created temp sibling first, is synced, and is
/// then renamed into place. The temp file is removed if any later step fails.
pub fn write_atomic(destination: &Path, contents: &[u8]) -> io::Result<()> {
    write_atomic_via(&temp_path_for(destination), destination, contents)
}

fn write_atomic_via(temp_path: &Path, destination: &Path, contents: &[u8]) -> io::Result<()> {
    // create_new refuses anything already at the path, symlinks included.
    let file = create_exclusive(temp_path)?;
    let result =
        write_synced(file, contents).and_then(|()| rename_with_fallback(temp_path, destination));
    if result.is_err() {
        let _ = fs::remove_file(temp_path);
    }
    result
}

fn write_synced(mut file: File, contents: &[u8]) -> io::Result<()> {
    file.write_all(contents)?;
    file.sync_all()
}

fn create_exclusive(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }
    options.open(path)
}

/// Atomically rename a file, with fallback for platforms where rename fails if target exists.
///
/// On some platforms (notably Windows), `fs::rename` fails if the destination already exists.
/// This function handles that case by removing the destination first and retrying.
///
/// If the rename ultimately fails, the temp file is cleaned up.
///
/// # Errors
///
/// Returns an error if the rename fails even after the fallback attempt.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        // Best-effort replace on platforms where rename fails if target exists.
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn partial_files(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".partial"))
            .count()
    }

    #[test]
    fn test_rename_new_file() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join("temp.txt");
        let dest = dir.path().join("dest.txt");

        File::create(&temp).unwrap().write_all(b"test").unwrap();

        rename_with_fallback(&temp, &dest).unwrap();

        assert!(!temp.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "test");
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("report.txt.3c");
        fs::write(&dest, b"old").unwrap();

        write_atomic(&dest, b"new contents").unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"new contents");
        assert_eq!(partial_files(dir.path()), 0);
    }

    #[test]
    fn test_write_atomic_missing_dir_leaves_nothing() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("missing").join("out.bin");

        let err = write_atomic(&dest, b"data").unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!dest.exists());
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let dest = Path::new("/out/report.txt.3c");
        let temp = temp_path_for(dest);
        assert_eq!(temp.parent(), dest.parent());
        assert!(temp
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(".report.txt.3c."));
    }

    #[test]
    fn test_existing_temp_path_is_refused() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.txt");
        let temp = dir.path().join(".out.txt.partial");
        fs::write(&temp, b"someone else's file").unwrap();

        let err = write_atomic_via(&temp, &dest, b"plaintext").unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&temp).unwrap(), b"someone else's file");
        assert!(!dest.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_at_temp_path_is_not_followed() {
        let dir = tempdir().unwrap();
        let victim = dir.path().join("victim.txt");
        fs::write(&victim, b"precious").unwrap();
        let dest = dir.path().join("restored.txt");
        let temp = dir.path().join(".restored.txt.partial");
        std::os::unix::fs::symlink(&victim, &temp).unwrap();

        let err = write_atomic_via(&temp, &dest, b"DECRYPTED OUTPUT").unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&victim).unwrap(), b"precious");
        assert!(fs::symlink_metadata(&temp).unwrap().file_type().is_symlink());
        assert!(fs::symlink_metadata(&dest).is_err());
    }

    #[test]
    fn test_temp_paths_are_not_reused() {
        let dest = Path::new("/out/report.txt.3c");
        let first = temp_path_for(dest);
        std::thread::sleep(std::time::Duration::from_millis(1));
        assert_ne!(first, temp_path_for(dest));
    }

    #[cfg(unix)]
    #[test]
    fn test_written_file_not_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let dest = dir.path().join("plain.txt");
        write_atomic(&dest, b"data").unwrap();

        let mode = fs::metadata(&dest).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0);
        assert_ne!(mode & 0o400, 0);
    }
}
