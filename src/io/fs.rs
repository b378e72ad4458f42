use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tempfile::TempDir;

pub fn assert_not_stdout(path: &Path) -> Result<()> {
    if path == Path::new("-") {
        bail!("stdout is not supported; provide a real file path.");
    }
    Ok(())
}

/// Write-then-rename staging area for outputs made of one or more sibling
/// files (a shapefile is `.shp` + `.shx` + `.dbf`).
///
/// Files are written into a temp directory next to the target and only moved
/// into place by [`PendingWrite::finalize`]; dropping it unfinalized leaves
/// the destination untouched.
pub struct PendingWrite {
    target: PathBuf,
    dir: TempDir,
}

/// Fail if `target` is stdout, or already exists and `force` is off.
pub fn check_target(target: &Path, force: bool) -> Result<()> {
    assert_not_stdout(target)?;
    if !force && target.exists() {
        bail!("Refusing to overwrite existing file: {} (use --force)", target.display());
    }
    Ok(())
}

pub fn open_for_write(target: &Path, force: bool) -> Result<PendingWrite> {
    check_target(target, force)?;
    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("create dir {}", parent.display()))?;
    let dir = TempDir::new_in(parent).context("create temp dir")?;

    Ok(PendingWrite { target: target.to_path_buf(), dir })
}

impl PendingWrite {
    /// Staging path for the target with its extension replaced by `ext`.
    pub fn staged(&self, ext: &str) -> PathBuf {
        self.dir.path().join(self.file_name()).with_extension(ext)
    }

    /// Staging path for the target itself.
    pub fn staged_target(&self) -> PathBuf {
        self.dir.path().join(self.file_name())
    }

    fn file_name(&self) -> &std::ffi::OsStr {
        self.target.file_name().unwrap_or_else(|| "output".as_ref())
    }

    /// Move every staged file next to the target, then drop the temp dir.
    pub fn finalize(self) -> Result<()> {
        let dest_dir = self.dir.path().parent().map(Path::to_path_buf).unwrap_or_default();
        for entry in fs::read_dir(self.dir.path()).context("list staged files")? {
            let staged = entry?.path();
            if let Ok(file) = File::open(&staged) { file.sync_all().ok(); } // best-effort fsync file
            let Some(name) = staged.file_name() else { continue };
            let dest = dest_dir.join(name);
            fs::rename(&staged, &dest)
                .with_context(|| format!("rename to {}", dest.display()))?;
        }
        let _ = File::open(&dest_dir).and_then(|f| f.sync_all());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn rejects_stdout() {
        assert!(assert_not_stdout(Path::new("-")).is_err());
        assert!(assert_not_stdout(Path::new("out.geojson")).is_ok());
        assert!(check_target(Path::new("-"), true).is_err());
    }

    #[test]
    fn check_target_honors_force() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("points.geojson");
        assert!(check_target(&target, false).is_ok());

        fs::write(&target, "old").unwrap();
        assert!(check_target(&target, false).is_err());
        assert!(check_target(&target, true).is_ok());
    }

    #[test]
    fn finalize_moves_all_staged_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("points.shp");
        let pending = open_for_write(&target, false).unwrap();
        for ext in ["shp", "shx", "dbf"] {
            File::create(pending.staged(ext)).unwrap().write_all(ext.as_bytes()).unwrap();
        }
        pending.finalize().unwrap();

        for ext in ["shp", "shx", "dbf"] {
            assert_eq!(fs::read_to_string(target.with_extension(ext)).unwrap(), ext);
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn dropped_write_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("points.geojson");
        {
            let pending = open_for_write(&target, false).unwrap();
            fs::write(pending.staged_target(), "{}").unwrap();
        }
        assert!(!target.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("points.geojson");
        fs::write(&target, "old").unwrap();

        assert!(open_for_write(&target, false).is_err());
        let pending = open_for_write(&target, true).unwrap();
        fs::write(pending.staged_target(), "new").unwrap();
        pending.finalize().unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }
}
