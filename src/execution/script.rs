//! Generated-script temp file with guaranteed cleanup.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info, warn};

use super::error::{ExecutionError, Result};

const PREFIX: &str = "code-interpreter-";
const SUFFIX: &str = ".py";

/// Owns the script file on disk. The file is removed by [`ScriptFile::remove`]
/// or, failing that, when the value is dropped.
#[derive(Debug)]
pub struct ScriptFile {
    inner: Option<NamedTempFile>,
    path: PathBuf,
}

impl ScriptFile {
    pub fn create_in(dir: &Path, code: &str) -> Result<Self> {
        if code.trim().is_empty() {
            return Err(ExecutionError::EmptyScript);
        }
        let mut file = Builder::new()
            .prefix(PREFIX)
            .suffix(SUFFIX)
            .tempfile_in(dir)?;
        file.write_all(code.as_bytes())?;
        file.flush()?;

        let path = file.path().to_path_buf();
        info!(path = %path.display(), "temp script written");
        Ok(Self { inner: Some(file), path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the script; this is what gets bind-mounted.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn remove(mut self) {
        self.release();
    }

    fn release(&mut self) {
        let Some(file) = self.inner.take() else { return };
        match file.close() {
            Ok(()) => debug!(path = %self.path.display(), "temp script removed"),
            // Already gone, or the directory vanished under us
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove temp script"),
        }
    }
}

impl Drop for ScriptFile {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn writes_code_verbatim_with_py_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let code = "import math\n\nprint(math.pi)\n";
        let script = ScriptFile::create_in(dir.path(), code).unwrap();

        assert!(script.file_name().starts_with(PREFIX));
        assert!(script.file_name().ends_with(".py"));
        assert_eq!(script.dir(), dir.path());
        assert_eq!(fs::read_to_string(script.path()).unwrap(), code);
    }

    #[test]
    fn names_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let a = ScriptFile::create_in(dir.path(), "print(1)").unwrap();
        let b = ScriptFile::create_in(dir.path(), "print(2)").unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn remove_deletes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let script = ScriptFile::create_in(dir.path(), "print(1)").unwrap();
        let path = script.path().to_path_buf();
        script.remove();
        assert!(!path.exists());
    }

    #[test]
    fn drop_deletes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let script = ScriptFile::create_in(dir.path(), "print(1)").unwrap();
            script.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn already_deleted_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = ScriptFile::create_in(dir.path(), "print(1)").unwrap();
        fs::remove_file(script.path()).unwrap();
        script.remove();
    }

    #[test]
    fn empty_code_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScriptFile::create_in(dir.path(), "  \n").unwrap_err();
        assert!(matches!(err, ExecutionError::EmptyScript));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
