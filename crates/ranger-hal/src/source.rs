//! Generic `LineSource` trait and the file-backed implementation.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use ranger_types::RangerError;
use tracing::trace;

/// Anything that can hand back the first line of a named text source.
///
/// The viewer treats the content as opaque text; validation happens in the
/// parser, not here.
pub trait LineSource: Send {
    /// Read and return the first line found at `path`, including any trailing
    /// newline.  An empty source yields an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`RangerError::SourceNotFound`], [`RangerError::PermissionDenied`]
    /// or [`RangerError::OtherReadFailure`] when the source cannot be read.
    fn read_first_line(&mut self, path: &Path) -> Result<String, RangerError>;
}

/// Reads from the filesystem, opening and closing the file on every call.
///
/// debugfs files regenerate their content on open, so the handle is never
/// kept between reads.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileLineSource;

impl FileLineSource {
    pub fn new() -> Self {
        Self
    }
}

impl LineSource for FileLineSource {
    fn read_first_line(&mut self, path: &Path) -> Result<String, RangerError> {
        let file = File::open(path).map_err(|e| classify(path, e))?;
        let mut line = String::new();
        BufReader::new(file)
            .read_line(&mut line)
            .map_err(|e| classify(path, e))?;
        trace!(path = %path.display(), bytes = line.len(), "read source line");
        Ok(line)
    }
}

fn classify(path: &Path, err: io::Error) -> RangerError {
    match err.kind() {
        io::ErrorKind::NotFound => RangerError::SourceNotFound(path.display().to_string()),
        io::ErrorKind::PermissionDenied => {
            RangerError::PermissionDenied(path.display().to_string())
        }
        _ => RangerError::OtherReadFailure(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_only_the_first_line() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("distances");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "0.100,0.200,0.300,0.400,0.500").unwrap();
        writeln!(f, "9,9,9,9,9").unwrap();

        let line = FileLineSource::new().read_first_line(&path).unwrap();
        assert_eq!(line, "0.100,0.200,0.300,0.400,0.500\n");
    }

    #[test]
    fn empty_file_yields_empty_line() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("distances");
        File::create(&path).unwrap();

        let line = FileLineSource::new().read_first_line(&path).unwrap();
        assert!(line.is_empty());
    }

    #[test]
    fn missing_file_is_source_not_found() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("nope");
        let err = FileLineSource::new().read_first_line(&path).unwrap_err();
        assert!(matches!(err, RangerError::SourceNotFound(ref p) if p.ends_with("nope")));
    }

    #[test]
    fn directory_is_other_read_failure() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let err = FileLineSource::new().read_first_line(dir.path()).unwrap_err();
        assert!(matches!(err, RangerError::OtherReadFailure(_)));
    }

    #[test]
    fn picks_up_new_content_between_reads() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("distances");
        let mut src = FileLineSource::new();

        std::fs::write(&path, "1,2,3\n").unwrap();
        assert_eq!(src.read_first_line(&path).unwrap(), "1,2,3\n");
        std::fs::write(&path, "4,5,6\n").unwrap();
        assert_eq!(src.read_first_line(&path).unwrap(), "4,5,6\n");
    }
}
