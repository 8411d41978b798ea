//! Pre-flight validation of the target path.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::CheckError;

/// Confirm the target exists and is a regular file before hashing it.
///
/// This check is advisory; the file can still vanish before it is opened.
pub(crate) fn check_target(path: &Path) -> Result<(), CheckError> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(CheckError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(err) => return Err(CheckError::io(path, err)),
    };
    if !metadata.is_file() {
        return Err(CheckError::Argument(format!(
            "'{}' is not a regular file",
            path.display()
        )));
    }
    Ok(())
}
