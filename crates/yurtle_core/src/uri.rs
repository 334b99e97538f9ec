//! Conversion between absolute paths and `file://` URIs.
//!
//! Every byte outside the RFC 3986 unreserved set (and `/`) is
//! percent-encoded, which makes the two functions exact inverses for any
//! absolute UTF-8 path.

use crate::error::{Result, YurtleError};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::{Path, PathBuf};

const SCHEME: &str = "file://";

/// Everything but the unreserved characters and `/`.
const PATH_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Converts an absolute path to a `file://` URI.
///
/// # Errors
///
/// Returns `InvalidFileUri` for relative or non-UTF-8 paths.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use yurtle_core::{file_uri_to_path, path_to_file_uri};
///
/// let uri = path_to_file_uri(Path::new("/work/my notes/a.md")).unwrap();
/// assert_eq!(uri, "file:///work/my%20notes/a.md");
/// assert_eq!(file_uri_to_path(&uri).unwrap(), Path::new("/work/my notes/a.md"));
/// ```
pub fn path_to_file_uri(path: &Path) -> Result<String> {
    if !path.is_absolute() {
        return Err(YurtleError::InvalidFileUri(format!(
            "path is not absolute: {}",
            path.display()
        )));
    }
    let s = path.to_str().ok_or_else(|| {
        YurtleError::InvalidFileUri(format!("path is not UTF-8: {}", path.display()))
    })?;
    Ok(format!("{}{}", SCHEME, utf8_percent_encode(s, PATH_ENCODE)))
}

/// Converts a `file://` URI back to a path.
///
/// A `%` that does not start a valid escape is kept as it is.
///
/// # Errors
///
/// Returns `InvalidFileUri` if the scheme is not `file://` or the decoded
/// bytes are not UTF-8.
pub fn file_uri_to_path(uri: &str) -> Result<PathBuf> {
    let rest = uri
        .strip_prefix(SCHEME)
        .ok_or_else(|| YurtleError::InvalidFileUri(format!("not a file URI: {}", uri)))?;
    let decoded = percent_decode_str(rest)
        .decode_utf8()
        .map_err(|_| YurtleError::InvalidFileUri(format!("not UTF-8: {}", uri)))?;
    Ok(PathBuf::from(decoded.as_ref()))
}
