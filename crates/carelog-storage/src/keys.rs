//! Blob addressing shared by all backends.

use carelog_traits::{BlobError, BlobResult};

/// Check that a bucket/path pair is a well-formed relative address.
///
/// Buckets are a single segment. Paths are `/`-separated, relative, and may
/// not contain empty, `.` or `..` segments or backslashes.
pub fn validate_blob_path(bucket: &str, path: &str) -> BlobResult<()> {
    validate_bucket(bucket)?;
    if path.is_empty() {
        return Err(BlobError::InvalidPath("empty path".to_string()));
    }
    if path.contains('\\') {
        return Err(BlobError::InvalidPath(format!("backslash in '{path}'")));
    }
    for segment in path.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(BlobError::InvalidPath(format!("bad segment in '{path}'")));
        }
    }
    Ok(())
}

/// Check that a bucket name is a single non-special segment.
pub fn validate_bucket(bucket: &str) -> BlobResult<()> {
    if bucket.is_empty()
        || bucket.contains('/')
        || bucket.contains('\\')
        || bucket == "."
        || bucket == ".."
    {
        return Err(BlobError::InvalidPath(format!("bad bucket name '{bucket}'")));
    }
    Ok(())
}

/// Flat key used by key-value backends: `{bucket}/{path}`.
pub fn blob_key(bucket: &str, path: &str) -> String {
    format!("{bucket}/{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_paths() {
        assert!(validate_blob_path("documents", "ai-history/p-1.txt").is_ok());
        assert!(validate_blob_path("documents", "single.txt").is_ok());
    }

    #[test]
    fn test_rejects_traversal_and_empty_segments() {
        for path in ["", "/abs.txt", "a//b", "../escape.txt", "a/./b", "a\\b", "dir/"] {
            assert!(
                matches!(validate_blob_path("documents", path), Err(BlobError::InvalidPath(_))),
                "path {path:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_bad_bucket() {
        assert!(validate_blob_path("", "a.txt").is_err());
        assert!(validate_blob_path("a/b", "a.txt").is_err());
        assert!(validate_blob_path("..", "a.txt").is_err());
    }

    #[test]
    fn test_blob_key() {
        assert_eq!(blob_key("documents", "ai-history/p.txt"), "documents/ai-history/p.txt");
    }
}
