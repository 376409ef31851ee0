use std::path::Path;

use pagesum_common::{PagesumError, Result};

/// Write the fetched markup verbatim (UTF-8) to `path`, replacing any existing file.
pub fn save_raw_html(path: &Path, html: &str) -> Result<()> {
    std::fs::write(path, html).map_err(|source| PagesumError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = html.len(), "snapshot.saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_text_verbatim() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("page.html");
        let html = "<title>Ünïcode</title>\r\n<h1> x </h1>";

        save_raw_html(&path, html).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), html);
    }

    #[test]
    fn missing_directory_is_a_file_write_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("no-such-dir").join("page.html");

        let err = save_raw_html(&path, "<p/>").unwrap_err();

        match err {
            PagesumError::FileWrite { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("expected FileWrite, got {other:?}"),
        }
    }
}
