//! Blueprint loading service
//!
//! Reads blueprint text through the `FileSystem` boundary and hands it to the
//! parser. The parser itself never touches the filesystem.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{parse, Blueprint};
use crate::infrastructure::traits::FileSystem;

/// Service for loading blueprints from disk.
pub struct BlueprintLoader {
    fs: Arc<dyn FileSystem>,
}

impl BlueprintLoader {
    /// Create a new loader.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read and parse a blueprint file.
    ///
    /// Parse failures surface as `ApplicationError::Parse` with the original
    /// layer/section/index context.
    pub fn load(&self, path: &Path) -> ApplicationResult<Blueprint> {
        debug!("load: path={}", path.display());
        if !self.fs.is_file(path) {
            return Err(ApplicationError::OperationFailed {
                context: format!("blueprint not found: {}", path.display()),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "file does not exist",
                )),
            });
        }
        let text = self
            .fs
            .read_to_string(path)
            .with_path_context("read blueprint", path)?;
        Ok(parse(&text)?)
    }

    /// Load a blueprint, falling back to an empty one on any failure.
    ///
    /// A broken or missing file must not take the view down; the failure is
    /// logged and returned alongside the empty blueprint.
    pub fn load_or_empty(&self, path: &Path) -> (Blueprint, Option<ApplicationError>) {
        match self.load(path) {
            Ok(blueprint) => (blueprint, None),
            Err(e) => {
                warn!("failed to load blueprint {}: {}", path.display(), e);
                (Blueprint::empty(), Some(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;
    use std::path::PathBuf;

    use crate::domain::ParseError;

    #[derive(Default)]
    struct MemoryFs {
        files: HashMap<PathBuf, String>,
    }

    impl FileSystem for MemoryFs {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "missing"))
        }

        fn is_file(&self, path: &Path) -> bool {
            self.files.contains_key(path)
        }
    }

    fn loader_with(path: &str, content: &str) -> BlueprintLoader {
        let mut fs = MemoryFs::default();
        fs.files.insert(PathBuf::from(path), content.to_string());
        BlueprintLoader::new(Arc::new(fs))
    }

    #[test]
    fn given_valid_file_when_loading_then_returns_blueprint() {
        let loader = loader_with("/bp.toml", "[a.s]\ncomponents = [\"c\"]\n");
        let bp = loader.load(Path::new("/bp.toml")).unwrap();
        assert_eq!(bp.node_count(), 3);
    }

    #[test]
    fn given_malformed_file_when_loading_then_keeps_parse_context() {
        let loader = loader_with("/bp.toml", "[a.s]\ncomponents = [1]\n");
        let err = loader.load(Path::new("/bp.toml")).unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Parse(ParseError::InvalidComponentEntry { index: 0, .. })
        ));
    }

    #[test]
    fn given_missing_file_when_loading_leniently_then_returns_empty_blueprint() {
        let loader = loader_with("/bp.toml", "");
        let (bp, err) = loader.load_or_empty(Path::new("/other.toml"));
        assert!(bp.is_empty());
        assert!(err.is_some());
    }
}
