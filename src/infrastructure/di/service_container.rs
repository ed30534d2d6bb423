//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::BlueprintLoader;
use crate::config::Settings;
use crate::domain::LayoutEngine;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs }
    }

    /// Blueprint loader reading through the container's filesystem.
    pub fn loader(&self) -> BlueprintLoader {
        BlueprintLoader::new(Arc::clone(&self.fs))
    }

    /// Layout engine configured with the effective metrics.
    pub fn engine(&self) -> LayoutEngine {
        LayoutEngine::new(self.settings.layout)
    }
}
