// Shared helpers for integration tests.
//
// Provides a temporary directory holding config files and a registry
// initialised against an in-memory environment, so tests never depend on
// the host's HOME or UTIL_CONFIG_* variables.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use util_config::config::Registry;

/// An isolated test workspace backed by a [`tempfile::TempDir`].
pub struct IntegrationTestContext {
    /// Temporary directory containing config files.
    pub root: tempfile::TempDir,
    /// Environment handed to `init_with`.
    pub env: HashMap<String, String>,
}

impl IntegrationTestContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
            env: HashMap::new(),
        }
    }

    /// Path to the workspace root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Path of `name` inside the workspace.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    /// Build a registry initialised with the built-in keys, this context's
    /// environment and the given file candidates.
    pub fn init_registry(&self, candidates: &[PathBuf]) -> Registry {
        let mut registry = Registry::new();
        registry
            .init_with(&self.env, candidates)
            .expect("init registry");
        registry
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building an empty context.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write `content` to `<root>/<name>`, creating parent directories.
    pub fn with_config_file(self, name: &str, content: &str) -> Self {
        let path = self.ctx.root.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create config parent");
        }
        std::fs::write(path, content).expect("write config file");
        self
    }

    /// Add an environment variable visible to `init_with`.
    pub fn with_env(mut self, name: &str, value: &str) -> Self {
        self.ctx.env.insert(name.to_string(), value.to_string());
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}
