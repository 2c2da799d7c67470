//! Built-in catalog of configuration keys and registry initialisation.
use std::path::PathBuf;

use super::env::{EnvSource, ProcessEnv};
use super::file::search_paths;
use super::registry::{INITIALIZED_KEY, Registry};
use super::types::ValueType;
use crate::error::ConfigError;

/// Static definition of one built-in key.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    /// Dotted key.
    pub key: &'static str,
    /// Default value.
    pub default: &'static str,
    /// Logical type.
    pub value_type: ValueType,
    /// Human-readable description.
    pub description: &'static str,
    /// Optional validation pattern.
    pub pattern: Option<&'static str>,
}

const UNSIGNED: Option<&str> = Some(r"^[0-9]+$");
const OCTAL_MODE: Option<&str> = Some(r"^[0-7]{3,4}$");

macro_rules! entry {
    ($key:literal, $default:literal, $ty:ident, $desc:literal) => {
        entry!($key, $default, $ty, $desc, None)
    };
    ($key:literal, $default:literal, $ty:ident, $desc:literal, $pattern:expr) => {
        CatalogEntry {
            key: $key,
            default: $default,
            value_type: ValueType::$ty,
            description: $desc,
            pattern: $pattern,
        }
    };
}

static CATALOG: &[CatalogEntry] = &[
    // logging
    entry!("log.level", "info", String, "Minimum log level", Some(r"^(debug|info|warn|error|fatal)$")),
    entry!("log.color", "auto", String, "Colorize log output", Some(r"^(auto|always|never)$")),
    entry!("log.timestamps", "false", Bool, "Prefix log lines with timestamps"),
    entry!("log.file", "", Path, "Append log output to this file"),
    // temp files
    entry!("tmp.dir", "/tmp", Path, "Directory for temporary files"),
    entry!("tmp.cleanup", "true", Bool, "Remove temporary files on exit"),
    entry!("tmp.prefix", "bash_util", String, "Prefix for temporary file names", Some(r"^[A-Za-z0-9_.-]+$")),
    // network
    entry!("net.timeout", "30", Int, "Network timeout in seconds", UNSIGNED),
    entry!("net.retries", "3", Int, "Retry attempts for network operations", UNSIGNED),
    entry!("net.retry_delay", "2", Int, "Seconds between network retries", UNSIGNED),
    entry!("net.user_agent", "bash_util", String, "User agent for HTTP requests"),
    // curl
    entry!("curl.follow_redirects", "true", Bool, "Follow HTTP redirects"),
    entry!("curl.max_redirects", "10", Int, "Maximum redirects to follow", UNSIGNED),
    entry!("curl.insecure", "false", Bool, "Skip TLS certificate verification"),
    // files and directories
    entry!("file.checksum_algo", "sha256", String, "Checksum algorithm for downloads", Some(r"^(md5|sha1|sha256|sha512)$")),
    entry!("file.backup", "true", Bool, "Back up files before overwriting"),
    entry!("file.backup_suffix", ".bak", String, "Suffix for backup files"),
    entry!("dir.create_mode", "755", String, "Mode for created directories", OCTAL_MODE),
    // package managers
    entry!("pkg.auto_update", "false", Bool, "Refresh package indexes before installing"),
    entry!("pkg.assume_yes", "true", Bool, "Answer yes to package manager prompts"),
    entry!("apt.quiet", "true", Bool, "Run apt-get quietly"),
    entry!("brew.no_auto_update", "true", Bool, "Set HOMEBREW_NO_AUTO_UPDATE for brew"),
    // git
    entry!("git.default_branch", "main", String, "Default branch for new repositories", Some(r"^[A-Za-z0-9._/-]+$")),
    entry!("git.clone_depth", "1", Int, "Depth for shallow clones (0 for full history)", UNSIGNED),
    // platform
    entry!("platform.detect_wsl", "true", Bool, "Treat WSL as a distinct platform"),
    entry!("platform.override", "", String, "Force platform detection result", Some(r"^(linux|macos|wsl)?$")),
    // menus and TUI
    entry!("menu.backend", "auto", String, "Menu backend", Some(r"^(auto|dialog|whiptail|text)$")),
    entry!("menu.height", "20", Int, "Menu dialog height", UNSIGNED),
    entry!("menu.width", "70", Int, "Menu dialog width", UNSIGNED),
    entry!("tui.spinner", "dots", String, "Spinner style", Some(r"^(dots|line|arrow|none)$")),
    entry!("tui.progress_width", "40", Int, "Progress bar width in columns", UNSIGNED),
    // security
    entry!("security.strict_mode", "true", Bool, "Enable errexit, nounset and pipefail"),
    entry!("security.allow_sudo", "true", Bool, "Allow privilege escalation with sudo"),
    entry!("security.verify_checksums", "true", Bool, "Verify checksums of downloaded files"),
    entry!("security.umask", "022", String, "Umask for created files", OCTAL_MODE),
];

/// All built-in keys, in declaration order.
#[must_use]
pub fn entries() -> &'static [CatalogEntry] {
    CATALOG
}

impl Registry {
    /// Create a registry with the built-in catalog registered and the process
    /// environment and default config files applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in catalog fails to register.
    pub fn with_defaults() -> Result<Self, ConfigError> {
        let mut reg = Self::new();
        reg.init()?;
        Ok(reg)
    }

    /// Register the built-in catalog, then load the process environment and
    /// the first config file found on the default search path.
    ///
    /// Repeated calls are no-ops.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in catalog fails to register.
    pub fn init(&mut self) -> Result<(), ConfigError> {
        let env = ProcessEnv;
        let candidates = search_paths(&env);
        self.init_with(&env, &candidates)
    }

    /// [`init`](Self::init) with an explicit environment and file candidates.
    ///
    /// Environment values are applied first and file values second, so a
    /// file setting wins over an environment setting for the same key.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in catalog fails to register.
    pub fn init_with(
        &mut self,
        env: &impl EnvSource,
        candidates: &[PathBuf],
    ) -> Result<(), ConfigError> {
        if self.value(INITIALIZED_KEY).is_some() {
            tracing::debug!("configuration already initialised");
            return Ok(());
        }

        for e in CATALOG {
            self.register(e.key, e.default, e.value_type.as_str(), e.description, e.pattern)?;
        }
        self.register(INITIALIZED_KEY, "true", "bool", "Initialisation marker", None)?;
        self.lock(INITIALIZED_KEY);

        let report = self.load_from_env_source(env);
        let file = self.load_first_of(candidates);
        tracing::debug!(
            "initialised {} keys ({} from environment, file: {})",
            self.count(),
            report.loaded,
            file.as_ref()
                .map_or_else(|| "none".to_string(), |p| p.display().to_string())
        );
        Ok(())
    }
}
