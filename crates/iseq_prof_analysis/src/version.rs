//! Package version resolution
//!
//! Release tooling writes a `_version.yaml` artifact holding a `version`
//! string next to the installed executable. Development checkouts have
//! no such file, in which case the version is [`SENTINEL_VERSION`].

use figment::{
    providers::{Format, Yaml},
    Figment,
};
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Version reported when no artifact provides one
pub const SENTINEL_VERSION: &str = "x.x.x";

/// File name of the generated version artifact
pub const VERSION_FILE_NAME: &str = "_version.yaml";

/// Environment variable overriding the artifact location
pub const VERSION_FILE_ENV: &str = "ISEQ_VERSION_FILE";

/// Version stamped in at build time, when the release build sets it
const BUILD_VERSION: Option<&str> = option_env!("ISEQ_PROF_ANALYSIS_VERSION");

/// Read the `version` string from an artifact, if there is a usable one
pub fn read_version_artifact(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }

    Figment::from(Yaml::file(path))
        .extract_inner::<String>("version")
        .ok()
        .map(|version| version.trim().to_string())
        .filter(|version| !version.is_empty())
}

/// Where the version artifact is expected
pub fn artifact_path() -> Option<PathBuf> {
    locate_artifact(env::var_os(VERSION_FILE_ENV), env::current_exe().ok().as_deref())
}

/// An explicit location wins, otherwise the artifact sits beside `exe`
fn locate_artifact(explicit: Option<OsString>, exe: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => exe.and_then(|exe| exe.parent().map(|dir| dir.join(VERSION_FILE_NAME))),
    }
}

/// Version from `artifact`, or [`SENTINEL_VERSION`] when it has none
pub fn resolve_version(artifact: Option<&Path>) -> String {
    artifact
        .and_then(read_version_artifact)
        .unwrap_or_else(|| {
            debug!(artifact = ?artifact, "No version artifact, using sentinel version");
            SENTINEL_VERSION.to_string()
        })
}

/// Package version, resolved once per process
pub fn version() -> &'static str {
    static VERSION: OnceLock<String> = OnceLock::new();
    VERSION.get_or_init(|| match BUILD_VERSION {
        Some(version) if !version.trim().is_empty() => version.trim().to_string(),
        _ => resolve_version(artifact_path().as_deref()),
    })
}
