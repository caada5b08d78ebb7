use serde::Serialize;

/// Build metadata captured by `build.rs` at compile time.
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub build_profile: &'static str,
    pub build_features: &'static str,
    pub version: &'static str,
    pub pkg_version: &'static str,
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cubby {} ({}, profile={}, features={})",
            self.pkg_version, self.version, self.build_profile, self.build_features
        )
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        build_profile: env!("BUILD_PROFILE"),
        build_features: env!("BUILD_FEATURES"),
        version: env!("REPO_VERSION"),
        pkg_version: env!("CARGO_PKG_VERSION"),
    }
}
