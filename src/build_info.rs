use std::sync::OnceLock;

const SHORT_SHA_LEN: usize = 12;

/// Build-time git commit SHA stamped by build.rs when available.
pub fn git_sha() -> Option<&'static str> {
    option_env!("CHAINLINK_BUILD_GIT_SHA")
}

/// Version string shown by `--version`: the package version, plus the short
/// commit SHA when the build was stamped.
pub fn version() -> &'static str {
    static VERSION: OnceLock<String> = OnceLock::new();
    VERSION.get_or_init(|| describe(env!("CARGO_PKG_VERSION"), git_sha()))
}

fn describe(version: &str, sha: Option<&str>) -> String {
    match sha {
        Some(sha) => format!("{version} ({})", sha.get(..SHORT_SHA_LEN).unwrap_or(sha)),
        None => version.to_string(),
    }
}
