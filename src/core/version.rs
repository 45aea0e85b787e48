//! Build metadata generated by the build script

include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// Build time string from the build script (UTC)
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Short git hash captured by the build script
pub fn git_hash() -> &'static str {
    GIT_HASH
}

/// "0.1.0 (abc1234, built 2025-01-01 00:00:00 UTC)"
pub fn long_version() -> String {
    format!(
        "{} ({}, built {})",
        env!("CARGO_PKG_VERSION"),
        git_hash(),
        build_time()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_version_mentions_package_version() {
        let version = long_version();
        assert!(version.starts_with(env!("CARGO_PKG_VERSION")));
        assert!(version.contains(git_hash()));
        assert!(build_time().ends_with("UTC"));
    }
}
