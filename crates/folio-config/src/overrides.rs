//! Configuration layers that sit above `folio.toml`.

use std::path::PathBuf;

/// Environment variable carrying the public site URL.
pub const ENV_SITE_URL: &str = "FOLIO_SITE_URL";
/// Environment variable carrying the analytics tracking id.
pub const ENV_ANALYTICS_ID: &str = "FOLIO_ANALYTICS_ID";
/// Environment variable overriding the output directory.
pub const ENV_OUTPUT_DIR: &str = "FOLIO_OUTPUT_DIR";

/// Overrides read from the process environment.
///
/// Empty values count as unset, so `FOLIO_ANALYTICS_ID=` behaves exactly
/// like an absent variable.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnvOverrides {
    pub site_url: Option<String>,
    pub analytics_id: Option<String>,
    pub output_dir: Option<PathBuf>,
}

impl EnvOverrides {
    /// Read overrides from `std::env`.
    ///
    /// Only the `FOLIO_*` keys are looked up, so unrelated variables that are
    /// not valid Unicode are never touched.
    pub fn from_env() -> Self {
        Self::from_vars(
            [ENV_SITE_URL, ENV_ANALYTICS_ID, ENV_OUTPUT_DIR]
                .into_iter()
                .filter_map(|key| match std::env::var(key) {
                    Ok(value) => Some((key, value)),
                    Err(std::env::VarError::NotPresent) => None,
                    Err(e) => {
                        tracing::warn!("Ignoring {}: {}", key, e);
                        None
                    }
                }),
        )
    }

    /// Read overrides from an explicit key-value source.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut overrides = Self::default();
        for (key, value) in vars {
            let value: String = value.into();
            if value.trim().is_empty() {
                continue;
            }
            match key.as_ref() {
                ENV_SITE_URL => overrides.site_url = Some(value),
                ENV_ANALYTICS_ID => overrides.analytics_id = Some(value),
                ENV_OUTPUT_DIR => overrides.output_dir = Some(PathBuf::from(value)),
                _ => {}
            }
        }
        overrides
    }
}

/// CLI settings that override every other layer.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default, Clone)]
pub struct CliSettings {
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override content directory.
    pub content_dir: Option<PathBuf>,
    /// Override public site URL.
    pub site_url: Option<String>,
    /// Override minification.
    pub minify: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_known_variables() {
        let env = EnvOverrides::from_vars([
            (ENV_SITE_URL, "https://example.org"),
            (ENV_ANALYTICS_ID, "UA-1234"),
            ("HOME", "/root"),
        ]);

        assert_eq!(env.site_url.as_deref(), Some("https://example.org"));
        assert_eq!(env.analytics_id.as_deref(), Some("UA-1234"));
        assert!(env.output_dir.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn non_unicode_environment_is_tolerated() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        std::env::set_var("FOLIO_TEST_UNRELATED", OsStr::from_bytes(b"f\xffo"));

        let env = EnvOverrides::from_env();

        std::env::remove_var("FOLIO_TEST_UNRELATED");
        assert_eq!(
            env.site_url.is_some(),
            std::env::var(ENV_SITE_URL).is_ok_and(|v| !v.trim().is_empty())
        );
    }

    #[test]
    fn empty_values_are_unset() {
        let env = EnvOverrides::from_vars([(ENV_ANALYTICS_ID, "  ")]);
        assert_eq!(env, EnvOverrides::default());
    }
}
