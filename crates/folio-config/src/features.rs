//! Feature toggles for optional build artifacts.

use std::fmt;

/// An optional, cross-cutting build feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Sitemap,
    Manifest,
    Offline,
    Analytics,
    Rss,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::Sitemap,
        Feature::Manifest,
        Feature::Offline,
        Feature::Analytics,
        Feature::Rss,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Sitemap => "sitemap",
            Self::Manifest => "manifest",
            Self::Offline => "offline",
            Self::Analytics => "analytics",
            Self::Rss => "rss",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved on/off state of every [`Feature`].
///
/// `analytics` is the effective value: it is only `true` when a tracking id
/// is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureToggles {
    pub sitemap: bool,
    pub manifest: bool,
    pub offline: bool,
    pub analytics: bool,
    pub rss: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            sitemap: true,
            manifest: true,
            offline: false,
            analytics: false,
            rss: true,
        }
    }
}

impl FeatureToggles {
    pub fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::Sitemap => self.sitemap,
            Feature::Manifest => self.manifest,
            Feature::Offline => self.offline,
            Feature::Analytics => self.analytics,
            Feature::Rss => self.rss,
        }
    }

    /// Features that will produce output.
    pub fn enabled(&self) -> impl Iterator<Item = Feature> + '_ {
        Feature::ALL
            .into_iter()
            .filter(move |f| self.is_enabled(*f))
    }
}
