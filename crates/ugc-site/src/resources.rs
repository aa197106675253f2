//! Content API endpoints used by the site.

use std::fmt;
use ugc_i18n::resolver::DEFAULT_RESOURCE_TEMPLATE;
use ugc_i18n::Language;

/// A named content API endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Homepage content blocks.
    Homepage,
    /// Headline company statistics.
    HomepageStats,
    /// Every service.
    Services,
    /// Services shown on the homepage.
    FeaturedServices,
    /// Portfolio projects.
    Projects,
    /// Projects shown on the homepage.
    FeaturedProjects,
    /// Open job postings.
    Jobs,
    /// Full dictionary of one language.
    Translations(Language),
}

impl Resource {
    /// Resource id passed to the fetcher.
    pub fn path(&self) -> String {
        match self {
            Self::Homepage => "/homepage/".to_string(),
            Self::HomepageStats => "/homepage/stats/".to_string(),
            Self::Services => "/services/".to_string(),
            Self::FeaturedServices => "/services/featured/".to_string(),
            Self::Projects => "/projects/".to_string(),
            Self::FeaturedProjects => "/projects/featured/".to_string(),
            Self::Jobs => "/jobs/".to_string(),
            Self::Translations(language) => DEFAULT_RESOURCE_TEMPLATE.replace("{lang}", language.code()),
        }
    }

    /// Content the first page render needs, excluding translations.
    pub fn critical() -> [Self; 4] {
        [
            Self::Homepage,
            Self::HomepageStats,
            Self::FeaturedServices,
            Self::FeaturedProjects,
        ]
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
