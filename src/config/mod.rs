//! Configuration module

mod site;

pub use site::HighlightConfig;
pub use site::SiteConfig;
pub use site::ThemeConfig;
pub use site::TocConfig;
pub use site::SITE_URL_ENV;
