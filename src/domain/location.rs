//! Navigation location.

/// The current navigation path, e.g. `/dashboard/123456789012345678`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    path: String,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Any path under `/dashboard/` is a guild-detail view.
    pub fn is_guild_view(&self) -> bool {
        self.path.contains("/dashboard/")
    }

    /// Last path segment of a guild-detail view.
    pub fn guild_id(&self) -> Option<&str> {
        if !self.is_guild_view() {
            return None;
        }
        self.path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty() && *segment != "dashboard")
    }
}
