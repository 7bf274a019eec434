use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::PathConfig;

/// Collections the console manages over REST
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Users,
    Roles,
    Calls,
    Ideas,
    Tickets,
    Blogs,
    News,
    Pages,
    Menus,
}

impl Resource {
    pub const ALL: [Resource; 9] = [
        Resource::Users,
        Resource::Roles,
        Resource::Calls,
        Resource::Ideas,
        Resource::Tickets,
        Resource::Blogs,
        Resource::News,
        Resource::Pages,
        Resource::Menus,
    ];

    /// Path segment used in the REST templates
    pub fn segment(self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Roles => "roles",
            Resource::Calls => "calls",
            Resource::Ideas => "ideas",
            Resource::Tickets => "tickets",
            Resource::Blogs => "blogs",
            Resource::News => "news",
            Resource::Pages => "pages",
            Resource::Menus => "menus",
        }
    }

    /// Fields a create form refuses to submit empty
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Resource::Users => &["userName", "email"],
            Resource::Roles => &["name"],
            Resource::Tickets => &["subject", "description"],
            Resource::Menus => &["title", "url"],
            Resource::Calls
            | Resource::Ideas
            | Resource::Blogs
            | Resource::News
            | Resource::Pages => &["title"],
        }
    }

    pub fn collection_path(self, paths: &PathConfig) -> String {
        paths.resource_collection.replace("{resource}", self.segment())
    }

    pub fn item_path(self, paths: &PathConfig, id: &str) -> String {
        paths
            .resource_item
            .replace("{resource}", self.segment())
            .replace("{id}", id)
    }

    pub fn status_path(self, paths: &PathConfig, id: &str) -> String {
        paths
            .resource_status
            .replace("{resource}", self.segment())
            .replace("{id}", id)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Resource::ALL
            .iter()
            .copied()
            .find(|r| r.segment() == wanted || r.segment().trim_end_matches('s') == wanted)
            .ok_or_else(|| {
                let known: Vec<_> = Resource::ALL.iter().map(|r| r.segment()).collect();
                format!("unknown resource '{}', expected one of: {}", s, known.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_from_templates() {
        let paths = PathConfig::default();
        assert_eq!(Resource::Ideas.collection_path(&paths), "/api/ideas");
        assert_eq!(Resource::Ideas.item_path(&paths, "12"), "/api/ideas/12");
        assert_eq!(Resource::Tickets.status_path(&paths, "3"), "/api/tickets/3/status");
    }

    #[test]
    fn test_parse_plural_and_singular() {
        assert_eq!("ideas".parse::<Resource>().unwrap(), Resource::Ideas);
        assert_eq!("Idea".parse::<Resource>().unwrap(), Resource::Ideas);
        assert_eq!("news".parse::<Resource>().unwrap(), Resource::News);
        assert!("widgets".parse::<Resource>().is_err());
    }
}
