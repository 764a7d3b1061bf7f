//! Tags stamped onto every taggable resource.

use std::collections::BTreeMap;

/// Process-wide tags merged into each taggable resource's `tags`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoTags {
    tags: BTreeMap<String, String>,
}

impl AutoTags {
    /// The standard set: source marker, project, stack and compliance boundary.
    pub fn new(project: &str, stack: &str, fedramp_boundary: &str) -> Self {
        let mut tags = BTreeMap::new();
        tags.insert("source".to_string(), "pulumi".to_string());
        tags.insert("pulumi:Project".to_string(), project.to_string());
        tags.insert("pulumi:Stack".to_string(), stack.to_string());
        tags.insert("fedramp_boundary".to_string(), fedramp_boundary.to_string());
        AutoTags { tags }
    }

    /// Name tag first, auto tags win on key collisions.
    pub fn apply(&self, name_tag: Option<&str>) -> BTreeMap<String, String> {
        let mut merged = BTreeMap::new();
        if let Some(name) = name_tag {
            merged.insert("Name".to_string(), name.to_string());
        }
        merged.extend(self.tags.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_tags_are_present() {
        let tags = AutoTags::new("networking", "dev", "moderate");
        assert_eq!(tags.get("source"), Some("pulumi"));
        assert_eq!(tags.get("pulumi:Project"), Some("networking"));
        assert_eq!(tags.get("pulumi:Stack"), Some("dev"));
        assert_eq!(tags.get("fedramp_boundary"), Some("moderate"));
    }

    #[test]
    fn apply_merges_name() {
        let tags = AutoTags::new("networking", "dev", "moderate");
        let merged = tags.apply(Some("Platform k8s VPC dev"));
        assert_eq!(merged.len(), 5);
        assert_eq!(merged["Name"], "Platform k8s VPC dev");

        let merged = tags.apply(None);
        assert_eq!(merged.len(), 4);
        assert!(!merged.contains_key("Name"));
    }
}
