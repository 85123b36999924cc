//! Principal-scoped projections of the snapshot: accessible lists, the category tree,
//! category defaults and effective priority.

use serde::Serialize;

use crate::access::FlagNames;
use crate::path::is_root_path;
use crate::principal::Principal;
use crate::priority::Priority;
use crate::snapshot::ConfigurationSnapshot;

/// Root category in the hierarchy view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTreeNode {
    pub name: String,
    pub priority: Priority,
    pub permissions: Vec<String>,
    pub default_flags: Vec<String>,
    pub children: Vec<CategoryTreeChild>,
}

/// Direct child of a root in the hierarchy view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTreeChild {
    /// Short name.
    pub name: String,
    pub full_name: String,
    pub priority: Priority,
    pub permissions: Vec<String>,
    pub default_flags: Vec<String>,
}

/// Values to pre-populate on a new ticket of a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryDefaults {
    pub priority: Priority,
    pub default_flags: Vec<String>,
}

/// Flag as rendered in options metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagDetail {
    pub name: String,
    pub priority: Priority,
    pub permissions: Vec<String>,
}

impl ConfigurationSnapshot {
    /// Category paths `principal` may use, in flat-list order. With `include_children`
    /// false only root paths are returned.
    pub fn accessible_categories<P: Principal + ?Sized>(&self, principal: &P, include_children: bool) -> Vec<String> {
        self.grievance_types()
            .iter()
            .filter(|path| include_children || is_root_path(path))
            .filter(|path| self.authorize_category(principal, path))
            .cloned()
            .collect()
    }

    /// Flag names `principal` may use, in flat-list order.
    pub fn accessible_flags<P: Principal + ?Sized>(&self, principal: &P) -> Vec<String> {
        self.grievance_flags()
            .iter()
            .filter(|name| self.authorize_flag(principal, name))
            .cloned()
            .collect()
    }

    /// Accessible flags with their priority and required codes.
    pub fn flag_details<P: Principal + ?Sized>(&self, principal: &P) -> Vec<FlagDetail> {
        self.accessible_flags(principal)
            .into_iter()
            .map(|name| match self.flags.get(&name) {
                Some(node) => FlagDetail {
                    name,
                    priority: node.priority,
                    permissions: node.permissions.clone(),
                },
                None => FlagDetail { name, priority: Priority::default(), permissions: Vec::new() },
            })
            .collect()
    }

    /// Two-level tree of accessible categories: every accessible root with its accessible
    /// direct children. Grandchildren are not expanded.
    pub fn category_hierarchy<P: Principal + ?Sized>(&self, principal: &P) -> Vec<CategoryTreeNode> {
        let mut tree = Vec::new();
        for root in self.categories.roots() {
            let root_path = root.path.joined();
            if !self.authorize_category(principal, &root_path) {
                continue;
            }
            let children = root
                .children
                .iter()
                .filter(|(_, full)| self.authorize_category(principal, full))
                .filter_map(|(short, full)| {
                    let child = self.categories.get(full)?;
                    Some(CategoryTreeChild {
                        name: short.clone(),
                        full_name: full.clone(),
                        priority: child.priority,
                        permissions: child.permissions.clone(),
                        default_flags: child.default_flags.clone(),
                    })
                })
                .collect();
            tree.push(CategoryTreeNode {
                name: root_path,
                priority: root.priority,
                permissions: root.permissions.clone(),
                default_flags: root.default_flags.clone(),
                children,
            });
        }
        tree
    }

    /// Priority and default flags for `path`; Medium and no flags when unknown. Not gated
    /// by access.
    pub fn category_defaults(&self, path: &str) -> CategoryDefaults {
        self.categories
            .get(path)
            .map(|node| CategoryDefaults {
                priority: node.priority,
                default_flags: node.default_flags.clone(),
            })
            .unwrap_or_default()
    }

    /// Highest priority among the category and the given flags, starting from Medium.
    /// Unknown names contribute nothing. Not gated by access.
    pub fn effective_priority<F: FlagNames + ?Sized>(&self, category: Option<&str>, flags: &F) -> Priority {
        let mut max = Priority::default();
        if let Some(node) = category.and_then(|c| self.categories.get(c)) {
            max = max.max(node.priority);
        }
        for flag in flags.flag_names() {
            if let Some(node) = self.flags.get(flag) {
                max = max.max(node.priority);
            }
        }
        max
    }

    /// Resolution time for a category from the unified map, else the global default.
    pub fn resolution_time_for(&self, path: &str) -> &str {
        self.unified_resolution_times
            .get(path)
            .map(String::as_str)
            .unwrap_or(self.global_resolution_time.as_str())
    }

    /// `(category, resolution time)` pairs of the unified map, sorted by category.
    pub fn default_resolutions_by_category(&self) -> Vec<(String, String)> {
        self.unified_resolution_times
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
