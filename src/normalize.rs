//! Config normalizer: flattens the nested category tree and the flag list into lookup
//! tables with inheritance already applied.
//!
//! Inheritance is resolved here, once, at load time. A child that does not state a
//! priority, permission list, default flag list or resolution time takes its parent's
//! resolved value; a bare-name child inherits all of them. Evaluators only ever look at the
//! node itself.

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::config::{CategoryEntry, CategoryInput, FlagInput, PermissionCode};
use crate::constants::PATH_SEPARATOR;
use crate::path::CategoryPath;
use crate::priority::Priority;

/// Resolved category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryNode {
    #[serde(skip)]
    pub path: CategoryPath,
    pub priority: Priority,
    /// Any one of these codes grants access. Empty means unrestricted.
    pub permissions: Vec<String>,
    pub default_flags: Vec<String>,
    /// Raw `"{days},{hours}"` value, inherited but never defaulted.
    pub resolution_times: Option<String>,
    /// Joined path of the immediate ancestor; `None` for roots.
    pub parent: Option<String>,
    /// Child short name -> child joined path, in input order.
    pub children: Vec<(String, String)>,
}

impl CategoryNode {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Joined path of the direct child called `short_name`.
    pub fn child(&self, short_name: &str) -> Option<&str> {
        self.children
            .iter()
            .find(|(name, _)| name == short_name)
            .map(|(_, path)| path.as_str())
    }
}

/// Resolved flag. Flags live in a flat namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagNode {
    pub name: String,
    pub priority: Priority,
    pub permissions: Vec<String>,
}

/// Category lookup table plus the flat pre-order list of every full path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTable {
    nodes: HashMap<String, CategoryNode>,
    order: Vec<String>,
}

impl CategoryTable {
    pub fn get(&self, path: &str) -> Option<&CategoryNode> {
        self.nodes.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    /// Every full path: each parent immediately followed by its descendants, siblings in
    /// input order.
    pub fn paths(&self) -> &[String] {
        &self.order
    }

    /// Nodes in flat-list order.
    pub fn iter(&self) -> impl Iterator<Item = &CategoryNode> {
        self.order.iter().filter_map(|p| self.nodes.get(p))
    }

    pub fn roots(&self) -> impl Iterator<Item = &CategoryNode> {
        self.iter().filter(|n| n.is_root())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Flag lookup table plus the flat list of names in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagTable {
    nodes: HashMap<String, FlagNode>,
    order: Vec<String>,
}

impl FlagTable {
    pub fn get(&self, name: &str) -> Option<&FlagNode> {
        self.nodes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlagNode> {
        self.order.iter().filter_map(|n| self.nodes.get(n))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Attributes a child inherits from its parent.
struct Inherited<'a> {
    path: &'a CategoryPath,
    priority: Priority,
    permissions: &'a [String],
    default_flags: &'a [String],
    resolution_times: Option<&'a str>,
}

fn codes(list: &[PermissionCode]) -> Vec<String> {
    list.iter().cloned().map(PermissionCode::into_code).collect()
}

fn resolve_priority(own: Option<&str>, inherited: Priority, at: &str) -> Priority {
    match own {
        None => inherited,
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!(category = at, "{}; using {}", e, inherited);
            inherited
        }),
    }
}

/// Flatten `grievance_types` into a [`CategoryTable`].
pub fn normalize_categories(inputs: &[CategoryInput]) -> CategoryTable {
    let mut table = CategoryTable::default();
    for input in inputs {
        visit(&mut table, input, None);
    }
    table
}

/// Process one entry and its subtree. Returns the short name and full path recorded, or
/// `None` when the entry was skipped.
fn visit(table: &mut CategoryTable, input: &CategoryInput, parent: Option<&Inherited>) -> Option<(String, String)> {
    let empty = CategoryEntry::default();
    let (name, entry) = match input {
        CategoryInput::Name(name) => (name.as_str(), &empty),
        CategoryInput::Node(entry) => match entry.name.as_deref() {
            Some(name) => (name, entry),
            None => {
                warn!(
                    parent = %parent.map(|p| p.path.joined()).unwrap_or_default(),
                    "skipping category entry without a name"
                );
                return None;
            }
        },
    };
    if name.contains(PATH_SEPARATOR) {
        warn!(category = name, "category name contains the path separator; lookups may be ambiguous");
    }

    let path = match parent {
        Some(p) => p.path.child(name),
        None => CategoryPath::root(name),
    };
    let full = path.joined();

    let priority = resolve_priority(
        entry.priority.as_deref(),
        parent.map(|p| p.priority).unwrap_or_default(),
        &full,
    );
    let permissions = match &entry.permissions {
        Some(own) => codes(own),
        None => parent.map(|p| p.permissions.to_vec()).unwrap_or_default(),
    };
    let default_flags = match &entry.default_flags {
        Some(own) => own.clone(),
        None => parent.map(|p| p.default_flags.to_vec()).unwrap_or_default(),
    };
    let resolution_times = match entry.resolution_times.as_deref() {
        Some(own) if !own.is_empty() => Some(own.to_string()),
        _ => parent.and_then(|p| p.resolution_times).map(str::to_string),
    };

    let node = CategoryNode {
        path: path.clone(),
        priority,
        permissions,
        default_flags,
        resolution_times,
        parent: parent.map(|p| p.path.joined()),
        children: Vec::new(),
    };
    match table.nodes.get_mut(&full) {
        Some(existing) => {
            warn!(category = %full, "duplicate category; later entry wins");
            let children = std::mem::take(&mut existing.children);
            *existing = CategoryNode { children, ..node.clone() };
        }
        None => {
            table.nodes.insert(full.clone(), node.clone());
            table.order.push(full.clone());
        }
    }

    if !entry.children.is_empty() {
        let ctx = Inherited {
            path: &path,
            priority: node.priority,
            permissions: &node.permissions,
            default_flags: &node.default_flags,
            resolution_times: node.resolution_times.as_deref(),
        };
        let mut links = Vec::new();
        for child in &entry.children {
            if let Some(link) = visit(table, child, Some(&ctx)) {
                links.push(link);
            }
        }
        if let Some(me) = table.nodes.get_mut(&full) {
            for (short, child_path) in links {
                if me.child(&short).is_none() {
                    me.children.push((short, child_path));
                }
            }
        }
    }

    Some((name.to_string(), full))
}

/// Flatten `grievance_flags` into a [`FlagTable`].
pub fn normalize_flags(inputs: &[FlagInput]) -> FlagTable {
    let mut table = FlagTable::default();
    for input in inputs {
        let node = match input {
            FlagInput::Name(name) => FlagNode {
                name: name.clone(),
                priority: Priority::default(),
                permissions: Vec::new(),
            },
            FlagInput::Node(entry) => {
                let Some(name) = entry.name.clone() else {
                    warn!("skipping flag entry without a name");
                    continue;
                };
                FlagNode {
                    priority: resolve_priority(entry.priority.as_deref(), Priority::default(), &name),
                    permissions: entry.permissions.as_deref().map(codes).unwrap_or_default(),
                    name,
                }
            }
        };
        if table.nodes.contains_key(&node.name) {
            warn!(flag = %node.name, "duplicate flag; later entry wins");
        } else {
            table.order.push(node.name.clone());
        }
        table.nodes.insert(node.name.clone(), node);
    }
    table
}
