//! Business Unit → Product Line → Project and Department → Sub Team → User trees.
//!
//! The two upper levels are built eagerly from flat lists. The deepest level is
//! attached on demand when a node is expanded, either through a [`ChildLoader`]
//! or by handing already-fetched children to [`Hierarchy::attach_children`].

use crate::error::{PlanError, PlanResult};
use crate::model::{BusinessUnit, Department, ProductLine, Project, SubTeam, User};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    BusinessUnit,
    ProductLine,
    Project,
    Department,
    SubTeam,
    User,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::BusinessUnit => "business_unit",
            NodeKind::ProductLine => "product_line",
            NodeKind::Project => "project",
            NodeKind::Department => "department",
            NodeKind::SubTeam => "sub_team",
            NodeKind::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub kind: NodeKind,
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
    /// False until the level below has been fetched.
    pub loaded: bool,
}

impl TreeNode {
    pub fn from_item<T: TreeItem>(item: &T, loaded: bool) -> Self {
        Self {
            kind: T::KIND,
            id: item.id(),
            name: item.name().to_string(),
            code: item.code().map(str::to_string),
            children: Vec::new(),
            loaded,
        }
    }

    /// Case-insensitive match on name or code. `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .code
                .as_deref()
                .is_some_and(|code| code.to_lowercase().contains(needle))
    }

    fn find_mut(&mut self, kind: NodeKind, id: i64) -> Option<&mut TreeNode> {
        if self.kind == kind && self.id == id {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(kind, id))
    }

    fn find(&self, kind: NodeKind, id: i64) -> Option<&TreeNode> {
        if self.kind == kind && self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(kind, id))
    }
}

/// A flat record that can become a tree node.
pub trait TreeItem {
    const KIND: NodeKind;

    fn id(&self) -> i64;
    fn name(&self) -> &str;
    fn code(&self) -> Option<&str>;
    /// Foreign key to the level above; `None` for roots.
    fn parent_id(&self) -> Option<i64>;
}

macro_rules! tree_item {
    ($ty:ty, $kind:expr, root) => {
        impl TreeItem for $ty {
            const KIND: NodeKind = $kind;

            fn id(&self) -> i64 {
                self.id
            }
            fn name(&self) -> &str {
                &self.name
            }
            fn code(&self) -> Option<&str> {
                self.code.as_deref()
            }
            fn parent_id(&self) -> Option<i64> {
                None
            }
        }
    };
    ($ty:ty, $kind:expr, $parent:ident) => {
        impl TreeItem for $ty {
            const KIND: NodeKind = $kind;

            fn id(&self) -> i64 {
                self.id
            }
            fn name(&self) -> &str {
                &self.name
            }
            fn code(&self) -> Option<&str> {
                self.code.as_deref()
            }
            fn parent_id(&self) -> Option<i64> {
                Some(self.$parent)
            }
        }
    };
}

tree_item!(BusinessUnit, NodeKind::BusinessUnit, root);
tree_item!(ProductLine, NodeKind::ProductLine, business_unit_id);
tree_item!(Project, NodeKind::Project, product_line_id);
tree_item!(Department, NodeKind::Department, root);
tree_item!(SubTeam, NodeKind::SubTeam, department_id);
tree_item!(User, NodeKind::User, sub_team_id);

fn sort_nodes(nodes: &mut [TreeNode]) {
    nodes.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
}

/// Converts `items` into sorted nodes, keeping the first occurrence of each id.
fn dedup_nodes<T: TreeItem>(items: &[T], loaded: bool) -> Vec<TreeNode> {
    let mut seen = HashSet::with_capacity(items.len());
    let mut nodes: Vec<TreeNode> = items
        .iter()
        .filter(|item| seen.insert(item.id()))
        .map(|item| TreeNode::from_item(item, loaded))
        .collect();
    sort_nodes(&mut nodes);
    nodes
}

/// Nests `children` under `parents` by foreign key.
///
/// Children whose parent is missing are dropped. `children_loaded` marks
/// whether the child nodes already carry their own level.
pub fn build_tree<P: TreeItem, C: TreeItem>(
    parents: &[P],
    children: &[C],
    children_loaded: bool,
) -> Vec<TreeNode> {
    let mut roots = dedup_nodes(parents, true);
    let slots: HashMap<i64, usize> = roots
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id, idx))
        .collect();

    let mut seen = HashSet::with_capacity(children.len());
    let mut orphans = 0usize;
    for child in children {
        if !seen.insert(child.id()) {
            continue;
        }
        match child.parent_id().and_then(|pid| slots.get(&pid)) {
            Some(&slot) => roots[slot]
                .children
                .push(TreeNode::from_item(child, children_loaded)),
            None => orphans += 1,
        }
    }
    for root in &mut roots {
        sort_nodes(&mut root.children);
    }

    if orphans > 0 {
        debug!(
            orphans,
            kind = C::KIND.as_str(),
            "dropped children without a parent"
        );
    }
    roots
}

/// Keeps nodes that match `term` or have a matching descendant.
///
/// A matching node keeps its whole subtree. Blank terms return the tree unchanged.
pub fn filter_tree(nodes: &[TreeNode], term: &str) -> Vec<TreeNode> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return nodes.to_vec();
    }
    filter_nodes(nodes, &needle)
}

fn filter_nodes(nodes: &[TreeNode], needle: &str) -> Vec<TreeNode> {
    nodes
        .iter()
        .filter_map(|node| {
            if node.matches(needle) {
                return Some(node.clone());
            }
            let children = filter_nodes(&node.children, needle);
            if children.is_empty() {
                None
            } else {
                Some(TreeNode {
                    children,
                    ..node.clone()
                })
            }
        })
        .collect()
}

/// UI expansion state. Independent of the data; survives rebuilds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionState {
    expanded: HashSet<(NodeKind, i64)>,
}

impl ExpansionState {
    pub fn expand(&mut self, kind: NodeKind, id: i64) {
        self.expanded.insert((kind, id));
    }

    pub fn collapse(&mut self, kind: NodeKind, id: i64) {
        self.expanded.remove(&(kind, id));
    }

    pub fn is_expanded(&self, kind: NodeKind, id: i64) -> bool {
        self.expanded.contains(&(kind, id))
    }
}

/// Fetches the deepest level for one node.
pub trait ChildLoader {
    fn load_children(&self, parent: &TreeNode) -> PlanResult<Vec<TreeNode>>;
}

/// Serves the lazy level from lists already held in memory.
pub struct InMemoryLoader<'a> {
    pub projects: &'a [Project],
    pub users: &'a [User],
}

impl ChildLoader for InMemoryLoader<'_> {
    fn load_children(&self, parent: &TreeNode) -> PlanResult<Vec<TreeNode>> {
        let nodes = match parent.kind {
            NodeKind::ProductLine => children_of(self.projects, parent.id),
            NodeKind::SubTeam => children_of(self.users, parent.id),
            other => {
                return Err(PlanError::InvalidData(format!(
                    "{} nodes have no lazily loaded children",
                    other.as_str()
                )));
            }
        };
        Ok(nodes)
    }
}

fn children_of<T: TreeItem>(items: &[T], parent_id: i64) -> Vec<TreeNode> {
    let matching: Vec<&T> = items
        .iter()
        .filter(|item| item.parent_id() == Some(parent_id))
        .collect();
    let mut seen = HashSet::with_capacity(matching.len());
    let mut nodes: Vec<TreeNode> = matching
        .into_iter()
        .filter(|item| seen.insert(item.id()))
        .map(|item| TreeNode::from_item(item, true))
        .collect();
    sort_nodes(&mut nodes);
    nodes
}

/// One line of the flattened, expansion-aware view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleRow {
    pub depth: usize,
    pub kind: NodeKind,
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
    pub expanded: bool,
}

impl VisibleRow {
    /// Indented `name [code]` with a marker for expanded nodes.
    pub fn display_line(&self) -> String {
        let marker = if self.expanded { "-" } else { "+" };
        let mut line = format!("{}{} {}", "  ".repeat(self.depth), marker, self.name);
        if let Some(code) = &self.code {
            line.push_str(&format!(" [{code}]"));
        }
        line.push_str(&format!(" ({} {})", self.kind.as_str(), self.id));
        line
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hierarchy {
    roots: Vec<TreeNode>,
    #[serde(skip)]
    expansion: ExpansionState,
}

impl Hierarchy {
    pub fn from_roots(roots: Vec<TreeNode>) -> Self {
        Self {
            roots,
            expansion: ExpansionState::default(),
        }
    }

    /// Business units with their product lines; projects load on expansion.
    pub fn projects(units: &[BusinessUnit], lines: &[ProductLine]) -> Self {
        Self::from_roots(build_tree(units, lines, false))
    }

    /// Departments with their sub teams; users load on expansion.
    pub fn organization(departments: &[Department], teams: &[SubTeam]) -> Self {
        Self::from_roots(build_tree(departments, teams, false))
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn find(&self, kind: NodeKind, id: i64) -> Option<&TreeNode> {
        self.roots.iter().find_map(|root| root.find(kind, id))
    }

    fn find_mut(&mut self, kind: NodeKind, id: i64) -> Option<&mut TreeNode> {
        self.roots
            .iter_mut()
            .find_map(|root| root.find_mut(kind, id))
    }

    /// Installs fetched children under a node and marks it loaded.
    ///
    /// Ids already present anywhere in the tree are skipped.
    pub fn attach_children(
        &mut self,
        kind: NodeKind,
        id: i64,
        children: Vec<TreeNode>,
    ) -> PlanResult<()> {
        let existing: HashSet<(NodeKind, i64)> = self.all_keys();
        let node = self.find_mut(kind, id).ok_or_else(|| {
            PlanError::InvalidData(format!("{} {id} not found", kind.as_str()))
        })?;
        for child in children {
            if existing.contains(&(child.kind, child.id))
                || node
                    .children
                    .iter()
                    .any(|c| c.kind == child.kind && c.id == child.id)
            {
                continue;
            }
            node.children.push(child);
        }
        sort_nodes(&mut node.children);
        node.loaded = true;
        Ok(())
    }

    /// Expands a node, fetching its children through `loader` the first time.
    pub fn expand(&mut self, kind: NodeKind, id: i64, loader: &dyn ChildLoader) -> PlanResult<()> {
        let node = self.find(kind, id).ok_or_else(|| {
            PlanError::InvalidData(format!("{} {id} not found", kind.as_str()))
        })?;
        if !node.loaded {
            let children = loader.load_children(node)?;
            debug!(
                kind = kind.as_str(),
                id,
                children = children.len(),
                "loaded lazy tree level"
            );
            self.attach_children(kind, id, children)?;
        }
        self.expansion.expand(kind, id);
        Ok(())
    }

    pub fn collapse(&mut self, kind: NodeKind, id: i64) {
        self.expansion.collapse(kind, id);
    }

    pub fn filtered(&self, term: &str) -> Vec<TreeNode> {
        filter_tree(&self.roots, term)
    }

    /// Depth-first rows, descending only into expanded nodes.
    ///
    /// With a non-blank `term` the filtered tree is shown fully expanded.
    pub fn visible_rows(&self, term: &str) -> Vec<VisibleRow> {
        let searching = !term.trim().is_empty();
        let nodes = self.filtered(term);
        let mut rows = Vec::new();
        self.push_rows(&nodes, 0, searching, &mut rows);
        rows
    }

    fn push_rows(
        &self,
        nodes: &[TreeNode],
        depth: usize,
        show_all: bool,
        rows: &mut Vec<VisibleRow>,
    ) {
        for node in nodes {
            let expanded = show_all || self.expansion.is_expanded(node.kind, node.id);
            rows.push(VisibleRow {
                depth,
                kind: node.kind,
                id: node.id,
                name: node.name.clone(),
                code: node.code.clone(),
                expanded,
            });
            if expanded {
                self.push_rows(&node.children, depth + 1, show_all, rows);
            }
        }
    }

    fn all_keys(&self) -> HashSet<(NodeKind, i64)> {
        fn walk(nodes: &[TreeNode], keys: &mut HashSet<(NodeKind, i64)>) {
            for node in nodes {
                keys.insert((node.kind, node.id));
                walk(&node.children, keys);
            }
        }
        let mut keys = HashSet::new();
        walk(&self.roots, &mut keys);
        keys
    }
}
