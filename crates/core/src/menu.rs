//! Menu tree input model.
//!
//! The menu is owned by a flat arena ([`MenuTree`]); nodes refer to their
//! parent and children by [`NodeId`]. The tree is read-only for the route
//! builder.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{PageId, StringMap};

/// Index of a node inside its [`MenuTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Attributes attached to a menu node by the producers of the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeAttributes {
    /// The node is backed by a CMS page (its `id` is the page id).
    #[serde(default)]
    pub is_page: bool,
    /// Only authenticated visitors get this route.
    #[serde(default)]
    pub login_required: bool,
    /// Detail-style node that is nested under its parent's route.
    #[serde(default)]
    pub nest_route: bool,
    /// Sibling pages sharing this pattern collapse into one dynamic route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_route_path_pattern: Option<String>,
    /// Explicit path for a named route, replacing `{parent}{pattern}/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_route_path: Option<String>,
    /// Relative dynamic segment of a nested route (e.g. `:slug`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(default, skip_serializing_if = "StringMap::is_empty")]
    pub url_params: StringMap,
    /// Let the frontend cache fetched responses for this route.
    #[serde(default = "default_use_cache")]
    pub use_cache: bool,
    /// Template override for page nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Reverse-lookup id exposed as `meta.id` on app-model routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_id: Option<String>,
    /// Keys no producer in this crate knows about.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

fn default_use_cache() -> bool {
    true
}

impl Default for NodeAttributes {
    fn default() -> Self {
        Self {
            is_page: false,
            login_required: false,
            nest_route: false,
            named_route_path_pattern: None,
            named_route_path: None,
            path_pattern: None,
            component: None,
            router_name: None,
            fetch_url: None,
            redirect_url: None,
            url_params: StringMap::new(),
            use_cache: true,
            template: None,
            meta_id: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// One entry of the menu.
#[derive(Debug, Clone)]
pub struct MenuNode {
    /// Page id; only set for page-backed nodes.
    pub id: Option<PageId>,
    /// Resolved absolute URL of the node.
    pub url: String,
    /// The node matches the current request path.
    pub selected: bool,
    pub attributes: NodeAttributes,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl MenuNode {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: None,
            url: url.into(),
            selected: false,
            attributes: NodeAttributes::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// A node backed by the CMS page `id`.
    pub fn page(id: PageId, url: impl Into<String>) -> Self {
        let mut node = Self::new(url);
        node.id = Some(id);
        node.attributes.is_page = true;
        node
    }

    pub fn with_attributes(mut self, attributes: NodeAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Nested, serde-friendly form of a menu node, flattened by
/// [`MenuTree::from_specs`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuNodeSpec {
    #[serde(default)]
    pub id: Option<PageId>,
    pub url: String,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub attributes: NodeAttributes,
    #[serde(default)]
    pub children: Vec<MenuNodeSpec>,
}

/// Arena-backed menu tree.
#[derive(Debug, Clone, Default)]
pub struct MenuTree {
    nodes: Vec<MenuNode>,
    roots: Vec<NodeId>,
}

impl MenuTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten nested specs into an arena, keeping sibling order.
    pub fn from_specs(specs: Vec<MenuNodeSpec>) -> Self {
        let mut tree = Self::new();
        for spec in specs {
            tree.insert_spec(None, spec);
        }
        tree
    }

    fn insert_spec(&mut self, parent: Option<NodeId>, spec: MenuNodeSpec) {
        let mut node = MenuNode::new(spec.url).with_attributes(spec.attributes);
        node.id = spec.id;
        node.selected = spec.selected;
        let id = self.insert(parent, node);
        for child in spec.children {
            self.insert_spec(Some(id), child);
        }
    }

    /// Append a top-level node.
    pub fn push_root(&mut self, node: MenuNode) -> NodeId {
        self.insert(None, node)
    }

    /// Append `node` as the last child of `parent`.
    pub fn push_child(&mut self, parent: NodeId, node: MenuNode) -> NodeId {
        self.insert(Some(parent), node)
    }

    fn insert(&mut self, parent: Option<NodeId>, mut node: MenuNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = parent;
        node.children.clear();
        self.nodes.push(node);
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&MenuNode> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut MenuNode> {
        self.nodes.get_mut(id.0)
    }

    /// The parent node of `id`, if any.
    pub fn parent_of(&self, id: NodeId) -> Option<&MenuNode> {
        self.get(id).and_then(|n| n.parent).and_then(|p| self.get(p))
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids, parents before their children, siblings in order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    /// Mark the node whose URL equals `path` as selected and clear the flag
    /// everywhere else. Returns the selected node, if any.
    pub fn select_path(&mut self, path: &str) -> Option<NodeId> {
        let mut selected = None;
        for (index, node) in self.nodes.iter_mut().enumerate() {
            node.selected = selected.is_none() && node.url == path;
            if node.selected {
                selected = Some(NodeId(index));
            }
        }
        selected
    }
}

impl std::ops::Index<NodeId> for MenuTree {
    type Output = MenuNode;

    fn index(&self, id: NodeId) -> &MenuNode {
        &self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(url: &str, children: Vec<MenuNodeSpec>) -> MenuNodeSpec {
        MenuNodeSpec {
            url: url.to_string(),
            children,
            ..Default::default()
        }
    }

    fn urls(tree: &MenuTree, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|id| tree[*id].url.clone()).collect()
    }

    #[test]
    fn preorder_visits_parents_first() {
        let tree = MenuTree::from_specs(vec![
            spec("/a/", vec![spec("/a/1/", vec![]), spec("/a/2/", vec![])]),
            spec("/b/", vec![spec("/b/1/", vec![])]),
        ]);

        assert_eq!(
            urls(&tree, &tree.preorder()),
            ["/a/", "/a/1/", "/a/2/", "/b/", "/b/1/"]
        );
        assert_eq!(urls(&tree, tree.roots()), ["/a/", "/b/"]);
    }

    #[test]
    fn parent_links_are_kept() {
        let mut tree = MenuTree::new();
        let root = tree.push_root(MenuNode::new("/en/"));
        let child = tree.push_child(root, MenuNode::new("/en/news/"));

        assert_eq!(tree.parent_of(child).map(|n| n.url.as_str()), Some("/en/"));
        assert!(tree.parent_of(root).is_none());
        assert_eq!(tree[root].children(), [child]);
    }

    #[test]
    fn select_path_marks_single_node() {
        let mut tree = MenuTree::from_specs(vec![spec("/a/", vec![spec("/a/1/", vec![])])]);
        let selected = tree.select_path("/a/1/").unwrap();

        assert!(tree[selected].selected);
        assert_eq!(tree.preorder().iter().filter(|id| tree[**id].selected).count(), 1);
        assert!(tree.select_path("/missing/").is_none());
        assert!(tree.preorder().iter().all(|id| !tree[*id].selected));
    }

    #[test]
    fn attributes_keep_unknown_keys() {
        let attrs: NodeAttributes = serde_json::from_value(serde_json::json!({
            "is_page": true,
            "color": "red"
        }))
        .unwrap();

        assert!(attrs.is_page);
        assert!(attrs.use_cache);
        assert_eq!(attrs.extra["color"], "red");
    }
}
