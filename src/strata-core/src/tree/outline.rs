//! Text outline of a tree, for logs and debugging.

use common_display::{DisplayTree, TreeNode as DisplayNode, truncate_string};

use super::Tree;
use crate::attributes::HasAttributes;
use crate::identifiers::NodeId;

const MAX_DETAIL_CHARS: usize = 40;

struct OutlineEntry {
    label: String,
    details: Option<String>,
    children: Vec<OutlineEntry>,
}

impl DisplayNode for OutlineEntry {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn children(&self) -> Vec<&dyn DisplayNode> {
        self.children.iter().map(|c| c as &dyn DisplayNode).collect()
    }

    fn details(&self) -> Option<String> {
        self.details.clone()
    }
}

impl Tree {
    /// Render the tree as an indented outline.
    ///
    /// A named tree starts with its name on a line of its own. Each node line
    /// shows the node's name (or `#id` when unnamed) followed by its long name
    /// in parentheses. An unnamed empty tree renders as `(tree)`.
    pub fn render_outline(&self) -> String {
        let root = self.root_node_id().and_then(|root| self.outline_entry(root));
        match (self.name(), root) {
            (Some(name), Some(root)) => format!("{name}\n{}", DisplayTree::new(&root)),
            (None, Some(root)) => DisplayTree::new(&root).to_string(),
            (name, None) => format!("{}\n", name.unwrap_or("(tree)")),
        }
    }

    fn outline_entry(&self, id: NodeId) -> Option<OutlineEntry> {
        let node = self.node(id).ok()?;
        let label = node
            .name()
            .map_or_else(|| format!("#{id}"), str::to_string);
        let details = node
            .attributes()
            .get_str(crate::attributes::keys::LONG_NAME)
            .map(|long| truncate_string(long, MAX_DETAIL_CHARS));
        let children = node
            .children()
            .filter_map(|child| self.outline_entry(child))
            .collect();

        Some(OutlineEntry {
            label,
            details,
            children,
        })
    }
}
