//! Nested heading outline.
//!
//! The flat heading list is nested by level: each heading becomes a child of
//! the closest preceding heading with a lower level. Skipped levels (`##`
//! followed by `####`) nest directly.

use indextree::{Arena, NodeEdge, NodeId};
use serde::{Deserialize, Serialize};

use super::headings::Heading;

/// A heading with its sub-headings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    #[serde(flatten)]
    pub heading: Heading,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    fn leaf(heading: Heading) -> Self {
        Self {
            heading,
            children: Vec::new(),
        }
    }

    /// Render this node and its children with box-drawing connectors.
    pub fn render_box_tree(&self, prefix: &str, is_last: bool) -> String {
        let connector = if is_last { "└── " } else { "├── " };
        let mut out = format!(
            "{}{}{} {}\n",
            prefix,
            connector,
            "#".repeat(self.heading.level),
            self.heading.text
        );

        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
        for (i, child) in self.children.iter().enumerate() {
            let last = i == self.children.len() - 1;
            out.push_str(&child.render_box_tree(&child_prefix, last));
        }
        out
    }

    /// Number of headings in this subtree, this one included.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(OutlineNode::size).sum::<usize>()
    }
}

/// Nest a flat heading list into an outline forest.
///
/// # Examples
///
/// ```
/// use dsqr_content::parser::{build_outline, extract_headings};
///
/// let outline = build_outline(&extract_headings("## A\n### A.1\n## B"));
/// assert_eq!(outline.len(), 2);
/// assert_eq!(outline[0].children[0].heading.text, "A.1");
/// ```
pub fn build_outline(headings: &[Heading]) -> Vec<OutlineNode> {
    let mut arena: Arena<&Heading> = Arena::with_capacity(headings.len());
    let mut roots: Vec<NodeId> = Vec::new();
    let mut open: Vec<(usize, NodeId)> = Vec::new();

    for heading in headings {
        while open
            .last()
            .is_some_and(|(level, _)| *level >= heading.level)
        {
            open.pop();
        }

        let node = arena.new_node(heading);
        match open.last() {
            Some((_, parent)) => parent.append(node, &mut arena),
            None => roots.push(node),
        }
        open.push((heading.level, node));
    }

    roots
        .into_iter()
        .filter_map(|root| collect_subtree(root, &arena))
        .collect()
}

fn collect_subtree(root: NodeId, arena: &Arena<&Heading>) -> Option<OutlineNode> {
    let mut stack: Vec<OutlineNode> = Vec::new();

    for edge in root.traverse(arena) {
        match edge {
            NodeEdge::Start(id) => {
                let heading = *arena.get(id)?.get();
                stack.push(OutlineNode::leaf(heading.clone()));
            }
            NodeEdge::End(_) => {
                let done = stack.pop()?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(done),
                    None => return Some(done),
                }
            }
        }
    }

    None
}
