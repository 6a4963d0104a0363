//! Reply tree reconstruction.
//!
//! Rows arrive flat, newest first, each optionally naming a parent. The
//! builder links them in an arena and then materialises nested
//! [`CommentNode`]s without recursion, so reply chains of any depth are fine.

use indextree::{Arena, NodeEdge, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io;
use unicode_width::UnicodeWidthChar;

use super::model::{Comment, CommentNode};

/// What to do with a comment whose parent is not in the working set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Leave it out of the tree entirely
    #[default]
    Drop,
    /// Emit it as a top-level node marked `orphaned`
    Promote,
}

/// Build the reply tree, dropping comments whose parent is missing.
///
/// Expects rows for a single post, active only, newest first. Sibling order
/// follows input order.
///
/// # Examples
///
/// ```
/// # use chrono::Utc;
/// # use dsqr_content::comments::{Comment, build_tree};
/// # fn row(id: &str, parent: Option<&str>) -> Comment {
/// #     Comment {
/// #         id: id.into(), post_id: "p".into(), user_id: "u".into(),
/// #         parent_comment_id: parent.map(Into::into), content: String::new(),
/// #         is_active: true, created_at: Utc::now(), updated_at: None,
/// #         user_name: None, user_image: None,
/// #     }
/// # }
/// let tree = build_tree(&[row("a", None), row("b", Some("a")), row("c", Some("b"))]);
/// assert_eq!(tree.len(), 1);
/// assert_eq!(tree[0].replies[0].comment.id, "b");
/// assert_eq!(tree[0].replies[0].replies[0].comment.id, "c");
/// ```
pub fn build_tree(flat: &[Comment]) -> Vec<CommentNode> {
    build_tree_with(flat, OrphanPolicy::Drop)
}

/// Build the reply tree with an explicit orphan policy.
pub fn build_tree_with(flat: &[Comment], policy: OrphanPolicy) -> Vec<CommentNode> {
    let mut arena: Arena<usize> = Arena::with_capacity(flat.len());
    let mut by_id: HashMap<&str, NodeId> = HashMap::with_capacity(flat.len());
    let mut nodes: Vec<Option<NodeId>> = Vec::with_capacity(flat.len());

    for (index, comment) in flat.iter().enumerate() {
        if by_id.contains_key(comment.id.as_str()) {
            tracing::warn!(id = %comment.id, "duplicate comment id, keeping first row");
            nodes.push(None);
            continue;
        }
        let node = arena.new_node(index);
        by_id.insert(comment.id.as_str(), node);
        nodes.push(Some(node));
    }

    let mut roots: Vec<(NodeId, bool)> = Vec::new();

    for (comment, node) in flat.iter().zip(&nodes) {
        let Some(node) = *node else { continue };

        let Some(parent_id) = comment.parent_comment_id.as_deref() else {
            roots.push((node, false));
            continue;
        };

        match by_id.get(parent_id) {
            Some(&parent) => {
                // Self-references and cycles cannot be attached
                if let Err(err) = parent.checked_append(node, &mut arena) {
                    tracing::debug!(id = %comment.id, parent = parent_id, %err, "unattachable reply dropped");
                }
            }
            None => match policy {
                OrphanPolicy::Drop => {
                    tracing::debug!(id = %comment.id, parent = parent_id, "orphaned reply dropped");
                }
                OrphanPolicy::Promote => roots.push((node, true)),
            },
        }
    }

    roots
        .into_iter()
        .filter_map(|(root, orphaned)| {
            let mut node = materialize(root, &arena, flat)?;
            node.orphaned = orphaned;
            Some(node)
        })
        .collect()
}

fn materialize(root: NodeId, arena: &Arena<usize>, flat: &[Comment]) -> Option<CommentNode> {
    let mut stack: Vec<CommentNode> = Vec::new();

    for edge in root.traverse(arena) {
        match edge {
            NodeEdge::Start(id) => {
                let index = *arena.get(id)?.get();
                stack.push(CommentNode::leaf(flat.get(index)?.clone()));
            }
            NodeEdge::End(_) => {
                let done = stack.pop()?;
                match stack.last_mut() {
                    Some(parent) => parent.replies.push(done),
                    None => return Some(done),
                }
            }
        }
    }

    None
}

/// Total number of nodes in a forest, replies included.
pub fn tree_size(nodes: &[CommentNode]) -> usize {
    let mut pending: Vec<&CommentNode> = nodes.iter().collect();
    let mut count = 0;
    while let Some(node) = pending.pop() {
        count += 1;
        pending.extend(&node.replies);
    }
    count
}

/// Indentation stops growing at this depth. Deeper replies are drawn at this
/// level with their depth in brackets.
pub const MAX_INDENT_DEPTH: usize = 32;

impl CommentNode {
    /// Render this thread with box-drawing connectors, one line per comment.
    ///
    /// Comment bodies are flattened to one line and cut to `width` display
    /// columns.
    pub fn render_box_tree(&self, prefix: &str, is_last: bool, width: usize) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_box_tree(&mut out, prefix, is_last, width);
        out
    }

    /// Like [`render_box_tree`](Self::render_box_tree), writing into `out`.
    ///
    /// Walks the thread with an explicit stack, so reply depth only costs
    /// heap, and line length is bounded by [`MAX_INDENT_DEPTH`].
    pub fn write_box_tree<W: fmt::Write>(
        &self,
        out: &mut W,
        prefix: &str,
        is_last: bool,
        width: usize,
    ) -> fmt::Result {
        let mut pending: Vec<(&CommentNode, usize, bool)> = vec![(self, 0, is_last)];
        // One continuation rail per ancestor of the node being drawn
        let mut rails: Vec<&'static str> = Vec::new();

        while let Some((node, depth, last)) = pending.pop() {
            rails.truncate(depth);

            out.write_str(prefix)?;
            for rail in rails.iter().take(MAX_INDENT_DEPTH) {
                out.write_str(rail)?;
            }
            out.write_str(if last { "└── " } else { "├── " })?;
            if depth > MAX_INDENT_DEPTH {
                write!(out, "[{}] ", depth)?;
            }
            writeln!(
                out,
                "{} · {}{}: {}",
                node.comment.author(),
                node.comment.created_at.format("%Y-%m-%d %H:%M"),
                if node.orphaned { " (orphaned)" } else { "" },
                preview(&node.comment.content, width)
            )?;

            rails.push(if last { "    " } else { "│   " });
            let count = node.replies.len();
            pending.extend(
                node.replies
                    .iter()
                    .enumerate()
                    .rev()
                    .map(|(i, reply)| (reply, depth + 1, i + 1 == count)),
            );
        }
        Ok(())
    }
}

/// Write a forest as compact JSON, identical to `serde_json::to_writer`.
///
/// serde's derived serializer recurses once per reply level; this walks the
/// forest with an explicit stack instead, so any depth `build_tree` accepts
/// can be written.
pub fn write_json<W: io::Write>(nodes: &[CommentNode], out: &mut W) -> serde_json::Result<()> {
    enum Step<'a> {
        Open(&'a CommentNode),
        Close(&'a CommentNode),
        Comma,
    }

    fn push_siblings<'a>(pending: &mut Vec<Step<'a>>, nodes: &'a [CommentNode]) {
        for (i, node) in nodes.iter().enumerate().rev() {
            pending.push(Step::Open(node));
            if i > 0 {
                pending.push(Step::Comma);
            }
        }
    }

    let mut pending: Vec<Step> = Vec::new();
    push_siblings(&mut pending, nodes);

    out.write_all(b"[").map_err(serde_json::Error::io)?;
    while let Some(step) = pending.pop() {
        match step {
            Step::Open(node) => {
                let object = serde_json::to_vec(&node.comment)?;
                // Reopen the comment object to append the flattened node fields
                let fields = object.strip_suffix(b"}").unwrap_or(object.as_slice());
                out.write_all(fields).map_err(serde_json::Error::io)?;
                out.write_all(b",\"replies\":[").map_err(serde_json::Error::io)?;
                pending.push(Step::Close(node));
                push_siblings(&mut pending, &node.replies);
            }
            Step::Close(node) => {
                let tail: &[u8] = if node.orphaned {
                    b"],\"orphaned\":true}"
                } else {
                    b"]}"
                };
                out.write_all(tail).map_err(serde_json::Error::io)?;
            }
            Step::Comma => out.write_all(b",").map_err(serde_json::Error::io)?,
        }
    }
    out.write_all(b"]").map_err(serde_json::Error::io)
}

/// First line-equivalent of a comment, truncated to `width` columns.
fn preview(content: &str, width: usize) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::new();
    let mut used = 0;

    for ch in flat.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            out.push('…');
            return out;
        }
        used += w;
        out.push(ch);
    }
    out
}
