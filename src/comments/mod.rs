//! Comment threads.
//!
//! Rows come out of storage flat. [`filter_for_post`] reproduces the storage
//! query (one post, active only, newest first), [`build_tree`] nests replies
//! under their parents, and the count helpers back the "N comments" badges.

mod model;
pub mod tree;

pub use model::{Comment, CommentNode};
pub use tree::{
    MAX_INDENT_DEPTH, OrphanPolicy, build_tree, build_tree_with, tree_size, write_json,
};

use indexmap::IndexMap;

/// Number of active comments, replies included.
///
/// # Examples
///
/// ```
/// # use chrono::Utc;
/// # use dsqr_content::comments::{Comment, count_active};
/// # let row = |id: &str, active: bool| Comment {
/// #     id: id.into(), post_id: "p".into(), user_id: "u".into(),
/// #     parent_comment_id: None, content: String::new(), is_active: active,
/// #     created_at: Utc::now(), updated_at: None, user_name: None, user_image: None,
/// # };
/// let rows = [row("a", true), row("b", false), row("c", true)];
/// assert_eq!(count_active(&rows), 2);
/// ```
pub fn count_active(flat: &[Comment]) -> usize {
    flat.iter().filter(|c| c.is_active).count()
}

/// Active comments of one post, newest first.
///
/// The sort is stable, so rows sharing a timestamp keep their input order.
pub fn filter_for_post(rows: &[Comment], post_id: &str) -> Vec<Comment> {
    let mut selected: Vec<Comment> = rows
        .iter()
        .filter(|c| c.is_active && c.post_id == post_id)
        .cloned()
        .collect();
    selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    selected
}

/// Rows that may enter a reply tree.
///
/// With a post id this is [`filter_for_post`]. Without one the rows are taken
/// as already scoped and ordered, and only inactive rows are removed.
pub fn working_set(rows: &[Comment], post_id: Option<&str>) -> Vec<Comment> {
    match post_id {
        Some(post_id) => filter_for_post(rows, post_id),
        None => rows.iter().filter(|c| c.is_active).cloned().collect(),
    }
}

/// Active comment count per post, in the order posts first appear.
///
/// Posts whose comments are all inactive are listed with zero.
pub fn count_by_post(rows: &[Comment]) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for comment in rows {
        let count = counts.entry(comment.post_id.clone()).or_insert(0);
        if comment.is_active {
            *count += 1;
        }
    }
    counts
}
