/**
 * Comment Tree Reconstruction
 *
 * Turns the flat list of one post's comments back into the two-level form
 * clients render. The depth bound is structural: a [`CommentNode`] holds
 * replies, a [`ReplyNode`] cannot — there is no way to express deeper
 * nesting in the output type.
 *
 * Two passes over the input, no recursion, O(n) for n comments:
 *
 * 1. every root comment becomes a node, positions remembered by id
 * 2. every reply is appended to its root's reply list via the position map
 *
 * A reply whose root is not in the map (the root was deleted, or the id
 * never named a root) is dropped silently; the tree is built from what is
 * present rather than failing the whole listing.
 */

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::comments::db::CommentParent;

/// Flattened comment, the builder's input: index fields joined with the
/// content text.
#[derive(Debug, Clone)]
pub struct FlatComment {
    pub id: i32,
    pub author_id: i32,
    pub creation_time: DateTime<Utc>,
    pub text: String,
    pub parent: CommentParent,
}

/// A reply to a root comment. Carries no children.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyNode {
    pub id: i32,
    pub author_id: i32,
    pub creation_time: DateTime<Utc>,
    pub text: String,
}

/// A root comment with its replies.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentNode {
    pub id: i32,
    pub author_id: i32,
    pub creation_time: DateTime<Utc>,
    pub text: String,
    pub comments: Vec<ReplyNode>,
}

/// Rebuild the two-level tree from one post's flat comment list.
///
/// Roots appear in input order; each root's replies appear in input order.
/// Orphaned replies are dropped.
pub fn build_comment_tree(comments: &[FlatComment]) -> Vec<CommentNode> {
    let mut roots: Vec<CommentNode> = Vec::new();
    let mut root_positions: HashMap<i32, usize> = HashMap::new();

    for comment in comments {
        if let CommentParent::Post(_) = comment.parent {
            root_positions.insert(comment.id, roots.len());
            roots.push(CommentNode {
                id: comment.id,
                author_id: comment.author_id,
                creation_time: comment.creation_time,
                text: comment.text.clone(),
                comments: Vec::new(),
            });
        }
    }

    for comment in comments {
        if let CommentParent::Comment(parent_id) = comment.parent {
            let Some(&position) = root_positions.get(&parent_id) else {
                // Root deleted or never a root: drop the reply.
                continue;
            };
            roots[position].comments.push(ReplyNode {
                id: comment.id,
                author_id: comment.author_id,
                creation_time: comment.creation_time,
                text: comment.text.clone(),
            });
        }
    }

    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(id: i32, post_id: i32) -> FlatComment {
        FlatComment {
            id,
            author_id: 1,
            creation_time: Utc::now(),
            text: format!("root {id}"),
            parent: CommentParent::Post(post_id),
        }
    }

    fn reply(id: i32, parent_id: i32) -> FlatComment {
        FlatComment {
            id,
            author_id: 2,
            creation_time: Utc::now(),
            text: format!("reply {id}"),
            parent: CommentParent::Comment(parent_id),
        }
    }

    #[test]
    fn test_roots_and_replies_in_encounter_order() {
        let flat = vec![root(1, 10), root(2, 10), reply(3, 1), reply(4, 1)];
        let tree = build_comment_tree(&flat);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].id, 1);
        assert_eq!(tree[1].id, 2);
        let reply_ids: Vec<_> = tree[0].comments.iter().map(|r| r.id).collect();
        assert_eq!(reply_ids, vec![3, 4]);
        assert!(tree[1].comments.is_empty());
    }

    #[test]
    fn test_orphan_reply_dropped() {
        let flat = vec![root(1, 10), root(2, 10), reply(3, 1), reply(4, 1), reply(5, 999)];
        let tree = build_comment_tree(&flat);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].comments.len(), 2);
        assert!(tree[1].comments.is_empty());
        assert!(tree
            .iter()
            .all(|node| node.comments.iter().all(|r| r.id != 5)));
    }

    #[test]
    fn test_replies_before_their_root_still_attach() {
        // The input is unordered; the root pass runs first regardless.
        let flat = vec![reply(3, 1), root(1, 10)];
        let tree = build_comment_tree(&flat);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].comments.len(), 1);
        assert_eq!(tree[0].comments[0].id, 3);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_comment_tree(&[]).is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let flat = vec![root(1, 10), reply(2, 1)];
        let tree = build_comment_tree(&flat);
        let json = serde_json::to_value(&tree).unwrap();

        assert_eq!(json[0]["id"], 1);
        assert_eq!(json[0]["comments"][0]["id"], 2);
        // Replies have no nested comment list.
        assert!(json[0]["comments"][0].get("comments").is_none());
    }
}
