//! Property-based tests for comment tree reconstruction
//!
//! Uses proptest to generate arbitrary flat comment lists and verify the
//! structural guarantees of the two-pass builder.

use chrono::Utc;
use proptest::prelude::*;
use quadboard::comments::db::CommentParent;
use quadboard::comments::tree::{build_comment_tree, FlatComment};

const POST_ID: i32 = 1;

fn flat(id: i32, parent: CommentParent) -> FlatComment {
    FlatComment {
        id,
        author_id: id % 7,
        creation_time: Utc::now(),
        text: format!("comment {id}"),
        parent,
    }
}

/// Generate a shuffled mix of roots and replies. Reply parent ids are
/// drawn from a range wider than the root id range, so some replies are
/// orphans by construction.
fn arb_comments() -> impl Strategy<Value = Vec<FlatComment>> {
    (1usize..40).prop_flat_map(|n| {
        let entries = (0..n)
            .map(|i| {
                let id = i as i32 + 1;
                prop_oneof![
                    Just(flat(id, CommentParent::Post(POST_ID))),
                    (1i32..80).prop_map(move |parent| flat(id, CommentParent::Comment(parent))),
                ]
            })
            .collect::<Vec<_>>();
        entries.prop_shuffle()
    })
}

proptest! {
    #[test]
    fn test_roots_preserved_in_order(comments in arb_comments()) {
        let tree = build_comment_tree(&comments);

        let expected_roots: Vec<i32> = comments
            .iter()
            .filter(|c| matches!(c.parent, CommentParent::Post(_)))
            .map(|c| c.id)
            .collect();
        let actual_roots: Vec<i32> = tree.iter().map(|n| n.id).collect();
        prop_assert_eq!(actual_roots, expected_roots);
    }

    #[test]
    fn test_every_attached_reply_has_a_live_root(comments in arb_comments()) {
        let tree = build_comment_tree(&comments);

        let root_ids: std::collections::HashSet<i32> =
            tree.iter().map(|n| n.id).collect();
        for node in &tree {
            prop_assert!(root_ids.contains(&node.id));
            for reply in &node.comments {
                let original = comments.iter().find(|c| c.id == reply.id).unwrap();
                prop_assert_eq!(original.parent, CommentParent::Comment(node.id));
            }
        }
    }

    #[test]
    fn test_orphans_dropped_nothing_else(comments in arb_comments()) {
        let tree = build_comment_tree(&comments);

        let root_ids: std::collections::HashSet<i32> = comments
            .iter()
            .filter(|c| matches!(c.parent, CommentParent::Post(_)))
            .map(|c| c.id)
            .collect();

        // Replies whose parent is a root must appear exactly once; replies
        // whose parent is not must not appear at all.
        let attached: Vec<i32> = tree
            .iter()
            .flat_map(|n| n.comments.iter().map(|r| r.id))
            .collect();
        let expected: Vec<i32> = comments
            .iter()
            .filter(|c| matches!(c.parent, CommentParent::Comment(p) if root_ids.contains(&p)))
            .map(|c| c.id)
            .collect();

        let mut attached_sorted = attached.clone();
        attached_sorted.sort_unstable();
        let mut expected_sorted = expected;
        expected_sorted.sort_unstable();
        prop_assert_eq!(attached_sorted, expected_sorted);
    }
}

#[test]
fn test_documented_orphan_scenario() {
    // Two roots, two children of the first, one child of a nonexistent
    // parent: the orphan vanishes, everything else keeps its order.
    let comments = vec![
        flat(1, CommentParent::Post(POST_ID)),
        flat(2, CommentParent::Post(POST_ID)),
        flat(3, CommentParent::Comment(1)),
        flat(4, CommentParent::Comment(1)),
        flat(5, CommentParent::Comment(42)),
    ];

    let tree = build_comment_tree(&comments);
    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].comments.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 4]);
    assert!(tree[1].comments.is_empty());
}
