//! Rebuilds the nested reply tree of a thread from its flat reply list.
//!
//! Children are indexed by parent id once, then the tree is walked with an
//! explicit stack. Sibling order is input order (callers pass replies sorted
//! by creation time). A reply whose parent is not in the batch is unreachable
//! from the root and is left out of the result without error.

use std::collections::HashMap;
use uuid::Uuid;

use super::specialties::SpecialtyMap;
use crate::models::{Reply, ReplyNode};

/// Build the tree of top-level replies and their descendants
pub fn build_tree(replies: Vec<Reply>, specialties: &SpecialtyMap) -> Vec<ReplyNode> {
    build_subtree(replies, specialties, None)
}

/// Build the forest hanging under `root`; `None` means top-level replies
pub fn build_subtree(
    replies: Vec<Reply>,
    specialties: &SpecialtyMap,
    root: Option<Uuid>,
) -> Vec<ReplyNode> {
    let mut children: HashMap<Option<Uuid>, Vec<usize>> = HashMap::new();
    for (idx, reply) in replies.iter().enumerate() {
        children.entry(reply.parent_reply_id).or_default().push(idx);
    }

    // Pre-order walk over the reachable replies. `visited` keeps a record
    // from being emitted twice when ids repeat in a corrupt batch.
    let mut visited = vec![false; replies.len()];
    let mut order = Vec::with_capacity(replies.len());
    let mut stack: Vec<usize> = children
        .get(&root)
        .map(|kids| kids.iter().rev().copied().collect())
        .unwrap_or_default();

    while let Some(idx) = stack.pop() {
        if std::mem::replace(&mut visited[idx], true) {
            continue;
        }
        order.push(idx);
        if let Some(kids) = children.get(&Some(replies[idx].id)) {
            stack.extend(kids.iter().rev().copied().filter(|k| !visited[*k]));
        }
    }

    // Assemble bottom-up: in reverse pre-order every child is finished
    // before its parent.
    let mut records: Vec<Option<Reply>> = replies.into_iter().map(Some).collect();
    let mut built: Vec<Option<ReplyNode>> = (0..records.len()).map(|_| None).collect();

    for &idx in order.iter().rev() {
        let Some(reply) = records[idx].take() else {
            continue;
        };
        let kids: Vec<ReplyNode> = children
            .get(&Some(reply.id))
            .map(|kids| kids.iter().filter_map(|k| built[*k].take()).collect())
            .unwrap_or_default();

        built[idx] = Some(ReplyNode {
            vote_score: reply.votes.score(),
            specialties: specialties.get(&reply.id).cloned().unwrap_or_default(),
            children: kids,
            reply,
        });
    }

    children
        .get(&root)
        .map(|roots| roots.iter().filter_map(|k| built[*k].take()).collect())
        .unwrap_or_default()
}

/// Number of replies in a forest, at every depth
pub fn count_nodes(nodes: &[ReplyNode]) -> usize {
    nodes.iter().map(ReplyNode::subtree_size).sum()
}
