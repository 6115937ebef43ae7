use std::sync::Arc;

use quill_types::{CommentId, PostId, Timestamp};
use tracing::debug;

use crate::error::{CommentError, CommentResult};
use crate::model::{Comment, CommentBody, CommentMap, Reply};

/// Something to insert into a thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NewEntry {
    /// A new top-level comment, prepended to the thread.
    Comment(Comment),
    /// A reply, appended to its parent's replies.
    Reply(Reply),
}

impl NewEntry {
    pub fn id(&self) -> &CommentId {
        match self {
            Self::Comment(c) => c.id(),
            Self::Reply(r) => r.id(),
        }
    }

    fn post_id(&self) -> &PostId {
        match self {
            Self::Comment(c) => &c.body.post_id,
            Self::Reply(r) => &r.body.post_id,
        }
    }
}

/// A state transition over the comment map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Replace every thread. Used by load and seed.
    SetAll(CommentMap),
    Add {
        post_id: PostId,
        entry: NewEntry,
    },
    /// Toggle the viewer's like on a comment or reply.
    Like {
        post_id: PostId,
        comment_id: CommentId,
    },
    /// Remove a comment (with its replies) or a single reply.
    Delete {
        post_id: PostId,
        comment_id: CommentId,
    },
    Edit {
        post_id: PostId,
        comment_id: CommentId,
        content: String,
        edited_at: Timestamp,
    },
}

/// Compute the state that follows `state` under `action`.
///
/// `state` is left untouched. On success the returned map is a new
/// allocation with a new list for the affected post; other posts and
/// untouched comments are shared with `state`. On error nothing changes and
/// the caller keeps `state`.
pub fn reduce(state: &CommentMap, action: Action) -> CommentResult<CommentMap> {
    let mut next = state.clone();
    match action {
        Action::SetAll(map) => return Ok(map),
        Action::Add { post_id, entry } => add(&mut next, post_id, entry)?,
        Action::Like {
            post_id,
            comment_id,
        } => like(&mut next, &post_id, &comment_id)?,
        Action::Delete {
            post_id,
            comment_id,
        } => delete(&mut next, &post_id, &comment_id)?,
        Action::Edit {
            post_id,
            comment_id,
            content,
            edited_at,
        } => edit(&mut next, &post_id, &comment_id, content, edited_at)?,
    }
    Ok(next)
}

fn add(state: &mut CommentMap, post_id: PostId, entry: NewEntry) -> CommentResult<()> {
    if entry.post_id() != &post_id {
        return Err(CommentError::PostMismatch {
            expected: post_id,
            actual: entry.post_id().clone(),
        });
    }
    let existing = state.comments(&post_id);
    if existing.iter().any(|c| c.contains(entry.id())) {
        return Err(CommentError::DuplicateId(entry.id().clone()));
    }

    match entry {
        NewEntry::Comment(comment) => {
            debug!(post_id = %post_id, comment_id = %comment.id(), "prepend comment");
            state.thread_entry(post_id).insert(0, Arc::new(comment));
        }
        NewEntry::Reply(reply) => {
            let index = existing
                .iter()
                .position(|c| c.id() == &reply.parent_id)
                .ok_or_else(|| CommentError::ParentNotFound {
                    post_id: post_id.clone(),
                    parent_id: reply.parent_id.clone(),
                })?;
            debug!(
                post_id = %post_id,
                comment_id = %reply.id(),
                parent_id = %reply.parent_id,
                "append reply"
            );
            let thread = state.thread_entry(post_id);
            Arc::make_mut(&mut thread[index]).replies.push(reply);
        }
    }
    Ok(())
}

/// Where a comment id sits inside a thread.
enum Location {
    Top(usize),
    Reply(usize, usize),
}

fn locate(
    state: &CommentMap,
    post_id: &PostId,
    comment_id: &CommentId,
) -> CommentResult<Location> {
    for (i, comment) in state.comments(post_id).iter().enumerate() {
        if comment.id() == comment_id {
            return Ok(Location::Top(i));
        }
        if let Some(j) = comment.replies.iter().position(|r| r.id() == comment_id) {
            return Ok(Location::Reply(i, j));
        }
    }
    Err(CommentError::CommentNotFound {
        post_id: post_id.clone(),
        comment_id: comment_id.clone(),
    })
}

/// Run `f` on the located comment or reply body, copying only its path.
fn update_body(
    state: &mut CommentMap,
    post_id: &PostId,
    comment_id: &CommentId,
    f: impl FnOnce(&mut CommentBody),
) -> CommentResult<()> {
    let location = locate(state, post_id, comment_id)?;
    let not_found = || CommentError::CommentNotFound {
        post_id: post_id.clone(),
        comment_id: comment_id.clone(),
    };
    let thread = state.thread_mut(post_id).ok_or_else(not_found)?;
    match location {
        Location::Top(i) => f(&mut Arc::make_mut(&mut thread[i]).body),
        Location::Reply(i, j) => f(&mut Arc::make_mut(&mut thread[i]).replies[j].body),
    }
    Ok(())
}

fn like(state: &mut CommentMap, post_id: &PostId, comment_id: &CommentId) -> CommentResult<()> {
    update_body(state, post_id, comment_id, |body| body.toggle_like())
}

fn edit(
    state: &mut CommentMap,
    post_id: &PostId,
    comment_id: &CommentId,
    content: String,
    edited_at: Timestamp,
) -> CommentResult<()> {
    update_body(state, post_id, comment_id, |body| {
        body.apply_edit(content, edited_at)
    })
}

fn delete(state: &mut CommentMap, post_id: &PostId, comment_id: &CommentId) -> CommentResult<()> {
    let location = locate(state, post_id, comment_id)?;
    let thread = state
        .thread_mut(post_id)
        .ok_or_else(|| CommentError::CommentNotFound {
            post_id: post_id.clone(),
            comment_id: comment_id.clone(),
        })?;
    match location {
        Location::Top(i) => {
            let removed = thread.remove(i);
            debug!(
                post_id = %post_id,
                comment_id = %comment_id,
                replies = removed.replies.len(),
                "delete comment"
            );
        }
        Location::Reply(i, j) => {
            Arc::make_mut(&mut thread[i]).replies.remove(j);
            debug!(post_id = %post_id, comment_id = %comment_id, "delete reply");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use quill_types::{Author, PostType, UserId};

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn cid(id: &str) -> CommentId {
        CommentId::new(id).unwrap()
    }

    fn pid(id: &str) -> PostId {
        PostId::new(id).unwrap()
    }

    fn body(id: &str, post: &str) -> CommentBody {
        CommentBody::new(
            cid(id),
            pid(post),
            PostType::Feed,
            Author::new(UserId::new("u1").unwrap(), "Ana"),
            format!("text of {id}"),
            t0(),
        )
    }

    fn top(id: &str, post: &str) -> NewEntry {
        NewEntry::Comment(Comment::new(body(id, post)))
    }

    fn reply(id: &str, post: &str, parent: &str) -> NewEntry {
        NewEntry::Reply(Reply::new(body(id, post), cid(parent)))
    }

    fn add_action(post: &str, entry: NewEntry) -> Action {
        Action::Add {
            post_id: pid(post),
            entry,
        }
    }

    fn apply(state: &CommentMap, actions: Vec<Action>) -> CommentMap {
        actions
            .into_iter()
            .fold(state.clone(), |s, a| reduce(&s, a).unwrap())
    }

    /// Post "1": c1 with replies r1, r2; then c2 on top. Post "2": c3.
    fn sample() -> CommentMap {
        apply(
            &CommentMap::new(),
            vec![
                add_action("1", top("c1", "1")),
                add_action("1", reply("r1", "1", "c1")),
                add_action("1", reply("r2", "1", "c1")),
                add_action("1", top("c2", "1")),
                add_action("2", top("c3", "2")),
            ],
        )
    }

    fn ids(map: &CommentMap, post: &str) -> Vec<String> {
        map.comments(&pid(post))
            .iter()
            .map(|c| c.id().to_string())
            .collect()
    }

    // -----------------------------------------------------------------------
    // SetAll
    // -----------------------------------------------------------------------

    #[test]
    fn set_all_replaces_everything() {
        let replacement = CommentMap::from_threads([(pid("9"), vec![Comment::new(body("x", "9"))])]);
        let next = reduce(&sample(), Action::SetAll(replacement.clone())).unwrap();
        assert_eq!(next, replacement);
        assert_eq!(next.len(), 1);
    }

    // -----------------------------------------------------------------------
    // Add
    // -----------------------------------------------------------------------

    #[test]
    fn top_level_comments_are_newest_first() {
        let map = sample();
        assert_eq!(ids(&map, "1"), vec!["c2", "c1"]);
    }

    #[test]
    fn replies_are_oldest_first_under_parent() {
        let map = sample();
        let c1 = &map.comments(&pid("1"))[1];
        let reply_ids: Vec<_> = c1.replies.iter().map(|r| r.id().to_string()).collect();
        assert_eq!(reply_ids, vec!["r1", "r2"]);
        // Never at top level.
        assert!(!ids(&map, "1").contains(&"r1".to_string()));
    }

    #[test]
    fn add_creates_thread_for_new_post() {
        let next = reduce(&CommentMap::new(), add_action("42", top("n1", "42"))).unwrap();
        assert_eq!(ids(&next, "42"), vec!["n1"]);
    }

    #[test]
    fn orphan_reply_leaves_state_unchanged() {
        let map = sample();
        let err = reduce(&map, add_action("1", reply("r9", "1", "missing"))).unwrap_err();
        assert_eq!(
            err,
            CommentError::ParentNotFound {
                post_id: pid("1"),
                parent_id: cid("missing"),
            }
        );
        assert_eq!(map.count(&pid("1")), 4);
    }

    #[test]
    fn reply_to_a_reply_is_orphaned() {
        let map = sample();
        let err = reduce(&map, add_action("1", reply("r9", "1", "r1"))).unwrap_err();
        assert!(matches!(err, CommentError::ParentNotFound { .. }));
    }

    #[test]
    fn reply_to_unknown_post_is_orphaned() {
        let err = reduce(&sample(), add_action("7", reply("r9", "7", "c1"))).unwrap_err();
        assert!(matches!(err, CommentError::ParentNotFound { .. }));
    }

    #[test]
    fn reply_to_comment_of_other_post_is_orphaned() {
        let err = reduce(&sample(), add_action("2", reply("r9", "2", "c1"))).unwrap_err();
        assert!(matches!(err, CommentError::ParentNotFound { .. }));
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let map = sample();
        assert_eq!(
            reduce(&map, add_action("1", top("r2", "1"))).unwrap_err(),
            CommentError::DuplicateId(cid("r2"))
        );
    }

    #[test]
    fn mismatched_post_is_rejected() {
        let err = reduce(&sample(), add_action("1", top("x", "2"))).unwrap_err();
        assert!(matches!(err, CommentError::PostMismatch { .. }));
    }

    // -----------------------------------------------------------------------
    // Like
    // -----------------------------------------------------------------------

    #[test]
    fn like_then_unlike_restores_counter() {
        let map = sample();
        let liked = reduce(
            &map,
            Action::Like {
                post_id: pid("1"),
                comment_id: cid("c1"),
            },
        )
        .unwrap();
        let body = liked.find(&pid("1"), &cid("c1")).unwrap();
        assert_eq!((body.likes, body.is_liked), (1, true));

        let unliked = reduce(
            &liked,
            Action::Like {
                post_id: pid("1"),
                comment_id: cid("c1"),
            },
        )
        .unwrap();
        let body = unliked.find(&pid("1"), &cid("c1")).unwrap();
        assert_eq!((body.likes, body.is_liked), (0, false));
    }

    #[test]
    fn like_reaches_replies() {
        let next = reduce(
            &sample(),
            Action::Like {
                post_id: pid("1"),
                comment_id: cid("r2"),
            },
        )
        .unwrap();
        assert!(next.find(&pid("1"), &cid("r2")).unwrap().is_liked);
        assert!(!next.find(&pid("1"), &cid("r1")).unwrap().is_liked);
    }

    #[test]
    fn like_unknown_comment_is_not_found() {
        let err = reduce(
            &sample(),
            Action::Like {
                post_id: pid("2"),
                comment_id: cid("c1"),
            },
        )
        .unwrap_err();
        assert!(matches!(err, CommentError::CommentNotFound { .. }));
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    #[test]
    fn delete_top_level_cascades_replies() {
        let next = reduce(
            &sample(),
            Action::Delete {
                post_id: pid("1"),
                comment_id: cid("c1"),
            },
        )
        .unwrap();
        assert_eq!(ids(&next, "1"), vec!["c2"]);
        assert_eq!(next.count(&pid("1")), 1);
        assert!(next.find(&pid("1"), &cid("r1")).is_none());
    }

    #[test]
    fn delete_reply_keeps_parent() {
        let next = reduce(
            &sample(),
            Action::Delete {
                post_id: pid("1"),
                comment_id: cid("r1"),
            },
        )
        .unwrap();
        assert_eq!(ids(&next, "1"), vec!["c2", "c1"]);
        let c1 = &next.comments(&pid("1"))[1];
        assert_eq!(c1.replies.len(), 1);
        assert_eq!(c1.replies[0].id(), &cid("r2"));
    }

    #[test]
    fn delete_unknown_is_not_found() {
        let map = sample();
        let err = reduce(
            &map,
            Action::Delete {
                post_id: pid("1"),
                comment_id: cid("zzz"),
            },
        )
        .unwrap_err();
        assert!(matches!(err, CommentError::CommentNotFound { .. }));
        assert_eq!(map.count(&pid("1")), 4);
    }

    // -----------------------------------------------------------------------
    // Edit
    // -----------------------------------------------------------------------

    #[test]
    fn edit_touches_only_the_target() {
        let map = sample();
        let at = t0() + Duration::minutes(10);
        let next = reduce(
            &map,
            Action::Edit {
                post_id: pid("1"),
                comment_id: cid("r1"),
                content: "edited".into(),
                edited_at: at,
            },
        )
        .unwrap();

        let before = map.find(&pid("1"), &cid("r1")).unwrap();
        let after = next.find(&pid("1"), &cid("r1")).unwrap();
        assert_eq!(after.content, "edited");
        assert!(after.is_edited);
        assert_eq!(after.edited_at, Some(at));
        let mut expected = before.clone();
        expected.apply_edit("edited", at);
        assert_eq!(after, &expected);

        let old = map.comments(&pid("1"));
        let new = next.comments(&pid("1"));
        // Sibling top-level comment is shared, not copied.
        assert!(Arc::ptr_eq(&old[0], &new[0]));
        // The parent was copied, its other reply is equal.
        assert!(!Arc::ptr_eq(&old[1], &new[1]));
        assert_eq!(old[1].replies[1], new[1].replies[1]);
        assert_eq!(old[1].body, new[1].body);
        // Other posts are shared.
        assert!(Arc::ptr_eq(&map.thread(&pid("2")), &next.thread(&pid("2"))));
        // The input state is untouched.
        assert!(!before.is_edited);
    }

    #[test]
    fn edit_unknown_is_not_found() {
        let err = reduce(
            &sample(),
            Action::Edit {
                post_id: pid("404"),
                comment_id: cid("c1"),
                content: "x".into(),
                edited_at: t0(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, CommentError::CommentNotFound { .. }));
    }

    #[test]
    fn every_success_yields_a_fresh_map() {
        let map = sample();
        let next = reduce(
            &map,
            Action::Like {
                post_id: pid("2"),
                comment_id: cid("c3"),
            },
        )
        .unwrap();
        assert!(!next.ptr_eq(&map));
        assert!(!Arc::ptr_eq(&map.thread(&pid("2")), &next.thread(&pid("2"))));
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    #[derive(Clone, Debug)]
    enum Op {
        AddTop,
        AddReply(usize),
        Like(usize),
        Delete(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::AddTop),
            (0usize..16).prop_map(Op::AddReply),
            (0usize..16).prop_map(Op::Like),
            (0usize..16).prop_map(Op::Delete),
        ]
    }

    fn all_ids(map: &CommentMap) -> Vec<CommentId> {
        map.comments(&pid("p"))
            .iter()
            .flat_map(|c| {
                std::iter::once(c.id().clone()).chain(c.replies.iter().map(|r| r.id().clone()))
            })
            .collect()
    }

    proptest! {
        #[test]
        fn count_matches_tree_shape(ops in proptest::collection::vec(op(), 0..40)) {
            let mut map = CommentMap::new();
            for (n, op) in ops.into_iter().enumerate() {
                let id = format!("id{n}");
                let tops: Vec<CommentId> =
                    map.comments(&pid("p")).iter().map(|c| c.id().clone()).collect();
                let everything = all_ids(&map);
                let action = match op {
                    Op::AddTop => add_action("p", top(&id, "p")),
                    Op::AddReply(i) if !tops.is_empty() => {
                        let parent = tops[i % tops.len()].to_string();
                        add_action("p", reply(&id, "p", &parent))
                    }
                    Op::Like(i) if !everything.is_empty() => Action::Like {
                        post_id: pid("p"),
                        comment_id: everything[i % everything.len()].clone(),
                    },
                    Op::Delete(i) if !everything.is_empty() => Action::Delete {
                        post_id: pid("p"),
                        comment_id: everything[i % everything.len()].clone(),
                    },
                    _ => continue,
                };
                map = reduce(&map, action).unwrap();

                let thread = map.comments(&pid("p"));
                let expected: usize = thread.len() + thread.iter().map(|c| c.replies.len()).sum::<usize>();
                prop_assert_eq!(map.count(&pid("p")), expected);
                prop_assert_eq!(all_ids(&map).len(), expected);
            }
        }

        #[test]
        fn double_like_is_identity(likes in 0u64..1000, liked in any::<bool>()) {
            let mut b = body("c1", "p").with_likes(likes, liked);
            if liked && likes == 0 {
                b.likes = 1;
            }
            let map = CommentMap::from_threads([(pid("p"), vec![Comment::new(b)])]);
            let like = || Action::Like { post_id: pid("p"), comment_id: cid("c1") };
            let twice = reduce(&reduce(&map, like()).unwrap(), like()).unwrap();
            prop_assert_eq!(twice, map);
        }
    }
}
