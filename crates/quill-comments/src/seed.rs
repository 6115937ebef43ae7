use chrono::Duration;

use quill_types::{Author, CommentId, PostId, PostType, Timestamp, UserId};

use crate::model::{Comment, CommentBody, CommentMap, Reply};

fn author(id: &'static str, name: &str) -> Author {
    Author::new(UserId::from_static(id), name)
        .with_avatar(format!("https://i.pravatar.cc/150?u={id}"))
}

fn body(
    id: &'static str,
    post: &'static str,
    post_type: PostType,
    author: Author,
    content: &str,
    created_at: Timestamp,
) -> CommentBody {
    CommentBody::new(
        CommentId::from_static(id),
        PostId::from_static(post),
        post_type,
        author,
        content,
        created_at,
    )
}

/// The example threads shown when nothing usable is persisted.
///
/// Creation times are relative to `now` so the feed reads naturally
/// ("2h ago", "1d ago") whenever the seed is materialized.
///
/// - post `1` (feed): one comment, `c1`, without replies
/// - post `2` (feed): `c2` (5 likes, two replies) above the older `c3`
/// - post `reel-1` (reel): `c4` (liked by the viewer) above `c5`
pub fn seed(now: Timestamp) -> CommentMap {
    let maya = author("u-maya", "Maya Chen");
    let leo = author("u-leo", "Leo Park");
    let sam = author("u-sam", "Sam Rivera");
    let feed = PostType::Feed;
    let reel = PostType::Reel;

    let post_1 = vec![Comment::new(
        body(
            "c1",
            "1",
            feed,
            maya.clone(),
            "Love this view! Where was this taken?",
            now - Duration::hours(2),
        )
        .with_likes(3, false),
    )];

    let post_2 = vec![
        Comment::new(
            body(
                "c2",
                "2",
                feed,
                leo.clone(),
                "That sunset is unreal 🔥",
                now - Duration::hours(1),
            )
            .with_likes(5, false),
        )
        .with_replies(vec![
            Reply::new(
                body(
                    "c2-r1",
                    "2",
                    feed,
                    sam.clone(),
                    "Right? Shot it on my phone too.",
                    now - Duration::minutes(45),
                )
                .with_likes(1, false),
                CommentId::from_static("c2"),
            ),
            Reply::new(
                body(
                    "c2-r2",
                    "2",
                    feed,
                    maya.clone(),
                    "Need to go there next summer.",
                    now - Duration::minutes(20),
                ),
                CommentId::from_static("c2"),
            ),
        ]),
        Comment::new(body(
            "c3",
            "2",
            feed,
            sam.clone(),
            "Saving this for later.",
            now - Duration::hours(5),
        )),
    ];

    let reel_1 = vec![
        Comment::new(
            body(
                "c4",
                "reel-1",
                reel,
                sam,
                "The transition at 0:07 😮",
                now - Duration::hours(3),
            )
            .with_likes(24, true),
        ),
        Comment::new(
            body(
                "c5",
                "reel-1",
                reel,
                leo,
                "What song is this?",
                now - Duration::days(1),
            )
            .with_likes(2, false),
        ),
    ];

    CommentMap::from_threads([
        (PostId::from_static("1"), post_1),
        (PostId::from_static("2"), post_2),
        (PostId::from_static("reel-1"), reel_1),
    ])
}
