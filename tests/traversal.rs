mod common;

use common::*;
use forumd::db::models::{Post, Thread};
use forumd::forum::{ForumError, ForumStore, Page, SortMode};

fn list(store: &ForumStore, thread: &Thread, sort: SortMode, page: Page<i64>) -> Vec<Post> {
    store.thread_posts(thread.id, sort, &page).unwrap()
}

/// Five roots, each with a small subtree. Replies are inserted after all the
/// roots so that id order and tree order disagree.
///
/// ```text
/// r1
///   a (r1)
///     c (a)
///   d (r1)
/// r2
/// r3
///   b (r3)
/// r4
///   e (r4)
/// r5
/// ```
struct Board {
    thread: Thread,
    roots: Vec<i64>,
    a: i64,
    b: i64,
    c: i64,
    d: i64,
    e: i64,
}

fn seed_forest(store: &ForumStore) -> Board {
    let thread = seed_board(store);
    let roots: Vec<i64> = (0..5).map(|_| reply(store, &thread, None).id).collect();
    let a = reply(store, &thread, Some(roots[0])).id;
    let b = reply(store, &thread, Some(roots[2])).id;
    let c = reply(store, &thread, Some(a)).id;
    let d = reply(store, &thread, Some(roots[0])).id;
    let e = reply(store, &thread, Some(roots[3])).id;

    Board {
        thread,
        roots,
        a,
        b,
        c,
        d,
        e,
    }
}

#[test]
fn tree_order_follows_reply_structure() {
    let (store, _temp) = create_test_store();
    let thread = seed_board(&store);

    let a = reply(&store, &thread, None);
    let b = reply(&store, &thread, Some(a.id));
    let c = reply(&store, &thread, None);

    let posts = list(&store, &thread, SortMode::Tree, Page::unbounded(false));
    assert_eq!(ids(&posts), vec![a.id, b.id, c.id]);

    assert_eq!(a.path.ids(), &[a.id]);
    assert_eq!(b.path.ids(), &[a.id, b.id]);
    assert_eq!(c.path.ids(), &[c.id]);
}

#[test]
fn stored_paths_extend_the_parent_path() {
    let (store, _temp) = create_test_store();
    let board = seed_forest(&store);

    let posts = list(&store, &board.thread, SortMode::Flat, Page::unbounded(false));
    for post in &posts {
        let last = *post.path.ids().last().unwrap();
        assert_eq!(last, post.id);
        match post.parent {
            None => assert_eq!(post.path.depth(), 1),
            Some(parent) => {
                let parent = posts.iter().find(|p| p.id == parent).unwrap();
                assert!(post.path.ids().starts_with(parent.path.ids()));
                assert_eq!(post.path.depth(), parent.path.depth() + 1);
            }
        }
    }
}

#[test]
fn tree_order_places_every_post_after_its_ancestors() {
    let (store, _temp) = create_test_store();
    let board = seed_forest(&store);

    let posts = list(&store, &board.thread, SortMode::Tree, Page::unbounded(false));
    let r = &board.roots;
    assert_eq!(
        ids(&posts),
        vec![r[0], board.a, board.c, board.d, r[1], r[2], board.b, r[3], board.e, r[4]]
    );

    let position = |id: i64| posts.iter().position(|p| p.id == id).unwrap();
    for post in &posts {
        if let Some(parent) = post.parent {
            assert!(position(parent) < position(post.id));
        }
    }
}

#[test]
fn tree_descending_reverses_ascending() {
    let (store, _temp) = create_test_store();
    let board = seed_forest(&store);

    let asc = list(&store, &board.thread, SortMode::Tree, Page::unbounded(false));
    let mut desc = list(&store, &board.thread, SortMode::Tree, Page::unbounded(true));
    desc.reverse();
    assert_eq!(ids(&asc), ids(&desc));
}

#[test]
fn flat_orders_by_id_in_both_directions() {
    let (store, _temp) = create_test_store();
    let board = seed_forest(&store);

    let asc = list(&store, &board.thread, SortMode::Flat, Page::unbounded(false));
    let desc = list(&store, &board.thread, SortMode::Flat, Page::unbounded(true));

    assert_eq!(asc.len(), 10);
    assert!(asc.windows(2).all(|w| w[0].id < w[1].id));

    let mut reversed = ids(&desc);
    reversed.reverse();
    assert_eq!(ids(&asc), reversed);
}

#[test]
fn flat_since_resumes_after_the_cursor() {
    let (store, _temp) = create_test_store();
    let board = seed_forest(&store);
    let all = ids(&list(&store, &board.thread, SortMode::Flat, Page::unbounded(false)));

    let page = list(
        &store,
        &board.thread,
        SortMode::Flat,
        Page::new(Some(all[3]), 3, false),
    );
    assert_eq!(ids(&page), all[4..7].to_vec());

    let page = list(
        &store,
        &board.thread,
        SortMode::Flat,
        Page::new(Some(all[3]), 0, true),
    );
    assert_eq!(ids(&page), vec![all[2], all[1], all[0]]);
}

#[test]
fn flat_limit_caps_the_page() {
    let (store, _temp) = create_test_store();
    let board = seed_forest(&store);

    let page = list(&store, &board.thread, SortMode::Flat, Page::new(None, 4, false));
    assert_eq!(page.len(), 4);
    assert_eq!(page[0].id, board.roots[0]);
}

#[test]
fn tree_since_continues_the_walk() {
    let (store, _temp) = create_test_store();
    let board = seed_forest(&store);
    let r = &board.roots;

    let page = list(
        &store,
        &board.thread,
        SortMode::Tree,
        Page::new(Some(board.c), 3, false),
    );
    assert_eq!(ids(&page), vec![board.d, r[1], r[2]]);

    let page = list(
        &store,
        &board.thread,
        SortMode::Tree,
        Page::new(Some(board.b), 0, true),
    );
    assert_eq!(ids(&page), vec![r[2], r[1], board.d, board.c, board.a, r[0]]);
}

#[test]
fn parent_tree_limit_counts_whole_branches() {
    let (store, _temp) = create_test_store();
    let board = seed_forest(&store);
    let r = &board.roots;

    let page = list(
        &store,
        &board.thread,
        SortMode::ParentTree,
        Page::new(None, 2, false),
    );
    // Two roots were asked for; their descendants come along uncounted.
    assert_eq!(ids(&page), vec![r[0], board.a, board.c, board.d, r[1]]);
}

#[test]
fn parent_tree_descending_reverses_roots_only() {
    let (store, _temp) = create_test_store();
    let board = seed_forest(&store);
    let r = &board.roots;

    let page = list(
        &store,
        &board.thread,
        SortMode::ParentTree,
        Page::new(None, 2, true),
    );
    assert_eq!(ids(&page), vec![r[4], r[3], board.e]);

    let page = list(
        &store,
        &board.thread,
        SortMode::ParentTree,
        Page::unbounded(true),
    );
    assert_eq!(
        ids(&page),
        vec![r[4], r[3], board.e, r[2], board.b, r[1], r[0], board.a, board.c, board.d]
    );
}

#[test]
fn parent_tree_since_skips_the_cursor_branch() {
    let (store, _temp) = create_test_store();
    let board = seed_forest(&store);
    let r = &board.roots;

    // The cursor is a nested reply; paging resumes after its top-level branch.
    let page = list(
        &store,
        &board.thread,
        SortMode::ParentTree,
        Page::new(Some(board.c), 2, false),
    );
    assert_eq!(ids(&page), vec![r[1], r[2], board.b]);

    let page = list(
        &store,
        &board.thread,
        SortMode::ParentTree,
        Page::new(Some(board.e), 1, true),
    );
    assert_eq!(ids(&page), vec![r[2], board.b]);
}

#[test]
fn unknown_cursor_is_an_error_for_path_orders() {
    let (store, _temp) = create_test_store();
    let board = seed_forest(&store);

    for sort in [SortMode::Tree, SortMode::ParentTree] {
        let err = store
            .thread_posts(board.thread.id, sort, &Page::new(Some(9_999), 5, false))
            .unwrap_err();
        assert!(matches!(err, ForumError::UnknownCursor(9_999)), "{}", sort);
    }

    // A post of another thread does not name a position in this one.
    let other = seed_thread(&store, "rust", "alice", Some("second-thread"));
    let stray = reply(&store, &other, None);
    for sort in [SortMode::Tree, SortMode::ParentTree] {
        let err = store
            .thread_posts(board.thread.id, sort, &Page::new(Some(stray.id), 5, false))
            .unwrap_err();
        assert!(matches!(err, ForumError::UnknownCursor(id) if id == stray.id), "{}", sort);
    }

    // A flat cursor is only a bound on ids.
    let page = list(
        &store,
        &board.thread,
        SortMode::Flat,
        Page::new(Some(9_999), 5, false),
    );
    assert!(page.is_empty());
}

#[test]
fn zero_cursor_starts_from_the_beginning() {
    let (store, _temp) = create_test_store();
    let board = seed_forest(&store);

    let page = list(
        &store,
        &board.thread,
        SortMode::Tree,
        Page::for_posts(Some(0), 1, false),
    );
    assert_eq!(ids(&page), vec![board.roots[0]]);
}

#[test]
fn empty_thread_lists_nothing_in_every_mode() {
    let (store, _temp) = create_test_store();
    let thread = seed_board(&store);

    for sort in [SortMode::Flat, SortMode::Tree, SortMode::ParentTree] {
        for desc in [false, true] {
            assert!(list(&store, &thread, sort, Page::new(None, 10, desc)).is_empty());
        }
    }
}

#[test]
fn listings_stay_inside_their_thread() {
    let (store, _temp) = create_test_store();
    let board = seed_forest(&store);
    let other = seed_thread(&store, "rust", "alice", Some("second-thread"));
    let stray = reply(&store, &other, None);

    for sort in [SortMode::Flat, SortMode::Tree, SortMode::ParentTree] {
        let posts = list(&store, &board.thread, sort, Page::unbounded(false));
        assert_eq!(posts.len(), 10);
        assert!(posts.iter().all(|p| p.thread == board.thread.id));
    }

    let posts = list(&store, &other, SortMode::ParentTree, Page::unbounded(false));
    assert_eq!(ids(&posts), vec![stray.id]);
}
