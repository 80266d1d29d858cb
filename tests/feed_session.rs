//! Integration tests for a feed session driven through the simulated player:
//! scrolling, debounce settling, the media window and autoplay policies.

use pretty_assertions::assert_eq;
use reel::player::{AutoplayPolicy, SimulatedPlayer};
use reel::shorts::{
    builtin_catalog, parse_catalog, FeedSettings, PlaybackState, Preload, ShortsFeed,
};
use reel::storage::MemoryStore;
use std::time::Duration;
use tokio::time::Instant;

const ITEM_HEIGHT: u32 = 24;

async fn session(policy: AutoplayPolicy) -> (ShortsFeed, SimulatedPlayer) {
    let store = MemoryStore::new();
    let mut feed = ShortsFeed::load(&store, builtin_catalog(), FeedSettings::default()).await;
    let mut player = SimulatedPlayer::new(policy);
    feed.start(&mut player);
    feed.set_item_height(ITEM_HEIGHT);
    (feed, player)
}

fn playing_count(feed: &ShortsFeed, player: &SimulatedPlayer) -> usize {
    feed.catalog()
        .iter()
        .filter(|item| player.is_playing(&item.id))
        .count()
}

fn settle(feed: &mut ShortsFeed, player: &mut SimulatedPlayer, now: Instant) -> Option<usize> {
    feed.tick(now + Duration::from_millis(100), player)
}

#[tokio::test]
async fn test_start_plays_first_item_with_window() {
    let (feed, player) = session(AutoplayPolicy::Allow).await;

    assert_eq!(
        feed.state(),
        PlaybackState::Active {
            index: 0,
            playing: true
        }
    );
    assert!(player.is_playing("s1"));
    // Radius 2 at the head of the feed: s1, s2, s3
    assert_eq!(player.attached_count(), 3);
    assert_eq!(player.slot("s1").unwrap().preload, Preload::Full);
    assert_eq!(player.slot("s3").unwrap().preload, Preload::Metadata);
    assert!(player.slot("s3").unwrap().muted);
    assert!(!player.is_attached("s4"));
}

#[tokio::test]
async fn test_settle_at_two_items_moves_playback() {
    let (mut feed, mut player) = session(AutoplayPolicy::Allow).await;
    let now = Instant::now();

    feed.scroll_to(2 * ITEM_HEIGHT, now);
    assert_eq!(settle(&mut feed, &mut player, now), Some(2));

    assert!(player.is_playing("s3"));
    assert!(!player.is_playing("s1"));
    assert_eq!(playing_count(&feed, &player), 1);
    // Window now s1..s5
    assert_eq!(player.attached_count(), 5);
    assert!(player.is_attached("s5"));
}

#[tokio::test]
async fn test_window_slides_and_releases() {
    let (mut feed, mut player) = session(AutoplayPolicy::Allow).await;
    let now = Instant::now();

    feed.scroll_items(10, now);
    settle(&mut feed, &mut player, now);

    assert_eq!(feed.playback().active_index(), Some(10));
    for id in ["s9", "s10", "s11", "s12", "s13"] {
        assert!(player.is_attached(id), "{} should be attached", id);
    }
    assert!(!player.is_attached("s1"));
    assert!(!player.is_attached("s8"));
    assert_eq!(player.attached_count(), 5);
}

#[tokio::test]
async fn test_rapid_scrolling_settles_once() {
    let (mut feed, mut player) = session(AutoplayPolicy::Allow).await;
    let t0 = Instant::now();

    for step in 0..8u64 {
        feed.scroll_by(i64::from(ITEM_HEIGHT / 2), t0 + Duration::from_millis(step * 30));
        assert_eq!(
            feed.tick(t0 + Duration::from_millis(step * 30 + 10), &mut player),
            None
        );
    }
    assert_eq!(feed.playback().active_index(), Some(0));

    let last = t0 + Duration::from_millis(7 * 30);
    assert_eq!(settle(&mut feed, &mut player, last), Some(4));
    assert!(player.is_playing("s5"));
}

#[tokio::test]
async fn test_pause_survives_navigation() {
    let (mut feed, mut player) = session(AutoplayPolicy::Allow).await;
    assert!(!feed.toggle_play(&mut player));
    assert!(!player.is_playing("s1"));

    let now = Instant::now();
    feed.scroll_items(1, now);
    settle(&mut feed, &mut player, now);

    assert_eq!(feed.playback().active_index(), Some(1));
    assert!(!feed.playback().is_playing());
    assert_eq!(playing_count(&feed, &player), 0);
}

#[tokio::test]
async fn test_muted_only_policy_downgrades_to_paused() {
    let (mut feed, mut player) = session(AutoplayPolicy::MutedOnly).await;

    // Autoplay is unmuted, so it is rejected and playback pauses
    assert_eq!(
        feed.state(),
        PlaybackState::Active {
            index: 0,
            playing: false
        }
    );

    // A manual start falls back to muted playback
    assert!(feed.toggle_play(&mut player));
    let slot = player.slot("s1").unwrap();
    assert!(slot.playing);
    assert!(slot.muted);
}

#[tokio::test]
async fn test_block_until_interaction() {
    let (mut feed, mut player) = session(AutoplayPolicy::BlockUntilInteraction).await;
    assert!(!feed.playback().is_playing());
    assert!(!feed.toggle_play(&mut player));

    player.grant_user_activation();
    assert!(feed.toggle_play(&mut player));
    assert!(!player.slot("s1").unwrap().muted);

    // Later transitions autoplay normally
    let now = Instant::now();
    feed.scroll_items(1, now);
    settle(&mut feed, &mut player, now);
    assert!(player.is_playing("s2"));
}

#[tokio::test]
async fn test_playback_clock_advances_active_only() {
    let (mut feed, mut player) = session(AutoplayPolicy::Allow).await;
    player.advance(Duration::from_secs(5));
    assert_eq!(player.slot("s1").unwrap().position, Duration::from_secs(5));
    assert_eq!(player.slot("s2").unwrap().position, Duration::ZERO);

    // s1 is 0:32 long and loops
    player.advance(Duration::from_secs(30));
    assert_eq!(player.slot("s1").unwrap().position, Duration::from_secs(3));

    assert!(!feed.toggle_play(&mut player));
    player.advance(Duration::from_secs(10));
    assert_eq!(player.slot("s1").unwrap().position, Duration::from_secs(3));
}

#[tokio::test]
async fn test_custom_catalog_session() {
    let catalog = parse_catalog(
        r#"[
            {"id": "a", "title": "A", "videoUrl": "https://x/a.mp4", "author": "me", "keywords": ["여행"], "duration": "0:15"},
            {"id": "b", "title": "B", "videoUrl": "https://x/b.mp4", "author": "me", "keywords": ["요리"]}
        ]"#,
    )
    .unwrap();
    let store = MemoryStore::new();
    let mut feed = ShortsFeed::load(&store, catalog, FeedSettings::default()).await;
    let mut player = SimulatedPlayer::new(AutoplayPolicy::Allow);
    feed.start(&mut player);

    assert_eq!(feed.visible().len(), 2);
    assert_eq!(feed.keyword_counts().get("여행"), Some(&1));
    assert_eq!(player.slot("a").unwrap().length, Duration::from_secs(15));
    assert_eq!(player.slot("b").unwrap().length, Duration::ZERO);
}
