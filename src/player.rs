//! Simulated media playback for the terminal.
//!
//! A terminal cannot play video, so [`SimulatedPlayer`] stands in for the
//! browser's media elements: it keeps one slot per attached item, advances
//! playback positions on ticks, and accepts or rejects start requests
//! according to an [`AutoplayPolicy`].

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::shorts::{FeedItem, MediaPlayer, PlaybackError, Preload};
use crate::util::parse_duration_secs;

/// Which start requests the player accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutoplayPolicy {
    /// Every start succeeds.
    #[default]
    Allow,
    /// Only muted starts succeed.
    MutedOnly,
    /// Nothing starts until the user has interacted once, then everything
    /// does.
    BlockUntilInteraction,
}

/// State of one attached media resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSlot {
    pub preload: Preload,
    pub muted: bool,
    pub playing: bool,
    pub position: Duration,
    /// Zero when the item's duration label could not be parsed.
    pub length: Duration,
}

#[derive(Debug, Default)]
pub struct SimulatedPlayer {
    policy: AutoplayPolicy,
    user_activated: bool,
    slots: HashMap<String, MediaSlot>,
}

impl SimulatedPlayer {
    pub fn new(policy: AutoplayPolicy) -> Self {
        Self {
            policy,
            user_activated: false,
            slots: HashMap::new(),
        }
    }

    /// Record a user gesture. Lifts [`AutoplayPolicy::BlockUntilInteraction`].
    pub fn grant_user_activation(&mut self) {
        if !self.user_activated {
            tracing::debug!("User activation granted");
        }
        self.user_activated = true;
    }

    pub fn slot(&self, id: &str) -> Option<&MediaSlot> {
        self.slots.get(id)
    }

    pub fn is_attached(&self, id: &str) -> bool {
        self.slots.contains_key(id)
    }

    pub fn is_playing(&self, id: &str) -> bool {
        self.slots.get(id).is_some_and(|s| s.playing)
    }

    pub fn attached_count(&self) -> usize {
        self.slots.len()
    }

    /// Advance every playing slot by `elapsed`, looping at the end.
    pub fn advance(&mut self, elapsed: Duration) {
        for slot in self.slots.values_mut().filter(|s| s.playing) {
            slot.position += elapsed;
            if !slot.length.is_zero() && slot.position >= slot.length {
                let wrapped = slot.position.as_millis() % slot.length.as_millis();
                slot.position = Duration::from_millis(u64::try_from(wrapped).unwrap_or(0));
            }
        }
    }

    fn allows(&self, muted: bool) -> bool {
        match self.policy {
            AutoplayPolicy::Allow => true,
            AutoplayPolicy::MutedOnly => muted,
            AutoplayPolicy::BlockUntilInteraction => self.user_activated,
        }
    }
}

impl MediaPlayer for SimulatedPlayer {
    fn attach(&mut self, item: &FeedItem, preload: Preload) {
        let length = Duration::from_secs(parse_duration_secs(&item.duration).unwrap_or(0));
        self.slots
            .entry(item.id.clone())
            .and_modify(|slot| slot.preload = preload)
            .or_insert(MediaSlot {
                preload,
                muted: true,
                playing: false,
                position: Duration::ZERO,
                length,
            });
        tracing::trace!(id = %item.id, ?preload, "Attached media");
    }

    fn detach(&mut self, id: &str) {
        if self.slots.remove(id).is_some() {
            tracing::trace!(id = %id, "Detached media");
        }
    }

    fn start(&mut self, id: &str) -> Result<(), PlaybackError> {
        let muted = match self.slots.get(id) {
            Some(slot) => slot.muted,
            None => return Err(PlaybackError::NotAttached(id.to_string())),
        };
        if !self.allows(muted) {
            return Err(PlaybackError::Blocked);
        }
        if let Some(slot) = self.slots.get_mut(id) {
            slot.playing = true;
        }
        Ok(())
    }

    fn pause(&mut self, id: &str) {
        if let Some(slot) = self.slots.get_mut(id) {
            slot.playing = false;
        }
    }

    fn set_muted(&mut self, id: &str, muted: bool) {
        if let Some(slot) = self.slots.get_mut(id) {
            slot.muted = muted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shorts::clip;

    fn item(id: &str, duration: &str) -> FeedItem {
        clip(id, "t", "", "a", 0, 0, 0, duration, &[])
    }

    #[test]
    fn test_start_requires_attach() {
        let mut player = SimulatedPlayer::new(AutoplayPolicy::Allow);
        assert_eq!(
            player.start("x"),
            Err(PlaybackError::NotAttached("x".to_string()))
        );
    }

    #[test]
    fn test_allow_policy() {
        let mut player = SimulatedPlayer::new(AutoplayPolicy::Allow);
        player.attach(&item("a", "0:10"), Preload::Full);
        player.set_muted("a", false);
        assert!(player.start("a").is_ok());
        assert!(player.is_playing("a"));
        player.pause("a");
        assert!(!player.is_playing("a"));
    }

    #[test]
    fn test_muted_only_policy() {
        let mut player = SimulatedPlayer::new(AutoplayPolicy::MutedOnly);
        player.attach(&item("a", "0:10"), Preload::Full);
        player.set_muted("a", false);
        assert_eq!(player.start("a"), Err(PlaybackError::Blocked));
        player.set_muted("a", true);
        assert!(player.start("a").is_ok());
    }

    #[test]
    fn test_block_until_interaction() {
        let mut player = SimulatedPlayer::new(AutoplayPolicy::BlockUntilInteraction);
        player.attach(&item("a", "0:10"), Preload::Full);
        assert_eq!(player.start("a"), Err(PlaybackError::Blocked));

        player.grant_user_activation();
        player.set_muted("a", false);
        assert!(player.start("a").is_ok());
    }

    #[test]
    fn test_reattach_keeps_position() {
        let mut player = SimulatedPlayer::new(AutoplayPolicy::Allow);
        player.attach(&item("a", "0:10"), Preload::Metadata);
        player.start("a").unwrap();
        player.advance(Duration::from_secs(3));

        player.attach(&item("a", "0:10"), Preload::Full);
        let slot = player.slot("a").unwrap();
        assert_eq!(slot.preload, Preload::Full);
        assert_eq!(slot.position, Duration::from_secs(3));
    }

    #[test]
    fn test_advance_loops_and_skips_paused() {
        let mut player = SimulatedPlayer::new(AutoplayPolicy::Allow);
        player.attach(&item("a", "0:10"), Preload::Full);
        player.attach(&item("b", "0:10"), Preload::Metadata);
        player.start("a").unwrap();

        player.advance(Duration::from_secs(12));
        assert_eq!(player.slot("a").unwrap().position, Duration::from_secs(2));
        assert_eq!(player.slot("b").unwrap().position, Duration::ZERO);
        assert!(player.is_playing("a"));
        assert!(!player.is_playing("b"));
    }

    #[test]
    fn test_detach_releases_slot() {
        let mut player = SimulatedPlayer::new(AutoplayPolicy::Allow);
        player.attach(&item("a", "bad"), Preload::Full);
        assert_eq!(player.slot("a").unwrap().length, Duration::ZERO);
        player.detach("a");
        assert!(!player.is_attached("a"));
        assert_eq!(player.attached_count(), 0);
    }
}
