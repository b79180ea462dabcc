//! Collaborators injected into a session
//!
//! The simulation never loads assets, plays sound or talks to the network
//! itself. It calls these traits, which the host builds once and hands over
//! at session creation.

use serde::{Deserialize, Serialize};

/// Semantic sprite key an actor is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKey {
    Player,
    /// Regular enemy, by variant index
    Enemy(u32),
    Fire,
}

/// Opaque drawable handle owned by the asset provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetHandle(pub u32);

/// Read-only sprite lookup
pub trait AssetProvider {
    /// Resolve a sprite key; `None` if the asset is missing
    fn sprite(&self, key: SpriteKey) -> Option<AssetHandle>;
    /// Number of regular enemy variants to pick from
    fn enemy_variants(&self) -> u32;
    /// Number of frames in the explosion animation
    fn explosion_frames(&self) -> u32;
}

/// Sound categories the simulation triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    Kill,
    Death,
    Hit,
    Heal,
    Shoot,
}

/// Fire-and-forget audio
pub trait AudioCues {
    fn play_cue(&mut self, cue: Cue);

    /// Silence anything still playing (session reset)
    fn stop_all(&mut self) {}
}

/// Fire-and-forget score reporting; results never flow back into the game
pub trait ScoreSink {
    fn record_kill_or_death(&mut self, total_score: u64, is_death: bool);
    fn record_mint(&mut self, kill_count: u32);
}

/// The bundle a session is built with
pub struct Services {
    pub assets: Box<dyn AssetProvider>,
    pub audio: Box<dyn AudioCues>,
    pub scores: Box<dyn ScoreSink>,
}

impl Services {
    pub fn new(
        assets: Box<dyn AssetProvider>,
        audio: Box<dyn AudioCues>,
        scores: Box<dyn ScoreSink>,
    ) -> Self {
        Self { assets, audio, scores }
    }

    /// No sound and the stock sprite set
    pub fn headless(scores: Box<dyn ScoreSink>) -> Self {
        Self::new(Box::new(StaticAssets::default()), Box::new(SilentAudio), scores)
    }
}

/// Stock sprite set: five enemy variants, one fire sprite, one player
/// sprite and 136 explosion frames. Handles are assigned densely.
#[derive(Debug, Clone)]
pub struct StaticAssets {
    pub enemy_variants: u32,
    pub has_fire: bool,
    pub has_player: bool,
    pub explosion_frames: u32,
}

impl Default for StaticAssets {
    fn default() -> Self {
        Self {
            enemy_variants: 5,
            has_fire: true,
            has_player: true,
            explosion_frames: 136,
        }
    }
}

impl AssetProvider for StaticAssets {
    fn sprite(&self, key: SpriteKey) -> Option<AssetHandle> {
        match key {
            SpriteKey::Player => self.has_player.then_some(AssetHandle(0)),
            SpriteKey::Fire => self.has_fire.then_some(AssetHandle(1)),
            SpriteKey::Enemy(i) if i < self.enemy_variants => Some(AssetHandle(2 + i)),
            SpriteKey::Enemy(_) => None,
        }
    }

    fn enemy_variants(&self) -> u32 {
        self.enemy_variants
    }

    fn explosion_frames(&self) -> u32 {
        self.explosion_frames
    }
}

pub struct SilentAudio;

impl AudioCues for SilentAudio {
    fn play_cue(&mut self, _cue: Cue) {}
}
