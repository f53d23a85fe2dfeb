use std::{str::FromStr, sync::Arc};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{Direction, Maze, TilePosition};

use super::{
    agent::{AGENT_FRIGHTENED_SPEED, AGENT_SPEED, Agent},
    checkpoint::{CheckpointEvent, Checkpoints},
    consumables::{Consumable, Consumables, FRUIT_SCORE, Fruit},
    ghost::{CollisionOutcome, GhostKind, Ghosts},
    world_stats::WorldStats,
};

/// Frames the agent skips after eating a dot or power dot.
const EAT_PAUSE_FRAMES: u32 = 1;

/// Which game elements are active in a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldFeatures {
    pub dots: bool,
    pub power_dots: bool,
    pub fruit: bool,
    pub ghosts: bool,
}

impl WorldFeatures {
    pub const FULL: Self = Self {
        dots: true,
        power_dots: true,
        fruit: true,
        ghosts: true,
    };
}

/// Seed for the stochastic parts of a world (frightened ghost steering).
///
/// A 128-bit value serialized as a 32-character hex string. The same seed, maze
/// and features always produce the same world behavior.
///
/// # Example
///
/// ```
/// use mazechase_engine::WorldSeed;
/// use rand::Rng as _;
///
/// let seed: WorldSeed = rand::rng().random();
/// let parsed: WorldSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WorldSeed([u8; 16]);

impl WorldSeed {
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    #[must_use]
    pub const fn to_u128(self) -> u128 {
        u128::from_be_bytes(self.0)
    }
}

impl std::fmt::Display for WorldSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:032x}", self.to_u128())
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ParseWorldSeedError {
    #[display("invalid hex: expected 32 characters, got {_0}")]
    Length(#[error(not(source))] usize),
    #[display("invalid hex: {_0}")]
    Digits(std::num::ParseIntError),
}

impl FromStr for WorldSeed {
    type Err = ParseWorldSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseWorldSeedError::Length(s.len()));
        }
        let num = u128::from_str_radix(s, 16).map_err(ParseWorldSeedError::Digits)?;
        Ok(Self::from_u128(num))
    }
}

impl Serialize for WorldSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WorldSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<WorldSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> WorldSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        WorldSeed(seed)
    }
}

/// Mutable state of one episode: agent, consumables, fruit, ghosts and checkpoints.
///
/// A world is owned by a single evaluation and never shared. The evaluator drives
/// it one frame at a time by calling, in order, [`World::move_agent`],
/// [`World::move_ghosts`], [`World::resolve_collisions`], [`World::consume`],
/// [`World::update_fruit`] and [`World::apply_checkpoints`].
#[derive(Debug, Clone)]
pub struct World {
    maze: Arc<Maze>,
    features: WorldFeatures,
    agent: Agent,
    consumables: Consumables,
    fruit: Fruit,
    ghosts: Ghosts,
    checkpoints: Checkpoints,
    stats: WorldStats,
    rng: Pcg32,
}

impl World {
    #[must_use]
    pub fn new(maze: Arc<Maze>, features: WorldFeatures, seed: WorldSeed) -> Self {
        let agent = Agent::new(maze.agent_start(), Direction::Left);
        let consumables = Consumables::new(&maze, features.dots, features.power_dots);
        let fruit = Fruit::new(maze.fruit_spot());
        let ghosts = Ghosts::new(&maze, !features.dots);
        let checkpoints = Checkpoints::standard(
            consumables.remaining(),
            features.dots,
            features.ghosts,
            features.fruit,
        );
        Self {
            features,
            agent,
            consumables,
            fruit,
            ghosts,
            checkpoints,
            stats: WorldStats::new(),
            rng: Pcg32::from_seed(seed.0),
            maze,
        }
    }

    #[must_use]
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    #[must_use]
    pub fn features(&self) -> WorldFeatures {
        self.features
    }

    #[must_use]
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    #[must_use]
    pub fn consumables(&self) -> &Consumables {
        &self.consumables
    }

    #[must_use]
    pub fn fruit(&self) -> &Fruit {
        &self.fruit
    }

    /// Ghost state. Ghosts are present but frozen when the ghost feature is off;
    /// encoders should consult [`WorldFeatures::ghosts`] first.
    #[must_use]
    pub fn ghosts(&self) -> &Ghosts {
        &self.ghosts
    }

    #[must_use]
    pub fn checkpoints(&self) -> &Checkpoints {
        &self.checkpoints
    }

    #[must_use]
    pub fn stats(&self) -> &WorldStats {
        &self.stats
    }

    /// Puts the agent on `tile` facing `heading`, for scenario setup.
    pub fn place_agent(&mut self, tile: TilePosition, heading: Direction) {
        self.agent.place(tile, heading);
    }

    /// Releases a ghost directly onto `tile`, for scenario setup.
    pub fn place_ghost(&mut self, kind: GhostKind, tile: TilePosition, heading: Direction) {
        self.ghosts.place(kind, tile, heading);
    }

    /// Starts a frightened period as if a power dot had been eaten.
    pub fn frighten_ghosts(&mut self) {
        if self.features.ghosts {
            self.ghosts.frighten();
        }
    }

    /// Moves the agent one frame toward `requested`. Returns `true` if it entered
    /// a new tile.
    pub fn move_agent(&mut self, requested: Direction) -> bool {
        let speed = if self.ghosts.is_frightened() {
            AGENT_FRIGHTENED_SPEED
        } else {
            AGENT_SPEED
        };
        self.agent.advance(&self.maze, requested, speed)
    }

    /// Moves every released ghost one frame. No-op when ghosts are disabled.
    pub fn move_ghosts(&mut self) {
        if self.features.ghosts {
            self.ghosts.advance(&self.maze, &self.agent, &mut self.rng);
        }
    }

    /// Resolves agent/ghost contact for this frame, awarding points for eaten
    /// ghosts and killing the agent if a threat touched it.
    pub fn resolve_collisions(&mut self) -> CollisionOutcome {
        if !self.features.ghosts {
            return CollisionOutcome::default();
        }
        let outcome = self.ghosts.resolve_collisions(&self.agent);
        self.agent.add_score(outcome.points);
        self.stats.record_ghosts(outcome.ghosts_eaten);
        if outcome.caught {
            self.agent.kill();
        }
        outcome
    }

    /// Eats the dot or power dot under the agent, if it just entered that tile.
    pub fn consume(&mut self) -> Option<Consumable> {
        if !self.agent.is_alive() || !self.agent.entered_new_tile() {
            return None;
        }
        let kind = self.consumables.take(self.agent.tile())?;
        self.agent.add_score(kind.score());
        self.agent.pause(EAT_PAUSE_FRAMES);
        self.stats.record_consumable(kind);
        if kind.is_power_dot() && self.features.ghosts {
            self.ghosts.frighten();
        }
        Some(kind)
    }

    /// Advances the fruit timer. Returns `true` if the agent ate the fruit.
    pub fn update_fruit(&mut self) -> bool {
        if !self.features.fruit || !self.agent.is_alive() {
            return false;
        }
        if !self.fruit.update(self.agent.tile()) {
            return false;
        }
        self.agent.add_score(FRUIT_SCORE);
        self.stats.record_fruit();
        true
    }

    /// Fires checkpoints matching the current remaining-dot count and applies them.
    pub fn apply_checkpoints(&mut self) -> Vec<CheckpointEvent> {
        let events = self.checkpoints.poll(self.consumables.remaining());
        for event in &events {
            match *event {
                CheckpointEvent::ReleaseGhost { ghost } => self.ghosts.release(ghost),
                CheckpointEvent::Escalate { level } => self.ghosts.escalate(level),
                CheckpointEvent::SpawnFruit => self.fruit.spawn(),
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;

    use super::*;

    const SEED: WorldSeed = WorldSeed::from_u128(0x1234_5678_9abc_def0_0fed_cba9_8765_4321);

    fn classic(features: WorldFeatures) -> World {
        World::new(Maze::classic(), features, SEED)
    }

    #[test]
    fn test_seed_roundtrip() {
        let seed: WorldSeed = Pcg32::seed_from_u64(1).random();
        let json = serde_json::to_string(&seed).unwrap();
        assert_eq!(json.len(), 34);
        let back: WorldSeed = serde_json::from_str(&json).unwrap();
        assert_eq!(seed, back);
    }

    #[test]
    fn test_seed_rejects_bad_hex() {
        assert!(matches!(
            "abc".parse::<WorldSeed>(),
            Err(ParseWorldSeedError::Length(3))
        ));
        assert!(matches!(
            "zz".repeat(16).parse::<WorldSeed>(),
            Err(ParseWorldSeedError::Digits(_))
        ));
        assert!(serde_json::from_str::<WorldSeed>("\"00\"").is_err());
    }

    #[test]
    fn test_initial_world() {
        let world = classic(WorldFeatures::FULL);
        assert_eq!(world.agent().tile(), TilePosition::new(13, 23));
        assert_eq!(world.agent().heading(), Direction::Left);
        assert_eq!(world.consumables().remaining(), 244);
        assert!(!world.fruit().is_available());
        assert!(!world.ghosts().get(GhostKind::Inky).is_released());
    }

    #[test]
    fn test_dotless_world_releases_all_ghosts() {
        let world = classic(WorldFeatures {
            dots: false,
            power_dots: false,
            fruit: false,
            ghosts: true,
        });
        assert_eq!(world.consumables().remaining(), 0);
        assert!(world.ghosts().iter().all(|ghost| ghost.is_released()));
    }

    #[test]
    fn test_eating_dots_scores_and_pauses() {
        let mut world = classic(WorldFeatures {
            dots: true,
            power_dots: true,
            fruit: false,
            ghosts: false,
        });
        let mut eaten = 0;
        let mut frames = 0;
        while eaten < 3 {
            world.move_agent(Direction::Left);
            if world.consume().is_some() {
                eaten += 1;
            }
            frames += 1;
            assert!(frames < 100);
        }
        assert_eq!(world.agent().score(), 30);
        assert_eq!(world.stats().dots_eaten(), 3);
        assert_eq!(world.consumables().remaining(), 241);
        // the agent starts on an empty tile at (13, 23) and eats (12..=10, 23)
        assert_eq!(world.agent().tile(), TilePosition::new(10, 23));
    }

    #[test]
    fn test_power_dot_frightens_ghosts() {
        let maze = Maze::parse(
            "\
#########
#P o    #
# ##### #
#   E   #
#   F   #
#########",
        )
        .unwrap();
        let mut world = World::new(Arc::new(maze), WorldFeatures::FULL, SEED);
        let mut frames = 0;
        while world.consume().is_none() {
            world.move_agent(Direction::Right);
            frames += 1;
            assert!(frames < 10);
        }
        assert!(world.ghosts().is_frightened());
        assert!(world.ghosts().get(GhostKind::Blinky).is_edible());
        assert_eq!(world.agent().score(), 50);
    }

    #[test]
    fn test_caught_agent_dies() {
        let maze = Maze::parse(
            "\
#######
#PE  F#
#######",
        )
        .unwrap();
        let mut world = World::new(Arc::new(maze), WorldFeatures::FULL, SEED);
        let mut frames = 0;
        while world.agent().is_alive() {
            world.move_agent(Direction::Right);
            world.move_ghosts();
            world.resolve_collisions();
            if !world.agent().is_alive() {
                assert_eq!(world.consume(), None);
            }
            frames += 1;
            assert!(frames < 10);
        }
        assert!(!world.agent().is_alive());
    }

    #[test]
    fn test_fruit_checkpoint_spawns_fruit() {
        let mut world = classic(WorldFeatures::FULL);
        while world.consumables().remaining() > 174 {
            let pos = world
                .maze()
                .dots()
                .iter()
                .copied()
                .find(|pos| world.consumables().contains(*pos));
            let Some(pos) = pos else { break };
            world.consumables.take(pos);
            let events = world.apply_checkpoints();
            if world.consumables().remaining() == 214 {
                assert_eq!(
                    events,
                    vec![CheckpointEvent::ReleaseGhost {
                        ghost: GhostKind::Inky
                    }]
                );
            }
        }
        assert!(world.fruit().is_available());
        assert!(world.ghosts().get(GhostKind::Clyde).is_released());
        assert_eq!(world.checkpoints().fired_count(), 3);
    }
}
