//! Tile resolver: maps a landing position to the content its popup shows.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    board::PositionIndex,
    catalog::{CatalogEntry, TileCatalog},
    models::{QuestionDetail, EVENT_TILE_ID},
};

/// How the `"N"` sentinel tile behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TilePolicy {
    /// Open a random trick-or-treat event.
    #[default]
    Event,
    /// Open nothing.
    Quiet,
}

impl fmt::Display for TilePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TilePolicy::Event => write!(f, "event"),
            TilePolicy::Quiet => write!(f, "quiet"),
        }
    }
}

/// Outcome of a trick-or-treat event tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Treat: immune to the next negative effect.
    Gostosura,
    /// Trick: skip the next turn.
    Travessura,
}

impl EventKind {
    /// Short heading for the popup.
    pub fn title(self) -> &'static str {
        match self {
            EventKind::Gostosura => "Gostosura!",
            EventKind::Travessura => "Travessura!",
        }
    }

    /// Fixed text shown to the players.
    pub fn message(self) -> &'static str {
        match self {
            EventKind::Gostosura => "Você está imune ao próximo efeito negativo.",
            EventKind::Travessura => "Você perde a próxima rodada.",
        }
    }
}

/// Which part of the data a position resolves through. Never random.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileClass {
    /// No tile mapped at the position.
    Unmapped,
    /// The `"N"` sentinel.
    Event,
    /// A location tile with trivia.
    Location,
    /// A special tile with fixed text.
    Special,
    /// A tile id absent from both catalog lists.
    Unknown,
}

/// Content produced for a landing position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTile {
    /// Nothing to show.
    Nothing,
    /// The tile id is not in the catalog.
    NotFound {
        /// Tile id that failed to resolve.
        tile_id: String,
    },
    /// Trick-or-treat outcome.
    Event(EventKind),
    /// One question drawn from a location tile.
    Question {
        /// Location tile id.
        tile_id: String,
        /// Drawn question.
        detail: QuestionDetail,
    },
    /// A special tile, presented as a question without an answer.
    Special {
        /// Special tile id.
        tile_id: String,
        /// Detail whose question is the tile's drawback text.
        detail: QuestionDetail,
    },
}

/// Owns the static board data and resolves positions against it.
#[derive(Debug, Clone)]
pub struct TileResolver {
    index: PositionIndex,
    catalog: TileCatalog,
    policy: TilePolicy,
}

impl TileResolver {
    /// Resolver over loaded board data.
    pub fn new(index: PositionIndex, catalog: TileCatalog, policy: TilePolicy) -> Self {
        Self {
            index,
            catalog,
            policy,
        }
    }

    /// The position index.
    pub fn index(&self) -> &PositionIndex {
        &self.index
    }

    /// The tile catalog.
    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    /// Active `"N"` policy.
    pub fn policy(&self) -> TilePolicy {
        self.policy
    }

    /// Classify a position without drawing anything.
    pub fn classify(&self, position: i32) -> TileClass {
        let Some(tile_id) = self.index.tile_at(position) else {
            return TileClass::Unmapped;
        };
        if tile_id == EVENT_TILE_ID {
            return TileClass::Event;
        }
        match self.catalog.lookup(tile_id) {
            Some(CatalogEntry::Location(_)) => TileClass::Location,
            Some(CatalogEntry::Special(_)) => TileClass::Special,
            None => TileClass::Unknown,
        }
    }

    /// Resolve a position. Draws fresh randomness on every call.
    pub fn resolve<R: Rng + ?Sized>(&self, position: i32, rng: &mut R) -> ResolvedTile {
        let Some(tile_id) = self.index.tile_at(position) else {
            warn!(position, "No tile mapped at position");
            return ResolvedTile::Nothing;
        };

        if tile_id == EVENT_TILE_ID {
            return match self.policy {
                TilePolicy::Quiet => ResolvedTile::Nothing,
                TilePolicy::Event => {
                    let kind = if rng.gen_bool(0.5) {
                        EventKind::Gostosura
                    } else {
                        EventKind::Travessura
                    };
                    debug!(position, ?kind, "Event tile drawn");
                    ResolvedTile::Event(kind)
                }
            };
        }

        match self.catalog.lookup(tile_id) {
            Some(CatalogEntry::Location(tile)) => {
                let questions = tile.question_list();
                let pick = rng.gen_range(0..questions.len());
                debug!(position, tile_id, pick, total = questions.len(), "Question drawn");
                ResolvedTile::Question {
                    tile_id: tile_id.to_string(),
                    detail: questions[pick].clone(),
                }
            }
            Some(CatalogEntry::Special(tile)) => ResolvedTile::Special {
                tile_id: tile_id.to_string(),
                detail: QuestionDetail {
                    question: tile.drawback.clone(),
                    answer: String::new(),
                    bonus: None,
                    drawback: None,
                },
            },
            None => {
                warn!(position, tile_id, "Tile missing from catalog");
                ResolvedTile::NotFound {
                    tile_id: tile_id.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::board::TilePosition;

    const CATALOG: &str = r#"{
        "locale_tiles": [
            {"tile_id": "3", "questions": {
                "first": {"question": "Q-a", "answer": "A-a", "bonus": "B-a", "drawback": "D-a"},
                "second": {"question": "Q-b", "answer": "A-b", "bonus": null, "drawback": null}
            }}
        ],
        "special_tiles": [{"tile_id": "9", "drawback": "Fique uma rodada sem jogar"}]
    }"#;

    fn resolver(policy: TilePolicy) -> TileResolver {
        let pairs = (0..=18)
            .map(|position| TilePosition {
                tile_id: match position {
                    1 => "3".to_string(),
                    2 => "9".to_string(),
                    3 => "77".to_string(),
                    _ => "N".to_string(),
                },
                position,
            })
            .collect();
        TileResolver::new(
            PositionIndex::new(pairs).expect("valid board"),
            TileCatalog::from_json(CATALOG).expect("valid catalog"),
            policy,
        )
    }

    #[test]
    fn classification_is_stable() {
        let resolver = resolver(TilePolicy::Event);
        let mut rng = StdRng::seed_from_u64(7);
        for position in 0..=18 {
            let class = resolver.classify(position);
            for _ in 0..10 {
                let matches = match (class, resolver.resolve(position, &mut rng)) {
                    (TileClass::Location, ResolvedTile::Question { .. }) => true,
                    (TileClass::Special, ResolvedTile::Special { .. }) => true,
                    (TileClass::Event, ResolvedTile::Event(_)) => true,
                    (TileClass::Unknown, ResolvedTile::NotFound { .. }) => true,
                    _ => false,
                };
                assert!(matches, "position {position} drifted from {class:?}");
            }
        }
        assert_eq!(resolver.classify(19), TileClass::Unmapped);
    }

    #[test]
    fn location_tiles_surface_every_question() {
        let resolver = resolver(TilePolicy::Event);
        let mut rng = StdRng::seed_from_u64(2024);
        let mut seen = HashSet::new();
        for _ in 0..100 {
            match resolver.resolve(1, &mut rng) {
                ResolvedTile::Question { tile_id, detail } => {
                    assert_eq!(tile_id, "3");
                    seen.insert(detail.question);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        let expected: HashSet<String> = ["Q-a", "Q-b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn special_tiles_become_answerless_questions() {
        let resolver = resolver(TilePolicy::Event);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            resolver.resolve(2, &mut rng),
            ResolvedTile::Special {
                tile_id: "9".to_string(),
                detail: QuestionDetail {
                    question: "Fique uma rodada sem jogar".to_string(),
                    answer: String::new(),
                    bonus: None,
                    drawback: None,
                },
            }
        );
    }

    #[test]
    fn unknown_tiles_are_not_found() {
        let resolver = resolver(TilePolicy::Quiet);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            resolver.resolve(3, &mut rng),
            ResolvedTile::NotFound {
                tile_id: "77".to_string()
            }
        );
        assert_eq!(resolver.resolve(40, &mut rng), ResolvedTile::Nothing);
    }

    #[test]
    fn event_policy_draws_exactly_one_outcome() {
        let resolver = resolver(TilePolicy::Event);
        let mut rng = StdRng::seed_from_u64(99);
        let mut kinds = HashSet::new();
        for _ in 0..100 {
            match resolver.resolve(0, &mut rng) {
                ResolvedTile::Event(kind) => {
                    kinds.insert(kind);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert!(kinds.contains(&EventKind::Gostosura));
        assert!(kinds.contains(&EventKind::Travessura));
    }

    #[test]
    fn quiet_policy_skips_event_tiles() {
        let resolver = resolver(TilePolicy::Quiet);
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(resolver.resolve(0, &mut rng), ResolvedTile::Nothing);
        assert_eq!(resolver.resolve(18, &mut rng), ResolvedTile::Nothing);
    }

    #[test]
    fn event_messages_are_fixed() {
        assert_ne!(
            EventKind::Gostosura.message(),
            EventKind::Travessura.message()
        );
        assert_eq!(EventKind::Travessura.title(), "Travessura!");
    }
}
