//! Per-entity action arbitration.
//!
//! Every configured candidate is evaluated against a read-only
//! [`ActionContext`]; the highest priority wins. Evaluations never touch
//! world state, so they can run on the rayon pool. Applying the winner is
//! the caller's job.

use crate::config::{AppConfig, ArbitrationMode, CandidateAction};
use peeps_data::{Entity, Turn};
use rayon::prelude::*;
use std::sync::mpsc;

/// Priority of looking when the entity's view is stale or missing.
pub const LOOK_STALE_PRIORITY: i32 = 10;
/// Priority of looking while the last look is still remembered.
pub const LOOK_FRESH_PRIORITY: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Look,
    Move,
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub action: ActionKind,
    pub priority: i32,
}

impl Evaluation {
    pub const IDLE: Evaluation = Evaluation {
        action: ActionKind::Idle,
        priority: 0,
    };
}

pub struct ActionContext<'a> {
    pub entity: &'a Entity,
    pub turn: Turn,
    pub config: &'a AppConfig,
}

/// Scores one candidate for the entity in `ctx`.
#[must_use]
pub fn evaluate(candidate: CandidateAction, ctx: &ActionContext) -> Evaluation {
    match candidate {
        CandidateAction::Look => {
            let fresh = ctx
                .entity
                .has_fresh_view(ctx.turn, ctx.config.perception.remember_turns);
            Evaluation {
                action: ActionKind::Look,
                priority: if fresh {
                    LOOK_FRESH_PRIORITY
                } else {
                    LOOK_STALE_PRIORITY
                },
            }
        }
        CandidateAction::Move => Evaluation {
            action: ActionKind::Move,
            priority: ctx.config.actions.move_priority,
        },
        CandidateAction::Idle | CandidateAction::Unknown => Evaluation::IDLE,
    }
}

/// Folds evaluations in the order given. A later evaluation only wins with a
/// strictly higher priority, so ties go to whichever came first.
pub fn select<I>(evaluations: I) -> Evaluation
where
    I: IntoIterator<Item = Evaluation>,
{
    evaluations
        .into_iter()
        .fold(Evaluation::IDLE, |best, e| {
            if e.priority > best.priority {
                e
            } else {
                best
            }
        })
}

/// Evaluates every candidate using the configured [`ArbitrationMode`] and
/// returns the winner.
#[must_use]
pub fn arbitrate(ctx: &ActionContext) -> Evaluation {
    let candidates = &ctx.config.actions.candidates;
    match ctx.config.actions.arbitration {
        ArbitrationMode::Sequential => select(candidates.iter().map(|c| evaluate(*c, ctx))),
        ArbitrationMode::Parallel => {
            let evaluations: Vec<Evaluation> =
                candidates.par_iter().map(|c| evaluate(*c, ctx)).collect();
            select(evaluations)
        }
        ArbitrationMode::Racing => {
            let (tx, rx) = mpsc::channel();
            rayon::scope(|s| {
                for candidate in candidates {
                    let tx = tx.clone();
                    s.spawn(move |_| {
                        // The receiver outlives the scope.
                        let _ = tx.send(evaluate(*candidate, ctx));
                    });
                }
            });
            drop(tx);
            select(rx.iter())
        }
    }
}

/// The action the entity in `ctx` should take this turn.
#[must_use]
pub fn choose_action(ctx: &ActionContext) -> ActionKind {
    let chosen = arbitrate(ctx);
    tracing::trace!(
        entity = %ctx.entity.id,
        action = ?chosen.action,
        priority = chosen.priority,
        "Action chosen"
    );
    chosen.action
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ActionsConfig;
    use peeps_data::{EntityId, Gender, Location};

    fn entity() -> Entity {
        Entity::new(EntityId::from_u128(1), Gender::Blue, Location::origin(), 0)
    }

    fn config(candidates: Vec<CandidateAction>, mode: ArbitrationMode) -> AppConfig {
        AppConfig {
            actions: ActionsConfig {
                candidates,
                move_priority: 5,
                arbitration: mode,
            },
            ..Default::default()
        }
    }

    const MODES: [ArbitrationMode; 3] = [
        ArbitrationMode::Sequential,
        ArbitrationMode::Parallel,
        ArbitrationMode::Racing,
    ];

    #[test]
    fn test_never_looked_prefers_look() {
        let e = entity();
        for mode in MODES {
            let cfg = config(AppConfig::default().actions.candidates, mode);
            let ctx = ActionContext {
                entity: &e,
                turn: 1,
                config: &cfg,
            };
            assert_eq!(choose_action(&ctx), ActionKind::Look);
        }
    }

    #[test]
    fn test_fresh_view_prefers_move() {
        let mut e = entity();
        e.look_turn = Some(5);
        for mode in MODES {
            let cfg = config(AppConfig::default().actions.candidates, mode);
            let ctx = ActionContext {
                entity: &e,
                turn: 6,
                config: &cfg,
            };
            assert_eq!(choose_action(&ctx), ActionKind::Move);
        }
    }

    #[test]
    fn test_stale_view_looks_again() {
        let mut e = entity();
        e.look_turn = Some(1);
        let cfg = config(
            AppConfig::default().actions.candidates,
            ArbitrationMode::Sequential,
        );
        let ctx = ActionContext {
            entity: &e,
            turn: 1 + cfg.perception.remember_turns,
            config: &cfg,
        };
        assert_eq!(evaluate(CandidateAction::Look, &ctx).priority, LOOK_STALE_PRIORITY);
    }

    #[test]
    fn test_all_zero_is_idle() {
        let e = entity();
        let cfg = config(
            vec![CandidateAction::Unknown, CandidateAction::Idle],
            ArbitrationMode::Parallel,
        );
        let ctx = ActionContext {
            entity: &e,
            turn: 0,
            config: &cfg,
        };
        assert_eq!(arbitrate(&ctx), Evaluation::IDLE);
    }

    #[test]
    fn test_tie_goes_to_earlier_candidate() {
        let first = Evaluation {
            action: ActionKind::Move,
            priority: 10,
        };
        let second = Evaluation {
            action: ActionKind::Look,
            priority: 10,
        };
        assert_eq!(select([first, second]), first);
        assert_eq!(select([second, first]), second);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut e = entity();
        e.look_turn = Some(3);
        for turn in 3..12 {
            let seq = config(
                AppConfig::default().actions.candidates,
                ArbitrationMode::Sequential,
            );
            let par = config(
                AppConfig::default().actions.candidates,
                ArbitrationMode::Parallel,
            );
            let a = arbitrate(&ActionContext {
                entity: &e,
                turn,
                config: &seq,
            });
            let b = arbitrate(&ActionContext {
                entity: &e,
                turn,
                config: &par,
            });
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_move_priority_below_look_fresh_never_moves() {
        let mut e = entity();
        e.look_turn = Some(1);
        let mut cfg = config(
            AppConfig::default().actions.candidates,
            ArbitrationMode::Sequential,
        );
        cfg.actions.move_priority = 0;
        let ctx = ActionContext {
            entity: &e,
            turn: 2,
            config: &cfg,
        };
        assert_eq!(choose_action(&ctx), ActionKind::Look);
    }
}
