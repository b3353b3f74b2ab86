use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::mpsc;

use battle_core::{
    Ability, BaseStats, BattleConfig, BattleEnv, BattleError, BattleEvent, BattleLoop,
    BattlePhase, BattleState, BattleStatus, Combatant, CombatantId, Decision, DecisionError,
    DecisionPolicy, Effect, EffectKind, EndReason, Side, StatBonusOracle, StatKind, Targeting,
};

fn unit(id: u32, speed: i32, max_health: i32, abilities: Vec<Ability>) -> Combatant {
    Combatant::new(
        CombatantId(id),
        "unit",
        format!("Unit {id}"),
        Side::Ally,
        BaseStats::new(max_health, 0, speed, 0, 0),
        abilities,
    )
}

fn poke() -> Ability {
    Ability::new("poke", "Poke", Targeting::Single).with_primary(Effect::damage(1))
}

fn run(battle: &mut BattleLoop) -> BattleStatus {
    battle.run_until_blocked()
}

fn drain(rx: &mpsc::Receiver<BattleEvent>) -> Vec<BattleEvent> {
    rx.try_iter().collect()
}

struct Stuck;

impl DecisionPolicy for Stuck {
    fn decide(
        &self,
        _state: &BattleState,
        actor: CombatantId,
        _env: &BattleEnv<'_>,
    ) -> Result<Decision, DecisionError> {
        Err(DecisionError::NoValidTarget {
            combatant: actor,
            ability_id: "poke".into(),
        })
    }

    fn name(&self) -> &'static str {
        "stuck"
    }
}

#[test]
fn side_wipe_ends_the_battle_mid_round() {
    let storm = Ability::new("storm", "Storm", Targeting::All)
        .with_primary(Effect::damage(100))
        .with_secondary(Effect::damage(100));
    // the hero is the only combatant with speed, so it acts first
    let hero = unit(0, 1, 30, vec![storm]);
    let squire = unit(1, 0, 30, vec![poke()]);
    let goons = vec![unit(2, 0, 10, vec![poke()]), unit(3, 0, 10, vec![poke()])];
    let state = BattleState::new(vec![hero, squire], goons, 5, &BattleConfig::default()).unwrap();

    let (tx, rx) = mpsc::channel();
    let mut battle = BattleLoop::builder(state).sink(tx).build();

    let BattleStatus::Ended(outcome) = run(&mut battle) else {
        panic!("battle should have ended");
    };
    assert_eq!(outcome.reason, EndReason::EnemiesDefeated);
    assert_eq!(outcome.winner, Some(Side::Ally));
    assert_eq!(outcome.rounds, 1);

    let events = drain(&rx);
    let started: Vec<CombatantId> = events
        .iter()
        .filter_map(|event| match event {
            BattleEvent::TurnStarted { combatant } => Some(*combatant),
            _ => None,
        })
        .collect();
    assert_eq!(started, vec![CombatantId(0)]);

    let deaths = events
        .iter()
        .filter(|event| matches!(event, BattleEvent::CombatantDied { side: Side::Enemy, .. }))
        .count();
    assert_eq!(deaths, 2);
    assert!(matches!(
        events.last(),
        Some(BattleEvent::BattleEnded { winner: Some(Side::Ally), .. })
    ));
    assert!(battle.state().pending_turns().next().is_none());
}

#[test]
fn player_turn_suspends_until_a_decision_arrives() {
    let hero = unit(0, 3, 30, vec![poke()]).with_player_control(true);
    let goon = unit(1, 0, 3, vec![poke()]);
    let state = BattleState::new(vec![hero], vec![goon], 1, &BattleConfig::default()).unwrap();
    let mut battle = BattleLoop::builder(state).build();

    let BattleStatus::AwaitingDecision(pending) = run(&mut battle) else {
        panic!("hero should be waiting");
    };
    assert_eq!(pending.combatant, CombatantId(0));
    assert_eq!(pending.abilities.len(), 1);
    assert_eq!(pending.abilities[0].targets, vec![CombatantId(1)]);

    // inert while waiting
    let snapshot = battle.state().clone();
    assert_eq!(*battle.advance(), BattlePhase::AwaitingDecision(CombatantId(0)));
    assert_eq!(battle.state(), &snapshot);
    assert_eq!(battle.pending_decision(), Some(pending));

    battle
        .submit_decision(Decision::new("poke", CombatantId(1)))
        .unwrap();
    assert_eq!(*battle.phase(), BattlePhase::ApplyingEffects(CombatantId(0)));

    battle.advance();
    assert_eq!(battle.state().combatant(CombatantId(1)).unwrap().health(), 2);
}

#[test]
fn decisions_are_rejected_outside_awaiting_decision() {
    let hero = unit(0, 1, 30, vec![poke()]);
    let goon = unit(1, 1, 30, vec![poke()]);
    let state = BattleState::new(vec![hero], vec![goon], 1, &BattleConfig::default()).unwrap();
    let mut battle = BattleLoop::builder(state).build();
    let before = battle.state().clone();

    let err = battle
        .submit_decision(Decision::new("poke", CombatantId(1)))
        .unwrap_err();
    assert_eq!(
        err,
        BattleError::NotAwaitingDecision {
            phase: "round_start".into()
        }
    );
    assert_eq!(battle.state(), &before);
    assert_eq!(*battle.phase(), BattlePhase::RoundStart);
}

#[test]
fn unusable_player_decision_skips_the_turn() {
    let hero = unit(0, 3, 30, vec![poke()]).with_player_control(true);
    let goon = unit(1, 0, 30, vec![poke()]);
    let state = BattleState::new(vec![hero], vec![goon], 2, &BattleConfig::default()).unwrap();

    let (tx, rx) = mpsc::channel();
    let mut battle = BattleLoop::builder(state).sink(tx).build();
    run(&mut battle);

    battle
        .submit_decision(Decision::new("fireball", CombatantId(1)))
        .unwrap();
    battle.advance();

    assert_eq!(*battle.phase(), BattlePhase::TurnComplete(CombatantId(0)));
    assert!(drain(&rx).iter().any(|event| matches!(
        event,
        BattleEvent::TurnSkipped {
            combatant: CombatantId(0),
            reason: DecisionError::UnknownAbility { .. }
        }
    )));
    assert_eq!(battle.state().combatant(CombatantId(1)).unwrap().health(), 30);
}

#[test]
fn abort_ends_the_battle_from_any_phase() {
    let hero = unit(0, 3, 30, vec![poke()]).with_player_control(true);
    let goon = unit(1, 0, 30, vec![poke()]);
    let state = BattleState::new(vec![hero], vec![goon], 2, &BattleConfig::default()).unwrap();
    let mut battle = BattleLoop::builder(state).build();
    run(&mut battle);

    let outcome = battle.abort();
    assert_eq!(outcome.reason, EndReason::Aborted);
    assert_eq!(outcome.winner, None);
    assert_eq!(battle.outcome(), Some(&outcome));

    assert_eq!(
        battle.submit_decision(Decision::new("poke", CombatantId(1))),
        Err(BattleError::BattleEnded)
    );
    assert_eq!(battle.abort(), outcome);
    assert_eq!(run(&mut battle), BattleStatus::Ended(outcome));
}

#[test]
fn round_limit_stops_a_stalemate() {
    let rest = Ability::new("rest", "Rest", Targeting::SelfOnly).with_primary(Effect::heal(1));
    let state = BattleState::new(
        vec![unit(0, 1, 10, vec![rest.clone()])],
        vec![unit(1, 1, 10, vec![rest])],
        3,
        &BattleConfig::default(),
    )
    .unwrap();
    let config = BattleConfig::default().with_max_rounds(3);
    let mut battle = BattleLoop::builder(state).config(config).build();

    let BattleStatus::Ended(outcome) = run(&mut battle) else {
        panic!("round limit should end the battle");
    };
    assert_eq!(outcome.reason, EndReason::RoundLimit);
    assert_eq!(outcome.rounds, 3);
}

#[test]
fn empty_rosters_end_immediately() {
    let state = BattleState::new(vec![], vec![], 0, &BattleConfig::default()).unwrap();
    let mut battle = BattleLoop::builder(state).build();

    let BattleStatus::Ended(outcome) = run(&mut battle) else {
        panic!("nothing to fight");
    };
    assert_eq!(outcome.reason, EndReason::MutualDefeat);
    assert_eq!(outcome.rounds, 0);
}

#[test]
fn self_destruct_of_last_ally_loses_the_battle() {
    let blast = Ability::new("blast", "Blast", Targeting::SelfOnly).with_primary(Effect::damage(50));
    let state = BattleState::new(
        vec![unit(0, 2, 10, vec![blast])],
        vec![unit(1, 0, 10, vec![poke()])],
        4,
        &BattleConfig::default(),
    )
    .unwrap();
    let mut battle = BattleLoop::builder(state).build();

    let BattleStatus::Ended(outcome) = run(&mut battle) else {
        panic!("battle should have ended");
    };
    assert_eq!(outcome.reason, EndReason::AlliesDefeated);
    assert_eq!(outcome.winner, Some(Side::Enemy));
}

#[test]
fn failing_side_gets_one_no_actions_notice() {
    let state = BattleState::new(
        vec![unit(0, 1, 10, vec![poke()])],
        vec![unit(1, 1, 10, vec![poke()])],
        9,
        &BattleConfig::default(),
    )
    .unwrap();
    let (tx, rx) = mpsc::channel();
    let mut battle = BattleLoop::builder(state)
        .config(BattleConfig::default().with_max_rounds(4))
        .policy(Arc::new(Stuck))
        .sink(tx)
        .build();

    let BattleStatus::Ended(outcome) = run(&mut battle) else {
        panic!("round limit should end the battle");
    };
    assert_eq!(outcome.reason, EndReason::RoundLimit);

    let events = drain(&rx);
    for side in [Side::Ally, Side::Enemy] {
        let notices = events
            .iter()
            .filter(|event| matches!(event, BattleEvent::NoActionsAvailable { side: s } if *s == side))
            .count();
        assert_eq!(notices, 1, "{side} should be notified once");
    }
    let skipped = events
        .iter()
        .filter(|event| matches!(event, BattleEvent::TurnSkipped { .. }))
        .count();
    assert_eq!(skipped, 8);
}

#[test]
fn same_seed_replays_the_same_battle() {
    let build = || {
        let cleave = Ability::new("cleave", "Cleave", Targeting::Adjacent)
            .with_primary(Effect::damage(3))
            .with_secondary(Effect::damage(1));
        let allies = (0..3).map(|id| unit(id, 2, 12, vec![poke(), cleave.clone()])).collect();
        let enemies = (3..7).map(|id| unit(id, 3, 8, vec![poke()])).collect();
        let state = BattleState::new(allies, enemies, 1234, &BattleConfig::default()).unwrap();
        let (tx, rx) = mpsc::channel();
        let mut battle = BattleLoop::builder(state)
            .config(BattleConfig::default().with_max_rounds(50))
            .sink(tx)
            .build();
        let status = battle.run_until_blocked();
        (status, drain(&rx))
    };

    let (first_status, first_events) = build();
    let (second_status, second_events) = build();
    assert_eq!(first_status, second_status);
    assert_eq!(first_events, second_events);
    assert!(matches!(first_status, BattleStatus::Ended(_)));
}

/// Party equipment whose strength bonus can change mid-battle.
#[derive(Default)]
struct Gear {
    strength: AtomicI32,
    max_health: AtomicI32,
}

impl StatBonusOracle for Gear {
    fn stat_bonus(&self, stat: StatKind) -> i32 {
        match stat {
            StatKind::Strength => self.strength.load(Ordering::SeqCst),
            StatKind::MaxHealth => self.max_health.load(Ordering::SeqCst),
            _ => 0,
        }
    }
}

fn duel(gear: Arc<Gear>) -> (BattleLoop, mpsc::Receiver<BattleEvent>) {
    let jab = Ability::new("jab", "Jab", Targeting::Single)
        .with_primary(Effect::damage(0).with_strength(1.0));
    let hero = unit(0, 1, 30, vec![jab]).with_player_control(true);
    let dummy = unit(1, 0, 100, vec![poke()]);
    let state = BattleState::new(vec![hero], vec![dummy], 3, &BattleConfig::default()).unwrap();

    let (tx, rx) = mpsc::channel();
    let battle = BattleLoop::builder(state).bonuses(gear).sink(tx).build();
    (battle, rx)
}

fn hero_damage(events: &[BattleEvent]) -> Vec<u32> {
    events
        .iter()
        .filter_map(|event| match event {
            BattleEvent::EffectApplied {
                actor: CombatantId(0),
                kind: EffectKind::Damage,
                amount,
                ..
            } => Some(*amount),
            _ => None,
        })
        .collect()
}

#[test]
fn equipment_changes_apply_to_the_next_effect() {
    let gear = Arc::new(Gear::default());
    gear.max_health.store(-10, Ordering::SeqCst);
    let (mut battle, rx) = duel(Arc::clone(&gear));

    // built above the penalised max, so clamped before the first turn
    let hero = battle.state().combatant(CombatantId(0)).unwrap();
    assert_eq!(hero.health(), 20);
    assert_eq!(hero.max_health(gear.as_ref()), 20);

    gear.strength.store(3, Ordering::SeqCst);
    assert!(matches!(run(&mut battle), BattleStatus::AwaitingDecision(_)));
    battle
        .submit_decision(Decision::new("jab", CombatantId(1)))
        .unwrap();
    assert!(matches!(run(&mut battle), BattleStatus::AwaitingDecision(_)));
    assert_eq!(hero_damage(&drain(&rx)), vec![3]);

    gear.strength.store(7, Ordering::SeqCst);
    battle
        .submit_decision(Decision::new("jab", CombatantId(1)))
        .unwrap();
    assert!(matches!(run(&mut battle), BattleStatus::AwaitingDecision(_)));
    assert_eq!(hero_damage(&drain(&rx)), vec![7]);
    assert_eq!(
        battle.state().combatant(CombatantId(1)).unwrap().health(),
        90
    );

    // tightening the penalty mid-battle caps health on the next hit
    gear.max_health.store(-25, Ordering::SeqCst);
    let mut pokes = 0;
    for _ in 0..4 {
        battle
            .submit_decision(Decision::new("jab", CombatantId(1)))
            .unwrap();
        run(&mut battle);
        pokes = drain(&rx)
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    BattleEvent::EffectApplied {
                        target: CombatantId(0),
                        ..
                    }
                )
            })
            .count() as u32;
        if pokes > 0 {
            break;
        }
    }
    assert!(pokes > 0, "the dummy should have poked the hero");
    let hero = battle.state().combatant(CombatantId(0)).unwrap();
    assert_eq!(hero.health(), 5 - pokes);
    assert!(hero.health_percent(gear.as_ref()) < 100);
}

#[test]
fn skipped_decision_consumes_the_turn() {
    let (mut battle, rx) = duel(Arc::new(Gear::default()));

    let err = battle
        .skip_decision(DecisionError::NoAbilities {
            combatant: CombatantId(0),
        })
        .unwrap_err();
    assert!(matches!(err, BattleError::NotAwaitingDecision { .. }));

    assert!(matches!(run(&mut battle), BattleStatus::AwaitingDecision(_)));
    let round = battle.state().round();
    battle
        .skip_decision(DecisionError::NoAbilities {
            combatant: CombatantId(0),
        })
        .unwrap();

    assert!(matches!(run(&mut battle), BattleStatus::AwaitingDecision(_)));
    assert_eq!(battle.state().round(), round + 1);
    let events = drain(&rx);
    assert!(events.iter().any(|event| matches!(
        event,
        BattleEvent::TurnSkipped {
            combatant: CombatantId(0),
            reason: DecisionError::NoAbilities { .. },
        }
    )));
    assert!(hero_damage(&events).is_empty());
    assert_eq!(
        battle.state().combatant(CombatantId(1)).unwrap().health(),
        100
    );
}
