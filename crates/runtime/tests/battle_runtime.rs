use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use battle_core::{
    BattleConfig, BattleError, BattleEvent, BattleState, BattleStatus,
    CombatantId, CombatantSpec, ConfigurationError, Decision, DecisionError, EffectKind,
    EndReason, PendingDecision, PriorityPolicy, Side, StatKind,
};
use battle_runtime::{
    BattleHandle, BattleRuntime, ChannelProvider, DecisionProvider, EquipmentBonusOracle,
    EquipmentItem, OracleManager, PolicyProvider, RuntimeConfig, RuntimeError,
    TemplateOracleImpl, Topic,
};

fn config(seed: u64) -> RuntimeConfig {
    RuntimeConfig {
        battle: BattleConfig::default().with_max_rounds(200),
        seed: Some(seed),
        ..RuntimeConfig::default()
    }
}

fn specs(ids: &[&str]) -> Vec<CombatantSpec> {
    ids.iter().map(|&id| CombatantSpec::new(id)).collect()
}

async fn hero_vs_bat(seed: u64) -> BattleRuntime {
    BattleRuntime::builder()
        .config(config(seed))
        .oracles(OracleManager::sample())
        .allies(specs(&["hero"]))
        .enemies(specs(&["bat"]))
        .build()
        .await
        .expect("runtime should build")
}

#[tokio::test]
async fn policy_provider_runs_the_sample_party_to_completion() {
    let oracles = OracleManager::sample();
    let runtime = BattleRuntime::builder()
        .config(config(42))
        .oracles(oracles.clone())
        .allies(specs(&["hero", "cleric"]))
        .enemies(specs(&["goon", "slime", "bat"]))
        .build()
        .await
        .unwrap();

    let handle = runtime.handle();
    let mut outcomes = handle.subscribe(Topic::Outcome);

    let provider = PolicyProvider::new(Arc::new(PriorityPolicy), oracles);
    let outcome = runtime.run(&provider).await.unwrap();

    assert!(outcome.rounds <= 200);
    assert_eq!(
        outcomes.recv().await.unwrap(),
        BattleEvent::BattleEnded {
            winner: outcome.winner,
            reason: outcome.reason,
        }
    );

    let state = handle.query_state().await.unwrap();
    match outcome.reason {
        EndReason::EnemiesDefeated => assert!(state.enemies().is_empty()),
        EndReason::AlliesDefeated => assert!(state.allies().is_empty()),
        EndReason::RoundLimit => assert_eq!(outcome.rounds, 200),
        other => panic!("unexpected end reason {other}"),
    }

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn automated_battle_finishes_without_a_provider_call() {
    let runtime = BattleRuntime::builder()
        .config(config(9))
        .oracles(OracleManager::sample())
        .allies(specs(&["goon"]))
        .enemies(specs(&["slime"]))
        .build()
        .await
        .unwrap();

    let handle = runtime.handle();
    let status = handle.status().await.unwrap();
    let BattleStatus::Ended(outcome) = status else {
        panic!("no combatant is player-controlled, got {status:?}");
    };

    // A finished battle rejects further decisions.
    let err = handle
        .submit_decision(Decision::new("club", CombatantId(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Battle(BattleError::BattleEnded)));

    // Aborting after the end reports the existing outcome.
    assert_eq!(handle.abort().await.unwrap(), outcome);
}

#[tokio::test]
async fn external_decisions_arrive_over_a_channel() {
    let runtime = hero_vs_bat(7).await;
    let (provider, decisions) = ChannelProvider::new(8);
    for _ in 0..8 {
        decisions
            .send(Decision::new("slash", CombatantId(1)))
            .await
            .unwrap();
    }

    let mut combat = runtime.handle().subscribe(Topic::Combat);
    let outcome = runtime.run(&provider).await.unwrap();

    assert_eq!(outcome.reason, EndReason::EnemiesDefeated);
    assert_eq!(outcome.winner, Some(Side::Ally));

    let mut bat_died = false;
    while let Ok(event) = combat.try_recv() {
        if let BattleEvent::CombatantDied { combatant, side } = event {
            assert_eq!((combatant, side), (CombatantId(1), Side::Enemy));
            bat_died = true;
        }
    }
    assert!(bat_died);
}

#[tokio::test]
async fn closed_decision_channel_is_reported() {
    let runtime = hero_vs_bat(3).await;
    let (provider, decisions) = ChannelProvider::new(1);
    drop(decisions);

    let err = runtime.run(&provider).await.unwrap_err();
    assert!(matches!(err, RuntimeError::DecisionChannelClosed));
}

#[tokio::test]
async fn handle_suspends_on_the_player_and_can_abort() {
    let runtime = hero_vs_bat(11).await;
    let handle = runtime.handle();
    let mut turns = handle.subscribe(Topic::Turn);

    let status = handle.status().await.unwrap();
    let BattleStatus::AwaitingDecision(pending) = status else {
        panic!("hero should be awaiting a decision, got {status:?}");
    };
    assert_eq!(pending.combatant, CombatantId(0));
    let offered: Vec<_> = pending
        .abilities
        .iter()
        .map(|option| option.ability_id.as_str())
        .collect();
    assert_eq!(offered, vec!["slash", "cleave"]);

    // Asking again does not move the battle on.
    assert_eq!(
        handle.status().await.unwrap(),
        BattleStatus::AwaitingDecision(pending)
    );

    let mut awaiting = 0;
    while let Ok(event) = turns.try_recv() {
        if matches!(event, BattleEvent::AwaitingDecision { .. }) {
            awaiting += 1;
        }
    }
    assert_eq!(awaiting, 1);

    let outcome = handle.abort().await.unwrap();
    assert_eq!(outcome.reason, EndReason::Aborted);
    assert_eq!(outcome.winner, None);

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.allies().len(), 1);
    assert_eq!(state.enemies().len(), 1);
    assert_eq!(state.pending_turns().count(), 0);
}

#[tokio::test]
async fn build_requires_oracles() {
    let result = BattleRuntime::builder()
        .allies(specs(&["hero"]))
        .build()
        .await;
    assert!(matches!(result, Err(RuntimeError::MissingOracles)));
}

#[tokio::test]
async fn unknown_template_fails_the_build() {
    let result = BattleRuntime::builder()
        .oracles(OracleManager::sample())
        .allies(specs(&["hero"]))
        .enemies(specs(&["dragon"]))
        .build()
        .await;

    match result {
        Err(RuntimeError::Configuration(ConfigurationError::TemplateNotFound { template_id })) => {
            assert_eq!(template_id, "dragon")
        }
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("unknown template should fail"),
    }
}

#[tokio::test]
async fn same_seed_replays_the_same_battle() {
    async fn play(seed: u64) -> (battle_core::BattleOutcome, Vec<String>) {
        let oracles = OracleManager::sample();
        let runtime = BattleRuntime::builder()
            .config(RuntimeConfig {
                event_buffer_size: 4096,
                ..config(seed)
            })
            .oracles(oracles.clone())
            .allies(specs(&["hero", "cleric"]))
            .enemies(specs(&["ogre"]))
            .build()
            .await
            .unwrap();

        let mut combat = runtime.handle().subscribe(Topic::Combat);
        let provider = PolicyProvider::new(Arc::new(PriorityPolicy), oracles);
        let outcome = runtime.run(&provider).await.unwrap();

        let mut log = Vec::new();
        while let Ok(event) = combat.try_recv() {
            log.push(format!("{event:?}"));
        }
        (outcome, log)
    }

    let first = play(1234).await;
    let second = play(1234).await;
    assert_eq!(first, second);
    assert!(!first.1.is_empty());
}

/// Never manages to pick anything.
struct Stumped;

#[async_trait]
impl DecisionProvider for Stumped {
    async fn provide_decision(
        &self,
        pending: &PendingDecision,
        _state: &BattleState,
    ) -> battle_runtime::Result<Decision> {
        Err(DecisionError::NoAbilities {
            combatant: pending.combatant,
        }
        .into())
    }
}

#[tokio::test]
async fn failing_provider_skips_turns_instead_of_stalling() {
    let runtime = hero_vs_bat(21).await;
    let handle = runtime.handle();

    let outcome = runtime.run(&Stumped).await.unwrap();
    assert_eq!(outcome.reason, EndReason::AlliesDefeated);

    // the hero never acted
    let state = handle.query_state().await.unwrap();
    assert_eq!(state.enemies()[0].health(), 8);
}

async fn cleric_health(handle: &BattleHandle) -> u32 {
    let state = handle.query_state().await.unwrap();
    state.combatant(CombatantId(0)).unwrap().health()
}

/// Submits Mend on the cleric itself and returns the health it restored.
async fn mend_self(handle: &BattleHandle, combat: &mut broadcast::Receiver<BattleEvent>) -> u32 {
    let status = handle
        .submit_decision(Decision::new("mend", CombatantId(0)))
        .await
        .unwrap();
    assert!(
        matches!(status, BattleStatus::AwaitingDecision(_)),
        "cleric should survive to act again, got {status:?}"
    );

    let mut healed = Vec::new();
    while let Ok(event) = combat.try_recv() {
        if let BattleEvent::EffectApplied {
            actor: CombatantId(0),
            kind: EffectKind::Heal,
            amount,
            ..
        } = event
        {
            healed.push(amount);
        }
    }
    assert_eq!(healed.len(), 1);
    healed[0]
}

#[tokio::test]
async fn equipment_changes_take_effect_mid_battle() {
    let gear = Arc::new(EquipmentBonusOracle::new());
    let oracles = OracleManager::new(Arc::new(TemplateOracleImpl::sample()), gear.clone());
    let runtime = BattleRuntime::builder()
        .config(config(5))
        .oracles(oracles)
        .allies(specs(&["cleric"]))
        .enemies(specs(&["goon"]))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut combat = handle.subscribe(Topic::Combat);

    let status = handle.status().await.unwrap();
    assert!(matches!(status, BattleStatus::AwaitingDecision(_)));

    // Mend heals 4 + power; the cleric has 5 power and 30 max health
    let before = cleric_health(&handle).await;
    assert_eq!(mend_self(&handle, &mut combat).await, 9u32.min(30 - before));

    gear.equip(
        EquipmentItem::new("tome")
            .buff(StatKind::Power, 3)
            .buff(StatKind::MaxHealth, 20),
    );
    let before = cleric_health(&handle).await;
    assert_eq!(mend_self(&handle, &mut combat).await, 12u32.min(50 - before));

    // back to 30 max: anything above is clamped away before the heal lands
    gear.unequip("tome");
    let before = cleric_health(&handle).await;
    assert_eq!(mend_self(&handle, &mut combat).await, 9u32.min(30 - before.min(30)));
    assert!(cleric_health(&handle).await <= 30);
}
