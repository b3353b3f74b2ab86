use battle_core::{
    Ability, BaseStats, BattleConfig, BattleState, Combatant, CombatantId, Effect, NoBonuses,
    Side, Targeting, apply_effects, build_turn_order, engine::adjacent_indices, resolve_targets,
};
use proptest::prelude::*;

fn unit(id: u32, max_health: i32) -> Combatant {
    Combatant::new(
        CombatantId(id),
        "unit",
        format!("Unit {id}"),
        Side::Ally,
        BaseStats::new(max_health, 0, 1, 3, 2),
        vec![Ability::new("poke", "Poke", Targeting::Single).with_primary(Effect::damage(1))],
    )
}

fn effect_strategy() -> impl Strategy<Value = Effect> {
    (any::<bool>(), -20i32..60, 0.0f32..3.0, 0.0f32..3.0).prop_map(|(heal, base, s, p)| {
        let effect = if heal { Effect::heal(base) } else { Effect::damage(base) };
        effect.with_strength(s).with_power(p)
    })
}

proptest! {
    #[test]
    fn health_stays_within_bounds(
        max_health in 1i32..200,
        start in 0u32..200,
        effects in prop::collection::vec(effect_strategy(), 1..20),
    ) {
        let target = unit(1, max_health).with_health(start.max(1), max_health as u32);
        let mut state = BattleState::new(
            vec![unit(0, 50)],
            vec![target],
            0,
            &BattleConfig::default(),
        ).unwrap();

        for effect in &effects {
            apply_effects(&mut state, &NoBonuses, CombatantId(0), std::slice::from_ref(effect), &[CombatantId(1)]);
            let target = state.combatant(CombatantId(1)).unwrap();
            prop_assert!(target.health() <= max_health as u32);
        }
    }

    #[test]
    fn adjacent_splash_is_bounded_and_excludes_primary(len in 1usize..9, pick in 0usize..9) {
        let chosen = pick % len;
        let cleave = Ability::new("cleave", "Cleave", Targeting::Adjacent)
            .with_primary(Effect::damage(1))
            .with_secondary(Effect::damage(1));
        let enemies = (1..=len as u32).map(|id| unit(id, 10)).collect();
        let state = BattleState::new(
            vec![unit(0, 10)],
            enemies,
            0,
            &BattleConfig::default(),
        ).unwrap();
        let target = state.enemies()[chosen].id;

        let set = resolve_targets(&cleave, CombatantId(0), &state, target);
        prop_assert_eq!(set.primary.clone(), vec![target]);
        prop_assert!(set.secondary.len() <= 2);
        prop_assert!(!set.secondary.contains(&target));
        for id in &set.secondary {
            prop_assert!(state.enemies().iter().any(|c| c.id == *id));
        }
        prop_assert_eq!(adjacent_indices(chosen, len).count(), set.secondary.len());
    }

    #[test]
    fn self_targeting_has_no_secondary_targets(chosen in 0u32..4) {
        let focus = Ability::new("focus", "Focus", Targeting::SelfOnly)
            .with_primary(Effect::heal(1))
            .with_secondary(Effect::damage(5));
        let state = BattleState::new(
            vec![unit(0, 10), unit(1, 10)],
            vec![unit(2, 10), unit(3, 10)],
            0,
            &BattleConfig::default(),
        ).unwrap();

        let set = resolve_targets(&focus, CombatantId(0), &state, CombatantId(chosen));
        prop_assert!(set.secondary.is_empty());
        prop_assert_eq!(set.primary, vec![CombatantId(0)]);
    }

    #[test]
    fn turn_order_is_a_pure_function_of_rolls(
        speeds in prop::collection::vec(0u32..5, 0..10),
        rolls in prop::collection::vec(1u32..=6, 64),
    ) {
        let entrants: Vec<(CombatantId, u32)> = speeds
            .iter()
            .enumerate()
            .map(|(i, &speed)| (CombatantId(i as u32), speed))
            .collect();
        let script = |combatant: CombatantId, die: u32| {
            rolls[(combatant.0 as usize * 5 + die as usize) % rolls.len()]
        };

        let first = build_turn_order(entrants.clone(), script);
        let second = build_turn_order(entrants.clone(), script);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), entrants.len());
        for pair in first.windows(2) {
            prop_assert!(pair[0].roll >= pair[1].roll);
            if pair[0].roll == pair[1].roll {
                prop_assert!(pair[0].combatant < pair[1].combatant);
            }
        }
    }
}
