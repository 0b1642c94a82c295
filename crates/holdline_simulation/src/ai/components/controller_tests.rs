//! Tests for AIController targeting and flags.

#[cfg(test)]
mod tests {
    use super::super::controller::{AIController, PossibleTargets};
    use bevy::prelude::*;
    use proptest::prelude::*;

    fn e(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    fn ready_to_fire() -> AIController {
        let mut controller = AIController::default();
        controller.add_attack_target(e(1), false);
        controller.target_in_range = true;
        controller.target_in_los = true;
        controller
    }

    #[test]
    fn test_inactive_controller_skips_start_activation() {
        let controller = AIController::inactive();
        assert!(!controller.activate_on_start);
        assert!(controller.enabled);
        assert!(!controller.is_dummy);
        assert!(AIController::default().activate_on_start);
    }

    #[test]
    fn test_add_sets_target_only_when_empty() {
        let mut controller = AIController::default();
        controller.add_attack_target(e(1), false);
        controller.add_attack_target(e(2), true);

        assert_eq!(controller.attack_target(), Some(e(1)));
        assert_eq!(controller.possible_targets().len(), 2);
    }

    #[test]
    fn test_readd_overwrites_flag_in_place() {
        let mut targets = PossibleTargets::default();
        targets.insert(e(1), false);
        targets.insert(e(2), false);
        targets.insert(e(1), true);

        let order: Vec<_> = targets.iter().collect();
        assert_eq!(order, vec![(e(1), true), (e(2), false)]);
    }

    #[test]
    fn test_pick_prefers_first_emergency() {
        let mut controller = AIController::default();
        controller.add_attack_target(e(1), false);
        controller.add_attack_target(e(2), true);
        controller.add_attack_target(e(3), true);

        assert!(controller.pick_new_attack_target(|_| true));
        assert_eq!(controller.attack_target(), Some(e(2)));
    }

    #[test]
    fn test_pick_prunes_dead_candidates() {
        let mut controller = AIController::default();
        controller.add_attack_target(e(1), true);
        controller.add_attack_target(e(2), false);

        assert!(controller.pick_new_attack_target(|entity| entity != e(1)));
        assert_eq!(controller.attack_target(), Some(e(2)));
        assert!(!controller.possible_targets().contains(e(1)));
    }

    #[test]
    fn test_pick_with_no_candidates() {
        let mut controller = AIController::default();
        assert!(!controller.pick_new_attack_target(|_| true));
        assert_eq!(controller.attack_target(), None);
    }

    #[test]
    fn test_remove_active_target_clears_it() {
        let mut controller = AIController::default();
        controller.add_attack_target(e(1), false);
        controller.add_attack_target(e(2), false);

        controller.remove_attack_target(e(2));
        assert_eq!(controller.attack_target(), Some(e(1)));

        controller.remove_attack_target(e(1));
        assert_eq!(controller.attack_target(), None);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut controller = AIController::default();
        controller.add_attack_target(e(1), false);
        controller.remove_attack_target(e(9));
        assert_eq!(controller.attack_target(), Some(e(1)));
        assert_eq!(controller.possible_targets().len(), 1);
    }

    #[test]
    fn test_can_open_fire_gates() {
        let controller = ready_to_fire();
        assert!(controller.can_open_fire(true));
        assert!(!controller.can_open_fire(false));

        let mut dazed = ready_to_fire();
        dazed.handle_get_hit();
        assert!(!dazed.can_open_fire(true));
        dazed.stop_being_dazed();
        assert!(dazed.can_open_fire(true));

        let mut reloading = ready_to_fire();
        reloading.set_reloading(true);
        assert!(!reloading.can_open_fire(true));

        let mut paused = ready_to_fire();
        paused.halt_attacks();
        assert!(!paused.can_open_fire(true));
        assert_eq!(paused.attack_target(), None);
    }

    #[test]
    fn test_go_to_position() {
        let mut controller = AIController::default();
        assert!(!controller.should_go_to_position());

        controller.go_to_position(Vec3::X);
        controller.go_to_position(Vec3::X);
        assert_eq!(controller.move_position(), Some(Vec3::X));

        controller.stop_going_to_position();
        assert!(!controller.should_go_to_position());
    }

    #[test]
    fn test_player_control_disables_pathfinder() {
        let mut controller = AIController::default();
        assert!(controller.pathfinder_enabled());

        controller.set_player_controlled(true, true);
        assert!(controller.is_player_controlled());
        assert!(!controller.pathfinder_enabled());

        controller.set_player_controlled(false, true);
        assert!(controller.pathfinder_enabled());
    }

    #[test]
    fn test_death_clears_target() {
        let mut controller = ready_to_fire();
        controller.handle_death();
        assert_eq!(controller.attack_target(), None);
        assert!(!controller.target_in_range);
        assert!(!controller.pathfinder_enabled());
    }

    proptest! {
        /// Первый emergency кандидат, иначе первый живой, иначе None.
        #[test]
        fn prop_pick_new_attack_target(
            candidates in prop::collection::vec((0u32..16, any::<bool>(), any::<bool>()), 0..12)
        ) {
            let mut controller = AIController::default();
            let mut alive = std::collections::HashMap::new();
            for (index, emergency, is_alive) in &candidates {
                controller.add_attack_target(e(*index), *emergency);
                alive.insert(*index, *is_alive);
            }

            let live: Vec<(Entity, bool)> = controller
                .possible_targets()
                .iter()
                .filter(|(entity, _)| alive[&entity.index()])
                .collect();
            let expected = live
                .iter()
                .find(|(_, emergency)| *emergency)
                .or(live.first())
                .map(|(entity, _)| *entity);

            let found = controller.pick_new_attack_target(|entity| alive[&entity.index()]);

            prop_assert_eq!(found, expected.is_some());
            prop_assert_eq!(controller.attack_target(), expected);

            // Без emergency цели скан проходит весь список → все мёртвые удалены
            if !live.iter().any(|(_, emergency)| *emergency) {
                prop_assert!(controller.possible_targets().iter().all(|(entity, _)| alive[&entity.index()]));
            }
        }
    }
}
