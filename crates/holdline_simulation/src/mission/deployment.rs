//! Company roster + binding soldiers to pre-placed friendly bodies.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::{set_actor_active, AIController, AttackRoutine};
use crate::combat::{EquippedWeapon, FireBursts, WeaponData, WeaponKind};
use crate::components::{Actor, Health, Player};
use crate::mission::{ActorBroadcast, MissionState};

/// A soldier on the company roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySoldier {
    pub id: u32,
    pub name: String,
    pub weapon: WeaponKind,
    /// Goes on the next mission
    pub deployed: bool,
}

/// Company roster (owned by the meta game, read by missions).
#[derive(Resource, Debug, Clone, Default)]
pub struct Company {
    soldiers: Vec<CompanySoldier>,
    next_id: u32,
}

impl Company {
    pub fn soldiers(&self) -> &[CompanySoldier] {
        &self.soldiers
    }

    /// Roster order is deployment order (first = player).
    pub fn deployed_soldiers(&self) -> Vec<CompanySoldier> {
        self.soldiers.iter().filter(|s| s.deployed).cloned().collect()
    }

    /// Fresh recruits, not yet on the roster.
    pub fn new_recruits(&mut self, count: usize) -> Vec<CompanySoldier> {
        (0..count)
            .map(|_| {
                let id = self.next_id;
                self.next_id += 1;
                CompanySoldier {
                    id,
                    name: format!("Recruit #{}", id),
                    weapon: WeaponKind::Pistol,
                    deployed: true,
                }
            })
            .collect()
    }

    pub fn add_recruit(&mut self, soldier: CompanySoldier) {
        self.next_id = self.next_id.max(soldier.id + 1);
        self.soldiers.push(soldier);
    }
}

/// Pre-placed friendly body, inactive until a soldier is bound to it.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct FriendlyBody {
    /// Binding order
    pub slot: u32,
}

/// Which roster soldier drives this body.
#[derive(Component, Debug, Clone)]
pub struct SoldierIdentity {
    pub soldier_id: u32,
    pub name: String,
}

/// Player's controlled actor + camera follow target.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerControl {
    pub controlled_actor: Option<Entity>,
    pub camera_follow: Option<Entity>,
}

pub type FriendlyBodies<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static FriendlyBody,
        &'static mut Actor,
        &'static mut AIController,
        &'static mut EquippedWeapon,
        &'static mut AttackRoutine,
        &'static mut FireBursts,
        &'static Health,
    ),
>;

/// Inactive bodies in slot order.
pub fn free_bodies(bodies: &FriendlyBodies) -> Vec<Entity> {
    let mut free: Vec<(u32, Entity)> = bodies
        .iter()
        .filter(|(_, _, _, controller, ..)| !controller.enabled)
        .map(|(entity, body, ..)| (body.slot, entity))
        .collect();
    free.sort();
    free.into_iter().map(|(_, entity)| entity).collect()
}

/// Hide and disable every body (scene may leave some enabled).
pub fn deactivate_bodies(bodies: &mut FriendlyBodies) {
    for (_, _, mut actor, mut controller, _, mut routine, mut bursts, health) in bodies.iter_mut() {
        controller.enabled = false;
        set_actor_active(
            false,
            &mut actor,
            &mut controller,
            &mut routine,
            &mut bursts,
            health.is_alive(),
        );
    }
}

/// Bind a soldier to a body: weapon, activation, friendly registration.
///
/// `make_player` hands the body to the player (identity + camera).
#[allow(clippy::too_many_arguments)]
pub fn bind_soldier(
    commands: &mut Commands,
    bodies: &mut FriendlyBodies,
    body: Entity,
    soldier: &CompanySoldier,
    make_player: bool,
    state: &mut MissionState,
    player: &mut PlayerControl,
    broadcasts: &mut EventWriter<ActorBroadcast>,
) -> bool {
    let Ok((_, _, mut actor, mut controller, mut weapon, mut routine, mut bursts, health)) =
        bodies.get_mut(body)
    else {
        crate::log_error(&format!("bind_soldier: {:?} is not a friendly body", body));
        return false;
    };

    *weapon = EquippedWeapon::new(WeaponData::for_kind(soldier.weapon));
    controller.enabled = true;
    set_actor_active(
        true,
        &mut actor,
        &mut controller,
        &mut routine,
        &mut bursts,
        health.is_alive(),
    );

    commands.entity(body).insert((
        SoldierIdentity {
            soldier_id: soldier.id,
            name: soldier.name.clone(),
        },
        Name::new(soldier.name.clone()),
    ));

    state.register_friendly(body);
    broadcasts.write(ActorBroadcast::FriendlySpawned);

    if make_player {
        actor.is_player = true;
        controller.set_player_controlled(true, health.is_alive());
        commands.entity(body).insert(Player);
        player.controlled_actor = Some(body);
        player.camera_follow = Some(body);
    }

    crate::log_info(&format!(
        "🪖 {} ({:?}) → body {:?}{}",
        soldier.name,
        soldier.weapon,
        body,
        if make_player { " [player]" } else { "" }
    ));
    true
}

/// Deploy the company's deployed soldiers onto free bodies, first = player.
pub fn deploy_friendlies(
    commands: &mut Commands,
    bodies: &mut FriendlyBodies,
    company: &Company,
    state: &mut MissionState,
    player: &mut PlayerControl,
    broadcasts: &mut EventWriter<ActorBroadcast>,
) {
    let soldiers = company.deployed_soldiers();
    let free = free_bodies(bodies);

    if soldiers.len() > free.len() {
        crate::log_warning(&format!(
            "Deployment: {} soldiers but only {} bodies, skipping the rest",
            soldiers.len(),
            free.len()
        ));
    }

    for (index, (soldier, body)) in soldiers.iter().zip(free).enumerate() {
        bind_soldier(commands, bodies, body, soldier, index == 0, state, player, broadcasts);
    }
}
