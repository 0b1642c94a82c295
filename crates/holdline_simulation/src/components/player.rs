//! Player control marker component

use bevy::prelude::Component;

/// Marker for the player-controlled actor
///
/// AI systems skip actors whose controller is player-controlled; this marker
/// is what input/camera code on the host side queries for.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;
