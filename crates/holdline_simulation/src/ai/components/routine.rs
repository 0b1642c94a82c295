//! Attack routine: the per-controller suspendable loop, as a phase machine.
//!
//! Cycle → Cooldown(pause_between_bursts) → Settle (one tick) → Cycle

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AttackPhase {
    /// Run one attack cycle this tick
    #[default]
    Cycle,
    /// Waiting out the pause between bursts
    Cooldown { remaining: f32 },
    /// Extra yield after the pause
    Settle,
}

/// What the routine should do this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineStep {
    Idle,
    RunCycle,
}

#[derive(Component, Debug, Clone, Default)]
pub struct AttackRoutine {
    pub phase: AttackPhase,
    /// Stopped by deactivation; resumed by activation
    pub halted: bool,
}

impl AttackRoutine {
    /// Advance the phase machine by `delta` seconds.
    pub fn advance(&mut self, delta: f32) -> RoutineStep {
        if self.halted {
            return RoutineStep::Idle;
        }

        match self.phase {
            AttackPhase::Cycle => RoutineStep::RunCycle,
            AttackPhase::Cooldown { remaining } => {
                let remaining = remaining - delta;
                self.phase = if remaining <= 0.0 {
                    AttackPhase::Settle
                } else {
                    AttackPhase::Cooldown { remaining }
                };
                RoutineStep::Idle
            }
            AttackPhase::Settle => {
                self.phase = AttackPhase::Cycle;
                RoutineStep::RunCycle
            }
        }
    }

    /// Cycle finished (fired or not): wait before the next one.
    pub fn start_cooldown(&mut self, pause: f32) {
        self.phase = AttackPhase::Cooldown { remaining: pause };
    }

    /// Cycle yielded early (no target, dummy, player body): try again next tick.
    pub fn yield_cycle(&mut self) {
        self.phase = AttackPhase::Cycle;
    }

    pub fn halt(&mut self) {
        self.halted = true;
        self.phase = AttackPhase::Cycle;
    }

    pub fn resume(&mut self) {
        self.halted = false;
    }

    pub fn is_running(&self) -> bool {
        !self.halted
    }
}
