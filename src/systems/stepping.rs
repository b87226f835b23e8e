//! Step counting and the optional step limit.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::resources::{SimulationClock, SimulationConfig};

/// Count one physics step.
///
/// Runs once per fixed tick, after the engine has stepped. Logs once when the
/// configured warm-up count is reached.
///
/// # Arguments
/// * `config` - Simulation configuration (warm-up count)
/// * `clock` - Step counter to advance
pub fn advance_clock(config: Res<SimulationConfig>, mut clock: ResMut<SimulationClock>) {
    clock.steps += 1;

    if config.warmup_steps > 0 && !clock.warmed_up && clock.steps >= config.warmup_steps {
        clock.warmed_up = true;
        info!("settled after {} warm-up steps", clock.steps);
    }
}

/// Disconnect once `max_steps` steps have been taken.
///
/// Fires on the exact step so the exit is requested a single time.
pub fn stop_at_step_limit(
    config: Res<SimulationConfig>,
    clock: Res<SimulationClock>,
    mut exit: MessageWriter<AppExit>,
) {
    if config.max_steps == Some(clock.steps) {
        info!("step limit of {} reached", clock.steps);
        exit.write(AppExit::Success);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock_app(config: SimulationConfig) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(config)
            .init_resource::<SimulationClock>()
            .add_systems(FixedLast, (advance_clock, stop_at_step_limit).chain());
        app
    }

    #[test]
    fn test_warmup_reported_once() {
        let mut app = clock_app(SimulationConfig::default().with_warmup_steps(3));

        for _ in 0..2 {
            app.world_mut().run_schedule(FixedLast);
        }
        assert!(!app.world().resource::<SimulationClock>().warmed_up);

        for _ in 0..3 {
            app.world_mut().run_schedule(FixedLast);
        }
        let clock = app.world().resource::<SimulationClock>();
        assert_eq!(clock.steps, 5);
        assert!(clock.warmed_up);
    }

    #[test]
    fn test_step_limit_requests_exit() {
        let mut app = clock_app(SimulationConfig::default().with_max_steps(4));

        for _ in 0..3 {
            app.world_mut().run_schedule(FixedLast);
        }
        assert!(app.should_exit().is_none());

        app.world_mut().run_schedule(FixedLast);
        assert_eq!(app.should_exit(), Some(AppExit::Success));
    }

    #[test]
    fn test_no_limit_never_exits() {
        let mut app = clock_app(SimulationConfig::default());
        for _ in 0..100 {
            app.world_mut().run_schedule(FixedLast);
        }
        assert!(app.should_exit().is_none());
        assert_eq!(app.world().resource::<SimulationClock>().steps, 100);
    }
}
