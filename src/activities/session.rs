//! The activity session: one explicitly owned value holding every
//! controller the pages drive.
//!
//! `ExploraServer` owns exactly one `Activities` for the lifetime of the
//! page's worker. Tests build their own instead of resetting shared state.

use crate::activities::config::ActivityConfig;
use crate::activities::error::ActivityError;
use crate::activities::map::{
    self, DragSession, REGIONS, RegionState, Vector2, start_region_drag, toggle_region_selection,
    update_region_drag,
};
use crate::activities::robot::{RobotCommand, RobotSimulator, RobotState};
use crate::activities::water_cycle::{WaterCycleController, WaterCyclePhase, default_phases};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// What the water cycle page polls every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaterSnapshot {
    pub phase: WaterCyclePhase,
    pub progress: f64,
}

#[derive(Debug)]
pub struct Activities {
    config: ActivityConfig,
    water: WaterCycleController,
    progress: Rc<Cell<f64>>,
    announcements: Rc<RefCell<Vec<WaterCyclePhase>>>,
    robot: RobotSimulator,
    regions: Vec<RegionState>,
    selected: Option<String>,
    drag: Option<DragSession>,
}

impl Activities {
    pub fn new(config: ActivityConfig) -> Result<Self, ActivityError> {
        config.validate()?;
        let progress = Rc::new(Cell::new(0.0));
        let mut water = WaterCycleController::new(default_phases(&config.durations, &progress))?;

        let announcements = Rc::new(RefCell::new(Vec::new()));
        let queue = Rc::clone(&announcements);
        let sink = Rc::clone(&progress);
        water.on_phase_change(move |phase| {
            // Every new phase starts from zero progress.
            sink.set(0.0);
            queue.borrow_mut().push(phase);
        });

        Ok(Self {
            robot: RobotSimulator::new(config.grid_radius),
            regions: REGIONS.iter().map(|r| r.initial_state()).collect(),
            config,
            water,
            progress,
            announcements,
            selected: None,
            drag: None,
        })
    }

    // ── Water cycle ────────────────────────────────────────────────

    pub fn water(&self) -> &WaterCycleController {
        &self.water
    }

    pub fn water_snapshot(&self) -> WaterSnapshot {
        WaterSnapshot {
            phase: self.water.current_phase(),
            progress: self.progress.get(),
        }
    }

    /// Feed one frame's elapsed time into the cycle.
    pub fn tick(&mut self, delta_seconds: f64) -> WaterSnapshot {
        self.water.update(delta_seconds);
        self.water_snapshot()
    }

    pub fn jump_to(&mut self, phase: WaterCyclePhase) -> Result<(), ActivityError> {
        self.water.set_phase(phase)
    }

    /// Phases entered since the last drain, oldest first, for narration.
    pub fn drain_announcements(&mut self) -> Vec<WaterCyclePhase> {
        std::mem::take(&mut *self.announcements.borrow_mut())
    }

    // ── Robot ──────────────────────────────────────────────────────

    pub fn robot(&self) -> &RobotSimulator {
        &self.robot
    }

    pub fn run(&mut self, command: RobotCommand) -> RobotState {
        self.robot.execute(command)
    }

    pub fn reset_robot(&mut self) {
        self.robot.reset();
    }

    // ── Map ────────────────────────────────────────────────────────

    pub fn regions(&self) -> &[RegionState] {
        &self.regions
    }

    pub fn selected_region(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn active_drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Toggle selection of `id`. Returns the selection afterwards.
    pub fn select(&mut self, id: &str) -> Result<Option<&str>, ActivityError> {
        if map::find_region(id).is_none() {
            log::warn!("map: select of unknown region {:?}", id);
            return Err(ActivityError::UnknownRegion(id.to_string()));
        }
        self.selected = toggle_region_selection(self.selected.as_deref(), id);
        Ok(self.selected.as_deref())
    }

    /// Start dragging `id` from `pointer`. Replaces any unfinished drag.
    pub fn begin_drag(&mut self, id: &str, pointer: Vector2) -> Result<&DragSession, ActivityError> {
        let region = self
            .regions
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| ActivityError::UnknownRegion(id.to_string()))?;
        let session = start_region_drag(region, pointer, self.config.snap_step);
        log::debug!("map: drag {} from ({}, {})", id, pointer.x, pointer.y);
        Ok(self.drag.insert(session))
    }

    /// Position the dragged region would take for `pointer`. Does not move it.
    pub fn drag_to(&self, pointer: Vector2) -> Result<Vector2, ActivityError> {
        let session = self.drag.as_ref().ok_or(ActivityError::NoActiveDrag)?;
        Ok(update_region_drag(session, pointer))
    }

    /// Finish the drag, committing the region to its snapped position.
    /// Without a pointer the region keeps its current board position.
    pub fn end_drag(&mut self, pointer: Option<Vector2>) -> Result<RegionState, ActivityError> {
        let session = self.drag.take().ok_or(ActivityError::NoActiveDrag)?;
        let position = match pointer {
            Some(p) => update_region_drag(&session, p),
            None => session.start_position(),
        };
        let region = self
            .regions
            .iter_mut()
            .find(|r| r.id == session.region_id())
            .ok_or_else(|| ActivityError::UnknownRegion(session.region_id().to_string()))?;
        region.position = position;
        Ok(region.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Activities {
        Activities::new(ActivityConfig::default()).unwrap()
    }

    #[test]
    fn new_session_starts_everything_at_rest() {
        let mut a = fresh();
        assert_eq!(a.water().current_phase(), WaterCyclePhase::Evaporation);
        assert_eq!(a.robot().position(), RobotState::default());
        assert_eq!(a.robot().grid_radius(), 4);
        assert_eq!(a.regions().len(), 5);
        assert!(a.selected_region().is_none());
        // Subscribing announces the initial phase.
        assert_eq!(a.drain_announcements(), vec![WaterCyclePhase::Evaporation]);
        assert!(a.drain_announcements().is_empty());
    }

    #[test]
    fn tick_reports_progress_and_resets_it_on_transition() {
        let mut a = fresh();
        let snap = a.tick(1.0);
        assert_eq!(snap.phase, WaterCyclePhase::Evaporation);
        assert_eq!(snap.progress, 0.25);

        let snap = a.tick(3.0);
        assert_eq!(snap.phase, WaterCyclePhase::Condensation);
        assert_eq!(snap.progress, 0.0);
        a.drain_announcements();

        a.jump_to(WaterCyclePhase::Precipitation).unwrap();
        assert_eq!(a.drain_announcements(), vec![WaterCyclePhase::Precipitation]);
    }

    #[test]
    fn invalid_durations_fail_construction() {
        let mut config = ActivityConfig::default();
        config.durations.condensation = -1.0;
        assert!(matches!(
            Activities::new(config),
            Err(ActivityError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn oversized_grid_radius_fails_construction() {
        let config = ActivityConfig {
            grid_radius: 400,
            ..ActivityConfig::default()
        };
        assert!(matches!(
            Activities::new(config),
            Err(ActivityError::InvalidConfig(_))
        ));
    }

    #[test]
    fn robot_reset_keeps_configured_radius() {
        let mut a = Activities::new(ActivityConfig {
            grid_radius: 1,
            ..ActivityConfig::default()
        })
        .unwrap();
        a.run(RobotCommand::Forward);
        a.run(RobotCommand::Forward);
        assert_eq!(a.robot().position(), RobotState { x: 0, y: 1 });
        a.reset_robot();
        assert_eq!(a.robot().position(), RobotState::default());
        assert_eq!(a.robot().grid_radius(), 1);
    }

    #[test]
    fn selection_toggles_and_rejects_unknown_regions() {
        let mut a = fresh();
        assert_eq!(a.select("caribe").unwrap(), Some("caribe"));
        assert_eq!(a.select("caribe").unwrap(), None);
        assert_eq!(a.select("andina").unwrap(), Some("andina"));
        assert_eq!(
            a.select("atlantis").unwrap_err(),
            ActivityError::UnknownRegion("atlantis".into())
        );
        assert_eq!(a.selected_region(), Some("andina"));
    }

    #[test]
    fn drag_commits_snapped_position() {
        let mut a = fresh();
        // andina starts at (-1.5, 0.5)
        a.begin_drag("andina", Vector2::new(0.0, 0.0)).unwrap();
        assert_eq!(a.drag_to(Vector2::new(0.7, 1.2)).unwrap(), Vector2::new(-1.0, 1.5));
        let region = a.end_drag(Some(Vector2::new(1.1, -0.4))).unwrap();
        assert_eq!(region.position, Vector2::new(-0.5, 0.0));
        assert!(a.active_drag().is_none());
        let andina = a.regions().iter().find(|r| r.id == "andina").unwrap();
        assert_eq!(andina.position, Vector2::new(-0.5, 0.0));
    }

    #[test]
    fn drag_calls_without_session_fail() {
        let mut a = fresh();
        assert_eq!(a.drag_to(Vector2::default()), Err(ActivityError::NoActiveDrag));
        assert_eq!(a.end_drag(None), Err(ActivityError::NoActiveDrag));
        assert!(a.begin_drag("atlantis", Vector2::default()).is_err());
    }
}
