//! Grid robot — a bounded walker that remembers every command it was given.
//!
//! Coordinates are clamped per axis to `[-limit, limit]`. A move into the
//! wall still lands in the history, with an unchanged position.

use crate::activities::error::ActivityError;
use crate::activities::listeners::{ListenerId, Listeners};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Grid half-width the activity page uses when nothing else is configured.
pub const DEFAULT_GRID_RADIUS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotCommand {
    Forward,
    Back,
    Left,
    Right,
}

impl RobotCommand {
    pub const ALL: [RobotCommand; 4] = [
        RobotCommand::Forward,
        RobotCommand::Back,
        RobotCommand::Left,
        RobotCommand::Right,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RobotCommand::Forward => "forward",
            RobotCommand::Back => "back",
            RobotCommand::Left => "left",
            RobotCommand::Right => "right",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RobotCommand::Forward => "Avanzar",
            RobotCommand::Back => "Retroceder",
            RobotCommand::Left => "Izquierda",
            RobotCommand::Right => "Derecha",
        }
    }

    /// Unit step as (dx, dy). Forward is +y.
    pub fn delta(self) -> (i32, i32) {
        match self {
            RobotCommand::Forward => (0, 1),
            RobotCommand::Back => (0, -1),
            RobotCommand::Left => (-1, 0),
            RobotCommand::Right => (1, 0),
        }
    }
}

impl fmt::Display for RobotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RobotCommand {
    type Err = ActivityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RobotCommand::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| ActivityError::UnknownCommand(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RobotState {
    pub x: i32,
    pub y: i32,
}

/// One row of the movement panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovementLogEntry {
    /// `{index}-{command}`, unique within one history.
    pub id: String,
    pub command: RobotCommand,
    pub state: RobotState,
}

type ChangeListener = dyn FnMut(RobotState, RobotCommand);

pub struct RobotSimulator {
    limit: i32,
    state: RobotState,
    history: Vec<(RobotCommand, RobotState)>,
    listeners: Listeners<ChangeListener>,
}

impl Default for RobotSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_RADIUS)
    }
}

impl RobotSimulator {
    pub fn new(limit: u32) -> Self {
        Self {
            // Radii past i32::MAX would never be reachable from the origin anyway.
            limit: i32::try_from(limit).unwrap_or(i32::MAX),
            state: RobotState::default(),
            history: Vec::new(),
            listeners: Listeners::new(),
        }
    }

    pub fn grid_radius(&self) -> u32 {
        self.limit.unsigned_abs()
    }

    /// Cells per side of the square board.
    pub fn grid_dimension(&self) -> u32 {
        self.grid_radius().saturating_mul(2).saturating_add(1)
    }

    pub fn position(&self) -> RobotState {
        self.state
    }

    pub fn movement_log(&self) -> Vec<MovementLogEntry> {
        self.history
            .iter()
            .enumerate()
            .map(|(index, (command, state))| MovementLogEntry {
                id: format!("{}-{}", index, command),
                command: *command,
                state: *state,
            })
            .collect()
    }

    pub fn on_change(&mut self, listener: impl FnMut(RobotState, RobotCommand) + 'static) -> ListenerId {
        self.listeners.subscribe(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn forward(&mut self) -> RobotState {
        self.execute(RobotCommand::Forward)
    }

    pub fn back(&mut self) -> RobotState {
        self.execute(RobotCommand::Back)
    }

    pub fn left(&mut self) -> RobotState {
        self.execute(RobotCommand::Left)
    }

    pub fn right(&mut self) -> RobotState {
        self.execute(RobotCommand::Right)
    }

    /// Apply one command: step, clamp, record, notify.
    pub fn execute(&mut self, command: RobotCommand) -> RobotState {
        let (dx, dy) = command.delta();
        let next = RobotState {
            x: self.clamp(self.state.x.saturating_add(dx)),
            y: self.clamp(self.state.y.saturating_add(dy)),
        };
        if next == self.state {
            log::debug!("robot: {} blocked at ({}, {})", command, next.x, next.y);
        }
        self.state = next;
        self.history.push((command, next));
        self.listeners.for_each_mut(|listener| listener(next, command));
        next
    }

    /// Back to the origin with an empty history. Listeners stay subscribed.
    pub fn reset(&mut self) {
        self.state = RobotState::default();
        self.history.clear();
    }

    fn clamp(&self, value: i32) -> i32 {
        value.clamp(-self.limit, self.limit)
    }
}

impl fmt::Debug for RobotSimulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RobotSimulator")
            .field("limit", &self.limit)
            .field("state", &self.state)
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn at(x: i32, y: i32) -> RobotState {
        RobotState { x, y }
    }

    #[test]
    fn runs_basic_commands_within_limits() {
        let mut sim = RobotSimulator::new(1);
        assert_eq!(sim.position(), at(0, 0));
        sim.forward();
        sim.forward();
        assert_eq!(sim.position(), at(0, 1));
        sim.right();
        assert_eq!(sim.position(), at(1, 1));
        sim.right(); // would leave the grid
        assert_eq!(sim.position(), at(1, 1));
        sim.back();
        assert_eq!(sim.position(), at(1, 0));
    }

    #[test]
    fn records_movement_history() {
        let mut sim = RobotSimulator::new(2);
        sim.forward();
        sim.left();
        let log = sim.movement_log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].command, RobotCommand::Forward);
        assert_eq!(log[0].state, at(0, 1));
        assert_eq!(log[0].id, "0-forward");
        assert_eq!(log[1].command, RobotCommand::Left);
        assert_eq!(log[1].state, at(-1, 1));
        assert_eq!(log[1].id, "1-left");
    }

    #[test]
    fn blocked_move_is_still_logged() {
        let mut sim = RobotSimulator::new(0);
        let returned = sim.left();
        assert_eq!(returned, at(0, 0));
        assert_eq!(sim.movement_log().len(), 1);
        assert_eq!(sim.movement_log()[0].state, at(0, 0));
    }

    #[test]
    fn stays_inside_bounds_for_long_walks() {
        for limit in [0u32, 1, 2, 5] {
            let mut sim = RobotSimulator::new(limit);
            let bound = limit as i32;
            // Push into every wall for longer than the board is wide, then wander.
            let mut commands = Vec::new();
            for command in RobotCommand::ALL {
                commands.extend(std::iter::repeat_n(command, limit as usize * 2 + 3));
            }
            commands.extend((0..100).map(|i| RobotCommand::ALL[(i * i + i / 3) % 4]));

            let mut returned = Vec::new();
            for command in &commands {
                let state = sim.execute(*command);
                assert!(
                    state.x.abs() <= bound && state.y.abs() <= bound,
                    "limit {limit}: {state:?} escaped the grid"
                );
                returned.push(state);
            }
            let log = sim.movement_log();
            assert_eq!(log.len(), commands.len());
            let logged: Vec<_> = log.iter().map(|e| e.state).collect();
            assert_eq!(logged, returned);
        }
    }

    #[test]
    fn position_is_a_copy() {
        let mut sim = RobotSimulator::default();
        let mut snapshot = sim.position();
        snapshot.x = 99;
        assert_eq!(sim.position(), at(0, 0));
        sim.forward();
        assert_eq!(snapshot, at(99, 0));
    }

    #[test]
    fn listeners_hear_each_move_until_unsubscribed() {
        let mut sim = RobotSimulator::new(2);
        let heard = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&heard);
        let id = sim.on_change(move |state, command| sink.borrow_mut().push((state, command)));

        sim.forward();
        sim.right();
        assert!(sim.unsubscribe(id));
        sim.back();

        assert_eq!(
            *heard.borrow(),
            vec![(at(0, 1), RobotCommand::Forward), (at(1, 1), RobotCommand::Right)]
        );
    }

    #[test]
    fn reset_clears_history_and_keeps_radius() {
        let mut sim = RobotSimulator::new(2);
        sim.forward();
        sim.reset();
        assert_eq!(sim.position(), at(0, 0));
        assert!(sim.movement_log().is_empty());
        assert_eq!(sim.grid_radius(), 2);
        assert_eq!(sim.grid_dimension(), 5);
    }

    #[test]
    fn parses_commands() {
        assert_eq!("back".parse::<RobotCommand>(), Ok(RobotCommand::Back));
        assert!("jump".parse::<RobotCommand>().is_err());
    }
}
