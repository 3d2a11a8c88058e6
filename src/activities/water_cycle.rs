//! Water cycle phase sequencer.
//!
//! The page's animation loop feeds frame deltas into `update`. Each phase
//! reports normalized progress to its own callback and, once complete, the
//! controller advances to the next phase (wrapping after the last one) and
//! notifies phase-change listeners.
//!
//! At most one transition happens per `update` call. A stalled loop that
//! delivers a huge delta finishes the current phase and drops the rest.

use crate::activities::error::ActivityError;
use crate::activities::listeners::{ListenerId, Listeners};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterCyclePhase {
    Evaporation,
    Condensation,
    Precipitation,
}

impl WaterCyclePhase {
    pub const ALL: [WaterCyclePhase; 3] = [
        WaterCyclePhase::Evaporation,
        WaterCyclePhase::Condensation,
        WaterCyclePhase::Precipitation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WaterCyclePhase::Evaporation => "evaporation",
            WaterCyclePhase::Condensation => "condensation",
            WaterCyclePhase::Precipitation => "precipitation",
        }
    }

    /// Button label shown on the phase selector.
    pub fn label(self) -> &'static str {
        match self {
            WaterCyclePhase::Evaporation => "Evaporación",
            WaterCyclePhase::Condensation => "Condensación",
            WaterCyclePhase::Precipitation => "Precipitación",
        }
    }

    /// Short narration of what happens during the phase.
    pub fn description(self) -> &'static str {
        match self {
            WaterCyclePhase::Evaporation => {
                "El agua se calienta y asciende como vapor ligero y brillante."
            }
            WaterCyclePhase::Condensation => {
                "Las partículas se enfrían en altura formando nubes voluminosas."
            }
            WaterCyclePhase::Precipitation => {
                "Las gotas se unen y caen nuevamente a la superficie como lluvia."
            }
        }
    }
}

impl fmt::Display for WaterCyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WaterCyclePhase {
    type Err = ActivityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WaterCyclePhase::ALL
            .into_iter()
            .find(|p| p.as_str() == s.trim())
            .ok_or_else(|| ActivityError::UnknownPhase(s.to_string()))
    }
}

type ProgressCallback = dyn FnMut(f64);
type PhaseListener = dyn FnMut(WaterCyclePhase);

/// One stage of the cycle: how long it lasts and who hears its progress.
pub struct PhaseConfig {
    pub phase: WaterCyclePhase,
    /// Seconds. Must be finite and positive.
    pub duration: f64,
    pub on_update: Box<ProgressCallback>,
}

impl PhaseConfig {
    pub fn new(
        phase: WaterCyclePhase,
        duration: f64,
        on_update: impl FnMut(f64) + 'static,
    ) -> Self {
        Self {
            phase,
            duration,
            on_update: Box::new(on_update),
        }
    }
}

impl fmt::Debug for PhaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseConfig")
            .field("phase", &self.phase)
            .field("duration", &self.duration)
            .finish_non_exhaustive()
    }
}

/// Durations for the standard three-phase sequence.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhaseDurations {
    pub evaporation: f64,
    pub condensation: f64,
    pub precipitation: f64,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            evaporation: 4.0,
            condensation: 4.0,
            precipitation: 3.5,
        }
    }
}

impl PhaseDurations {
    pub fn get(&self, phase: WaterCyclePhase) -> f64 {
        match phase {
            WaterCyclePhase::Evaporation => self.evaporation,
            WaterCyclePhase::Condensation => self.condensation,
            WaterCyclePhase::Precipitation => self.precipitation,
        }
    }
}

/// Build evaporation → condensation → precipitation, each writing its
/// progress into `progress` so the page can poll it between frames.
pub fn default_phases(durations: &PhaseDurations, progress: &Rc<Cell<f64>>) -> Vec<PhaseConfig> {
    WaterCyclePhase::ALL
        .into_iter()
        .map(|phase| {
            let sink = Rc::clone(progress);
            PhaseConfig::new(phase, durations.get(phase), move |p| sink.set(p))
        })
        .collect()
}

pub struct WaterCycleController {
    phases: Vec<PhaseConfig>,
    listeners: Listeners<PhaseListener>,
    phase_index: usize,
    elapsed: f64,
}

impl WaterCycleController {
    pub fn new(phases: Vec<PhaseConfig>) -> Result<Self, ActivityError> {
        if phases.is_empty() {
            return Err(ActivityError::EmptyPhaseList);
        }
        if let Some(bad) = phases
            .iter()
            .find(|p| !(p.duration.is_finite() && p.duration > 0.0))
        {
            return Err(ActivityError::InvalidDuration {
                phase: bad.phase.to_string(),
                duration: bad.duration,
            });
        }
        Ok(Self {
            phases,
            listeners: Listeners::new(),
            phase_index: 0,
            elapsed: 0.0,
        })
    }

    pub fn current_phase(&self) -> WaterCyclePhase {
        self.phases[self.phase_index].phase
    }

    /// Seconds spent in the current phase since it was entered.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Configured phase names, in sequence order.
    pub fn phases(&self) -> Vec<WaterCyclePhase> {
        self.phases.iter().map(|p| p.phase).collect()
    }

    /// Subscribe to phase changes. The listener hears the current phase
    /// right away, then every later change including wraparound.
    pub fn on_phase_change(&mut self, listener: impl FnMut(WaterCyclePhase) + 'static) -> ListenerId {
        let mut listener = listener;
        listener(self.current_phase());
        self.listeners.subscribe(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Jump straight to `phase`. Re-selecting the current phase keeps its
    /// elapsed time and notifies nobody.
    pub fn set_phase(&mut self, phase: WaterCyclePhase) -> Result<(), ActivityError> {
        let target = self
            .phases
            .iter()
            .position(|p| p.phase == phase)
            .ok_or_else(|| ActivityError::PhaseNotConfigured(phase.to_string()))?;
        if target == self.phase_index {
            return Ok(());
        }
        log::debug!("water cycle: jump {} -> {}", self.current_phase(), phase);
        self.phase_index = target;
        self.elapsed = 0.0;
        self.emit();
        Ok(())
    }

    /// Advance the active phase by `delta_seconds`. Returns the phase that
    /// received this update (the one before any transition it caused).
    pub fn update(&mut self, delta_seconds: f64) -> WaterCyclePhase {
        // Also rejects NaN.
        if !(delta_seconds > 0.0) {
            return self.current_phase();
        }

        let config = &mut self.phases[self.phase_index];
        let updated = config.phase;
        self.elapsed += delta_seconds;
        let progress = (self.elapsed / config.duration).min(1.0);
        (config.on_update)(progress);

        if progress >= 1.0 {
            self.advance_phase();
        }
        updated
    }

    fn advance_phase(&mut self) {
        self.elapsed = 0.0;
        self.phase_index = (self.phase_index + 1) % self.phases.len();
        log::debug!("water cycle: advanced to {}", self.current_phase());
        self.emit();
    }

    fn emit(&mut self) {
        let phase = self.current_phase();
        self.listeners.for_each_mut(|listener| listener(phase));
    }
}

impl fmt::Debug for WaterCycleController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaterCycleController")
            .field("phases", &self.phases)
            .field("phase_index", &self.phase_index)
            .field("elapsed", &self.elapsed)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
