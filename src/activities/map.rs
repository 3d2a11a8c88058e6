//! Region map — drag/snap and selection helpers plus the region catalog.
//!
//! The helpers are pure: a `DragSession` snapshots where a drag began and
//! every pointer update is computed from that snapshot alone.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionState {
    pub id: String,
    pub position: Vector2,
}

/// Starting conditions of one drag. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    region_id: String,
    start_pointer: Vector2,
    start_position: Vector2,
    snap_step: f64,
}

impl DragSession {
    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    pub fn start_pointer(&self) -> Vector2 {
        self.start_pointer
    }

    pub fn start_position(&self) -> Vector2 {
        self.start_position
    }

    /// Zero (or negative) disables snapping.
    pub fn snap_step(&self) -> f64 {
        self.snap_step
    }
}

pub fn start_region_drag(region: &RegionState, pointer: Vector2, snap_step: f64) -> DragSession {
    DragSession {
        region_id: region.id.clone(),
        start_pointer: pointer,
        start_position: region.position,
        snap_step,
    }
}

/// Where the region should sit for the given pointer, snapped to the
/// session's grid when it has one.
pub fn update_region_drag(session: &DragSession, pointer: Vector2) -> Vector2 {
    let next = Vector2 {
        x: session.start_position.x + (pointer.x - session.start_pointer.x),
        y: session.start_position.y + (pointer.y - session.start_pointer.y),
    };
    let step = session.snap_step;
    if step > 0.0 {
        Vector2 {
            x: (next.x / step).round() * step,
            y: (next.y / step).round() * step,
        }
    } else {
        next
    }
}

/// Clicking the selected region clears the selection; anything else selects it.
pub fn toggle_region_selection(current: Option<&str>, target: &str) -> Option<String> {
    if current == Some(target) {
        None
    } else {
        Some(target.to_string())
    }
}

/// Static description of one region on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub color: u32,
    /// Initial board position (x, z on the 3D plane).
    pub position: Vector2,
    pub emoji: &'static str,
    pub fun_fact: &'static str,
}

impl RegionInfo {
    /// `#rrggbb` form of `color`.
    pub fn css_color(&self) -> String {
        format!("#{:06x}", self.color & 0xff_ffff)
    }

    /// Sentence read aloud when the region is selected.
    pub fn narration(&self) -> String {
        format!(
            "{}. {}. Dato curioso: {}",
            self.label, self.description, self.fun_fact
        )
    }

    pub fn initial_state(&self) -> RegionState {
        RegionState {
            id: self.id.to_string(),
            position: self.position,
        }
    }
}

pub static REGIONS: [RegionInfo; 5] = [
    RegionInfo {
        id: "andina",
        label: "Región Andina",
        description: "Cordillera con nevados y clima variable",
        color: 0x7c3aed,
        position: Vector2::new(-1.5, 0.5),
        emoji: "\u{1F3D4}\u{FE0F}", // 🏔️
        fun_fact: "Es hogar de páramos y volcanes nevados.",
    },
    RegionInfo {
        id: "caribe",
        label: "Región Caribe",
        description: "Playas cálidas y mares turquesa",
        color: 0x06b6d4,
        position: Vector2::new(0.0, 1.2),
        emoji: "\u{1F3D6}\u{FE0F}", // 🏖️
        fun_fact: "Aquí está la muralla histórica de Cartagena.",
    },
    RegionInfo {
        id: "pacifico",
        label: "Región Pacífica",
        description: "Selva húmeda y manglares",
        color: 0x22c55e,
        position: Vector2::new(-2.0, -0.6),
        emoji: "\u{1F334}", // 🌴
        fun_fact: "Un lugar perfecto para avistar ballenas jorobadas.",
    },
    RegionInfo {
        id: "orinoquia",
        label: "Orinoquía",
        description: "Llanuras extensas llenas de ganadería",
        color: 0xeab308,
        position: Vector2::new(1.8, -0.4),
        emoji: "\u{1F404}", // 🐄
        fun_fact: "Sus atardeceres llaneros son famosos por sus colores.",
    },
    RegionInfo {
        id: "amazonas",
        label: "Amazonas",
        description: "Biodiversidad única y ríos gigantes",
        color: 0xf59e0b,
        position: Vector2::new(2.5, -1.2),
        emoji: "\u{1F406}", // 🐆
        fun_fact: "Contiene la selva tropical más grande del planeta.",
    },
];

pub fn find_region(id: &str) -> Option<&'static RegionInfo> {
    REGIONS.iter().find(|r| r.id == id)
}
