//! Explora in-browser WASM server.
//!
//! The page's Web Worker constructs one `ExploraServer` and forwards
//! HTMX-style requests to `handle_request(method, path, query, body)`.
//! Routing uses `matchit`, the router engine behind Axum.
//!
//! The server owns all activity state (water cycle, grid robot, region map)
//! for as long as the worker keeps the handle alive. The 3D scenes stay in
//! JavaScript and only talk to this crate through the exported methods.

use wasm_bindgen::prelude::*;

pub mod activities;
pub mod routes;

use activities::ActivityError;
use activities::config::ActivityConfig;
use activities::session::Activities;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Menu,
    WaterPanel,
    WaterPhase,
    WaterUpdate,
    WaterState,
    WaterAnnouncements,
    RobotPanel,
    RobotCommand,
    RobotReset,
    RobotLog,
    MapRegions,
    MapSelect,
    MapDragStart,
    MapDragMove,
    MapDragEnd,
}

const ROUTES: [(&str, Route); 15] = [
    ("/api/menu", Route::Menu),
    ("/api/water/panel", Route::WaterPanel),
    ("/api/water/phase", Route::WaterPhase),
    ("/api/water/update", Route::WaterUpdate),
    ("/api/water/state", Route::WaterState),
    ("/api/water/announcements", Route::WaterAnnouncements),
    ("/api/robot/panel", Route::RobotPanel),
    ("/api/robot/command", Route::RobotCommand),
    ("/api/robot/reset", Route::RobotReset),
    ("/api/robot/log", Route::RobotLog),
    ("/api/map/regions", Route::MapRegions),
    ("/api/map/select", Route::MapSelect),
    ("/api/map/drag/start", Route::MapDragStart),
    ("/api/map/drag/move", Route::MapDragMove),
    ("/api/map/drag/end", Route::MapDragEnd),
];

#[wasm_bindgen]
pub struct ExploraServer {
    activities: Activities,
    router: matchit::Router<Route>,
}

#[wasm_bindgen]
impl ExploraServer {
    /// Server with the default activity configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<ExploraServer, JsError> {
        Ok(Self::from_config(ActivityConfig::default())?)
    }

    /// Server configured from a JSON object such as
    /// `{"grid_radius": 3, "snap_step": 0.25, "durations": {"evaporation": 5}}`.
    pub fn with_config(json: &str) -> Result<ExploraServer, JsError> {
        let config = ActivityConfig::from_json(json)?;
        Ok(Self::from_config(config)?)
    }

    /// Process an HTTP-like request and return an HTML fragment, or JSON
    /// for the polling endpoints.
    ///
    /// # Arguments
    /// * `method` — "GET" or "POST"
    /// * `path`   — URL path (e.g., "/api/robot/command")
    /// * `query`  — Query string (e.g., "?region=caribe")
    /// * `body`   — Form-encoded body. Empty string for GET requests.
    pub fn handle_request(&mut self, method: &str, path: &str, query: &str, body: &str) -> String {
        let route = match self.router.at(path) {
            Ok(matched) => *matched.value,
            Err(_) => return not_found(),
        };
        let a = &mut self.activities;

        match (route, method) {
            (Route::Menu, "GET") => routes::menu::handle(query),

            (Route::WaterPanel, "GET") => routes::water::handle_panel_get(a, query),
            (Route::WaterState, "GET") => routes::water::handle_state_get(a, query),
            (Route::WaterAnnouncements, "GET") => routes::water::handle_announcements_get(a, query),
            (Route::WaterPhase, "POST") => routes::water::handle_phase_post(a, body),
            (Route::WaterUpdate, "POST") => routes::water::handle_update_post(a, body),

            (Route::RobotPanel, "GET") => routes::robot::handle_panel_get(a, query),
            (Route::RobotLog, "GET") => routes::robot::handle_log_get(a, query),
            (Route::RobotCommand, "POST") => routes::robot::handle_command_post(a, body),
            (Route::RobotReset, "POST") => routes::robot::handle_reset_post(a, body),

            (Route::MapRegions, "GET") => routes::map::handle_regions_get(a, query),
            (Route::MapSelect, "POST") => routes::map::handle_select_post(a, body),
            (Route::MapDragStart, "POST") => routes::map::handle_drag_start_post(a, body),
            (Route::MapDragMove, "POST") => routes::map::handle_drag_move_post(a, body),
            (Route::MapDragEnd, "POST") => routes::map::handle_drag_end_post(a, body),

            _ => method_not_allowed(),
        }
    }

    /// Per-frame fast path for the water cycle animation loop. Skips
    /// routing and form parsing; returns the phase active after the update.
    pub fn tick(&mut self, delta_seconds: f64) -> String {
        self.activities.tick(delta_seconds).phase.to_string()
    }

    /// Progress of the active water cycle phase, in [0, 1].
    pub fn water_progress(&self) -> f64 {
        self.activities.water_snapshot().progress
    }
}

impl ExploraServer {
    pub fn from_config(config: ActivityConfig) -> Result<Self, ActivityError> {
        let mut router = matchit::Router::new();
        for (path, route) in ROUTES {
            router
                .insert(path, route)
                .map_err(|e| ActivityError::InvalidConfig(format!("route {path}: {e}")))?;
        }
        log::info!(
            "explora server ready (grid radius {}, snap step {})",
            config.grid_radius,
            config.snap_step
        );
        Ok(Self {
            activities: Activities::new(config)?,
            router,
        })
    }

    pub fn activities(&self) -> &Activities {
        &self.activities
    }
}

fn not_found() -> String {
    r#"<span class="text-red-600">404 — route not found</span>"#.to_string()
}

fn method_not_allowed() -> String {
    r#"<span class="text-red-600">405 — method not allowed</span>"#.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activities::robot::RobotState;
    use crate::activities::water_cycle::{PhaseDurations, WaterCyclePhase};

    fn server() -> ExploraServer {
        ExploraServer::from_config(ActivityConfig::default()).unwrap()
    }

    #[test]
    fn routes_menu() {
        let html = server().handle_request("GET", "/api/menu", "", "");
        assert!(html.contains("Bienvenido"));
    }

    #[test]
    fn returns_404_for_unknown_route() {
        let html = server().handle_request("GET", "/api/nonexistent", "", "");
        assert!(html.contains("404"));
    }

    #[test]
    fn returns_405_for_wrong_method() {
        let mut s = server();
        assert!(s.handle_request("POST", "/api/menu", "", "").contains("405"));
        assert!(s.handle_request("GET", "/api/robot/command", "", "").contains("405"));
    }

    #[test]
    fn routes_robot_scenario() {
        let mut s = ExploraServer::from_config(ActivityConfig {
            grid_radius: 1,
            ..ActivityConfig::default()
        })
        .unwrap();
        for cmd in ["forward", "forward", "right", "right", "back"] {
            s.handle_request("POST", "/api/robot/command", "", &format!("command={cmd}"));
        }
        assert_eq!(s.activities().robot().position(), RobotState { x: 1, y: 0 });
        let json = s.handle_request("GET", "/api/robot/log", "", "");
        assert!(json.contains("4-back"));
    }

    #[test]
    fn routes_water_update_and_tick() {
        let mut s = server();
        let json = s.handle_request("POST", "/api/water/update", "", "delta=4");
        assert!(json.contains("condensation"));
        assert_eq!(s.tick(1.0), "condensation");
        assert_eq!(s.water_progress(), 0.25);
        s.handle_request("POST", "/api/water/phase", "", "phase=evaporation");
        assert_eq!(
            s.activities().water().current_phase(),
            WaterCyclePhase::Evaporation
        );
    }

    #[test]
    fn routes_map_select() {
        let mut s = server();
        let html = s.handle_request("POST", "/api/map/select", "", "region=amazonas");
        assert!(html.contains("selva tropical"));
        let html = s.handle_request("GET", "/api/map/regions", "", "");
        assert!(html.contains(r#"data-region="amazonas""#));
    }

    #[test]
    fn rejects_invalid_config() {
        let config = ActivityConfig {
            durations: PhaseDurations {
                evaporation: 0.0,
                ..Default::default()
            },
            ..ActivityConfig::default()
        };
        assert!(ExploraServer::from_config(config).is_err());
    }
}
