//! `/api/robot/*` routes — the grid robot page.

use crate::activities::robot::{RobotCommand, RobotSimulator};
use crate::activities::session::Activities;
use crate::routes::util::{activity_error_html, error_html, get_param, parse_form_body, to_json};

/// The board, rows from +radius (top) down to -radius.
fn render_grid(robot: &RobotSimulator) -> String {
    let radius = robot.grid_radius() as i32;
    let dim = robot.grid_dimension();
    let pos = robot.position();
    let mut html = String::with_capacity(4096);

    html.push_str(&format!(
        r#"<div class="grid aspect-square w-full mx-auto rounded-2xl overflow-hidden bg-slate-50" style="grid-template-columns: repeat({dim}, minmax(0, 1fr)); grid-template-rows: repeat({dim}, minmax(0, 1fr));">"#
    ));
    for row in (-radius..=radius).rev() {
        for col in -radius..=radius {
            if pos.x == col && pos.y == row {
                html.push_str(&format!(
                    r#"<div data-cell="{row}-{col}" class="border border-slate-200 flex items-center justify-center text-xs bg-emerald-500 text-white font-semibold shadow-inner">&#x1F916;</div>"#
                ));
            } else {
                html.push_str(&format!(
                    r#"<div data-cell="{row}-{col}" class="border border-slate-200 bg-white"></div>"#
                ));
            }
        }
    }
    html.push_str("</div>");
    html.push_str(&format!(
        r#"<div class="text-center text-sm text-slate-500">Posición actual: <span class="font-semibold text-slate-800">({}, {})</span></div>"#,
        pos.x, pos.y
    ));
    html
}

fn render_log(robot: &RobotSimulator) -> String {
    let log = robot.movement_log();
    let mut html = String::with_capacity(256 + log.len() * 160);
    html.push_str(r#"<aside class="rounded-2xl border border-slate-200 bg-slate-50 p-4 space-y-3">"#);
    html.push_str(r#"<h2 class="text-lg font-semibold text-slate-800">Panel de movimientos</h2>"#);
    if log.is_empty() {
        html.push_str(r#"<p class="text-sm text-slate-500 italic">Sin movimientos aún.</p>"#);
    } else {
        html.push_str(r#"<ul class="space-y-2 max-h-72 overflow-y-auto pr-1">"#);
        for entry in &log {
            html.push_str(&format!(
                r#"<li id="move-{}" class="flex items-center justify-between bg-white rounded-xl px-3 py-2 text-sm"><span class="font-medium capitalize">{}</span><span class="text-xs text-slate-500">({}, {})</span></li>"#,
                entry.id, entry.command, entry.state.x, entry.state.y
            ));
        }
        html.push_str("</ul>");
    }
    html.push_str("</aside>");
    html
}

// ── GET /api/robot/panel ───────────────────────────────────────────

/// Command buttons, board and movement log in one fragment.
pub fn render_panel(activities: &Activities) -> String {
    let robot = activities.robot();
    let mut html = String::with_capacity(8192);
    html.push_str(r#"<div id="robot-panel" class="grid gap-6 lg:grid-cols-[2fr,1fr]">"#);
    html.push_str(r#"<div class="space-y-4"><div class="flex flex-wrap gap-2">"#);
    for command in RobotCommand::ALL {
        html.push_str(&format!(
            r##"<button hx-post="/api/robot/command" hx-vals='{{"command":"{}"}}' hx-target="#robot-panel" hx-swap="outerHTML" class="flex-1 min-w-[120px] px-4 py-2 rounded-xl bg-slate-900 text-white text-sm font-medium">{}</button>"##,
            command,
            command.label()
        ));
    }
    html.push_str(
        r##"<button hx-post="/api/robot/reset" hx-target="#robot-panel" hx-swap="outerHTML" class="px-4 py-2 rounded-xl border border-slate-300 text-sm font-medium text-slate-600">Reiniciar</button>"##,
    );
    html.push_str("</div>");
    html.push_str(&render_grid(robot));
    html.push_str("</div>");
    html.push_str(&render_log(robot));
    html.push_str("</div>");
    html
}

pub fn handle_panel_get(activities: &Activities, _query: &str) -> String {
    render_panel(activities)
}

// ── POST /api/robot/command ────────────────────────────────────────

/// Body: `command=forward|back|left|right`.
pub fn handle_command_post(activities: &mut Activities, body: &str) -> String {
    let params = parse_form_body(body);
    let Some(raw) = get_param(&params, "command") else {
        return error_html("Missing command parameter");
    };
    match raw.parse::<RobotCommand>() {
        Ok(command) => {
            activities.run(command);
            render_panel(activities)
        }
        Err(e) => {
            log::warn!("robot: {}", e);
            activity_error_html(&e)
        }
    }
}

// ── POST /api/robot/reset ──────────────────────────────────────────

pub fn handle_reset_post(activities: &mut Activities, _body: &str) -> String {
    activities.reset_robot();
    render_panel(activities)
}

// ── GET /api/robot/log ─────────────────────────────────────────────

/// JSON: `{"radius": n, "position": {x, y}, "log": [{id, command, state}]}`.
pub fn handle_log_get(activities: &Activities, _query: &str) -> String {
    let robot = activities.robot();
    to_json(&serde_json::json!({
        "radius": robot.grid_radius(),
        "position": robot.position(),
        "log": robot.movement_log(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activities::config::ActivityConfig;
    use crate::activities::robot::RobotState;

    fn with_radius(grid_radius: u32) -> Activities {
        Activities::new(ActivityConfig {
            grid_radius,
            ..ActivityConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn panel_renders_full_board() {
        let a = with_radius(4);
        let html = render_panel(&a);
        assert_eq!(html.matches("data-cell=").count(), 81);
        assert!(html.contains("repeat(9, minmax(0, 1fr))"));
        assert!(html.contains("Sin movimientos aún."));
        assert!(html.contains("Avanzar"));
        assert!(html.contains("Reiniciar"));
    }

    #[test]
    fn command_post_moves_and_logs() {
        let mut a = with_radius(1);
        handle_command_post(&mut a, "command=forward");
        let html = handle_command_post(&mut a, "command=forward");
        assert_eq!(a.robot().position(), RobotState { x: 0, y: 1 });
        assert!(html.contains(r#"id="move-0-forward""#));
        assert!(html.contains(r#"id="move-1-forward""#));
        assert!(html.contains("(0, 1)"));
    }

    #[test]
    fn command_post_rejects_bad_input() {
        let mut a = with_radius(1);
        assert!(handle_command_post(&mut a, "command=jump").contains("unknown robot command"));
        assert!(handle_command_post(&mut a, "").contains("Missing command"));
        assert!(a.robot().movement_log().is_empty());
    }

    #[test]
    fn reset_post_clears_log() {
        let mut a = with_radius(2);
        handle_command_post(&mut a, "command=left");
        let html = handle_reset_post(&mut a, "");
        assert!(html.contains("Sin movimientos aún."));
        assert_eq!(a.robot().grid_radius(), 2);
    }

    #[test]
    fn log_get_is_json() {
        let mut a = with_radius(2);
        a.run(RobotCommand::Right);
        let value: serde_json::Value = serde_json::from_str(&handle_log_get(&a, "")).unwrap();
        assert_eq!(value["radius"], 2);
        assert_eq!(value["position"]["x"], 1);
        assert_eq!(value["log"][0]["id"], "0-right");
        assert_eq!(value["log"][0]["command"], "right");
    }
}
