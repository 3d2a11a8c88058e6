//! `/api/water/*` routes — the water cycle page.
//!
//! The 3D scene lives in the page; it pushes frame deltas here and reads
//! back the active phase and its progress to drive the animation.

use crate::activities::session::Activities;
use crate::activities::water_cycle::WaterCyclePhase;
use crate::routes::util::{
    activity_error_html, error_html, error_json, get_param, parse_form_body, parse_param, to_json,
};

/// Active button colour per phase.
fn phase_classes(phase: WaterCyclePhase) -> &'static str {
    match phase {
        WaterCyclePhase::Evaporation => "bg-sky-500 text-white",
        WaterCyclePhase::Condensation => "bg-slate-500 text-white",
        WaterCyclePhase::Precipitation => "bg-blue-600 text-white",
    }
}

const IDLE_BUTTON: &str = "bg-white border border-slate-200 text-slate-700";

// ── GET /api/water/panel ───────────────────────────────────────────

/// Phase selector buttons plus the narration for the active phase.
pub fn render_panel(activities: &Activities) -> String {
    let water = activities.water();
    let current = water.current_phase();
    let mut html = String::with_capacity(1024);

    html.push_str(r#"<div id="water-panel" class="space-y-4">"#);
    html.push_str(r#"<div class="flex flex-wrap gap-2">"#);
    for phase in water.phases() {
        let classes = if phase == current {
            phase_classes(phase)
        } else {
            IDLE_BUTTON
        };
        html.push_str(&format!(
            r##"<button hx-post="/api/water/phase" hx-vals='{{"phase":"{}"}}' hx-target="#water-panel" hx-swap="outerHTML" class="px-4 py-2 rounded-lg text-sm font-medium transition {}">{}</button>"##,
            phase,
            classes,
            phase.label()
        ));
    }
    html.push_str("</div>");
    html.push_str(&format!(
        r#"<p class="text-slate-600 text-sm" data-phase="{}">{}</p>"#,
        current,
        current.description()
    ));
    html.push_str("</div>");
    html
}

pub fn handle_panel_get(activities: &Activities, _query: &str) -> String {
    render_panel(activities)
}

// ── POST /api/water/phase ──────────────────────────────────────────

/// Body: `phase={name}`. Jumps the cycle and re-renders the panel.
pub fn handle_phase_post(activities: &mut Activities, body: &str) -> String {
    let params = parse_form_body(body);
    let phase = match get_param(&params, "phase").map(str::parse::<WaterCyclePhase>) {
        Some(Ok(p)) => p,
        Some(Err(e)) => {
            log::warn!("water: {}", e);
            return activity_error_html(&e);
        }
        None => return error_html("Missing phase parameter"),
    };
    if let Err(e) = activities.jump_to(phase) {
        return activity_error_html(&e);
    }
    render_panel(activities)
}

// ── POST /api/water/update ─────────────────────────────────────────

/// Body: `delta={seconds}`. Returns `{"phase": ..., "progress": ...}`.
pub fn handle_update_post(activities: &mut Activities, body: &str) -> String {
    let params = parse_form_body(body);
    match parse_param::<f64>(&params, "delta") {
        Some(delta) => to_json(&activities.tick(delta)),
        None => error_json("Missing or invalid delta parameter"),
    }
}

// ── GET /api/water/state ───────────────────────────────────────────

pub fn handle_state_get(activities: &Activities, _query: &str) -> String {
    to_json(&activities.water_snapshot())
}

// ── GET /api/water/announcements ───────────────────────────────────

/// Phases entered since the last poll, each with its narration text.
/// Draining: a second call returns an empty list.
pub fn handle_announcements_get(activities: &mut Activities, _query: &str) -> String {
    let items: Vec<_> = activities
        .drain_announcements()
        .into_iter()
        .map(|phase| {
            serde_json::json!({
                "phase": phase,
                "text": phase.description(),
            })
        })
        .collect();
    to_json(&items)
}
