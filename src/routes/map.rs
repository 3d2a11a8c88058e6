//! `/api/map/*` routes — the interactive region map.
//!
//! Pointer picking against the 3D meshes happens in the page. These routes
//! receive the picked region id and board-space pointer coordinates.

use crate::activities::map::{RegionInfo, find_region};
use crate::activities::session::Activities;
use crate::routes::util::{
    activity_error_html, error_html, error_json, escape_html, get_param, parse_form_body,
    parse_pointer, to_json,
};
use serde::Serialize;

fn render_info_card(region: &RegionInfo) -> String {
    let color = region.css_color();
    format!(
        r#"<div class="rounded-3xl p-6 text-white shadow-xl" style="background: linear-gradient(135deg, {color}, {color}cc);" data-region="{id}" data-narration="{narration}"><div class="text-6xl mb-3 text-center">{emoji}</div><h2 class="text-3xl font-black mb-1 text-center">{label}</h2><p class="text-lg font-semibold text-center mb-4">{description}</p><p class="bg-white/20 rounded-2xl p-4 text-sm font-bold text-center">&#x1F4A1; {fun_fact}</p></div>"#,
        color = color,
        id = region.id,
        narration = escape_html(&region.narration()),
        emoji = region.emoji,
        label = escape_html(region.label),
        description = escape_html(region.description),
        fun_fact = escape_html(region.fun_fact),
    )
}

fn render_placeholder() -> String {
    r#"<div class="rounded-3xl p-6 bg-white/80 text-slate-700 text-center"><p class="text-lg font-bold">Toca una región del mapa para descubrir sus secretos.</p></div>"#
        .to_string()
}

// ── GET /api/map/regions ───────────────────────────────────────────

/// Region list with the current selection highlighted, followed by the
/// info card for the selected region (or a hint when nothing is selected).
pub fn render_regions(activities: &Activities) -> String {
    let selected = activities.selected_region();
    let mut html = String::with_capacity(4096);
    html.push_str(r#"<div id="map-panel" class="space-y-4">"#);
    html.push_str(r#"<div class="rounded-3xl bg-white/90 p-4"><h3 class="font-black text-lg text-slate-800 mb-3">&#x1F3AF; Todas las regiones</h3>"#);
    for state in activities.regions() {
        let Some(info) = find_region(&state.id) else {
            continue;
        };
        let classes = if selected == Some(info.id) {
            "bg-gradient-to-r from-purple-500 to-pink-500 text-white scale-105"
        } else {
            "bg-slate-100 text-slate-700"
        };
        html.push_str(&format!(
            r##"<button hx-post="/api/map/select" hx-vals='{{"region":"{id}"}}' hx-target="#map-panel" hx-swap="outerHTML" data-x="{x}" data-y="{y}" class="w-full text-left px-4 py-3 rounded-2xl font-bold mb-2 {classes}"><span class="text-2xl mr-2">{emoji}</span>{label}</button>"##,
            id = info.id,
            x = state.position.x,
            y = state.position.y,
            classes = classes,
            emoji = info.emoji,
            label = escape_html(info.label),
        ));
    }
    html.push_str("</div>");
    match selected.and_then(find_region) {
        Some(info) => html.push_str(&render_info_card(info)),
        None => html.push_str(&render_placeholder()),
    }
    html.push_str("</div>");
    html
}

pub fn handle_regions_get(activities: &Activities, _query: &str) -> String {
    render_regions(activities)
}

// ── POST /api/map/select ───────────────────────────────────────────

/// Body: `region={id}`. Toggles the selection and re-renders the panel.
pub fn handle_select_post(activities: &mut Activities, body: &str) -> String {
    let params = parse_form_body(body);
    let Some(id) = get_param(&params, "region").filter(|s| !s.is_empty()) else {
        return error_html("Missing region parameter");
    };
    if let Err(e) = activities.select(id) {
        return activity_error_html(&e);
    }
    render_regions(activities)
}

#[derive(Serialize)]
struct DragResponse<'a> {
    region: &'a str,
    x: f64,
    y: f64,
}

// ── POST /api/map/drag/start ───────────────────────────────────────

/// Body: `region={id}&x={px}&y={py}`.
pub fn handle_drag_start_post(activities: &mut Activities, body: &str) -> String {
    let params = parse_form_body(body);
    let Some(pointer) = parse_pointer(&params) else {
        return error_json("Missing or invalid pointer coordinates");
    };
    let id = get_param(&params, "region").unwrap_or("");
    match activities.begin_drag(id, pointer) {
        Ok(session) => to_json(&DragResponse {
            region: session.region_id(),
            x: session.start_position().x,
            y: session.start_position().y,
        }),
        Err(e) => error_json(&e.to_string()),
    }
}

// ── POST /api/map/drag/move ────────────────────────────────────────

/// Body: `x={px}&y={py}`. Returns the snapped position without moving
/// the region.
pub fn handle_drag_move_post(activities: &Activities, body: &str) -> String {
    let params = parse_form_body(body);
    let Some(pointer) = parse_pointer(&params) else {
        return error_json("Missing or invalid pointer coordinates");
    };
    let Some(session) = activities.active_drag() else {
        return error_json("no region drag in progress");
    };
    let region = session.region_id().to_string();
    match activities.drag_to(pointer) {
        Ok(p) => to_json(&DragResponse {
            region: &region,
            x: p.x,
            y: p.y,
        }),
        Err(e) => error_json(&e.to_string()),
    }
}

// ── POST /api/map/drag/end ─────────────────────────────────────────

/// Body: optional `x={px}&y={py}`. Commits the region to its final spot.
pub fn handle_drag_end_post(activities: &mut Activities, body: &str) -> String {
    let params = parse_form_body(body);
    match activities.end_drag(parse_pointer(&params)) {
        Ok(state) => to_json(&DragResponse {
            region: &state.id,
            x: state.position.x,
            y: state.position.y,
        }),
        Err(e) => error_json(&e.to_string()),
    }
}
