use crate::bridge::model::{camera_badge, door_badge, mode_badge, motion_badge, Badge, DashboardModel};
use homecore::devices::{DoorStatus, DeviceKey};
use homecore::{ActionRequest, SecurityMode};

const STYLESHEET: &str = r#"
body { background-color: #1e1e1e; color: #f0f0f0; font-family: sans-serif; margin: 0; padding: 1rem 2rem; }
.layout { display: grid; grid-template-columns: 3fr 2fr; gap: 1rem; }
.card { background-color: #2d2d2d; border-radius: 8px; padding: 1.2rem; box-shadow: 0 4px 6px rgba(0, 0, 0, 0.3); margin-bottom: 1rem; border-left: 4px solid #4d4dff; }
.alert-card { background-color: #2d2d2d; border-radius: 8px; padding: 1.2rem; box-shadow: 0 4px 6px rgba(0, 0, 0, 0.3); margin-bottom: 1rem; border-left: 4px solid #ff4d4d; }
.security-title { color: #f0f0f0; font-weight: 600; margin-bottom: 1rem; }
.subtitle { color: #b0b0b0; font-size: 1.2rem; margin-bottom: 1rem; }
.updated { text-align: right; color: #b0b0b0; font-size: 0.8rem; }
.notice { padding: 0.75rem; border-radius: 0.25rem; margin-bottom: 0.75rem; border-left: 4px solid #ffbb33; background-color: rgba(255, 187, 51, 0.1); color: #ffd27f; }
.alert { padding: 0.75rem; border-radius: 0.25rem; margin-bottom: 0.75rem; border-left: 4px solid #ff4d4d; background-color: rgba(255, 77, 77, 0.1); color: #ff9999; }
.status-row { display: flex; align-items: center; margin-bottom: 1rem; }
.status-indicator { display: inline-block; width: 12px; height: 12px; border-radius: 50%; margin-right: 8px; }
.status-active { background-color: #4dff4d; }
.status-inactive { background-color: #808080; }
.status-warning { background-color: #ffbb33; }
.status-alert { background-color: #ff4d4d; }
.controls { display: flex; gap: 0.5rem; margin-bottom: 1rem; }
.controls form { flex: 1; margin: 0; }
.controls button { width: 100%; }
button { background-color: #3a3a3a; color: #f0f0f0; border: 1px solid #555; border-radius: 4px; padding: 0.4rem 0.8rem; cursor: pointer; }
.camera-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
.camera-header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 0.5rem; }
.camera-feed { background-color: #1a1a1a; height: 150px; border-radius: 5px; display: flex; justify-content: center; align-items: center; margin-bottom: 1rem; border: 1px solid #444; color: #b0b0b0; }
.camera-feed.inactive { color: #808080; background-color: #262626; }
.log-entry { padding: 0.5rem; margin-bottom: 0.5rem; border-left: 2px solid #4d4dff; background-color: rgba(77, 77, 255, 0.1); }
.log-time { color: #b0b0b0; }
.muted { color: #808080; }
"#;

/// Escapes text for use inside element bodies and quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn action_button(label: &str, request: &ActionRequest) -> String {
    let mut form = String::from("<form method=\"post\" action=\"/action\">");
    form.push_str(&format!(
        "<input type=\"hidden\" name=\"kind\" value=\"{}\">",
        escape(&request.kind)
    ));
    if let Some(target) = &request.target {
        form.push_str(&format!(
            "<input type=\"hidden\" name=\"target\" value=\"{}\">",
            escape(target)
        ));
    }
    if let Some(value) = &request.value {
        form.push_str(&format!(
            "<input type=\"hidden\" name=\"value\" value=\"{}\">",
            escape(value)
        ));
    }
    form.push_str(&format!("<button type=\"submit\">{}</button></form>", escape(label)));
    form
}

fn indicator(badge: &Badge) -> String {
    format!("<span class=\"status-indicator {}\"></span>", badge.class)
}

fn alerts_card(alerts: &[String]) -> String {
    if alerts.is_empty() {
        return String::new();
    }
    let mut card = String::from("<div class=\"alert-card\"><h2 class=\"subtitle\">Active Alerts</h2>");
    for alert in alerts {
        card.push_str(&format!(
            "<div class=\"alert\"><strong>Alert:</strong> {}</div>",
            escape(alert)
        ));
    }
    card.push_str(&action_button("Clear All Alerts", &ActionRequest::clear_alerts()));
    card.push_str("</div>");
    card
}

fn status_card(mode: SecurityMode) -> String {
    let badge = mode_badge(mode);
    let mut card = String::from("<div class=\"card\"><h2 class=\"subtitle\">System Status</h2>");
    card.push_str(&format!(
        "<div class=\"status-row\">{}<span style=\"color: {}; font-size: 1.5rem; font-weight: 500;\">{}</span></div>",
        indicator(&badge),
        badge.color,
        badge.text
    ));
    card.push_str("<div class=\"controls\">");
    for (label, target) in [
        ("Disarm", SecurityMode::Disarmed),
        ("Arm (Home)", SecurityMode::ArmedHome),
        ("Arm (Away)", SecurityMode::ArmedAway),
    ] {
        card.push_str(&action_button(label, &ActionRequest::set_mode(target)));
    }
    card.push_str("</div></div>");
    card
}

fn cameras_card(model: &DashboardModel) -> String {
    let mut card = String::from(
        "<div class=\"card\"><h2 class=\"subtitle\">Camera Feeds</h2><div class=\"camera-grid\">",
    );
    for camera in &model.snapshot.cameras {
        let badge = camera_badge(camera.enabled);
        let name = camera.id.display_name();
        card.push_str("<div>");
        card.push_str(&format!(
            "<div class=\"camera-header\"><span>{}</span><span style=\"color: {};\">{}</span></div>",
            name, badge.color, badge.text
        ));
        if camera.enabled {
            card.push_str(&format!(
                "<div class=\"camera-feed\"><p>Camera Feed: {}</p></div>",
                name
            ));
        } else {
            card.push_str("<div class=\"camera-feed inactive\"><p>Camera Inactive</p></div>");
        }
        card.push_str(&action_button("Toggle", &ActionRequest::toggle_camera(camera.id)));
        card.push_str("</div>");
    }
    card.push_str("</div></div>");
    card
}

fn doors_card(model: &DashboardModel) -> String {
    let mut card = String::from("<div class=\"card\"><h2 class=\"subtitle\">Door Status</h2>");
    for door in &model.snapshot.doors {
        let badge = door_badge(door.status);
        card.push_str(&format!(
            "<div class=\"status-row\" id=\"door-{}\">{}<span style=\"font-size: 1.1rem;\">{} Door: <span style=\"color: {};\">{}</span></span></div>",
            door.id.as_str(),
            indicator(&badge),
            door.id.display_name(),
            badge.color,
            badge.text
        ));
        card.push_str("<div class=\"controls\">");
        card.push_str(&action_button(
            "Open",
            &ActionRequest::set_door(door.id, DoorStatus::Open),
        ));
        card.push_str(&action_button(
            "Close",
            &ActionRequest::set_door(door.id, DoorStatus::Closed),
        ));
        card.push_str("</div>");
    }
    card.push_str("</div>");
    card
}

fn motion_card(motion: bool) -> String {
    let badge = motion_badge(motion);
    format!(
        "<div class=\"card\"><h2 class=\"subtitle\">Motion Detection</h2><div class=\"status-row\">{}<span style=\"font-size: 1.2rem; color: {};\">{}</span></div></div>",
        indicator(&badge),
        badge.color,
        badge.text
    )
}

fn activity_card(model: &DashboardModel) -> String {
    let mut card = String::from("<div class=\"card\"><h2 class=\"subtitle\">Activity Log</h2>");
    if model.snapshot.activity_log.is_empty() {
        card.push_str("<p class=\"muted\">No recent activity</p>");
    }
    for entry in &model.snapshot.activity_log {
        card.push_str(&format!(
            "<div class=\"log-entry log-{}\"><span class=\"log-time\">{}</span> - {}</div>",
            entry.kind,
            escape(&entry.time),
            escape(&entry.message)
        ));
    }
    card.push_str("</div>");
    card
}

/// Renders the full dashboard page for one render cycle.
pub fn render_page(model: &DashboardModel) -> String {
    let snapshot = &model.snapshot;
    let mut page = String::from("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    page.push_str("<title>Home Security System</title>");
    if model.refresh_secs > 0 {
        page.push_str(&format!(
            "<meta http-equiv=\"refresh\" content=\"{};url=/\">",
            model.refresh_secs
        ));
    }
    page.push_str(&format!("<style>{}</style></head><body>", STYLESHEET));
    page.push_str("<h1 class=\"security-title\">Home Security System</h1>");
    page.push_str(&format!(
        "<p class=\"updated\">Last updated: {}</p>",
        escape(&snapshot.last_update)
    ));
    if let Some(notice) = &model.notice {
        page.push_str(&format!("<div class=\"notice\">{}</div>", escape(notice)));
    }
    page.push_str(&alerts_card(&snapshot.alerts));

    page.push_str("<div class=\"layout\"><div>");
    page.push_str(&status_card(snapshot.mode));
    page.push_str(&cameras_card(model));
    page.push_str("</div><div>");
    page.push_str(&doors_card(model));
    page.push_str(&motion_card(snapshot.motion));
    page.push_str(&activity_card(model));
    page.push_str("</div></div></body></html>");
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use homecore::devices::DoorId;
    use homecore::sensors::{FixedClock, ScriptedRandom};
    use homecore::{MachineConfig, SecurityStateMachine};

    fn machine() -> SecurityStateMachine {
        SecurityStateMachine::new(
            MachineConfig::default(),
            Box::new(ScriptedRandom::new([])),
            Box::new(FixedClock::at(21, 15, 4)),
        )
        .unwrap()
    }

    #[test]
    fn fresh_session_renders_placeholders() {
        let page = render_page(&DashboardModel::new(machine().snapshot(), 0));
        assert!(page.contains("Last updated: 21:15:04"));
        assert!(page.contains("No recent activity"));
        assert!(page.contains("Disarmed"));
        assert!(page.contains("Camera Feed: Front door"));
        assert!(page.contains("Camera Inactive"));
        assert!(!page.contains("Active Alerts"));
        assert!(!page.contains("http-equiv"));
    }

    #[test]
    fn alerts_and_log_render_after_breach() {
        let mut machine = machine();
        machine.set_mode(SecurityMode::ArmedAway);
        machine.set_door(DoorId::Garage, DoorStatus::Open);
        let page = render_page(&DashboardModel::new(machine.snapshot(), 3));

        assert!(page.contains("Active Alerts"));
        assert!(page.contains("Clear All Alerts"));
        assert!(page.contains("Armed (Away)"));
        assert!(page.contains("Garage Door: <span style=\"color: #ff4d4d;\">Open</span>"));
        assert!(page.contains("21:15:04</span> - garage door open"));
        assert!(page.contains("content=\"3;url=/\""));
    }

    #[test]
    fn buttons_post_wire_names() {
        let html = action_button("Open", &ActionRequest::set_door(DoorId::Back, DoorStatus::Open));
        assert!(html.contains("name=\"kind\" value=\"set_door\""));
        assert!(html.contains("name=\"target\" value=\"back\""));
        assert!(html.contains("name=\"value\" value=\"open\""));
    }

    #[test]
    fn dynamic_text_is_escaped() {
        let mut machine = machine();
        machine.append_log("<script>alert('x')</script>", homecore::LogKind::Info);
        let page = render_page(
            &DashboardModel::new(machine.snapshot(), 0).with_notice("bad \"input\""),
        );
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(page.contains("bad &quot;input&quot;"));
    }
}
