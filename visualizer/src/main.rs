use homecore::devices::DoorStatus;
use homecore::{ActionRequest, LogKind, SecurityMode, SecuritySnapshot};
use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path},
        column, row, scrollable, text, Column, Container, Row,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Subscription, Task, Theme,
};
use serde::Serialize;
use std::{env, time::Duration};

const HISTORY_LIMIT: usize = 20;

fn main() -> iced::Result {
    iced::application(Dashboard::boot, Dashboard::update, Dashboard::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Dashboard) -> String {
    "Home Security System".into()
}

fn application_subscription(state: &Dashboard) -> Subscription<Message> {
    time::every(state.refresh).map(|_| Message::Tick)
}

fn application_theme(_: &Dashboard) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct Dashboard {
    base_url: String,
    refresh: Duration,
    snapshot: Option<SecuritySnapshot>,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    Send(ActionRequest),
    ResetSession,
    CycleFinished(Result<SecuritySnapshot, String>),
}

impl Dashboard {
    fn new(base_url: String, refresh: Duration) -> Self {
        Dashboard {
            base_url,
            refresh,
            snapshot: None,
            status: "Waiting for the security hub...".into(),
            history: Vec::new(),
        }
    }

    fn boot() -> (Self, Task<Message>) {
        let base_url =
            env::var("HOMESEC_URL").unwrap_or_else(|_| "http://127.0.0.1:9000".into());
        let refresh = env::var("HOMESEC_REFRESH_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(2);
        let state = Dashboard::new(base_url, Duration::from_secs(refresh));
        let task = Task::perform(run_cycle(state.base_url.clone(), None), Message::CycleFinished);
        (state, task)
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(
                run_cycle(state.base_url.clone(), None),
                Message::CycleFinished,
            ),
            Message::Send(request) => {
                state.push_history(format!("Sent {}", request.kind));
                Task::perform(
                    run_cycle(state.base_url.clone(), Some(request)),
                    Message::CycleFinished,
                )
            }
            Message::ResetSession => {
                state.push_history("Session reset requested".into());
                Task::perform(reset_session(state.base_url.clone()), Message::CycleFinished)
            }
            Message::CycleFinished(Ok(snapshot)) => {
                state.apply_snapshot(snapshot);
                Task::none()
            }
            Message::CycleFinished(Err(err)) => {
                state.status = format!("Hub error: {err}");
                state.push_history(format!("Error: {err}"));
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let Some(snapshot) = &state.snapshot else {
            return Container::new(
                column![
                    text("Home Security System").size(30),
                    text(&state.status).size(14)
                ]
                .spacing(10),
            )
            .padding(20)
            .width(Length::Fill)
            .height(Length::Fill)
            .into();
        };

        let header = column![
            text("Home Security System").size(30),
            text(format!("Last updated: {}", snapshot.last_update))
                .size(12)
                .color(MUTED),
        ]
        .spacing(4);

        let left = column![status_panel(snapshot.mode), camera_panel(snapshot)]
            .spacing(16)
            .width(Length::FillPortion(3));

        let right = column![
            door_panel(snapshot),
            motion_panel(snapshot.motion),
            activity_panel(snapshot),
            history_panel(&state.history),
        ]
        .spacing(16)
        .width(Length::FillPortion(2));

        let footer = row![
            text(&state.status).size(12).color(MUTED),
            button("Reset session")
                .on_press(Message::ResetSession)
                .padding(6),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let mut layout = Column::new().spacing(16).padding(20).push(header);
        if let Some(alerts) = alerts_panel(&snapshot.alerts) {
            layout = layout.push(alerts);
        }
        let layout = layout
            .push(row![left, right].spacing(20).align_y(Alignment::Start))
            .push(footer);

        Container::new(scrollable(layout))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn apply_snapshot(&mut self, snapshot: SecuritySnapshot) {
        self.status = format!(
            "{} | {} alert(s) | motion {}",
            snapshot.mode.label(),
            snapshot.alerts.len(),
            if snapshot.motion { "detected" } else { "none" }
        );
        self.snapshot = Some(snapshot);
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > HISTORY_LIMIT {
            self.history.remove(0);
        }
    }
}

const ACTIVE: Color = Color::from_rgb(0.30, 1.0, 0.30);
const INACTIVE: Color = Color::from_rgb(0.50, 0.50, 0.50);
const WARNING: Color = Color::from_rgb(1.0, 0.73, 0.20);
const ALERT: Color = Color::from_rgb(1.0, 0.30, 0.30);
const MUTED: Color = Color::from_rgb(0.69, 0.69, 0.69);

fn mode_color(mode: SecurityMode) -> Color {
    match mode {
        SecurityMode::Disarmed => INACTIVE,
        SecurityMode::ArmedHome => WARNING,
        SecurityMode::ArmedAway => ACTIVE,
    }
}

fn door_color(status: DoorStatus) -> Color {
    if status.is_open() {
        ALERT
    } else {
        ACTIVE
    }
}

fn light(color: Color) -> Element<'static, Message> {
    Canvas::new(StatusLight { color })
        .width(Length::Fixed(14.0))
        .height(Length::Fixed(14.0))
        .into()
}

fn alerts_panel(alerts: &[String]) -> Option<Element<'_, Message>> {
    if alerts.is_empty() {
        return None;
    }
    let list = alerts.iter().fold(
        Column::new().spacing(6).push(text("Active Alerts").size(20).color(ALERT)),
        |col, alert| col.push(text(format!("Alert: {alert}")).size(14).color(ALERT)),
    );
    Some(
        Container::new(
            list.push(
                button("Clear All Alerts")
                    .on_press(Message::Send(ActionRequest::clear_alerts()))
                    .padding(8),
            ),
        )
        .padding(12)
        .into(),
    )
}

fn status_panel(mode: SecurityMode) -> Element<'static, Message> {
    let controls = [
        ("Disarm", SecurityMode::Disarmed),
        ("Arm (Home)", SecurityMode::ArmedHome),
        ("Arm (Away)", SecurityMode::ArmedAway),
    ]
    .into_iter()
    .fold(Row::new().spacing(8), |row, (label, target)| {
        row.push(
            button(label)
                .on_press(Message::Send(ActionRequest::set_mode(target)))
                .padding(8),
        )
    });

    column![
        text("System Status").size(20),
        row![
            light(mode_color(mode)),
            text(mode.label()).size(24).color(mode_color(mode))
        ]
        .spacing(8)
        .align_y(Alignment::Center),
        controls,
    ]
    .spacing(10)
    .into()
}

fn camera_panel(snapshot: &SecuritySnapshot) -> Element<'_, Message> {
    snapshot
        .cameras
        .iter()
        .fold(
            Column::new().spacing(10).push(text("Camera Feeds").size(20)),
            |col, camera| {
                let (label, color) = if camera.enabled {
                    ("Active", ACTIVE)
                } else {
                    ("Inactive", INACTIVE)
                };
                let feed = if camera.enabled {
                    format!("Camera Feed: {}", camera.id.display_name())
                } else {
                    "Camera Inactive".to_string()
                };
                col.push(
                    row![
                        light(color),
                        text(camera.id.display_name()).size(16),
                        text(label).size(14).color(color),
                        text(feed).size(12).color(MUTED),
                        button("Toggle")
                            .on_press(Message::Send(ActionRequest::toggle_camera(camera.id)))
                            .padding(6),
                    ]
                    .spacing(10)
                    .align_y(Alignment::Center),
                )
            },
        )
        .into()
}

fn door_panel(snapshot: &SecuritySnapshot) -> Element<'_, Message> {
    snapshot
        .doors
        .iter()
        .fold(
            Column::new().spacing(10).push(text("Door Status").size(20)),
            |col, door| {
                col.push(
                    row![
                        light(door_color(door.status)),
                        text(format!("{} Door:", door.id.display_name())).size(16),
                        text(door.status.label())
                            .size(16)
                            .color(door_color(door.status)),
                        button("Open")
                            .on_press(Message::Send(ActionRequest::set_door(
                                door.id,
                                DoorStatus::Open
                            )))
                            .padding(6),
                        button("Close")
                            .on_press(Message::Send(ActionRequest::set_door(
                                door.id,
                                DoorStatus::Closed
                            )))
                            .padding(6),
                    ]
                    .spacing(8)
                    .align_y(Alignment::Center),
                )
            },
        )
        .into()
}

fn motion_panel(motion: bool) -> Element<'static, Message> {
    let (label, color) = if motion {
        ("Detected", ALERT)
    } else {
        ("None", INACTIVE)
    };
    column![
        text("Motion Detection").size(20),
        row![light(color), text(label).size(18).color(color)]
            .spacing(8)
            .align_y(Alignment::Center),
    ]
    .spacing(8)
    .into()
}

fn activity_panel(snapshot: &SecuritySnapshot) -> Element<'_, Message> {
    let entries = if snapshot.activity_log.is_empty() {
        Column::new().push(text("No recent activity").size(12).color(INACTIVE))
    } else {
        snapshot
            .activity_log
            .iter()
            .fold(Column::new().spacing(4), |col, entry| {
                let color = match entry.kind {
                    LogKind::Alert => ALERT,
                    LogKind::Motion => WARNING,
                    _ => Color::WHITE,
                };
                col.push(
                    text(format!("{} - {}", entry.time, entry.message))
                        .size(13)
                        .color(color),
                )
            })
    };

    column![
        text("Activity Log").size(20),
        Container::new(scrollable(entries).height(Length::Fixed(180.0))).padding(6),
    ]
    .spacing(8)
    .into()
}

fn history_panel(history: &[String]) -> Element<'_, Message> {
    let entries = if history.is_empty() {
        Column::new().push(text("No client activity yet").size(12))
    } else {
        history
            .iter()
            .rev()
            .fold(Column::new().spacing(4), |col, entry| {
                col.push(text(entry.as_str()).size(12).color(MUTED))
            })
    };
    column![
        text("Client history").size(16),
        Container::new(scrollable(entries).height(Length::Fixed(90.0))).padding(6),
    ]
    .spacing(6)
    .into()
}

#[derive(Debug, Serialize)]
struct CycleBody {
    action: Option<ActionRequest>,
}

async fn run_cycle(
    base_url: String,
    action: Option<ActionRequest>,
) -> Result<SecuritySnapshot, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base_url}/api/cycle"))
        .json(&CycleBody { action })
        .send()
        .await
        .map_err(|e| e.to_string())?;
    decode_snapshot(response).await
}

async fn reset_session(base_url: String) -> Result<SecuritySnapshot, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base_url}/api/session/reset"))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    decode_snapshot(response).await
}

async fn decode_snapshot(response: reqwest::Response) -> Result<SecuritySnapshot, String> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<SecuritySnapshot>()
            .await
            .map_err(|e| e.to_string());
    }
    let body = response
        .json::<serde_json::Value>()
        .await
        .unwrap_or_default();
    let message = body["message"].as_str().unwrap_or("request failed");
    Err(format!("{}: {}", status, message))
}

#[derive(Clone)]
struct StatusLight {
    color: Color,
}

impl canvas::Program<Message> for StatusLight {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let center = Point::new(bounds.width / 2.0, bounds.height / 2.0);
        let radius = bounds.width.min(bounds.height) / 2.0 - 1.0;
        let dot = Path::new(|builder| builder.circle(center, radius.max(1.0)));
        frame.fill(&dot, self.color);
        vec![frame.into_geometry()]
    }
}
