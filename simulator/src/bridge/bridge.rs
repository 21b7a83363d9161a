use crate::bridge::model::DashboardModel;
use crate::bridge::page::render_page;
use crate::session::runner::{Session, SessionMetrics};
use homecore::{ActionRequest, SecurityError, SecuritySnapshot};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, reply::Response, Filter, Rejection, Reply};

const FORM_LIMIT: u64 = 16 * 1024;

/// Builds the session that backs the dashboard, both at startup and on reset.
pub type SessionFactory = Box<dyn Fn() -> anyhow::Result<Session> + Send + Sync>;

/// Body accepted by `POST /api/cycle`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CycleRequest {
    #[serde(default)]
    pub action: Option<ActionRequest>,
}

enum Failure {
    Rejected(SecurityError),
    /// The request body never reached the session.
    Body(StatusCode, String),
    Internal(String),
}

impl Failure {
    fn status(&self) -> StatusCode {
        match self {
            Failure::Rejected(_) => StatusCode::BAD_REQUEST,
            Failure::Body(status, _) => *status,
            Failure::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Failure::Rejected(err) => err.to_string(),
            Failure::Body(_, message) => message.clone(),
            Failure::Internal(message) => message.clone(),
        }
    }

    fn into_json(self) -> Response {
        let status = self.status();
        warp::reply::with_status(
            warp::reply::json(&json!({"status": "error", "message": self.message()})),
            status,
        )
        .into_response()
    }
}

/// Shared state behind every route: the single live session.
pub struct BridgeState {
    session: Mutex<Session>,
    factory: SessionFactory,
    refresh_secs: u64,
}

pub type SharedState = Arc<BridgeState>;

impl BridgeState {
    pub fn new(factory: SessionFactory, refresh_secs: u64) -> anyhow::Result<Self> {
        let session = factory()?;
        Ok(Self {
            session: Mutex::new(session),
            factory,
            refresh_secs,
        })
    }

    /// Runs one render cycle under the session lock.
    fn run_cycle(&self, request: Option<&ActionRequest>) -> Result<SecuritySnapshot, Failure> {
        let mut session = self.lock()?;
        session.cycle(request).map_err(Failure::Rejected)?;
        Ok(session.snapshot())
    }

    fn snapshot(&self) -> Result<SecuritySnapshot, Failure> {
        Ok(self.lock()?.snapshot())
    }

    fn reset(&self) -> Result<SecuritySnapshot, Failure> {
        let fresh = (self.factory)().map_err(|err| Failure::Internal(format!("{:#}", err)))?;
        let mut session = self.lock()?;
        info!(
            "ending session after {} cycles; starting a new one",
            session.cycles()
        );
        *session = fresh;
        Ok(session.snapshot())
    }

    pub fn session_metrics(&self) -> anyhow::Result<SessionMetrics> {
        self.lock()
            .map(|session| session.metrics())
            .map_err(|failure| anyhow::anyhow!(failure.message()))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Session>, Failure> {
        self.session
            .lock()
            .map_err(|_| Failure::Internal("session lock poisoned".into()))
    }
}

async fn index(state: SharedState) -> Result<Response, Infallible> {
    Ok(match state.run_cycle(None) {
        Ok(snapshot) => {
            warp::reply::html(render_page(&DashboardModel::new(snapshot, state.refresh_secs)))
                .into_response()
        }
        Err(failure) => failure_page(&state, failure),
    })
}

async fn submit_form(request: ActionRequest, state: SharedState) -> Result<Response, Infallible> {
    Ok(match state.run_cycle(Some(&request)) {
        Ok(snapshot) => {
            warp::reply::html(render_page(&DashboardModel::new(snapshot, state.refresh_secs)))
                .into_response()
        }
        Err(failure) => failure_page(&state, failure),
    })
}

fn failure_page(state: &BridgeState, failure: Failure) -> Response {
    warn!("dashboard request failed: {}", failure.message());
    let status = failure.status();
    let body = match state.snapshot() {
        Ok(snapshot) => render_page(
            &DashboardModel::new(snapshot, 0).with_notice(format!("Request failed: {}", failure.message())),
        ),
        Err(inner) => format!(
            "<!DOCTYPE html><html><body><p>{}</p></body></html>",
            crate::bridge::page::escape(&inner.message())
        ),
    };
    warp::reply::with_status(warp::reply::html(body), status).into_response()
}

/// Maps body extraction rejections; anything else keeps falling through.
fn body_failure(err: &Rejection) -> Option<Failure> {
    if let Some(cause) = err.find::<warp::filters::body::BodyDeserializeError>() {
        Some(Failure::Body(StatusCode::BAD_REQUEST, cause.to_string()))
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        Some(Failure::Body(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("request body exceeds {} bytes", FORM_LIMIT),
        ))
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        Some(Failure::Body(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "unsupported request content type".into(),
        ))
    } else {
        None
    }
}

async fn recover_form(err: Rejection, state: SharedState) -> Result<Response, Rejection> {
    match body_failure(&err) {
        Some(failure) => Ok(failure_page(&state, failure)),
        None => Err(err),
    }
}

async fn recover_json(err: Rejection) -> Result<Response, Rejection> {
    match body_failure(&err) {
        Some(failure) => {
            warn!("api request body rejected: {}", failure.message());
            Ok(failure.into_json())
        }
        None => Err(err),
    }
}

async fn api_state(state: SharedState) -> Result<Response, Infallible> {
    Ok(match state.snapshot() {
        Ok(snapshot) => warp::reply::json(&snapshot).into_response(),
        Err(failure) => failure.into_json(),
    })
}

async fn api_cycle(body: CycleRequest, state: SharedState) -> Result<Response, Infallible> {
    Ok(match state.run_cycle(body.action.as_ref()) {
        Ok(snapshot) => warp::reply::json(&snapshot).into_response(),
        Err(failure) => {
            warn!("api cycle failed: {}", failure.message());
            failure.into_json()
        }
    })
}

async fn api_reset(state: SharedState) -> Result<Response, Infallible> {
    Ok(match state.reset() {
        Ok(snapshot) => warp::reply::json(&snapshot).into_response(),
        Err(failure) => failure.into_json(),
    })
}

async fn api_metrics(state: SharedState) -> Result<Response, Infallible> {
    Ok(match state.lock() {
        Ok(session) => warp::reply::json(&session.metrics()).into_response(),
        Err(failure) => failure.into_json(),
    })
}

pub fn routes(state: SharedState) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let form_state = state.clone();
    let state_filter = warp::any().map(move || state.clone());

    let page_route = warp::path::end()
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(index);

    let form_route = warp::path("action")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(FORM_LIMIT))
        .and(warp::body::form())
        .and(state_filter.clone())
        .and_then(submit_form)
        .recover(move |err: Rejection| recover_form(err, form_state.clone()))
        .unify();

    let state_route = warp::path!("api" / "state")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(api_state);

    let cycle_route = warp::path!("api" / "cycle")
        .and(warp::post())
        .and(warp::body::content_length_limit(FORM_LIMIT))
        .and(warp::body::json())
        .and(state_filter.clone())
        .and_then(api_cycle)
        .recover(recover_json)
        .unify();

    let reset_route = warp::path!("api" / "session" / "reset")
        .and(warp::post())
        .and(state_filter.clone())
        .and_then(api_reset);

    let metrics_route = warp::path!("api" / "metrics")
        .and(warp::get())
        .and(state_filter)
        .and_then(api_metrics);

    page_route
        .or(form_route)
        .unify()
        .or(state_route)
        .unify()
        .or(cycle_route)
        .unify()
        .or(reset_route)
        .unify()
        .or(metrics_route)
        .unify()
}

/// Hosts the dashboard routes on a background thread.
pub struct DashboardBridge {
    state: SharedState,
}

impl DashboardBridge {
    pub fn new(factory: SessionFactory, refresh_secs: u64) -> anyhow::Result<Self> {
        Ok(Self {
            state: Arc::new(BridgeState::new(factory, refresh_secs)?),
        })
    }

    pub fn spawn(&self, addr: SocketAddr) -> thread::JoinHandle<()> {
        let routes = routes(self.state.clone());
        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build dashboard runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                info!("dashboard listening on http://{}", addr);
                warp::serve(routes).run(addr).await;
            });
        })
    }

    pub fn state(&self) -> SharedState {
        self.state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homecore::sensors::{FixedClock, ScriptedRandom};
    use homecore::{MachineConfig, SecurityMode, SecurityStateMachine};

    fn scripted_state(draws: Vec<f64>) -> SharedState {
        let factory: SessionFactory = Box::new(move || {
            let machine = SecurityStateMachine::new(
                MachineConfig::default(),
                Box::new(ScriptedRandom::new(draws.clone())),
                Box::new(FixedClock::at(10, 0, 0)),
            )?;
            Ok(Session::new(machine))
        });
        Arc::new(BridgeState::new(factory, 0).unwrap())
    }

    fn snapshot_of(body: &[u8]) -> SecuritySnapshot {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn index_runs_a_cycle_and_renders() {
        let state = scripted_state(vec![0.01]);
        let filter = routes(state.clone());
        let res = warp::test::request().method("GET").path("/").reply(&filter).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = String::from_utf8(res.body().to_vec()).unwrap();
        assert!(body.contains("Home Security System"));
        assert!(body.contains("Motion detected"));
        assert_eq!(state.lock().ok().map(|s| s.cycles()), Some(1));
    }

    #[tokio::test]
    async fn form_post_applies_action() {
        let state = scripted_state(vec![]);
        let filter = routes(state);
        let res = warp::test::request()
            .method("POST")
            .path("/action")
            .header("content-type", "application/x-www-form-urlencoded")
            .body("kind=set_mode&value=armed_home")
            .reply(&filter)
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = String::from_utf8(res.body().to_vec()).unwrap();
        assert!(body.contains("Security system changed from disarmed to armed_home"));
    }

    #[tokio::test]
    async fn invalid_form_is_rejected_without_mutation() {
        let state = scripted_state(vec![]);
        let filter = routes(state.clone());
        let res = warp::test::request()
            .method("POST")
            .path("/action")
            .header("content-type", "application/x-www-form-urlencoded")
            .body("kind=toggle_camera&target=attic")
            .reply(&filter)
            .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = String::from_utf8(res.body().to_vec()).unwrap();
        assert!(body.contains("unknown camera identifier: attic"));
        assert_eq!(state.lock().ok().map(|s| s.cycles()), Some(0));
    }

    #[tokio::test]
    async fn api_cycle_returns_snapshot() {
        let filter = routes(scripted_state(vec![]));
        let res = warp::test::request()
            .method("POST")
            .path("/api/cycle")
            .json(&CycleRequest {
                action: Some(ActionRequest::set_mode(SecurityMode::ArmedAway)),
            })
            .reply(&filter)
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(snapshot_of(res.body()).mode, SecurityMode::ArmedAway);

        let res = warp::test::request()
            .method("POST")
            .path("/api/cycle")
            .json(&json!({"action": {"kind": "set_mode", "value": "armed_moon"}}))
            .reply(&filter)
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn undecodable_form_renders_error_page() {
        let state = scripted_state(vec![]);
        let filter = routes(state.clone());
        let res = warp::test::request()
            .method("POST")
            .path("/action")
            .header("content-type", "application/x-www-form-urlencoded")
            .body("target=main&value=open")
            .reply(&filter)
            .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let content_type = res.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
        let body = String::from_utf8(res.body().to_vec()).unwrap();
        assert!(body.contains("Request failed"));
        assert!(body.contains("Home Security System"));
        assert_eq!(state.lock().ok().map(|s| s.cycles()), Some(0));
    }

    #[tokio::test]
    async fn malformed_json_gets_json_error() {
        let state = scripted_state(vec![]);
        let filter = routes(state.clone());
        let res = warp::test::request()
            .method("POST")
            .path("/api/cycle")
            .header("content-type", "application/json")
            .body("{not json")
            .reply(&filter)
            .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(state.lock().ok().map(|s| s.cycles()), Some(0));
    }

    #[tokio::test]
    async fn unknown_paths_still_fall_through() {
        let filter = routes(scripted_state(vec![]));
        let res = warp::test::request().method("GET").path("/nowhere").reply(&filter).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = warp::test::request()
            .method("POST")
            .path("/api/session/reset")
            .reply(&filter)
            .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn api_state_is_read_only() {
        let state = scripted_state(vec![0.01]);
        let filter = routes(state.clone());
        let res = warp::test::request().method("GET").path("/api/state").reply(&filter).await;

        assert_eq!(res.status(), StatusCode::OK);
        let snapshot = snapshot_of(res.body());
        assert!(!snapshot.motion);
        assert!(snapshot.activity_log.is_empty());
        assert_eq!(state.lock().ok().map(|s| s.cycles()), Some(0));
    }

    #[tokio::test]
    async fn reset_starts_a_fresh_session() {
        let state = scripted_state(vec![]);
        let filter = routes(state.clone());
        warp::test::request()
            .method("POST")
            .path("/api/cycle")
            .json(&CycleRequest {
                action: Some(ActionRequest::clear_alerts()),
            })
            .reply(&filter)
            .await;

        let res = warp::test::request()
            .method("GET")
            .path("/api/metrics")
            .reply(&filter)
            .await;
        let metrics: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(metrics["cycles"], 1);
        assert_eq!(metrics["transitions"], 1);

        let res = warp::test::request()
            .method("POST")
            .path("/api/session/reset")
            .reply(&filter)
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(snapshot_of(res.body()).activity_log.is_empty());
        assert_eq!(state.lock().ok().map(|s| s.cycles()), Some(0));
    }
}
