//! JSON handlers for the alarm gate.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use homeguard_app::ports::AlarmControl;

use crate::error::ApiError;
use crate::state::AppState;

/// Request and response body: whether alarms are forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmStatus {
    pub enabled: bool,
}

/// `GET /alarm`
pub async fn get<C>(State(state): State<AppState<C>>) -> Json<AlarmStatus>
where
    C: AlarmControl + 'static,
{
    Json(AlarmStatus {
        enabled: state.alarm.enabled(),
    })
}

/// `POST /alarm`
///
/// Arms or disarms the gate. Both transitions are announced by the gate
/// itself, even when the requested state is already in effect. The body is
/// read as JSON whatever its `Content-Type`, so `curl -d` works as is.
pub async fn set<C>(
    State(state): State<AppState<C>>,
    body: Bytes,
) -> Result<Json<AlarmStatus>, ApiError>
where
    C: AlarmControl + 'static,
{
    let request: AlarmStatus = serde_json::from_slice(&body)?;
    if request.enabled {
        state.alarm.enable();
    } else {
        state.alarm.disable();
    }
    Ok(Json(AlarmStatus {
        enabled: state.alarm.enabled(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use tower::ServiceExt;

    struct StubAlarm {
        armed: AtomicBool,
        calls: Mutex<Vec<&'static str>>,
    }

    impl StubAlarm {
        fn new() -> Self {
            Self {
                armed: AtomicBool::new(true),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl AlarmControl for StubAlarm {
        fn enabled(&self) -> bool {
            self.armed.load(Ordering::SeqCst)
        }
        fn enable(&self) {
            self.armed.store(true, Ordering::SeqCst);
            self.calls.lock().unwrap().push("enable");
        }
        fn disable(&self) {
            self.armed.store(false, Ordering::SeqCst);
            self.calls.lock().unwrap().push("disable");
        }
    }

    fn app(alarm: &Arc<StubAlarm>) -> Router {
        crate::router::build(AppState::new(Arc::clone(alarm)))
    }

    fn post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/alarm")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn should_report_armed_by_default() {
        let alarm = Arc::new(StubAlarm::new());

        let response = app(&alarm)
            .oneshot(
                Request::builder()
                    .uri("/alarm")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await, serde_json::json!({"enabled": true}));
    }

    #[tokio::test]
    async fn should_disarm_on_post_false() {
        let alarm = Arc::new(StubAlarm::new());

        let response = app(&alarm)
            .oneshot(post(r#"{"enabled":false}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await, serde_json::json!({"enabled": false}));
        assert_eq!(*alarm.calls.lock().unwrap(), vec!["disable"]);
    }

    #[tokio::test]
    async fn should_call_enable_even_when_already_armed() {
        let alarm = Arc::new(StubAlarm::new());

        let response = app(&alarm)
            .oneshot(post(r#"{"enabled":true}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(*alarm.calls.lock().unwrap(), vec!["enable"]);
    }

    #[tokio::test]
    async fn should_reject_malformed_body() {
        let alarm = Arc::new(StubAlarm::new());

        let response = app(&alarm).oneshot(post("{not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json(response).await;
        assert!(body["error"].is_string());
        assert!(alarm.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_reject_body_of_wrong_shape() {
        let alarm = Arc::new(StubAlarm::new());

        let response = app(&alarm)
            .oneshot(post(r#"{"enabled":"yes"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(alarm.enabled());
    }

    #[tokio::test]
    async fn should_accept_json_body_without_content_type() {
        let alarm = Arc::new(StubAlarm::new());
        let request = Request::builder()
            .method("POST")
            .uri("/alarm")
            .body(Body::from(r#"{"enabled":false}"#))
            .unwrap();

        let response = app(&alarm).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(!alarm.enabled());
    }

    #[tokio::test]
    async fn should_accept_form_content_type_from_curl() {
        let alarm = Arc::new(StubAlarm::new());
        let request = Request::builder()
            .method("POST")
            .uri("/api/alarm")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(r#"{"enabled":false}"#))
            .unwrap();

        let response = app(&alarm).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(*alarm.calls.lock().unwrap(), vec!["disable"]);
    }

    #[tokio::test]
    async fn should_reject_empty_body() {
        let alarm = Arc::new(StubAlarm::new());

        let response = app(&alarm).oneshot(post("")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(alarm.calls.lock().unwrap().is_empty());
    }
}
