use crate::error::AppError;
use crate::housing::{
    ActivityEntry, AssignmentForm, CompletionForm, DeskOutcome, Employee, EmployeeForm,
    KeyValueStore, MaintenanceForm, MaintenanceRequest, RentLine, RequestAssignmentForm,
    Residence, ResidenceDesk, ResidenceForm, SelectOption, Student, StudentForm,
};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The single desk shared by every request. Holding the lock for the whole
/// operation keeps operations strictly one at a time.
pub type SharedDesk<S> = Arc<Mutex<ResidenceDesk<S>>>;

#[derive(Clone)]
pub struct AppState {
    pub readiness: Arc<AtomicBool>,
    pub metrics: Arc<PrometheusHandle>,
}

/// Records plus the selection list a form would render for them.
#[derive(Debug, Serialize)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub options: Vec<SelectOption>,
}

pub fn desk_router<S>(desk: SharedDesk<S>) -> Router
where
    S: KeyValueStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/residences",
            get(list_residences::<S>).post(add_residence::<S>),
        )
        .route(
            "/api/v1/students",
            get(list_students::<S>).post(add_student::<S>),
        )
        .route("/api/v1/assignments", post(assign_residence::<S>))
        .route("/api/v1/rents", get(calculate_rents::<S>))
        .route(
            "/api/v1/employees",
            get(list_employees::<S>).post(add_employee::<S>),
        )
        .route(
            "/api/v1/maintenance-requests",
            get(list_requests::<S>).post(submit_request::<S>),
        )
        .route(
            "/api/v1/maintenance-requests/assignments",
            post(assign_request_employee::<S>),
        )
        .route(
            "/api/v1/maintenance-requests/completions",
            post(complete_request::<S>),
        )
        .route("/api/v1/activity", get(activity::<S>))
        .with_state(desk)
}

pub fn with_desk_routes<S>(desk: SharedDesk<S>) -> Router
where
    S: KeyValueStore + 'static,
{
    desk_router(desk)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

fn lock<S>(desk: &SharedDesk<S>) -> MutexGuard<'_, ResidenceDesk<S>> {
    desk.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn list_residences<S: KeyValueStore + 'static>(
    State(desk): State<SharedDesk<S>>,
) -> Json<Listing<Residence>> {
    let desk = lock(&desk);
    Json(Listing {
        items: desk.residences().to_vec(),
        options: desk.residence_options(),
    })
}

async fn add_residence<S: KeyValueStore + 'static>(
    State(desk): State<SharedDesk<S>>,
    Json(form): Json<ResidenceForm>,
) -> Result<Json<DeskOutcome>, AppError> {
    let outcome = lock(&desk).add_residence(form)?;
    Ok(Json(outcome))
}

async fn list_students<S: KeyValueStore + 'static>(
    State(desk): State<SharedDesk<S>>,
) -> Json<Listing<Student>> {
    let desk = lock(&desk);
    Json(Listing {
        items: desk.students().to_vec(),
        options: desk.student_options(),
    })
}

async fn add_student<S: KeyValueStore + 'static>(
    State(desk): State<SharedDesk<S>>,
    Json(form): Json<StudentForm>,
) -> Result<Json<DeskOutcome>, AppError> {
    let outcome = lock(&desk).add_student(form)?;
    Ok(Json(outcome))
}

async fn assign_residence<S: KeyValueStore + 'static>(
    State(desk): State<SharedDesk<S>>,
    Json(form): Json<AssignmentForm>,
) -> Result<Json<DeskOutcome>, AppError> {
    let outcome = lock(&desk).assign_residence(form)?;
    Ok(Json(outcome))
}

async fn calculate_rents<S: KeyValueStore + 'static>(
    State(desk): State<SharedDesk<S>>,
) -> Json<Vec<RentLine>> {
    Json(lock(&desk).calculate_all_rents())
}

async fn list_employees<S: KeyValueStore + 'static>(
    State(desk): State<SharedDesk<S>>,
) -> Json<Listing<Employee>> {
    let desk = lock(&desk);
    Json(Listing {
        items: desk.employees().to_vec(),
        options: desk.employee_options(),
    })
}

async fn add_employee<S: KeyValueStore + 'static>(
    State(desk): State<SharedDesk<S>>,
    Json(form): Json<EmployeeForm>,
) -> Result<Json<DeskOutcome>, AppError> {
    let outcome = lock(&desk).add_employee(form)?;
    Ok(Json(outcome))
}

async fn list_requests<S: KeyValueStore + 'static>(
    State(desk): State<SharedDesk<S>>,
) -> Json<Listing<MaintenanceRequest>> {
    let desk = lock(&desk);
    Json(Listing {
        items: desk.maintenance_requests().to_vec(),
        options: desk.request_options(),
    })
}

async fn submit_request<S: KeyValueStore + 'static>(
    State(desk): State<SharedDesk<S>>,
    Json(form): Json<MaintenanceForm>,
) -> Result<Json<DeskOutcome>, AppError> {
    let outcome = lock(&desk).submit_maintenance_request(form)?;
    Ok(Json(outcome))
}

async fn assign_request_employee<S: KeyValueStore + 'static>(
    State(desk): State<SharedDesk<S>>,
    Json(form): Json<RequestAssignmentForm>,
) -> Result<Json<DeskOutcome>, AppError> {
    let outcome = lock(&desk).assign_maintenance_employee(form)?;
    Ok(Json(outcome))
}

async fn complete_request<S: KeyValueStore + 'static>(
    State(desk): State<SharedDesk<S>>,
    Json(form): Json<CompletionForm>,
) -> Result<Json<DeskOutcome>, AppError> {
    let outcome = lock(&desk).complete_maintenance_request(form)?;
    Ok(Json(outcome))
}

async fn activity<S: KeyValueStore + 'static>(
    State(desk): State<SharedDesk<S>>,
) -> Json<Vec<ActivityEntry>> {
    Json(lock(&desk).activity().entries().to_vec())
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::housing::InMemoryKeyValueStore;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use tower::ServiceExt;

    fn desk() -> (SharedDesk<InMemoryKeyValueStore>, InMemoryKeyValueStore) {
        let store = InMemoryKeyValueStore::default();
        let desk = ResidenceDesk::open(store.clone()).expect("desk opens");
        (Arc::new(Mutex::new(desk)), store)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request builds")
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, body)
    }

    #[tokio::test]
    async fn residence_and_student_forms_drive_the_desk() {
        let (desk, store) = desk();
        let app = desk_router(desk.clone());

        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/residences",
                json!({ "name": "North Hall 101", "address": "12 College Walk", "size": "1200", "type": "dorm" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "applied");
        assert_eq!(body["message"], "Added dorm: North Hall 101");

        let (status, _) = send(
            &app,
            post_json(
                "/api/v1/students",
                json!({ "name": "Ada Lovelace", "studentId": "S-1001", "gender": "female" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(
            &app,
            post_json(
                "/api/v1/assignments",
                json!({ "student": "0", "residence": "0" }),
            ),
        )
        .await;
        assert_eq!(body["message"], "Assigned Ada Lovelace to North Hall 101");

        let (_, listing) = send(&app, get_request("/api/v1/residences")).await;
        assert_eq!(listing["items"][0]["isOccupied"], true);
        assert_eq!(listing["options"][0]["value"], "0");
        assert_eq!(listing["options"][0]["label"], "North Hall 101");
        assert_eq!(store.writes(), 4);
    }

    #[tokio::test]
    async fn empty_selection_is_reported_as_skipped() {
        let (desk, store) = desk();
        let app = desk_router(desk);

        let (status, body) = send(
            &app,
            post_json("/api/v1/assignments", json!({ "student": "" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "skipped");
        assert_eq!(body["reason"], "missing_selection");
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn non_numeric_size_is_a_bad_request() {
        let (desk, _store) = desk();
        let app = desk_router(desk);

        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/residences",
                json!({ "name": "Loft", "address": "1 Main", "size": "big", "type": "apartment" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .contains("size must be a whole number"));
    }

    #[tokio::test]
    async fn rents_and_activity_reflect_operations() {
        let (desk, _store) = desk();
        {
            let mut guard = lock(&desk);
            guard
                .add_residence(ResidenceForm {
                    name: "Maple Court 3B".to_string(),
                    address: "400 Maple Court".to_string(),
                    size: "3".to_string(),
                    kind: "apartment".to_string(),
                })
                .expect("apartment added");
        }
        let app = desk_router(desk);

        let (_, rents) = send(&app, get_request("/api/v1/rents")).await;
        assert_eq!(rents[0]["rent"], 1100.0);
        assert_eq!(rents[0]["kind"], "apartment");

        let (_, activity) = send(&app, get_request("/api/v1/activity")).await;
        let messages: Vec<&str> = activity
            .as_array()
            .expect("activity array")
            .iter()
            .filter_map(|entry| entry["message"].as_str())
            .collect();
        assert_eq!(
            messages,
            vec!["Added apartment: Maple Court 3B", "Rent for Maple Court 3B: $1100"]
        );
    }

    #[tokio::test]
    async fn maintenance_request_lifecycle_over_http() {
        let (desk, _store) = desk();
        let app = desk_router(desk);

        send(
            &app,
            post_json(
                "/api/v1/students",
                json!({ "name": "Grace Hopper", "studentId": "S-1002", "gender": "female" }),
            ),
        )
        .await;
        send(
            &app,
            post_json(
                "/api/v1/employees",
                json!({ "name": "Sam Fixit", "employeeId": "E-77" }),
            ),
        )
        .await;
        let (_, submitted) = send(
            &app,
            post_json(
                "/api/v1/maintenance-requests",
                json!({ "student": "0", "description": "Radiator is cold" }),
            ),
        )
        .await;
        assert_eq!(
            submitted["message"],
            "Maintenance request submitted by Grace Hopper: Radiator is cold"
        );

        send(
            &app,
            post_json(
                "/api/v1/maintenance-requests/assignments",
                json!({ "request": "0", "employee": "0" }),
            ),
        )
        .await;
        let (_, listing) = send(&app, get_request("/api/v1/maintenance-requests")).await;
        assert_eq!(listing["items"][0]["status"], "in_progress");
        assert_eq!(listing["items"][0]["assignedEmployee"], 0);

        send(
            &app,
            post_json(
                "/api/v1/maintenance-requests/completions",
                json!({ "request": "0" }),
            ),
        )
        .await;
        let (_, listing) = send(&app, get_request("/api/v1/maintenance-requests")).await;
        assert_eq!(listing["items"][0]["status"], "completed");
        assert_eq!(
            listing["options"][0]["label"],
            "Grace Hopper: Radiator is cold"
        );
    }

    #[tokio::test]
    async fn operational_endpoints_report_state() {
        let (desk, _store) = desk();
        let readiness = Arc::new(AtomicBool::new(false));
        let state = AppState {
            readiness: readiness.clone(),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        let app = with_desk_routes(desk).layer(Extension(state));

        let (status, body) = send(&app, get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = send(&app, get_request("/ready")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        readiness.store(true, Ordering::Release);
        let (status, _) = send(&app, get_request("/ready")).await;
        assert_eq!(status, StatusCode::OK);
    }
}
