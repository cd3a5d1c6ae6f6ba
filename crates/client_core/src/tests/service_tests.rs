use super::*;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use shared::{
    domain::{Employee, EmployeeDraft, EmployeeId},
    error::ApiError,
};
use tokio::{net::TcpListener, sync::Mutex};

struct PanicNotifier;

impl Notifier for PanicNotifier {
    fn alert(&self, message: &str) {
        panic!("unexpected alert: {message}");
    }
}

#[derive(Clone, Default)]
struct ServerState {
    requests: Arc<Mutex<Vec<String>>>,
}

fn ann() -> Employee {
    Employee {
        id: Some(EmployeeId(1)),
        name: "Ann".into(),
        email: "a@x.com".into(),
        phone: "555-0100".into(),
        job_title: "Engineer".into(),
        image_url: String::new(),
        employee_code: Some("c0ffee".into()),
    }
}

async fn handle_list(State(state): State<ServerState>) -> Json<Vec<Employee>> {
    state.requests.lock().await.push("GET all".to_string());
    Json(vec![ann()])
}

async fn handle_add(
    State(state): State<ServerState>,
    Json(draft): Json<EmployeeDraft>,
) -> Result<(StatusCode, Json<Employee>), (StatusCode, Json<ApiError>)> {
    state
        .requests
        .lock()
        .await
        .push(format!("POST add {}", draft.name));
    if draft.email.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                status: Some(400),
                error: Some("Bad Request".to_string()),
                message: "email must not be blank".to_string(),
            }),
        ));
    }
    Ok((
        StatusCode::CREATED,
        Json(draft.into_employee(Some(EmployeeId(2)))),
    ))
}

async fn handle_update(
    State(state): State<ServerState>,
    Json(employee): Json<Employee>,
) -> Json<Employee> {
    state
        .requests
        .lock()
        .await
        .push(format!("PUT update {:?}", employee.id.map(|id| id.0)));
    Json(employee)
}

async fn handle_delete(State(state): State<ServerState>, Path(id): Path<i64>) -> StatusCode {
    state
        .requests
        .lock()
        .await
        .push(format!("DELETE {id}"));
    StatusCode::OK
}

async fn spawn_directory_server() -> Result<(String, ServerState), std::io::Error> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ServerState::default();
    let app = Router::new()
        .route("/employee/all", get(handle_list))
        .route("/employee/add", post(handle_add))
        .route("/employee/update", put(handle_update))
        .route("/employee/delete/:id", delete(handle_delete))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

#[tokio::test]
async fn lists_employees_from_all_route() {
    let (server_url, state) = spawn_directory_server().await.expect("spawn server");
    let service = HttpEmployeeService::new(&server_url).expect("client");

    let employees = service.list_employees().await.expect("list");

    assert_eq!(employees, vec![ann()]);
    assert_eq!(*state.requests.lock().await, vec!["GET all".to_string()]);
}

#[tokio::test]
async fn create_posts_draft_and_returns_assigned_id() {
    let (server_url, _state) = spawn_directory_server().await.expect("spawn server");
    let service = HttpEmployeeService::new(&format!("{server_url}/")).expect("client");
    let draft = EmployeeDraft {
        name: "Cy".into(),
        email: "c@x.com".into(),
        phone: "3".into(),
        job_title: "Ops".into(),
        image_url: String::new(),
    };

    let created = service.create_employee(&draft).await.expect("create");

    assert_eq!(created.id, Some(EmployeeId(2)));
    assert_eq!(created.name, "Cy");
}

#[tokio::test]
async fn rejected_create_carries_service_message() {
    let (server_url, _state) = spawn_directory_server().await.expect("spawn server");
    let service = HttpEmployeeService::new(&server_url).expect("client");
    let draft = EmployeeDraft {
        name: "Cy".into(),
        email: String::new(),
        phone: "3".into(),
        job_title: "Ops".into(),
        image_url: String::new(),
    };

    let err = service
        .create_employee(&draft)
        .await
        .expect_err("create should be rejected");

    let message = err.to_string();
    assert!(message.contains("400"), "{message}");
    assert!(message.contains("email must not be blank"), "{message}");
}

#[tokio::test]
async fn update_and_delete_use_their_routes() {
    let (server_url, state) = spawn_directory_server().await.expect("spawn server");
    let service = HttpEmployeeService::new(&server_url).expect("client");

    let updated = service.update_employee(&ann()).await.expect("update");
    service
        .delete_employee(Some(EmployeeId(1)))
        .await
        .expect("delete");

    assert_eq!(updated, ann());
    assert_eq!(
        *state.requests.lock().await,
        vec!["PUT update Some(1)".to_string(), "DELETE 1".to_string()]
    );
}

#[tokio::test]
async fn delete_without_id_is_sent_and_rejected() {
    let (server_url, state) = spawn_directory_server().await.expect("spawn server");
    let service = HttpEmployeeService::new(&server_url).expect("client");

    let err = service
        .delete_employee(None)
        .await
        .expect_err("delete without id should fail");

    assert!(err.to_string().contains("404"), "{err}");
    assert!(state.requests.lock().await.is_empty());
}

#[tokio::test]
async fn controller_reconciles_against_http_service() {
    let (server_url, _state) = spawn_directory_server().await.expect("spawn server");
    let service = Arc::new(HttpEmployeeService::new(&server_url).expect("client"));
    let controller = DirectoryController::new(
        service,
        Arc::new(HeadlessPresenter),
        Arc::new(PanicNotifier),
    );

    controller
        .remove(Some(EmployeeId(1)))
        .await
        .expect("remove then reload");

    assert_eq!(controller.directory().await, vec![ann()]);
}

#[test]
fn rejects_non_http_base_url() {
    assert!(HttpEmployeeService::new("ftp://example.com").is_err());
    assert!(HttpEmployeeService::new("not a url").is_err());
}

#[test]
fn trims_trailing_slash_from_base_url() {
    let service = HttpEmployeeService::new("http://localhost:8080/").expect("client");
    assert_eq!(service.base_url(), "http://localhost:8080");
}
