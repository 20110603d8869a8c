// Mock stages service for integration tests
#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{
    App, HttpRequest, HttpResponse, HttpServer, delete, dev::ServerHandle, get, post, put, web,
};
use stage_client::{Stage, StageData, StageId, StageUrls};

/// How `GET /stages` answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// JSON array, or `null` when the table is empty.
    Normal,
    ServerError,
    Malformed,
}

pub struct MockStageState {
    stages: Mutex<Vec<Stage>>,
    next_id: Mutex<i64>,
    requests: Mutex<Vec<String>>,
    list_mode: Mutex<ListMode>,
    reject_writes: AtomicBool,
}

impl Default for MockStageState {
    fn default() -> Self {
        Self {
            stages: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
            requests: Mutex::new(Vec::new()),
            list_mode: Mutex::new(ListMode::Normal),
            reject_writes: AtomicBool::new(false),
        }
    }
}

impl MockStageState {
    fn record(&self, req: &HttpRequest) {
        self.requests
            .lock()
            .unwrap()
            .push(format!("{} {}", req.method(), req.path()));
    }

    fn insert(&self, data: StageData) -> StageId {
        let mut next_id = self.next_id.lock().unwrap();
        let id = StageId(*next_id);
        *next_id += 1;
        self.stages.lock().unwrap().push(Stage {
            id,
            stage_name: data.stage_name,
            stages: data.stages,
        });
        id
    }

    fn writes_rejected(&self) -> bool {
        self.reject_writes.load(Ordering::SeqCst)
    }
}

fn parse_id(raw: &str) -> Result<StageId, HttpResponse> {
    raw.parse::<i64>()
        .map(StageId)
        .map_err(|_| HttpResponse::BadRequest().body("Invalid stage ID"))
}

fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("Internal server error")
}

#[get("/stages")]
async fn list_stages(req: HttpRequest, state: web::Data<MockStageState>) -> HttpResponse {
    state.record(&req);
    let mode = *state.list_mode.lock().unwrap();
    match mode {
        ListMode::ServerError => internal_error(),
        ListMode::Malformed => HttpResponse::Ok()
            .content_type("application/json")
            .body("[{\"id\": 1, \"stage_name\": "),
        ListMode::Normal => {
            let stages = state.stages.lock().unwrap();
            // An empty table encodes as null, like the real service.
            let body = if stages.is_empty() {
                "null\n".to_string()
            } else {
                serde_json::to_string(&*stages).unwrap()
            };
            HttpResponse::Ok().content_type("application/json").body(body)
        }
    }
}

#[get("/stages/{id}")]
async fn get_stage(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<MockStageState>,
) -> HttpResponse {
    state.record(&req);
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let stages = state.stages.lock().unwrap();
    match stages.iter().find(|s| s.id == id) {
        Some(stage) => HttpResponse::Ok().json(stage),
        None => HttpResponse::NotFound().body("Stage not found"),
    }
}

#[post("/stages")]
async fn create_stage(
    req: HttpRequest,
    body: web::Json<StageData>,
    state: web::Data<MockStageState>,
) -> HttpResponse {
    state.record(&req);
    if state.writes_rejected() {
        return internal_error();
    }
    state.insert(body.into_inner());
    HttpResponse::Created().finish()
}

#[put("/stages/{id}")]
async fn update_stage(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<StageData>,
    state: web::Data<MockStageState>,
) -> HttpResponse {
    state.record(&req);
    if state.writes_rejected() {
        return internal_error();
    }
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let data = body.into_inner();
    let mut stages = state.stages.lock().unwrap();
    if let Some(stage) = stages.iter_mut().find(|s| s.id == id) {
        stage.stage_name = data.stage_name;
        stage.stages = data.stages;
    }
    HttpResponse::Ok().finish()
}

#[delete("/stages/{id}")]
async fn delete_stage(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<MockStageState>,
) -> HttpResponse {
    state.record(&req);
    if state.writes_rejected() {
        return internal_error();
    }
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    state.stages.lock().unwrap().retain(|s| s.id != id);
    HttpResponse::Ok().finish()
}

/// In-process stages service bound to an ephemeral port.
pub struct MockStageServer {
    pub url: String,
    state: web::Data<MockStageState>,
    handle: ServerHandle,
}

impl MockStageServer {
    /// Must be called from within an actix runtime (`#[actix_web::test]`).
    pub async fn start() -> std::io::Result<Self> {
        let state = web::Data::new(MockStageState::default());
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();

        let app_state = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(app_state.clone())
                .service(list_stages)
                .service(get_stage)
                .service(create_stage)
                .service(update_stage)
                .service(delete_stage)
        })
        .workers(1)
        .disable_signals()
        .listen(listener)?
        .run();

        let handle = server.handle();
        actix_web::rt::spawn(server);

        Ok(Self {
            url: format!("http://127.0.0.1:{}", port),
            state,
            handle,
        })
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }

    pub fn seed(&self, stage_name: &str, urls: &[(&str, &str)]) -> StageId {
        let mut stages = StageUrls::new();
        for (label, url) in urls {
            stages.insert(label.to_string(), url.to_string());
        }
        self.state.insert(StageData::new(stage_name, stages))
    }

    pub fn stages(&self) -> Vec<Stage> {
        self.state.stages.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn clear_requests(&self) {
        self.state.requests.lock().unwrap().clear();
    }

    pub fn count(&self, request: &str) -> usize {
        self.requests().iter().filter(|r| *r == request).count()
    }

    pub fn set_list_mode(&self, mode: ListMode) {
        *self.state.list_mode.lock().unwrap() = mode;
    }

    pub fn reject_writes(&self, reject: bool) {
        self.state.reject_writes.store(reject, Ordering::SeqCst);
    }
}

/// A base URL nothing is listening on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
