use crate::application::use_cases::document_pipeline::DocumentPipelineUseCase;
use crate::domain::error::{AppError, Result};
use actix_cors::Cors;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

const MAX_LOG_ENTRIES: usize = 100;
const DEFAULT_UPLOAD_NAME: &str = "upload";
const GENERATED_ARCHIVE: &str = "generated_documents.zip";
const AGGREGATED_ARCHIVE: &str = "aggregated_documents.zip";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub pipeline: Arc<DocumentPipelineUseCase>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

impl HttpState {
    pub fn new(pipeline: DocumentPipelineUseCase) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            logs: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[derive(Deserialize)]
pub struct UploadQuery {
    #[serde(default)]
    pub filename: Option<String>,
}

impl UploadQuery {
    fn file_name(&self) -> String {
        self.filename
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_UPLOAD_NAME)
            .to_string()
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Parse an upload into records.
///
/// All three POST routes take the raw file bytes as the request body and
/// the original file name as `?filename=` (its extension picks the reader).
/// Multipart form uploads are not accepted; clients send the file directly,
/// e.g. `curl --data-binary @duty.xlsx '/api/upload?filename=duty.xlsx'`.
#[post("/upload")]
async fn upload(
    data: web::Data<HttpState>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> impl Responder {
    let file_name = query.file_name();
    if body.is_empty() {
        return empty_upload(&data.logs, &file_name);
    }
    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!("Parsing {} ({} bytes)", file_name, body.len()),
    );

    let pipeline = data.pipeline.clone();
    let name = file_name.clone();
    match run_blocking(move || pipeline.parse(&body, &name)).await {
        Ok(records) => {
            add_log(
                &data.logs,
                "INFO",
                "HttpApi",
                &format!("Parsed {} records from {}", records.len(), file_name),
            );
            HttpResponse::Ok().json(records)
        }
        Err(e) => error_response(&data.logs, "Upload", e),
    }
}

#[post("/generate-docs")]
async fn generate_docs(
    data: web::Data<HttpState>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> impl Responder {
    let file_name = query.file_name();
    if body.is_empty() {
        return empty_upload(&data.logs, &file_name);
    }
    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!("Generating documents per record from {}", file_name),
    );

    let pipeline = data.pipeline.clone();
    match run_blocking(move || pipeline.generate(&body, &file_name)).await {
        Ok(archive) => zip_response(archive, GENERATED_ARCHIVE),
        Err(e) => error_response(&data.logs, "Document generation", e),
    }
}

#[post("/generate-aggregated-docs")]
async fn generate_aggregated_docs(
    data: web::Data<HttpState>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> impl Responder {
    let file_name = query.file_name();
    if body.is_empty() {
        return empty_upload(&data.logs, &file_name);
    }
    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!("Generating documents per importer from {}", file_name),
    );

    let pipeline = data.pipeline.clone();
    match run_blocking(move || pipeline.generate_aggregated(&body, &file_name)).await {
        Ok(archive) => zip_response(archive, AGGREGATED_ARCHIVE),
        Err(e) => error_response(&data.logs, "Aggregated document generation", e),
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = lock_logs(&data.logs);
    HttpResponse::Ok().json(&*logs)
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse { status: "ok" })
}

async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    web::block(work)
        .await
        .map_err(|e| AppError::Internal(format!("Blocking task failed: {}", e)))?
}

fn zip_response(archive: Vec<u8>, file_name: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/zip")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name.to_string())],
        })
        .body(archive)
}

fn empty_upload(logs: &Mutex<Vec<LogEntry>>, file_name: &str) -> HttpResponse {
    let message = format!("Please upload a file: {} is empty", file_name);
    add_log(logs, "WARN", "HttpApi", &message);
    HttpResponse::BadRequest().body(message)
}

fn error_response(logs: &Mutex<Vec<LogEntry>>, stage: &str, err: AppError) -> HttpResponse {
    add_log(
        logs,
        "ERROR",
        "HttpApi",
        &format!("{} failed: {}", stage, err),
    );
    match err {
        AppError::ValidationError(_) => HttpResponse::BadRequest().body(err.to_string()),
        _ => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

fn lock_logs(logs: &Mutex<Vec<LogEntry>>) -> MutexGuard<'_, Vec<LogEntry>> {
    logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    match level {
        "ERROR" => tracing::error!(source, "{}", message),
        "WARN" => tracing::warn!(source, "{}", message),
        _ => tracing::info!(source, "{}", message),
    }

    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = lock_logs(logs);
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

/// Routes under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(upload)
            .service(generate_docs)
            .service(generate_aggregated_docs)
            .service(get_logs)
            .service(health),
    );
}

pub fn start_server(
    state: HttpState,
    host: &str,
    port: u16,
    max_upload_bytes: usize,
) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Browser front-end is served from another origin

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(max_upload_bytes))
            .configure(configure)
    })
    .bind((host, port))?
    .run();

    Ok(server)
}
