use actix_cors::Cors;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use validator::Validate;

use crate::application::use_cases::column_analyzer::ColumnAnalyzer;
use crate::application::use_cases::table_loader::TableLoader;
use crate::domain::error::AppError;
use crate::infrastructure::config::ServerConfig;
use crate::infrastructure::table_store::TableStore;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub store: Arc<TableStore>,
    pub loader: TableLoader,
    pub analyzer: ColumnAnalyzer,
    pub max_upload_bytes: usize,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UploadRequest {
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    /// Base64-encoded file content.
    #[validate(length(min = 1))]
    pub content: String,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub columns: Vec<String>,
    pub file_key: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[validate(length(min = 1))]
    pub file_key: String,
    #[validate(length(min = 1))]
    pub x_col: String,
    #[validate(length(min = 1))]
    pub y_col: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(err: &AppError) -> HttpResponse {
    let body = ErrorResponse {
        error: err.to_string(),
    };
    if err.is_user_error() {
        HttpResponse::BadRequest().json(body)
    } else {
        HttpResponse::InternalServerError().json(body)
    }
}

/// Extension after the last dot of the bare file name, lowercased. Path
/// separators are stripped first so uploads cannot smuggle directories.
fn file_extension(file_name: &str) -> String {
    let name = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    }
}

#[post("/upload")]
async fn upload(data: web::Data<HttpState>, req: web::Json<UploadRequest>) -> impl Responder {
    if let Err(e) = req.validate() {
        return error_response(&AppError::ValidationError(e.to_string()));
    }

    add_log(
        &data.logs,
        "INFO",
        "Upload",
        &format!("Receiving file: {}", req.file_name),
    );

    let bytes = match BASE64.decode(req.content.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            return error_response(&AppError::ValidationError(format!(
                "content is not valid base64: {}",
                e
            )))
        }
    };
    if bytes.len() > data.max_upload_bytes {
        return error_response(&AppError::ValidationError(format!(
            "file exceeds upload limit of {} bytes",
            data.max_upload_bytes
        )));
    }

    let format = match TableLoader::format_for_extension(&file_extension(&req.file_name)) {
        Ok(format) => format,
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Upload",
                &format!("Rejected {}: {}", req.file_name, e),
            );
            return error_response(&e);
        }
    };

    match data.loader.load(&bytes, format) {
        Ok(table) => {
            let columns = table.column_names();
            let file_key = data.store.insert(table);
            add_log(
                &data.logs,
                "INFO",
                "Upload",
                &format!(
                    "Stored table {} ({} columns, format={})",
                    file_key,
                    columns.len(),
                    format.as_str()
                ),
            );
            HttpResponse::Ok().json(UploadResponse { columns, file_key })
        }
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Upload",
                &format!("Load failed for {}: {}", req.file_name, e),
            );
            error_response(&e)
        }
    }
}

#[post("/analyze")]
async fn analyze(data: web::Data<HttpState>, req: web::Json<AnalyzeRequest>) -> impl Responder {
    if let Err(e) = req.validate() {
        return error_response(&AppError::ValidationError(e.to_string()));
    }

    add_log(
        &data.logs,
        "INFO",
        "Analyze",
        &format!(
            "Analyzing {} (x={} y={})",
            req.file_key, req.x_col, req.y_col
        ),
    );

    let Some(table) = data.store.get(&req.file_key) else {
        return error_response(&AppError::NotFound(format!(
            "no table for key {}",
            req.file_key
        )));
    };

    match data.analyzer.analyze(&table, &req.x_col, &req.y_col) {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Analyze",
                &format!("Analysis failed: {}", e),
            );
            error_response(&e)
        }
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data.logs.lock().unwrap();
    HttpResponse::Ok().json(&*logs)
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap();
    logs.push(entry.clone());
    if logs.len() > 100 {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

pub fn start_server(
    config: &ServerConfig,
    store: Arc<TableStore>,
    logs: Arc<Mutex<Vec<LogEntry>>>,
) -> std::io::Result<Server> {
    let state = web::Data::new(HttpState {
        store,
        loader: TableLoader::new(),
        analyzer: ColumnAnalyzer::new(),
        max_upload_bytes: config.max_upload_bytes,
        logs,
    });
    // base64 inflates payloads by 4/3; leave headroom on the JSON body cap
    let json_limit = config.max_upload_bytes * 2;

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // local tool; no cross-origin policy

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .app_data(web::JsonConfig::default().limit(json_limit))
            .service(
                web::scope("/api")
                    .service(upload)
                    .service(analyze)
                    .service(get_logs),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    Ok(server)
}
