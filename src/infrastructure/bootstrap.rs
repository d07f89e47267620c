use std::io;

use actix_web::dev::Server;
use tracing::{info, warn};

use crate::application::use_cases::document_pipeline::DocumentPipelineUseCase;
use crate::infrastructure::config::AppConfig;
use crate::interfaces::http::{add_log, start_server, HttpState};

/// Build the pipeline and bind the HTTP server. The returned server still
/// has to be awaited.
pub fn setup(config: &AppConfig) -> io::Result<Server> {
    let pipeline = DocumentPipelineUseCase::new(config.template.path.clone());
    if !pipeline.template_path().is_file() {
        warn!(
            template = %pipeline.template_path().display(),
            "Template not found yet; generation requests will fail until it exists"
        );
    }

    let state = HttpState::new(pipeline);
    let logs = state.logs.clone();

    let server = start_server(
        state,
        &config.server.host,
        config.server.port,
        config.upload.max_bytes,
    )?;

    info!(
        host = %config.server.host,
        port = config.server.port,
        template = %config.template.path.display(),
        "HTTP server bound"
    );
    add_log(
        &logs,
        "INFO",
        "System",
        &format!(
            "Backend initialized and HTTP server started on {}:{}",
            config.server.host, config.server.port
        ),
    );

    Ok(server)
}
