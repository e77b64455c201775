use actix_multipart::Multipart;
use actix_web::{post, web, App, HttpResponse, HttpServer, Responder};
use bytes::{Bytes, BytesMut};
use futures::TryStreamExt;
use tracing::*;

use crate::{
    agent::VoiceAgentService,
    configuration::AppConfig,
    contact::{ContactStore, ContactSubmission},
};

struct AudioUpload {
    audio: Bytes,
    filename: Option<String>,
    language: Option<String>,
}

async fn read_upload(mut payload: Multipart) -> actix_web::Result<AudioUpload> {
    let mut audio = None;
    let mut filename = None;
    let mut language = None;

    while let Some(mut field) = payload.try_next().await? {
        match field.name() {
            "audio" => {
                filename = field
                    .content_disposition()
                    .get_filename()
                    .map(str::to_owned);
                let mut buffer = BytesMut::new();
                while let Some(chunk) = field.try_next().await? {
                    buffer.extend_from_slice(&chunk);
                }
                audio = Some(buffer.freeze());
            }
            "language" => {
                let mut buffer = BytesMut::new();
                while let Some(chunk) = field.try_next().await? {
                    buffer.extend_from_slice(&chunk);
                }
                language = Some(String::from_utf8_lossy(&buffer).into_owned());
            }
            other => {
                debug!("Ignoring unexpected multipart field {}", other);
                while field.try_next().await?.is_some() {}
            }
        }
    }

    let audio = audio.ok_or_else(|| actix_web::error::ErrorBadRequest("missing audio field"))?;
    Ok(AudioUpload {
        audio,
        filename,
        language,
    })
}

#[post("/voice-agent")]
async fn voice_agent_handler(
    payload: Multipart,
    agent: web::Data<VoiceAgentService>,
) -> actix_web::Result<HttpResponse> {
    let upload = read_upload(payload).await?;

    match agent
        .handle_voice_request(
            &upload.audio,
            upload.filename.as_deref(),
            upload.language.as_deref(),
        )
        .await
    {
        Ok(result) => Ok(HttpResponse::Ok().json(result)),
        Err(error) => {
            error!("Voice agent request failed: {}", error);
            Ok(HttpResponse::InternalServerError().finish())
        }
    }
}

#[post("/contact")]
async fn contact_handler(
    form: web::Form<ContactSubmission>,
    store: web::Data<ContactStore>,
) -> impl Responder {
    match store.append(form.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "detail": "Submission received",
        })),
        Err(error) => {
            error!("Failed to persist contact submission: {}", error);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({"detail": error.to_string()}))
        }
    }
}

pub async fn start_server(
    app_config: &AppConfig,
    agent: VoiceAgentService,
    contact_store: ContactStore,
) -> anyhow::Result<()> {
    let agent = web::Data::new(agent);
    let contact_store = web::Data::new(contact_store);
    let static_dir = app_config.static_dir.clone();

    let address = format!("{}:{}", app_config.server.host, app_config.server.port);
    info!("Starting server on {}", address);

    HttpServer::new(move || {
        App::new()
            .service(voice_agent_handler)
            .service(contact_handler)
            .service(actix_files::Files::new("/static", static_dir.clone()))
            .app_data(agent.clone())
            .app_data(contact_store.clone())
    })
    .bind(address)?
    .run()
    .await?;
    Ok(())
}
