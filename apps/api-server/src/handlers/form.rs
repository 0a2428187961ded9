//! Post form extractor: `multipart/form-data`, JSON or urlencoded bodies.

use std::collections::HashMap;
use std::future::ready;

use actix_multipart::{Field, Multipart};
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, web};
use futures::TryStreamExt;
use futures::future::LocalBoxFuture;
use validator::ValidationErrors;

use scribe_core::domain::CoverUpload;
use scribe_core::error::DomainError;
use scribe_core::service::DEFAULT_MAX_COVER_BYTES;
use scribe_core::validation::{FieldValue, PostInput, cover_too_large, field_errors, parse_flag};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Largest accepted text part of a multipart form.
const MAX_TEXT_PART_BYTES: usize = 1024 * 1024;

const COVER_FIELD: &str = "cover";

/// Title, content, publish flag and optional cover of a create/update request.
///
/// Unknown content types yield an empty form, which then fails validation.
#[derive(Debug, Default)]
pub struct PostForm {
    pub input: PostInput,
    pub cover: Option<CoverUpload>,
}

impl PostForm {
    fn set_text(&mut self, name: &str, value: FieldValue) {
        match name {
            "title" => self.input.title = value,
            "content" => self.input.content = value,
            "is_published" => {
                self.input.is_published = matches!(&value, FieldValue::Text(v) if parse_flag(v));
            }
            _ => {}
        }
    }

    fn from_pairs(pairs: HashMap<String, String>) -> Self {
        let mut form = Self::default();
        for (name, value) in &pairs {
            form.set_text(name, FieldValue::text(value));
        }
        form
    }

    fn from_json(bytes: &[u8]) -> Result<Self, AppError> {
        let body: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| AppError::BadRequest(format!("Malformed JSON body: {e}")))?;
        let object = body
            .as_object()
            .ok_or_else(|| AppError::BadRequest("JSON body must be an object".to_string()))?;

        Ok(Self {
            input: PostInput::from_json(object),
            cover: None,
        })
    }
}

enum BodyKind {
    Multipart,
    Json,
    UrlEncoded,
    Other,
}

fn body_kind(req: &HttpRequest) -> BodyKind {
    let content_type = req.content_type().to_ascii_lowercase();
    match content_type.as_str() {
        "multipart/form-data" => BodyKind::Multipart,
        "application/x-www-form-urlencoded" => BodyKind::UrlEncoded,
        ct if ct == "application/json" || ct.ends_with("+json") => BodyKind::Json,
        _ => BodyKind::Other,
    }
}

fn malformed(err: impl std::fmt::Display) -> AppError {
    AppError::BadRequest(format!("Malformed request body: {err}"))
}

impl FromRequest for PostForm {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let max_cover_bytes = req
            .app_data::<web::Data<AppState>>()
            .map(|state| state.posts.max_cover_bytes())
            .unwrap_or(DEFAULT_MAX_COVER_BYTES);

        match body_kind(req) {
            BodyKind::Multipart => {
                let multipart = Multipart::new(req.headers(), payload.take());
                Box::pin(read_multipart(multipart, max_cover_bytes))
            }
            BodyKind::Json => {
                let body = web::Bytes::from_request(req, payload);
                Box::pin(async move { PostForm::from_json(&body.await.map_err(malformed)?) })
            }
            BodyKind::UrlEncoded => {
                let form = web::Form::<HashMap<String, String>>::from_request(req, payload);
                Box::pin(async move {
                    let form = form.await.map_err(malformed)?;
                    Ok(PostForm::from_pairs(form.into_inner()))
                })
            }
            BodyKind::Other => {
                tracing::debug!(content_type = %req.content_type(), "Unsupported body, treating as empty form");
                Box::pin(ready(Ok(PostForm::default())))
            }
        }
    }
}

async fn read_multipart(
    mut multipart: Multipart,
    max_cover_bytes: usize,
) -> Result<PostForm, AppError> {
    let mut form = PostForm::default();

    while let Some(mut field) = multipart.try_next().await.map_err(malformed)? {
        let (name, file_name) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().map(str::to_owned),
                cd.get_filename().map(str::to_owned),
            ),
            None => (None, None),
        };

        match (name.as_deref(), file_name) {
            // Browsers send an unnamed empty part when no file was chosen.
            (Some(COVER_FIELD), Some(file_name)) if !file_name.is_empty() => {
                let content_type = field.content_type().map(|m| m.to_string());
                let (bytes, size) = read_capped(&mut field, max_cover_bytes).await?;
                if size > max_cover_bytes {
                    // Moving to the next part would drain the rest of this one.
                    tracing::debug!(max_cover_bytes, "Cover over the size limit, rejecting upload");
                    let mut errors = ValidationErrors::new();
                    errors.add("cover", cover_too_large(max_cover_bytes));
                    return Err(DomainError::Validation(field_errors(&errors)).into());
                }
                form.cover = Some(CoverUpload {
                    file_name,
                    content_type,
                    bytes,
                    size,
                });
            }
            (Some(name), None) => {
                let (bytes, size) = read_capped(&mut field, MAX_TEXT_PART_BYTES).await?;
                if size > MAX_TEXT_PART_BYTES {
                    return Err(AppError::BadRequest(format!(
                        "The {name} field is too large."
                    )));
                }
                let value = match String::from_utf8(bytes) {
                    Ok(text) => FieldValue::text(&text),
                    Err(_) => FieldValue::NotText,
                };
                form.set_text(name, value);
            }
            _ => {
                while field.try_next().await.map_err(malformed)?.is_some() {}
            }
        }
    }

    Ok(form)
}

/// Read a part, buffering at most `keep` bytes. Returns the buffer and the
/// bytes read, which exceed `keep` only when reading stopped early.
async fn read_capped(field: &mut Field, keep: usize) -> Result<(Vec<u8>, usize), AppError> {
    let mut buffer = Vec::new();
    let mut size = 0usize;

    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        size = size.saturating_add(chunk.len());
        if size > keep {
            break;
        }
        buffer.extend_from_slice(&chunk);
    }

    Ok((buffer, size))
}
