//! Multipart blog forms and inline image encoding.
//!
//! Uploaded images are not written anywhere on disk: they are stored inside the post
//! row as a `data:<mime>;base64,<payload>` string. The size bound keeps that from
//! bloating every read of the post.

use actix_multipart::{Field, Multipart};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::StreamExt;

use crate::error::AppError;

/// Text parts (title, content) larger than this are rejected.
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// A decoded image part.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            STANDARD.encode(&self.bytes)
        )
    }
}

/// The fields of a create/update post form.
#[derive(Debug, Default)]
pub struct BlogForm {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<ImageUpload>,
}

impl BlogForm {
    /// Reads every part of `payload`.
    ///
    /// `title` and `content` are text parts, `image` must be an `image/*` file of at most
    /// `max_image_bytes`. A `video` part is accepted and discarded; unknown parts are
    /// drained and ignored.
    pub async fn read(mut payload: Multipart, max_image_bytes: usize) -> Result<Self, AppError> {
        let mut form = BlogForm::default();

        while let Some(item) = payload.next().await {
            let mut field = item?;
            let name = field
                .content_disposition()
                .get_name()
                .unwrap_or_default()
                .to_string();

            match name.as_str() {
                "title" => form.title = Some(read_text(&mut field, &name).await?),
                "content" => form.content = Some(read_text(&mut field, &name).await?),
                "image" => form.image = read_image(&mut field, max_image_bytes).await?,
                _ => drain(&mut field).await?,
            }
        }

        Ok(form)
    }
}

async fn read_text(field: &mut Field, name: &str) -> Result<String, AppError> {
    let bytes = read_bounded(field, MAX_TEXT_FIELD_BYTES)
        .await?
        .ok_or_else(|| AppError::PayloadTooLarge(format!("Field '{}' is too large", name)))?;
    String::from_utf8(bytes)
        .map_err(|_| AppError::ValidationError(format!("Field '{}' must be UTF-8 text", name)))
}

async fn read_image(
    field: &mut Field,
    max_image_bytes: usize,
) -> Result<Option<ImageUpload>, AppError> {
    let content_type = field
        .content_type()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_default();
    if !content_type.starts_with("image/") {
        return Err(AppError::ValidationError(
            "Field 'image' must be an image".into(),
        ));
    }

    let bytes = read_bounded(field, max_image_bytes).await?.ok_or_else(|| {
        AppError::PayloadTooLarge(format!("Image exceeds {} bytes", max_image_bytes))
    })?;

    // a file input left empty still sends a zero-length part
    if bytes.is_empty() {
        return Ok(None);
    }

    Ok(Some(ImageUpload {
        content_type,
        bytes,
    }))
}

/// Collects a part, or returns `None` as soon as it grows past `limit`.
async fn read_bounded(field: &mut Field, limit: usize) -> Result<Option<Vec<u8>>, AppError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        if bytes.len() + chunk.len() > limit {
            return Ok(None);
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(Some(bytes))
}

async fn drain(field: &mut Field) -> Result<(), AppError> {
    while let Some(chunk) = field.next().await {
        chunk?;
    }
    Ok(())
}
