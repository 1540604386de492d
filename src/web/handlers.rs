//! Request handlers for the HTML forms and the JSON API.

use anyhow::anyhow;
use axum::{
    extract::{
        multipart::{Multipart, MultipartError},
        State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    Json,
};
use base64::{engine::general_purpose, Engine as _};
use log::{error, info};
use serde::Serialize;
use std::sync::Arc;

use super::{uploads, AppState};
use crate::codec::{self, LogReporter, StegoError};
use crate::processing::{Carrier, CarrierError};

#[derive(Debug, Serialize)]
pub struct EncodeResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    carrier_image_base64: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DecodeResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

/// An uploaded file field.
struct UploadedFile {
    file_name: String,
    data: Vec<u8>,
}

/// The fields this service understands, gathered from one multipart body.
#[derive(Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    message: Option<String>,
}

async fn read_form(multipart: &mut Multipart, file_field: &str) -> Result<UploadForm, MultipartError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        if name == file_field {
            let file_name = field.file_name().unwrap_or("").to_string();
            let data = field.bytes().await?;
            form.file = Some(UploadedFile {
                file_name,
                data: data.to_vec(),
            });
        } else if name == "message" {
            form.message = Some(field.text().await?);
        }
    }

    Ok(form)
}

pub async fn index() -> Html<String> {
    Html(super::pages::index())
}

pub async fn encode_page() -> Html<String> {
    Html(super::pages::encode())
}

pub async fn decode_page() -> Html<String> {
    Html(super::pages::decode())
}

pub async fn about() -> Html<String> {
    Html(super::pages::about())
}

/// `POST /encode`: store the upload, encode it and redirect to the PNG.
pub async fn encode_upload(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Redirect {
    match encode_form(&state, &mut multipart).await {
        Ok(name) => {
            info!("✅ Encoded image available as {}", name);
            Redirect::to(&format!("/encoded/{}", name))
        }
        Err(e) => {
            error!("❌ There was a problem encoding: {}", e);
            Redirect::to("/encode")
        }
    }
}

async fn encode_form(state: &AppState, multipart: &mut Multipart) -> anyhow::Result<String> {
    let form = read_form(multipart, "file").await?;
    let file = form
        .file
        .ok_or_else(|| anyhow!("no image file has been provided"))?;
    info!("An image file has been provided: {}", file.file_name);
    let message = form
        .message
        .ok_or_else(|| anyhow!("no message has been provided"))?;

    uploads::store_and_encode(
        &state.config.uploads.encode_dir,
        &file.file_name,
        file.data,
        message,
    )
    .await
}

/// `POST /decode`: store the upload, decode it and redirect to the text.
pub async fn decode_upload(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Redirect {
    match decode_form(&state, &mut multipart).await {
        Ok(name) => {
            info!("✅ Decoded message available as {}", name);
            Redirect::to(&format!("/decoded/{}", name))
        }
        Err(e) => {
            error!("❌ There was a problem decoding: {}", e);
            Redirect::to("/decode")
        }
    }
}

async fn decode_form(state: &AppState, multipart: &mut Multipart) -> anyhow::Result<String> {
    let form = read_form(multipart, "file").await?;
    let file = form
        .file
        .ok_or_else(|| anyhow!("no image file has been provided"))?;
    info!("An image file has been provided: {}", file.file_name);

    uploads::store_and_decode(&state.config.uploads.decode_dir, &file.file_name, file.data).await
}

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "lsb-stego",
        "frame_token": String::from_utf8_lossy(codec::FRAME_TOKEN),
    }))
}

/// `POST /api/encode`: multipart `image` + `message`, answers with a base64 PNG.
pub async fn api_encode(mut multipart: Multipart) -> Result<impl IntoResponse, ApiError> {
    let form = read_form(&mut multipart, "image").await.map_err(|e| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Failed to read multipart data: {}", e),
        )
    })?;

    let file = form
        .file
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "No image provided"))?;
    let message = form
        .message
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "No message provided"))?;

    info!(
        "📤 Received image: {} ({} bytes)",
        file.file_name,
        file.data.len()
    );

    let png = tokio::task::spawn_blocking(move || encode_png(&file.data, &message))
        .await
        .map_err(|e| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Encoding task panicked: {}", e),
            )
        })??;

    info!("✅ Encoding complete! Carrier size: {} bytes", png.len());

    Ok((
        StatusCode::OK,
        Json(EncodeResponse {
            success: true,
            message: format!("Successfully encoded {}", file.file_name),
            carrier_image_base64: Some(general_purpose::STANDARD.encode(&png)),
        }),
    ))
}

/// `POST /api/decode`: multipart `image`, answers with the hidden message.
///
/// An image without a message is not an error: the response has
/// `success: false` and no `message`.
pub async fn api_decode(mut multipart: Multipart) -> Result<impl IntoResponse, ApiError> {
    let form = read_form(&mut multipart, "image").await.map_err(|e| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Failed to read multipart data: {}", e),
        )
    })?;

    let file = form
        .file
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "No image provided"))?;

    let message = tokio::task::spawn_blocking(move || decode_png(&file.data))
        .await
        .map_err(|e| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Decoding task panicked: {}", e),
            )
        })??;

    Ok(Json(DecodeResponse {
        success: message.is_some(),
        message,
    }))
}

fn carrier_error(e: CarrierError) -> ApiError {
    match e {
        CarrierError::Load(_) | CarrierError::UnsupportedColor(_) => {
            api_error(StatusCode::BAD_REQUEST, e.to_string())
        }
        _ => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

fn encode_png(image_bytes: &[u8], message: &str) -> Result<Vec<u8>, ApiError> {
    let carrier = Carrier::from_bytes(image_bytes).map_err(carrier_error)?;

    let encoded = codec::encode_with(&carrier.pixels, message.as_bytes(), &LogReporter::default())
        .map_err(|e| match e {
            StegoError::MessageTooLarge { .. } | StegoError::Encoding(_) => {
                api_error(StatusCode::BAD_REQUEST, e.to_string())
            }
            _ => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        })?;

    carrier
        .with_pixels(encoded)
        .to_png_bytes()
        .map_err(carrier_error)
}

fn decode_png(image_bytes: &[u8]) -> Result<Option<String>, ApiError> {
    let carrier = Carrier::from_bytes(image_bytes).map_err(carrier_error)?;

    match codec::decode_with(&carrier.pixels, &LogReporter::default()) {
        Ok(message) => Ok(Some(message)),
        Err(e) if e.is_no_message() => Ok(None),
        Err(e) => Err(api_error(StatusCode::BAD_REQUEST, e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, LumaA};
    use std::io::Cursor;

    fn gray_alpha_png(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageLumaA8(ImageBuffer::from_fn(width, height, |x, y| {
            LumaA([((x + y) * 9) as u8, 255])
        }));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_encode_png_then_decode_png() {
        let png = encode_png(&gray_alpha_png(20, 20), "api round trip").unwrap();
        assert_eq!(decode_png(&png).unwrap(), Some("api round trip".to_string()));
    }

    #[test]
    fn test_decode_png_without_message() {
        assert_eq!(decode_png(&gray_alpha_png(20, 20)).unwrap(), None);
    }

    #[test]
    fn test_encode_png_too_large_is_bad_request() {
        let (status, Json(body)) = encode_png(&gray_alpha_png(4, 4), "far too long").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("too large"));
    }

    #[test]
    fn test_garbage_upload_is_bad_request() {
        let (status, _) = decode_png(b"not a png").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
