// api/images.rs
use crate::api::client::ApiClient;
use crate::api::wire::{ImageMetadataWire, UploadWire};
use crate::api::ApiError;
use crate::domain::records::NewImageMetadata;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::header::CONTENT_TYPE;

/// Bytes pulled from an image URL, ready to be packaged for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Download the bytes behind an image URL. The content type comes from
/// the response header, falling back to the caller's guess.
pub fn fetch_image_bytes(
    api: &ApiClient,
    url: &str,
    fallback_content_type: &str,
) -> Result<FetchedImage, ApiError> {
    let resp = api.send(api.http().get(url))?;

    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(fallback_content_type)
        .to_string();

    let bytes = resp
        .bytes()
        .map_err(|e| ApiError::Network(e.to_string()))?
        .to_vec();

    Ok(FetchedImage {
        bytes,
        content_type,
    })
}

/// Create an image-metadata record, shipping the file bytes in the same
/// multipart request. Returns the assigned metadata id.
pub fn create_image_metadata(
    api: &ApiClient,
    meta: &NewImageMetadata,
    file: FetchedImage,
) -> Result<i64, ApiError> {
    let url = api.endpoint("/api/incidentImageMetadata/")?;

    let part = Part::bytes(file.bytes)
        .file_name(meta.filename.clone())
        .mime_str(&file.content_type)
        .map_err(|e| ApiError::Upload(format!("bad content type: {e}")))?;

    let form = Form::new()
        .text("filename", meta.filename.clone())
        .text("user_id", meta.user_id.to_string())
        .text("description", meta.description.clone())
        .text("Tags", "null")
        .part("img_file", part);

    let resp = api.send(api.http().post(url).multipart(form))?;
    let wire: ImageMetadataWire = resp.json().map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(wire.id)
}

/// Upload a raw photo (suspect mugshots) and return its hosted URL.
pub fn upload_photo(
    api: &ApiClient,
    filename: &str,
    file: FetchedImage,
) -> Result<String, ApiError> {
    let url = api.endpoint("/api/uploads/")?;

    let part = Part::bytes(file.bytes)
        .file_name(filename.to_string())
        .mime_str(&file.content_type)
        .map_err(|e| ApiError::Upload(format!("bad content type: {e}")))?;

    let form = Form::new().part("img_file", part);

    let resp = api.send(api.http().post(url).multipart(form))?;
    let wire: UploadWire = resp.json().map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(wire.url)
}
