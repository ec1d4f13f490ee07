use actix_multipart::Multipart;
use auth_core::{require, Role, RoleGate};
use futures_util::StreamExt;

use crate::error::{AppError, Result};

pub mod analysis;
pub mod appointments;
pub mod auth;
pub mod doctors;
pub mod health;
pub mod images;
pub mod patients;
pub mod reports;
pub mod studies;

/// Clinical staff: everything except the patient-facing surface.
pub(crate) const STAFF: RoleGate = require(&[Role::Admin, Role::Clinician]);
/// Administrative mutations only.
pub(crate) const ADMIN_ONLY: RoleGate = require(&[Role::Admin]);

pub(crate) struct UploadedFile {
    pub data: Vec<u8>,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

/// Read the single file out of a multipart body; the field may be called
/// "file" or "image", other fields are ignored.
pub(crate) async fn read_file_field(mut payload: Multipart, max_bytes: usize) -> Result<UploadedFile> {
    let mut data = Vec::new();
    let mut file_name = None;
    let mut mime_type = None;

    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| AppError::BadRequest(format!("multipart error: {e}")))?;

        let name = field.name().to_string();
        match name.as_str() {
            "file" | "image" => {
                file_name = field
                    .content_disposition()
                    .get_filename()
                    .map(|s| s.to_string());
                mime_type = field.content_type().map(|m| m.to_string());

                while let Some(chunk) = field.next().await {
                    let chunk =
                        chunk.map_err(|e| AppError::BadRequest(format!("read error: {e}")))?;
                    if data.len() + chunk.len() > max_bytes {
                        return Err(AppError::BadRequest(format!(
                            "file exceeds the {max_bytes}-byte limit"
                        )));
                    }
                    data.extend_from_slice(&chunk);
                }
            }
            _ => {}
        }
    }

    if data.is_empty() {
        return Err(AppError::BadRequest(
            "upload the file in a 'file' (or 'image') form field".to_string(),
        ));
    }

    Ok(UploadedFile {
        data,
        file_name,
        mime_type,
    })
}
