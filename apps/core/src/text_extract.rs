//! Text extraction for email attachments.
//! Supports: TXT, EML, MD, CSV, JSON, PDF, DOCX

use crate::error::AppError;
use tracing::{debug, info, warn};

/// Resolve the format of an attachment: the file extension wins, content sniffing
/// covers files uploaded without one.
fn resolve_extension(file_name: &str, file_data: &[u8]) -> String {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    if !extension.is_empty() {
        return extension;
    }

    infer::get(file_data)
        .map(|kind| kind.extension().to_string())
        .unwrap_or_else(|| "txt".to_string())
}

/// MIME type used when forwarding the raw file to the classification service.
pub fn detect_mime(file_name: &str, file_data: &[u8]) -> &'static str {
    if let Some(kind) = infer::get(file_data) {
        return kind.mime_type();
    }

    match resolve_extension(file_name, file_data).as_str() {
        "txt" => "text/plain",
        "eml" => "message/rfc822",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}

/// Extract text content from binary file data based on file extension
pub fn extract_text_from_file(file_name: &str, file_data: &[u8]) -> Result<String, AppError> {
    let extension = resolve_extension(file_name, file_data);

    info!("Extracting text from attachment: {} (type: {})", file_name, extension);

    match extension.as_str() {
        "txt" | "eml" | "md" | "csv" | "json" => String::from_utf8(file_data.to_vec())
            .map(|text| clean_extracted_text(&text))
            .map_err(|e| AppError::Validation(format!("Invalid UTF-8 content: {}", e))),

        "pdf" => extract_pdf_text(file_data),

        "docx" => extract_docx_text(file_data),

        _ => Err(AppError::Validation(format!(
            "Unsupported file extension: {}",
            extension
        ))),
    }
}

fn extract_pdf_text(file_data: &[u8]) -> Result<String, AppError> {
    match pdf_extract::extract_text_from_mem(file_data) {
        Ok(text) => {
            let cleaned = clean_extracted_text(&text);
            debug!("PDF extraction successful: {} characters", cleaned.len());
            Ok(cleaned)
        }
        Err(e) => {
            warn!("PDF extraction failed: {}", e);
            Err(AppError::Validation(format!("Failed to extract PDF text: {}", e)))
        }
    }
}

fn extract_docx_text(file_data: &[u8]) -> Result<String, AppError> {
    let docx = docx_rs::read_docx(file_data).map_err(|e| {
        warn!("DOCX extraction failed: {}", e);
        AppError::Validation(format!("Failed to extract DOCX text: {}", e))
    })?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            docx_rs::DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    let cleaned = clean_extracted_text(&paragraphs.join("\n"));
    debug!("DOCX extraction successful: {} characters", cleaned.len());
    Ok(cleaned)
}

fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    para.children
        .iter()
        .filter_map(|pc| match pc {
            docx_rs::ParagraphChild::Run(run) => Some(
                run.children
                    .iter()
                    .filter_map(|rc| match rc {
                        docx_rs::RunChild::Text(t) => Some(t.text.as_str()),
                        _ => None,
                    })
                    .collect::<String>(),
            ),
            _ => None,
        })
        .collect()
}

/// Trim every line and drop the blank ones.
fn clean_extracted_text(text: &str) -> String {
    text.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
