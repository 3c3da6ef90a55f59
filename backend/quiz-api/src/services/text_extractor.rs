use anyhow::{Context, Result};

/// Extracts plain text from uploaded PDF bytes.
///
/// pdf-extract is CPU-bound and synchronous, so the work runs on the
/// blocking pool. Encrypted, scanned or corrupted documents surface as
/// extraction errors; yielding no text at all is not an error here (the
/// generator rejects empty source text later).
pub async fn extract_pdf_text(bytes: Vec<u8>) -> Result<String> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .context("PDF extraction task panicked")?
        .map_err(|e| anyhow::anyhow!("Failed to extract text from PDF: {}", e))?;
    Ok(text.trim().to_string())
}
