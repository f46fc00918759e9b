use std::io;
use std::path::Path;

use rocket::fs::TempFile;

/// Public URL prefix the uploads directory is mounted under.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Moves an uploaded file into `upload_dir` and returns its public path.
///
/// Names are `<unix millis>-<sanitized original name>`.
pub async fn save_upload(file: &mut TempFile<'_>, upload_dir: &Path) -> io::Result<String> {
    let original = file
        .raw_name()
        .map(|rn| rn.dangerous_unsafe_unsanitized_raw().as_str().to_string())
        .or_else(|| file.name().map(|n| n.to_string()))
        .unwrap_or_default();

    let mut safe = sanitize_filename(&original);
    if safe.is_empty() || safe.chars().all(|c| c == '.') {
        let ext = file
            .content_type()
            .and_then(|ct| ct.extension())
            .map(|e| e.to_string())
            .unwrap_or_else(|| "bin".to_string());
        safe = format!("upload.{}", ext);
    }

    let filename = format!("{}-{}", chrono::Utc::now().timestamp_millis(), safe);
    rocket::tokio::fs::create_dir_all(upload_dir).await?;
    file.move_copy_to(upload_dir.join(&filename)).await?;

    Ok(format!("{}/{}", PUBLIC_PREFIX, filename))
}

/// Lowercases, turns whitespace runs into `_` and drops anything outside `[a-z0-9._-]`.
pub fn sanitize_filename(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_space = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::sanitize_filename;

    #[test]
    fn sanitizes_names() {
        assert_eq!(sanitize_filename("Foto Capa.PNG"), "foto_capa.png");
        assert_eq!(sanitize_filename("a  b\tc.jpg"), "a_b_c.jpg");
        assert_eq!(sanitize_filename("../../etc/passwd"), "....etcpasswd");
        assert_eq!(sanitize_filename("ação.jpg"), "ao.jpg");
    }
}
