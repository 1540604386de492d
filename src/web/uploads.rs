//! Upload naming and storage helpers for the web service.

use anyhow::{anyhow, Result};
use log::info;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::path::{Path, PathBuf};

use crate::codec::LogReporter;
use crate::lab;
use crate::processing::ImageKind;

/// Image kinds accepted by the encode form.
pub const ENCODE_KINDS: &[ImageKind] = &[ImageKind::Jpeg, ImageKind::Png];

/// Image kinds accepted by the decode form. Only lossless input can still
/// hold a message.
pub const DECODE_KINDS: &[ImageKind] = &[ImageKind::Png];

/// Length of the random prefix given to every stored upload.
const ID_LENGTH: usize = 20;

/// Reduce a client supplied file name to a safe, flat ASCII name.
///
/// Path separators and whitespace become `_`, every other character outside
/// `[A-Za-z0-9._-]` is dropped, and leading or trailing dots and
/// underscores are stripped.
///
/// # Example
/// ```
/// use lsb_stego::web::uploads::secure_filename;
///
/// assert_eq!(secure_filename("../../etc/passwd"), "etc_passwd");
/// assert_eq!(secure_filename("My cool photo.jpg"), "My_cool_photo.jpg");
/// ```
pub fn secure_filename(name: &str) -> String {
    let spaced: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Random upload prefix: 20 ASCII alphanumerics followed by `_`.
pub fn random_id() -> String {
    let mut id: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LENGTH)
        .map(char::from)
        .collect();
    id.push('_');
    id
}

/// Extension of `file_name` (with the leading dot) if its kind is allowed.
pub fn allowed_extension(file_name: &str, kinds: &[ImageKind]) -> Option<String> {
    let path = Path::new(file_name);
    let kind = ImageKind::from_path(path)?;
    if !kinds.contains(&kind) {
        return None;
    }
    let extension = path.extension()?.to_str()?;
    Some(format!(".{}", extension))
}

/// Store an uploaded image and message in `dir` and encode them.
///
/// Files written: `<id>original<ext>`, `<id>message.txt` and, on success,
/// `<id>encoded.png`.
///
/// # Returns
/// - `Ok(String)`: File name of the encoded PNG inside `dir`
/// - `Err`: Invalid upload, I/O failure or any encode failure
pub async fn store_and_encode(
    dir: &Path,
    file_name: &str,
    image_data: Vec<u8>,
    message: String,
) -> Result<String> {
    let file_name = secure_filename(file_name);
    if file_name.is_empty() {
        return Err(anyhow!("image filename is not valid"));
    }
    let extension = allowed_extension(&file_name, ENCODE_KINDS)
        .ok_or_else(|| anyhow!("the image {} does not have a valid extension", file_name))?;
    info!("The image has a valid extension");

    let id = random_id();
    let image_path = dir.join(format!("{}original{}", id, extension));
    let message_path = dir.join(format!("{}message.txt", id));
    let output_name = format!("{}encoded.png", id);
    let output_path = dir.join(&output_name);

    tokio::fs::write(&image_path, &image_data).await?;
    tokio::fs::write(&message_path, message.as_bytes()).await?;

    run_blocking(move || {
        lab::encode_file(
            &image_path,
            &message_path,
            &output_path,
            &LogReporter::default(),
        )
    })
    .await?;

    Ok(output_name)
}

/// Store an uploaded PNG in `dir` and decode its message.
///
/// Files written: `<id>encoded<ext>` and, on success, `<id>secret.txt`.
///
/// # Returns
/// - `Ok(String)`: File name of the recovered message inside `dir`
/// - `Err`: Invalid upload, I/O failure or no message in the image
pub async fn store_and_decode(dir: &Path, file_name: &str, image_data: Vec<u8>) -> Result<String> {
    let file_name = secure_filename(file_name);
    if file_name.is_empty() {
        return Err(anyhow!("image filename is not valid"));
    }
    let extension = allowed_extension(&file_name, DECODE_KINDS)
        .ok_or_else(|| anyhow!("the image {} does not have a valid extension", file_name))?;
    info!("The image has a valid extension");

    let id = random_id();
    let image_path = dir.join(format!("{}encoded{}", id, extension));
    let output_name = format!("{}secret.txt", id);
    let output_path: PathBuf = dir.join(&output_name);

    tokio::fs::write(&image_path, &image_data).await?;

    run_blocking(move || lab::decode_file(&image_path, &output_path, &LogReporter::default()))
        .await?;

    Ok(output_name)
}

/// Run CPU-bound codec work on the blocking thread pool.
async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, lab::LabError> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| anyhow!("Steganography task panicked: {}", e))??;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, Rgb};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x * 7) as u8, (y * 5) as u8, 200])
        }));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("photo.png"), "photo.png");
        assert_eq!(secure_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("C:\\Users\\me\\cat pic.JPG"), "C_Users_me_cat_pic.JPG");
        assert_eq!(secure_filename("ünïcode.png"), "ncode.png");
        assert_eq!(secure_filename("..."), "");
    }

    #[test]
    fn test_random_id_shape() {
        let id = random_id();
        assert_eq!(id.len(), ID_LENGTH + 1);
        assert!(id.ends_with('_'));
        assert!(id[..ID_LENGTH].chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(random_id(), random_id());
    }

    #[test]
    fn test_allowed_extension() {
        assert_eq!(allowed_extension("a.jpeg", ENCODE_KINDS), Some(".jpeg".to_string()));
        assert_eq!(allowed_extension("a.PNG", DECODE_KINDS), Some(".PNG".to_string()));
        assert_eq!(allowed_extension("a.jpg", DECODE_KINDS), None);
        assert_eq!(allowed_extension("a.bmp", ENCODE_KINDS), None);
    }

    #[tokio::test]
    async fn test_store_encode_then_decode() {
        let encode_dir = tempfile::tempdir().unwrap();
        let decode_dir = tempfile::tempdir().unwrap();

        let encoded_name = store_and_encode(
            encode_dir.path(),
            "holiday photo.png",
            png_bytes(32, 32),
            "see you at noon".to_string(),
        )
        .await
        .unwrap();
        assert!(encoded_name.ends_with("encoded.png"));

        let encoded = std::fs::read(encode_dir.path().join(&encoded_name)).unwrap();
        let secret_name = store_and_decode(decode_dir.path(), "upload.png", encoded)
            .await
            .unwrap();
        let secret = std::fs::read_to_string(decode_dir.path().join(secret_name)).unwrap();
        assert_eq!(secret, "see you at noon");
    }

    #[tokio::test]
    async fn test_store_rejects_bad_extension() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_and_encode(dir.path(), "anim.gif", vec![1, 2, 3], "x".to_string())
            .await
            .is_err());
        assert!(store_and_decode(dir.path(), "photo.jpg", vec![1, 2, 3])
            .await
            .is_err());
        // Nothing is stored for rejected uploads.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_decode_of_plain_image_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = store_and_decode(dir.path(), "plain.png", png_bytes(16, 16)).await;
        let err = result.unwrap_err();
        let lab_err = err.downcast_ref::<lab::LabError>().unwrap();
        assert_eq!(lab_err.code(), 9);
    }
}
