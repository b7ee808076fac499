use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum BlobError {
    #[error("upload failed: {0}")]
    Upload(String),
    #[error("delete failed: {0}")]
    Delete(String),
}

/// Object storage used for profile images. Implementations live outside of the
/// database crate, the core only ever talks to this trait.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under `key` and returns the public url of the object.
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<String, BlobError>;

    async fn delete(&self, key: &str) -> Result<(), BlobError>;

    /// Recovers the object key from a url previously returned by `put`.
    fn key_for_url(&self, url: &str) -> Option<String>;
}

/// Public url layout of the image bucket. Stored image urls are built from this,
/// so changing it breaks every url already in the database.
#[derive(Debug, Clone)]
pub struct BucketLayout {
    pub bucket: String,
    pub region: String,
}

impl BucketLayout {
    pub fn new(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: region.into(),
        }
    }

    fn base_url(&self) -> String {
        format!("https://{}.s3.{}.amazonaws.com/", self.bucket, self.region)
    }

    pub fn url_for(&self, key: &str) -> String {
        format!("{}{}", self.base_url(), key)
    }

    pub fn key_for(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.base_url())
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }
}

pub fn image_key(original_name: &str) -> String {
    format!(
        "profile_images/{}_{}",
        Uuid::new_v4(),
        sanitize_file_name(original_name)
    )
}

/// Reduces an uploaded file name to `[A-Za-z0-9._-]`, joining whitespace separated
/// parts with `_` and trimming leading/trailing dots and underscores.
pub fn sanitize_file_name(name: &str) -> String {
    let flattened: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .filter(|c| c.is_ascii())
        .collect();

    flattened
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(sanitize_file_name("My Photo.JPG"), "My_Photo.JPG");
        assert_eq!(sanitize_file_name("../../etc/passwd.png"), "etc_passwd.png");
        assert_eq!(sanitize_file_name("_.hidden.jpeg"), "hidden.jpeg");
        assert_eq!(sanitize_file_name("foto (1)ü.png"), "foto_1.png");
    }

    #[test]
    fn keys_follow_the_profile_images_prefix() {
        let key = image_key("me at beach.png");
        assert!(key.starts_with("profile_images/"));
        assert!(key.ends_with("_me_at_beach.png"));
    }

    #[test]
    fn urls_round_trip_through_the_layout() {
        let layout = BucketLayout::new("ijodidar-images", "ap-south-1");
        let url = layout.url_for("profile_images/abc_me.png");

        assert_eq!(
            url,
            "https://ijodidar-images.s3.ap-south-1.amazonaws.com/profile_images/abc_me.png"
        );
        assert_eq!(layout.key_for(&url).as_deref(), Some("profile_images/abc_me.png"));
        assert_eq!(layout.key_for("https://elsewhere.example/x.png"), None);
    }
}
