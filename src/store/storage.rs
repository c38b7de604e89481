/// Fallback image when a user has no avatar file.
pub const DEFAULT_AVATAR: &str = "/static/default-avatar.png";

/// Builds public view URLs for files in Appwrite storage buckets.
#[derive(Debug, Clone)]
pub struct StorageUrls {
    pub endpoint: String,
    pub project_id: String,
    pub avatars_bucket: String,
    pub posts_bucket: String,
}

impl StorageUrls {
    pub fn file_view_url(&self, bucket: &str, file_id: &str) -> String {
        format!(
            "{}/storage/buckets/{}/files/{}/view?project={}",
            self.endpoint, bucket, file_id, self.project_id
        )
    }

    pub fn avatar_url(&self, avatar_id: Option<&str>) -> String {
        match avatar_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => self.file_view_url(&self.avatars_bucket, id),
            None => DEFAULT_AVATAR.to_string(),
        }
    }

    pub fn post_file_url(&self, file_id: &str) -> String {
        self.file_view_url(&self.posts_bucket, file_id)
    }
}
