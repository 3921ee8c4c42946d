//! 横幅图片文件存储

use crate::config::StorageConfig;
use crate::error::{AppError, AppResult};
use actix_files::Files;
use actix_web::web;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// 请求中上传的文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// 原文件扩展名 (小写, 仅字母数字)
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name.as_deref()?;
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(ext)
    }
}

/// 已存储文件的位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub key: String,
    pub url: String,
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn upload(&self, file: UploadedFile) -> AppResult<StoredFile>;

    async fn delete_file(&self, key: &str) -> AppResult<()>;
}

pub type SharedStorage = Arc<dyn FileStorage>;

/// 可选上传: 没有文件时返回 None (image_key / image_url 均为空)
pub async fn upload_optional(
    storage: &dyn FileStorage,
    file: Option<UploadedFile>,
) -> AppResult<Option<StoredFile>> {
    match file {
        Some(file) => Ok(Some(storage.upload(file).await?)),
        None => Ok(None),
    }
}

/// 生成存储 key: editions/<uuid>.<ext>
pub fn generate_key(file: &UploadedFile) -> String {
    match file.extension() {
        Some(ext) => format!("editions/{}.{}", Uuid::new_v4(), ext),
        None => format!("editions/{}", Uuid::new_v4()),
    }
}

/// 本地文件系统存储, 通过 serve_path 路由或外部 CDN 以 public_base_url 对外提供
#[derive(Clone)]
pub struct LocalFileStorage {
    root_dir: PathBuf,
    public_base_url: String,
}

impl LocalFileStorage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root_dir: PathBuf::from(&config.root_dir),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        let relative = Path::new(key);
        if key.is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(AppError::StorageError(format!("Invalid storage key: {key}")));
        }
        Ok(self.root_dir.join(relative))
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn upload(&self, file: UploadedFile) -> AppResult<StoredFile> {
        let key = generate_key(&file);
        let path = self.resolve(&key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::StorageError(format!("Failed to create directory: {e}")))?;
        }
        tokio::fs::write(&path, &file.bytes)
            .await
            .map_err(|e| AppError::StorageError(format!("Failed to write {key}: {e}")))?;

        log::info!("Stored file {} ({} bytes)", key, file.bytes.len());

        Ok(StoredFile {
            url: format!("{}/{}", self.public_base_url, key),
            key,
        })
    }

    async fn delete_file(&self, key: &str) -> AppResult<()> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                log::info!("Deleted file {}", key);
                Ok(())
            }
            // 已不存在视为删除成功
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("File {} already missing from storage", key);
                Ok(())
            }
            Err(e) => Err(AppError::StorageError(format!("Failed to delete {key}: {e}"))),
        }
    }
}

/// 挂载 root_dir 的静态文件路由
pub fn serve_uploads(cfg: &mut web::ServiceConfig, config: &StorageConfig) {
    if config.serve_path.is_empty() {
        return;
    }
    cfg.service(Files::new(&config.serve_path, &config.root_dir));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path) -> StorageConfig {
        StorageConfig {
            root_dir: dir.to_string_lossy().to_string(),
            public_base_url: "https://cdn.example.com/banners/".to_string(),
            serve_path: "/uploads".to_string(),
            max_image_bytes: 1024,
        }
    }

    fn storage_in(dir: &Path) -> LocalFileStorage {
        LocalFileStorage::new(&config_in(dir))
    }

    fn png(name: &str) -> UploadedFile {
        UploadedFile {
            file_name: Some(name.to_string()),
            content_type: Some("image/png".to_string()),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    #[test]
    fn test_extension() {
        assert_eq!(png("banner.PNG").extension().as_deref(), Some("png"));
        assert_eq!(png("banner").extension(), None);
        assert_eq!(png("../../etc/pa ss.w d").extension(), None);
    }

    #[tokio::test]
    async fn test_upload_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(dir.path());

        let stored = storage.upload(png("banner.png")).await.unwrap();
        assert!(stored.key.starts_with("editions/"));
        assert!(stored.key.ends_with(".png"));
        assert_eq!(
            stored.url,
            format!("https://cdn.example.com/banners/{}", stored.key)
        );

        let path = dir.path().join(&stored.key);
        assert_eq!(std::fs::read(&path).unwrap(), vec![0x89, b'P', b'N', b'G']);

        storage.delete_file(&stored.key).await.unwrap();
        assert!(!path.exists());

        // 重复删除不报错
        storage.delete_file(&stored.key).await.unwrap();
    }

    #[actix_web::test]
    async fn test_serves_uploaded_files() {
        use actix_web::http::StatusCode;
        use actix_web::{App, test};

        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let stored = storage_in(dir.path())
            .upload(png("banner.png"))
            .await
            .unwrap();

        let app =
            test::init_service(App::new().configure(|cfg| serve_uploads(cfg, &config))).await;

        let req = test::TestRequest::get()
            .uri(&format!("/uploads/{}", stored.key))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body.as_ref(), &[0x89, b'P', b'N', b'G']);

        let req = test::TestRequest::get()
            .uri("/uploads/editions/missing.png")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_serve_path_can_be_disabled() {
        use actix_web::http::StatusCode;
        use actix_web::{App, test};

        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.serve_path = String::new();
        let stored = storage_in(dir.path())
            .upload(png("banner.png"))
            .await
            .unwrap();

        let app =
            test::init_service(App::new().configure(|cfg| serve_uploads(cfg, &config))).await;
        let req = test::TestRequest::get()
            .uri(&format!("/uploads/{}", stored.key))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(dir.path());

        assert!(storage.delete_file("../outside.png").await.is_err());
        assert!(storage.delete_file("/etc/passwd").await.is_err());
        assert!(storage.delete_file("").await.is_err());
    }

    #[tokio::test]
    async fn test_upload_optional_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(dir.path());

        assert!(upload_optional(&storage, None).await.unwrap().is_none());
        assert!(
            upload_optional(&storage, Some(png("a.png")))
                .await
                .unwrap()
                .is_some()
        );
    }
}
