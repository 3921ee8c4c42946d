//! 测试辅助: 内存 SQLite 数据库、内存文件存储与种子数据

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use uuid::Uuid;

use crate::entities::{
    CreditStatus, DepositType, EditionStatus, PaymentForm, base_title_entity as base_titles,
    buyed_title_entity as buyed_titles, credit_history_entity as credit_histories,
    draw_item_entity as draw_items, edition_entity as editions, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::external::{FileStorage, StoredFile, UploadedFile};

/// 单连接的内存数据库, 已执行全部迁移
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

/// 内存文件存储, 记录上传与删除
#[derive(Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<String, Vec<u8>>>,
    deleted: Mutex<Vec<String>>,
    counter: AtomicUsize,
    fail_uploads: bool,
}

impl MemoryStorage {
    pub fn failing() -> Self {
        Self {
            fail_uploads: true,
            ..Default::default()
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.files.lock().unwrap().contains_key(key)
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileStorage for MemoryStorage {
    async fn upload(&self, file: UploadedFile) -> AppResult<StoredFile> {
        if self.fail_uploads {
            return Err(AppError::StorageError("bucket unavailable".to_string()));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let key = format!("editions/test-{n}.png");
        self.files.lock().unwrap().insert(key.clone(), file.bytes);
        Ok(StoredFile {
            url: format!("memory://{key}"),
            key,
        })
    }

    async fn delete_file(&self, key: &str) -> AppResult<()> {
        self.files.lock().unwrap().remove(key);
        self.deleted.lock().unwrap().push(key.to_string());
        Ok(())
    }
}

pub fn png() -> UploadedFile {
    UploadedFile {
        file_name: Some("banner.png".to_string()),
        content_type: Some("image/png".to_string()),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}

pub async fn seed_base_titles(db: &DatabaseConnection, names: &[&str]) {
    let now = Utc::now();
    for name in names {
        base_titles::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            dozens: Set(vec!["01".to_string(), "02".to_string(), "03".to_string()].into()),
            bar_code: Set(format!("BAR-{name}")),
            qr_code: Set(format!("QR-{name}")),
            chances: Set(2),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .expect("seed base title");
    }
}

pub async fn seed_edition(
    db: &DatabaseConnection,
    name: &str,
    status: EditionStatus,
    order: Option<i32>,
) -> editions::Model {
    let now = Utc::now();
    editions::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        draw_date: Set(now),
        display_order: Set(order),
        status: Set(status),
        image_key: Set(None),
        image_url: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("seed edition")
}

pub async fn seed_draw_item(
    db: &DatabaseConnection,
    edition_id: Uuid,
    name: &str,
) -> draw_items::Model {
    let now = Utc::now();
    draw_items::ActiveModel {
        id: Set(Uuid::new_v4()),
        edition_id: Set(edition_id),
        name: Set(name.to_string()),
        description: Set(Some(format!("{name} prize"))),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("seed draw item")
}

pub async fn seed_user(db: &DatabaseConnection, name: &str) -> users::Model {
    let now = Utc::now();
    users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(Some(format!("{}@example.com", name.to_lowercase()))),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("seed user")
}

pub async fn seed_buyed_title(
    db: &DatabaseConnection,
    user_id: Uuid,
    payment_form: PaymentForm,
) -> buyed_titles::Model {
    let now = Utc::now();
    buyed_titles::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        payment_form: Set(payment_form),
        payment_id: Set(Some("pay-1".to_string())),
        total_value: Set(10),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("seed buyed title")
}

pub async fn seed_credit_history(db: &DatabaseConnection) -> credit_histories::Model {
    let now = Utc::now();
    credit_histories::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(None),
        name: Set(None),
        description: Set("initial deposit".to_string()),
        value: Set(10.0),
        status: Set(CreditStatus::Pending),
        deposit_type: Set(DepositType::Pix),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("seed credit history")
}
