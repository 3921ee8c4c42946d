use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use editions_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::{LocalFileStorage, SharedStorage, serve_uploads},
    handlers,
    middlewares::create_cors,
    services::*,
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // 横幅图片存储
    let storage: SharedStorage = Arc::new(LocalFileStorage::new(&config.storage));
    log::info!(
        "Storing banner images under {} (served from {})",
        config.storage.root_dir,
        config.storage.public_base_url
    );

    // 创建服务
    let edition_service = EditionService::new(
        pool.clone(),
        storage.clone(),
        config.editions.scope_titles_to_edition,
    );
    let title_service = TitleService::new(pool.clone());
    let base_title_service = BaseTitleService::new(pool.clone());
    let credit_history_service = CreditHistoryService::new(pool.clone());
    let storage_config = config.storage.clone();

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(edition_service.clone()))
            .app_data(web::Data::new(title_service.clone()))
            .app_data(web::Data::new(base_title_service.clone()))
            .app_data(web::Data::new(credit_history_service.clone()))
            .app_data(web::Data::new(storage_config.clone()))
            .configure(swagger_config)
            .configure(|cfg| serve_uploads(cfg, &storage_config))
            .service(
                web::scope("/api/v1")
                    .configure(handlers::edition_config)
                    .configure(handlers::title_config)
                    .configure(handlers::credit_history_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
