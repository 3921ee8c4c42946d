use actix_cors::Cors;

/// 管理后台跨域配置; PATCH 用于期次与充值记录的部分更新
pub fn create_cors() -> Cors {
    Cors::default()
        .allowed_origin_fn(|_, _req_head| {
            // 在生产环境中应该限制允许的域名
            true
        })
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
        // multipart 上传需要 Content-Type 等自定义 Header
        .allow_any_header()
        .max_age(3600)
}
