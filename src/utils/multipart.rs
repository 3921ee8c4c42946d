//! multipart/form-data 请求解析: 文本字段 + 可选图片文件

use crate::error::{AppError, AppResult};
use crate::external::UploadedFile;
use actix_multipart::Multipart;
use futures_util::TryStreamExt;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;
/// 单个请求的字段数上限 (含文件字段)
pub const MAX_FORM_FIELDS: usize = 32;

#[derive(Debug, Default)]
pub struct FormData {
    pub fields: Map<String, Value>,
    pub file: Option<UploadedFile>,
}

impl FormData {
    /// 空字符串字段视为未提供
    pub fn insert_text(&mut self, name: &str, value: String) {
        if value.trim().is_empty() {
            return;
        }
        self.fields.insert(name.to_string(), Value::String(value));
    }

    pub fn parse<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| AppError::ValidationError(format!("Invalid form data: {e}")))
    }
}

/// 读取表单; 名为 `file_field` 的字段作为图片文件, 其余作为文本
pub async fn read_form(
    mut payload: Multipart,
    file_field: &str,
    max_file_bytes: usize,
) -> AppResult<FormData> {
    let mut form = FormData::default();
    let mut field_count = 0usize;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::ValidationError(format!("Malformed multipart body: {e}")))?
    {
        field_count += 1;
        if field_count > MAX_FORM_FIELDS {
            return Err(AppError::ValidationError(format!(
                "Form has more than {MAX_FORM_FIELDS} fields"
            )));
        }

        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string());
        let content_type = field.content_type().map(|m| m.essence_str().to_string());

        let is_file = name == file_field;
        let limit = if is_file {
            max_file_bytes
        } else {
            MAX_TEXT_FIELD_BYTES
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::ValidationError(format!("Malformed multipart body: {e}")))?
        {
            if bytes.len() + chunk.len() > limit {
                return Err(AppError::ValidationError(format!(
                    "Field '{name}' exceeds {limit} bytes"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        if is_file {
            // 空文件输入视为未上传
            if bytes.is_empty() {
                continue;
            }
            if !content_type
                .as_deref()
                .is_some_and(|ct| ct.starts_with("image/"))
            {
                return Err(AppError::ValidationError(
                    "Uploaded file must be an image".to_string(),
                ));
            }
            form.file = Some(UploadedFile {
                file_name,
                content_type,
                bytes,
            });
        } else if !name.is_empty() {
            let text = String::from_utf8(bytes).map_err(|_| {
                AppError::ValidationError(format!("Field '{name}' is not valid UTF-8"))
            })?;
            form.insert_text(&name, text);
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        name: String,
        end_title: Option<String>,
    }

    #[test]
    fn test_empty_text_fields_are_skipped() {
        let mut form = FormData::default();
        form.insert_text("name", "Edition 1".to_string());
        form.insert_text("end_title", "   ".to_string());

        let sample: Sample = form.parse().unwrap();
        assert_eq!(sample.name, "Edition 1");
        assert!(sample.end_title.is_none());
    }

    #[test]
    fn test_parse_missing_required_field() {
        let form = FormData::default();
        let err = form.parse::<Sample>().unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
