// ==========================================
// 总装排产优化系统 - 字段映射器实现
// ==========================================
// 职责: 原始行 (表头 -> 文本) → PlanLineItem + 类型转换
// 表头匹配: trim 后大小写不敏感，支持别名
// ==========================================

use crate::domain::plan::PlanLineItem;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use serde_json::Map;
use std::collections::HashMap;

/// 标准字段 -> 可接受的表头别名（小写）
const FIELD_ALIASES: &[(&str, &[&str])] = &[
    ("id", &["id"]),
    ("date", &["date"]),
    ("itemCode", &["itemcode", "item_code"]),
    ("model", &["model"]),
    ("color", &["color"]),
    ("type", &["type", "body_type"]),
    ("quantity", &["quantity"]),
];

pub struct FieldMapper;

impl FieldMapper {
    /// 表头归一化: 原始表头 -> 标准字段名
    ///
    /// 无法识别的列被忽略
    pub fn normalize_row(&self, row: &RawRow) -> HashMap<&'static str, String> {
        let mut normalized = HashMap::new();
        for (header, value) in row {
            if let Some(field) = canonical_field(header) {
                normalized.insert(field, value.trim().to_string());
            }
        }
        normalized
    }

    /// 检查表头是否包含某个标准字段
    pub fn has_column(&self, headers: &[String], field: &str) -> bool {
        headers
            .iter()
            .any(|header| canonical_field(header) == Some(field))
    }

    /// 映射单行
    ///
    /// # 参数
    /// - `row_number`: 从 1 开始的数据行序号（不含表头，已跳过空行）
    pub fn map_to_line_item(&self, row: &RawRow, row_number: usize) -> ImportResult<PlanLineItem> {
        let fields = self.normalize_row(row);

        let id = match get_string(&fields, "id") {
            Some(raw) => parse_integer(&raw, "id", row_number)?,
            None => row_number as i64,
        };

        let quantity = match get_string(&fields, "quantity") {
            Some(raw) => parse_integer(&raw, "quantity", row_number)?,
            None => 0,
        };
        if quantity < 0 {
            return Err(ImportError::TypeConversionError {
                row: row_number,
                field: "quantity".to_string(),
                message: format!("数量不能为负数: {}", quantity),
            });
        }

        Ok(PlanLineItem {
            id,
            date: get_string(&fields, "date").unwrap_or_default(),
            item_code: get_string(&fields, "itemCode").unwrap_or_default(),
            model: get_string(&fields, "model").unwrap_or_default(),
            color: get_string(&fields, "color").unwrap_or_default(),
            body_type: get_string(&fields, "type").unwrap_or_default(),
            quantity,
            extra: Map::new(),
        })
    }
}

/// 表头 -> 标准字段名（trim 后大小写不敏感）
fn canonical_field(header: &str) -> Option<&'static str> {
    let key = header.trim().to_lowercase();
    FIELD_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.contains(&key.as_str()))
        .map(|(field, _)| *field)
}

/// 提取非空字符串字段
fn get_string(fields: &HashMap<&'static str, String>, key: &str) -> Option<String> {
    fields
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

/// 解析整数，接受 Excel 的整值浮点 (如 "15.0")
fn parse_integer(raw: &str, field: &str, row_number: usize) -> ImportResult<i64> {
    if let Ok(v) = raw.parse::<i64>() {
        return Ok(v);
    }

    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
        _ => Err(ImportError::TypeConversionError {
            row: row_number,
            field: field.to_string(),
            message: format!("无法解析为整数: {}", raw),
        }),
    }
}
