// ==========================================
// 总装排产优化系统 - 文件解析器实现
// ==========================================
// 阶段: 上传文件内容 -> 原始行 (表头 -> 单元格文本)
// 支持: Excel (.xlsx) / CSV (.csv)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{Reader, Xlsx};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;

/// 原始行: 表头 -> 单元格文本（已 trim）
pub type RawRow = HashMap<String, String>;

/// 解析结果: 表头 + 数据行
///
/// 短行（列数少于表头）中缺失的列不出现在 RawRow 中，列检查以 headers 为准
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

// ==========================================
// 文件格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanFileFormat {
    Xlsx,
    Csv,
}

impl PlanFileFormat {
    /// 从扩展名/格式名解析（大小写不敏感，允许带点）
    pub fn parse(s: &str) -> ImportResult<Self> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "xlsx" => Ok(PlanFileFormat::Xlsx),
            "csv" => Ok(PlanFileFormat::Csv),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for PlanFileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanFileFormat::Xlsx => write!(f, "xlsx"),
            PlanFileFormat::Csv => write!(f, "csv"),
        }
    }
}

/// 文件解析接口
pub trait FileParser {
    fn parse_to_raw_records(&self, content: &[u8]) -> ImportResult<RawSheet>;
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, content: &[u8]) -> ImportResult<RawSheet> {
        if content.is_empty() {
            return Err(ImportError::EmptyFile);
        }

        // 兼容 Excel 导出的 UTF-8 BOM
        let content = content.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(content);

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(content);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        // 读取所有行
        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row_map = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        Ok(RawSheet {
            headers,
            rows: records,
        })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, content: &[u8]) -> ImportResult<RawSheet> {
        if content.is_empty() {
            return Err(ImportError::EmptyFile);
        }

        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(content))?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        // 读取数据行
        let mut records = Vec::new();
        for data_row in rows {
            let mut row_map = HashMap::new();

            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), cell.to_string().trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        Ok(RawSheet {
            headers,
            rows: records,
        })
    }
}

/// 按格式选择解析器
pub fn parse_content(format: PlanFileFormat, content: &[u8]) -> ImportResult<RawSheet> {
    match format {
        PlanFileFormat::Csv => CsvParser.parse_to_raw_records(content),
        PlanFileFormat::Xlsx => ExcelParser.parse_to_raw_records(content),
    }
}
