// ==========================================
// 总装排产优化系统 - 生产计划导入器
// ==========================================
// 流程: 文件内容 → 原始行 → PlanLineItem 列表
// 红线: 任何一行失败则整体失败，不产生部分导入
// ==========================================

use crate::domain::plan::PlanLineItem;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{parse_content, PlanFileFormat};
use tracing::{debug, info};

pub struct PlanImporter {
    mapper: FieldMapper,
}

impl Default for PlanImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanImporter {
    pub fn new() -> Self {
        Self {
            mapper: FieldMapper,
        }
    }

    /// 解析上传的计划文件
    ///
    /// # 返回
    /// - `Ok(Vec<PlanLineItem>)`: 按文件行顺序排列的明细
    /// - `Err(MissingColumn)`: 表头不含 quantity 列
    /// - `Err(TypeConversionError)`: 某行字段无法解析（含行号）
    pub fn import_line_items(
        &self,
        format: PlanFileFormat,
        content: &[u8],
    ) -> ImportResult<Vec<PlanLineItem>> {
        let sheet = parse_content(format, content)?;
        debug!(format = %format, rows = sheet.rows.len(), "计划文件解析完成");

        if !self.mapper.has_column(&sheet.headers, "quantity") {
            return Err(ImportError::MissingColumn("quantity".to_string()));
        }

        // 短行缺失的 quantity 按 0 处理
        let items = sheet
            .rows
            .iter()
            .enumerate()
            .map(|(idx, row)| self.mapper.map_to_line_item(row, idx + 1))
            .collect::<ImportResult<Vec<_>>>()?;

        info!(
            format = %format,
            items = items.len(),
            total_quantity = items.iter().map(|i| i.quantity).sum::<i64>(),
            "计划明细导入完成"
        );

        Ok(items)
    }
}
