// ==========================================
// 总装排产优化系统 - 导入层
// ==========================================
// 职责: 上传的生产计划文件 → 计划明细
// 支持: Excel (.xlsx), CSV
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod plan_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, FileParser, PlanFileFormat, RawRow, RawSheet};
pub use plan_importer::PlanImporter;
