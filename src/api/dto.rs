// ==========================================
// 总装排产优化系统 - API 请求/响应 DTO
// ==========================================
// 约定: 字段名 snake_case（明细与产能配置内部保持 camelCase）
// 部分更新: 未提供的字段保持不变
// ==========================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::configuration::{CalendarDay, LineCapacityConfig};
use crate::domain::job::OptimizationJob;
use crate::domain::plan::PlanLineItem;

// ==========================================
// 生产计划
// ==========================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    pub created_by: String,
    #[serde(default)]
    pub data: Vec<PlanLineItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePlanRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<PlanLineItem>>,
}

/// 文件导入参数（查询串）
#[derive(Debug, Clone, Deserialize)]
pub struct ImportPlanQuery {
    pub name: String,
    pub created_by: String,
    #[serde(default = "default_import_format")]
    pub format: String,
}

fn default_import_format() -> String {
    "xlsx".to_string()
}

// ==========================================
// 排产配置
// ==========================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateConfigurationRequest {
    pub name: String,
    pub created_by: String,
    #[serde(default)]
    pub workshop: Option<String>,
    #[serde(default)]
    pub ga_config: LineCapacityConfig,
    #[serde(default)]
    pub body_config: LineCapacityConfig,
    #[serde(default)]
    pub calendar_days: Vec<CalendarDay>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateConfigurationRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub workshop: Option<String>,
    #[serde(default)]
    pub ga_config: Option<LineCapacityConfig>,
    #[serde(default)]
    pub body_config: Option<LineCapacityConfig>,
    #[serde(default)]
    pub calendar_days: Option<Vec<CalendarDay>>,
}

// ==========================================
// 优化任务
// ==========================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateJobRequest {
    pub plan_id: i64,
    pub config_id: i64,
    pub created_by: String,
}

/// 生命周期字段，只能经由 start/stop/complete 修改
pub const LIFECYCLE_FIELDS: &[&str] = &["status", "completed_at", "results_data"];

/// 任务通用更新
///
/// 其余键收集到 `rest`，用于识别调用方误传的生命周期字段
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateJobRequest {
    #[serde(default)]
    pub plan_id: Option<i64>,
    #[serde(default)]
    pub config_id: Option<i64>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl UpdateJobRequest {
    /// 请求体中出现的生命周期字段
    pub fn lifecycle_fields(&self) -> Vec<&str> {
        LIFECYCLE_FIELDS
            .iter()
            .copied()
            .filter(|f| self.rest.contains_key(*f))
            .collect()
    }
}

// ==========================================
// 查询参数
// ==========================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobListQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub skip: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

// ==========================================
// 响应
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 状态转换响应: `{"message", "job"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionResponse {
    pub message: String,
    pub job: OptimizationJob,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_job_detects_lifecycle_fields() {
        let req: UpdateJobRequest = serde_json::from_value(serde_json::json!({
            "plan_id": 2,
            "status": "OPTIMIZED",
            "results_data": {}
        }))
        .unwrap();

        assert_eq!(req.plan_id, Some(2));
        assert_eq!(req.lifecycle_fields(), vec!["status", "results_data"]);

        let clean: UpdateJobRequest =
            serde_json::from_value(serde_json::json!({"created_by": "Trần Thị B"})).unwrap();
        assert!(clean.lifecycle_fields().is_empty());
    }

    #[test]
    fn test_create_configuration_defaults() {
        let req: CreateConfigurationRequest = serde_json::from_value(serde_json::json!({
            "name": "Cấu hình GA",
            "created_by": "admin"
        }))
        .unwrap();

        assert!(req.workshop.is_none());
        assert_eq!(req.ga_config, LineCapacityConfig::default());
        assert!(req.calendar_days.is_empty());
    }
}
