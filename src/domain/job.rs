// ==========================================
// 总装排产优化系统 - 优化任务领域模型
// ==========================================
// 状态机:
//   NOT_OPTIMIZED --start--> OPTIMIZING
//   OPTIMIZING    --stop---> NOT_OPTIMIZED
//   任意状态      --complete--> OPTIMIZED (记录完成时间与结果)
// 红线: 生命周期字段只能经由上述转换修改
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::domain::types::JobStatus;

// ==========================================
// OptimizationJob - 优化任务
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationJob {
    pub id: i64,
    pub job_id: String,                      // 对外任务号 {YYYYMMDD}_{n}
    pub plan_id: i64,                        // 引用生产计划 (不拥有)
    pub config_id: i64,                      // 引用排产配置 (不拥有)
    pub status: JobStatus,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
    pub results_data: Value,                 // 外部优化器写入的结果 (不透明)
}

/// 带计划名/配置名的任务视图 (列表与详情接口使用)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationJobWithDetails {
    #[serde(flatten)]
    pub job: OptimizationJob,
    pub plan_name: String,   // 引用悬空时为空串
    pub config_name: String, // 引用悬空时为空串
}

// ==========================================
// JobTransition - 生命周期转换
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobTransition {
    Start,
    Stop,
    Complete,
}

impl fmt::Display for JobTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobTransition::Start => write!(f, "start"),
            JobTransition::Stop => write!(f, "stop"),
            JobTransition::Complete => write!(f, "complete"),
        }
    }
}

impl JobTransition {
    /// 转换要求的前置状态 (None 表示任意状态均可)
    pub fn required_from(&self) -> Option<JobStatus> {
        match self {
            JobTransition::Start => Some(JobStatus::NotOptimized),
            JobTransition::Stop => Some(JobStatus::Optimizing),
            JobTransition::Complete => None,
        }
    }

    /// 转换后的目标状态
    pub fn target(&self) -> JobStatus {
        match self {
            JobTransition::Start => JobStatus::Optimizing,
            JobTransition::Stop => JobStatus::NotOptimized,
            JobTransition::Complete => JobStatus::Optimized,
        }
    }
}

/// 非法状态转换
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTransition {
    pub transition: JobTransition,
    pub from: JobStatus,
    pub to: JobStatus,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "任务当前状态为{}，不允许执行{} (目标状态{})",
            self.from, self.transition, self.to
        )
    }
}

impl JobStatus {
    /// 计算转换结果，不修改任何状态
    pub fn apply(self, transition: JobTransition) -> Result<JobStatus, InvalidTransition> {
        match transition.required_from() {
            Some(required) if required != self => Err(InvalidTransition {
                transition,
                from: self,
                to: transition.target(),
            }),
            _ => Ok(transition.target()),
        }
    }
}

// ==========================================
// 任务号
// ==========================================

/// 任务号日期前缀，例如 `20251014_`
pub fn job_id_prefix(day: NaiveDate) -> String {
    format!("{}_", day.format("%Y%m%d"))
}

/// 格式化任务号，例如 `20251014_3`
pub fn format_job_id(day: NaiveDate, seq: i64) -> String {
    format!("{}{}", job_id_prefix(day), seq)
}
