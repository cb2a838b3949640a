// ==========================================
// 总装排产优化系统 - 领域类型定义
// ==========================================
// 职责: 优化任务状态、车间标签等枚举类型
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 优化任务状态 (Job Status)
// ==========================================
// 生命周期: NOT_OPTIMIZED -> OPTIMIZING -> OPTIMIZED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    NotOptimized, // 未优化 (初始)
    Optimizing,   // 优化中
    Optimized,    // 已优化 (终态)
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl JobStatus {
    /// 从字符串解析状态
    ///
    /// 同时接受旧系统遗留的越南语标签（前端筛选仍可能传入）
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        match trimmed.to_uppercase().as_str() {
            "NOT_OPTIMIZED" => return Some(JobStatus::NotOptimized),
            "OPTIMIZING" => return Some(JobStatus::Optimizing),
            "OPTIMIZED" => return Some(JobStatus::Optimized),
            _ => {}
        }

        match trimmed {
            "Chưa Tối Ưu" => Some(JobStatus::NotOptimized),
            "Đang Tối Ưu" => Some(JobStatus::Optimizing),
            "Đã Tối Ưu" => Some(JobStatus::Optimized),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            JobStatus::NotOptimized => "NOT_OPTIMIZED",
            JobStatus::Optimizing => "OPTIMIZING",
            JobStatus::Optimized => "OPTIMIZED",
        }
    }
}

// ==========================================
// 车间 (Workshop)
// ==========================================
// 开放集合: 已知 GA/Body/Paint，其余标签原样保留
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Workshop {
    GeneralAssembly, // 总装 (GA)
    Body,            // 车身
    Paint,           // 涂装
    Other(String),
}

impl Default for Workshop {
    fn default() -> Self {
        Workshop::GeneralAssembly
    }
}

impl Workshop {
    pub fn as_str(&self) -> &str {
        match self {
            Workshop::GeneralAssembly => "GA",
            Workshop::Body => "Body",
            Workshop::Paint => "Paint",
            Workshop::Other(tag) => tag.as_str(),
        }
    }
}

impl fmt::Display for Workshop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Workshop {
    fn from(s: String) -> Self {
        match s.trim().to_uppercase().as_str() {
            "GA" => Workshop::GeneralAssembly,
            "BODY" => Workshop::Body,
            "PAINT" => Workshop::Paint,
            _ => Workshop::Other(s.trim().to_string()),
        }
    }
}

impl From<&str> for Workshop {
    fn from(s: &str) -> Self {
        Workshop::from(s.to_string())
    }
}

impl From<Workshop> for String {
    fn from(w: Workshop) -> Self {
        w.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_parse() {
        assert_eq!(JobStatus::parse("OPTIMIZING"), Some(JobStatus::Optimizing));
        assert_eq!(JobStatus::parse("not_optimized"), Some(JobStatus::NotOptimized));
        assert_eq!(JobStatus::parse("Đã Tối Ưu"), Some(JobStatus::Optimized));
        assert_eq!(JobStatus::parse("RUNNING"), None);
    }

    #[test]
    fn test_job_status_serde() {
        let json = serde_json::to_string(&JobStatus::NotOptimized).unwrap();
        assert_eq!(json, "\"NOT_OPTIMIZED\"");
        let status: JobStatus = serde_json::from_str("\"OPTIMIZED\"").unwrap();
        assert_eq!(status, JobStatus::Optimized);
    }

    #[test]
    fn test_workshop_open_set() {
        assert_eq!(Workshop::from("ga"), Workshop::GeneralAssembly);
        assert_eq!(Workshop::from("Paint"), Workshop::Paint);
        assert_eq!(Workshop::from("Stamping"), Workshop::Other("Stamping".to_string()));

        let json = serde_json::to_string(&Workshop::Body).unwrap();
        assert_eq!(json, "\"Body\"");
        let w: Workshop = serde_json::from_str("\"Stamping\"").unwrap();
        assert_eq!(w.as_str(), "Stamping");
    }
}
