// ==========================================
// 总装排产优化系统 - 请求参数校验
// ==========================================
// 职责: API 入参的通用校验（非空、状态过滤、任务号）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::types::JobStatus;

/// 必填文本字段不能为空白
pub fn require_non_blank(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::ValidationError(format!("{}不能为空", field)));
    }
    Ok(())
}

/// 解析任务状态过滤条件
///
/// - `None` / 空串: 不过滤
/// - 无法识别的状态: ValidationError
pub fn parse_status_filter(raw: Option<&str>) -> ApiResult<Option<JobStatus>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => JobStatus::parse(s).map(Some).ok_or_else(|| {
            ApiError::ValidationError(format!(
                "未知任务状态: {} (可选: NOT_OPTIMIZED / OPTIMIZING / OPTIMIZED)",
                s
            ))
        }),
    }
}

/// 校验外部任务号非空
pub fn require_job_id(job_id: &str) -> ApiResult<()> {
    require_non_blank("任务号", job_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_blank() {
        assert!(require_non_blank("name", "KHSX Tháng 4").is_ok());
        assert!(matches!(
            require_non_blank("name", "   "),
            Err(ApiError::ValidationError(_))
        ));
    }

    #[test]
    fn test_parse_status_filter() {
        assert_eq!(parse_status_filter(None).unwrap(), None);
        assert_eq!(parse_status_filter(Some("")).unwrap(), None);
        assert_eq!(
            parse_status_filter(Some("optimizing")).unwrap(),
            Some(JobStatus::Optimizing)
        );
        assert_eq!(
            parse_status_filter(Some("Chưa Tối Ưu")).unwrap(),
            Some(JobStatus::NotOptimized)
        );
        assert!(parse_status_filter(Some("DONE")).is_err());
    }
}
