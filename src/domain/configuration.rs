// ==========================================
// 总装排产优化系统 - 排产配置领域模型
// ==========================================
// 配置: 车间标签 + 两组产线产能参数 + 工作日历
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::types::Workshop;

// ==========================================
// Configuration - 排产配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub id: i64,
    pub name: String,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub workshop: Workshop,
    pub ga_config: LineCapacityConfig,   // 总装线产能
    pub body_config: LineCapacityConfig, // 车身线产能
    pub calendar_days: Vec<CalendarDay>, // 工作日历
}

// ==========================================
// LineCapacityConfig - 产线产能参数
// ==========================================
// 未知字段通过 extra 原样保留 (前端会附带 JPH/班次等参数)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineCapacityConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cars_per_day: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_cars_per_day: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changeover_time: Option<f64>, // 换型时间 (分钟)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LineCapacityConfig {
    /// 校验产能上下限
    pub fn validate(&self, label: &str) -> Result<(), String> {
        if let Some(max) = self.max_cars_per_day {
            if max < 0 {
                return Err(format!("{}: maxCarsPerDay不能为负数 ({})", label, max));
            }
        }
        if let Some(min) = self.min_cars_per_day {
            if min < 0 {
                return Err(format!("{}: minCarsPerDay不能为负数 ({})", label, min));
            }
        }
        if let (Some(min), Some(max)) = (self.min_cars_per_day, self.max_cars_per_day) {
            if min > max {
                return Err(format!(
                    "{}: minCarsPerDay({})不能大于maxCarsPerDay({})",
                    label, min, max
                ));
            }
        }
        if let Some(t) = self.changeover_time {
            if !t.is_finite() || t < 0.0 {
                return Err(format!("{}: changeoverTime必须为非负数 ({})", label, t));
            }
        }
        Ok(())
    }
}

// ==========================================
// CalendarDay - 日历日
// ==========================================
// 两种形状都接受:
// - {"date": "2025-01-01", "isWorkingDay": true}
// - {"day": 1, "isActive": true} (月历视图)
// 未声明字段经 extra 原样保留
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_working_day: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CalendarDay {
    /// 按日期构造
    pub fn dated(date: impl Into<String>, is_working_day: bool) -> Self {
        Self {
            date: Some(date.into()),
            is_working_day: Some(is_working_day),
            extra: Map::new(),
        }
    }

    /// 是否工作日
    ///
    /// 依次取 isWorkingDay、isActive，均缺省时视为工作日
    pub fn is_working(&self) -> bool {
        self.is_working_day
            .or_else(|| self.extra.get("isActive").and_then(Value::as_bool))
            .unwrap_or(true)
    }
}

impl Configuration {
    /// 工作日天数
    pub fn working_day_count(&self) -> usize {
        self.calendar_days
            .iter()
            .filter(|d| d.is_working())
            .count()
    }
}
