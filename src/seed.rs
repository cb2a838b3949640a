// ==========================================
// 总装排产优化系统 - 示例数据
// ==========================================
// 内容: 3 个生产计划 / 3 个排产配置 (GA/Body/Paint) / 3 个优化任务 (每种状态一个)
// 规则:
// - 计划、配置、任务三张表全部为空时才写入
// - 全部写入在同一事务内，任何一步失败整体回滚
// - 任务号由 created_at 的日期与当日序号推导
// ==========================================

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use crate::domain::job::format_job_id;
use crate::domain::{
    CalendarDay, Configuration, JobStatus, LineCapacityConfig, OptimizationJob, PlanLineItem,
    ProductionPlan, Workshop,
};
use crate::repository::{ConfigurationRepository, OptimizationJobRepository, PlanRepository};

/// 写入结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub plan_ids: Vec<i64>,
    pub config_ids: Vec<i64>,
    pub job_ids: Vec<String>,
}

/// 写入示例数据
///
/// # 返回
/// - `Ok(Some(report))`: 已写入
/// - `Ok(None)`: 库中已有数据（含悬空任务），未做任何修改
pub fn seed_sample_data(conn: Arc<Mutex<Connection>>) -> Result<Option<SeedReport>> {
    let plan_repo = PlanRepository::new(conn.clone());
    let config_repo = ConfigurationRepository::new(conn.clone());
    let job_repo = OptimizationJobRepository::new(conn.clone());

    in_transaction(&conn, || {
        let existing = (plan_repo.count()?, config_repo.count()?, job_repo.count()?);
        if existing != (0, 0, 0) {
            info!(
                plans = existing.0,
                configurations = existing.1,
                jobs = existing.2,
                "数据库已有数据，跳过示例数据初始化"
            );
            return Ok(None);
        }

        let report = insert_all(&plan_repo, &config_repo, &job_repo)?;
        info!(
            plans = report.plan_ids.len(),
            configurations = report.config_ids.len(),
            jobs = report.job_ids.len(),
            "示例数据初始化完成"
        );
        Ok(Some(report))
    })
}

/// 在单个事务中执行（仓储共用同一连接，语句自动加入事务）
fn in_transaction<T>(conn: &Arc<Mutex<Connection>>, f: impl FnOnce() -> Result<T>) -> Result<T> {
    execute_batch(conn, "BEGIN IMMEDIATE")?;

    match f() {
        Ok(value) => {
            execute_batch(conn, "COMMIT")?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = execute_batch(conn, "ROLLBACK") {
                warn!(error = %rollback_err, "示例数据事务回滚失败");
            }
            Err(e)
        }
    }
}

fn execute_batch(conn: &Arc<Mutex<Connection>>, sql: &str) -> Result<()> {
    let guard = conn
        .lock()
        .map_err(|e| anyhow!("获取数据库锁失败: {}", e))?;
    guard
        .execute_batch(sql)
        .with_context(|| format!("执行失败: {}", sql))
}

fn insert_all(
    plan_repo: &PlanRepository,
    config_repo: &ConfigurationRepository,
    job_repo: &OptimizationJobRepository,
) -> Result<SeedReport> {
    // ===== 生产计划 =====
    let items = sample_line_items();
    let plans = [
        ("KHSX Tháng 4/2025", "Nguyễn Văn A", at(2025, 3, 15, 0, 0)?, items.clone()),
        ("KHSX Tháng 5/2025", "Trần Thị B", at(2025, 3, 20, 0, 0)?, items[2..4].to_vec()),
        ("KHSX Tháng 6/2025", "Lê Văn C", at(2025, 3, 25, 0, 0)?, items[0..3].to_vec()),
    ];

    let mut plan_ids = Vec::new();
    for (name, created_by, created_at, data) in plans {
        let id = plan_repo.create(&ProductionPlan {
            id: 0,
            name: name.to_string(),
            created_by: created_by.to_string(),
            created_at,
            data,
        })?;
        plan_ids.push(id);
    }

    // ===== 排产配置 =====
    let calendar_days = vec![
        CalendarDay::dated("2025-01-01", true),
        CalendarDay::dated("2025-01-02", true),
    ];
    let configs = [
        ("Cấu hình GA-01", "Nguyễn Văn A", at(2025, 3, 10, 0, 0)?, Workshop::GeneralAssembly),
        ("Cấu hình Body-02", "Trần Thị B", at(2025, 3, 12, 0, 0)?, Workshop::Body),
        ("Cấu hình Paint-01", "Lê Văn C", at(2025, 3, 14, 0, 0)?, Workshop::Paint),
    ];

    let mut config_ids = Vec::new();
    for (name, created_by, created_at, workshop) in configs {
        let id = config_repo.create(&Configuration {
            id: 0,
            name: name.to_string(),
            created_by: created_by.to_string(),
            created_at,
            workshop,
            ga_config: capacity(100, 20, 30.0),
            body_config: capacity(80, 15, 45.0),
            calendar_days: calendar_days.clone(),
        })?;
        config_ids.push(id);
    }

    // ===== 优化任务 =====
    let jobs = [
        (
            JobStatus::Optimized,
            "Nguyễn Văn A",
            at(2025, 1, 1, 10, 30)?,
            Some(at(2025, 1, 1, 11, 45)?),
            sample_results(),
        ),
        (
            JobStatus::Optimizing,
            "Trần Thị B",
            at(2025, 1, 15, 9, 15)?,
            None,
            Value::Object(Map::new()),
        ),
        (
            JobStatus::NotOptimized,
            "Lê Văn C",
            at(2025, 2, 1, 14, 20)?,
            None,
            Value::Object(Map::new()),
        ),
    ];

    let mut per_day: HashMap<NaiveDate, i64> = HashMap::new();
    let mut job_ids = Vec::new();
    for (idx, (status, created_by, created_at, completed_at, results_data)) in
        jobs.into_iter().enumerate()
    {
        let day = created_at.date();
        let seq = per_day.entry(day).or_insert(0);
        *seq += 1;

        let job_id = format_job_id(day, *seq);
        job_repo.insert(&OptimizationJob {
            id: 0,
            job_id: job_id.clone(),
            plan_id: plan_ids[idx],
            config_id: config_ids[idx],
            status,
            created_by: created_by.to_string(),
            created_at,
            completed_at,
            results_data,
        })?;
        job_ids.push(job_id);
    }

    Ok(SeedReport {
        plan_ids,
        config_ids,
        job_ids,
    })
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .with_context(|| format!("非法日期: {}-{}-{} {}:{}", year, month, day, hour, minute))
}

fn capacity(max: i64, min: i64, changeover: f64) -> LineCapacityConfig {
    LineCapacityConfig {
        max_cars_per_day: Some(max),
        min_cars_per_day: Some(min),
        changeover_time: Some(changeover),
        extra: Map::new(),
    }
}

fn sample_line_items() -> Vec<PlanLineItem> {
    [
        (1, "01/01/2025", "VF3-001", "VF3", "Trắng", "LHD", 15),
        (2, "01/01/2025", "VF5-002", "VF5", "Đen", "RHD", 12),
        (3, "02/01/2025", "VF8-003", "VF8", "Xanh", "LHD", 18),
        (4, "02/01/2025", "VF9-004", "VF9", "Đỏ", "RHD", 20),
        (5, "03/01/2025", "VF6-005", "VF6", "Xám", "LHD", 14),
    ]
    .into_iter()
    .map(|(id, date, item_code, model, color, body_type, quantity)| PlanLineItem {
        id,
        date: date.to_string(),
        item_code: item_code.to_string(),
        model: model.to_string(),
        color: color.to_string(),
        body_type: body_type.to_string(),
        quantity,
        extra: Map::new(),
    })
    .collect()
}

fn sample_results() -> Value {
    json!({
        "bodyLineData": [
            {"date": "01/01", "VF3": 42, "VF5/6/7": 36, "VF8/9/e34": 40},
            {"date": "02/01", "VF3": 49, "VF5/6/7": 43, "VF8/9/e34": 46}
        ],
        "changeOverData": [
            {"date": "01/01", "VF3": 2, "VF5/6/7": 3, "VF8/9/e34": 2},
            {"date": "02/01", "VF3": 1, "VF5/6/7": 2, "VF8/9/e34": 3}
        ],
        "summaryKPIs": {
            "original": {"changeOver": 28, "multiColorDays": 12},
            "optimized": {"changeOver": 18, "multiColorDays": 6},
            "improvement": {"changeOver": "35.7%", "multiColorDays": "50%"}
        }
    })
}
