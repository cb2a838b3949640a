// ==========================================
// 总装排产优化系统 - 优化任务数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 并发:
// - 任务号序号由 job_sequence 按日计数器在同一事务内原子递增，
//   且总是越过当日已存在的最大序号
// - job_id 唯一约束兜底，冲突以 UniqueConstraintViolation 返回
// - 状态转换使用条件更新 (WHERE status = 期望状态)，失败时不修改任何字段
// ==========================================

use crate::db::{format_datetime, parse_datetime, parse_json_column};
use crate::domain::job::{job_id_prefix, format_job_id, OptimizationJob, OptimizationJobWithDetails};
use crate::domain::types::JobStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use serde_json::Value;
use std::sync::{Arc, Mutex};

const SELECT_WITH_DETAILS: &str = r#"SELECT j.id, j.job_id, j.plan_id, j.config_id, j.status,
                                            j.created_by, j.created_at, j.completed_at, j.results_json,
                                            COALESCE(p.name, ''), COALESCE(c.name, '')
                                     FROM optimization_job j
                                     LEFT JOIN production_plan p ON p.id = j.plan_id
                                     LEFT JOIN configuration c ON c.id = j.config_id"#;

/// 新任务的字段（任务号由仓储分配）
#[derive(Debug, Clone)]
pub struct NewJob {
    pub plan_id: i64,
    pub config_id: i64,
    pub created_by: String,
    pub created_at: NaiveDateTime,
}

// ==========================================
// OptimizationJobRepository - 优化任务仓储
// ==========================================
pub struct OptimizationJobRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OptimizationJobRepository {
    /// 创建新的OptimizationJobRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 分配当日任务号并插入任务（单事务）
    ///
    /// # 参数
    /// - `day`: 任务号日期（本地日历日）
    /// - `job`: 新任务字段
    ///
    /// # 返回
    /// - `Ok(OptimizationJob)`: 已持久化的任务，状态 NOT_OPTIMIZED
    /// - `Err(UniqueConstraintViolation)`: 任务号冲突
    pub fn create_with_next_job_id(
        &self,
        day: NaiveDate,
        job: &NewJob,
    ) -> RepositoryResult<OptimizationJob> {
        let prefix = job_id_prefix(day);
        let day_key = day.format("%Y-%m-%d").to_string();

        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT OR IGNORE INTO job_sequence (day, last_seq) VALUES (?1, 0)",
            params![day_key],
        )?;

        // 序号越过当日已存在的最大序号（种子/导入数据可能绕过计数器写入）
        let seq: i64 = tx.query_row(
            r#"UPDATE job_sequence
               SET last_seq = MAX(
                   last_seq,
                   (SELECT COALESCE(MAX(CAST(substr(job_id, length(?2) + 1) AS INTEGER)), 0)
                    FROM optimization_job
                    WHERE substr(job_id, 1, length(?2)) = ?2)
               ) + 1
               WHERE day = ?1
               RETURNING last_seq"#,
            params![day_key, prefix],
            |row| row.get(0),
        )?;

        let job_id = format_job_id(day, seq);
        let results_data = Value::Object(Default::default());

        tx.execute(
            r#"INSERT INTO optimization_job (
                job_id, plan_id, config_id, status, created_by, created_at, completed_at, results_json
            ) VALUES (?, ?, ?, ?, ?, ?, NULL, ?)"#,
            params![
                &job_id,
                job.plan_id,
                job.config_id,
                JobStatus::NotOptimized.to_db_str(),
                &job.created_by,
                format_datetime(&job.created_at),
                results_data.to_string(),
            ],
        )?;
        let id = tx.last_insert_rowid();

        tx.commit()?;

        Ok(OptimizationJob {
            id,
            job_id,
            plan_id: job.plan_id,
            config_id: job.config_id,
            status: JobStatus::NotOptimized,
            created_by: job.created_by.clone(),
            created_at: job.created_at,
            completed_at: None,
            results_data,
        })
    }

    /// 以给定任务号插入任务（导入/种子数据使用）
    pub fn insert(&self, job: &OptimizationJob) -> RepositoryResult<i64> {
        let results_json = serde_json::to_string(&job.results_data)?;
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO optimization_job (
                job_id, plan_id, config_id, status, created_by, created_at, completed_at, results_json
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
            params![
                &job.job_id,
                job.plan_id,
                job.config_id,
                job.status.to_db_str(),
                &job.created_by,
                format_datetime(&job.created_at),
                job.completed_at.as_ref().map(format_datetime),
                results_json,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// 按任务号查询任务（含计划名/配置名）
    pub fn find_by_job_id(&self, job_id: &str) -> RepositoryResult<Option<OptimizationJobWithDetails>> {
        let conn = self.get_conn()?;

        match conn.query_row(
            &format!("{} WHERE j.job_id = ?", SELECT_WITH_DETAILS),
            params![job_id],
            |row| self.map_row(row),
        ) {
            Ok(job) => Ok(Some(job)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 分页查询任务（含计划名/配置名），可按状态过滤
    pub fn list_with_details(
        &self,
        status: Option<JobStatus>,
        skip: i64,
        limit: i64,
    ) -> RepositoryResult<Vec<OptimizationJobWithDetails>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&format!(
            "{} WHERE (?1 IS NULL OR j.status = ?1) ORDER BY j.id ASC LIMIT ?2 OFFSET ?3",
            SELECT_WITH_DETAILS
        ))?;

        let jobs = stmt
            .query_map(
                params![status.map(|s| s.to_db_str()), limit, skip],
                |row| self.map_row(row),
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(jobs)
    }

    /// 条件状态转换
    ///
    /// # 返回
    /// - `Ok(true)`: 当前状态等于 `from`，已更新为 `to`
    /// - `Ok(false)`: 任务不存在或当前状态不等于 `from`，未做任何修改
    pub fn transition_status(
        &self,
        job_id: &str,
        from: JobStatus,
        to: JobStatus,
    ) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            "UPDATE optimization_job SET status = ?1 WHERE job_id = ?2 AND status = ?3",
            params![to.to_db_str(), job_id, from.to_db_str()],
        )?;

        Ok(affected > 0)
    }

    /// 完成任务: 写入 OPTIMIZED、完成时间与结果（单事务）
    ///
    /// 完成时间取 max(completed_at, created_at)
    ///
    /// # 返回
    /// - `Ok(Some((from, job)))`: 完成前的状态与更新后的任务
    /// - `Ok(None)`: 任务不存在
    pub fn complete(
        &self,
        job_id: &str,
        completed_at: NaiveDateTime,
        results: &Value,
    ) -> RepositoryResult<Option<(JobStatus, OptimizationJob)>> {
        let results_json = serde_json::to_string(results)?;

        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let from_raw: Option<String> = tx
            .query_row(
                "SELECT status FROM optimization_job WHERE job_id = ?1",
                params![job_id],
                |row| row.get(0),
            )
            .optional()?;
        let from = match from_raw {
            Some(raw) => parse_status(0, &raw)?,
            None => return Ok(None),
        };

        let job = tx.query_row(
            r#"UPDATE optimization_job
               SET status = ?1, completed_at = MAX(?2, created_at), results_json = ?3
               WHERE job_id = ?4
               RETURNING id, job_id, plan_id, config_id, status,
                         created_by, created_at, completed_at, results_json"#,
            params![
                JobStatus::Optimized.to_db_str(),
                format_datetime(&completed_at),
                results_json,
                job_id,
            ],
            map_job,
        )?;

        tx.commit()?;
        Ok(Some((from, job)))
    }

    /// 更新非生命周期字段（plan_id / config_id / created_by）
    pub fn update_assignment(&self, job: &OptimizationJob) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            r#"UPDATE optimization_job
               SET plan_id = ?, config_id = ?, created_by = ?
               WHERE job_id = ?"#,
            params![job.plan_id, job.config_id, &job.created_by, &job.job_id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "OptimizationJob".to_string(),
                id: job.job_id.clone(),
            });
        }

        Ok(())
    }

    /// 按任务号删除
    pub fn delete(&self, job_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM optimization_job WHERE job_id = ?", params![job_id])?;
        Ok(affected > 0)
    }

    /// 任务总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM optimization_job", [], |row| row.get(0))?;
        Ok(count)
    }

    /// 映射数据库行到OptimizationJobWithDetails对象
    fn map_row(&self, row: &rusqlite::Row) -> rusqlite::Result<OptimizationJobWithDetails> {
        Ok(OptimizationJobWithDetails {
            job: map_job(row)?,
            plan_name: row.get(9)?,
            config_name: row.get(10)?,
        })
    }
}

/// 映射任务列 (0..=8)
fn map_job(row: &rusqlite::Row) -> rusqlite::Result<OptimizationJob> {
    let completed_at = match row.get::<_, Option<String>>(7)? {
        Some(raw) => Some(parse_datetime(7, &raw)?),
        None => None,
    };

    Ok(OptimizationJob {
        id: row.get(0)?,
        job_id: row.get(1)?,
        plan_id: row.get(2)?,
        config_id: row.get(3)?,
        status: parse_status(4, &row.get::<_, String>(4)?)?,
        created_by: row.get(5)?,
        created_at: parse_datetime(6, &row.get::<_, String>(6)?)?,
        completed_at,
        results_data: parse_json_column(8, &row.get::<_, String>(8)?)?,
    })
}

fn parse_status(idx: usize, raw: &str) -> rusqlite::Result<JobStatus> {
    JobStatus::parse(raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("未知任务状态: {}", raw).into(),
        )
    })
}
