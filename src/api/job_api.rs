// ==========================================
// 总装排产优化系统 - 优化任务 API
// ==========================================
// 职责: 任务创建（引用校验 + 任务号分配）、查询、通用更新、生命周期转换
// 红线:
// - 创建前先校验计划，再校验配置；任一不存在则不写入任何数据
// - status / completed_at / results_data 只能经由 start/stop/complete 修改
// - 状态转换为条件更新，前置状态不满足时存储状态保持不变
// ==========================================

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::dto::{CreateJobRequest, UpdateJobRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{parse_status_filter, require_job_id, require_non_blank};
use crate::domain::job::{JobTransition, OptimizationJob, OptimizationJobWithDetails};
use crate::repository::configuration_repo::ConfigurationRepository;
use crate::repository::job_repo::{NewJob, OptimizationJobRepository};
use crate::repository::plan_repo::PlanRepository;

// ==========================================
// OptimizationJobApi - 优化任务 API
// ==========================================

/// 优化任务API
///
/// 职责：
/// 1. 任务创建（校验引用，分配当日任务号）
/// 2. 任务查询（含计划名/配置名）
/// 3. 非生命周期字段更新
/// 4. 生命周期转换（start / stop / complete）
pub struct OptimizationJobApi {
    job_repo: Arc<OptimizationJobRepository>,
    plan_repo: Arc<PlanRepository>,
    config_repo: Arc<ConfigurationRepository>,
}

impl OptimizationJobApi {
    /// 创建新的OptimizationJobApi实例
    pub fn new(
        job_repo: Arc<OptimizationJobRepository>,
        plan_repo: Arc<PlanRepository>,
        config_repo: Arc<ConfigurationRepository>,
    ) -> Self {
        Self {
            job_repo,
            plan_repo,
            config_repo,
        }
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 分页查询任务
    ///
    /// # 参数
    /// - `status`: 状态过滤（可选，大小写不敏感，兼容越南语标签）
    pub fn list_jobs(
        &self,
        status: Option<&str>,
        skip: i64,
        limit: i64,
    ) -> ApiResult<Vec<OptimizationJobWithDetails>> {
        let status = parse_status_filter(status)?;
        let jobs = self.job_repo.list_with_details(status, skip, limit)?;
        debug!(?status, skip, limit, count = jobs.len(), "查询优化任务列表");
        Ok(jobs)
    }

    /// 按外部任务号查询任务
    pub fn get_job(&self, job_id: &str) -> ApiResult<OptimizationJobWithDetails> {
        require_job_id(job_id)?;
        self.job_repo
            .find_by_job_id(job_id)?
            .ok_or_else(|| ApiError::NotFound(format!("OptimizationJob(job_id={})不存在", job_id)))
    }

    // ==========================================
    // 创建 / 更新 / 删除
    // ==========================================

    /// 创建任务（任务号日期取服务器本地日期）
    pub fn create_job(&self, req: CreateJobRequest) -> ApiResult<OptimizationJob> {
        self.create_job_on(Local::now().date_naive(), req)
    }

    /// 以指定日期创建任务
    ///
    /// # 返回
    /// - `Err(NotFound)`: 计划或配置不存在（先检查计划）
    /// - `Err(Conflict)`: 任务号冲突
    pub fn create_job_on(&self, day: NaiveDate, req: CreateJobRequest) -> ApiResult<OptimizationJob> {
        require_non_blank("创建人", &req.created_by)?;
        self.ensure_plan_exists(req.plan_id)?;
        self.ensure_config_exists(req.config_id)?;

        let job = self.job_repo.create_with_next_job_id(
            day,
            &NewJob {
                plan_id: req.plan_id,
                config_id: req.config_id,
                created_by: req.created_by.trim().to_string(),
                created_at: now_utc(),
            },
        )?;

        info!(
            job_id = %job.job_id,
            plan_id = job.plan_id,
            config_id = job.config_id,
            created_by = %job.created_by,
            "优化任务已创建"
        );

        Ok(job)
    }

    /// 通用更新: 仅允许 plan_id / config_id / created_by
    ///
    /// # 返回
    /// - `Err(ValidationError)`: 请求体包含生命周期字段
    /// - `Err(NotFound)`: 任务不存在，或新引用的计划/配置不存在
    pub fn update_job(&self, job_id: &str, req: UpdateJobRequest) -> ApiResult<OptimizationJob> {
        let lifecycle = req.lifecycle_fields();
        if !lifecycle.is_empty() {
            return Err(ApiError::ValidationError(format!(
                "字段{:?}只能通过 start/stop/complete 修改",
                lifecycle
            )));
        }

        let mut job = self.get_job(job_id)?.job;

        if let Some(plan_id) = req.plan_id {
            self.ensure_plan_exists(plan_id)?;
            job.plan_id = plan_id;
        }
        if let Some(config_id) = req.config_id {
            self.ensure_config_exists(config_id)?;
            job.config_id = config_id;
        }
        if let Some(created_by) = req.created_by {
            require_non_blank("创建人", &created_by)?;
            job.created_by = created_by.trim().to_string();
        }

        self.job_repo.update_assignment(&job)?;
        info!(
            job_id = %job.job_id,
            plan_id = job.plan_id,
            config_id = job.config_id,
            "优化任务已更新"
        );

        Ok(job)
    }

    /// 删除任务
    pub fn delete_job(&self, job_id: &str) -> ApiResult<()> {
        require_job_id(job_id)?;
        if !self.job_repo.delete(job_id)? {
            return Err(ApiError::NotFound(format!("OptimizationJob(job_id={})不存在", job_id)));
        }
        info!(job_id, "优化任务已删除");
        Ok(())
    }

    // ==========================================
    // 生命周期转换
    // ==========================================

    /// 开始优化: NOT_OPTIMIZED -> OPTIMIZING
    pub fn start_job(&self, job_id: &str) -> ApiResult<OptimizationJob> {
        self.apply_transition(job_id, JobTransition::Start)
    }

    /// 停止优化: OPTIMIZING -> NOT_OPTIMIZED
    pub fn stop_job(&self, job_id: &str) -> ApiResult<OptimizationJob> {
        self.apply_transition(job_id, JobTransition::Stop)
    }

    /// 完成优化: 任意状态 -> OPTIMIZED，结果原样保存
    pub fn complete_job(&self, job_id: &str, results: Value) -> ApiResult<OptimizationJob> {
        self.complete_job_at(job_id, results, now_utc())
    }

    /// 以指定完成时间完成任务（完成时间不早于创建时间）
    pub fn complete_job_at(
        &self,
        job_id: &str,
        results: Value,
        completed_at: NaiveDateTime,
    ) -> ApiResult<OptimizationJob> {
        require_job_id(job_id)?;

        let (from, job) = match self.job_repo.complete(job_id, completed_at, &results)? {
            Some(completed) => completed,
            None => {
                return Err(ApiError::NotFound(format!(
                    "OptimizationJob(job_id={})不存在",
                    job_id
                )))
            }
        };

        info!(
            job_id,
            from = %from,
            to = %job.status,
            transition = %JobTransition::Complete,
            "优化任务状态转换"
        );

        Ok(job)
    }

    /// 条件状态转换（start / stop）
    fn apply_transition(&self, job_id: &str, transition: JobTransition) -> ApiResult<OptimizationJob> {
        require_job_id(job_id)?;
        let to = transition.target();

        let from = match transition.required_from() {
            Some(from) => from,
            None => {
                return Err(ApiError::InternalError(format!(
                    "{} 不是条件转换",
                    transition
                )))
            }
        };

        if self.job_repo.transition_status(job_id, from, to)? {
            let job = self.get_job(job_id)?.job;
            info!(job_id, from = %from, to = %to, %transition, "优化任务状态转换");
            return Ok(job);
        }

        // 未更新: 区分任务不存在与前置状态不满足
        let current = self.get_job(job_id)?.job.status;
        match current.apply(transition) {
            Err(invalid) => {
                warn!(job_id, current = %current, %transition, "状态转换被拒绝");
                Err(ApiError::InvalidStateTransition {
                    from: invalid.from.to_string(),
                    to: invalid.to.to_string(),
                })
            }
            // 条件更新失败后状态又被并发修改回前置状态
            Ok(_) => Err(ApiError::Conflict(format!(
                "任务{}状态已被并发修改，请重试",
                job_id
            ))),
        }
    }

    // ==========================================
    // 引用校验
    // ==========================================

    fn ensure_plan_exists(&self, plan_id: i64) -> ApiResult<()> {
        if !self.plan_repo.exists(plan_id)? {
            return Err(ApiError::NotFound(format!("ProductionPlan(id={})不存在", plan_id)));
        }
        Ok(())
    }

    fn ensure_config_exists(&self, config_id: i64) -> ApiResult<()> {
        if !self.config_repo.exists(config_id)? {
            return Err(ApiError::NotFound(format!(
                "Configuration(id={})不存在",
                config_id
            )));
        }
        Ok(())
    }
}

/// 当前 UTC 时间（截断到秒，与存储精度一致）
fn now_utc() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_nanosecond(0).unwrap_or(now)
}
