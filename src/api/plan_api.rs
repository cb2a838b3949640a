// ==========================================
// 总装排产优化系统 - 生产计划 API
// ==========================================
// 职责: 生产计划增删改查 + 文件导入
// 删除策略: 不级联，引用该计划的任务保留悬空 plan_id
// ==========================================

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::dto::{CreatePlanRequest, UpdatePlanRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::require_non_blank;
use crate::domain::plan::{validate_line_items, ProductionPlan};
use crate::importer::{PlanFileFormat, PlanImporter};
use crate::repository::plan_repo::PlanRepository;

// ==========================================
// PlanApi - 生产计划 API
// ==========================================
pub struct PlanApi {
    plan_repo: Arc<PlanRepository>,
    importer: PlanImporter,
}

impl PlanApi {
    /// 创建新的PlanApi实例
    pub fn new(plan_repo: Arc<PlanRepository>) -> Self {
        Self {
            plan_repo,
            importer: PlanImporter::new(),
        }
    }

    /// 分页查询计划（按id升序）
    pub fn list_plans(&self, skip: i64, limit: i64) -> ApiResult<Vec<ProductionPlan>> {
        let plans = self.plan_repo.list(skip, limit)?;
        debug!(skip, limit, count = plans.len(), "查询生产计划列表");
        Ok(plans)
    }

    /// 查询计划详情
    ///
    /// # 返回
    /// - `Err(NotFound)`: 计划不存在
    pub fn get_plan(&self, id: i64) -> ApiResult<ProductionPlan> {
        self.plan_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("ProductionPlan(id={})不存在", id)))
    }

    /// 创建计划
    ///
    /// # 校验
    /// - name / created_by 非空
    /// - 明细数量非负
    pub fn create_plan(&self, req: CreatePlanRequest) -> ApiResult<ProductionPlan> {
        require_non_blank("计划名称", &req.name)?;
        require_non_blank("创建人", &req.created_by)?;
        validate_line_items(&req.data).map_err(ApiError::ValidationError)?;

        let plan = ProductionPlan {
            id: 0,
            name: req.name.trim().to_string(),
            created_by: req.created_by.trim().to_string(),
            created_at: Utc::now().naive_utc(),
            data: req.data,
        };

        let id = self.plan_repo.create(&plan)?;
        info!(
            plan_id = id,
            name = %plan.name,
            items = plan.data.len(),
            created_by = %plan.created_by,
            "生产计划已创建"
        );

        self.get_plan(id)
    }

    /// 部分更新计划（仅修改提供的字段）
    pub fn update_plan(&self, id: i64, req: UpdatePlanRequest) -> ApiResult<ProductionPlan> {
        let mut plan = self.get_plan(id)?;

        if let Some(name) = req.name {
            require_non_blank("计划名称", &name)?;
            plan.name = name.trim().to_string();
        }
        if let Some(data) = req.data {
            validate_line_items(&data).map_err(ApiError::ValidationError)?;
            plan.data = data;
        }

        self.plan_repo.update(&plan)?;
        info!(plan_id = id, items = plan.data.len(), "生产计划已更新");

        Ok(plan)
    }

    /// 删除计划
    ///
    /// # 返回
    /// - `Err(NotFound)`: 计划不存在
    pub fn delete_plan(&self, id: i64) -> ApiResult<()> {
        if !self.plan_repo.delete(id)? {
            return Err(ApiError::NotFound(format!("ProductionPlan(id={})不存在", id)));
        }
        info!(plan_id = id, "生产计划已删除");
        Ok(())
    }

    /// 从上传文件导入计划
    ///
    /// # 参数
    /// - `format`: xlsx / csv
    /// - `content`: 文件原始字节
    pub fn import_plan(
        &self,
        name: &str,
        created_by: &str,
        format: &str,
        content: &[u8],
    ) -> ApiResult<ProductionPlan> {
        require_non_blank("计划名称", name)?;
        require_non_blank("创建人", created_by)?;

        let format = PlanFileFormat::parse(format)?;
        let data = self.importer.import_line_items(format, content)?;

        self.create_plan(CreatePlanRequest {
            name: name.to_string(),
            created_by: created_by.to_string(),
            data,
        })
    }
}
