// ==========================================
// 总装排产优化系统 - 排产配置 API
// ==========================================
// 职责: 排产配置（车间、产能、工作日历）增删改查
// 删除策略: 不级联，引用该配置的任务保留悬空 config_id
// ==========================================

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::dto::{CreateConfigurationRequest, UpdateConfigurationRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::require_non_blank;
use crate::domain::configuration::{Configuration, LineCapacityConfig};
use crate::domain::types::Workshop;
use crate::repository::configuration_repo::ConfigurationRepository;

pub struct ConfigurationApi {
    config_repo: Arc<ConfigurationRepository>,
}

impl ConfigurationApi {
    pub fn new(config_repo: Arc<ConfigurationRepository>) -> Self {
        Self { config_repo }
    }

    /// 分页查询配置（按id升序）
    pub fn list_configurations(&self, skip: i64, limit: i64) -> ApiResult<Vec<Configuration>> {
        let configs = self.config_repo.list(skip, limit)?;
        debug!(skip, limit, count = configs.len(), "查询排产配置列表");
        Ok(configs)
    }

    /// 查询配置详情
    pub fn get_configuration(&self, id: i64) -> ApiResult<Configuration> {
        self.config_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Configuration(id={})不存在", id)))
    }

    /// 创建配置
    ///
    /// # 默认值
    /// - workshop: GA
    /// - ga_config / body_config: 空对象
    /// - calendar_days: 空列表
    pub fn create_configuration(&self, req: CreateConfigurationRequest) -> ApiResult<Configuration> {
        require_non_blank("配置名称", &req.name)?;
        require_non_blank("创建人", &req.created_by)?;

        let workshop = match req.workshop {
            Some(tag) => parse_workshop(&tag)?,
            None => Workshop::default(),
        };
        validate_capacity(&req.ga_config, &req.body_config)?;

        let config = Configuration {
            id: 0,
            name: req.name.trim().to_string(),
            created_by: req.created_by.trim().to_string(),
            created_at: Utc::now().naive_utc(),
            workshop,
            ga_config: req.ga_config,
            body_config: req.body_config,
            calendar_days: req.calendar_days,
        };

        let id = self.config_repo.create(&config)?;
        info!(
            config_id = id,
            name = %config.name,
            workshop = %config.workshop,
            working_days = config.working_day_count(),
            "排产配置已创建"
        );

        self.get_configuration(id)
    }

    /// 部分更新配置
    pub fn update_configuration(
        &self,
        id: i64,
        req: UpdateConfigurationRequest,
    ) -> ApiResult<Configuration> {
        let mut config = self.get_configuration(id)?;

        if let Some(name) = req.name {
            require_non_blank("配置名称", &name)?;
            config.name = name.trim().to_string();
        }
        if let Some(tag) = req.workshop {
            config.workshop = parse_workshop(&tag)?;
        }
        if let Some(ga) = req.ga_config {
            config.ga_config = ga;
        }
        if let Some(body) = req.body_config {
            config.body_config = body;
        }
        if let Some(days) = req.calendar_days {
            config.calendar_days = days;
        }
        validate_capacity(&config.ga_config, &config.body_config)?;

        self.config_repo.update(&config)?;
        info!(config_id = id, workshop = %config.workshop, "排产配置已更新");

        Ok(config)
    }

    /// 删除配置
    pub fn delete_configuration(&self, id: i64) -> ApiResult<()> {
        if !self.config_repo.delete(id)? {
            return Err(ApiError::NotFound(format!("Configuration(id={})不存在", id)));
        }
        info!(config_id = id, "排产配置已删除");
        Ok(())
    }
}

fn parse_workshop(tag: &str) -> ApiResult<Workshop> {
    require_non_blank("车间", tag)?;
    Ok(Workshop::from(tag))
}

fn validate_capacity(ga: &LineCapacityConfig, body: &LineCapacityConfig) -> ApiResult<()> {
    ga.validate("ga_config").map_err(ApiError::ValidationError)?;
    body.validate("body_config").map_err(ApiError::ValidationError)?;
    Ok(())
}
