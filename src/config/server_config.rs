// ==========================================
// 总装排产优化系统 - 服务配置
// ==========================================
// 来源: 环境变量（均为可选）
// - ASSEMBLY_APS_DB_PATH        数据库文件路径
// - ASSEMBLY_APS_ADDR           监听地址 (默认 127.0.0.1:8000)
// - ASSEMBLY_APS_LOG_FORMAT     text | json
// - ASSEMBLY_APS_PAGE_LIMIT     默认分页大小 (默认 100)
// - ASSEMBLY_APS_MAX_PAGE_LIMIT 分页大小上限 (默认 1000)
// 非法取值直接报错，不静默回退
// ==========================================

use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_DB_PATH: &str = "ASSEMBLY_APS_DB_PATH";
pub const ENV_ADDR: &str = "ASSEMBLY_APS_ADDR";
pub const ENV_LOG_FORMAT: &str = "ASSEMBLY_APS_LOG_FORMAT";
pub const ENV_PAGE_LIMIT: &str = "ASSEMBLY_APS_PAGE_LIMIT";
pub const ENV_MAX_PAGE_LIMIT: &str = "ASSEMBLY_APS_MAX_PAGE_LIMIT";

pub const DEFAULT_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_PAGE_LIMIT: i64 = 100;
pub const DEFAULT_MAX_PAGE_LIMIT: i64 = 1000;

const DB_FILE_NAME: &str = "assembly_aps.db";

// ==========================================
// 日志输出格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => bail!("不支持的日志格式: {} (可选: text / json)", other),
        }
    }
}

// ==========================================
// 分页限制
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_LIMIT,
            max_limit: DEFAULT_MAX_PAGE_LIMIT,
        }
    }
}

impl PageLimits {
    /// 解析分页参数
    ///
    /// - skip 缺省为 0，负数按 0 处理
    /// - limit 缺省为 default_limit，并限制在 1..=max_limit
    pub fn resolve(&self, skip: Option<i64>, limit: Option<i64>) -> (i64, i64) {
        let skip = skip.unwrap_or(0).max(0);
        let limit = limit.unwrap_or(self.default_limit).clamp(1, self.max_limit);
        (skip, limit)
    }
}

// ==========================================
// ServerConfig
// ==========================================
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db_path: String,
    pub addr: SocketAddr,
    pub log_format: LogFormat,
    pub page_limits: PageLimits,
}

impl ServerConfig {
    /// 从进程环境变量读取配置
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取配置（测试可注入）
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let db_path = match get(ENV_DB_PATH) {
            Some(path) => path,
            None => get_default_db_path(),
        };

        let addr_raw = get(ENV_ADDR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr: SocketAddr = addr_raw
            .parse()
            .with_context(|| format!("{} 不是合法的监听地址: {}", ENV_ADDR, addr_raw))?;

        let log_format = match get(ENV_LOG_FORMAT) {
            Some(raw) => raw
                .parse::<LogFormat>()
                .with_context(|| format!("{} 取值非法", ENV_LOG_FORMAT))?,
            None => LogFormat::default(),
        };

        let default_limit = parse_positive(get(ENV_PAGE_LIMIT), ENV_PAGE_LIMIT, DEFAULT_PAGE_LIMIT)?;
        let max_limit = parse_positive(
            get(ENV_MAX_PAGE_LIMIT),
            ENV_MAX_PAGE_LIMIT,
            DEFAULT_MAX_PAGE_LIMIT,
        )?;
        if default_limit > max_limit {
            bail!(
                "{}({}) 不能大于 {}({})",
                ENV_PAGE_LIMIT,
                default_limit,
                ENV_MAX_PAGE_LIMIT,
                max_limit
            );
        }

        Ok(Self {
            db_path,
            addr,
            log_format,
            page_limits: PageLimits {
                default_limit,
                max_limit,
            },
        })
    }
}

fn parse_positive(raw: Option<String>, key: &str, default: i64) -> Result<i64> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value: i64 = raw
        .parse()
        .with_context(|| format!("{} 不是整数: {}", key, raw))?;
    if value < 1 {
        bail!("{} 必须为正整数: {}", key, value);
    }
    Ok(value)
}

/// 获取默认数据库路径
///
/// # 返回
/// - 开发构建: 用户数据目录/assembly-aps-dev/assembly_aps.db
/// - 发布构建: 用户数据目录/assembly-aps/assembly_aps.db
/// - 无法获取用户数据目录时: ./assembly_aps.db
pub fn get_default_db_path() -> String {
    let mut path = PathBuf::from(format!("./{}", DB_FILE_NAME));

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        let dir = data_dir.join("assembly-aps-dev");

        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("assembly-aps");

        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join(DB_FILE_NAME);
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config_from(&[(ENV_DB_PATH, "/tmp/aps.db")]).unwrap();
        assert_eq!(cfg.db_path, "/tmp/aps.db");
        assert_eq!(cfg.addr.to_string(), DEFAULT_ADDR);
        assert_eq!(cfg.log_format, LogFormat::Text);
        assert_eq!(cfg.page_limits, PageLimits::default());
    }

    #[test]
    fn test_overrides() {
        let cfg = config_from(&[
            (ENV_DB_PATH, "/tmp/aps.db"),
            (ENV_ADDR, "0.0.0.0:9000"),
            (ENV_LOG_FORMAT, "JSON"),
            (ENV_PAGE_LIMIT, "20"),
            (ENV_MAX_PAGE_LIMIT, "50"),
        ])
        .unwrap();
        assert_eq!(cfg.addr.port(), 9000);
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_eq!(cfg.page_limits.default_limit, 20);
        assert_eq!(cfg.page_limits.max_limit, 50);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(config_from(&[(ENV_DB_PATH, "x.db"), (ENV_ADDR, "localhost")]).is_err());
        assert!(config_from(&[(ENV_DB_PATH, "x.db"), (ENV_LOG_FORMAT, "yaml")]).is_err());
        assert!(config_from(&[(ENV_DB_PATH, "x.db"), (ENV_PAGE_LIMIT, "0")]).is_err());
        assert!(config_from(&[
            (ENV_DB_PATH, "x.db"),
            (ENV_PAGE_LIMIT, "500"),
            (ENV_MAX_PAGE_LIMIT, "100"),
        ])
        .is_err());
    }

    #[test]
    fn test_page_limits_resolve() {
        let limits = PageLimits::default();
        assert_eq!(limits.resolve(None, None), (0, 100));
        assert_eq!(limits.resolve(Some(-3), Some(0)), (0, 1));
        assert_eq!(limits.resolve(Some(20), Some(5000)), (20, 1000));
    }
}
