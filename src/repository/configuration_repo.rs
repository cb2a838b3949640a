// ==========================================
// 总装排产优化系统 - 排产配置数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 存储: configuration 表，产能参数/日历以 JSON 文本保存
// ==========================================

use crate::db::{format_datetime, parse_datetime, parse_json_column};
use crate::domain::configuration::Configuration;
use crate::domain::types::Workshop;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"SELECT id, name, created_by, created_at, workshop,
                                       ga_config_json, body_config_json, calendar_days_json
                                FROM configuration"#;

// ==========================================
// ConfigurationRepository - 排产配置仓储
// ==========================================
pub struct ConfigurationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigurationRepository {
    /// 创建新的ConfigurationRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 创建配置，返回新分配的id
    pub fn create(&self, config: &Configuration) -> RepositoryResult<i64> {
        let ga_json = serde_json::to_string(&config.ga_config)?;
        let body_json = serde_json::to_string(&config.body_config)?;
        let calendar_json = serde_json::to_string(&config.calendar_days)?;
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO configuration (
                name, created_by, created_at, workshop,
                ga_config_json, body_config_json, calendar_days_json
            ) VALUES (?, ?, ?, ?, ?, ?, ?)"#,
            params![
                &config.name,
                &config.created_by,
                format_datetime(&config.created_at),
                config.workshop.as_str(),
                ga_json,
                body_json,
                calendar_json,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// 按id查询配置
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Configuration>> {
        let conn = self.get_conn()?;

        match conn.query_row(
            &format!("{} WHERE id = ?", SELECT_COLUMNS),
            params![id],
            |row| self.map_row(row),
        ) {
            Ok(config) => Ok(Some(config)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 配置是否存在
    pub fn exists(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM configuration WHERE id = ?",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// 分页查询配置（按id升序）
    pub fn list(&self, skip: i64, limit: i64) -> RepositoryResult<Vec<Configuration>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY id ASC LIMIT ? OFFSET ?",
            SELECT_COLUMNS
        ))?;

        let configs = stmt
            .query_map(params![limit, skip], |row| self.map_row(row))?
            .collect::<Result<Vec<Configuration>, _>>()?;

        Ok(configs)
    }

    /// 更新配置（整行覆盖可编辑字段）
    pub fn update(&self, config: &Configuration) -> RepositoryResult<()> {
        let ga_json = serde_json::to_string(&config.ga_config)?;
        let body_json = serde_json::to_string(&config.body_config)?;
        let calendar_json = serde_json::to_string(&config.calendar_days)?;
        let conn = self.get_conn()?;

        let affected = conn.execute(
            r#"UPDATE configuration
               SET name = ?, workshop = ?, ga_config_json = ?,
                   body_config_json = ?, calendar_days_json = ?
               WHERE id = ?"#,
            params![
                &config.name,
                config.workshop.as_str(),
                ga_json,
                body_json,
                calendar_json,
                config.id,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Configuration".to_string(),
                id: config.id.to_string(),
            });
        }

        Ok(())
    }

    /// 删除配置（不级联）
    pub fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM configuration WHERE id = ?", params![id])?;
        Ok(affected > 0)
    }

    /// 配置总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM configuration", [], |row| row.get(0))?;
        Ok(count)
    }

    /// 映射数据库行到Configuration对象
    fn map_row(&self, row: &rusqlite::Row) -> rusqlite::Result<Configuration> {
        Ok(Configuration {
            id: row.get(0)?,
            name: row.get(1)?,
            created_by: row.get(2)?,
            created_at: parse_datetime(3, &row.get::<_, String>(3)?)?,
            workshop: Workshop::from(row.get::<_, String>(4)?),
            ga_config: parse_json_column(5, &row.get::<_, String>(5)?)?,
            body_config: parse_json_column(6, &row.get::<_, String>(6)?)?,
            calendar_days: parse_json_column(7, &row.get::<_, String>(7)?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use crate::domain::configuration::{CalendarDay, LineCapacityConfig};
    use chrono::Utc;

    fn repo() -> ConfigurationRepository {
        ConfigurationRepository::new(Arc::new(Mutex::new(open_in_memory().unwrap())))
    }

    fn sample(workshop: Workshop) -> Configuration {
        Configuration {
            id: 0,
            name: format!("Cấu hình {}", workshop),
            created_by: "Trần Thị B".to_string(),
            created_at: Utc::now().naive_utc(),
            workshop,
            ga_config: LineCapacityConfig {
                max_cars_per_day: Some(100),
                min_cars_per_day: Some(20),
                changeover_time: Some(30.0),
                ..Default::default()
            },
            body_config: LineCapacityConfig::default(),
            calendar_days: vec![CalendarDay::dated("2025-01-01", true)],
        }
    }

    #[test]
    fn test_create_find_update() {
        let repo = repo();
        let id = repo.create(&sample(Workshop::Body)).unwrap();

        let mut config = repo.find_by_id(id).unwrap().expect("配置应存在");
        assert_eq!(config.workshop, Workshop::Body);
        assert_eq!(config.ga_config.max_cars_per_day, Some(100));
        assert_eq!(config.working_day_count(), 1);

        config.workshop = Workshop::Other("Stamping".to_string());
        config.calendar_days.push(CalendarDay::dated("2025-01-02", false));
        repo.update(&config).unwrap();

        let reloaded = repo.find_by_id(id).unwrap().unwrap();
        assert_eq!(reloaded.workshop.as_str(), "Stamping");
        assert_eq!(reloaded.calendar_days.len(), 2);
        assert_eq!(reloaded.working_day_count(), 1);
    }

    #[test]
    fn test_list_and_delete() {
        let repo = repo();
        let a = repo.create(&sample(Workshop::GeneralAssembly)).unwrap();
        let b = repo.create(&sample(Workshop::Paint)).unwrap();

        assert_eq!(repo.list(0, 100).unwrap().len(), 2);
        assert!(repo.delete(a).unwrap());
        let rest = repo.list(0, 100).unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].id, b);
        assert!(!repo.exists(a).unwrap());
        assert_eq!(repo.count().unwrap(), 1);
    }
}
