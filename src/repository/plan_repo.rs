// ==========================================
// 总装排产优化系统 - 生产计划数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 存储: production_plan 表，明细以 JSON 文本保存（保持顺序）
// ==========================================

use crate::db::{format_datetime, parse_datetime, parse_json_column};
use crate::domain::plan::ProductionPlan;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// PlanRepository - 生产计划仓储
// ==========================================
pub struct PlanRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PlanRepository {
    /// 创建新的PlanRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 创建计划
    ///
    /// # 参数
    /// - `plan`: 计划对象（id 字段忽略，由存储分配）
    ///
    /// # 返回
    /// - `Ok(id)`: 成功，返回新分配的id
    /// - `Err`: 失败，返回错误信息
    pub fn create(&self, plan: &ProductionPlan) -> RepositoryResult<i64> {
        let data_json = serde_json::to_string(&plan.data)?;
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO production_plan (name, created_by, created_at, data_json)
               VALUES (?, ?, ?, ?)"#,
            params![
                &plan.name,
                &plan.created_by,
                format_datetime(&plan.created_at),
                data_json,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// 按id查询计划
    ///
    /// # 返回
    /// - `Ok(Some(ProductionPlan))`: 找到计划
    /// - `Ok(None)`: 未找到计划
    /// - `Err`: 数据库错误
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<ProductionPlan>> {
        let conn = self.get_conn()?;

        match conn.query_row(
            r#"SELECT id, name, created_by, created_at, data_json
               FROM production_plan
               WHERE id = ?"#,
            params![id],
            |row| self.map_row(row),
        ) {
            Ok(plan) => Ok(Some(plan)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 计划是否存在
    pub fn exists(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM production_plan WHERE id = ?",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// 分页查询计划
    ///
    /// # 返回
    /// - `Ok(Vec<ProductionPlan>)`: 计划列表，按id升序
    pub fn list(&self, skip: i64, limit: i64) -> RepositoryResult<Vec<ProductionPlan>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT id, name, created_by, created_at, data_json
               FROM production_plan
               ORDER BY id ASC
               LIMIT ? OFFSET ?"#,
        )?;

        let plans = stmt
            .query_map(params![limit, skip], |row| self.map_row(row))?
            .collect::<Result<Vec<ProductionPlan>, _>>()?;

        Ok(plans)
    }

    /// 更新计划（整行覆盖 name/data）
    ///
    /// # 返回
    /// - `Ok(())`: 更新成功
    /// - `Err(NotFound)`: 计划不存在
    pub fn update(&self, plan: &ProductionPlan) -> RepositoryResult<()> {
        let data_json = serde_json::to_string(&plan.data)?;
        let conn = self.get_conn()?;

        let affected = conn.execute(
            r#"UPDATE production_plan
               SET name = ?, data_json = ?
               WHERE id = ?"#,
            params![&plan.name, data_json, plan.id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "ProductionPlan".to_string(),
                id: plan.id.to_string(),
            });
        }

        Ok(())
    }

    /// 删除计划（不级联，引用该计划的任务保留悬空 plan_id）
    ///
    /// # 返回
    /// - `Ok(true)`: 已删除
    /// - `Ok(false)`: 计划不存在
    pub fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;

        let affected = conn.execute("DELETE FROM production_plan WHERE id = ?", params![id])?;

        Ok(affected > 0)
    }

    /// 计划总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM production_plan", [], |row| row.get(0))?;
        Ok(count)
    }

    /// 映射数据库行到ProductionPlan对象
    fn map_row(&self, row: &rusqlite::Row) -> rusqlite::Result<ProductionPlan> {
        Ok(ProductionPlan {
            id: row.get(0)?,
            name: row.get(1)?,
            created_by: row.get(2)?,
            created_at: parse_datetime(3, &row.get::<_, String>(3)?)?,
            data: parse_json_column(4, &row.get::<_, String>(4)?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use crate::domain::plan::PlanLineItem;
    use chrono::NaiveDate;

    fn repo() -> PlanRepository {
        PlanRepository::new(Arc::new(Mutex::new(open_in_memory().unwrap())))
    }

    fn sample_plan(name: &str) -> ProductionPlan {
        ProductionPlan {
            id: 0,
            name: name.to_string(),
            created_by: "Nguyễn Văn A".to_string(),
            created_at: NaiveDate::from_ymd_opt(2025, 3, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            data: vec![
                PlanLineItem {
                    id: 2,
                    date: "01/01/2025".to_string(),
                    item_code: "VF5-002".to_string(),
                    model: "VF5".to_string(),
                    color: "Đen".to_string(),
                    body_type: "RHD".to_string(),
                    quantity: 12,
                    extra: serde_json::Map::new(),
                },
                PlanLineItem {
                    id: 1,
                    date: "01/01/2025".to_string(),
                    item_code: "VF3-001".to_string(),
                    model: "VF3".to_string(),
                    color: "Trắng".to_string(),
                    body_type: "LHD".to_string(),
                    quantity: 15,
                    extra: serde_json::Map::new(),
                },
            ],
        }
    }

    #[test]
    fn test_create_and_find_preserves_item_order() {
        let repo = repo();
        let id = repo.create(&sample_plan("KHSX Tháng 4/2025")).unwrap();

        let plan = repo.find_by_id(id).unwrap().expect("计划应存在");
        assert_eq!(plan.name, "KHSX Tháng 4/2025");
        assert_eq!(plan.data.len(), 2);
        assert_eq!(plan.data[0].item_code, "VF5-002");
        assert_eq!(plan.total_quantity(), 27);
    }

    #[test]
    fn test_list_pagination() {
        let repo = repo();
        for i in 0..5 {
            repo.create(&sample_plan(&format!("P{}", i))).unwrap();
        }

        let page = repo.list(1, 2).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].name, "P1");
        assert_eq!(page[1].name, "P2");
        assert_eq!(repo.count().unwrap(), 5);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let repo = repo();
        let mut plan = sample_plan("ghost");
        plan.id = 42;
        assert!(matches!(
            repo.update(&plan),
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_delete() {
        let repo = repo();
        let id = repo.create(&sample_plan("P")).unwrap();
        assert!(repo.exists(id).unwrap());
        assert!(repo.delete(id).unwrap());
        assert!(!repo.delete(id).unwrap());
        assert!(repo.find_by_id(id).unwrap().is_none());
    }
}
