// ==========================================
// 总装排产优化系统 - 生产计划领域模型
// ==========================================
// 生产计划: 有序的生产明细行 (日期/物料/车型/颜色/车身类型/数量)
// 红线: 仅做形状校验，不做排产语义校验
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ==========================================
// ProductionPlan - 生产计划
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionPlan {
    pub id: i64,                   // 计划ID (存储分配)
    pub name: String,              // 计划名称
    pub created_by: String,        // 创建人
    pub created_at: NaiveDateTime, // 创建时间 (UTC)
    pub data: Vec<PlanLineItem>,   // 生产明细 (保持顺序)
}

// ==========================================
// PlanLineItem - 生产明细行
// ==========================================
// 字段名与前端保持一致 (camelCase)，其余字段经 extra 原样保留
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanLineItem {
    pub id: i64,
    pub date: String,
    pub item_code: String,
    pub model: String,
    pub color: String,
    #[serde(rename = "type")]
    pub body_type: String, // LHD / RHD 等
    pub quantity: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProductionPlan {
    /// 明细总数量
    pub fn total_quantity(&self) -> i64 {
        self.data.iter().map(|item| item.quantity).sum()
    }
}

/// 校验明细行
///
/// 只校验数量非负；日期等字段按原样存储
pub fn validate_line_items(items: &[PlanLineItem]) -> Result<(), String> {
    for (idx, item) in items.iter().enumerate() {
        if item.quantity < 0 {
            return Err(format!(
                "第{}行明细数量不能为负数: item_code={}, quantity={}",
                idx + 1,
                item.item_code,
                item.quantity
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, quantity: i64) -> PlanLineItem {
        PlanLineItem {
            id,
            date: "01/01/2025".to_string(),
            item_code: format!("VF3-{:03}", id),
            model: "VF3".to_string(),
            color: "Trắng".to_string(),
            body_type: "LHD".to_string(),
            quantity,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_line_item_wire_names() {
        let json = serde_json::to_value(item(1, 15)).unwrap();
        assert_eq!(json["itemCode"], "VF3-001");
        assert_eq!(json["type"], "LHD");
        assert!(json.get("body_type").is_none());
    }

    #[test]
    fn test_line_item_keeps_unknown_keys() {
        let raw = serde_json::json!({
            "id": 1,
            "date": "01/01/2025",
            "itemCode": "VF3-001",
            "model": "VF3",
            "color": "Trắng",
            "type": "LHD",
            "quantity": 15,
            "note": "rush",
            "priority": {"level": 2}
        });
        let parsed: PlanLineItem = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(parsed.quantity, 15);
        assert_eq!(parsed.extra.get("note"), Some(&Value::from("rush")));

        assert_eq!(serde_json::to_value(&parsed).unwrap(), raw);
    }

    #[test]
    fn test_validate_line_items() {
        assert!(validate_line_items(&[item(1, 0), item(2, 12)]).is_ok());

        let err = validate_line_items(&[item(1, 3), item(2, -1)]).unwrap_err();
        assert!(err.contains("第2行"));
    }
}
