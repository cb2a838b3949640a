// ==========================================
// HTTP 路由集成测试
// ==========================================
// 测试范围:
// 1. 状态码映射: 200 / 201 / 400 / 404
// 2. 错误响应体: {"code", "message", "details"}
// 3. 任务生命周期端到端
// ==========================================

mod helpers;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use helpers::api_test_helper::*;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use assembly_aps::app::build_router;
use assembly_aps::app::http::REQUEST_ID_HEADER;
use assembly_aps::domain::OptimizationJob;

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    };

    call_raw(app, request).await
}

async fn call_raw(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("route response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("response body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).to_string())
        })
    };
    (status, value)
}

fn setup() -> (ApiTestEnv, Router) {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let app = build_router(env.state.clone());
    (env, app)
}

// ==========================================
// 基础端点
// ==========================================

#[tokio::test]
async fn test_root_and_health() {
    let (_env, app) = setup();

    let (status, body) = call(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Assembly APS Optimization API");
    assert!(body["version"].is_string());

    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy"}));
}

#[tokio::test]
async fn test_request_id_header() {
    let (_env, app) = setup();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("route response");

    let request_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .expect("应返回 request id");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

// ==========================================
// 计划 / 配置
// ==========================================

#[tokio::test]
async fn test_plan_crud_状态码() {
    let (_env, app) = setup();

    let (status, plan) = call(
        &app,
        Method::POST,
        "/plans",
        Some(json!({
            "name": "KHSX Tháng 4/2025",
            "created_by": "Nguyễn Văn A",
            "data": [{"id": 1, "date": "01/01/2025", "itemCode": "VF3-001", "model": "VF3",
                      "color": "Trắng", "type": "LHD", "quantity": 15}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(plan["data"][0]["itemCode"], "VF3-001");
    let id = plan["id"].as_i64().expect("plan id");

    let (status, listed) = call(&app, Method::GET, "/plans?skip=0&limit=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(|a| a.len()), Some(1));

    let (status, updated) = call(
        &app,
        Method::PUT,
        &format!("/plans/{}", id),
        Some(json!({"name": "KHSX Tháng 4/2025 (v2)"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "KHSX Tháng 4/2025 (v2)");
    assert_eq!(updated["data"], plan["data"]);

    let (status, body) = call(&app, Method::DELETE, &format!("/plans/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, body) = call(&app, Method::GET, &format!("/plans/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["message"].is_string());
    assert!(body["details"].is_null());
}

#[tokio::test]
async fn test_请求体格式错误返回400() {
    let (_env, app) = setup();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/plans")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .expect("build request");
    let (status, body) = call_raw(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // 缺少必填字段
    let (status, body) = call(&app, Method::POST, "/configurations", Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // 非数字路径参数
    let (status, body) = call(&app, Method::GET, "/plans/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // 非法分页参数
    let (status, _) = call(&app, Method::GET, "/plans?limit=many", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_configuration_create_默认车间() {
    let (_env, app) = setup();

    let (status, config) = call(
        &app,
        Method::POST,
        "/configurations",
        Some(json!({"name": "Cấu hình GA-01", "created_by": "admin"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(config["workshop"], "GA");
    assert_eq!(config["ga_config"], json!({}));
    assert_eq!(config["calendar_days"], json!([]));
}

#[tokio::test]
async fn test_plan_import_上传文件() {
    let (_env, app) = setup();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/plans/import?name=KHSX%20Upload&created_by=admin&format=xlsx")
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .body(Body::from(
            include_bytes!("fixtures/plan_sample.xlsx").to_vec(),
        ))
        .expect("build request");
    let (status, plan) = call_raw(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(plan["name"], "KHSX Upload");
    assert_eq!(plan["data"].as_array().map(|a| a.len()), Some(3));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/plans/import?name=x&created_by=admin&format=docx")
        .body(Body::from("irrelevant"))
        .expect("build request");
    let (status, body) = call_raw(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// ==========================================
// 任务
// ==========================================

#[tokio::test]
async fn test_job_lifecycle_端到端() {
    let (env, app) = setup();
    let plan = env.prepare_plan("KHSX Tháng 4/2025");
    let config = env.prepare_configuration("Cấu hình GA-01");

    // 引用不存在
    let (status, body) = call(
        &app,
        Method::POST,
        "/jobs",
        Some(json!({"plan_id": 999, "config_id": config.id, "created_by": "admin"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    // 创建
    let (status, job) = call(
        &app,
        Method::POST,
        "/jobs",
        Some(json!({"plan_id": plan.id, "config_id": config.id, "created_by": "admin"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(job["status"], "NOT_OPTIMIZED");
    let job_id = job["job_id"].as_str().expect("job_id").to_string();

    // stop 非法
    let (status, body) = call(&app, Method::POST, &format!("/jobs/{}/stop", job_id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_STATE_TRANSITION");
    assert_eq!(body["details"]["from"], "NOT_OPTIMIZED");

    // start
    let (status, body) = call(&app, Method::POST, &format!("/jobs/{}/start", job_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Job started successfully");
    assert_eq!(body["job"]["status"], "OPTIMIZING");

    // 通用更新拒绝生命周期字段
    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/jobs/{}", job_id),
        Some(json!({"status": "OPTIMIZED"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // complete
    let results = json!({"summaryKPIs": {"optimized": {"changeOver": 18}}});
    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/jobs/{}/complete", job_id),
        Some(results.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let completed: OptimizationJob =
        serde_json::from_value(body["job"].clone()).expect("job body");
    assert_eq!(completed.results_data, results);
    assert!(completed.completed_at.is_some());

    // 列表过滤 + 名称
    let (status, listed) = call(&app, Method::GET, "/jobs?status=OPTIMIZED", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["job_id"], job_id.as_str());
    assert_eq!(listed[0]["plan_name"], "KHSX Tháng 4/2025");

    let (status, body) = call(&app, Method::GET, "/jobs?status=BOGUS", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // 删除
    let (status, _) = call(&app, Method::DELETE, &format!("/jobs/{}", job_id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::GET, &format!("/jobs/{}", job_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_任务号越过已占用序号() {
    let (env, app) = setup();
    let existing = env.prepare_job();

    // 计数器落后于已有任务号: 下一个序号已被直接写入的任务占用
    let prefix = existing.job_id[..9].to_string();
    let mut taken = existing.clone();
    taken.job_id = format!("{}2", prefix);
    env.job_repo.insert(&taken).expect("insert");

    for expected in ["3", "4"] {
        let (status, job) = call(
            &app,
            Method::POST,
            "/jobs",
            Some(json!({
                "plan_id": existing.plan_id,
                "config_id": existing.config_id,
                "created_by": "admin"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "body: {}", job);
        assert_eq!(job["job_id"], format!("{}{}", prefix, expected));
    }
}
