use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::annotations::requests::AddAnnotationRequest;
use crate::models::results::requests::{
    AddExtraMarkRequest, OverallCommentRequest, ReleaseRequest, ResultViewQuery,
    TransitionRequest, UpdateMarkRequest,
};
use crate::services::ResultService;

// 懒加载的全局 ResultService 实例
static RESULT_SERVICE: Lazy<ResultService> = Lazy::new(ResultService::new_lazy);

// 结果视图
pub async fn view_result(
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<ResultViewQuery>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE
        .view_result(&req, path.into_inner(), query.into_inner())
        .await
}

// 重新计算总分
pub async fn recompute_total(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE.recompute_total(&req, path.into_inner()).await
}

pub async fn update_mark(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpdateMarkRequest>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE
        .update_mark(&req, path.into_inner(), body.into_inner())
        .await
}

pub async fn add_extra_mark(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<AddExtraMarkRequest>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE
        .add_extra_mark(&req, path.into_inner(), body.into_inner())
        .await
}

pub async fn remove_extra_mark(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE
        .remove_extra_mark(&req, path.into_inner())
        .await
}

pub async fn update_overall_comment(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<OverallCommentRequest>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE
        .update_overall_comment(&req, path.into_inner(), body.into_inner())
        .await
}

// 状态迁移（完成/发布/复评等）
pub async fn transition(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<TransitionRequest>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE
        .transition(&req, path.into_inner(), body.into_inner())
        .await
}

pub async fn toggle_marking_state(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE
        .toggle_marking_state(&req, path.into_inner())
        .await
}

// 批量发布/撤回
pub async fn release(
    req: HttpRequest,
    body: web::Json<ReleaseRequest>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE.release(&req, body.into_inner()).await
}

pub async fn add_annotation(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<AddAnnotationRequest>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE
        .add_annotation(&req, path.into_inner(), body.into_inner())
        .await
}

pub async fn remove_annotation(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE
        .remove_annotation(&req, path.into_inner())
        .await
}

// 配置路由
pub fn configure_results_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/results")
            .route("/release", web::post().to(release))
            .route("/{id}", web::get().to(view_result))
            .route("/{id}/total", web::post().to(recompute_total))
            .route("/{id}/marks", web::put().to(update_mark))
            .route("/{id}/extra_marks", web::post().to(add_extra_mark))
            .route("/{id}/overall_comment", web::put().to(update_overall_comment))
            .route("/{id}/transition", web::post().to(transition))
            .route("/{id}/toggle", web::post().to(toggle_marking_state))
            .route("/{id}/annotations", web::post().to(add_annotation)),
    );

    cfg.service(
        web::scope("/api/v1/extra_marks").route("/{id}", web::delete().to(remove_extra_mark)),
    );

    cfg.service(
        web::scope("/api/v1/annotations").route("/{id}", web::delete().to(remove_annotation)),
    );
}
