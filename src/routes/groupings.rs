use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::grace::requests::AddGraceDeductionRequest;
use crate::models::submissions::requests::NavigationQuery;
use crate::models::tags::requests::CreateTagRequest;
use crate::services::GroupingService;

// 懒加载的全局 GroupingService 实例
static GROUPING_SERVICE: Lazy<GroupingService> = Lazy::new(GroupingService::new_lazy);

pub async fn list_grace_deductions(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    GROUPING_SERVICE
        .list_grace_deductions(&req, path.into_inner())
        .await
}

pub async fn add_grace_deduction(
    req: HttpRequest,
    body: web::Json<AddGraceDeductionRequest>,
) -> ActixResult<HttpResponse> {
    GROUPING_SERVICE
        .add_grace_deduction(&req, body.into_inner())
        .await
}

pub async fn delete_grace_deduction(
    req: HttpRequest,
    path: web::Path<(i64, i64)>, // (grouping_id, deduction_id)
) -> ActixResult<HttpResponse> {
    let (grouping_id, deduction_id) = path.into_inner();
    GROUPING_SERVICE
        .delete_grace_deduction(&req, grouping_id, deduction_id)
        .await
}

// 相邻小组
pub async fn next_grouping(
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<NavigationQuery>,
) -> ActixResult<HttpResponse> {
    GROUPING_SERVICE
        .next_grouping(&req, path.into_inner(), query.into_inner())
        .await
}

pub async fn list_tags(req: HttpRequest) -> ActixResult<HttpResponse> {
    GROUPING_SERVICE.list_tags(&req).await
}

pub async fn create_tag(
    req: HttpRequest,
    body: web::Json<CreateTagRequest>,
) -> ActixResult<HttpResponse> {
    GROUPING_SERVICE.create_tag(&req, body.into_inner()).await
}

pub async fn grouping_tags(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    GROUPING_SERVICE
        .grouping_tags(&req, path.into_inner())
        .await
}

pub async fn add_tag(
    req: HttpRequest,
    path: web::Path<(i64, i64)>, // (grouping_id, tag_id)
) -> ActixResult<HttpResponse> {
    let (grouping_id, tag_id) = path.into_inner();
    GROUPING_SERVICE.add_tag(&req, grouping_id, tag_id).await
}

pub async fn remove_tag(
    req: HttpRequest,
    path: web::Path<(i64, i64)>, // (grouping_id, tag_id)
) -> ActixResult<HttpResponse> {
    let (grouping_id, tag_id) = path.into_inner();
    GROUPING_SERVICE.remove_tag(&req, grouping_id, tag_id).await
}

// 配置路由
pub fn configure_groupings_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/groupings/{grouping_id}")
            .route("/grace_deductions", web::get().to(list_grace_deductions))
            .route(
                "/grace_deductions/{deduction_id}",
                web::delete().to(delete_grace_deduction),
            )
            .route("/next", web::get().to(next_grouping))
            .route("/tags", web::get().to(grouping_tags))
            .route("/tags/{tag_id}", web::put().to(add_tag))
            .route("/tags/{tag_id}", web::delete().to(remove_tag)),
    );

    cfg.service(
        web::scope("/api/v1/grace_deductions").route("", web::post().to(add_grace_deduction)),
    );

    cfg.service(
        web::scope("/api/v1/tags")
            .route("", web::get().to(list_tags))
            .route("", web::post().to(create_tag)),
    );
}
