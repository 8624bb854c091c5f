use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::results::requests::RemarkRequest;
use crate::models::submissions::requests::{
    CollectRequest, DistributionQuery, DownloadQuery, FileQuery,
};
use crate::services::SubmissionService;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 作业下的提交概览
pub async fn list_rows(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.list_rows(&req, path.into_inner()).await
}

// 批量收取
pub async fn collect_submissions(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<CollectRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .collect_submissions(&req, path.into_inner(), body.into_inner())
        .await
}

pub async fn grade_distribution(
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<DistributionQuery>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .grade_distribution(&req, path.into_inner(), query.into_inner())
        .await
}

pub async fn annotation_categories(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .annotation_categories(&req, path.into_inner())
        .await
}

// 提交的当前结果
pub async fn current_result(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .current_result(&req, path.into_inner())
        .await
}

pub async fn request_remark(
    req: HttpRequest,
    path: web::Path<i64>,
    body: Option<web::Json<RemarkRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    SUBMISSION_SERVICE
        .request_remark(&req, path.into_inner(), body)
        .await
}

pub async fn cancel_remark(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .cancel_remark(&req, path.into_inner())
        .await
}

// 下载压缩包
pub async fn download_zip(
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<DownloadQuery>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .download_zip(&req, path.into_inner(), query.into_inner())
        .await
}

// 单个文件
pub async fn download_file(
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<FileQuery>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .download_file(&req, path.into_inner(), query.into_inner())
        .await
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments/{assignment_id}")
            .route("/submissions", web::get().to(list_rows))
            .route("/submissions/collect", web::post().to(collect_submissions))
            .route("/distribution", web::get().to(grade_distribution))
            .route(
                "/annotation_categories",
                web::get().to(annotation_categories),
            ),
    );

    cfg.service(
        web::scope("/api/v1/submissions/{id}")
            .route("/result", web::get().to(current_result))
            .route("/remark", web::post().to(request_remark))
            .route("/remark", web::delete().to(cancel_remark))
            .route("/download", web::get().to(download_zip))
            .route("/file", web::get().to(download_file)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use std::path::PathBuf;
    use std::sync::Arc;

    use crate::collaborators::{AssignmentDeadlinePolicy, FsRepository, StorageGraceCredits};
    use crate::engine::GradingEngine;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::Fixture;

    fn repository_root() -> PathBuf {
        let root = std::env::temp_dir().join(format!("marking-files-{}", std::process::id()));
        std::fs::create_dir_all(root.join("group_0001/r1/shots")).unwrap();
        std::fs::write(root.join("group_0001/r1/main.py"), "print(1)\n").unwrap();
        std::fs::write(
            root.join("group_0001/r1/shots/plot.png"),
            [0x89, b'P', b'N', b'G'],
        )
        .unwrap();
        root
    }

    fn engine_for(fixture: &Fixture) -> GradingEngine {
        let storage: Arc<dyn Storage> = Arc::new(fixture.storage());
        GradingEngine::new(
            storage.clone(),
            Arc::new(FsRepository::new(repository_root())),
            Arc::new(StorageGraceCredits::new(storage)),
            Arc::new(AssignmentDeadlinePolicy),
        )
    }

    #[actix_web::test]
    async fn test_single_file_download_headers() {
        let fixture = Fixture::new().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(engine_for(&fixture)))
                .configure(configure_submissions_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/v1/submissions/{}/file?path=shots/plot.png&show_in_browser=true",
                fixture.submission_id
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
        assert_eq!(
            resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "inline; filename=\"plot.png\""
        );

        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/v1/submissions/{}/file?path=main.py",
                fixture.submission_id
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"main.py\""
        );
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"print(1)\n");

        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/v1/submissions/{}/file?path=missing.py",
                fixture.submission_id
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
