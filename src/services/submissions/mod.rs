pub mod collect;
pub mod export;
pub mod remarks;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::engine::GradingEngine;
use crate::models::results::requests::RemarkRequest;
use crate::models::submissions::requests::{
    CollectRequest, DistributionQuery, DownloadQuery, FileQuery,
};

pub struct SubmissionService {
    engine: Option<Arc<GradingEngine>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { engine: None }
    }

    pub(crate) fn get_engine(&self, request: &HttpRequest) -> ActixResult<Arc<GradingEngine>> {
        super::engine_from(&self.engine, request)
    }

    /// 批量收取提交
    pub async fn collect_submissions(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        req: CollectRequest,
    ) -> ActixResult<HttpResponse> {
        collect::collect_submissions(self, request, assignment_id, req).await
    }

    /// 作业下每个小组的提交概览
    pub async fn list_rows(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        collect::list_rows(self, request, assignment_id).await
    }

    pub async fn annotation_categories(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        collect::annotation_categories(self, request, assignment_id).await
    }

    /// 成绩分布
    pub async fn grade_distribution(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        query: DistributionQuery,
    ) -> ActixResult<HttpResponse> {
        export::grade_distribution(self, request, assignment_id, query).await
    }

    /// 下载提交文件压缩包
    pub async fn download_zip(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        query: DownloadQuery,
    ) -> ActixResult<HttpResponse> {
        export::download_zip(self, request, submission_id, query).await
    }

    /// 下载或内联展示单个文件
    pub async fn download_file(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        query: FileQuery,
    ) -> ActixResult<HttpResponse> {
        export::download_file(self, request, submission_id, query).await
    }

    pub async fn current_result(
        &self,
        request: &HttpRequest,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        remarks::current_result(self, request, submission_id).await
    }

    /// 申请复评
    pub async fn request_remark(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        req: RemarkRequest,
    ) -> ActixResult<HttpResponse> {
        remarks::request_remark(self, request, submission_id, req).await
    }

    /// 撤销复评
    pub async fn cancel_remark(
        &self,
        request: &HttpRequest,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        remarks::cancel_remark(self, request, submission_id).await
    }
}
