pub mod annotations;
pub mod marks;
pub mod state;
pub mod view;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::engine::GradingEngine;
use crate::models::annotations::requests::AddAnnotationRequest;
use crate::models::results::requests::{
    AddExtraMarkRequest, OverallCommentRequest, ReleaseRequest, ResultViewQuery,
    TransitionRequest, UpdateMarkRequest,
};

pub struct ResultService {
    engine: Option<Arc<GradingEngine>>,
}

impl ResultService {
    pub fn new_lazy() -> Self {
        Self { engine: None }
    }

    pub(crate) fn get_engine(&self, request: &HttpRequest) -> ActixResult<Arc<GradingEngine>> {
        super::engine_from(&self.engine, request)
    }

    /// 结果视图
    pub async fn view_result(
        &self,
        request: &HttpRequest,
        result_id: i64,
        query: ResultViewQuery,
    ) -> ActixResult<HttpResponse> {
        view::view_result(self, request, result_id, query).await
    }

    /// 重新计算总分
    pub async fn recompute_total(
        &self,
        request: &HttpRequest,
        result_id: i64,
    ) -> ActixResult<HttpResponse> {
        view::recompute_total(self, request, result_id).await
    }

    /// 更新分项分数
    pub async fn update_mark(
        &self,
        request: &HttpRequest,
        result_id: i64,
        req: UpdateMarkRequest,
    ) -> ActixResult<HttpResponse> {
        marks::update_mark(self, request, result_id, req).await
    }

    pub async fn add_extra_mark(
        &self,
        request: &HttpRequest,
        result_id: i64,
        req: AddExtraMarkRequest,
    ) -> ActixResult<HttpResponse> {
        marks::add_extra_mark(self, request, result_id, req).await
    }

    pub async fn remove_extra_mark(
        &self,
        request: &HttpRequest,
        extra_mark_id: i64,
    ) -> ActixResult<HttpResponse> {
        marks::remove_extra_mark(self, request, extra_mark_id).await
    }

    pub async fn update_overall_comment(
        &self,
        request: &HttpRequest,
        result_id: i64,
        req: OverallCommentRequest,
    ) -> ActixResult<HttpResponse> {
        marks::update_overall_comment(self, request, result_id, req).await
    }

    /// 状态迁移
    pub async fn transition(
        &self,
        request: &HttpRequest,
        result_id: i64,
        req: TransitionRequest,
    ) -> ActixResult<HttpResponse> {
        state::transition(self, request, result_id, req).await
    }

    pub async fn toggle_marking_state(
        &self,
        request: &HttpRequest,
        result_id: i64,
    ) -> ActixResult<HttpResponse> {
        state::toggle_marking_state(self, request, result_id).await
    }

    /// 批量发布或撤回
    pub async fn release(
        &self,
        request: &HttpRequest,
        req: ReleaseRequest,
    ) -> ActixResult<HttpResponse> {
        state::release(self, request, req).await
    }

    pub async fn add_annotation(
        &self,
        request: &HttpRequest,
        result_id: i64,
        req: AddAnnotationRequest,
    ) -> ActixResult<HttpResponse> {
        annotations::add_annotation(self, request, result_id, req).await
    }

    pub async fn remove_annotation(
        &self,
        request: &HttpRequest,
        annotation_id: i64,
    ) -> ActixResult<HttpResponse> {
        annotations::remove_annotation(self, request, annotation_id).await
    }
}
