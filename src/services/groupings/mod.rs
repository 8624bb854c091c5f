pub mod grace;
pub mod navigation;
pub mod tags;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::engine::GradingEngine;
use crate::models::grace::requests::AddGraceDeductionRequest;
use crate::models::submissions::requests::NavigationQuery;
use crate::models::tags::requests::CreateTagRequest;

pub struct GroupingService {
    engine: Option<Arc<GradingEngine>>,
}

impl GroupingService {
    pub fn new_lazy() -> Self {
        Self { engine: None }
    }

    pub(crate) fn get_engine(&self, request: &HttpRequest) -> ActixResult<Arc<GradingEngine>> {
        super::engine_from(&self.engine, request)
    }

    /// 小组的宽限期扣除
    pub async fn list_grace_deductions(
        &self,
        request: &HttpRequest,
        grouping_id: i64,
    ) -> ActixResult<HttpResponse> {
        grace::list_grace_deductions(self, request, grouping_id).await
    }

    pub async fn add_grace_deduction(
        &self,
        request: &HttpRequest,
        req: AddGraceDeductionRequest,
    ) -> ActixResult<HttpResponse> {
        grace::add_grace_deduction(self, request, req).await
    }

    pub async fn delete_grace_deduction(
        &self,
        request: &HttpRequest,
        grouping_id: i64,
        deduction_id: i64,
    ) -> ActixResult<HttpResponse> {
        grace::delete_grace_deduction(self, request, grouping_id, deduction_id).await
    }

    /// 上一个或下一个可批改的小组
    pub async fn next_grouping(
        &self,
        request: &HttpRequest,
        grouping_id: i64,
        query: NavigationQuery,
    ) -> ActixResult<HttpResponse> {
        navigation::next_grouping(self, request, grouping_id, query).await
    }

    pub async fn create_tag(
        &self,
        request: &HttpRequest,
        req: CreateTagRequest,
    ) -> ActixResult<HttpResponse> {
        tags::create_tag(self, request, req).await
    }

    pub async fn list_tags(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        tags::list_tags(self, request).await
    }

    pub async fn grouping_tags(
        &self,
        request: &HttpRequest,
        grouping_id: i64,
    ) -> ActixResult<HttpResponse> {
        tags::grouping_tags(self, request, grouping_id).await
    }

    pub async fn add_tag(
        &self,
        request: &HttpRequest,
        grouping_id: i64,
        tag_id: i64,
    ) -> ActixResult<HttpResponse> {
        tags::add_tag(self, request, grouping_id, tag_id).await
    }

    pub async fn remove_tag(
        &self,
        request: &HttpRequest,
        grouping_id: i64,
        tag_id: i64,
    ) -> ActixResult<HttpResponse> {
        tags::remove_tag(self, request, grouping_id, tag_id).await
    }
}
