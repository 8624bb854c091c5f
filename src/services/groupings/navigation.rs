use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GroupingService;
use crate::models::submissions::requests::NavigationQuery;
use crate::services::respond;

pub async fn next_grouping(
    service: &GroupingService,
    request: &HttpRequest,
    grouping_id: i64,
    query: NavigationQuery,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    respond(
        engine
            .next_grouping(grouping_id, query.direction, query.grader_id)
            .await,
        "Navigation resolved",
    )
}
