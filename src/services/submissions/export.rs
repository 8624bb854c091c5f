use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::submissions::requests::{DistributionQuery, DownloadQuery, FileQuery};
use crate::services::{error_response, respond};

pub async fn grade_distribution(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    query: DistributionQuery,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    respond(
        engine
            .grade_distribution(assignment_id, query.intervals)
            .await,
        "Distribution computed",
    )
}

pub async fn download_zip(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    query: DownloadQuery,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    match engine
        .download_zip(submission_id, query.include_annotations)
        .await
    {
        Ok(export) => Ok(HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, "application/zip"))
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.file_name),
            ))
            .body(export.bytes)),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn download_file(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    query: FileQuery,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    match engine
        .download_file(submission_id, &query.path, query.show_in_browser)
        .await
    {
        Ok(file) => {
            let disposition = if file.inline { "inline" } else { "attachment" };
            Ok(HttpResponse::Ok()
                .insert_header((header::CONTENT_TYPE, file.content_type))
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    format!("{}; filename=\"{}\"", disposition, file.file_name),
                ))
                .body(file.bytes))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
