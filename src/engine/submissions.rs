//! 收取、列表、下载与成绩分布

use std::collections::{BTreeMap, HashMap};

use futures_util::future::join_all;
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::GradingEngine;
use crate::collaborators::{ExportFile, collaborator_error};
use crate::errors::{MarkingError, Result};
use crate::grading::{BatchItem, BatchOutcome, MarkAggregator, RemarkWorkflow, stats};
use crate::models::submissions::{
    entities::{GroupingOverview, Submission},
    responses::{FileDownload, GradeDistribution, SubmissionRow, ZipExport},
};

/// 浏览器可直接展示的图片类型
const INLINE_IMAGES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
];

fn image_content_type(path: &str) -> Option<&'static str> {
    let extension = std::path::Path::new(path)
        .extension()?
        .to_string_lossy()
        .to_ascii_lowercase();
    INLINE_IMAGES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
}

impl GradingEngine {
    /// 逐个小组收取最新版本，单个失败不影响其他小组
    pub async fn collect_submissions(
        &self,
        assignment_id: i64,
        grouping_ids: &[i64],
        override_existing: bool,
    ) -> Result<BatchOutcome<Submission>> {
        self.assignment(assignment_id).await?;
        let overviews: HashMap<i64, GroupingOverview> = self
            .storage
            .list_grouping_overviews(assignment_id)
            .await?
            .into_iter()
            .map(|o| (o.grouping.id, o))
            .collect();

        let items = join_all(grouping_ids.iter().map(|&grouping_id| {
            let overview = overviews.get(&grouping_id);
            async move {
                let outcome = self
                    .collect_one(assignment_id, grouping_id, overview, override_existing)
                    .await;
                if let Err(e) = &outcome {
                    warn!("Collecting grouping {} failed: {}", grouping_id, e);
                }
                BatchItem::from_result(grouping_id, outcome)
            }
        }))
        .await;

        let outcome = BatchOutcome::new(items);
        info!(
            "Collected {} of {} groupings for assignment {}",
            outcome.succeeded,
            grouping_ids.len(),
            assignment_id
        );
        Ok(outcome)
    }

    async fn collect_one(
        &self,
        assignment_id: i64,
        grouping_id: i64,
        overview: Option<&GroupingOverview>,
        override_existing: bool,
    ) -> Result<Submission> {
        let overview = overview.ok_or_else(|| {
            MarkingError::not_found(format!(
                "Grouping {grouping_id} not found in assignment {assignment_id}"
            ))
        })?;
        if overview.submission.is_some() && !override_existing {
            return Err(MarkingError::validation(format!(
                "Grouping {grouping_id} has already been collected"
            )));
        }

        let revision = self
            .repository
            .get_latest_revision(&overview.grouping.repo_name)
            .await
            .map_err(|e| collaborator_error("Repository lookup failed", e))?;
        let (submission, _) = self
            .storage
            .create_collected_submission(grouping_id, revision)
            .await?;
        Ok(submission)
    }

    /// 每个小组一行，按小组 ID 排序
    pub async fn submission_rows(&self, assignment_id: i64) -> Result<Vec<SubmissionRow>> {
        self.assignment(assignment_id).await?;
        let overviews = self.storage.list_grouping_overviews(assignment_id).await?;

        Ok(overviews
            .into_iter()
            .map(|o| {
                let current = RemarkWorkflow::current_result(&o.results);
                SubmissionRow {
                    grouping_id: o.grouping.id,
                    group_name: o.grouping.group_name,
                    submission_id: o.submission.as_ref().map(|s| s.id),
                    result_id: RemarkWorkflow::working_result(&o.results).map(|r| r.id),
                    revision_identifier: o
                        .submission
                        .as_ref()
                        .map(|s| s.revision_identifier.clone()),
                    revision_timestamp: o.submission.as_ref().and_then(|s| s.revision_timestamp),
                    marking_state: RemarkWorkflow::submission_status(&o.results),
                    grace_credits_used: i32::try_from(o.grace_units).unwrap_or(i32::MAX),
                    final_grade: current.map(|r| r.total_mark),
                    tags: o.tags.into_iter().map(|t| t.name).collect(),
                }
            })
            .collect())
    }

    /// 导出提交文件；可在每个文件末尾附上当前结果的批注
    pub async fn download_zip(
        &self,
        submission_id: i64,
        include_annotations: bool,
    ) -> Result<ZipExport> {
        let ctx = self.submission_context(submission_id).await?;
        let repo_name = &ctx.grouping.repo_name;
        let revision = &ctx.submission.revision_identifier;

        let mut annotations: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let current = RemarkWorkflow::current_result(&ctx.results).filter(|_| include_annotations);
        if let Some(current) = current {
            let snapshot = self.snapshot(current.id).await?;
            for a in snapshot.annotations {
                annotations
                    .entry(a.submission_file.clone())
                    .or_default()
                    .push(format!(
                        "#{} (lines {}-{}): {}",
                        a.annotation_number, a.line_start, a.line_end, a.content
                    ));
            }
        }

        let files: Vec<ExportFile> = self
            .repository
            .list_files(repo_name, revision)
            .await
            .map_err(|e| collaborator_error("Repository listing failed", e))?
            .into_iter()
            .map(|path| ExportFile {
                annotations: annotations.remove(&path).unwrap_or_default(),
                path,
            })
            .collect();

        let bytes = self
            .repository
            .export_zip(repo_name, revision, &files)
            .await
            .map_err(|e| collaborator_error("Repository export failed", e))?;

        let suffix = if include_annotations { "_ann" } else { "" };
        Ok(ZipExport {
            file_name: format!(
                "{}_{}_r{}{}.zip",
                ctx.assignment.short_identifier, ctx.grouping.group_name, revision, suffix
            ),
            bytes,
        })
    }

    /// 读取提交版本中的单个文件；图片在 `show_in_browser` 时内联展示，其余作为附件
    pub async fn download_file(
        &self,
        submission_id: i64,
        path: &str,
        show_in_browser: bool,
    ) -> Result<FileDownload> {
        let ctx = self.submission_context(submission_id).await?;
        let path = path.trim();
        if path.is_empty() {
            return Err(MarkingError::validation("File path is required"));
        }

        let bytes = self
            .repository
            .get_file_content(
                &ctx.grouping.repo_name,
                &ctx.submission.revision_identifier,
                path,
            )
            .await
            .map_err(|e| collaborator_error("Repository file read failed", e))?;

        let file_name = path.rsplit('/').next().unwrap_or(path).to_string();
        let (content_type, inline) = match image_content_type(path) {
            Some(mime) if show_in_browser => (mime, true),
            Some(_) => ("application/octet-stream", false),
            None => ("text/plain; charset=utf-8", false),
        };
        Ok(FileDownload {
            file_name,
            content_type: content_type.to_string(),
            inline,
            bytes,
        })
    }

    /// 只统计已完成且没有进行中复评的当前结果
    pub async fn grade_distribution(
        &self,
        assignment_id: i64,
        intervals: Option<usize>,
    ) -> Result<GradeDistribution> {
        self.assignment(assignment_id).await?;
        let criteria = self.storage.list_criteria(assignment_id).await?;
        let total_possible = MarkAggregator::total_possible(&criteria)?;
        let overviews = self.storage.list_grouping_overviews(assignment_id).await?;

        let percentages = overviews
            .iter()
            .filter_map(|o| RemarkWorkflow::counted_result(&o.results))
            .map(|r| MarkAggregator::percentage_of(r.total_mark, total_possible))
            .collect::<Result<Vec<Decimal>>>()?;

        stats::grade_distribution(
            &percentages,
            intervals.unwrap_or(self.distribution_intervals),
        )
    }
}
