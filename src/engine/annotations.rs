//! 批注操作

use super::GradingEngine;
use crate::errors::{MarkingError, Result};
use crate::grading::ResultStateMachine;
use crate::models::annotations::{
    entities::{Annotation, AnnotationCategory},
    requests::AddAnnotationRequest,
};
use crate::models::results::{entities::MarkTotals, mutations::AppliedChange};
use crate::storage::result_mutator;

impl GradingEngine {
    pub async fn add_annotation(
        &self,
        result_id: i64,
        req: AddAnnotationRequest,
    ) -> Result<Annotation> {
        let outcome = self
            .storage
            .mutate_result(
                result_id,
                result_mutator(move |snapshot| {
                    ResultStateMachine::plan_add_annotation(
                        snapshot,
                        req.annotation_text_id,
                        &req.submission_file,
                        req.line_start,
                        req.line_end,
                    )
                }),
            )
            .await?;

        let AppliedChange::Annotation(annotation_id) = outcome.change else {
            return Err(MarkingError::database_operation(format!(
                "Annotation on result {result_id} did not persist"
            )));
        };
        outcome
            .snapshot
            .annotations
            .into_iter()
            .find(|a| a.id == annotation_id)
            .ok_or_else(|| MarkingError::not_found(format!("Annotation {annotation_id} not found")))
    }

    pub async fn remove_annotation(&self, annotation_id: i64) -> Result<MarkTotals> {
        let result_id = self
            .storage
            .find_annotation_result(annotation_id)
            .await?
            .ok_or_else(|| {
                MarkingError::not_found(format!("Annotation {annotation_id} not found"))
            })?;
        let outcome = self
            .storage
            .mutate_result(
                result_id,
                result_mutator(move |snapshot| {
                    ResultStateMachine::plan_remove_annotation(snapshot, annotation_id)
                }),
            )
            .await?;
        Ok(outcome.totals)
    }

    pub async fn annotation_categories(&self, assignment_id: i64) -> Result<Vec<AnnotationCategory>> {
        self.assignment(assignment_id).await?;
        self.storage.list_annotation_categories(assignment_id).await
    }
}
