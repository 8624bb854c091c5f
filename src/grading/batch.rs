//! 批量操作结果
//!
//! 批量发布与批量收取按项独立执行，逐项报告成功或失败。

use serde::Serialize;
use ts_rs::TS;

use crate::errors::{MarkingError, Result};

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/batch.ts")]
pub struct BatchItem<T: TS> {
    pub id: i64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: TS> BatchItem<T> {
    pub fn from_result(id: i64, result: Result<T>) -> Self {
        match result {
            Ok(data) => Self {
                id,
                success: true,
                data: Some(data),
                error_code: None,
                error: None,
            },
            Err(e) => Self::failed(id, &e),
        }
    }

    pub fn failed(id: i64, err: &MarkingError) -> Self {
        Self {
            id,
            success: false,
            data: None,
            error_code: Some(err.code().to_string()),
            error: Some(err.message().to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/batch.ts")]
pub struct BatchOutcome<T: TS> {
    pub items: Vec<BatchItem<T>>,
    pub succeeded: usize,
    pub failed: usize,
}

impl<T: TS> BatchOutcome<T> {
    pub fn new(items: Vec<BatchItem<T>>) -> Self {
        let succeeded = items.iter().filter(|i| i.success).count();
        let failed = items.len() - succeeded;
        Self {
            items,
            succeeded,
            failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_success_is_reported_per_item() {
        let outcome = BatchOutcome::new(vec![
            BatchItem::from_result(1, Ok(true)),
            BatchItem::from_result(2, Err(MarkingError::not_ready("result 2 is not complete"))),
            BatchItem::from_result(3, Ok(true)),
        ]);
        assert_eq!(outcome.succeeded, 2);
        assert_eq!(outcome.failed, 1);

        let failed = &outcome.items[1];
        assert_eq!(failed.id, 2);
        assert_eq!(failed.error_code.as_deref(), Some("E002"));
        assert!(failed.data.is_none());
    }
}
