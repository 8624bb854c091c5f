use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{MarkingError, Result};
use crate::storage::Storage;

#[async_trait]
pub trait GraceCreditService: Send + Sync {
    async fn remaining_credits(&self, student_id: i64) -> Result<i64>;

    async fn can_deduct(&self, student_id: i64, units: i32) -> Result<bool>;
}

/// 余额 = 学生额度 - 已扣除总量，不单独存储
pub struct StorageGraceCredits {
    storage: Arc<dyn Storage>,
}

impl StorageGraceCredits {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl GraceCreditService for StorageGraceCredits {
    async fn remaining_credits(&self, student_id: i64) -> Result<i64> {
        let student = self
            .storage
            .get_student(student_id)
            .await?
            .ok_or_else(|| MarkingError::not_found(format!("Student {student_id} not found")))?;
        let used = self.storage.grace_units_used_by_student(student_id).await?;
        Ok(i64::from(student.grace_credits) - used)
    }

    async fn can_deduct(&self, student_id: i64, units: i32) -> Result<bool> {
        if units <= 0 {
            return Ok(false);
        }
        Ok(i64::from(units) <= self.remaining_credits(student_id).await?)
    }
}
