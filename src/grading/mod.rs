//! 批改核心
//!
//! 纯计算与校验逻辑，不访问数据库与外部服务。

pub mod aggregate;
pub mod batch;
pub mod criterion;
pub mod deduction;
pub mod graders;
pub mod navigation;
pub mod remark;
pub mod state;
pub mod stats;

pub use aggregate::MarkAggregator;
pub use batch::{BatchItem, BatchOutcome};
pub use criterion::{CriterionScorer, RawMark};
pub use deduction::DeductionLedger;
pub use graders::GraderScope;
pub use navigation::GroupingNavigator;
pub use remark::RemarkWorkflow;
pub use state::ResultStateMachine;
