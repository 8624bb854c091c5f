//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod annotation_categories;
pub mod annotation_texts;
pub mod annotations;
pub mod assignments;
pub mod criteria;
pub mod criterion_grader_associations;
pub mod extra_marks;
pub mod grace_period_deductions;
pub mod grader_memberships;
pub mod graders;
pub mod grouping_tags;
pub mod groupings;
pub mod marks;
pub mod memberships;
pub mod results;
pub mod students;
pub mod submissions;
pub mod tags;
