//! 预导入模块，方便使用

pub use super::annotation_categories::{
    ActiveModel as AnnotationCategoryActiveModel, Entity as AnnotationCategories,
    Model as AnnotationCategoryModel,
};
pub use super::annotation_texts::{
    ActiveModel as AnnotationTextActiveModel, Entity as AnnotationTexts,
    Model as AnnotationTextModel,
};
pub use super::annotations::{
    ActiveModel as AnnotationActiveModel, Entity as Annotations, Model as AnnotationModel,
};
pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::criteria::{
    ActiveModel as CriterionActiveModel, Entity as Criteria, Model as CriterionModel,
};
pub use super::criterion_grader_associations::{
    ActiveModel as CriterionGraderActiveModel, Entity as CriterionGraderAssociations,
    Model as CriterionGraderModel,
};
pub use super::extra_marks::{
    ActiveModel as ExtraMarkActiveModel, Entity as ExtraMarks, Model as ExtraMarkModel,
};
pub use super::grace_period_deductions::{
    ActiveModel as GraceDeductionActiveModel, Entity as GracePeriodDeductions,
    Model as GraceDeductionModel,
};
pub use super::grader_memberships::{
    ActiveModel as GraderMembershipActiveModel, Entity as GraderMemberships,
    Model as GraderMembershipModel,
};
pub use super::graders::{ActiveModel as GraderActiveModel, Entity as Graders, Model as GraderModel};
pub use super::grouping_tags::{
    ActiveModel as GroupingTagActiveModel, Entity as GroupingTags, Model as GroupingTagModel,
};
pub use super::groupings::{
    ActiveModel as GroupingActiveModel, Entity as Groupings, Model as GroupingModel,
};
pub use super::marks::{ActiveModel as MarkActiveModel, Entity as Marks, Model as MarkModel};
pub use super::memberships::{
    ActiveModel as MembershipActiveModel, Entity as Memberships, Model as MembershipModel,
};
pub use super::results::{ActiveModel as ResultActiveModel, Entity as Results, Model as ResultModel};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::tags::{ActiveModel as TagActiveModel, Entity as Tags, Model as TagModel};
