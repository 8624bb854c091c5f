//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 评分核心只返回结构化的错误值，面向用户的文案由 HTTP 层决定。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_marking_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum MarkingError {
            $($variant(String),)*
        }

        impl MarkingError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(MarkingError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(MarkingError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(MarkingError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl MarkingError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        MarkingError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_marking_errors! {
    InvalidTransition("E001", "Invalid Transition"),
    NotReady("E002", "Not Ready"),
    OutOfRange("E003", "Out Of Range"),
    RemarkNotAllowed("E004", "Remark Not Allowed"),
    CannotCancel("E005", "Cannot Cancel"),
    ExternalCollaborator("E006", "External Collaborator Error"),
    NotFound("E007", "Resource Not Found"),
    Validation("E008", "Validation Error"),
    DatabaseConfig("E009", "Database Configuration Error"),
    DatabaseConnection("E010", "Database Connection Error"),
    DatabaseOperation("E011", "Database Operation Error"),
    FileOperation("E012", "File Operation Error"),
    Serialization("E013", "Serialization Error"),
}

impl MarkingError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为调用方可恢复的业务错误（非基础设施故障）
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            MarkingError::InvalidTransition(_)
                | MarkingError::NotReady(_)
                | MarkingError::OutOfRange(_)
                | MarkingError::RemarkNotAllowed(_)
                | MarkingError::CannotCancel(_)
                | MarkingError::NotFound(_)
                | MarkingError::Validation(_)
        )
    }
}

impl fmt::Display for MarkingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for MarkingError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for MarkingError {
    fn from(err: sea_orm::DbErr) -> Self {
        MarkingError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for MarkingError {
    fn from(err: std::io::Error) -> Self {
        MarkingError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for MarkingError {
    fn from(err: serde_json::Error) -> Self {
        MarkingError::Serialization(err.to_string())
    }
}

impl From<zip::result::ZipError> for MarkingError {
    fn from(err: zip::result::ZipError) -> Self {
        MarkingError::ExternalCollaborator(format!("zip export failed: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, MarkingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(MarkingError::invalid_transition("test").code(), "E001");
        assert_eq!(MarkingError::not_ready("test").code(), "E002");
        assert_eq!(MarkingError::remark_not_allowed("test").code(), "E004");
        assert_eq!(MarkingError::external_collaborator("test").code(), "E006");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            MarkingError::out_of_range("test").error_type(),
            "Out Of Range"
        );
        assert_eq!(
            MarkingError::cannot_cancel("test").error_type(),
            "Cannot Cancel"
        );
    }

    #[test]
    fn test_error_message() {
        let err = MarkingError::validation("Invalid markable key");
        assert_eq!(err.message(), "Invalid markable key");
    }

    #[test]
    fn test_format_simple() {
        let err = MarkingError::not_ready("result 3 is not complete");
        let formatted = err.format_simple();
        assert!(formatted.contains("Not Ready"));
        assert!(formatted.contains("result 3"));
    }

    #[test]
    fn test_domain_error_classification() {
        assert!(MarkingError::invalid_transition("x").is_domain_error());
        assert!(MarkingError::not_found("x").is_domain_error());
        assert!(!MarkingError::database_operation("x").is_domain_error());
        assert!(!MarkingError::external_collaborator("x").is_domain_error());
    }
}
