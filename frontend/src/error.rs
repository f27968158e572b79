use thiserror::Error;

pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

// =========================================================
// 核心错误类型
// =========================================================

/// 客户端错误
///
/// 每个变体对应一种处理方式：校验错误在请求前产生，
/// 鉴权与冲突错误携带后端 `detail`，传输错误只显示通用提示。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// 缺少必填字段等，未发出任何请求
    #[error("{0}")]
    Validation(String),

    /// 会话存储拒绝写入
    #[error("invalid session: {0}")]
    InvalidSession(String),

    /// 已认证请求收到 401，会话已被清除
    #[error("session expired")]
    SessionExpired,

    /// 凭据错误 (401) 或权限不足 (403)
    #[error("unauthorized ({status}){}", fmt_detail(.detail))]
    Unauthorized { status: u16, detail: Option<String> },

    /// 其余携带 `detail` 的 4xx，例如删除被活跃订单阻止
    #[error("rejected ({status}): {detail}")]
    Conflict { status: u16, detail: String },

    /// 携带 `detail` 的 5xx
    #[error("server error ({status}): {detail}")]
    Server { status: u16, detail: String },

    /// 网络失败、响应格式错误、没有 `detail` 的错误响应
    #[error("transport error: {0}")]
    Transport(String),
}

fn fmt_detail(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {}", d))
        .unwrap_or_default()
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn transport(message: impl ToString) -> Self {
        Self::Transport(message.to_string())
    }

    /// 根据非 2xx 状态码与后端 `detail` 归类错误
    ///
    /// `carried_token` 表示请求实际带有 `Authorization` 头；只有这种情况下的 401 才意味着会话失效。
    pub fn from_status(status: u16, detail: Option<String>, carried_token: bool) -> Self {
        match (status, detail) {
            (401, _) if carried_token => Self::SessionExpired,
            (401 | 403, detail) => Self::Unauthorized { status, detail },
            (400..=499, Some(detail)) => Self::Conflict { status, detail },
            (_, Some(detail)) => Self::Server { status, detail },
            (_, None) => Self::Transport(format!("request rejected with status {}", status)),
        }
    }

    /// 展示给用户的文本：优先使用后端原文，否则使用调用方给出的通用提示
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::SessionExpired => SESSION_EXPIRED_MESSAGE.to_string(),
            Self::Unauthorized {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::Conflict { detail, .. } | Self::Server { detail, .. } => detail.clone(),
            Self::InvalidSession(_) | Self::Unauthorized { detail: None, .. } | Self::Transport(_) => {
                fallback.to_string()
            }
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Transport(format!("malformed response: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_401_classification_depends_on_token() {
        assert_eq!(
            ClientError::from_status(401, None, true),
            ClientError::SessionExpired
        );
        assert_eq!(
            ClientError::from_status(401, Some("Invalid credentials".into()), false),
            ClientError::Unauthorized {
                status: 401,
                detail: Some("Invalid credentials".into())
            }
        );
    }

    #[test]
    fn test_403_is_unauthorized_even_with_token() {
        let err = ClientError::from_status(403, Some("Admin access required".into()), true);
        assert!(!err.is_session_expired());
        assert_eq!(err.user_message("Only admin can create events"), "Admin access required");
    }

    #[test]
    fn test_conflict_surfaces_detail_verbatim() {
        let err = ClientError::from_status(
            400,
            Some("Cannot delete event with active bookings".into()),
            true,
        );
        assert_eq!(
            err.user_message("Cannot delete event"),
            "Cannot delete event with active bookings"
        );
    }

    #[test]
    fn test_fallback_without_detail() {
        assert_eq!(
            ClientError::from_status(400, None, true).user_message("Booking failed"),
            "Booking failed"
        );
        assert_eq!(
            ClientError::from_status(502, None, true).user_message("Booking failed"),
            "Booking failed"
        );
        assert_eq!(
            ClientError::transport("offline").user_message("Failed to load events"),
            "Failed to load events"
        );
        assert_eq!(
            ClientError::from_status(403, None, true).user_message("Cannot delete event"),
            "Cannot delete event"
        );
    }

    #[test]
    fn test_server_error_surfaces_detail_verbatim() {
        let err = ClientError::from_status(500, Some("boom".into()), true);
        assert_eq!(
            err,
            ClientError::Server {
                status: 500,
                detail: "boom".into()
            }
        );
        assert_eq!(err.user_message("Booking failed"), "boom");
    }

    #[test]
    fn test_expired_message() {
        assert_eq!(
            ClientError::SessionExpired.user_message("Cancel failed"),
            SESSION_EXPIRED_MESSAGE
        );
    }

    #[test]
    fn test_display() {
        let err = ClientError::Unauthorized {
            status: 403,
            detail: Some("Admin access required".into()),
        };
        assert_eq!(err.to_string(), "unauthorized (403): Admin access required");
        assert_eq!(
            ClientError::Unauthorized {
                status: 401,
                detail: None
            }
            .to_string(),
            "unauthorized (401)"
        );
    }
}
