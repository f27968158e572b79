use tracing::info;

use super::{ActionOutcome, Notification};
use crate::api::TicketApi;
use crate::error::ClientError;
use crate::request::HttpClient;
use crate::session::Session;

const MISSING_FIELDS: &str = "Please enter email and password";
const LOGIN_FAILED: &str = "Invalid email or password";

#[derive(Clone)]
pub struct LoginController<C> {
    api: TicketApi<C>,
}

impl<C: HttpClient> LoginController<C> {
    pub fn new(api: TicketApi<C>) -> Self {
        Self { api }
    }

    /// 登录并写入会话
    ///
    /// 跳转由路由对会话变更的订阅完成，这里不直接导航。
    pub async fn login(&self, email: &str, password: &str) -> ActionOutcome<Session> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            let err = ClientError::validation(MISSING_FIELDS);
            return ActionOutcome::failed(Notification::from_error(&err, LOGIN_FAILED));
        }

        let resp = match self.api.login(email, password).await {
            Ok(resp) => resp,
            Err(e) => return ActionOutcome::failed(Notification::from_error(&e, LOGIN_FAILED)),
        };

        match self.api.session().set(resp.access_token, &resp.role) {
            Ok(session) => {
                info!(role = %session.role(), "Login succeeded");
                ActionOutcome::succeeded(Notification::success("Login successful"), Some(session))
            }
            Err(e) => ActionOutcome::failed(Notification::from_error(&e, LOGIN_FAILED)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::test_support::*;
    use crate::web::route::{AppRoute, GuardDecision, guard};
    use serde_json::json;
    use ticketdesk_shared::Role;
    use ticketdesk_shared::protocol::HttpMethod;

    #[tokio::test]
    async fn test_login_sets_session_and_user_cannot_reach_admin() {
        let api = api_as(None);
        api.client().mock_response(
            HttpMethod::Post,
            &url("/login"),
            200,
            json!({"access_token": "tok1", "token_type": "bearer", "role": "user"}),
        );
        let ctrl = LoginController::new(api);

        let outcome = ctrl.login("a@b.com", "x").await;

        assert!(outcome.is_success());
        assert_eq!(outcome.notifications[0].message, "Login successful");
        let session = ctrl.api.session().get().unwrap();
        assert_eq!(session.token(), "tok1");
        assert_eq!(session.role(), Role::User);
        assert_eq!(
            guard(AppRoute::from_path("/admin"), Some(&session)),
            GuardDecision::Redirect(AppRoute::Events)
        );
    }

    #[tokio::test]
    async fn test_missing_fields_skip_request() {
        let ctrl = LoginController::new(api_as(None));

        for (email, password) in [("", "x"), ("a@b.com", ""), ("   ", "x")] {
            let outcome = ctrl.login(email, password).await;
            assert_eq!(
                outcome.notifications[0].message,
                "Please enter email and password"
            );
        }
        assert!(ctrl.api.client().requests.borrow().is_empty());
        assert!(ctrl.api.session().get().is_none());
    }

    #[tokio::test]
    async fn test_bad_credentials_show_backend_detail() {
        let api = api_as(None);
        api.client().mock_response(
            HttpMethod::Post,
            &url("/login"),
            401,
            json!({"detail": "Invalid credentials"}),
        );
        let ctrl = LoginController::new(api);

        let outcome = ctrl.login("a@b.com", "wrong").await;

        assert_eq!(outcome.notifications[0].message, "Invalid credentials");
        assert!(ctrl.api.session().get().is_none());
    }

    #[tokio::test]
    async fn test_network_failure_uses_fallback() {
        let api = api_as(None);
        api.client()
            .mock_network_error(HttpMethod::Post, &url("/login"), "offline");
        let ctrl = LoginController::new(api);

        let outcome = ctrl.login("a@b.com", "x").await;
        assert_eq!(outcome.notifications[0].message, "Invalid email or password");
    }

    #[tokio::test]
    async fn test_unknown_role_does_not_create_partial_session() {
        let api = api_as(None);
        api.client().mock_response(
            HttpMethod::Post,
            &url("/login"),
            200,
            json!({"access_token": "tok1", "role": "superuser"}),
        );
        let ctrl = LoginController::new(api);

        let outcome = ctrl.login("a@b.com", "x").await;

        assert!(!outcome.is_success());
        assert!(ctrl.api.session().get().is_none());
    }
}
