use tracing::info;

use super::{ActionOutcome, Notification};
use crate::api::TicketApi;
use crate::error::ClientError;
use crate::request::HttpClient;
use crate::web::route::AppRoute;

const MISSING_FIELDS: &str = "Please fill all fields";
const REGISTER_FAILED: &str = "Registration failed";

#[derive(Clone)]
pub struct RegisterController<C> {
    api: TicketApi<C>,
}

impl<C: HttpClient> RegisterController<C> {
    pub fn new(api: TicketApi<C>) -> Self {
        Self { api }
    }

    /// 注册新账号；成功后返回应跳转的登录页
    pub async fn register(&self, email: &str, password: &str) -> ActionOutcome<AppRoute> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            let err = ClientError::validation(MISSING_FIELDS);
            return ActionOutcome::failed(Notification::from_error(&err, REGISTER_FAILED));
        }

        match self.api.register(email, password).await {
            Ok(account) => {
                info!(user_id = account.id, "Account registered");
                ActionOutcome::succeeded(
                    Notification::success("Registration successful"),
                    Some(AppRoute::Login),
                )
            }
            Err(e) => ActionOutcome::failed(Notification::from_error(&e, REGISTER_FAILED)),
        }
    }
}
