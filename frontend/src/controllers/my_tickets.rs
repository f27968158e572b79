use ticketdesk_shared::Ticket;

use super::{ActionOutcome, MutationGate, Notification};
use crate::api::TicketApi;
use crate::request::HttpClient;

const LOAD_FAILED: &str = "Failed to load tickets";
const CANCEL_FAILED: &str = "Cancel failed";

#[derive(Clone)]
pub struct MyTicketsController<C> {
    api: TicketApi<C>,
    gate: MutationGate,
}

impl<C: HttpClient> MyTicketsController<C> {
    pub fn new(api: TicketApi<C>) -> Self {
        Self {
            api,
            gate: MutationGate::new(),
        }
    }

    pub async fn load(&self) -> Result<Vec<Ticket>, Notification> {
        self.api
            .my_tickets()
            .await
            .map_err(|e| Notification::from_error(&e, LOAD_FAILED))
    }

    /// 取消一张票并重新获取列表
    pub async fn cancel(&self, ticket: &Ticket) -> ActionOutcome<Vec<Ticket>> {
        let _gate = self.gate.enter().await;

        if let Err(e) = self.api.cancel_ticket(ticket.id).await {
            return ActionOutcome::failed(Notification::from_error(&e, CANCEL_FAILED));
        }

        let cancelled = Notification::success("Ticket cancelled successfully");
        match self.load().await {
            Ok(tickets) => ActionOutcome::succeeded(cancelled, Some(tickets)),
            Err(n) => ActionOutcome::succeeded(cancelled, None).with_notification(n),
        }
    }
}
