use super::{Severity, SupportHandler, SupportTicket};
use crate::domain::model::Transcript;

pub struct Level1Support;

impl SupportHandler for Level1Support {
    fn name(&self) -> &str {
        "Level 1 Support"
    }

    fn can_handle(&self, ticket: &SupportTicket) -> bool {
        ticket.severity == Severity::Low
    }

    fn process(&self, ticket: &mut SupportTicket, out: &mut Transcript) {
        out.line(format!("Level 1 handling: {}", ticket));
        out.line("Action: Resolving basic issue");
        ticket.assign(self.name());
    }
}

/// 描述含 "escalated" 的低嚴重度工單
pub struct Level1_5Support;

impl SupportHandler for Level1_5Support {
    fn name(&self) -> &str {
        "Level 1.5 Support"
    }

    fn can_handle(&self, ticket: &SupportTicket) -> bool {
        ticket.severity == Severity::Low && ticket.description.to_lowercase().contains("escalated")
    }

    fn process(&self, ticket: &mut SupportTicket, out: &mut Transcript) {
        out.line(format!("Level 1.5 handling: {}", ticket));
        out.line("Action: Handling escalated basic issue");
        ticket.assign(self.name());
    }
}

pub struct Level2Support;

impl SupportHandler for Level2Support {
    fn name(&self) -> &str {
        "Level 2 Support"
    }

    fn can_handle(&self, ticket: &SupportTicket) -> bool {
        ticket.severity == Severity::Medium
    }

    fn process(&self, ticket: &mut SupportTicket, out: &mut Transcript) {
        out.line(format!("Level 2 handling: {}", ticket));
        out.line("Action: Investigating and resolving technical issue");
        ticket.assign(self.name());
    }
}

pub struct Level3Support;

impl SupportHandler for Level3Support {
    fn name(&self) -> &str {
        "Level 3 Support"
    }

    fn can_handle(&self, ticket: &SupportTicket) -> bool {
        ticket.severity == Severity::High
    }

    fn process(&self, ticket: &mut SupportTicket, out: &mut Transcript) {
        out.line(format!("Level 3 handling: {}", ticket));
        out.line("Action: Deep technical investigation and resolution");
        ticket.assign(self.name());
    }
}

pub struct ManagementSupport;

impl SupportHandler for ManagementSupport {
    fn name(&self) -> &str {
        "Management"
    }

    fn can_handle(&self, ticket: &SupportTicket) -> bool {
        ticket.severity == Severity::Critical
    }

    fn process(&self, ticket: &mut SupportTicket, out: &mut Transcript) {
        out.line(format!("Management handling: {}", ticket));
        out.line("Action: Emergency response and escalation to leadership");
        ticket.assign(self.name());
    }
}

/// 在既有處理者外層加上開始/結束紀錄
pub struct LoggingHandler<H> {
    inner: H,
}

impl<H: SupportHandler> LoggingHandler<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H: SupportHandler> SupportHandler for LoggingHandler<H> {
    // 轉送時顯示的是外層名稱；指派仍記在內層處理者名下
    fn name(&self) -> &str {
        "LoggingHandler"
    }

    fn can_handle(&self, ticket: &SupportTicket) -> bool {
        self.inner.can_handle(ticket)
    }

    fn process(&self, ticket: &mut SupportTicket, out: &mut Transcript) {
        out.line(format!("[LOG] Start ticket: {}", ticket.id));
        tracing::debug!(ticket = ticket.id, handler = self.inner.name(), "processing ticket");
        self.inner.process(ticket, out);
        out.line(format!("[LOG] End ticket: {}", ticket.id));
    }
}
