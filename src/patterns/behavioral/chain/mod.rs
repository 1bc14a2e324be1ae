//! Chain of Responsibility: support tickets routed through escalation levels.
//!
//! A `SupportChain` is a singly linked list of handlers. Each node either
//! processes the ticket or forwards it; the last node leaves it unresolved.

pub mod factory;
pub mod handlers;
pub mod violated;

use std::fmt;

use crate::domain::model::Transcript;
use crate::utils::error::Result;

pub use factory::{ChainBuilder, ChainInfo, ChainType, SupportChainFactory, SupportSystem};
pub use handlers::{
    Level1Support, Level1_5Support, Level2Support, Level3Support, LoggingHandler,
    ManagementSupport,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    /// 不在任何處理者職責內的等級
    Other(String),
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => f.write_str("LOW"),
            Severity::Medium => f.write_str("MEDIUM"),
            Severity::High => f.write_str("HIGH"),
            Severity::Critical => f.write_str("CRITICAL"),
            Severity::Other(label) => f.write_str(label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportTicket {
    pub id: u32,
    pub severity: Severity,
    pub description: String,
    pub assigned_to: Option<String>,
    pub resolved: bool,
}

impl SupportTicket {
    pub fn new(id: u32, severity: Severity, description: impl Into<String>) -> Self {
        Self {
            id,
            severity,
            description: description.into(),
            assigned_to: None,
            resolved: false,
        }
    }

    pub fn assign(&mut self, handler: &str) {
        self.assigned_to = Some(handler.to_string());
        self.resolved = true;
    }
}

impl fmt::Display for SupportTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ticket #{} [{}]: {}",
            self.id, self.severity, self.description
        )
    }
}

pub trait SupportHandler: Send + Sync {
    fn name(&self) -> &str;
    fn can_handle(&self, ticket: &SupportTicket) -> bool;
    fn process(&self, ticket: &mut SupportTicket, out: &mut Transcript);
}

struct ChainNode {
    handler: Box<dyn SupportHandler>,
    next: Option<Box<ChainNode>>,
}

impl ChainNode {
    fn handle(&self, ticket: &mut SupportTicket, out: &mut Transcript) {
        if self.handler.can_handle(ticket) {
            self.handler.process(ticket, out);
            return;
        }

        match &self.next {
            Some(next) => {
                out.line(format!("{} forwarding request", self.handler.name()));
                next.handle(ticket, out);
            }
            None => {
                out.line(format!("{}: end of chain, unhandled", self.handler.name()));
                ticket.resolved = false;
            }
        }
    }
}

pub struct SupportChain {
    head: Option<Box<ChainNode>>,
}

impl SupportChain {
    /// 依序串起處理者，第一個是入口
    pub fn new(handlers: Vec<Box<dyn SupportHandler>>) -> Self {
        let head = handlers
            .into_iter()
            .rev()
            .fold(None, |next, handler| Some(Box::new(ChainNode { handler, next })));
        Self { head }
    }

    pub fn handle(&self, ticket: &mut SupportTicket, out: &mut Transcript) {
        match &self.head {
            Some(head) => head.handle(ticket, out),
            None => ticket.resolved = false,
        }
    }

    pub fn handler_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut node = self.head.as_deref();
        while let Some(current) = node {
            names.push(current.handler.name().to_string());
            node = current.next.as_deref();
        }
        names
    }

    pub fn len(&self) -> usize {
        self.handler_names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

fn process_and_report(chain: &SupportChain, mut ticket: SupportTicket, out: &mut Transcript) -> SupportTicket {
    out.blank();
    out.rule('=', 60);
    out.line(format!("Processing: {}", ticket));
    out.rule('=', 60);

    chain.handle(&mut ticket, out);

    match (&ticket.assigned_to, ticket.resolved) {
        (Some(handler), true) => out.line(format!("RESOLVED BY: {}", handler)),
        _ => out.line("UNRESOLVED"),
    }
    ticket
}

pub fn run_followed(out: &mut Transcript) -> Result<()> {
    out.banner("CHAIN OF RESPONSIBILITY");

    let chain = SupportChain::new(vec![
        Box::new(Level1Support),
        Box::new(Level2Support),
        Box::new(Level3Support),
        Box::new(ManagementSupport),
    ]);

    let tickets = [
        SupportTicket::new(1, Severity::Low, "Password reset"),
        SupportTicket::new(2, Severity::Medium, "Software installation issue"),
        SupportTicket::new(3, Severity::High, "Server performance degradation"),
        SupportTicket::new(4, Severity::Critical, "Complete system outage"),
    ];
    for ticket in tickets {
        process_and_report(&chain, ticket, out);
    }

    out.blank();
    out.banner("ADDING NEW HANDLER");
    let extended = SupportChain::new(vec![
        Box::new(Level1Support),
        Box::new(Level1_5Support),
        Box::new(Level2Support),
        Box::new(Level3Support),
        Box::new(ManagementSupport),
    ]);
    process_and_report(
        &extended,
        SupportTicket::new(5, Severity::Low, "Escalated password issue"),
        out,
    );

    out.blank();
    out.banner("LOGGING DECORATOR");
    let logged = SupportChain::new(vec![
        Box::new(LoggingHandler::new(Level1Support)),
        Box::new(LoggingHandler::new(Level2Support)),
    ]);
    process_and_report(&logged, SupportTicket::new(6, Severity::Medium, "Need logs"), out);

    out.blank();
    out.banner("UNHANDLED REQUEST");
    let simple_chain = SupportChain::new(vec![Box::new(Level1Support), Box::new(Level2Support)]);
    process_and_report(
        &simple_chain,
        SupportTicket::new(7, Severity::Other("ULTRA_CRITICAL".to_string()), "Unknown severity"),
        out,
    );

    out.blank();
    out.banner("SUPPORT TICKET SYSTEM - WITH FACTORY");
    factory::run_factory_scenarios(out)
}

pub fn run_violated(out: &mut Transcript) -> Result<()> {
    violated::run(out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_chain() -> SupportChain {
        SupportChain::new(vec![
            Box::new(Level1Support),
            Box::new(Level1_5Support),
            Box::new(Level2Support),
            Box::new(Level3Support),
            Box::new(ManagementSupport),
        ])
    }

    #[test]
    fn test_each_severity_reaches_its_level() {
        let chain = full_chain();
        let cases = [
            (Severity::Low, "Level 1 Support"),
            (Severity::Medium, "Level 2 Support"),
            (Severity::High, "Level 3 Support"),
            (Severity::Critical, "Management"),
        ];

        for (severity, expected) in cases {
            let mut out = Transcript::new();
            let mut ticket = SupportTicket::new(1, severity, "issue");
            chain.handle(&mut ticket, &mut out);
            assert!(ticket.resolved);
            assert_eq!(ticket.assigned_to.as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_unknown_severity_stays_unresolved() {
        let chain = full_chain();
        let mut out = Transcript::new();
        let mut ticket =
            SupportTicket::new(7, Severity::Other("ULTRA_CRITICAL".to_string()), "Unknown");
        chain.handle(&mut ticket, &mut out);

        assert!(!ticket.resolved);
        assert!(ticket.assigned_to.is_none());
        assert_eq!(out.count_matching("forwarding request"), 4);
        assert!(out.contains("Management: end of chain, unhandled"));
    }

    #[test]
    fn test_escalated_ticket_reaches_level_1_5_when_level_1_absent() {
        let chain = SupportChain::new(vec![Box::new(Level1_5Support), Box::new(Level2Support)]);
        let mut out = Transcript::new();
        let mut ticket = SupportTicket::new(5, Severity::Low, "ESCALATED password issue");
        chain.handle(&mut ticket, &mut out);
        assert_eq!(ticket.assigned_to.as_deref(), Some("Level 1.5 Support"));
    }

    #[test]
    fn test_logging_handler_wraps_processing() {
        let chain = SupportChain::new(vec![Box::new(LoggingHandler::new(Level2Support))]);
        let mut out = Transcript::new();
        let mut ticket = SupportTicket::new(6, Severity::Medium, "Need logs");
        chain.handle(&mut ticket, &mut out);

        assert_eq!(out.lines()[0], "[LOG] Start ticket: 6");
        assert_eq!(out.lines()[out.len() - 1], "[LOG] End ticket: 6");
        assert!(ticket.resolved);
    }

    #[test]
    fn test_logged_chain_forwards_under_wrapper_name() {
        let chain = SupportChain::new(vec![
            Box::new(LoggingHandler::new(Level1Support)),
            Box::new(LoggingHandler::new(Level2Support)),
        ]);
        let mut out = Transcript::new();
        let mut ticket = SupportTicket::new(6, Severity::Medium, "Need logs");
        chain.handle(&mut ticket, &mut out);

        assert_eq!(out.lines()[0], "LoggingHandler forwarding request");
        assert_eq!(out.lines()[1], "[LOG] Start ticket: 6");
        assert_eq!(ticket.assigned_to.as_deref(), Some("Level 2 Support"));
        assert_eq!(chain.handler_names(), ["LoggingHandler", "LoggingHandler"]);
    }

    #[test]
    fn test_handler_names_follow_chain_order() {
        let chain = full_chain();
        assert_eq!(chain.len(), 5);
        assert_eq!(chain.handler_names()[1], "Level 1.5 Support");
        assert!(SupportChain::new(Vec::new()).is_empty());
    }
}
