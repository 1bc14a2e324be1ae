//! Routing without a chain: a central if/else router and hard-wired
//! forwarding between concrete levels.

use super::{Severity, SupportTicket};
use crate::domain::model::Transcript;

pub struct SupportLevel {
    pub name: &'static str,
    pub severity: Severity,
}

impl SupportLevel {
    fn can_handle(&self, ticket: &SupportTicket) -> bool {
        ticket.severity == self.severity
    }

    fn handle(&self, ticket: &mut SupportTicket, out: &mut Transcript) {
        out.line(format!("{} handling: {}", self.name, ticket));
        ticket.assign(self.name);
    }
}

/// 每多一個層級就得在 `process_ticket` 再加一個分支
pub struct SupportTicketSystem {
    level1: SupportLevel,
    level2: SupportLevel,
    level3: SupportLevel,
    management: SupportLevel,
}

impl Default for SupportTicketSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl SupportTicketSystem {
    pub fn new() -> Self {
        Self {
            level1: SupportLevel {
                name: "Level 1 Support",
                severity: Severity::Low,
            },
            level2: SupportLevel {
                name: "Level 2 Support",
                severity: Severity::Medium,
            },
            level3: SupportLevel {
                name: "Level 3 Support",
                severity: Severity::High,
            },
            management: SupportLevel {
                name: "Management",
                severity: Severity::Critical,
            },
        }
    }

    pub fn process_ticket(&self, ticket: &mut SupportTicket, out: &mut Transcript) {
        out.blank();
        out.rule('=', 60);
        out.line(format!("Processing: {}", ticket));
        out.rule('=', 60);

        if self.level1.can_handle(ticket) {
            self.level1.handle(ticket, out);
        } else if self.level2.can_handle(ticket) {
            self.level2.handle(ticket, out);
        } else if self.level3.can_handle(ticket) {
            self.level3.handle(ticket, out);
        } else if self.management.can_handle(ticket) {
            self.management.handle(ticket, out);
        } else {
            out.line("ERROR: No handler available!");
            ticket.resolved = false;
        }

        match (&ticket.assigned_to, ticket.resolved) {
            (Some(handler), true) => out.line(format!("RESOLVED BY: {}", handler)),
            _ => out.line("UNRESOLVED"),
        }
    }
}

/// 下一個層級寫死在程式裡，無法重新排列
pub fn manual_forwarding(ticket: &mut SupportTicket, out: &mut Transcript) {
    let levels = [
        ("Level 1 Support", Severity::Low),
        ("Level 2 Support", Severity::Medium),
        ("Level 3 Support", Severity::High),
        ("Management", Severity::Critical),
    ];

    for (index, (name, severity)) in levels.iter().enumerate() {
        out.section(format!("{} checking: {}", name, ticket));
        if ticket.severity == *severity {
            out.line(format!("{} handling ticket", name));
            ticket.assign(name);
            return;
        }
        match levels.get(index + 1) {
            Some((next, _)) => out.line(format!("Passing to {}", next)),
            None => {
                out.line("No one left to handle this!");
                ticket.resolved = false;
            }
        }
    }
}

pub fn run(out: &mut Transcript) {
    out.banner("WITHOUT CHAIN OF RESPONSIBILITY");

    out.blank();
    out.banner("APPROACH 1: Central Router");
    let system = SupportTicketSystem::new();
    for mut ticket in [
        SupportTicket::new(1, Severity::Low, "Password reset"),
        SupportTicket::new(2, Severity::Medium, "Software install issue"),
        SupportTicket::new(3, Severity::High, "Server slow"),
        SupportTicket::new(4, Severity::Critical, "System down"),
    ] {
        system.process_ticket(&mut ticket, out);
    }

    out.blank();
    out.banner("APPROACH 2: Manual forwarding");
    let mut ticket = SupportTicket::new(5, Severity::Critical, "Data breach");
    manual_forwarding(&mut ticket, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_rejects_unknown_severity() {
        let mut out = Transcript::new();
        let mut ticket = SupportTicket::new(1, Severity::Other("URGENT".to_string()), "?");
        SupportTicketSystem::new().process_ticket(&mut ticket, &mut out);
        assert!(!ticket.resolved);
        assert!(out.contains("ERROR: No handler available!"));
    }

    #[test]
    fn test_manual_forwarding_walks_every_level() {
        let mut out = Transcript::new();
        let mut ticket = SupportTicket::new(5, Severity::Critical, "Data breach");
        manual_forwarding(&mut ticket, &mut out);
        assert_eq!(out.count_matching("Passing to"), 3);
        assert_eq!(ticket.assigned_to.as_deref(), Some("Management"));
    }
}
