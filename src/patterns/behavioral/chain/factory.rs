//! Registry-backed factory that builds and caches support chains per
//! operating mode.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use super::{
    Level1Support, Level1_5Support, Level2Support, Level3Support, ManagementSupport, Severity,
    SupportChain, SupportTicket,
};
use crate::domain::model::Transcript;
use crate::utils::error::{PatternError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChainType {
    Standard,
    BusinessHours,
    AfterHours,
    Weekend,
    QuickResponse,
    VipCustomer,
}

impl ChainType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainType::Standard => "standard",
            ChainType::BusinessHours => "business_hours",
            ChainType::AfterHours => "after_hours",
            ChainType::Weekend => "weekend",
            ChainType::QuickResponse => "quick_response",
            ChainType::VipCustomer => "vip_customer",
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait ChainBuilder: Send + Sync {
    fn description(&self) -> &'static str;
    fn build(&self) -> SupportChain;
}

pub struct FullSupportChain {
    description: &'static str,
}

impl ChainBuilder for FullSupportChain {
    fn description(&self) -> &'static str {
        self.description
    }

    fn build(&self) -> SupportChain {
        SupportChain::new(vec![
            Box::new(Level1Support),
            Box::new(Level1_5Support),
            Box::new(Level2Support),
            Box::new(Level3Support),
            Box::new(ManagementSupport),
        ])
    }
}

pub struct AfterHoursChain;

impl ChainBuilder for AfterHoursChain {
    fn description(&self) -> &'static str {
        "Critical issues only (6 PM - 9 AM)"
    }

    fn build(&self) -> SupportChain {
        SupportChain::new(vec![Box::new(ManagementSupport)])
    }
}

pub struct WeekendChain;

impl ChainBuilder for WeekendChain {
    fn description(&self) -> &'static str {
        "Basic + critical support (Weekends)"
    }

    fn build(&self) -> SupportChain {
        SupportChain::new(vec![Box::new(Level1Support), Box::new(ManagementSupport)])
    }
}

pub struct QuickResponseChain;

impl ChainBuilder for QuickResponseChain {
    fn description(&self) -> &'static str {
        "Fast-track support (emergency mode)"
    }

    fn build(&self) -> SupportChain {
        SupportChain::new(vec![
            Box::new(Level1Support),
            Box::new(Level3Support),
            Box::new(ManagementSupport),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainInfo {
    pub chain_type: ChainType,
    pub description: String,
    pub handlers: Vec<String>,
}

/// 依 `ChainType` 查表建立責任鏈，建好的鏈會被快取重用
#[derive(Default)]
pub struct SupportChainFactory {
    // 依 ChainType 宣告順序排列
    registry: BTreeMap<ChainType, Box<dyn ChainBuilder>>,
    cache: HashMap<ChainType, Arc<SupportChain>>,
}

impl SupportChainFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_chains() -> Self {
        let mut factory = Self::new();
        factory.register(
            ChainType::Standard,
            Box::new(FullSupportChain {
                description: "Default full support chain",
            }),
        );
        factory.register(
            ChainType::BusinessHours,
            Box::new(FullSupportChain {
                description: "Full support chain (9 AM - 6 PM weekdays)",
            }),
        );
        factory.register(ChainType::AfterHours, Box::new(AfterHoursChain));
        factory.register(ChainType::Weekend, Box::new(WeekendChain));
        factory.register(ChainType::QuickResponse, Box::new(QuickResponseChain));
        factory.register(
            ChainType::VipCustomer,
            Box::new(FullSupportChain {
                description: "Premium customer support",
            }),
        );
        factory
    }

    /// 重新註冊會讓舊的快取失效
    pub fn register(&mut self, chain_type: ChainType, builder: Box<dyn ChainBuilder>) {
        self.cache.remove(&chain_type);
        self.registry.insert(chain_type, builder);
    }

    pub fn create_chain(&mut self, chain_type: ChainType) -> Result<Arc<SupportChain>> {
        if let Some(chain) = self.cache.get(&chain_type) {
            tracing::trace!("Reusing cached {} chain", chain_type);
            return Ok(Arc::clone(chain));
        }

        let builder =
            self.registry
                .get(&chain_type)
                .ok_or_else(|| PatternError::ChainNotRegistered {
                    chain: chain_type.to_string(),
                })?;

        let chain = Arc::new(builder.build());
        self.cache.insert(chain_type, Arc::clone(&chain));
        Ok(chain)
    }

    pub fn cached_chains(&self) -> usize {
        self.cache.len()
    }

    pub fn available_chains(&self) -> Vec<ChainInfo> {
        self.registry
            .iter()
            .map(|(chain_type, builder)| ChainInfo {
                chain_type: *chain_type,
                description: builder.description().to_string(),
                handlers: builder.build().handler_names(),
            })
            .collect()
    }
}

pub struct SupportSystem {
    chain_type: ChainType,
    chain: Arc<SupportChain>,
}

impl SupportSystem {
    pub fn new(
        factory: &mut SupportChainFactory,
        chain_type: ChainType,
        out: &mut Transcript,
    ) -> Result<Self> {
        let chain = factory.create_chain(chain_type)?;
        out.section(format!("Support System initialized with: {}", chain_type));
        Ok(Self { chain_type, chain })
    }

    pub fn chain_type(&self) -> ChainType {
        self.chain_type
    }

    pub fn switch_chain(
        &mut self,
        factory: &mut SupportChainFactory,
        chain_type: ChainType,
        out: &mut Transcript,
    ) -> Result<()> {
        out.section(format!("Switching from {} to {}", self.chain_type, chain_type));
        self.chain = factory.create_chain(chain_type)?;
        self.chain_type = chain_type;
        Ok(())
    }

    pub fn process_ticket(&self, mut ticket: SupportTicket, out: &mut Transcript) -> SupportTicket {
        out.blank();
        out.rule('=', 60);
        out.line(format!("Processing: {}", ticket));
        out.line(format!("Chain Type: {}", self.chain_type));
        out.rule('=', 60);

        self.chain.handle(&mut ticket, out);

        match (&ticket.assigned_to, ticket.resolved) {
            (Some(handler), true) => out.line(format!("Ticket resolved by: {}", handler)),
            _ => out.line("Ticket unresolved - may need business hours"),
        }
        ticket
    }
}

pub(super) fn run_factory_scenarios(out: &mut Transcript) -> Result<()> {
    let mut factory = SupportChainFactory::with_default_chains();

    let business_system = SupportSystem::new(&mut factory, ChainType::BusinessHours, out)?;
    for ticket in [
        SupportTicket::new(1, Severity::Low, "Password reset"),
        SupportTicket::new(2, Severity::Medium, "Software installation issue"),
        SupportTicket::new(3, Severity::High, "Server performance issue"),
    ] {
        business_system.process_ticket(ticket, out);
    }

    out.section("Available chain configurations:");
    for info in factory.available_chains() {
        out.section(format!("  {}:", info.chain_type));
        out.line(format!("    Description: {}", info.description));
        out.line(format!("    Handlers: {}", info.handlers.join(" -> ")));
    }

    out.section("Scenario: After Hours");
    let after_hours = SupportSystem::new(&mut factory, ChainType::AfterHours, out)?;
    after_hours.process_ticket(SupportTicket::new(4, Severity::Low, "Need password reset"), out);
    after_hours.process_ticket(
        SupportTicket::new(5, Severity::Critical, "Production server down!"),
        out,
    );

    out.section("Scenario: Weekend");
    let weekend = SupportSystem::new(&mut factory, ChainType::Weekend, out)?;
    weekend.process_ticket(SupportTicket::new(6, Severity::Low, "Simple question"), out);
    weekend.process_ticket(SupportTicket::new(7, Severity::Medium, "Installation problem"), out);

    out.section("Scenario: VIP Customer");
    let vip = SupportSystem::new(&mut factory, ChainType::VipCustomer, out)?;
    vip.process_ticket(SupportTicket::new(8, Severity::Medium, "VIP needs help"), out);

    out.section("DYNAMIC CHAIN SWITCHING");
    let mut system = SupportSystem::new(&mut factory, ChainType::BusinessHours, out)?;
    system.process_ticket(SupportTicket::new(9, Severity::Medium, "Need help now"), out);
    system.switch_chain(&mut factory, ChainType::AfterHours, out)?;
    system.process_ticket(
        SupportTicket::new(10, Severity::Medium, "Need help after hours"),
        out,
    );

    tracing::debug!("Support chain cache holds {} chains", factory.cached_chains());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_caches_built_chains() {
        let mut factory = SupportChainFactory::with_default_chains();
        let first = factory.create_chain(ChainType::Weekend).unwrap();
        let second = factory.create_chain(ChainType::Weekend).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(factory.cached_chains(), 1);
    }

    #[test]
    fn test_unregistered_chain_is_an_error() {
        let mut factory = SupportChainFactory::new();
        let err = factory.create_chain(ChainType::AfterHours).err().unwrap();
        assert!(matches!(err, PatternError::ChainNotRegistered { ref chain } if chain == "after_hours"));
    }

    #[test]
    fn test_chain_shapes_per_type() {
        let mut factory = SupportChainFactory::with_default_chains();
        let shapes = [
            (ChainType::Standard, 5),
            (ChainType::AfterHours, 1),
            (ChainType::Weekend, 2),
            (ChainType::QuickResponse, 3),
            (ChainType::VipCustomer, 5),
        ];
        for (chain_type, len) in shapes {
            assert_eq!(factory.create_chain(chain_type).unwrap().len(), len, "{}", chain_type);
        }
    }

    #[test]
    fn test_weekend_chain_leaves_medium_unresolved() {
        let mut factory = SupportChainFactory::with_default_chains();
        let mut out = Transcript::new();
        let system = SupportSystem::new(&mut factory, ChainType::Weekend, &mut out).unwrap();

        let ticket = system.process_ticket(
            SupportTicket::new(7, Severity::Medium, "Installation problem"),
            &mut out,
        );
        assert!(!ticket.resolved);
        assert!(out.contains("Ticket unresolved - may need business hours"));
    }

    #[test]
    fn test_switch_chain_changes_routing() {
        let mut factory = SupportChainFactory::with_default_chains();
        let mut out = Transcript::new();
        let mut system =
            SupportSystem::new(&mut factory, ChainType::BusinessHours, &mut out).unwrap();

        let ticket = system.process_ticket(SupportTicket::new(9, Severity::Medium, "help"), &mut out);
        assert_eq!(ticket.assigned_to.as_deref(), Some("Level 2 Support"));

        system
            .switch_chain(&mut factory, ChainType::AfterHours, &mut out)
            .unwrap();
        assert_eq!(system.chain_type(), ChainType::AfterHours);
        let ticket = system.process_ticket(SupportTicket::new(10, Severity::Medium, "help"), &mut out);
        assert!(!ticket.resolved);
    }

    #[test]
    fn test_available_chains_describe_registered_types() {
        let factory = SupportChainFactory::with_default_chains();
        let chains = factory.available_chains();
        let types: Vec<ChainType> = chains.iter().map(|c| c.chain_type).collect();
        assert_eq!(
            types,
            [
                ChainType::Standard,
                ChainType::BusinessHours,
                ChainType::AfterHours,
                ChainType::Weekend,
                ChainType::QuickResponse,
                ChainType::VipCustomer,
            ]
        );
        assert_eq!(chains[0].handlers.len(), 5);
        assert_eq!(chains[2].description, "Critical issues only (6 PM - 9 AM)");
        assert_eq!(chains[3].handlers, vec!["Level 1 Support", "Management"]);
    }

    #[test]
    fn test_available_chains_only_lists_registered_types() {
        let mut factory = SupportChainFactory::new();
        assert!(factory.available_chains().is_empty());

        factory.register(ChainType::Weekend, Box::new(WeekendChain));
        factory.register(ChainType::AfterHours, Box::new(AfterHoursChain));
        let types: Vec<ChainType> = factory
            .available_chains()
            .into_iter()
            .map(|c| c.chain_type)
            .collect();
        assert_eq!(types, [ChainType::AfterHours, ChainType::Weekend]);
    }
}
