//! State pattern: a vending machine whose behaviour lives in state objects.
//!
//! Each state is a zero-sized type held as `&'static dyn VendingMachineState`,
//! so switching state is a pointer swap and the machine keeps only its data.

use std::fmt;

use crate::domain::model::Transcript;
use crate::utils::error::Result;

pub const ITEM_PRICE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    Idle,
    HasMoney,
    Dispensing,
    OutOfStock,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StateKind::Idle => "IdleState",
            StateKind::HasMoney => "HasMoneyState",
            StateKind::Dispensing => "DispensingState",
            StateKind::OutOfStock => "OutOfStockState",
        };
        f.write_str(name)
    }
}

pub trait VendingMachineState: Sync {
    fn kind(&self) -> StateKind;
    fn insert_money(&self, machine: &mut VendingMachine, amount: u32, out: &mut Transcript) -> bool;
    fn eject_money(&self, machine: &mut VendingMachine, out: &mut Transcript) -> bool;
    fn dispense(&self, machine: &mut VendingMachine, out: &mut Transcript) -> bool;
    fn refill(&self, machine: &mut VendingMachine, count: u32, out: &mut Transcript) -> bool;
}

static IDLE: IdleState = IdleState;
static HAS_MONEY: HasMoneyState = HasMoneyState;
static DISPENSING: DispensingState = DispensingState;
static OUT_OF_STOCK: OutOfStockState = OutOfStockState;

pub struct VendingMachine {
    state: &'static dyn VendingMachineState,
    item_count: u32,
    inserted_money: u32,
    item_price: u32,
}

impl VendingMachine {
    pub fn new(item_count: u32) -> Self {
        let state: &'static dyn VendingMachineState = if item_count > 0 {
            &IDLE
        } else {
            &OUT_OF_STOCK
        };

        Self {
            state,
            item_count,
            inserted_money: 0,
            item_price: ITEM_PRICE,
        }
    }

    fn set_state(&mut self, state: &'static dyn VendingMachineState) {
        tracing::trace!("Vending machine: {} -> {}", self.state.kind(), state.kind());
        self.state = state;
    }

    pub fn insert_money(&mut self, amount: u32, out: &mut Transcript) -> bool {
        let state = self.state;
        state.insert_money(self, amount, out)
    }

    pub fn eject_money(&mut self, out: &mut Transcript) -> bool {
        let state = self.state;
        state.eject_money(self, out)
    }

    pub fn dispense(&mut self, out: &mut Transcript) -> bool {
        let state = self.state;
        state.dispense(self, out)
    }

    pub fn refill(&mut self, count: u32, out: &mut Transcript) -> bool {
        let state = self.state;
        state.refill(self, count, out)
    }

    pub fn state(&self) -> StateKind {
        self.state.kind()
    }

    pub fn item_count(&self) -> u32 {
        self.item_count
    }

    pub fn inserted_money(&self) -> u32 {
        self.inserted_money
    }

    /// 金額溢位時拒收，不改變狀態
    fn deposit(&mut self, amount: u32, out: &mut Transcript) -> bool {
        match self.inserted_money.checked_add(amount) {
            Some(total) => {
                self.inserted_money = total;
                out.line(format!("Money accepted. Total = ₹{}", total));
                true
            }
            None => {
                out.line("Amount rejected. Machine cannot hold that much money");
                false
            }
        }
    }

    fn restock(&mut self, count: u32, out: &mut Transcript) -> bool {
        match self.item_count.checked_add(count) {
            Some(total) => {
                self.item_count = total;
                out.line(format!("Refill complete. Total items = {}", total));
                true
            }
            None => {
                out.line("Refill rejected. Machine cannot hold that many items");
                false
            }
        }
    }

    pub fn status(&self, out: &mut Transcript) {
        out.section("[VendingMachine Status]");
        out.line(format!("State  : {}", self.state.kind()));
        out.line(format!("Items  : {}", self.item_count));
        out.line(format!("Money  : ₹{}", self.inserted_money));
    }
}

pub struct IdleState;

impl VendingMachineState for IdleState {
    fn kind(&self) -> StateKind {
        StateKind::Idle
    }

    fn insert_money(&self, machine: &mut VendingMachine, amount: u32, out: &mut Transcript) -> bool {
        out.section(format!("[IdleState] Insert money: ₹{}", amount));
        if !machine.deposit(amount, out) {
            return false;
        }
        out.line(format!("Item price = ₹{}", machine.item_price));
        machine.set_state(&HAS_MONEY);
        true
    }

    fn eject_money(&self, _machine: &mut VendingMachine, out: &mut Transcript) -> bool {
        out.section("[IdleState] Eject money");
        out.line("No money to eject");
        false
    }

    fn dispense(&self, _machine: &mut VendingMachine, out: &mut Transcript) -> bool {
        out.section("[IdleState] Dispense request");
        out.line("Insert money first");
        false
    }

    fn refill(&self, machine: &mut VendingMachine, count: u32, out: &mut Transcript) -> bool {
        out.section(format!("[IdleState] Refill machine with {} items", count));
        machine.restock(count, out)
    }
}

pub struct HasMoneyState;

impl VendingMachineState for HasMoneyState {
    fn kind(&self) -> StateKind {
        StateKind::HasMoney
    }

    fn insert_money(&self, machine: &mut VendingMachine, amount: u32, out: &mut Transcript) -> bool {
        out.section(format!("[HasMoneyState] Insert money: ₹{}", amount));
        machine.deposit(amount, out)
    }

    fn eject_money(&self, machine: &mut VendingMachine, out: &mut Transcript) -> bool {
        out.section("[HasMoneyState] Eject money");
        out.line(format!("Returning ₹{}", machine.inserted_money));
        machine.inserted_money = 0;
        machine.set_state(&IDLE);
        true
    }

    fn dispense(&self, machine: &mut VendingMachine, out: &mut Transcript) -> bool {
        out.section("[HasMoneyState] Dispense request");

        if machine.inserted_money < machine.item_price {
            let needed = machine.item_price - machine.inserted_money;
            out.line(format!("Insufficient money. Need ₹{} more", needed));
            return false;
        }

        out.line("Sufficient money. Dispensing item");
        machine.set_state(&DISPENSING);

        machine.item_count -= 1;
        let change = machine.inserted_money - machine.item_price;
        machine.inserted_money = 0;

        out.line("Item dispensed");
        if change > 0 {
            out.line(format!("Returning change = ₹{}", change));
        }

        if machine.item_count == 0 {
            machine.set_state(&OUT_OF_STOCK);
            out.line("Machine is now out of stock");
        } else {
            machine.set_state(&IDLE);
            out.line(format!("Items remaining = {}", machine.item_count));
        }
        true
    }

    fn refill(&self, _machine: &mut VendingMachine, count: u32, out: &mut Transcript) -> bool {
        out.section(format!("[HasMoneyState] Refill attempt with {} items", count));
        out.line("Cannot refill while money is inserted");
        false
    }
}

pub struct DispensingState;

impl VendingMachineState for DispensingState {
    fn kind(&self) -> StateKind {
        StateKind::Dispensing
    }

    fn insert_money(&self, _machine: &mut VendingMachine, amount: u32, out: &mut Transcript) -> bool {
        out.section(format!("[DispensingState] Insert money: ₹{}", amount));
        out.line("Please wait. Dispensing in progress");
        false
    }

    fn eject_money(&self, _machine: &mut VendingMachine, out: &mut Transcript) -> bool {
        out.section("[DispensingState] Eject money");
        out.line("Cannot eject during dispensing");
        false
    }

    fn dispense(&self, _machine: &mut VendingMachine, out: &mut Transcript) -> bool {
        out.section("[DispensingState] Dispense request");
        out.line("Already dispensing");
        false
    }

    fn refill(&self, _machine: &mut VendingMachine, count: u32, out: &mut Transcript) -> bool {
        out.section(format!("[DispensingState] Refill attempt with {} items", count));
        out.line("Cannot refill during dispensing");
        false
    }
}

pub struct OutOfStockState;

impl VendingMachineState for OutOfStockState {
    fn kind(&self) -> StateKind {
        StateKind::OutOfStock
    }

    fn insert_money(&self, _machine: &mut VendingMachine, amount: u32, out: &mut Transcript) -> bool {
        out.section(format!("[OutOfStockState] Insert money: ₹{}", amount));
        out.line("Machine is out of stock");
        false
    }

    fn eject_money(&self, machine: &mut VendingMachine, out: &mut Transcript) -> bool {
        out.section("[OutOfStockState] Eject money");
        if machine.inserted_money > 0 {
            out.line(format!("Returning ₹{}", machine.inserted_money));
            machine.inserted_money = 0;
            true
        } else {
            out.line("No money to eject");
            false
        }
    }

    fn dispense(&self, _machine: &mut VendingMachine, out: &mut Transcript) -> bool {
        out.section("[OutOfStockState] Dispense request");
        out.line("Machine is out of stock");
        false
    }

    fn refill(&self, machine: &mut VendingMachine, count: u32, out: &mut Transcript) -> bool {
        out.section(format!("[OutOfStockState] Refill machine with {} items", count));
        if !machine.restock(count, out) {
            return false;
        }
        machine.set_state(&IDLE);
        true
    }
}

pub fn run_followed(out: &mut Transcript) -> Result<()> {
    out.banner("VENDING MACHINE - WITH STATE PATTERN");

    let mut machine = VendingMachine::new(3);

    out.section("SCENARIO 1: Normal purchase");
    machine.status(out);
    machine.insert_money(30, out);
    machine.insert_money(20, out);
    machine.dispense(out);
    machine.status(out);

    out.section("SCENARIO 2: Insufficient money");
    machine.insert_money(30, out);
    machine.dispense(out);
    machine.eject_money(out);
    machine.status(out);

    out.section("SCENARIO 3: Buy until out of stock");
    machine.insert_money(50, out);
    machine.dispense(out);
    machine.insert_money(50, out);
    machine.dispense(out);
    machine.status(out);

    out.section("SCENARIO 4: Out of stock");
    machine.insert_money(50, out);
    machine.dispense(out);

    out.section("SCENARIO 5: Refill machine");
    machine.refill(5, out);
    machine.status(out);

    out.section("SCENARIO 6: Complex workflow");
    machine.insert_money(25, out);
    machine.insert_money(15, out);
    machine.insert_money(10, out);
    machine.dispense(out);
    machine.insert_money(50, out);
    machine.dispense(out);
    machine.status(out);
    Ok(())
}

pub fn run_violated(out: &mut Transcript) -> Result<()> {
    out.banner("VENDING MACHINE - WITHOUT STATE PATTERN");

    let mut machine = violated::VendingMachine::new(3);

    out.section("SCENARIO 1: Normal purchase");
    machine.status(out);
    machine.insert_money(30, out);
    machine.insert_money(20, out);
    machine.dispense(out);
    machine.status(out);

    out.section("SCENARIO 2: Insufficient money");
    machine.insert_money(30, out);
    machine.dispense(out);
    machine.eject_money(out);
    machine.status(out);

    out.section("SCENARIO 3: Buy until out of stock");
    machine.insert_money(50, out);
    machine.dispense(out);
    machine.insert_money(50, out);
    machine.dispense(out);
    machine.status(out);

    out.section("SCENARIO 4: Try to buy when out of stock");
    machine.insert_money(50, out);
    machine.dispense(out);

    out.section("SCENARIO 5: Refill machine");
    machine.refill(5, out);
    machine.status(out);
    Ok(())
}

pub mod violated {
    use super::ITEM_PRICE;
    use crate::domain::model::Transcript;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MachineState {
        Idle,
        HasMoney,
        Dispensing,
        OutOfStock,
    }

    /// 每個動作都得 match 全部狀態
    pub struct VendingMachine {
        pub state: MachineState,
        pub item_count: u32,
        pub inserted_money: u32,
        item_price: u32,
    }

    impl VendingMachine {
        pub fn new(item_count: u32) -> Self {
            Self {
                state: MachineState::Idle,
                item_count,
                inserted_money: 0,
                item_price: ITEM_PRICE,
            }
        }

        pub fn insert_money(&mut self, amount: u32, out: &mut Transcript) -> bool {
            out.section(format!("[Action] Insert money: ₹{}", amount));

            match self.state {
                MachineState::Idle if self.item_count == 0 => {
                    out.line("Machine is out of stock");
                    false
                }
                MachineState::Idle | MachineState::HasMoney => {
                    let Some(total) = self.inserted_money.checked_add(amount) else {
                        out.line("Amount rejected. Machine cannot hold that much money");
                        return false;
                    };
                    self.inserted_money = total;
                    self.state = MachineState::HasMoney;
                    out.line(format!("Money accepted. Total = ₹{}", self.inserted_money));
                    out.line(format!("Item price = ₹{}", self.item_price));
                    true
                }
                MachineState::Dispensing => {
                    out.line("Please wait. Dispensing in progress");
                    false
                }
                MachineState::OutOfStock => {
                    out.line("Machine is out of stock");
                    false
                }
            }
        }

        pub fn eject_money(&mut self, out: &mut Transcript) -> bool {
            out.section("[Action] Eject money");

            match self.state {
                MachineState::HasMoney => {
                    out.line(format!("Returning ₹{}", self.inserted_money));
                    self.inserted_money = 0;
                    self.state = MachineState::Idle;
                    true
                }
                MachineState::OutOfStock if self.inserted_money > 0 => {
                    out.line(format!("Returning ₹{}", self.inserted_money));
                    self.inserted_money = 0;
                    true
                }
                MachineState::Dispensing => {
                    out.line("Cannot eject money while dispensing");
                    false
                }
                MachineState::Idle | MachineState::OutOfStock => {
                    out.line("No money to return");
                    false
                }
            }
        }

        pub fn dispense(&mut self, out: &mut Transcript) -> bool {
            out.section("[Action] Dispense item");

            match self.state {
                MachineState::Idle => {
                    out.line("Insert money first");
                    false
                }
                MachineState::HasMoney if self.inserted_money >= self.item_price => {
                    out.line("Sufficient money. Dispensing item");
                    self.state = MachineState::Dispensing;

                    self.item_count -= 1;
                    let change = self.inserted_money - self.item_price;
                    self.inserted_money = 0;

                    out.line("Item dispensed successfully");
                    if change > 0 {
                        out.line(format!("Returning change = ₹{}", change));
                    }

                    if self.item_count == 0 {
                        self.state = MachineState::OutOfStock;
                        out.line("Machine is now out of stock");
                    } else {
                        self.state = MachineState::Idle;
                    }
                    true
                }
                MachineState::HasMoney => {
                    let needed = self.item_price - self.inserted_money;
                    out.line(format!("Insufficient money. Need ₹{} more", needed));
                    false
                }
                MachineState::Dispensing => {
                    out.line("Already dispensing");
                    false
                }
                MachineState::OutOfStock => {
                    out.line("Machine is out of stock");
                    false
                }
            }
        }

        pub fn refill(&mut self, count: u32, out: &mut Transcript) -> bool {
            out.section(format!("[Action] Refill machine with {} items", count));

            match self.state {
                MachineState::Idle | MachineState::OutOfStock => {
                    let Some(total) = self.item_count.checked_add(count) else {
                        out.line("Refill rejected. Machine cannot hold that many items");
                        return false;
                    };
                    self.item_count = total;
                    self.state = MachineState::Idle;
                    out.line(format!("Refill complete. Total items = {}", self.item_count));
                    true
                }
                MachineState::HasMoney => {
                    out.line("Cannot refill while money is inserted");
                    false
                }
                MachineState::Dispensing => {
                    out.line("Cannot refill while dispensing");
                    false
                }
            }
        }

        pub fn status(&self, out: &mut Transcript) {
            out.section("[VendingMachine Status]");
            out.line(format!("State  : {:?}", self.state));
            out.line(format!("Items  : {}", self.item_count));
            out.line(format!("Money  : ₹{}", self.inserted_money));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_depends_on_stock() {
        assert_eq!(VendingMachine::new(3).state(), StateKind::Idle);
        assert_eq!(VendingMachine::new(0).state(), StateKind::OutOfStock);
    }

    #[test]
    fn test_purchase_returns_change() {
        let mut out = Transcript::new();
        let mut machine = VendingMachine::new(2);

        assert!(machine.insert_money(70, &mut out));
        assert_eq!(machine.state(), StateKind::HasMoney);
        assert!(machine.dispense(&mut out));

        assert_eq!(machine.state(), StateKind::Idle);
        assert_eq!(machine.item_count(), 1);
        assert_eq!(machine.inserted_money(), 0);
        assert!(out.contains("Returning change = ₹20"));
    }

    #[test]
    fn test_insufficient_money_reports_shortfall() {
        let mut out = Transcript::new();
        let mut machine = VendingMachine::new(1);
        machine.insert_money(30, &mut out);

        assert!(!machine.dispense(&mut out));
        assert!(out.contains("Insufficient money. Need ₹20 more"));
        assert!(!machine.refill(3, &mut out));
        assert!(machine.eject_money(&mut out));
        assert_eq!(machine.state(), StateKind::Idle);
    }

    #[test]
    fn test_last_item_moves_to_out_of_stock_and_refill_recovers() {
        let mut out = Transcript::new();
        let mut machine = VendingMachine::new(1);
        machine.insert_money(50, &mut out);
        machine.dispense(&mut out);
        assert_eq!(machine.state(), StateKind::OutOfStock);

        assert!(!machine.insert_money(50, &mut out));
        assert!(!machine.eject_money(&mut out));
        assert!(machine.refill(5, &mut out));
        assert_eq!(machine.state(), StateKind::Idle);
        assert_eq!(machine.item_count(), 5);
    }

    #[test]
    fn test_overflowing_deposit_and_refill_are_rejected() {
        let mut out = Transcript::new();
        let mut machine = VendingMachine::new(u32::MAX - 1);

        assert!(machine.insert_money(u32::MAX, &mut out));
        assert!(!machine.insert_money(1, &mut out));
        assert_eq!(machine.inserted_money(), u32::MAX);
        assert_eq!(machine.state(), StateKind::HasMoney);
        assert!(out.contains("Machine cannot hold that much money"));

        assert!(machine.eject_money(&mut out));
        assert!(!machine.refill(2, &mut out));
        assert_eq!(machine.item_count(), u32::MAX - 1);
        assert!(out.contains("Machine cannot hold that many items"));
        assert!(machine.refill(1, &mut out));
        assert_eq!(machine.item_count(), u32::MAX);
    }

    #[test]
    fn test_violated_machine_rejects_overflow() {
        let mut out = Transcript::new();
        let mut machine = violated::VendingMachine::new(u32::MAX);

        assert!(machine.insert_money(u32::MAX, &mut out));
        assert!(!machine.insert_money(1, &mut out));
        assert_eq!(machine.inserted_money, u32::MAX);

        assert!(machine.eject_money(&mut out));
        assert!(!machine.refill(1, &mut out));
        assert_eq!(machine.item_count, u32::MAX);
    }

    #[test]
    fn test_followed_scenarios_end_state() {
        let mut out = Transcript::new();
        run_followed(&mut out).unwrap();
        assert!(out.to_text().ends_with("State  : IdleState\nItems  : 3\nMoney  : ₹0"));
    }

    #[test]
    fn test_violated_machine_matches_followed_behaviour() {
        let mut out = Transcript::new();
        let mut machine = violated::VendingMachine::new(1);
        machine.insert_money(50, &mut out);
        assert!(machine.dispense(&mut out));
        assert_eq!(machine.state, violated::MachineState::OutOfStock);
        assert!(machine.refill(2, &mut out));
        assert_eq!(machine.state, violated::MachineState::Idle);
        assert_eq!(machine.item_count, 2);
    }
}
