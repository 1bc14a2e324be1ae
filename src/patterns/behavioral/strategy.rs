//! Strategy pattern: interchangeable payment methods behind one trait.

use crate::domain::model::Transcript;
use crate::utils::error::Result;

/// 單次付款的結果
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub method: String,
    pub amount: f64,
    pub fee: f64,
    pub total: f64,
    pub success: bool,
}

/// 手續費計算方式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fee {
    Percent(f64),
    Flat(f64),
}

impl Fee {
    pub fn apply(&self, amount: f64) -> f64 {
        match self {
            Fee::Percent(rate) => amount * rate,
            Fee::Flat(fee) => *fee,
        }
    }

    fn label(&self) -> String {
        match self {
            Fee::Percent(rate) => format!("{}%", (rate * 100.0).round()),
            Fee::Flat(_) => "Flat".to_string(),
        }
    }
}

pub trait PaymentStrategy {
    fn name(&self) -> &'static str;
    fn steps(&self) -> &'static [&'static str];
    fn fee(&self) -> Fee;

    fn pay(&self, amount: f64, out: &mut Transcript) -> Receipt {
        out.line(format!("Payment Type: {}", self.name()));
        for (index, step) in self.steps().iter().enumerate() {
            out.line(format!("Step {}: {}", index + 1, step));
        }

        let fee = self.fee();
        let charged = fee.apply(amount);
        let total = amount + charged;
        out.line(format!("Transaction Fee: ${:.2} ({})", charged, fee.label()));
        out.line(format!("Total Amount: ${:.2}", total));
        out.line(format!("✓ {} Payment Successful!", self.name()));

        Receipt {
            method: self.name().to_string(),
            amount,
            fee: charged,
            total,
            success: true,
        }
    }
}

pub struct CreditCardPayment;

impl PaymentStrategy for CreditCardPayment {
    fn name(&self) -> &'static str {
        "Credit Card"
    }

    fn steps(&self) -> &'static [&'static str] {
        &[
            "Validating card number...",
            "Checking card expiry...",
            "Verifying CVV...",
            "Processing payment through card network...",
        ]
    }

    fn fee(&self) -> Fee {
        Fee::Percent(0.03)
    }
}

pub struct PayPalPayment;

impl PaymentStrategy for PayPalPayment {
    fn name(&self) -> &'static str {
        "PayPal"
    }

    fn steps(&self) -> &'static [&'static str] {
        &[
            "Redirecting to PayPal...",
            "Authenticating user...",
            "Processing payment through PayPal...",
        ]
    }

    fn fee(&self) -> Fee {
        Fee::Percent(0.04)
    }
}

pub struct BankTransferPayment;

impl PaymentStrategy for BankTransferPayment {
    fn name(&self) -> &'static str {
        "Bank Transfer"
    }

    fn steps(&self) -> &'static [&'static str] {
        &[
            "Validating account number...",
            "Verifying bank details...",
            "Initiating transfer...",
        ]
    }

    fn fee(&self) -> Fee {
        Fee::Flat(2.00)
    }
}

pub struct CryptocurrencyPayment;

impl PaymentStrategy for CryptocurrencyPayment {
    fn name(&self) -> &'static str {
        "Cryptocurrency"
    }

    fn steps(&self) -> &'static [&'static str] {
        &[
            "Generating wallet address...",
            "Waiting for blockchain confirmation...",
            "Verifying transaction...",
        ]
    }

    fn fee(&self) -> Fee {
        Fee::Percent(0.01)
    }
}

pub struct GooglePayPayment;

impl PaymentStrategy for GooglePayPayment {
    fn name(&self) -> &'static str {
        "Google Pay"
    }

    fn steps(&self) -> &'static [&'static str] {
        &["Authenticating via Google...", "Processing payment..."]
    }

    fn fee(&self) -> Fee {
        Fee::Percent(0.02)
    }
}

/// 未知的 key 一律退回信用卡
pub fn strategy_for(key: &str) -> Box<dyn PaymentStrategy> {
    match key {
        "paypal" => Box::new(PayPalPayment),
        "bank" => Box::new(BankTransferPayment),
        "crypto" => Box::new(CryptocurrencyPayment),
        "gpay" => Box::new(GooglePayPayment),
        _ => Box::new(CreditCardPayment),
    }
}

pub struct PaymentProcessor {
    strategy: Box<dyn PaymentStrategy>,
    receipts: Vec<Receipt>,
}

impl PaymentProcessor {
    pub fn new(strategy: Box<dyn PaymentStrategy>) -> Self {
        Self {
            strategy,
            receipts: Vec::new(),
        }
    }

    pub fn set_strategy(&mut self, strategy: Box<dyn PaymentStrategy>, out: &mut Transcript) {
        out.section(format!("→ Switching payment method to: {}", strategy.name()));
        self.strategy = strategy;
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn process_payment(&mut self, amount: f64, out: &mut Transcript) -> bool {
        out.blank();
        out.rule('=', 50);
        out.line(format!("Processing ${} payment...", amount));
        out.rule('=', 50);

        let receipt = self.strategy.pay(amount, out);
        let success = receipt.success;
        self.receipts.push(receipt);
        success
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }
}

pub fn run_followed(out: &mut Transcript) -> Result<()> {
    out.banner("PAYMENT SYSTEM - WITH STRATEGY PATTERN");

    let mut processor = PaymentProcessor::new(Box::new(CreditCardPayment));
    processor.process_payment(100.0, out);

    processor.set_strategy(Box::new(PayPalPayment), out);
    processor.process_payment(200.0, out);

    processor.set_strategy(Box::new(BankTransferPayment), out);
    processor.process_payment(150.0, out);

    processor.set_strategy(Box::new(CryptocurrencyPayment), out);
    processor.process_payment(500.0, out);

    processor.set_strategy(Box::new(GooglePayPayment), out);
    processor.process_payment(300.0, out);

    out.blank();
    out.banner("DYNAMIC STRATEGY SELECTION:");
    let user_choice = "crypto";
    out.line(format!("User selected: {}", user_choice));
    processor.set_strategy(strategy_for(user_choice), out);
    processor.process_payment(250.0, out);

    tracing::debug!("Processed {} payments", processor.receipts().len());
    Ok(())
}

pub fn run_violated(out: &mut Transcript) -> Result<()> {
    out.banner("PAYMENT SYSTEM - WITHOUT STRATEGY PATTERN");

    for (payment_type, amount) in [
        ("credit_card", 100.0),
        ("paypal", 200.0),
        ("bank_transfer", 150.0),
        ("cryptocurrency", 500.0),
        ("google_pay", 300.0),
    ] {
        violated::PaymentProcessor::new(payment_type).process_payment(amount, out);
    }
    Ok(())
}

pub mod violated {
    use crate::domain::model::Transcript;

    /// 每新增一種付款方式都要改這個 match
    pub struct PaymentProcessor {
        payment_type: String,
    }

    impl PaymentProcessor {
        pub fn new(payment_type: impl Into<String>) -> Self {
            Self {
                payment_type: payment_type.into(),
            }
        }

        pub fn process_payment(&self, amount: f64, out: &mut Transcript) -> bool {
            out.blank();
            out.rule('=', 50);
            out.line(format!("Processing ${} payment...", amount));
            out.rule('=', 50);

            let (name, steps, fee, label): (&str, &[&str], f64, &str) =
                match self.payment_type.as_str() {
                    "credit_card" => (
                        "Credit Card",
                        &[
                            "Validating card number...",
                            "Checking card expiry...",
                            "Verifying CVV...",
                            "Processing payment through card network...",
                        ],
                        amount * 0.03,
                        "3%",
                    ),
                    "paypal" => (
                        "PayPal",
                        &[
                            "Redirecting to PayPal...",
                            "Authenticating user...",
                            "Processing payment through PayPal...",
                        ],
                        amount * 0.04,
                        "4%",
                    ),
                    "bank_transfer" => (
                        "Bank Transfer",
                        &[
                            "Validating account number...",
                            "Verifying bank details...",
                            "Initiating transfer...",
                        ],
                        2.00,
                        "Flat",
                    ),
                    "cryptocurrency" => (
                        "Cryptocurrency",
                        &[
                            "Generating wallet address...",
                            "Waiting for blockchain confirmation...",
                            "Verifying transaction...",
                        ],
                        amount * 0.01,
                        "1%",
                    ),
                    other => {
                        out.line(format!("ERROR: Unsupported payment type '{}'", other));
                        return false;
                    }
                };

            out.line(format!("Payment Type: {}", name));
            for (index, step) in steps.iter().enumerate() {
                out.line(format!("Step {}: {}", index + 1, step));
            }
            out.line(format!("Transaction Fee: ${:.2} ({})", fee, label));
            out.line(format!("Total Amount: ${:.2}", amount + fee));
            out.line(format!("✓ {} Payment Successful!", name));
            true
        }
    }
}
