//! Adapter pattern: third-party payment gateways behind the checkout's own
//! `PaymentProcessor` interface.

use std::fmt;

use serde::Serialize;

use crate::domain::model::Transcript;
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Success,
    Failed,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Success => f.write_str("success"),
            PaymentStatus::Failed => f.write_str("failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentResult {
    pub status: PaymentStatus,
    pub transaction_id: String,
    pub amount: f64,
}

impl PaymentResult {
    fn new(succeeded: bool, transaction_id: impl Into<String>, amount: f64) -> Self {
        Self {
            status: if succeeded {
                PaymentStatus::Success
            } else {
                PaymentStatus::Failed
            },
            transaction_id: transaction_id.into(),
            amount,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == PaymentStatus::Success
    }
}

/// 應用程式期待的付款介面
pub trait PaymentProcessor {
    fn process_payment(
        &self,
        amount: f64,
        currency: &str,
        customer_email: &str,
        out: &mut Transcript,
    ) -> PaymentResult;
}

pub struct InternalPaymentProcessor;

impl PaymentProcessor for InternalPaymentProcessor {
    fn process_payment(
        &self,
        amount: f64,
        currency: &str,
        customer_email: &str,
        out: &mut Transcript,
    ) -> PaymentResult {
        out.section("Internal Payment Processor");
        out.line(format!("Processing {} {}", amount, currency));
        out.line(format!("Customer: {}", customer_email));
        out.line("Payment processed successfully");
        PaymentResult::new(true, "INT-12345", amount)
    }
}

// 第三方 SDK：各自的方法名稱、參數與回傳格式

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeCharge {
    pub charge_id: String,
    pub paid: bool,
    pub amount_cents: u64,
}

#[derive(Debug, Default)]
pub struct StripeApi;

impl StripeApi {
    pub fn create_charge(
        &self,
        amount_cents: u64,
        currency_code: &str,
        email: &str,
        description: &str,
        out: &mut Transcript,
    ) -> StripeCharge {
        out.section("Stripe Payment Gateway");
        out.line(format!("Charging {} cents ({})", amount_cents, currency_code));
        out.line(format!("Email: {}", email));
        out.line(format!("Description: {}", description));
        out.line("Stripe charge created");
        StripeCharge {
            charge_id: "ch_stripe_123".to_string(),
            paid: true,
            amount_cents,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayPalPayment {
    pub payment_id: String,
    pub state: String,
    pub total: f64,
}

#[derive(Debug, Default)]
pub struct PayPalSdk;

impl PayPalSdk {
    pub fn make_payment(
        &self,
        total: f64,
        currency_type: &str,
        payer_email: &str,
        note: &str,
        out: &mut Transcript,
    ) -> PayPalPayment {
        out.section("PayPal SDK");
        out.line(format!("Payment of {} {}", total, currency_type));
        out.line(format!("Payer: {}", payer_email));
        out.line(format!("Note: {}", note));
        out.line("PayPal payment completed");
        PayPalPayment {
            payment_id: "PAY-paypal-456".to_string(),
            state: "approved".to_string(),
            total,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RazorpayTransaction {
    pub txn_id: String,
    pub success: bool,
    pub price: f64,
}

#[derive(Debug, Default)]
pub struct RazorpayClient;

impl RazorpayClient {
    pub fn initiate_transaction(
        &self,
        price: f64,
        curr: &str,
        customer_id: &str,
        remarks: &str,
        out: &mut Transcript,
    ) -> RazorpayTransaction {
        out.section("Razorpay Client");
        out.line(format!("Transaction: {} {}", price, curr));
        out.line(format!("Customer ID: {}", customer_id));
        out.line(format!("Remarks: {}", remarks));
        out.line("Razorpay transaction initiated");
        RazorpayTransaction {
            txn_id: "rzp_789".to_string(),
            success: true,
            price,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SquareTransaction {
    pub txn_status: String,
    pub ref_id: String,
    pub amt: f64,
}

#[derive(Debug, Default)]
pub struct SquareApi;

impl SquareApi {
    pub fn process_transaction(
        &self,
        amt: f64,
        curr: &str,
        email_addr: &str,
        out: &mut Transcript,
    ) -> SquareTransaction {
        out.section("Square API");
        out.line(format!("Processing {} {}", amt, curr));
        out.line(format!("Email: {}", email_addr));
        out.line("Square transaction complete");
        SquareTransaction {
            txn_status: "completed".to_string(),
            ref_id: "sq_999".to_string(),
            amt,
        }
    }
}

const PURCHASE_NOTE: &str = "Product purchase";

/// 金額轉成最小貨幣單位 (分)
pub fn to_cents(amount: f64) -> u64 {
    (amount * 100.0).round().max(0.0) as u64
}

#[derive(Debug, Default)]
pub struct StripeAdapter {
    stripe: StripeApi,
}

impl PaymentProcessor for StripeAdapter {
    fn process_payment(
        &self,
        amount: f64,
        currency: &str,
        customer_email: &str,
        out: &mut Transcript,
    ) -> PaymentResult {
        let charge = self.stripe.create_charge(
            to_cents(amount),
            currency,
            customer_email,
            PURCHASE_NOTE,
            out,
        );
        PaymentResult::new(
            charge.paid,
            charge.charge_id,
            charge.amount_cents as f64 / 100.0,
        )
    }
}

#[derive(Debug, Default)]
pub struct PayPalAdapter {
    paypal: PayPalSdk,
}

impl PaymentProcessor for PayPalAdapter {
    fn process_payment(
        &self,
        amount: f64,
        currency: &str,
        customer_email: &str,
        out: &mut Transcript,
    ) -> PaymentResult {
        let payment = self
            .paypal
            .make_payment(amount, currency, customer_email, PURCHASE_NOTE, out);
        PaymentResult::new(payment.state == "approved", payment.payment_id, payment.total)
    }
}

#[derive(Debug, Default)]
pub struct RazorpayAdapter {
    razorpay: RazorpayClient,
}

impl PaymentProcessor for RazorpayAdapter {
    fn process_payment(
        &self,
        amount: f64,
        currency: &str,
        customer_email: &str,
        out: &mut Transcript,
    ) -> PaymentResult {
        let txn = self.razorpay.initiate_transaction(
            amount,
            currency,
            customer_email,
            PURCHASE_NOTE,
            out,
        );
        PaymentResult::new(txn.success, txn.txn_id, txn.price)
    }
}

#[derive(Debug, Default)]
pub struct SquareAdapter {
    square: SquareApi,
}

impl PaymentProcessor for SquareAdapter {
    fn process_payment(
        &self,
        amount: f64,
        currency: &str,
        customer_email: &str,
        out: &mut Transcript,
    ) -> PaymentResult {
        let txn = self
            .square
            .process_transaction(amount, currency, customer_email, out);
        PaymentResult::new(txn.txn_status == "completed", txn.ref_id, txn.amt)
    }
}

/// 只依賴 `PaymentProcessor`
pub struct EcommerceApp {
    payment_processor: Box<dyn PaymentProcessor>,
}

impl EcommerceApp {
    pub fn new(payment_processor: Box<dyn PaymentProcessor>) -> Self {
        Self { payment_processor }
    }

    pub fn checkout(
        &self,
        amount: f64,
        currency: &str,
        customer_email: &str,
        out: &mut Transcript,
    ) -> PaymentResult {
        out.blank();
        out.banner("E-commerce Checkout Process");

        let result = self
            .payment_processor
            .process_payment(amount, currency, customer_email, out);

        if result.is_success() {
            out.line("Order confirmed");
            out.line(format!("Transaction ID: {}", result.transaction_id));
            out.line(format!("Amount: {} {}", result.amount, currency));
        } else {
            out.line("Payment failed");
        }
        result
    }
}

pub fn run_followed(out: &mut Transcript) -> Result<()> {
    out.banner("PAYMENT SYSTEM - WITH ADAPTER PATTERN");

    let checkouts: [(&str, Box<dyn PaymentProcessor>, f64, &str, &str); 4] = [
        (
            "Using Internal Payment Processor",
            Box::new(InternalPaymentProcessor),
            100.0,
            "USD",
            "customer@example.com",
        ),
        (
            "Using Stripe via Adapter",
            Box::new(StripeAdapter::default()),
            150.0,
            "USD",
            "john@example.com",
        ),
        (
            "Using PayPal via Adapter",
            Box::new(PayPalAdapter::default()),
            200.0,
            "USD",
            "jane@example.com",
        ),
        (
            "Using Razorpay via Adapter",
            Box::new(RazorpayAdapter::default()),
            5000.0,
            "INR",
            "rahul@example.com",
        ),
    ];
    for (title, processor, amount, currency, email) in checkouts {
        out.section(title);
        EcommerceApp::new(processor).checkout(amount, currency, email, out);
    }

    out.blank();
    out.banner("DEMONSTRATING FLEXIBILITY");
    out.section("Processing orders with different payment processors");
    let processors: [(&str, Box<dyn PaymentProcessor>); 3] = [
        ("Internal", Box::new(InternalPaymentProcessor)),
        ("Stripe", Box::new(StripeAdapter::default())),
        ("PayPal", Box::new(PayPalAdapter::default())),
    ];
    for (name, processor) in processors {
        out.section(format!("Using {}", name));
        EcommerceApp::new(processor).checkout(99.99, "USD", "customer@example.com", out);
    }

    out.blank();
    out.banner("ADDING NEW PAYMENT GATEWAY (Square)");
    out.section("Using Square via Adapter");
    let result = EcommerceApp::new(Box::new(SquareAdapter::default())).checkout(
        75.0,
        "USD",
        "mike@example.com",
        out,
    );
    out.section("Square gateway added without modifying EcommerceApp");
    out.line(format!("Last result: {}", serde_json::to_string(&result)?));
    Ok(())
}

pub fn run_violated(out: &mut Transcript) -> Result<()> {
    out.banner("PAYMENT SYSTEM - WITHOUT ADAPTER PATTERN");

    EcommerceApp::new(Box::new(InternalPaymentProcessor)).checkout(
        100.0,
        "USD",
        "customer@example.com",
        out,
    );

    out.blank();
    out.banner("TRYING TO USE THIRD-PARTY PAYMENT GATEWAYS");
    out.section("ERROR: Cannot use Stripe, PayPal and Razorpay directly");
    out.line("Different method name, parameters, and return format");

    out.blank();
    out.banner("BAD SOLUTION: MODIFYING APPLICATION CODE");
    for gateway in ["stripe", "paypal", "razorpay", "square"] {
        let app = violated::EcommerceAppWithIfElse::new(gateway);
        if app.checkout(49.5, "USD", "customer@example.com", out).is_none() {
            out.section(format!("ERROR: Gateway '{}' is not wired into the app", gateway));
        }
    }

    out.section("Problems with this approach:");
    out.line("Application knows all gateway implementations");
    out.line("Must modify app for each new gateway");
    out.line("Tight coupling");
    Ok(())
}

pub mod violated {
    use super::{PaymentResult, PayPalSdk, RazorpayClient, StripeApi};
    use crate::domain::model::Transcript;

    /// 在 checkout 裡依 gateway 字串分支
    pub struct EcommerceAppWithIfElse {
        pub gateway_type: String,
    }

    impl EcommerceAppWithIfElse {
        pub fn new(gateway_type: &str) -> Self {
            Self {
                gateway_type: gateway_type.to_string(),
            }
        }

        pub fn checkout(
            &self,
            amount: f64,
            currency: &str,
            customer_email: &str,
            out: &mut Transcript,
        ) -> Option<PaymentResult> {
            let result = if self.gateway_type == "stripe" {
                let cents = (amount * 100.0).round() as u64;
                let charge =
                    StripeApi.create_charge(cents, currency, customer_email, "Purchase", out);
                PaymentResult::new(charge.paid, charge.charge_id, charge.amount_cents as f64 / 100.0)
            } else if self.gateway_type == "paypal" {
                let payment =
                    PayPalSdk.make_payment(amount, currency, customer_email, "Purchase", out);
                PaymentResult::new(payment.state == "approved", payment.payment_id, payment.total)
            } else if self.gateway_type == "razorpay" {
                let txn = RazorpayClient.initiate_transaction(
                    amount,
                    currency,
                    customer_email,
                    "Purchase",
                    out,
                );
                PaymentResult::new(txn.success, txn.txn_id, txn.price)
            } else {
                return None;
            };

            out.line(format!("Order confirmed. Transaction ID: {}", result.transaction_id));
            Some(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stripe_adapter_converts_cents() {
        let mut out = Transcript::new();
        let result = StripeAdapter::default().process_payment(99.99, "USD", "a@b.c", &mut out);
        assert!(out.contains("Charging 9999 cents (USD)"));
        assert_eq!(result.amount, 99.99);
        assert_eq!(result.transaction_id, "ch_stripe_123");
        assert!(result.is_success());
    }

    #[test]
    fn test_every_adapter_yields_uniform_result() {
        let cases: [(Box<dyn PaymentProcessor>, &str); 4] = [
            (Box::new(StripeAdapter::default()), "ch_stripe_123"),
            (Box::new(PayPalAdapter::default()), "PAY-paypal-456"),
            (Box::new(RazorpayAdapter::default()), "rzp_789"),
            (Box::new(SquareAdapter::default()), "sq_999"),
        ];

        for (processor, transaction_id) in cases {
            let mut out = Transcript::new();
            let result = EcommerceApp::new(processor).checkout(75.0, "USD", "m@x.io", &mut out);
            assert_eq!(result.status, PaymentStatus::Success);
            assert_eq!(result.transaction_id, transaction_id);
            assert_eq!(result.amount, 75.0);
            assert!(out.contains("Order confirmed"));
        }
    }

    #[test]
    fn test_to_cents_rounds() {
        assert_eq!(to_cents(0.1 + 0.2), 30);
        assert_eq!(to_cents(150.0), 15000);
        assert_eq!(to_cents(-3.0), 0);
    }

    #[test]
    fn test_result_serializes_lowercase_status() {
        let result = PaymentResult::new(false, "x", 1.0);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "failed");
    }

    #[test]
    fn test_violated_app_cannot_handle_new_gateway() {
        let mut out = Transcript::new();
        let paypal = violated::EcommerceAppWithIfElse::new("paypal");
        assert!(paypal.checkout(10.0, "USD", "a@b.c", &mut out).is_some());

        let square = violated::EcommerceAppWithIfElse::new("square");
        assert!(square.checkout(10.0, "USD", "a@b.c", &mut out).is_none());
    }
}
