//! Liskov Substitution Principle.
//!
//! `generate_report` accepts any processor. In the violated family two
//! subtypes break the base contract (one errors, one yields no total) and the
//! report falls over; in the followed family each processor decides through
//! `can_process` and always returns a number.

use crate::domain::model::{Invoice, Transcript, TAX_RATE};
use crate::utils::error::Result;

pub trait InvoiceProcessor {
    fn can_process(&self, _invoice: &Invoice) -> bool {
        true
    }

    fn process(&self, invoice: &Invoice, out: &mut Transcript) -> f64;
}

fn taxed(invoice: &Invoice) -> f64 {
    invoice.amount + invoice.amount * TAX_RATE
}

pub struct RegularInvoiceProcessor;

impl InvoiceProcessor for RegularInvoiceProcessor {
    fn can_process(&self, invoice: &Invoice) -> bool {
        !invoice.is_locked
    }

    fn process(&self, invoice: &Invoice, out: &mut Transcript) -> f64 {
        if !self.can_process(invoice) {
            out.line(format!(
                "[Regular] Invoice for {} is locked, skipping",
                invoice.customer_name
            ));
            return 0.0;
        }

        let total = taxed(invoice);
        out.line(format!("[Regular] Processing invoice for {}", invoice.customer_name));
        out.line(format!(
            "Amount: {}, Tax: 18%, Total: {:.2}",
            invoice.amount, total
        ));
        total
    }
}

pub struct FinalInvoiceProcessor;

impl InvoiceProcessor for FinalInvoiceProcessor {
    fn can_process(&self, invoice: &Invoice) -> bool {
        invoice.is_locked
    }

    fn process(&self, invoice: &Invoice, out: &mut Transcript) -> f64 {
        if !self.can_process(invoice) {
            out.line(format!(
                "[Final] Invoice for {} is not finalized yet, skipping",
                invoice.customer_name
            ));
            return 0.0;
        }

        out.line(format!("[Final] Invoice for {} is locked", invoice.customer_name));
        out.line(format!("Final Amount: {}", invoice.amount));
        invoice.amount
    }
}

pub struct ZeroAmountInvoiceProcessor;

impl InvoiceProcessor for ZeroAmountInvoiceProcessor {
    fn can_process(&self, invoice: &Invoice) -> bool {
        invoice.amount >= 0.0
    }

    fn process(&self, invoice: &Invoice, out: &mut Transcript) -> f64 {
        if !self.can_process(invoice) {
            out.line(format!(
                "[Zero Amount] Invoice for {} has a negative amount, skipping",
                invoice.customer_name
            ));
            return 0.0;
        }

        if invoice.amount == 0.0 {
            out.line(format!(
                "[Zero Amount] Invoice for {} has zero amount",
                invoice.customer_name
            ));
            return 0.0;
        }

        let total = taxed(invoice);
        out.line(format!(
            "[Zero Amount] Processing invoice for {}",
            invoice.customer_name
        ));
        out.line(format!(
            "Amount: {}, Tax: 18%, Total: {:.2}",
            invoice.amount, total
        ));
        total
    }
}

pub fn generate_report(
    processor: &dyn InvoiceProcessor,
    invoices: &[Invoice],
    out: &mut Transcript,
) -> f64 {
    out.section("=== Generating Report ===");
    let total_revenue: f64 = invoices
        .iter()
        .map(|invoice| processor.process(invoice, out))
        .sum();
    out.line(format!("Total Revenue: {:.2}", total_revenue));
    total_revenue
}

pub fn run_followed(out: &mut Transcript) -> Result<()> {
    let nirbhay = Invoice::new("Nirbhay", 1000.0);
    let rahul = Invoice::new("Rahul", 2000.0);
    let priya = Invoice::new("Priya", 0.0);
    let amit = Invoice::locked("Amit", 1500.0);

    out.line("=== Test 1: Regular Processor ===");
    generate_report(&RegularInvoiceProcessor, &[nirbhay.clone(), rahul], out);

    out.section("=== Test 2: Final Processor ===");
    generate_report(&FinalInvoiceProcessor, &[amit.clone(), nirbhay.clone()], out);

    out.section("=== Test 3: Zero Amount Processor ===");
    generate_report(&ZeroAmountInvoiceProcessor, &[priya.clone(), nirbhay.clone()], out);

    out.section("=== Test 4: Mixed Invoices with Regular Processor ===");
    generate_report(&RegularInvoiceProcessor, &[nirbhay, amit, priya], out);
    Ok(())
}

pub fn run_violated(out: &mut Transcript) -> Result<()> {
    let invoices = [Invoice::new("Nirbhay", 1000.0), Invoice::new("Rahul", 2000.0)];
    let zero_first = [Invoice::new("Priya", 0.0), Invoice::new("Nirbhay", 1000.0)];

    out.line("=== Test 1: Regular Processor (Works Fine) ===");
    violated::generate_report(&violated::RegularInvoiceProcessor, &invoices, out);

    out.section("=== Test 2: Final Processor (BREAKS!) ===");
    violated::generate_report(&violated::FinalInvoiceProcessor, &invoices, out);

    out.section("=== Test 3: Zero Amount Processor (BREAKS!) ===");
    violated::generate_report(&violated::ZeroAmountInvoiceProcessor, &zero_first, out);
    Ok(())
}

pub mod violated {
    use super::taxed;
    use crate::domain::model::{Invoice, Transcript};
    use crate::utils::error::{PatternError, Result};

    /// 基底契約：處理發票並回傳總額
    pub trait InvoiceProcessor {
        fn process(&self, invoice: &Invoice, out: &mut Transcript) -> Result<Option<f64>>;
    }

    pub struct RegularInvoiceProcessor;

    impl InvoiceProcessor for RegularInvoiceProcessor {
        fn process(&self, invoice: &Invoice, out: &mut Transcript) -> Result<Option<f64>> {
            let total = taxed(invoice);
            out.line(format!("[Regular] Processing invoice for {}", invoice.customer_name));
            out.line(format!(
                "Amount: {}, Tax: 18%, Total: {:.2}",
                invoice.amount, total
            ));
            Ok(Some(total))
        }
    }

    pub struct FinalInvoiceProcessor;

    impl InvoiceProcessor for FinalInvoiceProcessor {
        fn process(&self, _invoice: &Invoice, _out: &mut Transcript) -> Result<Option<f64>> {
            Err(PatternError::ContractViolation {
                message: "Final invoices cannot be processed! They are locked.".to_string(),
            })
        }
    }

    pub struct ZeroAmountInvoiceProcessor;

    impl InvoiceProcessor for ZeroAmountInvoiceProcessor {
        fn process(&self, invoice: &Invoice, out: &mut Transcript) -> Result<Option<f64>> {
            if invoice.amount == 0.0 {
                out.line(format!(
                    "[Zero Amount] Invoice for {} has zero amount",
                    invoice.customer_name
                ));
                return Ok(None);
            }
            Ok(Some(invoice.amount))
        }
    }

    /// 任何一個子型別破壞契約時回傳 None
    pub fn generate_report(
        processor: &dyn InvoiceProcessor,
        invoices: &[Invoice],
        out: &mut Transcript,
    ) -> Option<f64> {
        out.section("=== Generating Report ===");
        let mut total_revenue = 0.0;

        for invoice in invoices {
            match processor.process(invoice, out) {
                Ok(Some(total)) => total_revenue += total,
                Ok(None) => {
                    out.line("ERROR: processor returned no total for a valid invoice");
                    return None;
                }
                Err(e) => {
                    out.line(format!("ERROR: {}", e));
                    return None;
                }
            }
        }

        out.line(format!("Total Revenue: {:.2}", total_revenue));
        Some(total_revenue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_every_processor_substitutes_in_report() {
        let invoices = [
            Invoice::new("Nirbhay", 1000.0),
            Invoice::locked("Amit", 1500.0),
            Invoice::new("Priya", 0.0),
        ];
        let mut out = Transcript::new();

        let regular = generate_report(&RegularInvoiceProcessor, &invoices, &mut out);
        let final_total = generate_report(&FinalInvoiceProcessor, &invoices, &mut out);
        let zero = generate_report(&ZeroAmountInvoiceProcessor, &invoices, &mut out);

        assert!(approx(regular, 1180.0));
        assert!(approx(final_total, 1500.0));
        // 零元處理器會對鎖定的發票照常課稅
        assert!(approx(zero, 1180.0 + 1770.0));
    }

    #[test]
    fn test_regular_skips_locked_invoice() {
        let mut out = Transcript::new();
        let total = RegularInvoiceProcessor.process(&Invoice::locked("Amit", 1500.0), &mut out);
        assert_eq!(total, 0.0);
        assert!(out.contains("is locked, skipping"));
    }

    #[test]
    fn test_violated_final_processor_breaks_report() {
        let mut out = Transcript::new();
        let invoices = [Invoice::new("Nirbhay", 1000.0)];
        let result =
            violated::generate_report(&violated::FinalInvoiceProcessor, &invoices, &mut out);
        assert!(result.is_none());
        assert!(out.contains("ERROR: Final invoices cannot be processed! They are locked."));
    }

    #[test]
    fn test_violated_zero_processor_breaks_report() {
        let mut out = Transcript::new();
        let invoices = [Invoice::new("Priya", 0.0), Invoice::new("Nirbhay", 1000.0)];
        let result =
            violated::generate_report(&violated::ZeroAmountInvoiceProcessor, &invoices, &mut out);
        assert!(result.is_none());
        assert!(!out.contains("Total Revenue"));
    }

    #[test]
    fn test_violated_regular_processor_still_works() {
        let mut out = Transcript::new();
        let invoices = [Invoice::new("Nirbhay", 1000.0), Invoice::new("Rahul", 2000.0)];
        let result =
            violated::generate_report(&violated::RegularInvoiceProcessor, &invoices, &mut out);
        assert!(approx(result.unwrap(), 3540.0));
    }
}
