//! Single Responsibility Principle.
//!
//! The violated version lets `Invoice` compute, persist and email itself, so
//! three unrelated changes all land on the same type. The followed version
//! gives each concern its own type.

use crate::domain::model::{Invoice, Transcript, TAX_RATE};
use crate::utils::error::Result;

pub struct InvoiceCalculator;

impl InvoiceCalculator {
    pub fn calculate_total(&self, invoice: &Invoice, out: &mut Transcript) -> f64 {
        let total = invoice.amount + invoice.amount * TAX_RATE;
        out.line(format!("Calculated total with tax: {:.2}", total));
        total
    }
}

pub struct InvoiceRepository;

impl InvoiceRepository {
    pub fn save(&self, invoice: &Invoice, out: &mut Transcript) {
        out.line(format!("Invoice for {} saved to database", invoice.customer_name));
    }
}

pub struct InvoiceEmailService;

impl InvoiceEmailService {
    pub fn send(&self, invoice: &Invoice, out: &mut Transcript) {
        out.line(format!("Invoice email sent to {}", invoice.customer_name));
    }
}

pub fn run_followed(out: &mut Transcript) -> Result<()> {
    let invoice = Invoice::new("Nirbhay", 1000.0);

    let calculator = InvoiceCalculator;
    let repository = InvoiceRepository;
    let email_service = InvoiceEmailService;

    calculator.calculate_total(&invoice, out);
    repository.save(&invoice, out);
    email_service.send(&invoice, out);
    Ok(())
}

pub fn run_violated(out: &mut Transcript) -> Result<()> {
    let invoice = violated::Invoice::new("Nirbhay", 1000.0);

    invoice.calculate_total(out);
    invoice.save_to_database(out);
    invoice.send_email(out);
    Ok(())
}

pub mod violated {
    use crate::domain::model::{Transcript, TAX_RATE};

    /// 計算、儲存、寄信全部擠在同一個型別
    pub struct Invoice {
        pub customer_name: String,
        pub amount: f64,
    }

    impl Invoice {
        pub fn new(customer_name: impl Into<String>, amount: f64) -> Self {
            Self {
                customer_name: customer_name.into(),
                amount,
            }
        }

        pub fn calculate_total(&self, out: &mut Transcript) -> f64 {
            let total = self.amount + self.amount * TAX_RATE;
            out.line(format!("Calculated total with tax: {:.2}", total));
            total
        }

        pub fn save_to_database(&self, out: &mut Transcript) {
            out.line("Invoice saved to database");
        }

        pub fn send_email(&self, out: &mut Transcript) {
            out.line(format!("Invoice email sent to {}", self.customer_name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculator_applies_tax() {
        let mut out = Transcript::new();
        let total = InvoiceCalculator.calculate_total(&Invoice::new("A", 1000.0), &mut out);
        assert!((total - 1180.0).abs() < 1e-9);
        assert_eq!(out.lines(), ["Calculated total with tax: 1180.00"]);
    }

    #[test]
    fn test_both_versions_narrate_the_same_steps() {
        let mut followed = Transcript::new();
        let mut violated = Transcript::new();
        run_followed(&mut followed).unwrap();
        run_violated(&mut violated).unwrap();

        assert_eq!(followed.len(), 3);
        assert_eq!(violated.len(), 3);
        assert!(followed.contains("Invoice email sent to Nirbhay"));
        assert!(violated.contains("Invoice email sent to Nirbhay"));
    }
}
