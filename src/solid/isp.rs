//! Interface Segregation Principle.

use crate::domain::model::{Invoice, Transcript, TAX_RATE};
use crate::utils::error::Result;

pub trait InvoiceCalculator {
    fn calculate_total(&self, invoice: &Invoice, out: &mut Transcript) -> f64;
}

pub trait InvoicePersistence {
    fn save_to_database(&self, invoice: &Invoice, out: &mut Transcript);
}

pub trait InvoiceEmailNotification {
    fn send_email(&self, invoice: &Invoice, out: &mut Transcript);
}

pub trait InvoicePdfGenerator {
    fn generate_pdf(&self, invoice: &Invoice, out: &mut Transcript);
}

pub trait InvoiceSmsNotification {
    fn send_sms(&self, invoice: &Invoice, out: &mut Transcript);
}

fn taxed_total(tag: &str, invoice: &Invoice, out: &mut Transcript) -> f64 {
    let total = invoice.amount + invoice.amount * TAX_RATE;
    out.line(format!("[{}] Calculated total: {:.2}", tag, total));
    total
}

pub struct FullInvoiceService;

impl InvoiceCalculator for FullInvoiceService {
    fn calculate_total(&self, invoice: &Invoice, out: &mut Transcript) -> f64 {
        taxed_total("Full Service", invoice, out)
    }
}

impl InvoicePersistence for FullInvoiceService {
    fn save_to_database(&self, invoice: &Invoice, out: &mut Transcript) {
        out.line(format!(
            "[Full Service] Saved invoice for {} to database",
            invoice.customer_name
        ));
    }
}

impl InvoiceEmailNotification for FullInvoiceService {
    fn send_email(&self, invoice: &Invoice, out: &mut Transcript) {
        out.line(format!("[Full Service] Email sent to {}", invoice.customer_name));
    }
}

impl InvoicePdfGenerator for FullInvoiceService {
    fn generate_pdf(&self, invoice: &Invoice, out: &mut Transcript) {
        out.line(format!("[Full Service] PDF generated for {}", invoice.customer_name));
    }
}

impl InvoiceSmsNotification for FullInvoiceService {
    fn send_sms(&self, invoice: &Invoice, out: &mut Transcript) {
        out.line(format!("[Full Service] SMS sent to {}", invoice.customer_name));
    }
}

pub struct ReadOnlyInvoiceService;

impl InvoiceCalculator for ReadOnlyInvoiceService {
    fn calculate_total(&self, invoice: &Invoice, out: &mut Transcript) -> f64 {
        taxed_total("ReadOnly", invoice, out)
    }
}

pub struct EmailOnlyInvoiceService;

impl InvoiceEmailNotification for EmailOnlyInvoiceService {
    fn send_email(&self, invoice: &Invoice, out: &mut Transcript) {
        out.line(format!("[Email Only] Email sent to {}", invoice.customer_name));
    }
}

pub struct InvoiceNotificationService;

impl InvoiceEmailNotification for InvoiceNotificationService {
    fn send_email(&self, invoice: &Invoice, out: &mut Transcript) {
        out.line(format!("[Notification] Email sent to {}", invoice.customer_name));
    }
}

impl InvoiceSmsNotification for InvoiceNotificationService {
    fn send_sms(&self, invoice: &Invoice, out: &mut Transcript) {
        out.line(format!("[Notification] SMS sent to {}", invoice.customer_name));
    }
}

pub struct InvoiceReportService;

impl InvoiceCalculator for InvoiceReportService {
    fn calculate_total(&self, invoice: &Invoice, out: &mut Transcript) -> f64 {
        taxed_total("Report", invoice, out)
    }
}

impl InvoicePdfGenerator for InvoiceReportService {
    fn generate_pdf(&self, invoice: &Invoice, out: &mut Transcript) {
        out.line(format!("[Report] PDF generated for {}", invoice.customer_name));
    }
}

/// 只要求報表需要的兩個角色
pub fn produce_report<S>(service: &S, invoice: &Invoice, out: &mut Transcript) -> f64
where
    S: InvoiceCalculator + InvoicePdfGenerator,
{
    let total = service.calculate_total(invoice, out);
    service.generate_pdf(invoice, out);
    total
}

pub fn notify_all<S>(service: &S, invoice: &Invoice, out: &mut Transcript)
where
    S: InvoiceEmailNotification + InvoiceSmsNotification,
{
    service.send_email(invoice, out);
    service.send_sms(invoice, out);
}

pub fn run_followed(out: &mut Transcript) -> Result<()> {
    let invoice = Invoice::new("Nirbhay", 1000.0);

    out.line("=== Full Service ===");
    let full_service = FullInvoiceService;
    full_service.calculate_total(&invoice, out);
    full_service.save_to_database(&invoice, out);
    full_service.send_email(&invoice, out);

    out.section("=== ReadOnly Service ===");
    ReadOnlyInvoiceService.calculate_total(&invoice, out);

    out.section("=== Email Only Service ===");
    EmailOnlyInvoiceService.send_email(&invoice, out);

    out.section("=== Notification Service ===");
    notify_all(&InvoiceNotificationService, &invoice, out);

    out.section("=== Report Service ===");
    produce_report(&InvoiceReportService, &invoice, out);
    Ok(())
}

pub fn run_violated(out: &mut Transcript) -> Result<()> {
    use violated::InvoiceOperations;

    let invoice = Invoice::new("Nirbhay", 1000.0);

    out.line("=== Full Service ===");
    let full_service = violated::FullInvoiceService;
    full_service.calculate_total(&invoice, out)?;
    full_service.save_to_database(&invoice, out)?;
    full_service.send_email(&invoice, out)?;

    out.section("=== ReadOnly Service ===");
    let readonly_service = violated::ReadOnlyInvoiceService;
    readonly_service.calculate_total(&invoice, out)?;
    if let Err(e) = readonly_service.save_to_database(&invoice, out) {
        out.line(format!("ERROR: {}", e));
    }

    out.section("=== Email Only Service ===");
    let email_service = violated::EmailOnlyInvoiceService;
    email_service.send_email(&invoice, out)?;
    if let Err(e) = email_service.calculate_total(&invoice, out) {
        out.line(format!("ERROR: {}", e));
    }
    Ok(())
}

pub mod violated {
    use super::taxed_total;
    use crate::domain::model::{Invoice, Transcript};
    use crate::utils::error::{PatternError, Result};

    fn unsupported<T>(service: &str, operation: &str) -> Result<T> {
        Err(PatternError::NotSupported {
            service: service.to_string(),
            operation: operation.to_string(),
        })
    }

    /// 所有實作都被迫提供五個方法
    pub trait InvoiceOperations {
        fn calculate_total(&self, invoice: &Invoice, out: &mut Transcript) -> Result<f64>;
        fn save_to_database(&self, invoice: &Invoice, out: &mut Transcript) -> Result<()>;
        fn send_email(&self, invoice: &Invoice, out: &mut Transcript) -> Result<()>;
        fn generate_pdf(&self, invoice: &Invoice, out: &mut Transcript) -> Result<()>;
        fn send_sms(&self, invoice: &Invoice, out: &mut Transcript) -> Result<()>;
    }

    pub struct FullInvoiceService;

    impl InvoiceOperations for FullInvoiceService {
        fn calculate_total(&self, invoice: &Invoice, out: &mut Transcript) -> Result<f64> {
            Ok(taxed_total("Full Service", invoice, out))
        }

        fn save_to_database(&self, invoice: &Invoice, out: &mut Transcript) -> Result<()> {
            out.line(format!(
                "[Full Service] Saved invoice for {} to database",
                invoice.customer_name
            ));
            Ok(())
        }

        fn send_email(&self, invoice: &Invoice, out: &mut Transcript) -> Result<()> {
            out.line(format!("[Full Service] Email sent to {}", invoice.customer_name));
            Ok(())
        }

        fn generate_pdf(&self, invoice: &Invoice, out: &mut Transcript) -> Result<()> {
            out.line(format!("[Full Service] PDF generated for {}", invoice.customer_name));
            Ok(())
        }

        fn send_sms(&self, invoice: &Invoice, out: &mut Transcript) -> Result<()> {
            out.line(format!("[Full Service] SMS sent to {}", invoice.customer_name));
            Ok(())
        }
    }

    pub struct ReadOnlyInvoiceService;

    impl InvoiceOperations for ReadOnlyInvoiceService {
        fn calculate_total(&self, invoice: &Invoice, out: &mut Transcript) -> Result<f64> {
            Ok(taxed_total("ReadOnly", invoice, out))
        }

        fn save_to_database(&self, _invoice: &Invoice, _out: &mut Transcript) -> Result<()> {
            unsupported("ReadOnly service", "saving to database")
        }

        fn send_email(&self, _invoice: &Invoice, _out: &mut Transcript) -> Result<()> {
            unsupported("ReadOnly service", "sending emails")
        }

        fn generate_pdf(&self, _invoice: &Invoice, _out: &mut Transcript) -> Result<()> {
            unsupported("ReadOnly service", "generating PDFs")
        }

        fn send_sms(&self, _invoice: &Invoice, _out: &mut Transcript) -> Result<()> {
            unsupported("ReadOnly service", "sending SMS")
        }
    }

    pub struct EmailOnlyInvoiceService;

    impl InvoiceOperations for EmailOnlyInvoiceService {
        fn calculate_total(&self, _invoice: &Invoice, _out: &mut Transcript) -> Result<f64> {
            unsupported("Email service", "calculating totals")
        }

        fn save_to_database(&self, _invoice: &Invoice, _out: &mut Transcript) -> Result<()> {
            unsupported("Email service", "saving to database")
        }

        fn send_email(&self, invoice: &Invoice, out: &mut Transcript) -> Result<()> {
            out.line(format!("[Email Only] Email sent to {}", invoice.customer_name));
            Ok(())
        }

        fn generate_pdf(&self, _invoice: &Invoice, _out: &mut Transcript) -> Result<()> {
            unsupported("Email service", "generating PDFs")
        }

        fn send_sms(&self, _invoice: &Invoice, _out: &mut Transcript) -> Result<()> {
            unsupported("Email service", "sending SMS")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::PatternError;
    use violated::InvoiceOperations;

    #[test]
    fn test_report_service_needs_only_its_roles() {
        let mut out = Transcript::new();
        let total = produce_report(&InvoiceReportService, &Invoice::new("Nirbhay", 1000.0), &mut out);
        assert!((total - 1180.0).abs() < 1e-9);
        assert_eq!(
            out.lines(),
            &[
                "[Report] Calculated total: 1180.00".to_string(),
                "[Report] PDF generated for Nirbhay".to_string(),
            ]
        );
    }

    #[test]
    fn test_notification_service_sends_both_channels() {
        let mut out = Transcript::new();
        notify_all(&InvoiceNotificationService, &Invoice::new("Rahul", 10.0), &mut out);
        assert!(out.contains("[Notification] Email sent to Rahul"));
        assert!(out.contains("[Notification] SMS sent to Rahul"));
    }

    #[test]
    fn test_violated_read_only_service_rejects_writes() {
        let mut out = Transcript::new();
        let err = violated::ReadOnlyInvoiceService
            .save_to_database(&Invoice::new("Nirbhay", 1000.0), &mut out)
            .unwrap_err();
        assert!(matches!(err, PatternError::NotSupported { .. }));
        assert_eq!(err.to_string(), "ReadOnly service does not support saving to database");
    }

    #[test]
    fn test_violated_run_reports_errors() {
        let mut out = Transcript::new();
        run_violated(&mut out).unwrap();
        assert_eq!(out.count_matching("ERROR:"), 2);
        assert!(out.contains("ERROR: Email service does not support calculating totals"));
    }
}
