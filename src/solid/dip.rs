//! Dependency Inversion Principle.
//!
//! `InvoiceProcessor` depends on the `InvoiceRepository` and
//! `NotificationService` abstractions; the caller picks the concrete
//! backends when constructing it.

use crate::domain::model::{Invoice, Transcript, TAX_RATE};
use crate::utils::error::Result;

pub trait InvoiceRepository {
    fn save(&self, invoice: &Invoice, out: &mut Transcript);
}

pub trait NotificationService {
    fn notify(&self, invoice: &Invoice, out: &mut Transcript);
}

pub struct MySqlRepository;

impl InvoiceRepository for MySqlRepository {
    fn save(&self, invoice: &Invoice, out: &mut Transcript) {
        out.line(format!(
            "[MySQL] Saving invoice for {} to MySQL database",
            invoice.customer_name
        ));
        out.line(format!(
            "[MySQL] INSERT INTO invoices VALUES ('{}', {})",
            invoice.customer_name, invoice.amount
        ));
    }
}

pub struct MongoDbRepository;

impl InvoiceRepository for MongoDbRepository {
    fn save(&self, invoice: &Invoice, out: &mut Transcript) {
        out.line(format!(
            "[MongoDB] Saving invoice for {} to MongoDB",
            invoice.customer_name
        ));
        out.line(format!(
            "[MongoDB] db.invoices.insert({{customer: '{}', amount: {}}})",
            invoice.customer_name, invoice.amount
        ));
    }
}

pub struct PostgreSqlRepository;

impl InvoiceRepository for PostgreSqlRepository {
    fn save(&self, invoice: &Invoice, out: &mut Transcript) {
        out.line(format!(
            "[PostgreSQL] Saving invoice for {} to PostgreSQL",
            invoice.customer_name
        ));
        out.line(format!(
            "[PostgreSQL] INSERT INTO invoices VALUES ('{}', {})",
            invoice.customer_name, invoice.amount
        ));
    }
}

pub struct EmailNotificationService;

impl NotificationService for EmailNotificationService {
    fn notify(&self, invoice: &Invoice, out: &mut Transcript) {
        out.line(format!("[Email] Sending invoice email to {}", invoice.customer_name));
        out.line(format!("[Email] Subject: Invoice for ${}", invoice.amount));
    }
}

pub struct SmsNotificationService;

impl NotificationService for SmsNotificationService {
    fn notify(&self, invoice: &Invoice, out: &mut Transcript) {
        out.line(format!("[SMS] Sending invoice SMS to {}", invoice.customer_name));
        out.line(format!(
            "[SMS] Your invoice of ${} has been processed",
            invoice.amount
        ));
    }
}

pub struct SlackNotificationService;

impl NotificationService for SlackNotificationService {
    fn notify(&self, invoice: &Invoice, out: &mut Transcript) {
        out.line(format!(
            "[Slack] Posting invoice notification for {}",
            invoice.customer_name
        ));
        out.line(format!("[Slack] Invoice amount: ${}", invoice.amount));
    }
}

pub struct InvoiceProcessor {
    repository: Box<dyn InvoiceRepository>,
    notification: Box<dyn NotificationService>,
}

impl InvoiceProcessor {
    pub fn new(
        repository: Box<dyn InvoiceRepository>,
        notification: Box<dyn NotificationService>,
    ) -> Self {
        Self {
            repository,
            notification,
        }
    }

    pub fn process_invoice(&self, invoice: &Invoice, out: &mut Transcript) -> f64 {
        let total = invoice.amount + invoice.amount * TAX_RATE;
        out.section(format!(
            "[Processor] Processing invoice for {}",
            invoice.customer_name
        ));
        out.line(format!(
            "[Processor] Amount: {}, Tax: 18%, Total: {:.2}",
            invoice.amount, total
        ));

        self.repository.save(invoice, out);
        self.notification.notify(invoice, out);
        total
    }
}

pub fn run_followed(out: &mut Transcript) -> Result<()> {
    let nirbhay = Invoice::new("Nirbhay", 1000.0);
    let rahul = Invoice::new("Rahul", 2000.0);
    let priya = Invoice::new("Priya", 1500.0);

    let scenarios: Vec<(&str, InvoiceProcessor, &Invoice)> = vec![
        (
            "=== Scenario 1: MySQL + Email ===",
            InvoiceProcessor::new(Box::new(MySqlRepository), Box::new(EmailNotificationService)),
            &nirbhay,
        ),
        (
            "=== Scenario 2: MongoDB + SMS ===",
            InvoiceProcessor::new(Box::new(MongoDbRepository), Box::new(SmsNotificationService)),
            &rahul,
        ),
        (
            "=== Scenario 3: PostgreSQL + Slack ===",
            InvoiceProcessor::new(
                Box::new(PostgreSqlRepository),
                Box::new(SlackNotificationService),
            ),
            &priya,
        ),
        (
            "=== Scenario 4: MongoDB + Email ===",
            InvoiceProcessor::new(Box::new(MongoDbRepository), Box::new(EmailNotificationService)),
            &nirbhay,
        ),
    ];

    for (index, (title, processor, invoice)) in scenarios.iter().enumerate() {
        if index > 0 {
            out.blank();
        }
        out.line(*title);
        processor.process_invoice(invoice, out);
    }
    Ok(())
}

pub fn run_violated(out: &mut Transcript) -> Result<()> {
    out.line("=== Invoice Processing (Tightly Coupled) ===");
    let processor = violated::InvoiceProcessor::new();
    processor.process_invoice(&Invoice::new("Nirbhay", 1000.0), out);
    processor.process_invoice(&Invoice::new("Rahul", 2000.0), out);

    out.section("=== What if we want to use MongoDB instead? ===");
    out.line("ERROR: Must modify InvoiceProcessor class!");
    out.line("ERROR: Cannot easily switch implementations!");
    Ok(())
}

pub mod violated {
    use crate::domain::model::{Invoice, Transcript, TAX_RATE};

    pub struct MySqlDatabase;

    impl MySqlDatabase {
        pub fn save_invoice(&self, invoice: &Invoice, out: &mut Transcript) {
            out.line(format!(
                "[MySQL] Saving invoice for {} to MySQL database",
                invoice.customer_name
            ));
            out.line(format!(
                "[MySQL] INSERT INTO invoices VALUES ('{}', {})",
                invoice.customer_name, invoice.amount
            ));
        }
    }

    pub struct EmailService;

    impl EmailService {
        pub fn send_invoice_email(&self, invoice: &Invoice, out: &mut Transcript) {
            out.line(format!("[Email] Sending invoice email to {}", invoice.customer_name));
            out.line(format!("[Email] Subject: Invoice for ${}", invoice.amount));
        }
    }

    /// 高階模組直接建立低階的具體實作
    pub struct InvoiceProcessor {
        database: MySqlDatabase,
        email_service: EmailService,
    }

    impl Default for InvoiceProcessor {
        fn default() -> Self {
            Self::new()
        }
    }

    impl InvoiceProcessor {
        pub fn new() -> Self {
            Self {
                database: MySqlDatabase,
                email_service: EmailService,
            }
        }

        pub fn process_invoice(&self, invoice: &Invoice, out: &mut Transcript) -> f64 {
            let total = invoice.amount + invoice.amount * TAX_RATE;
            out.section(format!(
                "[Processor] Processing invoice for {}",
                invoice.customer_name
            ));
            out.line(format!(
                "[Processor] Amount: {}, Tax: 18%, Total: {:.2}",
                invoice.amount, total
            ));

            self.database.save_invoice(invoice, out);
            self.email_service.send_invoice_email(invoice, out);
            total
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processor_uses_injected_backends() {
        let processor =
            InvoiceProcessor::new(Box::new(PostgreSqlRepository), Box::new(SlackNotificationService));
        let mut out = Transcript::new();
        let total = processor.process_invoice(&Invoice::new("Priya", 1500.0), &mut out);

        assert!((total - 1770.0).abs() < 1e-9);
        assert!(out.contains("[PostgreSQL] INSERT INTO invoices VALUES ('Priya', 1500)"));
        assert!(out.contains("[Slack] Invoice amount: $1500"));
        assert!(!out.contains("[MySQL]"));
    }

    #[test]
    fn test_followed_run_covers_four_scenarios() {
        let mut out = Transcript::new();
        run_followed(&mut out).unwrap();
        assert_eq!(out.count_matching("=== Scenario"), 4);
        assert_eq!(out.count_matching("[Processor] Processing invoice"), 4);
    }

    #[test]
    fn test_violated_processor_is_locked_to_mysql() {
        let mut out = Transcript::new();
        run_violated(&mut out).unwrap();
        assert_eq!(out.count_matching("[MySQL] Saving"), 2);
        assert!(out.contains("ERROR: Must modify InvoiceProcessor class!"));
    }
}
