use crate::domain::model::{Invoice, Transcript};
use crate::utils::error::{PatternError, Result};

/// 新增資料庫時只需新增實作，不必修改既有程式
pub trait InvoiceRepository {
    fn name(&self) -> &str;

    /// 回傳實際送出的語句
    fn save(&self, invoice: &Invoice, out: &mut Transcript) -> String;
}

pub struct MySqlInvoiceRepository;

impl InvoiceRepository for MySqlInvoiceRepository {
    fn name(&self) -> &str {
        "MySQL"
    }

    fn save(&self, invoice: &Invoice, out: &mut Transcript) -> String {
        let statement = format!(
            "INSERT INTO invoices VALUES ('{}', {})",
            invoice.customer_name, invoice.amount
        );
        out.line(format!("[MySQL] Saving invoice for {}", invoice.customer_name));
        out.line(format!("[MySQL] {}", statement));
        statement
    }
}

pub struct MongoDbInvoiceRepository;

impl InvoiceRepository for MongoDbInvoiceRepository {
    fn name(&self) -> &str {
        "MongoDB"
    }

    fn save(&self, invoice: &Invoice, out: &mut Transcript) -> String {
        let statement = format!(
            "db.invoices.insert({{customer: '{}', amount: {}}})",
            invoice.customer_name, invoice.amount
        );
        out.line(format!("[MongoDB] Saving invoice for {}", invoice.customer_name));
        out.line(format!("[MongoDB] {}", statement));
        statement
    }
}

pub struct PostgreSqlInvoiceRepository;

impl InvoiceRepository for PostgreSqlInvoiceRepository {
    fn name(&self) -> &str {
        "PostgreSQL"
    }

    fn save(&self, invoice: &Invoice, out: &mut Transcript) -> String {
        let statement = format!(
            "INSERT INTO invoices VALUES ('{}', {})",
            invoice.customer_name, invoice.amount
        );
        out.line(format!("[PostgreSQL] Saving invoice for {}", invoice.customer_name));
        out.line(format!("[PostgreSQL] {}", statement));
        statement
    }
}

pub struct RedisInvoiceRepository;

impl InvoiceRepository for RedisInvoiceRepository {
    fn name(&self) -> &str {
        "Redis"
    }

    fn save(&self, invoice: &Invoice, out: &mut Transcript) -> String {
        let statement = format!("SET invoice:{} '{}'", invoice.customer_name, invoice.amount);
        out.line(format!("[Redis] Saving invoice for {}", invoice.customer_name));
        out.line(format!("[Redis] {}", statement));
        statement
    }
}

pub fn run_followed(out: &mut Transcript) -> Result<()> {
    let jobs: Vec<(Box<dyn InvoiceRepository>, Invoice)> = vec![
        (Box::new(MySqlInvoiceRepository), Invoice::new("Nirbhay", 1000.0)),
        (Box::new(MongoDbInvoiceRepository), Invoice::new("Rahul", 2000.0)),
        (Box::new(PostgreSqlInvoiceRepository), Invoice::new("Priya", 1500.0)),
        (Box::new(RedisInvoiceRepository), Invoice::new("Amit", 3000.0)),
    ];

    for (repository, invoice) in &jobs {
        tracing::debug!("Saving invoice through {}", repository.name());
        repository.save(invoice, out);
    }
    Ok(())
}

pub fn run_violated(out: &mut Transcript) -> Result<()> {
    let jobs = [
        ("mysql", Invoice::new("Nirbhay", 1000.0)),
        ("mongodb", Invoice::new("Rahul", 2000.0)),
        ("postgresql", Invoice::new("Priya", 1500.0)),
    ];

    for (db_type, invoice) in &jobs {
        violated::InvoiceRepository::new(*db_type).save(invoice, out)?;
    }

    // Redis 需要修改 match 才能支援
    let redis = violated::InvoiceRepository::new("redis");
    match redis.save(&Invoice::new("Amit", 3000.0), out) {
        Ok(()) => {}
        Err(e) => out.line(format!("ERROR: {}", e)),
    }
    Ok(())
}

pub mod violated {
    use super::*;

    pub struct InvoiceRepository {
        db_type: String,
    }

    impl InvoiceRepository {
        pub fn new(db_type: impl Into<String>) -> Self {
            Self {
                db_type: db_type.into(),
            }
        }

        pub fn save(&self, invoice: &Invoice, out: &mut Transcript) -> Result<()> {
            match self.db_type.as_str() {
                "mysql" => {
                    out.line(format!("[MySQL] Saving invoice for {}", invoice.customer_name));
                    out.line(format!(
                        "[MySQL] INSERT INTO invoices VALUES ('{}', {})",
                        invoice.customer_name, invoice.amount
                    ));
                }
                "mongodb" => {
                    out.line(format!("[MongoDB] Saving invoice for {}", invoice.customer_name));
                    out.line(format!(
                        "[MongoDB] db.invoices.insert({{customer: '{}', amount: {}}})",
                        invoice.customer_name, invoice.amount
                    ));
                }
                "postgresql" => {
                    out.line(format!(
                        "[PostgreSQL] Saving invoice for {}",
                        invoice.customer_name
                    ));
                    out.line(format!(
                        "[PostgreSQL] INSERT INTO invoices VALUES ('{}', {})",
                        invoice.customer_name, invoice.amount
                    ));
                }
                other => {
                    return Err(PatternError::UnsupportedBackend {
                        db_type: other.to_string(),
                    })
                }
            }
            Ok(())
        }
    }
}
