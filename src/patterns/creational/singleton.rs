//! Singleton pattern: process-wide database connection, configuration and
//! logger instances.
//!
//! Lazy initialisation goes through `OnceLock`, so creation is race-free
//! without an explicit double-checked lock. Mutable state inside the
//! instances sits behind atomics or locks.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock, RwLock};

use chrono::Local;
use serde::Serialize;
use serde_json::Value;

use crate::domain::model::Transcript;
use crate::utils::error::Result;

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1000);

fn next_instance_id() -> u64 {
    NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionStats {
    pub connection_id: u64,
    pub query_count: u64,
    pub host: String,
    pub database: String,
}

#[derive(Debug)]
pub struct DatabaseConnection {
    connection_id: u64,
    host: String,
    port: u16,
    database: String,
    query_count: AtomicU64,
}

static DATABASE: OnceLock<DatabaseConnection> = OnceLock::new();

impl DatabaseConnection {
    fn connect() -> Self {
        Self {
            connection_id: next_instance_id(),
            host: "localhost".to_string(),
            port: 5432,
            database: "myapp_db".to_string(),
            query_count: AtomicU64::new(0),
        }
    }

    pub fn instance() -> &'static DatabaseConnection {
        DATABASE.get_or_init(|| {
            tracing::debug!("Opening the shared database connection");
            Self::connect()
        })
    }

    /// 與 `instance` 相同，但會在紀錄中說明是新建或重用
    pub fn acquire(out: &mut Transcript) -> &'static DatabaseConnection {
        if let Some(existing) = DATABASE.get() {
            out.section("[DB] Reusing existing database connection");
            return existing;
        }

        let mut created = false;
        let connection = DATABASE.get_or_init(|| {
            created = true;
            Self::connect()
        });
        if created {
            out.section("[DB] Creating singleton database connection");
            out.line(format!("[DB] Timestamp: {}", Local::now().format("%H:%M:%S%.6f")));
            out.line(format!("[DB] Connection ready (id={})", connection.connection_id));
        } else {
            out.section("[DB] Reusing existing database connection");
        }
        connection
    }

    pub fn id(&self) -> u64 {
        self.connection_id
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.database)
    }

    pub fn query(&self, sql: &str, out: &mut Transcript) -> String {
        let count = self.query_count.fetch_add(1, Ordering::SeqCst) + 1;
        out.section(format!(
            "[DB:{}] Executing query #{}",
            self.connection_id, count
        ));
        out.line(format!("[DB] SQL: {}", sql));
        format!("Result from connection {}", self.connection_id)
    }

    pub fn stats(&self) -> ConnectionStats {
        ConnectionStats {
            connection_id: self.connection_id,
            query_count: self.query_count.load(Ordering::SeqCst),
            host: self.host.clone(),
            database: self.database.clone(),
        }
    }
}

#[derive(Debug)]
pub struct ConfigurationManager {
    instance_id: u64,
    config: RwLock<BTreeMap<String, Value>>,
}

static CONFIGURATION: OnceLock<ConfigurationManager> = OnceLock::new();

impl ConfigurationManager {
    fn load() -> Self {
        let config = BTreeMap::from([
            ("app_name".to_string(), Value::from("MyApp")),
            ("version".to_string(), Value::from("1.0.0")),
            ("debug".to_string(), Value::from(false)),
            ("max_connections".to_string(), Value::from(100)),
        ]);

        Self {
            instance_id: next_instance_id(),
            config: RwLock::new(config),
        }
    }

    pub fn instance() -> &'static ConfigurationManager {
        CONFIGURATION.get_or_init(Self::load)
    }

    pub fn id(&self) -> u64 {
        self.instance_id
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.config
            .read()
            .ok()
            .and_then(|config| config.get(key).cloned())
    }

    pub fn set(&self, key: &str, value: impl Into<Value>, out: &mut Transcript) {
        let value = value.into();
        out.line(format!("[Config:{}] Set {}={}", self.instance_id, key, value));
        match self.config.write() {
            Ok(mut config) => {
                config.insert(key.to_string(), value);
            }
            Err(e) => tracing::warn!("Configuration lock poisoned, '{}' not updated: {}", key, e),
        }
    }

    pub fn get_all(&self) -> BTreeMap<String, Value> {
        self.config
            .read()
            .map(|config| config.clone())
            .unwrap_or_default()
    }
}

type Registry = Mutex<HashMap<TypeId, &'static (dyn Any + Send + Sync)>>;

static REGISTRY: OnceLock<Registry> = OnceLock::new();

fn lock_registry() -> MutexGuard<'static, HashMap<TypeId, &'static (dyn Any + Send + Sync)>> {
    let registry = REGISTRY.get_or_init(|| Mutex::new(HashMap::new()));
    match registry.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn downcast<T: Any>(entry: &'static (dyn Any + Send + Sync)) -> &'static T {
    match entry.downcast_ref::<T>() {
        Some(instance) => instance,
        // TypeId 相同時 downcast 不會失敗
        None => unreachable!("registry entry does not match its TypeId"),
    }
}

/// 依型別保存唯一實例；第一次呼叫時用 `init` 建立。
///
/// `init` 在鎖外執行，所以初始化時可以再取用其他 singleton。
/// 兩個執行緒同時建立時，先登記者勝出，另一份直接丟棄。
pub fn singleton<T, F>(init: F) -> &'static T
where
    T: Any + Send + Sync,
    F: FnOnce() -> T,
{
    if let Some(entry) = lock_registry().get(&TypeId::of::<T>()).copied() {
        return downcast(entry);
    }

    let candidate = init();

    let mut instances = lock_registry();
    let entry = *instances
        .entry(TypeId::of::<T>())
        .or_insert_with(|| Box::leak(Box::new(candidate)) as &'static (dyn Any + Send + Sync));
    downcast(entry)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggerStats {
    pub instance_id: u64,
    pub total_logs: usize,
    pub log_file: String,
}

#[derive(Debug)]
pub struct AppLogger {
    instance_id: u64,
    log_file: String,
    entries: Mutex<Vec<String>>,
}

impl AppLogger {
    fn new(log_file: &str) -> Self {
        Self {
            instance_id: next_instance_id(),
            log_file: log_file.to_string(),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn instance() -> &'static AppLogger {
        singleton(|| AppLogger::new("app.log"))
    }

    pub fn id(&self) -> u64 {
        self.instance_id
    }

    pub fn log(&self, level: &str, message: &str, out: &mut Transcript) {
        let entry = format!("[{}] [{}] {}", Local::now().format("%H:%M:%S"), level, message);
        let count = match self.entries.lock() {
            Ok(mut entries) => {
                entries.push(entry.clone());
                entries.len()
            }
            Err(_) => 0,
        };
        out.line(format!(
            "{} (logger_id={}, count={})",
            entry, self.instance_id, count
        ));
    }

    pub fn stats(&self) -> LoggerStats {
        LoggerStats {
            instance_id: self.instance_id,
            total_logs: self.entries.lock().map(|e| e.len()).unwrap_or(0),
            log_file: self.log_file.clone(),
        }
    }
}

/// 20 個執行緒同時取得連線，回傳觀察到的不同實例數
pub fn thread_safety_check(out: &mut Transcript) -> usize {
    out.blank();
    out.banner("THREAD SAFETY TEST");

    let observed: Vec<(usize, u64, String)> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..20)
            .map(|thread_id| {
                scope.spawn(move || {
                    let mut local = Transcript::new();
                    let db = DatabaseConnection::instance();
                    db.query(&format!("Query from thread {}", thread_id), &mut local);
                    (thread_id, db.id(), local.to_text())
                })
            })
            .collect();

        handles
            .into_iter()
            .filter_map(|handle| handle.join().ok())
            .collect()
    });

    out.section("[Result]");
    let mut unique = observed.iter().map(|(_, id, _)| *id).collect::<Vec<_>>();
    for (thread_id, id, _) in &observed {
        out.line(format!("Thread-{} -> instance_id={}", thread_id, id));
    }
    unique.sort_unstable();
    unique.dedup();

    if unique.len() == 1 && observed.len() == 20 {
        out.line("[OK] All threads received the same instance");
    } else {
        out.line(format!("[ERROR] Multiple instances detected: {:?}", unique));
    }
    unique.len()
}

pub fn run_followed(out: &mut Transcript) -> Result<()> {
    out.banner("RESOURCE MANAGEMENT - WITH SINGLETON PATTERN");

    out.blank();
    out.banner("DATABASE CONNECTION");
    let db1 = DatabaseConnection::acquire(out);
    let db2 = DatabaseConnection::acquire(out);
    let db3 = DatabaseConnection::acquire(out);
    out.section(format!(
        "Same instance: {}",
        std::ptr::eq(db1, db2) && std::ptr::eq(db2, db3)
    ));
    db1.query("SELECT * FROM users", out);
    db2.query("SELECT * FROM products", out);
    db3.query("SELECT * FROM orders", out);
    out.section(format!("DB stats: {}", serde_json::to_string(&db1.stats())?));

    out.blank();
    out.banner("CONFIGURATION MANAGER");
    let config1 = ConfigurationManager::instance();
    let config2 = ConfigurationManager::instance();
    out.section(format!("Same instance: {}", std::ptr::eq(config1, config2)));
    config1.set("debug", true, out);
    config1.set("max_connections", 200, out);
    out.line(format!("config1.debug = {}", config1.get("debug").unwrap_or(Value::Null)));
    out.line(format!("config2.debug = {}", config2.get("debug").unwrap_or(Value::Null)));

    out.blank();
    out.banner("LOGGER");
    let logger1 = AppLogger::instance();
    let logger2 = AppLogger::instance();
    let logger3 = AppLogger::instance();
    out.section(format!(
        "Same instance: {}",
        std::ptr::eq(logger1, logger2) && std::ptr::eq(logger2, logger3)
    ));
    logger1.log("INFO", "Application started", out);
    logger2.log("ERROR", "Database connection failed", out);
    logger3.log("DEBUG", "Processing request", out);
    out.section(format!(
        "Logger stats: {}",
        serde_json::to_string(&logger1.stats())?
    ));

    thread_safety_check(out);
    Ok(())
}

pub fn run_violated(out: &mut Transcript) -> Result<()> {
    use violated::{ConfigurationManager, DatabaseConnection, Logger};

    out.banner("RESOURCE MANAGEMENT - WITHOUT SINGLETON PATTERN");

    out.blank();
    out.banner("PROBLEM 1: Multiple Database Connections");
    let db1 = DatabaseConnection::new(out);
    let db2 = DatabaseConnection::new(out);
    let db3 = DatabaseConnection::new(out);
    out.section("[WARN] Created 3 separate database connections");
    out.line(format!("db1 id={}", db1.connection_id));
    out.line(format!("db2 id={}", db2.connection_id));
    out.line(format!("db3 id={}", db3.connection_id));
    out.line("[ISSUE] Each connection has setup and memory overhead");
    db1.query("SELECT * FROM users", out);
    db2.query("SELECT * FROM products", out);

    out.blank();
    out.banner("PROBLEM 2: Inconsistent Configuration State");
    let mut config1 = ConfigurationManager::new(out);
    let config2 = ConfigurationManager::new(out);
    out.section("[WARN] Created 2 configuration instances");
    out.line(format!("config1 id={}", config1.instance_id));
    out.line(format!("config2 id={}", config2.instance_id));
    config1.set("debug", true, out);
    out.line(format!("config1.debug = {}", config1.get("debug").unwrap_or(Value::Null)));
    out.line(format!("config2.debug = {}", config2.get("debug").unwrap_or(Value::Null)));
    out.line("[ISSUE] State is inconsistent across instances");

    out.blank();
    out.banner("PROBLEM 3: Multiple Logger Instances");
    let mut logger1 = Logger::new("app.log", out);
    let mut logger2 = Logger::new("app.log", out);
    let mut logger3 = Logger::new("app.log", out);
    logger1.log("INFO", "Application started", out);
    logger2.log("ERROR", "Database connection failed", out);
    logger3.log("DEBUG", "Processing request", out);
    out.section("[WARN] Created 3 logger instances");
    out.line(format!("logger1 count={}", logger1.log_count));
    out.line(format!("logger2 count={}", logger2.log_count));
    out.line(format!("logger3 count={}", logger3.log_count));
    out.line("[ISSUE] No centralized logging");

    out.blank();
    out.banner("PROBLEM 4: No Global Access Point");
    for sql in ["SELECT * FROM orders", "SELECT * FROM customers"] {
        DatabaseConnection::new(out).query(sql, out);
    }
    out.section("[ISSUE] Each function creates its own connection");
    out.line("[ISSUE] No shared, centralized instance");
    Ok(())
}

pub mod violated {
    use std::collections::BTreeMap;

    use chrono::Local;
    use serde_json::Value;

    use super::next_instance_id;
    use crate::domain::model::Transcript;

    /// 每次 `new` 都建立一條新連線
    pub struct DatabaseConnection {
        pub connection_id: u64,
        pub host: String,
        pub port: u16,
        pub database: String,
    }

    impl DatabaseConnection {
        pub fn new(out: &mut Transcript) -> Self {
            let connection_id = next_instance_id();
            out.section("[DB] Creating new database connection");
            out.line(format!("[DB] Timestamp: {}", Local::now().format("%H:%M:%S%.6f")));
            out.line(format!("[DB] Connection established (id={})", connection_id));
            Self {
                connection_id,
                host: "localhost".to_string(),
                port: 5432,
                database: "myapp_db".to_string(),
            }
        }

        pub fn query(&self, sql: &str, out: &mut Transcript) -> String {
            out.section(format!(" [DB:{}] Executing query", self.connection_id));
            out.line(format!("[DB] SQL: {}", sql));
            format!("Result from connection {}", self.connection_id)
        }
    }

    pub struct ConfigurationManager {
        pub instance_id: u64,
        config: BTreeMap<String, Value>,
    }

    impl ConfigurationManager {
        pub fn new(out: &mut Transcript) -> Self {
            let instance_id = next_instance_id();
            out.section("[Config] Loading configuration");
            out.line(format!("[Config] Instance id={}", instance_id));
            out.line("[Config] Configuration loaded");
            Self {
                instance_id,
                config: BTreeMap::from([
                    ("app_name".to_string(), Value::from("MyApp")),
                    ("version".to_string(), Value::from("1.0.0")),
                    ("debug".to_string(), Value::from(false)),
                    ("max_connections".to_string(), Value::from(100)),
                ]),
            }
        }

        pub fn get(&self, key: &str) -> Option<Value> {
            self.config.get(key).cloned()
        }

        pub fn set(&mut self, key: &str, value: impl Into<Value>, out: &mut Transcript) {
            let value = value.into();
            out.section(format!("[Config:{}] Setting {}={}", self.instance_id, key, value));
            self.config.insert(key.to_string(), value);
        }
    }

    pub struct Logger {
        pub instance_id: u64,
        pub log_file: String,
        pub log_count: usize,
    }

    impl Logger {
        pub fn new(log_file: &str, out: &mut Transcript) -> Self {
            let instance_id = next_instance_id();
            out.section("[Logger] Creating logger instance");
            out.line(format!("[Logger] Instance id={}", instance_id));
            out.line(format!("[Logger] Log file={}", log_file));
            Self {
                instance_id,
                log_file: log_file.to_string(),
                log_count: 0,
            }
        }

        pub fn log(&mut self, level: &str, message: &str, out: &mut Transcript) {
            self.log_count += 1;
            out.line(format!(
                "[{}] [{}] {} (logger_id={}, count={})",
                Local::now().format("%H:%M:%S"),
                level,
                message,
                self.instance_id,
                self.log_count
            ));
        }
    }
}
