//! Builder pattern: step-by-step computer assembly with per-profile rules.
//!
//! Builders are consuming and chainable. Setters that enforce a profile
//! minimum return `Result<Self>` so a bad value stops the chain at `?`.

use std::fmt;

use crate::domain::model::Transcript;
use crate::utils::error::{PatternError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Computer {
    pub cpu: String,
    pub ram_gb: u32,
    pub storage_gb: u32,
    pub gpu: Option<String>,
    pub wifi: bool,
    pub bluetooth: bool,
    pub cooling_system: Option<String>,
    pub rgb_lighting: bool,
    pub operating_system: Option<String>,
    pub monitor: Option<String>,
    pub keyboard: Option<String>,
    pub mouse: Option<String>,
    pub speakers: bool,
    pub webcam: bool,
    pub case_type: String,
}

impl fmt::Display for Computer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(50);
        writeln!(f, "{}", rule)?;
        writeln!(f, "COMPUTER SPECIFICATIONS")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "CPU: {}", self.cpu)?;
        writeln!(f, "RAM: {}GB", self.ram_gb)?;
        writeln!(f, "Storage: {}GB SSD", self.storage_gb)?;
        if let Some(gpu) = &self.gpu {
            writeln!(f, "GPU: {}", gpu)?;
        }
        if self.wifi {
            writeln!(f, "WiFi: Enabled")?;
        }
        if self.bluetooth {
            writeln!(f, "Bluetooth: Enabled")?;
        }
        if let Some(cooling) = &self.cooling_system {
            writeln!(f, "Cooling: {}", cooling)?;
        }
        if self.rgb_lighting {
            writeln!(f, "RGB Lighting: Yes")?;
        }
        if let Some(os) = &self.operating_system {
            writeln!(f, "OS: {}", os)?;
        }
        if let Some(monitor) = &self.monitor {
            writeln!(f, "Monitor: {}", monitor)?;
        }
        if let Some(keyboard) = &self.keyboard {
            writeln!(f, "Keyboard: {}", keyboard)?;
        }
        if let Some(mouse) = &self.mouse {
            writeln!(f, "Mouse: {}", mouse)?;
        }
        if self.speakers {
            writeln!(f, "Speakers: Included")?;
        }
        if self.webcam {
            writeln!(f, "Webcam: Included")?;
        }
        writeln!(f, "Case: {}", self.case_type)?;
        write!(f, "{}", rule)
    }
}

/// 建構中的零件，必要欄位尚未填時為 None
#[derive(Debug, Clone, Default)]
pub struct ComputerParts {
    pub cpu: Option<String>,
    pub ram_gb: Option<u32>,
    pub storage_gb: Option<u32>,
    pub gpu: Option<String>,
    pub wifi: bool,
    pub bluetooth: bool,
    pub cooling_system: Option<String>,
    pub rgb_lighting: bool,
    pub operating_system: Option<String>,
    pub monitor: Option<String>,
    pub keyboard: Option<String>,
    pub mouse: Option<String>,
    pub speakers: bool,
    pub webcam: bool,
    pub case_type: Option<String>,
}

/// 各機型的最低規格
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirements {
    pub label: &'static str,
    pub min_ram_gb: u32,
    pub min_storage_gb: u32,
    pub storage_label: &'static str,
}

pub trait ComputerBuilder: Sized {
    fn requirements(&self) -> Requirements;
    fn parts(&mut self) -> &mut ComputerParts;
    fn into_parts(self) -> ComputerParts;

    fn cpu(mut self, cpu: impl Into<String>) -> Self {
        self.parts().cpu = Some(cpu.into());
        self
    }

    fn ram(mut self, ram_gb: u32) -> Result<Self> {
        let req = self.requirements();
        if ram_gb < req.min_ram_gb {
            return Err(PatternError::BuildError {
                message: format!("{} needs at least {}GB RAM", req.label, req.min_ram_gb),
            });
        }
        self.parts().ram_gb = Some(ram_gb);
        Ok(self)
    }

    fn storage(mut self, storage_gb: u32) -> Result<Self> {
        let req = self.requirements();
        if storage_gb < req.min_storage_gb {
            return Err(PatternError::BuildError {
                message: format!("{} needs at least {} storage", req.label, req.storage_label),
            });
        }
        self.parts().storage_gb = Some(storage_gb);
        Ok(self)
    }

    fn gpu(mut self, gpu: impl Into<String>) -> Self {
        self.parts().gpu = Some(gpu.into());
        self
    }

    fn connectivity(mut self, wifi: bool, bluetooth: bool) -> Self {
        let parts = self.parts();
        parts.wifi = wifi;
        parts.bluetooth = bluetooth;
        self
    }

    fn cooling(mut self, cooling_system: impl Into<String>) -> Self {
        self.parts().cooling_system = Some(cooling_system.into());
        self
    }

    fn rgb_lighting(mut self, enabled: bool) -> Self {
        self.parts().rgb_lighting = enabled;
        self
    }

    fn operating_system(mut self, os: impl Into<String>) -> Self {
        self.parts().operating_system = Some(os.into());
        self
    }

    fn peripherals(
        mut self,
        monitor: impl Into<String>,
        keyboard: impl Into<String>,
        mouse: impl Into<String>,
    ) -> Self {
        let parts = self.parts();
        parts.monitor = Some(monitor.into());
        parts.keyboard = Some(keyboard.into());
        parts.mouse = Some(mouse.into());
        self
    }

    fn accessories(mut self, speakers: bool, webcam: bool) -> Self {
        let parts = self.parts();
        parts.speakers = speakers;
        parts.webcam = webcam;
        self
    }

    fn case(mut self, case_type: impl Into<String>) -> Self {
        self.parts().case_type = Some(case_type.into());
        self
    }

    fn build(self) -> Result<Computer> {
        let parts = self.into_parts();
        let (Some(cpu), Some(ram_gb), Some(storage_gb)) = (parts.cpu, parts.ram_gb, parts.storage_gb)
        else {
            return Err(PatternError::BuildError {
                message: "CPU, RAM, and Storage are required!".to_string(),
            });
        };

        Ok(Computer {
            cpu,
            ram_gb,
            storage_gb,
            gpu: parts.gpu,
            wifi: parts.wifi,
            bluetooth: parts.bluetooth,
            cooling_system: parts.cooling_system,
            rgb_lighting: parts.rgb_lighting,
            operating_system: parts.operating_system,
            monitor: parts.monitor,
            keyboard: parts.keyboard,
            mouse: parts.mouse,
            speakers: parts.speakers,
            webcam: parts.webcam,
            case_type: parts.case_type.unwrap_or_else(|| "Standard".to_string()),
        })
    }
}

macro_rules! profile_builder {
    ($name:ident, $label:expr, $min_ram:expr, $min_storage:expr, $storage_label:expr) => {
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            parts: ComputerParts,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }
        }

        impl ComputerBuilder for $name {
            fn requirements(&self) -> Requirements {
                Requirements {
                    label: $label,
                    min_ram_gb: $min_ram,
                    min_storage_gb: $min_storage,
                    storage_label: $storage_label,
                }
            }

            fn parts(&mut self) -> &mut ComputerParts {
                &mut self.parts
            }

            fn into_parts(self) -> ComputerParts {
                self.parts
            }
        }
    };
}

profile_builder!(GamingComputerBuilder, "Gaming PC", 16, 500, "500GB");
profile_builder!(OfficeComputerBuilder, "Office PC", 8, 0, "0GB");
profile_builder!(ServerBuilder, "Server", 32, 1000, "1TB");

/// 常用組態的預設配方
pub struct ComputerDirector<B> {
    builder: B,
}

impl<B: ComputerBuilder> ComputerDirector<B> {
    pub fn new(builder: B) -> Self {
        Self { builder }
    }

    pub fn build_budget_gaming_pc(self) -> Result<Computer> {
        self.builder
            .cpu("Intel i5-12400F")
            .ram(16)?
            .storage(500)?
            .gpu("NVIDIA RTX 3060")
            .connectivity(true, true)
            .cooling("Air Cooling")
            .rgb_lighting(true)
            .operating_system("Windows 11 Home")
            .peripherals("24-inch 1080p 144Hz", "Basic Mechanical", "Budget Gaming Mouse")
            .accessories(false, true)
            .case("Mid Tower")
            .build()
    }

    pub fn build_high_end_gaming_pc(self) -> Result<Computer> {
        self.builder
            .cpu("Intel i9-13900K")
            .ram(64)?
            .storage(2000)?
            .gpu("NVIDIA RTX 4090")
            .connectivity(true, true)
            .cooling("Custom Liquid Cooling")
            .rgb_lighting(true)
            .operating_system("Windows 11 Pro")
            .peripherals("32-inch 4K 240Hz", "Premium Mechanical RGB", "Pro Gaming Mouse")
            .accessories(true, true)
            .case("Full Tower RGB")
            .build()
    }

    pub fn build_basic_office_pc(self) -> Result<Computer> {
        self.builder
            .cpu("Intel i3-12100")
            .ram(8)?
            .storage(256)?
            .connectivity(true, true)
            .operating_system("Windows 11 Pro")
            .peripherals("22-inch Full HD", "Standard Keyboard", "Standard Mouse")
            .accessories(false, true)
            .build()
    }
}

fn print_computer(computer: &Computer, out: &mut Transcript) {
    out.blank();
    for line in computer.to_string().lines() {
        out.line(line);
    }
}

pub fn run_followed(out: &mut Transcript) -> Result<()> {
    out.banner("COMPUTER BUILDER - WITH BUILDER PATTERN");

    out.section("--- Building Gaming Computer ---");
    let gaming_pc = GamingComputerBuilder::new()
        .cpu("Intel i9-13900K")
        .ram(32)?
        .storage(1000)?
        .gpu("NVIDIA RTX 4090")
        .connectivity(true, true)
        .cooling("Liquid Cooling")
        .rgb_lighting(true)
        .operating_system("Windows 11 Pro")
        .peripherals("27-inch 4K", "Mechanical RGB", "Gaming Mouse")
        .accessories(true, true)
        .case("Gaming Tower")
        .build()?;
    print_computer(&gaming_pc, out);

    out.section("--- Building Office Computer (Step-by-Step) ---");
    let office_builder = OfficeComputerBuilder::new().cpu("Intel i5-12400");
    let office_builder = office_builder.ram(16)?;
    let office_builder = office_builder.storage(512)?;
    let office_builder = office_builder
        .connectivity(true, true)
        .operating_system("Windows 11 Pro")
        .peripherals("24-inch Full HD", "Standard Keyboard", "Standard Mouse")
        .accessories(false, true);
    let office_pc = office_builder.build()?;
    print_computer(&office_pc, out);

    out.section("--- Using Director for Predefined Builds ---");
    out.section(" Budget Gaming PC:");
    print_computer(
        &ComputerDirector::new(GamingComputerBuilder::new()).build_budget_gaming_pc()?,
        out,
    );
    out.section(" High-End Gaming PC:");
    print_computer(
        &ComputerDirector::new(GamingComputerBuilder::new()).build_high_end_gaming_pc()?,
        out,
    );
    out.section(" Basic Office PC:");
    print_computer(
        &ComputerDirector::new(OfficeComputerBuilder::new()).build_basic_office_pc()?,
        out,
    );

    out.section("--- Building Server ---");
    let server = ServerBuilder::new()
        .cpu("AMD EPYC 7763")
        .ram(128)?
        .storage(4000)?
        .connectivity(true, false)
        .cooling("Server-grade Cooling")
        .operating_system("Ubuntu Server 22.04")
        .case("Server Rack")
        .build()?;
    print_computer(&server, out);

    out.section("--- Validation Example ---");
    let invalid = GamingComputerBuilder::new()
        .cpu("Intel i5")
        .ram(8)
        .and_then(|builder| builder.build());
    match invalid {
        Ok(computer) => print_computer(&computer, out),
        Err(e) => out.line(format!(" Validation caught error: {}", e)),
    }
    Ok(())
}

pub fn run_violated(out: &mut Transcript) -> Result<()> {
    use violated::Computer;

    out.banner("COMPUTER BUILDER - WITHOUT BUILDER PATTERN");

    out.section("--- Creating Gaming Computer ---");
    let gaming_pc = Computer::new(
        "Intel i9-13900K",
        32,
        1000,
        Some("NVIDIA RTX 4090"),
        true,
        true,
        Some("Liquid Cooling"),
        true,
        Some("Windows 11 Pro"),
        Some("27-inch 4K"),
        Some("Mechanical RGB"),
        Some("Gaming Mouse"),
        true,
        true,
        "Gaming Tower",
    );
    out.line(gaming_pc.to_string());

    out.section("--- Creating Office Computer (Wrong Order!) ---");
    // keyboard 與 mouse 對調，型別一樣所以編譯器看不出來
    let office_pc = Computer::new(
        "Intel i5-12400",
        16,
        512,
        None,
        true,
        true,
        Some("Standard Cooling"),
        false,
        Some("Windows 11"),
        None,
        Some("Standard Mouse"),
        Some("Standard Keyboard"),
        false,
        false,
        "Mini Tower",
    );
    out.line(office_pc.to_string());
    out.section("ERROR: Parameters got mixed up! Keyboard got the mouse value!");

    out.section("--- Creating Basic Computer ---");
    let basic_pc = Computer::new(
        "Intel i3-12100",
        8,
        256,
        None,
        false,
        false,
        None,
        false,
        Some("Windows 11 Home"),
        None,
        None,
        None,
        false,
        false,
        "Standard",
    );
    out.line(basic_pc.to_string());

    out.section("--- Creating Invalid Computer ---");
    let invalid_pc = Computer::new(
        "",
        0,
        -100,
        Some("Invalid GPU"),
        true,
        true,
        Some("Cooling"),
        true,
        Some("OS"),
        Some("Monitor"),
        Some("Keyboard"),
        Some("Mouse"),
        true,
        true,
        "Case",
    );
    out.line(invalid_pc.to_string());
    out.section("ERROR: Invalid computer created! No validation during construction!");

    out.section("--- Creating Server Computer (Messy!) ---");
    let server = Computer::new(
        "AMD EPYC 7763",
        128,
        2000,
        None,
        true,
        false,
        Some("Server-grade Cooling"),
        false,
        Some("Ubuntu Server 22.04"),
        None,
        None,
        None,
        false,
        false,
        "Server Rack",
    );
    out.line(server.to_string());
    Ok(())
}

pub mod violated {
    use std::fmt;

    /// 十五個位置參數，沒有任何驗證
    pub struct Computer {
        pub cpu: String,
        pub ram: i64,
        pub storage: i64,
        pub gpu: Option<String>,
        pub wifi: bool,
        pub bluetooth: bool,
        pub cooling_system: Option<String>,
        pub rgb_lighting: bool,
        pub operating_system: Option<String>,
        pub monitor: Option<String>,
        pub keyboard: Option<String>,
        pub mouse: Option<String>,
        pub speakers: bool,
        pub webcam: bool,
        pub case_type: String,
    }

    impl Computer {
        #[allow(clippy::too_many_arguments)]
        pub fn new(
            cpu: &str,
            ram: i64,
            storage: i64,
            gpu: Option<&str>,
            wifi: bool,
            bluetooth: bool,
            cooling_system: Option<&str>,
            rgb_lighting: bool,
            operating_system: Option<&str>,
            monitor: Option<&str>,
            keyboard: Option<&str>,
            mouse: Option<&str>,
            speakers: bool,
            webcam: bool,
            case_type: &str,
        ) -> Self {
            Self {
                cpu: cpu.to_string(),
                ram,
                storage,
                gpu: gpu.map(str::to_string),
                wifi,
                bluetooth,
                cooling_system: cooling_system.map(str::to_string),
                rgb_lighting,
                operating_system: operating_system.map(str::to_string),
                monitor: monitor.map(str::to_string),
                keyboard: keyboard.map(str::to_string),
                mouse: mouse.map(str::to_string),
                speakers,
                webcam,
                case_type: case_type.to_string(),
            }
        }
    }

    impl fmt::Display for Computer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let rule = "=".repeat(50);
            writeln!(f, "{}\n COMPUTER SPECIFICATIONS\n{}", rule, rule)?;
            writeln!(f, "CPU: {}", self.cpu)?;
            writeln!(f, "RAM: {}GB", self.ram)?;
            writeln!(f, "Storage: {}GB SSD", self.storage)?;
            let optional = [
                ("GPU", self.gpu.as_deref()),
                ("WiFi", self.wifi.then_some("Enabled")),
                ("Bluetooth", self.bluetooth.then_some("Enabled")),
                ("Cooling", self.cooling_system.as_deref()),
                ("RGB Lighting", self.rgb_lighting.then_some("Yes")),
                ("OS", self.operating_system.as_deref()),
                ("Monitor", self.monitor.as_deref()),
                ("Keyboard", self.keyboard.as_deref()),
                ("Mouse", self.mouse.as_deref()),
                ("Speakers", self.speakers.then_some("Included")),
                ("Webcam", self.webcam.then_some("Included")),
            ];
            for (label, value) in optional {
                if let Some(value) = value {
                    writeln!(f, "{}: {}", label, value)?;
                }
            }
            writeln!(f, "Case: {}", self.case_type)?;
            write!(f, "{}", rule)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_minimums() {
        assert!(GamingComputerBuilder::new().ram(8).is_err());
        assert!(GamingComputerBuilder::new().storage(256).is_err());
        assert!(OfficeComputerBuilder::new().ram(4).is_err());
        assert!(OfficeComputerBuilder::new().storage(128).is_ok());
        assert!(ServerBuilder::new().ram(16).is_err());

        let err = ServerBuilder::new().storage(500).err().unwrap();
        assert_eq!(err.to_string(), "Build error: Server needs at least 1TB storage");
    }

    #[test]
    fn test_build_requires_core_parts() {
        let err = GamingComputerBuilder::new()
            .cpu("Intel i5")
            .ram(16)
            .unwrap()
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "Build error: CPU, RAM, and Storage are required!");
    }

    #[test]
    fn test_director_budget_gaming_preset() {
        let pc = ComputerDirector::new(GamingComputerBuilder::new())
            .build_budget_gaming_pc()
            .unwrap();
        assert_eq!(pc.ram_gb, 16);
        assert_eq!(pc.storage_gb, 500);
        assert_eq!(pc.gpu.as_deref(), Some("NVIDIA RTX 3060"));
        assert_eq!(pc.case_type, "Mid Tower");
    }

    #[test]
    fn test_office_preset_defaults_case() {
        let pc = ComputerDirector::new(OfficeComputerBuilder::new())
            .build_basic_office_pc()
            .unwrap();
        assert_eq!(pc.case_type, "Standard");
        assert!(pc.gpu.is_none());
    }

    #[test]
    fn test_display_lists_only_present_parts() {
        let server = ServerBuilder::new()
            .cpu("AMD EPYC 7763")
            .ram(128)
            .unwrap()
            .storage(4000)
            .unwrap()
            .case("Server Rack")
            .build()
            .unwrap();
        let sheet = server.to_string();

        assert!(sheet.contains("CPU: AMD EPYC 7763\nRAM: 128GB\nStorage: 4000GB SSD\nCase: Server Rack"));
        assert!(!sheet.contains("GPU:"));
    }

    #[test]
    fn test_violated_constructor_accepts_nonsense() {
        let pc = violated::Computer::new(
            "", 0, -100, None, false, false, None, false, None, None, None, None, false, false,
            "Case",
        );
        assert!(pc.to_string().contains("Storage: -100GB SSD"));
    }
}
