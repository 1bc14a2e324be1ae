//! Factory method and abstract factory: platform-specific UI widgets.

use std::fmt;
use std::str::FromStr;

use crate::domain::model::Transcript;
use crate::utils::error::{PatternError, Result};

pub trait Button {
    fn render(&self, out: &mut Transcript);
    fn on_click(&self, out: &mut Transcript);
}

pub trait Checkbox {
    fn render(&self, out: &mut Transcript);
    fn toggle(&self, out: &mut Transcript);
}

/// 產生 `<Platform>Button` / `<Platform>Checkbox` 兩個產品型別
macro_rules! widget_family {
    ($button:ident, $checkbox:ident, $label:literal, $button_look:literal, $checkbox_look:literal) => {
        #[derive(Debug, Default)]
        pub struct $button;

        impl Button for $button {
            fn render(&self, out: &mut Transcript) {
                out.line(concat!("Rendering ", $label, "-style button"));
                out.line($button_look);
            }

            fn on_click(&self, out: &mut Transcript) {
                out.line(concat!($label, " button clicked!"));
            }
        }

        #[derive(Debug, Default)]
        pub struct $checkbox;

        impl Checkbox for $checkbox {
            fn render(&self, out: &mut Transcript) {
                out.line(concat!("Rendering ", $label, "-style checkbox"));
                out.line($checkbox_look);
            }

            fn toggle(&self, out: &mut Transcript) {
                out.line(concat!($label, " checkbox toggled!"));
            }
        }
    };
}

widget_family!(
    WindowsButton,
    WindowsCheckbox,
    "Windows",
    "[ Submit ] (Windows Look)",
    "[ ] Accept Terms (Windows Look)"
);
widget_family!(
    MacButton,
    MacCheckbox,
    "Mac",
    "( Submit ) (Mac Look)",
    "( ) Accept Terms (Mac Look)"
);
widget_family!(
    LinuxButton,
    LinuxCheckbox,
    "Linux",
    "| Submit | (Linux Look)",
    "[ ] Accept Terms (Linux Look)"
);
widget_family!(
    AndroidButton,
    AndroidCheckbox,
    "Android",
    "{ Submit } (Material Design)",
    "( ) Accept Terms (Material Design)"
);

/// 同一平台的一組元件
pub trait GuiFactory {
    fn name(&self) -> &'static str;
    fn create_button(&self) -> Box<dyn Button>;
    fn create_checkbox(&self) -> Box<dyn Checkbox>;
}

pub struct WindowsFactory;

impl GuiFactory for WindowsFactory {
    fn name(&self) -> &'static str {
        "WindowsFactory"
    }

    fn create_button(&self) -> Box<dyn Button> {
        Box::new(WindowsButton)
    }

    fn create_checkbox(&self) -> Box<dyn Checkbox> {
        Box::new(WindowsCheckbox)
    }
}

pub struct MacFactory;

impl GuiFactory for MacFactory {
    fn name(&self) -> &'static str {
        "MacFactory"
    }

    fn create_button(&self) -> Box<dyn Button> {
        Box::new(MacButton)
    }

    fn create_checkbox(&self) -> Box<dyn Checkbox> {
        Box::new(MacCheckbox)
    }
}

pub struct LinuxFactory;

impl GuiFactory for LinuxFactory {
    fn name(&self) -> &'static str {
        "LinuxFactory"
    }

    fn create_button(&self) -> Box<dyn Button> {
        Box::new(LinuxButton)
    }

    fn create_checkbox(&self) -> Box<dyn Checkbox> {
        Box::new(LinuxCheckbox)
    }
}

pub struct AndroidFactory;

impl GuiFactory for AndroidFactory {
    fn name(&self) -> &'static str {
        "AndroidFactory"
    }

    fn create_button(&self) -> Box<dyn Button> {
        Box::new(AndroidButton)
    }

    fn create_checkbox(&self) -> Box<dyn Checkbox> {
        Box::new(AndroidCheckbox)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Mac,
    Linux,
    Android,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Windows,
        Platform::Mac,
        Platform::Linux,
        Platform::Android,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::Mac => "Mac",
            Platform::Linux => "Linux",
            Platform::Android => "Android",
        }
    }

    pub fn factory(&self) -> Box<dyn GuiFactory> {
        match self {
            Platform::Windows => Box::new(WindowsFactory),
            Platform::Mac => Box::new(MacFactory),
            Platform::Linux => Box::new(LinuxFactory),
            Platform::Android => Box::new(AndroidFactory),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PatternError::UnsupportedPlatform { os: s.to_string() })
    }
}

/// Factory method: 由作業系統名稱取得對應的 factory
pub fn factory_for(os_type: &str) -> Result<Box<dyn GuiFactory>> {
    let platform: Platform = os_type.parse()?;
    tracing::debug!("Selected {} for '{}'", platform.factory().name(), os_type);
    Ok(platform.factory())
}

/// 只依賴 `GuiFactory`，不認識任何具體元件
pub struct Application {
    factory: Box<dyn GuiFactory>,
    button: Option<Box<dyn Button>>,
    checkbox: Option<Box<dyn Checkbox>>,
}

impl Application {
    pub fn new(factory: Box<dyn GuiFactory>) -> Self {
        Self {
            factory,
            button: None,
            checkbox: None,
        }
    }

    pub fn factory_name(&self) -> &'static str {
        self.factory.name()
    }

    pub fn create_ui(&mut self, out: &mut Transcript) {
        out.blank();
        out.rule('=', 50);
        out.line(format!("Creating UI using {}", self.factory.name()));
        out.rule('=', 50);

        self.button = Some(self.factory.create_button());
        self.checkbox = Some(self.factory.create_checkbox());
    }

    pub fn render(&self, out: &mut Transcript) -> Result<()> {
        let (button, checkbox) = self.widgets()?;
        button.render(out);
        checkbox.render(out);
        Ok(())
    }

    pub fn interact(&self, out: &mut Transcript) -> Result<()> {
        let (button, checkbox) = self.widgets()?;
        button.on_click(out);
        checkbox.toggle(out);
        Ok(())
    }

    fn widgets(&self) -> Result<(&dyn Button, &dyn Checkbox)> {
        match (&self.button, &self.checkbox) {
            (Some(button), Some(checkbox)) => Ok((button.as_ref(), checkbox.as_ref())),
            _ => Err(PatternError::UiNotCreated),
        }
    }
}

fn launch(factory: Box<dyn GuiFactory>, out: &mut Transcript) -> Result<()> {
    let mut app = Application::new(factory);
    app.create_ui(out);
    app.render(out)?;
    app.interact(out)
}

pub fn run_followed(out: &mut Transcript) -> Result<()> {
    out.banner("UI FRAMEWORK - WITH FACTORY PATTERNS");

    launch(Box::new(WindowsFactory), out)?;
    launch(Box::new(MacFactory), out)?;

    // factory method
    launch(factory_for("Linux")?, out)?;

    launch(Box::new(AndroidFactory), out)?;
    out.section("Android support added without touching Application");

    if let Err(e) = factory_for("BeOS") {
        out.section(format!("Factory lookup failed: {}", e));
    }

    let not_ready = Application::new(Box::new(MacFactory));
    if let Err(e) = not_ready.render(out) {
        out.line(format!("Render before create_ui: {}", e));
    }
    Ok(())
}

pub fn run_violated(out: &mut Transcript) -> Result<()> {
    out.banner("UI FRAMEWORK - WITHOUT FACTORY PATTERN");

    for os in ["Windows", "Mac", "Linux"] {
        let mut app = violated::Application::new(os);
        app.create_ui(out)?;
        app.render(out);
        app.interact(out);
    }

    // 新平台必須修改 Application 本身
    let mut android = violated::Application::new("Android");
    if let Err(e) = android.create_ui(out) {
        out.section(format!("ERROR: {}", e));
    }
    android.render(out);
    Ok(())
}

pub mod violated {
    use super::{
        Button, Checkbox, LinuxButton, LinuxCheckbox, MacButton, MacCheckbox, WindowsButton,
        WindowsCheckbox,
    };
    use crate::domain::model::Transcript;
    use crate::utils::error::{PatternError, Result};

    /// 直接依作業系統字串挑選具體元件
    pub struct Application {
        pub os_type: String,
        button: Option<Box<dyn Button>>,
        checkbox: Option<Box<dyn Checkbox>>,
    }

    impl Application {
        pub fn new(os_type: &str) -> Self {
            Self {
                os_type: os_type.to_string(),
                button: None,
                checkbox: None,
            }
        }

        pub fn create_ui(&mut self, out: &mut Transcript) -> Result<()> {
            out.blank();
            out.rule('=', 50);
            out.line(format!("Creating UI for: {}", self.os_type));
            out.rule('=', 50);

            let (button, checkbox): (Box<dyn Button>, Box<dyn Checkbox>) =
                match self.os_type.as_str() {
                    "Windows" => (Box::new(WindowsButton), Box::new(WindowsCheckbox)),
                    "Mac" => (Box::new(MacButton), Box::new(MacCheckbox)),
                    "Linux" => (Box::new(LinuxButton), Box::new(LinuxCheckbox)),
                    other => {
                        return Err(PatternError::UnsupportedPlatform {
                            os: other.to_string(),
                        })
                    }
                };

            self.button = Some(button);
            self.checkbox = Some(checkbox);
            Ok(())
        }

        pub fn is_ready(&self) -> bool {
            self.button.is_some() && self.checkbox.is_some()
        }

        pub fn render(&self, out: &mut Transcript) {
            match (&self.button, &self.checkbox) {
                (Some(button), Some(checkbox)) => {
                    button.render(out);
                    checkbox.render(out);
                }
                _ => out.line("ERROR: UI not created!"),
            }
        }

        pub fn interact(&self, out: &mut Transcript) {
            match (&self.button, &self.checkbox) {
                (Some(button), Some(checkbox)) => {
                    button.on_click(out);
                    checkbox.toggle(out);
                }
                _ => out.line("ERROR: UI not created!"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_platform_renders_its_own_look() {
        let expected = [
            ("Windows", "[ Submit ] (Windows Look)"),
            ("mac", "( Submit ) (Mac Look)"),
            ("LINUX", "| Submit | (Linux Look)"),
            ("Android", "{ Submit } (Material Design)"),
        ];

        for (os, look) in expected {
            let mut app = Application::new(factory_for(os).unwrap());
            let mut out = Transcript::new();
            app.create_ui(&mut out);
            app.render(&mut out).unwrap();
            assert!(out.contains(look), "{} should render {}", os, look);
        }
    }

    #[test]
    fn test_unknown_platform_is_rejected() {
        let err = factory_for("BeOS").err().unwrap();
        assert!(matches!(err, PatternError::UnsupportedPlatform { ref os } if os == "BeOS"));
    }

    #[test]
    fn test_render_requires_create_ui() {
        let app = Application::new(Box::new(LinuxFactory));
        let mut out = Transcript::new();
        assert!(matches!(app.render(&mut out), Err(PatternError::UiNotCreated)));
        assert!(matches!(app.interact(&mut out), Err(PatternError::UiNotCreated)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_interact_uses_matching_family() {
        let mut app = Application::new(Platform::Mac.factory());
        let mut out = Transcript::new();
        app.create_ui(&mut out);
        app.interact(&mut out).unwrap();
        assert!(out.contains("Mac button clicked!"));
        assert!(out.contains("Mac checkbox toggled!"));
        assert_eq!(app.factory_name(), "MacFactory");
    }

    #[test]
    fn test_violated_switch_misses_new_platform() {
        let mut out = Transcript::new();
        let mut app = violated::Application::new("Android");
        assert!(app.create_ui(&mut out).is_err());
        assert!(!app.is_ready());
        app.render(&mut out);
        assert!(out.contains("ERROR: UI not created!"));
    }
}
