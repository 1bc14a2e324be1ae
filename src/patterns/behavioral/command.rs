//! Command pattern: a smart-home remote with undo, redo and macros.
//!
//! Receivers are shared between commands through `Rc<RefCell<_>>`; every
//! command records whatever it needs to reverse itself.

use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::model::Transcript;
use crate::utils::error::Result;

pub type Shared<T> = Rc<RefCell<T>>;

pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Light {
    pub location: String,
    pub is_on: bool,
}

impl Light {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            is_on: false,
        }
    }

    pub fn turn_on(&mut self, out: &mut Transcript) {
        self.is_on = true;
        out.line(format!("{} light ON", self.location));
    }

    pub fn turn_off(&mut self, out: &mut Transcript) {
        self.is_on = false;
        out.line(format!("{} light OFF", self.location));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fan {
    pub location: String,
    /// 0 代表關閉
    pub speed: u8,
}

impl Fan {
    pub const DEFAULT_SPEED: u8 = 3;

    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            speed: 0,
        }
    }

    pub fn turn_on(&mut self, speed: u8, out: &mut Transcript) {
        self.speed = speed;
        out.line(format!("{} fan ON (speed {})", self.location, speed));
    }

    pub fn turn_off(&mut self, out: &mut Transcript) {
        self.speed = 0;
        out.line(format!("{} fan OFF", self.location));
    }

    pub fn set_speed(&mut self, speed: u8, out: &mut Transcript) -> u8 {
        let old_speed = std::mem::replace(&mut self.speed, speed);
        out.line(format!("{} fan speed {} -> {}", self.location, old_speed, speed));
        old_speed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirConditioner {
    pub location: String,
    pub is_on: bool,
    pub temperature: i32,
}

impl AirConditioner {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            is_on: false,
            temperature: 24,
        }
    }

    pub fn turn_on(&mut self, out: &mut Transcript) {
        self.is_on = true;
        out.line(format!("{} AC ON at {}C", self.location, self.temperature));
    }

    pub fn turn_off(&mut self, out: &mut Transcript) {
        self.is_on = false;
        out.line(format!("{} AC OFF", self.location));
    }

    pub fn set_temperature(&mut self, temperature: i32, out: &mut Transcript) -> i32 {
        let old_temperature = std::mem::replace(&mut self.temperature, temperature);
        if self.is_on {
            out.line(format!(
                "{} AC temperature {}C -> {}C",
                self.location, old_temperature, temperature
            ));
        }
        old_temperature
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Television {
    pub location: String,
    pub is_on: bool,
    pub volume: u32,
    pub channel: u32,
}

impl Television {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            is_on: false,
            volume: 10,
            channel: 1,
        }
    }

    pub fn turn_on(&mut self, out: &mut Transcript) {
        self.is_on = true;
        out.line(format!(
            "{} TV ON (Ch {}, Vol {})",
            self.location, self.channel, self.volume
        ));
    }

    pub fn turn_off(&mut self, out: &mut Transcript) {
        self.is_on = false;
        out.line(format!("{} TV OFF", self.location));
    }

    pub fn set_volume(&mut self, volume: u32, out: &mut Transcript) -> u32 {
        let old_volume = std::mem::replace(&mut self.volume, volume);
        out.line(format!("{} TV volume {} -> {}", self.location, old_volume, volume));
        old_volume
    }

    pub fn set_channel(&mut self, channel: u32, out: &mut Transcript) -> u32 {
        let old_channel = std::mem::replace(&mut self.channel, channel);
        out.line(format!("{} TV channel {} -> {}", self.location, old_channel, channel));
        old_channel
    }
}

pub trait Command {
    fn name(&self) -> &'static str;
    fn execute(&mut self, out: &mut Transcript);
    fn undo(&mut self, out: &mut Transcript);
}

pub struct LightOnCommand(pub Shared<Light>);

impl Command for LightOnCommand {
    fn name(&self) -> &'static str {
        "LightOnCommand"
    }

    fn execute(&mut self, out: &mut Transcript) {
        self.0.borrow_mut().turn_on(out);
    }

    fn undo(&mut self, out: &mut Transcript) {
        self.0.borrow_mut().turn_off(out);
    }
}

pub struct LightOffCommand(pub Shared<Light>);

impl Command for LightOffCommand {
    fn name(&self) -> &'static str {
        "LightOffCommand"
    }

    fn execute(&mut self, out: &mut Transcript) {
        self.0.borrow_mut().turn_off(out);
    }

    fn undo(&mut self, out: &mut Transcript) {
        self.0.borrow_mut().turn_on(out);
    }
}

pub struct FanOnCommand {
    fan: Shared<Fan>,
    speed: u8,
    previous_speed: u8,
}

impl FanOnCommand {
    pub fn new(fan: Shared<Fan>, speed: u8) -> Self {
        Self {
            fan,
            speed,
            previous_speed: 0,
        }
    }
}

impl Command for FanOnCommand {
    fn name(&self) -> &'static str {
        "FanOnCommand"
    }

    fn execute(&mut self, out: &mut Transcript) {
        let mut fan = self.fan.borrow_mut();
        self.previous_speed = fan.speed;
        fan.turn_on(self.speed, out);
    }

    fn undo(&mut self, out: &mut Transcript) {
        let mut fan = self.fan.borrow_mut();
        if self.previous_speed == 0 {
            fan.turn_off(out);
        } else {
            fan.set_speed(self.previous_speed, out);
        }
    }
}

pub struct FanOffCommand {
    fan: Shared<Fan>,
    previous_speed: u8,
}

impl FanOffCommand {
    pub fn new(fan: Shared<Fan>) -> Self {
        Self {
            fan,
            previous_speed: 0,
        }
    }
}

impl Command for FanOffCommand {
    fn name(&self) -> &'static str {
        "FanOffCommand"
    }

    fn execute(&mut self, out: &mut Transcript) {
        let mut fan = self.fan.borrow_mut();
        self.previous_speed = fan.speed;
        fan.turn_off(out);
    }

    fn undo(&mut self, out: &mut Transcript) {
        self.fan.borrow_mut().turn_on(self.previous_speed, out);
    }
}

pub struct FanSpeedCommand {
    fan: Shared<Fan>,
    speed: u8,
    previous_speed: u8,
}

impl FanSpeedCommand {
    pub fn new(fan: Shared<Fan>, speed: u8) -> Self {
        Self {
            fan,
            speed,
            previous_speed: 0,
        }
    }
}

impl Command for FanSpeedCommand {
    fn name(&self) -> &'static str {
        "FanSpeedCommand"
    }

    fn execute(&mut self, out: &mut Transcript) {
        self.previous_speed = self.fan.borrow_mut().set_speed(self.speed, out);
    }

    fn undo(&mut self, out: &mut Transcript) {
        self.fan.borrow_mut().set_speed(self.previous_speed, out);
    }
}

pub struct AcOnCommand(pub Shared<AirConditioner>);

impl Command for AcOnCommand {
    fn name(&self) -> &'static str {
        "ACOnCommand"
    }

    fn execute(&mut self, out: &mut Transcript) {
        self.0.borrow_mut().turn_on(out);
    }

    fn undo(&mut self, out: &mut Transcript) {
        self.0.borrow_mut().turn_off(out);
    }
}

pub struct AcOffCommand(pub Shared<AirConditioner>);

impl Command for AcOffCommand {
    fn name(&self) -> &'static str {
        "ACOffCommand"
    }

    fn execute(&mut self, out: &mut Transcript) {
        self.0.borrow_mut().turn_off(out);
    }

    fn undo(&mut self, out: &mut Transcript) {
        self.0.borrow_mut().turn_on(out);
    }
}

pub struct AcTemperatureCommand {
    ac: Shared<AirConditioner>,
    temperature: i32,
    previous_temperature: i32,
}

impl AcTemperatureCommand {
    pub fn new(ac: Shared<AirConditioner>, temperature: i32) -> Self {
        Self {
            ac,
            temperature,
            previous_temperature: 0,
        }
    }
}

impl Command for AcTemperatureCommand {
    fn name(&self) -> &'static str {
        "ACTemperatureCommand"
    }

    fn execute(&mut self, out: &mut Transcript) {
        self.previous_temperature = self.ac.borrow_mut().set_temperature(self.temperature, out);
    }

    fn undo(&mut self, out: &mut Transcript) {
        self.ac
            .borrow_mut()
            .set_temperature(self.previous_temperature, out);
    }
}

pub struct TvOnCommand(pub Shared<Television>);

impl Command for TvOnCommand {
    fn name(&self) -> &'static str {
        "TVOnCommand"
    }

    fn execute(&mut self, out: &mut Transcript) {
        self.0.borrow_mut().turn_on(out);
    }

    fn undo(&mut self, out: &mut Transcript) {
        self.0.borrow_mut().turn_off(out);
    }
}

pub struct TvOffCommand(pub Shared<Television>);

impl Command for TvOffCommand {
    fn name(&self) -> &'static str {
        "TVOffCommand"
    }

    fn execute(&mut self, out: &mut Transcript) {
        self.0.borrow_mut().turn_off(out);
    }

    fn undo(&mut self, out: &mut Transcript) {
        self.0.borrow_mut().turn_on(out);
    }
}

pub struct TvVolumeCommand {
    tv: Shared<Television>,
    volume: u32,
    previous_volume: u32,
}

impl TvVolumeCommand {
    pub fn new(tv: Shared<Television>, volume: u32) -> Self {
        Self {
            tv,
            volume,
            previous_volume: 0,
        }
    }
}

impl Command for TvVolumeCommand {
    fn name(&self) -> &'static str {
        "TVVolumeCommand"
    }

    fn execute(&mut self, out: &mut Transcript) {
        self.previous_volume = self.tv.borrow_mut().set_volume(self.volume, out);
    }

    fn undo(&mut self, out: &mut Transcript) {
        self.tv.borrow_mut().set_volume(self.previous_volume, out);
    }
}

pub struct TvChannelCommand {
    tv: Shared<Television>,
    channel: u32,
    previous_channel: u32,
}

impl TvChannelCommand {
    pub fn new(tv: Shared<Television>, channel: u32) -> Self {
        Self {
            tv,
            channel,
            previous_channel: 0,
        }
    }
}

impl Command for TvChannelCommand {
    fn name(&self) -> &'static str {
        "TVChannelCommand"
    }

    fn execute(&mut self, out: &mut Transcript) {
        self.previous_channel = self.tv.borrow_mut().set_channel(self.channel, out);
    }

    fn undo(&mut self, out: &mut Transcript) {
        self.tv.borrow_mut().set_channel(self.previous_channel, out);
    }
}

/// 依序執行，反序復原
pub struct MacroCommand {
    commands: Vec<Box<dyn Command>>,
}

impl MacroCommand {
    pub fn new(commands: Vec<Box<dyn Command>>) -> Self {
        Self { commands }
    }
}

impl Command for MacroCommand {
    fn name(&self) -> &'static str {
        "MacroCommand"
    }

    fn execute(&mut self, out: &mut Transcript) {
        for command in self.commands.iter_mut() {
            command.execute(out);
        }
    }

    fn undo(&mut self, out: &mut Transcript) {
        for command in self.commands.iter_mut().rev() {
            command.undo(out);
        }
    }
}

#[derive(Default)]
pub struct RemoteControl {
    history: Vec<Box<dyn Command>>,
    redo_stack: Vec<Box<dyn Command>>,
}

impl RemoteControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn execute_command(&mut self, mut command: Box<dyn Command>, out: &mut Transcript) {
        command.execute(out);
        self.history.push(command);
        // 新指令讓 redo 失去意義
        self.redo_stack.clear();
    }

    pub fn undo(&mut self, out: &mut Transcript) -> bool {
        let Some(mut command) = self.history.pop() else {
            out.line("Nothing to undo");
            return false;
        };

        out.section("[Undo]");
        command.undo(out);
        self.redo_stack.push(command);
        true
    }

    pub fn redo(&mut self, out: &mut Transcript) -> bool {
        let Some(mut command) = self.redo_stack.pop() else {
            out.line("Nothing to redo");
            return false;
        };

        out.section("[Redo]");
        command.execute(out);
        self.history.push(command);
        true
    }

    pub fn history(&self) -> Vec<&'static str> {
        self.history.iter().map(|command| command.name()).collect()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn show_history(&self, out: &mut Transcript) {
        out.section("[Command History]");
        if self.history.is_empty() {
            out.line("(empty)");
            return;
        }
        for (index, name) in self.history().iter().enumerate() {
            out.line(format!("{}. {}", index + 1, name));
        }
    }
}

pub fn run_followed(out: &mut Transcript) -> Result<()> {
    out.banner("SMART HOME REMOTE - WITH COMMAND PATTERN");

    let living_room_light = shared(Light::new("Living Room"));
    let bedroom_light = shared(Light::new("Bedroom"));
    let living_room_fan = shared(Fan::new("Living Room"));
    let bedroom_ac = shared(AirConditioner::new("Bedroom"));
    let living_room_tv = shared(Television::new("Living Room"));

    let mut remote = RemoteControl::new();

    out.section("SCENARIO 1: Basic commands");
    remote.execute_command(Box::new(LightOnCommand(living_room_light.clone())), out);
    remote.execute_command(Box::new(FanOnCommand::new(living_room_fan.clone(), 4)), out);
    remote.execute_command(Box::new(AcOnCommand(bedroom_ac.clone())), out);
    remote.execute_command(Box::new(AcTemperatureCommand::new(bedroom_ac.clone(), 22)), out);

    out.section("SCENARIO 2: Undo and redo");
    remote.execute_command(Box::new(TvOnCommand(living_room_tv.clone())), out);
    remote.execute_command(Box::new(TvVolumeCommand::new(living_room_tv.clone(), 25)), out);
    remote.execute_command(Box::new(TvChannelCommand::new(living_room_tv.clone(), 5)), out);
    remote.show_history(out);
    remote.undo(out);
    remote.undo(out);
    remote.redo(out);
    remote.show_history(out);

    out.section("SCENARIO 3: Macro command - Movie mode");
    let movie_mode = MacroCommand::new(vec![
        Box::new(LightOffCommand(living_room_light.clone())),
        Box::new(FanSpeedCommand::new(living_room_fan.clone(), 2)),
        Box::new(TvOnCommand(living_room_tv.clone())),
        Box::new(TvVolumeCommand::new(living_room_tv.clone(), 30)),
        Box::new(TvChannelCommand::new(living_room_tv.clone(), 10)),
    ]);
    remote.execute_command(Box::new(movie_mode), out);
    remote.undo(out);

    out.section("SCENARIO 4: Macro command - Good night mode");
    let good_night_mode = MacroCommand::new(vec![
        Box::new(LightOffCommand(living_room_light)),
        Box::new(LightOffCommand(bedroom_light)),
        Box::new(FanOffCommand::new(living_room_fan)),
        Box::new(TvOffCommand(living_room_tv)),
        Box::new(AcOnCommand(bedroom_ac.clone())),
        Box::new(AcTemperatureCommand::new(bedroom_ac, 24)),
    ]);
    remote.execute_command(Box::new(good_night_mode), out);
    remote.show_history(out);
    Ok(())
}

pub fn run_violated(out: &mut Transcript) -> Result<()> {
    out.banner("SMART HOME REMOTE - WITHOUT COMMAND PATTERN");

    let mut remote = violated::RemoteControl::new();
    remote.add_device("living_light", violated::Device::Light(Light::new("Living Room")));
    remote.add_device("bedroom_light", violated::Device::Light(Light::new("Bedroom")));
    remote.add_device("living_fan", violated::Device::Fan(Fan::new("Living Room")));
    remote.add_device("bedroom_ac", violated::Device::Ac(AirConditioner::new("Bedroom")));
    remote.add_device("living_tv", violated::Device::Tv(Television::new("Living Room")));

    out.section("SCENARIO 1: Basic operations");
    remote.execute_operation("living_light", "on", None, out);
    remote.execute_operation("living_fan", "on", Some(4), out);
    remote.execute_operation("bedroom_ac", "on", None, out);
    remote.execute_operation("bedroom_ac", "set_temp", Some(22), out);

    out.section("SCENARIO 2: Undo (fragile)");
    remote.execute_operation("living_tv", "on", None, out);
    remote.execute_operation("living_tv", "volume", Some(25), out);
    remote.undo(out);

    out.section("SCENARIO 3: Multiple operations");
    remote.execute_operation("living_fan", "speed_up", None, out);
    remote.execute_operation("living_fan", "speed_up", None, out);
    remote.execute_operation("living_tv", "channel", Some(5), out);
    remote.undo(out);
    remote.undo(out);
    Ok(())
}

pub mod violated {
    use std::collections::HashMap;

    use super::{AirConditioner, Fan, Light, Television};
    use crate::domain::model::Transcript;

    pub enum Device {
        Light(Light),
        Fan(Fan),
        Ac(AirConditioner),
        Tv(Television),
    }

    type Operation = (String, String, Option<i32>);

    /// 遙控器得認識每種裝置與每個操作字串，且只記得最後一步
    #[derive(Default)]
    pub struct RemoteControl {
        devices: HashMap<String, Device>,
        last_operation: Option<Operation>,
    }

    impl RemoteControl {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_device(&mut self, name: &str, device: Device) {
            self.devices.insert(name.to_string(), device);
        }

        pub fn device(&self, name: &str) -> Option<&Device> {
            self.devices.get(name)
        }

        pub fn execute_operation(
            &mut self,
            device_name: &str,
            operation: &str,
            arg: Option<i32>,
            out: &mut Transcript,
        ) {
            let Some(device) = self.devices.get_mut(device_name) else {
                out.line(format!("Device '{}' not found", device_name));
                return;
            };

            let inverse = |op: &str, arg: Option<i32>| {
                Some((device_name.to_string(), op.to_string(), arg))
            };

            let undo = match (device, operation) {
                (Device::Light(light), "on") => {
                    light.turn_on(out);
                    inverse("off", None)
                }
                (Device::Light(light), "off") => {
                    light.turn_off(out);
                    inverse("on", None)
                }
                (Device::Fan(fan), "on") => {
                    let speed = arg.map(|s| s.clamp(0, 5) as u8).unwrap_or(Fan::DEFAULT_SPEED);
                    fan.turn_on(speed, out);
                    inverse("off", None)
                }
                (Device::Fan(fan), "off") => {
                    fan.turn_off(out);
                    inverse("on", None)
                }
                (Device::Fan(fan), "speed_up") => {
                    if fan.speed < 5 {
                        fan.speed += 1;
                        out.line(format!("{} fan speed increased to {}", fan.location, fan.speed));
                    } else {
                        out.line(format!("{} fan already at max speed", fan.location));
                    }
                    inverse("speed_down", None)
                }
                (Device::Fan(fan), "speed_down") => {
                    if fan.speed > 0 {
                        fan.speed -= 1;
                        out.line(format!("{} fan speed decreased to {}", fan.location, fan.speed));
                    } else {
                        out.line(format!("{} fan already OFF", fan.location));
                    }
                    inverse("speed_up", None)
                }
                (Device::Ac(ac), "on") => {
                    ac.turn_on(out);
                    inverse("off", None)
                }
                (Device::Ac(ac), "off") => {
                    ac.turn_off(out);
                    inverse("on", None)
                }
                (Device::Ac(ac), "set_temp") => {
                    let old = ac.set_temperature(arg.unwrap_or(ac.temperature), out);
                    inverse("set_temp", Some(old))
                }
                (Device::Tv(tv), "on") => {
                    tv.turn_on(out);
                    inverse("off", None)
                }
                (Device::Tv(tv), "off") => {
                    tv.turn_off(out);
                    inverse("on", None)
                }
                (Device::Tv(tv), "volume") => {
                    let volume = arg.map(|v| v.max(0) as u32).unwrap_or(tv.volume);
                    let old = tv.set_volume(volume, out);
                    inverse("volume", Some(old as i32))
                }
                (Device::Tv(tv), "channel") => {
                    let channel = arg.map(|c| c.max(0) as u32).unwrap_or(tv.channel);
                    let old = tv.set_channel(channel, out);
                    inverse("channel", Some(old as i32))
                }
                (Device::Light(_), _) => {
                    out.line("Invalid operation for Light");
                    None
                }
                (Device::Fan(_), _) => {
                    out.line("Invalid operation for Fan");
                    None
                }
                (Device::Ac(_), _) => {
                    out.line("Invalid operation for AC");
                    None
                }
                (Device::Tv(_), _) => {
                    out.line("Invalid operation for TV");
                    None
                }
            };

            if undo.is_some() {
                self.last_operation = undo;
            }
        }

        /// 只能復原一步，之後就什麼都不記得
        pub fn undo(&mut self, out: &mut Transcript) -> bool {
            let Some((device_name, operation, arg)) = self.last_operation.take() else {
                out.line("Nothing to undo");
                return false;
            };

            out.section("[Undo] Attempting last operation");
            self.execute_operation(&device_name, &operation, arg, out);
            self.last_operation = None;
            true
        }
    }
}
