//! Facade pattern: one smart-home entry point over seven subsystems.

use std::fmt;

use serde::Serialize;

use crate::domain::model::Transcript;
use crate::utils::error::Result;

#[derive(Debug, Default)]
pub struct SecuritySystem {
    armed: bool,
    panic: bool,
}

impl SecuritySystem {
    pub fn arm_system(&mut self, out: &mut Transcript) {
        out.line("SecuritySystem: arming system");
        out.line(" - checking sensors");
        out.line(" - activating motion detectors");
        out.line(" - enabling door and window sensors");
        out.line(" - system armed");
        self.armed = true;
    }

    pub fn disarm_system(&mut self, out: &mut Transcript) {
        out.line("SecuritySystem: disarming system");
        out.line(" - motion detectors off");
        out.line(" - alarm disabled");
        out.line(" - system disarmed");
        self.armed = false;
        self.panic = false;
    }

    pub fn set_panic_mode(&mut self, out: &mut Transcript) {
        out.line("SecuritySystem: PANIC MODE activated");
        self.panic = true;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn is_panicking(&self) -> bool {
        self.panic
    }
}

#[derive(Debug)]
pub struct LightingSystem {
    on: bool,
    brightness: u8,
    mood: Option<String>,
}

impl Default for LightingSystem {
    fn default() -> Self {
        Self {
            on: false,
            brightness: 100,
            mood: None,
        }
    }
}

impl LightingSystem {
    pub fn turn_on_all_lights(&mut self, out: &mut Transcript) {
        out.line("LightingSystem: turning ON all lights");
        out.line(" - all rooms ON");
        self.on = true;
    }

    pub fn turn_off_all_lights(&mut self, out: &mut Transcript) {
        out.line("LightingSystem: turning OFF all lights");
        out.line(" - all rooms OFF");
        self.on = false;
        self.mood = None;
    }

    pub fn set_mood_lighting(&mut self, mood: &str, out: &mut Transcript) {
        out.line(format!("LightingSystem: setting mood = {}", mood));
        out.line(" - brightness and color adjusted");
        self.on = true;
        self.mood = Some(mood.to_string());
    }

    pub fn set_brightness(&mut self, level: u8, out: &mut Transcript) {
        let level = level.min(100);
        out.line(format!("LightingSystem: brightness set to {}%", level));
        self.brightness = level;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn mood(&self) -> Option<&str> {
        self.mood.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClimateMode {
    Off,
    Auto,
    Cooling,
    Heating,
    Eco,
}

#[derive(Debug)]
pub struct ClimateControl {
    mode: ClimateMode,
    temperature: i32,
}

impl Default for ClimateControl {
    fn default() -> Self {
        Self {
            mode: ClimateMode::Off,
            temperature: 24,
        }
    }
}

impl ClimateControl {
    pub fn set_temperature(&mut self, celsius: i32, out: &mut Transcript) {
        out.line(format!("ClimateControl: temperature set to {}C", celsius));
        out.line(" - thermostat adjusted");
        self.temperature = celsius;
        if self.mode == ClimateMode::Off {
            self.mode = ClimateMode::Auto;
        }
    }

    pub fn turn_on_ac(&mut self, out: &mut Transcript) {
        out.line("ClimateControl: AC ON");
        self.mode = ClimateMode::Cooling;
    }

    pub fn turn_on_heating(&mut self, out: &mut Transcript) {
        out.line("ClimateControl: heating ON");
        self.mode = ClimateMode::Heating;
    }

    pub fn turn_off_climate_control(&mut self, out: &mut Transcript) {
        out.line("ClimateControl: system OFF");
        self.mode = ClimateMode::Off;
    }

    pub fn set_eco_mode(&mut self, out: &mut Transcript) {
        out.line("ClimateControl: eco mode enabled");
        self.mode = ClimateMode::Eco;
    }

    pub fn mode(&self) -> ClimateMode {
        self.mode
    }

    pub fn temperature(&self) -> i32 {
        self.temperature
    }
}

#[derive(Debug, Default)]
pub struct EntertainmentSystem {
    tv_on: bool,
    sound_on: bool,
    volume: u8,
    streaming: Option<String>,
}

impl EntertainmentSystem {
    pub fn turn_on_tv(&mut self, out: &mut Transcript) {
        out.line("EntertainmentSystem: TV ON");
        self.tv_on = true;
    }

    pub fn turn_off_tv(&mut self, out: &mut Transcript) {
        out.line("EntertainmentSystem: TV OFF");
        self.tv_on = false;
        self.streaming = None;
    }

    pub fn set_volume(&mut self, level: u8, out: &mut Transcript) {
        out.line(format!("EntertainmentSystem: volume set to {}", level));
        self.volume = level;
    }

    pub fn start_streaming(&mut self, service: &str, out: &mut Transcript) {
        out.line(format!("EntertainmentSystem: starting {}", service));
        out.line(" - ready to stream");
        self.streaming = Some(service.to_string());
    }

    pub fn turn_on_sound_system(&mut self, out: &mut Transcript) {
        out.line("EntertainmentSystem: sound system ON");
        self.sound_on = true;
    }

    pub fn turn_off_sound_system(&mut self, out: &mut Transcript) {
        out.line("EntertainmentSystem: sound system OFF");
        self.sound_on = false;
    }

    pub fn is_tv_on(&self) -> bool {
        self.tv_on
    }

    pub fn is_sound_on(&self) -> bool {
        self.sound_on
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn streaming(&self) -> Option<&str> {
        self.streaming.as_deref()
    }
}

/// 百分比：0 全關、100 全開
#[derive(Debug, Default)]
pub struct WindowBlinds {
    position: u8,
}

impl WindowBlinds {
    pub fn open_all_blinds(&mut self, out: &mut Transcript) {
        out.line("WindowBlinds: opening all blinds");
        self.position = 100;
    }

    pub fn close_all_blinds(&mut self, out: &mut Transcript) {
        out.line("WindowBlinds: closing all blinds");
        self.position = 0;
    }

    pub fn set_position(&mut self, position: u8, out: &mut Transcript) {
        let position = position.min(100);
        out.line(format!("WindowBlinds: position set to {}%", position));
        self.position = position;
    }

    pub fn position(&self) -> u8 {
        self.position
    }
}

#[derive(Debug, Default)]
pub struct DoorLocks {
    locked: bool,
}

impl DoorLocks {
    pub fn lock_all_doors(&mut self, out: &mut Transcript) {
        out.line("DoorLocks: locking all doors");
        out.line(" - all doors LOCKED");
        self.locked = true;
    }

    pub fn unlock_all_doors(&mut self, out: &mut Transcript) {
        out.line("DoorLocks: unlocking all doors");
        out.line(" - all doors UNLOCKED");
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

#[derive(Debug, Default)]
pub struct GarageDoor {
    open: bool,
}

impl GarageDoor {
    pub fn open_garage(&mut self, out: &mut Transcript) {
        out.line("GarageDoor: opening garage");
        out.line(" - garage open");
        self.open = true;
    }

    pub fn close_garage(&mut self, out: &mut Transcript) {
        out.line("GarageDoor: closing garage");
        out.line(" - garage closed");
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HomeMode {
    LeaveHome,
    ArriveHome,
    MovieNight,
    Sleep,
    Party,
    Vacation,
    Emergency,
}

impl HomeMode {
    pub const ALL: [HomeMode; 7] = [
        HomeMode::LeaveHome,
        HomeMode::ArriveHome,
        HomeMode::MovieNight,
        HomeMode::Sleep,
        HomeMode::Party,
        HomeMode::Vacation,
        HomeMode::Emergency,
    ];

    pub fn scenario(&self) -> &'static str {
        match self {
            HomeMode::LeaveHome => "Leaving home",
            HomeMode::ArriveHome => "Arriving home",
            HomeMode::MovieNight => "Movie night",
            HomeMode::Sleep => "Sleep mode",
            HomeMode::Party => "Party mode",
            HomeMode::Vacation => "Vacation mode",
            HomeMode::Emergency => "Emergency",
        }
    }
}

impl fmt::Display for HomeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scenario())
    }
}

/// 各子系統的狀態快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeStatus {
    pub armed: bool,
    pub lights_on: bool,
    pub brightness: u8,
    pub climate: ClimateMode,
    pub temperature: i32,
    pub tv_on: bool,
    pub sound_on: bool,
    pub blinds_position: u8,
    pub doors_locked: bool,
    pub garage_open: bool,
}

#[derive(Debug, Default)]
pub struct SmartHomeFacade {
    security: SecuritySystem,
    lights: LightingSystem,
    climate: ClimateControl,
    entertainment: EntertainmentSystem,
    blinds: WindowBlinds,
    locks: DoorLocks,
    garage: GarageDoor,
}

impl SmartHomeFacade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate(&mut self, mode: HomeMode, out: &mut Transcript) {
        tracing::debug!("Activating home mode: {}", mode);
        match mode {
            HomeMode::LeaveHome => self.leave_home(out),
            HomeMode::ArriveHome => self.arrive_home(out),
            HomeMode::MovieNight => self.movie_night(out),
            HomeMode::Sleep => self.sleep_mode(out),
            HomeMode::Party => self.party_mode(out),
            HomeMode::Vacation => self.vacation_mode(out),
            HomeMode::Emergency => self.emergency_mode(out),
        }
    }

    fn begin(out: &mut Transcript, title: &str) {
        out.section(format!("[Facade] {}", title));
        out.rule('-', 50);
    }

    fn finish(out: &mut Transcript, summary: &str) {
        out.rule('-', 50);
        out.line(format!("[Facade] {}", summary));
    }

    pub fn leave_home(&mut self, out: &mut Transcript) {
        Self::begin(out, "Leaving home sequence started");
        self.entertainment.turn_off_tv(out);
        self.entertainment.turn_off_sound_system(out);
        self.lights.turn_off_all_lights(out);
        self.climate.turn_off_climate_control(out);
        self.blinds.close_all_blinds(out);
        self.locks.lock_all_doors(out);
        self.security.arm_system(out);
        self.garage.open_garage(out);
        Self::finish(out, "Home ready for departure");
    }

    pub fn arrive_home(&mut self, out: &mut Transcript) {
        Self::begin(out, "Arriving home sequence started");
        self.garage.close_garage(out);
        self.security.disarm_system(out);
        self.locks.unlock_all_doors(out);
        self.lights.turn_on_all_lights(out);
        self.lights.set_brightness(70, out);
        self.climate.set_temperature(22, out);
        self.blinds.open_all_blinds(out);
        Self::finish(out, "Home ready for use");
    }

    pub fn movie_night(&mut self, out: &mut Transcript) {
        Self::begin(out, "Movie night setup started");
        self.lights.set_mood_lighting("cinema", out);
        self.lights.set_brightness(20, out);
        self.blinds.close_all_blinds(out);
        self.climate.set_temperature(21, out);
        self.entertainment.turn_on_tv(out);
        self.entertainment.turn_on_sound_system(out);
        self.entertainment.set_volume(60, out);
        self.entertainment.start_streaming("Netflix", out);
        Self::finish(out, "Movie night ready");
    }

    pub fn sleep_mode(&mut self, out: &mut Transcript) {
        Self::begin(out, "Sleep mode started");
        self.entertainment.turn_off_tv(out);
        self.entertainment.turn_off_sound_system(out);
        self.lights.turn_off_all_lights(out);
        self.climate.set_temperature(20, out);
        self.blinds.close_all_blinds(out);
        self.locks.lock_all_doors(out);
        self.security.arm_system(out);
        Self::finish(out, "Sleep mode active");
    }

    pub fn party_mode(&mut self, out: &mut Transcript) {
        Self::begin(out, "Party mode started");
        self.lights.set_mood_lighting("party", out);
        self.lights.set_brightness(80, out);
        self.climate.set_temperature(21, out);
        self.entertainment.turn_on_sound_system(out);
        self.entertainment.set_volume(75, out);
        self.security.disarm_system(out);
        Self::finish(out, "Party mode active");
    }

    pub fn vacation_mode(&mut self, out: &mut Transcript) {
        Self::begin(out, "Vacation mode started");
        self.lights.turn_off_all_lights(out);
        self.entertainment.turn_off_tv(out);
        self.entertainment.turn_off_sound_system(out);
        self.climate.set_eco_mode(out);
        self.blinds.close_all_blinds(out);
        self.locks.lock_all_doors(out);
        self.security.arm_system(out);
        Self::finish(out, "Home secured for vacation");
    }

    pub fn emergency_mode(&mut self, out: &mut Transcript) {
        Self::begin(out, "EMERGENCY mode started");
        self.security.set_panic_mode(out);
        self.lights.turn_on_all_lights(out);
        self.locks.unlock_all_doors(out);
        Self::finish(out, "Emergency handling active");
    }

    pub fn lighting(&mut self) -> &mut LightingSystem {
        &mut self.lights
    }

    pub fn climate(&mut self) -> &mut ClimateControl {
        &mut self.climate
    }

    pub fn security(&mut self) -> &mut SecuritySystem {
        &mut self.security
    }

    pub fn status(&self) -> HomeStatus {
        HomeStatus {
            armed: self.security.is_armed(),
            lights_on: self.lights.is_on(),
            brightness: self.lights.brightness(),
            climate: self.climate.mode(),
            temperature: self.climate.temperature(),
            tv_on: self.entertainment.is_tv_on(),
            sound_on: self.entertainment.is_sound_on(),
            blinds_position: self.blinds.position(),
            doors_locked: self.locks.is_locked(),
            garage_open: self.garage.is_open(),
        }
    }
}

pub fn run_followed(out: &mut Transcript) -> Result<()> {
    out.banner("SMART HOME SYSTEM - WITH FACADE PATTERN");

    let mut smart_home = SmartHomeFacade::new();
    for mode in HomeMode::ALL {
        out.section(format!("SCENARIO: {}", mode));
        smart_home.activate(mode, out);
    }

    out.section("Advanced usage: direct lighting access");
    smart_home.lighting().set_brightness(50, out);
    out.line(format!(
        "Final status: {}",
        serde_json::to_string(&smart_home.status())?
    ));
    Ok(())
}

pub fn run_violated(out: &mut Transcript) -> Result<()> {
    out.banner("SMART HOME SYSTEM - WITHOUT FACADE PATTERN");
    violated::leaving_home_scenario(out);
    violated::arriving_home_scenario(out);
    violated::movie_night_scenario(out);
    Ok(())
}

/// 客戶端自己建立並逐一呼叫每個子系統
pub mod violated {
    use super::{
        ClimateControl, DoorLocks, EntertainmentSystem, GarageDoor, LightingSystem,
        SecuritySystem, WindowBlinds,
    };
    use crate::domain::model::Transcript;

    fn step(out: &mut Transcript, number: u32, title: &str) {
        out.section(format!("[{}] {}", number, title));
    }

    pub fn leaving_home_scenario(out: &mut Transcript) -> usize {
        out.blank();
        out.banner("LEAVING HOME - manual flow");

        let mut security = SecuritySystem::default();
        let mut lights = LightingSystem::default();
        let mut climate = ClimateControl::default();
        let mut entertainment = EntertainmentSystem::default();
        let mut blinds = WindowBlinds::default();
        let mut locks = DoorLocks::default();
        let mut garage = GarageDoor::default();

        step(out, 1, "Turning off entertainment");
        entertainment.turn_off_tv(out);
        entertainment.turn_off_sound_system(out);
        step(out, 2, "Turning off lights");
        lights.turn_off_all_lights(out);
        step(out, 3, "Turning off climate control");
        climate.turn_off_climate_control(out);
        step(out, 4, "Closing blinds");
        blinds.close_all_blinds(out);
        step(out, 5, "Locking doors");
        locks.lock_all_doors(out);
        step(out, 6, "Arming security system");
        security.arm_system(out);
        step(out, 7, "Opening garage");
        garage.open_garage(out);

        out.section("NOTE: Too many subsystems involved for a simple task");
        7
    }

    pub fn arriving_home_scenario(out: &mut Transcript) -> usize {
        out.blank();
        out.banner("ARRIVING HOME - manual flow");

        let mut security = SecuritySystem::default();
        let mut lights = LightingSystem::default();
        let mut climate = ClimateControl::default();
        let mut blinds = WindowBlinds::default();
        let mut locks = DoorLocks::default();
        let mut garage = GarageDoor::default();

        step(out, 1, "Closing garage");
        garage.close_garage(out);
        step(out, 2, "Disarming security");
        security.disarm_system(out);
        step(out, 3, "Unlocking doors");
        locks.unlock_all_doors(out);
        step(out, 4, "Turning on lights");
        lights.turn_on_all_lights(out);
        lights.set_brightness(70, out);
        step(out, 5, "Setting temperature");
        climate.set_temperature(22, out);
        step(out, 6, "Opening blinds");
        blinds.open_all_blinds(out);

        out.section("NOTE: Client must remember full sequence");
        6
    }

    pub fn movie_night_scenario(out: &mut Transcript) -> usize {
        out.blank();
        out.banner("MOVIE NIGHT MODE - manual flow");

        let mut lights = LightingSystem::default();
        let mut climate = ClimateControl::default();
        let mut entertainment = EntertainmentSystem::default();
        let mut blinds = WindowBlinds::default();

        step(out, 1, "Setting lighting");
        lights.set_mood_lighting("cinema", out);
        lights.set_brightness(20, out);
        step(out, 2, "Closing blinds");
        blinds.close_all_blinds(out);
        step(out, 3, "Setting temperature");
        climate.set_temperature(21, out);
        step(out, 4, "Starting entertainment");
        entertainment.turn_on_tv(out);
        entertainment.turn_on_sound_system(out);
        entertainment.set_volume(60, out);
        entertainment.start_streaming("Netflix", out);

        out.section("NOTE: Too many calls just to watch a movie");
        4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leave_home_secures_the_house() {
        let mut home = SmartHomeFacade::new();
        let mut out = Transcript::new();
        home.arrive_home(&mut out);
        home.leave_home(&mut out);

        let status = home.status();
        assert!(status.armed);
        assert!(status.doors_locked);
        assert!(status.garage_open);
        assert!(!status.lights_on);
        assert_eq!(status.climate, ClimateMode::Off);
        assert_eq!(status.blinds_position, 0);
        assert!(out.contains("[Facade] Home ready for departure"));
    }

    #[test]
    fn test_movie_night_configures_entertainment() {
        let mut home = SmartHomeFacade::new();
        let mut out = Transcript::new();
        home.activate(HomeMode::MovieNight, &mut out);

        assert_eq!(home.lighting().mood(), Some("cinema"));
        assert_eq!(home.lighting().brightness(), 20);
        assert_eq!(home.climate().temperature(), 21);
        assert!(home.status().tv_on);
        assert!(out.contains("EntertainmentSystem: starting Netflix"));
    }

    #[test]
    fn test_vacation_uses_eco_climate_and_emergency_unlocks() {
        let mut home = SmartHomeFacade::new();
        let mut out = Transcript::new();
        home.activate(HomeMode::Vacation, &mut out);
        assert_eq!(home.status().climate, ClimateMode::Eco);
        assert!(home.status().doors_locked);

        home.activate(HomeMode::Emergency, &mut out);
        assert!(home.security().is_panicking());
        assert!(!home.status().doors_locked);
        assert!(home.status().lights_on);
    }

    #[test]
    fn test_every_mode_runs_through_activate() {
        let mut home = SmartHomeFacade::new();
        let mut out = Transcript::new();
        for mode in HomeMode::ALL {
            home.activate(mode, &mut out);
        }
        assert_eq!(out.count_matching("[Facade]"), 14);
    }

    #[test]
    fn test_direct_subsystem_access_clamps_brightness() {
        let mut home = SmartHomeFacade::new();
        let mut out = Transcript::new();
        home.lighting().set_brightness(150, &mut out);
        assert_eq!(home.status().brightness, 100);
    }

    #[test]
    fn test_violated_client_walks_every_step() {
        let mut out = Transcript::new();
        assert_eq!(violated::leaving_home_scenario(&mut out), 7);
        assert!(out.contains("[7] Opening garage"));
        assert!(out.contains("NOTE: Too many subsystems involved"));
    }
}
