//! Observer pattern: a weather station pushing measurements to displays.

use crate::domain::model::Transcript;
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measurements {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
}

impl Measurements {
    pub fn new(temperature: f64, humidity: f64, pressure: f64) -> Self {
        Self {
            temperature,
            humidity,
            pressure,
        }
    }
}

pub trait Observer {
    fn update(&mut self, data: &Measurements, out: &mut Transcript);
}

/// 註冊時取得的 handle，用來移除觀察者
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

#[derive(Default)]
pub struct WeatherStation {
    observers: Vec<(ObserverId, Box<dyn Observer>)>,
    next_id: u64,
    measurements: Measurements,
}

impl WeatherStation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_observer(&mut self, observer: Box<dyn Observer>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// 回傳是否真的移除了觀察者
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(registered, _)| *registered != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn notify_observers(&mut self, out: &mut Transcript) {
        let data = self.measurements;
        for (_, observer) in self.observers.iter_mut() {
            observer.update(&data, out);
        }
    }

    pub fn set_measurements(
        &mut self,
        temperature: f64,
        humidity: f64,
        pressure: f64,
        out: &mut Transcript,
    ) {
        out.blank();
        out.rule('=', 60);
        out.line("Weather Station: New measurements");
        out.rule('=', 60);
        out.line(format!("Temperature: {}°C", temperature));
        out.line(format!("Humidity: {}%", humidity));
        out.line(format!("Pressure: {} hPa", pressure));

        self.measurements = Measurements::new(temperature, humidity, pressure);
        self.notify_observers(out);
    }

    pub fn temperature(&self) -> f64 {
        self.measurements.temperature
    }

    pub fn humidity(&self) -> f64 {
        self.measurements.humidity
    }

    pub fn pressure(&self) -> f64 {
        self.measurements.pressure
    }
}

pub struct PhoneDisplay {
    name: String,
}

impl PhoneDisplay {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Observer for PhoneDisplay {
    fn update(&mut self, data: &Measurements, out: &mut Transcript) {
        out.section(format!("{} Phone Display", self.name));
        out.line(format!(
            "Temp: {}°C, Humidity: {}%",
            data.temperature, data.humidity
        ));
    }
}

pub struct TvDisplay;

impl Observer for TvDisplay {
    fn update(&mut self, data: &Measurements, out: &mut Transcript) {
        out.section("TV Display");
        out.line(format!("Temp: {}°C", data.temperature));
        out.line(format!("Humidity: {}%", data.humidity));
        out.line(format!("Pressure: {} hPa", data.pressure));
    }
}

pub struct WindowDisplay;

impl Observer for WindowDisplay {
    fn update(&mut self, data: &Measurements, out: &mut Transcript) {
        out.section("Window Display");
        out.line(format!(
            "Temp: {}°C | Humidity: {}%",
            data.temperature, data.humidity
        ));
    }
}

pub struct WebsiteDisplay;

impl Observer for WebsiteDisplay {
    fn update(&mut self, data: &Measurements, out: &mut Transcript) {
        out.section("Website Display");
        out.line(format!("{}°C, {}% humidity", data.temperature, data.humidity));
    }
}

#[derive(Debug, Default)]
pub struct StatisticsDisplay {
    temps: Vec<f64>,
}

impl StatisticsDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn average(&self) -> Option<f64> {
        if self.temps.is_empty() {
            return None;
        }
        Some(self.temps.iter().sum::<f64>() / self.temps.len() as f64)
    }

    pub fn max(&self) -> Option<f64> {
        self.temps.iter().copied().reduce(f64::max)
    }

    pub fn min(&self) -> Option<f64> {
        self.temps.iter().copied().reduce(f64::min)
    }
}

impl Observer for StatisticsDisplay {
    fn update(&mut self, data: &Measurements, out: &mut Transcript) {
        self.temps.push(data.temperature);

        out.section("Statistics Display");
        if let (Some(avg), Some(max), Some(min)) = (self.average(), self.max(), self.min()) {
            out.line(format!("Avg: {:.1}°C, Max: {}°C, Min: {}°C", avg, max, min));
        }
    }
}

pub struct AlertSystem;

impl AlertSystem {
    pub const MAX_TEMPERATURE: f64 = 35.0;
    pub const MAX_HUMIDITY: f64 = 90.0;
    pub const MIN_PRESSURE: f64 = 1000.0;

    pub fn warnings(data: &Measurements) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if data.temperature > Self::MAX_TEMPERATURE {
            warnings.push("High temperature warning");
        }
        if data.humidity > Self::MAX_HUMIDITY {
            warnings.push("High humidity warning");
        }
        if data.pressure < Self::MIN_PRESSURE {
            warnings.push("Low pressure warning");
        }
        warnings
    }
}

impl Observer for AlertSystem {
    fn update(&mut self, data: &Measurements, out: &mut Transcript) {
        out.section("Alert System");

        let warnings = Self::warnings(data);
        if warnings.is_empty() {
            out.line("All conditions normal");
        }
        for warning in warnings {
            out.line(warning);
        }
    }
}

pub fn run_followed(out: &mut Transcript) -> Result<()> {
    let mut weather_station = WeatherStation::new();

    weather_station.register_observer(Box::new(PhoneDisplay::new("iPhone")));
    weather_station.register_observer(Box::new(TvDisplay));
    let window = weather_station.register_observer(Box::new(WindowDisplay));
    weather_station.register_observer(Box::new(StatisticsDisplay::new()));
    weather_station.register_observer(Box::new(AlertSystem));

    weather_station.set_measurements(25.0, 65.0, 1013.0, out);
    weather_station.set_measurements(28.0, 70.0, 1012.0, out);

    // 執行期間新增觀察者
    weather_station.register_observer(Box::new(WebsiteDisplay));
    weather_station.set_measurements(32.0, 75.0, 1010.0, out);

    weather_station.remove_observer(window);
    weather_station.set_measurements(36.0, 85.0, 998.0, out);
    Ok(())
}

pub fn run_violated(out: &mut Transcript) -> Result<()> {
    out.banner("WEATHER MONITORING SYSTEM - WITHOUT OBSERVER PATTERN");

    let mut weather_station = violated::WeatherStation::new();
    weather_station.register_displays(
        violated::PhoneDisplay,
        violated::TvDisplay,
        violated::WindowDisplay,
    );

    weather_station.set_measurements(25.0, 65.0, 1013.0, out);
    weather_station.set_measurements(28.0, 70.0, 1012.0, out);

    out.blank();
    out.banner("TRYING TO ADD NEW DISPLAY");
    out.line("ERROR: Cannot add website display without modifying WeatherStation");
    out.line("Must change set_measurements() method");
    out.line("Must add new display reference inside WeatherStation");
    Ok(())
}

pub mod violated {
    use crate::domain::model::Transcript;

    pub struct PhoneDisplay;

    impl PhoneDisplay {
        pub fn update(&self, temperature: f64, humidity: f64, pressure: f64, out: &mut Transcript) {
            out.section("Phone Display Updated:");
            out.line(format!("Temperature: {}°C", temperature));
            out.line(format!("Humidity: {}%", humidity));
            out.line(format!("Pressure: {} hPa", pressure));
        }
    }

    pub struct TvDisplay;

    impl TvDisplay {
        pub fn update(&self, temperature: f64, humidity: f64, pressure: f64, out: &mut Transcript) {
            out.section("TV Display Updated:");
            out.line(format!("Temp: {}°C", temperature));
            out.line(format!("Humidity: {}%", humidity));
            out.line(format!("Pressure: {} hPa", pressure));
        }
    }

    pub struct WindowDisplay;

    impl WindowDisplay {
        pub fn update(&self, temperature: f64, humidity: f64, _pressure: f64, out: &mut Transcript) {
            out.section("Window Display Updated:");
            out.line(format!(
                "Temperature: {}°C | Humidity: {}%",
                temperature, humidity
            ));
        }
    }

    /// 固定三個欄位，多一種顯示器就得改這個型別
    #[derive(Default)]
    pub struct WeatherStation {
        pub temperature: f64,
        pub humidity: f64,
        pub pressure: f64,
        phone_display: Option<PhoneDisplay>,
        tv_display: Option<TvDisplay>,
        window_display: Option<WindowDisplay>,
    }

    impl WeatherStation {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn register_displays(&mut self, phone: PhoneDisplay, tv: TvDisplay, window: WindowDisplay) {
            self.phone_display = Some(phone);
            self.tv_display = Some(tv);
            self.window_display = Some(window);
        }

        pub fn set_measurements(
            &mut self,
            temperature: f64,
            humidity: f64,
            pressure: f64,
            out: &mut Transcript,
        ) {
            out.blank();
            out.rule('=', 60);
            out.line("Weather Station: New measurements received");
            out.rule('=', 60);

            self.temperature = temperature;
            self.humidity = humidity;
            self.pressure = pressure;

            if let Some(phone) = &self.phone_display {
                phone.update(temperature, humidity, pressure, out);
            }
            if let Some(tv) = &self.tv_display {
                tv.update(temperature, humidity, pressure, out);
            }
            if let Some(window) = &self.window_display {
                window.update(temperature, humidity, pressure, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removed_observer_stops_receiving() {
        let mut out = Transcript::new();
        let mut station = WeatherStation::new();
        let window = station.register_observer(Box::new(WindowDisplay));
        station.register_observer(Box::new(TvDisplay));

        station.set_measurements(25.0, 65.0, 1013.0, &mut out);
        assert_eq!(out.count_matching("Window Display"), 1);

        assert!(station.remove_observer(window));
        assert!(!station.remove_observer(window));
        station.set_measurements(28.0, 70.0, 1012.0, &mut out);

        assert_eq!(out.count_matching("Window Display"), 1);
        assert_eq!(out.count_matching("TV Display"), 2);
        assert_eq!(station.observer_count(), 1);
    }

    #[test]
    fn test_observers_notified_in_registration_order() {
        let mut out = Transcript::new();
        let mut station = WeatherStation::new();
        station.register_observer(Box::new(PhoneDisplay::new("Pixel")));
        station.register_observer(Box::new(WebsiteDisplay));
        station.set_measurements(20.0, 50.0, 1005.0, &mut out);

        let phone = out.lines().iter().position(|l| l == "Pixel Phone Display");
        let website = out.lines().iter().position(|l| l == "Website Display");
        assert!(phone < website);
        assert_eq!(station.temperature(), 20.0);
        assert_eq!(station.pressure(), 1005.0);
    }

    #[test]
    fn test_statistics_track_avg_max_min() {
        let mut out = Transcript::new();
        let mut stats = StatisticsDisplay::new();
        assert_eq!(stats.average(), None);

        for t in [25.0, 28.0, 32.0] {
            stats.update(&Measurements::new(t, 60.0, 1010.0), &mut out);
        }

        assert!((stats.average().unwrap() - 85.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.max(), Some(32.0));
        assert_eq!(stats.min(), Some(25.0));
        assert!(out.contains("Avg: 28.3°C, Max: 32°C, Min: 25°C"));
    }

    #[test]
    fn test_alert_thresholds() {
        assert!(AlertSystem::warnings(&Measurements::new(35.0, 90.0, 1000.0)).is_empty());
        assert_eq!(
            AlertSystem::warnings(&Measurements::new(36.0, 85.0, 998.0)),
            vec!["High temperature warning", "Low pressure warning"]
        );
    }

    #[test]
    fn test_followed_scenario_drops_window_for_last_update() {
        let mut out = Transcript::new();
        run_followed(&mut out).unwrap();
        assert_eq!(out.count_matching("Window Display"), 3);
        assert_eq!(out.count_matching("Website Display"), 2);
        assert_eq!(out.count_matching("All conditions normal"), 3);
        assert!(out.contains("High temperature warning"));
    }
}
