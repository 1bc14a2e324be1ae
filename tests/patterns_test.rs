use lld_patterns::patterns::behavioral::command::{
    shared, Light, LightOffCommand, LightOnCommand, RemoteControl,
};
use lld_patterns::patterns::behavioral::observer::{
    PhoneDisplay, StatisticsDisplay, WeatherStation,
};
use lld_patterns::patterns::behavioral::state::{StateKind, VendingMachine, ITEM_PRICE};
use lld_patterns::patterns::behavioral::strategy::{
    BankTransferPayment, CreditCardPayment, CryptocurrencyPayment, GooglePayPayment,
    PayPalPayment, PaymentStrategy,
};
use lld_patterns::patterns::creational::factory::{factory_for, Application};
use lld_patterns::patterns::creational::singleton::{thread_safety_check, DatabaseConnection};
use lld_patterns::patterns::structural::adapter::{EcommerceApp, StripeAdapter};
use lld_patterns::patterns::structural::decorator::{
    customize_coffee, Caramel, Coffee, Milk, SimpleCoffee,
};
use lld_patterns::patterns::structural::facade::{HomeMode, SmartHomeFacade};
use lld_patterns::{PatternError, Transcript};

#[test]
fn test_every_strategy_charges_its_documented_fee() {
    let cases: [(Box<dyn PaymentStrategy>, f64); 5] = [
        (Box::new(CreditCardPayment), 3.0),
        (Box::new(PayPalPayment), 4.0),
        (Box::new(BankTransferPayment), 2.0),
        (Box::new(CryptocurrencyPayment), 1.0),
        (Box::new(GooglePayPayment), 2.0),
    ];

    for (strategy, fee) in cases {
        let mut out = Transcript::new();
        let receipt = strategy.pay(100.0, &mut out);
        assert!(receipt.success);
        assert!((receipt.fee - fee).abs() < 1e-9, "{}", receipt.method);
        assert!((receipt.total - (100.0 + fee)).abs() < 1e-9);
    }
}

#[test]
fn test_vending_machine_sells_until_out_of_stock() {
    let mut out = Transcript::new();
    let mut machine = VendingMachine::new(1);

    assert!(machine.insert_money(ITEM_PRICE, &mut out));
    assert!(machine.dispense(&mut out));
    assert_eq!(machine.item_count(), 0);
    assert_eq!(machine.state(), StateKind::OutOfStock);

    assert!(!machine.insert_money(ITEM_PRICE, &mut out));
    assert!(machine.refill(2, &mut out));
    assert_eq!(machine.state(), StateKind::Idle);
    assert_eq!(machine.inserted_money(), 0);
}

#[test]
fn test_removed_observer_stops_receiving_updates() {
    let mut out = Transcript::new();
    let mut station = WeatherStation::new();
    let phone = station.register_observer(Box::new(PhoneDisplay::new("Alice")));
    station.register_observer(Box::new(StatisticsDisplay::new()));

    station.set_measurements(25.0, 65.0, 1013.0, &mut out);
    let before = out.count_matching("Alice");
    assert!(before > 0);

    assert!(station.remove_observer(phone));
    assert!(!station.remove_observer(phone));
    station.set_measurements(30.0, 70.0, 1010.0, &mut out);
    assert_eq!(out.count_matching("Alice"), before);
    assert_eq!(station.observer_count(), 1);
}

#[test]
fn test_remote_undo_and_redo_restore_light() {
    let mut out = Transcript::new();
    let light = shared(Light::new("Living Room"));
    let mut remote = RemoteControl::new();

    remote.execute_command(Box::new(LightOnCommand(light.clone())), &mut out);
    remote.execute_command(Box::new(LightOffCommand(light.clone())), &mut out);
    assert!(!light.borrow().is_on);

    assert!(remote.undo(&mut out));
    assert!(light.borrow().is_on);
    assert!(remote.redo(&mut out));
    assert!(!light.borrow().is_on);
}

#[test]
fn test_singleton_is_shared_across_threads() {
    let mut out = Transcript::new();
    assert_eq!(thread_safety_check(&mut out), 1);
    assert!(std::ptr::eq(
        DatabaseConnection::instance(),
        DatabaseConnection::instance()
    ));
}

#[test]
fn test_abstract_factory_rejects_unknown_platform() {
    assert!(matches!(
        factory_for("Solaris"),
        Err(PatternError::UnsupportedPlatform { .. })
    ));

    let mut out = Transcript::new();
    let mut app = Application::new(factory_for("windows").unwrap());
    assert!(matches!(app.render(&mut out), Err(PatternError::UiNotCreated)));
    app.create_ui(&mut out);
    app.render(&mut out).unwrap();
    assert!(out.contains("[ Submit ] (Windows Look)"));
}

#[test]
fn test_decorators_compose_statically_and_at_runtime() {
    let fixed = Caramel(Milk(SimpleCoffee));
    let dynamic = customize_coffee(Box::new(SimpleCoffee), &["milk", "caramel"]);
    assert_eq!(fixed.description(), dynamic.description());
    assert_eq!(fixed.cost(), 80.0);
    assert_eq!(dynamic.cost(), 80.0);
}

#[test]
fn test_facade_sleep_mode_secures_home() {
    let mut out = Transcript::new();
    let mut home = SmartHomeFacade::new();
    home.activate(HomeMode::Party, &mut out);
    home.activate(HomeMode::Sleep, &mut out);

    let status = home.status();
    assert!(status.armed);
    assert!(status.doors_locked);
    assert!(!status.lights_on);
    assert_eq!(status.temperature, 20);
}

#[test]
fn test_stripe_checkout_reports_units_not_cents() {
    let mut out = Transcript::new();
    let result =
        EcommerceApp::new(Box::new(StripeAdapter::default())).checkout(12.34, "USD", "x@y.z", &mut out);
    assert_eq!(result.amount, 12.34);
    assert!(out.contains("Charging 1234 cents (USD)"));
}
