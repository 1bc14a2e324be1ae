//! Decorator pattern: coffee add-ons wrapped around a base drink at runtime.

use crate::domain::model::Transcript;
use crate::utils::error::Result;

pub trait Coffee {
    fn description(&self) -> String;
    fn cost(&self) -> f64;
}

impl<C: Coffee + ?Sized> Coffee for Box<C> {
    fn description(&self) -> String {
        (**self).description()
    }

    fn cost(&self) -> f64 {
        (**self).cost()
    }
}

macro_rules! base_coffee {
    ($name:ident, $label:literal, $cost:literal) => {
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Coffee for $name {
            fn description(&self) -> String {
                $label.to_string()
            }

            fn cost(&self) -> f64 {
                $cost
            }
        }
    };
}

base_coffee!(SimpleCoffee, "Simple Coffee", 50.0);
base_coffee!(Espresso, "Espresso", 70.0);
base_coffee!(Cappuccino, "Cappuccino", 80.0);

/// 每個 topping 包住另一杯 coffee，描述加上 " + 名稱"，價格加上自己的價錢
macro_rules! topping {
    ($name:ident, $label:literal, $price:literal) => {
        #[derive(Debug, Clone)]
        pub struct $name<C>(pub C);

        impl<C: Coffee> $name<C> {
            pub const PRICE: f64 = $price;
        }

        impl<C: Coffee> Coffee for $name<C> {
            fn description(&self) -> String {
                format!("{} + {}", self.0.description(), $label)
            }

            fn cost(&self) -> f64 {
                self.0.cost() + $price
            }
        }
    };
}

topping!(Milk, "Milk", 10.0);
topping!(Sugar, "Sugar", 5.0);
topping!(WhippedCream, "Whipped Cream", 15.0);
topping!(Caramel, "Caramel", 20.0);
topping!(Vanilla, "Vanilla", 12.0);
topping!(Chocolate, "Chocolate", 18.0);
topping!(Cinnamon, "Cinnamon", 8.0);

/// 依名稱在執行期加上配料；不認得的名稱會被略過
pub fn customize_coffee(base: Box<dyn Coffee>, extras: &[&str]) -> Box<dyn Coffee> {
    extras.iter().fold(base, |coffee, extra| match *extra {
        "milk" => Box::new(Milk(coffee)),
        "sugar" => Box::new(Sugar(coffee)),
        "cream" => Box::new(WhippedCream(coffee)),
        "caramel" => Box::new(Caramel(coffee)),
        "vanilla" => Box::new(Vanilla(coffee)),
        "chocolate" => Box::new(Chocolate(coffee)),
        "cinnamon" => Box::new(Cinnamon(coffee)),
        unknown => {
            tracing::debug!("Ignoring unknown extra '{}'", unknown);
            coffee
        }
    })
}

pub fn display_coffee(title: &str, coffee: &dyn Coffee, out: &mut Transcript) {
    out.section(title);
    out.line(format!("Description : {}", coffee.description()));
    out.line(format!("Cost        : ₹{:.2}", coffee.cost()));
}

pub fn run_followed(out: &mut Transcript) -> Result<()> {
    out.banner("COFFEE SHOP - DECORATOR PATTERN");

    display_coffee("Order 1: Simple Coffee", &SimpleCoffee, out);
    display_coffee("Order 2: Coffee with Milk", &Milk(SimpleCoffee), out);
    display_coffee(
        "Order 3: Coffee with Milk and Sugar",
        &Sugar(Milk(SimpleCoffee)),
        out,
    );
    display_coffee(
        "Order 4: Coffee with Milk, Sugar, Cream, Caramel",
        &Caramel(WhippedCream(Sugar(Milk(SimpleCoffee)))),
        out,
    );
    display_coffee(
        "Order 5: Double Milk, Triple Sugar",
        &Sugar(Sugar(Sugar(Milk(Milk(SimpleCoffee))))),
        out,
    );

    display_coffee("Espresso with Milk", &Milk(Espresso), out);
    display_coffee(
        "Cappuccino with Vanilla and Chocolate",
        &Chocolate(Vanilla(Cappuccino)),
        out,
    );
    display_coffee(
        "Coffee with Milk and Cinnamon (New Add-on)",
        &Cinnamon(Milk(SimpleCoffee)),
        out,
    );

    out.blank();
    out.banner("RUNTIME CUSTOMIZATION");
    let orders: [(&str, Box<dyn Coffee>, &[&str]); 3] = [
        ("Custom Cappuccino", Box::new(Cappuccino), &["milk", "sugar"]),
        (
            "Custom Espresso",
            Box::new(Espresso),
            &["vanilla", "chocolate", "cream"],
        ),
        (
            "Custom Simple Coffee",
            Box::new(SimpleCoffee),
            &["caramel", "milk", "marshmallow"],
        ),
    ];
    for (title, base, extras) in orders {
        let coffee = customize_coffee(base, extras);
        display_coffee(title, coffee.as_ref(), out);
    }
    Ok(())
}

pub fn run_violated(out: &mut Transcript) -> Result<()> {
    use violated::*;

    out.banner("COFFEE SHOP - WITHOUT DECORATOR PATTERN");

    out.section("Creating some coffees:");
    let menu: [&dyn Coffee; 3] = [
        &SimpleCoffee,
        &CoffeeWithMilk,
        &CoffeeWithMilkSugarAndWhippedCream,
    ];
    for coffee in menu {
        out.line(format!("{} -> {:.1}", coffee.description(), coffee.cost()));
    }
    out.line(format!(
        "Fixed combinations on the menu: {}",
        violated::MENU_SIZE
    ));

    out.blank();
    out.banner("PROBLEM: No dynamic combinations");
    out.section("Desired order:");
    out.line("Simple Coffee + Milk + Sugar + Cream + Caramel");
    let closest = CoffeeWithMilkSugarWhippedCreamAndCaramel;
    out.line(format!(
        "Only available as its own type: {} -> {:.1}",
        closest.description(),
        closest.cost()
    ));
    out.section("Reality:");
    out.line("- Need a brand new type");
    out.line("- Hardcoded description and cost");
    out.line("- Code change required");
    out.section("Edge cases:");
    out.line("- Double milk?");
    out.line("- Triple sugar?");
    out.line("- Extra cream?");
    out.line("=> More and more types");

    out.blank();
    out.banner("PROBLEM: Cannot remove add-ons");
    let coffee = CoffeeWithMilkAndSugar;
    out.section(format!("Created: {}", coffee.description()));
    out.line(format!("Cost: {:.1}", coffee.cost()));
    out.section("Customer says: remove sugar");
    out.line("Result: Not possible");
    out.line("Need to create a new object");
    Ok(())
}

pub mod violated {
    use super::Coffee;

    pub use super::SimpleCoffee;

    /// 每種組合都要一個型別
    macro_rules! fixed_combination {
        ($($name:ident => $label:literal, $cost:expr;)*) => {
            $(
                #[derive(Debug, Clone, Copy, Default)]
                pub struct $name;

                impl Coffee for $name {
                    fn description(&self) -> String {
                        $label.to_string()
                    }

                    fn cost(&self) -> f64 {
                        $cost
                    }
                }
            )*

            pub const MENU_SIZE: usize = 1 + [$(stringify!($name)),*].len();
        };
    }

    fixed_combination! {
        CoffeeWithMilk => "Coffee with Milk", 50.0 + 10.0;
        CoffeeWithSugar => "Coffee with Sugar", 50.0 + 5.0;
        CoffeeWithMilkAndSugar => "Coffee with Milk and Sugar", 50.0 + 10.0 + 5.0;
        CoffeeWithWhippedCream => "Coffee with Whipped Cream", 50.0 + 15.0;
        CoffeeWithMilkAndWhippedCream => "Coffee with Milk and Whipped Cream", 50.0 + 10.0 + 15.0;
        CoffeeWithSugarAndWhippedCream => "Coffee with Sugar and Whipped Cream", 50.0 + 5.0 + 15.0;
        CoffeeWithMilkSugarAndWhippedCream => "Coffee with Milk, Sugar and Whipped Cream", 50.0 + 10.0 + 5.0 + 15.0;
        CoffeeWithCaramel => "Coffee with Caramel", 50.0 + 20.0;
        CoffeeWithMilkSugarWhippedCreamAndCaramel => "Coffee with Milk, Sugar, Whipped Cream and Caramel", 50.0 + 10.0 + 5.0 + 15.0 + 20.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toppings_stack_description_and_cost() {
        let coffee = Caramel(WhippedCream(Sugar(Milk(SimpleCoffee))));
        assert_eq!(
            coffee.description(),
            "Simple Coffee + Milk + Sugar + Whipped Cream + Caramel"
        );
        assert_eq!(coffee.cost(), 100.0);
    }

    #[test]
    fn test_same_topping_can_repeat() {
        let coffee = Sugar(Sugar(Sugar(Milk(Milk(SimpleCoffee)))));
        assert_eq!(coffee.cost(), 85.0);
        assert_eq!(coffee.description().matches("Sugar").count(), 3);
    }

    #[test]
    fn test_customize_coffee_ignores_unknown_extras() {
        let coffee = customize_coffee(Box::new(Espresso), &["vanilla", "unicorn", "cream"]);
        assert_eq!(coffee.description(), "Espresso + Vanilla + Whipped Cream");
        assert_eq!(coffee.cost(), 97.0);

        let plain = customize_coffee(Box::new(Cappuccino), &[]);
        assert_eq!(plain.cost(), 80.0);
    }

    #[test]
    fn test_display_formats_rupees() {
        let mut out = Transcript::new();
        display_coffee("Cinnamon", &Cinnamon(Milk(SimpleCoffee)), &mut out);
        assert!(out.contains("Cost        : ₹68.00"));
    }

    #[test]
    fn test_violated_menu_hardcodes_every_combination() {
        assert_eq!(violated::MENU_SIZE, 10);
        assert_eq!(
            violated::CoffeeWithMilkSugarWhippedCreamAndCaramel.cost(),
            Caramel(WhippedCream(Sugar(Milk(SimpleCoffee)))).cost()
        );
    }
}
