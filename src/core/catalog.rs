use crate::domain::model::{Category, Selection, Transcript, Variant};
use crate::domain::ports::Example;
use crate::patterns::{behavioral, creational, structural};
use crate::solid;
use crate::utils::error::{PatternError, Result};

pub type DemoFn = fn(&mut Transcript) -> Result<()>;

/// 以函式指標包裝的範例
pub struct Demo {
    id: &'static str,
    title: &'static str,
    category: Category,
    variant: Variant,
    run: DemoFn,
}

impl Demo {
    pub fn new(
        id: &'static str,
        title: &'static str,
        category: Category,
        variant: Variant,
        run: DemoFn,
    ) -> Self {
        Self {
            id,
            title,
            category,
            variant,
            run,
        }
    }
}

impl Example for Demo {
    fn id(&self) -> &str {
        self.id
    }

    fn title(&self) -> &str {
        self.title
    }

    fn category(&self) -> Category {
        self.category
    }

    fn variant(&self) -> Variant {
        self.variant
    }

    fn run(&self, out: &mut Transcript) -> Result<()> {
        (self.run)(out)
    }
}

#[derive(Default)]
pub struct Catalog {
    examples: Vec<Box<dyn Example>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 所有原則與模式的 violated/followed 範例
    pub fn standard() -> Self {
        let mut catalog = Self::new();

        catalog.register_pair(
            "srp",
            "Single Responsibility Principle",
            Category::Solid,
            solid::srp::run_violated,
            solid::srp::run_followed,
        );
        catalog.register_pair(
            "ocp",
            "Open/Closed Principle",
            Category::Solid,
            solid::ocp::run_violated,
            solid::ocp::run_followed,
        );
        catalog.register_pair(
            "lsp",
            "Liskov Substitution Principle",
            Category::Solid,
            solid::lsp::run_violated,
            solid::lsp::run_followed,
        );
        catalog.register_pair(
            "isp",
            "Interface Segregation Principle",
            Category::Solid,
            solid::isp::run_violated,
            solid::isp::run_followed,
        );
        catalog.register_pair(
            "dip",
            "Dependency Inversion Principle",
            Category::Solid,
            solid::dip::run_violated,
            solid::dip::run_followed,
        );

        catalog.register_pair(
            "builder",
            "Builder",
            Category::Creational,
            creational::builder::run_violated,
            creational::builder::run_followed,
        );
        catalog.register_pair(
            "singleton",
            "Singleton",
            Category::Creational,
            creational::singleton::run_violated,
            creational::singleton::run_followed,
        );
        catalog.register_pair(
            "factory",
            "Factory Method / Abstract Factory",
            Category::Creational,
            creational::factory::run_violated,
            creational::factory::run_followed,
        );

        catalog.register_pair(
            "strategy",
            "Strategy",
            Category::Behavioral,
            behavioral::strategy::run_violated,
            behavioral::strategy::run_followed,
        );
        catalog.register_pair(
            "state",
            "State",
            Category::Behavioral,
            behavioral::state::run_violated,
            behavioral::state::run_followed,
        );
        catalog.register_pair(
            "observer",
            "Observer",
            Category::Behavioral,
            behavioral::observer::run_violated,
            behavioral::observer::run_followed,
        );
        catalog.register_pair(
            "chain",
            "Chain of Responsibility",
            Category::Behavioral,
            behavioral::chain::run_violated,
            behavioral::chain::run_followed,
        );
        catalog.register_pair(
            "command",
            "Command",
            Category::Behavioral,
            behavioral::command::run_violated,
            behavioral::command::run_followed,
        );

        catalog.register_pair(
            "decorator",
            "Decorator",
            Category::Structural,
            structural::decorator::run_violated,
            structural::decorator::run_followed,
        );
        catalog.register_pair(
            "facade",
            "Facade",
            Category::Structural,
            structural::facade::run_violated,
            structural::facade::run_followed,
        );
        catalog.register_pair(
            "adapter",
            "Adapter",
            Category::Structural,
            structural::adapter::run_violated,
            structural::adapter::run_followed,
        );

        catalog
    }

    pub fn register(&mut self, example: Box<dyn Example>) {
        tracing::debug!("Registering example {}", example.key());
        self.examples.push(example);
    }

    fn register_pair(
        &mut self,
        id: &'static str,
        title: &'static str,
        category: Category,
        violated: DemoFn,
        followed: DemoFn,
    ) {
        self.register(Box::new(Demo::new(
            id,
            title,
            category,
            Variant::Violated,
            violated,
        )));
        self.register(Box::new(Demo::new(
            id,
            title,
            category,
            Variant::Followed,
            followed,
        )));
    }

    pub fn get(&self, id: &str, variant: Variant) -> Result<&dyn Example> {
        self.examples
            .iter()
            .find(|e| e.id() == id && e.variant() == variant)
            .map(|e| e.as_ref())
            .ok_or_else(|| PatternError::UnknownExample {
                id: format!("{}/{}", id, variant),
            })
    }

    pub fn by_category(&self, category: Category) -> Vec<&dyn Example> {
        self.examples
            .iter()
            .filter(|e| e.category() == category)
            .map(|e| e.as_ref())
            .collect()
    }

    /// 依篩選條件挑出範例；指定了不存在的 id 會回傳錯誤
    pub fn select(&self, selection: &Selection) -> Result<Vec<&dyn Example>> {
        if let Some(unknown) = selection.ids.iter().find(|id| !self.contains(id)) {
            return Err(PatternError::UnknownExample {
                id: unknown.clone(),
            });
        }

        Ok(self
            .examples
            .iter()
            .filter(|e| selection.matches(e.id(), e.category(), e.variant()))
            .map(|e| e.as_ref())
            .collect())
    }

    /// 不重複的 id，依註冊順序
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for example in &self.examples {
            if !ids.contains(&example.id()) {
                ids.push(example.id());
            }
        }
        ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.examples.iter().any(|e| e.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Example> {
        self.examples.iter().map(|e| e.as_ref())
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}
