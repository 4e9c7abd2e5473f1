//! Recipe browsing commands.

use clap::{Args, ValueEnum};
use tokio::runtime::Runtime;

use cookup_core::{Meal, MealService};

use crate::config::Config;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Args)]
pub struct SearchCommand {
    /// Keywords; several keywords are searched in parallel and merged
    #[arg(required = true)]
    pub keywords: Vec<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl SearchCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let service = service(config);
        let meals = Runtime::new()?.block_on(service.search_keywords(&self.keywords))?;
        print_meals(&meals, &self.format)
    }
}

#[derive(Args)]
pub struct CategoryCommand {
    /// Category name (e.g., "Seafood")
    pub name: String,

    /// Output format
    #[arg(long, short, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl CategoryCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let service = service(config);
        let meals = Runtime::new()?.block_on(service.filter_by_category(&self.name))?;
        print_meals(&meals, &self.format)
    }
}

#[derive(Args)]
pub struct IngredientCommand {
    /// Ingredient name (e.g., "chicken_breast")
    pub name: String,

    /// Output format
    #[arg(long, short, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl IngredientCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let service = service(config);
        let meals = Runtime::new()?.block_on(service.filter_by_ingredient(&self.name))?;
        print_meals(&meals, &self.format)
    }
}

#[derive(Args)]
pub struct RandomCommand {
    /// How many random recipes to fetch (duplicates are dropped)
    #[arg(long, default_value_t = 1)]
    pub count: usize,

    /// Output format
    #[arg(long, short, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl RandomCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let service = service(config);
        let meals = Runtime::new()?.block_on(service.random_many(self.count))?;
        print_meals(&meals, &self.format)
    }
}

#[derive(Args)]
pub struct ShowCommand {
    /// Recipe id
    pub id: String,
}

impl ShowCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let service = service(config);
        match Runtime::new()?.block_on(service.lookup(&self.id))? {
            Some(meal) => print_meal_detail(&meal),
            None => println!("No recipe found for id {}", self.id),
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct IngredientsCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl IngredientsCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let service = service(config);
        let catalog = Runtime::new()?.block_on(service.list_ingredients())?;
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&catalog)?),
            OutputFormat::Table => {
                for info in &catalog {
                    match &info.kind {
                        Some(kind) => println!("{} ({})", info, kind),
                        None => println!("{}", info),
                    }
                }
            }
        }
        Ok(())
    }
}

fn service(config: &Config) -> MealService {
    MealService::with_base_url(&config.api_base_url.value)
}

pub(crate) fn print_meals(
    meals: &[Meal],
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(meals)?),
        OutputFormat::Table => {
            if meals.is_empty() {
                println!("No recipes found.");
                return Ok(());
            }
            for meal in meals {
                match &meal.category {
                    Some(category) => println!("{:<8} {} ({})", meal.key(), meal.name, category),
                    None => println!("{:<8} {}", meal.key(), meal.name),
                }
            }
        }
    }
    Ok(())
}

fn print_meal_detail(meal: &Meal) {
    println!("{}", meal.name);
    println!("{}", "=".repeat(meal.name.chars().count()));

    if let Some(id) = &meal.id {
        println!("Id: {}", id);
    }
    match (&meal.category, &meal.area) {
        (Some(category), Some(area)) => println!("{} / {}", category, area),
        (Some(category), None) => println!("{}", category),
        (None, Some(area)) => println!("{}", area),
        (None, None) => {}
    }

    let lines = meal.ingredient_lines();
    if !lines.is_empty() {
        println!("\nIngredients:");
        for line in &lines {
            if line.measure.is_empty() {
                println!("  {}", line.name);
            } else {
                println!("  {:<24} {}", line.name, line.measure);
            }
        }
    }

    if let Some(instructions) = &meal.instructions {
        println!("\n{}", instructions);
    }
    if let Some(thumbnail) = &meal.thumbnail {
        println!("\nImage: {}", thumbnail);
    }
}
