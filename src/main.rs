use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use product_attributes::attributes::{AccessContext, TypedValue};
use product_attributes::config::CatalogConfig;
use product_attributes::database::{self, seed_data, MigrateDirection};
use product_attributes::services::{
    AttributeValueService, CatalogService, DuplicationService, ProductCopyTarget, TemplateDerivationService,
};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(short, long, global = true, default_value = "product_attributes.yaml")]
    config: String,
    /// Overrides the database from the configuration file
    #[clap(short, long, global = true)]
    database: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Db {
        #[clap(subcommand)]
        command: DbCommands,
    },
    /// Create the example catalog
    Seed,
    /// Show the attribute values of a template or product
    Values {
        #[clap(short, long)]
        template: Option<i32>,
        #[clap(short, long)]
        product: Option<i32>,
    },
    /// Assign an attribute set to a template, or clear it
    AssignSet {
        #[clap(short, long)]
        template: i32,
        #[clap(short, long)]
        set: Option<i32>,
    },
    /// Render field templates onto a template and its products
    UpdateValues {
        #[clap(short, long, conflicts_with = "product", required_unless_present = "product")]
        template: Option<i32>,
        #[clap(short, long)]
        product: Option<i32>,
    },
    DuplicateTemplate {
        #[clap(short, long)]
        template: i32,
        #[clap(short, long)]
        with_variants: bool,
    },
    DuplicateProduct {
        #[clap(short, long)]
        product: i32,
        /// Move the copy to this template
        #[clap(short, long)]
        template: Option<i32>,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommands {
    Init,
    Migrate {
        #[clap(subcommand)]
        direction: MigrateDirection,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let config = CatalogConfig::load(&args.config)?;
    setup_logging(args.log_level.as_deref().unwrap_or(&config.log_level));

    let database_path = args.database.clone().unwrap_or_else(|| config.database.clone());
    let policy = config.format_policy()?;

    match args.command {
        Commands::Db { command } => match command {
            DbCommands::Init => {
                info!("Initializing database: {}", database_path);
                database::migrate_database(&database_path, MigrateDirection::Up).await?;
            }
            DbCommands::Migrate { direction } => {
                info!("Running database migration: {:?}", direction);
                database::migrate_database(&database_path, direction).await?;
            }
        },
        command => {
            let db = database::establish_connection(&database::get_database_url(Some(&database_path))).await?;
            database::setup_database(&db).await?;

            match command {
                Commands::Db { .. } => {}
                Commands::Seed => {
                    seed_data::create_example_catalog(&db).await?;
                }
                Commands::Values { template, product } => {
                    let values = AttributeValueService::with_policy(db, policy);
                    let rows = match (template, product) {
                        (_, Some(product)) => values.product_values(product).await?,
                        (Some(template), None) => values.all_values(template).await?,
                        (None, None) => anyhow::bail!("Pass --template or --product"),
                    };
                    print_values(&rows, &values);
                }
                Commands::AssignSet { template, set } => {
                    let assignment = CatalogService::new(db).assign_attribute_set(template, set).await?;
                    println!("{}", serde_json::to_string_pretty(&assignment)?);
                }
                Commands::UpdateValues { template, product } => {
                    let derivation = TemplateDerivationService::with_policy(db, policy);
                    let access = AccessContext::anonymous();
                    let outcome = match (template, product) {
                        (Some(template), _) => derivation.update_template_values(template, &access).await?,
                        (None, Some(product)) => derivation.update_product_values(product, &access).await?,
                        (None, None) => anyhow::bail!("Pass --template or --product"),
                    };
                    println!("{}", serde_json::to_string_pretty(&outcome)?);
                }
                Commands::DuplicateTemplate {
                    template,
                    with_variants,
                } => {
                    let copy = DuplicationService::new(db)
                        .duplicate_template(template, with_variants)
                        .await?;
                    println!(
                        "Template {} copied as {} ({} products, {} values)",
                        template,
                        copy.template.id,
                        copy.products.len(),
                        copy.values_copied
                    );
                }
                Commands::DuplicateProduct { product, template } => {
                    let target = template.map_or(ProductCopyTarget::SameTemplate, ProductCopyTarget::Template);
                    let copy = DuplicationService::new(db).duplicate_product(product, target).await?;
                    println!(
                        "Product {} copied as {} ({} values)",
                        product, copy.product.id, copy.values_copied
                    );
                }
            }
        }
    }

    Ok(())
}

fn print_values(rows: &[TypedValue], values: &AttributeValueService) {
    for row in rows {
        let owner = match row.product_id {
            Some(product) => format!("product {}", product),
            None => format!("template {}", row.template_id),
        };
        println!(
            "{:>6}  {:<16} {:<10} {:<12} {}",
            row.id.unwrap_or_default(),
            owner,
            row.attribute_type().map(|t| t.as_str()).unwrap_or("-"),
            row.attribute_name().unwrap_or("-"),
            row.display_value(values.policy()).unwrap_or_default()
        );
    }
}

fn setup_logging(log_level: &str) {
    let log_level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!(
            "handlebars=off,sqlx=warn,sea_orm=warn,sea_orm_migration=warn,{}",
            log_level
        )))
        .without_time()
        .init();
}
