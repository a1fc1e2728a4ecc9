//! solar - admin client for the solar equipment catalog

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use solar_commands::catalog::SortKey;
use solar_commands::products::ProductFields;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in as a catalog administrator
    Login(LoginArgs),
    /// Log out and forget the saved session
    Logout,
    /// Create a new administrator account
    Register(RegisterArgs),
    /// Manage authentication
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
    /// Browse and manage products
    Products {
        #[command(subcommand)]
        command: ProductsCommand,
    },
    /// Browse and manage categories
    Categories {
        #[command(subcommand)]
        command: CategoriesCommand,
    },
    /// Admin dashboard with catalog statistics
    Dashboard(DashboardArgs),
    /// Check whether the backend is reachable
    Health,
    /// Show or change client settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

// Simple command wrappers - just forward arguments

#[derive(Debug, Args)]
struct LoginArgs {
    /// Admin username
    #[arg(short, long)]
    username: Option<String>,
    /// Admin password
    #[arg(short, long, env = "SOLAR_ADMIN_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Debug, Args)]
struct RegisterArgs {
    /// Username for the new account
    #[arg(short, long)]
    username: Option<String>,
    /// Password for the new account
    #[arg(short, long, env = "SOLAR_ADMIN_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
enum AuthCommand {
    /// Show authentication status
    Status,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum SortOrder {
    /// Alphabetical by name
    #[default]
    Name,
    /// Alphabetical by category
    Category,
    /// Cheapest first
    PriceLow,
    /// Most expensive first
    PriceHigh,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Search product names, descriptions and category names
    #[arg(short, long)]
    search: Option<String>,
    /// Only show products in this category
    #[arg(short, long)]
    category: Option<String>,
    /// Sort order
    #[arg(long, value_enum, default_value_t)]
    sort: SortOrder,
    /// Print JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct FieldArgs {
    /// Product name
    #[arg(long)]
    name: Option<String>,
    /// Description
    #[arg(long)]
    description: Option<String>,
    /// Unit price
    #[arg(long)]
    price: Option<String>,
    /// Category id or name
    #[arg(long)]
    category: Option<String>,
    /// Image URL
    #[arg(long)]
    image: Option<String>,
    /// Units in stock
    #[arg(long)]
    quantity: Option<String>,
}

// Complex commands with subcommands

#[derive(Debug, Subcommand)]
enum ProductsCommand {
    /// List products
    List(ListArgs),
    /// Show one product
    Show {
        /// Product id
        id: String,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a product
    Create(FieldArgs),
    /// Update a product
    Update {
        /// Product id
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a product
    Delete {
        /// Product id
        id: String,
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Show when the catalog last changed
    LastUpdate,
}

#[derive(Debug, Subcommand)]
enum CategoriesCommand {
    /// List categories with product counts
    List {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a category
    Create {
        /// Category name
        name: String,
    },
    /// Delete a category that no product uses
    Delete {
        /// Category id or name
        category: String,
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
struct DashboardArgs {
    /// Filter products by name
    #[arg(short, long)]
    filter: Option<String>,
    /// Only show products in this category
    #[arg(short, long)]
    category: Option<String>,
    /// Sort order
    #[arg(long, value_enum, default_value_t)]
    sort: SortOrder,
    /// Print JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Show the effective settings
    Show,
    /// Store settings in ~/.solar/config.toml
    Set {
        /// Backend base URL
        #[arg(long)]
        api_url: Option<String>,
        /// Per-attempt timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Maximum attempts per request
        #[arg(long)]
        retries: Option<u32>,
        /// Delay between attempts in milliseconds
        #[arg(long)]
        retry_delay_ms: Option<u64>,
    },
    /// Remove stored settings
    Reset,
}

// Conversion implementations

impl From<LoginArgs> for solar_commands::login::LoginArgs {
    fn from(args: LoginArgs) -> Self {
        Self {
            username: args.username,
            password: args.password,
        }
    }
}

impl From<RegisterArgs> for solar_commands::register::RegisterArgs {
    fn from(args: RegisterArgs) -> Self {
        Self {
            username: args.username,
            password: args.password,
        }
    }
}

impl From<AuthCommand> for solar_commands::auth::AuthCommand {
    fn from(cmd: AuthCommand) -> Self {
        match cmd {
            AuthCommand::Status => Self::Status,
        }
    }
}

impl From<SortOrder> for SortKey {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Name => Self::Name,
            SortOrder::Category => Self::Category,
            SortOrder::PriceLow => Self::PriceLow,
            SortOrder::PriceHigh => Self::PriceHigh,
        }
    }
}

impl From<FieldArgs> for ProductFields {
    fn from(args: FieldArgs) -> Self {
        Self {
            name: args.name,
            description: args.description,
            price: args.price,
            category: args.category,
            image: args.image,
            quantity: args.quantity,
        }
    }
}

impl From<ProductsCommand> for solar_commands::products::ProductsCommand {
    fn from(cmd: ProductsCommand) -> Self {
        match cmd {
            ProductsCommand::List(args) => Self::List(solar_commands::products::ListArgs {
                search: args.search,
                category: args.category,
                sort: args.sort.into(),
                json: args.json,
            }),
            ProductsCommand::Show { id, json } => Self::Show { id, json },
            ProductsCommand::Create(fields) => Self::Create(fields.into()),
            ProductsCommand::Update { id, fields } => Self::Update {
                id,
                fields: fields.into(),
            },
            ProductsCommand::Delete { id, yes } => Self::Delete { id, yes },
            ProductsCommand::LastUpdate => Self::LastUpdate,
        }
    }
}

impl From<CategoriesCommand> for solar_commands::categories::CategoriesCommand {
    fn from(cmd: CategoriesCommand) -> Self {
        match cmd {
            CategoriesCommand::List { json } => Self::List { json },
            CategoriesCommand::Create { name } => Self::Create { name },
            CategoriesCommand::Delete { category, yes } => Self::Delete {
                id_or_name: category,
                yes,
            },
        }
    }
}

impl From<DashboardArgs> for solar_commands::dashboard::DashboardArgs {
    fn from(args: DashboardArgs) -> Self {
        Self {
            filter: args.filter,
            category: args.category,
            sort: args.sort.into(),
            json: args.json,
        }
    }
}

impl From<ConfigCommand> for solar_commands::config::ConfigCommand {
    fn from(cmd: ConfigCommand) -> Self {
        match cmd {
            ConfigCommand::Show => Self::Show,
            ConfigCommand::Set {
                api_url,
                timeout_ms,
                retries,
                retry_delay_ms,
            } => Self::Set(solar_commands::config::ConfigSetArgs {
                api_url,
                timeout_ms,
                retries,
                retry_delay_ms,
            }),
            ConfigCommand::Reset => Self::Reset,
        }
    }
}

fn init_tracing() {
    let default_level = if solar_runtime::ApiConfig::resolve().debug_logs {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Login(args) => solar_commands::login::execute(args.into()).await,
        Commands::Logout => solar_commands::logout::execute(),
        Commands::Register(args) => solar_commands::register::execute(args.into()).await,
        Commands::Auth { command } => solar_commands::auth::execute(command.into()).await,
        Commands::Products { command } => solar_commands::products::execute(command.into()).await,
        Commands::Categories { command } => {
            solar_commands::categories::execute(command.into()).await
        }
        Commands::Dashboard(args) => solar_commands::dashboard::execute(args.into()).await,
        Commands::Health => solar_commands::health::execute().await,
        Commands::Config { command } => solar_commands::config::execute(command.into()),
    }
}
