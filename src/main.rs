use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Instrument};

use clozzet::app_system::{setup_tracing, AppSystem};
use clozzet::collection::{CompanyFilter, ManufacturingFilter, OrderFilter, UserFilter};
use clozzet::config::Config;
use clozzet::domain::{DeadlineWindow, ManufacturingStatus, OrderStatus, Priority, UserRole};
use clozzet::pages::{
    CompaniesCommand, ListCommand, ListSnapshot, ManufacturingCommand, OrdersCommand, UsersCommand,
};

const DEFAULT_SESSION_FILE: &str = ".clozzet-session.json";

#[derive(Parser, Debug)]
#[command(name = "clozzet")]
#[command(about = "Storefront and admin client for the custom-apparel backend")]
struct Args {
    /// TOML config file.
    #[arg(short, long, env = "CLOZZET_CONFIG")]
    config: Option<PathBuf>,

    /// Backend base URL; overrides the config file.
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "CLOZZET_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Whoami,
    Orders {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<OrderStatus>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    Users {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        role: Option<UserRole>,
        /// Active accounts only.
        #[arg(long)]
        active: bool,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    Companies {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        industry: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    Manufacturing {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<ManufacturingStatus>,
        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,
        /// today, tomorrow, this_week or next_week.
        #[arg(long)]
        deadline: Option<DeadlineWindow>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Moves an order (id or order number) to a new manufacturing status.
    SetStatus {
        order: String,
        status: ManufacturingStatus,
    },
    AddNote {
        order: String,
        content: String,
    },
    Products {
        /// Include inactive products (admin only).
        #[arg(long)]
        all: bool,
    },
}

fn parse_priority(raw: &str) -> Result<Priority, String> {
    Priority::ALL
        .into_iter()
        .find(|p| p.as_str() == raw)
        .ok_or_else(|| format!("Unknown priority: {}", raw))
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(url) = &args.api_url {
        config
            .apply_overrides(|key| (key == clozzet::config::ENV_API_URL).then(|| url.clone()))
            .context("Invalid --api-url")?;
    }
    if config.session_file.is_none() {
        config.session_file = Some(PathBuf::from(DEFAULT_SESSION_FILE));
    }
    Ok(config)
}

fn print_footer<T, F, K>(list: &ListSnapshot<T, F, K>) {
    println!(
        "page {}/{} ({} matching)",
        list.slice.page, list.slice.total_pages, list.slice.total_items
    );
    if let Some(error) = &list.error {
        println!("error: {}", error);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    setup_tracing(&config.log_level);

    info!(api_url = %config.api_url, "Starting clozzet");
    let system = AppSystem::new(&config)?;

    let span = tracing::info_span!("command");
    let result = run(&system, args.command).instrument(span).await;

    system.shutdown().await?;
    result
}

async fn run(system: &AppSystem, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let auth = system.clients.auth.login(&email, &password).await?;
            println!("Logged in as {} ({})", auth.user.full_name(), auth.user.role);
        }
        Command::Logout => {
            system.clients.auth.logout()?;
            println!("Logged out");
        }
        Command::Whoami => match system.session.current_user() {
            Some(user) => println!("{} <{}> {} {}", user.full_name(), user.email, user.role, user.company_name()),
            None => println!("Not logged in"),
        },
        Command::Orders { search, status, page } => {
            let orders = &system.orders_page;
            orders.load().await?;
            if let Some(term) = search {
                orders.send(OrdersCommand::List(ListCommand::Search(term))).await??;
            }
            orders
                .send(OrdersCommand::List(ListCommand::SetFilter(OrderFilter { status })))
                .await??;
            let snapshot = orders.send(OrdersCommand::List(ListCommand::GoToPage(page))).await??;
            for order in &snapshot.list.slice.items {
                println!(
                    "{:<12} {:<24} {:<12} {}",
                    order.order_number,
                    order.client_name,
                    order.status.map(|s| s.display_name()).unwrap_or("-"),
                    order.created_at.map(|t| t.format("%Y-%m-%d").to_string()).unwrap_or_default()
                );
            }
            print_footer(&snapshot.list);
        }
        Command::Users { search, role, active, page } => {
            let users = &system.users_page;
            users.load().await?;
            if let Some(term) = search {
                users.send(UsersCommand::List(ListCommand::Search(term))).await??;
            }
            let filter = UserFilter {
                role,
                active: active.then_some(true),
            };
            users.send(UsersCommand::List(ListCommand::SetFilter(filter))).await??;
            let snapshot = users.send(UsersCommand::List(ListCommand::GoToPage(page))).await??;
            for user in &snapshot.list.slice.items {
                println!(
                    "{:<24} {:<32} {:<10} {}",
                    user.full_name(),
                    user.email,
                    user.role.display_name(),
                    if user.is_active { "active" } else { "inactive" }
                );
            }
            print_footer(&snapshot.list);
        }
        Command::Companies { search, industry, page } => {
            let companies = &system.companies_page;
            companies.load().await?;
            if let Some(term) = search {
                companies.send(CompaniesCommand::List(ListCommand::Search(term))).await??;
            }
            let filter = CompanyFilter { industry, size: None };
            companies.send(CompaniesCommand::List(ListCommand::SetFilter(filter))).await??;
            let snapshot = companies.send(CompaniesCommand::List(ListCommand::GoToPage(page))).await??;
            for company in &snapshot.list.slice.items {
                println!(
                    "{:<28} {:<16} {}",
                    company.name,
                    company.industry,
                    company.size.map(|s| s.display_name()).unwrap_or("-")
                );
            }
            print_footer(&snapshot.list);
        }
        Command::Manufacturing { search, status, priority, deadline, page } => {
            let manufacturing = &system.manufacturing_page;
            manufacturing.load().await?;
            if let Some(term) = search {
                manufacturing
                    .send(ManufacturingCommand::List(ListCommand::Search(term)))
                    .await??;
            }
            let filter = ManufacturingFilter { status, priority, deadline };
            manufacturing
                .send(ManufacturingCommand::List(ListCommand::SetFilter(filter)))
                .await??;
            let snapshot = manufacturing
                .send(ManufacturingCommand::List(ListCommand::GoToPage(page)))
                .await??;
            let stats = &snapshot.stats;
            println!(
                "urgent {}  in progress {}  pending {}  total {}",
                stats.urgent, stats.in_progress, stats.pending, stats.total
            );
            for row in &snapshot.rows {
                let days = row.days_remaining.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<12} {:<24} {:<18} {:<8} {:>4}d{}",
                    row.order.order_number,
                    row.order.client_name,
                    row.order.manufacturing_status.display_name(),
                    row.order.priority.label(),
                    days,
                    if row.overdue { " OVERDUE" } else { "" }
                );
            }
            print_footer(&snapshot.list);
        }
        Command::SetStatus { order, status } => {
            let manufacturing = &system.manufacturing_page;
            let loaded = manufacturing.load().await?;
            if let Some(error) = loaded.list.error {
                bail!(error);
            }
            manufacturing
                .send(ManufacturingCommand::SetStatus { order: order.clone(), status })
                .await??;
            println!("{} is now {}", order, status.display_name());
        }
        Command::AddNote { order, content } => {
            let manufacturing = &system.manufacturing_page;
            let loaded = manufacturing.load().await?;
            if let Some(error) = loaded.list.error {
                bail!(error);
            }
            manufacturing
                .send(ManufacturingCommand::AddNote { order: order.clone(), content })
                .await??;
            println!("Note added to {}", order);
        }
        Command::Products { all } => {
            let products = if all {
                system.clients.products.list_all_products().await?
            } else {
                system.clients.products.list_products().await?
            };
            for product in products {
                println!(
                    "{:<28} {:<16} {:>10.2}{}",
                    product.name,
                    product.category,
                    product.starting_price,
                    if product.is_active { "" } else { " (inactive)" }
                );
            }
        }
    }
    Ok(())
}
