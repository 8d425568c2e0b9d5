//! Stockdesk main entry point

mod render;
mod watch;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use stockdesk_client::HttpTransport;
use stockdesk_config::{default_config_path, Config};
use stockdesk_core::{
    DateRange, FilterSet, ItemType, Items, ListController, NewItem, NewTransaction, Notification,
    NotificationLevel, Notifier, ReportController, Resource, SortOrder, SortSpec, Transactions,
    Transport, FIELD_END_DATE, FIELD_ITEM_NAME, FIELD_START_DATE,
};
use stockdesk_utils::format_date_for_input;

#[derive(Parser, Debug)]
#[command(name = "stockdesk")]
#[command(version)]
#[command(about = "Browse and manage inventory items and sales transactions", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// API base URL, overriding the configuration
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inventory items
    Items {
        #[command(subcommand)]
        action: ItemsCommand,
    },
    /// Sales transactions
    Transactions {
        #[command(subcommand)]
        action: TransactionsCommand,
    },
    /// Most and least sold transactions
    Report {
        #[arg(long, value_parser = parse_date_arg)]
        from: Option<String>,
        #[arg(long, value_parser = parse_date_arg)]
        to: Option<String>,
    },
    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ItemsCommand {
    List(ListArgs),
    /// Filter interactively; typing settles before each fetch
    Watch(ListArgs),
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        stock: u32,
        /// Pembersih or Konsumsi
        #[arg(long = "type")]
        item_type: ItemType,
    },
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
enum TransactionsCommand {
    List(ListArgs),
    /// Filter interactively; typing settles before each fetch
    Watch(ListArgs),
    Show { id: u64 },
    Add {
        /// Item id
        #[arg(long)]
        item: u64,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        amount: u32,
        /// Defaults to today
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<String>,
    },
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the default configuration
    Init,
}

#[derive(clap::Args, Debug)]
struct ListArgs {
    /// Substring of the item name
    #[arg(long)]
    name: Option<String>,
    /// Earliest date, YYYY-MM-DD
    #[arg(long, value_parser = parse_date_arg)]
    from: Option<String>,
    /// Latest date, YYYY-MM-DD
    #[arg(long, value_parser = parse_date_arg)]
    to: Option<String>,
    /// Field to sort by
    #[arg(long)]
    sort: Option<String>,
    #[arg(long, default_value_t = SortOrder::Desc)]
    order: SortOrder,
}

impl ListArgs {
    fn filters(&self) -> FilterSet {
        let mut filters = FilterSet::new();
        for (field, value) in [
            (FIELD_ITEM_NAME, &self.name),
            (FIELD_START_DATE, &self.from),
            (FIELD_END_DATE, &self.to),
        ] {
            if let Some(value) = value {
                filters.set(field, value.as_str());
            }
        }
        filters
    }

    fn sort(&self) -> SortSpec {
        SortSpec {
            sort_by: self.sort.clone(),
            order: self.order,
        }
    }
}

/// Accepts `YYYY-MM-DD` or a full timestamp and keeps only the date
fn parse_date_arg(raw: &str) -> Result<String, String> {
    let date = format_date_for_input(raw);
    match NaiveDate::parse_from_str(&date, "%Y-%m-%d") {
        Ok(_) => Ok(date),
        Err(_) => Err(format!("expected a date as YYYY-MM-DD, got '{}'", raw)),
    }
}

/// Prints notifications as they arrive
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        log::debug!("notification: {:?}", notification);
        match notification.level {
            NotificationLevel::Success => println!("{}", notification),
            NotificationLevel::Error => eprintln!("error: {}", notification),
        }
    }
}

struct App {
    config: Config,
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
}

impl App {
    fn list<R: Resource>(&self) -> ListController<R> {
        ListController::new(Arc::clone(&self.transport), Arc::clone(&self.notifier))
    }

    fn browse<R: Resource>(&self, args: &ListArgs) -> Result<ListController<R>> {
        if let Some(field) = &args.sort {
            if !R::is_sortable(field) {
                bail!(
                    "cannot sort {} by '{}'; expected one of: {}",
                    R::PATH,
                    field,
                    R::SORT_FIELDS.join(", ")
                );
            }
        }
        Ok(self.list().with_filters(args.filters()).with_sort(args.sort()))
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load_or_default(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?
        .with_env_overrides()
        .context("Invalid environment override")?;

    if let Some(url) = &args.api_url {
        config.api.base_url = url.clone();
        config.validate().context("Invalid --api-url")?;
    }
    Ok(config)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    if let Command::Config {
        action: ConfigCommand::Init,
    } = args.command
    {
        print!("{}", Config::generate_default());
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&args)?;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();
    log::debug!("Using API at {}", config.base_url());

    let transport = HttpTransport::from_config(&config)?;
    let app = App {
        config,
        transport: Arc::new(transport),
        notifier: Arc::new(TerminalNotifier),
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(run(app, args.command))
}

fn status<T, E>(result: Result<T, E>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

async fn run(app: App, command: Command) -> Result<ExitCode> {
    let display = app.config.display.clone();

    let code = match command {
        Command::Items { action } => match action {
            ItemsCommand::List(args) => {
                let items = app.browse::<Items>(&args)?;
                let result = items.mount().await;
                if result.is_ok() {
                    print!("{}", render::items_table(&items.records(), &display));
                }
                status(result)
            }
            ItemsCommand::Watch(args) => {
                let items = Arc::new(app.browse::<Items>(&args)?);
                watch::run(items, app.config.debounce(), |records| {
                    render::items_table(records, &display)
                })
                .await?;
                ExitCode::SUCCESS
            }
            ItemsCommand::Add {
                name,
                stock,
                item_type,
            } => {
                let draft = NewItem {
                    name,
                    stock,
                    item_type,
                };
                // create re-fetches the list; show it like the list view would
                let items = app.list::<Items>();
                let result = items.create(&draft).await;
                if result.is_ok() {
                    print!("{}", render::items_table(&items.records(), &display));
                }
                status(result)
            }
            ItemsCommand::Delete { id } => status(app.list::<Items>().delete(id).await),
        },
        Command::Transactions { action } => match action {
            TransactionsCommand::List(args) => {
                let transactions = app.browse::<Transactions>(&args)?;
                let result = transactions.mount().await;
                if result.is_ok() {
                    print!(
                        "{}",
                        render::transactions_table(&transactions.records(), &display)
                    );
                }
                status(result)
            }
            TransactionsCommand::Watch(args) => {
                let transactions = Arc::new(app.browse::<Transactions>(&args)?);
                watch::run(transactions, app.config.debounce(), |records| {
                    render::transactions_table(records, &display)
                })
                .await?;
                ExitCode::SUCCESS
            }
            TransactionsCommand::Show { id } => {
                let result = app.list::<Transactions>().fetch(id).await;
                if let Ok(tx) = &result {
                    print!("{}", render::transaction_detail(tx, &display));
                }
                status(result)
            }
            TransactionsCommand::Add { item, amount, date } => {
                let draft = NewTransaction {
                    item,
                    amount,
                    transaction_date: date.unwrap_or_else(|| {
                        chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
                    }),
                };
                let transactions = app.list::<Transactions>();
                let result = transactions.create(&draft).await;
                if result.is_ok() {
                    print!(
                        "{}",
                        render::transactions_table(&transactions.records(), &display)
                    );
                }
                status(result)
            }
            TransactionsCommand::Delete { id } => {
                status(app.list::<Transactions>().delete(id).await)
            }
        },
        Command::Report { from, to } => {
            let reports =
                ReportController::new(Arc::clone(&app.transport), Arc::clone(&app.notifier));
            let result = reports.set_range(DateRange::new(from, to)).await;
            if let Some(report) = reports.report() {
                print!("{}", render::report(&report, &display));
            }
            status(result)
        }
        Command::Config { .. } => ExitCode::SUCCESS,
    };

    Ok(code)
}
