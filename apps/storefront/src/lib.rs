//! # Larek Storefront
//!
//! Presenter and console front end for the Larek storefront.
//!
//! ## Module Organization
//! ```text
//! larek_storefront/
//! ├── lib.rs          ◄─── You are here (startup & command loop)
//! ├── presenter.rs    ◄─── Event subscriptions, user actions, order submission
//! ├── modal.rs        ◄─── Modal container + page lock
//! ├── view.rs         ◄─── Render<A> seam and render arguments
//! ├── console.rs      ◄─── Terminal renderer
//! ├── command.rs      ◄─── Console command parsing
//! ├── config.rs       ◄─── Price display settings
//! └── error.rs        ◄─── AppError
//! ```

pub mod command;
pub mod config;
pub mod console;
pub mod error;
pub mod modal;
pub mod presenter;
pub mod view;

use std::path::PathBuf;
use std::rc::Rc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use larek_api::{ApiConfig, CatalogSource, MemoryCatalog, ShopApi};
use larek_core::{AppStateModel, CoreError, EventBus};

use command::{Command, ItemRef, HELP};
use config::DisplayConfig;
use console::ConsoleView;
use error::AppResult;
use presenter::Presenter;

/// Catalog served with `--offline`.
pub const OFFLINE_CATALOG: &str = include_str!("../data/catalog.json");

/// Startup options (see `main.rs` for the flags).
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Explicit `larek.toml` path.
    pub config: Option<PathBuf>,
    /// Serve the bundled catalog instead of calling the API.
    pub offline: bool,
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=larek_core=trace` - Event dispatch tracing
/// - Default: INFO, DEBUG for larek crates
///
/// Logs go to stderr so they do not interleave with the console screens.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,larek=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn catalog_source(options: &RunOptions) -> AppResult<Rc<dyn CatalogSource>> {
    if options.offline {
        info!("Offline mode: serving the bundled catalog");
        return Ok(Rc::new(MemoryCatalog::from_json(OFFLINE_CATALOG)?));
    }

    let config = ApiConfig::load_or_default(options.config.clone());
    info!(api = %config.api_url(), "Using catalog API");
    Ok(Rc::new(ShopApi::new(&config)?))
}

/// Runs the storefront until `quit` or end of input.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Pick catalog source ── ShopApi (ApiConfig) or MemoryCatalog        │
/// │  2. Build EventBus + AppStateModel                                      │
/// │  3. Presenter wires subscriptions to the console view                   │
/// │  4. Load catalog ── failure is logged, the loop still starts            │
/// │  5. Read commands from stdin                                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(options: RunOptions) -> AppResult<()> {
    info!("Starting Larek storefront");

    let source = catalog_source(&options)?;
    let state = Rc::new(AppStateModel::new(Rc::new(EventBus::new())));
    let view = Rc::new(ConsoleView::new(std::io::stdout()));
    let presenter = Presenter::new(state, source, DisplayConfig::from_env(), view);

    if let Err(err) = presenter.load_catalog().await {
        println!("Не удалось загрузить каталог: {}", err);
    }
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => command,
            Err(err) => {
                println!("{}", err);
                continue;
            }
        };

        if let Err(err) = execute(&presenter, command).await {
            warn!(error = %err, "Command failed");
            println!("Ошибка: {}", err);
        }
    }

    info!("Storefront closed");
    Ok(())
}

/// Applies one console command.
pub async fn execute(presenter: &Presenter, command: Command) -> AppResult<()> {
    let state = presenter.state();

    match command {
        Command::List => {
            presenter.load_catalog().await?;
        }
        Command::View(ItemRef::Id(id)) => presenter.open_product(&id).await?,
        Command::View(item) => {
            let ids: Vec<String> = state.get_products().into_iter().map(|p| p.id).collect();
            let id = item
                .resolve(&ids)
                .ok_or_else(|| CoreError::ProductNotFound(item.to_string()))?;
            presenter.select_product(id)?;
        }
        Command::Buy => presenter.toggle_preview_item(),
        Command::Basket => presenter.open_basket(),
        Command::Remove(item) => {
            let ids: Vec<String> = state.get_basket_items().into_iter().map(|p| p.id).collect();
            let id = item
                .resolve(&ids)
                .ok_or_else(|| CoreError::ProductNotFound(item.to_string()))?;
            presenter.remove_basket_item(id);
        }
        Command::Order => presenter.start_order(),
        Command::Set(field, value) => presenter.input_order_field(field, &value),
        Command::Next => {
            presenter.submit_step().await?;
        }
        Command::Back => presenter.back_to_shipment(),
        Command::Cancel => presenter.cancel_order(),
        Command::Close => presenter.close_modal(),
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use larek_core::OrderStep;

    fn offline_presenter() -> (Presenter, Rc<ConsoleView<Vec<u8>>>) {
        let source = Rc::new(MemoryCatalog::from_json(OFFLINE_CATALOG).unwrap());
        let view = Rc::new(ConsoleView::new(Vec::new()));
        let state = Rc::new(AppStateModel::new(Rc::new(EventBus::new())));
        let presenter = Presenter::new(state, source, DisplayConfig::default(), view.clone());
        (presenter, view)
    }

    async fn run_script(presenter: &Presenter, script: &[&str]) {
        for line in script {
            let command: Command = line.parse().unwrap();
            execute(presenter, command).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_offline_catalog_loads() {
        let (presenter, view) = offline_presenter();
        assert_eq!(presenter.load_catalog().await.unwrap(), 6);

        let screens = view.text();
        assert!(screens.contains("=== Каталог ==="));
        assert!(screens.contains("HEX-леденец - 1 450 синапсов"));
        assert!(screens.contains("Мамка-таймер - Бесценно"));
    }

    #[tokio::test]
    async fn test_scripted_checkout() {
        let (presenter, _view) = offline_presenter();
        presenter.load_catalog().await.unwrap();

        run_script(
            &presenter,
            &[
                "view 1",
                "buy",
                "view c101ab44-ed99-4a54-990d-47aa2bb4e7d9",
                "buy",
                "basket",
                "order",
                "set payment card",
                "set address Москва, ул. Пушкина, 1",
                "next",
                "set email buyer@example.ru",
                "set phone +7 999 123 45 67",
            ],
        )
        .await;

        let state = presenter.state();
        assert_eq!(state.get_order_step(), Some(OrderStep::Contacts));
        assert_eq!(state.get_basket_price().units(), 2200);
        assert_eq!(state.get_order().address, "Москва, ул. Пушкина, 1");

        run_script(&presenter, &["next"]).await;
        assert_eq!(state.get_basket_count(), 0);
        assert_eq!(state.get_order_step(), None);
    }

    #[tokio::test]
    async fn test_cancel_mid_checkout() {
        let (presenter, _view) = offline_presenter();
        presenter.load_catalog().await.unwrap();
        run_script(
            &presenter,
            &["view 1", "buy", "order", "set address Москва", "cancel", "set payment card"],
        )
        .await;

        let state = presenter.state();
        assert_eq!(state.get_order_step(), None);
        assert!(state.get_order().address.is_empty());
        assert_eq!(state.get_basket_count(), 1);
        assert!(!presenter.modal().is_open());
    }

    #[tokio::test]
    async fn test_remove_by_row_and_bad_refs() {
        let (presenter, view) = offline_presenter();
        presenter.load_catalog().await.unwrap();
        run_script(&presenter, &["view 1", "buy", "view 2", "buy", "remove 1"]).await;

        let basket = presenter.state().get_basket_items();
        assert_eq!(basket.len(), 1);
        assert_eq!(basket[0].id, "c101ab44-ed99-4a54-990d-47aa2bb4e7d9");

        let err = execute(&presenter, "view 99".parse().unwrap()).await.unwrap_err();
        assert_eq!(err.to_string(), "Product not found: #99");
        let err = execute(&presenter, "view no-such-id".parse().unwrap()).await.unwrap_err();
        assert_eq!(err.to_string(), "Product not found: no-such-id");
        assert!(execute(&presenter, "remove 5".parse().unwrap()).await.is_err());
        assert!(view.text().contains("[Корзина: 1]"));
    }
}
