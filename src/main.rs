//! trendmart - Browse trending products from the command line
//!
//! Lists cached trend research, shows per-product landing details, captures
//! consent leads, and lets an administrator manage affiliate links.

use std::process::ExitCode;

use clap::Parser;
use log::debug;

use trendmart::cli::{AdminCommand, Cli, CliError, Command, Config, SettingsArgs};
use trendmart::controller::{Controller, LoadOutcome};
use trendmart::data::{AppSettings, ListedProduct};
use trendmart::store::{LeadStore, ResearchCache, SettingsStore, Store};

/// Sets up env_logger, defaulting to warnings unless `RUST_LOG` says otherwise
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

/// Formats the last sync time for display
fn sync_label(controller: &Controller) -> String {
    controller
        .last_sync()
        .map(|t| {
            t.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "never".to_string())
}

fn print_listing(controller: &Controller) {
    println!("Synced: {}", sync_label(controller));

    let visible = controller.visible_products();
    if visible.is_empty() {
        if controller.search_query().is_empty() {
            println!("No products yet. Run `trendmart admin sync` with a trend source.");
        } else {
            println!("No products match '{}'.", controller.search_query());
        }
        return;
    }

    for listed in visible {
        let product = &listed.product;
        println!(
            "{:<16} [{}] {} ({})",
            product.id, product.platform, product.name, product.niche
        );
        println!("{:<16} {}", "", listed.outbound_link);
    }
}

fn print_landing(listed: &ListedProduct) {
    let product = &listed.product;
    println!("{}", product.name);
    println!("  Niche:       {}", product.niche);
    println!("  Platform:    {}", product.platform);
    if !product.description.is_empty() {
        println!("  About:       {}", product.description);
    }
    if !product.image_url.is_empty() {
        println!("  Image:       {}", product.image_url);
    }
    if let Some(total) = product.total_commission {
        println!("  Commission:  {:.1}%", total);
    }
    if let Some(partner) = product.partner_commission {
        println!("  Partner cut: {:.1}%", partner);
    }
    println!("  Link:        {}", listed.outbound_link);
}

fn print_settings(settings: &AppSettings) {
    let prefix = if settings.global_affiliate_prefix.is_empty() {
        "(none)"
    } else {
        settings.global_affiliate_prefix.as_str()
    };
    println!("Affiliate prefix: {}", prefix);
    println!("Auto-apply:       {}", settings.auto_apply_prefix);
}

fn updated_settings(current: AppSettings, args: &SettingsArgs) -> AppSettings {
    AppSettings {
        global_affiliate_prefix: args
            .prefix
            .clone()
            .unwrap_or(current.global_affiliate_prefix),
        auto_apply_prefix: args.auto_apply.unwrap_or(current.auto_apply_prefix),
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_cli(&cli)?;
    debug!("Using data directory {}", config.data_dir.display());

    let store = Store::with_dir(config.data_dir.clone());
    let mut controller = Controller::new(
        config.source.fetcher(),
        ResearchCache::new(store.clone()),
        SettingsStore::new(store.clone()),
    );

    match cli.command {
        Command::List { search, refresh } => {
            controller.load(refresh).await;
            if let Some(query) = search {
                controller.set_search_query(query);
            }
            print_listing(&controller);
        }
        Command::Show { id } => {
            controller.load(false).await;
            let listed = controller
                .product(&id)
                .ok_or_else(|| CliError::UnknownProduct(id.clone()))?;
            print_landing(listed);
        }
        Command::Lead { id, email } => {
            controller.load(false).await;
            let listed = controller
                .product(&id)
                .ok_or_else(|| CliError::UnknownProduct(id.clone()))?;
            let lead = LeadStore::new(store).capture(&email, &listed.product)?;
            println!("Thanks! {} will receive offers for {}.", lead.email, lead.product_name);
        }
        Command::Admin(AdminCommand::SetLink { id, link }) => {
            controller.load(false).await;
            controller.apply_override(&id, &link)?;
            match (controller.product(&id), controller.link_override(&id)) {
                (Some(listed), _) => println!("{} -> {}", id, listed.outbound_link),
                (None, Some(link)) => {
                    println!("Saved link for '{}' (not in current listing): {}", id, link)
                }
                (None, None) => println!("Cleared link for '{}'", id),
            }
        }
        Command::Admin(AdminCommand::Settings(args)) => {
            if args.has_changes() {
                let settings = updated_settings(controller.settings(), &args);
                controller.save_settings(&settings)?;
            }
            print_settings(&controller.settings());
        }
        Command::Admin(AdminCommand::Sync) => {
            let outcome = controller.load(true).await;
            match outcome {
                LoadOutcome::Fetched => {
                    println!("Fetched {} products.", controller.products().len())
                }
                _ => println!(
                    "No new products; keeping {} cached.",
                    controller.products().len()
                ),
            }
        }
        Command::Admin(AdminCommand::Leads) => {
            let leads = LeadStore::new(store).all();
            if leads.is_empty() {
                println!("No leads captured.");
            }
            for lead in leads {
                println!(
                    "{}  {:<32} {} ({})",
                    lead.consented_at.format("%Y-%m-%d %H:%M"),
                    lead.email,
                    lead.product_name,
                    lead.niche
                );
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
