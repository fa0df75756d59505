//! Config CLI commands

use clap::Subcommand;

use crate::audit::EntityType;
use crate::config::settings::Settings;
use crate::error::CashplanResult;
use crate::storage::Storage;

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show paths and settings
    Show,
    /// Change a setting
    Set {
        /// Setting name (split_policy, residual_policy, default_strategy,
        /// attack_bucket, allow_negative_balances, currency_symbol,
        /// monthly_income, monthly_expense)
        key: String,
        /// New value
        value: String,
    },
}

fn print_settings(storage: &Storage, settings: &Settings) {
    let paths = storage.paths();
    println!("cashplan configuration");
    println!("======================");
    println!("Config directory: {}", paths.config_dir().display());
    println!("Data directory:   {}", paths.data_dir().display());
    println!("Audit log:        {}", paths.audit_log().display());
    println!();
    println!("Settings:");
    println!("  split_policy:            {}", settings.split_policy);
    println!("  residual_policy:         {}", settings.residual_policy);
    println!("  default_strategy:        {}", settings.default_strategy);
    println!(
        "  attack_bucket:           {}",
        settings.attack_bucket.as_deref().unwrap_or("(none)")
    );
    println!(
        "  allow_negative_balances: {}",
        settings.allow_negative_balances
    );
    println!("  currency_symbol:         {}", settings.currency_symbol);
    println!(
        "  monthly_income:          {}",
        settings.monthly_income.format_with_symbol(&settings.currency_symbol)
    );
    println!(
        "  monthly_expense:         {}",
        settings.monthly_expense.format_with_symbol(&settings.currency_symbol)
    );
}

/// Handle a config command
pub fn handle_config_command(
    storage: &Storage,
    settings: &mut Settings,
    cmd: Option<ConfigCommands>,
) -> CashplanResult<()> {
    match cmd.unwrap_or(ConfigCommands::Show) {
        ConfigCommands::Show => print_settings(storage, settings),

        ConfigCommands::Set { key, value } => {
            let before = settings.clone();
            settings.set(&key, &value)?;
            settings.save(storage.paths())?;

            storage.log_update(EntityType::Settings, "settings", None, &before, &*settings, None)?;
            println!("Set {} = {}", key, value.trim());
        }
    }

    Ok(())
}
