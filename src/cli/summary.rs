//! Summary CLI command

use crate::config::settings::Settings;
use crate::display::format_summary;
use crate::error::CashplanResult;
use crate::services::SummaryService;
use crate::storage::Storage;

use super::parse_date;

/// Print the plan summary for the month containing `date` (default today)
pub fn handle_summary_command(
    storage: &Storage,
    settings: &Settings,
    date: Option<String>,
) -> CashplanResult<()> {
    let date = parse_date(date.as_deref())?;
    let summary = SummaryService::new(storage).summary(settings, date)?;
    print!("{}", format_summary(&summary, &settings.currency_symbol));
    Ok(())
}
