use super::ui;
use crate::app::App;
use crate::core::currency::ALL_CURRENCIES;
use anyhow::Result;

pub async fn run(app: &App, force: bool) -> Result<()> {
    let pb = ui::new_progress_bar(ALL_CURRENCIES.len() as u64);
    pb.set_message("Fetching rate tables");
    let report = app.precache(force, &|| pb.inc(1)).await;
    pb.finish_and_clear();
    let report = report?;

    if report.skipped {
        println!(
            "Rates for {} already cached for every pair.",
            ui::style_text(&report.date.to_string(), ui::StyleType::Title)
        );
        return Ok(());
    }

    println!(
        "Cached {} new rates for {} from {} base currencies.",
        ui::style_text(&report.written.to_string(), ui::StyleType::Result),
        ui::style_text(&report.date.to_string(), ui::StyleType::Title),
        report.fetched_bases.len()
    );
    if !report.failed_bases.is_empty() {
        println!(
            "{}",
            ui::style_text(
                &format!("Skipped: {}", report.failed_bases.join(", ")),
                ui::StyleType::Error
            )
        );
    }
    Ok(())
}
