use super::ui;
use crate::app::App;
use crate::core::cache::{RateEntries, RateKey};
use crate::core::currency::ALL_CURRENCIES;
use crate::precache::{is_complete, yesterday_of};
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::{Cell, Table};

pub async fn run(app: &App, date: Option<NaiveDate>) -> Result<()> {
    let date = date.unwrap_or_else(|| yesterday_of(App::today()));
    let entries = app.cache.load().await?;

    println!(
        "\nCached rates for {} (row = base, column = target)",
        ui::style_text(&date.to_string(), ui::StyleType::Title)
    );
    println!("{}", rate_matrix(&entries, &ALL_CURRENCIES, date));

    if !is_complete(&entries, &ALL_CURRENCIES, date) {
        println!(
            "{}",
            ui::style_text(
                "Some pairs are missing; run `fxconv precache` to backfill yesterday.",
                ui::StyleType::Subtle
            )
        );
    }
    Ok(())
}

fn rate_matrix(entries: &RateEntries, universe: &[&str], date: NaiveDate) -> Table {
    let mut table = ui::new_styled_table();

    let mut header = vec![ui::header_cell("")];
    header.extend(universe.iter().map(|code| ui::header_cell(code)));
    table.set_header(header);

    for base in universe {
        let mut row = vec![ui::header_cell(base)];
        for target in universe {
            let cell = if base == target {
                Cell::new("")
            } else {
                let key = RateKey::new(base, target, date).to_string();
                entries
                    .get(&key)
                    .map_or_else(ui::na_cell, |rate| ui::rate_cell(*rate))
            };
            row.push(cell);
        }
        table.add_row(row);
    }
    table
}
