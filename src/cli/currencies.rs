use super::ui;
use crate::core::currency::{ALL_CURRENCIES, ProviderKind};
use comfy_table::{Cell, Table};

pub fn run() {
    println!("{}", currency_table());
}

fn currency_table() -> Table {
    let providers = [ProviderKind::OpenEr, ProviderKind::Frankfurter];

    let mut table = ui::new_styled_table();
    let mut header = vec![ui::header_cell("Currency")];
    header.extend(providers.iter().map(|p| ui::header_cell(&p.to_string())));
    table.set_header(header);

    for code in ALL_CURRENCIES {
        let mut row = vec![Cell::new(code)];
        row.extend(providers.iter().map(|p| ui::flag_cell(p.supports(code))));
        table.add_row(row);
    }
    table
}
