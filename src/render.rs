//! Plain-text tables for terminal output

use stockdesk_config::DisplayConfig;
use stockdesk_core::{Item, Transaction, TransactionReport};
use stockdesk_utils::{format_date, format_number};

/// Left-aligned columns separated by two spaces
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<&'static str>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        push_line(&mut out, &widths, self.headers.iter().copied());
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &widths, rule.iter().map(String::as_str));
        for row in &self.rows {
            push_line(&mut out, &widths, row.iter().map(String::as_str));
        }
        out
    }
}

fn push_line<'a>(out: &mut String, widths: &[usize], cells: impl Iterator<Item = &'a str>) {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

pub fn items_table(items: &[Item], display: &DisplayConfig) -> String {
    if items.is_empty() {
        return "No items found.\n".to_string();
    }

    let mut table = Table::new(vec!["ID", "Name", "Stock", "Type", "Created"]);
    for item in items {
        table.row(vec![
            item.id.to_string(),
            item.name.clone(),
            format_number(item.stock),
            item.item_type.to_string(),
            format_date(&item.created_at, &display.date_format),
        ]);
    }
    table.render()
}

pub fn transactions_table(transactions: &[Transaction], display: &DisplayConfig) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut table = Table::new(vec!["ID", "Item", "Stock", "Sold", "Type", "Date"]);
    for tx in transactions {
        table.row(vec![
            tx.id.to_string(),
            tx.display_name().to_string(),
            format_number(tx.stock_history),
            format_number(tx.amount),
            tx.item_type.clone(),
            format_date(&tx.transaction_date, &display.date_format),
        ]);
    }
    table.render()
}

pub fn transaction_detail(tx: &Transaction, display: &DisplayConfig) -> String {
    let mut out = format!(
        "Transaction #{}\n  Item:   {}\n  Stock:  {}\n  Sold:   {}\n  Type:   {}\n  Date:   {}\n",
        tx.id,
        tx.display_name(),
        format_number(tx.stock_history),
        format_number(tx.amount),
        tx.item_type,
        format_date(&tx.transaction_date, &display.date_format),
    );

    if display.show_item_detail {
        if let Some(item) = &tx.item {
            out.push_str(&format!(
                "\nItem #{}\n  Name:    {}\n  Stock:   {}\n  Type:    {}\n  Created: {}\n",
                item.id,
                item.name,
                format_number(item.stock),
                item.item_type,
                format_date(&item.created_at, &display.date_format),
            ));
        }
    }
    out
}

pub fn report(report: &TransactionReport, display: &DisplayConfig) -> String {
    format!(
        "Most transactions\n{}\nLeast transactions\n{}",
        transactions_table(&report.most_transactions, display),
        transactions_table(&report.least_transactions, display),
    )
}
