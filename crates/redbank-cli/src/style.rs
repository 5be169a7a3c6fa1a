//! A small semantic color palette for terminal output, in the spirit of
//! the teacher's `kimberlite-cli::style` module but cut down to what a
//! three-command demonstrator CLI actually needs: no banners, spinners,
//! or table builders beyond a single result table.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color as TableColor, ContentArrangement, Table};
use owo_colors::OwoColorize;

/// Trait extension applying semantic styles to anything `Display`.
pub trait SemanticStyle: Sized {
    fn success(&self) -> String;
    fn error(&self) -> String;
    fn muted(&self) -> String;
    fn header(&self) -> String;
}

impl<T: std::fmt::Display> SemanticStyle for T {
    fn success(&self) -> String {
        self.to_string().green().bold().to_string()
    }

    fn error(&self) -> String {
        self.to_string().red().bold().to_string()
    }

    fn muted(&self) -> String {
        self.to_string().dimmed().to_string()
    }

    fn header(&self) -> String {
        self.to_string().bold().to_string()
    }
}

/// Renders a single `{status, balance, message}` response as a two-column
/// table, the shape every `repl`/`sim` command prints on completion.
#[must_use]
pub fn response_table(replica: &str, response: &redbank_types::ClientResponse) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("field").add_attribute(Attribute::Bold).fg(TableColor::Cyan),
        Cell::new("value").add_attribute(Attribute::Bold).fg(TableColor::Cyan),
    ]);
    table.add_row(vec!["replica".to_string(), replica.to_string()]);
    table.add_row(vec!["status".to_string(), response.status.to_string()]);
    table.add_row(vec!["balance".to_string(), format!("{:.2}", response.balance)]);
    if !response.message.is_empty() {
        table.add_row(vec!["message".to_string(), response.message.clone()]);
    }
    table
}
