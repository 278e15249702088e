//! Output formatting for the CLI.

use console::{style, Term};
use turbo_cart::{CartLineItem, CartSnapshot, Customization};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
    term: Term,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self {
            verbose,
            json,
            term: Term::stdout(),
        }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  ").trim_end());
    }

    /// Print the cart as a table, or as JSON in JSON mode.
    pub fn snapshot(&self, snapshot: &CartSnapshot) {
        if self.json {
            self.json(snapshot);
            return;
        }

        if snapshot.is_empty() {
            self.info("Cart is empty");
            return;
        }

        let name_width = snapshot
            .items
            .iter()
            .map(|item| item.display_name.chars().count())
            .max()
            .unwrap_or(0)
            .clamp(4, self.name_column_limit());

        self.header("Cart");
        self.table_row(&["#", "Item", "Qty", "Each", "Total", "Options"], &[3, name_width, 5, 10, 10, 0]);
        for (index, item) in snapshot.items.iter().enumerate() {
            self.line_row(index + 1, item, name_width);
        }
        println!();
        self.kv("Items", &snapshot.total_items.to_string());
        self.kv("Total", &snapshot.total_price.display());
    }

    fn line_row(&self, position: usize, item: &CartLineItem, name_width: usize) {
        let name: String = item.display_name.chars().take(name_width).collect();
        let cols = [
            position.to_string(),
            name,
            item.quantity.to_string(),
            item.effective_unit_price().display(),
            item.line_total().display(),
            format_options(&item.customization),
        ];
        let cols: Vec<&str> = cols.iter().map(String::as_str).collect();
        self.table_row(&cols, &[3, name_width, 5, 10, 10, 0]);
    }

    fn name_column_limit(&self) -> usize {
        let width = self.term.size().1 as usize;
        // Leave room for the fixed-width columns.
        width.saturating_sub(50).max(12)
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Render options as `key=value` pairs in canonical order.
pub fn format_options(customization: &Customization) -> String {
    customization
        .iter()
        .map(|(key, value)| match value {
            serde_json::Value::String(s) => format!("{key}={s}"),
            other => format!("{key}={other}"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_options() {
        let options = Customization::new()
            .with("size", "M")
            .with("color", "red")
            .with("gift", true);
        assert_eq!(format_options(&options), "color=red, gift=true, size=M");
        assert_eq!(format_options(&Customization::new()), "");
    }
}
