use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
    Quiet,
}

pub struct OutputRenderer {
    format: OutputFormat,
}

impl OutputRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Renders any serializable value in the selected format. Table and
    /// quiet mode only apply to shapes they can represent; anything else
    /// falls back to pretty JSON.
    pub fn render<T: Serialize>(&self, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;

        let rendered = match self.format {
            OutputFormat::Table => self.render_table(&value)?,
            OutputFormat::Json => false,
            OutputFormat::Yaml => {
                print!("{}", serde_yaml::to_string(&value)?);
                true
            }
            OutputFormat::Quiet => self.render_quiet(&value),
        };

        if !rendered {
            println!("{}", serde_json::to_string_pretty(&value)?);
        }

        Ok(())
    }

    fn render_table(&self, value: &Value) -> Result<bool> {
        let (headers, rows) = match Self::table_rows(value) {
            Some(data) => data,
            None => return Ok(false),
        };

        let mut builder = Builder::default();
        builder.push_record(headers);
        for row in rows {
            builder.push_record(row);
        }

        println!("{}", builder.build().with(Style::rounded()));
        Ok(true)
    }

    /// Quiet mode prints bare `id` values, one per line, for piping into
    /// other tools.
    fn render_quiet(&self, value: &Value) -> bool {
        match value {
            Value::Array(rows) => {
                let mut printed = false;
                for row in rows {
                    printed |= self.render_quiet(row);
                }
                printed
            }
            Value::Object(obj) => match obj.get("id").and_then(Value::as_str) {
                Some(id) => {
                    println!("{id}");
                    true
                }
                None => false,
            },
            Value::Null => false,
            other => {
                println!("{}", other);
                true
            }
        }
    }

    /// Commands emit uniform row structs, so the first row fixes both the
    /// column set and the column order. Rows missing a column render empty
    /// cells.
    fn table_rows(value: &Value) -> Option<(Vec<String>, Vec<Vec<String>>)> {
        let rows = match value {
            Value::Array(rows) if !rows.is_empty() => rows,
            _ => return None,
        };

        let headers: Vec<String> = match &rows[0] {
            Value::Object(obj) if !obj.is_empty() => obj.keys().cloned().collect(),
            _ => return None,
        };

        let data = rows
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .map(|header| match row {
                        Value::Object(obj) => {
                            obj.get(header).map(Self::cell_text).unwrap_or_default()
                        }
                        _ => String::new(),
                    })
                    .collect()
            })
            .collect();

        Some((headers, data))
    }

    fn cell_text(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
            other => serde_json::to_string(other).unwrap_or_default(),
        }
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headers_follow_first_row_field_order() {
        let value = json!([
            {"name": "Alice", "id": "1"},
            {"name": "Bob", "id": "2"}
        ]);

        let (headers, rows) = OutputRenderer::table_rows(&value).unwrap();
        assert_eq!(headers, vec!["name", "id"]);
        assert_eq!(rows, vec![vec!["Alice", "1"], vec!["Bob", "2"]]);
    }

    #[test]
    fn test_missing_columns_render_empty_cells() {
        let value = json!([
            {"id": "1", "name": "Alice"},
            {"id": "2", "email": "bob@example.com"}
        ]);

        let (headers, rows) = OutputRenderer::table_rows(&value).unwrap();
        assert_eq!(headers, vec!["id", "name"]);
        assert_eq!(rows[1], vec!["2", ""]);
    }

    #[test]
    fn test_untabular_shapes_are_rejected() {
        assert!(OutputRenderer::table_rows(&json!([])).is_none());
        assert!(OutputRenderer::table_rows(&json!({"id": "1"})).is_none());
        assert!(OutputRenderer::table_rows(&json!(["one", "two"])).is_none());
        assert!(OutputRenderer::table_rows(&json!([{}])).is_none());
    }

    #[test]
    fn test_cell_text_stringifies_scalars() {
        assert_eq!(OutputRenderer::cell_text(&json!("hello")), "hello");
        assert_eq!(OutputRenderer::cell_text(&json!(42)), "42");
        assert_eq!(OutputRenderer::cell_text(&json!(true)), "true");
        assert_eq!(OutputRenderer::cell_text(&json!(null)), "");
    }

    #[test]
    fn test_cell_text_nested_values_render_as_json() {
        let rendered = OutputRenderer::cell_text(&json!({"key": "value"}));
        assert!(rendered.contains("key"));
        assert!(rendered.contains("value"));
    }

    #[test]
    fn test_quiet_prints_ids_from_rows() {
        let renderer = OutputRenderer::new(OutputFormat::Quiet);
        assert!(renderer.render_quiet(&json!([{"id": "1"}, {"id": "2"}])));
        assert!(renderer.render_quiet(&json!({"id": "123", "name": "Test"})));
    }

    #[test]
    fn test_quiet_falls_back_without_ids() {
        let renderer = OutputRenderer::new(OutputFormat::Quiet);
        assert!(!renderer.render_quiet(&json!({"name": "Test"})));
        assert!(!renderer.render_quiet(&json!(null)));
        assert!(!renderer.render_quiet(&json!([null, null])));
    }

    #[derive(Serialize)]
    struct Row {
        id: String,
        name: String,
    }

    #[test]
    fn test_render_each_format() {
        let rows = vec![
            Row {
                id: "1".to_string(),
                name: "Alice".to_string(),
            },
            Row {
                id: "2".to_string(),
                name: "Bob".to_string(),
            },
        ];

        for format in [
            OutputFormat::Table,
            OutputFormat::Json,
            OutputFormat::Yaml,
            OutputFormat::Quiet,
        ] {
            let renderer = OutputRenderer::new(format);
            assert_eq!(renderer.format(), format);
            assert!(renderer.render(&rows).is_ok());
        }
    }
}
