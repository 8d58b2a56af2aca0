use std::path::Path;

use marenimalt_core::{MarenimaltError, MarenimaltResult};

use crate::record::RawRecord;

/// Dialogue rows loaded from a CSV or JSON file.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    /// Column names in first-seen order.
    pub columns: Vec<String>,
    pub rows: Vec<RawRecord>,
}

impl RecordSet {
    /// Load a record set from a file path. Supports .csv and .json extensions.
    pub fn load(path: &Path) -> MarenimaltResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let label = path.display().to_string();
        match ext.as_str() {
            "csv" => Self::from_csv_str(&std::fs::read_to_string(path)?, &label),
            "json" => Self::from_json_str(&std::fs::read_to_string(path)?, &label),
            _ => Err(MarenimaltError::data(
                format!("unsupported record file format: .{}", ext),
                label,
            )),
        }
    }

    /// Parse CSV text. The first line holds the column headers; a short row
    /// simply lacks the trailing columns.
    pub fn from_csv_str(content: &str, file: &str) -> MarenimaltResult<Self> {
        let mut lines = content.lines();

        let header = lines
            .next()
            .ok_or_else(|| MarenimaltError::data("CSV file is empty", file))?;

        let columns: Vec<String> = parse_csv_line(header);

        let mut rows = Vec::new();
        for line in lines {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let values = parse_csv_line(line);
            let row: RawRecord = columns.iter().cloned().zip(values).collect();
            rows.push(row);
        }

        Ok(RecordSet { columns, rows })
    }

    /// Parse JSON text: an array of flat objects. Strings are taken as-is,
    /// numbers and booleans are stringified, `null` counts as absent.
    pub fn from_json_str(content: &str, file: &str) -> MarenimaltResult<Self> {
        let parsed: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| MarenimaltError::data(format!("invalid JSON: {}", e), file))?;

        let arr = parsed
            .as_array()
            .ok_or_else(|| MarenimaltError::data("JSON record file must be an array of objects", file))?;

        let mut columns: Vec<String> = Vec::new();
        let mut rows = Vec::with_capacity(arr.len());
        for (index, item) in arr.iter().enumerate() {
            let obj = item
                .as_object()
                .ok_or_else(|| MarenimaltError::data(format!("item {} is not an object", index), file))?;

            let mut row = RawRecord::new();
            for (key, value) in obj {
                let text = match value {
                    serde_json::Value::Null => continue,
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Number(_) | serde_json::Value::Bool(_) => value.to_string(),
                    serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                        return Err(MarenimaltError::InvalidField {
                            record: index,
                            key: key.clone(),
                            message: "expected a string, number or boolean".into(),
                        });
                    }
                };
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
                row.insert(key.clone(), text);
            }
            rows.push(row);
        }

        Ok(RecordSet { columns, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Simple CSV line parser that handles quoted fields and `""` escapes.
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                result.push(current.trim().to_string());
                current = String::new();
            }
            _ => current.push(ch),
        }
    }
    result.push(current.trim().to_string());
    result
}
