use tabled::{builder::Builder, settings::Style};

/// Rounded table with a header row
pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableBuilder {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        let mut builder = Builder::default();
        builder.push_record(self.headers.clone());
        for row in &self.rows {
            builder.push_record(row.clone());
        }

        builder.build().with(Style::rounded()).to_string()
    }
}

pub fn stats_table(stats: &[(&str, String)]) -> String {
    let mut builder = TableBuilder::new(["Metric", "Value"]);
    for (label, value) in stats {
        builder.add_row([label.to_string(), value.clone()]);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_renders_nothing() {
        let builder = TableBuilder::new(["Id", "Name"]);
        assert!(builder.is_empty());
        assert_eq!(builder.build(), "");
    }

    #[test]
    fn test_rows_render_with_headers() {
        let mut builder = TableBuilder::new(["Code", "Name"]);
        builder.add_row(["KAM-001", "Sony A7"]);
        let rendered = builder.build();
        assert!(rendered.contains("Code"));
        assert!(rendered.contains("KAM-001"));
        assert!(rendered.contains("Sony A7"));
    }
}
