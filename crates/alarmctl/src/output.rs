use alarm_models::ReportRow;
use serde::Serialize;
use std::io::Write;

#[derive(clap::Args, Clone, Debug, Default)]
pub struct Output {
    /// How to format CLI output
    #[clap(short, long, value_enum, default_value_t = OutputType::Csv)]
    pub output: OutputType,
    /// Omit the header line of CSV and table output.
    #[clap(long)]
    pub noheader: bool,
}

#[derive(clap::ValueEnum, Debug, Default, Copy, Clone, PartialEq)]
pub enum OutputType {
    /// Format output as comma-separated values
    #[default]
    Csv,
    /// Format output as compact JSON with items separated by newlines
    Json,
    /// Format output as YAML
    Yaml,
    /// Format the output as a pretty-printed table
    Table,
}

/// A trait for things that can be output from the CLI as CSV, JSON, YAML, or a table.
/// JSON and YAML are handled by `Serialize`, while CSV and tables share
/// `table_headers` and `into_table_row`.
pub trait CliOutput: Serialize {
    /// The type output from `into_table_row`.
    type CellValue: Into<comfy_table::Cell> + AsRef<[u8]>;

    /// Returns the column headers of the table.
    fn table_headers() -> Vec<&'static str>;

    /// Converts this item into a tabular representation. The returned cells must be in the
    /// same order as the `table_headers`.
    fn into_table_row(self) -> Vec<Self::CellValue>;
}

impl Output {
    /// Write all `items` to `out` in the selected format.
    pub fn write_all<T: CliOutput>(
        &self,
        out: impl Write,
        items: impl IntoIterator<Item = T>,
    ) -> anyhow::Result<()> {
        match self.output {
            OutputType::Csv => write_csv(out, !self.noheader, items),
            OutputType::Json => write_json(out, items),
            OutputType::Yaml => write_yaml(out, items),
            OutputType::Table => write_table(out, !self.noheader, items),
        }
    }
}

pub fn write_csv<T: CliOutput>(
    out: impl Write,
    header: bool,
    items: impl IntoIterator<Item = T>,
) -> anyhow::Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);

    if header {
        writer.write_record(T::table_headers())?;
    }
    for item in items {
        writer.write_record(item.into_table_row())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_yaml(
    mut out: impl Write,
    items: impl IntoIterator<Item = impl CliOutput>,
) -> anyhow::Result<()> {
    for item in items {
        serde_yaml::to_writer(&mut out, &item)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

pub fn write_json(
    mut out: impl Write,
    items: impl IntoIterator<Item = impl CliOutput>,
) -> anyhow::Result<()> {
    for item in items {
        serde_json::to_writer(&mut out, &item)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

pub fn write_table<T: CliOutput>(
    mut out: impl Write,
    header: bool,
    items: impl IntoIterator<Item = T>,
) -> anyhow::Result<()> {
    let headers = if header { T::table_headers() } else { Vec::new() };
    let mut table = crate::new_table(headers);

    for item in items {
        table.add_row(item.into_table_row());
    }

    for line in table.lines() {
        out.write_all(line.as_bytes())?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

impl CliOutput for ReportRow {
    type CellValue = String;

    fn table_headers() -> Vec<&'static str> {
        vec!["Actions", "Alarm Name", "Topic", "Subscription Endpoint"]
    }

    fn into_table_row(self) -> Vec<Self::CellValue> {
        vec![
            self.field.to_string(),
            self.alarm_name,
            self.topic,
            self.endpoint,
        ]
    }
}
