use coinsight_analytics::chart::check_chart;
use coinsight_analytics::{ChartKind, ChartSpec, SeriesSink, SinkError};
use rust_xlsxwriter::{
    Chart, ChartDataLabel, ChartMarker, ChartMarkerType, ChartType, Format, Workbook, XlsxError,
};
use std::path::{Path, PathBuf};

/// Excel limits sheet names to 31 characters.
const MAX_SHEET_NAME: usize = 31;

/// Writes every chart to its own worksheet (data table plus a native chart)
/// of one workbook.
pub struct XlsxSink {
    workbook: Workbook,
    path: PathBuf,
    sheets: usize,
}

fn chart_type(kind: ChartKind) -> ChartType {
    match kind {
        ChartKind::Bar => ChartType::Column,
        ChartKind::StackedBar => ChartType::ColumnStacked,
        ChartKind::Line => ChartType::Line,
        ChartKind::Pie => ChartType::Pie,
    }
}

fn sheet_name(index: usize, key: &str) -> String {
    format!("{index} {key}").chars().take(MAX_SHEET_NAME).collect()
}

impl XlsxSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            workbook: Workbook::new(),
            path: path.as_ref().to_path_buf(),
            sheets: 0,
        }
    }

    pub fn charts_written(&self) -> usize {
        self.sheets
    }

    pub fn save(mut self) -> Result<PathBuf, SinkError> {
        self.workbook
            .save(&self.path)
            .map_err(|e| SinkError::Backend(e.to_string()))?;
        Ok(self.path)
    }

    fn write_chart(&mut self, chart: &ChartSpec, name: &str) -> Result<(), XlsxError> {
        let bold = Format::new().set_bold();
        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(name)?;

        worksheet.write_string_with_format(0, 0, "Coin", &bold)?;
        for (col, series) in chart.series.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16 + 1, series.name.as_str(), &bold)?;
        }

        for (index, category) in chart.categories.iter().enumerate() {
            let row = index as u32 + 1;
            worksheet.write_string(row, 0, category.as_str())?;
            for (col, series) in chart.series.iter().enumerate() {
                // undefined values stay blank and show up as gaps
                if let Some(value) = series.values[index] {
                    worksheet.write_number(row, col as u16 + 1, value)?;
                }
            }
        }
        worksheet.autofit();

        let last_row = chart.categories.len() as u32;
        let mut excel_chart = Chart::new(chart_type(chart.kind));
        excel_chart.title().set_name(chart.title.as_str());

        for (col, series) in chart.series.iter().enumerate() {
            let col = col as u16 + 1;
            let excel_series = excel_chart
                .add_series()
                .set_name(series.name.as_str())
                .set_categories((name, 1, 0, last_row, 0))
                .set_values((name, 1, col, last_row, col));

            match chart.kind {
                ChartKind::Line => {
                    excel_series.set_marker(ChartMarker::new().set_type(ChartMarkerType::Circle));
                }
                ChartKind::Pie => {
                    excel_series.set_data_label(ChartDataLabel::new().show_percentage());
                }
                ChartKind::Bar | ChartKind::StackedBar => {}
            }
        }

        let anchor_col = chart.series.len() as u16 + 2;
        worksheet.insert_chart(1, anchor_col, &excel_chart)?;

        Ok(())
    }
}

impl SeriesSink for XlsxSink {
    fn render(&mut self, chart: &ChartSpec) -> Result<(), SinkError> {
        check_chart(chart)?;

        let name = sheet_name(self.sheets + 1, &chart.key);
        self.write_chart(chart, &name)
            .map_err(|e| SinkError::Backend(format!("{}: {e}", chart.title)))?;
        self.sheets += 1;

        Ok(())
    }
}
