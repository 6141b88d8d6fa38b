use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    StackedBar,
    Line,
    Pie,
}

/// A named series. `None` values are gaps (undefined reconstructed prices).
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn defined(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(name, values.into_iter().map(Some).collect())
    }
}

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// Short identifier, used by sinks that need a file or sheet name.
    pub key: String,
    pub title: String,
    pub kind: ChartKind,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn series_named(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|series| series.name == name)
    }
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("chart '{0}' has no data points")]
    EmptyChart(String),
    #[error("series '{series}' of chart '{chart}' has {got} values, expected {expected}")]
    SeriesLength {
        chart: String,
        series: String,
        expected: usize,
        got: usize,
    },
    #[error("renderer failed: {0}")]
    Backend(String),
}

/// Consumes chart descriptions. Implementations decide what "rendering" means.
pub trait SeriesSink {
    fn render(&mut self, chart: &ChartSpec) -> Result<(), SinkError>;
}

/// Rejects charts a renderer could not draw meaningfully.
pub fn check_chart(chart: &ChartSpec) -> Result<(), SinkError> {
    if chart.is_empty() {
        return Err(SinkError::EmptyChart(chart.title.clone()));
    }

    for series in &chart.series {
        if series.values.len() != chart.categories.len() {
            return Err(SinkError::SeriesLength {
                chart: chart.title.clone(),
                series: series.name.clone(),
                expected: chart.categories.len(),
                got: series.values.len(),
            });
        }
    }

    Ok(())
}

/// Keeps every rendered chart in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub charts: Vec<ChartSpec>,
}

impl SeriesSink for MemorySink {
    fn render(&mut self, chart: &ChartSpec) -> Result<(), SinkError> {
        check_chart(chart)?;
        self.charts.push(chart.clone());
        Ok(())
    }
}
