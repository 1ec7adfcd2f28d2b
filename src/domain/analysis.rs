use serde::{Deserialize, Serialize};

/// Summary of the numeric y column. `data_points` is the table's row count,
/// not the count of cells that survived coercion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub data_points: usize,
}

/// Parallel label/value series, one entry per table row in original order.
/// Missing y values are NaN and serialize to JSON null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub stats: SummaryStats,
    pub chart_data: ChartData,
    pub x_label: String,
    pub y_label: String,
}
