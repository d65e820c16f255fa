//! Renderer-neutral line chart descriptions
//!
//! The dashboards hand these to whatever draws them; `to_json` gives a
//! stable serialized form.

use crate::data::PriceSeries;
use crate::error::Result;
use crate::forecast::ForecastSeries;
use chrono::NaiveDate;
use serde::Serialize;

pub const DATE_AXIS_LABEL: &str = "Date";
pub const PRICE_AXIS_LABEL: &str = "Price";
pub const RANDOM_WALK_SERIES_NAME: &str = "Stock Price";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandPoint {
    pub date: NaiveDate,
    pub lower: f64,
    pub upper: f64,
}

/// A named line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<ChartPoint>,
}

/// A shaded range between two lines
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandSeries {
    pub name: String,
    pub points: Vec<BandPoint>,
}

/// Everything needed to draw one line chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub lines: Vec<LineSeries>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bands: Vec<BandSeries>,
}

impl ChartSpec {
    pub fn new(title: impl Into<String>, x_label: &str, y_label: &str) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            lines: Vec::new(),
            bands: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: LineSeries) -> Self {
        self.lines.push(line);
        self
    }

    pub fn with_band(mut self, band: BandSeries) -> Self {
        self.bands.push(band);
        self
    }

    /// Pretty-printed JSON document
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn close_line(name: &str, series: &PriceSeries) -> LineSeries {
    LineSeries {
        name: name.to_string(),
        points: series
            .points()
            .iter()
            .filter_map(|p| {
                p.clean_close().map(|value| ChartPoint {
                    date: p.date,
                    value,
                })
            })
            .collect(),
    }
}

/// Closing prices of a fetched series
pub fn history_chart(series: &PriceSeries) -> ChartSpec {
    ChartSpec::new(
        format!("{} Closing Price", series.symbol()),
        DATE_AXIS_LABEL,
        PRICE_AXIS_LABEL,
    )
    .with_line(close_line("Close", series))
}

/// The synthetic series of the random-walk dashboard
pub fn random_walk_chart(series: &PriceSeries) -> ChartSpec {
    ChartSpec::new(
        "Stock Price Dashboard",
        DATE_AXIS_LABEL,
        RANDOM_WALK_SERIES_NAME,
    )
    .with_line(close_line(RANDOM_WALK_SERIES_NAME, series))
}

/// Historical closes overlaid with the forecast and its prediction band
pub fn comparison_chart(history: &PriceSeries, forecast: &ForecastSeries) -> ChartSpec {
    let forecast_line = LineSeries {
        name: "Forecast".to_string(),
        points: forecast
            .points()
            .iter()
            .map(|p| ChartPoint {
                date: p.date,
                value: p.value,
            })
            .collect(),
    };

    let band = BandSeries {
        name: format!(
            "{:.0}% prediction interval",
            forecast.confidence_level() * 100.0
        ),
        points: forecast
            .points()
            .iter()
            .map(|p| BandPoint {
                date: p.date,
                lower: p.lower,
                upper: p.upper,
            })
            .collect(),
    };

    ChartSpec::new(
        format!("{} {} Forecast", forecast.symbol(), forecast.order()),
        DATE_AXIS_LABEL,
        PRICE_AXIS_LABEL,
    )
    .with_line(close_line("Historical", history))
    .with_line(forecast_line)
    .with_band(band)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PricePoint;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_history_chart_maps_directly() {
        let d1 = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2023, 1, 3).unwrap();
        let d3 = NaiveDate::from_ymd_opt(2023, 1, 4).unwrap();
        let series = PriceSeries::new(
            "AAPL",
            vec![
                PricePoint::new(d1, Some(10.0)),
                PricePoint::new(d2, None),
                PricePoint::new(d3, Some(12.5)),
            ],
        )
        .unwrap();

        let chart = history_chart(&series);
        assert_eq!(chart.x_label, "Date");
        assert_eq!(chart.y_label, "Price");
        assert_eq!(chart.lines.len(), 1);
        assert_eq!(
            chart.lines[0].points,
            vec![
                ChartPoint {
                    date: d1,
                    value: 10.0
                },
                ChartPoint {
                    date: d3,
                    value: 12.5
                },
            ]
        );
        assert!(chart.bands.is_empty());
    }

    #[test]
    fn test_json_uses_iso_dates() {
        let d1 = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let series = PriceSeries::from_closes("X", vec![d1], vec![1.5]).unwrap();

        let json = history_chart(&series).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["lines"][0]["points"][0]["date"], "2023-01-02");
        assert_eq!(value["lines"][0]["points"][0]["value"], 1.5);
        assert!(value.get("bands").is_none());
    }
}
