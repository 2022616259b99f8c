//! Plot hand-off.
//!
//! Rendering is done outside this crate. The core hands a renderer one
//! [`View`] plus a [`PlotRequest`] (title, axis labels, output image path,
//! series styles) and gets back the path of whatever it wrote.
//!
//! [`JsonPlotRenderer`] is the bundled renderer: it writes a self-contained
//! JSON plot document next to the requested image path, ready for a
//! matplotlib/seaborn script or any other charting tool.

use crate::error::Result;
use crate::view::{SeriesPoint, View};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Placeholder replaced by the scope value in titles and file names.
pub const SCOPE_PLACEHOLDER: &str = "{scope}";

/// Display label and marker of one scheduler's series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    /// Scheduler label in the view
    pub scheduler: String,

    /// Legend label
    pub label: String,

    /// Matplotlib marker code (`"D"`, `"^"`, `"o"`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}

impl SeriesStyle {
    pub fn new(scheduler: impl Into<String>, label: impl Into<String>, marker: &str) -> Self {
        Self {
            scheduler: scheduler.into(),
            label: label.into(),
            marker: Some(marker.to_string()),
        }
    }

    fn plain(scheduler: &str) -> Self {
        Self {
            scheduler: scheduler.to_string(),
            label: scheduler.to_string(),
            marker: None,
        }
    }
}

/// Presentation metadata of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Chart title; `{scope}` is replaced by the scope value
    pub title: String,

    /// Output image file name; `{scope}` is replaced by the scope value
    pub file_name: String,

    #[serde(default = "default_x_label")]
    pub x_label: String,

    #[serde(default = "default_y_label")]
    pub y_label: String,

    /// Series styles in legend order; unlisted schedulers follow, sorted
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub series: Vec<SeriesStyle>,
}

fn default_x_label() -> String {
    "Cores".to_string()
}

fn default_y_label() -> String {
    "Speedup $T_1 / T_P$".to_string()
}

impl PlotConfig {
    pub fn new(title: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            file_name: file_name.into(),
            x_label: default_x_label(),
            y_label: default_y_label(),
            series: Vec::new(),
        }
    }

    pub fn with_x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = label.into();
        self
    }

    pub fn with_series(mut self, style: SeriesStyle) -> Self {
        self.series.push(style);
        self
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.file_name.trim().is_empty() {
            return Err("plot file name must not be empty".to_string());
        }
        if self.file_name.contains(['/', '\\']) {
            return Err(format!(
                "plot file name '{}' must not contain a path separator",
                self.file_name
            ));
        }
        Ok(())
    }

    /// Whether titles/file names vary per scope.
    pub fn is_scoped(&self) -> bool {
        self.file_name.contains(SCOPE_PLACEHOLDER)
    }

    /// Build the request for one view, placing the image under `output_dir`.
    pub fn request(&self, view: &View, output_dir: &Path) -> PlotRequest {
        let scope = match view.scope_value {
            Some(value) => value.to_string(),
            None => "all".to_string(),
        };

        let mut styles: Vec<SeriesStyle> = self
            .series
            .iter()
            .filter(|s| view.series.contains_key(&s.scheduler))
            .cloned()
            .collect();
        for scheduler in view.schedulers() {
            if !styles.iter().any(|s| s.scheduler == scheduler) {
                styles.push(SeriesStyle::plain(scheduler));
            }
        }

        PlotRequest {
            title: self.title.replace(SCOPE_PLACEHOLDER, &scope),
            x_label: self.x_label.clone(),
            y_label: self.y_label.clone(),
            output_path: output_dir.join(self.file_name.replace(SCOPE_PLACEHOLDER, &scope)),
            series: styles,
        }
    }
}

/// Everything a renderer needs besides the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotRequest {
    pub title: String,
    pub x_label: String,
    pub y_label: String,

    /// Image path the renderer should produce
    pub output_path: PathBuf,

    /// Series to draw, in legend order
    pub series: Vec<SeriesStyle>,
}

/// Draws one view.
pub trait PlotRenderer {
    /// Render `view` as described by `request`; returns the written path.
    fn render(&self, view: &View, request: &PlotRequest) -> Result<PathBuf>;
}

/// Series as written into a plot document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSeries {
    pub scheduler: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    pub points: Vec<SeriesPoint>,
}

/// Self-contained plot description written by [`JsonPlotRenderer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotDocument {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub image: PathBuf,
    pub series: Vec<PlotSeries>,
}

impl PlotDocument {
    pub fn new(view: &View, request: &PlotRequest) -> Self {
        let series = request
            .series
            .iter()
            .filter_map(|style| {
                view.series(&style.scheduler).map(|points| PlotSeries {
                    scheduler: style.scheduler.clone(),
                    label: style.label.clone(),
                    marker: style.marker.clone(),
                    points: points.to_vec(),
                })
            })
            .collect();

        Self {
            title: request.title.clone(),
            x_label: request.x_label.clone(),
            y_label: request.y_label.clone(),
            image: request.output_path.clone(),
            series,
        }
    }
}

/// Writes `<image path>.json` plot documents for an external renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPlotRenderer;

impl PlotRenderer for JsonPlotRenderer {
    fn render(&self, view: &View, request: &PlotRequest) -> Result<PathBuf> {
        let path = request.output_path.with_extension("json");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let document = PlotDocument::new(view, request);
        let file = File::create(&path)?;
        serde_json::to_writer_pretty(file, &document)?;

        log::info!("Wrote plot request '{}': {}", document.title, path.display());
        Ok(path)
    }
}

/// Render every view with `renderer`; returns the written paths in view order.
pub fn render_views(
    renderer: &dyn PlotRenderer,
    config: &PlotConfig,
    views: &[View],
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    views
        .iter()
        .map(|view| renderer.render(view, &config.request(view, output_dir)))
        .collect()
}
