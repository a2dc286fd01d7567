pub mod buffer;
pub mod error;
pub mod export;
pub mod mapping;
pub mod plot;
pub mod polyline;
pub mod scene;
pub mod style;

pub use buffer::{RenderBuffer, Rgba};
pub use error::RenderError;
pub use export::{export_png, ExportMetadata};
pub use mapping::{count_non_finite, map_grid, map_points};
pub use plot::{
    find_zeros_along_path, grid_plot, grid_plot_both, line_plot, rasterize, save_plot,
    values_along_path, PlotFormat,
};
pub use polyline::{pixel_runs, polyline_runs, CLIP_FACTOR};
pub use scene::{MappedFrame, MappingScene, Revisions};
pub use style::LineStyle;

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
