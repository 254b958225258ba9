//! Data module - CSV loading and series extraction

mod extractor;
mod loader;
mod row;

pub use extractor::{
    extract_series, parse_percentage, round_to_tenth, ColumnMap, ExtractedSeries, SeriesPoint,
};
pub use loader::{rows_from_dataframe, DataLoader, DataSource, LoadedTable, LoaderError};
pub use row::Row;
