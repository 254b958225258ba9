use gapchart::charts::{BarChartSpec, StaticChartRenderer};
use gapchart::stats::GapSummary;
use gapchart::{extract_series, ColumnMap, DataLoader, DataSource, GapChartConfig};
use serde_json::Value;
use std::io::Write;
use tempfile::NamedTempFile;

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".csv").unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn csv_file_to_chart_config() {
    let file = csv_file(
        "academic_year,elf_good,dwarf_good,notes\n\
         2018/19,55.25,40.2,first\n\
         ,50,30,no year\n\
         2019/20,61.04%,n/a,\"pilot, revised\"\n\
         2020/21,58,44.95,\n",
    );

    let config = GapChartConfig::default();
    let source = DataSource::File(file.path().to_path_buf());
    let table = DataLoader::default()
        .load_for(&source, &config.columns)
        .unwrap();
    assert_eq!(table.row_count(), 4);
    assert!(table.missing_columns(&config.columns).is_empty());

    let series = extract_series(&table.rows, &config.columns);
    assert_eq!(series.labels, vec!["2018/19", "2019/20", "2020/21"]);
    assert_eq!(series.first, vec![55.3, 61.0, 58.0]);
    assert_eq!(series.second[0], 40.2);
    assert!(series.second[1].is_nan());
    assert_eq!(series.second[2], 45.0);

    let spec = BarChartSpec::from_series(&series, &config);
    let json: Value = serde_json::from_str(&spec.to_json().unwrap()).unwrap();
    assert_eq!(json["data"]["labels"][1], "2019/20");
    assert_eq!(json["data"]["datasets"][0]["data"][0], 55.3);
    assert_eq!(json["data"]["datasets"][1]["data"][1], Value::Null);
    assert_eq!(json["options"]["indexAxis"], "y");
}

#[test]
fn header_without_configured_columns() {
    let file = csv_file("year,a,b\n2019,1,2\n");
    let columns = ColumnMap::default();
    let table = DataLoader::default()
        .load(&DataSource::File(file.path().to_path_buf()))
        .unwrap();

    assert_eq!(
        table.missing_columns(&columns),
        vec!["academic_year", "elf_good", "dwarf_good"]
    );
    let series = extract_series(&table.rows, &columns);
    assert!(series.is_empty());

    let spec = BarChartSpec::from_series(&series, &GapChartConfig::default());
    assert!(spec.is_empty());
    assert!(StaticChartRenderer::render_svg_string(&spec, 640, 480).is_err());
}

#[test]
fn custom_columns_and_gap_summary() {
    let file = csv_file("cohort,x,y\nA,70,50\nB,52,54\nC,60,57\n");
    let columns = ColumnMap::new("cohort", "x", "y");
    let table = DataLoader::default()
        .load(&DataSource::File(file.path().to_path_buf()))
        .unwrap();

    let series = extract_series(&table.rows, &columns);
    let summary = GapSummary::from_series(&series);

    assert_eq!(summary.years.len(), 3);
    assert_eq!(summary.widest_year().map(|y| y.label.as_str()), Some("A"));
    assert_eq!(summary.narrowest_year().map(|y| y.label.as_str()), Some("B"));
    assert!((summary.mean_gap - 7.0).abs() < 1e-9);
}
