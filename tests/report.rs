use gapchart::charts::BarChartSpec;
use gapchart::config::OrnamentConfig;
use gapchart::report::{decorate_headings, ReportWriter};
use gapchart::stats::GapSummary;
use gapchart::{ExtractedSeries, GapChartConfig};

fn series() -> ExtractedSeries {
    ExtractedSeries {
        labels: vec!["2021/22".into(), "2022/23".into()],
        first: vec![62.5, 60.1],
        second: vec![48.0, 47.3],
    }
}

#[test]
fn report_file_is_written_and_decorated() {
    let config = GapChartConfig {
        report_title: "Outcomes & gaps".to_string(),
        ..GapChartConfig::default()
    };
    let series = series();
    let spec = BarChartSpec::from_series(&series, &config);
    let summary = GapSummary::from_series(&series);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.xhtml");
    ReportWriter::new(&config)
        .write(&path, &spec, Some(&summary), None)
        .unwrap();

    let page = std::fs::read_to_string(&path).unwrap();
    assert!(page.contains("<title>Outcomes &amp; gaps</title>"));
    assert!(page.contains("id=\"gapChartConfig\""));
    assert!(page.contains("<td>+14.5</td>"));
    assert_eq!(page.matches("\u{2726}</span>").count(), 2);

    // Decorating twice adds a second ornament rather than failing.
    let again = decorate_headings(&page, &config.ornament).unwrap();
    assert_eq!(again.matches("\u{2726}</span>").count(), 4);
}

#[test]
fn ornament_class_is_configurable() {
    let config = GapChartConfig {
        ornament: OrnamentConfig {
            class_name: "divider".to_string(),
            glyph: "~".to_string(),
            ..OrnamentConfig::default()
        },
        ..GapChartConfig::default()
    };
    let spec = BarChartSpec::from_series(&series(), &config);
    let page = ReportWriter::new(&config).build_page(&spec, None, None).unwrap();

    assert!(page.contains("class=\"divider\""));
    assert!(page.contains(">~</span></h2>"));
    assert!(!page.contains('\u{2726}'));
}
