//! Report Page Writer
//! Builds a standalone XHTML page: embedded chart, gap table and chart JSON.

use super::{decorate_headings, ReportError};
use crate::charts::BarChartSpec;
use crate::config::GapChartConfig;
use crate::stats::GapSummary;
use quick_xml::escape::escape;
use std::fs;
use std::path::Path;
use tracing::info;

const PAGE_STYLE: &str = "body{font-family:Georgia,serif;max-width:960px;margin:2rem auto;color:#2b2b2b;}\
h1{font-weight:normal;}\
table{border-collapse:collapse;margin-top:1rem;}\
th,td{border:1px solid #ccc;padding:0.3rem 0.8rem;text-align:right;}\
th:first-child,td:first-child{text-align:left;}\
figure{margin:1rem 0;}\
p.empty{color:#888;}";

/// Writes the report page.
pub struct ReportWriter<'a> {
    config: &'a GapChartConfig,
}

impl<'a> ReportWriter<'a> {
    pub fn new(config: &'a GapChartConfig) -> Self {
        Self { config }
    }

    /// Write the decorated page to `path`.
    pub fn write(
        &self,
        path: &Path,
        spec: &BarChartSpec,
        summary: Option<&GapSummary>,
        svg: Option<&str>,
    ) -> Result<(), ReportError> {
        let page = self.build_page(spec, summary, svg)?;
        fs::write(path, page)?;
        info!(path = %path.display(), categories = spec.labels().len(), "report written");
        Ok(())
    }

    /// Page markup with sub-heading ornaments applied.
    pub fn build_page(
        &self,
        spec: &BarChartSpec,
        summary: Option<&GapSummary>,
        svg: Option<&str>,
    ) -> Result<String, ReportError> {
        let markup = self.page_markup(spec, summary, svg)?;
        decorate_headings(&markup, &self.config.ornament)
    }

    /// Undecorated page markup.
    pub fn page_markup(
        &self,
        spec: &BarChartSpec,
        summary: Option<&GapSummary>,
        svg: Option<&str>,
    ) -> Result<String, ReportError> {
        let title = escape(self.config.report_title.as_str());
        let class = escape(self.config.ornament.class_name.as_str());

        let figure = match svg {
            Some(svg) if !spec.is_empty() => strip_xml_declaration(svg).to_string(),
            _ => r#"<p class="empty">No chart data</p>"#.to_string(),
        };

        let summary_section = match summary {
            Some(summary) if !summary.is_empty() => format!(
                "<h2 class=\"{}\">Gap summary</h2>\n{}",
                class,
                self.summary_markup(spec, summary)
            ),
            _ => String::new(),
        };

        let json = spec
            .to_json()
            .map_err(|e| ReportError::Xml(format!("chart JSON: {e}")))?;

        Ok(format!(
            r#"<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" lang="en">
<head>
<meta charset="utf-8"/>
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<h1>{title}</h1>
<h2 class="{class}">{axis}</h2>
<figure id="gapChart">{figure}</figure>
{summary_section}
<script type="application/json" id="gapChartConfig">{json}</script>
</body>
</html>
"#,
            title = title,
            style = PAGE_STYLE,
            class = class,
            axis = escape(spec.value_axis().title.text.as_str()),
            figure = figure,
            summary_section = summary_section,
            json = script_safe_json(&json),
        ))
    }

    fn summary_markup(&self, spec: &BarChartSpec, summary: &GapSummary) -> String {
        let [first, second] = spec.datasets();
        let suffix = escape(spec.value_suffix.as_str());
        let cell = |v: f64| {
            if v.is_finite() {
                format!("{v:.1}{suffix}")
            } else {
                "-".to_string()
            }
        };

        let mut html = format!(
            "<table>\n<tr><th>Year</th><th>{}</th><th>{}</th><th>Gap (pp)</th></tr>\n",
            escape(first.label.as_str()),
            escape(second.label.as_str())
        );

        for year in &summary.years {
            let gap = if year.gap.is_finite() {
                format!("{:+.1}", year.gap)
            } else {
                "-".to_string()
            };
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape(year.label.as_str()),
                cell(year.first),
                cell(year.second),
                gap
            ));
        }
        html.push_str("</table>\n");

        if summary.mean_gap.is_finite() {
            html.push_str(&format!(
                "<p>Mean gap {:+.2} pp",
                summary.mean_gap
            ));
            if summary.std_dev.is_finite() {
                html.push_str(&format!(", standard deviation {:.2}", summary.std_dev));
            }
            html.push_str(".</p>\n");
        }
        if let Some(widest) = summary.widest_year() {
            html.push_str(&format!(
                "<p>Widest gap: {} ({:+.1} pp).</p>\n",
                escape(widest.label.as_str()),
                widest.gap
            ));
        }

        html
    }
}

/// Drop a leading `<?xml ...?>` so the SVG can be inlined.
fn strip_xml_declaration(svg: &str) -> &str {
    let trimmed = svg.trim_start();
    if trimmed.starts_with("<?xml") {
        if let Some(end) = trimmed.find("?>") {
            return trimmed[end + 2..].trim_start();
        }
    }
    trimmed
}

/// JSON that is inert both as XML text and inside an HTML `<script>`.
fn script_safe_json(json: &str) -> String {
    json.replace('&', "\\u0026")
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ExtractedSeries;

    fn fixture() -> (GapChartConfig, BarChartSpec, GapSummary) {
        let config = GapChartConfig::default();
        let series = ExtractedSeries {
            labels: vec!["2019".into(), "2020 <pilot>".into()],
            first: vec![60.0, 52.5],
            second: vec![40.0, f64::NAN],
        };
        let spec = BarChartSpec::from_series(&series, &config);
        let summary = GapSummary::from_series(&series);
        (config, spec, summary)
    }

    #[test]
    fn page_has_decorated_headings_and_escaped_labels() {
        let (config, spec, summary) = fixture();
        let svg = r#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect x="0" y="0" width="5" height="5"/></svg>"#;
        let page = ReportWriter::new(&config)
            .build_page(&spec, Some(&summary), Some(svg))
            .unwrap();

        assert_eq!(page.matches("\u{2726}</span>").count(), 2);
        assert!(page.contains("<figure id=\"gapChart\"><svg"));
        assert!(!page.contains("<?xml"));
        assert!(page.contains("<td>2020 &lt;pilot&gt;</td>"));
        assert!(page.contains("<td>+20.0</td>"));
        assert!(page.contains("\\u003cpilot\\u003e"));
        assert!(page.contains("Widest gap: 2019"));
    }

    #[test]
    fn page_without_chart_or_summary() {
        let (config, spec, _) = fixture();
        let page = ReportWriter::new(&config).build_page(&spec, None, None).unwrap();

        assert!(page.contains("No chart data"));
        assert!(!page.contains("Gap summary"));
        assert_eq!(page.matches("\u{2726}</span>").count(), 1);
    }

    #[test]
    fn undecorated_markup_has_no_ornament() {
        let (config, spec, summary) = fixture();
        let markup = ReportWriter::new(&config)
            .page_markup(&spec, Some(&summary), None)
            .unwrap();
        assert!(!markup.contains('\u{2726}'));
        assert_eq!(markup.matches("class=\"sub-h2\"").count(), 2);
    }

    #[test]
    fn strips_declaration() {
        assert_eq!(strip_xml_declaration("<?xml version=\"1.0\"?>\n<svg/>"), "<svg/>");
        assert_eq!(strip_xml_declaration("<svg/>"), "<svg/>");
    }
}
