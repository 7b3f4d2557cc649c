use approx::assert_relative_eq;
use chart_pages::api::config::{CHOROPLETH_PALETTE, ChoroplethConfig};
use chart_pages::core::Point;
use chart_pages::data::StaticFetcher;
use chart_pages::data::education::{COUNTY_TOPOLOGY_URL, EDUCATION_DATA_URL};
use chart_pages::error::ChartError;
use chart_pages::render::{Color, ElementId, PointerHandlers, Shape};
use chart_pages::{ChartOrchestrator, ChoroplethPage, UiState};

fn fixture_fetcher() -> StaticFetcher {
    StaticFetcher::new()
        .with_document(EDUCATION_DATA_URL, include_str!("fixtures/education.json"))
        .with_document(COUNTY_TOPOLOGY_URL, include_str!("fixtures/counties.json"))
}

fn loaded_chart() -> ChartOrchestrator<ChoroplethPage> {
    let page = ChoroplethPage::new(ChoroplethConfig::default()).expect("page");
    let mut chart = ChartOrchestrator::new(page);
    chart.load(&fixture_fetcher()).expect("load");
    chart
}

fn path_of(chart: &ChartOrchestrator<ChoroplethPage>, index: usize) -> &str {
    match &chart.elements()[index].shape {
        Shape::Path { d } => d,
        other => panic!("expected a path, got {other:?}"),
    }
}

#[test]
fn one_path_per_county_plus_state_borders() {
    let chart = loaded_chart();
    assert_eq!(chart.elements().len(), 4);
    assert_eq!(path_of(&chart, 0), "M0,0L0,10L-10,10L-10,0Z");

    let border = &chart.elements()[3];
    assert_eq!(border.class, "stroke-white fill-none");
    assert_eq!(border.handlers, PointerHandlers::NONE);
    assert_eq!(border.stroke, Some(Color::WHITE));
    assert_eq!(border.fill, None);
    assert_eq!(path_of(&chart, 3), "M0,0L0,10");
}

#[test]
fn counties_carry_fips_and_education() {
    let chart = loaded_chart();
    let counties = &chart.elements()[..3];
    assert!(counties.iter().all(|county| county.class == "county"));

    assert_eq!(counties[0].data_value("fips"), Some("1001"));
    assert_eq!(counties[0].data_value("education"), Some("21.9"));
    assert_eq!(counties[1].data_value("education"), Some("28.6"));
    // No education record: colored and labeled as zero.
    assert_eq!(counties[2].data_value("fips"), Some("9999"));
    assert_eq!(counties[2].data_value("education"), Some("0"));
}

#[test]
fn thresholds_step_through_the_configured_range() {
    let chart = loaded_chart();
    let scales = chart.scales().expect("scales");
    let thresholds = scales.color.thresholds();

    assert_eq!(thresholds.len(), CHOROPLETH_PALETTE.len() - 1);
    assert_relative_eq!(thresholds[0], 2.6);
    assert_relative_eq!(thresholds[1] - thresholds[0], 72.5 / 8.0, epsilon = 1e-9);

    let palette: Vec<Color> = CHOROPLETH_PALETTE
        .iter()
        .map(|hex| Color::from_hex(hex).expect("color"))
        .collect();
    assert_eq!(chart.elements()[0].fill, Some(palette[3]));
    assert_eq!(chart.elements()[1].fill, Some(palette[3]));
    assert_eq!(chart.elements()[2].fill, Some(palette[0]));
}

#[test]
fn tooltip_names_county_and_state() {
    let mut chart = loaded_chart();
    chart
        .pointer_enter(ElementId(1), Point::new(100.0, 100.0))
        .expect("enter")
        .expect("counties react to hover");

    let state = chart.tooltip_state();
    let content = state.content().expect("visible");
    assert_eq!(content.plain_text(), "Baldwin County, AL: 28.6%");
    assert_eq!(content.data[0], ("education", "28.6".to_owned()));

    chart
        .pointer_enter(ElementId(2), Point::new(100.0, 100.0))
        .expect("enter");
    let text = chart
        .tooltip_state()
        .content()
        .map(|content| content.plain_text())
        .expect("visible");
    assert!(text.ends_with("0%"), "{text}");
}

#[test]
fn state_borders_ignore_the_pointer() {
    let mut chart = loaded_chart();
    let shown = chart
        .pointer_enter(ElementId(3), Point::new(0.0, 0.0))
        .expect("enter");
    assert_eq!(shown, None);
    assert!(!chart.tooltip_state().is_visible());
}

#[test]
fn legend_sits_right_of_center() {
    let chart = loaded_chart();
    let frame = chart.frame().expect("frame");

    let legend = frame.group("legend").expect("legend");
    assert_eq!(legend.rects.len(), CHOROPLETH_PALETTE.len());
    assert_relative_eq!(legend.translate.0, 949.0 / 3.0 + 256.0, epsilon = 1e-9);
    assert_eq!(legend.translate.1, 20.0);

    let axis = frame.group("legend-axis").expect("legend axis");
    assert_eq!(axis.translate.1, 30.0);
    assert_eq!(axis.texts[0].text, "3%");
    assert_eq!(axis.texts.len(), CHOROPLETH_PALETTE.len() - 1);
}

#[test]
fn svg_marks_borders_unfilled() {
    let chart = loaded_chart();
    let svg = chart.to_svg().expect("svg");
    assert!(svg.contains(r##"class="stroke-white fill-none" fill="none" stroke="#ffffff""##));
    assert!(svg.contains(r#"data-fips="1003""#));
}

#[test]
fn missing_topology_object_fails_the_load() {
    let config = ChoroplethConfig {
        counties_object: "nope".to_owned(),
        ..ChoroplethConfig::default()
    };
    let mut chart = ChartOrchestrator::new(ChoroplethPage::new(config).expect("page"));
    let err = chart.load(&fixture_fetcher()).expect_err("missing object");
    assert!(matches!(err, ChartError::DataUnavailable { .. }));
    assert_eq!(chart.ui_state(), UiState::Loading);
}

#[test]
fn source_overrides_apply_to_both_documents() {
    let page = ChoroplethPage::new(ChoroplethConfig::default())
        .expect("page")
        .with_sources(Some("edu".to_owned()), Some("topo".to_owned()));
    let mut chart = ChartOrchestrator::new(page);
    let fetcher = StaticFetcher::new()
        .with_document("edu", include_str!("fixtures/education.json"))
        .with_document("topo", include_str!("fixtures/counties.json"));
    chart.load(&fetcher).expect("load");
    assert_eq!(chart.elements().len(), 4);
}
