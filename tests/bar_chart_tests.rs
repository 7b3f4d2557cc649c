use std::time::Duration;

use approx::assert_relative_eq;
use chart_pages::api::config::{BarChartConfig, JsonConfig};
use chart_pages::core::Point;
use chart_pages::core::primitives::utc_date;
use chart_pages::data::StaticFetcher;
use chart_pages::data::gdp::GDP_DATA_URL;
use chart_pages::interaction::TooltipContent;
use chart_pages::render::{ElementId, Shape};
use chart_pages::{BarChartPage, ChartOrchestrator, UiState};

fn fixture_fetcher() -> StaticFetcher {
    StaticFetcher::new().with_document(GDP_DATA_URL, include_str!("fixtures/gdp.json"))
}

fn loaded_chart() -> ChartOrchestrator<BarChartPage> {
    let page = BarChartPage::new(BarChartConfig::default()).expect("page");
    let mut chart = ChartOrchestrator::new(page);
    chart.load(&fixture_fetcher()).expect("load");
    chart
}

#[test]
fn one_bar_per_quarter() {
    let chart = loaded_chart();
    assert_eq!(chart.ui_state(), UiState::Ready);
    assert_eq!(chart.elements().len(), 2);
    assert!(chart.elements().iter().all(|element| element.class == "bar"));
    assert_eq!(chart.elements()[1].data_value("date"), Some("1947-04-01"));
    assert_eq!(chart.elements()[0].data_value("gdp"), Some("243.1"));
}

#[test]
fn bars_stand_on_the_bottom_padding() {
    let chart = loaded_chart();
    let scales = chart.scales().expect("scales");
    assert_eq!(scales.y.domain(), (0.0, 246.3));

    let Shape::Rect {
        x,
        y,
        width,
        height,
    } = chart.elements()[0].shape
    else {
        panic!("bars are rects");
    };
    assert_relative_eq!(x, scales.x.map(utc_date(1947, 1, 1).expect("date")));
    assert_relative_eq!(x, 40.0);
    assert_relative_eq!(width, 448.0);
    assert_relative_eq!(y, scales.y.map(243.1), epsilon = 1e-9);
    assert_relative_eq!(height, 482.0 - scales.y.map(243.1), epsilon = 1e-9);

    let Shape::Rect { x, y, .. } = chart.elements()[1].shape else {
        panic!("bars are rects");
    };
    assert_relative_eq!(x, 876.0, epsilon = 1e-9);
    assert_relative_eq!(y, 20.0, epsilon = 1e-9);
}

#[test]
fn hover_tooltip_shows_quarter_and_amount() {
    let mut chart = loaded_chart();
    let translate = chart
        .pointer_enter(ElementId(0), Point::new(100.0, 300.0))
        .expect("enter")
        .expect("bars react to hover");
    assert_eq!(translate, Point::new(140.0, 250.0));

    let state = chart.tooltip_state();
    let content = state.content().expect("visible tooltip");
    let text = content.plain_text();
    assert!(text.contains("January 1947"), "{text}");
    assert!(text.contains("$243.10 Billion"), "{text}");
    assert_eq!(content.data[0], ("date", "1947-01-01".to_owned()));

    chart.pointer_leave(ElementId(0)).expect("leave");
    assert!(!chart.tooltip_state().is_visible());
}

#[test]
fn tooltip_flips_near_the_right_edge() {
    let mut chart = loaded_chart();
    let translate = chart
        .pointer_enter(ElementId(1), Point::new(800.0, 100.0))
        .expect("enter")
        .expect("shown");
    assert_eq!(translate.x, 800.0 - 128.0 - 40.0);
}

#[test]
fn click_highlight_reverts_after_configured_delay() {
    let mut chart = loaded_chart();
    chart
        .click(ElementId(1), Point::new(500.0, 100.0), Duration::from_millis(10))
        .expect("click");
    assert!(chart.elements()[1].highlighted);
    assert!(chart.to_svg().expect("svg").contains(r#"class="bar highlight""#));

    assert!(chart.advance_clock(Duration::from_millis(500)).expect("tick").is_empty());
    assert_eq!(
        chart.advance_clock(Duration::from_millis(1010)).expect("tick"),
        vec![ElementId(1)]
    );
    assert!(!chart.elements()[1].highlighted);
    assert!(!chart.tooltip_state().is_visible());
}

#[test]
fn axes_and_metadata_are_rendered() {
    let chart = loaded_chart();
    let frame = chart.frame().expect("frame");
    assert_eq!(frame.title.as_deref(), Some("United States GDP"));
    assert!(frame.group("x-axis").is_some());
    let y_axis = frame.group("y-axis").expect("y axis");
    assert_eq!(y_axis.translate, (40.0, 0.0));
    assert!(!y_axis.texts.is_empty());

    let svg = chart.to_svg().expect("svg");
    assert!(svg.contains("<title>United States GDP</title>"));
    assert!(svg.contains(r#"data-date="1947-04-01""#));
}

#[test]
fn config_round_trips_through_json() {
    let config = BarChartConfig {
        highlight_delay_ms: 250,
        ..BarChartConfig::default()
    };
    let json = config.to_json_pretty().expect("json");
    assert_eq!(BarChartConfig::from_json_str(&json).expect("parse"), config);

    let partial = BarChartConfig::from_json_str(r##"{ "bar_color": "#ff0000" }"##).expect("parse");
    assert_eq!(partial.viewport, BarChartConfig::default().viewport);
    assert!(BarChartPage::new(partial).is_ok());

    let bad_color = BarChartConfig {
        bar_color: "blue".to_owned(),
        ..BarChartConfig::default()
    };
    assert!(BarChartPage::new(bad_color).is_err());
}

#[test]
fn source_override_changes_locator() {
    let page = BarChartPage::new(BarChartConfig::default())
        .expect("page")
        .with_source(Some("fixture".to_owned()));
    let mut chart = ChartOrchestrator::new(page);
    let fetcher = StaticFetcher::new().with_document("fixture", include_str!("fixtures/gdp.json"));
    chart.load(&fetcher).expect("load");
    assert_eq!(chart.elements().len(), 2);
    assert_eq!(
        chart.tooltip_state().content().map(TooltipContent::plain_text),
        None
    );
}
