use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use approx::assert_relative_eq;
use chart_pages::api::config::ScatterplotConfig;
use chart_pages::api::scatterplot::ride_time;
use chart_pages::core::Point;
use chart_pages::core::primitives::utc_date;
use chart_pages::data::StaticFetcher;
use chart_pages::data::cyclists::CYCLIST_DATA_URL;
use chart_pages::data::geocode::{FlagLookup, StaticLookup};
use chart_pages::error::ChartResult;
use chart_pages::render::{Color, ElementId, Shape};
use chart_pages::{ChartOrchestrator, ScatterplotPage};

fn loaded_chart() -> ChartOrchestrator<ScatterplotPage<StaticLookup>> {
    let lookup = StaticLookup::new().with_code("ITA", "IT").with_code("USA", "US");
    let page = ScatterplotPage::new(ScatterplotConfig::default(), lookup).expect("page");
    let mut chart = ChartOrchestrator::new(page);
    let fetcher = StaticFetcher::new()
        .with_document(CYCLIST_DATA_URL, include_str!("fixtures/cyclists.json"));
    chart.load(&fetcher).expect("load");
    chart
}

fn center(chart: &ChartOrchestrator<ScatterplotPage<StaticLookup>>, index: usize) -> (f64, f64) {
    match chart.elements()[index].shape {
        Shape::Circle { cx, cy, .. } => (cx, cy),
        ref other => panic!("dots are circles, got {other:?}"),
    }
}

#[test]
fn dots_are_classed_by_allegation() {
    let chart = loaded_chart();
    let classes: Vec<&str> = chart
        .elements()
        .iter()
        .map(|element| element.class.as_str())
        .collect();
    assert_eq!(classes, vec!["dot doping", "dot doping", "dot clean"]);

    let config = ScatterplotConfig::default();
    assert_eq!(
        chart.elements()[0].stroke,
        Some(Color::from_hex(&config.doping_color).expect("color"))
    );
    assert_eq!(chart.elements()[2].fill, Some(Color::WHITE));
}

#[test]
fn years_are_padded_by_one_on_each_side() {
    let chart = loaded_chart();
    let scales = chart.scales().expect("scales");
    assert_eq!(
        scales.x.domain().expect("domain"),
        (
            utc_date(1994, 1, 1).expect("date"),
            utc_date(2016, 1, 1).expect("date")
        )
    );

    let (cx, _) = center(&chart, 0);
    assert_relative_eq!(cx, scales.x.map(utc_date(1995, 1, 1).expect("date")));
    assert!(cx > 40.0 && cx < 876.0);
}

#[test]
fn fastest_ride_is_at_the_top() {
    let chart = loaded_chart();
    let (_, fastest) = center(&chart, 0);
    let (_, middle) = center(&chart, 1);
    let (_, slowest) = center(&chart, 2);
    assert_relative_eq!(fastest, 20.0, epsilon = 1e-9);
    assert_relative_eq!(slowest, 482.0, epsilon = 1e-9);
    assert!(fastest < middle && middle < slowest);
}

#[test]
fn dots_carry_iso_data_attributes() {
    let chart = loaded_chart();
    let dot = &chart.elements()[0];
    assert_eq!(dot.data_value("xvalue"), Some("1995-01-01T00:00:00.000Z"));
    assert_eq!(dot.data_value("yvalue"), Some("1899-12-31T00:36:50.000Z"));
    assert_eq!(ride_time(0), chart_pages::core::primitives::parse_utc_date("1899-12-31T00:00:00Z").expect("origin"));

    let svg = chart.to_svg().expect("svg");
    assert!(svg.contains(r#"class="dot clean""#));
    assert!(svg.contains(r#"data-yvalue="1899-12-31T00:39:12.000Z""#));
}

#[test]
fn tooltip_shows_flag_and_allegation() {
    let mut chart = loaded_chart();
    chart
        .pointer_enter(ElementId(0), Point::new(200.0, 100.0))
        .expect("enter")
        .expect("shown");

    let state = chart.tooltip_state();
    let content = state.content().expect("visible");
    let lines: Vec<String> = content.plain_text().lines().map(str::to_owned).collect();
    assert_eq!(lines[0], "Marco Pantani \u{1F1EE}\u{1F1F9}");
    assert_eq!(lines[1], "Year: 1995, Time: 36:50");
    assert!(lines[2].starts_with("Alleged drug use"));
    assert_eq!(content.data[0], ("year", "1995-01-01T00:00:00.000Z".to_owned()));
}

#[test]
fn unknown_country_falls_back_to_code() {
    let mut chart = loaded_chart();
    chart
        .pointer_enter(ElementId(2), Point::new(200.0, 100.0))
        .expect("enter");

    let text = chart
        .tooltip_state()
        .content()
        .map(|content| content.plain_text())
        .expect("visible");
    assert_eq!(text, "Nairo Quintana COL\nYear: 2015, Time: 39:12");
}

#[test]
fn tooltip_never_flips() {
    let mut chart = loaded_chart();
    let translate = chart
        .pointer_enter(ElementId(1), Point::new(880.0, 100.0))
        .expect("enter")
        .expect("shown");
    assert_eq!(translate, Point::new(900.0, 80.0));
}

#[test]
fn dots_ignore_clicks() {
    let mut chart = loaded_chart();
    assert_eq!(
        chart
            .click(ElementId(0), Point::new(0.0, 0.0), Duration::ZERO)
            .expect("click"),
        None
    );
}

struct CountingLookup {
    inner: StaticLookup,
    calls: Rc<Cell<usize>>,
}

impl FlagLookup for CountingLookup {
    fn alpha2(&self, alpha3: &str) -> ChartResult<String> {
        self.calls.set(self.calls.get() + 1);
        self.inner.alpha2(alpha3)
    }
}

#[test]
fn clicks_do_not_resolve_flags() {
    let calls = Rc::new(Cell::new(0));
    let lookup = CountingLookup {
        inner: StaticLookup::new().with_code("ITA", "IT"),
        calls: Rc::clone(&calls),
    };
    let page = ScatterplotPage::new(ScatterplotConfig::default(), lookup).expect("page");
    let mut chart = ChartOrchestrator::new(page);
    let fetcher = StaticFetcher::new()
        .with_document(CYCLIST_DATA_URL, include_str!("fixtures/cyclists.json"));
    chart.load(&fetcher).expect("load");
    let after_load = calls.get();

    let shown = chart
        .click(ElementId(0), Point::new(0.0, 0.0), Duration::ZERO)
        .expect("click");
    assert_eq!(shown, None);
    assert_eq!(calls.get(), after_load);

    chart
        .pointer_enter(ElementId(0), Point::new(200.0, 100.0))
        .expect("enter")
        .expect("shown");
    assert_eq!(calls.get(), after_load + 1);
}

#[test]
fn symbol_legend_and_axes_are_drawn() {
    let chart = loaded_chart();
    let frame = chart.frame().expect("frame");

    let legend = frame.group("legend").expect("legend");
    assert_eq!(legend.circles.len(), 2);
    assert_eq!(legend.texts[1].text, "Riders with doping allegations");

    let y_axis = frame.group("y-axis").expect("y axis");
    assert!(y_axis.texts.iter().all(|text| text.text.contains(':')));
}

#[test]
fn invalid_radius_is_rejected() {
    let config = ScatterplotConfig {
        dot_radius: 0.0,
        ..ScatterplotConfig::default()
    };
    assert!(ScatterplotPage::new(config, StaticLookup::new()).is_err());
}
