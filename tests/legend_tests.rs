use approx::assert_relative_eq;
use chart_pages::api::config::OrdinalLegendConfig;
use chart_pages::api::format::one_decimal;
use chart_pages::api::legend::{SymbolEntry, ThresholdLegend, ordinal_legend_frame, symbol_legend};
use chart_pages::core::{OrdinalScale, ThresholdScale};
use chart_pages::render::{Color, TextHAlign, palette_from_hex};

fn three_colors() -> Vec<Color> {
    palette_from_hex(&["#313695", "#ffffbf", "#a50026"]).expect("palette")
}

#[test]
fn threshold_legend_has_one_cell_per_bucket() {
    let scale = ThresholdScale::new(vec![10.0, 20.0], three_colors()).expect("scale");
    let legend = ThresholdLegend::build(&scale, (0.0, 100.0), one_decimal).expect("legend");

    assert_eq!(legend.len(), scale.outputs().len());
    assert_eq!(legend.ticks.len(), 2);
    assert_eq!(legend.ticks[0].label, "10.0");
    assert_relative_eq!(legend.ticks[0].position, 100.0 / 3.0, epsilon = 1e-9);
    assert_relative_eq!(legend.ticks[1].position, 200.0 / 3.0, epsilon = 1e-9);
}

#[test]
fn open_ended_buckets_collapse_to_zero_width() {
    let scale = ThresholdScale::new(vec![10.0, 20.0], three_colors()).expect("scale");
    let legend = ThresholdLegend::build(&scale, (0.0, 100.0), one_decimal).expect("legend");

    let first = legend.cells.first().expect("first cell");
    let last = legend.cells.last().expect("last cell");
    assert_eq!(first.width, 0.0);
    assert_eq!(last.width, 0.0);
    assert_eq!(first.extent, (None, Some(10.0)));

    let middle = legend.cells[1];
    assert_relative_eq!(middle.x, 100.0 / 3.0, epsilon = 1e-9);
    assert_relative_eq!(middle.width, 100.0 / 3.0, epsilon = 1e-9);
    assert_eq!(middle.color, three_colors()[1]);
}

#[test]
fn threshold_legend_groups_carry_ids_and_translation() {
    let outputs = palette_from_hex(&[
        "#313695", "#4575b4", "#74add1", "#abd9e9", "#e0f3f8", "#ffffbf",
    ])
    .expect("palette");
    let scale = ThresholdScale::from_extent(1.684, 13.888, outputs).expect("scale");
    let legend = ThresholdLegend::build(&scale, (65.0, 396.0), one_decimal).expect("legend");

    let (swatches, axis) = legend.to_groups(20.0, (0.0, 502.0), (0.0, 522.0));
    assert_eq!(swatches.id.as_deref(), Some("legend"));
    assert_eq!(swatches.translate, (0.0, 502.0));
    assert_eq!(swatches.rects.len(), 6);
    assert!(swatches.rects.iter().all(|rect| rect.height == 20.0));
    assert_eq!(axis.id.as_deref(), Some("legend-axis"));
    assert_eq!(axis.translate, (0.0, 522.0));
    assert_eq!(axis.texts.len(), 5);
}

#[test]
fn ordinal_legend_is_a_detached_grid() {
    let categories = vec!["Wii".to_owned(), "DS".to_owned(), "X360".to_owned(), "PS4".to_owned()];
    let colors = OrdinalScale::new(
        categories.iter().cloned(),
        palette_from_hex(&["#4e79a7", "#f28e2c", "#e15759"]).expect("palette"),
    )
    .expect("ordinal");
    let config = OrdinalLegendConfig::default();

    let frame = ordinal_legend_frame(&categories, &colors, 474.0, config).expect("legend");
    assert_eq!(frame.id.as_deref(), Some("legend"));
    assert_eq!(frame.viewport.width, 474);
    assert_eq!(frame.viewport.height, 48);

    let group = &frame.groups[0];
    assert_eq!(group.rects.len(), 4);
    assert!(group.rects.iter().all(|rect| rect.class == Some("legend-item")));
    assert_eq!(group.rects[0].fill, group.rects[3].fill);
    assert_relative_eq!(group.rects[1].x, 158.0);
    assert_relative_eq!(group.rects[3].y, 24.0);
    assert_eq!(group.texts[2].text, "X360");
}

#[test]
fn ordinal_legend_rejects_bad_geometry() {
    let categories = vec!["Wii".to_owned()];
    let colors = OrdinalScale::new(categories.iter().cloned(), vec![Color::BLACK]).expect("ordinal");
    let no_columns = OrdinalLegendConfig {
        columns: 0,
        ..OrdinalLegendConfig::default()
    };
    assert!(ordinal_legend_frame(&categories, &colors, 100.0, no_columns).is_err());
    assert!(
        ordinal_legend_frame(&categories, &colors, 0.0, OrdinalLegendConfig::default()).is_err()
    );

    let unknown = vec!["PS4".to_owned()];
    assert!(
        ordinal_legend_frame(&unknown, &colors, 100.0, OrdinalLegendConfig::default()).is_err()
    );
}

#[test]
fn symbol_legend_stacks_rows() {
    let entries = [
        SymbolEntry {
            stroke: Color::from_hex("#3b82f6").expect("color"),
            label: "No doping allegations".to_owned(),
        },
        SymbolEntry {
            stroke: Color::from_hex("#f87171").expect("color"),
            label: "Riders with doping allegations".to_owned(),
        },
    ];
    let group = symbol_legend(&entries, (856.0, 252.0), 6.0, 20.0);

    assert_eq!(group.id.as_deref(), Some("legend"));
    assert_eq!(group.circles.len(), 2);
    assert_eq!(group.circles[1].cy, 272.0);
    assert_eq!(group.circles[1].stroke, entries[1].stroke);
    assert_eq!(group.texts[0].h_align, TextHAlign::Right);
    assert_eq!(group.texts[0].x, 844.0);
}
