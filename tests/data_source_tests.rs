use approx::assert_relative_eq;
use chart_pages::api::TreemapDataset;
use chart_pages::core::primitives::utc_date;
use chart_pages::data::cyclists::{CYCLIST_DATA_URL, load_riders};
use chart_pages::data::education::{EDUCATION_DATA_URL, EducationDataset};
use chart_pages::data::gdp::{GDP_DATA_URL, GdpDataset};
use chart_pages::data::geocode::{FlagLookup, RestCountriesLookup, StaticLookup, flag_emoji, flag_or_code};
use chart_pages::data::hierarchy::TreeNode;
use chart_pages::data::temperature::{TEMPERATURE_DATA_URL, TemperatureDataset};
use chart_pages::data::topology::Topology;
use chart_pages::data::{AutoFetcher, DataSource, FileFetcher, JsonFetcher, LenientNumber, StaticFetcher};
use chart_pages::error::ChartError;

const GDP_FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/gdp.json");

#[test]
fn data_source_prefers_override() {
    let source = DataSource::new(GDP_DATA_URL);
    assert_eq!(source.locator(), GDP_DATA_URL);

    let overridden = source.clone().with_override(Some("local.json".to_owned()));
    assert_eq!(overridden.locator(), "local.json");
    assert_eq!(overridden.default_locator(), GDP_DATA_URL);
    assert_eq!(source.with_override(None).locator(), GDP_DATA_URL);
}

#[test]
fn static_fetcher_reports_unknown_locators() {
    let fetcher = StaticFetcher::new().with_document("a", "[]");
    assert_eq!(fetcher.fetch_text("a").expect("registered"), "[]");
    match fetcher.fetch_text("b") {
        Err(ChartError::DataUnavailable { locator, .. }) => assert_eq!(locator, "b"),
        other => panic!("expected DataUnavailable, got {other:?}"),
    }
}

#[test]
fn invalid_json_is_data_unavailable() {
    let fetcher = StaticFetcher::new().with_document(CYCLIST_DATA_URL, "{ not json");
    let err = load_riders(&fetcher, CYCLIST_DATA_URL).expect_err("bad json");
    assert!(matches!(err, ChartError::DataUnavailable { .. }));
}

#[test]
fn file_fetcher_reads_paths_and_file_urls() {
    let dataset = GdpDataset::load(&FileFetcher, GDP_FIXTURE).expect("gdp from path");
    assert_eq!(dataset.records.len(), 2);

    let url = format!("file://{GDP_FIXTURE}");
    let via_auto = GdpDataset::load(&AutoFetcher::default(), &url).expect("gdp from url");
    assert_eq!(via_auto, dataset);

    let missing = FileFetcher.fetch_text("/definitely/not/here.json");
    assert!(matches!(missing, Err(ChartError::DataUnavailable { .. })));
}

#[test]
fn gdp_records_keep_published_labels() {
    let fetcher = StaticFetcher::new().with_document(GDP_DATA_URL, include_str!("fixtures/gdp.json"));
    let dataset = GdpDataset::load(&fetcher, GDP_DATA_URL).expect("gdp");

    assert_eq!(dataset.records[0].date_label, "1947-01-01");
    assert_eq!(dataset.records[0].date, utc_date(1947, 1, 1).expect("date"));
    assert_eq!(dataset.records[1].value, 246.3);
    assert_eq!(dataset.from_date, utc_date(1947, 1, 1).expect("date"));
    assert_eq!(dataset.to_date, utc_date(1947, 4, 1).expect("date"));
}

#[test]
fn bare_gdp_array_uses_record_extent() {
    let fetcher = StaticFetcher::new()
        .with_document("bare", r#"[["1950-07-01", 300.0], ["1950-01-01", 280.0]]"#);
    let dataset = GdpDataset::load(&fetcher, "bare").expect("gdp");
    assert_eq!(dataset.from_date, utc_date(1950, 1, 1).expect("date"));
    assert_eq!(dataset.to_date, utc_date(1950, 7, 1).expect("date"));

    let empty = StaticFetcher::new().with_document("empty", "[]");
    assert!(GdpDataset::load(&empty, "empty").is_err());

    let bad_date = StaticFetcher::new().with_document("bad", r#"[["not a date", 1.0]]"#);
    assert!(matches!(
        GdpDataset::load(&bad_date, "bad"),
        Err(ChartError::DataUnavailable { .. })
    ));
}

#[test]
fn temperature_records_add_base() {
    let fetcher = StaticFetcher::new()
        .with_document(TEMPERATURE_DATA_URL, include_str!("fixtures/temperature.json"));
    let dataset = TemperatureDataset::load(&fetcher, TEMPERATURE_DATA_URL).expect("temperature");

    assert_eq!(dataset.base_temperature, 8.66);
    assert_eq!(dataset.monthly_variance.len(), 5);
    assert_eq!(dataset.monthly_variance[4].month, 12);
    assert_relative_eq!(
        dataset.temperature(&dataset.monthly_variance[0]),
        7.294,
        epsilon = 1e-9
    );
}

#[test]
fn riders_decode_doping_notes() {
    let fetcher = StaticFetcher::new()
        .with_document(CYCLIST_DATA_URL, include_str!("fixtures/cyclists.json"));
    let riders = load_riders(&fetcher, CYCLIST_DATA_URL).expect("riders");

    assert_eq!(riders.len(), 3);
    assert_eq!(riders[0].name, "Marco Pantani");
    assert_eq!(riders[0].seconds, 2210);
    assert!(riders[0].has_doping_allegation());
    assert!(!riders[2].has_doping_allegation());
    assert_eq!(riders[2].nationality, "COL");
}

#[test]
fn education_lookup_defaults_missing_counties_to_zero() {
    let fetcher = StaticFetcher::new()
        .with_document(EDUCATION_DATA_URL, include_str!("fixtures/education.json"))
        .with_document("topology", include_str!("fixtures/counties.json"));
    let dataset = EducationDataset::load(&fetcher, EDUCATION_DATA_URL, "topology").expect("education");

    assert_eq!(dataset.percentage(1001), 21.9);
    assert_eq!(dataset.percentage(1003), 28.6);
    assert_eq!(dataset.percentage(9999), 0.0);
    assert_eq!(dataset.find(1003).map(|record| record.area_name.as_str()), Some("Baldwin County"));
    assert_eq!(dataset.index_of(1003), Some(1));
}

#[test]
fn education_load_fails_when_topology_is_missing() {
    let fetcher = StaticFetcher::new()
        .with_document(EDUCATION_DATA_URL, include_str!("fixtures/education.json"));
    assert!(matches!(
        EducationDataset::load(&fetcher, EDUCATION_DATA_URL, "missing"),
        Err(ChartError::DataUnavailable { .. })
    ));
}

#[test]
fn duplicate_fips_resolve_to_first_record() {
    let topology: Topology =
        serde_json::from_str(include_str!("fixtures/counties.json")).expect("topology");
    let records = serde_json::from_str(
        r#"[
            { "fips": 1001, "bachelorsOrHigher": 10 },
            { "fips": 1001, "bachelorsOrHigher": 20 }
        ]"#,
    )
    .expect("records");
    let dataset = EducationDataset::new(records, topology);
    assert_eq!(dataset.percentage(1001), 10.0);
}

#[test]
fn lenient_numbers_accept_strings() {
    let values: Vec<LenientNumber> =
        serde_json::from_str(r#"[82.53, "35.52", " 24 ", "n/a", null, true]"#).expect("numbers");
    let raw: Vec<f64> = values.into_iter().map(|value| value.0).collect();
    assert_eq!(raw, vec![82.53, 35.52, 24.0, 0.0, 0.0, 1.0]);
}

#[test]
fn hierarchy_decodes_string_values() {
    let fetcher = StaticFetcher::new()
        .with_document("games", include_str!("fixtures/video_games.json"));
    let root = TreeNode::load(&fetcher, "games").expect("tree");

    assert_eq!(root.name, "Video Game Sales Data Top 100");
    assert_eq!(root.children.len(), 3);
    assert_eq!(root.children[1].children[0].value, LenientNumber(82.53));
    assert_eq!(root.children[1].children[0].category_or_name(), "Wii");
    assert_eq!(root.children[0].category_or_name(), "DS");
}

#[test]
fn flag_emoji_uses_regional_indicators() {
    assert_eq!(flag_emoji("FR").as_deref(), Some("\u{1F1EB}\u{1F1F7}"));
    assert_eq!(flag_emoji("fr"), flag_emoji("FR"));
    assert_eq!(flag_emoji("FRA"), None);
    assert_eq!(flag_emoji("F1"), None);
}

#[test]
fn flag_lookup_falls_back_to_code() {
    let lookup = StaticLookup::new().with_code("ITA", "IT");
    assert_eq!(flag_or_code(&lookup, "ITA"), "\u{1F1EE}\u{1F1F9}");
    assert_eq!(flag_or_code(&lookup, "XYZ"), "XYZ");

    let broken = StaticLookup::new().with_code("BAD", "123");
    assert_eq!(flag_or_code(&broken, "BAD"), "BAD");
}

#[test]
fn rest_countries_lookup_reads_first_entry() {
    let fetcher = StaticFetcher::new()
        .with_document("countries/COL", r#"[{ "cca2": "CO", "cca3": "COL" }]"#)
        .with_document("countries/NIL", "[]");
    let lookup = RestCountriesLookup::new(fetcher).with_base_url("countries/");

    assert_eq!(lookup.alpha2("COL").expect("alpha2"), "CO");
    assert!(matches!(
        lookup.alpha2("NIL"),
        Err(ChartError::LookupFailed { .. })
    ));
    assert!(matches!(
        lookup.alpha2("USA"),
        Err(ChartError::LookupFailed { .. })
    ));
    assert_eq!(flag_or_code(&lookup, "USA"), "USA");
}

#[test]
fn treemap_dataset_selection_defaults_to_games() {
    assert_eq!(TreemapDataset::from_query(Some("movie")), TreemapDataset::Movie);
    assert_eq!(TreemapDataset::from_query(Some("kickstarter")), TreemapDataset::Kickstarter);
    assert_eq!(TreemapDataset::from_query(Some("books")), TreemapDataset::Game);
    assert_eq!(TreemapDataset::from_query(None), TreemapDataset::Game);

    assert_eq!(
        TreemapDataset::from_page_url("https://example.com/treemap?data=movie"),
        TreemapDataset::Movie
    );
    assert_eq!(
        TreemapDataset::from_page_url("https://example.com/treemap"),
        TreemapDataset::Game
    );
    assert_eq!(TreemapDataset::from_page_url("not a url"), TreemapDataset::Game);
    assert!(TreemapDataset::Movie.url().ends_with("movie-data.json"));
    assert_eq!(TreemapDataset::Kickstarter.category_name(), "Category");
}
