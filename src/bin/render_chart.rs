use chart_pages::api::{
    BarChartConfig, ChoroplethConfig, HeatMapConfig, JsonConfig, ScatterplotConfig, TreemapConfig,
    TreemapDataset,
};
use chart_pages::data::AutoFetcher;
use chart_pages::data::geocode::RestCountriesLookup;
use chart_pages::{
    BarChartPage, ChartOrchestrator, ChartPage, ChoroplethPage, HeatMapPage, ScatterplotPage,
    TreemapPage,
};
use std::fs;
use std::path::PathBuf;

const USAGE: &str = "usage: render-chart --chart <bar|heat-map|scatterplot|choropleth|treemap> \
[--source <path|url>] [--topology <path|url>] [--data <game|movie|kickstarter>] \
[--page-url <url>] [--config <path>] [--format <svg|html>] [--output <path>]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChartKind {
    Bar,
    HeatMap,
    Scatterplot,
    Choropleth,
    Treemap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Svg,
    Html,
}

#[derive(Debug)]
struct CliArgs {
    chart: ChartKind,
    source: Option<String>,
    topology: Option<String>,
    dataset: Option<TreemapDataset>,
    config: Option<PathBuf>,
    format: OutputFormat,
    output: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let _ = chart_pages::telemetry::init_default_tracing();
    let args = parse_args()?;
    let config_json = match &args.config {
        Some(path) => Some(
            fs::read_to_string(path)
                .map_err(|err| format!("failed to read `{}`: {err}", path.display()))?,
        ),
        None => None,
    };
    let fetcher = AutoFetcher::default();

    let document = match args.chart {
        ChartKind::Bar => {
            let config: BarChartConfig = load_config(config_json.as_deref())?;
            let page = BarChartPage::new(config)
                .map_err(|err| err.to_string())?
                .with_source(args.source.clone());
            render_page(page, &fetcher, args.format)?
        }
        ChartKind::HeatMap => {
            let config: HeatMapConfig = load_config(config_json.as_deref())?;
            let page = HeatMapPage::new(config)
                .map_err(|err| err.to_string())?
                .with_source(args.source.clone());
            render_page(page, &fetcher, args.format)?
        }
        ChartKind::Scatterplot => {
            let config: ScatterplotConfig = load_config(config_json.as_deref())?;
            let page = ScatterplotPage::new(config, RestCountriesLookup::default())
                .map_err(|err| err.to_string())?
                .with_source(args.source.clone());
            render_page(page, &fetcher, args.format)?
        }
        ChartKind::Choropleth => {
            let config: ChoroplethConfig = load_config(config_json.as_deref())?;
            let page = ChoroplethPage::new(config)
                .map_err(|err| err.to_string())?
                .with_sources(args.source.clone(), args.topology.clone());
            render_page(page, &fetcher, args.format)?
        }
        ChartKind::Treemap => {
            let mut config: TreemapConfig = load_config(config_json.as_deref())?;
            if let Some(dataset) = args.dataset {
                config.dataset = dataset;
            }
            let page = TreemapPage::new(config)
                .map_err(|err| err.to_string())?
                .with_source(args.source.clone());
            render_page(page, &fetcher, args.format)?
        }
    };

    match &args.output {
        Some(path) => fs::write(path, document)
            .map_err(|err| format!("failed to write `{}`: {err}", path.display())),
        None => {
            println!("{document}");
            Ok(())
        }
    }
}

fn load_config<C: JsonConfig + Default>(json: Option<&str>) -> Result<C, String> {
    match json {
        Some(json) => C::from_json_str(json).map_err(|err| err.to_string()),
        None => Ok(C::default()),
    }
}

fn render_page<P: ChartPage>(
    page: P,
    fetcher: &AutoFetcher,
    format: OutputFormat,
) -> Result<String, String> {
    let mut chart = ChartOrchestrator::new(page);
    chart.load(fetcher).map_err(|err| err.to_string())?;
    match format {
        OutputFormat::Svg => chart.to_svg(),
        OutputFormat::Html => chart.to_html(),
    }
    .map_err(|err| err.to_string())
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let mut chart = None::<ChartKind>;
    let mut source = None::<String>;
    let mut topology = None::<String>;
    let mut dataset = None::<TreemapDataset>;
    let mut config = None::<PathBuf>;
    let mut format = OutputFormat::Svg;
    let mut output = None::<PathBuf>;

    while let Some(flag) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .ok_or_else(|| format!("missing value for {name}"))
        };
        match flag.as_str() {
            "--chart" => {
                chart = Some(match value("--chart")?.as_str() {
                    "bar" => ChartKind::Bar,
                    "heat-map" => ChartKind::HeatMap,
                    "scatterplot" => ChartKind::Scatterplot,
                    "choropleth" => ChartKind::Choropleth,
                    "treemap" => ChartKind::Treemap,
                    other => return Err(format!("unknown chart `{other}`\n{USAGE}")),
                });
            }
            "--source" => source = Some(value("--source")?),
            "--topology" => topology = Some(value("--topology")?),
            "--data" => {
                dataset = Some(TreemapDataset::from_query(Some(value("--data")?.as_str())));
            }
            "--page-url" => {
                dataset = Some(TreemapDataset::from_page_url(&value("--page-url")?));
            }
            "--config" => config = Some(PathBuf::from(value("--config")?)),
            "--format" => {
                format = match value("--format")?.as_str() {
                    "svg" => OutputFormat::Svg,
                    "html" => OutputFormat::Html,
                    other => return Err(format!("unknown format `{other}`\n{USAGE}")),
                };
            }
            "--output" => output = Some(PathBuf::from(value("--output")?)),
            "--help" | "-h" => return Err(USAGE.to_owned()),
            other => return Err(format!("unknown argument `{other}`\n{USAGE}")),
        }
    }

    let chart = chart.ok_or_else(|| format!("missing --chart\n{USAGE}"))?;
    Ok(CliArgs {
        chart,
        source,
        topology,
        dataset,
        config,
        format,
        output,
    })
}
