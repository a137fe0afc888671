use anyhow::Context as _;
use std::path::PathBuf;
use ilocos_planner::{
    data::destination::{load_destinations, parse_destinations, Destination},
    ui::{
        landing::{LandingAction, LandingPage},
        widget::DestinationMapView,
        UiMapExt as _,
    },
    MapConfig,
};

const BUNDLED_DESTINATIONS: &str = include_str!("../../data/destinations.json");

/// Desktop host for the landing page and the destination map
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = CliArgs::parse(std::env::args().skip(1))?;

    let destinations = match &args.destinations {
        Some(path) => load_destinations(path)
            .with_context(|| format!("failed to load destinations from {}", path.display()))?,
        None => parse_destinations(BUNDLED_DESTINATIONS).context("bundled destinations are invalid")?,
    };
    log::info!("starting with {} destinations", destinations.len());

    let config = MapConfig::load(args.config.as_deref()).context("invalid map configuration")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Ilocos Norte Tourism Path Planner"),
        ..Default::default()
    };

    eframe::run_native(
        "ilocos-planner-app",
        options,
        Box::new(move |_cc| Box::new(PlannerApp::new(config, destinations))),
    )
    .map_err(|err| anyhow::anyhow!("window closed with an error: {}", err))?;

    Ok(())
}

/// `ilocos-planner-app [--config <file>] [destinations.json]`
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    config: Option<PathBuf>,
    destinations: Option<PathBuf>,
}

impl CliArgs {
    fn parse(args: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = args.next().context("--config needs a file path")?;
                    parsed.config = Some(PathBuf::from(path));
                }
                flag if flag.starts_with('-') => anyhow::bail!("unknown option {}", flag),
                _ if parsed.destinations.is_none() => parsed.destinations = Some(PathBuf::from(arg)),
                _ => anyhow::bail!("unexpected argument {}", arg),
            }
        }
        Ok(parsed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Landing,
    Map,
}

struct PlannerApp {
    screen: Screen,
    landing: LandingPage,
    map_view: DestinationMapView,
    destinations: Vec<Destination>,
    show_destination_panel: bool,
}

impl PlannerApp {
    fn new(config: MapConfig, destinations: Vec<Destination>) -> Self {
        Self {
            screen: Screen::Landing,
            landing: LandingPage::new(),
            map_view: DestinationMapView::new(config),
            destinations,
            show_destination_panel: true,
        }
    }

    fn destination_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Destinations");
        ui.separator();

        if self.map_view.is_unavailable() {
            ui.label("The map is unavailable. Set MAPBOX_TOKEN and restart.");
            return;
        }
        let Some(map) = self.map_view.map_mut() else {
            return;
        };

        let selected = map.carousel().current();
        let mut clicked = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for (index, destination) in map.destinations().iter().enumerate() {
                let text = format!("{} ({})", destination.title, destination.category().label());
                if ui.selectable_label(selected == Some(index), text).clicked() {
                    clicked = Some(index);
                }
            }
        });
        if let Some(index) = clicked {
            map.select(index);
        }
    }
}

impl eframe::App for PlannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.screen {
            Screen::Landing => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    if let Some(LandingAction::StartPlanning) = self.landing.show(ui) {
                        self.screen = Screen::Map;
                    }
                });
            }
            Screen::Map => {
                egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("← Home").clicked() {
                            self.screen = Screen::Landing;
                        }
                        ui.separator();
                        ui.toggle_value(&mut self.show_destination_panel, "Destinations");
                    });
                });

                if self.show_destination_panel {
                    egui::SidePanel::left("destination_panel")
                        .resizable(true)
                        .default_width(260.0)
                        .show(ctx, |ui| self.destination_panel(ui));
                }

                egui::CentralPanel::default()
                    .frame(egui::Frame::none())
                    .show(ctx, |ui| {
                        ui.destination_map(&mut self.map_view, &self.destinations);
                    });
            }
        }
    }
}
