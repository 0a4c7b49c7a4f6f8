use crate::client::{FetchError, YahooClient};
use crate::view::build_view_model;
use chrono::DateTime;
use eframe::egui;
use egui::{
    Color32, Context, CornerRadius, FontFamily, FontId, Margin, RichText, Stroke, Vec2, Visuals,
};
use egui_extras::{Size, StripBuilder};
use egui_plot::{Line, Plot};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::format::format_price;
use crate::model::{DeltaDirection, KeyStat, Period, TickerMetadata, ViewModel};

// Finance-site palette: dark ink on white cards, green/red deltas.
const INK: Color32 = Color32::from_rgb(29, 29, 31);
const LABEL_GRAY: Color32 = Color32::from_rgb(91, 107, 121);
const CARD_BORDER: Color32 = Color32::from_rgb(224, 224, 224);
const UP_GREEN: Color32 = Color32::from_rgb(0, 200, 5);
const DOWN_RED: Color32 = Color32::from_rgb(255, 80, 0);

const STAT_COLUMNS: usize = 4;

pub fn set_custom_style(ctx: &Context) {
    // Light "finance site" theme
    let mut visuals = Visuals::light();

    visuals.panel_fill = Color32::from_rgb(246, 247, 248);
    visuals.window_fill = Color32::WHITE;
    visuals.extreme_bg_color = Color32::WHITE;
    visuals.faint_bg_color = Color32::from_rgb(240, 242, 244);

    visuals.widgets.inactive.bg_fill = Color32::WHITE;
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, CARD_BORDER);

    visuals.widgets.hovered.bg_fill = Color32::from_rgb(240, 244, 248);
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.5, Color32::from_rgb(160, 180, 200));

    visuals.widgets.active.bg_fill = Color32::from_rgb(228, 236, 244);
    visuals.widgets.active.bg_stroke = Stroke::new(1.5, Color32::from_rgb(120, 150, 180));

    visuals.selection.bg_fill = Color32::from_rgb(208, 225, 245);
    visuals.selection.stroke = Stroke::new(1.0, Color32::from_rgb(60, 110, 180));

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.window_margin = Margin::same(12);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);

    style.text_styles.insert(
        egui::TextStyle::Body,
        FontId::new(15.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Heading,
        FontId::new(22.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Button,
        FontId::new(15.0, FontFamily::Proportional),
    );

    ctx.set_style(style);
}

/// What the last request cycle produced. Replaced wholesale on every
/// new interaction; nothing survives across cycles.
enum Outcome {
    Idle,
    NoData { ticker: String },
    Failed { message: String },
    Ready(ViewModel),
}

pub struct StockApp {
    client: YahooClient,
    ticker_input: String,
    period: Period,
    outcome: Outcome,
}

impl StockApp {
    pub fn new(config: &AppConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: YahooClient::new()?,
            ticker_input: config.default_ticker.clone(),
            period: Period::default(),
            outcome: Outcome::Idle,
        })
    }

    /// One synchronous fetch-then-build cycle: history (critical),
    /// then metadata (best-effort).
    fn run_cycle(&mut self) {
        let ticker = self.ticker_input.trim().to_uppercase();
        if ticker.is_empty() {
            return;
        }
        self.ticker_input = ticker.clone();

        info!(%ticker, period = self.period.label(), "request cycle");

        let series = match self.client.fetch_history(&ticker, self.period) {
            Ok(series) => series,
            Err(error) => {
                self.outcome = Outcome::Failed {
                    message: format!("Error fetching historical data for {ticker}: {error}"),
                };
                return;
            }
        };

        if series.is_empty() {
            self.outcome = Outcome::NoData { ticker };
            return;
        }

        let meta = match self.client.fetch_metadata(&ticker) {
            Ok(meta) => meta,
            Err(error) => {
                warn!(%ticker, %error, "metadata unavailable, rendering without it");
                TickerMetadata::default()
            }
        };

        self.outcome = Outcome::Ready(build_view_model(series, &meta, &ticker));
    }
}

impl eframe::App for StockApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut refetch = false;

        egui::SidePanel::left("controls")
            .resizable(false)
            .exact_width(230.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.heading(RichText::new("Stock Search").color(INK).strong());
                ui.add_space(8.0);

                ui.label(RichText::new("Ticker Symbol").color(LABEL_GRAY));
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.ticker_input)
                        .hint_text("e.g. AAPL")
                        .desired_width(f32::INFINITY),
                );
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    refetch = true;
                }

                ui.add_space(8.0);
                ui.label(RichText::new("Period").color(LABEL_GRAY));
                egui::ComboBox::from_id_salt("period")
                    .selected_text(self.period.label())
                    .width(ui.available_width())
                    .show_ui(ui, |ui| {
                        for period in Period::ALL {
                            let clicked = ui
                                .selectable_value(&mut self.period, period, period.label())
                                .clicked();
                            // A fresh period only refetches once something is on screen.
                            if clicked && !matches!(self.outcome, Outcome::Idle) {
                                refetch = true;
                            }
                        }
                    });

                ui.add_space(12.0);
                if ui
                    .add_sized(
                        Vec2::new(ui.available_width(), 30.0),
                        egui::Button::new(RichText::new("Search").strong()),
                    )
                    .clicked()
                {
                    refetch = true;
                }
            });

        if refetch {
            self.run_cycle();
        }

        egui::CentralPanel::default().show(ctx, |ui| match &self.outcome {
            Outcome::Idle => welcome_screen(ui),
            Outcome::NoData { ticker } => notice_screen(
                ui,
                "⚠",
                &format!(
                    "No price data found for {ticker}. It might be delisted or potentially an invalid ticker."
                ),
                LABEL_GRAY,
            ),
            Outcome::Failed { message } => notice_screen(ui, "✖", message, DOWN_RED),
            Outcome::Ready(view) => dashboard(ui, view),
        });
    }
}

fn direction_color(direction: DeltaDirection) -> Color32 {
    match direction {
        DeltaDirection::Up => UP_GREEN,
        DeltaDirection::Down => DOWN_RED,
        DeltaDirection::Flat => INK,
    }
}

fn welcome_screen(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(100.0);
            ui.label(RichText::new("📈").size(72.0));
            ui.add_space(16.0);
            ui.label(RichText::new("Stock Analytics").size(24.0).color(INK));
            ui.add_space(8.0);
            ui.label(
                RichText::new("Enter a ticker symbol and press Search to load a dashboard")
                    .color(LABEL_GRAY),
            );
        });
    });
}

fn notice_screen(ui: &mut egui::Ui, glyph: &str, message: &str, tint: Color32) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(100.0);
            ui.label(RichText::new(glyph).size(56.0).color(tint));
            ui.add_space(12.0);
            ui.label(RichText::new(message).size(17.0).color(INK));
        });
    });
}

fn dashboard(ui: &mut egui::Ui, view: &ViewModel) {
    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.add_space(4.0);
        ui.heading(
            RichText::new(format!("{} ({})", view.display_name, view.ticker))
                .size(26.0)
                .strong()
                .color(INK),
        );
        ui.add_space(2.0);

        let accent = direction_color(view.direction);
        let sign = view.direction.sign();
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(format_price(view.current_price))
                    .size(36.0)
                    .strong()
                    .color(INK),
            );
            ui.label(
                RichText::new(format!(
                    "{sign}{:.2} ({sign}{:.2}%)",
                    view.delta, view.delta_percent
                ))
                .size(20.0)
                .color(accent),
            );
        });
        ui.label(
            RichText::new(format!("Currency in {}", view.currency))
                .size(13.0)
                .color(LABEL_GRAY),
        );

        ui.add_space(12.0);
        section_heading(ui, "Price History");
        price_chart(ui, view, accent);

        ui.add_space(12.0);
        section_heading(ui, "Key Statistics");
        statistics_grid(ui, &view.key_stats);

        ui.add_space(12.0);
        section_heading(ui, "About");
        egui::CollapsingHeader::new("Show Company Description")
            .default_open(false)
            .show(ui, |ui| {
                ui.label(RichText::new(&view.summary).color(INK));
            });
        ui.add_space(8.0);
    });
}

fn section_heading(ui: &mut egui::Ui, text: &str) {
    ui.heading(RichText::new(text).size(19.0).color(INK));
    ui.add_space(4.0);
}

fn price_chart(ui: &mut egui::Ui, view: &ViewModel, accent: Color32) {
    let points: Vec<[f64; 2]> = view
        .series
        .points
        .iter()
        .map(|p| [p.ts.timestamp() as f64, p.close])
        .collect();

    Plot::new("price_history")
        .height(400.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(|mark, _range| axis_date(mark.value))
        .label_formatter(|_name, point| format!("{}\n{:.2}", axis_date(point.x), point.y))
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new("Close", points).color(accent).width(2.0));
        });
}

/// Plot x values are Unix seconds; render them as calendar dates.
fn axis_date(secs: f64) -> String {
    DateTime::from_timestamp(secs as i64, 0)
        .map(|ts| ts.format("%b %d, %Y").to_string())
        .unwrap_or_default()
}

/// Fixed-order cards filling rows of four, left to right.
fn statistics_grid(ui: &mut egui::Ui, stats: &[KeyStat]) {
    let rows = stats.chunks(STAT_COLUMNS).count();

    StripBuilder::new(ui)
        .sizes(Size::exact(78.0), rows)
        .vertical(|mut strip| {
            for chunk in stats.chunks(STAT_COLUMNS) {
                strip.strip(|builder| {
                    builder
                        .sizes(Size::remainder(), STAT_COLUMNS)
                        .horizontal(|mut strip| {
                            for slot in 0..STAT_COLUMNS {
                                strip.cell(|ui| {
                                    if let Some(stat) = chunk.get(slot) {
                                        stat_card(ui, stat);
                                    }
                                });
                            }
                        });
                });
            }
        });
}

fn stat_card(ui: &mut egui::Ui, stat: &KeyStat) {
    egui::Frame::new()
        .fill(Color32::WHITE)
        .stroke(Stroke::new(1.0, CARD_BORDER))
        .corner_radius(CornerRadius::same(8))
        .inner_margin(Margin::same(12))
        .outer_margin(Margin::same(4))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical(|ui| {
                ui.label(RichText::new(stat.label).size(13.0).color(LABEL_GRAY));
                ui.label(
                    RichText::new(&stat.value)
                        .size(20.0)
                        .strong()
                        .color(INK),
                );
            });
        });
}
