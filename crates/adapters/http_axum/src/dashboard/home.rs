//! Dashboard home page: the card grid with the "Basic Information" form.

use askama::Template;
use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;

use pumpsim_app::i18n::Catalog;
use pumpsim_app::ports::{ConfigApplier, NameProvider};
use pumpsim_app::services::Layout;
use pumpsim_domain::form::{BatteryThreshold, PumpType};
use pumpsim_domain::layout::CardKind;
use pumpsim_domain::view::FormView;

use super::{DashboardError, Notice};
use crate::state::AppState;

/// One `<option>` of a `<select>`.
pub struct SelectOption {
    value: String,
    label: String,
    selected: bool,
    disabled: bool,
}

/// Grid rules for one breakpoint, emitted inside a media query.
pub struct GridStyle {
    min_width_px: u16,
    css: String,
    cells: Vec<CellStyle>,
}

/// 1-based CSS grid position of a card.
pub struct CellStyle {
    card: String,
    row: usize,
    column: usize,
    span: usize,
}

pub struct CardPanel {
    id: String,
    title: String,
    subtitle: Option<String>,
    is_basic: bool,
}

/// Labels and values of the "Basic Information" form.
pub struct BasicPanel {
    view: FormView,
    status_label: String,
    name_label: String,
    type_label: String,
    reservoir_label: String,
    battery_label: String,
    save_label: String,
    start_label: String,
    stop_label: String,
    refresh_label: String,
    reset_label: String,
    unsaved_label: String,
    type_options: Vec<SelectOption>,
    battery_options: Vec<SelectOption>,
}

impl BasicPanel {
    fn new(view: FormView, catalog: &Catalog) -> Self {
        let t = |key: &str| catalog.lookup(key).to_string();
        let status_key = format!("BASIC.STATUS.{}", view.status.to_string().to_uppercase());

        let type_options = PumpType::ALL
            .into_iter()
            .map(|pump_type| SelectOption {
                value: pump_type.code().to_string(),
                label: t(&format!("BASIC.FORM.TYPES.{}", pump_type.code())),
                selected: pump_type == view.form.pump_type,
                disabled: !pump_type.is_set(),
            })
            .collect();
        let battery_options = BatteryThreshold::ALL
            .into_iter()
            .map(|threshold| SelectOption {
                value: threshold.percent().to_string(),
                label: threshold.to_string(),
                selected: threshold == view.form.battery_threshold,
                disabled: false,
            })
            .collect();

        Self {
            status_label: t(&status_key),
            name_label: t("BASIC.FORM.NAME"),
            type_label: t("BASIC.FORM.TYPE"),
            reservoir_label: t("BASIC.FORM.RESERVOIR"),
            battery_label: t("BASIC.FORM.BATTERY"),
            save_label: t("BASIC.ACTION.SAVE"),
            start_label: t("BASIC.ACTION.START"),
            stop_label: t("BASIC.ACTION.STOP"),
            refresh_label: t("BASIC.ACTION.REFRESH_NAME"),
            reset_label: t("BASIC.ACTION.RESET"),
            unsaved_label: t("BASIC.MESSAGE.UNSAVED"),
            type_options,
            battery_options,
            view,
        }
    }

    fn reservoir(&self) -> u16 {
        self.view.form.reservoir_level.units()
    }
}

/// Home page template.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    lang: String,
    title: String,
    notice: Option<String>,
    notice_is_error: bool,
    grids: Vec<GridStyle>,
    cards: Vec<CardPanel>,
    basic: BasicPanel,
}

impl HomeTemplate {
    fn new(layout: Layout, view: FormView, catalog: &Catalog, notice: Option<Notice>) -> Self {
        let grids = layout
            .grids
            .iter()
            .map(|grid| GridStyle {
                min_width_px: grid.min_width_px,
                css: grid.css.clone(),
                cells: grid
                    .placements
                    .iter()
                    .map(|placement| CellStyle {
                        card: placement.card.to_string(),
                        row: placement.row + 1,
                        column: placement.column + 1,
                        span: placement.span,
                    })
                    .collect(),
            })
            .collect();
        let cards = layout
            .cards
            .into_iter()
            .map(|card| CardPanel {
                id: card.id.to_string(),
                title: card.title,
                subtitle: card.subtitle,
                is_basic: card.kind == CardKind::BasicInformation,
            })
            .collect();

        Self {
            lang: catalog.locale().to_string(),
            title: layout.title,
            notice: notice.map(|notice| catalog.lookup(notice.label_key()).to_string()),
            notice_is_error: notice.is_some_and(Notice::is_error),
            grids,
            cards,
            basic: BasicPanel::new(view, catalog),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    pub notice: Option<String>,
}

/// `GET /`: the dashboard.
pub async fn index<N, A>(
    State(state): State<AppState<N, A>>,
    Query(query): Query<HomeQuery>,
) -> Result<Html<String>, DashboardError>
where
    N: NameProvider + Send + Sync + 'static,
    A: ConfigApplier + Send + Sync + 'static,
{
    let notice = query.notice.as_deref().and_then(Notice::from_code);
    let layout = state.shell.render(state.catalog);
    let page = HomeTemplate::new(layout, state.controller.view(), state.catalog, notice);
    Ok(Html(page.render()?))
}
