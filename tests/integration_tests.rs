//! Drives the egui widget headlessly, the way a user would: open the map, read the
//! carousel, click the arrows.

#![cfg(feature = "egui")]

use egui::{Context, Event, PointerButton, Pos2, RawInput, Rect, Vec2};
use ilocos_planner::{
    ui::{
        controls::{CarouselControl, NavigationControl},
        style::{CarouselStyle, ZoomControlStyle},
        widget::DestinationMapView,
    },
    Destination, DestinationMap, MapConfig,
};

fn destinations() -> Vec<Destination> {
    vec![
        Destination::new("Paoay Church", "church", 18.0614, 120.5217),
        Destination::new("Cape Bojeador Lighthouse", "lighthouse", 18.5150, 120.6000),
        Destination::new("Saud Beach", "beach", 18.6406, 120.9214),
    ]
}

fn screen() -> Rect {
    Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0))
}

fn input(events: Vec<Event>) -> RawInput {
    RawInput {
        screen_rect: Some(screen()),
        events,
        ..Default::default()
    }
}

/// Runs one frame and returns the rect the map occupied
fn frame(ctx: &Context, view: &mut DestinationMapView, destinations: &[Destination], events: Vec<Event>) -> Rect {
    let mut rect = Rect::NOTHING;
    let _ = ctx.run(input(events), |ctx| {
        egui::CentralPanel::default().show(ctx, |ui| {
            rect = view.show(ui, destinations).rect;
        });
    });
    rect
}

fn click(ctx: &Context, view: &mut DestinationMapView, destinations: &[Destination], pos: Pos2) {
    frame(ctx, view, destinations, vec![Event::PointerMoved(pos)]);
    frame(
        ctx,
        view,
        destinations,
        vec![Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed: true,
            modifiers: Default::default(),
        }],
    );
    frame(
        ctx,
        view,
        destinations,
        vec![Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed: false,
            modifiers: Default::default(),
        }],
    );
}

fn label(view: &DestinationMapView) -> Option<String> {
    view.map().and_then(DestinationMap::carousel_label)
}

#[test]
fn missing_token_renders_empty_container() {
    let ctx = Context::default();
    let config = MapConfig {
        access_token: None,
        ..MapConfig::for_testing()
    };
    let mut view = DestinationMapView::new(config);

    let rect = frame(&ctx, &mut view, &destinations(), Vec::new());

    assert!(rect.width() > 0.0 && rect.height() > 0.0);
    assert!(view.is_unavailable());
    assert!(view.map().is_none());
}

#[test]
fn zero_destinations_show_no_markers_or_carousel() {
    let ctx = Context::default();
    let mut view = DestinationMapView::new(MapConfig::for_testing());

    frame(&ctx, &mut view, &[], Vec::new());

    let map = view.map().expect("map should mount with a token");
    assert_eq!(map.destination_marker_count(), 0);
    assert_eq!(map.carousel_label(), None);
}

#[test]
fn destinations_produce_markers_and_label() {
    let ctx = Context::default();
    let records = destinations();
    let mut view = DestinationMapView::new(MapConfig::for_testing());

    frame(&ctx, &mut view, &records, Vec::new());

    let map = view.map().expect("map should mount with a token");
    assert_eq!(map.destination_marker_count(), 3);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(map.marker_position(i), Some(record.position()));
    }
    assert_eq!(label(&view).as_deref(), Some("1 of 3"));
}

#[test]
fn carousel_arrows_wrap_around() {
    let ctx = Context::default();
    let records = destinations();
    let mut view = DestinationMapView::new(MapConfig::for_testing());

    let rect = frame(&ctx, &mut view, &records, Vec::new());
    let layout = CarouselControl::layout(rect, &CarouselStyle::default());

    click(&ctx, &mut view, &records, layout.previous.center());
    assert_eq!(label(&view).as_deref(), Some("3 of 3"));

    click(&ctx, &mut view, &records, layout.next.center());
    assert_eq!(label(&view).as_deref(), Some("1 of 3"));

    click(&ctx, &mut view, &records, layout.next.center());
    assert_eq!(label(&view).as_deref(), Some("2 of 3"));
    assert!(view.map().map(DestinationMap::is_animating).unwrap_or(false));
}

#[test]
fn zoom_buttons_fly_one_level() {
    let ctx = Context::default();
    let records = destinations();
    let mut view = DestinationMapView::new(MapConfig::for_testing());

    let rect = frame(&ctx, &mut view, &records, Vec::new());
    let (zoom_in, zoom_out) = NavigationControl::layout(rect, &ZoomControlStyle::default());

    click(&ctx, &mut view, &records, zoom_in.center());
    let map = view.map().expect("map should mount with a token");
    assert!(map.is_animating());
    assert_eq!(map.flight_target().map(|target| target.zoom), Some(13.0));
    assert_eq!(label(&view).as_deref(), Some("1 of 3"), "zooming must not change the selection");

    click(&ctx, &mut view, &records, zoom_out.center());
    let map = view.map().expect("map should mount with a token");
    assert_eq!(map.flight_target().map(|target| target.zoom), Some(11.0));
}

#[test]
fn clicking_the_carousel_panel_does_not_pan_the_map() {
    let ctx = Context::default();
    let records = destinations();
    let mut view = DestinationMapView::new(MapConfig::for_testing());

    let rect = frame(&ctx, &mut view, &records, Vec::new());
    let layout = CarouselControl::layout(rect, &CarouselStyle::default());
    let before = view.map().map(|map| map.viewport().center);

    click(&ctx, &mut view, &records, layout.panel.center());

    let map = view.map().expect("map should mount with a token");
    assert_eq!(Some(map.viewport().center), before);
    assert!(!map.is_animating());
    assert_eq!(label(&view).as_deref(), Some("1 of 3"));
}

#[test]
fn changing_destinations_resets_carousel() {
    let ctx = Context::default();
    let records = destinations();
    let mut view = DestinationMapView::new(MapConfig::for_testing());

    frame(&ctx, &mut view, &records, Vec::new());
    if let Some(map) = view.map_mut() {
        map.select_next();
    }
    assert_eq!(label(&view).as_deref(), Some("2 of 3"));

    frame(&ctx, &mut view, &records[..2], Vec::new());
    assert_eq!(label(&view).as_deref(), Some("1 of 2"));
}

#[test]
fn flights_settle_on_the_selected_destination() {
    let mut map = DestinationMap::new(MapConfig::for_testing()).unwrap();
    let records = destinations();
    map.set_destinations(&records);

    map.select_previous();
    let target = map.flight_target().unwrap();
    while map.is_animating() {
        map.update(1.0 / 30.0).unwrap();
    }

    assert_eq!(map.viewport().center, records[2].position());
    assert_eq!(map.viewport().zoom, target.zoom);
}
