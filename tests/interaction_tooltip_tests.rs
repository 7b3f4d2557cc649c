use std::time::Duration;

use chart_pages::api::ChartContext;
use chart_pages::core::{Point, Viewport};
use chart_pages::interaction::{
    DEFAULT_REVERT_DELAY, HighlightTimers, TooltipContent, TooltipController, TooltipPlacement,
    TooltipState,
};
use chart_pages::render::{ElementId, PointerHandlers, Shape, VisualElement};
use proptest::prelude::*;

fn bar_placement() -> TooltipPlacement {
    TooltipPlacement {
        width: 128.0,
        offset_x: 40.0,
        right_padding: 20.0,
        offset_y: -50.0,
        flip_on_overflow: true,
    }
}

fn bars(count: usize, handlers: PointerHandlers) -> Vec<VisualElement> {
    (0..count)
        .map(|index| {
            VisualElement::new(
                ElementId(index),
                index,
                Shape::Rect {
                    x: index as f64 * 10.0,
                    y: 0.0,
                    width: 10.0,
                    height: 100.0,
                },
                "bar",
            )
            .with_handlers(handlers)
        })
        .collect()
}

fn context(count: usize, handlers: PointerHandlers) -> ChartContext {
    ChartContext::new(
        Viewport::new(896, 512),
        bars(count, handlers),
        bar_placement(),
        896.0,
        DEFAULT_REVERT_DELAY,
    )
    .expect("context")
}

fn content(text: &str) -> TooltipContent {
    TooltipContent::from_lines([text])
}

#[test]
fn tooltip_sits_right_of_pointer_when_it_fits() {
    let translate = bar_placement().translate(Point::new(100.0, 200.0), 896.0);
    assert_eq!(translate, Point::new(140.0, 150.0));
}

#[test]
fn tooltip_flips_left_when_it_would_overflow() {
    let placement = bar_placement();
    // 720 + 40 + 128 + 20 = 908 > 896
    assert_eq!(placement.translate_x(720.0, 896.0), 720.0 - 128.0 - 40.0);
    // 700 + 40 + 128 + 20 = 888 fits
    assert_eq!(placement.translate_x(700.0, 896.0), 740.0);
}

#[test]
fn non_flipping_tooltip_always_goes_right() {
    let placement = TooltipPlacement {
        flip_on_overflow: false,
        ..bar_placement()
    };
    assert_eq!(placement.translate_x(880.0, 896.0), 920.0);
}

#[test]
fn invalid_placement_is_rejected() {
    let placement = TooltipPlacement {
        width: -1.0,
        ..bar_placement()
    };
    assert!(placement.validate().is_err());
    assert!(TooltipController::new(bar_placement(), 0.0).is_err());
}

#[test]
fn controller_show_and_hide_cycle() {
    let mut controller = TooltipController::new(bar_placement(), 896.0).expect("controller");
    assert_eq!(controller.state(), &TooltipState::Hidden);

    let translate = controller.show(Point::new(10.0, 60.0), content("January 1947"));
    assert!(controller.is_visible());
    assert_eq!(controller.state().translate(), Some(translate));

    controller.show(Point::new(20.0, 60.0), content("April 1947"));
    assert_eq!(
        controller.state().content().map(TooltipContent::plain_text),
        Some("April 1947".to_owned())
    );

    controller.hide();
    assert!(!controller.is_visible());
    controller.hide();
    assert!(!controller.is_visible());
}

#[test]
fn tooltip_content_joins_lines_and_strips_markup() {
    let content = TooltipContent::from_lines(["<b>Year:</b> 1995", "A &amp; B"])
        .with_data("year", 1995);
    assert_eq!(content.plain_text(), "Year: 1995\nA & B");
    assert_eq!(content.data[0], ("year", "1995".to_owned()));
}

#[test]
fn screen_width_change_affects_overflow() {
    let mut controller = TooltipController::new(bar_placement(), 896.0).expect("controller");
    controller.set_screen_width(400.0).expect("resize");
    let translate = controller.show(Point::new(300.0, 0.0), content("x"));
    assert_eq!(translate.x, 300.0 - 128.0 - 40.0);
    assert!(controller.set_screen_width(f64::NAN).is_err());
}

#[test]
fn timers_schedule_and_expire() {
    let mut timers = HighlightTimers::new(Duration::from_millis(1000));
    assert!(timers.schedule(ElementId(3), Duration::from_millis(500)).is_empty());
    assert_eq!(timers.due_at(ElementId(3)), Some(Duration::from_millis(1500)));

    assert!(timers.expire(Duration::from_millis(1499)).is_empty());
    assert_eq!(timers.expire(Duration::from_millis(1500)), vec![ElementId(3)]);
    assert_eq!(timers.pending_count(), 0);
}

#[test]
fn scheduling_cancels_earlier_reverts() {
    let mut timers = HighlightTimers::default();
    timers.schedule(ElementId(1), Duration::ZERO);
    let cancelled = timers.schedule(ElementId(2), Duration::from_millis(200));
    assert_eq!(cancelled, vec![ElementId(1)]);
    assert_eq!(timers.pending_count(), 1);
    assert!(!timers.cancel(ElementId(1)));
    assert!(timers.cancel(ElementId(2)));
}

#[test]
fn hover_shows_and_leave_hides() {
    let mut ctx = context(3, PointerHandlers::HOVER);
    let translate = ctx
        .pointer_enter(ElementId(1), Point::new(100.0, 200.0), content("bar 1"))
        .expect("enter");
    assert_eq!(translate, Some(Point::new(140.0, 150.0)));
    assert!(ctx.tooltip().is_visible());

    ctx.pointer_leave(ElementId(1)).expect("leave");
    assert!(!ctx.tooltip().is_visible());
}

#[test]
fn elements_without_click_handlers_ignore_clicks() {
    let mut ctx = context(2, PointerHandlers::HOVER);
    let result = ctx
        .click(ElementId(0), Point::new(0.0, 0.0), content("bar"), Duration::ZERO)
        .expect("click");
    assert_eq!(result, None);
    assert_eq!(ctx.highlighted().count(), 0);
}

#[test]
fn unknown_element_is_an_error() {
    let mut ctx = context(2, PointerHandlers::HOVER);
    assert!(
        ctx.pointer_enter(ElementId(9), Point::new(0.0, 0.0), content("x"))
            .is_err()
    );
}

#[test]
fn click_highlights_then_reverts_after_delay() {
    let mut ctx = context(3, PointerHandlers::HOVER_AND_CLICK);
    ctx.click(
        ElementId(1),
        Point::new(50.0, 50.0),
        content("bar 1"),
        Duration::from_millis(100),
    )
    .expect("click");
    assert_eq!(ctx.highlighted().collect::<Vec<_>>(), vec![ElementId(1)]);
    assert!(ctx.tooltip().is_visible());

    assert!(ctx.advance_clock(Duration::from_millis(1099)).expect("tick").is_empty());
    assert!(ctx.tooltip().is_visible());

    let reverted = ctx.advance_clock(Duration::from_millis(1100)).expect("tick");
    assert_eq!(reverted, vec![ElementId(1)]);
    assert_eq!(ctx.highlighted().count(), 0);
    assert!(!ctx.tooltip().is_visible());
}

#[test]
fn second_click_reverts_first_highlight_immediately() {
    let mut ctx = context(3, PointerHandlers::HOVER_AND_CLICK);
    ctx.click(ElementId(0), Point::new(0.0, 0.0), content("a"), Duration::ZERO)
        .expect("click a");
    ctx.click(
        ElementId(2),
        Point::new(20.0, 0.0),
        content("b"),
        Duration::from_millis(400),
    )
    .expect("click b");

    assert_eq!(ctx.highlighted().collect::<Vec<_>>(), vec![ElementId(2)]);

    // The first click's deadline passes without hiding the second tooltip.
    assert!(ctx.advance_clock(Duration::from_millis(1000)).expect("tick").is_empty());
    assert_eq!(
        ctx.tooltip().state().content().map(TooltipContent::plain_text),
        Some("b".to_owned())
    );

    assert_eq!(
        ctx.advance_clock(Duration::from_millis(1400)).expect("tick"),
        vec![ElementId(2)]
    );
    assert!(!ctx.tooltip().is_visible());
}

#[test]
fn hover_after_click_keeps_tooltip_past_revert() {
    let mut ctx = context(2, PointerHandlers::HOVER_AND_CLICK);
    ctx.click(ElementId(0), Point::new(0.0, 0.0), content("a"), Duration::ZERO)
        .expect("click");
    ctx.pointer_enter(ElementId(1), Point::new(10.0, 0.0), content("b"))
        .expect("enter");

    let reverted = ctx.advance_clock(Duration::from_secs(2)).expect("tick");
    assert_eq!(reverted, vec![ElementId(0)]);
    assert!(ctx.tooltip().is_visible());
    assert_eq!(ctx.highlighted().count(), 0);
}

proptest! {
    #[test]
    fn tooltip_never_overflows_when_flipped(
        pointer_x in 0.0f64..2_000.0,
        screen_width in 300.0f64..2_000.0,
        width in 10.0f64..200.0,
        offset_x in 0.0f64..60.0,
        right_padding in 0.0f64..40.0
    ) {
        let placement = TooltipPlacement {
            width,
            offset_x,
            right_padding,
            offset_y: 0.0,
            flip_on_overflow: true,
        };
        let x = placement.translate_x(pointer_x, screen_width);

        if pointer_x + offset_x + width + right_padding > screen_width {
            prop_assert_eq!(x, pointer_x - width - offset_x);
            prop_assert!(x + width <= pointer_x);
        } else {
            prop_assert_eq!(x, pointer_x + offset_x);
            prop_assert!(x + width + right_padding <= screen_width);
        }
    }
}
