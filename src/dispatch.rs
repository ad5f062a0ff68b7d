//! Pointer event routing.
//!
//! Movement and click listeners live in two independent append-only chains.
//! Dispatch walks a chain newest-first and stops at the first listener that
//! reports the event as consumed, so whatever was added to the screen last
//! gets the first chance at the pointer.

use crate::backend::MouseButton;
use crate::context::FrameControl;
use std::cell::RefCell;
use std::rc::Rc;

/// Reacts to pointer movement. Returns `true` when the event is consumed.
pub trait PointerMovable {
    fn on_pointer_move(&mut self, ctl: &mut FrameControl<'_>, x: i32, y: i32) -> bool;
}

/// Reacts to pointer button presses and releases. Returns `true` when the
/// event is consumed.
pub trait PointerClickable {
    fn on_pointer_button(
        &mut self,
        ctl: &mut FrameControl<'_>,
        x: i32,
        y: i32,
        button: MouseButton,
        pressed: bool,
    ) -> bool;
}

impl<T: PointerMovable> PointerMovable for Rc<RefCell<T>> {
    fn on_pointer_move(&mut self, ctl: &mut FrameControl<'_>, x: i32, y: i32) -> bool {
        self.borrow_mut().on_pointer_move(ctl, x, y)
    }
}

impl<T: PointerClickable> PointerClickable for Rc<RefCell<T>> {
    fn on_pointer_button(
        &mut self,
        ctl: &mut FrameControl<'_>,
        x: i32,
        y: i32,
        button: MouseButton,
        pressed: bool,
    ) -> bool {
        self.borrow_mut()
            .on_pointer_button(ctl, x, y, button, pressed)
    }
}

type MoveListener = Box<dyn FnMut(&mut FrameControl<'_>, i32, i32) -> bool>;
type ClickListener = Box<dyn FnMut(&mut FrameControl<'_>, i32, i32, MouseButton, bool) -> bool>;

#[derive(Default)]
pub struct EventDispatcher {
    movement: Vec<MoveListener>,
    click: Vec<ClickListener>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_movement_listener<F>(&mut self, listener: F)
    where
        F: FnMut(&mut FrameControl<'_>, i32, i32) -> bool + 'static,
    {
        self.movement.push(Box::new(listener));
    }

    pub fn add_click_listener<F>(&mut self, listener: F)
    where
        F: FnMut(&mut FrameControl<'_>, i32, i32, MouseButton, bool) -> bool + 'static,
    {
        self.click.push(Box::new(listener));
    }

    pub fn add_movable<T: PointerMovable + 'static>(&mut self, mut target: T) {
        self.add_movement_listener(move |ctl, x, y| target.on_pointer_move(ctl, x, y));
    }

    pub fn add_clickable<T: PointerClickable + 'static>(&mut self, mut target: T) {
        self.add_click_listener(move |ctl, x, y, button, pressed| {
            target.on_pointer_button(ctl, x, y, button, pressed)
        });
    }

    /// Registers one shared element in both chains.
    pub fn add_pointer_target<T>(&mut self, target: Rc<RefCell<T>>)
    where
        T: PointerMovable + PointerClickable + 'static,
    {
        self.add_movable(Rc::clone(&target));
        self.add_clickable(target);
    }

    pub fn movement_listeners(&self) -> usize {
        self.movement.len()
    }

    pub fn click_listeners(&self) -> usize {
        self.click.len()
    }

    /// Returns `true` if some listener consumed the movement.
    pub fn dispatch_movement(&mut self, ctl: &mut FrameControl<'_>, x: i32, y: i32) -> bool {
        self.movement.iter_mut().rev().any(|listener| listener(&mut *ctl, x, y))
    }

    /// Returns `true` if some listener consumed the button event.
    pub fn dispatch_click(
        &mut self,
        ctl: &mut FrameControl<'_>,
        x: i32,
        y: i32,
        button: MouseButton,
        pressed: bool,
    ) -> bool {
        self.click
            .iter_mut()
            .rev()
            .any(|listener| listener(&mut *ctl, x, y, button, pressed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;

    fn record(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str, consume: bool) -> MoveListener {
        let log = Rc::clone(log);
        Box::new(move |_: &mut FrameControl<'_>, _: i32, _: i32| {
            log.borrow_mut().push(name);
            consume
        })
    }

    #[test]
    fn newest_listener_goes_first_and_consumption_stops_the_walk() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut d = EventDispatcher::new();
        d.movement.push(record(&log, "l1", false));
        d.movement.push(record(&log, "l2", true));
        d.movement.push(record(&log, "l3", false));

        let mut camera = Camera::new();
        let mut stop = false;
        let mut ctl = FrameControl::new(&mut camera, &mut stop);
        assert!(d.dispatch_movement(&mut ctl, 1, 2));
        assert_eq!(*log.borrow(), ["l3", "l2"]);
    }

    #[test]
    fn unconsumed_event_visits_everyone() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut d = EventDispatcher::new();
        d.movement.push(record(&log, "l1", false));
        d.movement.push(record(&log, "l2", false));

        let mut camera = Camera::new();
        let mut stop = false;
        let mut ctl = FrameControl::new(&mut camera, &mut stop);
        assert!(!d.dispatch_movement(&mut ctl, 0, 0));
        assert_eq!(*log.borrow(), ["l2", "l1"]);
    }

    #[test]
    fn empty_chain_leaves_event_unhandled() {
        let mut d = EventDispatcher::new();
        let mut camera = Camera::new();
        let mut stop = false;
        let mut ctl = FrameControl::new(&mut camera, &mut stop);
        assert!(!d.dispatch_click(&mut ctl, 0, 0, MouseButton::Left, true));
    }
}
